pub mod audit_event;
pub mod book;
pub mod refresh_session;
pub mod user;

pub use audit_event::{AuditAction, AuditEntity, AuditEvent};
pub use book::{Book, NewBook};
pub use refresh_session::RefreshSession;
pub use user::{NewUser, User};
