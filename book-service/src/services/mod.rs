//! Business logic for accounts, tokens and books.

pub mod audit;
mod auth;
mod books;
pub mod error;
mod jwt;

pub use audit::{AuditSink, Auditor, HttpAuditClient, NoopAudit, RecordingAudit};
pub use auth::{AuthService, TokenPair};
pub use books::BookService;
pub use error::ServiceError;
pub use jwt::{AccessTokenClaims, JwtService};
