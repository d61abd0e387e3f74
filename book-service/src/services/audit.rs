//! Best-effort audit trail. Events are sent off the request path and
//! failures are only logged.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::models::{AuditAction, AuditEntity, AuditEvent};

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn send(&self, event: &AuditEvent) -> Result<(), anyhow::Error>;
}

/// Drops every event. Used when no collector is configured.
pub struct NoopAudit;

#[async_trait]
impl AuditSink for NoopAudit {
    async fn send(&self, _event: &AuditEvent) -> Result<(), anyhow::Error> {
        Ok(())
    }
}

/// Posts events as JSON to an external collector.
pub struct HttpAuditClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAuditClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build audit HTTP client: {}", e))?;

        tracing::info!(endpoint = %endpoint, "Audit client configured");

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl AuditSink for HttpAuditClient {
    async fn send(&self, event: &AuditEvent) -> Result<(), anyhow::Error> {
        self.client
            .post(&self.endpoint)
            .json(event)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| anyhow::anyhow!("Audit request to {} failed: {}", self.endpoint, e))?;
        Ok(())
    }
}

/// Keeps events in memory; can be told to fail every send.
#[derive(Default)]
pub struct RecordingAudit {
    events: Mutex<Vec<AuditEvent>>,
    fail: AtomicBool,
}

impl RecordingAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let audit = Self::default();
        audit.fail.store(true, Ordering::SeqCst);
        audit
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AuditSink for RecordingAudit {
    async fn send(&self, event: &AuditEvent) -> Result<(), anyhow::Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("audit collector unavailable"));
        }
        self.events
            .lock()
            .map_err(|e| anyhow::anyhow!("Recording audit mutex poisoned: {}", e))?
            .push(event.clone());
        Ok(())
    }
}

/// Fire-and-forget front for an `AuditSink`.
#[derive(Clone)]
pub struct Auditor {
    sink: Arc<dyn AuditSink>,
}

impl Auditor {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    pub fn record(&self, action: AuditAction, entity: AuditEntity, entity_id: i64, method: &'static str) {
        let event = AuditEvent::new(action, entity, entity_id);
        let sink = self.sink.clone();

        tokio::spawn(async move {
            if let Err(e) = sink.send(&event).await {
                tracing::error!(
                    error = %e,
                    method,
                    action = event.action.as_str(),
                    entity_id = event.entity_id,
                    "Failed to send audit event"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn records_events_in_background() {
        let sink = Arc::new(RecordingAudit::new());
        let auditor = Auditor::new(sink.clone());

        auditor.record(AuditAction::Create, AuditEntity::Book, 7, "books.create");
        settle().await;

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, AuditAction::Create);
        assert_eq!(events[0].entity, AuditEntity::Book);
        assert_eq!(events[0].entity_id, 7);
    }

    #[tokio::test]
    async fn failures_stay_inside_the_task() {
        let sink = Arc::new(RecordingAudit::failing());
        let auditor = Auditor::new(sink.clone());

        auditor.record(AuditAction::Delete, AuditEntity::Book, 1, "books.delete");
        settle().await;

        assert!(sink.events().is_empty());
    }

    #[test]
    fn event_serializes_snake_case() {
        let event = AuditEvent::new(AuditAction::Register, AuditEntity::User, 3);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "register");
        assert_eq!(json["entity"], "user");
        assert_eq!(json["entity_id"], 3);
    }
}
