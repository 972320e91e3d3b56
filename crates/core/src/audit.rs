//! PHI/PII audit trail.
//!
//! Every access to or change of a patient record produces an [`AuditEvent`]. Events are
//! persisted in the `audit_events` collection and mirrored to the `cdx::audit` tracing target
//! so they can be shipped with the rest of the logs.

use crate::actor::Actor;
use crate::constants::AUDIT_EVENTS;
use crate::record::{now_rfc3339, RecordKind};
use crate::store::DocumentStore;
use crate::CoreResult;
use cdx_uuid::RecordId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

/// What happened to a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuditAction {
    Created,
    Accessed,
    Updated,
    Deleted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    PhiCreated,
    PhiAccessed,
    PhiUpdated,
    PhiDeleted,
    PiiCreated,
    PiiAccessed,
    PiiUpdated,
    PiiDeleted,
    ConfigCreated,
    ConfigUpdated,
    ConfigDeleted,
    CommunicationSent,
}

impl AuditEventType {
    /// Event type for `action` on a record of `kind`, or `None` when it is not audited.
    ///
    /// Configuration reads and communication CRUD are not audited; sends are recorded
    /// separately as [`AuditEventType::CommunicationSent`].
    pub fn for_action(kind: RecordKind, action: AuditAction) -> Option<Self> {
        use AuditAction::*;
        use AuditEventType::*;
        match (kind, action) {
            (RecordKind::Phi, Created) => Some(PhiCreated),
            (RecordKind::Phi, Accessed) => Some(PhiAccessed),
            (RecordKind::Phi, Updated) => Some(PhiUpdated),
            (RecordKind::Phi, Deleted) => Some(PhiDeleted),
            (RecordKind::Pii, Created) => Some(PiiCreated),
            (RecordKind::Pii, Accessed) => Some(PiiAccessed),
            (RecordKind::Pii, Updated) => Some(PiiUpdated),
            (RecordKind::Pii, Deleted) => Some(PiiDeleted),
            (RecordKind::Config, Created) => Some(ConfigCreated),
            (RecordKind::Config, Updated) => Some(ConfigUpdated),
            (RecordKind::Config, Deleted) => Some(ConfigDeleted),
            (RecordKind::Config, Accessed) | (RecordKind::Communication, _) => None,
        }
    }
}

/// A single audit trail entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: String,
    pub event_type: AuditEventType,
    pub actor: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    /// `<collection>/<id>` of the affected record.
    pub resource: String,
    pub description: String,
    pub created_at: String,
}

impl AuditEvent {
    pub fn new(
        event_type: AuditEventType,
        actor: &Actor,
        patient_id: Option<&str>,
        resource: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::new().to_string(),
            event_type,
            actor: actor.user_id().to_string(),
            patient_id: patient_id.filter(|p| !p.is_empty()).map(str::to_string),
            resource: resource.into(),
            description: description.into(),
            created_at: now_rfc3339(),
        }
    }
}

/// Sink for audit events.
#[cfg_attr(test, automock)]
pub trait AuditService: Send + Sync {
    fn record(&self, event: AuditEvent) -> CoreResult<()>;

    /// Events concerning `patient_id`, oldest first.
    fn events_for_patient(&self, patient_id: &str) -> CoreResult<Vec<AuditEvent>>;
}

/// Persists audit events in the document store.
pub struct StoreAuditService {
    store: Arc<dyn DocumentStore>,
}

impl StoreAuditService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

impl AuditService for StoreAuditService {
    fn record(&self, event: AuditEvent) -> CoreResult<()> {
        tracing::info!(
            target: "cdx::audit",
            event_type = ?event.event_type,
            actor = %event.actor,
            patient_id = event.patient_id.as_deref().unwrap_or(""),
            resource = %event.resource,
            "{}",
            event.description
        );
        let doc = serde_json::to_value(&event)?;
        self.store.insert(AUDIT_EVENTS, &event.id, &doc)
    }

    fn events_for_patient(&self, patient_id: &str) -> CoreResult<Vec<AuditEvent>> {
        let mut events = Vec::new();
        for doc in self.store.list(AUDIT_EVENTS)? {
            let event: AuditEvent = serde_json::from_value(doc)?;
            if event.patient_id.as_deref() == Some(patient_id) {
                events.push(event);
            }
        }
        events.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileDocumentStore, MemoryDocumentStore};
    use tempfile::TempDir;

    #[test]
    fn test_config_reads_are_not_audited() {
        assert_eq!(
            AuditEventType::for_action(RecordKind::Config, AuditAction::Accessed),
            None
        );
        assert_eq!(
            AuditEventType::for_action(RecordKind::Phi, AuditAction::Accessed),
            Some(AuditEventType::PhiAccessed)
        );
        assert_eq!(
            AuditEventType::for_action(RecordKind::Communication, AuditAction::Created),
            None
        );
    }

    #[test]
    fn test_events_for_patient_filters_and_orders() {
        let audit = StoreAuditService::new(Arc::new(MemoryDocumentStore::new()));
        let actor = Actor::new("nurse");

        let mut first = AuditEvent::new(
            AuditEventType::PhiCreated,
            &actor,
            Some("p1"),
            "allergies/1",
            "created",
        );
        first.created_at = "2024-01-01T00:00:00.000000Z".into();
        let mut second = AuditEvent::new(
            AuditEventType::PhiAccessed,
            &actor,
            Some("p1"),
            "allergies/1",
            "read",
        );
        second.created_at = "2024-01-02T00:00:00.000000Z".into();

        audit.record(second.clone()).unwrap();
        audit.record(first.clone()).unwrap();
        audit
            .record(AuditEvent::new(
                AuditEventType::PhiCreated,
                &actor,
                Some("p2"),
                "allergies/2",
                "other patient",
            ))
            .unwrap();

        let events = audit.events_for_patient("p1").unwrap();
        assert_eq!(events, vec![first, second]);
    }

    #[test]
    fn test_events_survive_in_file_store() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(FileDocumentStore::open(temp_dir.path()).unwrap());
        let audit = StoreAuditService::new(store.clone());

        audit
            .record(AuditEvent::new(
                AuditEventType::PiiUpdated,
                &Actor::system(),
                Some("p9"),
                "profiles/p9",
                "updated profile",
            ))
            .unwrap();

        let reopened = StoreAuditService::new(store);
        let events = reopened.events_for_patient("p9").unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].actor, "system");
        assert_eq!(events[0].event_type, AuditEventType::PiiUpdated);
    }

    #[test]
    fn test_blank_patient_id_is_dropped() {
        let event = AuditEvent::new(
            AuditEventType::ConfigCreated,
            &Actor::system(),
            Some(""),
            "email_templates/1",
            "created",
        );
        assert_eq!(event.patient_id, None);
    }
}
