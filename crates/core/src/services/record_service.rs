//! Generic create/read/update/delete/list for any [`Record`].

use crate::actor::Actor;
use crate::audit::{AuditAction, AuditEvent, AuditEventType, AuditService};
use crate::record::{now_rfc3339, Record};
use crate::repository::{count_documents_where, ListQuery, Page, Repository};
use crate::store::DocumentStore;
use crate::{CoreError, CoreResult};
use api_shared::pb;
use cdx_uuid::RecordId;
use std::sync::Arc;

/// CRUD operations with integrity checks and auditing.
///
/// - Patient-scoped records must name an existing profile; a blank national health id is
///   copied from it and a differing one is rejected.
/// - Every [`Record::references`] target must exist.
/// - Deletes are refused while any [`Record::dependents`] document points at the record.
pub struct RecordService<T> {
    repo: Repository<T>,
    profiles: Repository<pb::Profile>,
    audit: Arc<dyn AuditService>,
}

impl<T> Clone for RecordService<T> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            profiles: self.profiles.clone(),
            audit: Arc::clone(&self.audit),
        }
    }
}

impl<T: Record> RecordService<T> {
    pub fn new(store: Arc<dyn DocumentStore>, audit: Arc<dyn AuditService>) -> Self {
        Self {
            repo: Repository::new(Arc::clone(&store)),
            profiles: Repository::new(store),
            audit,
        }
    }

    pub fn repository(&self) -> &Repository<T> {
        &self.repo
    }

    /// Validates and stores a new record under a freshly generated id.
    pub fn create(&self, actor: &Actor, mut record: T) -> CoreResult<T> {
        record.validate()?;
        self.check_patient(&mut record)?;
        self.check_references(&record)?;

        record.set_id(RecordId::new().to_string());
        let now = now_rfc3339();
        record.set_created(now.clone(), actor.user_id().to_string());
        record.set_modified(now, actor.user_id().to_string());

        self.repo.insert(&record)?;
        tracing::debug!(collection = T::COLLECTION, id = record.id(), "record created");
        self.audit_action(actor, &record, AuditAction::Created)?;
        Ok(record)
    }

    pub fn get(&self, actor: &Actor, id: &str) -> CoreResult<T> {
        let record = self.find(id)?;
        self.audit_action(actor, &record, AuditAction::Accessed)?;
        Ok(record)
    }

    /// Replaces an existing record wholesale, keeping its creation stamp.
    pub fn update(&self, actor: &Actor, mut record: T) -> CoreResult<T> {
        if record.id().trim().is_empty() {
            return Err(CoreError::NotAcceptable("id is required".into()));
        }
        let existing = self.find(record.id())?;

        record.validate()?;
        self.check_patient(&mut record)?;
        self.check_references(&record)?;

        record.set_created(existing.created_at().to_string(), existing.creator().to_string());
        record.set_modified(now_rfc3339(), actor.user_id().to_string());

        self.repo.replace(&record)?;
        tracing::debug!(collection = T::COLLECTION, id = record.id(), "record updated");
        self.audit_action(actor, &record, AuditAction::Updated)?;
        Ok(record)
    }

    pub fn delete(&self, actor: &Actor, id: &str) -> CoreResult<pb::DeleteRes> {
        let existing = self.find(id)?;
        self.check_dependents(id)?;

        self.repo.delete(id)?;
        tracing::debug!(collection = T::COLLECTION, id, "record deleted");
        self.audit_action(actor, &existing, AuditAction::Deleted)?;

        Ok(pb::DeleteRes {
            success: true,
            message: format!("{} {id} deleted", T::LABEL),
        })
    }

    pub fn list(&self, query: &ListQuery) -> CoreResult<Page<T>> {
        self.repo.find_all(query)
    }

    /// Loads a record without auditing.
    pub fn find(&self, id: &str) -> CoreResult<T> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| CoreError::NotFound(format!("{} {id} not found", T::LABEL)))
    }

    /// Records the audit event for `action` on `record`, if its kind is audited.
    pub fn audit_action(&self, actor: &Actor, record: &T, action: AuditAction) -> CoreResult<()> {
        let Some(event_type) = AuditEventType::for_action(T::KIND, action) else {
            return Ok(());
        };
        let verb = match action {
            AuditAction::Created => "created",
            AuditAction::Accessed => "accessed",
            AuditAction::Updated => "updated",
            AuditAction::Deleted => "deleted",
        };
        self.audit.record(AuditEvent::new(
            event_type,
            actor,
            record.subject_id(),
            format!("{}/{}", T::COLLECTION, record.id()),
            format!("{} {verb}", T::LABEL),
        ))
    }

    fn check_patient(&self, record: &mut T) -> CoreResult<()> {
        let Some(patient_id) = record.patient_id().map(|p| p.trim().to_string()) else {
            return Ok(());
        };
        if patient_id.is_empty() {
            return Err(CoreError::NotAcceptable("patient_id is required".into()));
        }

        let profile = self
            .profiles
            .find_by_id(&patient_id)?
            .ok_or_else(|| CoreError::NotFound(format!("profile {patient_id} not found")))?;

        let nhid = record
            .national_health_id()
            .map(|n| n.trim().to_string())
            .unwrap_or_default();
        if !nhid.is_empty() && nhid != profile.national_health_id {
            return Err(CoreError::NotAcceptable(format!(
                "national_health_id does not match profile {patient_id}"
            )));
        }
        record.set_national_health_id(profile.national_health_id);
        Ok(())
    }

    fn check_references(&self, record: &T) -> CoreResult<()> {
        for reference in record.references() {
            if self
                .repo
                .store()
                .get(reference.collection, &reference.id)?
                .is_none()
            {
                return Err(CoreError::NotFound(format!(
                    "{} {} referenced by {} not found",
                    reference.collection, reference.id, reference.field
                )));
            }
        }
        Ok(())
    }

    fn check_dependents(&self, id: &str) -> CoreResult<()> {
        for dependent in T::dependents() {
            let count = count_documents_where(
                self.repo.store().as_ref(),
                dependent.collection,
                dependent.field,
                id,
            )?;
            if count > 0 {
                return Err(CoreError::FailedPrecondition(format!(
                    "{} {id} is still referenced by {count} {} record(s)",
                    T::LABEL,
                    dependent.collection
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MockAuditService;
    use crate::constants::PROFILES;
    use crate::store::MemoryDocumentStore;
    use mockall::predicate::function;
    use serde_json::json;

    const PATIENT: &str = "0123456789abcdef0123456789abcdef";

    fn store_with_patient() -> Arc<dyn DocumentStore> {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        store
            .insert(
                PROFILES,
                PATIENT,
                &json!({"id": PATIENT, "national_health_id": "NH-1", "first_name": "Jane", "last_name": "Doe"}),
            )
            .unwrap();
        store
    }

    fn quiet_audit() -> Arc<dyn AuditService> {
        let mut audit = MockAuditService::new();
        audit.expect_record().returning(|_| Ok(()));
        Arc::new(audit)
    }

    fn allergy() -> pb::Allergy {
        pb::Allergy {
            id: "client-chosen".into(),
            patient_id: PATIENT.into(),
            allergen: "peanut".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_assigns_id_stamps_and_fills_nhid() {
        let svc = RecordService::<pb::Allergy>::new(store_with_patient(), quiet_audit());
        let created = svc.create(&Actor::new("nurse"), allergy()).unwrap();

        assert!(RecordId::is_canonical(&created.id));
        assert_ne!(created.id, "client-chosen");
        assert_eq!(created.national_health_id, "NH-1");
        assert_eq!(created.creator, "nurse");
        assert_eq!(created.created_at, created.modified_at);
    }

    #[test]
    fn test_create_audits_phi_for_patient() {
        let mut audit = MockAuditService::new();
        audit
            .expect_record()
            .with(function(|e: &AuditEvent| {
                e.event_type == AuditEventType::PhiCreated
                    && e.patient_id.as_deref() == Some(PATIENT)
                    && e.actor == "nurse"
            }))
            .times(1)
            .returning(|_| Ok(()));

        let svc = RecordService::<pb::Allergy>::new(store_with_patient(), Arc::new(audit));
        svc.create(&Actor::new("nurse"), allergy()).unwrap();
    }

    #[test]
    fn test_create_rejects_missing_patient() {
        let svc = RecordService::<pb::Allergy>::new(store_with_patient(), quiet_audit());

        let mut no_patient = allergy();
        no_patient.patient_id.clear();
        assert!(matches!(
            svc.create(&Actor::system(), no_patient),
            Err(CoreError::NotAcceptable(_))
        ));

        let mut unknown = allergy();
        unknown.patient_id = "ffffffffffffffffffffffffffffffff".into();
        assert!(matches!(
            svc.create(&Actor::system(), unknown),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_create_rejects_mismatched_nhid() {
        let svc = RecordService::<pb::Allergy>::new(store_with_patient(), quiet_audit());
        let mut a = allergy();
        a.national_health_id = "NH-OTHER".into();
        assert!(matches!(
            svc.create(&Actor::system(), a),
            Err(CoreError::NotAcceptable(_))
        ));
    }

    #[test]
    fn test_create_checks_references() {
        let svc = RecordService::<pb::DoctorNotes>::new(store_with_patient(), quiet_audit());
        let notes = pb::DoctorNotes {
            patient_id: PATIENT.into(),
            note: "stable".into(),
            provider_id: "no-such-provider".into(),
            ..Default::default()
        };
        let err = svc.create(&Actor::system(), notes).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(msg) if msg.contains("provider_id")));
    }

    #[test]
    fn test_update_preserves_creation_stamp() {
        let svc = RecordService::<pb::Allergy>::new(store_with_patient(), quiet_audit());
        let created = svc.create(&Actor::new("nurse"), allergy()).unwrap();

        let mut changed = created.clone();
        changed.allergen = "latex".into();
        changed.created_at = "tampered".into();
        changed.creator = "tampered".into();
        let updated = svc.update(&Actor::new("doctor"), changed).unwrap();

        assert_eq!(updated.allergen, "latex");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.creator, "nurse");
        assert_eq!(updated.modifier, "doctor");
        assert_eq!(svc.find(&created.id).unwrap(), updated);
    }

    #[test]
    fn test_update_requires_existing_id() {
        let svc = RecordService::<pb::Allergy>::new(store_with_patient(), quiet_audit());

        let mut blank = allergy();
        blank.id.clear();
        let err = svc.update(&Actor::system(), blank).unwrap_err();
        assert_eq!(err.to_string(), "id is required");

        let err = svc.update(&Actor::system(), allergy()).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_delete_blocked_by_dependents() {
        let store = store_with_patient();
        let templates = RecordService::<pb::EmailTemplate>::new(store.clone(), quiet_audit());
        let events = RecordService::<pb::NotificationEvent>::new(store, quiet_audit());

        let template = templates
            .create(
                &Actor::system(),
                pb::EmailTemplate {
                    subject: "Welcome".into(),
                    content: "Hello".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        let event = events
            .create(
                &Actor::system(),
                pb::NotificationEvent {
                    event_name: "welcome".into(),
                    email_template_id: template.id.clone(),
                    ..Default::default()
                },
            )
            .unwrap();

        let err = templates.delete(&Actor::system(), &template.id).unwrap_err();
        assert!(matches!(err, CoreError::FailedPrecondition(_)));

        events.delete(&Actor::system(), &event.id).unwrap();
        let res = templates.delete(&Actor::system(), &template.id).unwrap();
        assert!(res.success);
        assert!(matches!(
            templates.get(&Actor::system(), &template.id),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_config_reads_skip_audit() {
        let mut audit = MockAuditService::new();
        audit
            .expect_record()
            .with(function(|e: &AuditEvent| e.event_type == AuditEventType::ConfigCreated))
            .times(1)
            .returning(|_| Ok(()));

        let svc = RecordService::<pb::AnalysisEngine>::new(store_with_patient(), Arc::new(audit));
        let engine = svc
            .create(
                &Actor::system(),
                pb::AnalysisEngine {
                    name: "triage".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        svc.get(&Actor::system(), &engine.id).unwrap();
    }
}
