//! Patient profiles.

use super::RecordService;
use crate::actor::Actor;
use crate::audit::{AuditAction, AuditService};
use crate::repository::{ListQuery, Page};
use crate::store::DocumentStore;
use crate::{CoreError, CoreResult};
use api_shared::pb;
use std::sync::Arc;

/// Profile CRUD with national health id uniqueness.
///
/// Deletion is refused while any patient-scoped record still names the profile.
#[derive(Clone)]
pub struct ProfileService {
    records: RecordService<pb::Profile>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>, audit: Arc<dyn AuditService>) -> Self {
        Self {
            records: RecordService::new(store, audit),
        }
    }

    pub fn create(&self, actor: &Actor, mut profile: pb::Profile) -> CoreResult<pb::Profile> {
        normalize_nhid(&mut profile);
        self.ensure_unique_nhid(&profile.national_health_id, None)?;
        self.records.create(actor, profile)
    }

    pub fn get(&self, actor: &Actor, id: &str) -> CoreResult<pb::Profile> {
        self.records.get(actor, id)
    }

    pub fn get_by_nhid(&self, actor: &Actor, nhid: &str) -> CoreResult<pb::Profile> {
        let profile = self.find_by_nhid(nhid)?.ok_or_else(|| {
            CoreError::NotFound(format!("profile with national health id {nhid} not found"))
        })?;
        self.records.audit_action(actor, &profile, AuditAction::Accessed)?;
        Ok(profile)
    }

    /// Looks up a profile by national health id without auditing.
    pub fn find_by_nhid(&self, nhid: &str) -> CoreResult<Option<pb::Profile>> {
        let nhid = nhid.trim();
        if nhid.is_empty() {
            return Ok(None);
        }
        Ok(self
            .records
            .repository()
            .find_where("national_health_id", nhid)?
            .into_iter()
            .next())
    }

    pub fn update(&self, actor: &Actor, mut profile: pb::Profile) -> CoreResult<pb::Profile> {
        normalize_nhid(&mut profile);
        self.ensure_unique_nhid(&profile.national_health_id, Some(&profile.id))?;
        self.records.update(actor, profile)
    }

    pub fn delete(&self, actor: &Actor, id: &str) -> CoreResult<pb::DeleteRes> {
        self.records.delete(actor, id)
    }

    pub fn list(&self, query: &ListQuery) -> CoreResult<Page<pb::Profile>> {
        self.records.list(query)
    }

    pub fn find(&self, id: &str) -> CoreResult<pb::Profile> {
        self.records.find(id)
    }

    fn ensure_unique_nhid(&self, nhid: &str, own_id: Option<&str>) -> CoreResult<()> {
        if let Some(existing) = self.find_by_nhid(nhid)? {
            if Some(existing.id.as_str()) != own_id {
                return Err(CoreError::AlreadyExists(format!(
                    "a profile with national health id {} already exists",
                    nhid.trim()
                )));
            }
        }
        Ok(())
    }
}

/// National health ids are stored trimmed so lookups and uniqueness agree.
fn normalize_nhid(profile: &mut pb::Profile) {
    profile.national_health_id = profile.national_health_id.trim().to_string();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::StoreAuditService;
    use crate::services::RecordService;
    use crate::store::MemoryDocumentStore;

    fn setup() -> (Arc<dyn DocumentStore>, Arc<dyn AuditService>, ProfileService) {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let audit: Arc<dyn AuditService> = Arc::new(StoreAuditService::new(store.clone()));
        let svc = ProfileService::new(store.clone(), audit.clone());
        (store, audit, svc)
    }

    fn jane(nhid: &str) -> pb::Profile {
        pb::Profile {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            national_health_id: nhid.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_nhid_must_be_unique() {
        let (_store, _audit, svc) = setup();
        let first = svc.create(&Actor::system(), jane("NH-1")).unwrap();

        let err = svc.create(&Actor::system(), jane("NH-1")).unwrap_err();
        assert!(matches!(err, CoreError::AlreadyExists(_)));

        let second = svc.create(&Actor::system(), jane("NH-2")).unwrap();
        let mut clash = second.clone();
        clash.national_health_id = "NH-1".into();
        assert!(matches!(
            svc.update(&Actor::system(), clash),
            Err(CoreError::AlreadyExists(_))
        ));

        let mut same = first.clone();
        same.address = "1 Main St".into();
        assert!(svc.update(&Actor::system(), same).is_ok());
    }

    #[test]
    fn test_nhid_is_stored_trimmed() {
        let (store, audit, svc) = setup();
        let first = svc.create(&Actor::system(), jane(" NH-1 ")).unwrap();
        assert_eq!(first.national_health_id, "NH-1");
        assert_eq!(svc.find(&first.id).unwrap().national_health_id, "NH-1");

        assert!(matches!(
            svc.create(&Actor::system(), jane("NH-1")),
            Err(CoreError::AlreadyExists(_))
        ));

        let mut renamed = first.clone();
        renamed.national_health_id = "NH-2\t".into();
        assert_eq!(svc.update(&Actor::system(), renamed).unwrap().national_health_id, "NH-2");

        let allergy = RecordService::<pb::Allergy>::new(store, audit)
            .create(
                &Actor::system(),
                pb::Allergy {
                    patient_id: first.id.clone(),
                    national_health_id: " NH-2 ".into(),
                    allergen: "latex".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(allergy.national_health_id, "NH-2");
    }

    #[test]
    fn test_get_by_nhid_audits_pii_access() {
        let (_store, audit, svc) = setup();
        let created = svc.create(&Actor::new("clerk"), jane("NH-9")).unwrap();

        let found = svc.get_by_nhid(&Actor::new("clerk"), "NH-9").unwrap();
        assert_eq!(found.id, created.id);
        assert!(matches!(
            svc.get_by_nhid(&Actor::system(), "NH-404"),
            Err(CoreError::NotFound(_))
        ));

        let events = audit.events_for_patient(&created.id).unwrap();
        let types: Vec<_> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![
                crate::audit::AuditEventType::PiiCreated,
                crate::audit::AuditEventType::PiiAccessed
            ]
        );
    }

    #[test]
    fn test_delete_blocked_while_records_reference_profile() {
        let (store, audit, svc) = setup();
        let profile = svc.create(&Actor::system(), jane("NH-3")).unwrap();

        let vaccines = RecordService::<pb::Vaccine>::new(store, audit);
        let vaccine = vaccines
            .create(
                &Actor::system(),
                pb::Vaccine {
                    patient_id: profile.id.clone(),
                    vaccine_name: "MMR".into(),
                    dose_number: 1,
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(matches!(
            svc.delete(&Actor::system(), &profile.id),
            Err(CoreError::FailedPrecondition(_))
        ));

        vaccines.delete(&Actor::system(), &vaccine.id).unwrap();
        assert!(svc.delete(&Actor::system(), &profile.id).unwrap().success);
    }
}
