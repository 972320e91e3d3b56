//! Medications, including ending a course and catalog search.

use super::RecordService;
use crate::actor::Actor;
use crate::audit::AuditService;
use crate::external::DrugCatalog;
use crate::repository::{ListQuery, Page};
use crate::store::DocumentStore;
use crate::{CoreError, CoreResult};
use api_shared::pb;
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct MedicationService {
    records: RecordService<pb::Medication>,
    catalog: Arc<dyn DrugCatalog>,
}

impl MedicationService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        audit: Arc<dyn AuditService>,
        catalog: Arc<dyn DrugCatalog>,
    ) -> Self {
        Self {
            records: RecordService::new(store, audit),
            catalog,
        }
    }

    pub fn create(&self, actor: &Actor, medication: pb::Medication) -> CoreResult<pb::Medication> {
        self.records.create(actor, medication)
    }

    pub fn get(&self, actor: &Actor, id: &str) -> CoreResult<pb::Medication> {
        self.records.get(actor, id)
    }

    pub fn update(&self, actor: &Actor, medication: pb::Medication) -> CoreResult<pb::Medication> {
        self.records.update(actor, medication)
    }

    pub fn delete(&self, actor: &Actor, id: &str) -> CoreResult<pb::DeleteRes> {
        self.records.delete(actor, id)
    }

    pub fn list(&self, query: &ListQuery) -> CoreResult<Page<pb::Medication>> {
        self.records.list(query)
    }

    /// Marks a medication inactive as of `end_date` (today when blank).
    pub fn end_medication(
        &self,
        actor: &Actor,
        id: &str,
        end_date: &str,
    ) -> CoreResult<pb::Medication> {
        let mut medication = self.records.find(id)?;
        medication.end_date = match end_date.trim() {
            "" => Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            given => given.to_string(),
        };
        medication.active = false;
        self.records.update(actor, medication)
    }

    /// Suggests medications matching a brand name. Results are not stored.
    pub async fn search(&self, brand_name: &str) -> CoreResult<Vec<pb::Medication>> {
        let brand_name = brand_name.trim();
        if brand_name.is_empty() {
            return Err(CoreError::NotAcceptable("brand_name is required".into()));
        }
        self.catalog.search(brand_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::StoreAuditService;
    use crate::constants::PROFILES;
    use crate::external::MockDrugCatalog;
    use crate::store::MemoryDocumentStore;
    use serde_json::json;

    const PATIENT: &str = "0123456789abcdef0123456789abcdef";

    fn service(catalog: MockDrugCatalog) -> MedicationService {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        store
            .insert(PROFILES, PATIENT, &json!({"id": PATIENT, "national_health_id": "NH-1"}))
            .unwrap();
        let audit = Arc::new(StoreAuditService::new(store.clone()));
        MedicationService::new(store, audit, Arc::new(catalog))
    }

    fn ibuprofen() -> pb::Medication {
        pb::Medication {
            patient_id: PATIENT.into(),
            medication_name: "Ibuprofen".into(),
            start_date: "2024-03-01".into(),
            active: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_end_medication_sets_date_and_inactive() {
        let svc = service(MockDrugCatalog::new());
        let med = svc.create(&Actor::system(), ibuprofen()).unwrap();

        let ended = svc
            .end_medication(&Actor::system(), &med.id, "2024-03-15")
            .unwrap();
        assert_eq!(ended.end_date, "2024-03-15");
        assert!(!ended.active);
    }

    #[test]
    fn test_end_medication_rejects_end_before_start() {
        let svc = service(MockDrugCatalog::new());
        let med = svc.create(&Actor::system(), ibuprofen()).unwrap();

        let err = svc
            .end_medication(&Actor::system(), &med.id, "2024-02-01")
            .unwrap_err();
        assert!(matches!(err, CoreError::NotAcceptable(_)));
        assert!(svc.get(&Actor::system(), &med.id).unwrap().active);
    }

    #[test]
    fn test_end_unknown_medication_is_not_found() {
        let svc = service(MockDrugCatalog::new());
        assert!(matches!(
            svc.end_medication(&Actor::system(), "nope", ""),
            Err(CoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_search_trims_and_delegates() {
        let mut catalog = MockDrugCatalog::new();
        catalog
            .expect_search()
            .withf(|brand: &str| brand == "Advil")
            .times(1)
            .returning(|_| {
                Ok(vec![pb::Medication {
                    medication_name: "Advil".into(),
                    ..Default::default()
                }])
            });
        let svc = service(catalog);

        let results = svc.search("  Advil ").await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(matches!(svc.search(" ").await, Err(CoreError::NotAcceptable(_))));
    }
}
