//! # CDX Core
//!
//! Business logic for the CDX health data platform:
//! - Document storage (file or in-memory) and typed repositories
//! - Record validation, reference checks and delete guards
//! - PHI/PII audit trail
//! - Notification dispatch, medical record export/import, CDC reporting
//! - Outbound lookups against the NPI registry and OpenFDA
//!
//! **No API concerns**: authentication and transport live in `api-grpc`, `api-rest` and
//! `api-shared`. Configuration is resolved by the binaries and handed in as [`CoreConfig`].

pub mod actor;
pub mod audit;
pub mod config;
pub mod constants;
pub mod error;
pub mod external;
pub mod http;
pub mod lists;
pub mod record;
pub mod records;
pub mod repository;
pub mod senders;
pub mod services;
pub mod store;
pub mod templates;
pub mod validation;

pub use api_shared::pb;

pub use actor::Actor;
pub use audit::{AuditEvent, AuditEventType, AuditService, StoreAuditService};
pub use config::{core_config_from_lookup, CdcConfig, CoreConfig, StorageBackend};
pub use error::{CoreError, CoreResult};
pub use record::{Record, RecordKind};
pub use repository::{ListQuery, Page, Repository};
pub use store::{open_store, DocumentStore, FileDocumentStore, MemoryDocumentStore};

use external::{DrugCatalog, HttpNpiRegistry, NpiRegistry, OpenFdaCatalog};
use senders::{EmailSender, LoggingEmailSender, LoggingSmsSender, SmsSender};
use services::{
    CdcMessageService, MedicalRecordService, MedicationService, NotificationService,
    ProfileService, ProviderService, RecordService,
};
use std::sync::Arc;

/// Everything that talks to the outside world.
#[derive(Clone)]
pub struct Integrations {
    pub npi_registry: Arc<dyn NpiRegistry>,
    pub drug_catalog: Arc<dyn DrugCatalog>,
    pub email_sender: Arc<dyn EmailSender>,
    pub sms_sender: Arc<dyn SmsSender>,
    pub cdc: CdcMessageService,
}

impl Integrations {
    /// HTTP-backed registries and the logging message senders.
    pub fn from_config(cfg: &CoreConfig) -> CoreResult<Self> {
        let client = http::build_http_client(cfg.http_timeout())?;
        Ok(Self {
            npi_registry: Arc::new(HttpNpiRegistry::new(client.clone(), cfg.npi_registry_url())),
            drug_catalog: Arc::new(OpenFdaCatalog::new(client.clone(), cfg.openfda_url())),
            email_sender: Arc::new(LoggingEmailSender),
            sms_sender: Arc::new(LoggingSmsSender),
            cdc: CdcMessageService::new(client, cfg.cdc().clone()),
        })
    }
}

/// Every core service, wired over one store and one audit trail.
#[derive(Clone)]
pub struct CdxServices {
    pub audit: Arc<dyn AuditService>,
    pub profiles: ProfileService,
    pub providers: ProviderService,
    pub allergies: RecordService<pb::Allergy>,
    pub blood_pressures: RecordService<pb::BloodPressure>,
    pub heart_rates: RecordService<pb::HeartRate>,
    pub heights: RecordService<pb::HeightMeasurement>,
    pub weights: RecordService<pb::WeightMeasurement>,
    pub doctor_notes: RecordService<pb::DoctorNotes>,
    pub diagnoses: RecordService<pb::Diagnosis>,
    pub medical_histories: RecordService<pb::MedicalHistory>,
    pub medications: MedicationService,
    pub administrations: RecordService<pb::MedicationAdministration>,
    pub vaccines: RecordService<pb::Vaccine>,
    pub connected_labs: RecordService<pb::ConnectedLab>,
    pub analysis_engines: RecordService<pb::AnalysisEngine>,
    pub medical_records: MedicalRecordService,
    pub email_templates: RecordService<pb::EmailTemplate>,
    pub sms_templates: RecordService<pb::SmsTemplate>,
    pub notification_events: RecordService<pb::NotificationEvent>,
    pub notifications: NotificationService,
    pub cdc: CdcMessageService,
}

impl CdxServices {
    pub fn new(store: Arc<dyn DocumentStore>, integrations: Integrations) -> Self {
        let audit: Arc<dyn AuditService> = Arc::new(StoreAuditService::new(Arc::clone(&store)));
        let record = || RecordServiceFactory {
            store: Arc::clone(&store),
            audit: Arc::clone(&audit),
        };

        Self {
            profiles: ProfileService::new(Arc::clone(&store), Arc::clone(&audit)),
            providers: ProviderService::new(
                Arc::clone(&store),
                Arc::clone(&audit),
                integrations.npi_registry,
            ),
            allergies: record().build(),
            blood_pressures: record().build(),
            heart_rates: record().build(),
            heights: record().build(),
            weights: record().build(),
            doctor_notes: record().build(),
            diagnoses: record().build(),
            medical_histories: record().build(),
            medications: MedicationService::new(
                Arc::clone(&store),
                Arc::clone(&audit),
                integrations.drug_catalog,
            ),
            administrations: record().build(),
            vaccines: record().build(),
            connected_labs: record().build(),
            analysis_engines: record().build(),
            medical_records: MedicalRecordService::new(Arc::clone(&store), Arc::clone(&audit)),
            email_templates: record().build(),
            sms_templates: record().build(),
            notification_events: record().build(),
            notifications: NotificationService::new(
                Arc::clone(&store),
                Arc::clone(&audit),
                integrations.email_sender,
                integrations.sms_sender,
            ),
            cdc: integrations.cdc,
            audit,
        }
    }

    /// Opens the configured store and wires the default integrations.
    pub fn open(cfg: &CoreConfig) -> CoreResult<Self> {
        let store = open_store(cfg)?;
        tracing::info!(
            storage = ?cfg.storage(),
            data_dir = %cfg.data_dir().display(),
            "document store opened"
        );
        Ok(Self::new(store, Integrations::from_config(cfg)?))
    }
}

struct RecordServiceFactory {
    store: Arc<dyn DocumentStore>,
    audit: Arc<dyn AuditService>,
}

impl RecordServiceFactory {
    fn build<T: Record>(self) -> RecordService<T> {
        RecordService::new(self.store, self.audit)
    }
}
