//! Domain services.
//!
//! Plain record types get a [`RecordService`] directly; types with extra operations wrap one.

mod cdc;
mod medical_record;
mod medication;
mod notification;
mod profile;
mod provider;
mod record_service;

pub use cdc::CdcMessageService;
pub use medical_record::MedicalRecordService;
pub use medication::MedicationService;
pub use notification::NotificationService;
pub use profile::ProfileService;
pub use provider::ProviderService;
pub use record_service::RecordService;
