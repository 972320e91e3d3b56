//! # API gRPC
//!
//! gRPC server implementation for CDX.
//!
//! Handles:
//! - gRPC service setup and authentication
//! - Service implementations delegating to `cdx-core`
//! - Translation of core errors into gRPC status codes
//!
//! Uses `api-shared` for the generated service traits.

#![warn(rust_2018_idioms)]

mod context;
mod crud;
mod services;
mod status;

pub use api_shared::pb;
pub use context::{actor_from_request, auth_interceptor};
pub use services::CdxGrpcService;
pub use status::to_status;

use api_shared::FILE_DESCRIPTOR_SET;
use cdx_core::CdxServices;
use pb::{
    allergy_service_server::AllergyServiceServer,
    analysis_engine_service_server::AnalysisEngineServiceServer,
    cdc_service_server::CdcServiceServer,
    connected_lab_service_server::ConnectedLabServiceServer,
    doctor_notes_service_server::DoctorNotesServiceServer,
    medical_condition_service_server::MedicalConditionServiceServer,
    medical_history_service_server::MedicalHistoryServiceServer,
    medical_record_service_server::MedicalRecordServiceServer,
    medication_administration_service_server::MedicationAdministrationServiceServer,
    medication_service_server::MedicationServiceServer,
    notification_event_service_server::NotificationEventServiceServer,
    notification_service_server::NotificationServiceServer,
    profile_service_server::ProfileServiceServer, provider_service_server::ProviderServiceServer,
    system_server::SystemServer, template_service_server::TemplateServiceServer,
    vaccine_service_server::VaccineServiceServer, vitals_service_server::VitalsServiceServer,
};
use std::sync::Arc;
use tonic::transport::server::Router;
use tonic::transport::Server;

/// Registers every CDX service on a new tonic server.
///
/// # Arguments
///
/// * `services` - Core services shared by every RPC.
/// * `api_key` - Expected `x-api-key` value; `None` disables authentication.
/// * `enable_reflection` - Also serve gRPC reflection.
///
/// # Errors
///
/// Returns an error if the reflection service cannot be built from the descriptor set.
pub fn build_router(
    services: Arc<CdxServices>,
    api_key: Option<String>,
    enable_reflection: bool,
) -> Result<Router, tonic_reflection::server::Error> {
    let svc = CdxGrpcService::new(services);
    let auth = auth_interceptor(api_key);

    let mut router = Server::builder()
        .add_service(SystemServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(ProfileServiceServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(ProviderServiceServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(AllergyServiceServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(VitalsServiceServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(DoctorNotesServiceServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(MedicalConditionServiceServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(MedicalHistoryServiceServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(MedicationServiceServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(MedicationAdministrationServiceServer::with_interceptor(
            svc.clone(),
            auth.clone(),
        ))
        .add_service(VaccineServiceServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(ConnectedLabServiceServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(AnalysisEngineServiceServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(MedicalRecordServiceServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(TemplateServiceServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(NotificationEventServiceServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(NotificationServiceServer::with_interceptor(svc.clone(), auth.clone()))
        .add_service(CdcServiceServer::with_interceptor(svc, auth));

    if enable_reflection {
        let reflection_service = tonic_reflection::server::Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()?;
        router = router.add_service(reflection_service);
        tracing::info!("gRPC server reflection enabled");
    } else {
        tracing::info!("gRPC server reflection disabled");
    }

    Ok(router)
}
