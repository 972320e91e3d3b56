//! # API REST
//!
//! REST API implementation for CDX.
//!
//! Handles:
//! - HTTP endpoints with axum, one generic CRUD route set per record collection
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON error bodies, API key header, CORS)
//!
//! Uses `api-shared` for the generated types and `cdx-core` for every operation.

#![warn(rust_2018_idioms)]

mod context;
mod crud;
mod error;
mod handlers;

pub use context::CurrentActor;
pub use crud::ListParams;
pub use error::ApiError;

use api_shared::pb;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use cdx_core::constants::{
    ALLERGIES, ANALYSIS_ENGINES, BLOOD_PRESSURES, CONNECTED_LABS, DIAGNOSES, DOCTOR_NOTES,
    EMAIL_TEMPLATES, HEART_RATES, HEIGHT_MEASUREMENTS, MEDICAL_HISTORIES, MEDICATIONS,
    MEDICATION_ADMINISTRATIONS, NOTIFICATION_EVENTS, PROFILES, PROVIDERS, SMS_TEMPLATES,
    VACCINES, WEIGHT_MEASUREMENTS,
};
use cdx_core::CdxServices;
use crud::record_routes;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) services: Arc<CdxServices>,
    pub(crate) api_key: Option<Arc<str>>,
}

impl AppState {
    /// `api_key` of `None` leaves the `/api` routes open.
    pub fn new(services: Arc<CdxServices>, api_key: Option<String>) -> Self {
        Self {
            services,
            api_key: api_key.map(Arc::from),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::get_profile_by_nhid,
        handlers::load_provider,
        handlers::end_medication,
        handlers::search_medications,
        handlers::export_medical_record,
        handlers::import_medical_record,
        handlers::get_medical_record,
        handlers::get_medical_record_status,
        handlers::send_notification,
        handlers::process_notifications,
        handlers::send_cdc_message,
    ),
    components(schemas(
        pb::HealthRes,
        pb::Pagination,
        pb::DeleteRes,
        pb::Profile,
        pb::ProfileList,
        pb::Provider,
        pb::ProviderList,
        pb::Allergy,
        pb::AllergyList,
        pb::BloodPressure,
        pb::HeartRate,
        pb::HeightMeasurement,
        pb::WeightMeasurement,
        pb::DoctorNotes,
        pb::Diagnosis,
        pb::MedicalHistory,
        pb::Medication,
        pb::MedicationList,
        pb::EndMedicationReq,
        pb::MedicationAdministration,
        pb::Vaccine,
        pb::ConnectedLab,
        pb::AnalysisEngine,
        pb::MedicalRecord,
        pb::MedicalRecordContents,
        pb::MedicalRecordStatusRes,
        pb::EmailTemplate,
        pb::SmsTemplate,
        pb::NotificationEvent,
        pb::Notification,
        pb::NotificationList,
        pb::ProcessNotificationsReq,
        pb::ProcessNotificationsRes,
        pb::CdcMessageReq,
        pb::CdcMessageRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST application: `/health`, the `/api` routes and Swagger UI.
pub fn build_router(state: AppState) -> Router {
    let mut api = Router::new()
        .route(
            "/api/profiles/nhid/:nhid",
            get(handlers::get_profile_by_nhid),
        )
        .route("/api/providers/npi/:npi", post(handlers::load_provider))
        .route("/api/medications/search", get(handlers::search_medications))
        .route("/api/medications/:id/end", post(handlers::end_medication))
        .route(
            "/api/medical-records/export/:patient_id",
            post(handlers::export_medical_record),
        )
        .route(
            "/api/medical-records/import",
            post(handlers::import_medical_record),
        )
        .route("/api/medical-records/:id", get(handlers::get_medical_record))
        .route(
            "/api/medical-records/:id/status",
            get(handlers::get_medical_record_status),
        )
        .route(
            "/api/notifications",
            get(handlers::list_notifications).post(handlers::send_notification),
        )
        .route(
            "/api/notifications/process",
            post(handlers::process_notifications),
        )
        .route("/api/notifications/:id", get(handlers::get_notification))
        .route("/api/cdc", post(handlers::send_cdc_message));

    api = record_routes::<pb::Profile>(api, &api_path(PROFILES));
    api = record_routes::<pb::Provider>(api, &api_path(PROVIDERS));
    api = record_routes::<pb::Allergy>(api, &api_path(ALLERGIES));
    api = record_routes::<pb::BloodPressure>(api, &api_path(BLOOD_PRESSURES));
    api = record_routes::<pb::HeartRate>(api, &api_path(HEART_RATES));
    api = record_routes::<pb::HeightMeasurement>(api, &api_path(HEIGHT_MEASUREMENTS));
    api = record_routes::<pb::WeightMeasurement>(api, &api_path(WEIGHT_MEASUREMENTS));
    api = record_routes::<pb::DoctorNotes>(api, &api_path(DOCTOR_NOTES));
    api = record_routes::<pb::Diagnosis>(api, &api_path(DIAGNOSES));
    api = record_routes::<pb::MedicalHistory>(api, &api_path(MEDICAL_HISTORIES));
    api = record_routes::<pb::Medication>(api, &api_path(MEDICATIONS));
    api = record_routes::<pb::MedicationAdministration>(
        api,
        &api_path(MEDICATION_ADMINISTRATIONS),
    );
    api = record_routes::<pb::Vaccine>(api, &api_path(VACCINES));
    api = record_routes::<pb::ConnectedLab>(api, &api_path(CONNECTED_LABS));
    api = record_routes::<pb::AnalysisEngine>(api, &api_path(ANALYSIS_ENGINES));
    api = record_routes::<pb::EmailTemplate>(api, &api_path(EMAIL_TEMPLATES));
    api = record_routes::<pb::SmsTemplate>(api, &api_path(SMS_TEMPLATES));
    api = record_routes::<pb::NotificationEvent>(api, &api_path(NOTIFICATION_EVENTS));

    let api = api.route_layer(middleware::from_fn_with_state(
        state.clone(),
        context::require_api_key,
    ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_path(collection: &str) -> String {
    format!("/api/{collection}")
}
