//! Routes that do more than plain CRUD.

use crate::context::CurrentActor;
use crate::crud::ListParams;
use crate::{ApiError, AppState};
use api_shared::{pb, HealthService};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cdx_core::{ListQuery, Page};
use serde::Deserialize;
use utoipa::IntoParams;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = pb::HealthRes)
    )
)]
/// Liveness check; never touches storage.
pub(crate) async fn health() -> Json<pb::HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/profiles/nhid/{nhid}",
    params(("nhid" = String, Path, description = "National health id")),
    responses(
        (status = 200, description = "Profile found", body = pb::Profile),
        (status = 404, description = "No profile with that national health id")
    )
)]
pub(crate) async fn get_profile_by_nhid(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(nhid): Path<String>,
) -> Result<Json<pb::Profile>, ApiError> {
    Ok(Json(state.services.profiles.get_by_nhid(&actor, &nhid)?))
}

#[utoipa::path(
    post,
    path = "/api/providers/npi/{npi}",
    params(("npi" = String, Path, description = "10-digit NPI number")),
    responses(
        (status = 200, description = "Provider loaded from the NPI registry", body = pb::Provider),
        (status = 400, description = "Malformed NPI number"),
        (status = 404, description = "NPI number not in the registry"),
        (status = 502, description = "Registry unavailable")
    )
)]
/// Imports (or refreshes) a provider from the public NPI registry.
pub(crate) async fn load_provider(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(npi): Path<String>,
) -> Result<Json<pb::Provider>, ApiError> {
    Ok(Json(state.services.providers.load_provider(&actor, &npi).await?))
}

#[utoipa::path(
    post,
    path = "/api/medications/{id}/end",
    params(("id" = String, Path, description = "Medication id")),
    request_body = pb::EndMedicationReq,
    responses(
        (status = 200, description = "Medication ended", body = pb::Medication),
        (status = 404, description = "Medication not found")
    )
)]
/// Ends a medication; a missing or blank `end_date` means today.
pub(crate) async fn end_medication(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    body: Option<Json<pb::EndMedicationReq>>,
) -> Result<Json<pb::Medication>, ApiError> {
    let end_date = body.map(|Json(req)| req.end_date).unwrap_or_default();
    Ok(Json(
        state
            .services
            .medications
            .end_medication(&actor, &id, &end_date)?,
    ))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Brand name to look up in the drug catalog.
    pub brand_name: String,
}

#[utoipa::path(
    get,
    path = "/api/medications/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching catalog products", body = pb::MedicationList),
        (status = 502, description = "Drug catalog unavailable")
    )
)]
pub(crate) async fn search_medications(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<pb::MedicationList>, ApiError> {
    let found = state.services.medications.search(&params.brand_name).await?;
    Ok(Json(Page::unpaged(found).into()))
}

#[utoipa::path(
    post,
    path = "/api/medical-records/export/{patient_id}",
    params(("patient_id" = String, Path, description = "Profile id of the patient")),
    responses(
        (status = 200, description = "Export finished", body = pb::MedicalRecord),
        (status = 404, description = "Patient not found")
    )
)]
pub(crate) async fn export_medical_record(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(patient_id): Path<String>,
) -> Result<Json<pb::MedicalRecord>, ApiError> {
    Ok(Json(
        state
            .services
            .medical_records
            .request_export(&actor, &patient_id)?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/medical-records/import",
    request_body = pb::MedicalRecord,
    responses(
        (status = 201, description = "Record imported", body = pb::MedicalRecord),
        (status = 400, description = "Record has no patient profile")
    )
)]
pub(crate) async fn import_medical_record(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(record): Json<pb::MedicalRecord>,
) -> Result<(StatusCode, Json<pb::MedicalRecord>), ApiError> {
    let imported = state
        .services
        .medical_records
        .request_import(&actor, record)?;
    Ok((StatusCode::CREATED, Json(imported)))
}

#[utoipa::path(
    get,
    path = "/api/medical-records/{id}",
    params(("id" = String, Path, description = "Medical record id")),
    responses(
        (status = 200, description = "Medical record", body = pb::MedicalRecord),
        (status = 404, description = "Medical record not found")
    )
)]
pub(crate) async fn get_medical_record(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<Json<pb::MedicalRecord>, ApiError> {
    Ok(Json(state.services.medical_records.get(&actor, &id)?))
}

#[utoipa::path(
    get,
    path = "/api/medical-records/{id}/status",
    params(("id" = String, Path, description = "Medical record id")),
    responses(
        (status = 200, description = "Export or import status", body = pb::MedicalRecordStatusRes),
        (status = 404, description = "Medical record not found")
    )
)]
pub(crate) async fn get_medical_record_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<pb::MedicalRecordStatusRes>, ApiError> {
    Ok(Json(state.services.medical_records.status(&id)?))
}

#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = pb::Notification,
    responses(
        (status = 201, description = "Notification queued (and sent when immediate)", body = pb::Notification),
        (status = 404, description = "Notification event not found"),
        (status = 412, description = "Template variables missing")
    )
)]
pub(crate) async fn send_notification(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(notification): Json<pb::Notification>,
) -> Result<(StatusCode, Json<pb::Notification>), ApiError> {
    let stored = state.services.notifications.send(&actor, notification).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub(crate) async fn get_notification(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<Json<pb::Notification>, ApiError> {
    Ok(Json(state.services.notifications.get(&actor, &id)?))
}

pub(crate) async fn list_notifications(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<pb::NotificationList>, ApiError> {
    let page = state
        .services
        .notifications
        .list(&ListQuery::from(params))?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    post,
    path = "/api/notifications/process",
    request_body = pb::ProcessNotificationsReq,
    responses(
        (status = 200, description = "Pending notifications processed", body = pb::ProcessNotificationsRes),
        (status = 400, description = "Unknown priority")
    )
)]
/// Runs one dispatch pass. An absent body processes every priority.
pub(crate) async fn process_notifications(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    body: Option<Json<pb::ProcessNotificationsReq>>,
) -> Result<Json<pb::ProcessNotificationsRes>, ApiError> {
    let raw = body.map(|Json(req)| req.priority).unwrap_or_default();
    let priority = pb::NotificationPriority::try_from(raw)
        .map_err(|_| ApiError::BadRequest(format!("unknown priority {raw}")))?;
    Ok(Json(
        state
            .services
            .notifications
            .process_pending(&actor, priority)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/cdc",
    request_body = pb::CdcMessageReq,
    responses(
        (status = 200, description = "Message accepted by the CDC endpoint", body = pb::CdcMessageRes),
        (status = 400, description = "Empty message"),
        (status = 502, description = "CDC endpoint rejected the message")
    )
)]
pub(crate) async fn send_cdc_message(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(req): Json<pb::CdcMessageReq>,
) -> Result<Json<pb::CdcMessageRes>, ApiError> {
    Ok(Json(state.services.cdc.send(&actor, &req.message).await?))
}
