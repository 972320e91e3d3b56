//! Generic record routes: `POST /`, `GET /`, `GET /:id`, `PUT /:id`, `DELETE /:id`.

use crate::context::CurrentActor;
use crate::{ApiError, AppState};
use api_shared::pb;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use cdx_core::services::{MedicationService, ProfileService, ProviderService, RecordService};
use cdx_core::{Actor, CdxServices, CoreResult, ListQuery, Page, Record};
use serde::{Deserialize, Serialize};

/// The CRUD surface shared by every record service.
pub(crate) trait CrudService<T>: Send + Sync {
    fn create(&self, actor: &Actor, record: T) -> CoreResult<T>;
    fn get(&self, actor: &Actor, id: &str) -> CoreResult<T>;
    fn update(&self, actor: &Actor, record: T) -> CoreResult<T>;
    fn delete(&self, actor: &Actor, id: &str) -> CoreResult<pb::DeleteRes>;
    fn list(&self, query: &ListQuery) -> CoreResult<Page<T>>;
}

macro_rules! delegate_crud {
    ($service:ty, $record:ty $(, $generic:ident)?) => {
        impl$(<$generic: Record>)? CrudService<$record> for $service {
            fn create(&self, actor: &Actor, record: $record) -> CoreResult<$record> {
                <$service>::create(self, actor, record)
            }
            fn get(&self, actor: &Actor, id: &str) -> CoreResult<$record> {
                <$service>::get(self, actor, id)
            }
            fn update(&self, actor: &Actor, record: $record) -> CoreResult<$record> {
                <$service>::update(self, actor, record)
            }
            fn delete(&self, actor: &Actor, id: &str) -> CoreResult<pb::DeleteRes> {
                <$service>::delete(self, actor, id)
            }
            fn list(&self, query: &ListQuery) -> CoreResult<Page<$record>> {
                <$service>::list(self, query)
            }
        }
    };
}

delegate_crud!(RecordService<T>, T, T);
delegate_crud!(ProfileService, pb::Profile);
delegate_crud!(ProviderService, pb::Provider);
delegate_crud!(MedicationService, pb::Medication);

/// A record exposed through the generic routes.
pub(crate) trait RestRecord: Record {
    type List: From<Page<Self>> + Serialize + Send;

    fn service(services: &CdxServices) -> &dyn CrudService<Self>;
}

macro_rules! rest_record {
    ($($ty:ty => $list:ty, $field:ident;)*) => {
        $(
            impl RestRecord for $ty {
                type List = $list;

                fn service(services: &CdxServices) -> &dyn CrudService<Self> {
                    &services.$field
                }
            }
        )*
    };
}

rest_record! {
    pb::Profile => pb::ProfileList, profiles;
    pb::Provider => pb::ProviderList, providers;
    pb::Allergy => pb::AllergyList, allergies;
    pb::BloodPressure => pb::BloodPressureList, blood_pressures;
    pb::HeartRate => pb::HeartRateList, heart_rates;
    pb::HeightMeasurement => pb::HeightMeasurementList, heights;
    pb::WeightMeasurement => pb::WeightMeasurementList, weights;
    pb::DoctorNotes => pb::DoctorNotesList, doctor_notes;
    pb::Diagnosis => pb::DiagnosisList, diagnoses;
    pb::MedicalHistory => pb::MedicalHistoryList, medical_histories;
    pb::Medication => pb::MedicationList, medications;
    pb::MedicationAdministration => pb::MedicationAdministrationList, administrations;
    pb::Vaccine => pb::VaccineList, vaccines;
    pb::ConnectedLab => pb::ConnectedLabList, connected_labs;
    pb::AnalysisEngine => pb::AnalysisEngineList, analysis_engines;
    pb::EmailTemplate => pb::EmailTemplateList, email_templates;
    pb::SmsTemplate => pb::SmsTemplateList, sms_templates;
    pb::NotificationEvent => pb::NotificationEventList, notification_events;
}

/// Query string accepted by list routes.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub patient_id: Option<String>,
    pub national_health_id: Option<String>,
    pub page_number: Option<i32>,
    pub page_size: Option<i32>,
    pub sort: Option<String>,
    pub sort_ascending: Option<bool>,
}

impl From<ListParams> for ListQuery {
    fn from(params: ListParams) -> Self {
        ListQuery::from(pb::ListReq {
            pagination: Some(pb::Pagination {
                page_number: params.page_number.unwrap_or_default(),
                page_size: params.page_size.unwrap_or_default(),
                sort: params.sort.unwrap_or_default(),
                sort_ascending: params.sort_ascending.unwrap_or_default(),
                ..Default::default()
            }),
            patient_id: params.patient_id.unwrap_or_default(),
            national_health_id: params.national_health_id.unwrap_or_default(),
        })
    }
}

/// Registers the generic routes for `T` under `base`.
pub(crate) fn record_routes<T: RestRecord>(router: Router<AppState>, base: &str) -> Router<AppState> {
    router
        .route(base, get(list::<T>).post(create::<T>))
        .route(
            &format!("{base}/:id"),
            get(get_one::<T>).put(update::<T>).delete(delete::<T>),
        )
}

async fn create<T: RestRecord>(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(record): Json<T>,
) -> Result<(StatusCode, Json<T>), ApiError> {
    let created = T::service(&state.services).create(&actor, record)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_one<T: RestRecord>(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<Json<T>, ApiError> {
    Ok(Json(T::service(&state.services).get(&actor, &id)?))
}

async fn update<T: RestRecord>(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    Json(mut record): Json<T>,
) -> Result<Json<T>, ApiError> {
    record.set_id(id);
    Ok(Json(T::service(&state.services).update(&actor, record)?))
}

async fn delete<T: RestRecord>(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<Json<pb::DeleteRes>, ApiError> {
    Ok(Json(T::service(&state.services).delete(&actor, &id)?))
}

async fn list<T: RestRecord>(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<T::List>, ApiError> {
    let page = T::service(&state.services).list(&ListQuery::from(params))?;
    Ok(Json(page.into()))
}
