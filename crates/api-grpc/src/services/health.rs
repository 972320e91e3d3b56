//! Health group: clinical records, vitals, labs, engines and medical record export.

use super::{record_service, CdxGrpcService};
use crate::context::actor_from_request;
use crate::crud::{self, RpcResult};
use crate::status::to_status;
use api_shared::pb;
use api_shared::pb::{
    medical_record_service_server::MedicalRecordService,
    medication_administration_service_server::MedicationAdministrationService,
    medication_service_server::MedicationService, vitals_service_server::VitalsService,
};
use cdx_core::{ListQuery, Page};
use tonic::{Request, Response};

record_service!(
    pb::allergy_service_server::AllergyService, allergies, pb::Allergy, pb::AllergyList,
    create_allergy, get_allergy, update_allergy, delete_allergy, list_allergies
);

record_service!(
    pb::doctor_notes_service_server::DoctorNotesService, doctor_notes, pb::DoctorNotes,
    pb::DoctorNotesList,
    create_doctor_notes, get_doctor_notes, update_doctor_notes, delete_doctor_notes,
    list_doctor_notes
);

record_service!(
    pb::medical_condition_service_server::MedicalConditionService, diagnoses, pb::Diagnosis,
    pb::DiagnosisList,
    create_diagnosis, get_diagnosis, update_diagnosis, delete_diagnosis, list_diagnoses
);

record_service!(
    pb::medical_history_service_server::MedicalHistoryService, medical_histories,
    pb::MedicalHistory, pb::MedicalHistoryList,
    create_medical_history, get_medical_history, update_medical_history,
    delete_medical_history, list_medical_histories
);

record_service!(
    pb::vaccine_service_server::VaccineService, vaccines, pb::Vaccine, pb::VaccineList,
    create_vaccine, get_vaccine, update_vaccine, delete_vaccine, list_vaccines
);

record_service!(
    pb::connected_lab_service_server::ConnectedLabService, connected_labs, pb::ConnectedLab,
    pb::ConnectedLabList,
    create_connected_lab, get_connected_lab, update_connected_lab, delete_connected_lab,
    list_connected_labs
);

record_service!(
    pb::analysis_engine_service_server::AnalysisEngineService, analysis_engines,
    pb::AnalysisEngine, pb::AnalysisEngineList,
    create_analysis_engine, get_analysis_engine, update_analysis_engine,
    delete_analysis_engine, list_analysis_engines
);

#[tonic::async_trait]
impl VitalsService for CdxGrpcService {
    async fn create_blood_pressure(
        &self,
        request: Request<pb::BloodPressure>,
    ) -> RpcResult<pb::BloodPressure> {
        crud::create(&self.services.blood_pressures, request)
    }

    async fn get_blood_pressure(&self, request: Request<pb::IdReq>) -> RpcResult<pb::BloodPressure> {
        crud::get(&self.services.blood_pressures, request)
    }

    async fn update_blood_pressure(
        &self,
        request: Request<pb::BloodPressure>,
    ) -> RpcResult<pb::BloodPressure> {
        crud::update(&self.services.blood_pressures, request)
    }

    async fn delete_blood_pressure(&self, request: Request<pb::IdReq>) -> RpcResult<pb::DeleteRes> {
        crud::delete(&self.services.blood_pressures, request)
    }

    async fn list_blood_pressures(
        &self,
        request: Request<pb::ListReq>,
    ) -> RpcResult<pb::BloodPressureList> {
        crud::list(&self.services.blood_pressures, request)
    }

    async fn create_heart_rate(&self, request: Request<pb::HeartRate>) -> RpcResult<pb::HeartRate> {
        crud::create(&self.services.heart_rates, request)
    }

    async fn get_heart_rate(&self, request: Request<pb::IdReq>) -> RpcResult<pb::HeartRate> {
        crud::get(&self.services.heart_rates, request)
    }

    async fn update_heart_rate(&self, request: Request<pb::HeartRate>) -> RpcResult<pb::HeartRate> {
        crud::update(&self.services.heart_rates, request)
    }

    async fn delete_heart_rate(&self, request: Request<pb::IdReq>) -> RpcResult<pb::DeleteRes> {
        crud::delete(&self.services.heart_rates, request)
    }

    async fn list_heart_rates(
        &self,
        request: Request<pb::ListReq>,
    ) -> RpcResult<pb::HeartRateList> {
        crud::list(&self.services.heart_rates, request)
    }

    async fn create_height_measurement(
        &self,
        request: Request<pb::HeightMeasurement>,
    ) -> RpcResult<pb::HeightMeasurement> {
        crud::create(&self.services.heights, request)
    }

    async fn get_height_measurement(
        &self,
        request: Request<pb::IdReq>,
    ) -> RpcResult<pb::HeightMeasurement> {
        crud::get(&self.services.heights, request)
    }

    async fn update_height_measurement(
        &self,
        request: Request<pb::HeightMeasurement>,
    ) -> RpcResult<pb::HeightMeasurement> {
        crud::update(&self.services.heights, request)
    }

    async fn delete_height_measurement(
        &self,
        request: Request<pb::IdReq>,
    ) -> RpcResult<pb::DeleteRes> {
        crud::delete(&self.services.heights, request)
    }

    async fn list_height_measurements(
        &self,
        request: Request<pb::ListReq>,
    ) -> RpcResult<pb::HeightMeasurementList> {
        crud::list(&self.services.heights, request)
    }

    async fn create_weight_measurement(
        &self,
        request: Request<pb::WeightMeasurement>,
    ) -> RpcResult<pb::WeightMeasurement> {
        crud::create(&self.services.weights, request)
    }

    async fn get_weight_measurement(
        &self,
        request: Request<pb::IdReq>,
    ) -> RpcResult<pb::WeightMeasurement> {
        crud::get(&self.services.weights, request)
    }

    async fn update_weight_measurement(
        &self,
        request: Request<pb::WeightMeasurement>,
    ) -> RpcResult<pb::WeightMeasurement> {
        crud::update(&self.services.weights, request)
    }

    async fn delete_weight_measurement(
        &self,
        request: Request<pb::IdReq>,
    ) -> RpcResult<pb::DeleteRes> {
        crud::delete(&self.services.weights, request)
    }

    async fn list_weight_measurements(
        &self,
        request: Request<pb::ListReq>,
    ) -> RpcResult<pb::WeightMeasurementList> {
        crud::list(&self.services.weights, request)
    }
}

#[tonic::async_trait]
impl MedicationService for CdxGrpcService {
    async fn create_medication(
        &self,
        request: Request<pb::Medication>,
    ) -> RpcResult<pb::Medication> {
        let actor = actor_from_request(&request);
        self.services
            .medications
            .create(&actor, request.into_inner())
            .map(Response::new)
            .map_err(to_status)
    }

    async fn get_medication(&self, request: Request<pb::IdReq>) -> RpcResult<pb::Medication> {
        let actor = actor_from_request(&request);
        self.services
            .medications
            .get(&actor, &request.into_inner().id)
            .map(Response::new)
            .map_err(to_status)
    }

    async fn update_medication(
        &self,
        request: Request<pb::Medication>,
    ) -> RpcResult<pb::Medication> {
        let actor = actor_from_request(&request);
        self.services
            .medications
            .update(&actor, request.into_inner())
            .map(Response::new)
            .map_err(to_status)
    }

    async fn end_medication(
        &self,
        request: Request<pb::EndMedicationReq>,
    ) -> RpcResult<pb::Medication> {
        let actor = actor_from_request(&request);
        let req = request.into_inner();
        self.services
            .medications
            .end_medication(&actor, &req.id, &req.end_date)
            .map(Response::new)
            .map_err(to_status)
    }

    async fn delete_medication(&self, request: Request<pb::IdReq>) -> RpcResult<pb::DeleteRes> {
        let actor = actor_from_request(&request);
        self.services
            .medications
            .delete(&actor, &request.into_inner().id)
            .map(Response::new)
            .map_err(to_status)
    }

    async fn list_medications(
        &self,
        request: Request<pb::ListReq>,
    ) -> RpcResult<pb::MedicationList> {
        let query = ListQuery::from(request.into_inner());
        self.services
            .medications
            .list(&query)
            .map(|page| Response::new(page.into()))
            .map_err(to_status)
    }

    async fn search_medications(
        &self,
        request: Request<pb::SearchMedicationsReq>,
    ) -> RpcResult<pb::MedicationList> {
        self.services
            .medications
            .search(&request.into_inner().brand_name)
            .await
            .map(|found| Response::new(Page::unpaged(found).into()))
            .map_err(to_status)
    }
}

#[tonic::async_trait]
impl MedicationAdministrationService for CdxGrpcService {
    async fn track_medication_administration(
        &self,
        request: Request<pb::MedicationAdministration>,
    ) -> RpcResult<pb::MedicationAdministration> {
        crud::create(&self.services.administrations, request)
    }

    async fn get_medication_administration(
        &self,
        request: Request<pb::IdReq>,
    ) -> RpcResult<pb::MedicationAdministration> {
        crud::get(&self.services.administrations, request)
    }

    async fn update_medication_administration(
        &self,
        request: Request<pb::MedicationAdministration>,
    ) -> RpcResult<pb::MedicationAdministration> {
        crud::update(&self.services.administrations, request)
    }

    async fn delete_medication_administration(
        &self,
        request: Request<pb::IdReq>,
    ) -> RpcResult<pb::DeleteRes> {
        crud::delete(&self.services.administrations, request)
    }

    async fn list_medication_administrations(
        &self,
        request: Request<pb::ListReq>,
    ) -> RpcResult<pb::MedicationAdministrationList> {
        crud::list(&self.services.administrations, request)
    }
}

#[tonic::async_trait]
impl MedicalRecordService for CdxGrpcService {
    async fn request_export(
        &self,
        request: Request<pb::ExportMedicalRecordReq>,
    ) -> RpcResult<pb::MedicalRecord> {
        let actor = actor_from_request(&request);
        self.services
            .medical_records
            .request_export(&actor, &request.into_inner().patient_id)
            .map(Response::new)
            .map_err(to_status)
    }

    async fn request_import(
        &self,
        request: Request<pb::MedicalRecord>,
    ) -> RpcResult<pb::MedicalRecord> {
        let actor = actor_from_request(&request);
        self.services
            .medical_records
            .request_import(&actor, request.into_inner())
            .map(Response::new)
            .map_err(to_status)
    }

    async fn get_medical_record(
        &self,
        request: Request<pb::IdReq>,
    ) -> RpcResult<pb::MedicalRecord> {
        let actor = actor_from_request(&request);
        self.services
            .medical_records
            .get(&actor, &request.into_inner().id)
            .map(Response::new)
            .map_err(to_status)
    }

    async fn get_medical_record_status(
        &self,
        request: Request<pb::IdReq>,
    ) -> RpcResult<pb::MedicalRecordStatusRes> {
        self.services
            .medical_records
            .status(&request.into_inner().id)
            .map(Response::new)
            .map_err(to_status)
    }
}
