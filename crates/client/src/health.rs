//! Clinical records, vitals, medications, labs and medical record export.

use crate::{service_client, unary};
use api_shared::pb::{
    self, allergy_service_client::AllergyServiceClient,
    analysis_engine_service_client::AnalysisEngineServiceClient,
    connected_lab_service_client::ConnectedLabServiceClient,
    doctor_notes_service_client::DoctorNotesServiceClient,
    medical_condition_service_client::MedicalConditionServiceClient,
    medical_history_service_client::MedicalHistoryServiceClient,
    medical_record_service_client::MedicalRecordServiceClient,
    medication_administration_service_client::MedicationAdministrationServiceClient,
    medication_service_client::MedicationServiceClient,
    vaccine_service_client::VaccineServiceClient, vitals_service_client::VitalsServiceClient,
};

service_client!(AllergyClient => AllergyServiceClient);
service_client!(VitalsClient => VitalsServiceClient);
service_client!(DoctorNotesClient => DoctorNotesServiceClient);
service_client!(MedicalConditionClient => MedicalConditionServiceClient);
service_client!(MedicalHistoryClient => MedicalHistoryServiceClient);
service_client!(MedicationClient => MedicationServiceClient);
service_client!(MedicationAdministrationClient => MedicationAdministrationServiceClient);
service_client!(VaccineClient => VaccineServiceClient);
service_client!(ConnectedLabClient => ConnectedLabServiceClient);
service_client!(AnalysisEngineClient => AnalysisEngineServiceClient);
service_client!(MedicalRecordClient => MedicalRecordServiceClient);

impl AllergyClient {
    unary! {
        create_allergy(pb::Allergy) -> pb::Allergy;
        get_allergy(pb::IdReq) -> pb::Allergy;
        update_allergy(pb::Allergy) -> pb::Allergy;
        delete_allergy(pb::IdReq) -> pb::DeleteRes;
        list_allergies(pb::ListReq) -> pb::AllergyList;
    }
}

impl VitalsClient {
    unary! {
        create_blood_pressure(pb::BloodPressure) -> pb::BloodPressure;
        get_blood_pressure(pb::IdReq) -> pb::BloodPressure;
        update_blood_pressure(pb::BloodPressure) -> pb::BloodPressure;
        delete_blood_pressure(pb::IdReq) -> pb::DeleteRes;
        list_blood_pressures(pb::ListReq) -> pb::BloodPressureList;

        create_heart_rate(pb::HeartRate) -> pb::HeartRate;
        get_heart_rate(pb::IdReq) -> pb::HeartRate;
        update_heart_rate(pb::HeartRate) -> pb::HeartRate;
        delete_heart_rate(pb::IdReq) -> pb::DeleteRes;
        list_heart_rates(pb::ListReq) -> pb::HeartRateList;

        create_height_measurement(pb::HeightMeasurement) -> pb::HeightMeasurement;
        get_height_measurement(pb::IdReq) -> pb::HeightMeasurement;
        update_height_measurement(pb::HeightMeasurement) -> pb::HeightMeasurement;
        delete_height_measurement(pb::IdReq) -> pb::DeleteRes;
        list_height_measurements(pb::ListReq) -> pb::HeightMeasurementList;

        create_weight_measurement(pb::WeightMeasurement) -> pb::WeightMeasurement;
        get_weight_measurement(pb::IdReq) -> pb::WeightMeasurement;
        update_weight_measurement(pb::WeightMeasurement) -> pb::WeightMeasurement;
        delete_weight_measurement(pb::IdReq) -> pb::DeleteRes;
        list_weight_measurements(pb::ListReq) -> pb::WeightMeasurementList;
    }
}

impl DoctorNotesClient {
    unary! {
        create_doctor_notes(pb::DoctorNotes) -> pb::DoctorNotes;
        get_doctor_notes(pb::IdReq) -> pb::DoctorNotes;
        update_doctor_notes(pb::DoctorNotes) -> pb::DoctorNotes;
        delete_doctor_notes(pb::IdReq) -> pb::DeleteRes;
        list_doctor_notes(pb::ListReq) -> pb::DoctorNotesList;
    }
}

impl MedicalConditionClient {
    unary! {
        create_diagnosis(pb::Diagnosis) -> pb::Diagnosis;
        get_diagnosis(pb::IdReq) -> pb::Diagnosis;
        update_diagnosis(pb::Diagnosis) -> pb::Diagnosis;
        delete_diagnosis(pb::IdReq) -> pb::DeleteRes;
        list_diagnoses(pb::ListReq) -> pb::DiagnosisList;
    }
}

impl MedicalHistoryClient {
    unary! {
        create_medical_history(pb::MedicalHistory) -> pb::MedicalHistory;
        get_medical_history(pb::IdReq) -> pb::MedicalHistory;
        update_medical_history(pb::MedicalHistory) -> pb::MedicalHistory;
        delete_medical_history(pb::IdReq) -> pb::DeleteRes;
        list_medical_histories(pb::ListReq) -> pb::MedicalHistoryList;
    }
}

impl MedicationClient {
    unary! {
        create_medication(pb::Medication) -> pb::Medication;
        get_medication(pb::IdReq) -> pb::Medication;
        update_medication(pb::Medication) -> pb::Medication;
        /// Marks a medication inactive; a blank end date means today.
        end_medication(pb::EndMedicationReq) -> pb::Medication;
        delete_medication(pb::IdReq) -> pb::DeleteRes;
        list_medications(pb::ListReq) -> pb::MedicationList;
        /// Searches the external drug catalog by brand name.
        search_medications(pb::SearchMedicationsReq) -> pb::MedicationList;
    }
}

impl MedicationAdministrationClient {
    unary! {
        track_medication_administration(pb::MedicationAdministration) -> pb::MedicationAdministration;
        get_medication_administration(pb::IdReq) -> pb::MedicationAdministration;
        update_medication_administration(pb::MedicationAdministration) -> pb::MedicationAdministration;
        delete_medication_administration(pb::IdReq) -> pb::DeleteRes;
        list_medication_administrations(pb::ListReq) -> pb::MedicationAdministrationList;
    }
}

impl VaccineClient {
    unary! {
        create_vaccine(pb::Vaccine) -> pb::Vaccine;
        get_vaccine(pb::IdReq) -> pb::Vaccine;
        update_vaccine(pb::Vaccine) -> pb::Vaccine;
        delete_vaccine(pb::IdReq) -> pb::DeleteRes;
        list_vaccines(pb::ListReq) -> pb::VaccineList;
    }
}

impl ConnectedLabClient {
    unary! {
        create_connected_lab(pb::ConnectedLab) -> pb::ConnectedLab;
        get_connected_lab(pb::IdReq) -> pb::ConnectedLab;
        update_connected_lab(pb::ConnectedLab) -> pb::ConnectedLab;
        delete_connected_lab(pb::IdReq) -> pb::DeleteRes;
        list_connected_labs(pb::ListReq) -> pb::ConnectedLabList;
    }
}

impl AnalysisEngineClient {
    unary! {
        create_analysis_engine(pb::AnalysisEngine) -> pb::AnalysisEngine;
        get_analysis_engine(pb::IdReq) -> pb::AnalysisEngine;
        update_analysis_engine(pb::AnalysisEngine) -> pb::AnalysisEngine;
        delete_analysis_engine(pb::IdReq) -> pb::DeleteRes;
        list_analysis_engines(pb::ListReq) -> pb::AnalysisEngineList;
    }
}

impl MedicalRecordClient {
    unary! {
        request_export(pb::ExportMedicalRecordReq) -> pb::MedicalRecord;
        request_import(pb::MedicalRecord) -> pb::MedicalRecord;
        get_medical_record(pb::IdReq) -> pb::MedicalRecord;
        get_medical_record_status(pb::IdReq) -> pb::MedicalRecordStatusRes;
    }
}
