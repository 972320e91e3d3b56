//! Conversions from repository pages into the pb list messages.

use crate::repository::Page;
use api_shared::pb;

macro_rules! page_into_list {
    ($($item:ty => $list:ty, $field:ident;)*) => {
        $(
            impl From<Page<$item>> for $list {
                fn from(page: Page<$item>) -> Self {
                    Self {
                        pagination: Some(page.pagination),
                        $field: page.items,
                    }
                }
            }
        )*
    };
}

page_into_list! {
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
    pb::EmailTemplate => pb::EmailTemplateList, templates;
    pb::SmsTemplate => pb::SmsTemplateList, templates;
    pb::NotificationEvent => pb::NotificationEventList, events;
    pb::Notification => pb::NotificationList, notifications;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_converts_to_list_message() {
        let page = Page {
            items: vec![pb::Vaccine::default()],
            pagination: pb::Pagination {
                total_records: 1,
                total_pages: 1,
                ..Default::default()
            },
        };
        let list: pb::VaccineList = page.into();
        assert_eq!(list.vaccines.len(), 1);
        assert_eq!(list.pagination.map(|p| p.total_records), Some(1));
    }
}
