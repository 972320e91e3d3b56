//! [`Record`] implementations for the persisted pb messages.

use crate::constants::*;
use crate::record::{Dependent, Record, RecordKind, Reference};
use crate::validation::{date_range, optional_date, require, validate_variable_names};
use crate::{CoreError, CoreResult};
use api_shared::pb;
use cdx_types::{EmailAddress, PhoneNumber};

macro_rules! impl_record {
    (@common) => {
        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }

        fn created_at(&self) -> &str {
            &self.created_at
        }

        fn creator(&self) -> &str {
            &self.creator
        }

        fn set_created(&mut self, at: String, by: String) {
            self.created_at = at;
            self.creator = by;
        }

        fn set_modified(&mut self, at: String, by: String) {
            self.modified_at = at;
            self.modifier = by;
        }
    };
    (patient $ty:ty, $collection:expr, $kind:expr, $label:literal { $($body:tt)* }) => {
        impl Record for $ty {
            const COLLECTION: &'static str = $collection;
            const KIND: RecordKind = $kind;
            const LABEL: &'static str = $label;

            impl_record!(@common);

            fn patient_id(&self) -> Option<&str> {
                Some(&self.patient_id)
            }

            fn national_health_id(&self) -> Option<&str> {
                Some(&self.national_health_id)
            }

            fn set_national_health_id(&mut self, nhid: String) {
                self.national_health_id = nhid;
            }

            fn set_patient_id(&mut self, patient_id: String) {
                self.patient_id = patient_id;
            }

            $($body)*
        }
    };
    ($ty:ty, $collection:expr, $kind:expr, $label:literal { $($body:tt)* }) => {
        impl Record for $ty {
            const COLLECTION: &'static str = $collection;
            const KIND: RecordKind = $kind;
            const LABEL: &'static str = $label;

            impl_record!(@common);

            $($body)*
        }
    };
}

fn invalid(msg: impl Into<String>) -> CoreError {
    CoreError::NotAcceptable(msg.into())
}

fn optional_email(field: &str, value: &str) -> CoreResult<()> {
    if !value.trim().is_empty() {
        EmailAddress::parse(value).map_err(|e| invalid(format!("{field}: {e}")))?;
    }
    Ok(())
}

fn optional_phone(field: &str, value: &str) -> CoreResult<()> {
    if !value.trim().is_empty() {
        PhoneNumber::parse(value).map_err(|e| invalid(format!("{field}: {e}")))?;
    }
    Ok(())
}

/// True when `npi` is exactly ten ASCII digits.
pub fn is_valid_npi(npi: &str) -> bool {
    npi.len() == 10 && npi.bytes().all(|b| b.is_ascii_digit())
}

const PROFILE_DEPENDENTS: &[Dependent] = &[
    Dependent { collection: ALLERGIES, field: "patient_id" },
    Dependent { collection: BLOOD_PRESSURES, field: "patient_id" },
    Dependent { collection: HEART_RATES, field: "patient_id" },
    Dependent { collection: HEIGHT_MEASUREMENTS, field: "patient_id" },
    Dependent { collection: WEIGHT_MEASUREMENTS, field: "patient_id" },
    Dependent { collection: DOCTOR_NOTES, field: "patient_id" },
    Dependent { collection: DIAGNOSES, field: "patient_id" },
    Dependent { collection: MEDICAL_HISTORIES, field: "patient_id" },
    Dependent { collection: MEDICAL_HISTORIES, field: "related_patient_id" },
    Dependent { collection: MEDICATIONS, field: "patient_id" },
    Dependent { collection: MEDICATION_ADMINISTRATIONS, field: "patient_id" },
    Dependent { collection: VACCINES, field: "patient_id" },
    Dependent { collection: MEDICAL_RECORDS, field: "patient_id" },
    Dependent { collection: NOTIFICATIONS, field: "patient_id" },
];

impl_record!(pb::Profile, PROFILES, RecordKind::Pii, "profile" {
    fn national_health_id(&self) -> Option<&str> {
        Some(&self.national_health_id)
    }

    fn subject_id(&self) -> Option<&str> {
        Some(self.id.as_str()).filter(|id| !id.is_empty())
    }

    fn validate(&self) -> CoreResult<()> {
        require("first_name", &self.first_name)?;
        require("last_name", &self.last_name)?;
        require("national_health_id", &self.national_health_id)?;
        optional_date("date_of_birth", &self.date_of_birth)?;
        optional_email("email", &self.email)?;
        optional_phone("phone", &self.phone)
    }

    fn dependents() -> &'static [Dependent] {
        PROFILE_DEPENDENTS
    }
});

impl_record!(pb::Provider, PROVIDERS, RecordKind::Pii, "provider" {
    fn validate(&self) -> CoreResult<()> {
        if !is_valid_npi(&self.npi_number) {
            return Err(invalid("npi_number must be 10 digits"));
        }
        Ok(())
    }

    fn dependents() -> &'static [Dependent] {
        &[
            Dependent { collection: DOCTOR_NOTES, field: "provider_id" },
            Dependent { collection: MEDICATIONS, field: "prescriber_id" },
        ]
    }
});

impl_record!(patient pb::Allergy, ALLERGIES, RecordKind::Phi, "allergy" {
    fn validate(&self) -> CoreResult<()> {
        require("allergen", &self.allergen)?;
        optional_date("onset_date", &self.onset_date).map(|_| ())
    }
});

impl_record!(patient pb::BloodPressure, BLOOD_PRESSURES, RecordKind::Phi, "blood pressure" {
    fn validate(&self) -> CoreResult<()> {
        if self.systolic <= 0 || self.diastolic <= 0 {
            return Err(invalid("systolic and diastolic must be positive"));
        }
        if self.systolic < self.diastolic {
            return Err(invalid("systolic must not be below diastolic"));
        }
        Ok(())
    }
});

impl_record!(patient pb::HeartRate, HEART_RATES, RecordKind::Phi, "heart rate" {
    fn validate(&self) -> CoreResult<()> {
        if !(1..=300).contains(&self.beats_per_minute) {
            return Err(invalid("beats_per_minute must be between 1 and 300"));
        }
        Ok(())
    }
});

impl_record!(patient pb::HeightMeasurement, HEIGHT_MEASUREMENTS, RecordKind::Phi, "height measurement" {
    fn validate(&self) -> CoreResult<()> {
        if self.height.is_nan() || self.height <= 0.0 {
            return Err(invalid("height must be positive"));
        }
        Ok(())
    }
});

impl_record!(patient pb::WeightMeasurement, WEIGHT_MEASUREMENTS, RecordKind::Phi, "weight measurement" {
    fn validate(&self) -> CoreResult<()> {
        if self.weight.is_nan() || self.weight <= 0.0 {
            return Err(invalid("weight must be positive"));
        }
        Ok(())
    }
});

impl_record!(patient pb::DoctorNotes, DOCTOR_NOTES, RecordKind::Phi, "doctor notes" {
    fn validate(&self) -> CoreResult<()> {
        require("note", &self.note)
    }

    fn references(&self) -> Vec<Reference> {
        Reference::optional(PROVIDERS, "provider_id", &self.provider_id)
            .into_iter()
            .collect()
    }

    fn clear_reference(&mut self, field: &str) {
        if field == "provider_id" {
            self.provider_id.clear();
        }
    }
});

impl_record!(patient pb::Diagnosis, DIAGNOSES, RecordKind::Phi, "diagnosis" {
    fn validate(&self) -> CoreResult<()> {
        require("name", &self.name)?;
        date_range("onset_date", &self.onset_date, "resolved_date", &self.resolved_date)
    }
});

impl_record!(patient pb::MedicalHistory, MEDICAL_HISTORIES, RecordKind::Phi, "medical history" {
    fn validate(&self) -> CoreResult<()> {
        require("condition", &self.condition)?;
        date_range("start_date", &self.start_date, "end_date", &self.end_date)
    }

    fn references(&self) -> Vec<Reference> {
        Reference::optional(PROFILES, "related_patient_id", &self.related_patient_id)
            .into_iter()
            .collect()
    }

    fn clear_reference(&mut self, field: &str) {
        if field == "related_patient_id" {
            self.related_patient_id.clear();
        }
    }
});

impl_record!(patient pb::Medication, MEDICATIONS, RecordKind::Phi, "medication" {
    fn validate(&self) -> CoreResult<()> {
        require("medication_name", &self.medication_name)?;
        date_range("start_date", &self.start_date, "end_date", &self.end_date)
    }

    fn references(&self) -> Vec<Reference> {
        Reference::optional(PROVIDERS, "prescriber_id", &self.prescriber_id)
            .into_iter()
            .collect()
    }

    fn clear_reference(&mut self, field: &str) {
        if field == "prescriber_id" {
            self.prescriber_id.clear();
        }
    }

    fn dependents() -> &'static [Dependent] {
        &[Dependent { collection: MEDICATION_ADMINISTRATIONS, field: "medication_id" }]
    }
});

impl_record!(patient pb::MedicationAdministration, MEDICATION_ADMINISTRATIONS, RecordKind::Phi, "medication administration" {
    fn validate(&self) -> CoreResult<()> {
        require("medication_id", &self.medication_id)
    }

    fn references(&self) -> Vec<Reference> {
        Reference::optional(MEDICATIONS, "medication_id", &self.medication_id)
            .into_iter()
            .collect()
    }

    fn clear_reference(&mut self, field: &str) {
        if field == "medication_id" {
            self.medication_id.clear();
        }
    }
});

impl_record!(patient pb::Vaccine, VACCINES, RecordKind::Phi, "vaccine" {
    fn validate(&self) -> CoreResult<()> {
        require("vaccine_name", &self.vaccine_name)?;
        if self.dose_number < 1 {
            return Err(invalid("dose_number must be at least 1"));
        }
        Ok(())
    }
});

impl_record!(patient pb::MedicalRecord, MEDICAL_RECORDS, RecordKind::Phi, "medical record" {});

impl_record!(pb::ConnectedLab, CONNECTED_LABS, RecordKind::Config, "connected lab" {
    fn validate(&self) -> CoreResult<()> {
        require("name", &self.name)?;
        require("organization_id", &self.organization_id)?;
        optional_email("lab_email", &self.lab_email)
    }
});

impl_record!(pb::AnalysisEngine, ANALYSIS_ENGINES, RecordKind::Config, "analysis engine" {
    fn validate(&self) -> CoreResult<()> {
        require("name", &self.name)
    }
});

impl_record!(pb::EmailTemplate, EMAIL_TEMPLATES, RecordKind::Config, "email template" {
    fn validate(&self) -> CoreResult<()> {
        require("subject", &self.subject)?;
        require("content", &self.content)?;
        validate_variable_names(&self.variables)
    }

    fn dependents() -> &'static [Dependent] {
        &[Dependent { collection: NOTIFICATION_EVENTS, field: "email_template_id" }]
    }
});

impl_record!(pb::SmsTemplate, SMS_TEMPLATES, RecordKind::Config, "sms template" {
    fn validate(&self) -> CoreResult<()> {
        require("message", &self.message)?;
        if self.message.chars().count() > MAX_SMS_LENGTH {
            return Err(invalid(format!(
                "message must be at most {MAX_SMS_LENGTH} characters"
            )));
        }
        validate_variable_names(&self.variables)
    }

    fn dependents() -> &'static [Dependent] {
        &[Dependent { collection: NOTIFICATION_EVENTS, field: "sms_template_id" }]
    }
});

impl_record!(pb::NotificationEvent, NOTIFICATION_EVENTS, RecordKind::Config, "notification event" {
    fn validate(&self) -> CoreResult<()> {
        require("event_name", &self.event_name)?;
        if self.email_template_id.trim().is_empty() && self.sms_template_id.trim().is_empty() {
            return Err(invalid("an email or sms template is required"));
        }
        if self.email_retry < 0 || self.sms_retry < 0 {
            return Err(invalid("retry counts must not be negative"));
        }
        Ok(())
    }

    fn references(&self) -> Vec<Reference> {
        [
            Reference::optional(EMAIL_TEMPLATES, "email_template_id", &self.email_template_id),
            Reference::optional(SMS_TEMPLATES, "sms_template_id", &self.sms_template_id),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn dependents() -> &'static [Dependent] {
        &[Dependent { collection: NOTIFICATIONS, field: "event_id" }]
    }
});

impl_record!(pb::Notification, NOTIFICATIONS, RecordKind::Communication, "notification" {
    fn subject_id(&self) -> Option<&str> {
        Some(self.patient_id.as_str()).filter(|p| !p.is_empty())
    }

    fn validate(&self) -> CoreResult<()> {
        require("event_id", &self.event_id)?;

        let emails = self.to_email.iter().chain(&self.cc_email).chain(&self.bcc_email);
        let mut recipients = 0;
        for email in emails {
            EmailAddress::parse(email)?;
            recipients += 1;
        }
        for phone in &self.to_phone_number {
            PhoneNumber::parse(phone)?;
            recipients += 1;
        }
        if recipients == 0 {
            return Err(invalid("at least one recipient is required"));
        }
        Ok(())
    }

    fn references(&self) -> Vec<Reference> {
        [
            Reference::optional(NOTIFICATION_EVENTS, "event_id", &self.event_id),
            Reference::optional(PROFILES, "patient_id", &self.patient_id),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
});
