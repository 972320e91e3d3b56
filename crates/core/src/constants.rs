//! Constants used throughout the CDX core crate.
//!
//! Collection names double as directory names for the file-backed store, so they must stay
//! stable once data has been written.

/// Default directory for document storage when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "cdx_data";

/// Filename holding a single JSON document inside its sharded directory.
pub const DOCUMENT_FILENAME: &str = "document.json";

/// Identifier recorded as actor when no user is supplied.
pub const SYSTEM_ACTOR: &str = "system";

pub const PROFILES: &str = "profiles";
pub const PROVIDERS: &str = "providers";
pub const ALLERGIES: &str = "allergies";
pub const BLOOD_PRESSURES: &str = "blood_pressures";
pub const HEART_RATES: &str = "heart_rates";
pub const HEIGHT_MEASUREMENTS: &str = "height_measurements";
pub const WEIGHT_MEASUREMENTS: &str = "weight_measurements";
pub const DOCTOR_NOTES: &str = "doctor_notes";
pub const DIAGNOSES: &str = "diagnoses";
pub const MEDICAL_HISTORIES: &str = "medical_histories";
pub const MEDICATIONS: &str = "medications";
pub const MEDICATION_ADMINISTRATIONS: &str = "medication_administrations";
pub const VACCINES: &str = "vaccines";
pub const CONNECTED_LABS: &str = "connected_labs";
pub const ANALYSIS_ENGINES: &str = "analysis_engines";
pub const MEDICAL_RECORDS: &str = "medical_records";
pub const EMAIL_TEMPLATES: &str = "email_templates";
pub const SMS_TEMPLATES: &str = "sms_templates";
pub const NOTIFICATION_EVENTS: &str = "notification_events";
pub const NOTIFICATIONS: &str = "notifications";
pub const AUDIT_EVENTS: &str = "audit_events";

/// Every collection holding patient-scoped clinical records.
pub const PATIENT_COLLECTIONS: &[&str] = &[
    ALLERGIES,
    BLOOD_PRESSURES,
    HEART_RATES,
    HEIGHT_MEASUREMENTS,
    WEIGHT_MEASUREMENTS,
    DOCTOR_NOTES,
    DIAGNOSES,
    MEDICAL_HISTORIES,
    MEDICATIONS,
    MEDICATION_ADMINISTRATIONS,
    VACCINES,
    MEDICAL_RECORDS,
];

/// Default CDC reporting endpoint.
pub const DEFAULT_CDC_ENDPOINT: &str = "https://ocio-ecr-dev.cdc.gov/fhir/Bundle";

/// Default NPI registry API base URL.
pub const DEFAULT_NPI_REGISTRY_URL: &str = "https://npiregistry.cms.hhs.gov/api/";

/// Default OpenFDA NDC endpoint.
pub const DEFAULT_OPENFDA_URL: &str = "https://api.fda.gov/drug/ndc.json";

/// Default seconds between scheduled notification scans.
pub const DEFAULT_NOTIFICATION_INTERVAL_SECS: u64 = 60;

/// Default outbound HTTP timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Maximum length of a rendered SMS template body.
pub const MAX_SMS_LENGTH: usize = 1600;
