//! The persisted-record abstraction.
//!
//! Every pb message that is stored as a document implements [`Record`]. The trait carries the
//! collection it lives in, how it is audited, and the integrity rules (validation, outgoing
//! references, incoming dependents) that the generic services enforce.

use crate::CoreResult;
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Audit classification of a record type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    /// Protected health information.
    Phi,
    /// Personally identifiable information.
    Pii,
    /// Configuration (templates, labs, engines).
    Config,
    /// Outbound communications.
    Communication,
}

/// An outgoing link to another record that must exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub collection: &'static str,
    pub field: &'static str,
    pub id: String,
}

impl Reference {
    /// Builds a reference when `id` is non-blank.
    pub fn optional(collection: &'static str, field: &'static str, id: &str) -> Option<Self> {
        let id = id.trim();
        (!id.is_empty()).then(|| Self {
            collection,
            field,
            id: id.to_string(),
        })
    }
}

/// A collection/field pair whose documents point at records of this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dependent {
    pub collection: &'static str,
    pub field: &'static str,
}

/// A pb message persisted as a JSON document.
pub trait Record: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection (and directory) name.
    const COLLECTION: &'static str;
    const KIND: RecordKind;
    /// Human-readable singular name used in messages.
    const LABEL: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    /// `Some` for patient-scoped records, even when the value is blank.
    fn patient_id(&self) -> Option<&str> {
        None
    }

    fn national_health_id(&self) -> Option<&str> {
        None
    }

    fn set_national_health_id(&mut self, _nhid: String) {}

    fn set_patient_id(&mut self, _patient_id: String) {}

    /// Patient the record is about, for audit purposes.
    fn subject_id(&self) -> Option<&str> {
        self.patient_id().filter(|p| !p.is_empty())
    }

    fn created_at(&self) -> &str;
    fn creator(&self) -> &str;
    fn set_created(&mut self, at: String, by: String);
    fn set_modified(&mut self, at: String, by: String);

    /// Type-specific field rules.
    fn validate(&self) -> CoreResult<()> {
        Ok(())
    }

    /// Records (other than the owning patient) that must exist.
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }

    /// Blanks the field a [`Reference`] was read from.
    fn clear_reference(&mut self, _field: &str) {}

    /// Documents that block deletion while they point at this record.
    fn dependents() -> &'static [Dependent] {
        &[]
    }
}

/// Current time as an RFC 3339 UTC timestamp.
///
/// Fixed precision keeps lexical and chronological order identical.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
