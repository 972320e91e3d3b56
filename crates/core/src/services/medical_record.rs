//! Medical record export and import.
//!
//! Export snapshots every patient-scoped record for one patient into a single
//! [`pb::MedicalRecord`]. Import replays such a snapshot into this system: the profile is
//! matched on national health id (or created), and every contained record is stored under
//! that patient with a new id.

use super::ProfileService;
use crate::actor::Actor;
use crate::audit::{AuditEvent, AuditEventType, AuditService};
use crate::constants::MEDICAL_RECORDS;
use crate::record::{now_rfc3339, Record};
use crate::repository::Repository;
use crate::store::DocumentStore;
use crate::{CoreError, CoreResult};
use api_shared::pb;
use api_shared::pb::MedicalRecordStatus;
use cdx_uuid::RecordId;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct MedicalRecordService {
    store: Arc<dyn DocumentStore>,
    records: Repository<pb::MedicalRecord>,
    profiles: ProfileService,
    audit: Arc<dyn AuditService>,
}

impl MedicalRecordService {
    pub fn new(store: Arc<dyn DocumentStore>, audit: Arc<dyn AuditService>) -> Self {
        Self {
            records: Repository::new(Arc::clone(&store)),
            profiles: ProfileService::new(Arc::clone(&store), Arc::clone(&audit)),
            store,
            audit,
        }
    }

    fn repo<T: Record>(&self) -> Repository<T> {
        Repository::new(Arc::clone(&self.store))
    }

    /// Assembles every record for `patient_id` into a stored medical record.
    ///
    /// The record is persisted as `REQUESTED` first and moves to `COMPLETE` once the
    /// contents are gathered, or to `FAILED` if gathering fails.
    pub fn request_export(&self, actor: &Actor, patient_id: &str) -> CoreResult<pb::MedicalRecord> {
        let profile = self.profiles.find(patient_id.trim())?;

        let now = now_rfc3339();
        let mut record = pb::MedicalRecord {
            patient_id: profile.id.clone(),
            national_health_id: profile.national_health_id.clone(),
            status: MedicalRecordStatus::Requested as i32,
            ..Default::default()
        };
        record.set_id(RecordId::new().to_string());
        record.set_created(now.clone(), actor.user_id().to_string());
        record.set_modified(now, actor.user_id().to_string());
        self.records.insert(&record)?;

        match self.gather(profile) {
            Ok(contents) => {
                record.contents = Some(contents);
                record.status = MedicalRecordStatus::Complete as i32;
            }
            Err(e) => {
                tracing::error!(id = %record.id, "medical record export failed: {e}");
                record.status = MedicalRecordStatus::Failed as i32;
                record.set_modified(now_rfc3339(), actor.user_id().to_string());
                self.records.replace(&record)?;
                return Err(e);
            }
        }

        record.set_modified(now_rfc3339(), actor.user_id().to_string());
        self.records.replace(&record)?;
        tracing::info!(id = %record.id, patient_id = %record.patient_id, "medical record exported");
        self.audit_record(actor, &record, AuditEventType::PhiAccessed, "medical record exported")?;
        Ok(record)
    }

    fn gather(&self, profile: pb::Profile) -> CoreResult<pb::MedicalRecordContents> {
        let pid = profile.id.clone();
        Ok(pb::MedicalRecordContents {
            allergies: self.repo::<pb::Allergy>().find_by_patient(&pid)?,
            blood_pressures: self.repo::<pb::BloodPressure>().find_by_patient(&pid)?,
            heart_rates: self.repo::<pb::HeartRate>().find_by_patient(&pid)?,
            heights: self.repo::<pb::HeightMeasurement>().find_by_patient(&pid)?,
            weights: self.repo::<pb::WeightMeasurement>().find_by_patient(&pid)?,
            doctor_notes: self.repo::<pb::DoctorNotes>().find_by_patient(&pid)?,
            diagnoses: self.repo::<pb::Diagnosis>().find_by_patient(&pid)?,
            medical_histories: self.repo::<pb::MedicalHistory>().find_by_patient(&pid)?,
            medications: self.repo::<pb::Medication>().find_by_patient(&pid)?,
            administrations: self.repo::<pb::MedicationAdministration>().find_by_patient(&pid)?,
            vaccines: self.repo::<pb::Vaccine>().find_by_patient(&pid)?,
            profile: Some(profile),
        })
    }

    /// Stores the contents of an exported medical record under a local patient.
    ///
    /// # Errors
    ///
    /// Returns `NotAcceptable` when the record carries no contents or no profile.
    pub fn request_import(
        &self,
        actor: &Actor,
        incoming: pb::MedicalRecord,
    ) -> CoreResult<pb::MedicalRecord> {
        let contents = incoming
            .contents
            .ok_or_else(|| CoreError::NotAcceptable("medical record contents are required".into()))?;
        let incoming_profile = contents.profile.ok_or_else(|| {
            CoreError::NotAcceptable("medical record contents must include a profile".into())
        })?;

        let profile = match self.profiles.find_by_nhid(&incoming_profile.national_health_id)? {
            Some(existing) => existing,
            None => self.profiles.create(actor, incoming_profile)?,
        };

        let importer = Importer {
            actor,
            patient: &profile,
            now: now_rfc3339(),
            store: &self.store,
        };

        let medications = importer.import(contents.medications)?;
        let medication_ids: HashMap<String, String> = medications
            .iter()
            .map(|(old, new)| (old.clone(), new.id.clone()))
            .collect();
        let administrations = contents
            .administrations
            .into_iter()
            .map(|mut a| {
                if let Some(new_id) = medication_ids.get(&a.medication_id) {
                    a.medication_id = new_id.clone();
                }
                a
            })
            .collect();

        let imported = pb::MedicalRecordContents {
            allergies: importer.import_all(contents.allergies)?,
            blood_pressures: importer.import_all(contents.blood_pressures)?,
            heart_rates: importer.import_all(contents.heart_rates)?,
            heights: importer.import_all(contents.heights)?,
            weights: importer.import_all(contents.weights)?,
            doctor_notes: importer.import_all(contents.doctor_notes)?,
            diagnoses: importer.import_all(contents.diagnoses)?,
            medical_histories: importer.import_all(contents.medical_histories)?,
            medications: medications.into_iter().map(|(_, m)| m).collect(),
            administrations: importer.import_all(administrations)?,
            vaccines: importer.import_all(contents.vaccines)?,
            profile: Some(profile.clone()),
        };

        let mut record = pb::MedicalRecord {
            patient_id: profile.id.clone(),
            national_health_id: profile.national_health_id.clone(),
            status: MedicalRecordStatus::Complete as i32,
            contents: Some(imported),
            ..Default::default()
        };
        record.set_id(RecordId::new().to_string());
        record.set_created(importer.now.clone(), actor.user_id().to_string());
        record.set_modified(importer.now.clone(), actor.user_id().to_string());
        self.records.insert(&record)?;

        tracing::info!(id = %record.id, patient_id = %record.patient_id, "medical record imported");
        self.audit_record(actor, &record, AuditEventType::PhiCreated, "medical record imported")?;
        Ok(record)
    }

    pub fn get(&self, actor: &Actor, id: &str) -> CoreResult<pb::MedicalRecord> {
        let record = self.find(id)?;
        self.audit_record(actor, &record, AuditEventType::PhiAccessed, "medical record accessed")?;
        Ok(record)
    }

    pub fn status(&self, id: &str) -> CoreResult<pb::MedicalRecordStatusRes> {
        let record = self.find(id)?;
        Ok(pb::MedicalRecordStatusRes {
            id: record.id,
            status: record.status,
        })
    }

    fn find(&self, id: &str) -> CoreResult<pb::MedicalRecord> {
        self.records
            .find_by_id(id)?
            .ok_or_else(|| CoreError::NotFound(format!("medical record {id} not found")))
    }

    fn audit_record(
        &self,
        actor: &Actor,
        record: &pb::MedicalRecord,
        event_type: AuditEventType,
        description: &str,
    ) -> CoreResult<()> {
        self.audit.record(AuditEvent::new(
            event_type,
            actor,
            Some(&record.patient_id),
            format!("{MEDICAL_RECORDS}/{}", record.id),
            description,
        ))
    }
}

/// Re-homes imported records onto a local patient.
struct Importer<'a> {
    actor: &'a Actor,
    patient: &'a pb::Profile,
    now: String,
    store: &'a Arc<dyn DocumentStore>,
}

impl Importer<'_> {
    /// Stores each record with a new id, returning `(original id, stored record)` pairs.
    ///
    /// References that don't resolve here are blanked. A record left invalid by that is
    /// skipped.
    fn import<T: Record>(&self, items: Vec<T>) -> CoreResult<Vec<(String, T)>> {
        let repo = Repository::<T>::new(Arc::clone(self.store));
        let mut imported = Vec::with_capacity(items.len());
        for mut item in items {
            let original = item.id().to_string();
            if !self.resolve_references(&mut item)? {
                tracing::warn!(
                    collection = T::COLLECTION,
                    original_id = %original,
                    "skipping imported {} with unresolved references",
                    T::LABEL
                );
                continue;
            }
            item.set_id(RecordId::new().to_string());
            item.set_patient_id(self.patient.id.clone());
            item.set_national_health_id(self.patient.national_health_id.clone());
            item.set_created(self.now.clone(), self.actor.user_id().to_string());
            item.set_modified(self.now.clone(), self.actor.user_id().to_string());
            repo.insert(&item)?;
            imported.push((original, item));
        }
        Ok(imported)
    }

    fn import_all<T: Record>(&self, items: Vec<T>) -> CoreResult<Vec<T>> {
        Ok(self.import(items)?.into_iter().map(|(_, item)| item).collect())
    }

    /// Clears dangling references and reports whether the record is still valid.
    fn resolve_references<T: Record>(&self, item: &mut T) -> CoreResult<bool> {
        for reference in item.references() {
            if self.store.get(reference.collection, &reference.id)?.is_none() {
                item.clear_reference(reference.field);
            }
        }
        Ok(item.validate().is_ok()
            && item
                .references()
                .iter()
                .all(|r| matches!(self.store.get(r.collection, &r.id), Ok(Some(_)))))
    }
}
