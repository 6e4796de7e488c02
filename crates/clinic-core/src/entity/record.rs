use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind, merge, merge_opt};
use crate::error::Result;
use crate::time::Timestamp;
use crate::validate::{Validate, matches_id, optional_text, require_text};

/// A clinical note attached to a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: String,
    pub patient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    pub diagnosis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRecord {
    pub patient_id: String,
    pub diagnosis: String,
    #[serde(default)]
    pub doctor_id: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRecord {
    pub patient_id: Option<String>,
    pub doctor_id: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientRecordFilter {
    pub patient_id: Option<String>,
    pub doctor_id: Option<String>,
}

impl Validate for CreatePatientRecord {
    fn validate(&self) -> Result<()> {
        require_text("patientId", &self.patient_id)?;
        require_text("diagnosis", &self.diagnosis)?;
        optional_text("doctorId", self.doctor_id.as_deref())?;
        optional_text("treatment", self.treatment.as_deref())?;
        optional_text("notes", self.notes.as_deref())
    }
}

impl Validate for UpdatePatientRecord {
    fn validate(&self) -> Result<()> {
        optional_text("patientId", self.patient_id.as_deref())?;
        optional_text("doctorId", self.doctor_id.as_deref())?;
        optional_text("diagnosis", self.diagnosis.as_deref())?;
        optional_text("treatment", self.treatment.as_deref())?;
        optional_text("notes", self.notes.as_deref())
    }
}

impl Entity for PatientRecord {
    type Create = CreatePatientRecord;
    type Update = UpdatePatientRecord;
    type Filter = PatientRecordFilter;

    const KIND: EntityKind = EntityKind::PatientRecord;

    fn from_create(id: String, now: Timestamp, payload: CreatePatientRecord) -> Self {
        Self {
            id,
            patient_id: payload.patient_id,
            doctor_id: payload.doctor_id,
            diagnosis: payload.diagnosis,
            treatment: payload.treatment,
            notes: payload.notes,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, payload: UpdatePatientRecord, now: Timestamp) {
        merge(&mut self.patient_id, payload.patient_id);
        merge_opt(&mut self.doctor_id, payload.doctor_id);
        merge(&mut self.diagnosis, payload.diagnosis);
        merge_opt(&mut self.treatment, payload.treatment);
        merge_opt(&mut self.notes, payload.notes);
        self.updated_at = now;
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn matches(&self, filter: &PatientRecordFilter) -> bool {
        matches_id(filter.patient_id.as_deref(), Some(self.patient_id.as_str()))
            && matches_id(filter.doctor_id.as_deref(), self.doctor_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now_utc;
    use serde_json::json;

    #[test]
    fn record_without_doctor_only_matches_unfiltered_doctor() {
        let payload: CreatePatientRecord = serde_json::from_value(json!({
            "patientId": "p1", "diagnosis": "Seasonal allergies"
        }))
        .unwrap();
        assert!(payload.validate().is_ok());
        let record = PatientRecord::from_create("r1".into(), now_utc(), payload);

        assert!(record.matches(&PatientRecordFilter {
            patient_id: Some("p1".into()),
            doctor_id: None,
        }));
        assert!(!record.matches(&PatientRecordFilter {
            patient_id: None,
            doctor_id: Some("d1".into()),
        }));
    }

    #[test]
    fn blank_diagnosis_is_rejected() {
        let payload: CreatePatientRecord =
            serde_json::from_value(json!({ "patientId": "p1", "diagnosis": "" })).unwrap();
        assert!(payload.validate().is_err());

        let update: UpdatePatientRecord =
            serde_json::from_value(json!({ "diagnosis": "  " })).unwrap();
        assert!(update.validate().is_err());
    }
}
