use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind, merge, merge_opt};
use crate::error::{CoreError, Result};
use crate::time::{ClinicDate, Timestamp};
use crate::validate::{Validate, matches_id, matches_substring, optional_text, require_text};

/// A medication prescribed to a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub patient_id: String,
    pub name: String,
    pub dosage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    /// Doctor id of the prescriber.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescribed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<ClinicDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<ClinicDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedication {
    pub patient_id: String,
    pub name: String,
    pub dosage: String,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub prescribed_by: Option<String>,
    #[serde(default)]
    pub start_date: Option<ClinicDate>,
    #[serde(default)]
    pub end_date: Option<ClinicDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedication {
    pub patient_id: Option<String>,
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub prescribed_by: Option<String>,
    pub start_date: Option<ClinicDate>,
    pub end_date: Option<ClinicDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MedicationFilter {
    pub patient_id: Option<String>,
    pub name: Option<String>,
    pub prescribed_by: Option<String>,
}

/// Both dates are optional; when both are sent the range must not be reversed.
fn check_range(start: Option<ClinicDate>, end: Option<ClinicDate>) -> Result<()> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(CoreError::invalid_field(
            "endDate",
            "must not be before startDate",
        )),
        _ => Ok(()),
    }
}

impl Validate for CreateMedication {
    fn validate(&self) -> Result<()> {
        require_text("patientId", &self.patient_id)?;
        require_text("name", &self.name)?;
        require_text("dosage", &self.dosage)?;
        optional_text("frequency", self.frequency.as_deref())?;
        optional_text("prescribedBy", self.prescribed_by.as_deref())?;
        check_range(self.start_date, self.end_date)
    }
}

impl Validate for UpdateMedication {
    fn validate(&self) -> Result<()> {
        optional_text("patientId", self.patient_id.as_deref())?;
        optional_text("name", self.name.as_deref())?;
        optional_text("dosage", self.dosage.as_deref())?;
        optional_text("frequency", self.frequency.as_deref())?;
        optional_text("prescribedBy", self.prescribed_by.as_deref())?;
        check_range(self.start_date, self.end_date)
    }
}

impl Entity for Medication {
    type Create = CreateMedication;
    type Update = UpdateMedication;
    type Filter = MedicationFilter;

    const KIND: EntityKind = EntityKind::Medication;

    fn from_create(id: String, now: Timestamp, payload: CreateMedication) -> Self {
        Self {
            id,
            patient_id: payload.patient_id,
            name: payload.name,
            dosage: payload.dosage,
            frequency: payload.frequency,
            prescribed_by: payload.prescribed_by,
            start_date: payload.start_date,
            end_date: payload.end_date,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, payload: UpdateMedication, now: Timestamp) {
        merge(&mut self.patient_id, payload.patient_id);
        merge(&mut self.name, payload.name);
        merge(&mut self.dosage, payload.dosage);
        merge_opt(&mut self.frequency, payload.frequency);
        merge_opt(&mut self.prescribed_by, payload.prescribed_by);
        merge_opt(&mut self.start_date, payload.start_date);
        merge_opt(&mut self.end_date, payload.end_date);
        self.updated_at = now;
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn matches(&self, filter: &MedicationFilter) -> bool {
        matches_id(filter.patient_id.as_deref(), Some(self.patient_id.as_str()))
            && matches_substring(filter.name.as_deref(), &self.name)
            && matches_id(filter.prescribed_by.as_deref(), self.prescribed_by.as_deref())
    }

    fn check_consistency(&self) -> Result<()> {
        check_range(self.start_date, self.end_date)
    }
}
