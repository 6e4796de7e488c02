//! Entity models stored by the clinic server.
//!
//! Each entity is a flat record with a generated `id` and a `createdAt`
//! timestamp. References between entities (`patientId`, `doctorId`) are plain
//! strings; nothing checks that the referenced record exists.

mod appointment;
mod doctor;
mod medication;
mod patient;
mod record;

pub use appointment::{
    Appointment, AppointmentFilter, AppointmentStatus, CreateAppointment, UpdateAppointment,
};
pub use doctor::{CreateDoctor, Doctor, DoctorFilter, UpdateDoctor};
pub use medication::{CreateMedication, Medication, MedicationFilter, UpdateMedication};
pub use patient::{CreatePatient, Patient, PatientFilter, UpdatePatient};
pub use record::{CreatePatientRecord, PatientRecord, PatientRecordFilter, UpdatePatientRecord};

use crate::error::CoreError;
use crate::time::Timestamp;
use crate::validate::Validate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

/// The five record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Doctor,
    Patient,
    Appointment,
    PatientRecord,
    Medication,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Doctor,
        EntityKind::Patient,
        EntityKind::Appointment,
        EntityKind::PatientRecord,
        EntityKind::Medication,
    ];

    /// Human-readable name used in response messages.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Doctor => "Doctor",
            EntityKind::Patient => "Patient",
            EntityKind::Appointment => "Appointment",
            EntityKind::PatientRecord => "Patient record",
            EntityKind::Medication => "Medication",
        }
    }

    /// Plural label, e.g. "Patient records".
    pub fn label_plural(&self) -> &'static str {
        match self {
            EntityKind::Doctor => "Doctors",
            EntityKind::Patient => "Patients",
            EntityKind::Appointment => "Appointments",
            EntityKind::PatientRecord => "Patient records",
            EntityKind::Medication => "Medications",
        }
    }

    /// Collection name; doubles as the URL segment and the storage file stem.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Doctor => "doctors",
            EntityKind::Patient => "patients",
            EntityKind::Appointment => "appointments",
            EntityKind::PatientRecord => "records",
            EntityKind::Medication => "medications",
        }
    }

    /// JSON key holding a single entity in a response envelope.
    pub fn singular_key(&self) -> &'static str {
        match self {
            EntityKind::Doctor => "doctor",
            EntityKind::Patient => "patient",
            EntityKind::Appointment => "appointment",
            EntityKind::PatientRecord => "record",
            EntityKind::Medication => "medication",
        }
    }

    /// JSON key holding a list of entities in a response envelope.
    pub fn plural_key(&self) -> &'static str {
        self.collection()
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|k| k.collection() == s || k.singular_key() == s)
            .ok_or_else(|| CoreError::invalid_entity_kind(s))
    }
}

/// Behaviour shared by every stored entity.
///
/// `Create` carries the required fields, `Update` carries only optional ones
/// and is merged field by field. `Filter` is deserialized from the list
/// endpoint's query string.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Create: DeserializeOwned + Validate + Send + 'static;
    type Update: DeserializeOwned + Validate + Send + 'static;
    type Filter: DeserializeOwned + Default + Send + Sync + 'static;

    const KIND: EntityKind;

    fn from_create(id: String, now: Timestamp, payload: Self::Create) -> Self;

    /// Merges present fields of `payload`; `id` and `createdAt` never change.
    fn apply_update(&mut self, payload: Self::Update, now: Timestamp);

    fn id(&self) -> &str;

    fn created_at(&self) -> Timestamp;

    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Cross-field rules checked on the merged entity after an update.
    fn check_consistency(&self) -> crate::error::Result<()> {
        Ok(())
    }
}

/// Overwrites `target` when `value` is present.
pub(crate) fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

/// Overwrites an optional field when `value` is present.
pub(crate) fn merge_opt<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}
