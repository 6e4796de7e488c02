use std::collections::BTreeMap;

use clinic_core::{Appointment, Doctor, Entity, EntityKind, Medication, Patient, PatientRecord};
use clinic_storage::{DynMap, StorageConfig, StorageError, open_map};

/// One persistent map per entity collection.
pub struct ClinicStore {
    doctors: DynMap<Doctor>,
    patients: DynMap<Patient>,
    appointments: DynMap<Appointment>,
    records: DynMap<PatientRecord>,
    medications: DynMap<Medication>,
    backend: String,
}

impl ClinicStore {
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        let store = Self {
            doctors: open_map(config, EntityKind::Doctor.collection())?,
            patients: open_map(config, EntityKind::Patient.collection())?,
            appointments: open_map(config, EntityKind::Appointment.collection())?,
            records: open_map(config, EntityKind::PatientRecord.collection())?,
            medications: open_map(config, EntityKind::Medication.collection())?,
            backend: config.backend.to_string(),
        };
        tracing::info!(backend = %store.backend, "clinic store opened");
        Ok(store)
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Number of entries per collection, keyed by collection name.
    pub async fn counts(&self) -> Result<BTreeMap<&'static str, usize>, StorageError> {
        let mut counts = BTreeMap::new();
        counts.insert(Doctor::KIND.collection(), self.doctors.len().await?);
        counts.insert(Patient::KIND.collection(), self.patients.len().await?);
        counts.insert(Appointment::KIND.collection(), self.appointments.len().await?);
        counts.insert(PatientRecord::KIND.collection(), self.records.len().await?);
        counts.insert(Medication::KIND.collection(), self.medications.len().await?);
        Ok(counts)
    }
}

/// An entity with a collection in [`ClinicStore`].
pub trait Stored: Entity {
    fn collection(store: &ClinicStore) -> &DynMap<Self>;
}

impl Stored for Doctor {
    fn collection(store: &ClinicStore) -> &DynMap<Self> {
        &store.doctors
    }
}

impl Stored for Patient {
    fn collection(store: &ClinicStore) -> &DynMap<Self> {
        &store.patients
    }
}

impl Stored for Appointment {
    fn collection(store: &ClinicStore) -> &DynMap<Self> {
        &store.appointments
    }
}

impl Stored for PatientRecord {
    fn collection(store: &ClinicStore) -> &DynMap<Self> {
        &store.records
    }
}

impl Stored for Medication {
    fn collection(store: &ClinicStore) -> &DynMap<Self> {
        &store.medications
    }
}
