pub mod entity;
pub mod error;
pub mod id;
pub mod query;
pub mod time;
pub mod validate;

pub use entity::{
    Appointment, AppointmentFilter, AppointmentStatus, CreateAppointment, CreateDoctor,
    CreateMedication, CreatePatient, CreatePatientRecord, Doctor, DoctorFilter, Entity,
    EntityKind, Medication, MedicationFilter, Patient, PatientFilter, PatientRecord,
    PatientRecordFilter, UpdateAppointment, UpdateDoctor, UpdateMedication, UpdatePatient,
    UpdatePatientRecord,
};
pub use error::{CoreError, ErrorCategory, Result};
pub use id::{IdError, generate_id, validate_id};
pub use query::{Page, PageBounds, PageInfo, PageRequest, PageWindow, paginate};
pub use crate::time::{ClinicDate, Timestamp, now_utc};
pub use validate::Validate;
