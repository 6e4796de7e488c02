pub mod crud;
pub mod nested;

use axum::Router;
use clinic_core::{Appointment, Doctor, Medication, Patient, PatientRecord};

use crate::server::AppState;

/// Every entity route: the five collections plus nested child listings.
pub fn entity_routes() -> Router<AppState> {
    Router::new()
        .merge(crud::routes::<Doctor>())
        .merge(crud::routes::<Patient>())
        .merge(crud::routes::<Appointment>())
        .merge(crud::routes::<PatientRecord>())
        .merge(crud::routes::<Medication>())
        .merge(nested::routes())
}
