//! Child collections listed under their parent, e.g. `/patients/{id}/records`.
//!
//! The parent must exist; the foreign key from the path overrides any filter
//! of the same name in the query string.

use axum::{Router, extract::State, routing::get};
use clinic_api::{ApiError, ApiPath, ApiQuery, ApiResponse};
use clinic_core::{
    Appointment, AppointmentFilter, Doctor, Medication, MedicationFilter, PageRequest, Patient,
    PatientRecord, PatientRecordFilter,
};

use super::crud::{fetch, list_page};
use crate::server::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/patients/{id}/appointments", get(patient_appointments))
        .route("/patients/{id}/records", get(patient_records))
        .route("/patients/{id}/medications", get(patient_medications))
        .route("/doctors/{id}/appointments", get(doctor_appointments))
}

async fn patient_appointments(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiQuery(page): ApiQuery<PageRequest>,
    ApiQuery(mut filter): ApiQuery<AppointmentFilter>,
) -> Result<ApiResponse, ApiError> {
    fetch::<Patient>(&state, &id).await?;
    filter.patient_id = Some(id);
    list_page::<Appointment>(&state, page, &filter).await
}

async fn patient_records(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiQuery(page): ApiQuery<PageRequest>,
    ApiQuery(mut filter): ApiQuery<PatientRecordFilter>,
) -> Result<ApiResponse, ApiError> {
    fetch::<Patient>(&state, &id).await?;
    filter.patient_id = Some(id);
    list_page::<PatientRecord>(&state, page, &filter).await
}

async fn patient_medications(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiQuery(page): ApiQuery<PageRequest>,
    ApiQuery(mut filter): ApiQuery<MedicationFilter>,
) -> Result<ApiResponse, ApiError> {
    fetch::<Patient>(&state, &id).await?;
    filter.patient_id = Some(id);
    list_page::<Medication>(&state, page, &filter).await
}

async fn doctor_appointments(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiQuery(page): ApiQuery<PageRequest>,
    ApiQuery(mut filter): ApiQuery<AppointmentFilter>,
) -> Result<ApiResponse, ApiError> {
    fetch::<Doctor>(&state, &id).await?;
    filter.doctor_id = Some(id);
    list_page::<Appointment>(&state, page, &filter).await
}
