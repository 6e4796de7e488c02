use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Entity, EntityKind, merge, merge_opt};
use crate::error::Result;
use crate::time::{ClinicDate, Timestamp};
use crate::validate::{Validate, matches_id, optional_text, require_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub scheduled_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointment {
    pub patient_id: String,
    pub doctor_id: String,
    pub scheduled_at: Timestamp,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointment {
    pub patient_id: Option<String>,
    pub doctor_id: Option<String>,
    pub scheduled_at: Option<Timestamp>,
    pub reason: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppointmentFilter {
    pub patient_id: Option<String>,
    pub doctor_id: Option<String>,
    pub status: Option<AppointmentStatus>,
    /// Matches the UTC calendar date of `scheduledAt`.
    pub date: Option<ClinicDate>,
}

impl Validate for CreateAppointment {
    fn validate(&self) -> Result<()> {
        require_text("patientId", &self.patient_id)?;
        require_text("doctorId", &self.doctor_id)?;
        optional_text("reason", self.reason.as_deref())?;
        optional_text("notes", self.notes.as_deref())
    }
}

impl Validate for UpdateAppointment {
    fn validate(&self) -> Result<()> {
        optional_text("patientId", self.patient_id.as_deref())?;
        optional_text("doctorId", self.doctor_id.as_deref())?;
        optional_text("reason", self.reason.as_deref())?;
        optional_text("notes", self.notes.as_deref())
    }
}

impl Entity for Appointment {
    type Create = CreateAppointment;
    type Update = UpdateAppointment;
    type Filter = AppointmentFilter;

    const KIND: EntityKind = EntityKind::Appointment;

    fn from_create(id: String, now: Timestamp, payload: CreateAppointment) -> Self {
        Self {
            id,
            patient_id: payload.patient_id,
            doctor_id: payload.doctor_id,
            scheduled_at: payload.scheduled_at,
            reason: payload.reason,
            status: payload.status.unwrap_or_default(),
            notes: payload.notes,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, payload: UpdateAppointment, now: Timestamp) {
        merge(&mut self.patient_id, payload.patient_id);
        merge(&mut self.doctor_id, payload.doctor_id);
        merge(&mut self.scheduled_at, payload.scheduled_at);
        merge_opt(&mut self.reason, payload.reason);
        merge(&mut self.status, payload.status);
        merge_opt(&mut self.notes, payload.notes);
        self.updated_at = now;
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn matches(&self, filter: &AppointmentFilter) -> bool {
        matches_id(filter.patient_id.as_deref(), Some(self.patient_id.as_str()))
            && matches_id(filter.doctor_id.as_deref(), Some(self.doctor_id.as_str()))
            && filter.status.is_none_or(|s| s == self.status)
            && filter.date.is_none_or(|d| d == self.scheduled_at.utc_date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now_utc;
    use serde_json::json;

    fn checkup() -> Appointment {
        let payload: CreateAppointment = serde_json::from_value(json!({
            "patientId": "p1",
            "doctorId": "d1",
            "scheduledAt": "2024-05-02T10:00:00Z",
            "reason": "Annual checkup"
        }))
        .unwrap();
        Appointment::from_create("a1".into(), now_utc(), payload)
    }

    #[test]
    fn status_defaults_to_scheduled() {
        let appt = checkup();
        assert_eq!(appt.status, AppointmentStatus::Scheduled);
        assert_eq!(serde_json::to_value(&appt).unwrap()["status"], "scheduled");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let bad = serde_json::from_value::<CreateAppointment>(json!({
            "patientId": "p1", "doctorId": "d1",
            "scheduledAt": "2024-05-02T10:00:00Z", "status": "pending"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn update_changes_status_and_keeps_references() {
        let mut appt = checkup();
        let update: UpdateAppointment =
            serde_json::from_value(json!({ "status": "cancelled" })).unwrap();
        assert!(update.validate().is_ok());
        appt.apply_update(update, now_utc());
        assert_eq!(appt.status, AppointmentStatus::Cancelled);
        assert_eq!(appt.patient_id, "p1");
        assert_eq!(appt.reason.as_deref(), Some("Annual checkup"));
    }

    #[test]
    fn filter_by_references_status_and_date() {
        let appt = checkup();
        let on_day = AppointmentFilter {
            patient_id: Some("p1".into()),
            date: Some("2024-05-02".parse().unwrap()),
            ..Default::default()
        };
        assert!(appt.matches(&on_day));

        let other_day = AppointmentFilter {
            date: Some("2024-05-03".parse().unwrap()),
            ..Default::default()
        };
        assert!(!appt.matches(&other_day));

        let completed = AppointmentFilter {
            status: Some(AppointmentStatus::Completed),
            ..Default::default()
        };
        assert!(!appt.matches(&completed));

        let other_doctor = AppointmentFilter {
            doctor_id: Some("d2".into()),
            ..Default::default()
        };
        assert!(!appt.matches(&other_doctor));
    }
}
