use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind, merge, merge_opt};
use crate::error::Result;
use crate::time::{ClinicDate, Timestamp};
use crate::validate::{Validate, matches_exact_opt, matches_substring, optional_text, require_text};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub date_of_birth: ClinicDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatient {
    pub name: String,
    pub date_of_birth: ClinicDate,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatient {
    pub name: Option<String>,
    pub date_of_birth: Option<ClinicDate>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientFilter {
    pub name: Option<String>,
    pub gender: Option<String>,
}

impl Validate for CreatePatient {
    fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        optional_text("gender", self.gender.as_deref())?;
        optional_text("email", self.email.as_deref())?;
        optional_text("phone", self.phone.as_deref())?;
        optional_text("address", self.address.as_deref())
    }
}

impl Validate for UpdatePatient {
    fn validate(&self) -> Result<()> {
        optional_text("name", self.name.as_deref())?;
        optional_text("gender", self.gender.as_deref())?;
        optional_text("email", self.email.as_deref())?;
        optional_text("phone", self.phone.as_deref())?;
        optional_text("address", self.address.as_deref())
    }
}

impl Entity for Patient {
    type Create = CreatePatient;
    type Update = UpdatePatient;
    type Filter = PatientFilter;

    const KIND: EntityKind = EntityKind::Patient;

    fn from_create(id: String, now: Timestamp, payload: CreatePatient) -> Self {
        Self {
            id,
            name: payload.name,
            date_of_birth: payload.date_of_birth,
            gender: payload.gender,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, payload: UpdatePatient, now: Timestamp) {
        merge(&mut self.name, payload.name);
        merge(&mut self.date_of_birth, payload.date_of_birth);
        merge_opt(&mut self.gender, payload.gender);
        merge_opt(&mut self.email, payload.email);
        merge_opt(&mut self.phone, payload.phone);
        merge_opt(&mut self.address, payload.address);
        self.updated_at = now;
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn matches(&self, filter: &PatientFilter) -> bool {
        matches_substring(filter.name.as_deref(), &self.name)
            && matches_exact_opt(filter.gender.as_deref(), self.gender.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now_utc;
    use serde_json::json;

    #[test]
    fn date_of_birth_must_be_a_calendar_date() {
        let bad = serde_json::from_value::<CreatePatient>(json!({
            "name": "Jane Doe", "dateOfBirth": "01/02/1990"
        }));
        assert!(bad.is_err());

        let good: CreatePatient = serde_json::from_value(json!({
            "name": "Jane Doe", "dateOfBirth": "1990-02-01", "gender": "female"
        }))
        .unwrap();
        assert!(good.validate().is_ok());
        let patient = Patient::from_create("p1".into(), now_utc(), good);
        assert_eq!(
            serde_json::to_value(&patient).unwrap()["dateOfBirth"],
            "1990-02-01"
        );
    }

    #[test]
    fn filter_by_gender_requires_a_value() {
        let payload: CreatePatient =
            serde_json::from_value(json!({ "name": "John Roe", "dateOfBirth": "1970-01-01" }))
                .unwrap();
        let patient = Patient::from_create("p2".into(), now_utc(), payload);
        assert!(patient.matches(&PatientFilter {
            name: Some("roe".into()),
            gender: None,
        }));
        assert!(!patient.matches(&PatientFilter {
            name: None,
            gender: Some("male".into()),
        }));
    }
}
