use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind, merge, merge_opt};
use crate::error::Result;
use crate::time::Timestamp;
use crate::validate::{Validate, matches_exact, matches_substring, optional_text, require_text};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctor {
    pub name: String,
    pub specialty: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctor {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DoctorFilter {
    pub specialty: Option<String>,
    pub name: Option<String>,
}

impl Validate for CreateDoctor {
    fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_text("specialty", &self.specialty)?;
        optional_text("email", self.email.as_deref())?;
        optional_text("phone", self.phone.as_deref())
    }
}

impl Validate for UpdateDoctor {
    fn validate(&self) -> Result<()> {
        optional_text("name", self.name.as_deref())?;
        optional_text("specialty", self.specialty.as_deref())?;
        optional_text("email", self.email.as_deref())?;
        optional_text("phone", self.phone.as_deref())
    }
}

impl Entity for Doctor {
    type Create = CreateDoctor;
    type Update = UpdateDoctor;
    type Filter = DoctorFilter;

    const KIND: EntityKind = EntityKind::Doctor;

    fn from_create(id: String, now: Timestamp, payload: CreateDoctor) -> Self {
        Self {
            id,
            name: payload.name,
            specialty: payload.specialty,
            email: payload.email,
            phone: payload.phone,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, payload: UpdateDoctor, now: Timestamp) {
        merge(&mut self.name, payload.name);
        merge(&mut self.specialty, payload.specialty);
        merge_opt(&mut self.email, payload.email);
        merge_opt(&mut self.phone, payload.phone);
        self.updated_at = now;
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn matches(&self, filter: &DoctorFilter) -> bool {
        matches_exact(filter.specialty.as_deref(), &self.specialty)
            && matches_substring(filter.name.as_deref(), &self.name)
    }
}
