//! User model and create-payload validation

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::prescription::Prescription;
use super::validation::{check_email, check_min_len, check_not_empty, FieldError};

/// Stored as TEXT; the three accepted values round-trip verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Other" => Ok(Self::Other),
            _ => Err(FieldError::InvalidVariant {
                field: "sex",
                value: s.to_owned(),
            }),
        }
    }
}

/// A user with their prescriptions, as served by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phno: String,
    /// Free-form in the historical schema; only checked for non-emptiness.
    pub age: String,
    pub sex: Sex,
    pub address: String,
    pub medical_concern: Vec<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub prescriptions: Vec<Prescription>,
}

/// Untyped create payload, straight from the request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phno: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub medical_concern: Option<Vec<String>>,
}

/// Narrowed create payload, ready for insertion.
#[derive(Debug, Clone)]
pub struct ValidUser {
    pub name: String,
    pub age: String,
    pub email: String,
    pub phno: String,
    pub address: String,
    pub sex: Sex,
    pub medical_concern: Vec<String>,
}

impl NewUser {
    /// Check every constraint and collect all failures.
    pub fn validate(self) -> Result<ValidUser, Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Err(e) = check_min_len("name", &self.name, 2) {
            errors.push(e);
        }
        if let Err(e) = check_not_empty("age", &self.age) {
            errors.push(e);
        }
        if let Err(e) = check_email("email", &self.email) {
            errors.push(e);
        }
        if let Err(e) = check_min_len("phno", &self.phno, 10) {
            errors.push(e);
        }
        if let Err(e) = check_min_len("address", &self.address, 5) {
            errors.push(e);
        }

        let sex = match self.sex.parse::<Sex>() {
            Ok(sex) => Some(sex),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidUser {
            name: self.name,
            age: self.age,
            email: self.email,
            phno: self.phno,
            address: self.address,
            sex: sex.expect("no errors collected"),
            medical_concern: self.medical_concern.unwrap_or_default(),
        })
    }
}
