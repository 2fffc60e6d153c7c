//! Clinician accounts and session principals

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::types::{Gender, Role};

/// A registered clinician account
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque identifier, referenced by `PatientRecord::owner_id`
    pub id: String,
    pub name: String,
    pub username: String,
    /// Lowercased email address, if registered with one
    pub email: Option<String>,
    /// Phone number, if registered with one
    pub phone: Option<String>,
    pub birth_place: String,
    pub institution: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    /// Argon2 PHC string; never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The authenticated caller, passed explicitly to every service operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub role: Role,
}

impl Principal {
    /// Whether the caller has administrative access
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }
}

/// Sign-up request
///
/// Field aliases accept the spellings older sign-up forms used.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "userName")]
    pub username: String,
    /// Email address or phone number; contains `@` for email
    #[serde(default, alias = "email", alias = "phone", alias = "identifier")]
    pub email_or_phone: String,
    #[serde(default, alias = "placeOfBirth")]
    pub birth_place: String,
    #[serde(default, alias = "organization")]
    pub institution: String,
    #[serde(default, alias = "dob")]
    pub date_of_birth: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "passwordConfirm", alias = "password2")]
    pub confirm_password: Option<String>,
}

/// Issued bearer session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub principal: Principal,
}
