//! In-memory identity provider

use std::sync::RwLock;

use chrono::{NaiveDate, Utc};

use super::credentials::{PasswordHashing, generate_user_id};
use super::{IdentityFuture, IdentityProvider};
use crate::algorithm::triage::normalize::parse_date_of_birth;
use crate::config::AppConfig;
use crate::error::{Result, TriageError};
use crate::models::types::{Gender, Role};
use crate::models::user::{Principal, Registration, User};

/// Identifier of the configured administrator principal
pub const ADMIN_USER_ID: &str = "admin-user-01";

/// Display name of the configured administrator
pub const ADMIN_DISPLAY_NAME: &str = "Administrator";

/// Message returned after a successful registration
pub const REGISTERED_MESSAGE: &str = "Account created. Please sign in.";

/// Built-in administrator account
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub username: String,
    pub password_hash: String,
}

impl AdminAccount {
    fn principal(&self) -> Principal {
        Principal {
            user_id: ADMIN_USER_ID.to_string(),
            username: self.username.clone(),
            display_name: ADMIN_DISPLAY_NAME.to_string(),
            role: Role::Administrator,
        }
    }
}

/// Identity provider holding accounts in memory
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    users: RwLock<Vec<User>>,
    hashing: PasswordHashing,
    admin: Option<AdminAccount>,
}

impl InMemoryIdentityProvider {
    /// Create a provider without an administrator
    #[must_use]
    pub fn new(hashing: PasswordHashing) -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            hashing,
            admin: None,
        }
    }

    /// Create a provider with the administrator from `config`, if one is set
    pub fn from_config(config: &AppConfig, hashing: PasswordHashing) -> Result<Self> {
        let provider = Self::new(hashing);
        match &config.admin_password {
            Some(password) => provider.with_admin(&config.admin_username, password),
            None => Ok(provider),
        }
    }

    /// Add the built-in administrator account
    pub fn with_admin(mut self, username: &str, password: &str) -> Result<Self> {
        let password_hash = self.hashing.hash(password)?;
        self.admin = Some(AdminAccount {
            username: username.trim().to_string(),
            password_hash,
        });
        Ok(self)
    }

    fn read_users(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<User>>> {
        self.users
            .read()
            .map_err(|_| TriageError::persistence("User registry lock poisoned"))
    }

    fn find_user(&self, identifier: &str) -> Result<Option<User>> {
        let email = identifier.to_lowercase();
        Ok(self
            .read_users()?
            .iter()
            .find(|user| {
                user.username == identifier
                    || user.email.as_deref() == Some(email.as_str())
                    || user.phone.as_deref() == Some(identifier)
            })
            .cloned())
    }

    /// Hash `password` on the blocking pool
    async fn hash_password(&self, password: String) -> Result<String> {
        let hashing = self.hashing.clone();
        tokio::task::spawn_blocking(move || hashing.hash(&password))
            .await
            .map_err(|e| TriageError::Credential(format!("Password hashing task failed: {e}")))?
    }

    /// Check `password` against `phc` on the blocking pool
    async fn verify_password(&self, password: &str, phc: String) -> Result<bool> {
        let hashing = self.hashing.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hashing.verify(&password, &phc))
            .await
            .map_err(|e| TriageError::Credential(format!("Password check task failed: {e}")))?
    }

    async fn create_user(&self, registration: &Registration, today: NaiveDate) -> Result<User> {
        let form = ValidatedRegistration::parse(registration, today)?;

        // Hash before taking the write lock.
        let password_hash = self.hash_password(form.password.clone()).await?;

        let mut users = self
            .users
            .write()
            .map_err(|_| TriageError::persistence("User registry lock poisoned"))?;
        let taken = users.iter().any(|user| {
            user.username == form.username
                || (form.email.is_some() && user.email == form.email)
                || (form.phone.is_some() && user.phone == form.phone)
        });
        let admin_name = self.admin.as_ref().is_some_and(|a| a.username == form.username);
        if taken || admin_name {
            return Err(TriageError::Conflict(
                "Username, email, or phone already in use".to_string(),
            ));
        }

        let user = User {
            id: generate_user_id(),
            name: form.name,
            username: form.username,
            email: form.email,
            phone: form.phone,
            birth_place: form.birth_place,
            institution: form.institution,
            date_of_birth: form.date_of_birth,
            gender: form.gender,
            password_hash,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn check_credentials(&self, identifier: &str, password: &str) -> Result<Principal> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(TriageError::InvalidCredentials);
        }

        let (principal, password_hash) =
            if let Some(admin) = self.admin.as_ref().filter(|a| a.username == identifier) {
                (admin.principal(), admin.password_hash.clone())
            } else {
                let user = self
                    .find_user(identifier)?
                    .ok_or(TriageError::InvalidCredentials)?;
                let principal = Principal {
                    user_id: user.id,
                    username: user.username,
                    display_name: user.name,
                    role: Role::User,
                };
                (principal, user.password_hash)
            };

        if self.verify_password(password, password_hash).await? {
            Ok(principal)
        } else {
            Err(TriageError::InvalidCredentials)
        }
    }
}

impl IdentityProvider for InMemoryIdentityProvider {
    fn register<'a>(&'a self, registration: Registration) -> IdentityFuture<'a, User> {
        Box::pin(async move {
            let user = self
                .create_user(&registration, Utc::now().date_naive())
                .await?;
            log::info!("Registered account {}", user.id);
            Ok(user)
        })
    }

    fn authenticate<'a>(
        &'a self,
        identifier: &'a str,
        password: &'a str,
    ) -> IdentityFuture<'a, Principal> {
        Box::pin(async move {
            let result = self.check_credentials(identifier, password).await;
            if let Err(TriageError::InvalidCredentials) = &result {
                log::warn!("Rejected login attempt");
            }
            result
        })
    }
}

/// Registration after field validation
struct ValidatedRegistration {
    name: String,
    username: String,
    email: Option<String>,
    phone: Option<String>,
    birth_place: String,
    institution: String,
    date_of_birth: NaiveDate,
    gender: Gender,
    password: String,
}

impl ValidatedRegistration {
    fn parse(raw: &Registration, today: NaiveDate) -> Result<Self> {
        let name = required(&raw.name, "name", "Name")?;
        let username = required(&raw.username, "username", "Username")?;

        let contact = raw.email_or_phone.trim();
        if contact.is_empty() {
            return Err(TriageError::validation(
                "emailOrPhone",
                "Email or phone is required",
            ));
        }
        let (email, phone) = if contact.contains('@') {
            (Some(contact.to_lowercase()), None)
        } else {
            (None, Some(contact.to_string()))
        };

        let birth_place = required(&raw.birth_place, "birthPlace", "Birth place")?;
        let institution = required(&raw.institution, "institution", "Institution")?;
        let date_of_birth = parse_date_of_birth(&raw.date_of_birth, today)?;
        let gender: Gender = raw.gender.parse()?;

        if raw.password.is_empty() {
            return Err(TriageError::validation("password", "Password is required"));
        }
        let confirm = raw.confirm_password.as_deref().ok_or_else(|| {
            TriageError::validation("confirmPassword", "Confirm password is required")
        })?;
        if confirm != raw.password {
            return Err(TriageError::validation(
                "confirmPassword",
                "Passwords do not match",
            ));
        }

        Ok(Self {
            name,
            username,
            email,
            phone,
            birth_place,
            institution,
            date_of_birth,
            gender,
            password: raw.password.clone(),
        })
    }
}

fn required(value: &str, field: &str, label: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TriageError::validation(field, format!("{label} is required")));
    }
    Ok(value.to_string())
}
