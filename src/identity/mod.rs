//! Clinician identity: registration, credential checks and sessions

pub mod credentials;
pub mod memory;
pub mod sessions;

use futures::future::BoxFuture;

use crate::error::Result;
use crate::models::user::{Principal, Registration, User};

pub use credentials::PasswordHashing;
pub use memory::{AdminAccount, InMemoryIdentityProvider};
pub use sessions::SessionStore;

/// Future returned by `IdentityProvider` methods
pub type IdentityFuture<'a, T> = BoxFuture<'a, Result<T>>;

/// Account registry and credential verification
pub trait IdentityProvider: Send + Sync {
    /// Validate and store a new clinician account
    fn register<'a>(&'a self, registration: Registration) -> IdentityFuture<'a, User>;

    /// Check `password` for the account named by `identifier` (email, phone
    /// or username)
    ///
    /// Fails with `InvalidCredentials` for unknown accounts and wrong
    /// passwords alike.
    fn authenticate<'a>(
        &'a self,
        identifier: &'a str,
        password: &'a str,
    ) -> IdentityFuture<'a, Principal>;
}
