//! The credential store: account creation and password verification.
//!
//! Secrets stop here. Raw passwords are hashed on the way in and the stored
//! hash never leaves the crate; verification failures do not distinguish
//! unknown emails from wrong passwords.

use std::fmt;
use std::sync::Arc;

use crate::auth::password;
use crate::error::Error;

use super::model::{normalize_email, valid_email, Account, Role};
use super::store::Store;

/// Input for account creation. Comes from self-registration or from a
/// privileged create; the role restriction differs per path and is enforced
/// by the caller, not here.
pub struct NewAccount {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
    pub uniform_required: String,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &"***")
            .field("role", &self.role)
            .field("uniform_required", &self.uniform_required)
            .finish()
    }
}

pub struct Credentials {
    store: Arc<dyn Store>,
    /// Verified against when the email is unknown, so lookups for missing
    /// accounts cost the same as a wrong password.
    dummy_hash: String,
}

impl Credentials {
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the decoy hash cannot be computed.
    pub fn new(store: Arc<dyn Store>) -> Result<Self, Error> {
        let dummy_hash = password::hash("muster-decoy-password")
            .map_err(|_| Error::Validation("failed to initialize credential store".to_string()))?;
        Ok(Self { store, dummy_hash })
    }

    /// Create an account with a hashed password.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for an invalid email or empty password,
    /// - [`Error::DuplicateIdentity`] when the email (case-insensitive) is
    ///   already registered,
    /// - [`Error::StorageUnavailable`] when the store gives up.
    pub fn create(&self, new_account: NewAccount) -> Result<Account, Error> {
        let email = normalize_email(&new_account.email);
        if !valid_email(&email) {
            return Err(Error::Validation("invalid email address".to_string()));
        }
        if new_account.password.is_empty() {
            return Err(Error::Validation("password must not be empty".to_string()));
        }

        let password_hash = password::hash(&new_account.password)
            .map_err(|_| Error::Validation("password could not be hashed".to_string()))?;
        let account = Account {
            email,
            name: new_account.name.trim().to_string(),
            password_hash,
            role: new_account.role,
            uniform_required: new_account.uniform_required,
            achievements: Vec::new(),
        };
        if self.store.insert_account(account.clone())? {
            Ok(account)
        } else {
            Err(Error::DuplicateIdentity)
        }
    }

    /// Check a credential pair and return the matching account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredentials`] for unknown emails and wrong
    /// passwords alike.
    pub fn verify(&self, email: &str, raw_password: &str) -> Result<Account, Error> {
        let email = normalize_email(email);
        let Some(account) = self.store.get_account(&email)? else {
            password::verify(&self.dummy_hash, raw_password);
            return Err(Error::InvalidCredentials);
        };
        if password::verify(&account.password_hash, raw_password) {
            Ok(account)
        } else {
            Err(Error::InvalidCredentials)
        }
    }
}
