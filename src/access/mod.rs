//! The access façade: every state-changing request goes through here in a
//! fixed order — validate session, authorize, execute. The first failure
//! propagates unchanged and nothing partially applies before an earlier
//! check fails.

use std::sync::Arc;

use time::OffsetDateTime;

use crate::auth::policy::{allow, Operation};
use crate::auth::token::{Session, TokenSigner};
use crate::error::Error;
use crate::roster::credentials::{Credentials, NewAccount};
use crate::roster::model::{AccountView, EventView, Role, Stats};
use crate::roster::{Registry, Store};

pub struct Access {
    credentials: Credentials,
    registry: Registry,
    signer: TokenSigner,
}

impl Access {
    /// # Errors
    ///
    /// Returns an error if the credential store cannot initialize.
    pub fn new(store: Arc<dyn Store>, signer: TokenSigner) -> Result<Self, Error> {
        Ok(Self {
            credentials: Credentials::new(store.clone())?,
            registry: Registry::new(store),
            signer,
        })
    }

    /// Self-registration: open to anyone, restricted to admin/user roles.
    /// Chief accounts are never self-created.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for role=chief or invalid input,
    /// - [`Error::DuplicateIdentity`] for an existing email.
    pub fn register(&self, new_account: NewAccount) -> Result<(AccountView, String), Error> {
        if new_account.role == Role::Chief {
            return Err(Error::Validation(
                "chief accounts cannot be self-registered".to_string(),
            ));
        }
        let account = self.credentials.create(new_account)?;
        let token = self.signer.issue(&account, OffsetDateTime::now_utc())?;
        let view = self.registry.account_view(&account.email)?;
        Ok((view, token))
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidCredentials`] for unknown emails and wrong
    /// passwords alike.
    pub fn login(&self, email: &str, raw_password: &str) -> Result<(AccountView, String), Error> {
        let account = self.credentials.verify(email, raw_password)?;
        let token = self.signer.issue(&account, OffsetDateTime::now_utc())?;
        let view = self.registry.account_view(&account.email)?;
        Ok((view, token))
    }

    /// # Errors
    ///
    /// [`Error::Unauthenticated`], or [`Error::NotFound`] if the subject
    /// account was deleted while the token was still live.
    pub fn me(&self, token: &str) -> Result<AccountView, Error> {
        let session = self.authorize(token, Operation::ReadOwnProfile)?;
        self.registry.account_view(&session.subject_email)
    }

    /// Privileged account creation; the policy table denies role=chief for
    /// every caller.
    ///
    /// # Errors
    ///
    /// [`Error::Unauthenticated`], [`Error::Forbidden`], or any
    /// [`Credentials::create`] failure.
    pub fn create_account(&self, token: &str, new_account: NewAccount) -> Result<AccountView, Error> {
        self.authorize(token, Operation::CreateAccount(new_account.role))?;
        let account = self.credentials.create(new_account)?;
        self.registry.account_view(&account.email)
    }

    /// # Errors
    ///
    /// [`Error::Unauthenticated`], [`Error::Forbidden`], or
    /// [`Error::NotFound`].
    pub fn delete_account(&self, token: &str, email: &str) -> Result<(), Error> {
        self.authorize(token, Operation::DeleteAccount)?;
        self.registry.delete_account(email)
    }

    /// # Errors
    ///
    /// [`Error::Unauthenticated`], [`Error::Forbidden`],
    /// [`Error::NotFound`], or [`Error::Validation`] for empty text.
    pub fn append_achievement(&self, token: &str, email: &str, text: &str) -> Result<(), Error> {
        self.authorize(token, Operation::AppendAchievement)?;
        self.registry.append_achievement(email, text)
    }

    /// # Errors
    ///
    /// [`Error::Unauthenticated`] or [`Error::Forbidden`].
    pub fn list_accounts(&self, token: &str) -> Result<Vec<AccountView>, Error> {
        self.authorize(token, Operation::ReadAccounts)?;
        self.registry.list_accounts()
    }

    /// # Errors
    ///
    /// [`Error::Unauthenticated`], [`Error::Forbidden`], or
    /// [`Error::DuplicateIdentity`].
    pub fn create_event(
        &self,
        token: &str,
        event_name: &str,
        date: &str,
        description: &str,
    ) -> Result<EventView, Error> {
        let session = self.authorize(token, Operation::CreateEvent)?;
        self.registry
            .create_event(event_name, date, description, &session.subject_email)
    }

    /// # Errors
    ///
    /// [`Error::Unauthenticated`], [`Error::Forbidden`], or
    /// [`Error::NotFound`].
    pub fn delete_event(&self, token: &str, event_name: &str) -> Result<(), Error> {
        self.authorize(token, Operation::DeleteEvent)?;
        self.registry.delete_event(event_name)
    }

    /// # Errors
    ///
    /// [`Error::Unauthenticated`] only; event listing is open to every role.
    pub fn list_events(&self, token: &str) -> Result<Vec<EventView>, Error> {
        self.authorize(token, Operation::ReadEvents)?;
        self.registry.list_events()
    }

    /// Assign an arbitrary role=user account to an event.
    ///
    /// # Errors
    ///
    /// [`Error::Unauthenticated`], [`Error::Forbidden`],
    /// [`Error::NotFound`], or [`Error::RoleMismatch`].
    pub fn assign_user(&self, token: &str, event_name: &str, user_email: &str) -> Result<(), Error> {
        self.authorize(token, Operation::AssignUser)?;
        self.registry.assign_user(event_name, user_email)
    }

    /// Join an event as the calling leader. The subject comes from the
    /// session, never from the request.
    ///
    /// # Errors
    ///
    /// [`Error::Unauthenticated`], [`Error::Forbidden`], or
    /// [`Error::NotFound`].
    pub fn join_event(&self, token: &str, event_name: &str) -> Result<(), Error> {
        let session = self.authorize(token, Operation::JoinEvent)?;
        self.registry.join_as_admin(event_name, &session.subject_email)
    }

    /// # Errors
    ///
    /// [`Error::Unauthenticated`] or [`Error::Forbidden`].
    pub fn stats(&self, token: &str) -> Result<Stats, Error> {
        self.authorize(token, Operation::ReadAccounts)?;
        self.registry.compute_stats()
    }

    /// Session validation strictly precedes the role check: a caller without
    /// a valid session always sees `Unauthenticated`, never `Forbidden`.
    fn authorize(&self, token: &str, operation: Operation) -> Result<Session, Error> {
        let session = self
            .signer
            .validate(token, OffsetDateTime::now_utc())
            .map_err(Error::Unauthenticated)?;
        if !allow(session.role, operation) {
            return Err(Error::Forbidden);
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::TokenError;
    use crate::roster::MemoryStore;
    use secrecy::SecretString;

    fn access() -> Access {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let signer = TokenSigner::new(SecretString::from("test-secret".to_string()), 3600);
        Access::new(store, signer).expect("access facade")
    }

    fn new_account(email: &str, role: Role) -> NewAccount {
        NewAccount {
            email: email.to_string(),
            name: "Someone".to_string(),
            password: "hunter2".to_string(),
            role,
            uniform_required: "Standard Scout Uniform".to_string(),
        }
    }

    #[test]
    fn register_rejects_chief_role() {
        let access = access();
        assert!(matches!(
            access.register(new_account("boss@x.com", Role::Chief)),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn invalid_session_beats_forbidden() {
        let access = access();
        // A plain user would be Forbidden, but garbage tokens must read as
        // Unauthenticated so policy is not leaked to anonymous callers.
        assert_eq!(
            access.delete_event("garbage", "Camp").err(),
            Some(Error::Unauthenticated(TokenError::Malformed))
        );
    }

    #[test]
    fn user_role_is_forbidden_from_mutations() -> Result<(), Error> {
        let access = access();
        let (_view, token) = access.register(new_account("alice@x.com", Role::User))?;

        assert_eq!(access.create_event(&token, "Camp", "2026-06-01", "").err(), Some(Error::Forbidden));
        assert_eq!(access.delete_account(&token, "alice@x.com").err(), Some(Error::Forbidden));
        assert_eq!(access.assign_user(&token, "Camp", "alice@x.com").err(), Some(Error::Forbidden));
        assert_eq!(access.join_event(&token, "Camp").err(), Some(Error::Forbidden));
        assert_eq!(access.list_accounts(&token).err(), Some(Error::Forbidden));
        assert_eq!(access.stats(&token).err(), Some(Error::Forbidden));

        // Open reads still work for users.
        assert!(access.list_events(&token).is_ok());
        assert_eq!(access.me(&token)?.email, "alice@x.com");
        Ok(())
    }

    #[test]
    fn admin_cannot_create_chief_accounts() -> Result<(), Error> {
        let access = access();
        let (_view, token) = access.register(new_account("admin@x.com", Role::Admin))?;
        assert_eq!(
            access.create_account(&token, new_account("boss@x.com", Role::Chief)).err(),
            Some(Error::Forbidden)
        );
        Ok(())
    }

    #[test]
    fn me_reports_not_found_after_account_deletion() -> Result<(), Error> {
        let access = access();
        let (_view, admin) = access.register(new_account("admin@x.com", Role::Admin))?;
        let (_view, user_token) = access.register(new_account("bob@x.com", Role::User))?;

        access.delete_account(&admin, "bob@x.com")?;
        // The stateless token is still signed and unexpired, but the subject
        // is gone.
        assert_eq!(access.me(&user_token).err(), Some(Error::NotFound));
        Ok(())
    }
}
