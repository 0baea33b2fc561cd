//! Abstract persistence contract for the registry.
//!
//! The core consumes storage only through this trait: get/put/delete keyed by
//! `Account.email` and `Event.event_name`, closure-based single-entity
//! updates, a guarded membership insert that checks the account row and
//! unions the email in one critical section, and one multi-key transaction
//! primitive used exclusively by the account-deletion cascade.
//! Implementations must serialize mutations that
//! touch the same entity (two concurrent set-unions on one event must both
//! survive) and are expected to retry transient faults a bounded number of
//! times before surfacing [`StoreError::Unavailable`]; the core itself never
//! retries.

use thiserror::Error;

use super::model::{Account, Event};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Which membership set on an event a guarded insert targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberSet {
    /// `users_assigned`; holds only role=user accounts.
    Users,
    /// `admins_joined`; holds only leader (admin/chief) accounts.
    Admins,
}

/// Outcome of [`Store::insert_event_member`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberInsert {
    /// The email is in the set, whether it was added now or already there
    /// (set-union semantics).
    Inserted,
    MissingAccount,
    MissingEvent,
    /// The account exists but its role does not match the target set.
    WrongRole,
}

pub trait Store: Send + Sync {
    /// Insert a new account. Returns `false` without writing when the email
    /// key already exists.
    fn insert_account(&self, account: Account) -> Result<bool, StoreError>;

    fn get_account(&self, email: &str) -> Result<Option<Account>, StoreError>;

    fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Apply `mutate` to the stored account under the entity's write lock.
    /// Returns `false` when the account does not exist.
    fn update_account(
        &self,
        email: &str,
        mutate: &mut dyn FnMut(&mut Account),
    ) -> Result<bool, StoreError>;

    /// Remove the account and scrub its email from every event's membership
    /// sets in one transaction; no reader may observe the intermediate state.
    /// Returns `false` when the account does not exist.
    fn delete_account_cascade(&self, email: &str) -> Result<bool, StoreError>;

    /// Insert a new event. Returns `false` without writing when the name key
    /// already exists.
    fn insert_event(&self, event: Event) -> Result<bool, StoreError>;

    fn get_event(&self, event_name: &str) -> Result<Option<Event>, StoreError>;

    fn list_events(&self) -> Result<Vec<Event>, StoreError>;

    /// Union `email` into one of the event's membership sets, verifying in
    /// the same critical section that the account row exists and its role
    /// matches the set. The check and the insert must not be separable: a
    /// concurrent account-deletion cascade may land before or after this
    /// call, never between the check and the union, so a removed email can
    /// never be re-inserted into a set.
    fn insert_event_member(
        &self,
        event_name: &str,
        email: &str,
        set: MemberSet,
    ) -> Result<MemberInsert, StoreError>;

    /// Membership sets live on the event, so this is a single-key removal.
    /// Returns `false` when the event does not exist.
    fn delete_event(&self, event_name: &str) -> Result<bool, StoreError>;
}
