//! Membership registry operations over the abstract store.
//!
//! Owns the Event↔Account relationship graph: assignment and join relations
//! live on events, achievement lists on accounts, and the derived
//! `events_joined_count` is computed here at query time so it can never drift.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::Error;

use super::model::{
    normalize_email, Account, AccountView, Event, EventView, Role, Stats,
};
use super::store::{MemberInsert, MemberSet, Store};

pub struct Registry {
    store: Arc<dyn Store>,
}

impl Registry {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// - [`Error::Validation`] for an empty event name,
    /// - [`Error::DuplicateIdentity`] when the name already exists.
    pub fn create_event(
        &self,
        event_name: &str,
        date: &str,
        description: &str,
        created_by: &str,
    ) -> Result<EventView, Error> {
        let event_name = event_name.trim();
        if event_name.is_empty() {
            return Err(Error::Validation("event name must not be empty".to_string()));
        }
        let event = Event {
            event_name: event_name.to_string(),
            date: date.to_string(),
            description: description.to_string(),
            created_by: normalize_email(created_by),
            users_assigned: BTreeSet::new(),
            admins_joined: BTreeSet::new(),
        };
        let view = EventView::from(&event);
        if self.store.insert_event(event)? {
            Ok(view)
        } else {
            Err(Error::DuplicateIdentity)
        }
    }

    /// Membership sets live on the event, so this is one atomic removal with
    /// no account writes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the event does not exist.
    pub fn delete_event(&self, event_name: &str) -> Result<(), Error> {
        if self.store.delete_event(event_name.trim())? {
            Ok(())
        } else {
            Err(Error::NotFound)
        }
    }

    /// Assign a role=user account to an event. Idempotent set-union: assigning
    /// an already-assigned user is a no-op success. The account check and the
    /// union are one store-level critical section, so an assignment racing an
    /// account deletion can never re-insert the deleted email.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] when the event or account is missing,
    /// - [`Error::RoleMismatch`] when the target account is not role=user.
    pub fn assign_user(&self, event_name: &str, user_email: &str) -> Result<(), Error> {
        let email = normalize_email(user_email);
        member_result(
            self.store
                .insert_event_member(event_name.trim(), &email, MemberSet::Users)?,
        )
    }

    /// Add a leader to an event's `admins_joined` set, idempotently. Policy
    /// restricts the caller to admin/chief; the store still refuses
    /// role=user accounts to keep the set invariant local.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] when the event or account is missing,
    /// - [`Error::RoleMismatch`] when the account is not a leader.
    pub fn join_as_admin(&self, event_name: &str, caller_email: &str) -> Result<(), Error> {
        let email = normalize_email(caller_email);
        member_result(
            self.store
                .insert_event_member(event_name.trim(), &email, MemberSet::Admins)?,
        )
    }

    /// Append a badge. Not deduplicated: a badge may be earned more than once
    /// and ordering is earn order.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for empty text,
    /// - [`Error::NotFound`] when the account is missing.
    pub fn append_achievement(&self, user_email: &str, text: &str) -> Result<(), Error> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Validation("achievement must not be empty".to_string()));
        }
        let email = normalize_email(user_email);
        let updated = self.store.update_account(&email, &mut |account| {
            account.achievements.push(text.to_string());
        })?;
        if updated { Ok(()) } else { Err(Error::NotFound) }
    }

    /// Delete the account and cascade its email out of every event's
    /// membership sets in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the account does not exist.
    pub fn delete_account(&self, email: &str) -> Result<(), Error> {
        if self.store.delete_account_cascade(&normalize_email(email))? {
            Ok(())
        } else {
            Err(Error::NotFound)
        }
    }

    /// Aggregate counts; pure query, no side effects. Chiefs are counted with
    /// admins since both lead events.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] when the store gives up.
    pub fn compute_stats(&self) -> Result<Stats, Error> {
        let accounts = self.store.list_accounts()?;
        let total_users = accounts.iter().filter(|a| a.role == Role::User).count();
        let total_admins = accounts.iter().filter(|a| a.role.is_leader()).count();
        let total_events = self.store.list_events()?.len();
        Ok(Stats {
            total_users,
            total_events,
            total_admins,
        })
    }

    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the account does not exist.
    pub fn account_view(&self, email: &str) -> Result<AccountView, Error> {
        let email = normalize_email(email);
        let Some(account) = self.store.get_account(&email)? else {
            return Err(Error::NotFound);
        };
        let events = self.store.list_events()?;
        Ok(view_of(&account, &events))
    }

    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] when the store gives up.
    pub fn list_accounts(&self) -> Result<Vec<AccountView>, Error> {
        let events = self.store.list_events()?;
        Ok(self
            .store
            .list_accounts()?
            .iter()
            .map(|account| view_of(account, &events))
            .collect())
    }

    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] when the store gives up.
    pub fn list_events(&self) -> Result<Vec<EventView>, Error> {
        Ok(self.store.list_events()?.iter().map(EventView::from).collect())
    }

    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the event does not exist.
    pub fn event_view(&self, event_name: &str) -> Result<EventView, Error> {
        match self.store.get_event(event_name.trim())? {
            Some(event) => Ok(EventView::from(&event)),
            None => Err(Error::NotFound),
        }
    }
}

fn member_result(outcome: MemberInsert) -> Result<(), Error> {
    match outcome {
        MemberInsert::Inserted => Ok(()),
        MemberInsert::MissingAccount | MemberInsert::MissingEvent => Err(Error::NotFound),
        MemberInsert::WrongRole => Err(Error::RoleMismatch),
    }
}

/// Derived membership count: the number of events whose sets contain the
/// account's email.
fn view_of(account: &Account, events: &[Event]) -> AccountView {
    let events_joined_count = events.iter().filter(|e| e.is_member(&account.email)).count();
    AccountView {
        email: account.email.clone(),
        name: account.name.clone(),
        role: account.role,
        uniform_required: account.uniform_required.clone(),
        achievements: account.achievements.clone(),
        events_joined_count,
    }
}
