//! In-memory store backing a single process.
//!
//! Both maps sit behind one `RwLock`, so every mutation is a critical section:
//! same-entity updates serialize, and the account-deletion cascade (account
//! removal plus membership scrubbing across all events) is atomic for any
//! concurrent reader. Reads take the read lock and see a committed snapshot.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::model::{Account, Event, Role};
use super::store::{MemberInsert, MemberSet, Store, StoreError};

#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    events: HashMap<String, Event>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

impl Store for MemoryStore {
    fn insert_account(&self, account: Account) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        if state.accounts.contains_key(&account.email) {
            return Ok(false);
        }
        state.accounts.insert(account.email.clone(), account);
        Ok(true)
    }

    fn get_account(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.read()?.accounts.get(email).cloned())
    }

    fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let state = self.read()?;
        let mut accounts: Vec<Account> = state.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(accounts)
    }

    fn update_account(
        &self,
        email: &str,
        mutate: &mut dyn FnMut(&mut Account),
    ) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        match state.accounts.get_mut(email) {
            Some(account) => {
                mutate(account);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_account_cascade(&self, email: &str) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        if state.accounts.remove(email).is_none() {
            return Ok(false);
        }
        for event in state.events.values_mut() {
            event.users_assigned.remove(email);
            event.admins_joined.remove(email);
        }
        Ok(true)
    }

    fn insert_event(&self, event: Event) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        if state.events.contains_key(&event.event_name) {
            return Ok(false);
        }
        state.events.insert(event.event_name.clone(), event);
        Ok(true)
    }

    fn get_event(&self, event_name: &str) -> Result<Option<Event>, StoreError> {
        Ok(self.read()?.events.get(event_name).cloned())
    }

    fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let state = self.read()?;
        let mut events: Vec<Event> = state.events.values().cloned().collect();
        events.sort_by(|a, b| a.event_name.cmp(&b.event_name));
        Ok(events)
    }

    fn insert_event_member(
        &self,
        event_name: &str,
        email: &str,
        set: MemberSet,
    ) -> Result<MemberInsert, StoreError> {
        // Account check and set-union share the write lock, so a concurrent
        // deletion cascade can never interleave between them.
        let mut state = self.write()?;
        let role = match state.accounts.get(email) {
            Some(account) => account.role,
            None => return Ok(MemberInsert::MissingAccount),
        };
        let role_fits = match set {
            MemberSet::Users => role == Role::User,
            MemberSet::Admins => role.is_leader(),
        };
        if !role_fits {
            return Ok(MemberInsert::WrongRole);
        }
        match state.events.get_mut(event_name) {
            Some(event) => {
                let members = match set {
                    MemberSet::Users => &mut event.users_assigned,
                    MemberSet::Admins => &mut event.admins_joined,
                };
                members.insert(email.to_string());
                Ok(MemberInsert::Inserted)
            }
            None => Ok(MemberInsert::MissingEvent),
        }
    }

    fn delete_event(&self, event_name: &str) -> Result<bool, StoreError> {
        Ok(self.write()?.events.remove(event_name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::model::Role;
    use std::collections::BTreeSet;

    fn account(email: &str, role: Role) -> Account {
        Account {
            email: email.to_string(),
            name: email.to_string(),
            password_hash: "phc".to_string(),
            role,
            uniform_required: String::new(),
            achievements: Vec::new(),
        }
    }

    fn event(name: &str) -> Event {
        Event {
            event_name: name.to_string(),
            date: "2026-06-01".to_string(),
            description: String::new(),
            created_by: "chief@x.com".to_string(),
            users_assigned: BTreeSet::new(),
            admins_joined: BTreeSet::new(),
        }
    }

    #[test]
    fn insert_account_rejects_existing_key() -> Result<(), StoreError> {
        let store = MemoryStore::new();
        assert!(store.insert_account(account("a@x.com", Role::User))?);
        assert!(!store.insert_account(account("a@x.com", Role::Admin))?);
        // The original record survives.
        let stored = store.get_account("a@x.com")?.map(|a| a.role);
        assert_eq!(stored, Some(Role::User));
        Ok(())
    }

    #[test]
    fn insert_event_member_reports_each_missing_side() -> Result<(), StoreError> {
        let store = MemoryStore::new();
        store.insert_account(account("alice@x.com", Role::User))?;
        store.insert_event(event("Camp"))?;

        assert_eq!(
            store.insert_event_member("Camp", "ghost@x.com", MemberSet::Users)?,
            MemberInsert::MissingAccount
        );
        assert_eq!(
            store.insert_event_member("Hike", "alice@x.com", MemberSet::Users)?,
            MemberInsert::MissingEvent
        );
        assert_eq!(
            store.insert_event_member("Camp", "alice@x.com", MemberSet::Admins)?,
            MemberInsert::WrongRole
        );
        assert_eq!(
            store.insert_event_member("Camp", "alice@x.com", MemberSet::Users)?,
            MemberInsert::Inserted
        );
        Ok(())
    }

    #[test]
    fn insert_event_member_checks_role_against_target_set() -> Result<(), StoreError> {
        let store = MemoryStore::new();
        store.insert_account(account("chief@x.com", Role::Chief))?;
        store.insert_event(event("Camp"))?;

        assert_eq!(
            store.insert_event_member("Camp", "chief@x.com", MemberSet::Users)?,
            MemberInsert::WrongRole
        );
        assert_eq!(
            store.insert_event_member("Camp", "chief@x.com", MemberSet::Admins)?,
            MemberInsert::Inserted
        );
        Ok(())
    }

    #[test]
    fn cascade_removes_account_and_memberships() -> Result<(), StoreError> {
        let store = MemoryStore::new();
        store.insert_account(account("bob@x.com", Role::User))?;
        store.insert_event(event("Camp"))?;
        store.insert_event(event("Hike"))?;
        store.insert_event_member("Camp", "bob@x.com", MemberSet::Users)?;
        store.insert_event_member("Hike", "bob@x.com", MemberSet::Users)?;

        assert!(store.delete_account_cascade("bob@x.com")?);
        assert!(store.get_account("bob@x.com")?.is_none());
        for event in store.list_events()? {
            assert!(!event.is_member("bob@x.com"), "{} still lists bob", event.event_name);
        }
        Ok(())
    }

    #[test]
    fn cascade_reports_missing_account() -> Result<(), StoreError> {
        let store = MemoryStore::new();
        assert!(!store.delete_account_cascade("ghost@x.com")?);
        Ok(())
    }

    #[test]
    fn delete_event_is_single_key() -> Result<(), StoreError> {
        let store = MemoryStore::new();
        store.insert_event(event("Camp"))?;
        assert!(store.delete_event("Camp")?);
        assert!(!store.delete_event("Camp")?);
        Ok(())
    }
}
