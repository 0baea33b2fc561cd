//! The authorization policy table.
//!
//! All role checks in the system go through [`allow`]; callers never compare
//! role strings themselves. Session validity is checked before this table is
//! consulted, so a denial here always means a valid caller lacked privilege.

use crate::roster::model::Role;

/// Operations a session can request. `CreateAccount` carries the role of the
/// account being created because policy depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateAccount(Role),
    DeleteAccount,
    AppendAchievement,
    CreateEvent,
    DeleteEvent,
    AssignUser,
    /// Joining an event as a leader, on the caller's own behalf. Plain users
    /// never self-join; they are assigned by a leader through `AssignUser`.
    JoinEvent,
    ReadOwnProfile,
    ReadAccounts,
    ReadEvents,
}

/// Decide whether `role` may perform `operation`.
#[must_use]
pub fn allow(role: Role, operation: Operation) -> bool {
    match operation {
        // Chief accounts are never created through the API, by any role.
        Operation::CreateAccount(Role::Chief) => false,
        Operation::CreateAccount(_)
        | Operation::DeleteAccount
        | Operation::AppendAchievement
        | Operation::CreateEvent
        | Operation::DeleteEvent
        | Operation::AssignUser
        | Operation::JoinEvent
        | Operation::ReadAccounts => role.is_leader(),
        Operation::ReadOwnProfile | Operation::ReadEvents => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every (role, operation) cell of the policy table, spelled out.
    #[test]
    fn policy_table_is_exhaustive() {
        let cells: &[(Operation, bool, bool, bool)] = &[
            // operation, chief, admin, user
            (Operation::CreateAccount(Role::User), true, true, false),
            (Operation::CreateAccount(Role::Admin), true, true, false),
            (Operation::CreateAccount(Role::Chief), false, false, false),
            (Operation::DeleteAccount, true, true, false),
            (Operation::AppendAchievement, true, true, false),
            (Operation::CreateEvent, true, true, false),
            (Operation::DeleteEvent, true, true, false),
            (Operation::AssignUser, true, true, false),
            (Operation::JoinEvent, true, true, false),
            (Operation::ReadOwnProfile, true, true, true),
            (Operation::ReadAccounts, true, true, false),
            (Operation::ReadEvents, true, true, true),
        ];

        for &(operation, chief, admin, user) in cells {
            assert_eq!(allow(Role::Chief, operation), chief, "chief {operation:?}");
            assert_eq!(allow(Role::Admin, operation), admin, "admin {operation:?}");
            assert_eq!(allow(Role::User, operation), user, "user {operation:?}");
        }
    }

    #[test]
    fn no_role_may_create_a_chief() {
        for role in [Role::Chief, Role::Admin, Role::User] {
            assert!(!allow(role, Operation::CreateAccount(Role::Chief)));
        }
    }
}
