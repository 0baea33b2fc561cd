//! End-to-end façade scenarios: registration, policy enforcement, cascade
//! consistency, and concurrent assignment.

use std::sync::Arc;
use std::thread;

use secrecy::SecretString;

use muster::access::Access;
use muster::auth::token::{TokenError, TokenSigner};
use muster::roster::credentials::NewAccount;
use muster::roster::model::Role;
use muster::roster::{MemoryStore, Store};
use muster::Error;

const SECRET: &str = "integration-secret";

fn access() -> Access {
    access_with_ttl(3600)
}

fn access_with_ttl(ttl_seconds: i64) -> Access {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let signer = TokenSigner::new(SecretString::from(SECRET.to_string()), ttl_seconds);
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
fn assign_then_delete_event_keeps_derived_count_correct() -> Result<(), Error> {
    let access = access();
    let (_admin, admin_token) = access.register(new_account("admin@x.com", Role::Admin))?;
    let (alice, _alice_token) = access.register(new_account("alice@x.com", Role::User))?;
    assert_eq!(alice.events_joined_count, 0);

    access.create_event(&admin_token, "Camp", "2026-06-01", "Summer camp")?;
    access.assign_user(&admin_token, "Camp", "alice@x.com")?;

    let alice = access.me(&access.login("alice@x.com", "hunter2")?.1)?;
    assert_eq!(alice.events_joined_count, 1);

    access.delete_event(&admin_token, "Camp")?;
    let alice = access.me(&access.login("alice@x.com", "hunter2")?.1)?;
    assert_eq!(alice.events_joined_count, 0);
    Ok(())
}

#[test]
fn chief_registration_fails_regardless_of_caller() -> Result<(), Error> {
    let access = access();
    assert!(matches!(
        access.register(new_account("boss@x.com", Role::Chief)),
        Err(Error::Validation(_))
    ));

    // Even an authenticated admin cannot create a chief.
    let (_admin, token) = access.register(new_account("admin@x.com", Role::Admin))?;
    assert_eq!(
        access
            .create_account(&token, new_account("boss@x.com", Role::Chief))
            .err(),
        Some(Error::Forbidden)
    );
    Ok(())
}

#[test]
fn expired_token_is_unauthenticated_before_policy_runs() -> Result<(), Error> {
    // Negative TTL issues tokens that are already expired.
    let expired_issuer = access_with_ttl(-1);
    let (_view, expired_token) = expired_issuer.register(new_account("admin@x.com", Role::Admin))?;

    // Every façade call with the expired token is Unauthenticated(Expired),
    // including operations the admin role would be allowed to perform.
    assert_eq!(
        expired_issuer
            .create_event(&expired_token, "Camp", "2026-06-01", "")
            .err(),
        Some(Error::Unauthenticated(TokenError::Expired))
    );
    assert_eq!(
        expired_issuer.list_events(&expired_token).err(),
        Some(Error::Unauthenticated(TokenError::Expired))
    );
    Ok(())
}

#[test]
fn tampered_token_is_rejected() -> Result<(), Error> {
    let access = access();
    let (_view, token) = access.register(new_account("admin@x.com", Role::Admin))?;

    let mut tampered = token.clone();
    tampered.pop();
    let result = access.list_events(&tampered);
    assert!(
        matches!(
            result,
            Err(Error::Unauthenticated(
                TokenError::SignatureMismatch | TokenError::Malformed
            ))
        ),
        "got {result:?}"
    );
    Ok(())
}

#[test]
fn deleting_an_account_scrubs_every_event() -> Result<(), Error> {
    let access = access();
    let (_admin, admin_token) = access.register(new_account("admin@x.com", Role::Admin))?;
    access.register(new_account("bob@x.com", Role::User))?;

    for event_name in ["Camp", "Hike", "Jamboree"] {
        access.create_event(&admin_token, event_name, "2026-06-01", "")?;
        access.assign_user(&admin_token, event_name, "bob@x.com")?;
    }
    access.join_event(&admin_token, "Camp")?;

    access.delete_account(&admin_token, "bob@x.com")?;

    // One pass over all events: no membership set may still list bob.
    for event in access.list_events(&admin_token)? {
        assert!(
            !event.users_assigned.contains(&"bob@x.com".to_string())
                && !event.admins_joined.contains(&"bob@x.com".to_string()),
            "{} still lists bob",
            event.event_name
        );
    }
    // The admin's own join survives the cascade.
    let camp = access
        .list_events(&admin_token)?
        .into_iter()
        .find(|e| e.event_name == "Camp")
        .expect("Camp exists");
    assert_eq!(camp.admins_joined, vec!["admin@x.com".to_string()]);
    Ok(())
}

#[test]
fn assigning_twice_equals_assigning_once() -> Result<(), Error> {
    let access = access();
    let (_admin, admin_token) = access.register(new_account("admin@x.com", Role::Admin))?;
    access.register(new_account("alice@x.com", Role::User))?;
    access.create_event(&admin_token, "Camp", "2026-06-01", "")?;

    access.assign_user(&admin_token, "Camp", "alice@x.com")?;
    access.assign_user(&admin_token, "Camp", "alice@x.com")?;

    let camp = access
        .list_events(&admin_token)?
        .into_iter()
        .find(|e| e.event_name == "Camp")
        .expect("Camp exists");
    assert_eq!(camp.users_assigned, vec!["alice@x.com".to_string()]);
    Ok(())
}

#[test]
fn concurrent_assignments_to_one_event_all_survive() -> Result<(), Error> {
    let access = Arc::new(access());
    let (_admin, admin_token) = access.register(new_account("admin@x.com", Role::Admin))?;
    access.create_event(&admin_token, "Camp", "2026-06-01", "")?;

    let emails: Vec<String> = (0..8).map(|i| format!("scout{i}@x.com")).collect();
    for email in &emails {
        access.register(new_account(email, Role::User))?;
    }

    let handles: Vec<_> = emails
        .iter()
        .map(|email| {
            let access = Arc::clone(&access);
            let token = admin_token.clone();
            let email = email.clone();
            thread::spawn(move || access.assign_user(&token, "Camp", &email))
        })
        .collect();
    for handle in handles {
        handle.join().expect("assignment thread panicked")?;
    }

    let camp = access
        .list_events(&admin_token)?
        .into_iter()
        .find(|e| e.event_name == "Camp")
        .expect("Camp exists");
    // Set-union semantics: no assignment may be lost to a concurrent write.
    assert_eq!(camp.users_assigned.len(), emails.len());
    for email in &emails {
        assert!(camp.users_assigned.contains(email), "{email} lost");
    }
    Ok(())
}

#[test]
fn stats_reflect_registry_contents() -> Result<(), Error> {
    let access = access();
    let (_admin, admin_token) = access.register(new_account("admin@x.com", Role::Admin))?;
    access.register(new_account("alice@x.com", Role::User))?;
    access.register(new_account("bob@x.com", Role::User))?;
    access.create_event(&admin_token, "Camp", "2026-06-01", "")?;

    let stats = access.stats(&admin_token)?;
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.total_admins, 1);
    assert_eq!(stats.total_events, 1);

    // Plain users may not read stats.
    let (_alice, alice_token) = access.login("alice@x.com", "hunter2")?;
    assert_eq!(access.stats(&alice_token).err(), Some(Error::Forbidden));
    Ok(())
}
