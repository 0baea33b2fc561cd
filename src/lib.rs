//! # Muster (Troop Membership & Activity Tracker)
//!
//! `muster` tracks a single troop: accounts, events, and achievement badges,
//! gated by three role tiers (`chief`, `admin`, `user`).
//!
//! ## Authorization Model
//!
//! Every state-changing request flows through the [`access::Access`] façade
//! in a fixed order: validate the session token, consult the policy table,
//! then execute against the membership registry. A caller without a valid
//! session always sees `Unauthenticated`, never `Forbidden`, so policy is
//! not leaked to anonymous callers.
//!
//! - **Sessions:** stateless HMAC-signed tokens with a fixed TTL, signed by
//!   the process-wide `SESSION_SECRET`. No server-side session storage and no
//!   revocation; expiry is the only termination path.
//! - **Roles:** one total order, chief > admin > user. Chief accounts are
//!   never created through the API.
//! - **Identity:** `Account.email` (normalized, case-insensitive) is the sole
//!   key in every relation; renaming an email is delete + recreate.
//!
//! ## Membership Consistency
//!
//! Events own their membership sets, so event deletion is a single-key
//! removal. Deleting an account cascades: the account record and its email in
//! every event's sets go in one transaction. `events_joined_count` is derived
//! at query time and never stored, so it cannot drift.

pub mod access;
pub mod api;
pub mod auth;
pub mod cli;
pub mod error;
pub mod roster;

pub use error::Error;
