//! Credential hashing, session tokens, and the authorization policy table.

pub mod password;
pub mod policy;
pub mod token;
