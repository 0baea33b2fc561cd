//! The membership registry: accounts, events, and the assignment relations
//! between them, kept consistent behind an abstract store.

pub mod credentials;
pub mod memory;
pub mod model;
pub mod registry;
pub mod store;

pub use credentials::Credentials;
pub use memory::MemoryStore;
pub use registry::Registry;
pub use store::{MemberInsert, MemberSet, Store, StoreError};
