use std::sync::Arc;

use anyhow::Result;

use crate::access::Access;
use crate::api;
use crate::auth::token::TokenSigner;
use crate::cli::actions::Action;
use crate::roster::{MemoryStore, Store};

/// Handle the server action: wire the store, signer, and façade, then serve.
///
/// # Errors
///
/// Returns an error if the façade cannot initialize or the server fails.
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            session_secret,
            session_ttl_seconds,
        } => {
            // The store is an explicit instance owned here, not a process-wide
            // singleton; tests construct their own.
            let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
            let signer = TokenSigner::new(session_secret, session_ttl_seconds);
            let access = Arc::new(Access::new(store, signer)?);

            api::new(port, access).await
        }
    }
}
