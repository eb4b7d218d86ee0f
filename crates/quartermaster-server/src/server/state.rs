//! Shared application state.

use std::sync::Arc;

use crate::auth::{IdentityService, JwtManager};
use crate::storage::LedgerStore;

/// State handed to every handler. Cheap to clone.
pub struct AppState<S> {
    pub store: S,
    pub identity: Arc<IdentityService<S>>,
}

impl<S: LedgerStore> AppState<S> {
    pub fn new(store: S, jwt: Arc<JwtManager>) -> Self {
        let identity = Arc::new(IdentityService::new(store.clone(), jwt));
        Self { store, identity }
    }
}

impl<S: Clone> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            identity: Arc::clone(&self.identity),
        }
    }
}
