//! Application state shared by all handlers.

use std::sync::Arc;

use crate::repository::UserRepository;
use crate::service::{UserManager, UserService};

/// Application state containing the services handlers call into.
#[derive(Clone)]
pub struct AppState {
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Record store, probed by the health check
    pub store: Arc<dyn UserRepository>,
}

impl AppState {
    /// Wire a [`UserManager`] over the given store.
    pub fn from_store(store: Arc<dyn UserRepository>) -> Self {
        Self {
            user_service: Arc::new(UserManager::new(store.clone())),
            store,
        }
    }
}
