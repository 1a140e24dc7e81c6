//! Login state shared by the router and every page it renders

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

/// Callback a page uses to flip the login state.
pub type SetLoggedIn = Arc<dyn Fn(bool) + Send + Sync>;

/// Single source of truth for "is the user logged in".
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    logged_in: Arc<RwLock<bool>>,
}

impl AuthState {
    pub fn new(logged_in: bool) -> Self {
        Self {
            logged_in: Arc::new(RwLock::new(logged_in)),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        *self.logged_in.read()
    }

    pub fn set(&self, logged_in: bool) {
        let mut current = self.logged_in.write();
        if *current != logged_in {
            debug!("login state changed: {} -> {}", *current, logged_in);
        }
        *current = logged_in;
    }

    /// Setter bound to this state.
    pub fn setter(&self) -> SetLoggedIn {
        let state = self.clone();
        Arc::new(move |logged_in| state.set(logged_in))
    }
}
