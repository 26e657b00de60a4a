// ABOUTME: Simulated session authentication backed by the key-value store
// Any non-empty credentials are accepted after a fixed delay; logout wipes wizard state

use std::time::Duration;
use tracing::{error, info};

use crate::store::{FormStore, SharedStore, AUTH_TOKEN_KEY, USER_EMAIL_KEY};

/// The only thing routing needs to know about authentication
pub trait AuthGate {
    fn is_authenticated(&self) -> bool;
}

/// Gate that is always open; used when login gating is disabled
pub struct NoAuth;

impl AuthGate for NoAuth {
    fn is_authenticated(&self) -> bool {
        true
    }
}

pub struct SessionAuth {
    store: SharedStore,
    login_delay: Duration,
}

impl SessionAuth {
    pub fn new(store: SharedStore, login_delay: Duration) -> Self {
        Self { store, login_delay }
    }

    /// Email of the signed-in user, if any
    pub fn user(&self) -> Option<String> {
        if !self.is_authenticated() {
            return None;
        }
        self.store.get(USER_EMAIL_KEY).ok().flatten()
    }

    /// Sign in. Returns `false` for blank credentials or if the session could
    /// not be stored.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        tokio::time::sleep(self.login_delay).await;

        if email.trim().is_empty() || password.is_empty() {
            return false;
        }

        let token = format!("demo-token-{}", uuid::Uuid::new_v4().simple());
        let stored = self
            .store
            .set(AUTH_TOKEN_KEY, &token)
            .and_then(|()| self.store.set(USER_EMAIL_KEY, email.trim()));

        match stored {
            Ok(()) => {
                info!("Signed in as {}", email.trim());
                true
            }
            Err(e) => {
                error!("Login error: {}", e);
                false
            }
        }
    }

    /// Sign out and clear every stored form record and the step registry
    pub fn logout(&self) {
        for key in [AUTH_TOKEN_KEY, USER_EMAIL_KEY] {
            if let Err(e) = self.store.delete(key) {
                error!("Error removing {}: {}", key, e);
            }
        }
        FormStore::new(self.store.clone()).clear_all();
        info!("Signed out");
    }
}

impl AuthGate for SessionAuth {
    fn is_authenticated(&self) -> bool {
        let present = |key: &str| matches!(self.store.get(key), Ok(Some(v)) if !v.is_empty());
        present(AUTH_TOKEN_KEY) && present(USER_EMAIL_KEY)
    }
}
