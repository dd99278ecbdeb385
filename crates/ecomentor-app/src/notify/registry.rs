use std::sync::Arc;

use ecomentor_api::RetryPolicy;
use ecomentor_core::Platform;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{RegistrationError, TokenRegistrar, TokenSource};

#[derive(Debug, Default)]
struct RegistryState {
    token: Option<String>,
    last_error: Option<String>,
}

/// Owns this device's push token and keeps the backend's copy current.
///
/// The token is cached in memory for the life of the registry; a failed
/// platform request clears it. Registration with the backend is
/// best-effort: failures are logged and never surface to callers.
pub struct PushRegistry {
    source: Arc<dyn TokenSource>,
    registrar: Arc<dyn TokenRegistrar>,
    policy: RetryPolicy,
    state: Mutex<RegistryState>,
}

impl PushRegistry {
    pub fn new(source: Arc<dyn TokenSource>, registrar: Arc<dyn TokenRegistrar>) -> Self {
        Self {
            source,
            registrar,
            policy: RetryPolicy::default(),
            state: Mutex::new(RegistryState::default()),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn platform(&self) -> Platform {
        self.source.platform()
    }

    pub async fn current_token(&self) -> Option<String> {
        self.state.lock().await.token.clone()
    }

    /// Message of the last failed token request, cleared on success.
    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.last_error.clone()
    }

    /// Ask the platform for a fresh token, cache it and register it.
    pub async fn request_token(&self) -> Result<String, RegistrationError> {
        match self.source.fetch_token().await {
            Ok(token) => {
                {
                    let mut state = self.state.lock().await;
                    state.token = Some(token.clone());
                    state.last_error = None;
                }
                info!(platform = %self.platform(), "push token acquired");
                self.upsert(&token).await;
                Ok(token)
            }
            Err(e) => {
                {
                    let mut state = self.state.lock().await;
                    state.token = None;
                    state.last_error = Some(e.to_string());
                }
                warn!(error = %e, "push token unavailable");
                Err(e)
            }
        }
    }

    /// Make sure the backend knows this device's token, fetching one first
    /// when nothing is cached.
    pub async fn sync_registration(&self) {
        match self.current_token().await {
            Some(token) => self.upsert(&token).await,
            None => {
                // request_token registers on success and logs on failure.
                let _ = self.request_token().await;
            }
        }
    }

    /// Forget the cached token and last error.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.token = None;
        state.last_error = None;
        debug!("push token cache cleared");
    }

    async fn upsert(&self, token: &str) {
        if let Err(e) = self
            .registrar
            .register(token, self.platform(), self.policy)
            .await
        {
            warn!(error = %e, "push token registration failed");
        }
    }
}
