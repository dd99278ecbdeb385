//! Terminal stand-ins for the device push and local notification services.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use ecomentor_app::notify::{
    Channel, LocalNotifier, LocalNotifyError, Permission, RegistrationError, TokenSource,
};
use ecomentor_core::{NotificationContent, Platform};
use tracing::debug;

/// Hands out the push token configured for this machine, if any.
pub struct ConfiguredTokenSource {
    platform: Platform,
    token: Option<String>,
}

impl ConfiguredTokenSource {
    pub fn new(platform: Platform, token: Option<String>) -> Self {
        Self { platform, token }
    }
}

#[async_trait::async_trait]
impl TokenSource for ConfiguredTokenSource {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch_token(&self) -> Result<String, RegistrationError> {
        match &self.token {
            Some(token) => Ok(token.clone()),
            None if self.platform == Platform::Desktop => Err(RegistrationError::NotPhysicalDevice),
            None => Err(RegistrationError::MissingProjectId),
        }
    }
}

/// Prints notifications to stderr once their delay has elapsed.
pub struct TerminalNotifier {
    permission: Permission,
    next_id: AtomicU32,
}

impl TerminalNotifier {
    pub fn new(permission: Permission) -> Self {
        Self {
            permission,
            next_id: AtomicU32::new(1),
        }
    }
}

#[async_trait::async_trait]
impl LocalNotifier for TerminalNotifier {
    async fn permission(&self) -> Permission {
        self.permission
    }

    /// Non-interactive: the configured answer stands.
    async fn request_permission(&self) -> Permission {
        self.permission
    }

    async fn ensure_channel(&self, channel: &Channel) -> Result<(), LocalNotifyError> {
        debug!(channel = channel.id, importance = ?channel.importance, "channel ready");
        Ok(())
    }

    async fn schedule(
        &self,
        content: &NotificationContent,
        delay: Duration,
    ) -> Result<String, LocalNotifyError> {
        let id = format!("terminal-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        tokio::time::sleep(delay).await;
        eprintln!("[notification] {}: {}", content.title, content.body);
        Ok(id)
    }
}
