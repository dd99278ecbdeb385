//! Notification delivery: remote push when a device token is available,
//! a scheduled local notification otherwise.
//!
//! The platform-facing pieces sit behind traits so the dispatch flow can be
//! driven by the CLI, a mobile shell, or test fakes:
//!
//! - [`TokenSource`] obtains a push token from the OS/vendor.
//! - [`TokenRegistrar`] records the token with the backend.
//! - [`PushSender`] hands a message to the remote gateway.
//! - [`LocalNotifier`] owns local permission, channels and scheduling.

mod dispatch;
mod registry;

use std::time::Duration;

use ecomentor_api::{ApiClient, ApiError, PushError, PushGateway, PushMessage, PushTicket, RetryPolicy};
use ecomentor_core::{NotificationContent, Platform};
use thiserror::Error;

pub use dispatch::{DEFAULT_LOCAL_DELAY, DispatchOutcome, Dispatcher};
pub use registry::PushRegistry;

/// Why the platform could not hand out a push token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("push permission not granted")]
    PermissionDenied,
    #[error("push notifications need a physical device")]
    NotPhysicalDevice,
    #[error("push project id is not configured")]
    MissingProjectId,
    #[error("token request failed: {0}")]
    Platform(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocalNotifyError {
    #[error("could not configure channel {channel}: {reason}")]
    Channel { channel: String, reason: String },
    #[error("could not schedule notification: {0}")]
    Schedule(String),
}

/// Local notification permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    Undetermined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importance {
    Default,
    High,
    Max,
}

/// An Android notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub id: &'static str,
    pub name: &'static str,
    pub importance: Importance,
}

pub const DEFAULT_CHANNEL: Channel = Channel {
    id: "default",
    name: "default",
    importance: Importance::Max,
};

#[async_trait::async_trait]
pub trait TokenSource: Send + Sync {
    fn platform(&self) -> Platform;

    async fn fetch_token(&self) -> Result<String, RegistrationError>;
}

#[async_trait::async_trait]
pub trait TokenRegistrar: Send + Sync {
    /// Record `token` for this device. Returns the attempts it took.
    async fn register(
        &self,
        token: &str,
        platform: Platform,
        policy: RetryPolicy,
    ) -> Result<u32, ApiError>;
}

#[async_trait::async_trait]
impl TokenRegistrar for ApiClient {
    async fn register(
        &self,
        token: &str,
        platform: Platform,
        policy: RetryPolicy,
    ) -> Result<u32, ApiError> {
        self.upsert_push_token(token, platform, policy).await
    }
}

#[async_trait::async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, msg: &PushMessage) -> Result<PushTicket, PushError>;
}

#[async_trait::async_trait]
impl PushSender for PushGateway {
    async fn send(&self, msg: &PushMessage) -> Result<PushTicket, PushError> {
        PushGateway::send(self, msg).await
    }
}

#[async_trait::async_trait]
pub trait LocalNotifier: Send + Sync {
    async fn permission(&self) -> Permission;

    async fn request_permission(&self) -> Permission;

    async fn ensure_channel(&self, channel: &Channel) -> Result<(), LocalNotifyError>;

    /// Schedule `content` to fire after `delay`. Returns the notification id.
    async fn schedule(
        &self,
        content: &NotificationContent,
        delay: Duration,
    ) -> Result<String, LocalNotifyError>;
}
