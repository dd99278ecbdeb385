use std::sync::Arc;
use std::time::Duration;

use ecomentor_api::{PushMessage, PushPriority};
use ecomentor_core::{CreationEvent, NotificationContent, Platform};
use tracing::{debug, info, warn};

use super::{DEFAULT_CHANNEL, LocalNotifier, Permission, PushRegistry, PushSender};

/// Delay before a local notification fires; never less than one second.
pub const DEFAULT_LOCAL_DELAY: Duration = Duration::from_secs(1);

const MIN_LOCAL_DELAY: Duration = Duration::from_secs(1);

/// How a creation notification ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    DeliveredRemote { ticket: Option<String> },
    DeliveredLocal { id: String },
    /// The gateway refused the message. No local notification is attempted.
    RemoteFailed { reason: String },
    /// Local permission was refused or scheduling failed.
    Suppressed,
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(
            self,
            DispatchOutcome::DeliveredRemote { .. } | DispatchOutcome::DeliveredLocal { .. }
        )
    }
}

/// Announces creation events to the user.
///
/// Remote push is preferred when enabled and a token can be obtained;
/// otherwise a local notification is scheduled. Dispatch never fails: the
/// outcome is returned for inspection and logged.
pub struct Dispatcher {
    registry: Arc<PushRegistry>,
    sender: Arc<dyn PushSender>,
    local: Arc<dyn LocalNotifier>,
    push_enabled: bool,
    local_delay: Duration,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<PushRegistry>,
        sender: Arc<dyn PushSender>,
        local: Arc<dyn LocalNotifier>,
    ) -> Self {
        Self {
            registry,
            sender,
            local,
            push_enabled: true,
            local_delay: DEFAULT_LOCAL_DELAY,
        }
    }

    pub fn with_push_enabled(mut self, enabled: bool) -> Self {
        self.push_enabled = enabled;
        self
    }

    pub fn with_local_delay(mut self, delay: Duration) -> Self {
        self.local_delay = delay;
        self
    }

    pub fn push_enabled(&self) -> bool {
        self.push_enabled
    }

    pub fn registry(&self) -> &Arc<PushRegistry> {
        &self.registry
    }

    pub async fn dispatch(&self, event: &CreationEvent) -> DispatchOutcome {
        let content = event.content();
        debug!(kind = event.kind(), push_enabled = self.push_enabled, "dispatching notification");

        let outcome = if self.push_enabled {
            self.registry.sync_registration().await;
            match self.acquire_token().await {
                Some(token) => self.send_remote(&token, &content).await,
                None => self.deliver_locally(&content).await,
            }
        } else {
            self.deliver_locally(&content).await
        };

        info!(kind = event.kind(), outcome = ?outcome, "notification dispatched");
        outcome
    }

    async fn acquire_token(&self) -> Option<String> {
        if let Some(token) = self.registry.current_token().await {
            return Some(token);
        }
        self.registry.request_token().await.ok()
    }

    async fn send_remote(&self, token: &str, content: &NotificationContent) -> DispatchOutcome {
        let msg = PushMessage::new(token, content).with_priority(PushPriority::High);
        match self.sender.send(&msg).await {
            Ok(ticket) => DispatchOutcome::DeliveredRemote { ticket: ticket.id },
            Err(e) => {
                warn!(error = %e, "remote push failed");
                DispatchOutcome::RemoteFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn deliver_locally(&self, content: &NotificationContent) -> DispatchOutcome {
        let mut permission = self.local.permission().await;
        if permission != Permission::Granted {
            permission = self.local.request_permission().await;
        }

        if self.registry.platform() == Platform::Android
            && let Err(e) = self.local.ensure_channel(&DEFAULT_CHANNEL).await
        {
            warn!(error = %e, "notification channel setup failed");
        }

        if permission != Permission::Granted {
            info!(?permission, "local notification permission not granted");
            return DispatchOutcome::Suppressed;
        }

        let delay = self.local_delay.max(MIN_LOCAL_DELAY);
        match self.local.schedule(content, delay).await {
            Ok(id) => DispatchOutcome::DeliveredLocal { id },
            Err(e) => {
                warn!(error = %e, "local notification failed");
                DispatchOutcome::Suppressed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RegistrationError;
    use crate::notify::fakes::{FakeLocal, FakeRegistrar, FakeSender, FakeSource};

    struct Rig {
        source: Arc<FakeSource>,
        registrar: Arc<FakeRegistrar>,
        sender: Arc<FakeSender>,
        local: Arc<FakeLocal>,
        dispatcher: Dispatcher,
    }

    fn rig(source: FakeSource, sender: FakeSender, local: FakeLocal, push_enabled: bool) -> Rig {
        let source = Arc::new(source);
        let registrar = Arc::new(FakeRegistrar::default());
        let sender = Arc::new(sender);
        let local = Arc::new(local);
        let registry = Arc::new(PushRegistry::new(source.clone(), registrar.clone()));
        let dispatcher = Dispatcher::new(registry, sender.clone(), local.clone())
            .with_push_enabled(push_enabled);
        Rig {
            source,
            registrar,
            sender,
            local,
            dispatcher,
        }
    }

    fn prompt_event() -> CreationEvent {
        CreationEvent::Prompt {
            id: 12,
            titulo: "Resumo".into(),
        }
    }

    #[tokio::test]
    async fn token_available_sends_remote() {
        let r = rig(
            FakeSource::ok("ExponentPushToken[x]"),
            FakeSender::default(),
            FakeLocal::granted(),
            true,
        );

        let outcome = r.dispatcher.dispatch(&prompt_event()).await;

        assert_eq!(
            outcome,
            DispatchOutcome::DeliveredRemote {
                ticket: Some("ticket-1".into())
            }
        );
        let sent = r.sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ExponentPushToken[x]");
        assert_eq!(sent[0].data["params"]["promptId"], 12);
        assert_eq!(sent[0].priority, Some(PushPriority::High));
        assert!(r.local.scheduled().is_empty());
        assert_eq!(r.registrar.tokens(), vec!["ExponentPushToken[x]"]);
    }

    #[tokio::test]
    async fn push_disabled_goes_local_without_token() {
        let r = rig(
            FakeSource::ok("tok"),
            FakeSender::default(),
            FakeLocal::granted(),
            false,
        );

        let outcome = r.dispatcher.dispatch(&prompt_event()).await;

        assert!(matches!(outcome, DispatchOutcome::DeliveredLocal { .. }));
        assert_eq!(r.source.calls(), 0);
        assert!(r.sender.sent().is_empty());
        let scheduled = r.local.scheduled();
        assert_eq!(scheduled[0].0.title, "Prompt created");
        assert_eq!(scheduled[0].1, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn no_token_falls_back_to_local() {
        let r = rig(
            FakeSource::failing(RegistrationError::NotPhysicalDevice),
            FakeSender::default(),
            FakeLocal::granted(),
            true,
        );

        let outcome = r.dispatcher.dispatch(&prompt_event()).await;

        assert!(matches!(outcome, DispatchOutcome::DeliveredLocal { .. }));
        assert!(r.sender.sent().is_empty());
        assert_eq!(r.local.channels.lock().unwrap().as_slice(), ["default"]);
        let scheduled = r.local.scheduled();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].0, prompt_event().content());
        assert_eq!(r.source.calls(), 2);
    }

    #[tokio::test]
    async fn denied_permission_suppresses() {
        let r = rig(
            FakeSource::failing(RegistrationError::PermissionDenied),
            FakeSender::default(),
            FakeLocal::new(Permission::Undetermined, Permission::Denied),
            true,
        );

        let outcome = r.dispatcher.dispatch(&prompt_event()).await;

        assert_eq!(outcome, DispatchOutcome::Suppressed);
        assert_eq!(r.local.requests.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(r.local.scheduled().is_empty());
    }

    #[tokio::test]
    async fn granted_permission_is_not_requested_again() {
        let r = rig(
            FakeSource::ok("tok"),
            FakeSender::default(),
            FakeLocal::granted(),
            false,
        );
        r.dispatcher.dispatch(&prompt_event()).await;
        assert_eq!(r.local.requests.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn remote_rejection_does_not_fall_back() {
        let r = rig(
            FakeSource::ok("tok"),
            FakeSender::rejecting("DeviceNotRegistered"),
            FakeLocal::granted(),
            true,
        );

        let outcome = r.dispatcher.dispatch(&prompt_event()).await;

        assert_eq!(
            outcome,
            DispatchOutcome::RemoteFailed {
                reason: "push rejected: DeviceNotRegistered".into()
            }
        );
        assert!(!outcome.is_delivered());
        assert!(r.local.scheduled().is_empty());
    }

    #[tokio::test]
    async fn schedule_error_suppresses() {
        let mut local = FakeLocal::granted();
        local.schedule_error = Some("alarm manager unavailable".into());
        let r = rig(FakeSource::ok("tok"), FakeSender::default(), local, false);

        assert_eq!(
            r.dispatcher.dispatch(&prompt_event()).await,
            DispatchOutcome::Suppressed
        );
    }

    #[tokio::test]
    async fn local_delay_is_at_least_one_second() {
        let r = rig(
            FakeSource::ok("tok"),
            FakeSender::default(),
            FakeLocal::granted(),
            false,
        );
        let dispatcher = r.dispatcher.with_local_delay(Duration::ZERO);
        dispatcher.dispatch(&prompt_event()).await;
        assert_eq!(r.local.scheduled()[0].1, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn cached_token_skips_platform_request() {
        let r = rig(
            FakeSource::ok("tok"),
            FakeSender::default(),
            FakeLocal::granted(),
            true,
        );
        r.dispatcher.dispatch(&prompt_event()).await;
        r.dispatcher.dispatch(&prompt_event()).await;
        assert_eq!(r.source.calls(), 1);
        assert_eq!(r.sender.sent().len(), 2);
    }
}
