//! Application context: settings, clients and the signed-in session, built
//! once at start-up and passed to whatever needs them.

use std::sync::Arc;
use std::time::Duration;

use ecomentor_api::{ApiClient, PushGateway, RetryPolicy, ServiceFailure, ServiceResult};
use ecomentor_core::validate::{validate_credentials, validate_profile};
use ecomentor_core::{Credentials, Platform, ProfileInput};
use tracing::info;

use crate::MountGuard;
use crate::control::{PromptsControl, RankingControl, RatingsControl, TasksControl};
use crate::notify::{
    DEFAULT_LOCAL_DELAY, Dispatcher, LocalNotifier, PushRegistry, PushSender, TokenSource,
};

const LOCAL_TOKEN_PREFIX: &str = "local-token-";

/// Everything the application needs from its environment.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api_url: String,
    pub gateway_url: String,
    pub push_enabled: bool,
    pub user_id: i64,
    pub platform: Platform,
    pub local_delay: Duration,
    pub retry: RetryPolicy,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".into(),
            gateway_url: ecomentor_api::push::DEFAULT_GATEWAY_URL.into(),
            push_enabled: true,
            user_id: 1,
            platform: Platform::default(),
            local_delay: DEFAULT_LOCAL_DELAY,
            retry: RetryPolicy::default(),
        }
    }
}

/// Who is signed in on this device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub email: Option<String>,
    pub nome: Option<String>,
}

impl Session {
    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }
}

pub struct AppContext {
    settings: AppSettings,
    api: ApiClient,
    registry: Arc<PushRegistry>,
    dispatcher: Arc<Dispatcher>,
    session: Session,
}

impl AppContext {
    /// Wire up the real backend and push gateway around platform pieces.
    pub fn new(
        settings: AppSettings,
        source: Arc<dyn TokenSource>,
        local: Arc<dyn LocalNotifier>,
    ) -> Self {
        let api = ApiClient::new(settings.api_url.clone());
        let gateway = Arc::new(PushGateway::new(settings.gateway_url.clone()));
        Self::from_parts(settings, api, gateway, source, local)
    }

    pub fn from_parts(
        settings: AppSettings,
        api: ApiClient,
        sender: Arc<dyn PushSender>,
        source: Arc<dyn TokenSource>,
        local: Arc<dyn LocalNotifier>,
    ) -> Self {
        let registry = Arc::new(
            PushRegistry::new(source, Arc::new(api.clone())).with_policy(settings.retry),
        );
        let dispatcher = Arc::new(
            Dispatcher::new(registry.clone(), sender, local)
                .with_push_enabled(settings.push_enabled)
                .with_local_delay(settings.local_delay),
        );
        Self {
            settings,
            api,
            registry,
            dispatcher,
            session: Session::default(),
        }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn registry(&self) -> &Arc<PushRegistry> {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Validate credentials and start a local session.
    ///
    /// There is no auth endpoint; the token is minted on the device as
    /// `local-token-{email}-{unix_millis}`.
    pub fn sign_in(&mut self, credentials: &Credentials) -> ServiceResult<&Session> {
        validate_credentials(credentials).map_err(ServiceFailure::validation)?;
        let email = credentials.email.trim().to_string();
        let token = format!(
            "{LOCAL_TOKEN_PREFIX}{email}-{}",
            chrono::Utc::now().timestamp_millis()
        );
        self.api = self.api.clone().with_token(Some(token.clone()));
        self.session = Session {
            token: Some(token),
            email: Some(email),
            nome: None,
        };
        info!("signed in");
        Ok(&self.session)
    }

    /// Restore a session from a token minted by an earlier [`sign_in`].
    ///
    /// [`sign_in`]: AppContext::sign_in
    pub fn resume(&mut self, token: String) {
        let email = token
            .strip_prefix(LOCAL_TOKEN_PREFIX)
            .and_then(|rest| rest.rsplit_once('-'))
            .map(|(email, _)| email.to_string());
        self.api = self.api.clone().with_token(Some(token.clone()));
        self.session = Session {
            token: Some(token),
            email,
            nome: None,
        };
    }

    /// Update the display name kept with the session.
    pub fn update_profile(&mut self, profile: &ProfileInput) -> ServiceResult<&Session> {
        validate_profile(profile).map_err(ServiceFailure::validation)?;
        self.session.nome = Some(profile.nome.trim().to_string());
        Ok(&self.session)
    }

    /// End the session and forget the cached push token.
    pub async fn sign_out(&mut self) {
        self.session = Session::default();
        self.api = self.api.clone().with_token(None);
        self.registry.clear().await;
        info!("signed out");
    }

    pub fn ranking(&self, guard: MountGuard) -> RankingControl {
        RankingControl::new(self.api.clone(), guard)
    }

    pub fn prompts(&self, guard: MountGuard) -> PromptsControl {
        PromptsControl::new(self.api.clone(), self.dispatcher.clone(), guard)
    }

    pub fn tasks(&self, guard: MountGuard) -> TasksControl {
        TasksControl::new(self.api.clone(), self.dispatcher.clone(), guard)
    }

    pub fn ratings(&self, guard: MountGuard) -> RatingsControl {
        RatingsControl::new(
            self.api.clone(),
            self.dispatcher.clone(),
            guard,
            self.settings.user_id,
        )
    }
}
