//! Screen-level state holders.
//!
//! Each control owns the list a screen shows plus the error of its last
//! failed call. Results that arrive after the view unmounted are dropped.

mod prompts;
mod ranking;
mod ratings;
mod tasks;

use ecomentor_api::ServiceFailure;
use ecomentor_core::FieldErrors;
use tracing::debug;

use crate::MountGuard;

pub use prompts::PromptsControl;
pub use ranking::RankingControl;
pub use ratings::RatingsControl;
pub use tasks::TasksControl;

/// Error state from the last call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlStatus {
    pub error: Option<String>,
    pub field_errors: FieldErrors,
}

impl ControlStatus {
    pub fn clear(&mut self) {
        self.error = None;
        self.field_errors = FieldErrors::new();
    }

    pub fn fail(&mut self, failure: &ServiceFailure) {
        self.error = Some(failure.message.clone());
        self.field_errors = failure.field_errors.clone();
    }
}

/// Apply `f` only while the view is mounted.
fn if_mounted(guard: &MountGuard, what: &str, f: impl FnOnce()) {
    if guard.is_mounted() {
        f();
    } else {
        debug!(what, "view unmounted, dropping result");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use axum::Router;
    use ecomentor_api::ApiClient;

    use crate::notify::fakes::{FakeLocal, FakeRegistrar, FakeSender, FakeSource};
    use crate::notify::{Dispatcher, PushRegistry};

    pub struct Harness {
        pub api: ApiClient,
        pub local: Arc<FakeLocal>,
        pub dispatcher: Arc<Dispatcher>,
    }

    pub async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Backend at `app`, push disabled, local notifications granted.
    pub async fn harness(app: Router) -> Harness {
        let api = ApiClient::new(serve(app).await);
        let local = Arc::new(FakeLocal::granted());
        let registry = Arc::new(PushRegistry::new(
            Arc::new(FakeSource::ok("tok")),
            Arc::new(FakeRegistrar::default()),
        ));
        let dispatcher = Arc::new(
            Dispatcher::new(registry, Arc::new(FakeSender::default()), local.clone())
                .with_push_enabled(false),
        );
        Harness {
            api,
            local,
            dispatcher,
        }
    }
}
