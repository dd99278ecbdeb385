//! Deep-link routing for notification taps.
//!
//! A tap produces a [`NavigationEvent`] that travels over an mpsc channel to
//! the [`Router`], which owns the current route and its history.

use ecomentor_core::{DeepLink, Screen};
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationEvent {
    pub screen: String,
    pub params: Map<String, Value>,
}

impl From<DeepLink> for NavigationEvent {
    fn from(link: DeepLink) -> Self {
        Self {
            screen: link.screen,
            params: link.params,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub screen: Screen,
    pub params: Map<String, Value>,
}

impl Route {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            params: Map::new(),
        }
    }
}

/// Routes kept for [`Router::back`]; older ones are dropped.
pub const MAX_HISTORY: usize = 32;

#[derive(Debug)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Router {
    pub fn new(start: Screen) -> Self {
        Self {
            current: Route::new(start),
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Move to the event's screen. Unknown screens are logged and ignored.
    ///
    /// Landing on the current screen again only swaps its params, so
    /// repeated taps do not grow the history.
    pub fn navigate(&mut self, event: NavigationEvent) -> bool {
        let screen: Screen = match event.screen.parse() {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "ignoring navigation event");
                return false;
            }
        };
        debug!(%screen, "navigating");
        if screen == self.current.screen {
            self.current.params = event.params;
            return true;
        }
        let next = Route {
            screen,
            params: event.params,
        };
        self.history.push(std::mem::replace(&mut self.current, next));
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
        true
    }

    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(prev) => {
                self.current = prev;
                true
            }
            None => false,
        }
    }

    /// Apply events until every sender is dropped, then hand the router back.
    pub async fn run(mut self, mut rx: mpsc::Receiver<NavigationEvent>) -> Self {
        while let Some(event) = rx.recv().await {
            self.navigate(event);
        }
        self
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Screen::Home)
    }
}

/// Sending half handed to whatever receives notification taps.
#[derive(Debug, Clone)]
pub struct Navigator {
    tx: mpsc::Sender<NavigationEvent>,
}

impl Navigator {
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<NavigationEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    pub async fn open(&self, link: DeepLink) -> bool {
        match self.tx.send(link.into()).await {
            Ok(()) => true,
            Err(_) => {
                warn!("router is gone, dropping navigation event");
                false
            }
        }
    }

    /// Route a tapped notification's data payload. Payloads without a
    /// screen are ignored.
    pub async fn on_tap(&self, data: &Value) -> bool {
        match DeepLink::from_data(data) {
            Some(link) => self.open(link).await,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecomentor_core::CreationEvent;
    use serde_json::json;

    #[test]
    fn navigate_moves_and_keeps_history() {
        let mut router = Router::default();
        let link = CreationEvent::Task {
            id: 3,
            titulo: "Ler".into(),
        }
        .content()
        .link;

        assert!(router.navigate(link.into()));
        assert_eq!(router.current().screen, Screen::Explore);
        assert_eq!(router.current().params["tarefaId"], 3);
        assert_eq!(router.history().len(), 1);

        assert!(router.back());
        assert_eq!(router.current().screen, Screen::Home);
        assert!(!router.back());
    }

    #[test]
    fn unknown_screen_is_ignored() {
        let mut router = Router::default();
        let moved = router.navigate(NavigationEvent {
            screen: "Settings".into(),
            params: Map::new(),
        });
        assert!(!moved);
        assert_eq!(router.current(), &Route::new(Screen::Home));
        assert!(router.history().is_empty());
    }

    fn to(screen: &str, n: i64) -> NavigationEvent {
        NavigationEvent {
            screen: screen.into(),
            params: json!({ "n": n }).as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn repeated_screen_replaces_params_only() {
        let mut router = Router::default();
        for n in 0..5 {
            assert!(router.navigate(to("Explore", n)));
        }
        assert_eq!(router.current().screen, Screen::Explore);
        assert_eq!(router.current().params["n"], 4);
        assert_eq!(router.history(), &[Route::new(Screen::Home)]);
    }

    #[test]
    fn history_is_capped() {
        let mut router = Router::default();
        for n in 0..100 {
            let screen = if n % 2 == 0 { "Explore" } else { "Mentor" };
            router.navigate(to(screen, n));
        }
        assert_eq!(router.history().len(), MAX_HISTORY);
        assert_eq!(router.history().last().map(|r| r.screen), Some(Screen::Explore));
        assert_eq!(router.history()[0].params["n"], 100 - 1 - MAX_HISTORY as i64);

        let mut steps = 0;
        while router.back() {
            steps += 1;
        }
        assert_eq!(steps, MAX_HISTORY);
    }

    #[tokio::test]
    async fn taps_flow_through_channel() {
        let (nav, rx) = Navigator::channel(4);
        let handle = tokio::spawn(Router::default().run(rx));

        assert!(nav.on_tap(&json!({ "screen": "Mentor", "params": { "x": 1 } })).await);
        assert!(!nav.on_tap(&json!({ "title": "no screen" })).await);
        assert!(nav.on_tap(&json!({ "screen": "Nowhere" })).await);
        drop(nav);

        let router = handle.await.unwrap();
        assert_eq!(router.current().screen, Screen::Mentor);
        assert_eq!(router.current().params["x"], 1);
        assert_eq!(router.history().len(), 1);
    }
}
