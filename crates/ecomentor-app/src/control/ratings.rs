use std::sync::Arc;

use ecomentor_api::{ApiClient, ServiceResult, service};
use ecomentor_core::{CreationEvent, Rating, RatingInput};

use super::{ControlStatus, if_mounted};
use crate::MountGuard;
use crate::notify::{DispatchOutcome, Dispatcher};

/// Ratings submitted in this session.
pub struct RatingsControl {
    api: ApiClient,
    notifier: Arc<Dispatcher>,
    guard: MountGuard,
    user_id: i64,
    items: Vec<Rating>,
    status: ControlStatus,
    last_dispatch: Option<DispatchOutcome>,
}

impl RatingsControl {
    pub fn new(api: ApiClient, notifier: Arc<Dispatcher>, guard: MountGuard, user_id: i64) -> Self {
        Self {
            api,
            notifier,
            guard,
            user_id,
            items: Vec::new(),
            status: ControlStatus::default(),
            last_dispatch: None,
        }
    }

    /// Newest first.
    pub fn items(&self) -> &[Rating] {
        &self.items
    }

    pub fn status(&self) -> &ControlStatus {
        &self.status
    }

    pub fn last_dispatch(&self) -> Option<&DispatchOutcome> {
        self.last_dispatch.as_ref()
    }

    pub async fn add(&mut self, input: &RatingInput) -> ServiceResult<Rating> {
        self.status.clear();
        let result = service::create_rating(&self.api, input, self.user_id).await;
        let (items, status) = (&mut self.items, &mut self.status);
        if_mounted(&self.guard, "ratings", || match &result {
            Ok(rating) => items.insert(0, rating.clone()),
            Err(f) => status.fail(f),
        });

        let rating = result?;
        let event = CreationEvent::Evaluation {
            ia_id: rating.ia.as_ref().map(|ia| ia.id).or(Some(input.ia_id)),
            ia_nome: rating.ia.as_ref().map(|ia| ia.nome.clone()),
        };
        self.last_dispatch = Some(self.notifier.dispatch(&event).await);
        Ok(rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::testing::harness;
    use axum::Router;
    use axum::extract::Json;
    use axum::routing::post;
    use serde_json::{Value, json};

    fn backend() -> Router {
        Router::new().route(
            "/avaliacoes",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "id": 100,
                    "nota": body["nota"],
                    "comentario": body["comentario"],
                    "usuario": { "id": body["usuarioId"], "nome": "Ana" },
                    "ia": { "id": body["iaId"], "nome": "EcoGPT" }
                }))
            }),
        )
    }

    #[tokio::test]
    async fn add_sends_session_user_and_notifies() {
        let h = harness(backend()).await;
        let mut control = RatingsControl::new(h.api, h.dispatcher, MountGuard::new(), 42);

        let rating = control
            .add(&RatingInput {
                nota: 8.0,
                comentario: Some("Rápida".into()),
                ia_id: 3,
            })
            .await
            .unwrap();

        assert_eq!(rating.usuario.as_ref().map(|u| u.id), Some(42));
        assert_eq!(control.items().len(), 1);
        let scheduled = h.local.scheduled();
        assert_eq!(scheduled[0].0.body, "Thanks for rating EcoGPT.");
        assert_eq!(scheduled[0].0.link.params["iaId"], 3);
    }

    #[tokio::test]
    async fn out_of_range_score_is_rejected() {
        let h = harness(backend()).await;
        let mut control = RatingsControl::new(h.api, h.dispatcher, MountGuard::new(), 42);

        let failure = control
            .add(&RatingInput {
                nota: 11.0,
                comentario: None,
                ia_id: 3,
            })
            .await
            .unwrap_err();
        assert_eq!(
            control.status().field_errors.get("nota"),
            Some("The score must be between 0 and 10.")
        );
        assert!(failure.is_validation());
        assert!(control.items().is_empty());
        assert!(h.local.scheduled().is_empty());
    }
}
