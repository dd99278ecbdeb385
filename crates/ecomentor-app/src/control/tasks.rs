use std::collections::HashSet;
use std::sync::Arc;

use ecomentor_api::{ApiClient, ServiceResult, service};
use ecomentor_core::{CreationEvent, Recommendation, Task, TaskInput};
use tracing::info;

use super::{ControlStatus, if_mounted};
use crate::MountGuard;
use crate::notify::{DispatchOutcome, Dispatcher};

/// Study tasks and their generated recommendations.
///
/// The backend has no task delete; [`TasksControl::hide`] only removes a
/// task from this view.
pub struct TasksControl {
    api: ApiClient,
    notifier: Arc<Dispatcher>,
    guard: MountGuard,
    items: Vec<Task>,
    hidden: HashSet<i64>,
    status: ControlStatus,
    last_dispatch: Option<DispatchOutcome>,
}

impl TasksControl {
    pub fn new(api: ApiClient, notifier: Arc<Dispatcher>, guard: MountGuard) -> Self {
        Self {
            api,
            notifier,
            guard,
            items: Vec::new(),
            hidden: HashSet::new(),
            status: ControlStatus::default(),
            last_dispatch: None,
        }
    }

    /// Tasks ordered by id, minus hidden ones.
    pub fn visible(&self) -> Vec<&Task> {
        let mut items: Vec<&Task> = self
            .items
            .iter()
            .filter(|t| !self.hidden.contains(&t.id))
            .collect();
        items.sort_by_key(|t| t.id);
        items
    }

    pub fn status(&self) -> &ControlStatus {
        &self.status
    }

    pub fn last_dispatch(&self) -> Option<&DispatchOutcome> {
        self.last_dispatch.as_ref()
    }

    pub async fn reload(&mut self) -> ServiceResult<()> {
        let result = service::list_tasks(&self.api).await;
        let (items, status) = (&mut self.items, &mut self.status);
        if_mounted(&self.guard, "tasks", || match &result {
            Ok(list) => {
                *items = list.clone();
                status.clear();
            }
            Err(f) => status.fail(f),
        });
        result.map(|_| ())
    }

    /// Validate, create, then announce the new task.
    pub async fn add(&mut self, input: &TaskInput) -> ServiceResult<Task> {
        self.status.clear();
        let result = service::create_task(&self.api, input).await;
        let (items, status) = (&mut self.items, &mut self.status);
        if_mounted(&self.guard, "tasks", || match &result {
            Ok(task) => items.insert(0, task.clone()),
            Err(f) => status.fail(f),
        });

        let task = result?;
        let event = CreationEvent::Task {
            id: task.id,
            titulo: task.titulo.clone(),
        };
        self.last_dispatch = Some(self.notifier.dispatch(&event).await);
        Ok(task)
    }

    /// Generate a recommendation and attach it to the task.
    pub async fn recommend(&mut self, task_id: i64) -> ServiceResult<Recommendation> {
        self.status.clear();
        let result = service::generate_recommendation(&self.api, task_id).await;
        let (items, status) = (&mut self.items, &mut self.status);
        if_mounted(&self.guard, "tasks", || match &result {
            Ok(rec) => {
                for t in items.iter_mut().filter(|t| t.id == task_id) {
                    t.recomendacao = Some(rec.clone());
                }
            }
            Err(f) => status.fail(f),
        });
        result
    }

    /// Drop a task from this view. Nothing is sent to the backend.
    pub fn hide(&mut self, task_id: i64) {
        if self.hidden.insert(task_id) {
            info!(task_id, "task hidden from view");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::testing::harness;
    use axum::Router;
    use axum::extract::{Json, Path};
    use axum::routing::{get, post};
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn backend(hits: Arc<AtomicU32>) -> Router {
        Router::new()
            .route(
                "/tarefas",
                get(move || async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!([
                        { "id": 3, "titulo": "Ler artigo", "descricao": "Ler e anotar" },
                        { "id": 1, "titulo": "Revisar", "descricao": "Revisar slides", "tempoDisponivel": 30 }
                    ]))
                })
                .post(|Json(body): Json<Value>| async move {
                    Json(json!({ "id": 7, "titulo": body["titulo"], "descricao": body["descricao"] }))
                }),
            )
            .route(
                "/recomendacoes/gerar/{id}",
                post(|Path(id): Path<i64>| async move {
                    Json(json!({ "id": 40 + id, "conteudoGerado": "Divida em blocos", "dataGeracao": "2026-10-16" }))
                }),
            )
    }

    #[tokio::test]
    async fn hide_is_local_only() {
        let hits = Arc::new(AtomicU32::new(0));
        let h = harness(backend(hits.clone())).await;
        let mut control = TasksControl::new(h.api, h.dispatcher, MountGuard::new());
        control.reload().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        control.hide(1);
        let ids: Vec<i64> = control.visible().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn add_and_recommend() {
        let h = harness(backend(Arc::default())).await;
        let mut control = TasksControl::new(h.api, h.dispatcher, MountGuard::new());
        control.reload().await.unwrap();

        let task = control
            .add(&TaskInput {
                titulo: "Praticar".into(),
                descricao: "Resolver exercícios".into(),
                dificuldade: Some("media".into()),
                tempo_disponivel: Some(45),
            })
            .await
            .unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(control.visible().len(), 3);
        assert_eq!(h.local.scheduled()[0].0.link.params["tarefaId"], 7);

        let rec = control.recommend(3).await.unwrap();
        assert_eq!(rec.id, 43);
        let task3 = control.visible().into_iter().find(|t| t.id == 3).unwrap();
        assert_eq!(
            task3.recomendacao.as_ref().and_then(|r| r.conteudo_gerado.as_deref()),
            Some("Divida em blocos")
        );
    }

    #[tokio::test]
    async fn zero_minutes_is_rejected_locally() {
        let h = harness(backend(Arc::default())).await;
        let mut control = TasksControl::new(h.api, h.dispatcher, MountGuard::new());
        let failure = control
            .add(&TaskInput {
                titulo: "Praticar".into(),
                descricao: "Resolver exercícios".into(),
                dificuldade: None,
                tempo_disponivel: Some(0),
            })
            .await
            .unwrap_err();
        assert!(failure.field_errors.get("tempoDisponivel").is_some());
        assert!(control.last_dispatch().is_none());
    }
}
