use std::sync::Arc;

use ecomentor_api::{ApiClient, ServiceResult, service};
use ecomentor_core::{CreationEvent, Prompt, PromptInput};

use super::{ControlStatus, if_mounted};
use crate::MountGuard;
use crate::notify::{DispatchOutcome, Dispatcher};

/// Saved prompts, with create/edit/delete.
pub struct PromptsControl {
    api: ApiClient,
    notifier: Arc<Dispatcher>,
    guard: MountGuard,
    items: Vec<Prompt>,
    status: ControlStatus,
    last_dispatch: Option<DispatchOutcome>,
}

impl PromptsControl {
    pub fn new(api: ApiClient, notifier: Arc<Dispatcher>, guard: MountGuard) -> Self {
        Self {
            api,
            notifier,
            guard,
            items: Vec::new(),
            status: ControlStatus::default(),
            last_dispatch: None,
        }
    }

    /// Prompts ordered by id.
    pub fn items(&self) -> Vec<&Prompt> {
        let mut items: Vec<&Prompt> = self.items.iter().collect();
        items.sort_by_key(|p| p.id);
        items
    }

    pub fn status(&self) -> &ControlStatus {
        &self.status
    }

    pub fn last_dispatch(&self) -> Option<&DispatchOutcome> {
        self.last_dispatch.as_ref()
    }

    pub async fn reload(&mut self) -> ServiceResult<()> {
        let result = service::list_prompts(&self.api).await;
        let (items, status) = (&mut self.items, &mut self.status);
        if_mounted(&self.guard, "prompts", || match &result {
            Ok(list) => {
                *items = list.clone();
                status.clear();
            }
            Err(f) => status.fail(f),
        });
        result.map(|_| ())
    }

    /// Validate, create, then announce the new prompt.
    pub async fn add(&mut self, input: &PromptInput) -> ServiceResult<Prompt> {
        self.status.clear();
        let result = service::create_prompt(&self.api, input).await;
        let (items, status) = (&mut self.items, &mut self.status);
        if_mounted(&self.guard, "prompts", || match &result {
            Ok(prompt) => items.insert(0, prompt.clone()),
            Err(f) => status.fail(f),
        });

        let prompt = result?;
        let event = CreationEvent::Prompt {
            id: prompt.id,
            titulo: prompt.titulo.clone(),
        };
        self.last_dispatch = Some(self.notifier.dispatch(&event).await);
        Ok(prompt)
    }

    pub async fn update(&mut self, id: i64, input: &PromptInput) -> ServiceResult<Prompt> {
        self.status.clear();
        let result = service::update_prompt(&self.api, id, input).await;
        let (items, status) = (&mut self.items, &mut self.status);
        if_mounted(&self.guard, "prompts", || match &result {
            Ok(updated) => {
                for p in items.iter_mut().filter(|p| p.id == id) {
                    *p = updated.clone();
                }
            }
            Err(f) => status.fail(f),
        });
        result
    }

    pub async fn remove(&mut self, id: i64) -> ServiceResult<()> {
        self.status.clear();
        let result = service::delete_prompt(&self.api, id).await;
        let (items, status) = (&mut self.items, &mut self.status);
        if_mounted(&self.guard, "prompts", || match &result {
            Ok(()) => items.retain(|p| p.id != id),
            Err(f) => status.fail(f),
        });
        result
    }
}
