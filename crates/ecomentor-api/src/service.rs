//! Service layer: validation, API call, and failure normalisation in one step.
//!
//! Every function here returns `Result<T, ServiceFailure>` and never panics.
//! A [`ServiceFailure`] carries one human-readable message plus optional
//! per-field messages, and serializes to the `{ok: false, erroGeral,
//! fieldErrors?}` shape the UI layer consumes.

use std::path::Path;

use ecomentor_core::insight::{
    CategoryUsage, EcoConsumption, EnvironmentReport, ExplainTaskRequest, RefineRequest,
    RefinedText, StudyPlan, StudyPlanRequest, TaskExplanation, TopUsage, UsageSummary,
};
use ecomentor_core::validate::{self, FieldErrors};
use ecomentor_core::{
    Prompt, PromptInput, RankedItem, Rating, RatingInput, RatingPayload, Recommendation, Task,
    TaskInput, rank_catalog,
};
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::warn;

use crate::{ApiClient, ApiError};

pub const COMMUNICATION_ERROR: &str = "Could not reach the server.";
pub const INVALID_REQUEST: &str = "Invalid request.";
pub const NOT_FOUND: &str = "Resource not found.";
pub const SERVER_ERROR: &str = "Server error.";
pub const VALIDATION_ERROR: &str = "Please fix the highlighted fields.";

pub type ServiceResult<T> = Result<T, ServiceFailure>;

/// A failed service call, ready to show to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceFailure {
    pub message: String,
    pub field_errors: FieldErrors,
}

impl ServiceFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field_errors: FieldErrors::new(),
        }
    }

    pub fn validation(field_errors: FieldErrors) -> Self {
        Self {
            message: VALIDATION_ERROR.to_string(),
            field_errors,
        }
    }

    pub fn is_validation(&self) -> bool {
        !self.field_errors.is_empty()
    }
}

impl Serialize for ServiceFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Wire<'a> {
            ok: bool,
            erro_geral: &'a str,
            #[serde(skip_serializing_if = "no_fields")]
            field_errors: &'a FieldErrors,
        }

        fn no_fields(f: &&FieldErrors) -> bool {
            f.is_empty()
        }

        Wire {
            ok: false,
            erro_geral: &self.message,
            field_errors: &self.field_errors,
        }
        .serialize(serializer)
    }
}

/// Coarse message for a non-2xx status.
pub fn message_for_status(status: u16, fallback: &str) -> String {
    match status {
        400 => INVALID_REQUEST.to_string(),
        404 => NOT_FOUND.to_string(),
        s if s >= 500 => SERVER_ERROR.to_string(),
        _ => fallback.to_string(),
    }
}

/// Map an error from the CRUD endpoints: status buckets, else `fallback`.
pub fn bucketed(err: &ApiError, fallback: &str) -> ServiceFailure {
    warn!(error = %err, "request failed");
    if err.is_transport() {
        return ServiceFailure::new(COMMUNICATION_ERROR);
    }
    match err.status() {
        Some(status) => ServiceFailure::new(message_for_status(status, fallback)),
        None => ServiceFailure::new(fallback),
    }
}

/// Map an error from the mentor/analytics/vision endpoints: the server's
/// `detail` wins, else `fallback`.
pub fn detailed(err: &ApiError, fallback: &str) -> ServiceFailure {
    warn!(error = %err, "request failed");
    if let Some(detail) = err.detail() {
        return ServiceFailure::new(detail);
    }
    if err.is_transport() {
        return ServiceFailure::new(COMMUNICATION_ERROR);
    }
    ServiceFailure::new(fallback)
}

// ── Catalog & ratings ──

/// Fetch the catalog and rank it.
pub async fn load_ranking(client: &ApiClient) -> ServiceResult<Vec<RankedItem>> {
    let entries = client
        .list_catalog()
        .await
        .map_err(|e| bucketed(&e, "Could not load the AI ranking."))?;
    Ok(rank_catalog(&entries))
}

pub async fn create_rating(
    client: &ApiClient,
    input: &RatingInput,
    user_id: i64,
) -> ServiceResult<Rating> {
    validate::validate_rating(input).map_err(ServiceFailure::validation)?;
    client
        .create_rating(&RatingPayload::new(input, user_id))
        .await
        .map_err(|e| bucketed(&e, "Could not save the evaluation."))
}

// ── Prompts ──

pub async fn list_prompts(client: &ApiClient) -> ServiceResult<Vec<Prompt>> {
    client
        .list_prompts()
        .await
        .map_err(|e| bucketed(&e, "Could not list the prompts."))
}

pub async fn create_prompt(client: &ApiClient, input: &PromptInput) -> ServiceResult<Prompt> {
    validate::validate_prompt(input).map_err(ServiceFailure::validation)?;
    client
        .create_prompt(input)
        .await
        .map_err(|e| bucketed(&e, "Could not create the prompt."))
}

pub async fn update_prompt(
    client: &ApiClient,
    id: i64,
    input: &PromptInput,
) -> ServiceResult<Prompt> {
    validate::validate_prompt(input).map_err(ServiceFailure::validation)?;
    client
        .update_prompt(id, input)
        .await
        .map_err(|e| bucketed(&e, "Could not update the prompt."))
}

pub async fn delete_prompt(client: &ApiClient, id: i64) -> ServiceResult<()> {
    client
        .delete_prompt(id)
        .await
        .map_err(|e| bucketed(&e, "Could not delete the prompt."))
}

// ── Tasks ──

pub async fn list_tasks(client: &ApiClient) -> ServiceResult<Vec<Task>> {
    client
        .list_tasks()
        .await
        .map_err(|e| bucketed(&e, "Could not list the tasks."))
}

pub async fn create_task(client: &ApiClient, input: &TaskInput) -> ServiceResult<Task> {
    validate::validate_task(input).map_err(ServiceFailure::validation)?;
    client
        .create_task(input)
        .await
        .map_err(|e| bucketed(&e, "Could not create the task."))
}

pub async fn generate_recommendation(
    client: &ApiClient,
    task_id: i64,
) -> ServiceResult<Recommendation> {
    client
        .generate_recommendation(task_id)
        .await
        .map_err(|e| bucketed(&e, "Could not generate the recommendation."))
}

// ── Mentor ──

fn required(field: &str, label: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        let mut errors = FieldErrors::new();
        errors.add(field, format!("{label} is required."));
        return Err(ServiceFailure::validation(errors));
    }
    Ok(())
}

pub async fn explain_task(
    client: &ApiClient,
    descricao: &str,
    contexto: Option<&str>,
) -> ServiceResult<TaskExplanation> {
    required("descricao", "Task description", descricao)?;
    let req = ExplainTaskRequest {
        descricao: descricao.trim().to_string(),
        contexto: contexto
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
    };
    client
        .explain_task(&req)
        .await
        .map_err(|e| detailed(&e, "Could not reach the AI mentor."))
}

pub async fn study_plan(
    client: &ApiClient,
    objetivo: &str,
    horas_semana: u32,
) -> ServiceResult<StudyPlan> {
    required("objetivo", "Goal", objetivo)?;
    if horas_semana == 0 {
        let mut errors = FieldErrors::new();
        errors.add("horas_semana", "Weekly hours must be greater than zero.");
        return Err(ServiceFailure::validation(errors));
    }
    let req = StudyPlanRequest {
        objetivo: objetivo.trim().to_string(),
        horas_semana,
    };
    client
        .study_plan(&req)
        .await
        .map_err(|e| detailed(&e, "Could not generate the study plan."))
}

pub async fn refine_result(client: &ApiClient, req: &RefineRequest) -> ServiceResult<RefinedText> {
    required("texto_inicial", "Text", &req.texto_inicial)?;
    client
        .refine_result(req)
        .await
        .map_err(|e| detailed(&e, "Could not refine the text."))
}

pub async fn usage_summary(client: &ApiClient, user_id: &str) -> ServiceResult<UsageSummary> {
    client
        .usage_summary(user_id)
        .await
        .map_err(|e| detailed(&e, "Could not load the AI usage summary."))
}

// ── Analytics ──

pub async fn top_used(client: &ApiClient, top: u32) -> ServiceResult<Vec<TopUsage>> {
    client
        .top_used(top)
        .await
        .map_err(|e| detailed(&e, "Could not load the most used AIs."))
}

pub async fn usage_by_category(client: &ApiClient) -> ServiceResult<Vec<CategoryUsage>> {
    client
        .usage_by_category()
        .await
        .map_err(|e| detailed(&e, "Could not load usage by category."))
}

pub async fn eco_consumption(client: &ApiClient, user_id: &str) -> ServiceResult<EcoConsumption> {
    client
        .eco_consumption(user_id)
        .await
        .map_err(|e| detailed(&e, "Could not load the eco consumption."))
}

// ── Vision ──

pub async fn analyze_environment(
    client: &ApiClient,
    path: &Path,
) -> ServiceResult<EnvironmentReport> {
    client
        .analyze_environment_file(path)
        .await
        .map_err(|e| detailed(&e, "Could not analyze the photo."))
}
