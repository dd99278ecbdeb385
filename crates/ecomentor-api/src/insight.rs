//! Mentor, analytics and vision endpoints.

use std::path::Path;

use ecomentor_core::insight::{
    CategoryUsage, CategoryUsageResponse, EcoConsumption, EnvironmentReport, ExplainTaskRequest,
    RefineRequest, RefinedText, StudyPlan, StudyPlanRequest, TaskExplanation, TopUsage,
    TopUsageResponse, UsageSummary,
};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::{ApiClient, ApiError};

/// Default number of entries requested from the most-used analytics.
pub const DEFAULT_TOP: u32 = 5;

impl ApiClient {
    // ── Mentor ──

    pub async fn explain_task(&self, req: &ExplainTaskRequest) -> Result<TaskExplanation, ApiError> {
        info!("asking mentor to explain task");
        self.execute(self.request(Method::POST, "/mentor/explicar-tarefa").json(req))
            .await
    }

    pub async fn study_plan(&self, req: &StudyPlanRequest) -> Result<StudyPlan, ApiError> {
        info!(horas_semana = req.horas_semana, "requesting study plan");
        self.execute(self.request(Method::POST, "/mentor/plano-estudo").json(req))
            .await
    }

    pub async fn refine_result(&self, req: &RefineRequest) -> Result<RefinedText, ApiError> {
        info!(tipo = %req.tipo, tom = %req.tom, "refining text");
        self.execute(self.request(Method::POST, "/mentor/refinar-resultado").json(req))
            .await
    }

    pub async fn usage_summary(&self, user_id: &str) -> Result<UsageSummary, ApiError> {
        self.execute(
            self.request(Method::GET, "/mentor/resumo-uso-ia")
                .query(&[("usuario_id", user_id)]),
        )
        .await
    }

    // ── Analytics ──

    pub async fn top_used(&self, top: u32) -> Result<Vec<TopUsage>, ApiError> {
        let resp: TopUsageResponse = self
            .execute(
                self.request(Method::GET, "/analytics/ias-mais-usadas")
                    .query(&[("top", top)]),
            )
            .await?;
        Ok(resp.top)
    }

    pub async fn usage_by_category(&self) -> Result<Vec<CategoryUsage>, ApiError> {
        let resp: CategoryUsageResponse = self
            .execute(self.request(Method::GET, "/analytics/uso-por-categoria"))
            .await?;
        Ok(resp.categorias)
    }

    pub async fn eco_consumption(&self, user_id: &str) -> Result<EcoConsumption, ApiError> {
        self.execute(self.request(
            Method::GET,
            &format!("/analytics/eco/consumo-usuario/{user_id}"),
        ))
        .await
    }

    // ── Vision ──

    /// Upload a workspace photo for analysis (multipart field `imagem`).
    pub async fn analyze_environment(
        &self,
        image: Vec<u8>,
        file_name: &str,
        mime: &str,
    ) -> Result<EnvironmentReport, ApiError> {
        info!(bytes = image.len(), file_name, "uploading workspace photo");
        let part = Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part("imagem", part);
        self.execute(
            self.request(Method::POST, "/visao/ambiente-trabalho")
                .multipart(form),
        )
        .await
    }

    /// Read an image from disk and upload it.
    pub async fn analyze_environment_file(&self, path: &Path) -> Result<EnvironmentReport, ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("foto.jpg");
        self.analyze_environment(bytes, file_name, mime_for(path))
            .await
    }
}

/// Image MIME type from a file extension; JPEG when unknown.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}
