//! Response shapes of the mentor, analytics and vision endpoints.
//!
//! These endpoints use snake_case keys, unlike the CRUD records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Mentor ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainTaskRequest {
    pub descricao: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contexto: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Baixa,
    Media,
    Alta,
}

/// How a task should be approached, with and without AI help.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskExplanation {
    pub ia_indicada: String,
    pub quando_usar: String,
    pub quando_evitar: String,
    #[serde(default)]
    pub passos_humano: Vec<String>,
    #[serde(default)]
    pub passos_com_ia: Vec<String>,
    pub dificuldade: Difficulty,
    pub tempo_estimado_min: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyPlanRequest {
    pub objetivo: String,
    pub horas_semana: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyWeek {
    pub semana: u32,
    pub foco: String,
    #[serde(default)]
    pub temas: Vec<String>,
    #[serde(default)]
    pub tarefas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub objetivo: String,
    pub duracao_semanas: u32,
    #[serde(default)]
    pub semanas: Vec<StudyWeek>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefineRequest {
    /// Output kind, e.g. "post_linkedin" or "roteiro_video".
    pub tipo: String,
    pub texto_inicial: String,
    pub tom: String,
    pub tamanho: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedText {
    pub texto_refinado: String,
    #[serde(default)]
    pub explicacao_melhorias: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub usuario_id: String,
    pub resumo: String,
}

// ── Analytics ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopUsage {
    pub ia_id: String,
    pub nome: String,
    pub usos: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopUsageResponse {
    #[serde(default)]
    pub top: Vec<TopUsage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryUsage {
    pub categoria: String,
    pub usos: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUsageResponse {
    #[serde(default)]
    pub categorias: Vec<CategoryUsage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcoConsumptionDetail {
    pub ia_id: String,
    pub nome: String,
    pub usos: u64,
    pub consumo_wh: f64,
}

/// Estimated energy use attributed to one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcoConsumption {
    pub usuario_id: String,
    pub total_consumo_wh_estimado: f64,
    #[serde(default)]
    pub detalhado: Vec<EcoConsumptionDetail>,
}

// ── Vision ──

/// Workspace analysis produced from an uploaded photo.
///
/// The three sub-reports are free-form; the server fills them from a model
/// response and their keys drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReport {
    pub classificacao_geral: String,
    #[serde(default)]
    pub ergonomia: Value,
    #[serde(default)]
    pub iluminacao: Value,
    #[serde(default)]
    pub organizacao: Value,
    #[serde(default)]
    pub recomendacoes: Vec<String>,
}

impl EnvironmentReport {
    /// The `nivel` field of a sub-report, if the server sent one.
    pub fn level(section: &Value) -> Option<&str> {
        section.get("nivel").and_then(Value::as_str)
    }
}
