//! Records exchanged with the CRUD endpoints: prompts, tasks, ratings, users.
//!
//! Wire keys follow the backend (Portuguese, camelCase). The server copy is
//! authoritative; the client only ever replaces local records with what a
//! create/update call returns.

use serde::{Deserialize, Serialize};

/// Minimal user projection nested in other records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: i64,
    #[serde(default)]
    pub nome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profissao: Option<String>,
}

/// Catalog reference nested in ratings and recommendations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogRef {
    pub id: i64,
    #[serde(default)]
    pub nome: String,
}

/// A reusable prompt stored on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: i64,
    pub titulo: String,
    pub descricao: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_criacao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usuario: Option<UserRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptInput {
    pub titulo: String,
    pub descricao: String,
}

/// Generated recommendation attached to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: i64,
    #[serde(default)]
    pub conteudo_gerado: Option<String>,
    #[serde(default)]
    pub insights: Option<String>,
    #[serde(default)]
    pub passos: Option<String>,
    #[serde(default)]
    pub data_geracao: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usuario: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ia: Option<CatalogRef>,
}

/// A study task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub titulo: String,
    pub descricao: String,
    #[serde(default)]
    pub dificuldade: Option<String>,
    /// Available time in minutes.
    #[serde(default)]
    pub tempo_disponivel: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recomendacao: Option<Recommendation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub titulo: String,
    pub descricao: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dificuldade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo_disponivel: Option<i64>,
}

/// A rating as returned by `POST /avaliacoes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub nota: f64,
    #[serde(default)]
    pub comentario: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub usuario: Option<UserRef>,
    #[serde(default)]
    pub ia: Option<CatalogRef>,
}

/// What a user types when rating a catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingInput {
    pub nota: f64,
    pub comentario: Option<String>,
    pub ia_id: i64,
}

/// Wire body for `POST /avaliacoes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingPayload {
    pub nota: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comentario: Option<String>,
    pub usuario_id: i64,
    pub ia_id: i64,
}

impl RatingPayload {
    pub fn new(input: &RatingInput, usuario_id: i64) -> Self {
        Self {
            nota: input.nota,
            comentario: input.comentario.clone(),
            usuario_id,
            ia_id: input.ia_id,
        }
    }
}

/// Sign-in credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub senha: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileInput {
    pub nome: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_input_serializes_camel_case() {
        let input = TaskInput {
            titulo: "Revisar cálculo".into(),
            descricao: "Lista 3 inteira".into(),
            dificuldade: None,
            tempo_disponivel: Some(45),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["tempoDisponivel"], 45);
        assert!(json.get("dificuldade").is_none());
    }

    #[test]
    fn task_with_recommendation_parses() {
        let json = r#"{
            "id": 3,
            "titulo": "Estudar grafos",
            "descricao": "BFS e DFS",
            "dificuldade": null,
            "recomendacao": {
                "id": 9,
                "conteudoGerado": "Comece por BFS",
                "dataGeracao": "2026-05-01T10:00:00"
            }
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        let rec = task.recomendacao.unwrap();
        assert_eq!(rec.conteudo_gerado.as_deref(), Some("Comece por BFS"));
        assert!(rec.passos.is_none());
    }

    #[test]
    fn rating_payload_wire_shape() {
        let input = RatingInput {
            nota: 8.0,
            comentario: Some("bom".into()),
            ia_id: 4,
        };
        let json = serde_json::to_value(RatingPayload::new(&input, 1)).unwrap();
        assert_eq!(json["usuarioId"], 1);
        assert_eq!(json["iaId"], 4);
        assert_eq!(json["comentario"], "bom");
    }
}
