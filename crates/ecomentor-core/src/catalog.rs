//! Raw catalog entries as served by the eco-ranking endpoint.
//!
//! The backend is not consistent about field names (`nome` vs `name`,
//! `eco_score` vs `ecoScore`, ...) nor about numeric types. All of that is
//! absorbed here, at deserialization, so nothing downstream has to guess.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A catalog entry before ranking. Read-only on the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(alias = "nome", default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(alias = "descricao", default, deserialize_with = "string_or_empty")]
    pub description: String,
    /// Free-text type tag, e.g. "chat" or "imagem".
    #[serde(rename = "type", alias = "tipo", default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(alias = "ecoScore", default, deserialize_with = "lenient_f64")]
    pub eco_score: Option<f64>,
    #[serde(alias = "avaliacoes", default, deserialize_with = "list_or_empty")]
    pub ratings: Vec<RatingRecord>,
}

/// A single rating attached to a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    /// Score in [0, 10]; `None` when the server sent something non-numeric.
    #[serde(alias = "nota", default, deserialize_with = "lenient_f64")]
    pub score: Option<f64>,
}

impl RatingRecord {
    pub fn new(score: f64) -> Self {
        Self { score: Some(score) }
    }
}

/// Envelope returned by `GET /ias/eco-ranking`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EcoRankingResponse {
    #[serde(default, deserialize_with = "list_or_empty")]
    pub eco_ranking: Vec<CatalogEntry>,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|n| !n.is_nan()))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Strings pass through; anything else reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portuguese_field_names_are_accepted() {
        let json = r#"{
            "id": "gpt4o",
            "nome": "GPT-4o",
            "descricao": "Chat generalista",
            "tipo": "texto",
            "eco_score": 6.5,
            "consumo_wh": 3.1
        }"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "gpt4o");
        assert_eq!(entry.name, "GPT-4o");
        assert_eq!(entry.description, "Chat generalista");
        assert_eq!(entry.kind.as_deref(), Some("texto"));
        assert_eq!(entry.eco_score, Some(6.5));
        assert!(entry.ratings.is_empty());
    }

    #[test]
    fn english_field_names_are_accepted() {
        let json = r#"{
            "id": 7,
            "name": "Copilot",
            "description": "Pair programmer",
            "type": "code",
            "ecoScore": 8,
            "ratings": [{"score": 9}, {"score": 7}]
        }"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "7");
        assert_eq!(entry.kind.as_deref(), Some("code"));
        assert_eq!(entry.eco_score, Some(8.0));
        assert_eq!(entry.ratings.len(), 2);
    }

    #[test]
    fn malformed_numbers_become_absent() {
        let json = r#"{
            "id": "x",
            "nome": "X",
            "descricao": null,
            "eco_score": "high",
            "avaliacoes": [{"nota": "nove"}, {"nota": 4}, {}]
        }"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.description, "");
        assert_eq!(entry.eco_score, None);
        let scores: Vec<Option<f64>> = entry.ratings.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![None, Some(4.0), None]);
    }

    #[test]
    fn eco_ranking_envelope() {
        let json = r#"{"eco_ranking": [
            {"id": "a", "nome": "A", "eco_score": 9.1},
            {"id": "b", "nome": "B", "avaliacoes": null}
        ]}"#;
        let resp: EcoRankingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.eco_ranking.len(), 2);
        assert_eq!(resp.eco_ranking[1].ratings, Vec::new());
    }

    #[test]
    fn bad_name_or_type_keeps_the_rest_of_the_catalog() {
        let json = r#"{"eco_ranking": [
            {"id": "a", "nome": "A", "eco_score": 9.1},
            {"id": "b", "eco_score": 5, "tipo": 3},
            {"id": "c", "nome": null, "tipo": ["chat"], "eco_score": 7}
        ]}"#;
        let resp: EcoRankingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.eco_ranking.len(), 3);
        assert_eq!(resp.eco_ranking[1].name, "");
        assert_eq!(resp.eco_ranking[1].kind, None);
        assert_eq!(resp.eco_ranking[2].kind, None);

        let ranked = crate::rank_catalog(&resp.eco_ranking);
        let ids: Vec<&str> = ranked.iter().map(|r| r.item.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
        assert_eq!(ranked[2].item.category, crate::Category::Other);
    }

    #[test]
    fn missing_envelope_list_is_empty() {
        let resp: EcoRankingResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.eco_ranking.is_empty());
    }
}
