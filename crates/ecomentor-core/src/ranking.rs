//! Client-side ranking of catalog entries.
//!
//! Every fetch of the catalog is normalised into [`RankingItem`]s and then
//! ordered into [`RankedItem`]s. Nothing here is persisted; the whole list is
//! rebuilt on the next reload.
//!
//! # Algorithm
//!
//! 1. Resolve the type tag to a category and glyph ([`resolve_category`])
//! 2. Average the numeric ratings; without ratings use the eco-score; else 0
//! 3. Clamp the average to [0, 10] and round half-up to an integer score
//! 4. Sort by integer score desc, rating count desc, then name (collated)
//! 5. Assign 1-based ranks in sorted order

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::CatalogEntry;
use crate::category::{Category, normalize_tag, resolve_category};
use crate::sort_key::compare_names;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

/// Score derived from ratings or, failing that, the eco-score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedScore {
    /// Clamped average on the 0–10 scale.
    pub average: f64,
    /// `average` rounded half-up.
    pub score: u8,
    /// Number of ratings that contributed to `average`.
    pub rating_count: usize,
}

/// View projection of a catalog entry, before ranks are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub glyph: String,
    /// Trimmed, lowercased tag as sent by the server.
    pub raw_type: Option<String>,
    /// Eco-score as sent, or 0 when absent.
    pub eco_score: f64,
    pub average_score: f64,
    pub score: u8,
    pub total_ratings: usize,
}

/// A [`RankingItem`] with its 1-based position in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    pub rank: usize,
    #[serde(flatten)]
    pub item: RankingItem,
}

/// Derive the displayed score from rating values and an optional eco-score.
///
/// Non-finite values are treated as absent. Never fails.
pub fn derive_score<I>(ratings: I, eco_score: Option<f64>) -> DerivedScore
where
    I: IntoIterator<Item = Option<f64>>,
{
    let values: Vec<f64> = ratings
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();

    let raw = if !values.is_empty() {
        values.iter().sum::<f64>() / values.len() as f64
    } else if let Some(eco) = eco_score.filter(|e| e.is_finite()) {
        eco
    } else {
        0.0
    };

    let average = raw.clamp(MIN_SCORE, MAX_SCORE);
    // Non-negative here, so `round` (half away from zero) is round-half-up.
    let score = average.round() as u8;

    DerivedScore {
        average,
        score,
        rating_count: values.len(),
    }
}

/// Normalise one catalog entry into a ranking item.
pub fn to_ranking_item(entry: &CatalogEntry) -> RankingItem {
    let info = resolve_category(entry.kind.as_deref());
    let derived = derive_score(entry.ratings.iter().map(|r| r.score), entry.eco_score);

    RankingItem {
        id: entry.id.clone(),
        name: entry.name.clone(),
        description: entry.description.clone(),
        category: info.category,
        glyph: info.glyph.to_string(),
        raw_type: normalize_tag(entry.kind.as_deref()),
        eco_score: entry.eco_score.unwrap_or(0.0),
        average_score: derived.average,
        score: derived.score,
        total_ratings: derived.rating_count,
    }
}

/// Order items and assign dense 1-based ranks.
pub fn rank_items(mut items: Vec<RankingItem>) -> Vec<RankedItem> {
    items.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(b.total_ratings.cmp(&a.total_ratings))
            .then_with(|| compare_names(&a.name, &b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| RankedItem {
            rank: index + 1,
            item,
        })
        .collect()
}

/// Normalise and rank a full catalog fetch.
pub fn rank_catalog(entries: &[CatalogEntry]) -> Vec<RankedItem> {
    let ranked = rank_items(entries.iter().map(to_ranking_item).collect());
    debug!(count = ranked.len(), "ranked catalog");
    ranked
}
