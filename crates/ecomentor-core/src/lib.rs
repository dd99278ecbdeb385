//! Core types for ecomentor: catalog ranking, records, validation, notification payloads.

pub mod catalog;
pub mod category;
pub mod event;
pub mod insight;
pub mod ranking;
pub mod records;
pub mod sort_key;
pub mod validate;

pub use catalog::{CatalogEntry, EcoRankingResponse, RatingRecord};
pub use category::{Category, CategoryInfo, resolve_category};
pub use event::{CreationEvent, DeepLink, NotificationContent, Platform, Screen};
pub use ranking::{RankedItem, RankingItem, derive_score, rank_catalog, rank_items};
pub use records::{
    Credentials, ProfileInput, Prompt, PromptInput, Rating, RatingInput, RatingPayload,
    Recommendation, Task, TaskInput,
};
pub use sort_key::{collation_key, compare_names};
pub use validate::FieldErrors;
