//! Category and glyph resolution for catalog type tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse category a catalog entry is grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Chat,
    Code,
    Image,
    Audio,
    Assistant,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Chat => "chat",
            Category::Code => "code",
            Category::Image => "image",
            Category::Audio => "audio",
            Category::Assistant => "assistant",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved category plus the glyph shown next to the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub category: Category,
    pub glyph: &'static str,
}

pub const FALLBACK: CategoryInfo = CategoryInfo {
    category: Category::Other,
    glyph: "🤖",
};

// Known tag spellings, English and Portuguese, already trimmed and lowercased.
const TYPE_TABLE: &[(&str, Category, &str)] = &[
    ("chat", Category::Chat, "🤖"),
    ("texto", Category::Chat, "🤖"),
    ("estudos", Category::Chat, "📚"),
    ("estudo", Category::Chat, "📚"),
    ("code", Category::Code, "💻"),
    ("codigo", Category::Code, "💻"),
    ("código", Category::Code, "💻"),
    ("programação", Category::Code, "💻"),
    ("programacao", Category::Code, "💻"),
    ("image", Category::Image, "🎨"),
    ("imagem", Category::Image, "🎨"),
    ("imagens", Category::Image, "🎨"),
    ("audio", Category::Audio, "🎧"),
    ("áudio", Category::Audio, "🎧"),
    ("voz", Category::Audio, "🎧"),
    ("assistant", Category::Assistant, "🧩"),
    ("assistente", Category::Assistant, "🧩"),
];

/// Trim and lowercase a raw tag. Blank or absent tags yield `None`.
pub fn normalize_tag(tag: Option<&str>) -> Option<String> {
    let tag = tag?.trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_lowercase())
    }
}

/// Resolve a raw type tag to its category and glyph.
///
/// Total: anything not in the table resolves to [`FALLBACK`].
pub fn resolve_category(tag: Option<&str>) -> CategoryInfo {
    let Some(tag) = normalize_tag(tag) else {
        return FALLBACK;
    };
    TYPE_TABLE
        .iter()
        .find(|(known, _, _)| *known == tag)
        .map(|&(_, category, glyph)| CategoryInfo { category, glyph })
        .unwrap_or(FALLBACK)
}
