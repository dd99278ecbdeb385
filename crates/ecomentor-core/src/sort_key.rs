//! Sort key normalisation for catalog display names.
//!
//! Converts display names (e.g., "Écrivain", "chatgpt", "  Claude ") into
//! keys whose plain byte order approximates a locale-aware, case-insensitive
//! collation, so that "Érica" sorts next to "erica" instead of after "zeta".
//!
//! # Folding rules
//!
//! - Surrounding whitespace is ignored
//! - Canonical decomposition (NFD) splits accented letters into base + mark
//! - Combining marks are dropped: "é" → "e", "ç" → "c", "ã" → "a"
//! - The remainder is lowercased with full Unicode case mapping

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold a display name into its collation key.
///
/// Input: "  Programação " → Output: "programacao"
pub fn collation_key(name: &str) -> String {
    name.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare two display names case-insensitively, ignoring accents.
///
/// Names that fold to the same key are ordered by their raw text so the
/// comparison stays total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}
