//! Word-token extraction for the Strong's-first path.
//!
//! A single pass over the raw (aligned) USFM body tracks the current
//! chapter/verse context and yields one [`Token`] per `\w … \w*` marker,
//! carrying whatever Strong's attributions its attribute list declares.

use regex::Regex;
use std::sync::LazyLock;

use super::Token;
use crate::types::StrongId;

/// One combined scan: chapter markers, verse markers, word tokens.
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\\c\s+(\d+)|\\v\s+(\d+)|\\w\s+([^|\\]*?)(?:\|([^\\]*?))?\\w\s*\*"#).unwrap()
});

/// `strong="…"` attribute values, accepting namespaced prefixes
/// (`x-strong=`, `strongs=`).
static STRONG_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"strongs?="([^"]*)""#).unwrap());

/// Extract word tokens with chapter/verse placement and Strong's ids.
///
/// Tokens seen before both a `\c` and a `\v` marker are dropped. Attribute
/// values may list several ids separated by commas, whitespace, or pipes;
/// anything that does not parse as a Strong's id is ignored.
pub fn tokens(usfm: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let mut chapter: Option<u32> = None;
    let mut verse: Option<u32> = None;

    for captures in MARKER.captures_iter(usfm) {
        if let Some(c) = captures.get(1) {
            chapter = c.as_str().parse().ok().filter(|n| *n > 0);
            verse = None;
        } else if let Some(v) = captures.get(2) {
            verse = v.as_str().parse().ok().filter(|n| *n > 0);
        } else if let Some(surface) = captures.get(3) {
            let surface = surface.as_str().trim();
            let (Some(chapter), Some(verse)) = (chapter, verse) else {
                continue;
            };
            if surface.is_empty() {
                continue;
            }
            let strongs = captures
                .get(4)
                .map(|attrs| parse_strongs(attrs.as_str()))
                .unwrap_or_default();
            out.push(Token {
                chapter,
                verse,
                surface: surface.to_string(),
                strongs,
            });
        }
    }
    out
}

fn parse_strongs(attrs: &str) -> Vec<StrongId> {
    let mut ids = Vec::new();
    for captures in STRONG_ATTR.captures_iter(attrs) {
        for raw in captures[1].split([',', '|', ' ', '\t']) {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            if let Ok(id) = StrongId::new(raw) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
    }
    ids
}
