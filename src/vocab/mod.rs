//! The Translation Words vocabulary: articles, headwords, Strong's sequences.
//!
//! [`archive`] parses the markdown archive into articles and headwords;
//! [`strongs`] inverts the richer `tw_strongs_list` form into the two lookup
//! maps the selector needs. Articles are kept in a `BTreeMap` so every
//! downstream index is built in lexicographic article order and output is
//! deterministic.

pub mod archive;
pub mod strongs;

pub use archive::from_archive_bytes;
pub use strongs::{SeqEntry, StrongsIndex};

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{ArchiveError, Result};
use crate::types::{ArticleId, StrongId};

/// One vocabulary article: its English headwords and Strong's sequences.
///
/// Either list may be empty; such articles add no rows of their own but still
/// participate in disambiguation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabEntry {
    /// Headwords, de-duplicated case-insensitively and sorted longest first
    /// (stable on original order).
    pub terms: Vec<String>,
    /// Strong's sequences; length-1 entries feed the singles index,
    /// length-≥2 entries the sequence index.
    pub strongs: Vec<Vec<StrongId>>,
}

impl VocabEntry {
    /// True when every sequence is empty (or there are none at all).
    pub fn has_no_strongs(&self) -> bool {
        self.strongs.iter().all(Vec::is_empty)
    }
}

/// The loaded vocabulary, keyed by article path.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: BTreeMap<ArticleId, VocabEntry>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains(&self, article: &ArticleId) -> bool {
        self.entries.contains_key(article)
    }

    #[inline]
    pub fn get(&self, article: &ArticleId) -> Option<&VocabEntry> {
        self.entries.get(article)
    }

    /// Articles in lexicographic path order.
    pub fn iter(&self) -> impl Iterator<Item = (&ArticleId, &VocabEntry)> {
        self.entries.iter()
    }

    pub fn insert(&mut self, article: ArticleId, entry: VocabEntry) {
        self.entries.insert(article, entry);
    }

    /// Merge the `tw_strongs_list` JSON form into the vocabulary.
    ///
    /// Each JSON entry carries `terms` and `strongs` for an article path.
    /// Strong's sequences always replace whatever was loaded before; terms
    /// fill in only for articles the archive did not provide. Invalid ids
    /// inside a sequence are skipped.
    pub fn apply_strongs_list(&mut self, json: &[u8]) -> Result<()> {
        #[derive(Deserialize)]
        struct ListEntry {
            #[serde(default)]
            terms: Vec<String>,
            #[serde(default)]
            strongs: Vec<Vec<String>>,
        }

        let list: BTreeMap<String, ListEntry> =
            serde_json::from_slice(json).map_err(|e| ArchiveError::StrongsList {
                reason: e.to_string(),
            })?;

        for (path, raw) in list {
            let Ok(article) = ArticleId::new(path.as_str()) else {
                tracing::warn!(path, "Skipping strongs-list entry with invalid article path");
                continue;
            };
            let strongs: Vec<Vec<StrongId>> = raw
                .strongs
                .iter()
                .map(|seq| {
                    seq.iter()
                        .filter_map(|raw| StrongId::new(raw).ok())
                        .collect()
                })
                .collect();
            let entry = self.entries.entry(article).or_default();
            if entry.terms.is_empty() {
                entry.terms = normalize_headwords(&raw.terms.join(", "));
            }
            entry.strongs = strongs;
        }
        Ok(())
    }
}

/// Normalize a comma-separated headword line.
///
/// Strips an optional leading `#`, trims each headword, removes trailing
/// parenthetical qualifiers (`Joseph (OT)` → `Joseph`), de-duplicates
/// case-insensitively, and sorts longest first with a stable tie-break on
/// original order.
pub fn normalize_headwords(first_line: &str) -> Vec<String> {
    let line = first_line.trim_start_matches('#').trim();
    let mut seen = Vec::<String>::new();
    let mut terms = Vec::new();
    for raw in line.split(',') {
        let mut term = raw.trim();
        if let Some(open) = term.rfind('(') {
            if term.ends_with(')') {
                term = term[..open].trim_end();
            }
        }
        if term.is_empty() {
            continue;
        }
        let lower = term.to_lowercase();
        if seen.contains(&lower) {
            continue;
        }
        seen.push(lower);
        terms.push(term.to_string());
    }
    terms.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    terms
}
