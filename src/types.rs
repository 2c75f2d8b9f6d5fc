//! Domain-specific types to replace primitive string obsession.
//!
//! This module provides strongly-typed alternatives to raw strings for:
//! - Vocabulary categories (kt, names, other)
//! - Article identifiers (validated `category/slug` paths)
//! - Strong's lemma identifiers (with homograph handling)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ArticleIdError, StrongIdError};

/// Category of a Translation Words article.
///
/// The category is the first segment of every article path and decides the
/// `Tags` column of an output row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Key terms (`kt/*`), tagged `keyterm`.
    Kt,
    /// Proper names (`names/*`), tagged `name`.
    Names,
    /// Everything else (`other/*`), untagged.
    Other,
}

impl Category {
    /// Returns the path segment for this category.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kt => "kt",
            Self::Names => "names",
            Self::Other => "other",
        }
    }

    /// Returns the `Tags` column value for articles in this category.
    #[inline]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Kt => "keyterm",
            Self::Names => "name",
            Self::Other => "",
        }
    }

    fn parse(segment: &str) -> Option<Self> {
        match segment {
            "kt" => Some(Self::Kt),
            "names" => Some(Self::Names),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated Translation Words article identifier.
///
/// Article paths have exactly two slash-separated segments: a category and a
/// lower-kebab slug, e.g. `kt/god` or `names/jerusalem`. The full path is the
/// primary key throughout the pipeline; ordering is lexicographic on it.
///
/// # Examples
///
/// ```
/// use twl_generator::types::{ArticleId, Category};
///
/// let id = ArticleId::new("kt/god").unwrap();
/// assert_eq!(id.category(), Category::Kt);
/// assert_eq!(id.slug(), "god");
/// assert_eq!(id.link(), "rc://*/tw/dict/bible/kt/god");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArticleId {
    category: Category,
    /// Full `category/slug` path; the slug borrows from this.
    path: String,
}

impl ArticleId {
    /// Parse and validate a `category/slug` path.
    pub fn new(path: impl Into<String>) -> Result<Self, ArticleIdError> {
        let path = path.into();
        let mut segments = path.split('/');
        let (Some(category), Some(slug), None) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(ArticleIdError::SegmentCount { path });
        };
        let Some(category) = Category::parse(category) else {
            return Err(ArticleIdError::UnknownCategory {
                category: category.to_string(),
            });
        };
        if slug.is_empty()
            || !slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ArticleIdError::InvalidSlug {
                slug: slug.to_string(),
            });
        }
        Ok(Self { category, path })
    }

    /// Build from a category and a bare slug.
    pub fn from_parts(category: Category, slug: &str) -> Result<Self, ArticleIdError> {
        Self::new(format!("{category}/{slug}"))
    }

    /// The full `category/slug` path.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The last path segment.
    #[inline]
    pub fn slug(&self) -> &str {
        // Validation guarantees exactly one '/'.
        &self.path[self.path.find('/').unwrap_or(0) + 1..]
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// The `TWLink` column rendering of this article.
    pub fn link(&self) -> String {
        format!("rc://*/tw/dict/bible/{}", self.path)
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl Serialize for ArticleId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.path.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ArticleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ArticleId::new(s).map_err(serde::de::Error::custom)
    }
}

/// A validated Strong's lemma identifier.
///
/// Accepts `H` (Hebrew/Aramaic) and `G` (Greek) numbers with an optional
/// single-letter homograph suffix, e.g. `H430`, `G2316`, `H7225a`. Input is
/// normalized to uppercase letter + digits + lowercase suffix, so `h430A`
/// and `H430a` compare equal.
///
/// The [`base`](Self::base) form strips the homograph suffix; both forms are
/// registered in the Strong's index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StrongId(String);

impl StrongId {
    /// Parse and normalize a Strong's identifier.
    pub fn new(raw: &str) -> Result<Self, StrongIdError> {
        let raw = raw.trim();
        let mut chars = raw.chars();
        let language = match chars.next() {
            Some(c @ ('H' | 'h' | 'G' | 'g')) => c.to_ascii_uppercase(),
            _ => {
                return Err(StrongIdError {
                    raw: raw.to_string(),
                });
            }
        };
        let rest = chars.as_str();
        let digits_len = rest.chars().take_while(char::is_ascii_digit).count();
        if digits_len == 0 {
            return Err(StrongIdError {
                raw: raw.to_string(),
            });
        }
        let suffix = match &rest[digits_len..] {
            "" => None,
            s => {
                let mut suffix_chars = s.chars();
                match (suffix_chars.next(), suffix_chars.next()) {
                    (Some(c), None) if matches!(c.to_ascii_lowercase(), 'a'..='f') => {
                        Some(c.to_ascii_lowercase())
                    }
                    _ => {
                        return Err(StrongIdError {
                            raw: raw.to_string(),
                        });
                    }
                }
            }
        };
        let mut normalized = String::with_capacity(raw.len());
        normalized.push(language);
        normalized.push_str(&rest[..digits_len]);
        if let Some(c) = suffix {
            normalized.push(c);
        }
        Ok(Self(normalized))
    }

    /// The normalized identifier, e.g. `H7225a`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier carries a homograph suffix letter.
    #[inline]
    pub fn has_suffix(&self) -> bool {
        self.0.ends_with(|c: char| c.is_ascii_lowercase())
    }

    /// The identifier with any homograph suffix stripped, e.g. `H7225`.
    pub fn base(&self) -> StrongId {
        if self.has_suffix() {
            Self(self.0[..self.0.len() - 1].to_string())
        } else {
            self.clone()
        }
    }
}

impl fmt::Display for StrongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StrongId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StrongId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        StrongId::new(&s).map_err(serde::de::Error::custom)
    }
}
