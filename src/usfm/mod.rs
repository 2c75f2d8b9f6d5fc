//! Light USFM handling: alignment-markup stripping and word-token extraction.
//!
//! Two independent passes serve the two pipeline modes. The clean-text pass
//! ([`clean::strip_markup`] + [`clean::verses`]) reduces an aligned USFM body
//! to plain verse text for trie scanning. The token pass
//! ([`tokenize::tokens`]) walks `\c`/`\v`/`\w` markers and yields word
//! surfaces with their Strong's attributions.

pub mod clean;
pub mod tokenize;

pub use clean::{strip_markup, verses, Verse};
pub use tokenize::tokens;

use crate::types::StrongId;

/// A word token from aligned USFM, located at a chapter and verse.
///
/// Tokens seen before the first `\c`/`\v` pair are dropped by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub chapter: u32,
    pub verse: u32,
    /// The English surface text, verbatim.
    pub surface: String,
    /// Strong's attributions, in attribute order; may be empty.
    pub strongs: Vec<StrongId>,
}
