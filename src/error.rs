//! Centralized error handling with typed error enums.
//!
//! Errors are designed to:
//! - Provide detailed context via Debug for logging (`{:?}`)
//! - Provide user-friendly messages via Display for CLI output (`{}`)
//! - Enable pattern matching for the recovery policy: batch mode downcasts
//!   to [`UsfmError`] to keep going past per-book failures, and
//!   companion-service failures fall back to copied columns
//!
//! # Error Domains
//!
//! ```text
//! BookError    - Book code resolution (fatal, surfaced to the caller)
//! ArchiveError - Vocabulary archive fetch/parse (fatal for the invocation)
//! UsfmError    - Reference translation fetch/parse (fatal for the book;
//!                batch mode logs and continues)
//! ServiceError - Companion quote services (never fatal; drivers recover)
//! ```

use thiserror::Error;

/// A specialized Result type for twl-generator operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()`
/// and `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Errors resolving a book code against the canon table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// The code is not one of the 66 canon book codes.
    #[error("Unknown book code '{code}' (expected a canon code like 'gen' or 'rev')")]
    Unknown { code: String },
}

/// Errors loading the Translation Words vocabulary archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive could not be fetched.
    #[error("Failed to fetch vocabulary archive: {reason}")]
    FetchFailed { reason: String },

    /// The bytes are not a readable zip archive.
    #[error("Failed to read vocabulary archive: {reason}")]
    Unreadable { reason: String },

    /// The `tw_strongs_list` companion JSON could not be parsed.
    #[error("Failed to parse Strong's list: {reason}")]
    StrongsList { reason: String },

    /// The archive contained no article files.
    #[error("Vocabulary archive contains no articles under bible/")]
    Empty,
}

/// Errors fetching or parsing the USFM reference translation.
#[derive(Debug, Error)]
pub enum UsfmError {
    /// The content endpoint could not be reached or returned an error status.
    #[error("Failed to fetch USFM for '{book}': {reason}")]
    FetchFailed { book: String, reason: String },

    /// The endpoint payload was not the expected `{ content: <base64> }` shape.
    #[error("Malformed USFM payload for '{book}': {reason}")]
    MalformedPayload { book: String, reason: String },

    /// The decoded body contained no `\c` chapter markers.
    #[error("USFM body for '{book}' contains no chapters")]
    NoChapters { book: String },
}

/// Errors from the companion TSV services (add-GL-quote, GL→OL converter).
///
/// These are reported for logging but never abort a run; callers apply the
/// documented fallback instead.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service could not be reached or returned an error status.
    #[error("Service '{service}' failed: {reason}")]
    RequestFailed { service: String, reason: String },

    /// The service returned a TSV with the wrong shape.
    #[error("Service '{service}' returned a malformed TSV: {reason}")]
    MalformedResponse { service: String, reason: String },
}

/// Error type for invalid article identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArticleIdError {
    /// Not exactly `category/slug`.
    #[error("article path '{path}' must have exactly two segments")]
    SegmentCount { path: String },

    /// Category segment is not kt, names, or other.
    #[error("unknown article category '{category}'")]
    UnknownCategory { category: String },

    /// Slug is empty or not lower-kebab.
    #[error("invalid article slug '{slug}'")]
    InvalidSlug { slug: String },
}

/// Error type for invalid Strong's identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid Strong's identifier '{raw}'")]
pub struct StrongIdError {
    pub raw: String,
}
