//! Pipeline drivers and the plumbing they share.
//!
//! Both operating modes emit rows in `(chapter, verse, in-verse position)`
//! order, count occurrences per exact surface within a verse, and hand the
//! accumulated TSV to the companion services. Service failures never abort a
//! run; the documented fallbacks fire instead.

pub mod english;
pub mod strongs;

pub use english::EnglishFirstPipeline;
pub use strongs::StrongsFirstPipeline;

use ahash::AHashMap;

use crate::error::Result;
use crate::row::{self, Row};

/// The two companion TSV services, abstracted so drivers can be tested with
/// stubs and the CLI can plug in HTTP clients.
pub trait QuoteServices {
    /// `add-GL-quote`: append `GLQuote`/`GLOccurrence` columns to a core TSV.
    fn add_gl_quotes(&self, tsv: &str) -> impl Future<Output = Result<String>> + Send;

    /// `GL→OL`: replace `OrigWords`/`Occurrence` with original-language
    /// quotations and counts.
    fn convert_to_origin(&self, tsv: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Per-verse occurrence counter keyed by exact surface (case and punctuation
/// included).
#[derive(Debug, Default)]
pub(crate) struct OccurrenceCounter {
    counts: AHashMap<String, u32>,
}

impl OccurrenceCounter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `surface`, returning its 1-based index.
    pub(crate) fn bump(&mut self, surface: &str) -> u32 {
        let count = self.counts.entry(surface.to_string()).or_insert(0);
        *count += 1;
        *count
    }
}

/// Run the GL→OL converter over the rows, replacing `OrigWords` and
/// `Occurrence`. On any failure the rows keep their English columns.
pub(crate) async fn convert_rows_to_origin<S: QuoteServices>(rows: &mut [Row], services: &S) {
    let tsv = row::to_core_tsv(rows);
    let converted = match services.convert_to_origin(&tsv).await {
        Ok(converted) => converted,
        Err(error) => {
            tracing::warn!(%error, "GL→OL conversion failed; keeping English quotations");
            return;
        }
    };
    match row::parse_tsv(&converted, 6) {
        Ok(records) if records.len() == rows.len() => {
            for (row, record) in rows.iter_mut().zip(records) {
                row.orig_words = record[3].clone();
                if let Ok(n) = record[4].parse() {
                    row.occurrence = n;
                }
            }
        }
        Ok(records) => {
            tracing::warn!(
                expected = rows.len(),
                got = records.len(),
                "GL→OL conversion returned a different row count; keeping English quotations"
            );
        }
        Err(error) => {
            tracing::warn!(%error, "GL→OL conversion returned malformed TSV; keeping English quotations");
        }
    }
}

/// Run the add-GL-quote service over the rows, filling `GLQuote` and
/// `GLOccurrence`. On any failure `OrigWords`/`Occurrence` are duplicated
/// into the GL columns instead.
pub(crate) async fn add_gl_quotes_to_rows<S: QuoteServices>(rows: &mut [Row], services: &S) {
    let tsv = row::to_core_tsv(rows);
    let response = match services.add_gl_quotes(&tsv).await {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(%error, "add-GL-quote failed; duplicating OrigWords into GLQuote");
            duplicate_gl_columns(rows);
            return;
        }
    };
    match row::parse_tsv(&response, 8) {
        Ok(records) if records.len() == rows.len() => {
            for (row, record) in rows.iter_mut().zip(records) {
                row.gl_quote = record[6].clone();
                row.gl_occurrence = record[7].parse().ok();
            }
        }
        _ => {
            tracing::warn!("add-GL-quote returned malformed TSV; duplicating OrigWords into GLQuote");
            duplicate_gl_columns(rows);
        }
    }
}

fn duplicate_gl_columns(rows: &mut [Row]) {
    for row in rows {
        row.gl_quote = row.orig_words.clone();
        row.gl_occurrence = Some(row.occurrence);
    }
}
