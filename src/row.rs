//! Output rows: the ten-column record, TSV read/write, and row IDs.
//!
//! The companion services speak TSV, so rows serialize in two shapes: the
//! six-column core shape sent to the services, and the final ten-column
//! shape with `GLQuote`/`GLOccurrence` seated between `TWLink` and
//! `Variant of` (the post-processor's column reorder).

use ahash::AHashSet;
use rand::Rng;

use crate::error::Result;
use crate::types::ArticleId;
use anyhow::{bail, Context};

/// Final column order.
pub const OUTPUT_COLUMNS: [&str; 10] = [
    "Reference",
    "ID",
    "Tags",
    "OrigWords",
    "Occurrence",
    "TWLink",
    "GLQuote",
    "GLOccurrence",
    "Variant of",
    "Disambiguation",
];

/// Core columns exchanged with the companion services.
pub const CORE_COLUMNS: [&str; 6] = [
    "Reference",
    "ID",
    "Tags",
    "OrigWords",
    "Occurrence",
    "TWLink",
];

/// One output row. Column semantics follow the output contract: surfaces are
/// verbatim, no quoting, no embedded tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// `chapter:verse`.
    pub reference: String,
    /// Four lowercase characters, unique per run.
    pub id: String,
    /// `keyterm`, `name`, or empty, from the primary article's category.
    pub tags: String,
    /// Original-language phrase after conversion; the English surface before.
    pub orig_words: String,
    /// In-verse count of `orig_words`, 1-based.
    pub occurrence: u32,
    /// `rc://*/tw/dict/bible/<article>`.
    pub tw_link: String,
    /// English surface.
    pub gl_quote: String,
    /// In-verse count of the English surface; empty until filled.
    pub gl_occurrence: Option<u32>,
    /// The matched headword when the surface is a morphological variant.
    pub variant_of: String,
    /// `(art1, art2, …)` when more than one article matched.
    pub disambiguation: String,
}

impl Row {
    pub fn reference(chapter: u32, verse: u32) -> String {
        format!("{chapter}:{verse}")
    }
}

/// Render the six-column service TSV.
pub fn to_core_tsv(rows: &[Row]) -> String {
    let mut out = CORE_COLUMNS.join("\t");
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\n",
            row.reference, row.id, row.tags, row.orig_words, row.occurrence, row.tw_link
        ));
    }
    out
}

/// Render the final ten-column TSV.
pub fn to_output_tsv(rows: &[Row]) -> String {
    let mut out = OUTPUT_COLUMNS.join("\t");
    out.push('\n');
    for row in rows {
        let gl_occurrence = row
            .gl_occurrence
            .map(|n| n.to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            row.reference,
            row.id,
            row.tags,
            row.orig_words,
            row.occurrence,
            row.tw_link,
            row.gl_quote,
            gl_occurrence,
            row.variant_of,
            row.disambiguation
        ));
    }
    out
}

/// Parse a TSV returned by a companion service: a header line and one record
/// per row, at least `min_columns` cells each.
pub fn parse_tsv(text: &str, min_columns: usize) -> Result<Vec<Vec<String>>> {
    let mut lines = text.lines();
    let header = lines.next().context("service TSV is empty")?;
    if header.split('\t').count() < min_columns {
        bail!(
            "service TSV header has fewer than {min_columns} columns: {header:?}"
        );
    }
    let mut records = Vec::new();
    for (number, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        let cells: Vec<String> = line.split('\t').map(ToString::to_string).collect();
        if cells.len() < min_columns {
            bail!("service TSV line {} has {} columns", number + 2, cells.len());
        }
        records.push(cells);
    }
    Ok(records)
}

/// Format the disambiguation column: article paths sorted lexicographically.
pub fn format_disambiguation(articles: &[ArticleId]) -> String {
    if articles.len() < 2 {
        return String::new();
    }
    let mut paths: Vec<&str> = articles.iter().map(ArticleId::path).collect();
    paths.sort_unstable();
    format!("({})", paths.join(", "))
}

/// Random four-character row IDs, unique for the generator's lifetime.
///
/// IDs are a lowercase letter followed by three lowercase alphanumerics;
/// collisions re-draw, which at realistic output sizes almost never happens.
/// Values are not reproducible across runs.
#[derive(Debug, Default)]
pub struct IdGenerator {
    used: AHashSet<String>,
}

const ID_HEAD: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const ID_TAIL: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a fresh id.
    pub fn next_id(&mut self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let mut id = String::with_capacity(4);
            id.push(ID_HEAD[rng.gen_range(0..ID_HEAD.len())] as char);
            for _ in 0..3 {
                id.push(ID_TAIL[rng.gen_range(0..ID_TAIL.len())] as char);
            }
            if self.used.insert(id.clone()) {
                return id;
            }
        }
    }
}
