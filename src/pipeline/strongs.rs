//! Strong's-first driver: walk USFM word tokens, one row per lemma
//! attribution.
//!
//! Multi-lemma sequences are tried first (longest wins, never across a verse
//! boundary); remaining tokens emit one row per article claiming the lemma
//! alone. After the companion services fill in the English quotes, the
//! selector refines every row's article; rows it cannot place are routed to
//! the separate no-match output with the candidate list that was tried.

use crate::error::{Result, UsfmError};
use crate::row::{self, IdGenerator, Row};
use crate::select::Selector;
use crate::types::StrongId;
use crate::usfm::{self, Token};
use crate::vocab::{SeqEntry, StrongsIndex, Vocabulary};

use super::{OccurrenceCounter, QuoteServices};

/// The two TSVs the Strong's-first mode produces.
#[derive(Debug, Default)]
pub struct StrongsFirstOutput {
    /// Rows whose article survived selector refinement.
    pub rows: Vec<Row>,
    /// Rows the selector could not place; `Disambiguation` carries the tried
    /// candidates.
    pub no_match: Vec<Row>,
}

/// An unrefined row paired with the Strong's id that produced it.
#[derive(Debug)]
pub struct EmittedRow {
    pub row: Row,
    pub sid: StrongId,
    /// Sequence matches already carry their article with confidence; the
    /// selector does not second-guess them.
    pub from_sequence: bool,
}

/// Strong's-first pipeline over a loaded vocabulary and index.
pub struct StrongsFirstPipeline<'a> {
    vocab: &'a Vocabulary,
    index: &'a StrongsIndex,
    rich_conjugations: bool,
}

impl<'a> StrongsFirstPipeline<'a> {
    pub fn new(vocab: &'a Vocabulary, index: &'a StrongsIndex, rich_conjugations: bool) -> Self {
        Self {
            vocab,
            index,
            rich_conjugations,
        }
    }

    /// Generate, convert, and refine rows for a whole USFM book.
    pub async fn run<S: QuoteServices>(
        &self,
        usfm_body: &str,
        services: &S,
    ) -> Result<StrongsFirstOutput> {
        let mut emitted = self.emit_rows(usfm_body)?;
        let mut rows: Vec<Row> = emitted.iter().map(|e| e.row.clone()).collect();

        super::add_gl_quotes_to_rows(&mut rows, services).await;
        for row in &mut rows {
            row.orig_words = row.gl_quote.clone();
            if let Some(n) = row.gl_occurrence {
                row.occurrence = n;
            }
        }
        super::convert_rows_to_origin(&mut rows, services).await;
        for (e, row) in emitted.iter_mut().zip(rows) {
            e.row = row;
        }

        Ok(self.refine(emitted))
    }

    /// The selector pass that closes row generation: re-resolve every
    /// single-lemma row's article from its English quote, routing selector
    /// misses to the no-match output. Sequence rows pass through unchanged.
    ///
    /// Pure CPU and independent of the companion services; drivers running
    /// without service endpoints call this directly once the GL columns hold
    /// the English quotations.
    pub fn refine(&self, emitted: Vec<EmittedRow>) -> StrongsFirstOutput {
        let selector = Selector::new(self.vocab, self.index, self.rich_conjugations);
        let mut output = StrongsFirstOutput::default();
        for e in emitted {
            let mut row = e.row;
            if e.from_sequence {
                output.rows.push(row);
                continue;
            }
            match selector.select(&row.gl_quote, &e.sid) {
                Some(selection) => {
                    row.tw_link = selection.article.link();
                    row.tags = selection.article.category().tag().to_string();
                    row.variant_of = if selection.is_variant {
                        selection.matched_term
                    } else {
                        String::new()
                    };
                    row.disambiguation = row::format_disambiguation(&selection.disambiguation);
                    output.rows.push(row);
                }
                None => {
                    row.disambiguation =
                        format_tried(&selector.tried_candidates(&row.gl_quote, &e.sid));
                    output.no_match.push(row);
                }
            }
        }
        tracing::info!(
            rows = output.rows.len(),
            no_match = output.no_match.len(),
            "Refined Strong's-first rows"
        );
        output
    }

    /// Walk the token stream and emit unrefined rows, pairing each with the
    /// Strong's id that produced it. Pure CPU; no I/O.
    pub fn emit_rows(&self, usfm_body: &str) -> Result<Vec<EmittedRow>> {
        let tokens = usfm::tokens(usfm_body);
        if tokens.is_empty() {
            return Err(UsfmError::NoChapters {
                book: "<input>".to_string(),
            }
            .into());
        }

        let mut ids = IdGenerator::new();
        let mut rows = Vec::new();
        let mut occurrences = OccurrenceCounter::new();
        let mut place = (0, 0);
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            if (token.chapter, token.verse) != place {
                place = (token.chapter, token.verse);
                occurrences = OccurrenceCounter::new();
            }
            if token.strongs.is_empty() {
                i += 1;
                continue;
            }

            if let Some((entry, consumed)) = self.longest_sequence(&tokens, i) {
                let surface = tokens[i..i + consumed]
                    .iter()
                    .map(|t| t.surface.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                let occurrence = occurrences.bump(&surface);
                rows.push(EmittedRow {
                    row: Row {
                        reference: Row::reference(token.chapter, token.verse),
                        id: ids.next_id(),
                        tags: entry.article.category().tag().to_string(),
                        orig_words: surface,
                        occurrence,
                        tw_link: entry.article.link(),
                        gl_quote: String::new(),
                        gl_occurrence: None,
                        variant_of: String::new(),
                        disambiguation: String::new(),
                    },
                    sid: entry.sequence[0].clone(),
                    from_sequence: true,
                });
                i += consumed;
                continue;
            }

            for sid in &token.strongs {
                let Some(articles) = self.index.singles_with_fallback(sid) else {
                    continue;
                };
                for article in articles {
                    let occurrence = occurrences.bump(&token.surface);
                    rows.push(EmittedRow {
                        row: Row {
                            reference: Row::reference(token.chapter, token.verse),
                            id: ids.next_id(),
                            tags: article.category().tag().to_string(),
                            orig_words: token.surface.clone(),
                            occurrence,
                            tw_link: article.link(),
                            gl_quote: String::new(),
                            gl_occurrence: None,
                            variant_of: String::new(),
                            disambiguation: String::new(),
                        },
                        sid: sid.clone(),
                        from_sequence: false,
                    });
                }
            }
            i += 1;
        }
        Ok(rows)
    }

    /// The longest registered sequence starting at `tokens[start]`, staying
    /// inside the verse. Returns the sequence entry and how many tokens it
    /// consumes.
    fn longest_sequence(&self, tokens: &[Token], start: usize) -> Option<(SeqEntry, usize)> {
        let first = &tokens[start];
        let mut best: Option<(SeqEntry, usize)> = None;
        for sid in &first.strongs {
            for entry in self.index.sequences_from(sid) {
                let len = entry.len();
                if best.as_ref().is_some_and(|(_, b)| *b >= len) {
                    continue;
                }
                if self.sequence_matches(tokens, start, entry) {
                    best = Some((entry.clone(), len));
                }
            }
        }
        best
    }

    fn sequence_matches(&self, tokens: &[Token], start: usize, entry: &SeqEntry) -> bool {
        if start + entry.len() > tokens.len() {
            return false;
        }
        let first = &tokens[start];
        entry.sequence.iter().enumerate().all(|(offset, want)| {
            let token = &tokens[start + offset];
            (token.chapter, token.verse) == (first.chapter, first.verse)
                && token.strongs.iter().any(|sid| &sid.base() == want)
        })
    }
}

/// The no-match `Disambiguation` column: every candidate that was tried,
/// parenthesized even when there is only one.
fn format_tried(candidates: &[crate::types::ArticleId]) -> String {
    if candidates.is_empty() {
        return String::new();
    }
    let paths: Vec<&str> = candidates.iter().map(|a| a.path()).collect();
    format!("({})", paths.join(", "))
}
