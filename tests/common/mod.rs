//! Shared test fixtures and utilities for integration tests.
//!
//! Integration tests drive the pipelines over literal USFM strings with an
//! in-memory vocabulary and stubbed companion services; nothing touches the
//! network or the cache directory.

use twl_generator::error::{Result, ServiceError};
use twl_generator::pipeline::QuoteServices;
use twl_generator::row;
use twl_generator::types::ArticleId;
use twl_generator::vocab::{VocabEntry, Vocabulary};
use twl_generator::StrongId;

/// Build a vocabulary from `(path, headwords, strong-sequences)` triples.
pub fn vocabulary(entries: &[(&str, &[&str], &[&[&str]])]) -> Vocabulary {
    let mut vocab = Vocabulary::new();
    for (path, terms, sequences) in entries {
        vocab.insert(
            ArticleId::new(*path).expect("valid article path"),
            VocabEntry {
                terms: terms.iter().map(ToString::to_string).collect(),
                strongs: sequences
                    .iter()
                    .map(|seq| {
                        seq.iter()
                            .map(|raw| StrongId::new(raw).expect("valid Strong's id"))
                            .collect()
                    })
                    .collect(),
            },
        );
    }
    vocab
}

/// Wrap verse text into a one-chapter USFM body.
pub fn single_verse(verse: &str) -> String {
    format!("\\c 1\n\\v 1 {verse}\n")
}

/// Stub companion services.
///
/// `add_gl_quotes` echoes `OrigWords`/`Occurrence` into the appended GL
/// columns; `convert_to_origin` is the identity. Either can be switched to
/// fail so fallback paths are exercised.
#[derive(Debug, Default)]
pub struct StubServices {
    pub fail_add_gl: bool,
    pub fail_convert: bool,
}

impl QuoteServices for StubServices {
    async fn add_gl_quotes(&self, tsv: &str) -> Result<String> {
        if self.fail_add_gl {
            return Err(ServiceError::RequestFailed {
                service: "add-GL-quote".to_string(),
                reason: "stubbed failure".to_string(),
            }
            .into());
        }
        let records = row::parse_tsv(tsv, 6)?;
        let mut out =
            String::from("Reference\tID\tTags\tOrigWords\tOccurrence\tTWLink\tGLQuote\tGLOccurrence\n");
        for record in records {
            out.push_str(&format!(
                "{}\t{}\t{}\n",
                record.join("\t"),
                record[3],
                record[4]
            ));
        }
        Ok(out)
    }

    async fn convert_to_origin(&self, tsv: &str) -> Result<String> {
        if self.fail_convert {
            return Err(ServiceError::RequestFailed {
                service: "GL→OL".to_string(),
                reason: "stubbed failure".to_string(),
            }
            .into());
        }
        Ok(tsv.to_string())
    }
}
