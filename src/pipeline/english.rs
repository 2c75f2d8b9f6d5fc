//! English-first driver: scan clean verse text with the trie, one row per
//! hit.
//!
//! The scanner is greedy: at each start position the longest extended match
//! wins, with original headwords beating morphological variants of the same
//! length. The cursor then advances by the match's unextended length so that
//! later matches may begin inside an extended tail (`God-fearing` still lets
//! `fearing` start a match).

use crate::error::{Result, UsfmError};
use crate::morph::{self, MorphOptions};
use crate::row::{self, IdGenerator, Row};
use crate::trie::{ScanText, TermTrie, TrieMatch};
use crate::types::{ArticleId, Category};
use crate::usfm;
use crate::vocab::Vocabulary;

use super::{OccurrenceCounter, QuoteServices};

/// A resolved scan hit: the winning trie match and the article chosen to
/// carry the row.
#[derive(Debug)]
struct ChosenMatch {
    hit: TrieMatch,
    article: ArticleId,
}

/// English-first pipeline: the built trie plus the two articles the orphan
/// "god" rule distinguishes.
pub struct EnglishFirstPipeline {
    trie: TermTrie,
    god: ArticleId,
    falsegod: ArticleId,
}

impl EnglishFirstPipeline {
    /// Build the trie from every article's expanded headword variants.
    pub fn new(vocab: &Vocabulary, rich_conjugations: bool) -> Self {
        let mut trie = TermTrie::new();
        for (article, entry) in vocab.iter() {
            let opts = MorphOptions {
                is_name: article.category() == Category::Names,
                rich_conjugations,
            };
            for term in &entry.terms {
                for variant in morph::expand(term, opts) {
                    trie.insert(&variant.text, term, variant.priority, article);
                }
            }
        }
        tracing::debug!(variants = trie.len(), "Built term trie");
        Self {
            trie,
            god: ArticleId::new("kt/god").expect("static article path"),
            falsegod: ArticleId::new("kt/falsegod").expect("static article path"),
        }
    }

    /// Generate rows for a whole USFM book and run the companion services.
    pub async fn run<S: QuoteServices>(&self, usfm_body: &str, services: &S) -> Result<Vec<Row>> {
        let mut rows = self.scan_book(usfm_body)?;
        super::convert_rows_to_origin(&mut rows, services).await;
        super::add_gl_quotes_to_rows(&mut rows, services).await;
        Ok(rows)
    }

    /// Scan every verse of the book, emitting rows in positional order.
    /// No I/O happens here; this is the pure-CPU half of the pipeline.
    pub fn scan_book(&self, usfm_body: &str) -> Result<Vec<Row>> {
        let stripped = usfm::strip_markup(usfm_body);
        let verses = usfm::verses(&stripped);
        if verses.is_empty() {
            return Err(UsfmError::NoChapters {
                book: "<input>".to_string(),
            }
            .into());
        }

        let mut ids = IdGenerator::new();
        let mut rows = Vec::new();
        for verse in &verses {
            let mut occurrences = OccurrenceCounter::new();
            for chosen in self.scan_verse(&verse.text) {
                let surface = chosen.hit.matched_text.clone();
                let occurrence = occurrences.bump(&surface);
                rows.push(Row {
                    reference: Row::reference(verse.chapter, verse.verse),
                    id: ids.next_id(),
                    tags: chosen.article.category().tag().to_string(),
                    orig_words: surface,
                    occurrence,
                    tw_link: chosen.article.link(),
                    gl_quote: String::new(),
                    gl_occurrence: None,
                    variant_of: variant_of(&chosen.hit),
                    disambiguation: row::format_disambiguation(&chosen.hit.articles),
                });
            }
        }
        tracing::info!(rows = rows.len(), verses = verses.len(), "Scanned book");
        Ok(rows)
    }

    /// Greedy scan of one verse.
    fn scan_verse(&self, verse: &str) -> Vec<ChosenMatch> {
        let text = ScanText::new(verse);
        let mut chosen = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            let c = text.char_at(pos).unwrap_or(' ');
            if !c.is_alphanumeric() && c != '_' && !is_apostrophe(c) {
                pos += 1;
                continue;
            }
            let hits = self.trie.matches_at(&text, pos);
            match hits.into_iter().next() {
                Some(hit) => {
                    let advance = hit.original_len.max(1);
                    chosen.push(self.resolve(hit, &text));
                    pos += advance;
                }
                None => {
                    // Jump the rest of this word; boundary enforcement means
                    // no match can begin inside it. An apostrophe advances by
                    // one so the character after it still gets a look.
                    let mut end = pos + 1;
                    if !is_apostrophe(c) {
                        while end < text.len()
                            && text
                                .char_at(end)
                                .is_some_and(|c| c.is_alphanumeric() || c == '_')
                        {
                            end += 1;
                        }
                    }
                    pos = end;
                }
            }
        }
        chosen
    }

    /// Pick the article that carries the row. Normally the first listed
    /// article wins; the orphan "god" rule routes capitalized surfaces to
    /// `kt/god` and lowercase ones to `kt/falsegod`, leaving the article
    /// list (and so the disambiguation set) untouched.
    fn resolve(&self, hit: TrieMatch, text: &ScanText) -> ChosenMatch {
        let mut article = hit.articles[0].clone();
        let surface: String = (hit.start..hit.start + hit.original_len)
            .filter_map(|i| text.char_at(i))
            .collect();
        if surface.eq_ignore_ascii_case("god")
            && hit.articles.contains(&self.god)
            && hit.articles.contains(&self.falsegod)
        {
            let capitalized = surface.chars().next().is_some_and(char::is_uppercase);
            article = if capitalized {
                self.god.clone()
            } else {
                self.falsegod.clone()
            };
        }
        ChosenMatch { hit, article }
    }
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}' | '\u{2018}')
}

/// The `Variant of` column: the matched headword, unless the surface equals
/// it up to case, plural, `-ed`/`-ing`, or a documented irregular form.
fn variant_of(hit: &TrieMatch) -> String {
    let surface = hit.matched_text.trim();
    let term = hit.term.as_str();
    if surface.eq_ignore_ascii_case(term) {
        return String::new();
    }
    let inflections = morph::plurals(term)
        .into_iter()
        .chain(morph::depluralize(term))
        .chain(morph::irregular_forms(term))
        .chain([morph::past_tense(term), morph::present_participle(term)]);
    for form in inflections {
        if surface.eq_ignore_ascii_case(&form) {
            return String::new();
        }
    }
    term.to_string()
}
