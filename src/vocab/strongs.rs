//! The Strong's pivot: inverted lookup maps over the vocabulary.
//!
//! Two maps come out of the build. `singles` answers "which articles claim
//! this lemma" for length-1 sequences, keyed by both the full id and its
//! base. `seq_first` answers "which multi-lemma sequences begin here", keyed
//! by the base of the first id and sorted longest first so the longest
//! sequence wins a walk. Articles with no Strong's data join neither map but
//! stay available for disambiguation.

use ahash::AHashMap;
use std::collections::BTreeSet;

use super::Vocabulary;
use crate::types::{ArticleId, StrongId};

/// A multi-lemma sequence owned by an article, stored in base form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqEntry {
    pub article: ArticleId,
    /// Base-form ids, first id equal to the map key.
    pub sequence: Vec<StrongId>,
}

impl SeqEntry {
    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Inverted Strong's lookup built once per invocation.
#[derive(Debug, Default)]
pub struct StrongsIndex {
    /// Full id and base id → articles claiming that lemma alone.
    singles: AHashMap<String, BTreeSet<ArticleId>>,
    /// Base of a sequence's first id → sequences, longest first.
    seq_first: AHashMap<String, Vec<SeqEntry>>,
    /// Articles whose Strong's data is empty; disambiguation-only.
    unbound: BTreeSet<ArticleId>,
}

impl StrongsIndex {
    /// Build both maps from the vocabulary, iterating articles in
    /// lexicographic order so every bucket is deterministic.
    pub fn build(vocab: &Vocabulary) -> Self {
        let mut index = Self::default();
        for (article, entry) in vocab.iter() {
            if entry.has_no_strongs() {
                index.unbound.insert(article.clone());
                continue;
            }
            for sequence in &entry.strongs {
                match sequence.len() {
                    0 => {}
                    1 => index.register_single(&sequence[0], article),
                    _ => index.register_sequence(sequence, article),
                }
            }
        }
        for bucket in index.seq_first.values_mut() {
            bucket.sort_by(|a, b| b.len().cmp(&a.len()));
        }
        tracing::debug!(
            singles = index.singles.len(),
            sequences = index.seq_first.len(),
            unbound = index.unbound.len(),
            "Built Strong's index"
        );
        index
    }

    fn register_single(&mut self, sid: &StrongId, article: &ArticleId) {
        self.singles
            .entry(sid.as_str().to_string())
            .or_default()
            .insert(article.clone());
        let base = sid.base();
        if &base != sid {
            self.singles
                .entry(base.as_str().to_string())
                .or_default()
                .insert(article.clone());
        }
    }

    fn register_sequence(&mut self, sequence: &[StrongId], article: &ArticleId) {
        let bases: Vec<StrongId> = sequence.iter().map(StrongId::base).collect();
        let key = bases[0].as_str().to_string();
        self.seq_first.entry(key).or_default().push(SeqEntry {
            article: article.clone(),
            sequence: bases,
        });
    }

    /// Articles registered for this exact id (no base fallback; the selector
    /// applies that itself).
    pub fn singles(&self, sid: &StrongId) -> Option<&BTreeSet<ArticleId>> {
        self.singles.get(sid.as_str())
    }

    /// Articles for the id, falling back to its base form when the full form
    /// is absent and carries a homograph suffix.
    pub fn singles_with_fallback(&self, sid: &StrongId) -> Option<&BTreeSet<ArticleId>> {
        match self.singles(sid) {
            Some(set) => Some(set),
            None if sid.has_suffix() => self.singles.get(sid.base().as_str()),
            None => None,
        }
    }

    /// Sequences beginning at this id's base, longest first.
    pub fn sequences_from(&self, sid: &StrongId) -> &[SeqEntry] {
        self.seq_first
            .get(sid.base().as_str())
            .map_or(&[], Vec::as_slice)
    }

    /// Articles with no Strong's data at all.
    pub fn unbound(&self) -> &BTreeSet<ArticleId> {
        &self.unbound
    }
}
