//! Candidate-article selection: Strong's prior plus English-surface evidence.
//!
//! Given an English phrase and a Strong's id, the selector narrows the
//! vocabulary to the articles claiming that lemma, orders them by how
//! plausibly their slug already appears in the phrase, then probes each
//! article's headwords through four successively looser match stages. The
//! first (stage, priority-order) pair wins; everything else that matched
//! lands in the disambiguation set.

use regex::Regex;
use std::collections::BTreeSet;

use crate::morph;
use crate::types::{ArticleId, StrongId};
use crate::vocab::{StrongsIndex, Vocabulary};

/// How a headword matched the phrase, loosest stage last.
///
/// The derived ordering is the tie-break key: a lower stage always beats a
/// higher one regardless of candidate order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchStage {
    /// Case-sensitive whole-word match.
    Exact,
    /// Case-insensitive whole-word match.
    ExactCi,
    /// Case-sensitive prefix anchored at a word or dash start.
    PrefixBoundary,
    /// Case-insensitive stripped-stem match with an inflectional tail.
    StrippedCi,
}

impl MatchStage {
    /// A match is a morphological variant once it needed stage 3 or 4.
    #[inline]
    pub fn is_variant(&self) -> bool {
        matches!(self, Self::PrefixBoundary | Self::StrippedCi)
    }
}

/// The selector's verdict for one (phrase, Strong's id) pair.
#[derive(Debug, Clone)]
pub struct Selection {
    pub article: ArticleId,
    pub stage: MatchStage,
    /// The headword that matched; feeds the `Variant of` column.
    pub matched_term: String,
    /// Variant flag after the suppression rules.
    pub is_variant: bool,
    /// All plausible articles, lexicographically sorted; meaningful when
    /// longer than one.
    pub disambiguation: Vec<ArticleId>,
}

/// Article selector over the loaded vocabulary and Strong's index.
pub struct Selector<'a> {
    vocab: &'a Vocabulary,
    index: &'a StrongsIndex,
    rich_conjugations: bool,
}

impl<'a> Selector<'a> {
    pub fn new(vocab: &'a Vocabulary, index: &'a StrongsIndex, rich_conjugations: bool) -> Self {
        Self {
            vocab,
            index,
            rich_conjugations,
        }
    }

    /// Choose the best article for an English phrase attributed to a
    /// Strong's id. Returns None when the id resolves to no candidates or no
    /// candidate's headwords match the phrase.
    pub fn select(&self, phrase: &str, sid: &StrongId) -> Option<Selection> {
        let candidates = self.index.singles_with_fallback(sid)?;
        let prioritized = self.prioritize(candidates, phrase);

        let mut best: Option<(MatchStage, usize, String, ArticleId)> = None;
        for (position, article) in prioritized.iter().enumerate() {
            let Some((stage, term)) = self.match_article(article, phrase) else {
                continue;
            };
            let key = (stage, position);
            if best
                .as_ref()
                .is_none_or(|(s, p, _, _)| key < (*s, *p))
            {
                best = Some((stage, position, term, article.clone()));
            }
        }
        let (stage, _, matched_term, article) = best?;

        let is_variant = stage.is_variant() && !self.suppress_variant(&article, &matched_term, phrase);
        let disambiguation = self.disambiguation_set(&prioritized, phrase);

        Some(Selection {
            article,
            stage,
            matched_term,
            is_variant,
            disambiguation,
        })
    }

    /// The prioritized candidate list for an id, as tried by [`select`];
    /// feeds the no-match output's `Disambiguation` column.
    ///
    /// [`select`]: Self::select
    pub fn tried_candidates(&self, phrase: &str, sid: &StrongId) -> Vec<ArticleId> {
        self.index
            .singles_with_fallback(sid)
            .map(|candidates| self.prioritize(candidates, phrase))
            .unwrap_or_default()
    }

    /// Tier 1: slug occurs in the phrase (longest slug first); tier 2: the
    /// rest, `kt/` then `names/` then `other/`, alphabetical within a group.
    fn prioritize(&self, candidates: &BTreeSet<ArticleId>, phrase: &str) -> Vec<ArticleId> {
        let lower = phrase.to_lowercase();
        let (mut tier1, mut tier2): (Vec<_>, Vec<_>) = candidates
            .iter()
            .cloned()
            .partition(|a| lower.contains(a.slug()));
        tier1.sort_by(|a, b| b.slug().len().cmp(&a.slug().len()));
        tier2.sort_by(|a, b| {
            a.category()
                .cmp(&b.category())
                .then_with(|| a.slug().cmp(b.slug()))
        });
        tier1.extend(tier2);
        tier1
    }

    /// The earliest stage at which any of the article's headwords matches
    /// the phrase, with the headword that did.
    fn match_article(&self, article: &ArticleId, phrase: &str) -> Option<(MatchStage, String)> {
        let entry = self.vocab.get(article)?;
        let mut best: Option<(MatchStage, usize, &str)> = None;
        for (order, term) in entry.terms.iter().enumerate() {
            let Some(stage) = self.stage_of(term, phrase) else {
                continue;
            };
            if best
                .as_ref()
                .is_none_or(|(s, o, _)| (stage, order) < (*s, *o))
            {
                best = Some((stage, order, term));
            }
        }
        best.map(|(stage, _, term)| (stage, term.to_string()))
    }

    /// The first of the four stages at which this headword matches.
    fn stage_of(&self, term: &str, phrase: &str) -> Option<MatchStage> {
        if term.is_empty() {
            return None;
        }
        let alternates = self.stage12_alternates(term);

        let stage1 = std::iter::once(term)
            .chain(alternates.iter().map(String::as_str))
            .any(|form| word_bound(form, phrase, false));
        if stage1 {
            return Some(MatchStage::Exact);
        }

        let stage2 = std::iter::once(term)
            .chain(alternates.iter().map(String::as_str))
            .any(|form| word_bound(form, phrase, true));
        if stage2 {
            return Some(MatchStage::ExactCi);
        }

        let prefix = Regex::new(&format!(r"(?:^|\b|[—–-]){}", regex::escape(term))).ok()?;
        if prefix.is_match(phrase) {
            return Some(MatchStage::PrefixBoundary);
        }

        if self.stripped_match(term, phrase, StripSet::Full) {
            return Some(MatchStage::StrippedCi);
        }
        // Conjugated and irregular alternates strip only `y`/`e`.
        for alternate in &alternates {
            if self.stripped_match(alternate, phrase, StripSet::YAndE) {
                return Some(MatchStage::StrippedCi);
            }
        }
        None
    }

    /// Alternates evaluated at stages 1–2: plurals, irregular verb forms,
    /// and (when enabled) regular conjugations.
    fn stage12_alternates(&self, term: &str) -> Vec<String> {
        let mut alternates = morph::plurals(term);
        alternates.extend(morph::irregular_forms(term));
        if self.rich_conjugations {
            alternates.push(morph::past_tense(term));
            alternates.push(morph::present_participle(term));
        }
        alternates.retain(|a| a != term);
        alternates.dedup();
        alternates
    }

    /// Stage-4 probe: does any stripped form of `term`, followed by an
    /// inflectional tail, appear in the phrase?
    fn stripped_match(&self, term: &str, phrase: &str, strip: StripSet) -> bool {
        for stem in stripped_forms(term, strip) {
            let Ok(re) = Regex::new(&format!(
                r"(?i)\b{}(?:ed|ing|er|est|es|ies|s|d|n|t)\b",
                regex::escape(&stem)
            )) else {
                continue;
            };
            if re.is_match(phrase) {
                return true;
            }
        }
        false
    }

    /// The variant flag is suppressed when the phrase already equals one of
    /// the article's headwords up to case, plural, or conjugation.
    fn suppress_variant(&self, article: &ArticleId, matched_term: &str, phrase: &str) -> bool {
        let Some(entry) = self.vocab.get(article) else {
            return false;
        };
        for term in &entry.terms {
            if word_bound(term, phrase, true) {
                return true;
            }
            if morph::plurals(term)
                .iter()
                .any(|p| word_bound(p, phrase, true))
            {
                return true;
            }
        }
        let conjugations = [
            morph::past_tense(matched_term),
            morph::present_participle(matched_term),
        ];
        if conjugations.iter().any(|c| word_bound(c, phrase, true)) {
            return true;
        }
        morph::irregular_forms(matched_term)
            .iter()
            .any(|f| word_bound(f, phrase, true))
    }

    /// Step 6: the Strong's-prior candidates plus every article with no
    /// Strong's data, re-probed; all that match form the disambiguation set.
    ///
    /// Articles with no headwords at all are counted when their slug appears
    /// word-bound in the phrase; that is the only evidence they can offer.
    fn disambiguation_set(&self, prioritized: &[ArticleId], phrase: &str) -> Vec<ArticleId> {
        let mut matched = BTreeSet::new();
        for article in prioritized.iter().chain(self.index.unbound()) {
            let entry = self.vocab.get(article);
            let hit = match entry {
                Some(entry) if !entry.terms.is_empty() => {
                    self.match_article(article, phrase).is_some()
                }
                _ => word_bound(article.slug(), phrase, true),
            };
            if hit {
                matched.insert(article.clone());
            }
        }
        matched.into_iter().collect()
    }
}

/// Whole-word regex test, optionally case-insensitive.
fn word_bound(needle: &str, hay: &str, case_insensitive: bool) -> bool {
    if needle.is_empty() {
        return false;
    }
    let flags = if case_insensitive { "(?i)" } else { "" };
    Regex::new(&format!(r"{flags}\b{}\b", regex::escape(needle)))
        .map(|re| re.is_match(hay))
        .unwrap_or(false)
}

/// Which suffix drops apply when deriving stage-4 stems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StripSet {
    /// `y`, `e`, `ing`, `ed`, `es`, trailing single `s`.
    Full,
    /// Only the `y` and `e` drops.
    YAndE,
}

/// Stems derived from a term by dropping documented suffixes, in fixed
/// order. The term's last word is the one stripped.
fn stripped_forms(term: &str, strip: StripSet) -> Vec<String> {
    let mut stems = Vec::new();
    let mut push = |stem: &str| {
        if !stem.is_empty() && stem.chars().last().is_some_and(char::is_alphanumeric) {
            let stem = stem.to_string();
            if !stems.contains(&stem) {
                stems.push(stem);
            }
        }
    };

    if let Some(stem) = term.strip_suffix('y') {
        push(stem);
    }
    if let Some(stem) = term.strip_suffix('e') {
        push(stem);
    }
    if strip == StripSet::Full {
        if let Some(stem) = term.strip_suffix("ing") {
            push(stem);
        }
        if let Some(stem) = term.strip_suffix("ed") {
            push(stem);
        }
        if let Some(stem) = term.strip_suffix("es") {
            push(stem);
        }
        if let Some(stem) = term.strip_suffix('s') {
            if !term.ends_with("ss") {
                push(stem);
            }
        }
    }
    stems
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    use crate::vocab::VocabEntry;

    fn article(path: &str) -> ArticleId {
        ArticleId::new(path).unwrap()
    }

    fn sid(raw: &str) -> StrongId {
        StrongId::new(raw).unwrap()
    }

    fn entry(terms: &[&str], strongs: &[&str]) -> VocabEntry {
        VocabEntry {
            terms: terms.iter().map(ToString::to_string).collect(),
            strongs: strongs.iter().map(|s| vec![sid(s)]).collect(),
        }
    }

    fn fixture() -> Vocabulary {
        let mut vocab = Vocabulary::new();
        vocab.insert(article("kt/god"), entry(&["God"], &["H430"]));
        vocab.insert(article("kt/falsegod"), entry(&["god", "idol"], &["H430"]));
        vocab.insert(article("kt/grace"), entry(&["grace", "gracious"], &["H2580"]));
        vocab.insert(article("kt/love"), entry(&["love"], &["H157"]));
        vocab.insert(article("names/aaron"), entry(&["Aaron"], &["H175"]));
        vocab.insert(
            article("other/servant"),
            entry(&["servant", "serve"], &["H5650"]),
        );
        vocab.insert(article("kt/works"), entry(&[], &[]));
        vocab
    }

    fn with_selector<T>(vocab: &Vocabulary, f: impl FnOnce(Selector<'_>) -> T) -> T {
        let index = StrongsIndex::build(vocab);
        f(Selector::new(vocab, &index, false))
    }

    #[test]
    fn test_exact_match() {
        let vocab = fixture();
        with_selector(&vocab, |selector| {
            let sel = selector.select("God", &sid("H430")).unwrap();
            check!(sel.article == article("kt/god"));
            check!(sel.stage == MatchStage::Exact);
            check!(!sel.is_variant);
        });
    }

    #[test]
    fn test_case_insensitive_stage() {
        let vocab = fixture();
        with_selector(&vocab, |selector| {
            // "GRACE" only matches "grace" case-insensitively.
            let sel = selector.select("GRACE", &sid("H2580")).unwrap();
            check!(sel.article == article("kt/grace"));
            check!(sel.stage == MatchStage::ExactCi);
            check!(!sel.is_variant);
        });
    }

    #[test]
    fn test_no_candidates() {
        let vocab = fixture();
        with_selector(&vocab, |selector| {
            check!(selector.select("anything", &sid("H9999")).is_none());
        });
    }

    #[test]
    fn test_no_term_matches() {
        let vocab = fixture();
        with_selector(&vocab, |selector| {
            check!(selector.select("lampstand", &sid("H430")).is_none());
        });
    }

    #[test]
    fn test_slug_prior_breaks_tie() {
        let vocab = fixture();
        with_selector(&vocab, |selector| {
            // Both kt/god and kt/falsegod match "god" at the same stage;
            // both slugs occur in the phrase, the longer one wins tier 1.
            let sel = selector.select("a falsegod god", &sid("H430")).unwrap();
            check!(sel.article == article("kt/falsegod"));
        });
    }

    #[test]
    fn test_plural_alternate_matches_stage_two() {
        let vocab = fixture();
        with_selector(&vocab, |selector| {
            let sel = selector.select("the Servants", &sid("H5650")).unwrap();
            check!(sel.article == article("other/servant"));
            check!(sel.stage == MatchStage::ExactCi);
            check!(!sel.is_variant);
        });
    }

    #[test]
    fn test_irregular_form_matches() {
        let mut vocab = Vocabulary::new();
        vocab.insert(article("kt/forgive"), entry(&["forgive"], &["G863"]));
        with_selector(&vocab, |selector| {
            let sel = selector.select("he forgave them", &sid("G863")).unwrap();
            check!(sel.article == article("kt/forgive"));
            check!(sel.stage == MatchStage::Exact);
        });
    }

    #[test]
    fn test_prefix_stage_is_variant() {
        let mut vocab = Vocabulary::new();
        vocab.insert(article("kt/righteous"), entry(&["righteous"], &["H6662"]));
        with_selector(&vocab, |selector| {
            let sel = selector
                .select("the righteousness of God", &sid("H6662"))
                .unwrap();
            check!(sel.stage == MatchStage::PrefixBoundary);
            check!(sel.is_variant);
            check!(sel.matched_term == "righteous");
        });
    }

    #[test]
    fn test_stripped_stage() {
        let mut vocab = Vocabulary::new();
        vocab.insert(article("kt/bless"), entry(&["blessing"], &["H1288"]));
        with_selector(&vocab, |selector| {
            // "blessing" → strip "ing" → "bless", matched by the "ed" tail.
            // No earlier stage fires: "blessed" is neither the headword, a
            // plural of it, nor carries it as a literal prefix.
            let sel = selector.select("they were blessed", &sid("H1288")).unwrap();
            check!(sel.stage == MatchStage::StrippedCi);
            check!(sel.is_variant);
            check!(sel.matched_term == "blessing");
        });
    }

    #[test]
    fn test_variant_suppressed_by_participle() {
        let vocab = fixture();
        with_selector(&vocab, |selector| {
            // "loving" reaches stage 4 via strip, but it is exactly the
            // participle of the matched term, so the flag is suppressed.
            let sel = selector.select("we are loving", &sid("H157")).unwrap();
            check!(sel.article == article("kt/love"));
            check!(!sel.is_variant);
        });
    }

    #[test]
    fn test_disambiguation_lists_all_matched() {
        let vocab = fixture();
        with_selector(&vocab, |selector| {
            let sel = selector.select("a god", &sid("H430")).unwrap();
            let paths: Vec<_> = sel.disambiguation.iter().map(ArticleId::path).collect();
            check!(paths == vec!["kt/falsegod", "kt/god"]);
        });
    }

    #[test]
    fn test_empty_headword_article_enlarges_disambiguation() {
        let mut vocab = fixture();
        vocab.insert(article("other/work"), entry(&["work"], &[]));
        with_selector(&vocab, |selector| {
            // kt/works has no headwords and no strongs; its slug occurring
            // word-bound in the phrase is its only evidence.
            let sel = selector.select("god of works", &sid("H430")).unwrap();
            let paths: Vec<_> = sel.disambiguation.iter().map(ArticleId::path).collect();
            check!(paths.contains(&"kt/works"));
            check!(paths.contains(&"kt/falsegod"));
        });
    }

    #[rstest]
    #[case("walk", StripSet::Full, vec![])]
    #[case("glorify", StripSet::Full, vec!["glorif"])]
    #[case("grace", StripSet::Full, vec!["grac"])]
    #[case("blessing", StripSet::Full, vec!["bless"])]
    #[case("blessed", StripSet::Full, vec!["bless"])]
    #[case("cross", StripSet::Full, vec![])]
    #[case("glorify", StripSet::YAndE, vec!["glorif"])]
    #[case("blessing", StripSet::YAndE, vec![])]
    fn test_stripped_forms(
        #[case] term: &str,
        #[case] strip: StripSet,
        #[case] expected: Vec<&str>,
    ) {
        let stems = stripped_forms(term, strip);
        check!(stems == expected.iter().map(ToString::to_string).collect::<Vec<_>>());
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        let mut vocab = Vocabulary::new();
        vocab.insert(article("kt/holy"), entry(&["holy"], &["H6944"]));
        vocab.insert(article("other/holiness"), entry(&["holy"], &["H6944"]));
        with_selector(&vocab, |selector| {
            // Same stage from both; neither slug in phrase → tier 2 order
            // puts kt/ first.
            let sel = selector.select("the holy place", &sid("H6944")).unwrap();
            check!(sel.article == article("kt/holy"));
        });
    }
}
