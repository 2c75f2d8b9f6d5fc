//! Word-boundary-aware prefix trie over the expanded term dictionary.
//!
//! Keys are lowercased variant strings; payloads are small ordered entry
//! lists, one per (headword, priority) pair, carrying every article that
//! contributed the variant. The scanner walks verse text character by
//! character, keeps only candidates whose span sits on word boundaries, and
//! extends accepted spans across hyphens and apostrophes so that `God`
//! matches the whole of `God-fearing` and `prophets` the whole of
//! `prophets'`.

use ahash::AHashMap;

use crate::types::ArticleId;

/// Apostrophe forms the scanner treats alike.
const APOSTROPHES: &[char] = &['\'', '\u{2019}', '\u{2018}'];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_apostrophe(c: char) -> bool {
    APOSTROPHES.contains(&c)
}

/// Terminal payload: one headword (at one priority) and the articles that
/// listed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    /// The headword that produced this variant, original casing.
    pub term: String,
    /// Articles sharing the headword, in insertion (lexicographic) order.
    pub articles: Vec<ArticleId>,
    /// 0 = original headword, 1 = morphological variant.
    pub priority: u8,
}

/// A hit returned by [`TermTrie::matches_at`].
#[derive(Debug, Clone)]
pub struct TrieMatch {
    pub term: String,
    pub articles: Vec<ArticleId>,
    /// 0 = original headword, 1 = morphological variant.
    pub priority: u8,
    /// The extended span verbatim from the verse.
    pub matched_text: String,
    /// Char index where the unextended match began.
    pub start: usize,
    /// Char index where the extended span begins.
    pub ext_start: usize,
    /// Chars consumed from `start` before extension; the scanner advances by
    /// this so later matches may begin inside the extended tail.
    pub original_len: usize,
    /// Chars in `matched_text`.
    pub extended_len: usize,
}

#[derive(Debug, Default)]
struct TrieNode {
    children: AHashMap<char, TrieNode>,
    entries: Vec<TermEntry>,
}

/// Case-insensitive prefix trie over term variants.
#[derive(Debug, Default)]
pub struct TermTrie {
    root: TrieNode,
    len: usize,
}

/// Verse text prepared for scanning: original and lowercased characters,
/// index-aligned.
#[derive(Debug)]
pub struct ScanText {
    original: Vec<char>,
    lowered: Vec<char>,
}

impl ScanText {
    pub fn new(text: &str) -> Self {
        let original: Vec<char> = text.chars().collect();
        let lowered = original
            .iter()
            .map(|c| c.to_lowercase().next().unwrap_or(*c))
            .collect();
        Self { original, lowered }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.original.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    #[inline]
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.original.get(index).copied()
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.original[start..end].iter().collect()
    }
}

impl TermTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of variant strings stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Register `variant` (lowercased on insertion) for `article` under the
    /// given headword and priority.
    ///
    /// Entries merge on case-insensitive headword + priority, so `kt/god`
    /// and `kt/falsegod` sharing the headword `god` end up in one entry with
    /// both articles.
    pub fn insert(&mut self, variant: &str, term: &str, priority: u8, article: &ArticleId) {
        let mut node = &mut self.root;
        for c in variant.chars().flat_map(char::to_lowercase) {
            node = node.children.entry(c).or_default();
        }
        if node.entries.is_empty() {
            self.len += 1;
        }
        let existing = node
            .entries
            .iter_mut()
            .find(|e| e.priority == priority && e.term.eq_ignore_ascii_case(term));
        match existing {
            Some(entry) => {
                if !entry.articles.contains(article) {
                    entry.articles.push(article.clone());
                }
            }
            None => node.entries.push(TermEntry {
                term: term.to_string(),
                articles: vec![article.clone()],
                priority,
            }),
        }
    }

    /// All boundary-valid matches starting at `start`, sorted by extended
    /// length descending, then priority ascending (originals before
    /// variants).
    pub fn matches_at(&self, text: &ScanText, start: usize) -> Vec<TrieMatch> {
        let mut hits = Vec::new();
        let mut node = &self.root;
        let n = text.len();
        let mut end = start;

        while end < n {
            let Some(child) = node.children.get(&text.lowered[end]) else {
                break;
            };
            node = child;
            end += 1;
            if node.entries.is_empty() {
                continue;
            }
            let Some((ext_start, ext_end)) = extend_and_bound(text, start, end) else {
                continue;
            };
            for entry in &node.entries {
                hits.push(TrieMatch {
                    term: entry.term.clone(),
                    articles: entry.articles.clone(),
                    priority: entry.priority,
                    matched_text: text.slice(ext_start, ext_end),
                    start,
                    ext_start,
                    original_len: end - start,
                    extended_len: ext_end - ext_start,
                });
            }
        }

        hits.sort_by(|a, b| {
            b.extended_len
                .cmp(&a.extended_len)
                .then(a.priority.cmp(&b.priority))
        });
        hits
    }
}

/// Extend a raw span across hyphens/apostrophes, then test both edges for a
/// word boundary. Returns the extended span, or None when an edge sits
/// inside a word.
fn extend_and_bound(text: &ScanText, start: usize, end: usize) -> Option<(usize, usize)> {
    let chars = &text.original;
    let n = chars.len();

    // Backward over one hyphen or apostrophe, then the whole preceding word.
    let mut ext_start = start;
    if ext_start >= 2
        && (chars[ext_start - 1] == '-' || is_apostrophe(chars[ext_start - 1]))
        && is_word_char(chars[ext_start - 2])
    {
        ext_start -= 1;
        while ext_start > 0 && is_word_char(chars[ext_start - 1]) {
            ext_start -= 1;
        }
    }

    // Forward over one hyphen or apostrophe. A hyphen must be followed by a
    // word character; an apostrophe is included even when it is not
    // (possessive `s'`).
    let mut ext_end = end;
    if ext_end < n {
        let delim = chars[ext_end];
        if delim == '-' {
            if ext_end + 1 < n && is_word_char(chars[ext_end + 1]) {
                ext_end += 1;
                while ext_end < n && is_word_char(chars[ext_end]) {
                    ext_end += 1;
                }
            }
        } else if is_apostrophe(delim) {
            ext_end += 1;
            while ext_end < n && is_word_char(chars[ext_end]) {
                ext_end += 1;
            }
        }
    }

    let start_ok = ext_start == 0 || !is_word_char(chars[ext_start - 1]);
    let end_ok = ext_end == n || !is_word_char(chars[ext_end]);
    (start_ok && end_ok).then_some((ext_start, ext_end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn article(path: &str) -> ArticleId {
        ArticleId::new(path).unwrap()
    }

    fn trie_with(entries: &[(&str, &str, u8, &str)]) -> TermTrie {
        let mut trie = TermTrie::new();
        for (variant, term, priority, path) in entries {
            trie.insert(variant, term, *priority, &article(path));
        }
        trie
    }

    fn first_match(trie: &TermTrie, verse: &str, start: usize) -> Option<TrieMatch> {
        trie.matches_at(&ScanText::new(verse), start).into_iter().next()
    }

    #[test]
    fn test_basic_hit_case_insensitive() {
        let trie = trie_with(&[("god", "God", 0, "kt/god")]);
        let hit = first_match(&trie, "In the beginning GOD created", 17).unwrap();
        check!(hit.matched_text == "GOD");
        check!(hit.term == "God");
        check!(hit.original_len == 3);
        check!(hit.extended_len == 3);
    }

    #[test]
    fn test_boundary_rejects_infix() {
        let trie = trie_with(&[("god", "god", 0, "kt/god")]);
        // "god" inside "godly" ends mid-word.
        let hits = trie.matches_at(&ScanText::new("a godly man"), 2);
        check!(hits.is_empty());
    }

    #[test]
    fn test_boundary_accepts_punctuation() {
        let trie = trie_with(&[("god", "God", 0, "kt/god")]);
        let hit = first_match(&trie, "He is God, not", 6).unwrap();
        check!(hit.matched_text == "God");
    }

    #[test]
    fn test_forward_hyphen_extension() {
        let trie = trie_with(&[("god", "God", 0, "kt/god")]);
        let hit = first_match(&trie, "a God-fearing man", 2).unwrap();
        check!(hit.matched_text == "God-fearing");
        check!(hit.original_len == 3);
        check!(hit.extended_len == 11);
    }

    #[test]
    fn test_backward_hyphen_extension() {
        let trie = trie_with(&[("fearing", "fear", 1, "kt/fear")]);
        let hit = first_match(&trie, "a God-fearing man", 6).unwrap();
        check!(hit.matched_text == "God-fearing");
        check!(hit.ext_start == 2);
    }

    #[rstest]
    #[case("the prophets' message", '\'')]
    #[case("the prophets\u{2019} message", '\u{2019}')]
    fn test_possessive_extension(#[case] verse: &str, #[case] _apostrophe: char) {
        let trie = trie_with(&[("prophets", "prophet", 1, "kt/prophet")]);
        let hit = first_match(&trie, verse, 4).unwrap();
        check!(hit.matched_text.starts_with("prophets"));
        check!(hit.extended_len == 9);
        check!(hit.original_len == 8);
    }

    #[test]
    fn test_contraction_extension() {
        let trie = trie_with(&[("lord", "Lord", 0, "kt/lord")]);
        let hit = first_match(&trie, "the Lord's hand", 4).unwrap();
        check!(hit.matched_text == "Lord's");
    }

    #[test]
    fn test_sorting_longest_then_priority() {
        let trie = trie_with(&[
            ("god", "god", 1, "kt/falsegod"),
            ("god", "God", 0, "kt/god"),
        ]);
        let hits = trie.matches_at(&ScanText::new("our God reigns"), 4);
        check!(hits.len() == 2);
        check!(hits[0].priority == 0);
        check!(hits[0].term == "God");
    }

    #[test]
    fn test_shared_headword_merges_articles() {
        let trie = trie_with(&[
            ("god", "god", 0, "kt/falsegod"),
            ("god", "God", 0, "kt/god"),
        ]);
        let hits = trie.matches_at(&ScanText::new("a god spoke"), 2);
        check!(hits.len() == 1);
        check!(hits[0].articles.len() == 2);
    }

    #[test]
    fn test_multiword_term() {
        let trie = trie_with(&[("burnt offering", "burnt offering", 0, "other/sacrifice")]);
        let hit = first_match(&trie, "a burnt offering to the Lord", 2).unwrap();
        check!(hit.matched_text == "burnt offering");
    }

    #[test]
    fn test_scan_is_case_invariant() {
        let trie = trie_with(&[("grace", "grace", 0, "kt/grace")]);
        for verse in ["grace upon GRACE", "GRACE UPON GRACE".to_lowercase().as_str()] {
            let text = ScanText::new(verse);
            let spans: Vec<_> = (0..text.len())
                .flat_map(|i| trie.matches_at(&text, i))
                .map(|m| (m.ext_start, m.extended_len))
                .collect();
            check!(spans == vec![(0, 5), (11, 5)]);
        }
    }
}
