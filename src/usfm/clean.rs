//! Markup stripping for the clean-text (English-first) path.
//!
//! The replacements run in a fixed order, each applied globally before the
//! next; the order matters because later patterns assume the earlier ones
//! already fired (e.g. lingering attribute runs are only recognizable once
//! `\w` tokens have been unwrapped).

use regex::Regex;
use std::sync::LazyLock;

static WORD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\w\s+([^|\\]*?)(?:\|[^\\]*?)?\\w\s*\*").unwrap());
static ZALN_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\\zaln-s.*?\\\*").unwrap());
static ZALN_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\zaln-e\\\*").unwrap());
static KEYWORD_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\\k-s.*?\\\*").unwrap());
static KEYWORD_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\k-e\\\*").unwrap());
static EXTRA_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static DANGLING_ATTRS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|[^\\]*\\").unwrap());
static POETRY_OR_PARA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\ts\\\*|\\q[a-z0-9]*|\\p[0-9]?").unwrap());
static FOOTNOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\\f .*?\\f\*").unwrap());
static VERSE_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\([cv])\s*(\d+)").unwrap());

/// A verse of clean text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub chapter: u32,
    pub verse: u32,
    /// Verse body with markup removed and whitespace collapsed.
    pub text: String,
}

/// Strip alignment and structural markup, leaving `\c`/`\v` markers and plain
/// verse text.
pub fn strip_markup(usfm: &str) -> String {
    let text = WORD_TOKEN.replace_all(usfm, "$1");
    let text = ZALN_START.replace_all(&text, "");
    let text = ZALN_END.replace_all(&text, "");
    let text = KEYWORD_START.replace_all(&text, "");
    let text = KEYWORD_END.replace_all(&text, "");
    let text = EXTRA_BLANK_LINES.replace_all(&text, "\n\n");
    let text = DANGLING_ATTRS.replace_all(&text, "\\");
    let text = text.replace('\n', " ");
    let text = text.replace("\\v ", "\n\\v ").replace("\\c ", "\n\\c ");
    let text = POETRY_OR_PARA.replace_all(&text, " ");
    let text = FOOTNOTE.replace_all(&text, " ");
    let text = text.replace(['{', '}'], "");

    // Everything before the first chapter marker is front matter.
    match text.find("\\c ") {
        Some(pos) => text[pos..].to_string(),
        None => text,
    }
}

/// Split stripped text into verses.
///
/// Walks `\c N` / `\v N` markers; the body of a verse is the text up to the
/// next marker, with whitespace collapsed. Text outside any chapter/verse
/// context is dropped.
pub fn verses(stripped: &str) -> Vec<Verse> {
    let mut out = Vec::new();
    let mut chapter: Option<u32> = None;
    let mut pending: Option<(u32, u32, usize)> = None;

    for captures in VERSE_MARKER.captures_iter(stripped) {
        let whole = captures.get(0).unwrap();
        let number: u32 = captures[2].parse().unwrap_or(0);

        if let Some((c, v, body_start)) = pending.take() {
            push_verse(&mut out, c, v, &stripped[body_start..whole.start()]);
        }

        match &captures[1] {
            "c" => chapter = Some(number),
            _ => {
                if let Some(c) = chapter {
                    pending = Some((c, number, whole.end()));
                }
            }
        }
    }
    if let Some((c, v, body_start)) = pending {
        push_verse(&mut out, c, v, &stripped[body_start..]);
    }
    out
}

fn push_verse(out: &mut Vec<Verse>, chapter: u32, verse: u32, body: &str) {
    if chapter == 0 || verse == 0 {
        return;
    }
    let text = body.split_whitespace().collect::<Vec<_>>().join(" ");
    out.push(Verse {
        chapter,
        verse,
        text,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    const ALIGNED: &str = "\\id GEN unfoldingWord Literal Text\n\\h Genesis\n\\toc1 Genesis\n\\c 1\n\\p\n\\v 1\n\\zaln-s |x-strong=\"H7225\" x-lemma=\"רֵאשִׁית\"\\*\\w In|x-occurrence=\"1\" x-occurrences=\"1\"\\w*\n\\w the|x-occurrence=\"1\" x-occurrences=\"1\"\\w*\n\\w beginning|x-occurrence=\"1\" x-occurrences=\"1\"\\w*\\zaln-e\\*\n\\zaln-s |x-strong=\"H430\"\\*\\w God|x-occurrence=\"1\" x-occurrences=\"1\"\\w*\\zaln-e\\*\n\\zaln-s |x-strong=\"H1254a\"\\*\\w created|x-occurrence=\"1\" x-occurrences=\"1\"\\w*\\zaln-e\\*\n\\v 2 \\w And|x-occurrence=\"1\" x-occurrences=\"1\"\\w* \\w the|x-occurrence=\"1\" x-occurrences=\"2\"\\w* \\w earth|x-occurrence=\"1\" x-occurrences=\"1\"\\w*\n";

    #[test]
    fn test_strip_unwraps_word_tokens() {
        let stripped = strip_markup(ALIGNED);
        check!(stripped.contains("beginning"));
        check!(!stripped.contains("x-occurrence"));
        check!(!stripped.contains("zaln"));
        check!(!stripped.contains("\\w"));
    }

    #[test]
    fn test_strip_drops_front_matter() {
        let stripped = strip_markup(ALIGNED);
        check!(stripped.starts_with("\\c 1"));
        check!(!stripped.contains("unfoldingWord"));
        check!(!stripped.contains("\\toc1"));
    }

    #[test]
    fn test_verses_basic() {
        let stripped = strip_markup(ALIGNED);
        let verses = verses(&stripped);
        check!(verses.len() == 2);
        check!(verses[0].chapter == 1);
        check!(verses[0].verse == 1);
        check!(verses[0].text == "In the beginning God created");
        check!(verses[1].text == "And the earth");
    }

    #[test]
    fn test_verses_across_chapters() {
        let verses = verses("\\c 1 \\v 1 first \\v 2 second \\c 2 \\v 1 third");
        let refs: Vec<_> = verses.iter().map(|v| (v.chapter, v.verse)).collect();
        check!(refs == vec![(1, 1), (1, 2), (2, 1)]);
        check!(verses[2].text == "third");
    }

    #[test]
    fn test_verses_without_chapter_dropped() {
        let verses = verses("\\v 1 orphan \\c 1 \\v 1 kept");
        check!(verses.len() == 1);
        check!(verses[0].text == "kept");
    }

    #[test]
    fn test_footnotes_removed() {
        let stripped =
            strip_markup("\\c 1\n\\v 1 the light \\f + \\ft some note \\f* was good");
        let verses = verses(&stripped);
        check!(verses[0].text == "the light was good");
    }

    #[test]
    fn test_braces_removed() {
        let stripped = strip_markup("\\c 1\n\\v 1 he {himself} said");
        let verses = verses(&stripped);
        check!(verses[0].text == "he himself said");
    }

    #[test]
    fn test_poetry_markers_removed() {
        let stripped = strip_markup("\\c 1\n\\v 1 \\q1 sing \\q2 praise \\p again");
        let verses = verses(&stripped);
        check!(verses[0].text == "sing praise again");
    }
}
