mod common;

use assert2::check;
use common::{single_verse, vocabulary, StubServices};
use rstest::rstest;
use twl_generator::row::Row;
use twl_generator::EnglishFirstPipeline;

fn scan(vocab: &twl_generator::Vocabulary, verse: &str) -> Vec<Row> {
    EnglishFirstPipeline::new(vocab, false)
        .scan_book(&single_verse(verse))
        .unwrap()
}

// --- Concrete scenarios ---

/// Basic kt match, case-insensitive article resolution.
#[test]
fn basic_keyterm_match() {
    let vocab = vocabulary(&[("kt/god", &["God"], &[])]);
    let rows = scan(&vocab, "In the beginning God created");
    check!(rows.len() == 1);
    let row = &rows[0];
    check!(row.reference == "1:1");
    check!(row.tags == "keyterm");
    check!(row.orig_words == "God");
    check!(row.occurrence == 1);
    check!(row.tw_link == "rc://*/tw/dict/bible/kt/god");
    check!(row.variant_of == "");
    check!(row.disambiguation == "");
}

/// Occurrence counting over repeated surfaces.
#[test]
fn occurrence_counting() {
    let vocab = vocabulary(&[("kt/grace", &["grace"], &[])]);
    let rows = scan(&vocab, "grace upon grace");
    check!(rows.len() == 2);
    check!(rows[0].orig_words == "grace");
    check!(rows[1].orig_words == "grace");
    check!(rows[0].occurrence == 1);
    check!(rows[1].occurrence == 2);
}

/// Inflection suppresses the variant flag.
#[test]
fn inflection_is_not_a_variant() {
    let vocab = vocabulary(&[("kt/love", &["love"], &[])]);
    let rows = scan(&vocab, "we are loving");
    check!(rows.len() == 1);
    check!(rows[0].orig_words == "loving");
    check!(rows[0].variant_of == "");
}

/// God/god disambiguation by surface case.
#[test]
fn god_falsegod_disambiguation() {
    let vocab = vocabulary(&[("kt/god", &["God"], &[]), ("kt/falsegod", &["god"], &[])]);
    let rows = scan(&vocab, "He is God, not a god");
    check!(rows.len() == 2);
    check!(rows[0].orig_words == "God");
    check!(rows[0].tw_link == "rc://*/tw/dict/bible/kt/god");
    check!(rows[1].orig_words == "god");
    check!(rows[1].tw_link == "rc://*/tw/dict/bible/kt/falsegod");
    for row in &rows {
        check!(row.disambiguation == "(kt/falsegod, kt/god)");
    }
}

/// Hyphen extension carries the whole compound into OrigWords.
#[test]
fn hyphen_extension() {
    let vocab = vocabulary(&[("kt/god", &["God"], &[])]);
    let rows = scan(&vocab, "a God-fearing man");
    check!(rows.len() == 1);
    check!(rows[0].orig_words == "God-fearing");
    check!(rows[0].reference == "1:1");
}

/// Possessive extension keeps the trailing apostrophe.
#[test]
fn possessive_extension() {
    let vocab = vocabulary(&[("kt/prophet", &["prophet"], &[])]);
    let rows = scan(&vocab, "the prophets' message");
    check!(rows.len() == 1);
    check!(rows[0].orig_words == "prophets'");
}

// --- Invariants ---

/// Every TWLink references an article that exists in the vocabulary.
#[test]
fn twlink_always_resolves() {
    let vocab = vocabulary(&[
        ("kt/god", &["God"], &[]),
        ("kt/grace", &["grace", "gracious"], &[]),
        ("names/aaron", &["Aaron"], &[]),
    ]);
    let rows = scan(&vocab, "Aaron found grace before God; gracious is he");
    check!(!rows.is_empty());
    for row in &rows {
        let path = row
            .tw_link
            .strip_prefix("rc://*/tw/dict/bible/")
            .expect("TWLink shape");
        let article = twl_generator::ArticleId::new(path).unwrap();
        check!(vocab.contains(&article), "{path} missing from vocabulary");
    }
}

/// Occurrence values per (Reference, OrigWords) are contiguous from 1.
#[test]
fn occurrences_are_contiguous() {
    let vocab = vocabulary(&[("kt/grace", &["grace"], &[])]);
    let rows = EnglishFirstPipeline::new(&vocab, false)
        .scan_book("\\c 1\n\\v 1 grace grace grace\n\\v 2 grace grace\n")
        .unwrap();
    let mut seen: std::collections::HashMap<(String, String), u32> = std::collections::HashMap::new();
    for row in &rows {
        let key = (row.reference.clone(), row.orig_words.clone());
        let expected = seen.entry(key).or_insert(0);
        *expected += 1;
        check!(row.occurrence == *expected);
    }
}

/// IDs are unique and shaped `[a-z][a-z0-9]{3}`.
#[test]
fn ids_are_unique_and_well_formed() {
    let vocab = vocabulary(&[("kt/grace", &["grace"], &[])]);
    let rows = scan(&vocab, "grace grace grace grace grace grace grace grace");
    let mut seen = std::collections::HashSet::new();
    for row in &rows {
        check!(row.id.len() == 4);
        let bytes = row.id.as_bytes();
        check!(bytes[0].is_ascii_lowercase());
        check!(
            bytes[1..]
                .iter()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        );
        check!(seen.insert(row.id.clone()), "duplicate id {}", row.id);
    }
}

/// Tags derive from the article category alone.
#[rstest]
#[case("kt/god", &["God"], "God above", "keyterm")]
#[case("names/aaron", &["Aaron"], "Aaron spoke", "name")]
#[case("other/bread", &["bread"], "bread to eat", "")]
fn tags_follow_category(
    #[case] path: &str,
    #[case] terms: &[&str],
    #[case] verse: &str,
    #[case] tag: &str,
) {
    let vocab = vocabulary(&[(path, terms, &[])]);
    let rows = scan(&vocab, verse);
    check!(rows.len() == 1);
    check!(rows[0].tags == tag);
}

/// Rows within a verse follow the surface's position in the verse text.
#[test]
fn rows_follow_verse_order() {
    let vocab = vocabulary(&[
        ("kt/god", &["God"], &[]),
        ("kt/grace", &["grace"], &[]),
        ("other/bread", &["bread"], &[]),
    ]);
    let rows = scan(&vocab, "bread and grace come from God; grace again");
    let words: Vec<_> = rows.iter().map(|r| r.orig_words.as_str()).collect();
    check!(words == vec!["bread", "grace", "God", "grace"]);
}

/// The hit set is invariant under lowercasing of the verse.
#[test]
fn scanning_is_case_invariant() {
    let vocab = vocabulary(&[("kt/grace", &["grace"], &[]), ("kt/god", &["God"], &[])]);
    let verse = "Grace from GOD, and grace";
    let spans = |text: &str| -> Vec<(String, String)> {
        scan(&vocab, text)
            .into_iter()
            .map(|r| (r.orig_words.to_lowercase(), r.tw_link))
            .collect()
    };
    check!(spans(verse) == spans(&verse.to_lowercase()));
}

// --- Round-trip laws ---

/// A headword surrounded by arbitrary text scans back out verbatim.
#[rstest]
#[case("covenant")]
#[case("burnt offering")]
#[case("Passover")]
fn headword_roundtrip(#[case] word: &str) {
    let vocab = vocabulary(&[("other/thing", &[word], &[])]);
    let rows = scan(&vocab, &format!("prefix {word} suffix"));
    check!(rows.len() == 1);
    check!(rows[0].orig_words == word);
}

/// Irregular verb forms reach their base headword.
#[rstest]
#[case("was")]
#[case("were")]
#[case("been")]
#[case("being")]
fn irregular_form_reaches_base(#[case] form: &str) {
    let vocab = vocabulary(&[("kt/be", &["be"], &[])]);
    let rows = scan(&vocab, &format!("he {form} there"));
    check!(rows.len() == 1);
    check!(rows[0].tw_link == "rc://*/tw/dict/bible/kt/be");
    // The surface is a documented form of the headword, so no variant flag.
    check!(rows[0].variant_of == "");
}

/// Articles with no headwords add no rows.
#[test]
fn empty_headwords_add_no_rows() {
    let with_empty = vocabulary(&[("kt/god", &["God"], &[]), ("kt/empty", &[], &[])]);
    let without = vocabulary(&[("kt/god", &["God"], &[])]);
    let verse = "God created empty space";
    check!(scan(&with_empty, verse).len() == scan(&without, verse).len());
}

// --- Service integration ---

#[tokio::test]
async fn services_fill_gl_columns() {
    let vocab = vocabulary(&[("kt/god", &["God"], &[])]);
    let pipeline = EnglishFirstPipeline::new(&vocab, false);
    let rows = pipeline
        .run(&single_verse("God created"), &StubServices::default())
        .await
        .unwrap();
    check!(rows[0].gl_quote == "God");
    check!(rows[0].gl_occurrence == Some(1));
}

#[tokio::test]
async fn service_failure_falls_back_to_copies() {
    let vocab = vocabulary(&[("kt/god", &["God"], &[])]);
    let pipeline = EnglishFirstPipeline::new(&vocab, false);
    let services = StubServices {
        fail_add_gl: true,
        fail_convert: true,
    };
    let rows = pipeline
        .run(&single_verse("God created"), &services)
        .await
        .unwrap();
    check!(rows[0].orig_words == "God");
    check!(rows[0].gl_quote == "God");
    check!(rows[0].gl_occurrence == Some(1));
}
