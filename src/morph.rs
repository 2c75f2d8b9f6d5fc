//! English morphology as a closed, deterministic rule set.
//!
//! Headwords may be multi-word phrases; every function here inflects only the
//! last whitespace-separated token and re-joins the untouched head with a
//! single space. There is no stemmer and no statistical model: the rules
//! below, the irregular-noun map, and the irregular-verb table are the entire
//! morphological knowledge of the pipeline.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Nouns whose verb-like readings are spurious in this corpus; `-ed`/`-ing`
/// generation is suppressed for them (`well → welled`).
const NO_VERB_NOUNS: &[&str] = &[
    "horn", "mare", "steed", "horse", "doe", "deer", "father", "Father", "cross", "well",
];

/// Irregular noun plurals.
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("man", "men"),
    ("woman", "women"),
    ("person", "people"),
    ("child", "children"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("ox", "oxen"),
];

/// Nouns ending in `f` that pluralize with a plain `s`.
const F_PLURAL_EXCEPTIONS: &[&str] = &["roof", "belief", "chief", "proof"];

/// Irregular verb table: base form followed by its full form set.
///
/// Forms include the base, third-person singular, simple past, past
/// participle, and present participle where they differ.
const IRREGULAR_VERBS: &[(&str, &[&str])] = &[
    ("be", &["be", "am", "is", "are", "was", "were", "been", "being"]),
    ("bear", &["bear", "bears", "bore", "borne", "born", "bearing"]),
    ("become", &["become", "becomes", "became", "becoming"]),
    ("begin", &["begin", "begins", "began", "begun", "beginning"]),
    ("bind", &["bind", "binds", "bound", "binding"]),
    ("break", &["break", "breaks", "broke", "broken", "breaking"]),
    ("bring", &["bring", "brings", "brought", "bringing"]),
    ("build", &["build", "builds", "built", "building"]),
    ("buy", &["buy", "buys", "bought", "buying"]),
    ("catch", &["catch", "catches", "caught", "catching"]),
    ("choose", &["choose", "chooses", "chose", "chosen", "choosing"]),
    ("come", &["come", "comes", "came", "coming"]),
    ("do", &["do", "does", "did", "done", "doing"]),
    ("draw", &["draw", "draws", "drew", "drawn", "drawing"]),
    ("drink", &["drink", "drinks", "drank", "drunk", "drinking"]),
    ("drive", &["drive", "drives", "drove", "driven", "driving"]),
    ("eat", &["eat", "eats", "ate", "eaten", "eating"]),
    ("fall", &["fall", "falls", "fell", "fallen", "falling"]),
    ("feed", &["feed", "feeds", "fed", "feeding"]),
    ("feel", &["feel", "feels", "felt", "feeling"]),
    ("fight", &["fight", "fights", "fought", "fighting"]),
    ("find", &["find", "finds", "found", "finding"]),
    ("flee", &["flee", "flees", "fled", "fleeing"]),
    ("fly", &["fly", "flies", "flew", "flown", "flying"]),
    ("forgive", &["forgive", "forgives", "forgave", "forgiven", "forgiving"]),
    ("forsake", &["forsake", "forsakes", "forsook", "forsaken", "forsaking"]),
    ("get", &["get", "gets", "got", "gotten", "getting"]),
    ("give", &["give", "gives", "gave", "given", "giving"]),
    ("go", &["go", "goes", "went", "gone", "going"]),
    ("grow", &["grow", "grows", "grew", "grown", "growing"]),
    ("hang", &["hang", "hangs", "hung", "hanged", "hanging"]),
    ("have", &["have", "has", "had", "having"]),
    ("hear", &["hear", "hears", "heard", "hearing"]),
    ("hide", &["hide", "hides", "hid", "hidden", "hiding"]),
    ("hold", &["hold", "holds", "held", "holding"]),
    ("keep", &["keep", "keeps", "kept", "keeping"]),
    ("know", &["know", "knows", "knew", "known", "knowing"]),
    ("lay", &["lay", "lays", "laid", "laying"]),
    ("lead", &["lead", "leads", "led", "leading"]),
    ("leave", &["leave", "leaves", "left", "leaving"]),
    ("lie", &["lie", "lies", "lay", "lain", "lying"]),
    ("lose", &["lose", "loses", "lost", "losing"]),
    ("make", &["make", "makes", "made", "making"]),
    ("mean", &["mean", "means", "meant", "meaning"]),
    ("meet", &["meet", "meets", "met", "meeting"]),
    ("pay", &["pay", "pays", "paid", "paying"]),
    ("ride", &["ride", "rides", "rode", "ridden", "riding"]),
    ("rise", &["rise", "rises", "rose", "risen", "rising"]),
    ("run", &["run", "runs", "ran", "running"]),
    ("say", &["say", "says", "said", "saying"]),
    ("see", &["see", "sees", "saw", "seen", "seeing"]),
    ("seek", &["seek", "seeks", "sought", "seeking"]),
    ("sell", &["sell", "sells", "sold", "selling"]),
    ("send", &["send", "sends", "sent", "sending"]),
    ("set", &["set", "sets", "setting"]),
    ("shake", &["shake", "shakes", "shook", "shaken", "shaking"]),
    ("sing", &["sing", "sings", "sang", "sung", "singing"]),
    ("sit", &["sit", "sits", "sat", "sitting"]),
    ("slay", &["slay", "slays", "slew", "slain", "slaying"]),
    ("speak", &["speak", "speaks", "spoke", "spoken", "speaking"]),
    ("stand", &["stand", "stands", "stood", "standing"]),
    ("steal", &["steal", "steals", "stole", "stolen", "stealing"]),
    ("strike", &["strike", "strikes", "struck", "stricken", "striking"]),
    ("swear", &["swear", "swears", "swore", "sworn", "swearing"]),
    ("take", &["take", "takes", "took", "taken", "taking"]),
    ("teach", &["teach", "teaches", "taught", "teaching"]),
    ("tell", &["tell", "tells", "told", "telling"]),
    ("think", &["think", "thinks", "thought", "thinking"]),
    ("throw", &["throw", "throws", "threw", "thrown", "throwing"]),
    ("wear", &["wear", "wears", "wore", "worn", "wearing"]),
    ("weep", &["weep", "weeps", "wept", "weeping"]),
    ("write", &["write", "writes", "wrote", "written", "writing"]),
];

/// Reverse index: any lowercase irregular form → its base.
static IRREGULAR_REVERSE: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for (base, forms) in IRREGULAR_VERBS {
        for form in *forms {
            // First base wins on collisions ("lay" is both a base and a
            // past form of "lie").
            map.entry(*form).or_insert(*base);
        }
    }
    map
});

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Split a phrase into its untouched head and the last token.
fn split_last(phrase: &str) -> (Option<&str>, &str) {
    match phrase.rfind(char::is_whitespace) {
        Some(pos) => (Some(phrase[..pos].trim_end()), phrase[pos..].trim_start()),
        None => (None, phrase),
    }
}

fn join_last(head: Option<&str>, last: &str) -> String {
    match head {
        Some(head) => format!("{head} {last}"),
        None => last.to_string(),
    }
}

/// Apply a last-word mapping producing several alternates of a phrase.
fn map_last_many<F>(phrase: &str, f: F) -> Vec<String>
where
    F: FnOnce(&str) -> Vec<String>,
{
    let (head, last) = split_last(phrase);
    f(last)
        .into_iter()
        .map(|mapped| join_last(head, &mapped))
        .collect()
}

/// Apply a last-word mapping producing a single alternate of a phrase.
fn map_last<F>(phrase: &str, f: F) -> String
where
    F: FnOnce(&str) -> String,
{
    let (head, last) = split_last(phrase);
    join_last(head, &f(last))
}

/// Ends-with test on the last word, ASCII case-insensitive.
fn ends_with_ci(word: &str, suffix: &str) -> bool {
    word.len() >= suffix.len() && word[word.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

fn has_sibilant_ending(word: &str) -> bool {
    ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| ends_with_ci(word, suffix))
}

/// True when the word ends consonant-vowel-consonant with a doubleable final
/// consonant (not `w`, `x`, or `y`).
fn ends_cvc(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    if n < 3 {
        return false;
    }
    let (a, b, c) = (chars[n - 3], chars[n - 2], chars[n - 1]);
    c.is_ascii_alphabetic()
        && !is_vowel(c)
        && !matches!(c.to_ascii_lowercase(), 'w' | 'x' | 'y')
        && is_vowel(b)
        && a.is_ascii_alphabetic()
        && !is_vowel(a)
}

/// Plural alternates of a phrase (inflecting the last word only).
///
/// The rule-derived plural comes first; a plain `+s` fallback is always
/// included so that loan words and names still match their written plurals.
pub fn plurals(phrase: &str) -> Vec<String> {
    let mut out = map_last_many(phrase, |word| {
        let lower = word.to_lowercase();
        let mut forms = Vec::with_capacity(2);

        if let Some((_, plural)) = IRREGULAR_PLURALS.iter().find(|(sing, _)| *sing == lower) {
            forms.push((*plural).to_string());
        } else if ends_with_ci(word, "y")
            && word
                .chars()
                .rev()
                .nth(1)
                .is_some_and(|c| c.is_ascii_alphabetic() && !is_vowel(c))
        {
            forms.push(format!("{}ies", &word[..word.len() - 1]));
        } else if has_sibilant_ending(word) {
            forms.push(format!("{word}es"));
        } else if ends_with_ci(word, "fe") {
            forms.push(format!("{}ves", &word[..word.len() - 2]));
        } else if ends_with_ci(word, "f") && !F_PLURAL_EXCEPTIONS.contains(&lower.as_str()) {
            forms.push(format!("{}ves", &word[..word.len() - 1]));
        } else if ends_with_ci(word, "o") {
            forms.push(format!("{word}es"));
        } else {
            forms.push(format!("{word}s"));
        }

        let fallback = format!("{word}s");
        if !forms.contains(&fallback) {
            forms.push(fallback);
        }
        forms
    });
    out.dedup();
    out
}

/// Singular alternates of a phrase, or empty when the last word does not look
/// plural.
pub fn depluralize(phrase: &str) -> Vec<String> {
    map_last_many(phrase, |word| {
        let mut forms = Vec::new();
        if ends_with_ci(word, "ies") && word.len() > 3 {
            forms.push(format!("{}y", &word[..word.len() - 3]));
        } else if ends_with_ci(word, "es") {
            let stem = &word[..word.len() - 2];
            if has_sibilant_ending(stem) {
                forms.push(stem.to_string());
            }
        } else if ends_with_ci(word, "s") && !ends_with_ci(word, "ss") {
            forms.push(word[..word.len() - 1].to_string());
        }
        forms
    })
}

/// Suffixes that block final-consonant doubling in the past tense.
const NO_DOUBLING_STEMS: &[&str] = &["er", "en", "or", "on", "al"];

/// Regular past tense of a phrase (inflecting the last word only).
pub fn past_tense(phrase: &str) -> String {
    map_last(phrase, |word| {
        if ends_with_ci(word, "e") {
            format!("{word}d")
        } else if ends_with_ci(word, "y")
            && word
                .chars()
                .rev()
                .nth(1)
                .is_some_and(|c| c.is_ascii_alphabetic() && !is_vowel(c))
        {
            format!("{}ied", &word[..word.len() - 1])
        } else if ends_cvc(word)
            && !NO_DOUBLING_STEMS
                .iter()
                .any(|suffix| ends_with_ci(word, suffix))
        {
            let last = word.chars().last().unwrap_or_default();
            format!("{word}{last}ed")
        } else {
            format!("{word}ed")
        }
    })
}

/// Regular present participle of a phrase (inflecting the last word only).
pub fn present_participle(phrase: &str) -> String {
    map_last(phrase, |word| {
        if ends_with_ci(word, "ie") {
            format!("{}ying", &word[..word.len() - 2])
        } else if ends_with_ci(word, "ee") {
            format!("{word}ing")
        } else if ends_with_ci(word, "e") {
            format!("{}ing", &word[..word.len() - 1])
        } else if ends_cvc(word) {
            let last = word.chars().last().unwrap_or_default();
            format!("{word}{last}ing")
        } else {
            format!("{word}ing")
        }
    })
}

/// All documented forms of the last word's irregular-verb base, or empty when
/// the last word is not a known irregular form.
pub fn irregular_forms(phrase: &str) -> Vec<String> {
    let (head, last) = split_last(phrase);
    let lower = last.to_lowercase();
    let Some(base) = IRREGULAR_REVERSE.get(lower.as_str()) else {
        return Vec::new();
    };
    let forms = IRREGULAR_VERBS
        .iter()
        .find(|(b, _)| b == base)
        .map(|(_, forms)| *forms)
        .unwrap_or_default();
    forms.iter().map(|form| join_last(head, form)).collect()
}

/// The irregular-verb base of a word, if it is a known irregular form.
pub fn irregular_base(word: &str) -> Option<&'static str> {
    IRREGULAR_REVERSE.get(word.to_lowercase().as_str()).copied()
}

/// Uppercase the first character when it is a lowercase ASCII letter.
pub fn capitalize(s: &str) -> Option<String> {
    let first = s.chars().next()?;
    if !first.is_ascii_lowercase() {
        return None;
    }
    let mut out = String::with_capacity(s.len());
    out.push(first.to_ascii_uppercase());
    out.push_str(&s[first.len_utf8()..]);
    Some(out)
}

/// Options steering variant generation for a single headword.
#[derive(Debug, Clone, Copy, Default)]
pub struct MorphOptions {
    /// The article lives under `names/`: suppress (de)pluralization but keep
    /// capitalized alternates.
    pub is_name: bool,
    /// Widen conjugation coverage with regular past/participle forms.
    pub rich_conjugations: bool,
}

/// A headword or generated alternate, tagged with its trie priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermVariant {
    pub text: String,
    /// 0 = original headword, 1 = morphological variant.
    pub priority: u8,
}

/// Expand a headword into the variant set carried by the trie.
///
/// The original term always comes first with priority 0. Generated variants
/// (plural, singular, irregular verb forms, regular `-ed`/`-ing`, capitalized
/// alternates) follow with priority 1, de-duplicated in generation order.
pub fn expand(term: &str, opts: MorphOptions) -> Vec<TermVariant> {
    let mut texts: Vec<String> = vec![term.to_string()];
    let (_, last) = split_last(term);

    if !opts.is_name {
        texts.extend(plurals(term));
        texts.extend(depluralize(term));
    }
    texts.extend(irregular_forms(term));
    let verb_like = !opts.is_name
        && !NO_VERB_NOUNS.contains(&last)
        && !NO_VERB_NOUNS.contains(&last.to_lowercase().as_str());
    if verb_like {
        texts.push(past_tense(term));
        texts.push(present_participle(term));
    }

    // Capitalized alternates of everything generated so far.
    for i in 0..texts.len() {
        if let Some(upper) = capitalize(&texts[i]) {
            texts.push(upper);
        }
    }

    let mut seen = ahash::AHashSet::new();
    texts
        .into_iter()
        .enumerate()
        .filter(|(_, text)| !text.is_empty() && seen.insert(text.clone()))
        .map(|(i, text)| TermVariant {
            text,
            priority: u8::from(i != 0),
        })
        .collect()
}
