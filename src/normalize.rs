use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Parentheticals containing any of these markers are publishing noise
/// ("(Print)", "(online ISSN 1234-5678)", ...) and carry no name information.
const PAREN_MARKERS: &[&str] = &["print", "online", "electronic", "issn", "doi"];

static PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^()]*\)").unwrap());

/// Abbreviation table for journal-name tokens, applied to whole tokens only.
///
/// NOTE: No value here may itself be a key. Expansion is single-pass, and
/// keeping values out of the key set is what makes `normalize` a fixed point.
static ABBREVIATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("j", "journal"),
        ("int", "international"),
        ("intl", "international"),
        ("natl", "national"),
        ("proc", "proceedings"),
        ("trans", "transactions"),
        ("sci", "science"),
        ("rev", "review"),
        ("lett", "letters"),
        ("phys", "physics"),
        ("chem", "chemistry"),
        ("biol", "biology"),
        ("med", "medicine"),
        ("res", "research"),
        ("eng", "engineering"),
        ("environ", "environmental"),
        ("technol", "technology"),
        ("soc", "society"),
        ("assoc", "association"),
        ("am", "american"),
        ("amer", "american"),
        ("br", "british"),
        ("eur", "european"),
        ("clin", "clinical"),
        ("exp", "experimental"),
        ("appl", "applied"),
        ("ann", "annals"),
        ("arch", "archives"),
        ("bull", "bulletin"),
        ("curr", "current"),
        ("mol", "molecular"),
        ("microbiol", "microbiology"),
        ("pharmacol", "pharmacology"),
        ("physiol", "physiology"),
        ("psychol", "psychology"),
        ("surg", "surgery"),
        ("univ", "university"),
        ("acad", "academy"),
    ])
});

/// Map a free-text journal name to its canonical comparison key.
///
/// Steps, in order: lower-case, trim, `&` → "and", hyphens/colons → space,
/// drop parentheticals that mention a publishing marker (see [`PAREN_MARKERS`]),
/// strip remaining punctuation to spaces, expand whole-token abbreviations
/// once, collapse whitespace.
///
/// Pure and idempotent: `normalize(normalize(x)) == normalize(x)`, so callers
/// may memoize on the raw string and may feed already-canonical keys back in.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut s = lowered.trim().to_string();
    s = s.replace('&', "and");
    s = s.replace(['-', ':'], " ");
    s = strip_marked_parentheticals(&s);

    // Punctuation becomes a token boundary before abbreviation expansion, so
    // "j.biol" splits into the same tokens as "j. biol" and re-normalizing
    // the output cannot surface new expandable tokens.
    let stripped: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let expanded: Vec<&str> = stripped
        .split_whitespace()
        .map(|token| ABBREVIATIONS.get(token).copied().unwrap_or(token))
        .collect();
    expanded.join(" ")
}

/// Like [`normalize`], with absent input degrading to the empty key.
pub fn normalize_opt(raw: Option<&str>) -> String {
    raw.map(normalize).unwrap_or_default()
}

/// Remove parentheticals whose content mentions a publishing marker. Other
/// parentheticals are kept; their parens fall to the punctuation pass.
fn strip_marked_parentheticals(s: &str) -> String {
    PAREN_RE
        .replace_all(s, |caps: &Captures| {
            let inner = &caps[0];
            if PAREN_MARKERS.iter().any(|m| inner.contains(m)) {
                " ".to_string()
            } else {
                inner.to_string()
            }
        })
        .into_owned()
}
