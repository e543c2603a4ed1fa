//! Key-element extraction for comparison highlighting.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::MAX_KEY_ELEMENTS;

static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("static pattern"));

/// Component list following a transition phrase, up to the first
/// `wherein`/`where` clause, semicolon, or end of text.
static COMPONENT_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:comprising|including|having|consists? of)[:\s]+(.+?)(?:wherein|where|;|$)")
        .expect("static pattern")
});

/// Component delimiters: `;` or `,` (optionally followed by `and`), or a
/// standalone `and`.
static COMPONENT_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[;,](?:\s*and)?|\s+and\s+").expect("static pattern"));

/// Leading noun phrase of a component, articles stripped, at most four words.
static NOUN_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:a|an|the)?\s*(\w+(?:\s+\w+){0,3})").expect("static pattern"));

/// Extracts key technical elements from a claim's text.
///
/// Collects double-quoted substrings verbatim plus short noun phrases
/// from the claim's component list. The result is a deduplicated,
/// order-insensitive set capped at [`MAX_KEY_ELEMENTS`]; phrases shorter
/// than four characters are dropped as noise.
pub fn extract_key_elements(claim_text: &str) -> Vec<String> {
    let mut elements = BTreeSet::new();

    for caps in QUOTED.captures_iter(claim_text) {
        if let Some(quoted) = caps.get(1) {
            elements.insert(quoted.as_str().to_string());
        }
    }

    if let Some(caps) = COMPONENT_SEGMENT.captures(claim_text) {
        if let Some(segment) = caps.get(1) {
            for part in COMPONENT_SPLIT.split(segment.as_str()) {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                if let Some(phrase) = NOUN_PHRASE
                    .captures(part)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().trim())
                {
                    if phrase.len() > 3 {
                        elements.insert(phrase.to_string());
                    }
                }
            }
        }
    }

    elements.into_iter().take(MAX_KEY_ELEMENTS).collect()
}
