//! Claim parser: raw claims text → structured, dependency-linked claims.
//!
//! Parsing is best-effort and never fails: malformed input yields a
//! partial (possibly empty) result. Extraction runs an ordered list of
//! strategies (leading `N.`/`N)` numbering, explicit `Claim N:` labels,
//! then a manual line scan) and the first strategy that matches at all
//! wins outright; partial results from different strategies are never
//! merged.

mod elements;
mod strategies;


pub use elements::extract_key_elements;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::MIN_CLAIM_TEXT_LEN;
use crate::model::ClaimType;

/// A single claim as extracted from raw text, before it is given an id
/// and an embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedClaim {
    pub number: u32,
    pub text: String,
    pub is_independent: bool,
    pub parent_number: Option<u32>,
    pub claim_type: Option<ClaimType>,
}

static CRLF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n").expect("static pattern"));
static HORIZONTAL_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("static pattern"));
static PAGE_NUMBER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*-?\d+-?\s*\n").expect("static pattern"));
static ANY_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static pattern"));

/// Phrases that mark a claim as dependent. First match wins; the captured
/// number is the parent claim.
static DEPENDENCY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(?:according to|as (?:claimed|defined|set forth|recited) in|of) claims?\s+(\d+)",
        r"(?i)claims?\s+(\d+)[,\s]+(?:wherein|where|further|additionally)",
        r"(?i)(?:The|A|An)\s+\w+\s+(?:of|according to)\s+claim\s+(\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
});

/// Preamble vocabulary for claim typing, tried in order.
static CLAIM_TYPE_PATTERNS: LazyLock<Vec<(ClaimType, Regex)>> = LazyLock::new(|| {
    [
        (ClaimType::Method, r"(?i)^(?:A|The)\s+method"),
        (
            ClaimType::Apparatus,
            r"(?i)^(?:A|An|The)\s+(?:apparatus|device|machine|equipment)",
        ),
        (ClaimType::System, r"(?i)^(?:A|The)\s+system"),
        (
            ClaimType::Composition,
            r"(?i)^(?:A|The)\s+(?:composition|compound|formulation|mixture)",
        ),
        (
            ClaimType::Article,
            r"(?i)^(?:A|An|The)\s+(?:article|product|manufacture)",
        ),
        (ClaimType::Process, r"(?i)^(?:A|The)\s+process"),
    ]
    .iter()
    .map(|(t, p)| (*t, Regex::new(p).expect("static pattern")))
    .collect()
});

/// Stateless claims-text parser.
///
/// Construct once and share freely; all configuration is compile-time
/// pattern vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimParser;

impl ClaimParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses raw claims text into structured claims, sorted ascending by
    /// claim number (stable; ties keep encounter order).
    pub fn parse(&self, claims_text: &str) -> Vec<ParsedClaim> {
        if claims_text.trim().is_empty() {
            return Vec::new();
        }

        let text = preprocess(claims_text);

        let mut claims = Vec::new();
        for strategy in strategies::ordered() {
            let candidates = strategy(&text);
            if candidates.is_empty() {
                continue;
            }
            claims = self.build_claims(candidates);
            break;
        }

        // The structured strategies matched markers but every candidate was
        // noise-filtered, or nothing matched at all: line-scan fallback.
        if claims.is_empty() {
            claims = self.build_claims(strategies::line_scan(&text));
        }

        claims.sort_by_key(|c| c.number);

        debug!(claim_count = claims.len(), "parsed claims text");
        claims
    }

    fn build_claims(&self, candidates: Vec<(u32, String)>) -> Vec<ParsedClaim> {
        candidates
            .into_iter()
            .filter_map(|(number, raw)| {
                let text = clean_claim_text(&raw);
                if text.len() < MIN_CLAIM_TEXT_LEN {
                    return None;
                }

                let (is_independent, parent_number) = analyze_dependency(&text);
                let claim_type = detect_claim_type(&text);

                Some(ParsedClaim {
                    number,
                    text,
                    is_independent,
                    parent_number,
                    claim_type,
                })
            })
            .collect()
    }
}

/// Normalizes line endings and whitespace and strips stray page-number
/// lines before pattern matching.
fn preprocess(text: &str) -> String {
    let text = CRLF.replace_all(text, "\n");
    let text = HORIZONTAL_WS.replace_all(&text, " ");
    let text = PAGE_NUMBER_LINE.replace_all(&text, "\n");
    text.trim().to_string()
}

fn clean_claim_text(text: &str) -> String {
    ANY_WS.replace_all(text, " ").trim().to_string()
}

/// Classifies independence. Returns `(is_independent, parent_number)`;
/// the first dependency phrase found wins.
fn analyze_dependency(claim_text: &str) -> (bool, Option<u32>) {
    for pattern in DEPENDENCY_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(claim_text) {
            if let Some(parent) = caps.get(1).and_then(|m| m.as_str().parse().ok()) {
                return (false, Some(parent));
            }
        }
    }
    (true, None)
}

/// Matches the claim's leading noun phrase against the preamble
/// vocabulary; first rule wins, no match means untyped.
fn detect_claim_type(claim_text: &str) -> Option<ClaimType> {
    CLAIM_TYPE_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(claim_text))
        .map(|(claim_type, _)| *claim_type)
}
