//! Extraction strategies, tried in priority order.
//!
//! Each strategy returns `(claim number, provisional text)` candidates.
//! A candidate's text runs from its marker to the next marker of the same
//! strategy, or end of input; claims span multiple lines. The marker
//! regexes deliberately anchor at line starts so claim numbers cited
//! mid-sentence ("of claim 3") never open a new claim.

use std::sync::LazyLock;

use regex::Regex;

/// `1. ...` or `1) ...` at line start.
static NUMBERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(\d+)[.)]\s*").expect("static pattern"));

/// `Claim 1: ...` or `Claim 1. ...` at line start.
static LABELED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^\s*claim\s+(\d+)[.:]\s*").expect("static pattern"));

/// Line shape used by the manual scan.
static SCAN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[.)]\s*(.*)$").expect("static pattern"));

type Strategy = fn(&str) -> Vec<(u32, String)>;

/// The structured strategies, in priority order. The manual
/// [`line_scan`] is the caller's final fallback, not part of this list.
pub(super) fn ordered() -> [Strategy; 2] {
    [numbered, labeled]
}

fn numbered(text: &str) -> Vec<(u32, String)> {
    split_on_markers(text, &NUMBERED_MARKER)
}

fn labeled(text: &str) -> Vec<(u32, String)> {
    split_on_markers(text, &LABELED_MARKER)
}

/// Slices the text between consecutive marker matches.
fn split_on_markers(text: &str, marker: &Regex) -> Vec<(u32, String)> {
    let matches: Vec<_> = marker.captures_iter(text).collect();

    matches
        .iter()
        .enumerate()
        .filter_map(|(i, caps)| {
            let number: u32 = caps.get(1)?.as_str().parse().ok()?;
            let body_start = caps.get(0)?.end();
            let body_end = matches
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |m| m.start());

            Some((number, text[body_start..body_end].to_string()))
        })
        .collect()
}

/// Manual line scan for non-standard formats: any line beginning with a
/// number opens a claim; subsequent non-numbered lines accumulate into
/// it; the final claim is flushed at end of input.
pub(super) fn line_scan(text: &str) -> Vec<(u32, String)> {
    let mut claims = Vec::new();
    let mut current_number: Option<u32> = None;
    let mut current_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = SCAN_LINE.captures(line) {
            let number = caps.get(1).and_then(|m| m.as_str().parse().ok());
            if let Some(number) = number {
                if let Some(prev) = current_number.take() {
                    if !current_lines.is_empty() {
                        claims.push((prev, current_lines.join(" ")));
                    }
                }
                current_number = Some(number);
                current_lines.clear();
                if let Some(rest) = caps.get(2).map(|m| m.as_str()).filter(|s| !s.is_empty()) {
                    current_lines.push(rest);
                }
                continue;
            }
        }

        if current_number.is_some() {
            current_lines.push(line);
        }
    }

    if let Some(number) = current_number {
        if !current_lines.is_empty() {
            claims.push((number, current_lines.join(" ")));
        }
    }

    claims
}
