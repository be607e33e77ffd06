//! Result card extraction.
//!
//! A card's rendered text is free-form: court and title on the first two
//! lines, then a body where named sections appear as `Header: text` runs.
//! Extraction is heuristic substring search and never fails; anything the
//! card does not carry comes back as an empty string.

use crate::models::Precedent;

/// Ordered set of body section headers. A section ends at the earliest
/// following occurrence of any *other* header from this set.
const SECTION_HEADERS: [&str; 3] = ["Questão", "Tese", "Situação"];

/// Label line marker carrying the last-update date.
const LAST_UPDATE_MARKER: &str = "Última Atualização";

/// Parse the raw rendered text of one result card into a [`Precedent`].
pub fn parse_card(text: &str) -> Precedent {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let court = lines.first().copied().unwrap_or("").to_string();
    let title = lines.get(1).copied().unwrap_or("").to_string();

    let last_update = lines
        .iter()
        .find(|l| l.contains(LAST_UPDATE_MARKER))
        .and_then(|l| l.split_once(':'))
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default();

    // Court, title and the update label are consumed above; everything
    // else is the body the sections are searched in.
    let body = if lines.len() > 2 {
        lines[2..]
            .iter()
            .filter(|l| !l.contains(LAST_UPDATE_MARKER))
            .copied()
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        String::new()
    };

    Precedent {
        court,
        title,
        question: section(&body, SECTION_HEADERS[0]),
        thesis: section(&body, SECTION_HEADERS[1]),
        situation: section(&body, SECTION_HEADERS[2]),
        last_update,
    }
}

/// Extract one named section from the card body.
///
/// Finds `header:` case-insensitively, then takes text up to the earliest
/// following occurrence of any other header. Missing header yields "".
fn section(body: &str, header: &str) -> String {
    let needle = format!("{header}:");
    let Some((start, len)) = find_ci(body, &needle) else {
        return String::new();
    };
    let after = body[start + len..].trim_start();

    let mut end = after.len();
    for other in SECTION_HEADERS {
        if other == header {
            continue;
        }
        let other_needle = format!("{other}:");
        if let Some((i, _)) = find_ci(after, &other_needle) {
            end = end.min(i);
        }
    }

    after[..end].trim().to_string()
}

/// Case-insensitive substring search, safe on multi-byte input.
///
/// Returns the byte offset of the match in `haystack` together with the
/// byte length of the matched region (which can differ from `needle`'s own
/// length). Comparison folds each char to the first char of its lowercase
/// mapping, which is exact for the Portuguese headers this crate matches.
fn find_ci(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    fn fold(c: char) -> char {
        c.to_lowercase().next().unwrap_or(c)
    }

    if needle.is_empty() {
        return Some((0, 0));
    }

    let needle: Vec<char> = needle.chars().map(fold).collect();
    let hay: Vec<(usize, char)> = haystack.char_indices().collect();

    'outer: for start in 0..hay.len() {
        let mut pos = start;
        for &n in &needle {
            match hay.get(pos) {
                Some(&(_, c)) if fold(c) == n => pos += 1,
                _ => continue 'outer,
            }
        }
        let match_start = hay[start].0;
        let match_end = hay.get(pos).map(|&(b, _)| b).unwrap_or(haystack.len());
        return Some((match_start, match_end - match_start));
    }

    None
}
