//! Search term derivation and candidate selection.

use crate::types::Game;

/// Marker appended to the id of manually registered roots.
const CUSTOM_MARKER: &str = " (custom)";

/// Turns a folder-style identifier into a human-readable search term.
///
/// - drops the first ` (custom)` marker
/// - splits letter→digit, digit→letter and lower→upper boundaries
///   (`Fallout4` → `Fallout 4`, `MyCustomGame` → `My Custom Game`)
/// - collapses runs of `_` / `-` into one space
/// - trims surrounding whitespace
pub fn format_search_term(id: &str) -> String {
    let stripped = id.replacen(CUSTOM_MARKER, "", 1);

    let mut out = String::with_capacity(stripped.len() + 8);
    let mut prev: Option<char> = None;
    let mut in_separator_run = false;

    for c in stripped.chars() {
        if c == '_' || c == '-' {
            if !in_separator_run {
                out.push(' ');
            }
            in_separator_run = true;
            prev = Some(c);
            continue;
        }
        in_separator_run = false;

        if let Some(p) = prev {
            let boundary = (p.is_ascii_alphabetic() && c.is_ascii_digit())
                || (p.is_ascii_digit() && c.is_ascii_alphabetic())
                || (p.is_ascii_lowercase() && c.is_ascii_uppercase());
            if boundary {
                out.push(' ');
            }
        }
        out.push(c);
        prev = Some(c);
    }

    out.trim().to_string()
}

/// Terms to try in order: the formatted term, then the raw identifier if
/// formatting changed it.
pub fn search_terms(id: &str) -> Vec<String> {
    let formatted = format_search_term(id);
    if formatted == id {
        vec![formatted]
    } else {
        vec![formatted, id.to_string()]
    }
}

/// Chooses the candidate whose cover to use.
///
/// Prefers the first exact (case-insensitive) name match that has cover
/// art, then the first candidate with cover art. API order breaks ties.
pub fn pick_candidate<'a>(games: &'a [Game], term: &str) -> Option<&'a Game> {
    let term = term.to_lowercase();

    games
        .iter()
        .find(|g| {
            g.cover_image_id().is_some()
                && g.name.as_ref().is_some_and(|n| n.to_lowercase() == term)
        })
        .or_else(|| games.iter().find(|g| g.cover_image_id().is_some()))
}
