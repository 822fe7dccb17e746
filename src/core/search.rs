//! Free-text search helpers.

use crate::models::EventRecord;
use crate::utils::colors::{BOLD, RESET, YELLOW};
use crate::utils::text::{includes_all_terms, normalize};

/// Diacritic- and case-insensitive: every term of `q` must appear somewhere
/// in the event's searchable fields.
pub fn matches_query(e: &EventRecord, q: &str) -> bool {
    includes_all_terms(&e.search_text(), q)
}

/// Wrap every occurrence of the query terms in `text` with ANSI highlight.
/// Matching is done on the folded text; the original characters are kept.
pub fn highlight(text: &str, q: &str) -> String {
    let terms: Vec<String> = normalize(q)
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if terms.is_empty() {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    // folding is one char to one char for the alphabet handled by `normalize`
    let folded: Vec<char> = chars
        .iter()
        .map(|c| normalize(&c.to_string()).chars().next().unwrap_or(*c))
        .collect();

    let mut marked = vec![false; chars.len()];
    for term in &terms {
        let t: Vec<char> = term.chars().collect();
        if t.is_empty() || t.len() > folded.len() {
            continue;
        }
        for i in 0..=(folded.len() - t.len()) {
            if folded[i..i + t.len()] == t[..] {
                marked[i..i + t.len()].iter_mut().for_each(|m| *m = true);
            }
        }
    }

    let mut out = String::with_capacity(text.len());
    let mut open = false;
    for (c, m) in chars.iter().zip(&marked) {
        if *m && !open {
            out.push_str(BOLD);
            out.push_str(YELLOW);
            open = true;
        } else if !*m && open {
            out.push_str(RESET);
            open = false;
        }
        out.push(*c);
    }
    if open {
        out.push_str(RESET);
    }
    out
}
