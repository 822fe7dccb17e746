//! Text normalization for search and event-type matching.

/// Fold the accented Latin letters used in the event data to ASCII.
fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'Á' | 'À' | 'Ä' | 'Â' | 'Ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' | 'É' | 'È' | 'Ë' | 'Ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' | 'Í' | 'Ì' | 'Ï' | 'Î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' | 'Ó' | 'Ò' | 'Ö' | 'Ô' | 'Õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' | 'Ú' | 'Ù' | 'Ü' | 'Û' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        other => other,
    }
}

/// Lowercase, diacritic-free, trimmed.
pub fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .map(fold_char)
        .flat_map(char::to_lowercase)
        .collect()
}

/// True when every whitespace-separated term of `query` occurs in `haystack`
/// (both normalized). An empty query matches everything.
pub fn includes_all_terms(haystack: &str, query: &str) -> bool {
    let text = normalize(haystack);
    normalize(query)
        .split_whitespace()
        .all(|term| text.contains(term))
}

/// Collapse inner whitespace runs to a single space.
pub fn squash_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// "edificios" -> "Edificios"
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Cut to `max` visible chars, appending "..." when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}
