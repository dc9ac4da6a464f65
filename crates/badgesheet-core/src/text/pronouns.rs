pub const HANDLE_SIGIL: char = '@';

/// Picks the first non-blank candidate in priority order and makes it printable:
/// parentheses stripped, lower-cased, trimmed.
pub fn derive_pronouns(explicit: &str, from_name: &str, from_handle: &str) -> String {
    let chosen = [explicit, from_name, from_handle]
        .into_iter()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default();

    chosen
        .chars()
        .filter(|ch| !matches!(ch, '(' | ')'))
        .collect::<String>()
        .trim()
        .to_lowercase()
}

/// Prefixes a cleaned display name with the handle sigil. Blank names stay blank.
pub fn format_handle(cleaned: &str) -> String {
    let bare = cleaned.trim().trim_start_matches(HANDLE_SIGIL).trim();
    if bare.is_empty() {
        return String::new();
    }
    format!("{HANDLE_SIGIL}{bare}")
}
