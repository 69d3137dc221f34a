use models::{AliasTable, Song};

/// Normalize a piece of free text through the alias table.
///
/// Returns the text with the longest embedded alias spliced out for its
/// canonical title, the text itself when it already is a canonical title, or
/// `None` when no substitution applies. Offsets are char-based since queries
/// are routinely CJK.
pub fn resolve_alias(text: &str, songs: &[Song], aliases: &AliasTable) -> Option<String> {
    if songs.iter().any(|song| song.title == text) {
        return Some(text.to_string());
    }

    // A real title embedded in a larger string counts as already resolved;
    // substituting into it would double-resolve.
    if songs
        .iter()
        .any(|song| !song.title.is_empty() && text.contains(&song.title))
    {
        return None;
    }

    let chars: Vec<char> = text.chars().collect();
    let cap = aliases.max_alias_chars();

    let mut best: Option<(usize, usize, &str)> = None;
    let mut best_len = 0;
    for start in 0..chars.len() {
        let longest = cap.min(chars.len() - start);
        for len in (1..=longest).rev() {
            if len <= best_len {
                break;
            }
            let candidate: String = chars[start..start + len].iter().collect();
            for (title, alias_list) in aliases.iter() {
                if alias_list.iter().any(|alias| alias == &candidate) {
                    best = Some((start, len, title));
                    best_len = len;
                    break;
                }
            }
        }
    }

    let (start, len, title) = best?;
    let mut resolved: String = chars[..start].iter().collect();
    resolved.push_str(title);
    resolved.extend(&chars[start + len..]);
    Some(resolved)
}
