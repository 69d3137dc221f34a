use std::collections::HashSet;

use models::{AliasTable, Song};
use strum::Display;

pub const DEFAULT_MAX_DISPLAY: usize = 10;

/// Which tier produced the matches. Earlier tiers always win; a later tier
/// is only consulted when every earlier one came up empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MatchTier {
    Chapter,
    Id,
    Alias,
    Title,
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<'a> {
    /// Matches in catalog order, truncated to `max_display`.
    pub matches: Vec<&'a Song>,
    pub tier: Option<MatchTier>,
    /// Match count before truncation.
    pub total: usize,
}

impl SearchOutcome<'_> {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Rank catalog matches for a free-text term.
///
/// Tier order: chapter-code exact, id exact, alias exact, title exact, then
/// fuzzy (title or alias containment, deduplicated by id). String
/// comparisons are case-insensitive; matches keep catalog order and are
/// truncated from the front, with `total` counted before truncation.
pub fn find_songs<'a>(
    term: &str,
    songs: &'a [Song],
    aliases: &AliasTable,
    max_display: usize,
) -> SearchOutcome<'a> {
    let term_lower = term.to_lowercase();

    let mut matches: Vec<&Song> = songs
        .iter()
        .filter(|song| song.chapter.to_lowercase() == term_lower)
        .collect();
    let mut tier = if matches.is_empty() {
        None
    } else {
        Some(MatchTier::Chapter)
    };

    if matches.is_empty() {
        if let Ok(id) = term.trim().parse::<u32>() {
            matches = songs.iter().filter(|song| song.id == id).collect();
            if !matches.is_empty() {
                tier = Some(MatchTier::Id);
            }
        }
    }

    if matches.is_empty() && !aliases.is_empty() {
        matches = songs
            .iter()
            .filter(|song| {
                aliases
                    .aliases_for(&song.title)
                    .iter()
                    .any(|alias| alias.to_lowercase() == term_lower)
            })
            .collect();
        if !matches.is_empty() {
            tier = Some(MatchTier::Alias);
        }
    }

    if matches.is_empty() {
        matches = songs
            .iter()
            .filter(|song| song.title.to_lowercase() == term_lower)
            .collect();
        if !matches.is_empty() {
            tier = Some(MatchTier::Title);
        }
    }

    if matches.is_empty() {
        // Title hits first, then alias-only hits, deduplicated by id.
        let mut seen: HashSet<u32> = HashSet::new();
        for song in songs {
            if song.title.to_lowercase().contains(&term_lower) && seen.insert(song.id) {
                matches.push(song);
            }
        }
        for song in songs {
            let alias_hit = aliases
                .aliases_for(&song.title)
                .iter()
                .any(|alias| alias.to_lowercase().contains(&term_lower));
            if alias_hit && seen.insert(song.id) {
                matches.push(song);
            }
        }
        if !matches.is_empty() {
            tier = Some(MatchTier::Fuzzy);
        }
    }

    let total = matches.len();
    matches.truncate(max_display);

    SearchOutcome {
        matches,
        tier,
        total,
    }
}
