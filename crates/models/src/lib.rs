use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Normalize a wiki-scraped field value, treating the scraper's assorted
/// placeholder spellings as "unknown".
pub fn known(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    let lower = trimmed.to_lowercase();
    match lower.as_str() {
        "" | "none" | "no" | "n/a" | "unknown" | "no info" => None,
        _ => Some(trimmed),
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Main,
    Side,
    Expansion,
    Event,
    Subscription,
    #[default]
    Other,
}

impl Category {
    /// Classify a chapter code (e.g. "0-1", "x-3", "ss1-2", "event-4") by
    /// its left code.
    pub fn classify(chapter: &str) -> Category {
        let left = chapter.split('-').next().unwrap_or("");
        let left = left.trim().to_lowercase().replace('∞', "inf");

        if left == "event" || left == "time limited" {
            return Category::Event;
        }
        if !left.is_empty() && left.chars().all(|c| c.is_ascii_digit()) {
            return Category::Main;
        }
        if left == "inf" {
            return Category::Subscription;
        }

        let chars: Vec<char> = left.chars().collect();
        let letters = chars
            .iter()
            .take_while(|c| c.is_ascii_alphabetic())
            .count();
        if (1..=2).contains(&letters) {
            if letters == chars.len() {
                return Category::Expansion;
            }
            if chars[letters..].iter().all(|c| c.is_ascii_digit()) {
                return Category::Side;
            }
        }

        Category::Other
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DifficultyTier {
    Whisper,
    Acoustic,
    Ultra,
    Master,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 4] = [
        DifficultyTier::Whisper,
        DifficultyTier::Acoustic,
        DifficultyTier::Ultra,
        DifficultyTier::Master,
    ];
}

/// One label per difficulty tier, as scraped. Empty or placeholder strings
/// read as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierLabels {
    pub whisper: String,
    pub acoustic: String,
    pub ultra: String,
    pub master: String,
}

impl TierLabels {
    pub fn raw(&self, tier: DifficultyTier) -> &str {
        match tier {
            DifficultyTier::Whisper => &self.whisper,
            DifficultyTier::Acoustic => &self.acoustic,
            DifficultyTier::Ultra => &self.ultra,
            DifficultyTier::Master => &self.master,
        }
    }

    pub fn get(&self, tier: DifficultyTier) -> Option<&str> {
        known(self.raw(tier))
    }
}

/// Prior chart revision, present only for re-authored charts. Field names
/// match the wiki's LegacyTable template parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyChart {
    #[serde(rename = "Chart Design")]
    pub chart_design: String,
    #[serde(rename = "DiffWhisper")]
    pub diff_whisper: String,
    #[serde(rename = "DiffAcoustic")]
    pub diff_acoustic: String,
    #[serde(rename = "DiffUltra")]
    pub diff_ultra: String,
    #[serde(rename = "DiffMaster")]
    pub diff_master: String,
    #[serde(rename = "MaxWhisper")]
    pub max_whisper: String,
    #[serde(rename = "MaxAcoustic")]
    pub max_acoustic: String,
    #[serde(rename = "MaxUltra")]
    pub max_ultra: String,
    #[serde(rename = "MaxMaster")]
    pub max_master: String,
}

impl LegacyChart {
    pub fn is_empty(&self) -> bool {
        *self == LegacyChart::default()
    }

    pub fn level(&self, tier: DifficultyTier) -> Option<&str> {
        let raw = match tier {
            DifficultyTier::Whisper => &self.diff_whisper,
            DifficultyTier::Acoustic => &self.diff_acoustic,
            DifficultyTier::Ultra => &self.diff_ultra,
            DifficultyTier::Master => &self.diff_master,
        };
        known(raw)
    }

    pub fn notes(&self, tier: DifficultyTier) -> Option<&str> {
        let raw = match tier {
            DifficultyTier::Whisper => &self.max_whisper,
            DifficultyTier::Acoustic => &self.max_acoustic,
            DifficultyTier::Ultra => &self.max_ultra,
            DifficultyTier::Master => &self.max_master,
        };
        known(raw)
    }
}

/// One catalog entry, immutable once loaded. Every field tolerates absence;
/// missing data is "unknown", never fatal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Song {
    pub id: u32,
    pub title: String,
    pub artist: String,
    pub chapter: String,
    pub category: Category,
    pub difficulty: TierLabels,
    pub notes: TierLabels,
    pub time: String,
    pub bpm: String,
    pub version: String,
    pub area: String,
    pub genre: String,
    pub vocals: String,
    pub chart_design: String,
    pub cover_art: String,
    #[serde(rename = "Trivia")]
    pub trivia: Vec<String>,
    #[serde(rename = "Legacy")]
    pub legacy: LegacyChart,
}

impl Song {
    pub fn has_legacy(&self) -> bool {
        !self.legacy.is_empty()
    }
}

/// A parsed level label: "14" → base 14 without plus, "15+" → base 15 with
/// plus. Only 13+..16+ exist as plus tiers in practice, but parsing does not
/// enforce that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub base: f64,
    pub plus: bool,
}

impl Level {
    pub fn parse(label: &str) -> Option<Level> {
        let label = label.trim();
        let (numeric, plus) = match label.strip_suffix('+') {
            Some(rest) => (rest, true),
            None => (label, false),
        };
        let base: f64 = numeric.trim().parse().ok()?;
        Some(Level { base, plus })
    }

    /// Orders levels the way charts are ranked: a higher numeric base beats
    /// any lower base, and at equal base a plus beats the bare label.
    pub fn rank_cmp(&self, other: &Level) -> Ordering {
        self.base
            .total_cmp(&other.base)
            .then(self.plus.cmp(&other.plus))
    }
}

/// Canonical title → alias strings. Membership matters, order does not.
/// The write boundary guarantees an alias never equals a canonical title and
/// belongs to at most one title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable(pub BTreeMap<String, Vec<String>>);

impl AliasTable {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn aliases_for(&self, title: &str) -> &[String] {
        self.0.get(title).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Exact-membership lookup: which title owns this alias, if any.
    pub fn canonical_for(&self, alias: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|a| a == alias))
            .map(|(title, _)| title.as_str())
    }

    /// Length in chars of the longest registered alias.
    pub fn max_alias_chars(&self) -> usize {
        self.0
            .values()
            .flatten()
            .map(|a| a.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Append an alias under a title. Returns false if already present there.
    pub fn add(&mut self, title: &str, alias: &str) -> bool {
        let aliases = self.0.entry(title.to_string()).or_default();
        if aliases.iter().any(|a| a == alias) {
            return false;
        }
        aliases.push(alias.to_string());
        true
    }

    /// Remove an alias from whichever title holds it, returning that title.
    pub fn remove(&mut self, alias: &str) -> Option<String> {
        for (title, aliases) in self.0.iter_mut() {
            if let Some(pos) = aliases.iter().position(|a| a == alias) {
                aliases.remove(pos);
                return Some(title.clone());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_left_codes() {
        assert_eq!(Category::classify("0-1"), Category::Main);
        assert_eq!(Category::classify("12-3"), Category::Main);
        assert_eq!(Category::classify("x-3"), Category::Expansion);
        assert_eq!(Category::classify("ab-1"), Category::Expansion);
        assert_eq!(Category::classify("a1-2"), Category::Side);
        assert_eq!(Category::classify("ss1-2"), Category::Side);
        assert_eq!(Category::classify("event-2"), Category::Event);
        assert_eq!(Category::classify("time limited-1"), Category::Event);
        assert_eq!(Category::classify("inf-1"), Category::Subscription);
        assert_eq!(Category::classify("∞-1"), Category::Subscription);
        assert_eq!(Category::classify("abc-1"), Category::Other);
        assert_eq!(Category::classify(""), Category::Other);
    }

    #[test]
    fn level_parse_plus_and_bare() {
        assert_eq!(Level::parse("14"), Some(Level { base: 14.0, plus: false }));
        assert_eq!(Level::parse("15+"), Some(Level { base: 15.0, plus: true }));
        assert_eq!(Level::parse(" 16+ "), Some(Level { base: 16.0, plus: true }));
        assert_eq!(Level::parse("?"), None);
        assert_eq!(Level::parse(""), None);
    }

    #[test]
    fn level_rank_order() {
        let l15 = Level::parse("15").unwrap();
        let l15p = Level::parse("15+").unwrap();
        let l16 = Level::parse("16").unwrap();
        assert_eq!(l15p.rank_cmp(&l15), Ordering::Greater);
        assert_eq!(l16.rank_cmp(&l15p), Ordering::Greater);
        assert_eq!(l15.rank_cmp(&l15), Ordering::Equal);
    }

    #[test]
    fn known_filters_placeholders() {
        assert_eq!(known("902"), Some("902"));
        assert_eq!(known("  13+  "), Some("13+"));
        assert_eq!(known(""), None);
        assert_eq!(known("No Info"), None);
        assert_eq!(known("unknown"), None);
    }

    #[test]
    fn song_deserializes_with_missing_fields() {
        let song: Song = serde_json::from_str(r#"{"id": 3, "title": "Dream goes on"}"#).unwrap();
        assert_eq!(song.id, 3);
        assert_eq!(song.title, "Dream goes on");
        assert_eq!(song.category, Category::Other);
        assert_eq!(song.difficulty.get(DifficultyTier::Master), None);
        assert!(!song.has_legacy());
    }

    #[test]
    fn alias_table_membership() {
        let mut table = AliasTable::default();
        assert!(table.add("Dream goes on", "dgo"));
        assert!(!table.add("Dream goes on", "dgo"));
        assert_eq!(table.canonical_for("dgo"), Some("Dream goes on"));
        assert_eq!(table.canonical_for("missing"), None);
        assert_eq!(table.max_alias_chars(), 3);
        assert_eq!(table.remove("dgo"), Some("Dream goes on".to_string()));
        assert_eq!(table.remove("dgo"), None);
    }
}
