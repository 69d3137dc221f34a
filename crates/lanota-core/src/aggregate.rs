use models::{DifficultyTier, Level, Song};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::rating::rate_single_chart;

pub const B30_SLOTS: usize = 30;
pub const R5_SLOTS: usize = 5;

/// Which high-difficulty tiers feed the eligible pool.
const POOL_TIERS: [DifficultyTier; 2] = [DifficultyTier::Master, DifficultyTier::Ultra];
const POOL_MIN_BASE: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRef {
    pub song_id: u32,
    pub title: String,
    pub tier: DifficultyTier,
    pub level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateEntry {
    /// `None` marks a padding slot for a pool smaller than 30 charts.
    pub chart: Option<ChartRef>,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    /// `(Σ b30 + Σ r5) / 35`.
    pub total: f64,
    pub b30: Vec<AggregateEntry>,
    pub r5: Vec<AggregateEntry>,
}

struct Candidate<'a> {
    song: &'a Song,
    tier: DifficultyTier,
    notes: i64,
}

/// Build the best-30 + representative-5 sample over the catalog's
/// high-difficulty charts.
///
/// Eligible charts (master/ultra, level base ≥ 15, positive note count) are
/// grouped by their exact level label, groups walked from 16+ down to 15
/// (a plus outranks the bare label at the same base). Each group is
/// shuffled and contributes up to the remaining of 30 slots, every member
/// carrying the group's perfect-clear rating; a short pool is padded with
/// placeholder entries at the last computed rating. R5 repeats or samples
/// the entries tied at the maximum rating.
pub fn compute_aggregate_rating<R: Rng>(songs: &[Song], rng: &mut R) -> AggregateResult {
    let mut groups: Vec<(Level, String, Vec<Candidate>)> = Vec::new();
    for song in songs {
        for tier in POOL_TIERS {
            let Some(label) = song.difficulty.get(tier) else {
                continue;
            };
            let Some(level) = Level::parse(label) else {
                continue;
            };
            if level.base < POOL_MIN_BASE {
                continue;
            }
            let Some(notes_label) = song.notes.get(tier) else {
                continue;
            };
            let Ok(notes) = notes_label.parse::<i64>() else {
                continue;
            };
            if notes <= 0 {
                continue;
            }

            let candidate = Candidate { song, tier, notes };
            match groups.iter_mut().find(|(_, l, _)| l.as_str() == label) {
                Some((_, _, members)) => members.push(candidate),
                None => groups.push((level, label.to_string(), vec![candidate])),
            }
        }
    }
    groups.sort_by(|a, b| b.0.rank_cmp(&a.0));

    let mut b30: Vec<AggregateEntry> = Vec::with_capacity(B30_SLOTS);
    let mut remaining = B30_SLOTS;
    let mut last_rating = 0.0;
    for (_, label, mut members) in groups {
        if remaining == 0 {
            break;
        }
        members.shuffle(rng);

        // One perfect-clear rating stands in for every chart in the group.
        let first = &members[0];
        let representative = rate_single_chart(first.notes, 0, 0, first.notes, &label).rating;
        last_rating = representative;

        for member in members.into_iter().take(remaining) {
            b30.push(AggregateEntry {
                chart: Some(ChartRef {
                    song_id: member.song.id,
                    title: member.song.title.clone(),
                    tier: member.tier,
                    level: label.clone(),
                }),
                rating: representative,
            });
            remaining -= 1;
        }
    }
    while b30.len() < B30_SLOTS {
        b30.push(AggregateEntry {
            chart: None,
            rating: last_rating,
        });
    }

    let max = b30
        .iter()
        .map(|entry| entry.rating)
        .fold(f64::NEG_INFINITY, f64::max);
    let tied: Vec<&AggregateEntry> = b30.iter().filter(|entry| entry.rating == max).collect();
    let r5: Vec<AggregateEntry> = if tied.len() >= R5_SLOTS {
        tied.choose_multiple(rng, R5_SLOTS)
            .map(|entry| (*entry).clone())
            .collect()
    } else {
        // Too few tied entries: repeat the tied set cyclically to 5.
        tied.iter().cycle().take(R5_SLOTS).map(|e| (**e).clone()).collect()
    };

    let sum: f64 = b30.iter().chain(r5.iter()).map(|entry| entry.rating).sum();
    let total = sum / (B30_SLOTS + R5_SLOTS) as f64;

    AggregateResult { total, b30, r5 }
}
