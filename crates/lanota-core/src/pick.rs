use chrono::{Datelike, NaiveDate};
use models::{Category, DifficultyTier, Song};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Songs carrying the requested level label on any tier. Labels compare
/// verbatim, the way they are stored.
pub fn songs_by_level<'a>(songs: &'a [Song], level: &str) -> Vec<&'a Song> {
    songs
        .iter()
        .filter(|song| {
            DifficultyTier::ALL
                .iter()
                .any(|&tier| song.difficulty.raw(tier) == level)
        })
        .collect()
}

pub fn songs_by_category(songs: &[Song], category: Category) -> Vec<&Song> {
    songs
        .iter()
        .filter(|song| song.category == category)
        .collect()
}

/// Uniform pick through the injected randomness source. The production bot
/// plugs whatever index provider it likes here; the engine never reaches
/// for the network itself.
pub fn pick_random<'a, T, R: Rng>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.gen_range(0..items.len()))
}

/// Seed for a user's song of the day: `yyyymmdd + user_id`, so the pick is
/// stable for the whole day and differs per user.
pub fn daily_seed(date: NaiveDate, user_id: u64) -> u64 {
    let ymd = date.year().unsigned_abs() as u64 * 10_000
        + u64::from(date.month()) * 100
        + u64::from(date.day());
    ymd.wrapping_add(user_id)
}

pub fn daily_song(songs: &[Song], user_id: u64, date: NaiveDate) -> Option<&Song> {
    let mut rng = StdRng::seed_from_u64(daily_seed(date, user_id));
    pick_random(songs, &mut rng)
}
