use models::{DifficultyTier, Level, Song};

/// Outcome of a single-chart rating computation. Always returned by value;
/// invalid input zeroes the numbers and raises the matching flag instead of
/// erroring, so the caller can render a specific message.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingResult {
    /// Difficulty-weighted accuracy, rounded to 5 decimals. 0 on any
    /// rejected input.
    pub rating: f64,
    /// Fail count after absorbing any judgment shortfall. Informational
    /// only; it never feeds back into the rating.
    pub adjusted_fail: i64,
    /// `notes - (harmony + tune + fail)` when the sum falls short, else 0.
    pub adjustment: i64,
    /// Judgment sum exceeded the chart's note count.
    pub exceeded: bool,
    /// Some judgment count (or the note count) was negative.
    pub negative: bool,
    pub bonus: f64,
    pub base_level: f64,
}

impl RatingResult {
    /// Unparseable or structurally invalid input: everything zero, no flag
    /// raised.
    fn malformed(fail: i64) -> Self {
        RatingResult {
            adjusted_fail: fail,
            ..RatingResult::default()
        }
    }

    fn negative_input(fail: i64) -> Self {
        RatingResult {
            negative: true,
            adjusted_fail: fail,
            ..RatingResult::default()
        }
    }

    fn exceeded_input(fail: i64) -> Self {
        RatingResult {
            exceeded: true,
            adjusted_fail: fail,
            ..RatingResult::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.base_level != 0.0
    }
}

fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}

/// Bonus by level band. Only 13+..16+ exist as plus tiers; any other plus
/// label gets no bonus rather than a crash.
fn level_bonus(label: &str, level: Level) -> f64 {
    if level.plus {
        match label.trim() {
            "13+" | "14+" => 0.5,
            "15+" => 0.75,
            "16+" => 1.25,
            _ => 0.0,
        }
    } else if level.base == 16.0 {
        0.5
    } else {
        0.0
    }
}

/// Compute a single-chart rating from raw judgment counts.
///
/// Validation short-circuits in order: negative input, zero notes, judgment
/// sum over notes, unparseable level, level outside 1..=16. A judgment sum
/// short of `notes` is reconciled by absorbing the shortfall into
/// `adjusted_fail`; the rating itself uses the original counts, since fail
/// carries zero weight regardless.
///
/// Formula: `(harmony + tune/3) / notes * (base_level + 1 + bonus)`.
pub fn rate_single_chart(
    harmony: i64,
    tune: i64,
    fail: i64,
    notes: i64,
    level: &str,
) -> RatingResult {
    if harmony < 0 || tune < 0 || fail < 0 || notes < 0 {
        return RatingResult::negative_input(fail);
    }
    if notes == 0 {
        return RatingResult::malformed(fail);
    }

    // A sum too large for i64 exceeds any note count.
    let Some(input_total) = harmony
        .checked_add(tune)
        .and_then(|sum| sum.checked_add(fail))
    else {
        return RatingResult::exceeded_input(fail);
    };
    if input_total > notes {
        return RatingResult::exceeded_input(fail);
    }

    let Some(parsed) = Level::parse(level) else {
        return RatingResult::malformed(fail);
    };
    let base_level = parsed.base;
    let bonus = level_bonus(level, parsed);

    if !(1.0..=16.0).contains(&base_level) {
        return RatingResult::malformed(fail);
    }

    let (adjustment, adjusted_fail) = if input_total != notes {
        let adjustment = notes - input_total;
        (adjustment, fail + adjustment)
    } else {
        (0, fail)
    };

    let rating = (harmony as f64 + tune as f64 / 3.0) / notes as f64 * (base_level + 1.0 + bonus);

    RatingResult {
        rating: round5(rating),
        adjusted_fail,
        adjustment,
        exceeded: false,
        negative: false,
        bonus,
        base_level,
    }
}

/// Look up the chart's note count and level label on the song, then rate.
/// An unset or unparseable notes label yields the malformed result, as does
/// a missing level label; catalog fields are wiki-scraped strings.
pub fn rate_single_chart_by_song(
    harmony: i64,
    tune: i64,
    fail: i64,
    song: &Song,
    tier: DifficultyTier,
) -> RatingResult {
    let Some(notes_label) = song.notes.get(tier) else {
        return RatingResult::malformed(fail);
    };
    let Ok(notes) = notes_label.parse::<i64>() else {
        return RatingResult::malformed(fail);
    };
    let Some(level_label) = song.difficulty.get(tier) else {
        return RatingResult::malformed(fail);
    };
    rate_single_chart(harmony, tune, fail, notes, level_label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonus_bands() {
        let at = |label: &str| level_bonus(label, Level::parse(label).unwrap());
        assert_eq!(at("13+"), 0.5);
        assert_eq!(at("14+"), 0.5);
        assert_eq!(at("15+"), 0.75);
        assert_eq!(at("16+"), 1.25);
        assert_eq!(at("16"), 0.5);
        assert_eq!(at("15"), 0.0);
        assert_eq!(at("12+"), 0.0);
        assert_eq!(at("1"), 0.0);
    }

    #[test]
    fn round5_truncates_noise() {
        assert_eq!(round5(0.123456789), 0.12346);
        assert_eq!(round5(14.0), 14.0);
    }
}
