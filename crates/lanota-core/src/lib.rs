//! Pure computation core of the Lanota song bot: free-text search over the
//! catalog, alias normalization, and chart rating. Everything here is
//! synchronous, total, and side-effect free; persistence lives in
//! `lanota-songdb` and message dispatch in the host bot.

pub mod aggregate;
pub mod alias;
pub mod pick;
pub mod rating;
pub mod search;

pub use aggregate::{compute_aggregate_rating, AggregateResult};
pub use alias::resolve_alias;
pub use rating::{rate_single_chart, rate_single_chart_by_song, RatingResult};
pub use search::{find_songs, MatchTier, SearchOutcome, DEFAULT_MAX_DISPLAY};
