pub mod activity;
pub mod buckets;
pub mod clock;
pub mod contributions;
pub mod keywords;
pub mod repos;
pub mod tally;
pub mod windows;

pub use activity::{summarize_activity, ActivityBreakdown, ActivitySummary};
pub use buckets::{PeriodCount, PeriodTally};
pub use clock::{Clock, FixedClock, SystemClock};
pub use contributions::{
    external_contributions, summarize_contributions, weekly_average, ContributionSummary,
};
pub use keywords::{decode_readme, KeywordExtractor, TaxonomyEntry};
pub use repos::{
    language_tally, partition, rank_by_popularity, repo_stats, shares_by_bytes, shares_by_repo_count,
    top_languages, LanguageShare, Partition, PopularRepo, RepoStats, StarForkCounts,
};
pub use tally::{NamedCount, OtherRepoContribution, OtherRepos, Tally};
pub use windows::{year_windows, DateWindow};

/// Rounds to three decimal places, the precision of every ratio reported.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
