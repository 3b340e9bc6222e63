use chrono::{DateTime, Utc};
use normalizer::ContributionRecord;
use serde::Serialize;

use crate::buckets::{PeriodCount, PeriodTally};
use crate::contributions::RepoBreakdown;
use crate::tally::{NamedCount, OtherRepoContribution};

/// One search pass (commits, issues or pull requests) rolled up.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActivityBreakdown {
    pub total_count: u64,
    pub fetched_count: usize,
    pub incomplete: bool,
    pub per_day: Vec<PeriodCount>,
    pub per_month: Vec<PeriodCount>,
    pub per_owned_repo: Vec<NamedCount>,
    pub per_other_repo: Vec<OtherRepoContribution>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActivitySummary {
    pub commits: ActivityBreakdown,
    pub issues: ActivityBreakdown,
    pub pull_requests: ActivityBreakdown,
}

/// `total_count` is what the search endpoint reports, which can exceed the
/// records actually fetched when pagination was cut short.
pub fn summarize_activity(
    login: &str,
    now: DateTime<Utc>,
    records: &[ContributionRecord],
    total_count: u64,
    incomplete: bool,
) -> ActivityBreakdown {
    let mut periods = PeriodTally::new(now);
    for record in records {
        if let Some(date) = record.date {
            periods.add(date, record.count);
        }
    }
    let by_repo = RepoBreakdown::from_records(login, records);
    ActivityBreakdown {
        total_count,
        fetched_count: records.len(),
        incomplete,
        per_day: periods.per_day(),
        per_month: periods.per_month(),
        per_owned_repo: by_repo.owned,
        per_other_repo: by_repo.other,
    }
}
