use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use normalizer::{ContributionRecord, Contributor, OwnerType};
use serde::Serialize;

use crate::buckets::{PeriodCount, PeriodTally};
use crate::round3;
use crate::tally::{NamedCount, OtherRepoContribution, OtherRepos, Tally};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContributionSummary {
    pub contribution_count: u64,
    pub weekly_average_contribution: f64,
    pub contribution_count_per_day: Vec<PeriodCount>,
    pub contribution_count_per_month: Vec<PeriodCount>,
    pub contribution_count_per_owned_repo: Vec<NamedCount>,
    pub contribution_count_per_other_repo: Vec<OtherRepoContribution>,
    pub contribution_count_per_repo_org_owner: Vec<NamedCount>,
    pub contribution_count_per_repo_user_owner: Vec<NamedCount>,
    pub external_contribution_to_top_repos: Vec<NamedCount>,
    pub incomplete_external_results: bool,
}

/// Rolls the calendar's daily counts and the per-repository records up into
/// one summary. External contributions are left empty for the caller to fill.
pub fn summarize_contributions(
    login: &str,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    daily: &BTreeMap<NaiveDate, u64>,
    records: &[ContributionRecord],
) -> ContributionSummary {
    let mut periods = PeriodTally::new(now);
    for (date, count) in daily {
        periods.add(*date, *count);
    }
    let total = periods.all_time();

    let by_repo = RepoBreakdown::from_records(login, records);
    let mut orgs = Tally::new();
    let mut users = Tally::new();
    for record in records {
        match record.repo.owner_type {
            Some(OwnerType::Organization) => orgs.add(&record.repo.owner, record.count),
            Some(OwnerType::User) => users.add(&record.repo.owner, record.count),
            None => {}
        }
    }

    ContributionSummary {
        contribution_count: total,
        weekly_average_contribution: weekly_average(total, created_at, now),
        contribution_count_per_day: periods.per_day(),
        contribution_count_per_month: periods.per_month(),
        contribution_count_per_owned_repo: by_repo.owned,
        contribution_count_per_other_repo: by_repo.other,
        contribution_count_per_repo_org_owner: orgs.sorted(),
        contribution_count_per_repo_user_owner: users.sorted(),
        external_contribution_to_top_repos: Vec::new(),
        incomplete_external_results: false,
    }
}

/// `total / max(1, round(days since creation / 7))`, to three places. An
/// account younger than half a week counts as one week old.
pub fn weekly_average(total: u64, created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days = (now - created_at).num_days().max(0);
    let weeks = ((days as f64) / 7.0).round().max(1.0);
    round3(total as f64 / weeks)
}

/// Sums `contributions` per login over the contributors of the identity's
/// top repositories, leaving the identity itself out.
pub fn external_contributions(login: &str, contributors: &[Contributor]) -> Vec<NamedCount> {
    let mut tally = Tally::new();
    for contributor in contributors.iter().filter(|c| c.login != login) {
        tally.add(&contributor.login, contributor.contributions);
    }
    tally.sorted()
}

/// Records split into repositories owned by the identity, reported by name,
/// and everyone else's, reported in full. Both are keyed by URL.
pub(crate) struct RepoBreakdown {
    pub owned: Vec<NamedCount>,
    pub other: Vec<OtherRepoContribution>,
}

impl RepoBreakdown {
    pub(crate) fn from_records(login: &str, records: &[ContributionRecord]) -> Self {
        let mut owned = OtherRepos::new();
        let mut other = OtherRepos::new();
        for record in records {
            if record.repo.owner == login {
                owned.add(&record.repo, record.count);
            } else {
                other.add(&record.repo, record.count);
            }
        }
        Self {
            owned: owned
                .into_sorted()
                .into_iter()
                .map(|entry| NamedCount {
                    name: entry.name,
                    count: entry.contributions_count,
                })
                .collect(),
            other: other.into_sorted(),
        }
    }
}
