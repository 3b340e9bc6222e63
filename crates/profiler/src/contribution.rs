use std::collections::BTreeMap;

use analysis::{
    external_contributions, summarize_contributions, year_windows, ContributionSummary, DateWindow,
};
use chrono::{DateTime, NaiveDate, Utc};
use gh_client::GithubApiError;
use normalizer::graphql::{ContributionCalendar, RepositoryCollection};
use normalizer::{
    contribution_from_graphql, normalize_contributor, ContributionKind, ContributionRecord,
    Repository,
};
use tracing::{debug, info, instrument};

use crate::client::GithubClient;
use crate::metrics;

/// What the yearly windows fold into: per-day counts and per-repository
/// contribution records.
#[derive(Debug, Default)]
pub(crate) struct ContributionFold {
    pub daily: BTreeMap<NaiveDate, u64>,
    pub records: Vec<ContributionRecord>,
}

impl ContributionFold {
    /// Days the calendar reports outside `window` belong to a neighbouring
    /// window and are dropped.
    fn add_calendar(&mut self, window: &DateWindow, calendar: ContributionCalendar) {
        for day in calendar.weeks.into_iter().flat_map(|week| week.contribution_days) {
            if window.contains(day.date) {
                *self.daily.entry(day.date).or_default() += day.contribution_count;
            }
        }
    }

    fn add_repositories(&mut self, collection: &RepositoryCollection, include_private: bool) {
        let groups = [
            (ContributionKind::Commit, &collection.commit_contributions_by_repository),
            (ContributionKind::Issue, &collection.issue_contributions_by_repository),
            (ContributionKind::PullRequest, &collection.pull_request_contributions_by_repository),
            (
                ContributionKind::PullRequestReview,
                &collection.pull_request_review_contributions_by_repository,
            ),
        ];
        for (kind, entries) in groups {
            self.records.extend(
                entries
                    .iter()
                    .map(|entry| contribution_from_graphql(kind, entry))
                    .filter(|record| include_private || !record.repo.is_private),
            );
        }
    }
}

pub(crate) struct ContributionRequest<'a> {
    pub login: &'a str,
    pub created_at: DateTime<Utc>,
    pub now: DateTime<Utc>,
    pub originals: &'a [Repository],
    pub include_private: bool,
    pub contributor_repo_limit: usize,
}

/// Walks every yearly window since the account was created, then sums the
/// contributions other people made to the identity's top repositories.
#[instrument(skip(client, request), fields(login = request.login))]
pub(crate) async fn infer_contributions(
    client: &dyn GithubClient,
    request: ContributionRequest<'_>,
) -> Result<ContributionSummary, GithubApiError> {
    let mut fold = ContributionFold::default();
    let windows = year_windows(request.created_at, request.now);
    for window in &windows {
        metrics::CONTRIBUTION_WINDOWS_TOTAL.inc();
        if let Some(calendar) = client.contribution_calendar(request.login, window).await? {
            fold.add_calendar(window, calendar);
        }
        if let Some(collection) = client
            .contributions_by_repository(request.login, window)
            .await?
        {
            fold.add_repositories(&collection, request.include_private);
        }
    }
    debug!(
        windows = windows.len(),
        days = fold.daily.len(),
        records = fold.records.len(),
        "contribution windows folded"
    );

    let mut summary = summarize_contributions(
        request.login,
        request.created_at,
        request.now,
        &fold.daily,
        &fold.records,
    );

    let mut contributors = Vec::new();
    let mut incomplete = false;
    for repo in request.originals.iter().take(request.contributor_repo_limit) {
        let paged = client.list_contributors(&repo.contributors_url).await?;
        incomplete |= paged.incomplete;
        contributors.extend(paged.items.iter().filter_map(normalize_contributor));
    }
    if incomplete {
        metrics::INCOMPLETE_RESULTS_TOTAL
            .with_label_values(&["external_contributions"])
            .inc();
    }
    summary.external_contribution_to_top_repos = external_contributions(request.login, &contributors);
    summary.incomplete_external_results = incomplete;

    info!(
        total = summary.contribution_count,
        weekly_average = summary.weekly_average_contribution,
        "contribution inference finished"
    );
    Ok(summary)
}
