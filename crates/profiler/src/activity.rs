use analysis::{summarize_activity, ActivityBreakdown, ActivitySummary};
use chrono::{DateTime, Utc};
use gh_client::{GithubApiError, Paged};
use normalizer::{contribution_from_commit, contribution_from_issue, ContributionRecord};
use tracing::{info, instrument};

use crate::client::{GithubClient, IssueKind};
use crate::metrics;

/// Commit, issue and pull-request search passes for `login`, each bucketed
/// by date and repository.
#[instrument(skip(client, now))]
pub(crate) async fn infer_activity(
    client: &dyn GithubClient,
    login: &str,
    now: DateTime<Utc>,
    include_private: bool,
) -> Result<ActivitySummary, GithubApiError> {
    let commits = client.search_commits(login).await?;
    let commit_records: Vec<ContributionRecord> =
        commits.items.iter().filter_map(contribution_from_commit).collect();
    let commits = breakdown("commits", login, now, commit_records, &commits, include_private);

    let issues = client.search_issues(login, IssueKind::Issue, include_private).await?;
    let issue_records = issues.items.iter().filter_map(contribution_from_issue).collect();
    let issues = breakdown("issues", login, now, issue_records, &issues, include_private);

    let pulls = client
        .search_issues(login, IssueKind::PullRequest, include_private)
        .await?;
    let pull_records = pulls.items.iter().filter_map(contribution_from_issue).collect();
    let pull_requests = breakdown("pull_requests", login, now, pull_records, &pulls, include_private);

    info!(
        commits = commits.total_count,
        issues = issues.total_count,
        pull_requests = pull_requests.total_count,
        "activity inference finished"
    );
    Ok(ActivitySummary {
        commits,
        issues,
        pull_requests,
    })
}

fn breakdown<T>(
    section: &str,
    login: &str,
    now: DateTime<Utc>,
    mut records: Vec<ContributionRecord>,
    paged: &Paged<T>,
    include_private: bool,
) -> ActivityBreakdown {
    if !include_private {
        records.retain(|record| !record.repo.is_private);
    }
    if paged.incomplete {
        metrics::INCOMPLETE_RESULTS_TOTAL
            .with_label_values(&[section])
            .inc();
    }
    let total = paged.total_count.unwrap_or(paged.items.len() as u64);
    summarize_activity(login, now, &records, total, paged.incomplete)
}
