use std::sync::Arc;
use std::time::Instant;

use analysis::{round3, shares_by_bytes, LanguageShare, NamedCount, Tally};
use chrono::{DateTime, Utc};
use gh_client::GithubApiError;
use normalizer::{normalize_contributor, normalize_language, Contributor};
use serde::Serialize;
use tracing::{info, instrument};

use crate::client::GithubClient;
use crate::metrics;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContributorShare {
    pub login: String,
    pub html_url: Option<String>,
    pub contributor_repos_url: Option<String>,
    pub contributor_type: Option<String>,
    pub contributions: u64,
    pub contributions_percentage: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RepoReport {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub owner_username: String,
    pub owner_html_url: Option<String>,
    pub topics: Vec<String>,
    pub visibility: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_pushed_at: Option<DateTime<Utc>>,
    pub top_language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub watchers_count: u64,
    pub subscribers_count: Option<u64>,
    pub open_issues_count: u64,
    pub languages_share_by_bytes: Vec<LanguageShare>,
    pub events: Vec<NamedCount>,
    pub incomplete_event_results: bool,
    pub contributors: Vec<ContributorShare>,
    pub contributors_count: usize,
    pub contributions_count: u64,
    pub incomplete_contribution_results: bool,
}

/// Single-repository report: metadata, language bytes, event histogram and
/// contributor shares.
pub struct RepoInspector {
    client: Arc<dyn GithubClient>,
}

impl RepoInspector {
    pub fn new(client: Arc<dyn GithubClient>) -> Self {
        Self { client }
    }

    pub async fn inspect(&self, owner: &str, name: &str) -> Result<RepoReport, GithubApiError> {
        let started = Instant::now();
        let result = self.build(owner, name).await;
        metrics::RUNS_TOTAL
            .with_label_values(&["repo", metrics::outcome(&result)])
            .inc();
        metrics::RUN_DURATION
            .with_label_values(&["repo"])
            .observe(started.elapsed().as_secs_f64());
        result
    }

    #[instrument(skip(self))]
    async fn build(&self, owner: &str, name: &str) -> Result<RepoReport, GithubApiError> {
        let repo = self.client.get_repo(owner, name).await?;
        let languages = self.client.list_languages(&repo.languages_url).await?;

        let events = self.client.list_events(&repo.events_url).await?;
        let histogram: Tally = events
            .items
            .iter()
            .filter_map(|event| event.event_type.as_deref())
            .collect();

        let contributors = self.client.list_contributors(&repo.contributors_url).await?;
        let normalized: Vec<Contributor> = contributors
            .items
            .iter()
            .filter_map(normalize_contributor)
            .collect();
        let (shares, total) = contributor_shares(&normalized);

        info!(
            events = events.items.len(),
            contributors = shares.len(),
            "repository inspected"
        );
        Ok(RepoReport {
            name: repo.name,
            html_url: repo.html_url,
            description: repo.description,
            owner_username: repo.owner.login,
            owner_html_url: repo.owner.html_url,
            topics: repo.topics,
            visibility: repo.visibility,
            created_at: repo.created_at,
            last_pushed_at: repo.pushed_at,
            top_language: repo.language.as_deref().map(normalize_language),
            stargazers_count: repo.stargazers_count,
            forks_count: repo.forks_count,
            watchers_count: repo.watchers_count,
            subscribers_count: repo.subscribers_count,
            open_issues_count: repo.open_issues_count,
            languages_share_by_bytes: shares_by_bytes(&languages),
            events: histogram.sorted(),
            incomplete_event_results: events.incomplete,
            contributors_count: shares.len(),
            contributors: shares,
            contributions_count: total,
            incomplete_contribution_results: contributors.incomplete,
        })
    }
}

/// Each contributor's fraction of all contributions; zero when nobody
/// contributed anything.
pub fn contributor_shares(contributors: &[Contributor]) -> (Vec<ContributorShare>, u64) {
    let total: u64 = contributors.iter().map(|c| c.contributions).sum();
    let shares = contributors
        .iter()
        .map(|c| ContributorShare {
            login: c.login.clone(),
            html_url: c.html_url.clone(),
            contributor_repos_url: c.repos_url.clone(),
            contributor_type: c.user_type.clone(),
            contributions: c.contributions,
            contributions_percentage: if total == 0 {
                0.0
            } else {
                round3(c.contributions as f64 / total as f64)
            },
        })
        .collect();
    (shares, total)
}
