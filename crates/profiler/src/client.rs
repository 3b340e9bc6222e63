use std::collections::BTreeMap;
use std::sync::Arc;

use analysis::DateWindow;
use async_trait::async_trait;
use chrono::SecondsFormat;
use gh_client::client::parse_url;
use gh_client::{collect_pages, AuthContext, GithubApiError, GithubHttp, Paged};
use http::StatusCode;
use normalizer::graphql::{
    CalendarCollection, ContributionCalendar, GraphqlEnvelope, RepositoryCollection,
};
use normalizer::{
    CommitSearchItem, ContributorPayload, EventPayload, IssueSearchItem, ReadmePayload,
    RepoPayload, UserPayload,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};
use url::Url;

use crate::queries::{CALENDAR_QUERY, REPOSITORY_QUERY};

const PER_PAGE: &str = "100";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Issue,
    PullRequest,
}

impl IssueKind {
    fn qualifier(self) -> &'static str {
        match self {
            IssueKind::Issue => "type:issue",
            IssueKind::PullRequest => "type:pr",
        }
    }
}

/// Every GitHub read the profiler performs. Listings come back as [`Paged`]
/// so truncation by rate limit is visible to the caller.
#[async_trait]
pub trait GithubClient: Send + Sync {
    fn auth(&self) -> &AuthContext;
    async fn get_user(&self, login: &str) -> Result<UserPayload, GithubApiError>;
    /// The owner of the access token (`/user`).
    async fn get_authenticated_user(&self) -> Result<UserPayload, GithubApiError>;
    async fn list_repos(
        &self,
        login: &str,
        include_private: bool,
    ) -> Result<Paged<RepoPayload>, GithubApiError>;
    /// Base64 body of `README.md`, or `None` when the repository has none.
    async fn get_readme(&self, owner: &str, repo: &str) -> Result<Option<String>, GithubApiError>;
    async fn get_repo(&self, owner: &str, name: &str) -> Result<RepoPayload, GithubApiError>;
    /// Language byte counts, largest first.
    async fn list_languages(&self, languages_url: &str) -> Result<Vec<(String, u64)>, GithubApiError>;
    async fn list_contributors(
        &self,
        contributors_url: &str,
    ) -> Result<Paged<ContributorPayload>, GithubApiError>;
    async fn list_events(&self, events_url: &str) -> Result<Paged<EventPayload>, GithubApiError>;
    async fn search_commits(&self, login: &str) -> Result<Paged<CommitSearchItem>, GithubApiError>;
    /// Issue search hits carry no visibility flag, so unless `include_private`
    /// the query itself is limited to public repositories.
    async fn search_issues(
        &self,
        login: &str,
        kind: IssueKind,
        include_private: bool,
    ) -> Result<Paged<IssueSearchItem>, GithubApiError>;
    async fn contribution_calendar(
        &self,
        login: &str,
        window: &DateWindow,
    ) -> Result<Option<ContributionCalendar>, GithubApiError>;
    async fn contributions_by_repository(
        &self,
        login: &str,
        window: &DateWindow,
    ) -> Result<Option<RepositoryCollection>, GithubApiError>;
}

pub struct RestGithubClient {
    http: Arc<GithubHttp>,
}

impl RestGithubClient {
    pub fn new(http: Arc<GithubHttp>) -> Self {
        Self { http }
    }

    fn join(&self, path: &str) -> Result<Url, GithubApiError> {
        self.http.join(path)
    }

    fn with_query(url: &mut Url, params: &[(&str, &str)]) {
        let mut query_pairs = url.query_pairs_mut();
        for (key, val) in params {
            query_pairs.append_pair(key, val);
        }
    }

    fn listing_url(raw: &str) -> Result<Url, GithubApiError> {
        let mut url = parse_url(raw)?;
        Self::with_query(&mut url, &[("per_page", PER_PAGE)]);
        Ok(url)
    }

    async fn paged<T: DeserializeOwned>(
        &self,
        url: Url,
        key: Option<&str>,
    ) -> Result<Paged<T>, GithubApiError> {
        let endpoint = url.path().trim_start_matches('/').to_string();
        let paged = collect_pages(&self.http, url, key).await?;
        paged
            .try_map(serde_json::from_value)
            .map_err(|source| GithubApiError::Decode { endpoint, source })
    }

    async fn collection<T: DeserializeOwned>(
        &self,
        query: &str,
        login: &str,
        window: &DateWindow,
    ) -> Result<Option<T>, GithubApiError> {
        let variables = json!({
            "login": login,
            "from": window.from.to_rfc3339_opts(SecondsFormat::Secs, true),
            "to": window.to.to_rfc3339_opts(SecondsFormat::Secs, true),
        });
        let value = self.http.graphql(query, variables).await?;
        let envelope: GraphqlEnvelope<T> =
            serde_json::from_value(value).map_err(|source| GithubApiError::Decode {
                endpoint: "graphql".to_string(),
                source,
            })?;
        Ok(envelope.data.user.map(|user| user.contributions_collection))
    }
}

#[async_trait]
impl GithubClient for RestGithubClient {
    fn auth(&self) -> &AuthContext {
        self.http.auth()
    }

    async fn get_user(&self, login: &str) -> Result<UserPayload, GithubApiError> {
        let url = self.join(&format!("users/{login}"))?;
        self.http.get_json(url).await
    }

    async fn get_authenticated_user(&self) -> Result<UserPayload, GithubApiError> {
        let url = self.join("user")?;
        self.http.get_json(url).await
    }

    #[instrument(skip(self))]
    async fn list_repos(
        &self,
        login: &str,
        include_private: bool,
    ) -> Result<Paged<RepoPayload>, GithubApiError> {
        let mut url = if include_private {
            self.join("user/repos")?
        } else {
            self.join(&format!("users/{login}/repos"))?
        };
        Self::with_query(&mut url, &[("per_page", PER_PAGE)]);
        self.paged(url, None).await
    }

    async fn get_readme(&self, owner: &str, repo: &str) -> Result<Option<String>, GithubApiError> {
        let url = self.join(&format!("repos/{owner}/{repo}/contents/README.md"))?;
        let response = self.http.get_lenient(url).await?;
        if response.status == StatusCode::NOT_FOUND {
            debug!(owner, repo, "no profile README");
            return Ok(None);
        }
        GithubApiError::classify(response.status, self.auth(), response.endpoint.clone())?;
        let readme: ReadmePayload = response.json()?;
        Ok(readme.content)
    }

    async fn get_repo(&self, owner: &str, name: &str) -> Result<RepoPayload, GithubApiError> {
        let url = self.join(&format!("repos/{owner}/{name}"))?;
        self.http.get_json(url).await
    }

    async fn list_languages(&self, languages_url: &str) -> Result<Vec<(String, u64)>, GithubApiError> {
        let url = parse_url(languages_url)?;
        let bytes: BTreeMap<String, u64> = self.http.get_json(url).await?;
        let mut languages: Vec<(String, u64)> = bytes.into_iter().collect();
        languages.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(languages)
    }

    async fn list_contributors(
        &self,
        contributors_url: &str,
    ) -> Result<Paged<ContributorPayload>, GithubApiError> {
        self.paged(Self::listing_url(contributors_url)?, None).await
    }

    async fn list_events(&self, events_url: &str) -> Result<Paged<EventPayload>, GithubApiError> {
        self.paged(Self::listing_url(events_url)?, None).await
    }

    #[instrument(skip(self))]
    async fn search_commits(&self, login: &str) -> Result<Paged<CommitSearchItem>, GithubApiError> {
        let mut url = self.join("search/commits")?;
        let query = format!("author:{login}");
        Self::with_query(&mut url, &[("q", query.as_str()), ("per_page", PER_PAGE)]);
        self.paged(url, Some("items")).await
    }

    #[instrument(skip(self))]
    async fn search_issues(
        &self,
        login: &str,
        kind: IssueKind,
        include_private: bool,
    ) -> Result<Paged<IssueSearchItem>, GithubApiError> {
        let mut url = self.join("search/issues")?;
        let mut query = format!("author:{login} {}", kind.qualifier());
        if !include_private {
            query.push_str(" is:public");
        }
        Self::with_query(&mut url, &[("q", query.as_str()), ("per_page", PER_PAGE)]);
        self.paged(url, Some("items")).await
    }

    async fn contribution_calendar(
        &self,
        login: &str,
        window: &DateWindow,
    ) -> Result<Option<ContributionCalendar>, GithubApiError> {
        let collection: Option<CalendarCollection> =
            self.collection(CALENDAR_QUERY, login, window).await?;
        Ok(collection.map(|c| c.contribution_calendar))
    }

    async fn contributions_by_repository(
        &self,
        login: &str,
        window: &DateWindow,
    ) -> Result<Option<RepositoryCollection>, GithubApiError> {
        self.collection(REPOSITORY_QUERY, login, window).await
    }
}

