use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub login: String,
    pub name: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub hireable: Option<bool>,
    pub twitter_username: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerRef {
    pub login: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(rename = "type", default)]
    pub owner_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoPayload {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub private: bool,
    pub owner: OwnerRef,
    pub contributors_url: String,
    pub languages_url: String,
    pub events_url: String,
    #[serde(default)]
    pub topics: Vec<String>,
    pub visibility: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub watchers_count: u64,
    pub subscribers_count: Option<u64>,
    #[serde(default)]
    pub open_issues_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributorPayload {
    pub login: Option<String>,
    pub html_url: Option<String>,
    pub repos_url: Option<String>,
    #[serde(rename = "type", default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub contributions: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

/// `contents/README.md`; `content` is base64 with embedded line breaks.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadmePayload {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueSearchItem {
    pub html_url: String,
    pub repository_url: String,
    pub created_at: DateTime<Utc>,
    pub pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitSearchItem {
    pub commit: CommitDetail,
    pub repository: SearchRepository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub author: Option<GitActor>,
    pub committer: Option<GitActor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitActor {
    pub date: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRepository {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    pub owner: OwnerRef,
}
