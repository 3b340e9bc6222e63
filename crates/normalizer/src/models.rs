use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
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
    pub followers: u64,
    pub following: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repository {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub top_language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub owner_login: String,
    pub is_fork: bool,
    pub is_private: bool,
    pub contributors_url: String,
    pub languages_url: String,
    pub events_url: String,
}

impl Repository {
    pub fn popularity(&self) -> u64 {
        self.stargazers_count + self.forks_count
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OwnerType {
    User,
    Organization,
}

impl OwnerType {
    pub fn from_typename(typename: &str) -> Option<Self> {
        match typename {
            "User" => Some(OwnerType::User),
            "Organization" => Some(OwnerType::Organization),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    Commit,
    Issue,
    PullRequest,
    PullRequestReview,
}

/// The repository a contribution landed in, as much of it as the source
/// endpoint reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepoRef {
    pub name: String,
    pub owner: String,
    pub owner_type: Option<OwnerType>,
    pub html_url: String,
    pub description: Option<String>,
    pub top_language: Option<String>,
    pub is_private: bool,
}

/// One contribution fact. GraphQL per-repository totals carry no date and a
/// `count` of the repository total; search hits are dated with `count == 1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContributionRecord {
    pub kind: ContributionKind,
    pub date: Option<NaiveDate>,
    pub repo: RepoRef,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contributor {
    pub login: String,
    pub html_url: Option<String>,
    pub repos_url: Option<String>,
    pub user_type: Option<String>,
    pub contributions: u64,
}
