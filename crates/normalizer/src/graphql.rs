//! Response shapes of the `contributionsCollection` queries.

use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlEnvelope<T> {
    pub data: UserData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserData<T> {
    pub user: Option<UserContributions<T>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContributions<T> {
    pub contributions_collection: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCollection {
    pub contribution_calendar: ContributionCalendar,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: u64,
    pub weeks: Vec<CalendarWeek>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarWeek {
    pub contribution_days: Vec<CalendarDay>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub contribution_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryCollection {
    #[serde(default)]
    pub commit_contributions_by_repository: Vec<RepoContributions>,
    #[serde(default)]
    pub issue_contributions_by_repository: Vec<RepoContributions>,
    #[serde(default)]
    pub pull_request_contributions_by_repository: Vec<RepoContributions>,
    #[serde(default)]
    pub pull_request_review_contributions_by_repository: Vec<RepoContributions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoContributions {
    pub repository: GraphqlRepository,
    pub contributions: TotalCount,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRepository {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub languages: Option<LanguageConnection>,
    pub owner: GraphqlOwner,
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageConnection {
    #[serde(default)]
    pub nodes: Vec<LanguageNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageNode {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlOwner {
    #[serde(rename = "__typename")]
    pub typename: String,
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: u64,
}
