pub mod graphql;
pub mod models;
pub mod payloads;
pub mod transform;

pub use models::{
    ContributionKind, ContributionRecord, Contributor, OwnerType, Profile, RepoRef, Repository,
};
pub use payloads::{
    CommitSearchItem, ContributorPayload, EventPayload, IssueSearchItem, ReadmePayload,
    RepoPayload, UserPayload,
};
pub use transform::{
    contribution_from_commit, contribution_from_graphql, contribution_from_issue,
    normalize_contributor, normalize_language, normalize_profile, normalize_repo,
};
