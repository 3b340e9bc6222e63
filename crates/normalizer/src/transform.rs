use crate::graphql::RepoContributions;
use crate::models::{
    ContributionKind, ContributionRecord, Contributor, OwnerType, Profile, RepoRef, Repository,
};
use crate::payloads::{CommitSearchItem, ContributorPayload, IssueSearchItem, RepoPayload, UserPayload};

pub fn normalize_profile(payload: &UserPayload) -> Profile {
    Profile {
        login: payload.login.clone(),
        name: payload.name.clone(),
        company: payload.company.clone(),
        blog: payload.blog.clone(),
        location: payload.location.clone(),
        email: payload.email.clone(),
        hireable: payload.hireable,
        twitter_username: payload.twitter_username.clone(),
        avatar_url: payload.avatar_url.clone(),
        bio: payload.bio.clone(),
        followers: payload.followers,
        following: payload.following,
    }
}

pub fn normalize_repo(payload: &RepoPayload) -> Repository {
    Repository {
        name: payload.name.clone(),
        html_url: payload.html_url.clone(),
        description: payload.description.clone(),
        top_language: payload.language.clone(),
        stargazers_count: payload.stargazers_count,
        forks_count: payload.forks_count,
        owner_login: payload.owner.login.clone(),
        is_fork: payload.fork,
        is_private: payload.private,
        contributors_url: payload.contributors_url.clone(),
        languages_url: payload.languages_url.clone(),
        events_url: payload.events_url.clone(),
    }
}

/// Anonymous contributors (no login) are skipped.
pub fn normalize_contributor(payload: &ContributorPayload) -> Option<Contributor> {
    Some(Contributor {
        login: payload.login.clone()?,
        html_url: payload.html_url.clone(),
        repos_url: payload.repos_url.clone(),
        user_type: payload.user_type.clone(),
        contributions: payload.contributions,
    })
}

/// `"Jupyter Notebook"` → `"jupyter-notebook"`.
pub fn normalize_language(name: &str) -> String {
    name.trim().replace(' ', "-").to_lowercase()
}

pub fn contribution_from_graphql(kind: ContributionKind, payload: &RepoContributions) -> ContributionRecord {
    let repository = &payload.repository;
    let top_language = repository
        .languages
        .as_ref()
        .and_then(|langs| langs.nodes.first())
        .map(|node| normalize_language(&node.name));
    ContributionRecord {
        kind,
        date: None,
        repo: RepoRef {
            name: repository.name.clone(),
            owner: repository.owner.login.clone(),
            owner_type: OwnerType::from_typename(&repository.owner.typename),
            html_url: repository.url.clone(),
            description: repository.description.clone(),
            top_language,
            is_private: repository.is_private,
        },
        count: payload.contributions.total_count,
    }
}

/// Dated by the commit author, falling back to the committer.
pub fn contribution_from_commit(item: &CommitSearchItem) -> Option<ContributionRecord> {
    let actor = item.commit.author.as_ref().or(item.commit.committer.as_ref())?;
    let repository = &item.repository;
    Some(ContributionRecord {
        kind: ContributionKind::Commit,
        date: Some(actor.date.date_naive()),
        repo: RepoRef {
            name: repository.name.clone(),
            owner: repository.owner.login.clone(),
            owner_type: repository
                .owner
                .owner_type
                .as_deref()
                .and_then(OwnerType::from_typename),
            html_url: repository.html_url.clone(),
            description: repository.description.clone(),
            top_language: None,
            is_private: repository.private,
        },
        count: 1,
    })
}

/// Search hits only name their repository through `repository_url`
/// (`.../repos/{owner}/{name}`); the html URL is rebuilt from the issue link.
/// Hits carry no visibility, so the record is marked public and the search
/// query decides whether private repositories take part.
pub fn contribution_from_issue(item: &IssueSearchItem) -> Option<ContributionRecord> {
    let mut segments = item.repository_url.trim_end_matches('/').rsplit('/');
    let name = segments.next()?.to_string();
    let owner = segments.next()?.to_string();
    if name.is_empty() || owner.is_empty() {
        return None;
    }
    let host = item
        .html_url
        .find(&format!("/{owner}/{name}"))
        .map(|idx| &item.html_url[..idx])
        .unwrap_or("https://github.com");
    let kind = if item.pull_request.is_some() {
        ContributionKind::PullRequest
    } else {
        ContributionKind::Issue
    };
    Some(ContributionRecord {
        kind,
        date: Some(item.created_at.date_naive()),
        repo: RepoRef {
            html_url: format!("{host}/{owner}/{name}"),
            name,
            owner,
            owner_type: None,
            description: None,
            top_language: None,
            is_private: false,
        },
        count: 1,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::payloads::IssueSearchItem;

    #[test]
    fn language_names_become_slugs() {
        assert_eq!(normalize_language("Jupyter Notebook"), "jupyter-notebook");
        assert_eq!(normalize_language("Rust"), "rust");
    }

    #[test]
    fn issue_search_item_resolves_repository() {
        let item: IssueSearchItem = serde_json::from_value(json!({
            "html_url": "https://github.com/rust-lang/rust/pull/42",
            "repository_url": "https://api.github.com/repos/rust-lang/rust",
            "created_at": "2024-03-05T10:00:00Z",
            "pull_request": {"url": "https://api.github.com/repos/rust-lang/rust/pulls/42"}
        }))
        .unwrap();

        let record = contribution_from_issue(&item).unwrap();
        assert_eq!(record.kind, ContributionKind::PullRequest);
        assert_eq!(record.repo.owner, "rust-lang");
        assert_eq!(record.repo.name, "rust");
        assert_eq!(record.repo.html_url, "https://github.com/rust-lang/rust");
        assert_eq!(record.date.unwrap().to_string(), "2024-03-05");
    }

    #[test]
    fn commit_search_item_uses_author_date() {
        let item: CommitSearchItem = serde_json::from_value(json!({
            "commit": {
                "author": {"date": "2023-12-31T23:30:00-05:00"},
                "committer": {"date": "2024-01-01T09:00:00Z"}
            },
            "repository": {
                "name": "tools",
                "html_url": "https://github.com/acme/tools",
                "description": null,
                "private": false,
                "owner": {"login": "acme", "type": "Organization"}
            }
        }))
        .unwrap();

        let record = contribution_from_commit(&item).unwrap();
        assert_eq!(record.date.unwrap().to_string(), "2023-12-31");
        assert_eq!(record.repo.owner_type, Some(OwnerType::Organization));
    }
}
