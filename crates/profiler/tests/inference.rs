use std::sync::{Arc, Mutex};

use analysis::{DateWindow, FixedClock, NamedCount, TaxonomyEntry};
use async_trait::async_trait;
use chrono::{Datelike, TimeZone, Utc};
use gh_client::{AuthContext, GithubApiError, Paged};
use normalizer::graphql::{ContributionCalendar, RepositoryCollection};
use normalizer::{
    CommitSearchItem, ContributorPayload, EventPayload, IssueSearchItem, RepoPayload, UserPayload,
};
use profiler::{
    GithubClient, InferenceError, InferenceOptions, IssueKind, ProfileInference, StaticTaxonomy,
};
use serde_json::{json, Value};

const README: &str = "IyBIaSB0aGVyZQpJIGxvdmUgbWFjaGluZS1sZWFy\nbmluZyBhbmQgUHl0aG9u";

struct StubGithub {
    auth: AuthContext,
    token_owner: String,
    readme: Option<String>,
    created_at: &'static str,
    fail_repos: bool,
    calls: Mutex<Vec<String>>,
}

impl StubGithub {
    fn anonymous() -> Self {
        Self {
            auth: AuthContext::Anonymous,
            token_owner: "octo".into(),
            readme: Some(README.into()),
            created_at: "2024-05-06T12:00:00Z",
            fail_repos: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn authenticated() -> Self {
        Self {
            auth: AuthContext::from_token(Some("ghp_test".into())),
            ..Self::anonymous()
        }
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn paged<T: serde::de::DeserializeOwned>(items: Vec<Value>) -> Paged<T> {
    Paged {
        items: items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap())
            .collect(),
        incomplete: false,
        total_count: None,
    }
}

fn repo(name: &str, owner: &str, stars: u64, forks: u64, fork: bool, language: Option<&str>) -> Value {
    json!({
        "name": name,
        "html_url": format!("https://github.com/{owner}/{name}"),
        "description": null,
        "language": language,
        "stargazers_count": stars,
        "forks_count": forks,
        "fork": fork,
        "private": false,
        "owner": {"login": owner, "type": "User"},
        "contributors_url": format!("https://api.github.com/repos/{owner}/{name}/contributors"),
        "languages_url": format!("https://api.github.com/repos/{owner}/{name}/languages"),
        "events_url": format!("https://api.github.com/repos/{owner}/{name}/events"),
    })
}

fn repo_contribution(owner: &str, typename: &str, name: &str, count: u64, private: bool) -> Value {
    json!({
        "repository": {
            "name": name,
            "url": format!("https://github.com/{owner}/{name}"),
            "description": null,
            "languages": {"nodes": [{"name": "Go"}]},
            "owner": {"__typename": typename, "login": owner},
            "isPrivate": private
        },
        "contributions": {"totalCount": count}
    })
}

#[async_trait]
impl GithubClient for StubGithub {
    fn auth(&self) -> &AuthContext {
        &self.auth
    }

    async fn get_user(&self, login: &str) -> Result<UserPayload, GithubApiError> {
        self.record("user");
        Ok(serde_json::from_value(json!({
            "login": login,
            "name": "Octo Cat",
            "bio": "Rust developer",
            "followers": 12,
            "following": 3,
            "created_at": self.created_at
        }))
        .unwrap())
    }

    async fn get_authenticated_user(&self) -> Result<UserPayload, GithubApiError> {
        self.record("token_owner");
        Ok(serde_json::from_value(json!({
            "login": self.token_owner,
            "created_at": "2020-01-01T00:00:00Z"
        }))
        .unwrap())
    }

    async fn list_repos(
        &self,
        _login: &str,
        include_private: bool,
    ) -> Result<Paged<RepoPayload>, GithubApiError> {
        self.record(if include_private { "user_repos" } else { "repos" });
        if self.fail_repos {
            return Err(GithubApiError::RateLimited {
                authenticated: self.auth.is_authenticated(),
            });
        }
        Ok(paged(vec![
            repo("dotfiles", "octo", 0, 0, false, None),
            repo("site", "octo", 5, 1, false, Some("Rust")),
            repo("fork-of-x", "octo", 100, 0, true, Some("C")),
            repo("api-tools", "octo", 2, 0, false, Some("Go")),
            repo("other", "acme", 50, 0, false, Some("Java")),
        ]))
    }

    async fn get_readme(&self, _owner: &str, _repo: &str) -> Result<Option<String>, GithubApiError> {
        self.record("readme");
        Ok(self.readme.clone())
    }

    async fn get_repo(&self, _owner: &str, _name: &str) -> Result<RepoPayload, GithubApiError> {
        unreachable!("profile inference never fetches a single repository")
    }

    async fn list_languages(&self, languages_url: &str) -> Result<Vec<(String, u64)>, GithubApiError> {
        self.record("languages");
        let languages = if languages_url.contains("/site/") {
            vec![("Rust".to_string(), 900), ("Shell".to_string(), 100)]
        } else if languages_url.contains("/api-tools/") {
            vec![("Go".to_string(), 10), ("Rust".to_string(), 5)]
        } else {
            Vec::new()
        };
        Ok(languages)
    }

    async fn list_contributors(
        &self,
        contributors_url: &str,
    ) -> Result<Paged<ContributorPayload>, GithubApiError> {
        self.record("contributors");
        if !contributors_url.contains("/site/") {
            return Ok(Paged::default());
        }
        Ok(paged(vec![
            json!({"login": "octo", "contributions": 40}),
            json!({"login": "alice", "contributions": 3}),
            json!({"login": null, "contributions": 9}),
            json!({"login": "bob", "contributions": 5}),
        ]))
    }

    async fn list_events(&self, _events_url: &str) -> Result<Paged<EventPayload>, GithubApiError> {
        Ok(Paged::default())
    }

    async fn search_commits(&self, _login: &str) -> Result<Paged<CommitSearchItem>, GithubApiError> {
        self.record("search_commits");
        let commit = |owner: &str, name: &str, date: &str| {
            json!({
                "commit": {"author": {"date": date}, "committer": {"date": date}},
                "repository": {
                    "name": name,
                    "html_url": format!("https://github.com/{owner}/{name}"),
                    "description": null,
                    "private": false,
                    "owner": {"login": owner, "type": "User"}
                }
            })
        };
        let mut out = paged(vec![
            commit("octo", "site", "2024-05-13T10:00:00Z"),
            commit("acme", "api", "2024-05-14T10:00:00Z"),
        ]);
        out.total_count = Some(2);
        Ok(out)
    }

    async fn search_issues(
        &self,
        _login: &str,
        kind: IssueKind,
        include_private: bool,
    ) -> Result<Paged<IssueSearchItem>, GithubApiError> {
        self.record(if include_private { "search_issues_all" } else { "search_issues" });
        let mut out = match kind {
            IssueKind::Issue => paged(vec![json!({
                "html_url": "https://github.com/octo/site/issues/1",
                "repository_url": "https://api.github.com/repos/octo/site",
                "created_at": "2024-05-08T09:00:00Z"
            })]),
            IssueKind::PullRequest => paged(vec![json!({
                "html_url": "https://github.com/acme/api/pull/7",
                "repository_url": "https://api.github.com/repos/acme/api",
                "created_at": "2024-05-09T09:00:00Z",
                "pull_request": {}
            })]),
        };
        if kind == IssueKind::PullRequest {
            out.incomplete = true;
            out.total_count = Some(30);
        } else {
            out.total_count = Some(1);
        }
        Ok(out)
    }

    async fn contribution_calendar(
        &self,
        _login: &str,
        window: &DateWindow,
    ) -> Result<Option<ContributionCalendar>, GithubApiError> {
        self.record("calendar");
        // Calendars come back in whole weeks, so neighbouring windows overlap.
        let calendar = if window.from.year() == 2023 {
            json!({
                "totalContributions": 73,
                "weeks": [
                    {"contributionDays": [{"date": "2023-11-14", "contributionCount": 50}]},
                    {"contributionDays": [
                        {"date": "2023-12-30", "contributionCount": 2},
                        {"date": "2023-12-31", "contributionCount": 1},
                        {"date": "2024-01-01", "contributionCount": 70}
                    ]}
                ]
            })
        } else {
            json!({
                "totalContributions": 178,
                "weeks": [{"contributionDays": [
                    {"date": "2023-12-31", "contributionCount": 1},
                    {"date": "2024-01-01", "contributionCount": 70},
                    {"date": "2024-01-02", "contributionCount": 100},
                    {"date": "2024-05-07", "contributionCount": 3},
                    {"date": "2024-05-10", "contributionCount": 4}
                ]}]
            })
        };
        Ok(Some(serde_json::from_value(calendar).unwrap()))
    }

    async fn contributions_by_repository(
        &self,
        _login: &str,
        window: &DateWindow,
    ) -> Result<Option<RepositoryCollection>, GithubApiError> {
        self.record("repositories");
        if window.from.year() == 2023 {
            return Ok(Some(
                serde_json::from_value(json!({
                    "commitContributionsByRepository": [
                        repo_contribution("acme", "Organization", "api", 10, false)
                    ],
                    "issueContributionsByRepository": [
                        repo_contribution("acme", "Organization", "api", 1, false),
                        repo_contribution("octo", "User", "site", 2, false)
                    ]
                }))
                .unwrap(),
            ));
        }
        Ok(Some(
            serde_json::from_value(json!({
                "commitContributionsByRepository": [
                    repo_contribution("acme", "Organization", "api", 4, false),
                    repo_contribution("octo", "User", "site", 9, false),
                    repo_contribution("secret-org", "Organization", "vault", 5, true)
                ],
                "pullRequestContributionsByRepository": [
                    repo_contribution("acme", "Organization", "api", 2, false)
                ]
            }))
            .unwrap(),
        ))
    }
}

fn taxonomy() -> Arc<StaticTaxonomy> {
    let entry = |label: &str, value: &str| TaxonomyEntry {
        label: label.into(),
        value: value.into(),
    };
    Arc::new(StaticTaxonomy(vec![
        entry("Machine Learning", "machine-learning"),
        entry("Python", "python"),
        entry("Rust", "rust"),
        entry("Java", "java"),
    ]))
}

fn inference(client: Arc<StubGithub>) -> ProfileInference {
    let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
    ProfileInference::new(client, taxonomy()).with_clock(Arc::new(FixedClock(now)))
}

#[tokio::test]
async fn anonymous_report_uses_public_data_only() {
    let client = Arc::new(StubGithub::anonymous());
    let options = InferenceOptions {
        include_activity: false,
        ..InferenceOptions::default()
    };
    let report = inference(client.clone())
        .perform_inference("octo", &options)
        .await
        .unwrap();

    assert_eq!(report.profile.login, "octo");
    assert_eq!(report.profile.bio.as_deref(), Some("Rust developer"));

    assert_eq!(report.stats.inference_from_repo_count, 5);
    assert_eq!(report.stats.original_repo_count, 3);
    assert_eq!(report.stats.forked_repo_count, 1);
    assert_eq!(report.stats.counts.stargazers_count, 7);
    assert_eq!(report.stats.counts.forks_count, 1);
    let top: Vec<_> = report
        .stats
        .top_repo_stars_forks
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(top, vec!["site", "api-tools", "dotfiles"]);

    assert_eq!(report.skill.inference_from_originalrepo_count, 3);
    assert_eq!(
        report.skill.key_qualifications,
        vec!["machine-learning", "python", "rust"]
    );
    assert_eq!(report.skill.top_n_languages, vec!["rust", "go"]);
    assert!(report.skill.languages_share_by_repo_count.is_none());

    assert!(report.contribution.is_none());
    assert!(report.activity.is_none());
    let calls = client.calls();
    assert!(!calls.iter().any(|c| c == "languages" || c == "calendar"));
}

#[tokio::test]
async fn authenticated_report_includes_contributions_and_activity() {
    let client = Arc::new(StubGithub::authenticated());
    let report = inference(client.clone())
        .perform_inference("octo", &InferenceOptions::default())
        .await
        .unwrap();

    let shares = report.skill.languages_share_by_repo_count.as_ref().unwrap();
    let shares: Vec<_> = shares.iter().map(|s| (s.language.as_str(), s.share)).collect();
    assert_eq!(shares, vec![("rust", 0.667), ("shell", 0.333), ("go", 0.333)]);
    assert_eq!(report.skill.top_n_languages, vec!["rust", "shell", "go"]);

    let contribution = report.contribution.as_ref().unwrap();
    assert_eq!(contribution.contribution_count, 7);
    assert_eq!(contribution.weekly_average_contribution, 3.5);
    assert_eq!(contribution.contribution_count_per_other_repo.len(), 1);
    assert_eq!(
        contribution.contribution_count_per_other_repo[0].html_url,
        "https://github.com/acme/api"
    );
    assert_eq!(contribution.contribution_count_per_other_repo[0].contributions_count, 6);
    assert_eq!(
        contribution.contribution_count_per_owned_repo,
        vec![NamedCount { name: "site".into(), count: 9 }]
    );
    assert_eq!(
        contribution.contribution_count_per_repo_org_owner,
        vec![NamedCount { name: "acme".into(), count: 6 }]
    );
    assert_eq!(
        contribution.external_contribution_to_top_repos,
        vec![
            NamedCount { name: "bob".into(), count: 5 },
            NamedCount { name: "alice".into(), count: 3 },
        ]
    );
    assert!(!contribution.incomplete_external_results);

    let activity = report.activity.as_ref().unwrap();
    assert_eq!(activity.commits.total_count, 2);
    assert_eq!(activity.commits.fetched_count, 2);
    assert_eq!(
        activity.commits.per_owned_repo,
        vec![NamedCount { name: "site".into(), count: 1 }]
    );
    assert_eq!(activity.issues.total_count, 1);
    assert!(activity.pull_requests.incomplete);
    assert_eq!(activity.pull_requests.total_count, 30);
    assert_eq!(activity.pull_requests.per_other_repo[0].owner, "acme");

    let calls = client.calls();
    assert_eq!(calls.iter().filter(|c| *c == "search_issues").count(), 2);
    assert!(!calls.iter().any(|c| c == "search_issues_all"));
}

#[tokio::test]
async fn private_inclusion_without_token_fails_before_any_request() {
    let client = Arc::new(StubGithub::anonymous());
    let options = InferenceOptions {
        include_private: true,
        ..InferenceOptions::default()
    };
    let err = inference(client.clone())
        .perform_inference("octo", &options)
        .await
        .unwrap_err();

    assert!(matches!(err, InferenceError::Api(GithubApiError::AuthRequired)));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn private_inclusion_requires_the_token_owner() {
    let client = Arc::new(StubGithub {
        token_owner: "someone-else".into(),
        ..StubGithub::authenticated()
    });
    let options = InferenceOptions {
        include_private: true,
        ..InferenceOptions::default()
    };
    let err = inference(client.clone())
        .perform_inference("octo", &options)
        .await
        .unwrap_err();

    match err {
        InferenceError::IdentityMismatch {
            requested,
            token_owner,
        } => {
            assert_eq!(requested, "octo");
            assert_eq!(token_owner, "someone-else");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!client.calls().iter().any(|c| c == "user_repos"));
}

#[tokio::test]
async fn private_inclusion_for_the_token_owner_lists_user_repos() {
    let client = Arc::new(StubGithub::authenticated());
    let options = InferenceOptions {
        include_private: true,
        include_activity: false,
        ..InferenceOptions::default()
    };
    let report = inference(client.clone())
        .perform_inference("octo", &options)
        .await
        .unwrap();

    let calls = client.calls();
    assert_eq!(&calls[..3], &["user", "token_owner", "user_repos"]);
    let contribution = report.contribution.unwrap();
    assert_eq!(contribution.contribution_count_per_other_repo.len(), 2);
}

#[tokio::test]
async fn missing_readme_is_not_an_error() {
    let client = Arc::new(StubGithub {
        readme: None,
        ..StubGithub::anonymous()
    });
    let options = InferenceOptions {
        include_activity: false,
        ..InferenceOptions::default()
    };
    let report = inference(client)
        .perform_inference("octo", &options)
        .await
        .unwrap();
    assert_eq!(report.skill.key_qualifications, vec!["rust"]);
}

#[tokio::test]
async fn rate_limit_errors_abort_the_run() {
    let client = Arc::new(StubGithub {
        fail_repos: true,
        ..StubGithub::anonymous()
    });
    let err = inference(client)
        .perform_inference("octo", &InferenceOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InferenceError::Api(GithubApiError::RateLimited { authenticated: false })
    ));
    assert!(err.to_string().contains("provide an access token"));
}

#[tokio::test]
async fn repeated_runs_produce_identical_reports() {
    let client = Arc::new(StubGithub::authenticated());
    let inference = inference(client);
    let options = InferenceOptions::default();

    let first = inference.perform_inference("octo", &options).await.unwrap();
    let second = inference.perform_inference("octo", &options).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[tokio::test]
async fn contributions_are_summed_across_year_windows() {
    let client = Arc::new(StubGithub {
        created_at: "2023-11-15T00:00:00Z",
        ..StubGithub::authenticated()
    });
    let options = InferenceOptions {
        include_activity: false,
        ..InferenceOptions::default()
    };
    let report = inference(client.clone())
        .perform_inference("octo", &options)
        .await
        .unwrap();

    let calls = client.calls();
    assert_eq!(calls.iter().filter(|c| *c == "calendar").count(), 2);
    assert_eq!(calls.iter().filter(|c| *c == "repositories").count(), 2);

    let contribution = report.contribution.unwrap();
    // 2 + 1 from 2023, 70 + 100 + 3 + 4 from 2024; overlapping days once.
    assert_eq!(contribution.contribution_count, 180);
    // 187 days round to 27 weeks.
    assert_eq!(contribution.weekly_average_contribution, 6.667);

    assert_eq!(contribution.contribution_count_per_other_repo.len(), 1);
    assert_eq!(contribution.contribution_count_per_other_repo[0].contributions_count, 17);
    assert_eq!(
        contribution.contribution_count_per_owned_repo,
        vec![NamedCount { name: "site".into(), count: 11 }]
    );
    assert_eq!(
        contribution.contribution_count_per_repo_org_owner,
        vec![NamedCount { name: "acme".into(), count: 17 }]
    );
}
