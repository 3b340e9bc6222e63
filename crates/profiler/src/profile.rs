use std::sync::Arc;
use std::time::Instant;

use analysis::{
    decode_readme, language_tally, partition, rank_by_popularity, repo_stats, shares_by_repo_count,
    top_languages, ActivitySummary, Clock, ContributionSummary, KeywordExtractor, LanguageShare,
    RepoStats, SystemClock,
};
use common::config::InferenceConfig;
use gh_client::GithubApiError;
use normalizer::{normalize_profile, normalize_repo, Profile, Repository};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::activity::infer_activity;
use crate::client::GithubClient;
use crate::contribution::{infer_contributions, ContributionRequest};
use crate::error::InferenceError;
use crate::metrics;
use crate::taxonomy::TaxonomySource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceOptions {
    pub top_repo_n: usize,
    pub top_language_n: usize,
    pub include_private: bool,
    pub include_activity: bool,
    pub contributor_repo_limit: usize,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self::from(&InferenceConfig::default())
    }
}

impl From<&InferenceConfig> for InferenceOptions {
    fn from(config: &InferenceConfig) -> Self {
        Self {
            top_repo_n: config.top_repo_n,
            top_language_n: config.top_language_n,
            include_private: config.include_private,
            include_activity: config.include_activity,
            contributor_repo_limit: config.contributor_repo_limit,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkillSummary {
    pub inference_from_originalrepo_count: usize,
    pub key_qualifications: Vec<String>,
    pub top_n_languages: Vec<String>,
    /// Only computed for authenticated runs, which can list every language
    /// of a repository.
    pub languages_share_by_repo_count: Option<Vec<LanguageShare>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProfileReport {
    pub profile: Profile,
    pub skill: SkillSummary,
    pub stats: RepoStats,
    pub activity: Option<ActivitySummary>,
    pub contribution: Option<ContributionSummary>,
}

/// Builds a [`ProfileReport`] for one GitHub account. Every step is awaited
/// in order; the first classified error aborts the run.
pub struct ProfileInference {
    client: Arc<dyn GithubClient>,
    taxonomy: Arc<dyn TaxonomySource>,
    clock: Arc<dyn Clock>,
}

impl ProfileInference {
    pub fn new(client: Arc<dyn GithubClient>, taxonomy: Arc<dyn TaxonomySource>) -> Self {
        Self {
            client,
            taxonomy,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn perform_inference(
        &self,
        username: &str,
        options: &InferenceOptions,
    ) -> Result<ProfileReport, InferenceError> {
        let started = Instant::now();
        let result = self.infer(username, options).await;
        metrics::RUNS_TOTAL
            .with_label_values(&["profile", metrics::outcome(&result)])
            .inc();
        metrics::RUN_DURATION
            .with_label_values(&["profile"])
            .observe(started.elapsed().as_secs_f64());
        result
    }

    #[instrument(skip(self, options), fields(authenticated = self.client.auth().is_authenticated()))]
    async fn infer(
        &self,
        username: &str,
        options: &InferenceOptions,
    ) -> Result<ProfileReport, InferenceError> {
        let authenticated = self.client.auth().is_authenticated();
        if options.include_private && !authenticated {
            return Err(GithubApiError::AuthRequired.into());
        }
        let now = self.clock.now();

        let user = self.client.get_user(username).await?;
        let login = user.login.clone();
        let created_at = user.created_at;
        let profile = normalize_profile(&user);
        if options.include_private {
            self.check_token_owner(username).await?;
        }

        let listing = self.client.list_repos(&login, options.include_private).await?;
        if listing.incomplete {
            metrics::INCOMPLETE_RESULTS_TOTAL
                .with_label_values(&["repositories"])
                .inc();
        }
        let mut repos: Vec<Repository> = listing.items.iter().map(normalize_repo).collect();
        rank_by_popularity(&mut repos);
        let parts = partition(&repos, &login);
        let stats = repo_stats(repos.len(), listing.incomplete, &parts, options.top_repo_n);
        debug!(
            fetched = repos.len(),
            original = parts.original.len(),
            forked = parts.forked.len(),
            "repositories partitioned"
        );

        let skill = self
            .infer_skill(&login, profile.bio.as_deref(), &parts.original, options)
            .await?;

        let contribution = if authenticated {
            let request = ContributionRequest {
                login: &login,
                created_at,
                now,
                originals: &parts.original,
                include_private: options.include_private,
                contributor_repo_limit: options.contributor_repo_limit,
            };
            Some(infer_contributions(self.client.as_ref(), request).await?)
        } else {
            debug!("anonymous run; skipping contribution inference");
            None
        };

        let activity = if options.include_activity {
            Some(infer_activity(self.client.as_ref(), &login, now, options.include_private).await?)
        } else {
            None
        };

        info!(
            login = %login,
            repos = stats.inference_from_repo_count,
            keywords = skill.key_qualifications.len(),
            "profile inference finished"
        );
        Ok(ProfileReport {
            profile,
            skill,
            stats,
            activity,
            contribution,
        })
    }

    /// Private repositories are only listed for the token owner, so the
    /// requested account has to be that owner.
    async fn check_token_owner(&self, requested: &str) -> Result<(), InferenceError> {
        let owner = self.client.get_authenticated_user().await?;
        if !owner.login.eq_ignore_ascii_case(requested) {
            warn!(requested, token_owner = %owner.login, "token owner mismatch");
            return Err(InferenceError::IdentityMismatch {
                requested: requested.to_string(),
                token_owner: owner.login,
            });
        }
        Ok(())
    }

    async fn infer_skill(
        &self,
        login: &str,
        bio: Option<&str>,
        originals: &[Repository],
        options: &InferenceOptions,
    ) -> Result<SkillSummary, InferenceError> {
        let entries = self
            .taxonomy
            .load()
            .await
            .map_err(InferenceError::Taxonomy)?;
        metrics::TAXONOMY_ENTRIES.set(entries.len() as i64);
        let extractor = KeywordExtractor::new(&entries)?;

        let readme = match self.client.get_readme(login, login).await? {
            Some(content) => decode_readme(&content),
            None => {
                metrics::README_MISSING_TOTAL.inc();
                None
            }
        };
        let sources = bio.into_iter().chain(readme.as_deref());
        let key_qualifications = extractor.extract(sources);

        let (tally, shares) = if self.client.auth().is_authenticated() {
            let mut per_repo = Vec::new();
            for repo in originals {
                let languages = self.client.list_languages(&repo.languages_url).await?;
                per_repo.extend(languages.into_iter().map(|(name, _)| name));
            }
            let tally = language_tally(per_repo.iter().map(String::as_str));
            let shares = shares_by_repo_count(&tally, originals.len());
            (tally, Some(shares))
        } else {
            let tally = language_tally(originals.iter().filter_map(|repo| repo.top_language.as_deref()));
            (tally, None)
        };

        Ok(SkillSummary {
            inference_from_originalrepo_count: originals.len(),
            key_qualifications,
            top_n_languages: top_languages(&tally, options.top_language_n),
            languages_share_by_repo_count: shares,
        })
    }
}

