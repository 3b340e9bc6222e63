use normalizer::{normalize_language, Repository};
use serde::Serialize;

use crate::round3;
use crate::tally::Tally;

/// Sorts by `stars + forks` descending. The sort is stable, so repositories
/// with equal popularity keep the order the API listed them in.
pub fn rank_by_popularity(repos: &mut [Repository]) {
    repos.sort_by(|a, b| b.popularity().cmp(&a.popularity()));
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub original: Vec<Repository>,
    pub forked: Vec<Repository>,
}

/// Splits the repositories owned by `login` into originals and forks.
/// Repositories owned by anyone else land in neither list.
pub fn partition(repos: &[Repository], login: &str) -> Partition {
    let mut out = Partition::default();
    for repo in repos.iter().filter(|repo| repo.owner_login == login) {
        if repo.is_fork {
            out.forked.push(repo.clone());
        } else {
            out.original.push(repo.clone());
        }
    }
    out
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct StarForkCounts {
    pub stargazers_count: u64,
    pub forks_count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PopularRepo {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub top_language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
}

impl From<&Repository> for PopularRepo {
    fn from(repo: &Repository) -> Self {
        Self {
            name: repo.name.clone(),
            html_url: repo.html_url.clone(),
            description: repo.description.clone(),
            top_language: repo.top_language.clone(),
            stargazers_count: repo.stargazers_count,
            forks_count: repo.forks_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RepoStats {
    pub incomplete_repo_results: bool,
    pub inference_from_repo_count: usize,
    pub original_repo_count: usize,
    pub forked_repo_count: usize,
    pub counts: StarForkCounts,
    pub top_repo_stars_forks: Vec<PopularRepo>,
}

/// Stats over an already ranked partition.
pub fn repo_stats(
    fetched: usize,
    incomplete: bool,
    partition: &Partition,
    top_n: usize,
) -> RepoStats {
    let counts = partition
        .original
        .iter()
        .fold(StarForkCounts::default(), |mut acc, repo| {
            acc.stargazers_count += repo.stargazers_count;
            acc.forks_count += repo.forks_count;
            acc
        });
    RepoStats {
        incomplete_repo_results: incomplete,
        inference_from_repo_count: fetched,
        original_repo_count: partition.original.len(),
        forked_repo_count: partition.forked.len(),
        counts,
        top_repo_stars_forks: partition.original.iter().take(top_n).map(PopularRepo::from).collect(),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LanguageShare {
    pub language: String,
    pub share: f64,
}

/// Language slugs tallied once per repository, in first-seen order.
pub fn language_tally<'a, I>(languages: I) -> Tally
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tally = Tally::new();
    for language in languages {
        tally.add(&normalize_language(language), 1);
    }
    tally
}

pub fn top_languages(tally: &Tally, n: usize) -> Vec<String> {
    tally.sorted().into_iter().take(n).map(|entry| entry.name).collect()
}

/// Fraction of `repo_count` repositories that use each language.
pub fn shares_by_repo_count(tally: &Tally, repo_count: usize) -> Vec<LanguageShare> {
    if repo_count == 0 {
        return Vec::new();
    }
    tally
        .sorted()
        .into_iter()
        .map(|entry| LanguageShare {
            language: entry.name,
            share: round3(entry.count as f64 / repo_count as f64),
        })
        .collect()
}

/// Fraction of all bytes per language; empty when no bytes were reported.
pub fn shares_by_bytes(bytes: &[(String, u64)]) -> Vec<LanguageShare> {
    let total: u64 = bytes.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return Vec::new();
    }
    let mut tally = Tally::new();
    for (language, n) in bytes {
        tally.add(&normalize_language(language), *n);
    }
    tally
        .sorted()
        .into_iter()
        .map(|entry| LanguageShare {
            language: entry.name,
            share: round3(entry.count as f64 / total as f64),
        })
        .collect()
}
