use std::collections::HashMap;

use normalizer::RepoRef;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NamedCount {
    pub name: String,
    pub count: u64,
}

/// Counts keyed by string that remember first-seen order, so that sorting by
/// count keeps ties in the order the keys were first encountered.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    order: Vec<String>,
    counts: HashMap<String, u64>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str, amount: u64) {
        match self.counts.get_mut(key) {
            Some(count) => *count += amount,
            None => {
                self.order.push(key.to_string());
                self.counts.insert(key.to_string(), amount);
            }
        }
    }

    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Descending by count; ties keep first-seen order.
    pub fn sorted(&self) -> Vec<NamedCount> {
        let mut entries: Vec<NamedCount> = self
            .order
            .iter()
            .map(|name| NamedCount {
                name: name.clone(),
                count: self.counts[name],
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries
    }
}

impl<'a> FromIterator<&'a str> for Tally {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for key in iter {
            tally.add(key, 1);
        }
        tally
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OtherRepoContribution {
    pub name: String,
    pub owner: String,
    pub html_url: String,
    pub description: Option<String>,
    pub top_language: Option<String>,
    pub contributions_count: u64,
}

/// Repositories keyed by URL: the same name under different owners stays
/// apart, and repeated URLs accumulate into one entry.
#[derive(Debug, Clone, Default)]
pub struct OtherRepos {
    entries: Vec<OtherRepoContribution>,
    index: HashMap<String, usize>,
}

impl OtherRepos {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, repo: &RepoRef, count: u64) {
        match self.index.get(&repo.html_url) {
            Some(&idx) => {
                let entry = &mut self.entries[idx];
                entry.contributions_count += count;
                if entry.description.is_none() {
                    entry.description = repo.description.clone();
                }
                if entry.top_language.is_none() {
                    entry.top_language = repo.top_language.clone();
                }
            }
            None => {
                self.index.insert(repo.html_url.clone(), self.entries.len());
                self.entries.push(OtherRepoContribution {
                    name: repo.name.clone(),
                    owner: repo.owner.clone(),
                    html_url: repo.html_url.clone(),
                    description: repo.description.clone(),
                    top_language: repo.top_language.clone(),
                    contributions_count: count,
                });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_sorted(mut self) -> Vec<OtherRepoContribution> {
        self.entries
            .sort_by(|a, b| b.contributions_count.cmp(&a.contributions_count));
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(owner: &str, name: &str) -> RepoRef {
        RepoRef {
            name: name.into(),
            owner: owner.into(),
            owner_type: None,
            html_url: format!("https://github.com/{owner}/{name}"),
            description: None,
            top_language: None,
            is_private: false,
        }
    }

    #[test]
    fn tally_sort_is_stable_for_ties() {
        let tally: Tally = ["go", "rust", "go", "python", "rust"].into_iter().collect();
        let sorted = tally.sorted();
        let names: Vec<_> = sorted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["go", "rust", "python"]);
        assert_eq!(tally.total(), 5);
    }

    #[test]
    fn same_url_merges_and_same_name_different_owner_does_not() {
        let mut repos = OtherRepos::new();
        repos.add(&repo("acme", "utils"), 3);
        repos.add(&repo("other", "utils"), 1);
        repos.add(&repo("acme", "utils"), 4);

        let sorted = repos.into_sorted();
        assert_eq!(sorted.len(), 2);
        assert_eq!(sorted[0].owner, "acme");
        assert_eq!(sorted[0].contributions_count, 7);
        assert_eq!(sorted[1].contributions_count, 1);
    }
}
