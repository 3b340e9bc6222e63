use std::collections::BTreeSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::RegexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use common::text::{normalize_whitespace, strip_markup};

/// One taxonomy entry: a human label (`"Machine Learning"`) and its slug
/// value (`"machine-learning"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxonomyEntry {
    pub label: String,
    pub value: String,
}

/// Whole-word matcher over every label and value phrase of a taxonomy.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    set: RegexSet,
    /// Output value per pattern: a label reports its entry value verbatim,
    /// a value phrase reports its slug.
    canonical: Vec<String>,
}

impl KeywordExtractor {
    pub fn new(entries: &[TaxonomyEntry]) -> Result<Self, regex::Error> {
        let mut patterns = Vec::with_capacity(entries.len() * 2);
        let mut canonical = Vec::with_capacity(entries.len() * 2);
        for entry in entries {
            let label = phrase(&entry.label);
            if !label.is_empty() {
                patterns.push(whole_word(&label));
                canonical.push(entry.value.clone());
            }
            let value = phrase(&entry.value);
            if !value.is_empty() {
                patterns.push(whole_word(&value));
                canonical.push(slug(&value));
            }
        }
        let set = RegexSet::new(&patterns)?;
        debug!(phrases = patterns.len(), "keyword matcher compiled");
        Ok(Self { set, canonical })
    }

    /// Canonical values found in any of `sources`, deduplicated and sorted.
    pub fn extract<'a, I>(&self, sources: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found = BTreeSet::new();
        for source in sources {
            let text = strip_markup(source);
            if text.is_empty() {
                continue;
            }
            for idx in self.set.matches(&text).iter() {
                found.insert(self.canonical[idx].clone());
            }
        }
        found.into_iter().collect()
    }
}

/// Decodes the `content` of a `/contents/README.md` response. GitHub wraps
/// the base64 body at 60 columns, so whitespace is dropped first.
pub fn decode_readme(content: &str) -> Option<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

fn phrase(raw: &str) -> String {
    normalize_whitespace(&raw.replace('-', " ")).to_lowercase()
}

fn slug(phrase: &str) -> String {
    phrase.replace([' ', '/'], "-")
}

fn whole_word(phrase: &str) -> String {
    format!(r"(?i)(?:^|\W){}(?:\W|$)", regex::escape(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, value: &str) -> TaxonomyEntry {
        TaxonomyEntry {
            label: label.into(),
            value: value.into(),
        }
    }

    fn extractor() -> KeywordExtractor {
        KeywordExtractor::new(&[
            entry("Machine Learning", "machine-learning"),
            entry("Python", "python"),
            entry("Go", "go"),
            entry("CI/CD", "ci-cd"),
            entry("Java", "java"),
        ])
        .unwrap()
    }

    #[test]
    fn label_and_value_matches_collapse_to_one_value() {
        let found = extractor().extract(["I love machine-learning and Python"]);
        assert_eq!(found, vec!["machine-learning", "python"]);
    }

    #[test]
    fn matches_whole_words_only() {
        let found = extractor().extract(["javascript and golang developer"]);
        assert!(found.is_empty());
    }

    #[test]
    fn value_phrases_map_back_to_slugs() {
        let extractor = KeywordExtractor::new(&[entry("Continuous Delivery", "ci/cd")]).unwrap();
        assert_eq!(extractor.extract(["we run ci/cd daily"]), vec!["ci-cd"]);
    }

    #[test]
    fn readme_markup_is_ignored() {
        let readme = "# Java tools\nSee [Python](https://python.org) and <code>Go</code>";
        assert_eq!(extractor().extract([readme]), vec!["go", "java"]);
    }

    #[test]
    fn decodes_wrapped_base64() {
        let encoded = "SSB3cml0ZSBS\ndXN0IGFuZCBH\nbw==\n";
        assert_eq!(decode_readme(encoded).as_deref(), Some("I write Rust and Go"));
        assert_eq!(decode_readme("not base64!"), None);
    }
}
