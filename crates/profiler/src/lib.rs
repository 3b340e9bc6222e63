pub mod activity;
pub mod client;
pub mod contribution;
pub mod devto;
pub mod error;
pub mod metrics;
pub mod profile;
pub mod queries;
pub mod repo;
pub mod taxonomy;

pub use client::{GithubClient, IssueKind, RestGithubClient};
pub use devto::DevtoClient;
pub use error::{DevtoError, InferenceError};
pub use profile::{InferenceOptions, ProfileInference, ProfileReport, SkillSummary};
pub use repo::{RepoInspector, RepoReport};
pub use taxonomy::{HttpTaxonomySource, StaticTaxonomy, TaxonomySource};
