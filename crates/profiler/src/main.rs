use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use common::config::AppConfig;
use common::{logging, AppError};
use gh_client::{AuthContext, GithubHttp, HttpExec, ReqwestExecutor};
use profiler::{
    DevtoClient, HttpTaxonomySource, InferenceOptions, ProfileInference, RepoInspector,
    RestGithubClient,
};
use serde_json::Value;
use tracing::info;
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "devprofile", version, about = "Infer a developer profile from public GitHub and Dev.to data")]
struct Cli {
    /// GitHub access token; unlocks private repositories and contribution history.
    #[arg(long, global = true, env = "GITHUB__TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Default tracing filter when RUST_LOG is unset.
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Print Prometheus metrics to stderr once the command finishes.
    #[arg(long, global = true)]
    metrics: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Profile, skills, repository stats, activity and contributions of a user.
    GithubProfile {
        username: String,
        #[arg(long)]
        top_repos: Option<usize>,
        #[arg(long)]
        top_languages: Option<usize>,
        #[arg(long)]
        include_private: bool,
        #[arg(long)]
        no_activity: bool,
    },
    /// Metadata, languages, events and contributors of one repository.
    GithubRepo { owner: String, name: String },
    /// Raw Dev.to user record.
    Devto { username: String },
}

#[tokio::main]
async fn main() -> common::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    logging::init_logging(cli.log_level.as_deref().unwrap_or(config.log_level.as_str()));

    let result = run(&cli, &config).await;
    if cli.metrics {
        eprintln!("{}", gh_client::metrics::render());
    }
    let output = result?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output).map_err(AppError::output)?;
    writeln!(stdout).map_err(AppError::output)?;
    Ok(())
}

async fn run(cli: &Cli, config: &AppConfig) -> common::Result<Value> {
    let user_agent = config.github.user_agent.clone();
    let exec: Arc<dyn HttpExec> = Arc::new(ReqwestExecutor::new(&user_agent)?);

    match &cli.command {
        Command::GithubProfile {
            username,
            top_repos,
            top_languages,
            include_private,
            no_activity,
        } => {
            let mut options = InferenceOptions::from(&config.inference);
            if let Some(n) = top_repos {
                options.top_repo_n = *n;
            }
            if let Some(n) = top_languages {
                options.top_language_n = *n;
            }
            options.include_private |= *include_private;
            options.include_activity &= !*no_activity;

            let client = github_client(cli, config, exec.clone())?;
            let taxonomy_url = Url::parse(&config.github.taxonomy_url).map_err(AppError::inference)?;
            let taxonomy = Arc::new(HttpTaxonomySource::new(exec, taxonomy_url, user_agent));
            info!(username = %username, ?options, "profiling GitHub user");
            let report = ProfileInference::new(client, taxonomy)
                .perform_inference(username, &options)
                .await
                .map_err(AppError::inference)?;
            serde_json::to_value(report).map_err(AppError::output)
        }
        Command::GithubRepo { owner, name } => {
            let client = github_client(cli, config, exec)?;
            info!(owner = %owner, name = %name, "inspecting GitHub repository");
            let report = RepoInspector::new(client)
                .inspect(owner, name)
                .await
                .map_err(AppError::inference)?;
            serde_json::to_value(report).map_err(AppError::output)
        }
        Command::Devto { username } => {
            let client =
                DevtoClient::new(exec, &config.devto.api_url, user_agent).map_err(AppError::inference)?;
            client.fetch_user(username).await.map_err(AppError::inference)
        }
    }
}

fn github_client(
    cli: &Cli,
    config: &AppConfig,
    exec: Arc<dyn HttpExec>,
) -> common::Result<Arc<RestGithubClient>> {
    let token = cli
        .token
        .clone()
        .filter(|token| !token.trim().is_empty())
        .or_else(|| config.github.resolved_token());
    let http = GithubHttp::new(exec, AuthContext::from_token(token), config.github.user_agent.clone())
        .with_endpoints(&config.github.api_url, &config.github.graphql_url)
        .map_err(AppError::inference)?;
    Ok(Arc::new(RestGithubClient::new(Arc::new(http))))
}
