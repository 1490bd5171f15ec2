use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use releaselens::models::release::RepositoryMetrics;
use releaselens::{Config, GitHubClient, ReleaseAnalyzer, ReportWriter};

#[derive(Parser, Debug)]
#[command(name = "releaselens")]
#[command(version = "0.1.0")]
#[command(about = "Analyze GitHub release history: ratings, feature stories and project health")]
struct Args {
    /// Repository as https://github.com/owner/repo or owner/repo
    repo: String,

    /// Output directory for reports (overrides OUTPUT_DIR)
    #[arg(short, long)]
    output_dir: Option<String>,

    /// JSON file with repository metrics (test coverage, commit frequency, ...)
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Also run the comprehensive analysis and save it as JSON
    #[arg(long)]
    comprehensive: bool,
}

struct RepoInfo {
    owner: String,
    repo: String,
    full_name: String,
}

/// Accepts a full GitHub URL or a bare owner/repo pair, with an optional
/// trailing .git.
fn parse_repo(input: &str) -> releaselens::Result<RepoInfo> {
    let stripped = input
        .strip_prefix("https://github.com/")
        .or_else(|| input.strip_prefix("http://github.com/"));
    let is_url = stripped.is_some();
    let path = stripped.unwrap_or(input);

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let valid = match segments.as_slice() {
        [_, _] => true,
        // URLs may carry trailing path segments like /releases.
        [_, _, ..] => is_url,
        _ => false,
    };
    let owner = segments.first().copied().unwrap_or_default();
    let repo = segments
        .get(1)
        .copied()
        .unwrap_or_default()
        .trim_end_matches(".git");

    if !valid || owner.is_empty() || repo.is_empty() {
        return Err(releaselens::Error::InvalidInput(format!(
            "invalid repository {:?}, expected https://github.com/owner/repo or owner/repo",
            input
        )));
    }

    Ok(RepoInfo {
        owner: owner.to_string(),
        repo: repo.to_string(),
        full_name: format!("{}/{}", owner, repo),
    })
}

fn load_metrics(path: Option<&PathBuf>) -> releaselens::Result<RepositoryMetrics> {
    match path {
        Some(path) => {
            let contents = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        }
        None => Ok(RepositoryMetrics::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("releaselens=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;

    let repo_info = parse_repo(&args.repo)?;
    tracing::info!("Analyzing repository: {}", repo_info.full_name);

    let metrics = load_metrics(args.metrics.as_ref())?;

    let github = Arc::new(GitHubClient::new(&config.github_token)?);
    let releases = github
        .fetch_release_notes(&repo_info.owner, &repo_info.repo, config.concurrency_limit)
        .await?;

    if releases.is_empty() {
        tracing::warn!("No releases found for {}", repo_info.full_name);
    }

    let output_dir = args.output_dir.unwrap_or(config.output_dir);
    let writer = ReportWriter::new(output_dir);
    writer.write_release_notes(&repo_info.owner, &repo_info.repo, &releases)?;

    let analyzer = ReleaseAnalyzer::new(releases, repo_info.full_name.clone(), metrics)?;

    writer.write_feature_story(
        &repo_info.owner,
        &repo_info.repo,
        &analyzer.feature_story_markdown(),
    )?;
    writer.write_ratings(&repo_info.owner, &repo_info.repo, &analyzer.rating_markdown())?;

    if args.comprehensive {
        let analysis = analyzer.analyze_comprehensively();
        writer.write_analysis(&repo_info.owner, &repo_info.repo, &analysis)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_url() {
        let info = parse_repo("https://github.com/facebook/react").unwrap();
        assert_eq!(info.owner, "facebook");
        assert_eq!(info.repo, "react");
        assert_eq!(info.full_name, "facebook/react");
    }

    #[test]
    fn test_parse_repo_shorthand_strips_git_suffix() {
        let info = parse_repo("rust-lang/cargo.git").unwrap();
        assert_eq!(info.owner, "rust-lang");
        assert_eq!(info.repo, "cargo");
    }

    #[test]
    fn test_parse_repo_url_ignores_trailing_path() {
        let info = parse_repo("https://github.com/facebook/react/releases").unwrap();
        assert_eq!(info.full_name, "facebook/react");
    }

    #[test]
    fn test_parse_repo_rejects_bare_name() {
        assert!(parse_repo("just-a-name").is_err());
        assert!(parse_repo("").is_err());
    }
}
