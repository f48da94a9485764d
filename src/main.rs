use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use youtrack_rest::{Issue, TrackerConfig, YouTrackRest};

/// Query a YouTrack instance from the command line.
#[derive(Debug, Parser)]
#[command(name = "youtrack-rest", version)]
struct Cli {
    /// Base URL of the tracker (falls back to YOUTRACK_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Permanent API token (falls back to YOUTRACK_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check whether an issue exists
    Exists {
        /// Issue id, e.g. PROJ-1
        issue_id: String,
    },
    /// Show an issue
    Show {
        /// Issue id, e.g. PROJ-1
        issue_id: String,
        /// Print only the named custom fields
        #[arg(long = "field")]
        fields: Vec<String>,
        /// Print the full record as JSON
        #[arg(long, conflicts_with = "fields")]
        json: bool,
    },
}

/// Exit status of `exists` when the issue does not exist.
///
/// Errors exit with status 1, so scripts can tell the two apart.
const EXIT_MISSING: u8 = 2;

fn exists_status(exists: bool) -> u8 {
    if exists { 0 } else { EXIT_MISSING }
}

impl Cli {
    /// Resolves the tracker configuration from flags, file or environment.
    fn tracker_config(&self) -> Result<TrackerConfig> {
        self.tracker_config_with(TrackerConfig::from_env)
    }

    fn tracker_config_with(
        &self,
        from_env: impl FnOnce() -> Result<TrackerConfig, youtrack_rest::Error>,
    ) -> Result<TrackerConfig> {
        let mut config = if let Some(path) = &self.config {
            TrackerConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        } else if let Some(url) = &self.url {
            TrackerConfig::new(url.clone())
        } else {
            from_env().context("No tracker URL given; pass --url or --config")?
        };

        if let Some(token) = &self.token {
            config.token = Some(token.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }

        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "youtrack_rest=debug"
    } else {
        "youtrack_rest=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn print_summary(issue: &Issue) {
    println!("{}: {}", issue.id, issue.summary.as_deref().unwrap_or(""));
    if let Some(project) = &issue.project {
        println!(
            "  Project: {}",
            project.name.as_deref().unwrap_or(&project.short_name)
        );
    }
    if let Some(reporter) = &issue.reporter {
        println!(
            "  Reporter: {}",
            reporter.full_name.as_deref().unwrap_or(&reporter.login)
        );
    }
    for field in &issue.custom_fields {
        println!("  {}: {}", field.name, field.value);
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.tracker_config()?;
    tracing::debug!(base_url = %config.base_url, "Using tracker");
    let youtrack: YouTrackRest = config.connect()?;

    match cli.command {
        Command::Exists { issue_id } => {
            let exists = youtrack.issue_exists(&issue_id).await?;
            println!("{}", exists);
            Ok(ExitCode::from(exists_status(exists)))
        }
        Command::Show {
            issue_id,
            fields,
            json,
        } => {
            let issue = youtrack.issue(&issue_id).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&issue)?);
            } else if !fields.is_empty() {
                for name in &fields {
                    match issue.custom_field(name) {
                        Some(value) => println!("{}: {}", name, value),
                        None => println!("{}: <unset>", name),
                    }
                }
            } else {
                print_summary(&issue);
            }

            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("youtrack-rest").chain(args.iter().copied())).unwrap()
    }

    fn env_config() -> Result<TrackerConfig, youtrack_rest::Error> {
        Ok(TrackerConfig::new("https://env.example.com"))
    }

    fn no_env() -> Result<TrackerConfig, youtrack_rest::Error> {
        Err(youtrack_rest::Error::Config("YOUTRACK_URL is not set".to_string()))
    }

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_config_file_wins_over_url_and_env() {
        let file = config_file(r#"{"base_url": "https://file.example.com", "token": "perm:file"}"#);
        let path = file.path().to_str().unwrap();
        let cli = parse(&["--config", path, "--url", "https://flag.example.com", "exists", "PL-1"]);

        let config = cli.tracker_config_with(env_config).unwrap();
        assert_eq!(config.base_url, "https://file.example.com");
        assert_eq!(config.token.as_deref(), Some("perm:file"));
    }

    #[test]
    fn test_url_flag_wins_over_env() {
        let cli = parse(&["exists", "PL-1", "--url", "https://flag.example.com"]);

        let config = cli.tracker_config_with(env_config).unwrap();
        assert_eq!(config.base_url, "https://flag.example.com");
    }

    #[test]
    fn test_env_is_the_fallback() {
        let cli = parse(&["exists", "PL-1"]);

        let config = cli.tracker_config_with(env_config).unwrap();
        assert_eq!(config.base_url, "https://env.example.com");

        let err = cli.tracker_config_with(no_env).unwrap_err();
        assert!(format!("{:#}", err).contains("YOUTRACK_URL"));
    }

    #[test]
    fn test_token_and_timeout_override_every_source() {
        let file = config_file(
            r#"{"base_url": "https://file.example.com", "token": "perm:file", "timeout_secs": 5}"#,
        );
        let path = file.path().to_str().unwrap();

        let sources: [Vec<&str>; 3] = [
            vec!["--config", path],
            vec!["--url", "https://flag.example.com"],
            vec![],
        ];
        for source in sources {
            let mut args = source.clone();
            args.extend(["--token", "perm:flag", "--timeout", "7", "show", "PL-1"]);
            let config = parse(&args).tracker_config_with(env_config).unwrap();

            assert_eq!(config.token.as_deref(), Some("perm:flag"), "source {source:?}");
            assert_eq!(config.timeout_secs, 7, "source {source:?}");
        }
    }

    #[test]
    fn test_json_conflicts_with_field() {
        let result = Cli::try_parse_from([
            "youtrack-rest", "show", "PL-1", "--json", "--field", "State",
        ]);
        assert!(result.is_err());

        let cli = parse(&["show", "PL-1", "--field", "State", "--field", "Priority"]);
        match cli.command {
            Command::Show { fields, json, .. } => {
                assert_eq!(fields, vec!["State", "Priority"]);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_exists_status() {
        assert_eq!(exists_status(true), 0);
        assert_eq!(exists_status(false), EXIT_MISSING);
        assert_ne!(EXIT_MISSING, 1);
    }
}
