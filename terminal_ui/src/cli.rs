use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{ArgAction, Parser, Subcommand};
use taskdeck_shared::Filter;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use url::Url;

pub const LOG_FILE_NAME: &str = "taskdeck.log";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskdeck",
    version,
    about = "Terminal dashboard for your to-do list"
)]
pub struct Cli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Config file (defaults to the per-user taskdeck/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base url of the task service, e.g. http://localhost:8000/api/v1/
    #[arg(long, env = "TASKDECK_API_URL", global = true)]
    pub api_url: Option<Url>,

    /// Session token to use instead of the stored one.
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Initial filter: all, pending or completed.
    #[arg(long, global = true)]
    pub filter: Option<Filter>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the dashboard (default).
    Dashboard,
    /// Store a session token issued by the sign-in service, given either
    /// positionally or through `--token`.
    Login {
        #[arg(value_name = "TOKEN")]
        session_token: Option<String>,
    },
    /// Forget the stored session.
    Logout,
}

impl Cli {
    /// Token for the `login` subcommand. The positional value wins over
    /// `--token`.
    pub fn login_token(&self) -> Option<&str> {
        match &self.command {
            Some(Command::Login { session_token }) => {
                session_token.as_deref().or(self.token.as_deref())
            }
            _ => None,
        }
    }
}

/// Installs the global subscriber writing to `log_dir`. The returned guard
/// flushes buffered lines on drop and must outlive the program.
pub fn init_tracing(verbose: u8, quiet: u8, log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 2 {
        "trace"
    } else if verbose == 1 {
        "debug"
    } else {
        "info"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_writer(writer)
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_and_subcommands() {
        let cli = Cli::try_parse_from([
            "taskdeck",
            "-vv",
            "--api-url",
            "http://localhost:9000/api/v1/",
            "--filter",
            "completed",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.filter, Some(Filter::Completed));
        assert_eq!(cli.command, None);

        let cli = Cli::try_parse_from(["taskdeck", "login", "abc123"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Login {
                session_token: Some("abc123".to_string())
            })
        );
        assert_eq!(cli.login_token(), Some("abc123"));
    }

    #[test]
    fn login_accepts_token_flag() {
        let cli = Cli::try_parse_from(["taskdeck", "login", "--token", "abc123"]).unwrap();
        assert_eq!(cli.login_token(), Some("abc123"));

        let cli = Cli::try_parse_from(["taskdeck", "--token", "outer", "login", "inner"]).unwrap();
        assert_eq!(cli.login_token(), Some("inner"));

        let cli = Cli::try_parse_from(["taskdeck", "login"]).unwrap();
        assert_eq!(cli.login_token(), None);

        let cli = Cli::try_parse_from(["taskdeck", "--token", "abc123"]).unwrap();
        assert_eq!(cli.login_token(), None);
    }

    #[test]
    fn rejects_unknown_filter() {
        assert!(Cli::try_parse_from(["taskdeck", "--filter", "done"]).is_err());
    }
}
