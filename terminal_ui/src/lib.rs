pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod http;
pub mod navigation;
pub mod session;
pub mod ui;

use std::io;

use anyhow::{anyhow, Context};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{error, info};
use tui::{backend::CrosstermBackend, Terminal};

use crate::api::HttpTaskApi;
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::http::ApiClient;
use crate::navigation::{Route, Router};
use crate::session::{FileSession, SessionProvider};

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut cfg = Config::load(cli.config.as_deref())?;
    cfg.apply_overrides(cli.api_url.as_ref(), cli.filter);

    let _guard = cli::init_tracing(cli.verbose, cli.quiet, &cfg.log_dir()?)?;
    info!(
        api_url = %cfg.api_url,
        config = ?cfg.loaded_from,
        "starting taskdeck"
    );

    let client = ApiClient::new(cfg.api_base()?, cfg.request_timeout())
        .context("failed to build http client")?;
    let data_dir = cfg.data_dir()?;
    let login_token = cli.login_token().map(str::to_string);
    let session = FileSession::new(&data_dir, client.clone()).with_override_token(cli.token);

    match cli.command.unwrap_or(Command::Dashboard) {
        Command::Login { .. } => {
            let token =
                login_token.ok_or_else(|| anyhow!("missing token, run `taskdeck login <TOKEN>`"))?;
            session
                .store_token(&token)
                .with_context(|| format!("failed to store session in {}", data_dir.display()))?;
            println!("Session stored. Run `taskdeck` to open your dashboard.");
        }
        Command::Logout => {
            session.logout();
            println!("Signed out.");
        }
        Command::Dashboard => {
            let dashboard = Dashboard::new(HttpTaskApi::new(client), session, Router::new())
                .with_filter(cfg.default_filter);
            let route = run_terminal(dashboard).await?;
            if route == Route::SignIn {
                println!(
                    "Not signed in ({}). Run `taskdeck login <TOKEN>` with a token from the sign-in page.",
                    route.path()
                );
            }
        }
    }

    info!("done");
    Ok(())
}

async fn run_terminal<S: SessionProvider>(
    dashboard: Dashboard<HttpTaskApi, S, Router>,
) -> anyhow::Result<Route> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to set up terminal")?;
    terminal.clear()?;

    let result = app::run(&mut terminal, dashboard).await;

    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(error = %err, "dashboard failed");
    }
    result
}
