use clap::Parser;
use taskdeck_terminal_ui::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = taskdeck_terminal_ui::run(cli).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
