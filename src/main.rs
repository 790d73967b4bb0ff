use std::io;
use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use github_repo_searching_lib::{Args, Command, Config, GitHubSearcher, Result};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so they never mix with results on stdout
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    dotenv().ok();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Command failed: {:?}", e);
            if let Some(usage) = e.usage() {
                eprintln!("{}\n\n{}", e, usage);
                ExitCode::from(2)
            } else {
                eprintln!("  Error: {}", e);
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::from_args(&args)?;
    let searcher = GitHubSearcher::new(&config)?;
    let mut stdout = io::stdout();

    debug!("Executing command: {:?}", args.command);
    match &args.command {
        Command::Info { repository } => searcher.info(repository, &mut stdout).await,
        Command::Search { query, target } => {
            let report = searcher.search(query, target, &mut stdout).await?;
            debug!("Search finished: {:?}", report);
            Ok(())
        }
        Command::List { owner } => searcher.list(owner, &mut stdout).await.map(|_| ()),
        Command::Cat { file } => searcher.cat(file, &mut stdout).await,
    }
}
