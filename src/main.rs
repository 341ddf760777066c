mod api;
mod cli;
mod config;
mod consolidate;
mod error;
mod journal;
mod model;
mod prompt;

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::EnvOverrides;
use consolidate::{Consolidator, Options};
use journal::Journal;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr so the prompts on stdout stay readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = cli::parse_args(&args)?;
    if cli.help {
        cli::print_help();
        return Ok(ExitCode::SUCCESS);
    }

    // Load config
    let config = config::load_config()?;
    let mut settings = config.resolve(EnvOverrides::from_env())?;
    cli.apply(&mut settings);

    let api = api::create_client(&settings);
    info!(host = %settings.host, "listing spaces");
    let spaces = api.list_spaces().await.context("Unable to list spaces")?;

    let destination = match &cli.to {
        Some(choice) => prompt::parse_choice(choice, &spaces)?,
        None => prompt::choose_destination(&spaces)?,
    };

    if !cli.yes && !prompt::confirm(destination)? {
        println!("Nothing was moved.");
        return Ok(ExitCode::FAILURE);
    }

    let journal = if settings.journal && !cli.dry_run {
        let journal = Journal::create(&journal::runs_dir())?;
        println!("Journal: {}", journal.path().display());
        Some(journal)
    } else {
        None
    };

    let options = Options {
        page_size: settings.page_size,
        keep_going: settings.keep_going,
        dry_run: cli.dry_run,
    };
    info!(
        destination = %destination.name,
        page_size = options.page_size,
        keep_going = options.keep_going,
        dry_run = options.dry_run,
        "consolidating"
    );
    println!("Consolidating...");

    let mut consolidator = Consolidator::new(api.as_ref(), destination, options);
    if let Some(journal) = &journal {
        consolidator = consolidator.with_journal(journal);
    }
    let report = match consolidator.run(&spaces).await {
        Ok(report) => report,
        Err(aborted) => {
            println!("Stopped early.");
            println!("{}", aborted.report.summary());
            print_journal_total(journal.as_ref());
            return Err(aborted.error);
        }
    };

    println!("{}", report.summary());
    print_journal_total(journal.as_ref());
    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn print_journal_total(journal: Option<&Journal>) {
    if let Some(journal) = journal {
        println!(
            "{} journal entries in {}",
            journal.entries_written(),
            journal.path().display()
        );
    }
}
