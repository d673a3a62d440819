use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Level;

use feedscroll::cli::render::{format_item, format_status};
use feedscroll::cli::{Cli, ScrollArgs};
use feedscroll::config::Config;
use feedscroll::errors::FeedResult;
use feedscroll::services::{FeedLoader, FetchService, LoadOutcome, Sentinel};
use feedscroll::sources::PageFetcher;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> FeedResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load configuration
    let config = Config::from_env()?;

    let scroll = cli.command.scroll().clone();
    let page_size = scroll.page_size.unwrap_or(config.page_size);

    let fetcher = Arc::new(FetchService::from_config(&config)?);
    let loader = FeedLoader::new(fetcher, cli.command.query(), page_size);

    let result = if scroll.interactive {
        cmd_interactive(&loader).await
    } else {
        cmd_scroll(&loader, &scroll).await
    };

    loader.shutdown();
    result
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print items not shown yet, returns the new count of printed items
fn print_new_items<F: PageFetcher>(loader: &FeedLoader<F>, printed: usize) -> usize {
    let state = loader.state();
    for (i, item) in state.items.iter().enumerate().skip(printed) {
        println!("{}\n", format_item(i + 1, item));
    }
    state.items.len()
}

fn report(outcome: FeedResult<LoadOutcome>) {
    match outcome {
        Ok(LoadOutcome::Loaded { page, added }) => println!("Loaded page {} ({} new).", page, added),
        Ok(LoadOutcome::Skipped(reason)) => println!("Nothing to load ({:?}).", reason),
        Ok(LoadOutcome::Cancelled) => println!("Request cancelled."),
        Err(e) => println!("FAILED: {}", e),
    }
}

async fn cmd_scroll<F: PageFetcher>(loader: &FeedLoader<F>, scroll: &ScrollArgs) -> FeedResult<()> {
    if !scroll.json {
        println!("Loading {}...\n", loader.query().describe());
    }

    // Nothing to show without the first page
    loader.load_initial().await?;

    let mut printed = 0;
    if !scroll.json {
        printed = print_new_items(loader, printed);
    }

    // Keep the sentinel in view until enough pages are loaded
    let mut sentinel = Sentinel::new(loader.clone());
    let mut pages = 1;
    while scroll.pages == 0 || pages < scroll.pages {
        match sentinel.observe(true).await {
            Ok(Some(LoadOutcome::Loaded { .. })) => {
                pages += 1;
                if !scroll.json {
                    printed = print_new_items(loader, printed);
                }
            }
            Ok(_) => break,
            Err(e) => {
                if !scroll.json {
                    println!("Stopped loading: {}", e);
                }
                break;
            }
        }
    }

    let state = loader.state();
    if scroll.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!("{}", format_status(&state));
    }

    Ok(())
}

async fn cmd_interactive<F: PageFetcher>(loader: &FeedLoader<F>) -> FeedResult<()> {
    println!("Enter: next page, r: retry, s <term>: search, q: quit\n");
    println!("Loading {}...\n", loader.query().describe());

    let mut printed = 0;
    if let Err(e) = loader.load_initial().await {
        println!("FAILED: {}", e);
    }
    printed = print_new_items(loader, printed);

    let mut sentinel = Sentinel::new(loader.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("{}", format_status(&loader.state()));
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "q" => break,
            "" => match sentinel.observe(true).await {
                Ok(Some(outcome)) => report(Ok(outcome)),
                Ok(None) => println!("Nothing more to load."),
                Err(e) => report(Err(e)),
            },
            "r" => report(loader.retry().await),
            _ if input == "s" || input.starts_with("s ") => {
                let term = input[1..].trim();
                let query = loader.query().with_search(term);
                if loader.set_query(query) {
                    printed = 0;
                    println!("Loading {}...\n", loader.query().describe());
                    report(loader.load_initial().await);
                } else {
                    println!("Same search, nothing to do.");
                }
            }
            _ => {
                println!("Unknown command: {}", input);
                continue;
            }
        }

        println!();
        printed = print_new_items(loader, printed);
    }

    Ok(())
}
