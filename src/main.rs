//! moviecat - Browse the TMDB movie catalog from the terminal
//!
//! Thin front end over the library's cached client: every network command is
//! wrapped in the retry helper using the configured policy.

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use moviecat::cli::{Cli, Request};
use moviecat::config::Config;
use moviecat::data::{image_url, MovieClient, TimeWindow};
use moviecat::output;
use moviecat::retry::{with_retry, RetryPolicy};

/// Installs a stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "moviecat=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let request = Request::from_command(&cli.command)?;
    let config = Config::load(cli.config.as_deref())?;

    if !request.needs_network() {
        render_offline(&request, &config);
        return Ok(());
    }

    let client = MovieClient::new(&config)?;
    let policy = cli.retry_policy(&config.retry);
    execute(&client, &request, &policy, cli.json).await
}

/// Handles requests that need neither an API key nor a client
fn render_offline(request: &Request, config: &Config) {
    if let Request::ImageUrl { path, size } = request {
        match image_url(&config.image_base_url, path.as_deref(), size.as_deref()) {
            Some(url) => println!("{}", url),
            None => println!("(no image)"),
        }
    }
}

async fn execute(
    client: &MovieClient,
    request: &Request,
    policy: &RetryPolicy,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    match request {
        Request::Home => {
            let (trending, popular) = futures::future::try_join(
                with_retry(|| client.get_trending(TimeWindow::Day), policy),
                with_retry(|| client.get_popular_movies(1), policy),
            )
            .await?;

            if json {
                print_json(&serde_json::json!({
                    "trending": &*trending,
                    "popular": &*popular,
                }))?;
            } else {
                print!("{}", output::page_listing("Trending today", &trending));
                println!();
                print!("{}", output::page_listing("Popular", &popular));
            }
        }
        Request::Trending(window) => {
            let page = with_retry(|| client.get_trending(*window), policy).await?;
            if json {
                print_json(&*page)?;
            } else {
                let title = match window {
                    TimeWindow::Day => "Trending today",
                    TimeWindow::Week => "Trending this week",
                };
                print!("{}", output::page_listing(title, &page));
            }
        }
        Request::Popular(page_number) => {
            let page = with_retry(|| client.get_popular_movies(*page_number), policy).await?;
            if json {
                print_json(&*page)?;
            } else {
                print!("{}", output::page_listing("Popular", &page));
            }
        }
        Request::Search { query, page } => {
            let results = with_retry(|| client.search_movies(query, *page), policy).await?;
            if json {
                print_json(&*results)?;
            } else {
                let title = format!("Search: {}", query.trim());
                print!("{}", output::page_listing(&title, &results));
            }
        }
        Request::Details(id) => {
            let details = with_retry(|| client.get_movie_details(*id), policy).await?;
            if json {
                print_json(&*details)?;
            } else {
                print!("{}", output::details_view(&details, client));
            }
        }
        // Rendered by `render_offline` before a client exists
        Request::ImageUrl { .. } => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
