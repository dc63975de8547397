//! bubble-layout - resolve a conversation feed into bubble layouts
//!
//! Reads a JSON array of messages (oldest first), runs every message through
//! the bind pipeline and prints the resolved items as JSON on stdout.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use bubble_layout::config::{load_settings, load_settings_from, LayoutDirection, LayoutSettings};
use bubble_layout::feed::Feed;
use bubble_layout::{logging, resolve, BindRequest, Message, ResolvedItem, Result};

#[derive(Parser, Debug)]
#[command(name = "bubble-layout", version, about = "Resolve chat bubble layouts for a message feed")]
struct Cli {
    /// JSON file holding an array of messages
    feed: PathBuf,

    /// Treat the feed as a group thread
    #[arg(long)]
    group: bool,

    /// The message request has been accepted
    #[arg(long)]
    accepted: bool,

    /// Right-to-left layout
    #[arg(long)]
    rtl: bool,

    /// Settings file to use instead of the default location
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Verbose diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> Result<Vec<ResolvedItem>> {
    let mut settings = match &cli.settings {
        Some(path) => load_settings_from(path)?,
        None => load_settings().unwrap_or_default(),
    };
    if cli.rtl {
        settings.direction = LayoutDirection::Rtl;
    }

    let content = fs::read_to_string(&cli.feed)?;
    let messages: Vec<Message> = serde_json::from_str(&content)?;
    let feed = Feed::new(messages, cli.group);
    tracing::info!(messages = feed.len(), group = cli.group, "resolving feed");

    resolve_feed(&feed, cli.accepted, &settings)
}

fn resolve_feed(feed: &Feed, accepted: bool, settings: &LayoutSettings) -> Result<Vec<ResolvedItem>> {
    feed.windows()
        .map(|window| {
            let mut request = BindRequest::from_window(window);
            request.message_request_accepted = accepted;
            resolve(&request, settings)
        })
        .collect()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let items = match run(&cli) {
        Ok(items) => items,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("bubble-layout: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&items) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("bubble-layout: {}", e);
            ExitCode::FAILURE
        }
    }
}
