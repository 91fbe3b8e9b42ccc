//! Lumen storefront demo shell.
//!
//! Drives one assembled page from the terminal so the whole flow can be
//! exercised without a browser: type widget events, watch the fragments
//! and toasts the page produces.
//!
//! # Architecture
//!
//! - The page itself lives in the library and never reads the clock
//! - This shell owns time: it stamps every event with `Instant::now()`
//!   and sleeps until the page's next deadline to deliver ticks
//! - Cart state persists to a redb file under the configured data dir,
//!   so quitting and restarting restores the session
//!
//! Commands: `click <widget>`, `change <widget> <value>`, `show
//! <region>`, `help`, `quit`.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::time::Instant;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lumen_storefront::catalog::DemoSource;
use lumen_storefront::config::StorefrontConfig;
use lumen_storefront::page::{LoggingGateway, Storefront};
use lumen_storefront::render::{InMemorySurface, Region};
use lumen_storefront::store::RedbStore;

type DemoPage = Storefront<RedbStore, LoggingGateway>;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lumen_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    std::fs::create_dir_all(&config.data_dir).expect("Failed to create data directory");
    let store = RedbStore::open(config.store_path()).expect("Failed to open session store");
    tracing::info!(path = %config.store_path().display(), "session store ready");

    let mut page = Storefront::assemble(
        &config,
        store,
        DemoSource::new(config.demo_seed),
        Box::new(InMemorySurface::full_page()),
        LoggingGateway,
    )
    .expect("Failed to load catalog");

    println!("Lumen storefront demo. Type 'help' for commands.");
    show_region(&page, Region::ResultsToolbar);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                if !handle_line(&mut page, line.trim()) {
                    break;
                }
            }
            () = sleep_until_deadline(page.next_deadline()) => {
                page.tick(Instant::now());
            }
        }
    }

    tracing::info!("session saved, goodbye");
}

/// Sleep until the page next has timer work, or forever when it has none.
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => std::future::pending().await,
    }
}

/// Dispatch one command line. Returns `false` to quit.
fn handle_line(page: &mut DemoPage, line: &str) -> bool {
    let now = Instant::now();
    let mut parts = line.splitn(3, ' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(""), ..) => {}
        (Some("click"), Some(widget), None) => {
            page.click(widget, now);
            show_toast(page);
        }
        (Some("change"), Some(widget), Some(value)) => {
            page.change(widget, value, now);
            show_toast(page);
        }
        (Some("show"), Some(name), None) => match region_named(name) {
            Some(region) => show_region(page, region),
            None => println!("unknown region '{name}', try one of: {}", region_names()),
        },
        (Some("help" | "?"), ..) => print_help(),
        (Some("quit" | "exit"), ..) => return false,
        _ => println!("unknown command, try 'help'"),
    }
    true
}

fn region_named(name: &str) -> Option<Region> {
    Region::ALL.into_iter().find(|region| region.as_str() == name)
}

fn region_names() -> String {
    Region::ALL.map(Region::as_str).join(", ")
}

fn show_region(page: &DemoPage, region: Region) {
    match page.surface().fragment(region) {
        Some(html) if html.is_empty() => println!("[{region}] (cleared)"),
        Some(html) => println!("[{region}]\n{html}"),
        None => println!("[{region}] (nothing rendered yet)"),
    }
}

fn show_toast(page: &DemoPage) {
    if let Some(toast) = page.current_toast() {
        println!("[toast:{}] {}", toast.level.as_str(), toast.message);
    }
}

fn print_help() {
    println!("commands:");
    println!("  click <widget>            press a button, e.g. click card-add:1");
    println!("  change <widget> <value>   type into an input, e.g. change product-search sol");
    println!("  show <region>             dump a fragment, e.g. show product-grid");
    println!("  quit");
    println!("regions: {}", region_names());
    println!("fixed widgets: cart-icon, cart-checkout, product-search, category-filter,");
    println!("  price-filter, sort-filter, clear-search, clear-filters");
}
