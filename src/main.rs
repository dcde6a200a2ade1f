//! egress-proxy operator CLI.
//!
//! Loads the proxy configuration the same way a host service would and
//! reports what the dispatch interceptor decides.
//!
//! ```text
//! egress-proxy [--config FILE] route http://internal.corp:8080 https://example.com
//! egress-proxy [--config FILE] rules --json
//! egress-proxy [--config FILE] fetch http://example.com/
//! egress-proxy --config FILE watch http://internal.corp:8080
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use http::Request;
use serde_json::json;

use egress_proxy::config::{load_config, resolve_settings, watcher::ConfigWatcher, AppConfig, ProcessEnv};
use egress_proxy::dispatch::{self, global, Interceptor, NormalizedOrigin, RoutingTable};
use egress_proxy::lifecycle::{bootstrap, Installation};
use egress_proxy::observability::logging;
use egress_proxy::rules::NoProxy;
use egress_proxy::Route;

#[derive(Parser)]
#[command(name = "egress-proxy")]
#[command(about = "Inspect and exercise outbound proxy routing", long_about = None)]
struct Cli {
    /// TOML configuration file. Without it only the environment is used.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the routing decision for each URL
    Route {
        urls: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show the parsed no_proxy rules
    Rules {
        #[arg(long)]
        json: bool,
    },
    /// Send a GET request through the installed interceptor
    Fetch { url: String },
    /// Re-print routing decisions whenever the config file changes
    Watch { urls: Vec<String> },
}

fn print_routes(table: &RoutingTable, urls: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    for url in urls {
        let origin = NormalizedOrigin::parse(url)?;
        println!("{} -> {}", url, table.route(&origin));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init(&config.observability)?;

    match cli.command {
        Commands::Route { urls, json } => {
            let table = RoutingTable::new(resolve_settings(&config.proxy, &ProcessEnv)?);
            for url in urls {
                let origin = NormalizedOrigin::parse(&url)?;
                let route = table.route(&origin);
                if json {
                    let proxy = match &route {
                        Route::Direct => None,
                        Route::Proxied(endpoint) => Some(endpoint.to_string()),
                    };
                    println!(
                        "{}",
                        json!({ "url": url, "origin": origin.to_string(), "direct": route.is_direct(), "proxy": proxy })
                    );
                } else {
                    println!("{} -> {}", url, route);
                }
            }
        }
        Commands::Rules { json } => {
            let settings = resolve_settings(&config.proxy, &ProcessEnv)?;
            match NoProxy::parse(&settings.no_proxy) {
                NoProxy::All if json => println!("{}", json!({ "all": true, "rules": [] })),
                NoProxy::All => println!("* (proxying disabled)"),
                NoProxy::Rules(rules) if json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "all": false, "rules": rules }))?)
                }
                NoProxy::Rules(rules) => {
                    for rule in rules {
                        println!("{}", rule);
                    }
                }
            }
        }
        Commands::Fetch { url } => {
            if let Installation::Skipped = bootstrap(&config)? {
                tracing::info!("Sending directly");
            }
            let req = Request::get(url.as_str()).body(dispatch::empty())?;
            tracing::info!(url = %url, route = %global::route(req.uri()), "Fetching");
            let response = global::dispatch(req).await?;
            println!("{:?} {}", response.version(), response.status());
            for (name, value) in response.headers() {
                println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
            }
        }
        Commands::Watch { urls } => {
            let Some(path) = &cli.config else {
                return Err("watch requires --config".into());
            };
            let interceptor = Interceptor::new(resolve_settings(&config.proxy, &ProcessEnv)?);
            let _watcher = ConfigWatcher::new(path, interceptor.clone()).run()?;

            let mut current = interceptor.snapshot();
            print_routes(&current, &urls)?;

            let mut ticker = tokio::time::interval(Duration::from_millis(500));
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let table = interceptor.snapshot();
                        if !Arc::ptr_eq(&table, &current) {
                            print_routes(&table, &urls)?;
                            current = table;
                        }
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        }
    }

    Ok(())
}
