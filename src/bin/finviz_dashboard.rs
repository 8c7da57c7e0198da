use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{App, Arg, ArgMatches, SubCommand};
use log::{error, info};

use finviz_dashboard::config::Config;
use finviz_dashboard::services::{DashboardService, ProbeOutcome, PROBE_TICKERS};
use finviz_dashboard::terminal::{self, Tab};
use finviz_dashboard::web;

fn build_app() -> App<'static> {
    App::new("finviz_dashboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Stock dashboard over Finviz quote data")
        .arg(
            Arg::with_name("offline")
                .long("offline")
                .global(true)
                .help("Skip the quote provider and render mock data")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("base-url")
                .long("base-url")
                .value_name("URL")
                .global(true)
                .help("Quote provider base URL")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("timeout")
                .long("timeout")
                .value_name("SECONDS")
                .global(true)
                .help("HTTP request timeout in seconds")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("user-agent")
                .long("user-agent")
                .value_name("AGENT")
                .global(true)
                .help("User-Agent header sent to the quote provider")
                .takes_value(true),
        )
        .subcommand(
            SubCommand::with_name("serve")
                .about("Run the web dashboard")
                .arg(
                    Arg::with_name("bind")
                        .short('b')
                        .long("bind")
                        .value_name("ADDR")
                        .help("Address to listen on")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("show")
                .about("Render one dashboard to the terminal")
                .arg(
                    Arg::with_name("input")
                        .value_name("INPUT")
                        .help("Company name or ticker symbol")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("tab")
                        .short('t')
                        .long("tab")
                        .value_name("TAB")
                        .help("Tab to show (overview, charts, analysis, details)")
                        .takes_value(true)
                        .default_value("overview"),
                ),
        )
        .subcommand(SubCommand::with_name("interactive").about("Interactive terminal dashboard"))
        .subcommand(SubCommand::with_name("probe").about("Check provider connectivity with well-known tickers"))
}

fn config_from(matches: &ArgMatches) -> Result<Config> {
    let mut config = Config::new()
        .with_offline(matches.is_present("offline"))
        .with_openrouter_api_key(std::env::var("OPENROUTER_API_KEY").ok());

    if let Ok(model) = std::env::var("OPENROUTER_MODEL") {
        if !model.trim().is_empty() {
            config = config.with_openrouter_model(model.trim());
        }
    }
    if let Some(agent) = matches.value_of("user-agent") {
        config = config.with_user_agent(agent);
    }
    if let Some(url) = matches.value_of("base-url") {
        config = config.with_finviz_base_url(url);
    }
    if let Some(secs) = matches.value_of("timeout") {
        let secs: u64 = secs
            .parse()
            .with_context(|| format!("invalid --timeout '{secs}'"))?;
        config = config.with_request_timeout(Duration::from_secs(secs));
    }
    if let Some(("serve", sub)) = matches.subcommand() {
        if let Some(addr) = sub.value_of("bind") {
            config = config.with_bind_addr(addr);
        }
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = build_app().get_matches();
    let config = config_from(&matches)?;
    let service = Arc::new(DashboardService::from_config(config)?);
    info!("Using {} quote source", service.scraper_name());

    match matches.subcommand() {
        Some(("serve", _)) => web::serve(service).await?,
        Some(("show", sub)) => {
            let tab_name = sub.value_of("tab").unwrap_or("overview");
            let Some(tab) = Tab::parse(tab_name) else {
                bail!("unknown tab '{tab_name}'");
            };
            let input = sub.value_of("input").unwrap_or_default();
            if terminal::show(&service, input, tab).await.is_err() {
                std::process::exit(1);
            }
        }
        Some(("interactive", _)) => terminal::run_interactive(&service).await?,
        Some(("probe", _)) => {
            let results = service.probe(&PROBE_TICKERS).await;
            let mut failures = 0;
            for result in &results {
                match &result.outcome {
                    ProbeOutcome::Success { company } => println!("{:<6} ok     {}", result.ticker, company),
                    ProbeOutcome::Error { kind, message } => {
                        failures += 1;
                        println!("{:<6} {:<6} {}", result.ticker, kind, message);
                    }
                }
            }
            if failures == results.len() {
                error!("Quote provider unreachable for all probe tickers");
            }
        }
        _ => info!("No command specified. Use --help for usage information."),
    }

    Ok(())
}
