//! Interactive terminal shell.
//!
//! Each submitted input reruns the whole pipeline; tab commands switch which
//! part of the last result is shown.

use std::fmt::Write as _;
use std::io::Write as _;

use log::debug;
use textplots::{Chart, Plot, Shape};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::errors::{DashboardError, Result};
use crate::models::chart::{ChartKind, ChartSpec};
use crate::models::stock::Ratings;
use crate::services::{Dashboard, DashboardService};
use crate::view::{self, Card, CardSection};

const PLOT_WIDTH: u32 = 120;
const PLOT_HEIGHT: u32 = 40;
const LABEL_WIDTH: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Charts,
    Analysis,
    Details,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Charts, Tab::Analysis, Tab::Details];

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "overview" => Some(Tab::Overview),
            "charts" => Some(Tab::Charts),
            "analysis" => Some(Tab::Analysis),
            "details" => Some(Tab::Details),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Charts => "charts",
            Tab::Analysis => "analysis",
            Tab::Details => "details",
        }
    }
}

/// Text of one tab. Plots for the charts tab are drawn separately by [`print_tab`].
pub fn render_tab(dashboard: &Dashboard, tab: Tab) -> String {
    let record = &dashboard.record;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== {} ({}) | {} ===",
        record.identity.company,
        dashboard.ticker,
        tab.name()
    );

    match tab {
        Tab::Overview => {
            let _ = writeln!(out, "{} / {}", record.identity.sector, record.identity.industry);
            write_sections(&mut out, &view::overview_sections(record));
        }
        Tab::Analysis => write_sections(&mut out, &view::analysis_sections(record)),
        Tab::Details => {
            write_cards(&mut out, &view::detail_cards(record));
            let _ = writeln!(out, "\n{}", record.profile.description);
            write_ratings(&mut out, &record.ratings);
            let _ = writeln!(out, "\n[Complete Financial Data]");
            match &dashboard.raw {
                Some(raw) => write_cards(&mut out, &view::raw_field_cards(raw)),
                None => {
                    let _ = writeln!(out, "  Provider data unavailable; showing sample values.");
                }
            }
        }
        Tab::Charts => {
            for chart in &dashboard.charts {
                write_chart_table(&mut out, chart);
            }
        }
    }
    out
}

pub fn render_error(err: &DashboardError) -> String {
    format!("Error [{}]: {}", err.kind(), err)
}

/// Print a tab, with text plots for the line and bar series on the charts tab.
pub fn print_tab(dashboard: &Dashboard, tab: Tab) {
    print!("{}", render_tab(dashboard, tab));
    if tab == Tab::Charts {
        // price and volume; the other two are tabulated only
        for chart in &dashboard.charts[..2] {
            plot_series(chart);
        }
    }
}

fn plot_series(chart: &ChartSpec) {
    let points: Vec<(f32, f32)> = chart
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f32, *v as f32))
        .collect();
    let xmax = (points.len().max(2) - 1) as f32;

    println!("\n{}", chart.title);
    let shape = match chart.kind {
        ChartKind::Line => Shape::Lines(&points),
        _ => Shape::Bars(&points),
    };
    Chart::new(PLOT_WIDTH, PLOT_HEIGHT, 0.0, xmax)
        .lineplot(&shape)
        .display();
}

fn write_sections(out: &mut String, sections: &[CardSection]) {
    for section in sections {
        let _ = writeln!(out, "\n[{}]", section.title);
        write_cards(out, &section.cards);
    }
}

fn write_cards(out: &mut String, cards: &[Card]) {
    for card in cards {
        let _ = writeln!(out, "  {:<width$} {}", card.label, card.value, width = LABEL_WIDTH);
    }
}

fn write_ratings(out: &mut String, ratings: &Ratings) {
    let _ = writeln!(out, "\n[Analyst Ratings] {}", ratings.summary);
    for entry in &ratings.entries {
        let _ = writeln!(
            out,
            "  {:<12} {:<12} {:<22} {:<24} {}",
            entry.date, entry.action, entry.firm, entry.rating, entry.price_target
        );
    }
}

fn write_chart_table(out: &mut String, chart: &ChartSpec) {
    let _ = writeln!(out, "\n{}", chart.title);
    for ((category, value), text) in chart.categories.iter().zip(&chart.values).zip(&chart.text) {
        let _ = writeln!(
            out,
            "  {:<width$} {:>12} {}",
            category,
            view::format_compact(*value),
            text,
            width = LABEL_WIDTH
        );
    }
}

/// One pipeline run plus render, as the `show` command does it.
pub async fn show(service: &DashboardService, input: &str, tab: Tab) -> Result<()> {
    match service.dashboard_for_input(input).await {
        Ok(dashboard) => {
            print_tab(&dashboard, tab);
            Ok(())
        }
        Err(e) => {
            println!("{}", render_error(&e));
            Err(e)
        }
    }
}

fn print_help() {
    println!("Enter a company name or ticker (e.g. Apple, MSFT, Tesla).");
    let tabs: Vec<String> = Tab::ALL.iter().map(|t| format!(":{}", t.name())).collect();
    println!("Switch tabs with {}. Type :quit to exit.", tabs.join(", "));
}

/// Read inputs from stdin until EOF or `:quit`.
pub async fn run_interactive(service: &DashboardService) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut current: Option<Dashboard> = None;
    let mut tab = Tab::Overview;

    println!("=== Stock Dashboard ===");
    print_help();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix(':') {
            match command.trim() {
                "quit" | "q" | "exit" => break,
                "help" | "h" => print_help(),
                name => match (Tab::parse(name), &current) {
                    (Some(next), Some(dashboard)) => {
                        tab = next;
                        print_tab(dashboard, tab);
                    }
                    (Some(next), None) => {
                        tab = next;
                        println!("No dashboard yet; enter a company name first.");
                    }
                    (None, _) => println!("Unknown command ':{}'", name),
                },
            }
            continue;
        }

        debug!("interactive input '{}'", line);
        match service.dashboard_for_input(line).await {
            Ok(dashboard) => {
                print_tab(&dashboard, tab);
                current = Some(dashboard);
            }
            Err(e) => {
                println!("{}", render_error(&e));
                current = None;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::quote::RawQuote;
    use crate::models::stock::AnalystRating;

    async fn dashboard() -> Dashboard {
        DashboardService::from_config(Config::new().with_offline(true))
            .unwrap()
            .dashboard_for_input("Apple")
            .await
            .unwrap()
    }

    #[test]
    fn tab_names_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(Tab::parse(tab.name()), Some(tab));
        }
        assert_eq!(Tab::parse(" Charts "), Some(Tab::Charts));
        assert_eq!(Tab::parse("news"), None);
    }

    #[tokio::test]
    async fn overview_lists_headline_cards() {
        let text = render_tab(&dashboard().await, Tab::Overview);
        assert!(text.starts_with("=== Sample Company (AAPL) (AAPL) | overview ==="));
        assert!(text.contains("Current Price"));
        assert!(text.contains("$150.25"));
    }

    #[tokio::test]
    async fn charts_tab_tabulates_every_chart() {
        let text = render_tab(&dashboard().await, Tab::Charts);
        assert!(text.contains("AAPL Valuation Ratios"));
        assert!(text.contains("AAPL Performance Metrics Distribution"));
        assert!(text.contains("Profit Margin"));
        assert!(text.contains("2024-06-01"));
    }

    #[tokio::test]
    async fn details_include_description() {
        let text = render_tab(&dashboard().await, Tab::Details);
        assert!(text.contains("Sample company description"));
        assert!(text.contains("Market Cap"));
        assert!(text.contains("[Analyst Ratings] Positive"));
        assert!(text.contains("Provider data unavailable"));
    }

    #[tokio::test]
    async fn details_list_rating_rows_and_raw_fields() {
        let mut dashboard = dashboard().await;
        dashboard.record.ratings = Ratings::from_entries(vec![AnalystRating {
            date: "2024-10-01".to_string(),
            action: "Upgrade".to_string(),
            firm: "Loop Capital".to_string(),
            rating: "Hold → Buy".to_string(),
            price_target: "$230 → $300".to_string(),
        }]);
        dashboard.raw = Some(RawQuote::new().with("P/E", "35.71").with("Market Cap", "3456.78B"));

        let text = render_tab(&dashboard, Tab::Details);
        assert!(text.contains("Loop Capital"));
        assert!(text.contains("$230 → $300"));
        assert!(text.contains("[Complete Financial Data]"));
        assert!(text.contains("3456.78B"));
        assert!(!text.contains("Provider data unavailable"));
    }

    #[test]
    fn error_view_carries_kind() {
        let err = DashboardError::unresolved("NotARealCompanyXYZ", "no matching company or ticker symbol");
        assert!(render_error(&err).starts_with("Error [unresolved_input]:"));
    }
}
