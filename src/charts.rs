//! Chart Builder: four renderer-agnostic chart specs from a complete record.

use crate::models::chart::{ChartId, ChartKind, ChartSpec};
use crate::models::stock::{Metric, SeriesPoint, StockRecord};

pub const PALETTE: [&str; 4] = ["#17BECF", "#FF6B6B", "#32CD32", "#FFD700"];

const DEGENERATE_LABELS: [&str; 2] = ["Start", "Current"];

pub fn build_charts(record: &StockRecord) -> [ChartSpec; 4] {
    [
        price_chart(record),
        volume_chart(record),
        valuation_chart(record),
        performance_chart(record),
    ]
}

pub fn price_chart(record: &StockRecord) -> ChartSpec {
    let pricing = &record.pricing;
    let (categories, values) = series_axes(&pricing.history, pricing.current);
    ChartSpec {
        id: ChartId::PricePerformance,
        kind: ChartKind::Line,
        title: format!("{} Price Performance (6 Months)", record.identity.ticker),
        x_title: Some("Date".to_string()),
        y_title: Some("Price ($)".to_string()),
        text: values.iter().map(|v| format!("${v:.2}")).collect(),
        categories,
        values,
        colors: vec![PALETTE[0].to_string()],
    }
}

pub fn volume_chart(record: &StockRecord) -> ChartSpec {
    let volume = &record.volume;
    let (categories, values) = series_axes(&volume.history, volume.current as f64);
    ChartSpec {
        id: ChartId::TradingVolume,
        kind: ChartKind::Bar,
        title: format!("{} Trading Volume (6 Months)", record.identity.ticker),
        x_title: Some("Date".to_string()),
        y_title: Some("Volume".to_string()),
        text: values.iter().map(|v| format!("{v:.0}")).collect(),
        categories,
        values,
        colors: vec![PALETTE[1].to_string()],
    }
}

/// Always four bars; unavailable ratios are zero-height bars labelled `N/A`.
pub fn valuation_chart(record: &StockRecord) -> ChartSpec {
    let v = &record.valuation;
    let ratios = [("P/E", v.pe), ("P/B", v.pb), ("P/S", v.ps), ("PEG", v.peg)];
    ChartSpec {
        id: ChartId::ValuationRatios,
        kind: ChartKind::Bar,
        title: format!("{} Valuation Ratios", record.identity.ticker),
        x_title: Some("Ratio".to_string()),
        y_title: Some("Value".to_string()),
        categories: ratios.iter().map(|(label, _)| label.to_string()).collect(),
        values: ratios.iter().map(|(_, m)| m.value().unwrap_or(0.0)).collect(),
        text: ratios.iter().map(|(_, m)| m.display()).collect(),
        colors: palette(),
    }
}

/// Pie slices cannot be negative: such values and unavailable ones get a
/// zero-size slice while the label keeps the reported figure.
pub fn performance_chart(record: &StockRecord) -> ChartSpec {
    let p = &record.performance;
    let metrics = [
        ("ROE", p.roe),
        ("ROI", p.roi),
        ("ROA", p.roa),
        ("Profit Margin", p.profit_margin),
    ];
    ChartSpec {
        id: ChartId::PerformanceMetrics,
        kind: ChartKind::Pie,
        title: format!("{} Performance Metrics Distribution", record.identity.ticker),
        x_title: None,
        y_title: None,
        categories: metrics.iter().map(|(label, _)| label.to_string()).collect(),
        values: metrics.iter().map(|(_, m)| slice_size(*m)).collect(),
        text: metrics.iter().map(|(_, m)| m.display_percent()).collect(),
        colors: palette(),
    }
}

fn slice_size(metric: Metric) -> f64 {
    metric.value().filter(|v| *v > 0.0).unwrap_or(0.0)
}

/// Dates and values of a series; fewer than two points become a flat line at `current`.
fn series_axes(points: &[SeriesPoint], current: f64) -> (Vec<String>, Vec<f64>) {
    if points.len() < 2 {
        return (
            DEGENERATE_LABELS.iter().map(|s| s.to_string()).collect(),
            vec![current, current],
        );
    }
    points
        .iter()
        .map(|p| (p.date.format("%Y-%m-%d").to_string(), p.value))
        .unzip()
}

fn palette() -> Vec<String> {
    PALETTE.iter().map(|c| c.to_string()).collect()
}
