use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    PricePerformance,
    TradingVolume,
    ValuationRatios,
    PerformanceMetrics,
}

impl ChartId {
    /// DOM id used by the web templates.
    pub const fn element_id(self) -> &'static str {
        match self {
            ChartId::PricePerformance => "price-chart",
            ChartId::TradingVolume => "volume-chart",
            ChartId::ValuationRatios => "valuation-chart",
            ChartId::PerformanceMetrics => "performance-chart",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

/// Renderer-agnostic description of one chart.
///
/// `categories` are x values (or slice labels for pies), `values` the matching
/// y values (or slice sizes), `text` the per-point display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: ChartId,
    pub kind: ChartKind,
    pub title: String,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    pub text: Vec<String>,
    pub colors: Vec<String>,
}

impl ChartSpec {
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Plotly figure (`{"data": [...], "layout": {...}}`) for this chart.
    pub fn to_plotly(&self) -> Value {
        let trace = match self.kind {
            ChartKind::Line => json!({
                "type": "scatter",
                "mode": "lines+markers",
                "name": self.title,
                "x": self.categories,
                "y": self.values,
                "text": self.text,
                "line": { "color": self.colors.first(), "width": 3 },
            }),
            ChartKind::Bar => {
                let color: Value = if self.colors.len() == 1 {
                    json!(self.colors[0])
                } else {
                    json!(self.colors)
                };
                json!({
                    "type": "bar",
                    "x": self.categories,
                    "y": self.values,
                    "text": self.text,
                    "textposition": "auto",
                    "marker": { "color": color },
                })
            }
            ChartKind::Pie => json!({
                "type": "pie",
                "labels": self.categories,
                "values": self.values,
                "text": self.text,
                "textinfo": "label+text",
                "marker": { "colors": self.colors },
            }),
        };

        let mut layout = json!({
            "title": self.title,
            "template": "plotly_white",
            "height": 400,
        });
        if let Some(x_title) = &self.x_title {
            layout["xaxis"] = json!({ "title": x_title });
        }
        if let Some(y_title) = &self.y_title {
            layout["yaxis"] = json!({ "title": y_title });
        }

        json!({ "data": [trace], "layout": layout })
    }
}
