use serde::{Deserialize, Serialize};

/// Chart shape the page should draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    Line,
}

/// Single data point of a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    /// Optional text drawn next to the bar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Chart-ready dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFigure {
    pub title: String,
    pub kind: ChartKind,
    pub x_title: String,
    pub y_title: String,
    pub points: Vec<ChartPoint>,
    /// Placeholder shown when the filter matched nothing
    pub no_data: bool,
}

impl ChartFigure {
    pub fn no_data(kind: ChartKind) -> Self {
        Self {
            title: "No data".to_string(),
            kind,
            x_title: String::new(),
            y_title: String::new(),
            points: Vec::new(),
            no_data: true,
        }
    }
}

/// The four charts of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardFigures {
    pub revenue_by_region: ChartFigure,
    pub trend_over_time: ChartFigure,
    pub top_products: ChartFigure,
    pub profit_margin_by_category: ChartFigure,
}
