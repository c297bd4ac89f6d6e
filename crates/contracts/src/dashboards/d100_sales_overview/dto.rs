use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::figure::DashboardFigures;

/// One row of the canonical sales dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "OrderID")]
    pub order_id: String,
    #[serde(rename = "OrderDate")]
    pub order_date: NaiveDateTime,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
    #[serde(rename = "UnitPrice")]
    pub unit_price: f64,
    #[serde(rename = "TotalSales")]
    pub total_sales: f64,
    #[serde(rename = "Profit")]
    pub profit: f64,
    /// Profit / TotalSales * 100, zero when undefined
    #[serde(rename = "ProfitMargin")]
    pub profit_margin: f64,
}

/// Row of the "Recent Orders" table (no ProfitMargin column)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    #[serde(rename = "OrderID")]
    pub order_id: String,
    #[serde(rename = "OrderDate")]
    pub order_date: NaiveDateTime,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
    #[serde(rename = "UnitPrice")]
    pub unit_price: f64,
    #[serde(rename = "TotalSales")]
    pub total_sales: f64,
    #[serde(rename = "Profit")]
    pub profit: f64,
}

impl From<&SalesRecord> for OrderRow {
    fn from(record: &SalesRecord) -> Self {
        Self {
            order_id: record.order_id.clone(),
            order_date: record.order_date,
            region: record.region.clone(),
            product: record.product.clone(),
            category: record.category.clone(),
            quantity: record.quantity,
            unit_price: record.unit_price,
            total_sales: record.total_sales,
            profit: record.profit,
        }
    }
}

/// User filter for one dashboard refresh
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Inclusive lower bound
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound (whole calendar day)
    pub end_date: Option<NaiveDate>,
    /// Empty means no region restriction
    #[serde(default)]
    pub regions: Vec<String>,
}

/// Query string of the overview endpoint
///
/// `regions` repeats once per selected region, e.g.
/// `regions=North&regions=Asia%2C%20Pacific`. Values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesOverviewRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub regions: Vec<String>,
}

impl SalesOverviewRequest {
    /// Build from decoded query pairs; unknown keys are ignored
    pub fn from_query_pairs<I>(pairs: I) -> Result<Self, chrono::ParseError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut request = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "start_date" => request.start_date = parse_query_date(&value)?,
                "end_date" => request.end_date = parse_query_date(&value)?,
                "regions" => request.regions.push(value),
                _ => {}
            }
        }
        Ok(request)
    }

    pub fn into_selection(self) -> FilterSelection {
        FilterSelection {
            start_date: self.start_date,
            end_date: self.end_date,
            regions: self.regions,
        }
    }
}

/// Empty value means no bound
fn parse_query_date(value: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map(Some)
}

/// Revenue, profit and margin of one product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMargin {
    pub category: String,
    pub total_sales: f64,
    pub profit: f64,
    pub profit_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRevenue {
    pub region: String,
    pub total_sales: f64,
}

/// Revenue of one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// First day of the month
    pub month: NaiveDate,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub product: String,
    pub total_sales: f64,
}

/// Formatted KPI card values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_sales: String,
    pub total_orders: String,
    pub total_profit: String,
    pub profit_margin: String,
}

impl Kpis {
    /// KPI values shown when the filter matches nothing
    pub fn zero() -> Self {
        Self {
            total_sales: "$0.00".to_string(),
            total_orders: "0".to_string(),
            total_profit: "$0.00".to_string(),
            profit_margin: "0%".to_string(),
        }
    }
}

/// Result of the filter-aggregation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOverview {
    pub by_category: Vec<CategoryMargin>,
    pub by_region: Vec<RegionRevenue>,
    pub by_month: Vec<MonthlyRevenue>,
    /// At most 10 entries, largest revenue first
    pub top_products: Vec<ProductRevenue>,
    /// At most 100 entries, newest order first
    pub recent_orders: Vec<OrderRow>,
    pub kpis: Kpis,
    /// True when no row matched the filter
    pub is_empty: bool,
}

impl SalesOverview {
    pub fn empty() -> Self {
        Self {
            by_category: Vec::new(),
            by_region: Vec::new(),
            by_month: Vec::new(),
            top_products: Vec::new(),
            recent_orders: Vec::new(),
            kpis: Kpis::zero(),
            is_empty: true,
        }
    }
}

/// Values for the filter panel widgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Sorted distinct regions
    pub regions: Vec<String>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}

/// Response of GET /api/d100/sales_overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOverviewResponse {
    pub figures: DashboardFigures,
    pub table: Vec<OrderRow>,
    pub kpis: Kpis,
}
