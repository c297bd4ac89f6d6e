use chrono::NaiveDate;
use contracts::dashboards::d100_sales_overview::SalesRecord;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

use super::dataset::SalesDataset;
use super::repository::RawSalesRow;

/// Single-connection in-memory SQLite with the given statements applied
pub async fn memory_db(statements: &[&str]) -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    for sql in statements {
        db.execute_unprepared(sql).await.unwrap();
    }
    db
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub fn record(
    order_id: &str,
    order_date: &str,
    region: &str,
    product: &str,
    category: &str,
    total_sales: f64,
    profit: f64,
) -> SalesRecord {
    SalesRecord {
        order_id: order_id.to_string(),
        order_date: date(order_date).and_hms_opt(12, 0, 0).unwrap(),
        region: region.to_string(),
        product: product.to_string(),
        category: category.to_string(),
        quantity: 1.0,
        unit_price: total_sales,
        total_sales,
        profit,
        profit_margin: crate::shared::format::margin_percent(profit, total_sales),
    }
}

pub fn dataset(records: Vec<SalesRecord>) -> SalesDataset {
    SalesDataset::from_records(records)
}

pub fn raw(order_id: &str, order_date: &str, region: Option<&str>) -> RawSalesRow {
    RawSalesRow {
        order_id: Some(order_id.to_string()),
        order_date: date(order_date).and_hms_opt(9, 0, 0),
        region: region.map(str::to_string),
        product: Some("Widget".to_string()),
        category: Some("Tools".to_string()),
        quantity: Some(2.0),
        unit_price: Some(50.0),
        total_sales: Some(100.0),
        profit: Some(20.0),
    }
}
