use chrono::NaiveDateTime;
use contracts::dashboards::d100_sales_overview::{FilterOptions, SalesRecord};
use sea_orm::DatabaseConnection;
use std::collections::{BTreeSet, HashSet};

use super::repository::{self, RawSalesRow};
use crate::shared::error::Result;
use crate::shared::format::margin_percent;

/// Region used when the source has none
pub const UNKNOWN_REGION: &str = "Unknown";

/// Canonical, cleaned sales table
///
/// Built once at startup and never mutated afterwards; request handlers
/// share it through an `Arc`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SalesDataset {
    records: Vec<SalesRecord>,
}

impl SalesDataset {
    /// Wrap records that are already clean
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    /// Clean raw table rows into the canonical dataset
    ///
    /// Steps, in order:
    /// 1. Region defaults to "Unknown"; rows with any other NULL are dropped.
    ///    TotalSales only counts when at least one row carries a value.
    /// 2. Exact duplicate rows are dropped, first occurrence kept.
    /// 3. TotalSales = Quantity * UnitPrice when the column is empty.
    /// 4. ProfitMargin = Profit / TotalSales * 100, zero when undefined.
    pub fn from_raw(rows: Vec<RawSalesRow>) -> Self {
        let raw_count = rows.len();
        let derive_total_sales = rows.iter().all(|row| row.total_sales.is_none());

        let complete: Vec<CompleteRow> = rows
            .into_iter()
            .filter_map(|row| CompleteRow::from_raw(row, derive_total_sales))
            .collect();
        let complete_count = complete.len();

        let mut seen = HashSet::new();
        let unique: Vec<CompleteRow> = complete
            .into_iter()
            .filter(|row| seen.insert(row.key()))
            .collect();

        if derive_total_sales {
            tracing::info!("D100: TotalSales column is empty, deriving Quantity * UnitPrice");
        }
        tracing::info!(
            "D100: {} raw rows, {} dropped for NULLs, {} duplicates dropped, {} kept",
            raw_count,
            raw_count - complete_count,
            complete_count - unique.len(),
            unique.len()
        );

        let records = unique.into_iter().map(CompleteRow::into_record).collect();
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values for the filter panel: every region, first and last order date
    pub fn filter_options(&self) -> FilterOptions {
        let regions: BTreeSet<&str> = self.records.iter().map(|r| r.region.as_str()).collect();
        let dates = self.records.iter().map(|r| r.order_date.date());

        FilterOptions {
            regions: regions.into_iter().map(str::to_string).collect(),
            min_date: dates.clone().min(),
            max_date: dates.max(),
        }
    }
}

/// Load and clean the `sales` table
pub async fn load_dataset(db: &DatabaseConnection) -> Result<SalesDataset> {
    let rows = repository::fetch_raw_rows(db).await?;
    Ok(SalesDataset::from_raw(rows))
}

/// Row with every retained column present
#[derive(Debug)]
struct CompleteRow {
    order_id: String,
    order_date: NaiveDateTime,
    region: String,
    product: String,
    category: String,
    quantity: f64,
    unit_price: f64,
    /// None only while TotalSales is being derived
    total_sales: Option<f64>,
    profit: f64,
}

/// Hashable identity of a row; floats compared bitwise
#[derive(Debug, PartialEq, Eq, Hash)]
struct RowKey {
    order_id: String,
    order_date: NaiveDateTime,
    region: String,
    product: String,
    category: String,
    numbers: [Option<u64>; 4],
}

impl CompleteRow {
    fn from_raw(row: RawSalesRow, derive_total_sales: bool) -> Option<Self> {
        let total_sales = if derive_total_sales {
            None
        } else {
            Some(row.total_sales?)
        };

        Some(Self {
            order_id: row.order_id?,
            order_date: row.order_date?,
            region: row.region.unwrap_or_else(|| UNKNOWN_REGION.to_string()),
            product: row.product?,
            category: row.category?,
            quantity: row.quantity?,
            unit_price: row.unit_price?,
            total_sales,
            profit: row.profit?,
        })
    }

    fn key(&self) -> RowKey {
        RowKey {
            order_id: self.order_id.clone(),
            order_date: self.order_date,
            region: self.region.clone(),
            product: self.product.clone(),
            category: self.category.clone(),
            numbers: [
                Some(float_bits(self.quantity)),
                Some(float_bits(self.unit_price)),
                self.total_sales.map(float_bits),
                Some(float_bits(self.profit)),
            ],
        }
    }

    fn into_record(self) -> SalesRecord {
        let total_sales = self
            .total_sales
            .unwrap_or(self.quantity * self.unit_price);

        SalesRecord {
            profit_margin: margin_percent(self.profit, total_sales),
            order_id: self.order_id,
            order_date: self.order_date,
            region: self.region,
            product: self.product,
            category: self.category,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_sales,
            profit: self.profit,
        }
    }
}

fn float_bits(value: f64) -> u64 {
    // 0.0 and -0.0 are the same value
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}
