use chrono::{Datelike, NaiveDate, NaiveDateTime};
use contracts::dashboards::d100_sales_overview::{
    CategoryMargin, FilterSelection, Kpis, MonthlyRevenue, OrderRow, ProductRevenue,
    RegionRevenue, SalesOverview, SalesRecord,
};
use std::collections::{BTreeMap, HashSet};

use super::dataset::SalesDataset;
use crate::shared::format::{compact_money, format_margin, format_number, margin_percent};

pub const TOP_PRODUCTS_LIMIT: usize = 10;
pub const RECENT_ORDERS_LIMIT: usize = 100;

/// Build every dashboard output for one filter selection
///
/// Pure: the dataset is only read, and a selection matching nothing yields
/// `SalesOverview::empty()` instead of an error.
pub fn build_overview(dataset: &SalesDataset, selection: &FilterSelection) -> SalesOverview {
    let rows = filter_records(dataset, selection);

    if rows.is_empty() {
        return SalesOverview::empty();
    }

    SalesOverview {
        by_category: aggregate_by_category(&rows),
        by_region: aggregate_by_region(&rows),
        by_month: aggregate_by_month(&rows),
        top_products: top_products(&rows, TOP_PRODUCTS_LIMIT),
        recent_orders: recent_orders(&rows, RECENT_ORDERS_LIMIT),
        kpis: compute_kpis(&rows),
        is_empty: false,
    }
}

/// Rows matching the date range and region set, in dataset order
pub fn filter_records<'a>(
    dataset: &'a SalesDataset,
    selection: &FilterSelection,
) -> Vec<&'a SalesRecord> {
    let start = selection.start_date.and_then(start_of_day);
    // end date is inclusive: keep everything before the next midnight
    let end = selection
        .end_date
        .and_then(|d| d.succ_opt())
        .and_then(start_of_day);

    dataset
        .records()
        .iter()
        .filter(|r| start.map_or(true, |s| r.order_date >= s))
        .filter(|r| end.map_or(true, |e| r.order_date < e))
        .filter(|r| selection.regions.is_empty() || selection.regions.contains(&r.region))
        .collect()
}

fn start_of_day(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}

fn aggregate_by_category(rows: &[&SalesRecord]) -> Vec<CategoryMargin> {
    let mut groups: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(row.category.as_str()).or_insert((0.0, 0.0));
        entry.0 += row.total_sales;
        entry.1 += row.profit;
    }

    groups
        .into_iter()
        .map(|(category, (total_sales, profit))| CategoryMargin {
            category: category.to_string(),
            total_sales,
            profit,
            profit_margin: margin_percent(profit, total_sales),
        })
        .collect()
}

fn aggregate_by_region(rows: &[&SalesRecord]) -> Vec<RegionRevenue> {
    sum_sales_by(rows, |r| r.region.as_str())
        .into_iter()
        .map(|(region, total_sales)| RegionRevenue {
            region: region.to_string(),
            total_sales,
        })
        .collect()
}

/// Monthly buckets keyed by the first day of the month; empty months are absent
fn aggregate_by_month(rows: &[&SalesRecord]) -> Vec<MonthlyRevenue> {
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in rows {
        let day = row.order_date.date();
        let month = day.with_day(1).unwrap_or(day);
        *buckets.entry(month).or_insert(0.0) += row.total_sales;
    }

    buckets
        .into_iter()
        .map(|(month, total_sales)| MonthlyRevenue { month, total_sales })
        .collect()
}

/// Products with the largest revenue, largest first
///
/// Equal revenues keep product name order, so the cut at `limit` is
/// deterministic.
fn top_products(rows: &[&SalesRecord], limit: usize) -> Vec<ProductRevenue> {
    let mut products: Vec<ProductRevenue> = sum_sales_by(rows, |r| r.product.as_str())
        .into_iter()
        .map(|(product, total_sales)| ProductRevenue {
            product: product.to_string(),
            total_sales,
        })
        .collect();

    // stable sort: ties stay in name order
    products.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
    products.truncate(limit);
    products
}

fn sum_sales_by<'a>(
    rows: &[&'a SalesRecord],
    key: impl Fn(&'a SalesRecord) -> &'a str,
) -> BTreeMap<&'a str, f64> {
    let mut groups = BTreeMap::new();
    for row in rows {
        *groups.entry(key(*row)).or_insert(0.0) += row.total_sales;
    }
    groups
}

fn compute_kpis(rows: &[&SalesRecord]) -> Kpis {
    let total_sales: f64 = rows.iter().map(|r| r.total_sales).sum();
    let total_profit: f64 = rows.iter().map(|r| r.profit).sum();
    let orders: HashSet<&str> = rows.iter().map(|r| r.order_id.as_str()).collect();

    Kpis {
        total_sales: compact_money(total_sales, "$"),
        total_orders: format_number(orders.len()),
        total_profit: compact_money(total_profit, "$"),
        profit_margin: format_margin(total_profit, total_sales),
    }
}

/// Newest orders first; rows with the same timestamp keep dataset order
fn recent_orders(rows: &[&SalesRecord], limit: usize) -> Vec<OrderRow> {
    let mut sorted: Vec<&SalesRecord> = rows.to_vec();
    sorted.sort_by(|a, b| b.order_date.cmp(&a.order_date));
    sorted
        .into_iter()
        .take(limit)
        .map(OrderRow::from)
        .collect()
}
