use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sea_orm::prelude::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, QueryResult, RuntimeErr, Statement};

use crate::shared::error::{DashboardError, Result};

const SELECT_ALL_SALES: &str = "SELECT * FROM sales";

/// One row of the `sales` table as stored, every column nullable
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSalesRow {
    pub order_id: Option<String>,
    pub order_date: Option<NaiveDateTime>,
    pub region: Option<String>,
    pub product: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    /// None both for NULL and for a table without the column
    pub total_sales: Option<f64>,
    pub profit: Option<f64>,
}

/// Read the whole `sales` table
///
/// Fails when a non-null value has a column type none of the readers accept.
pub async fn fetch_raw_rows(db: &DatabaseConnection) -> Result<Vec<RawSalesRow>> {
    let stmt = Statement::from_string(db.get_database_backend(), SELECT_ALL_SALES.to_string());
    let rows = db.query_all(stmt).await?;

    tracing::info!("D100: fetched {} raw rows from sales", rows.len());

    rows.iter().map(read_row).collect()
}

fn read_row(row: &QueryResult) -> Result<RawSalesRow> {
    Ok(RawSalesRow {
        order_id: read_text(row, "OrderID")?,
        order_date: read_datetime(row, "OrderDate")?,
        region: read_text(row, "Region")?,
        product: read_text(row, "Product")?,
        category: read_text(row, "Category")?,
        quantity: read_number(row, "Quantity")?,
        unit_price: read_number(row, "UnitPrice")?,
        total_sales: read_number(row, "TotalSales")?,
        profit: read_number(row, "Profit")?,
    })
}

/// Decodes one column as a single SQL type; `Ok(None)` is SQL NULL
type Decoder<T> = fn(&QueryResult, &str) -> std::result::Result<Option<T>, DbErr>;

// Column readers try the native types of SQLite and Postgres in turn.
// NULL and a missing column read as None. Text that does not parse also
// reads as None and drops the row later.

fn read_text(row: &QueryResult, column: &str) -> Result<Option<String>> {
    read_with::<String>(
        row,
        column,
        &[
            |row, col| row.try_get::<Option<String>>("", col),
            |row, col| Ok(row.try_get::<Option<i64>>("", col)?.map(|v| v.to_string())),
            |row, col| Ok(row.try_get::<Option<i32>>("", col)?.map(|v| v.to_string())),
            |row, col| Ok(row.try_get::<Option<i16>>("", col)?.map(|v| v.to_string())),
        ],
    )
}

fn read_number(row: &QueryResult, column: &str) -> Result<Option<f64>> {
    read_with::<f64>(
        row,
        column,
        &[
            |row, col| row.try_get::<Option<f64>>("", col),
            |row, col| Ok(row.try_get::<Option<f32>>("", col)?.map(f64::from)),
            |row, col| Ok(row.try_get::<Option<i64>>("", col)?.map(|v| v as f64)),
            |row, col| Ok(row.try_get::<Option<i32>>("", col)?.map(f64::from)),
            |row, col| Ok(row.try_get::<Option<i16>>("", col)?.map(f64::from)),
            |row, col| {
                Ok(row
                    .try_get::<Option<Decimal>>("", col)?
                    .and_then(|v| v.to_string().parse().ok()))
            },
            |row, col| {
                Ok(row
                    .try_get::<Option<String>>("", col)?
                    .and_then(|v| v.trim().parse().ok()))
            },
        ],
    )
}

fn read_datetime(row: &QueryResult, column: &str) -> Result<Option<NaiveDateTime>> {
    read_with::<NaiveDateTime>(
        row,
        column,
        &[
            |row, col| row.try_get::<Option<NaiveDateTime>>("", col),
            |row, col| {
                Ok(row
                    .try_get::<Option<NaiveDate>>("", col)?
                    .and_then(|d| d.and_hms_opt(0, 0, 0)))
            },
            |row, col| {
                Ok(row
                    .try_get::<Option<DateTime<Utc>>>("", col)?
                    .map(|v| v.naive_utc()))
            },
            |row, col| {
                Ok(row
                    .try_get::<Option<String>>("", col)?
                    .and_then(|v| parse_datetime(&v)))
            },
        ],
    )
}

fn read_with<T>(row: &QueryResult, column: &str, decoders: &[Decoder<T>]) -> Result<Option<T>> {
    let mut last_error = None;
    for decode in decoders {
        match decode(row, column) {
            Ok(value) => return Ok(value),
            Err(e) if is_missing_column(&e) => return Ok(None),
            Err(e) => last_error = Some(e),
        }
    }

    Err(DashboardError::UnsupportedColumn {
        column: column.to_string(),
        reason: last_error.map(|e| e.to_string()).unwrap_or_default(),
    })
}

fn is_missing_column(err: &DbErr) -> bool {
    match err {
        DbErr::Query(RuntimeErr::SqlxError(e)) | DbErr::Exec(RuntimeErr::SqlxError(e)) => {
            matches!(e, sqlx::Error::ColumnNotFound(_))
        }
        _ => false,
    }
}

/// Parse an OrderDate stored as text; date-only values land on midnight
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    let value = value.trim();
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d100_sales_overview::test_support::memory_db;

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert_eq!(
            parse_datetime("2024-01-15 10:30:00"),
            Some(datetime(2024, 1, 15, 10, 30))
        );
        assert_eq!(
            parse_datetime("2024-01-15T10:30:00"),
            Some(datetime(2024, 1, 15, 10, 30))
        );
        assert_eq!(
            parse_datetime("2024-01-15 10:30:00.250"),
            Some(datetime(2024, 1, 15, 10, 30) + chrono::Duration::milliseconds(250))
        );
        assert_eq!(parse_datetime("2024-01-15"), Some(datetime(2024, 1, 15, 0, 0)));
        assert_eq!(parse_datetime("not a date"), None);
    }

    #[tokio::test]
    async fn test_fetch_raw_rows_reads_mixed_column_types() {
        let db = memory_db(&[
            r#"CREATE TABLE sales (
                "OrderID" INTEGER,
                "OrderDate" TEXT,
                "Region" TEXT,
                "Product" TEXT,
                "Category" TEXT,
                "Quantity" INTEGER,
                "UnitPrice" REAL,
                "TotalSales" REAL,
                "Profit" REAL
            )"#,
            r#"INSERT INTO sales VALUES
                (1, '2024-01-15 10:30:00', 'North', 'Widget', 'Tools', 2, 5.5, 11.0, 3.0),
                (2, '2024-02-01', NULL, 'Gadget', 'Toys', 1, 20.0, NULL, -1.5)"#,
        ])
        .await;

        let rows = fetch_raw_rows(&db).await.unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].order_id.as_deref(), Some("1"));
        assert_eq!(rows[0].order_date, Some(datetime(2024, 1, 15, 10, 30)));
        assert_eq!(rows[0].region.as_deref(), Some("North"));
        assert_eq!(rows[0].quantity, Some(2.0));
        assert_eq!(rows[0].unit_price, Some(5.5));
        assert_eq!(rows[0].total_sales, Some(11.0));

        assert_eq!(rows[1].order_date, Some(datetime(2024, 2, 1, 0, 0)));
        assert_eq!(rows[1].region, None);
        assert_eq!(rows[1].total_sales, None);
        assert_eq!(rows[1].profit, Some(-1.5));
    }

    #[tokio::test]
    async fn test_fetch_raw_rows_without_total_sales_column() {
        let db = memory_db(&[
            r#"CREATE TABLE sales (
                "OrderID" TEXT,
                "OrderDate" TEXT,
                "Region" TEXT,
                "Product" TEXT,
                "Category" TEXT,
                "Quantity" REAL,
                "UnitPrice" REAL,
                "Profit" REAL
            )"#,
            r#"INSERT INTO sales VALUES
                ('A-1', '2024-03-10 08:00:00', 'South', 'Widget', 'Tools', 3.0, 4.0, 2.0)"#,
        ])
        .await;

        let rows = fetch_raw_rows(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].order_id.as_deref(), Some("A-1"));
        assert_eq!(rows[0].total_sales, None);
        assert_eq!(rows[0].quantity, Some(3.0));
    }

    #[tokio::test]
    async fn test_fetch_raw_rows_fails_on_undecodable_value() {
        let db = memory_db(&[
            r#"CREATE TABLE sales (
                "OrderID" TEXT,
                "OrderDate" TEXT,
                "Region" TEXT,
                "Product" TEXT,
                "Category" TEXT,
                "Quantity" REAL,
                "UnitPrice" REAL,
                "TotalSales" REAL,
                "Profit" REAL
            )"#,
            r#"INSERT INTO sales VALUES
                ('A-1', '2024-03-10 08:00:00', 'South', 'Widget', 'Tools', X'0102', 4.0, 8.0, 2.0)"#,
        ])
        .await;

        match fetch_raw_rows(&db).await {
            Err(DashboardError::UnsupportedColumn { column, .. }) => assert_eq!(column, "Quantity"),
            other => panic!("expected UnsupportedColumn, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_raw_rows_fails_without_table() {
        let db = memory_db(&[]).await;
        assert!(fetch_raw_rows(&db).await.is_err());
    }
}
