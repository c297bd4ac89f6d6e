/// Formats a number with a comma between every three digits
///
/// # Examples
/// ```ignore
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Compacts a money amount into K/M bands: `$1.2M`, `$3.4K`, `$999`
///
/// The band is chosen on the absolute value; the sign stays inside the
/// number (`$-1.5M`).
pub fn compact_money(value: f64, prefix: &str) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{}{:.1}M", prefix, value / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{}{:.1}K", prefix, value / 1_000.0)
    } else {
        format!("{}{:.0}", prefix, value)
    }
}

/// Overall profit margin KPI: two decimals, or exactly `0%` without revenue
pub fn format_margin(total_profit: f64, total_sales: f64) -> String {
    if total_sales > 0.0 {
        format!("{:.2}%", total_profit / total_sales * 100.0)
    } else {
        "0%".to_string()
    }
}

/// Profit / sales * 100, zero when the ratio is undefined
pub fn margin_percent(profit: f64, sales: f64) -> f64 {
    let margin = profit / sales * 100.0;
    if margin.is_finite() {
        margin
    } else {
        0.0
    }
}
