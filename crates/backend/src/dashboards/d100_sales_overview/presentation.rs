use contracts::dashboards::d100_sales_overview::{
    ChartFigure, ChartKind, ChartPoint, DashboardFigures, SalesOverview, SalesOverviewResponse,
};

/// Turn pipeline output into chart-ready figures
pub fn present(overview: &SalesOverview) -> DashboardFigures {
    if overview.is_empty {
        return DashboardFigures {
            revenue_by_region: ChartFigure::no_data(ChartKind::Bar),
            trend_over_time: ChartFigure::no_data(ChartKind::Line),
            top_products: ChartFigure::no_data(ChartKind::HorizontalBar),
            profit_margin_by_category: ChartFigure::no_data(ChartKind::Bar),
        };
    }

    DashboardFigures {
        revenue_by_region: revenue_by_region(overview),
        trend_over_time: trend_over_time(overview),
        top_products: top_products(overview),
        profit_margin_by_category: profit_margin_by_category(overview),
    }
}

/// Full response of the overview endpoint
pub fn into_response(overview: SalesOverview) -> SalesOverviewResponse {
    let figures = present(&overview);
    SalesOverviewResponse {
        figures,
        table: overview.recent_orders,
        kpis: overview.kpis,
    }
}

fn figure(
    title: &str,
    kind: ChartKind,
    x_title: &str,
    y_title: &str,
    points: Vec<ChartPoint>,
) -> ChartFigure {
    ChartFigure {
        title: title.to_string(),
        kind,
        x_title: x_title.to_string(),
        y_title: y_title.to_string(),
        points,
        no_data: false,
    }
}

fn point(label: impl Into<String>, value: f64) -> ChartPoint {
    ChartPoint {
        label: label.into(),
        value,
        text: None,
    }
}

fn revenue_by_region(overview: &SalesOverview) -> ChartFigure {
    let points = overview
        .by_region
        .iter()
        .map(|r| point(r.region.as_str(), r.total_sales))
        .collect();
    figure("Revenue by Region", ChartKind::Bar, "Region", "Revenue", points)
}

fn trend_over_time(overview: &SalesOverview) -> ChartFigure {
    let points = overview
        .by_month
        .iter()
        .map(|m| point(m.month.format("%b %Y").to_string(), m.total_sales))
        .collect();
    figure(
        "Revenue Trend by Month",
        ChartKind::Line,
        "Month",
        "Revenue",
        points,
    )
}

/// Horizontal bars are drawn bottom-up, so the smallest product comes first
fn top_products(overview: &SalesOverview) -> ChartFigure {
    let points = overview
        .top_products
        .iter()
        .rev()
        .map(|p| point(p.product.as_str(), p.total_sales))
        .collect();
    figure(
        "Top 10 Products",
        ChartKind::HorizontalBar,
        "Revenue",
        "Product",
        points,
    )
}

fn profit_margin_by_category(overview: &SalesOverview) -> ChartFigure {
    let points = overview
        .by_category
        .iter()
        .map(|c| ChartPoint {
            label: c.category.clone(),
            value: c.profit_margin,
            text: Some(format!("{:.1}%", c.profit_margin)),
        })
        .collect();
    figure(
        "Profit Margin by Product Category",
        ChartKind::Bar,
        "Product Category",
        "Profit Margin (%)",
        points,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d100_sales_overview::service::build_overview;
    use crate::dashboards::d100_sales_overview::test_support::{dataset, date, record};
    use contracts::dashboards::d100_sales_overview::FilterSelection;

    fn overview() -> SalesOverview {
        build_overview(
            &dataset(vec![
                record("1", "2024-01-15", "North", "Widget", "Tools", 100.0, 20.0),
                record("2", "2024-02-20", "South", "Gadget", "Toys", 300.0, 100.0),
                record("3", "2024-02-21", "South", "Widget", "Tools", 50.0, 10.0),
            ]),
            &FilterSelection::default(),
        )
    }

    #[test]
    fn test_empty_overview_renders_no_data_figures() {
        let figures = present(&SalesOverview::empty());
        for figure in [
            &figures.revenue_by_region,
            &figures.trend_over_time,
            &figures.top_products,
            &figures.profit_margin_by_category,
        ] {
            assert!(figure.no_data);
            assert_eq!(figure.title, "No data");
            assert!(figure.points.is_empty());
        }
        assert_eq!(figures.trend_over_time.kind, ChartKind::Line);
    }

    #[test]
    fn test_region_and_trend_figures() {
        let figures = present(&overview());

        let region = &figures.revenue_by_region;
        assert_eq!(region.title, "Revenue by Region");
        assert!(!region.no_data);
        assert_eq!(region.points, vec![point("North", 100.0), point("South", 350.0)]);

        let trend = &figures.trend_over_time;
        assert_eq!(trend.kind, ChartKind::Line);
        let labels: Vec<&str> = trend.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan 2024", "Feb 2024"]);
        assert_eq!(trend.points[1].value, 350.0);
    }

    #[test]
    fn test_top_products_are_listed_smallest_first() {
        let figures = present(&overview());
        let labels: Vec<&str> = figures
            .top_products
            .points
            .iter()
            .map(|p| p.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Widget", "Gadget"]);
        assert_eq!(figures.top_products.kind, ChartKind::HorizontalBar);
    }

    #[test]
    fn test_category_margin_labels() {
        let figures = present(&overview());
        let texts: Vec<(&str, Option<&str>)> = figures
            .profit_margin_by_category
            .points
            .iter()
            .map(|p| (p.label.as_str(), p.text.as_deref()))
            .collect();
        assert_eq!(
            texts,
            vec![("Tools", Some("20.0%")), ("Toys", Some("33.3%"))]
        );
    }

    #[test]
    fn test_response_carries_table_and_kpis() {
        let response = into_response(overview());
        assert_eq!(response.table.len(), 3);
        assert_eq!(response.table[0].order_date.date(), date("2024-02-21"));
        assert_eq!(response.kpis.total_sales, "$450");
        assert_eq!(response.kpis.total_orders, "3");
        assert_eq!(response.kpis.profit_margin, "28.89%");
    }
}
