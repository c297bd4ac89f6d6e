use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use contracts::dashboards::d100_sales_overview::{
    FilterOptions, SalesOverviewRequest, SalesOverviewResponse,
};

use crate::dashboards::d100_sales_overview::{presentation, service};
use crate::routes::AppState;

const INDEX_HTML: &str = include_str!("../../../static/index.html");

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /api/d100/filters
pub async fn get_filter_options(State(state): State<AppState>) -> Json<FilterOptions> {
    Json(state.dataset.filter_options())
}

/// GET /api/d100/sales_overview?start_date=2024-01-01&end_date=2024-03-31&regions=North&regions=South
pub async fn get_sales_overview(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SalesOverviewResponse>, StatusCode> {
    let request = SalesOverviewRequest::from_query_pairs(pairs).map_err(|e| {
        tracing::warn!("D100 Dashboard: bad date in query: {}", e);
        StatusCode::BAD_REQUEST
    })?;
    let selection = request.into_selection();
    let overview = service::build_overview(&state.dataset, &selection);

    tracing::info!(
        "D100 Dashboard: {:?}..{:?}, {} region(s) -> {} table rows{}",
        selection.start_date,
        selection.end_date,
        selection.regions.len(),
        overview.recent_orders.len(),
        if overview.is_empty { " (no data)" } else { "" }
    );

    Ok(Json(presentation::into_response(overview)))
}
