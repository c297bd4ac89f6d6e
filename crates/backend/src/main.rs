#![allow(clippy::unnecessary_map_or)]

pub mod api;
pub mod dashboards;
pub mod routes;
pub mod shared;
pub mod system;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    use crate::dashboards::d100_sales_overview::dataset;
    use crate::shared::config::{self, DATABASE_URL_ENV};
    use crate::shared::data::db;

    // .env is optional; DATABASE_URL may come from the real environment
    let _ = dotenvy::dotenv();

    system::tracing::initialize()?;

    let config = config::load_config()?;
    let database_url =
        config::resolve_database_url(&config, std::env::var(DATABASE_URL_ENV).ok())?;

    // The dashboard must not start without a dataset: any error here is fatal
    let conn = db::initialize_database(&database_url).await?;
    let dataset = dataset::load_dataset(conn).await?;
    tracing::info!("Canonical dataset loaded: {} rows", dataset.len());

    let app = routes::configure_routes(routes::AppState::new(dataset));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Sales dashboard listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
