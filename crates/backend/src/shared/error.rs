use thiserror::Error;

/// Startup failures of the dashboard
///
/// The aggregation pipeline never fails; everything here happens before
/// the HTTP listener is bound.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Column {column} holds a value of an unsupported type: {reason}")]
    UnsupportedColumn { column: String, reason: String },

    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
