//! Application error taxonomy.
//!
//! Every failure the dashboard can hit maps onto one of a handful of variants.
//! The binary turns them into exit codes; the TUI turns them into status-bar
//! messages and keeps running.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Missing credential, bad catalog, invalid selection, logging setup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport, HTTP status, authentication or unknown series id.
    #[error("Data provider error: {0}")]
    Provider(String),

    /// The provider answered but the series has no usable observations.
    #[error("No data available for {series_id}")]
    NoData { series_id: String },

    /// Shaped data that cannot be turned into a chart.
    #[error("Error creating chart: {0}")]
    Render(String),

    /// Local I/O (exports, terminal).
    #[error("{0}")]
    Io(String),
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    pub fn no_data(series_id: impl Into<String>) -> Self {
        Self::NoData {
            series_id: series_id.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) | AppError::Io(_) => 2,
            AppError::NoData { .. } => 3,
            AppError::Provider(_) => 4,
            AppError::Render(_) => 5,
        }
    }

    /// "No data" is an expected outcome, not a fault; callers log it at warn.
    pub fn is_no_data(&self) -> bool {
        matches!(self, AppError::NoData { .. })
    }
}
