// Application-level errors
use crate::infrastructure::report_csv::ReportError;

#[derive(Debug, thiserror::Error)]
pub enum TrendServiceError {
    #[error("asset not found: {0}")]
    AssetNotFound(String),

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),

    #[error(transparent)]
    Report(#[from] ReportError),
}
