use thiserror::Error;
use tracing::error;

use crate::forecast::MIN_OBSERVED_MONTHS;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Malformed or missing source data
    #[error("Data error: {0}")]
    Data(String),

    /// Forecast requested on a series shorter than the model minimum
    #[error(
        "Insufficient data: forecasting needs at least {MIN_OBSERVED_MONTHS} observed months, got {0}"
    )]
    InsufficientData(usize),

    /// Error from the forecasting model
    #[error("Forecast error: {0}")]
    Forecast(String),

    /// Error from Polars DataFrame operations
    #[error("DataFrame error: {0}")]
    DataFrame(String),

    /// Error from Polars Series operations
    #[error("Series error: {0}")]
    Series(String),

    /// Error from period/date operations
    #[error("Period error: {0}")]
    Period(String),

    /// Error reading the source file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Implement From<polars::error::PolarsError> for ComputeError
impl From<polars::error::PolarsError> for ComputeError {
    fn from(error: polars::error::PolarsError) -> Self {
        let compute_error = match error {
            polars::error::PolarsError::NoData(_) => {
                let err = ComputeError::DataFrame(format!("No data: {}", error));
                error!(?err, "DataFrame error: No data");
                err
            }
            polars::error::PolarsError::ShapeMismatch(_) => {
                let err = ComputeError::DataFrame(format!("Shape mismatch: {}", error));
                error!(?err, "DataFrame error: Shape mismatch");
                err
            }
            polars::error::PolarsError::SchemaMismatch(_) => {
                let err = ComputeError::DataFrame(format!("Schema mismatch: {}", error));
                error!(?err, "DataFrame error: Schema mismatch");
                err
            }
            polars::error::PolarsError::ColumnNotFound(_) => {
                let err = ComputeError::DataFrame(format!("Column not found: {}", error));
                error!(?err, "DataFrame error: Column not found");
                err
            }
            polars::error::PolarsError::ComputeError(_) => {
                let err = ComputeError::DataFrame(format!("Compute error: {}", error));
                error!(?err, "DataFrame error: Compute error");
                err
            }
            polars::error::PolarsError::OutOfBounds(_) => {
                let err = ComputeError::DataFrame(format!("Out of bounds: {}", error));
                error!(?err, "DataFrame error: Out of bounds");
                err
            }
            _ => {
                let err = ComputeError::Series(format!("Series error: {}", error));
                error!(?err, "Series error");
                err
            }
        };
        compute_error
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
