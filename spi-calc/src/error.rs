use spi_series::time_series::SeriesError;
use std::fmt;

/// Reasons an SPI series cannot be computed.
#[derive(Debug, Clone, PartialEq)]
pub enum SpiError {
    /// Too few periods remain after windowing.
    InsufficientData { available: usize, required: usize },
    /// The gamma likelihood has no usable maximum for this sample.
    FitDivergence(String),
    /// The input series violates a resampling precondition.
    Series(SeriesError),
}

impl fmt::Display for SpiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpiError::InsufficientData {
                available,
                required,
            } => write!(
                f,
                "insufficient data: {} usable periods, at least {} required",
                available, required
            ),
            SpiError::FitDivergence(reason) => write!(f, "gamma fit failed: {}", reason),
            SpiError::Series(e) => write!(f, "invalid series: {}", e),
        }
    }
}

impl std::error::Error for SpiError {}

impl From<SeriesError> for SpiError {
    fn from(value: SeriesError) -> Self {
        SpiError::Series(value)
    }
}
