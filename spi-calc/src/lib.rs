//! Standardized Precipitation Index computation.
//!
//! Period sums are fitted with a two-parameter gamma distribution
//! ([`gamma`]), pushed through the fitted CDF and the standard-normal
//! quantile function ([`index`]) and bucketed into drought/wetness classes
//! ([`classify`]). [`pipeline`] runs this for windows of 1, 3 and 12 periods,
//! over a whole region or station by station.

pub mod classify;
pub mod error;
pub mod gamma;
pub mod index;
pub mod pipeline;
pub mod spi;
pub mod statistics;

pub use error::SpiError;
