//! Transformation of period sums into SPI values.
//!
//! The sums are floored, fitted with a gamma distribution, mapped through the
//! fitted CDF and then through the inverse standard-normal CDF.

use crate::error::SpiError;
use crate::gamma::{fit_gamma_mle, GammaParams};
use crate::spi::{SpiRecord, SpiSeries};
use log::debug;
use spi_series::time_series::{SeriesError, TimeSeries};
use statrs::distribution::{ContinuousCDF, Normal};

/// Value substituted for non-positive sums so the gamma fit stays defined.
pub const ZERO_FLOOR: f64 = 1e-15;

/// Minimum number of windowed periods an SPI series needs.
pub const MIN_PERIODS: usize = 2;

/// Probabilities are kept inside `[PROBABILITY_EPS, 1 - PROBABILITY_EPS]`
/// so the probit stays finite.
const PROBABILITY_EPS: f64 = f64::EPSILON;

/// Copy of `values` with every non-positive entry replaced by `floor`.
pub fn floor_non_positive(values: &[f64], floor: f64) -> Vec<f64> {
    values
        .iter()
        .map(|v| if *v <= 0.0 { floor } else { *v })
        .collect()
}

/// Map each value through the fitted gamma CDF and the standard-normal quantile.
pub fn standardize(values: &[f64], params: &GammaParams) -> Result<Vec<f64>, SpiError> {
    let gamma = params.distribution()?;
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| SpiError::FitDivergence(format!("standard normal: {}", e)))?;
    Ok(values
        .iter()
        .map(|x| {
            let p = gamma.cdf(*x).clamp(PROBABILITY_EPS, 1.0 - PROBABILITY_EPS);
            normal.inverse_cdf(p)
        })
        .collect())
}

/// Fit and standardize a sequence of period sums.
///
/// Returns the fitted parameters with one SPI value per input sum.
pub fn spi_values(sums: &[f64], floor: f64) -> Result<(GammaParams, Vec<f64>), SpiError> {
    if sums.len() < MIN_PERIODS {
        return Err(SpiError::InsufficientData {
            available: sums.len(),
            required: MIN_PERIODS,
        });
    }
    let floored = floor_non_positive(sums, floor);
    let params = fit_gamma_mle(&floored)?;
    debug!(
        "Fitted gamma shape={:.6} scale={:.6} over {} periods",
        params.shape,
        params.scale,
        floored.len()
    );
    let values = standardize(&floored, &params)?;
    Ok((params, values))
}

/// Compute the SPI series of a resampled series for a trailing window of
/// `window` periods.
///
/// The first `window - 1` periods are dropped. Fewer than two remaining
/// periods yield [`SpiError::InsufficientData`]; the input is not modified.
pub fn compute_spi(series: &TimeSeries, window: usize, floor: f64) -> Result<SpiSeries, SpiError> {
    if let Some(date) = series.first_missing() {
        return Err(SeriesError::MissingValue(date).into());
    }
    let windowed = series.rolling_sum(window);
    if windowed.len() < MIN_PERIODS {
        return Err(SpiError::InsufficientData {
            available: windowed.len(),
            required: MIN_PERIODS,
        });
    }
    let (_, values) = spi_values(&windowed.values(), floor)?;
    Ok(SpiSeries(
        windowed
            .0
            .iter()
            .zip(values)
            .map(|(period, value)| SpiRecord::new(period.date, value))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classification;
    use chrono::NaiveDate;
    use spi_utils::dates::month_end;

    fn monthly_series(values: &[f64]) -> TimeSeries {
        TimeSeries::from_pairs(values.iter().enumerate().map(|(i, v)| {
            let year = 2000 + (i / 12) as i32;
            let month = (i % 12) as u32 + 1;
            (month_end(year, month).unwrap(), *v)
        }))
    }

    /// Deterministic strictly positive "precipitation" with a seasonal cycle.
    fn synthetic(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let season = ((i % 12) as f64 / 12.0 * std::f64::consts::TAU).sin();
                let noise = ((i * 7919) % 97) as f64 / 97.0;
                40.0 + 25.0 * season + 30.0 * noise
            })
            .collect()
    }

    #[test]
    fn test_reference_scenario() {
        let sums = [10.0, 0.0, 45.0, 30.0, 5.0, 60.0, 25.0, 15.0, 50.0, 20.0, 35.0, 40.0];
        let spi = compute_spi(&monthly_series(&sums), 1, ZERO_FLOOR).unwrap();
        assert_eq!(spi.len(), 12);
        let values = spi.values();
        assert!(values.iter().all(|v| v.is_finite()));

        let min_idx = (0..12).min_by(|a, b| values[*a].total_cmp(&values[*b])).unwrap();
        let max_idx = (0..12).max_by(|a, b| values[*a].total_cmp(&values[*b])).unwrap();
        assert_eq!(min_idx, 1);
        assert_eq!(max_idx, 5);
        assert_eq!(spi.dates()[0], NaiveDate::from_ymd_opt(2000, 1, 31).unwrap());
    }

    #[test]
    fn test_length_for_each_window() {
        let series = monthly_series(&synthetic(36));
        for window in [1, 3, 12] {
            let spi = compute_spi(&series, window, ZERO_FLOOR).unwrap();
            assert_eq!(spi.len(), 36 - (window - 1));
            assert!(spi.values().iter().all(|v| v.is_finite()));
            assert_eq!(spi.dates().last(), series.dates().last());
        }
    }

    #[test]
    fn test_deterministic() {
        let series = monthly_series(&synthetic(48));
        let a = compute_spi(&series, 3, ZERO_FLOOR).unwrap();
        let b = compute_spi(&series, 3, ZERO_FLOOR).unwrap();
        let a_bits: Vec<u64> = a.values().iter().map(|v| v.to_bits()).collect();
        let b_bits: Vec<u64> = b.values().iter().map(|v| v.to_bits()).collect();
        assert_eq!(a_bits, b_bits);
    }

    #[test]
    fn test_scaling_preserves_order() {
        let base = synthetic(30);
        let scaled: Vec<f64> = base.iter().map(|v| v * 3.5).collect();
        let a = compute_spi(&monthly_series(&base), 1, ZERO_FLOOR).unwrap().values();
        let b = compute_spi(&monthly_series(&scaled), 1, ZERO_FLOOR).unwrap().values();
        for i in 0..a.len() {
            for j in 0..a.len() {
                if base[j] - base[i] > 1e-6 {
                    assert!(a[i] < a[j]);
                    assert!(b[i] < b[j]);
                }
            }
        }
    }

    #[test]
    fn test_single_windowed_value_is_insufficient() {
        let series = monthly_series(&[5.0, 7.0, 9.0]);
        assert_eq!(
            compute_spi(&series, 3, ZERO_FLOOR),
            Err(SpiError::InsufficientData {
                available: 1,
                required: 2
            })
        );
        assert!(matches!(
            compute_spi(&monthly_series(&[5.0]), 1, ZERO_FLOOR),
            Err(SpiError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_identical_sums_fail_to_fit() {
        let series = monthly_series(&[8.0; 6]);
        assert!(matches!(
            compute_spi(&series, 1, ZERO_FLOOR),
            Err(SpiError::FitDivergence(_))
        ));
    }

    #[test]
    fn test_missing_value_is_rejected() {
        let series = monthly_series(&[8.0, f64::NAN, 3.0]);
        assert!(matches!(
            compute_spi(&series, 1, ZERO_FLOOR),
            Err(SpiError::Series(_))
        ));
    }

    #[test]
    fn test_floor_does_not_touch_input() {
        let sums = vec![0.0, -1.0, 2.0];
        let floored = floor_non_positive(&sums, ZERO_FLOOR);
        assert_eq!(floored, vec![ZERO_FLOOR, ZERO_FLOOR, 2.0]);
        assert_eq!(sums, vec![0.0, -1.0, 2.0]);
    }

    #[test]
    fn test_zeros_do_not_break_fit() {
        let sums = [0.0, 0.0, 12.0, 3.0, 0.0, 7.5, 20.0];
        let (params, values) = spi_values(&sums, ZERO_FLOOR).unwrap();
        assert!(params.shape > 0.0);
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_classes_are_attached() {
        let spi = compute_spi(&monthly_series(&synthetic(24)), 1, ZERO_FLOOR).unwrap();
        assert!(spi
            .0
            .iter()
            .all(|r| r.class != Classification::OutOfRange));
    }
}
