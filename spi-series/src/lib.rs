//! Daily precipitation records and their calendar resampling.
//!
//! Records are parsed from CSV into [`observation::Observation`]s, cleaned by
//! [`preprocess`], folded into a [`time_series::TimeSeries`] and summed per
//! month, quarter or year by [`resample::resample`]. Column completeness of
//! the input is reported by [`profile::profile_columns`].

pub mod observation;
pub mod preprocess;
pub mod profile;
pub mod resample;
pub mod station;
pub mod time_series;
