use crate::classify::{classify, Classification};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use spi_utils::numbers::round_display;
use std::fmt;

/// Accumulation windows the pipeline computes, in periods of the resampled series.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Window {
    Monthly,
    Quarterly,
    Yearly,
}

impl Window {
    pub const ALL: [Window; 3] = [Window::Monthly, Window::Quarterly, Window::Yearly];

    /// Number of consecutive periods summed before the index is computed.
    pub fn periods(&self) -> usize {
        match self {
            Window::Monthly => 1,
            Window::Quarterly => 3,
            Window::Yearly => 12,
        }
    }

    /// Granularity name used in result file names.
    pub fn granularity(&self) -> &'static str {
        match self {
            Window::Monthly => "monthly",
            Window::Quarterly => "quarterly",
            Window::Yearly => "yearly",
        }
    }

    /// Column name, e.g. `SPI_3`.
    pub fn column(&self) -> String {
        format!("SPI_{}", self.periods())
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// One period of an SPI series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpiRecord {
    pub date: NaiveDate,
    /// Unrounded index value.
    pub value: f64,
    pub class: Classification,
}

impl SpiRecord {
    /// Build a record, classifying the value at display precision.
    pub fn new(date: NaiveDate, value: f64) -> Self {
        SpiRecord {
            date,
            value,
            class: classify(round_display(value)),
        }
    }
}

/// SPI values aligned with the periods of a (windowed) resampled series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpiSeries(pub Vec<SpiRecord>);

impl SpiSeries {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.0.iter().map(|r| r.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.0.iter().map(|r| r.date).collect()
    }

    /// Arithmetic mean of the values, `None` for an empty series.
    pub fn mean(&self) -> Option<f64> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0.iter().map(|r| r.value).sum::<f64>() / self.0.len() as f64)
    }

    /// Number of periods that fell between the classification intervals.
    pub fn out_of_range_count(&self) -> usize {
        self.0
            .iter()
            .filter(|r| r.class == Classification::OutOfRange)
            .count()
    }
}

/// The three series of one run: SPI_1, SPI_3 and SPI_12.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpiSet {
    pub spi_1: SpiSeries,
    pub spi_3: SpiSeries,
    pub spi_12: SpiSeries,
}

impl SpiSet {
    pub fn get(&self, window: Window) -> &SpiSeries {
        match window {
            Window::Monthly => &self.spi_1,
            Window::Quarterly => &self.spi_3,
            Window::Yearly => &self.spi_12,
        }
    }

    pub fn get_mut(&mut self, window: Window) -> &mut SpiSeries {
        match window {
            Window::Monthly => &mut self.spi_1,
            Window::Quarterly => &mut self.spi_3,
            Window::Yearly => &mut self.spi_12,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Window, &SpiSeries)> {
        Window::ALL.into_iter().map(move |w| (w, self.get(w)))
    }
}
