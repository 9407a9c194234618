//! Drought/wetness classes of SPI values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven ordered SPI states, wettest first.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpiState {
    ExtremelyWet,
    VeryWet,
    ModeratelyWet,
    ModerateConditions,
    ModerateDrought,
    SevereDrought,
    ExtremeDrought,
}

/// Closed intervals checked in order. The literal bounds leave slivers such
/// as (1.49, 1.5) uncovered.
pub const SPI_RANGES: [(SpiState, f64, f64); 7] = [
    (SpiState::ExtremelyWet, 2.0, f64::INFINITY),
    (SpiState::VeryWet, 1.5, 1.99),
    (SpiState::ModeratelyWet, 1.0, 1.49),
    (SpiState::ModerateConditions, -0.99, 0.99),
    (SpiState::ModerateDrought, -1.49, -1.0),
    (SpiState::SevereDrought, -1.99, -1.5),
    (SpiState::ExtremeDrought, f64::NEG_INFINITY, -2.0),
];

const OUT_OF_RANGE_LABEL: &str = "Out of range";

impl SpiState {
    pub fn label(&self) -> &'static str {
        match self {
            SpiState::ExtremelyWet => "Extremely wet",
            SpiState::VeryWet => "Very wet",
            SpiState::ModeratelyWet => "Moderately wet",
            SpiState::ModerateConditions => "Moderate conditions",
            SpiState::ModerateDrought => "Moderate drought",
            SpiState::SevereDrought => "Severe drought",
            SpiState::ExtremeDrought => "Extreme drought",
        }
    }
}

/// Result of classifying a value: one of the seven states, or the sentinel
/// for values that fall between the intervals (and NaN).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Classification {
    Labeled(SpiState),
    OutOfRange,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Labeled(state) => state.label(),
            Classification::OutOfRange => OUT_OF_RANGE_LABEL,
        }
    }

    pub fn state(&self) -> Option<SpiState> {
        match self {
            Classification::Labeled(state) => Some(*state),
            Classification::OutOfRange => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == OUT_OF_RANGE_LABEL {
            return Ok(Classification::OutOfRange);
        }
        SPI_RANGES
            .iter()
            .map(|(state, _, _)| *state)
            .find(|state| state.label() == s)
            .map(Classification::Labeled)
            .ok_or_else(|| format!("unknown SPI state: {}", s))
    }
}

/// Classify an SPI value against [`SPI_RANGES`].
pub fn classify(value: f64) -> Classification {
    SPI_RANGES
        .iter()
        .find(|(_, lower, upper)| *lower <= value && value <= *upper)
        .map(|(state, _, _)| Classification::Labeled(*state))
        .unwrap_or(Classification::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_interior_values() {
        assert_eq!(classify(2.5), Classification::Labeled(SpiState::ExtremelyWet));
        assert_eq!(classify(1.7), Classification::Labeled(SpiState::VeryWet));
        assert_eq!(classify(1.2), Classification::Labeled(SpiState::ModeratelyWet));
        assert_eq!(
            classify(0.0),
            Classification::Labeled(SpiState::ModerateConditions)
        );
        assert_eq!(
            classify(-1.2),
            Classification::Labeled(SpiState::ModerateDrought)
        );
        assert_eq!(classify(-1.7), Classification::Labeled(SpiState::SevereDrought));
        assert_eq!(
            classify(-2.5),
            Classification::Labeled(SpiState::ExtremeDrought)
        );
    }

    #[test]
    fn test_classify_boundaries_are_inclusive() {
        assert_eq!(classify(2.0), Classification::Labeled(SpiState::ExtremelyWet));
        assert_eq!(classify(1.99), Classification::Labeled(SpiState::VeryWet));
        assert_eq!(classify(1.0), Classification::Labeled(SpiState::ModeratelyWet));
        assert_eq!(
            classify(0.99),
            Classification::Labeled(SpiState::ModerateConditions)
        );
        assert_eq!(
            classify(-0.99),
            Classification::Labeled(SpiState::ModerateConditions)
        );
        assert_eq!(
            classify(-1.0),
            Classification::Labeled(SpiState::ModerateDrought)
        );
        assert_eq!(
            classify(-2.0),
            Classification::Labeled(SpiState::ExtremeDrought)
        );
    }

    #[test]
    fn test_classify_gaps_are_out_of_range() {
        assert_eq!(classify(1.495), Classification::OutOfRange);
        assert_eq!(classify(0.995), Classification::OutOfRange);
        assert_eq!(classify(-1.995), Classification::OutOfRange);
        assert_eq!(classify(f64::NAN), Classification::OutOfRange);
        assert_eq!(classify(f64::INFINITY), Classification::Labeled(SpiState::ExtremelyWet));
    }

    #[test]
    fn test_labels_round_trip() {
        for (state, _, _) in SPI_RANGES {
            let class = Classification::Labeled(state);
            assert_eq!(class.to_string().parse::<Classification>(), Ok(class));
        }
        assert_eq!(
            "Out of range".parse::<Classification>(),
            Ok(Classification::OutOfRange)
        );
        assert!("Soggy".parse::<Classification>().is_err());
        assert_eq!(classify(2.5).to_string(), "Extremely wet");
        assert_eq!(classify(1.495).state(), None);
    }
}
