//! Shared utility functions for SPI crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate};

    /// Date format used in input and result CSV files: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)?)
    }

    /// Last calendar day of the given month.
    pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
    }

    /// Last calendar day of the quarter containing `date`.
    /// Quarters end on Mar 31, Jun 30, Sep 30 and Dec 31.
    pub fn quarter_end(date: &NaiveDate) -> Option<NaiveDate> {
        let last_month = (date.month0() / 3) * 3 + 3;
        month_end(date.year(), last_month)
    }

    /// Dec 31 of the year containing `date`.
    pub fn year_end(date: &NaiveDate) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(date.year(), 12, 31)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_month_end() {
            assert_eq!(
                month_end(2023, 2),
                NaiveDate::from_ymd_opt(2023, 2, 28)
            );
            assert_eq!(
                month_end(2024, 2),
                NaiveDate::from_ymd_opt(2024, 2, 29)
            );
            assert_eq!(
                month_end(2022, 12),
                NaiveDate::from_ymd_opt(2022, 12, 31)
            );
            assert_eq!(month_end(2022, 13), None);
        }

        #[test]
        fn test_quarter_end() {
            let jan = NaiveDate::from_ymd_opt(2022, 1, 15).unwrap();
            assert_eq!(quarter_end(&jan), NaiveDate::from_ymd_opt(2022, 3, 31));

            let may = NaiveDate::from_ymd_opt(2022, 5, 1).unwrap();
            assert_eq!(quarter_end(&may), NaiveDate::from_ymd_opt(2022, 6, 30));

            let sep30 = NaiveDate::from_ymd_opt(2022, 9, 30).unwrap();
            assert_eq!(quarter_end(&sep30), NaiveDate::from_ymd_opt(2022, 9, 30));

            let oct1 = NaiveDate::from_ymd_opt(2022, 10, 1).unwrap();
            assert_eq!(quarter_end(&oct1), NaiveDate::from_ymd_opt(2022, 12, 31));
        }

        #[test]
        fn test_year_end() {
            let d = NaiveDate::from_ymd_opt(1999, 7, 4).unwrap();
            assert_eq!(year_end(&d), NaiveDate::from_ymd_opt(1999, 12, 31));
        }

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
            assert!(parse_date("20230615").is_err());
        }
    }
}

/// Number formatting helpers
pub mod numbers {
    /// Number of decimals SPI values are persisted and displayed with.
    pub const DISPLAY_DECIMALS: i32 = 2;

    /// Round `value` to `decimals` places, half away from zero.
    pub fn round_to(value: f64, decimals: i32) -> f64 {
        let factor = 10f64.powi(decimals);
        (value * factor).round() / factor
    }

    /// Round to the display precision used in result tables.
    pub fn round_display(value: f64) -> f64 {
        round_to(value, DISPLAY_DECIMALS)
    }

}
