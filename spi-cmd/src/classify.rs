//! Classification of a single SPI value.

use spi_calc::classify::classify;

/// Label of `value`, or the out-of-range sentinel when it falls between classes.
pub fn run_classify(value: f64) -> String {
    let class = classify(value);
    if class.state().is_none() {
        log::warn!("{} does not fall inside any SPI class", value);
    }
    class.to_string()
}
