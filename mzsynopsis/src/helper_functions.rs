use std::path::Path;

/// Helper function to check extensions in filenames
pub(crate) fn check_extension(filename: impl AsRef<Path>, extension: impl AsRef<Path>) -> bool {
    filename
        .as_ref()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension.as_ref()))
}

/// Round to the given number of digits after the decimal point
pub(crate) fn round_to_digits(value: f64, digits: u8) -> f64 {
    let factor = 10_f64.powi(i32::from(digits));
    (value * factor).round() / factor
}

/// Check if two masses are the same when rounded at the given number of digits
pub(crate) fn masses_equal(a: f64, b: f64, digits: u8) -> bool {
    round_to_digits((a - b).abs(), digits) == 0.0
}

/// Parse a floating point number that could be written as `Infinity`, which is replaced by the given sentinel
pub(crate) fn parse_float_or_infinity(text: &str, infinity: f64) -> Option<f64> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("infinity")
        || text.eq_ignore_ascii_case("+infinity")
        || text.eq_ignore_ascii_case("inf")
    {
        Some(infinity)
    } else {
        text.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn precision() {
        assert!(masses_equal(15.9949, 15.99491, 3));
        assert!(!masses_equal(15.9949, 15.9969, 3));
        assert!(masses_equal(57.021, 57.0214, 3));
    }

    #[test]
    fn infinity() {
        assert_eq!(parse_float_or_infinity("Infinity", 10.0), Some(10.0));
        assert_eq!(parse_float_or_infinity(" 0.25 ", 10.0), Some(0.25));
        assert_eq!(parse_float_or_infinity("abc", 10.0), None);
    }
}
