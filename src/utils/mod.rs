pub mod constants;
pub mod progress;

pub use constants::*;
pub use progress::ProgressReporter;

/// Render a float the way layer files store it (`9.0`, `0.25`, `1e-7`)
pub fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float_keeps_decimal_point() {
        assert_eq!(format_float(9.0), "9.0");
        assert_eq!(format_float(0.25), "0.25");
        assert_eq!(format_float(0.0), "0.0");
    }
}
