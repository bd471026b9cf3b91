//! Weight rounding.
//!
//! Weights are rounded to a fixed number of decimal places through decimal
//! formatting, so the serialized value is exactly the nearest double to the
//! rounded decimal and re-parsing the output reproduces it.

/// Round a weight to `places` decimal places.
pub fn round_weight(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", places as usize, value)
        .parse()
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_places() {
        assert_eq!(round_weight(0.123456789, 3), 0.123);
        assert_eq!(round_weight(0.987654321, 4), 0.9877);
        assert_eq!(round_weight(2.0, 0), 2.0);
    }

    #[test]
    fn test_tiny_values_flush_to_zero() {
        assert_eq!(round_weight(1e-20, 17), 0.0);
        assert_eq!(round_weight(4.2e-18, 17), 0.0);
        assert_eq!(round_weight(6.0e-17, 17), 6.0e-17);
    }

    #[test]
    fn test_full_precision_is_stable() {
        let v = 0.1 + 0.2;
        assert_eq!(round_weight(v, 17), v);
        assert_eq!(round_weight(v, 15), 0.3);
    }

    #[test]
    fn test_idempotent() {
        for v in [0.333333333333, 0.0001234, 0.5, 0.999999999] {
            let once = round_weight(v, 6);
            assert_eq!(round_weight(once, 6), once);
        }
    }

    #[test]
    fn test_non_finite_passthrough() {
        assert!(round_weight(f64::NAN, 5).is_nan());
        assert_eq!(round_weight(f64::INFINITY, 5), f64::INFINITY);
    }

    #[test]
    fn test_serialized_form_reparses_exactly() {
        let w = round_weight(0.0123456789012345678, 17);
        let json = serde_json::to_string(&w).unwrap();
        let back: f64 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, w);
        assert!(!json.contains('e') && !json.contains('E'));
    }
}
