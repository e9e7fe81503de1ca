/// Round a value to two decimal places.
///
/// Adds a tiny epsilon (half ULP at the target precision) before rounding to
/// avoid IEEE 754 binary-representation issues at exact midpoints.
/// Non-finite inputs pass through unchanged.
///
/// # Examples
///
/// ```
/// use covid_core::formatting::round2;
///
/// assert_eq!(round2(50.004), 50.0);
/// assert_eq!(round2(-20.005), -20.01);
/// assert!(round2(f64::INFINITY).is_infinite());
/// ```
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let negative = value < 0.0;
    let abs_value = value.abs();
    let epsilon = f64::EPSILON * abs_value * 100.0;
    let rounded = ((abs_value * 100.0) + epsilon).round() / 100.0;
    if negative {
        -rounded
    } else {
        rounded
    }
}

/// Percentage change from `from` to `to`, rounded to two decimals.
///
/// The division is deliberately unguarded: a zero baseline yields an
/// infinite or NaN result, which downstream rendering shows as-is instead of
/// masking it with a placeholder.
///
/// # Examples
///
/// ```
/// use covid_core::formatting::pct_change;
///
/// assert_eq!(pct_change(100.0, 150.0), 50.0);
/// assert_eq!(pct_change(150.0, 120.0), -20.0);
/// assert!(pct_change(0.0, 100.0).is_infinite());
/// ```
pub fn pct_change(from: f64, to: f64) -> f64 {
    round2((to - from) / from * 100.0)
}

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use covid_core::formatting::format_count;
///
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// assert_eq!(format_count(-9_876), "-9,876");
/// assert_eq!(format_count(0), "0");
/// ```
pub fn format_count(value: i64) -> String {
    let negative = value < 0;
    let grouped = group_thousands(&value.unsigned_abs().to_string());
    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── round2 ───────────────────────────────────────────────────────────────

    #[test]
    fn test_round2_basic() {
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(0.005), 0.01);
    }

    #[test]
    fn test_round2_negative() {
        assert_eq!(round2(-33.335), -33.34);
    }

    #[test]
    fn test_round2_already_exact() {
        assert_eq!(round2(50.0), 50.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_round2_non_finite_passthrough() {
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::NEG_INFINITY), f64::NEG_INFINITY);
    }

    // ── pct_change ───────────────────────────────────────────────────────────

    #[test]
    fn test_pct_change_increase() {
        assert_eq!(pct_change(100.0, 150.0), 50.0);
    }

    #[test]
    fn test_pct_change_decrease() {
        assert_eq!(pct_change(150.0, 120.0), -20.0);
    }

    #[test]
    fn test_pct_change_rounds_to_two_decimals() {
        assert_eq!(pct_change(3.0, 4.0), 33.33);
    }

    #[test]
    fn test_pct_change_zero_baseline_is_non_finite() {
        assert!(pct_change(0.0, 100.0).is_infinite());
        assert!(pct_change(0.0, 0.0).is_nan());
    }

    // ── format_count ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_count_small() {
        assert_eq!(format_count(5), "5");
        assert_eq!(format_count(999), "999");
    }

    #[test]
    fn test_format_count_thousands() {
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234), "1,234");
    }

    #[test]
    fn test_format_count_millions() {
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_count_negative() {
        assert_eq!(format_count(-9_876), "-9,876");
    }
}
