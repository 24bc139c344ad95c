//! Utility functions for formatting numbers for display

/// Format `value` with `digits` significant digits, the way C's `%g` does
///
/// Fixed notation is used unless the decimal exponent is below -4 or at least `digits`, in
/// which case scientific notation with a signed, two digit exponent is used. Trailing zeros
/// are removed in both cases.
pub(crate) fn format_general(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0f64 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0f64 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    let digits = digits.max(1);

    // Rounding to the requested precision can carry into the next power of ten, so the
    // exponent is read back from the rounded scientific form
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => (scientific.clone(), 0),
    };

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(&mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_notation() {
        assert_eq!(format_general(5.0, 3), "5");
        assert_eq!(format_general(15.0, 3), "15");
        assert_eq!(format_general(-2.5, 3), "-2.5");
        assert_eq!(format_general(0.001234, 3), "0.00123");
        assert_eq!(format_general(123.456, 3), "123");
        assert_eq!(format_general(0.0, 3), "0");
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(format_general(12345.0, 3), "1.23e+04");
        assert_eq!(format_general(999.6, 3), "1e+03");
        assert_eq!(format_general(0.0000123, 3), "1.23e-05");
        assert_eq!(format_general(-1000.0, 3), "-1e+03");
    }

    #[test]
    fn non_finite() {
        assert_eq!(format_general(f64::NAN, 3), "nan");
        assert_eq!(format_general(f64::INFINITY, 3), "inf");
        assert_eq!(format_general(f64::NEG_INFINITY, 3), "-inf");
    }
}
