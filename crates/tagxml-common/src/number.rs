//! Number text in the form project files store it.
//!
//! Writers emit integers as plain decimal. Floating point values with no
//! fractional part are also written as integers; everything else uses
//! scientific notation with a signed, at least two digit exponent
//! (`1.500000e-01`). Readers are lenient prefix parsers: leading whitespace is
//! skipped, parsing stops at the first character that cannot continue a
//! number, and text with no number at all reads as zero.

/// Significant digits after the decimal point for `f32` values.
pub const F32_PRECISION: usize = 6;

/// Significant digits after the decimal point for `f64` values.
pub const F64_PRECISION: usize = 16;

/// Format an `f32` value.
pub fn format_f32(value: f32) -> String {
    if value - (value as i64) as f32 == 0.0 {
        (value as i64).to_string()
    } else {
        format_exponent(value as f64, F32_PRECISION)
    }
}

/// Format an `f64` value.
pub fn format_f64(value: f64) -> String {
    if value - (value as i64) as f64 == 0.0 {
        (value as i64).to_string()
    } else {
        format_exponent(value, F64_PRECISION)
    }
}

/// Format a value in scientific notation with `precision` digits after the
/// decimal point.
pub fn format_exponent(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }

    let formatted = format!("{:.*e}", precision, value);
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };

    format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
}

/// Parse the leading integer of `text`, saturating on overflow.
pub fn parse_i64(text: &str) -> i64 {
    let bytes = text.as_bytes();
    let mut pos = skip_space(bytes, 0);

    let negative = match bytes.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    while let Some(digit) = bytes.get(pos).filter(|b| b.is_ascii_digit()) {
        let digit = (digit - b'0') as i64;
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
        pos += 1;
    }

    value
}

/// Parse the leading integer of `text` into 32 bits.
///
/// Out of range values keep their low 32 bits.
pub fn parse_i32(text: &str) -> i32 {
    parse_i64(text) as i32
}

/// Parse the leading floating point number of `text`.
pub fn parse_f64(text: &str) -> f64 {
    let bytes = text.as_bytes();
    let start = skip_space(bytes, 0);
    let mut pos = start;

    if matches!(bytes.get(pos), Some(b'-' | b'+')) {
        pos += 1;
    }

    let word = &text[pos..];
    if let Some(special) = parse_special(word) {
        return if bytes[start] == b'-' { -special } else { special };
    }

    let digits_start = pos;
    pos = skip_digits(bytes, pos);
    let mut mantissa_digits = pos - digits_start;

    if bytes.get(pos) == Some(&b'.') {
        let fraction_start = pos + 1;
        let fraction_end = skip_digits(bytes, fraction_start);
        mantissa_digits += fraction_end - fraction_start;
        pos = fraction_end;
    }

    if mantissa_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp_pos = pos + 1;
        if matches!(bytes.get(exp_pos), Some(b'-' | b'+')) {
            exp_pos += 1;
        }
        let exp_end = skip_digits(bytes, exp_pos);
        if exp_end > exp_pos {
            pos = exp_end;
        }
    }

    text[start..pos].parse().unwrap_or(0.0)
}

/// Parse the leading floating point number of `text` into 32 bits.
pub fn parse_f32(text: &str) -> f32 {
    parse_f64(text) as f32
}

fn parse_special(word: &str) -> Option<f64> {
    let prefix = |len: usize| word.get(..len).map(str::to_ascii_lowercase);

    if prefix(3).as_deref() == Some("nan") {
        Some(f64::NAN)
    } else if prefix(3).as_deref() == Some("inf") {
        Some(f64::INFINITY)
    } else {
        None
    }
}

#[inline]
fn skip_space(bytes: &[u8], mut pos: usize) -> usize {
    while matches!(bytes.get(pos), Some(b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)) {
        pos += 1;
    }
    pos
}

#[inline]
fn skip_digits(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_integral_floats() {
        assert_eq!(format_f32(3.0), "3");
        assert_eq!(format_f32(-0.0), "0");
        assert_eq!(format_f64(48000.0), "48000");
        assert_eq!(format_f64(-2.0), "-2");
    }

    #[test]
    fn test_format_fractional_floats() {
        assert_eq!(format_f32(0.5), "5.000000e-01");
        assert_eq!(format_f32(29.97), "2.997000e+01");
        assert_eq!(format_f64(0.25), "2.5000000000000000e-01");
        assert_eq!(format_f64(-1.5), "-1.5000000000000000e+00");
        assert_eq!(format_f64(1.5e-120), "1.5000000000000001e-120");
        assert_eq!(format_f64(1.5e-3), "1.5000000000000000e-03");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(format_f64(f64::NAN), "nan");
        assert_eq!(format_f64(f64::INFINITY), "inf");
        assert_eq!(format_f32(f32::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_parse_integers() {
        assert_eq!(parse_i64("42"), 42);
        assert_eq!(parse_i64("  -17xyz"), -17);
        assert_eq!(parse_i64("+8"), 8);
        assert_eq!(parse_i64("abc"), 0);
        assert_eq!(parse_i64(""), 0);
        assert_eq!(parse_i64("99999999999999999999999"), i64::MAX);
        assert_eq!(parse_i32("4294967297"), 1);
        assert_eq!(parse_i32("2.9"), 2);
    }

    #[test]
    fn test_parse_floats() {
        assert_eq!(parse_f64("2.5000000000000000e-01"), 0.25);
        assert_eq!(parse_f64("5.000000e-01"), 0.5);
        assert_eq!(parse_f64("  12abc"), 12.0);
        assert_eq!(parse_f64("-.5"), -0.5);
        assert_eq!(parse_f64("3."), 3.0);
        assert_eq!(parse_f64("1e"), 1.0);
        assert_eq!(parse_f64("1e+"), 1.0);
        assert_eq!(parse_f64("."), 0.0);
        assert_eq!(parse_f64("junk"), 0.0);
        assert_eq!(parse_f64("-inf"), f64::NEG_INFINITY);
        assert!(parse_f64("nan").is_nan());
        assert_eq!(parse_f32("2.997000e+01"), 29.97);
    }

    #[test]
    fn test_float_text_round_trip() {
        for value in [0.1f64, -3.25, 1.0 / 3.0, 6.02214076e23, 29.97] {
            assert_eq!(parse_f64(&format_f64(value)), value);
        }
        for value in [0.1f32, 23.976, -0.75] {
            assert_eq!(parse_f32(&format_f32(value)), value);
        }
    }
}
