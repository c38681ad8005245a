//! report::format — printf-style number formatting and PDF text encoding.
//!
//! Purpose
//! -------
//! Reproduce C/printf `%.Ng` formatting for the results page and encode
//! report strings for the standard Helvetica font.
//!
//! Key behaviors
//! -------------
//! - [`format_g`] rounds to `N` significant digits, uses scientific notation
//!   when the decimal exponent is `< -4` or `≥ N`, strips trailing zeros, and
//!   writes exponents with a sign and at least two digits (`1.235e+05`).
//! - [`win_ansi`] maps text to WinAnsi bytes: ASCII passes through, `±`
//!   becomes `0xB1`, the minus sign and en dash become `0x96`, the em dash
//!   `0x97`, anything else `?`.
use std::borrow::Cow;

/// Format `value` like printf's `%.{precision}g`.
pub fn format_g(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    let precision = precision.max(1);
    if value == 0.0 {
        return if value.is_sign_negative() { "-0".to_string() } else { "0".to_string() };
    }

    // Rounding to `precision` significant digits fixes the exponent.
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_trailing_zeros(mantissa), sign, exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value)).into_owned()
    }
}

/// Format `value` with a fixed number of decimals (`%.Nf`).
pub fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

fn strip_trailing_zeros(s: &str) -> Cow<'_, str> {
    if !s.contains('.') {
        return Cow::Borrowed(s);
    }
    Cow::Borrowed(s.trim_end_matches('0').trim_end_matches('.'))
}

/// Encode `text` for a Type 1 font with `WinAnsiEncoding`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '±' => 0xB1,
            '\u{2212}' | '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '²' => 0xB2,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Fixed versus scientific branches of `%g`.
    // - Trailing-zero stripping and exponent formatting.
    // - Special values and WinAnsi encoding.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Values in the fixed range print with `precision` significant digits
    // and no trailing zeros.
    fn format_g_fixed_branch() {
        assert_eq!(format_g(500.0, 4), "500");
        assert_eq!(format_g(1.0, 4), "1");
        assert_eq!(format_g(3.14159, 4), "3.142");
        assert_eq!(format_g(-0.5, 4), "-0.5");
        assert_eq!(format_g(0.0001234, 4), "0.0001234");
        assert_eq!(format_g(1234.0, 4), "1234");
        assert_eq!(format_g(0.0, 4), "0");
    }

    #[test]
    // Purpose
    // -------
    // Large and small magnitudes switch to scientific notation with a
    // signed, two-digit exponent.
    fn format_g_scientific_branch() {
        assert_eq!(format_g(123456.0, 4), "1.235e+05");
        assert_eq!(format_g(1e-5, 4), "1e-05");
        assert_eq!(format_g(-2.5e-7, 4), "-2.5e-07");
        assert_eq!(format_g(9999.6, 4), "1e+04");
        assert_eq!(format_g(1e100, 4), "1e+100");
    }

    #[test]
    // Purpose
    // -------
    // Non-finite values print as C does; `%.2f` keeps its decimals.
    fn format_special_values_and_fixed() {
        assert_eq!(format_g(f64::NAN, 4), "nan");
        assert_eq!(format_g(f64::NEG_INFINITY, 4), "-inf");
        assert_eq!(format_fixed(94.0, 2), "94.00");
        assert_eq!(format_fixed(0.12345, 3), "0.123");
    }

    #[test]
    // Purpose
    // -------
    // `±` and the typographic minus map into WinAnsi.
    fn win_ansi_maps_report_symbols() {
        assert_eq!(win_ansi("A = 1 ± 2"), b"A = 1 \xB1 2".to_vec());
        assert_eq!(win_ansi("Data\u{2212}Fit"), b"Data\x96Fit".to_vec());
        assert_eq!(win_ansi("a\u{2013}b\u{2014}c"), b"a\x96b\x97c".to_vec());
        assert_eq!(win_ansi("µ"), b"?".to_vec());
    }
}
