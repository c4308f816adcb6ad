//! Amount parsing
//!
//! Balances and pool sizes reach us as JSON numbers, CLI strings or signed
//! database columns. Everything funnels through here so negatives are
//! rejected before the engine sees them.

use crate::constants::MAX_INPUT_DECIMALS;
use crate::error::{ShareError, ShareResult};

/// Parse a smallest-unit amount such as `"2500000000000"` or `"1_000_000"`.
pub fn parse_amount(raw: &str) -> ShareResult<u64> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(ShareError::invalid("amount is empty"));
    }

    let (negative, digits) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ShareError::invalid(format!("amount {:?} is not an integer", raw)));
    }

    if negative {
        // "-0" is still zero
        if cleaned.bytes().all(|b| b == b'0') {
            return Ok(0);
        }
        return Err(ShareError::invalid(format!("amount {} is negative", s)));
    }

    cleaned
        .parse::<u64>()
        .map_err(|_| ShareError::invalid(format!("amount {} exceeds u64::MAX", s)))
}

pub fn amount_from_signed(value: i128) -> ShareResult<u64> {
    if value < 0 {
        return Err(ShareError::invalid(format!("amount {} is negative", value)));
    }
    u64::try_from(value).map_err(|_| ShareError::invalid(format!("amount {} exceeds u64::MAX", value)))
}

pub fn decimals_from_signed(value: i64) -> ShareResult<u32> {
    if value < 0 {
        return Err(ShareError::invalid(format!("decimals {} is negative", value)));
    }
    if value > MAX_INPUT_DECIMALS as i64 {
        return Err(ShareError::invalid(format!(
            "decimals {} above maximum {}",
            value, MAX_INPUT_DECIMALS
        )));
    }
    Ok(value as u32)
}

/// Render a smallest-unit amount as a whole-token decimal string (display only).
pub fn format_units(amount: u64, decimals: u32) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let digits = amount.to_string();
    let d = decimals as usize;
    if digits.len() <= d {
        format!("0.{}{}", "0".repeat(d - digits.len()), digits)
    } else {
        let (whole, frac) = digits.split_at(digits.len() - d);
        format!("{}.{}", whole, frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_accepts_plain_and_separated() {
        assert_eq!(parse_amount("0").unwrap(), 0);
        assert_eq!(parse_amount(" 2500000000000 ").unwrap(), 2_500_000_000_000);
        assert_eq!(parse_amount("1_000_000").unwrap(), 1_000_000);
        assert_eq!(parse_amount("+42").unwrap(), 42);
        assert_eq!(parse_amount("-0").unwrap(), 0);
        assert_eq!(parse_amount("18446744073709551615").unwrap(), u64::MAX);
    }

    #[test]
    fn test_parse_amount_rejects_bad_input() {
        for bad in ["", "-1", "-500000", "1.5", "abc", "0x10", "18446744073709551616", "-", "_"] {
            let err = parse_amount(bad).unwrap_err();
            assert!(matches!(err, ShareError::InvalidArgument(_)), "{:?}", bad);
        }
    }

    #[test]
    fn test_signed_conversions() {
        assert_eq!(amount_from_signed(7).unwrap(), 7);
        assert!(amount_from_signed(-7).is_err());
        assert!(amount_from_signed(u64::MAX as i128 + 1).is_err());

        assert_eq!(decimals_from_signed(9).unwrap(), 9);
        assert!(decimals_from_signed(-1).is_err());
        assert!(decimals_from_signed(256).is_err());
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(87_719_298, 6), "87.719298");
        assert_eq!(format_units(5, 6), "0.000005");
        assert_eq!(format_units(1_000_000, 6), "1.000000");
        assert_eq!(format_units(42, 0), "42");
    }
}
