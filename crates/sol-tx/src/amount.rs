//! Amount normalization.
//!
//! Users type decimal strings ("1.5"); the wire carries integer base units
//! (amount scaled by 10^decimals). Fractional digits beyond the token's
//! decimal count are truncated, never rounded.

use crate::error::TxError;

/// Convert a decimal-string amount into integer base units.
///
/// Rules:
/// - empty or whitespace-only input is zero;
/// - the integer part keeps ASCII digits only ("1,000" == "1000");
/// - the fractional part is truncated to `decimals` digits and right-padded
///   with zeros;
/// - anything that would exceed `u64::MAX` base units is rejected rather
///   than silently wrapped.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<u64, TxError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };

    let int_digits: String = int_part.chars().filter(|c| c.is_ascii_digit()).collect();

    if frac_part.chars().any(|c| !c.is_ascii_digit()) {
        return Err(TxError::InvalidAmount(format!(
            "non-digit in fractional part of '{trimmed}'"
        )));
    }

    // Truncate, never round.
    let mut frac_digits: String = frac_part.chars().take(decimals as usize).collect();
    while frac_digits.len() < decimals as usize {
        frac_digits.push('0');
    }

    let combined = format!("{int_digits}{frac_digits}");
    if combined.is_empty() || combined.chars().all(|c| c == '0') {
        return Ok(0);
    }

    let value: u128 = combined
        .parse()
        .map_err(|e| TxError::InvalidAmount(format!("'{trimmed}': {e}")))?;

    if value > u64::MAX as u128 {
        return Err(TxError::AmountOverflow(format!(
            "'{trimmed}' exceeds the maximum representable base-unit amount"
        )));
    }

    Ok(value as u64)
}

/// Encode a base-unit amount as exactly 8 little-endian bytes.
///
/// Values above `u64::MAX` are rejected, not wrapped via modular byte
/// extraction.
pub fn encode_u64_le(value: u128) -> Result<[u8; 8], TxError> {
    if value > u64::MAX as u128 {
        return Err(TxError::AmountOverflow(format!(
            "{value} does not fit in a u64"
        )));
    }
    Ok((value as u64).to_le_bytes())
}

/// Format base units back into a decimal string with trailing zeros trimmed.
/// Used for log lines and error copy, never for arithmetic.
pub fn format_base_units(units: u64, decimals: u8) -> String {
    if decimals == 0 {
        return units.to_string();
    }
    // Token decimals are bounded 0..=18, but the divisor must not overflow
    // for out-of-range input either. Past 10^19 every u64 value is purely
    // fractional.
    let Some(divisor) = 10u64.checked_pow(decimals as u32) else {
        let frac_str = format!("{units:0>width$}", width = decimals as usize);
        let trimmed = frac_str.trim_end_matches('0');
        return if trimmed.is_empty() {
            "0".to_string()
        } else {
            format!("0.{trimmed}")
        };
    };
    let whole = units / divisor;
    let frac = units % divisor;
    if frac == 0 {
        whole.to_string()
    } else {
        let frac_str = format!("{frac:0>width$}", width = decimals as usize);
        format!("{whole}.{}", frac_str.trim_end_matches('0'))
    }
}
