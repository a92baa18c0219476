//! FSN amount conversion between the major unit and its 18-decimal minor unit

use fsn_primitives::U256;
use thiserror::Error;

/// Decimals of the native FSN coin
pub const FSN_DECIMALS: usize = 18;

/// Amount parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitsError {
    /// Empty input
    #[error("empty amount")]
    Empty,
    /// Something other than digits and a single '.'
    #[error("invalid decimal amount: {0}")]
    InvalidDigit(String),
    /// More fractional digits than the unit supports
    #[error("amount has more than 18 decimal places")]
    TooManyDecimals,
    /// Does not fit into 256 bits
    #[error("amount overflows 256 bits")]
    Overflow,
}

/// Convert a decimal FSN amount (e.g. `"0.00003"`) into the minor unit
pub fn parse_fsn(amount: &str) -> Result<U256, UnitsError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(UnitsError::Empty);
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(UnitsError::InvalidDigit(amount.to_string()));
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return Err(UnitsError::InvalidDigit(amount.to_string()));
    }
    if fraction.len() > FSN_DECIMALS {
        return Err(UnitsError::TooManyDecimals);
    }

    let whole = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole).map_err(|_| UnitsError::Overflow)?
    };
    let fraction = format!("{:0<width$}", fraction, width = FSN_DECIMALS);
    let fraction = U256::from_dec_str(&fraction).map_err(|_| UnitsError::Overflow)?;

    whole
        .checked_mul(U256::exp10(FSN_DECIMALS))
        .and_then(|w| w.checked_add(fraction))
        .ok_or(UnitsError::Overflow)
}

/// Render a minor-unit amount as a decimal FSN string
pub fn format_fsn(value: U256) -> String {
    let unit = U256::exp10(FSN_DECIMALS);
    let whole = value / unit;
    let fraction = value % unit;
    if fraction.is_zero() {
        return whole.to_string();
    }
    let fraction = format!("{:0>width$}", fraction.to_string(), width = FSN_DECIMALS);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}
