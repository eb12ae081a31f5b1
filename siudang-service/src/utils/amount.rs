//! Parsing of amounts typed into journal forms, e.g. `Rp 1.500.000`.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Jumlah wajib diisi")]
    Empty,
    #[error("Format jumlah tidak valid")]
    Invalid,
    #[error("Jumlah harus lebih dari nol")]
    NotPositive,
}

/// Parse a rupiah amount. An `Rp` prefix and `.` thousands separators are
/// dropped; what remains must be a positive number.
pub fn parse_amount(input: &str) -> Result<Decimal, AmountError> {
    let trimmed = input.trim();
    let without_prefix = trimmed
        .strip_prefix("Rp")
        .or_else(|| trimmed.strip_prefix("rp"))
        .unwrap_or(trimmed);
    let digits: String = without_prefix.trim().replace('.', "");

    if digits.is_empty() {
        return Err(AmountError::Empty);
    }

    let amount = Decimal::from_str(&digits).map_err(|_| AmountError::Invalid)?;
    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive);
    }
    Ok(amount)
}
