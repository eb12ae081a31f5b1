//! Display formatting for report pages.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// `Rp 1.500.000`; whole rupiah, ties to even.
pub fn rupiah(amount: Decimal) -> String {
    let rounded = amount.round_dp(0);
    let digits = rounded.abs().trunc().normalize().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("Rp -{}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

/// Like [`rupiah`], but `-` for a missing or zero amount.
pub fn rupiah_or_dash(amount: Option<Decimal>) -> String {
    match amount {
        Some(a) if !a.is_zero() => rupiah(a),
        _ => "-".to_string(),
    }
}

/// `Juni 2024`.
pub fn period_label(date: NaiveDate) -> String {
    format!("{} {}", MONTHS[date.month0() as usize], date.year())
}

pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(rupiah(Decimal::from(1_500_000)), "Rp 1.500.000");
        assert_eq!(rupiah(Decimal::from(750)), "Rp 750");
        assert_eq!(rupiah(Decimal::from(123_456_789)), "Rp 123.456.789");
        assert_eq!(rupiah(Decimal::ZERO), "Rp 0");
    }

    #[test]
    fn negatives_keep_sign_after_prefix() {
        assert_eq!(rupiah(Decimal::from(-500_000)), "Rp -500.000");
        assert_eq!(rupiah(Decimal::from_str("-0.4").unwrap()), "Rp 0");
    }

    #[test]
    fn rounds_half_to_even() {
        assert_eq!(rupiah(Decimal::from_str("2.5").unwrap()), "Rp 2");
        assert_eq!(rupiah(Decimal::from_str("3.5").unwrap()), "Rp 4");
        assert_eq!(rupiah(Decimal::from_str("316666.67").unwrap()), "Rp 316.667");
    }

    #[test]
    fn dash_for_missing_or_zero() {
        assert_eq!(rupiah_or_dash(None), "-");
        assert_eq!(rupiah_or_dash(Some(Decimal::ZERO)), "-");
        assert_eq!(rupiah_or_dash(Some(Decimal::from(1000))), "Rp 1.000");
    }

    #[test]
    fn indonesian_period_label() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(period_label(date), "Juni 2024");
        assert_eq!(iso_date(date), "2024-06-15");
    }
}
