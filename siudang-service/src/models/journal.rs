//! Journal entry model for double-entry postings.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Side of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Debit,
    Credit,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "kredit",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One posted transaction: a single amount moved from the credit account to
/// the debit account. Accounts are referenced by label, `"<name> (<code>)"`.
#[derive(Debug, Clone, FromRow, Deserialize)]
pub struct JournalEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "tanggal")]
    #[sqlx(rename = "tanggal")]
    pub date: NaiveDate,
    #[serde(rename = "akun_debit")]
    #[sqlx(rename = "akun_debit")]
    pub debit_label: String,
    #[serde(rename = "akun_kredit")]
    #[sqlx(rename = "akun_kredit")]
    pub credit_label: String,
    #[serde(rename = "keterangan", default)]
    #[sqlx(rename = "keterangan")]
    pub description: String,
    /// Legacy rows may hold null or zero; such entries contribute nothing.
    #[serde(rename = "jumlah", default)]
    #[sqlx(rename = "jumlah")]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "super::timestamp::deserialize_optional")]
    pub created_at: Option<DateTime<Utc>>,
}

impl JournalEntry {
    /// Amount that participates in aggregation; missing or zero counts as nothing.
    pub fn effective_amount(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }

    /// Amount for display, `None` when the entry does not contribute.
    pub fn display_amount(&self) -> Option<Decimal> {
        self.amount.filter(|a| !a.is_zero())
    }
}

/// Input for posting a new journal entry.
#[derive(Debug, Clone, Serialize)]
pub struct PostJournalEntry {
    #[serde(rename = "tanggal")]
    pub date: NaiveDate,
    #[serde(rename = "akun_debit")]
    pub debit_label: String,
    #[serde(rename = "akun_kredit")]
    pub credit_label: String,
    #[serde(rename = "keterangan")]
    pub description: String,
    #[serde(rename = "jumlah")]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use std::str::FromStr;

    pub fn entry(date: &str, debit: &str, credit: &str, description: &str, amount: &str) -> JournalEntry {
        JournalEntry {
            id: None,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            debit_label: debit.to_string(),
            credit_label: credit.to_string(),
            description: description.to_string(),
            amount: Some(Decimal::from_str(amount).unwrap()),
            created_at: None,
        }
    }
}
