//! Chart-of-accounts model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::reports::label::format_label;

/// Account types following standard accounting categories, stored under
/// their Indonesian names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "Aset")]
    Asset,
    #[serde(rename = "Kewajiban")]
    Liability,
    #[serde(rename = "Modal")]
    Equity,
    #[serde(rename = "Pendapatan")]
    Revenue,
    #[serde(rename = "Beban")]
    Expense,
}

impl AccountType {
    pub const ALL: [AccountType; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// Get string representation for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "Aset",
            Self::Liability => "Kewajiban",
            Self::Equity => "Modal",
            Self::Revenue => "Pendapatan",
            Self::Expense => "Beban",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Asset and expense balances grow on the debit side.
    pub fn is_debit_normal(&self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registered account.
#[derive(Debug, Clone, FromRow, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "kode_akun")]
    #[sqlx(rename = "kode_akun")]
    pub code: String,
    #[serde(rename = "nama_akun")]
    #[sqlx(rename = "nama_akun")]
    pub name: String,
    #[serde(rename = "tipe_akun")]
    #[sqlx(rename = "tipe_akun")]
    pub account_type: String,
    #[serde(default, deserialize_with = "super::timestamp::deserialize_optional")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Get parsed account type; legacy rows may carry free text.
    pub fn parsed_type(&self) -> Option<AccountType> {
        AccountType::parse(&self.account_type)
    }

    /// Label used by journal entries to reference this account.
    pub fn label(&self) -> String {
        format_label(&self.name, &self.code)
    }
}

/// Input for registering a new account.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAccount {
    #[serde(rename = "kode_akun")]
    pub code: String,
    #[serde(rename = "nama_akun")]
    pub name: String,
    #[serde(rename = "tipe_akun")]
    pub account_type: AccountType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_type_names() {
        assert_eq!(AccountType::parse("Aset"), Some(AccountType::Asset));
        assert_eq!(AccountType::parse(" beban "), Some(AccountType::Expense));
        assert_eq!(AccountType::parse("Asset"), None);
    }

    #[test]
    fn label_embeds_code_in_parentheses() {
        let account = Account {
            id: Some(1),
            code: "101".to_string(),
            name: "Kas".to_string(),
            account_type: "Aset".to_string(),
            created_at: None,
        };
        assert_eq!(account.label(), "Kas (101)");
        assert_eq!(account.parsed_type(), Some(AccountType::Asset));
    }

    #[test]
    fn deserializes_hosted_row() {
        let row = serde_json::json!({
            "id": 7,
            "kode_akun": "411",
            "nama_akun": "Pendapatan Penjualan Udang",
            "tipe_akun": "Pendapatan",
            "created_at": "2024-05-01T10:00:00.123456+00:00"
        });
        let account: Account = serde_json::from_value(row).unwrap();
        assert_eq!(account.code, "411");
        assert_eq!(account.parsed_type(), Some(AccountType::Revenue));
        assert!(account.created_at.is_some());
    }
}
