//! Trial balance (neraca saldo): independent debit and credit sums per account
//! code over the whole journal.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::label::extract_code;
use crate::models::{Account, AccountType, JournalEntry};

#[derive(Debug, Clone, PartialEq)]
pub struct TrialBalanceRow {
    pub code: String,
    pub name: String,
    pub account_type: String,
    pub total_debit: Decimal,
    pub total_kredit: Decimal,
}

impl TrialBalanceRow {
    pub fn parsed_type(&self) -> Option<AccountType> {
        AccountType::parse(&self.account_type)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub total_debit: Decimal,
    pub total_kredit: Decimal,
}

impl TrialBalance {
    /// Exact equality, no tolerance.
    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_kredit
    }
}

/// One row per registered code, in registry order.
///
/// A code registered twice keeps its first position and the later row's
/// name and type.
pub(crate) fn registry_rows(accounts: &[Account]) -> (Vec<TrialBalanceRow>, HashMap<String, usize>) {
    let mut rows: Vec<TrialBalanceRow> = Vec::with_capacity(accounts.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(accounts.len());

    for account in accounts {
        let row = TrialBalanceRow {
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type.clone(),
            total_debit: Decimal::ZERO,
            total_kredit: Decimal::ZERO,
        };
        match index.get(&account.code) {
            Some(&position) => rows[position] = row,
            None => {
                index.insert(account.code.clone(), rows.len());
                rows.push(row);
            }
        }
    }

    (rows, index)
}

/// Sum every entry into the row of its debit code and its credit code.
/// Labels whose code is empty or unregistered are skipped.
pub fn trial_balance(accounts: &[Account], entries: &[JournalEntry]) -> TrialBalance {
    let (mut rows, index) = registry_rows(accounts);

    for entry in entries {
        let amount = entry.effective_amount();

        let debit_code = extract_code(&entry.debit_label);
        if let Some(&position) = index.get(&debit_code).filter(|_| !debit_code.is_empty()) {
            rows[position].total_debit += amount;
        }

        let credit_code = extract_code(&entry.credit_label);
        if let Some(&position) = index.get(&credit_code).filter(|_| !credit_code.is_empty()) {
            rows[position].total_kredit += amount;
        }
    }

    let total_debit = rows.iter().map(|r| r.total_debit).sum();
    let total_kredit = rows.iter().map(|r| r.total_kredit).sum();

    TrialBalance {
        rows,
        total_debit,
        total_kredit,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{account, chart};
    use super::*;
    use crate::models::journal::fixtures::entry;

    #[test]
    fn sums_by_code_in_registry_order() {
        let entries = vec![
            entry("2024-01-01", "Kas (101)", "Modal Pemilik (301)", "Setoran", "10000000"),
            entry("2024-01-02", "Peralatan Tambak (121)", "Kas (101)", "Beli kincir", "4000000"),
            entry("2024-01-03", "Kas (101)", "Pendapatan Penjualan Udang (411)", "Jual", "2500000"),
        ];
        let tb = trial_balance(&chart(), &entries);

        assert_eq!(tb.rows[0].code, "101");
        assert_eq!(tb.rows[0].total_debit, Decimal::from(12_500_000));
        assert_eq!(tb.rows[0].total_kredit, Decimal::from(4_000_000));
        assert_eq!(tb.total_debit, Decimal::from(16_500_000));
        assert!(tb.is_balanced());
    }

    #[test]
    fn unresolved_labels_are_excluded_and_unbalance_the_total() {
        let entries = vec![
            entry("2024-01-01", "Kas (101)", "Modal Pemilik", "tanpa kode", "100"),
            entry("2024-01-02", "Kas (101)", "Bank (999)", "kode asing", "50"),
        ];
        let tb = trial_balance(&chart(), &entries);
        assert_eq!(tb.total_debit, Decimal::from(150));
        assert_eq!(tb.total_kredit, Decimal::ZERO);
        assert!(!tb.is_balanced());
    }

    #[test]
    fn duplicate_code_keeps_first_position_and_last_name() {
        let accounts = vec![
            account("101", "Kas", "Aset"),
            account("102", "Bank", "Aset"),
            account("101", "Kas Kecil", "Aset"),
        ];
        let tb = trial_balance(&accounts, &[]);
        assert_eq!(tb.rows.len(), 2);
        assert_eq!(tb.rows[0].code, "101");
        assert_eq!(tb.rows[0].name, "Kas Kecil");
    }

    #[test]
    fn empty_code_account_never_matches_codeless_labels() {
        let accounts = vec![account("", "Tanpa Kode", "Aset")];
        let entries = vec![entry("2024-01-01", "Tanpa Kode", "Kas", "x", "10")];
        let tb = trial_balance(&accounts, &entries);
        assert_eq!(tb.total_debit, Decimal::ZERO);
    }
}
