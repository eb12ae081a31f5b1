//! Post-adjustment trial balance (neraca saldo setelah penyesuaian, NSSP).

use rust_decimal::Decimal;

use super::adjustments::AdjustingEntry;
use super::trial_balance::{trial_balance, TrialBalanceRow};
use crate::models::{Account, AccountType, JournalEntry};

#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedRow {
    pub code: String,
    pub name: String,
    pub account_type: String,
    pub debit: Decimal,
    pub kredit: Decimal,
    pub adjusted_debit: Decimal,
    pub adjusted_kredit: Decimal,
}

impl AdjustedRow {
    fn from_trial(row: TrialBalanceRow) -> Self {
        Self {
            adjusted_debit: row.total_debit,
            adjusted_kredit: row.total_kredit,
            debit: row.total_debit,
            kredit: row.total_kredit,
            code: row.code,
            name: row.name,
            account_type: row.account_type,
        }
    }

    pub fn parsed_type(&self) -> Option<AccountType> {
        AccountType::parse(&self.account_type)
    }

    /// Adjusted balance on the account's normal side.
    pub fn normal_balance(&self, account_type: AccountType) -> Decimal {
        if account_type.is_debit_normal() {
            self.adjusted_debit - self.adjusted_kredit
        } else {
            self.adjusted_kredit - self.adjusted_debit
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdjustedTrialBalance {
    pub rows: Vec<AdjustedRow>,
    pub total_debit: Decimal,
    pub total_kredit: Decimal,
    pub total_adjusted_debit: Decimal,
    pub total_adjusted_kredit: Decimal,
}

impl AdjustedTrialBalance {
    pub fn is_balanced(&self) -> bool {
        self.total_adjusted_debit == self.total_adjusted_kredit
    }
}

/// Trial balance with every adjusting entry added to the rows of its codes.
/// `None` when either the registry or the journal is empty.
pub fn adjusted_trial_balance(
    accounts: &[Account],
    entries: &[JournalEntry],
    adjustments: &[AdjustingEntry],
) -> Option<AdjustedTrialBalance> {
    if accounts.is_empty() || entries.is_empty() {
        return None;
    }

    let trial = trial_balance(accounts, entries);
    let mut rows: Vec<AdjustedRow> = trial.rows.into_iter().map(AdjustedRow::from_trial).collect();

    for adjustment in adjustments {
        if let Some(row) = rows.iter_mut().find(|r| r.code == adjustment.debit_code) {
            row.adjusted_debit += adjustment.amount;
        }
        if let Some(row) = rows.iter_mut().find(|r| r.code == adjustment.credit_code) {
            row.adjusted_kredit += adjustment.amount;
        }
    }

    Some(AdjustedTrialBalance {
        total_debit: trial.total_debit,
        total_kredit: trial.total_kredit,
        total_adjusted_debit: rows.iter().map(|r| r.adjusted_debit).sum(),
        total_adjusted_kredit: rows.iter().map(|r| r.adjusted_kredit).sum(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::journal::fixtures::entry;
    use crate::reports::adjustments::fixed_adjustments;
    use crate::reports::trial_balance::fixtures::{account, chart};
    use chrono::NaiveDate;

    fn adjustments() -> Vec<AdjustingEntry> {
        fixed_adjustments(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
    }

    fn row<'a>(tb: &'a AdjustedTrialBalance, code: &str) -> &'a AdjustedRow {
        tb.rows.iter().find(|r| r.code == code).unwrap()
    }

    #[test]
    fn adjustments_land_on_matching_codes() {
        let entries = vec![
            entry("2024-06-01", "Kas (101)", "Modal Pemilik (301)", "Setoran", "20000000"),
            entry("2024-06-02", "Perlengkapan (113)", "Kas (101)", "Beli pakan", "1000000"),
        ];
        let tb = adjusted_trial_balance(&chart(), &entries, &adjustments()).unwrap();

        assert_eq!(row(&tb, "511").adjusted_debit, Decimal::from(500_000));
        assert_eq!(row(&tb, "114").adjusted_kredit, Decimal::from(500_000));
        assert_eq!(row(&tb, "113").debit, Decimal::from(1_000_000));
        assert_eq!(row(&tb, "113").adjusted_kredit, Decimal::from(750_000));
        assert_eq!(tb.total_debit, Decimal::from(21_000_000));
        assert_eq!(tb.total_adjusted_debit, Decimal::from(25_250_000));
        assert!(tb.is_balanced());
    }

    #[test]
    fn adjustments_for_unregistered_codes_unbalance_the_result() {
        let accounts = vec![account("101", "Kas", "Aset"), account("301", "Modal Pemilik", "Modal")];
        let entries = vec![entry("2024-06-01", "Kas (101)", "Modal Pemilik (301)", "Setoran", "100")];
        let tb = adjusted_trial_balance(&accounts, &entries, &adjustments()).unwrap();
        assert_eq!(tb.total_adjusted_debit, Decimal::from(100));
        assert!(tb.is_balanced());

        let with_wages_only = vec![account("101", "Kas", "Aset"), account("512", "Beban Gaji", "Beban")];
        let tb = adjusted_trial_balance(&with_wages_only, &entries, &adjustments()).unwrap();
        assert!(!tb.is_balanced());
    }

    #[test]
    fn normal_balance_follows_account_type() {
        let entries = vec![entry("2024-06-01", "Kas (101)", "Modal Pemilik (301)", "Setoran", "100")];
        let tb = adjusted_trial_balance(&chart(), &entries, &[]).unwrap();
        assert_eq!(row(&tb, "101").normal_balance(AccountType::Asset), Decimal::from(100));
        assert_eq!(row(&tb, "301").normal_balance(AccountType::Equity), Decimal::from(100));
    }

    #[test]
    fn empty_journal_or_registry_is_no_data() {
        assert!(adjusted_trial_balance(&chart(), &[], &adjustments()).is_none());
        let entries = vec![entry("2024-06-01", "Kas (101)", "Modal Pemilik (301)", "Setoran", "100")];
        assert!(adjusted_trial_balance(&[], &entries, &adjustments()).is_none());
    }
}
