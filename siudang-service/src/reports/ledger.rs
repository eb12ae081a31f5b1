//! General ledger (buku besar): running balances per account label.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{JournalEntry, Side};

/// One side of one journal entry as it lands in an account.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerLine {
    pub date: NaiveDate,
    pub description: String,
    pub account: String,
    pub side: Side,
    /// `None` for entries without a contributing amount.
    pub amount: Option<Decimal>,
    pub running_balance: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct LedgerReport {
    pub lines: Vec<LedgerLine>,
    pub total_debit: Decimal,
    pub total_kredit: Decimal,
    pub final_balance: Decimal,
}

impl LedgerReport {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Derive ledger lines for `filter` (an exact label), or for every account
/// when the filter is absent or empty.
///
/// Entries are stably sorted by date, so same-day entries keep the order the
/// store returned them in. Debit adds to the label's balance, credit subtracts.
pub fn derive_ledger(entries: &[JournalEntry], filter: Option<&str>) -> LedgerReport {
    let filter = filter.filter(|f| !f.is_empty());

    let mut ordered: Vec<&JournalEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.date);

    let mut balances: HashMap<&str, Decimal> = HashMap::new();
    let mut report = LedgerReport::default();

    for entry in ordered {
        let amount = entry.effective_amount();
        let sides = [
            (Side::Debit, entry.debit_label.as_str(), amount),
            (Side::Credit, entry.credit_label.as_str(), -amount),
        ];

        for (side, label, delta) in sides {
            if filter.is_some_and(|f| f != label) {
                continue;
            }
            let balance = balances.entry(label).or_insert(Decimal::ZERO);
            *balance += delta;

            match side {
                Side::Debit => report.total_debit += amount,
                Side::Credit => report.total_kredit += amount,
            }

            report.lines.push(LedgerLine {
                date: entry.date,
                description: entry.description.clone(),
                account: label.to_string(),
                side,
                amount: entry.display_amount(),
                running_balance: *balance,
            });
        }
    }

    report.final_balance = match filter.and_then(|f| balances.get(f)) {
        Some(balance) => *balance,
        None => report.total_debit - report.total_kredit,
    };

    report
}
