//! Cost of goods sold (HPP) estimate from inventory-related journal entries.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::label::extract_code;
use crate::models::JournalEntry;

const OPENING_KEYWORDS: [&str; 3] = ["persediaan awal", "saldo awal", "stok awal"];
const PURCHASE_KEYWORDS: [&str; 3] = ["pembelian", "beli udang", "beli bibit"];
const CLOSING_KEYWORDS: [&str; 3] = ["persediaan akhir", "stock opname", "penyesuaian persediaan"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Opening,
    Purchase,
    Closing,
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Description decides the bucket; the debit account decides whether the
/// entry counts at all.
fn classify(entry: &JournalEntry) -> Option<Bucket> {
    let description = entry.description.to_lowercase();
    let debit = entry.debit_label.to_lowercase();
    if contains_any(&description, &OPENING_KEYWORDS) {
        debit.contains("persediaan").then_some(Bucket::Opening)
    } else if contains_any(&description, &PURCHASE_KEYWORDS) {
        (debit.contains("persediaan") || debit.contains("pembelian")).then_some(Bucket::Purchase)
    } else if contains_any(&description, &CLOSING_KEYWORDS) {
        debit.contains("persediaan").then_some(Bucket::Closing)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CogsEstimate {
    pub opening_inventory: Decimal,
    pub purchases: Decimal,
    pub closing_inventory: Decimal,
    pub cost_of_goods_sold: Decimal,
    /// Purchase amounts keyed by the code of the debited account.
    pub purchases_by_code: BTreeMap<String, Decimal>,
}

/// `None` when there is neither opening inventory nor any purchase.
pub fn estimate_cogs(entries: &[JournalEntry]) -> Option<CogsEstimate> {
    let mut opening = Decimal::ZERO;
    let mut purchases = Decimal::ZERO;
    let mut closing = Decimal::ZERO;
    let mut purchases_by_code = BTreeMap::new();

    for entry in entries {
        let amount = entry.effective_amount();
        match classify(entry) {
            Some(Bucket::Opening) => opening += amount,
            Some(Bucket::Purchase) => {
                purchases += amount;
                *purchases_by_code
                    .entry(extract_code(&entry.debit_label))
                    .or_insert(Decimal::ZERO) += amount;
            }
            Some(Bucket::Closing) => closing += amount,
            None => {}
        }
    }

    if opening <= Decimal::ZERO && purchases <= Decimal::ZERO {
        return None;
    }

    Some(CogsEstimate {
        opening_inventory: opening,
        purchases,
        closing_inventory: closing,
        cost_of_goods_sold: opening + purchases - closing,
        purchases_by_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::journal::fixtures::entry;

    #[test]
    fn opening_plus_purchases_minus_closing() {
        let entries = vec![
            entry("2024-01-01", "Persediaan Udang (115)", "Modal Pemilik (301)", "Persediaan awal udang", "10000000"),
            entry("2024-01-05", "Persediaan Udang (115)", "Kas (101)", "Beli bibit vaname", "5000000"),
            entry("2024-01-31", "Persediaan Udang (115)", "HPP (510)", "Stock opname akhir bulan", "3000000"),
        ];
        let cogs = estimate_cogs(&entries).unwrap();
        assert_eq!(cogs.opening_inventory, Decimal::from(10_000_000));
        assert_eq!(cogs.purchases, Decimal::from(5_000_000));
        assert_eq!(cogs.closing_inventory, Decimal::from(3_000_000));
        assert_eq!(cogs.cost_of_goods_sold, Decimal::from(12_000_000));
        assert_eq!(cogs.purchases_by_code.get("115"), Some(&Decimal::from(5_000_000)));
    }

    #[test]
    fn first_matching_bucket_wins_even_when_account_check_fails() {
        // "saldo awal" claims the entry for opening; the Kas debit then
        // disqualifies it instead of falling through to the purchase bucket.
        let entries = vec![
            entry("2024-01-01", "Kas (101)", "Modal Pemilik (301)", "Saldo awal pembelian", "700"),
            entry("2024-01-02", "Pembelian Pakan (501)", "Kas (101)", "Pembelian pakan", "300"),
        ];
        let cogs = estimate_cogs(&entries).unwrap();
        assert_eq!(cogs.opening_inventory, Decimal::ZERO);
        assert_eq!(cogs.purchases, Decimal::from(300));
        assert_eq!(cogs.purchases_by_code.len(), 1);
        assert_eq!(cogs.purchases_by_code.get("501"), Some(&Decimal::from(300)));
    }

    #[test]
    fn purchases_need_an_inventory_or_purchase_account() {
        let entries = vec![entry("2024-01-02", "Peralatan Tambak (121)", "Kas (101)", "Pembelian kincir", "300")];
        assert!(estimate_cogs(&entries).is_none());
    }

    #[test]
    fn closing_alone_is_no_data() {
        let entries = vec![entry("2024-01-31", "Persediaan Udang (115)", "HPP (510)", "Persediaan akhir", "3000000")];
        assert!(estimate_cogs(&entries).is_none());
        assert!(estimate_cogs(&[]).is_none());
    }
}
