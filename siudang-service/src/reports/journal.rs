//! General journal (jurnal umum): every entry by date with both accounts split
//! into name and code.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::label::parse_label;
use crate::models::JournalEntry;

#[derive(Debug, Clone)]
pub struct GeneralJournalRow {
    pub date: NaiveDate,
    pub description: String,
    pub debit_name: String,
    pub debit_code: String,
    pub credit_name: String,
    pub credit_code: String,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct GeneralJournal {
    pub rows: Vec<GeneralJournalRow>,
    pub total_debit: Decimal,
    /// Every entry posts its amount once on each side.
    pub total_kredit: Decimal,
}

pub fn general_journal(entries: &[JournalEntry]) -> GeneralJournal {
    let mut ordered: Vec<&JournalEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.date);

    let rows: Vec<GeneralJournalRow> = ordered
        .into_iter()
        .map(|entry| {
            let debit = parse_label(&entry.debit_label);
            let credit = parse_label(&entry.credit_label);
            GeneralJournalRow {
                date: entry.date,
                description: entry.description.clone(),
                debit_name: debit.name,
                debit_code: debit.code,
                credit_name: credit.name,
                credit_code: credit.code,
                amount: entry.display_amount(),
            }
        })
        .collect();

    let total: Decimal = entries.iter().map(JournalEntry::effective_amount).sum();

    GeneralJournal {
        rows,
        total_debit: total,
        total_kredit: total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::journal::fixtures::entry;

    #[test]
    fn rows_are_split_and_sorted() {
        let entries = vec![
            entry("2024-02-01", "Kas (101)", "Pendapatan Penjualan (411)", "Jual", "300"),
            entry("2024-01-15", "Persediaan Udang (115)", "Kas (101)", "Beli udang", "200"),
        ];
        let journal = general_journal(&entries);
        assert_eq!(journal.rows[0].debit_name, "Persediaan Udang");
        assert_eq!(journal.rows[0].debit_code, "115");
        assert_eq!(journal.rows[1].credit_name, "Pendapatan Penjualan");
        assert_eq!(journal.total_debit, Decimal::from(500));
        assert_eq!(journal.total_kredit, journal.total_debit);
    }

    #[test]
    fn legacy_label_without_code_is_shown_whole() {
        let entries = vec![entry("2024-01-01", "Kas", "Modal Pemilik (301)", "x", "10")];
        let journal = general_journal(&entries);
        assert_eq!(journal.rows[0].debit_name, "Kas");
        assert_eq!(journal.rows[0].debit_code, "");
    }
}
