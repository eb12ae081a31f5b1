//! Period-end adjusting entries (jurnal penyesuaian).

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::depreciation::AssetSchedule;

/// How adjusting entries are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentMode {
    /// The three standing entries with fixed amounts.
    Fixed,
    /// Depreciation from the asset schedules plus configured accruals.
    Derived,
}

impl AdjustmentMode {
    /// Caption shown on the adjustments page.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fixed => "Nominal tetap",
            Self::Derived => "Dihitung dari buku pembantu dan akrual",
        }
    }
}

impl std::str::FromStr for AdjustmentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(AdjustmentMode::Fixed),
            "derived" => Ok(AdjustmentMode::Derived),
            _ => Err(format!("Invalid adjustment mode: {}", s)),
        }
    }
}

/// Period accruals that cannot be read off the journal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccrualInputs {
    pub accrued_wages: Decimal,
    pub supplies_used: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdjustingEntry {
    pub date: NaiveDate,
    pub description: &'static str,
    pub debit_code: &'static str,
    pub debit_name: &'static str,
    pub credit_code: &'static str,
    pub credit_name: &'static str,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct Adjustments {
    pub entries: Vec<AdjustingEntry>,
    pub total_debit: Decimal,
    pub total_kredit: Decimal,
}

struct StandingEntry {
    description: &'static str,
    debit_code: &'static str,
    debit_name: &'static str,
    credit_code: &'static str,
    credit_name: &'static str,
}

impl StandingEntry {
    fn entry(&self, date: NaiveDate, amount: Decimal) -> AdjustingEntry {
        AdjustingEntry {
            date,
            description: self.description,
            debit_code: self.debit_code,
            debit_name: self.debit_name,
            credit_code: self.credit_code,
            credit_name: self.credit_name,
            amount,
        }
    }
}

const DEPRECIATION: StandingEntry = StandingEntry {
    description: "Penyusutan Peralatan Tambak Bulan Ini",
    debit_code: "511",
    debit_name: "Beban Penyusutan Peralatan",
    credit_code: "114",
    credit_name: "Akumulasi Penyusutan Peralatan",
};

const ACCRUED_WAGES: StandingEntry = StandingEntry {
    description: "Beban Gaji yang Masih Harus Dibayar",
    debit_code: "512",
    debit_name: "Beban Gaji",
    credit_code: "211",
    credit_name: "Utang Gaji",
};

const SUPPLIES_USED: StandingEntry = StandingEntry {
    description: "Pemakaian Perlengkapan Tambak",
    debit_code: "513",
    debit_name: "Beban Perlengkapan",
    credit_code: "113",
    credit_name: "Perlengkapan",
};

/// The standing entries: 500.000 depreciation, 3.000.000 wages,
/// 750.000 supplies.
pub fn fixed_adjustments(date: NaiveDate) -> Vec<AdjustingEntry> {
    vec![
        DEPRECIATION.entry(date, Decimal::from(500_000)),
        ACCRUED_WAGES.entry(date, Decimal::from(3_000_000)),
        SUPPLIES_USED.entry(date, Decimal::from(750_000)),
    ]
}

/// One month of depreciation across all schedules, plus the accruals.
/// Zero amounts produce no entry.
pub fn derived_adjustments(
    date: NaiveDate,
    schedules: &[AssetSchedule],
    accruals: &AccrualInputs,
) -> Vec<AdjustingEntry> {
    let annual: Decimal = schedules.iter().map(|s| s.annual_charge).sum();
    let monthly = (annual / Decimal::from(12)).round_dp(2);

    [
        (&DEPRECIATION, monthly),
        (&ACCRUED_WAGES, accruals.accrued_wages),
        (&SUPPLIES_USED, accruals.supplies_used),
    ]
    .into_iter()
    .filter(|(_, amount)| *amount > Decimal::ZERO)
    .map(|(standing, amount)| standing.entry(date, amount))
    .collect()
}

impl Adjustments {
    pub fn new(entries: Vec<AdjustingEntry>) -> Self {
        let total: Decimal = entries.iter().map(|e| e.amount).sum();
        Self {
            entries,
            total_debit: total,
            total_kredit: total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Adjustments for the period ending `date`, or `None` when the journal is
/// empty or nothing needs adjusting.
pub fn generate_adjustments(
    mode: AdjustmentMode,
    date: NaiveDate,
    journal_is_empty: bool,
    schedules: &[AssetSchedule],
    accruals: &AccrualInputs,
) -> Option<Adjustments> {
    if journal_is_empty {
        return None;
    }
    let entries = match mode {
        AdjustmentMode::Fixed => fixed_adjustments(date),
        AdjustmentMode::Derived => derived_adjustments(date, schedules, accruals),
    };
    let adjustments = Adjustments::new(entries);
    (!adjustments.is_empty()).then_some(adjustments)
}
