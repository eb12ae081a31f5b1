//! Straight-line depreciation schedules (buku pembantu penyusutan) for fixed
//! asset accounts, recovered from purchase entries in the journal.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::label::extract_code;
use crate::models::{Account, JournalEntry};

/// Account-name keywords marking a fixed asset.
pub const ASSET_KEYWORDS: [&str; 6] = [
    "peralatan",
    "kendaraan",
    "bangunan",
    "mesin",
    "aset",
    "inventaris",
];

/// Description keywords marking an acquisition.
pub const PURCHASE_KEYWORDS: [&str; 3] = ["pembelian", "beli", "perolehan"];

/// Economic life and residual share for one asset class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepreciationPolicy {
    pub life_years: u32,
    /// Residual value as a percentage of cost.
    pub residual_percent: u32,
}

impl DepreciationPolicy {
    const VEHICLE: Self = Self { life_years: 5, residual_percent: 10 };
    const EQUIPMENT: Self = Self { life_years: 3, residual_percent: 5 };
    const BUILDING: Self = Self { life_years: 20, residual_percent: 20 };
    const DEFAULT: Self = Self { life_years: 5, residual_percent: 10 };

    /// First keyword that matches wins.
    pub fn for_asset(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("kendaraan") {
            Self::VEHICLE
        } else if name.contains("peralatan") {
            Self::EQUIPMENT
        } else if name.contains("bangunan") {
            Self::BUILDING
        } else {
            Self::DEFAULT
        }
    }

    pub fn residual(&self, cost: Decimal) -> Decimal {
        cost * Decimal::from(self.residual_percent) / Decimal::ONE_HUNDRED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Active,
    Inactive,
}

impl AssetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Aktif",
            Self::Inactive => "Nonaktif",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    pub year: u32,
    pub charge: Decimal,
    pub accumulated: Decimal,
    pub book_value: Decimal,
}

#[derive(Debug, Clone)]
pub struct AssetSchedule {
    pub code: String,
    pub name: String,
    pub acquired_on: NaiveDate,
    pub cost: Decimal,
    pub residual: Decimal,
    pub life_years: u32,
    pub annual_charge: Decimal,
    pub rows: Vec<ScheduleRow>,
    pub status: AssetStatus,
}

pub fn is_fixed_asset(account: &Account) -> bool {
    let name = account.name.to_lowercase();
    ASSET_KEYWORDS.iter().any(|k| name.contains(k))
}

fn is_purchase(entry: &JournalEntry) -> bool {
    let description = entry.description.to_lowercase();
    PURCHASE_KEYWORDS.iter().any(|k| description.contains(k))
}

/// Build a schedule for every fixed-asset account with a positive
/// acquisition cost.
///
/// An entry belongs to an asset when its description reads as a purchase and
/// the asset's code is the code of either label. Only debit-side amounts add
/// to cost; the acquisition date is the earliest matching entry.
pub fn depreciation_schedules(accounts: &[Account], entries: &[JournalEntry]) -> Vec<AssetSchedule> {
    let purchases: Vec<(String, String, &JournalEntry)> = entries
        .iter()
        .filter(|e| is_purchase(e))
        .map(|e| (extract_code(&e.debit_label), extract_code(&e.credit_label), e))
        .collect();

    accounts
        .iter()
        .filter(|a| is_fixed_asset(a) && !a.code.is_empty())
        .filter_map(|account| {
            let mut cost = Decimal::ZERO;
            let mut acquired_on: Option<NaiveDate> = None;

            for (debit_code, credit_code, entry) in &purchases {
                let on_debit = *debit_code == account.code;
                if !on_debit && *credit_code != account.code {
                    continue;
                }
                if on_debit {
                    cost += entry.effective_amount();
                }
                acquired_on = Some(acquired_on.map_or(entry.date, |d| d.min(entry.date)));
            }

            if cost <= Decimal::ZERO {
                return None;
            }
            acquired_on.map(|date| build_schedule(account, date, cost))
        })
        .collect()
}

fn build_schedule(account: &Account, acquired_on: NaiveDate, cost: Decimal) -> AssetSchedule {
    let policy = DepreciationPolicy::for_asset(&account.name);
    let residual = policy.residual(cost);
    let annual_charge = (cost - residual) / Decimal::from(policy.life_years);

    let mut accumulated = Decimal::ZERO;
    let rows: Vec<ScheduleRow> = (1..=policy.life_years)
        .map(|year| {
            accumulated += annual_charge;
            ScheduleRow {
                year,
                charge: annual_charge,
                accumulated,
                book_value: cost - accumulated,
            }
        })
        .collect();

    // Only the final year decides; compared at cent precision.
    let final_book = rows.last().map_or(cost, |r| r.book_value);
    let status = if final_book.round_dp(2) > residual.round_dp(2) {
        AssetStatus::Active
    } else {
        AssetStatus::Inactive
    };

    AssetSchedule {
        code: account.code.clone(),
        name: account.name.clone(),
        acquired_on,
        cost,
        residual,
        life_years: policy.life_years,
        annual_charge,
        rows,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::journal::fixtures::entry;
    use crate::reports::trial_balance::fixtures::{account, chart};

    #[test]
    fn policy_lookup_first_match_wins() {
        assert_eq!(DepreciationPolicy::for_asset("Kendaraan Pickup").life_years, 5);
        assert_eq!(DepreciationPolicy::for_asset("Peralatan Tambak").life_years, 3);
        assert_eq!(DepreciationPolicy::for_asset("Bangunan Gudang").life_years, 20);
        assert_eq!(DepreciationPolicy::for_asset("Mesin Pakan").residual_percent, 10);
        // vehicle keyword precedes equipment
        assert_eq!(
            DepreciationPolicy::for_asset("Peralatan Kendaraan"),
            DepreciationPolicy::for_asset("Kendaraan")
        );
    }

    #[test]
    fn equipment_schedule_accumulates_to_depreciable_base() {
        let entries = vec![
            entry("2024-03-01", "Peralatan Tambak (121)", "Kas (101)", "Pembelian kincir air", "6000000"),
            entry("2024-01-10", "Peralatan Tambak (121)", "Kas (101)", "Beli pompa", "3000000"),
            entry("2024-02-01", "Kas (101)", "Modal Pemilik (301)", "Setoran", "50000000"),
        ];
        let schedules = depreciation_schedules(&chart(), &entries);
        assert_eq!(schedules.len(), 1);

        let s = &schedules[0];
        assert_eq!(s.code, "121");
        assert_eq!(s.cost, Decimal::from(9_000_000));
        assert_eq!(s.residual, Decimal::from(450_000));
        assert_eq!(s.annual_charge, Decimal::from(2_850_000));
        assert_eq!(s.acquired_on, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(s.rows.len(), 3);

        let mut previous = Decimal::ZERO;
        for row in &s.rows {
            assert_eq!(row.accumulated, previous + s.annual_charge);
            assert_eq!(row.book_value, s.cost - row.accumulated);
            previous = row.accumulated;
        }
        assert_eq!(previous, s.cost - s.residual);
        assert_eq!(s.status, AssetStatus::Inactive);
    }

    #[test]
    fn non_terminating_charge_still_ends_inactive() {
        let accounts = vec![account("121", "Peralatan Tambak", "Aset")];
        let entries = vec![entry("2024-01-01", "Peralatan Tambak (121)", "Kas (101)", "Beli aerator", "1000000")];
        let s = &depreciation_schedules(&accounts, &entries)[0];
        let last = s.rows.last().unwrap();
        assert!((last.accumulated - (s.cost - s.residual)).abs() < Decimal::new(1, 6));
        assert_eq!(s.status, AssetStatus::Inactive);
    }

    #[test]
    fn code_must_match_exactly() {
        let accounts = vec![account("12", "Peralatan Kolam", "Aset")];
        let entries = vec![entry("2024-01-01", "Peralatan Tambak (121)", "Kas (101)", "Beli kincir", "500")];
        assert!(depreciation_schedules(&accounts, &entries).is_empty());
    }

    #[test]
    fn credit_only_purchases_produce_no_schedule() {
        let entries = vec![entry("2024-01-01", "Kas (101)", "Peralatan Tambak (121)", "Pembelian dibatalkan", "500")];
        assert!(depreciation_schedules(&chart(), &entries).is_empty());
    }

    #[test]
    fn non_purchase_descriptions_are_ignored() {
        let entries = vec![entry("2024-01-01", "Peralatan Tambak (121)", "Kas (101)", "Perbaikan kincir", "500")];
        assert!(depreciation_schedules(&chart(), &entries).is_empty());
    }
}
