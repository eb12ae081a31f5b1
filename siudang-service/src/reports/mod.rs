//! Derived bookkeeping reports. Every report is recomputed from the full
//! registry and journal on each request.

pub mod adjusted;
pub mod adjustments;
pub mod cogs;
pub mod depreciation;
pub mod journal;
pub mod label;
pub mod ledger;
pub mod statement;
pub mod trial_balance;

pub use adjusted::{adjusted_trial_balance, AdjustedRow, AdjustedTrialBalance};
pub use adjustments::{generate_adjustments, AccrualInputs, AdjustingEntry, AdjustmentMode, Adjustments};
pub use cogs::{estimate_cogs, CogsEstimate};
pub use depreciation::{depreciation_schedules, AssetSchedule, AssetStatus};
pub use journal::{general_journal, GeneralJournal};
pub use label::{extract_code, format_label, parse_label, ParsedLabel};
pub use ledger::{derive_ledger, LedgerLine, LedgerReport};
pub use statement::{financial_statement, FinancialStatement, StatementLine};
pub use trial_balance::{trial_balance, TrialBalance, TrialBalanceRow};
