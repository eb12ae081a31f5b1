//! Report pages. Every page re-reads the books and derives its figures on
//! the spot; a store failure renders the page empty with a message.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{load_books, store_failure};
use crate::models::{Account, AuthUser, JournalEntry, Side};
use crate::reports::{
    adjusted_trial_balance, depreciation_schedules, derive_ledger, estimate_cogs,
    financial_statement, generate_adjustments, trial_balance, Adjustments, AssetStatus,
    StatementLine,
};
use crate::utils::format::{iso_date, period_label, rupiah, rupiah_or_dash};
use crate::AppState;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Adjustments under the configured policy, dated today.
fn adjustments_for(state: &AppState, accounts: &[Account], entries: &[JournalEntry]) -> Option<Adjustments> {
    let schedules = depreciation_schedules(accounts, entries);
    generate_adjustments(
        state.config.adjustments.mode,
        today(),
        entries.is_empty(),
        &schedules,
        &state.config.adjustments.accruals(),
    )
}

// Buku besar

#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    #[serde(default)]
    pub akun: Option<String>,
}

pub struct LedgerOption {
    pub label: String,
    pub selected: bool,
}

pub struct LedgerLineView {
    pub date: String,
    pub description: String,
    pub account: String,
    pub debit: String,
    pub kredit: String,
    pub balance: String,
}

#[derive(Template)]
#[template(path = "ledger.html")]
pub struct LedgerTemplate {
    pub options: Vec<LedgerOption>,
    pub selected: String,
    pub lines: Vec<LedgerLineView>,
    pub total_debit: String,
    pub total_kredit: String,
    pub final_balance: String,
    pub message: Option<String>,
    pub current_page: &'static str,
}

impl LedgerTemplate {
    fn new(accounts: &[Account], entries: &[JournalEntry], filter: &str, message: Option<String>) -> Self {
        let report = derive_ledger(entries, Some(filter));
        let lines = report
            .lines
            .iter()
            .map(|line| {
                let (debit, kredit) = match line.side {
                    Side::Debit => (rupiah_or_dash(line.amount), "-".to_string()),
                    Side::Credit => ("-".to_string(), rupiah_or_dash(line.amount)),
                };
                LedgerLineView {
                    date: iso_date(line.date),
                    description: line.description.clone(),
                    account: line.account.clone(),
                    debit,
                    kredit,
                    balance: rupiah(line.running_balance),
                }
            })
            .collect();

        Self {
            options: accounts
                .iter()
                .map(|a| {
                    let label = a.label();
                    LedgerOption {
                        selected: label == filter,
                        label,
                    }
                })
                .collect(),
            selected: filter.to_string(),
            lines,
            total_debit: rupiah(report.total_debit),
            total_kredit: rupiah(report.total_kredit),
            final_balance: rupiah(report.final_balance),
            message,
            current_page: "buku_besar",
        }
    }
}

pub async fn ledger_page(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<LedgerQuery>,
) -> impl IntoResponse {
    let filter = query.akun.unwrap_or_default();
    match load_books(&state).await {
        Ok((accounts, entries)) => LedgerTemplate::new(&accounts, &entries, &filter, None),
        Err(e) => LedgerTemplate::new(&[], &[], &filter, Some(store_failure("buku_besar", &e))),
    }
}

// Neraca saldo

pub struct TrialBalanceView {
    pub code: String,
    pub name: String,
    pub account_type: String,
    pub debit: String,
    pub kredit: String,
}

#[derive(Template)]
#[template(path = "trial_balance.html")]
pub struct TrialBalanceTemplate {
    pub rows: Vec<TrialBalanceView>,
    pub total_debit: String,
    pub total_kredit: String,
    pub balanced: bool,
    pub message: Option<String>,
    pub current_page: &'static str,
}

impl TrialBalanceTemplate {
    fn new(accounts: &[Account], entries: &[JournalEntry], message: Option<String>) -> Self {
        // No postings, nothing to balance.
        let accounts = if entries.is_empty() { &[][..] } else { accounts };
        let report = trial_balance(accounts, entries);
        Self {
            rows: report
                .rows
                .iter()
                .map(|row| TrialBalanceView {
                    code: row.code.clone(),
                    name: row.name.clone(),
                    account_type: row.account_type.clone(),
                    debit: rupiah_or_dash(Some(row.total_debit)),
                    kredit: rupiah_or_dash(Some(row.total_kredit)),
                })
                .collect(),
            total_debit: rupiah(report.total_debit),
            total_kredit: rupiah(report.total_kredit),
            balanced: report.is_balanced(),
            message,
            current_page: "neraca_saldo",
        }
    }
}

pub async fn trial_balance_page(State(state): State<AppState>, _user: AuthUser) -> impl IntoResponse {
    match load_books(&state).await {
        Ok((accounts, entries)) => TrialBalanceTemplate::new(&accounts, &entries, None),
        Err(e) => TrialBalanceTemplate::new(&[], &[], Some(store_failure("neraca_saldo", &e))),
    }
}

// Jurnal penyesuaian

pub struct AdjustmentView {
    pub date: String,
    pub description: &'static str,
    pub debit_name: &'static str,
    pub debit_code: &'static str,
    pub credit_name: &'static str,
    pub credit_code: &'static str,
    pub amount: String,
}

#[derive(Template)]
#[template(path = "adjustments.html")]
pub struct AdjustmentsTemplate {
    pub entries: Vec<AdjustmentView>,
    pub total_debit: String,
    pub total_kredit: String,
    pub mode: &'static str,
    pub message: Option<String>,
    pub current_page: &'static str,
}

impl AdjustmentsTemplate {
    fn new(adjustments: Option<Adjustments>, mode: &'static str, message: Option<String>) -> Self {
        let Some(adjustments) = adjustments else {
            return Self {
                entries: Vec::new(),
                total_debit: rupiah(Decimal::ZERO),
                total_kredit: rupiah(Decimal::ZERO),
                mode,
                message,
                current_page: "jurnal_penyesuaian",
            };
        };
        Self {
            entries: adjustments
                .entries
                .iter()
                .map(|e| AdjustmentView {
                    date: iso_date(e.date),
                    description: e.description,
                    debit_name: e.debit_name,
                    debit_code: e.debit_code,
                    credit_name: e.credit_name,
                    credit_code: e.credit_code,
                    amount: rupiah(e.amount),
                })
                .collect(),
            total_debit: rupiah(adjustments.total_debit),
            total_kredit: rupiah(adjustments.total_kredit),
            mode,
            message,
            current_page: "jurnal_penyesuaian",
        }
    }
}

pub async fn adjustments_page(State(state): State<AppState>, _user: AuthUser) -> impl IntoResponse {
    let mode = state.config.adjustments.mode.label();
    match load_books(&state).await {
        Ok((accounts, entries)) => {
            AdjustmentsTemplate::new(adjustments_for(&state, &accounts, &entries), mode, None)
        }
        Err(e) => AdjustmentsTemplate::new(None, mode, Some(store_failure("jurnal_penyesuaian", &e))),
    }
}

// Neraca saldo setelah penyesuaian

pub struct AdjustedRowView {
    pub code: String,
    pub name: String,
    pub account_type: String,
    pub debit: String,
    pub kredit: String,
    pub adjusted_debit: String,
    pub adjusted_kredit: String,
}

#[derive(Template)]
#[template(path = "adjusted_trial_balance.html")]
pub struct AdjustedTrialBalanceTemplate {
    pub rows: Vec<AdjustedRowView>,
    pub total_debit: String,
    pub total_kredit: String,
    pub total_adjusted_debit: String,
    pub total_adjusted_kredit: String,
    pub balanced: bool,
    pub message: Option<String>,
    pub current_page: &'static str,
}

impl AdjustedTrialBalanceTemplate {
    fn new(state: &AppState, accounts: &[Account], entries: &[JournalEntry], message: Option<String>) -> Self {
        let adjustments = adjustments_for(state, accounts, entries);
        let adjusting = adjustments.as_ref().map(|a| a.entries.as_slice()).unwrap_or(&[]);
        let dash = || "-".to_string();

        match adjusted_trial_balance(accounts, entries, adjusting) {
            Some(report) => Self {
                rows: report
                    .rows
                    .iter()
                    .map(|row| AdjustedRowView {
                        code: row.code.clone(),
                        name: row.name.clone(),
                        account_type: row.account_type.clone(),
                        debit: rupiah_or_dash(Some(row.debit)),
                        kredit: rupiah_or_dash(Some(row.kredit)),
                        adjusted_debit: rupiah_or_dash(Some(row.adjusted_debit)),
                        adjusted_kredit: rupiah_or_dash(Some(row.adjusted_kredit)),
                    })
                    .collect(),
                total_debit: rupiah(report.total_debit),
                total_kredit: rupiah(report.total_kredit),
                total_adjusted_debit: rupiah(report.total_adjusted_debit),
                total_adjusted_kredit: rupiah(report.total_adjusted_kredit),
                balanced: report.is_balanced(),
                message,
                current_page: "nssp",
            },
            None => Self {
                rows: Vec::new(),
                total_debit: dash(),
                total_kredit: dash(),
                total_adjusted_debit: dash(),
                total_adjusted_kredit: dash(),
                balanced: false,
                message,
                current_page: "nssp",
            },
        }
    }
}

pub async fn adjusted_trial_balance_page(
    State(state): State<AppState>,
    _user: AuthUser,
) -> impl IntoResponse {
    match load_books(&state).await {
        Ok((accounts, entries)) => AdjustedTrialBalanceTemplate::new(&state, &accounts, &entries, None),
        Err(e) => AdjustedTrialBalanceTemplate::new(&state, &[], &[], Some(store_failure("nssp", &e))),
    }
}

// Harga pokok penjualan

pub struct CogsView {
    pub opening_inventory: String,
    pub purchases: String,
    pub goods_available: String,
    pub closing_inventory: String,
    pub cost_of_goods_sold: String,
}

#[derive(Template)]
#[template(path = "cogs.html")]
pub struct CogsTemplate {
    pub cogs: Option<CogsView>,
    pub message: Option<String>,
    pub current_page: &'static str,
}

impl CogsTemplate {
    fn new(entries: &[JournalEntry], message: Option<String>) -> Self {
        let cogs = estimate_cogs(entries).map(|c| CogsView {
            opening_inventory: rupiah(c.opening_inventory),
            purchases: rupiah(c.purchases),
            goods_available: rupiah(c.opening_inventory + c.purchases),
            closing_inventory: rupiah(c.closing_inventory),
            cost_of_goods_sold: rupiah(c.cost_of_goods_sold),
        });
        Self {
            cogs,
            message,
            current_page: "hitung_hpp",
        }
    }
}

pub async fn cogs_page(State(state): State<AppState>, _user: AuthUser) -> impl IntoResponse {
    match load_books(&state).await {
        Ok((_, entries)) => CogsTemplate::new(&entries, None),
        Err(e) => CogsTemplate::new(&[], Some(store_failure("hitung_hpp", &e))),
    }
}

// Buku pembantu penyusutan

pub struct ScheduleRowView {
    pub year: u32,
    pub charge: String,
    pub accumulated: String,
    pub book_value: String,
}

pub struct AssetView {
    pub code: String,
    pub name: String,
    pub acquired_on: String,
    pub cost: String,
    pub residual: String,
    pub life_years: u32,
    pub annual_charge: String,
    pub status: &'static str,
    pub active: bool,
    pub rows: Vec<ScheduleRowView>,
}

#[derive(Template)]
#[template(path = "depreciation.html")]
pub struct DepreciationTemplate {
    pub assets: Vec<AssetView>,
    pub message: Option<String>,
    pub current_page: &'static str,
}

impl DepreciationTemplate {
    fn new(accounts: &[Account], entries: &[JournalEntry], message: Option<String>) -> Self {
        let assets = depreciation_schedules(accounts, entries)
            .into_iter()
            .map(|s| AssetView {
                code: s.code,
                name: s.name,
                acquired_on: iso_date(s.acquired_on),
                cost: rupiah(s.cost),
                residual: rupiah(s.residual),
                life_years: s.life_years,
                annual_charge: rupiah(s.annual_charge),
                status: s.status.label(),
                active: s.status == AssetStatus::Active,
                rows: s
                    .rows
                    .iter()
                    .map(|r| ScheduleRowView {
                        year: r.year,
                        charge: rupiah(r.charge),
                        accumulated: rupiah(r.accumulated),
                        book_value: rupiah(r.book_value),
                    })
                    .collect(),
            })
            .collect();
        Self {
            assets,
            message,
            current_page: "buku_pembantu_penyusutan",
        }
    }
}

pub async fn depreciation_page(State(state): State<AppState>, _user: AuthUser) -> impl IntoResponse {
    match load_books(&state).await {
        Ok((accounts, entries)) => DepreciationTemplate::new(&accounts, &entries, None),
        Err(e) => DepreciationTemplate::new(&[], &[], Some(store_failure("buku_pembantu_penyusutan", &e))),
    }
}

// Laporan keuangan

pub struct LineView {
    pub name: String,
    pub amount: String,
}

fn line_views(lines: &[StatementLine]) -> Vec<LineView> {
    lines
        .iter()
        .map(|l| LineView {
            name: l.name.clone(),
            amount: rupiah(l.amount),
        })
        .collect()
}

pub struct StatementView {
    pub revenues: Vec<LineView>,
    pub total_revenue: String,
    pub cost_of_goods_sold: String,
    pub gross_profit: String,
    pub expenses: Vec<LineView>,
    pub total_expenses: String,
    pub net_income: String,
    pub opening_capital: String,
    pub drawings: String,
    pub closing_capital: String,
    pub assets: Vec<LineView>,
    pub total_assets: String,
    pub liabilities: Vec<LineView>,
    pub total_liabilities: String,
    pub total_liabilities_and_equity: String,
    pub balanced: bool,
}

#[derive(Template)]
#[template(path = "financial_statement.html")]
pub struct FinancialStatementTemplate {
    pub period: String,
    pub statement: Option<StatementView>,
    pub message: Option<String>,
    pub current_page: &'static str,
}

impl FinancialStatementTemplate {
    fn new(state: &AppState, accounts: &[Account], entries: &[JournalEntry], message: Option<String>) -> Self {
        let as_of = today();
        let adjustments = adjustments_for(state, accounts, entries);
        let adjusting = adjustments.as_ref().map(|a| a.entries.as_slice()).unwrap_or(&[]);
        let cogs = estimate_cogs(entries);

        let statement = adjusted_trial_balance(accounts, entries, adjusting).map(|adjusted| {
            let s = financial_statement(&adjusted, cogs.as_ref(), as_of);
            StatementView {
                revenues: line_views(&s.revenues),
                total_revenue: rupiah(s.total_revenue),
                cost_of_goods_sold: rupiah(s.cost_of_goods_sold),
                gross_profit: rupiah(s.gross_profit),
                expenses: line_views(&s.expenses),
                total_expenses: rupiah(s.total_expenses),
                net_income: rupiah(s.net_income),
                opening_capital: rupiah(s.opening_capital),
                drawings: rupiah(s.drawings),
                closing_capital: rupiah(s.closing_capital),
                assets: line_views(&s.assets),
                total_assets: rupiah(s.total_assets),
                liabilities: line_views(&s.liabilities),
                total_liabilities: rupiah(s.total_liabilities),
                total_liabilities_and_equity: rupiah(s.total_liabilities_and_equity),
                balanced: s.is_balanced(),
            }
        });

        Self {
            period: period_label(as_of),
            statement,
            message,
            current_page: "laporan_keuangan",
        }
    }
}

pub async fn financial_statement_page(
    State(state): State<AppState>,
    _user: AuthUser,
) -> impl IntoResponse {
    match load_books(&state).await {
        Ok((accounts, entries)) => FinancialStatementTemplate::new(&state, &accounts, &entries, None),
        Err(e) => FinancialStatementTemplate::new(&state, &[], &[], Some(store_failure("laporan_keuangan", &e))),
    }
}
