//! Financial statement (laporan keuangan): income statement, statement of
//! owner's equity and balance sheet, all read off the post-adjustment trial
//! balance.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::adjusted::AdjustedTrialBalance;
use super::cogs::CogsEstimate;
use crate::models::AccountType;

/// Asset line carrying the inventory consumed by the CoGS closing entry.
pub const COGS_INVENTORY_LINE: &str = "Penyesuaian Persediaan (HPP)";

#[derive(Debug, Clone, PartialEq)]
pub struct StatementLine {
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct FinancialStatement {
    pub as_of: NaiveDate,
    pub revenues: Vec<StatementLine>,
    pub total_revenue: Decimal,
    pub cost_of_goods_sold: Decimal,
    pub gross_profit: Decimal,
    pub expenses: Vec<StatementLine>,
    pub total_expenses: Decimal,
    pub net_income: Decimal,
    pub opening_capital: Decimal,
    pub drawings: Decimal,
    pub closing_capital: Decimal,
    pub assets: Vec<StatementLine>,
    pub total_assets: Decimal,
    pub liabilities: Vec<StatementLine>,
    pub total_liabilities: Decimal,
    pub total_liabilities_and_equity: Decimal,
}

impl FinancialStatement {
    /// Exact equality, no tolerance.
    pub fn is_balanced(&self) -> bool {
        self.total_assets == self.total_liabilities_and_equity
    }
}

fn is_drawings(name: &str) -> bool {
    name.to_lowercase().contains("prive")
}

fn total(lines: &[StatementLine]) -> Decimal {
    lines.iter().map(|l| l.amount).sum()
}

/// Build the statement. The CoGS estimate, when present, replaces the
/// purchases already booked to expense accounts; the remainder is closed out
/// against inventory. Rows with an unrecognised type are left out.
pub fn financial_statement(
    adjusted: &AdjustedTrialBalance,
    cogs: Option<&CogsEstimate>,
    as_of: NaiveDate,
) -> FinancialStatement {
    let mut revenues = Vec::new();
    let mut expenses = Vec::new();
    let mut assets = Vec::new();
    let mut liabilities = Vec::new();
    let mut opening_capital = Decimal::ZERO;
    let mut drawings = Decimal::ZERO;
    let mut expensed_purchases = Decimal::ZERO;

    for row in &adjusted.rows {
        let Some(account_type) = row.parsed_type() else {
            continue;
        };
        let mut balance = row.normal_balance(account_type);
        if account_type == AccountType::Expense {
            if let Some(purchased) = cogs.and_then(|c| c.purchases_by_code.get(&row.code)) {
                balance -= *purchased;
                expensed_purchases += *purchased;
            }
        }
        let line = StatementLine {
            name: row.name.clone(),
            amount: balance,
        };

        match account_type {
            AccountType::Equity if is_drawings(&row.name) => drawings -= balance,
            AccountType::Equity => opening_capital += balance,
            _ if balance.is_zero() => {}
            AccountType::Revenue => revenues.push(line),
            AccountType::Expense => expenses.push(line),
            AccountType::Asset => assets.push(line),
            AccountType::Liability => liabilities.push(line),
        }
    }

    let cost_of_goods_sold = cogs.map_or(Decimal::ZERO, |c| c.cost_of_goods_sold);
    let from_inventory = cost_of_goods_sold - expensed_purchases;
    if !from_inventory.is_zero() {
        assets.push(StatementLine {
            name: COGS_INVENTORY_LINE.to_string(),
            amount: -from_inventory,
        });
    }

    let total_revenue = total(&revenues);
    let gross_profit = total_revenue - cost_of_goods_sold;
    let total_expenses = total(&expenses);
    let net_income = gross_profit - total_expenses;
    let closing_capital = opening_capital + net_income - drawings;
    let total_liabilities = total(&liabilities);

    FinancialStatement {
        as_of,
        total_assets: total(&assets),
        revenues,
        total_revenue,
        cost_of_goods_sold,
        gross_profit,
        expenses,
        total_expenses,
        net_income,
        opening_capital,
        drawings,
        closing_capital,
        assets,
        liabilities,
        total_liabilities,
        total_liabilities_and_equity: total_liabilities + closing_capital,
    }
}
