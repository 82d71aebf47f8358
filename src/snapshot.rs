use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{EntryKind, LedgerEntry, PaymentMethod};

/// Which expenses count against the credit ceiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditBasis {
    /// Only credit-card expenses consume the limit.
    #[default]
    CardExpenses,
    /// Every expense consumes the limit.
    AllExpenses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
}

/// Point-in-time aggregate view of a ledger. A pure function of its inputs:
/// rebuilding from the same entries yields an identical snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSnapshot {
    pub initial_balance: Decimal,
    pub credit_limit: Decimal,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub current_balance: Decimal,
    pub expenses_by_category: BTreeMap<String, Decimal>,
    pub credit_card_expenses: Decimal,
    pub available_credit: Decimal,
    pub first_expense_date: Option<NaiveDate>,
}

impl FinancialSnapshot {
    pub fn build(
        entries: &[LedgerEntry],
        initial_balance: Decimal,
        credit_limit: Decimal,
    ) -> Self {
        Self::build_with_basis(entries, initial_balance, credit_limit, CreditBasis::default())
    }

    pub fn build_with_basis(
        entries: &[LedgerEntry],
        initial_balance: Decimal,
        credit_limit: Decimal,
        basis: CreditBasis,
    ) -> Self {
        let mut total_income = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;
        let mut expenses_by_category: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut credit_card_expenses = Decimal::ZERO;
        let mut first_expense_date: Option<NaiveDate> = None;

        for entry in entries {
            match entry.kind {
                EntryKind::Income => total_income += entry.amount,
                EntryKind::Expense => {
                    total_expenses += entry.amount;
                    *expenses_by_category
                        .entry(entry.category.clone())
                        .or_insert(Decimal::ZERO) += entry.amount;
                    if entry.payment_method == PaymentMethod::Credit {
                        credit_card_expenses += entry.amount;
                    }
                    first_expense_date = match first_expense_date {
                        Some(d) if d <= entry.date => Some(d),
                        _ => Some(entry.date),
                    };
                }
            }
        }

        let consumed = match basis {
            CreditBasis::CardExpenses => credit_card_expenses,
            CreditBasis::AllExpenses => total_expenses,
        };

        Self {
            initial_balance,
            credit_limit,
            total_income,
            total_expenses,
            current_balance: initial_balance + total_income - total_expenses,
            expenses_by_category,
            credit_card_expenses,
            available_credit: credit_limit - consumed,
            first_expense_date,
        }
    }

    /// Average spend per week or month between the first expense and
    /// `as_of`. Zero whole periods yields zero.
    pub fn average_expenses_per_period(&self, as_of: NaiveDate, period: Period) -> Decimal {
        let Some(first) = self.first_expense_date else {
            return Decimal::ZERO;
        };
        let periods = match period {
            Period::Week => as_of.signed_duration_since(first).num_days() / 7,
            Period::Month => {
                i64::from(as_of.year() - first.year()) * 12
                    + i64::from(as_of.month() as i32 - first.month() as i32)
            }
        };
        if periods <= 0 {
            return Decimal::ZERO;
        }
        self.total_expenses / Decimal::from(periods)
    }
}
