use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::{CategoryLimitBasis, RuleConfig};
use crate::fmt::money;
use crate::ledger::fold;
use crate::snapshot::FinancialSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRequest {
    pub amount: Decimal,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Approved,
    ApprovedWithCaution,
    Denied,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Approved => "Approved",
            Self::ApprovedWithCaution => "Approved with caution",
            Self::Denied => "Denied",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DecisionReason {
    WithinLimits,
    InsufficientBalance,
    CategoryLimitExceeded { limit: Decimal },
    CreditLimitExceeded,
    SuggestInstallments,
}

impl DecisionReason {
    pub fn describe(&self) -> String {
        match self {
            Self::WithinLimits => "Within balance, category and credit limits".to_string(),
            Self::InsufficientBalance => {
                "Balance would fall below the configured minimum".to_string()
            }
            Self::CategoryLimitExceeded { limit } => {
                format!("Category budget exceeded (limit {})", money(*limit))
            }
            Self::CreditLimitExceeded => "Not enough available credit".to_string(),
            Self::SuggestInstallments => {
                "Heavy use of remaining credit; installment plan suggested".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub verdict: Verdict,
    pub reason: DecisionReason,
}

/// Run the affordability checks in fixed order, short-circuiting at the
/// first failure: balance, then category, then credit. A balance failure is
/// the most fundamental and must not be masked by a category message.
/// Comparisons use the snapshot's decimals directly; no rounding here.
pub fn evaluate(
    snapshot: &FinancialSnapshot,
    request: &PurchaseRequest,
    config: &RuleConfig,
) -> RuleOutcome {
    if snapshot.current_balance - request.amount < config.min_balance {
        return RuleOutcome {
            verdict: Verdict::Denied,
            reason: DecisionReason::InsufficientBalance,
        };
    }

    let limit = category_limit(snapshot, config);
    let spent = spent_in_category(snapshot, &request.category);
    if spent + request.amount > limit {
        return RuleOutcome {
            verdict: Verdict::Denied,
            reason: DecisionReason::CategoryLimitExceeded { limit },
        };
    }

    if request.amount > snapshot.available_credit {
        return RuleOutcome {
            verdict: Verdict::Denied,
            reason: DecisionReason::CreditLimitExceeded,
        };
    }

    RuleOutcome {
        verdict: Verdict::Approved,
        reason: DecisionReason::WithinLimits,
    }
}

/// Zero income under the income-fraction basis means a zero limit: any
/// category spend denies.
fn category_limit(snapshot: &FinancialSnapshot, config: &RuleConfig) -> Decimal {
    match config.category_limit_basis {
        CategoryLimitBasis::IncomeFraction => {
            snapshot.total_income * config.max_category_fraction
        }
        CategoryLimitBasis::ExpenseFraction => {
            snapshot.total_expenses * config.max_category_fraction
        }
        // validate() guarantees the cap is set for this basis.
        CategoryLimitBasis::FixedCap => config.category_cap.unwrap_or(Decimal::ZERO),
    }
}

fn spent_in_category(snapshot: &FinancialSnapshot, category: &str) -> Decimal {
    let wanted = fold(category);
    snapshot
        .expenses_by_category
        .iter()
        .filter(|(name, _)| fold(name) == wanted)
        .map(|(_, amount)| *amount)
        .sum()
}
