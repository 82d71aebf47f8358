use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::RuleConfig;
use crate::installments::{self, InstallmentPlan};
use crate::rules::{self, DecisionReason, PurchaseRequest, Verdict};
use crate::snapshot::FinancialSnapshot;

/// The structured affordability verdict handed to the UI/narration layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionResult {
    pub verdict: Verdict,
    pub reason: DecisionReason,
    pub installment_plan: Option<InstallmentPlan>,
}

/// Merge the rule outcome with an installment search. A denial
/// short-circuits with no plan. An approval that would consume more than a
/// third of the remaining credit gets an installment search; a found plan
/// downgrades to approved-with-caution, no plan leaves a plain approval
/// since no cheaper structuring exists. Pure function of its inputs.
pub fn decide(
    snapshot: &FinancialSnapshot,
    request: &PurchaseRequest,
    config: &RuleConfig,
) -> DecisionResult {
    let outcome = rules::evaluate(snapshot, request, config);
    if outcome.verdict == Verdict::Denied {
        return DecisionResult {
            verdict: outcome.verdict,
            reason: outcome.reason,
            installment_plan: None,
        };
    }

    if snapshot.available_credit > Decimal::ZERO
        && request.amount > snapshot.available_credit / Decimal::from(3)
    {
        if let Some(plan) = installments::plan(request.amount, snapshot.available_credit, config)
        {
            return DecisionResult {
                verdict: Verdict::ApprovedWithCaution,
                reason: DecisionReason::SuggestInstallments,
                installment_plan: Some(plan),
            };
        }
    }

    DecisionResult {
        verdict: Verdict::Approved,
        reason: DecisionReason::WithinLimits,
        installment_plan: None,
    }
}
