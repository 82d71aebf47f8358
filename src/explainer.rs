use crate::decision::DecisionResult;
use crate::fmt::money;
use crate::rules::{DecisionReason, PurchaseRequest, Verdict};
use crate::snapshot::FinancialSnapshot;

/// Renders a finished decision as prose. Implementations are display-only:
/// they receive the verdict after the fact and can never feed back into it.
/// An LLM-backed narrator would implement this trait outside the engine.
pub trait Explain {
    fn explain(
        &self,
        snapshot: &FinancialSnapshot,
        request: &PurchaseRequest,
        decision: &DecisionResult,
    ) -> String;
}

/// Deterministic, template-based narration.
pub struct TemplateExplainer;

impl Explain for TemplateExplainer {
    fn explain(
        &self,
        snapshot: &FinancialSnapshot,
        request: &PurchaseRequest,
        decision: &DecisionResult,
    ) -> String {
        match (&decision.verdict, &decision.reason) {
            (Verdict::Approved, _) => format!(
                "Purchase approved. Paying {} on {} outright leaves {} in the \
                 account and keeps {} of credit untouched.",
                money(request.amount),
                request.category,
                money(snapshot.current_balance - request.amount),
                money(snapshot.available_credit),
            ),
            (Verdict::ApprovedWithCaution, _) => {
                let plan_text = decision
                    .installment_plan
                    .as_ref()
                    .map(|plan| {
                        format!(
                            "Consider {}x of {} ({} in total with interest) to \
                             spread the hit on your credit.",
                            plan.count,
                            money(plan.per_installment_amount),
                            money(plan.total()),
                        )
                    })
                    .unwrap_or_default();
                format!(
                    "Purchase approved, but {} would take a large share of the \
                     {} you still have on the card. {}",
                    money(request.amount),
                    money(snapshot.available_credit),
                    plan_text,
                )
            }
            (Verdict::Denied, DecisionReason::InsufficientBalance) => format!(
                "Purchase denied: paying {} would leave the balance at {}, \
                 below your safety floor.",
                money(request.amount),
                money(snapshot.current_balance - request.amount),
            ),
            (Verdict::Denied, DecisionReason::CategoryLimitExceeded { limit }) => format!(
                "Purchase denied: spending on {} is capped at {} and this \
                 purchase would push it past that.",
                request.category,
                money(*limit),
            ),
            (Verdict::Denied, _) => format!(
                "Purchase denied: only {} of credit remains, not enough to \
                 cover {}.",
                money(snapshot.available_credit),
                money(request.amount),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::decision::decide;
    use crate::ledger::{EntryKind, LedgerEntry, PaymentMethod};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn entry(kind: EntryKind, category: &str, amount: Decimal, method: PaymentMethod) -> LedgerEntry {
        LedgerEntry {
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            kind,
            category: category.to_string(),
            amount,
            payment_method: method,
        }
    }

    fn snapshot() -> FinancialSnapshot {
        let entries = vec![
            entry(EntryKind::Income, "Salário", dec!(4000), PaymentMethod::Other(String::new())),
            entry(EntryKind::Expense, "Lazer", dec!(100), PaymentMethod::Credit),
        ];
        FinancialSnapshot::build(&entries, dec!(5000), dec!(1000))
    }

    #[test]
    fn test_approval_prose_names_amounts() {
        let snap = snapshot();
        let req = PurchaseRequest {
            amount: dec!(200),
            category: "Transporte".to_string(),
        };
        let decision = decide(&snap, &req, &RuleConfig::default());
        let text = TemplateExplainer.explain(&snap, &req, &decision);
        assert!(text.contains("approved"));
        assert!(text.contains("R$ 200,00"));
        assert!(text.contains("Transporte"));
    }

    #[test]
    fn test_caution_prose_includes_plan_terms() {
        let snap = snapshot();
        let req = PurchaseRequest {
            amount: dec!(800),
            category: "Lazer".to_string(),
        };
        let decision = decide(&snap, &req, &RuleConfig::default());
        let text = TemplateExplainer.explain(&snap, &req, &decision);
        assert!(text.contains("2x"));
        assert!(text.contains("R$ 416,16"));
    }

    #[test]
    fn test_denial_prose_names_the_cause() {
        let snap = snapshot();
        let req = PurchaseRequest {
            amount: dec!(1150),
            category: "Lazer".to_string(),
        };
        let decision = decide(&snap, &req, &RuleConfig::default());
        let text = TemplateExplainer.explain(&snap, &req, &decision);
        assert!(text.contains("denied"));
        assert!(text.contains("R$ 1.200,00"));
    }

    #[test]
    fn test_explaining_does_not_change_the_decision() {
        let snap = snapshot();
        let req = PurchaseRequest {
            amount: dec!(800),
            category: "Lazer".to_string(),
        };
        let config = RuleConfig::default();
        let before = decide(&snap, &req, &config);
        let _ = TemplateExplainer.explain(&snap, &req, &before);
        assert_eq!(before, decide(&snap, &req, &config));
    }
}
