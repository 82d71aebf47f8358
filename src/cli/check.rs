use colored::Colorize;
use comfy_table::{Cell, Table};
use rust_decimal::Decimal;

use crate::decision::{decide, DecisionResult};
use crate::error::{PossoError, Result};
use crate::explainer::{Explain, TemplateExplainer};
use crate::fmt::money;
use crate::rules::{PurchaseRequest, Verdict};
use crate::snapshot::FinancialSnapshot;

#[allow(clippy::too_many_arguments)]
pub fn run(
    amount: Decimal,
    category: &str,
    ledger: Option<&str>,
    initial_balance: Option<Decimal>,
    credit_limit: Option<Decimal>,
    json: bool,
    explain: bool,
) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(PossoError::Other(
            "purchase amount must be positive".to_string(),
        ));
    }

    let (snapshot, rules) = super::build_snapshot(ledger, initial_balance, credit_limit)?;
    let request = PurchaseRequest {
        amount,
        category: category.to_string(),
    };
    let decision = decide(&snapshot, &request, &rules);

    if json {
        let out = serde_json::to_string_pretty(&decision)
            .map_err(|e| PossoError::Other(e.to_string()))?;
        println!("{out}");
        return Ok(());
    }

    println!("{}", format_decision(&snapshot, &request, &decision));
    if explain {
        println!();
        println!(
            "{}",
            TemplateExplainer.explain(&snapshot, &request, &decision)
        );
    }
    Ok(())
}

pub fn format_decision(
    snapshot: &FinancialSnapshot,
    request: &PurchaseRequest,
    decision: &DecisionResult,
) -> String {
    let verdict = match decision.verdict {
        Verdict::Approved => decision.verdict.to_string().green().bold(),
        Verdict::ApprovedWithCaution => decision.verdict.to_string().yellow().bold(),
        Verdict::Denied => decision.verdict.to_string().red().bold(),
    };

    let mut table = Table::new();
    table.set_header(vec!["Purchase check", ""]);
    table.add_row(vec![Cell::new("Verdict"), Cell::new(verdict)]);
    table.add_row(vec![
        Cell::new("Reason"),
        Cell::new(decision.reason.describe()),
    ]);
    table.add_row(vec![
        Cell::new("Purchase"),
        Cell::new(format!("{} on {}", money(request.amount), request.category)),
    ]);
    table.add_row(vec![
        Cell::new("Current balance"),
        Cell::new(money(snapshot.current_balance)),
    ]);
    table.add_row(vec![
        Cell::new("Available credit"),
        Cell::new(money(snapshot.available_credit)),
    ]);
    if let Some(plan) = &decision.installment_plan {
        table.add_row(vec![
            Cell::new("Installments"),
            Cell::new(format!(
                "{}x of {}",
                plan.count,
                money(plan.per_installment_amount)
            )),
        ]);
        table.add_row(vec![
            Cell::new("Total with interest"),
            Cell::new(money(plan.total())),
        ]);
    }
    table.to_string()
}
