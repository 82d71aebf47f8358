use colored::Colorize;
use comfy_table::{Cell, Table};
use rust_decimal::Decimal;

use crate::error::{PossoError, Result};
use crate::fmt::money;
use crate::snapshot::{FinancialSnapshot, Period};

pub fn run(
    ledger: Option<&str>,
    initial_balance: Option<Decimal>,
    credit_limit: Option<Decimal>,
    json: bool,
) -> Result<()> {
    let (snapshot, _rules) = super::build_snapshot(ledger, initial_balance, credit_limit)?;

    if json {
        let out = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| PossoError::Other(e.to_string()))?;
        println!("{out}");
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();
    println!("{}", format_snapshot(&snapshot, today));
    Ok(())
}

pub fn format_snapshot(snapshot: &FinancialSnapshot, as_of: chrono::NaiveDate) -> String {
    let mut totals = Table::new();
    totals.set_header(vec!["Ledger snapshot", ""]);
    totals.add_row(vec![
        Cell::new("Total income".green()),
        Cell::new(money(snapshot.total_income)),
    ]);
    totals.add_row(vec![
        Cell::new("Total expenses".red()),
        Cell::new(money(snapshot.total_expenses)),
    ]);
    totals.add_row(vec![
        Cell::new("Current balance".bold()),
        Cell::new(money(snapshot.current_balance)),
    ]);
    totals.add_row(vec![
        Cell::new("Credit card expenses"),
        Cell::new(money(snapshot.credit_card_expenses)),
    ]);
    totals.add_row(vec![
        Cell::new("Available credit"),
        Cell::new(money(snapshot.available_credit)),
    ]);
    let monthly = snapshot.average_expenses_per_period(as_of, Period::Month);
    if monthly > Decimal::ZERO {
        totals.add_row(vec![
            Cell::new("Average monthly spend"),
            Cell::new(money(monthly)),
        ]);
    }

    if snapshot.expenses_by_category.is_empty() {
        return totals.to_string();
    }

    let mut categories = Table::new();
    categories.set_header(vec!["Category", "Spent", "%"]);
    for (name, amount) in &snapshot.expenses_by_category {
        let pct = if snapshot.total_expenses > Decimal::ZERO {
            *amount / snapshot.total_expenses * Decimal::from(100)
        } else {
            Decimal::ZERO
        };
        categories.add_row(vec![
            Cell::new(name),
            Cell::new(money(*amount)),
            Cell::new(format!("{pct:.1}%")),
        ]);
    }

    format!("{totals}\n{categories}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{EntryKind, LedgerEntry, PaymentMethod};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_snapshot_lists_categories() {
        let entries = vec![
            LedgerEntry {
                date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
                kind: EntryKind::Income,
                category: "Salário".to_string(),
                amount: dec!(4000),
                payment_method: PaymentMethod::Other(String::new()),
            },
            LedgerEntry {
                date: NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
                kind: EntryKind::Expense,
                category: "Alimentação".to_string(),
                amount: dec!(300),
                payment_method: PaymentMethod::Credit,
            },
            LedgerEntry {
                date: NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
                kind: EntryKind::Expense,
                category: "Transporte".to_string(),
                amount: dec!(100),
                payment_method: PaymentMethod::Cash,
            },
        ];
        let snap = FinancialSnapshot::build(&entries, dec!(2000), dec!(1500));
        let as_of = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let text = format_snapshot(&snap, as_of);
        assert!(text.contains("R$ 4.000,00"));
        assert!(text.contains("Alimentação"));
        assert!(text.contains("75.0%"));
        assert!(text.contains("Transporte"));
        assert!(text.contains("25.0%"));
    }

    #[test]
    fn test_format_snapshot_empty_ledger_has_no_category_table() {
        let snap = FinancialSnapshot::build(&[], dec!(2000), dec!(1500));
        let as_of = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let text = format_snapshot(&snap, as_of);
        assert!(text.contains("R$ 2.000,00"));
        assert!(!text.contains("Category"));
    }
}
