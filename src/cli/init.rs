use colored::Colorize;
use rust_decimal::Decimal;

use crate::config::{profile_path, save_profile, Profile, RuleConfig};
use crate::error::{PossoError, Result};
use crate::snapshot::CreditBasis;

#[allow(clippy::too_many_arguments)]
pub fn run(
    initial_balance: Decimal,
    credit_limit: Decimal,
    ledger: Option<String>,
    credit_basis: &str,
    min_balance: Option<Decimal>,
    max_category_fraction: Option<Decimal>,
    interest_rate: Option<Decimal>,
    max_installments: Option<u32>,
    min_installment_value: Option<Decimal>,
) -> Result<()> {
    let credit_basis = match credit_basis {
        "card" => CreditBasis::CardExpenses,
        "all" => CreditBasis::AllExpenses,
        other => {
            return Err(PossoError::Config(format!(
                "unknown credit basis '{other}' (expected 'card' or 'all')"
            )))
        }
    };

    let mut rules = RuleConfig::default();
    if let Some(v) = min_balance {
        rules.min_balance = v;
    }
    if let Some(v) = max_category_fraction {
        rules.max_category_fraction = v;
    }
    if let Some(v) = interest_rate {
        rules.interest_rate_per_installment = v;
    }
    if let Some(v) = max_installments {
        rules.max_installments = v;
    }
    if let Some(v) = min_installment_value {
        rules.min_installment_value = v;
    }

    let profile = Profile {
        initial_balance,
        credit_limit,
        ledger,
        credit_basis,
        rules,
    };
    save_profile(&profile)?;

    println!(
        "{} wrote {}",
        "posso".green().bold(),
        profile_path().display()
    );
    if profile.ledger.is_none() {
        println!("No default ledger set; pass --ledger to check and snapshot.");
    }
    Ok(())
}
