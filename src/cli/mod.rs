pub mod check;
pub mod completions;
pub mod demo;
pub mod init;
pub mod snapshot;

use std::path::Path;

use clap::{Parser, Subcommand};
use colored::Colorize;
use rust_decimal::Decimal;

use crate::config::{self, RuleConfig};
use crate::error::{PossoError, Result};
use crate::importer;
use crate::ledger;
use crate::snapshot::FinancialSnapshot;

/// Resolve the profile and CLI overrides, read the ledger file, and build
/// the snapshot. Skipped rows are reported on stderr so JSON output stays
/// clean on stdout.
pub(crate) fn build_snapshot(
    ledger: Option<&str>,
    initial_balance: Option<Decimal>,
    credit_limit: Option<Decimal>,
) -> Result<(FinancialSnapshot, RuleConfig)> {
    let profile = config::load_profile()?;

    let initial_balance = initial_balance
        .or_else(|| profile.as_ref().map(|p| p.initial_balance))
        .ok_or_else(|| {
            PossoError::Config(
                "no initial balance configured; pass --initial-balance or run `posso init`"
                    .to_string(),
            )
        })?;
    let credit_limit = credit_limit
        .or_else(|| profile.as_ref().map(|p| p.credit_limit))
        .ok_or_else(|| {
            PossoError::Config(
                "no credit limit configured; pass --credit-limit or run `posso init`".to_string(),
            )
        })?;
    let ledger_path = ledger
        .map(str::to_string)
        .or_else(|| profile.as_ref().and_then(|p| p.ledger.clone()))
        .ok_or_else(|| {
            PossoError::Config(
                "no ledger file configured; pass --ledger or run `posso init`".to_string(),
            )
        })?;
    let basis = profile.as_ref().map(|p| p.credit_basis).unwrap_or_default();
    let rules = profile.map(|p| p.rules).unwrap_or_default();

    let records = importer::read_ledger(Path::new(&ledger_path))?;
    let (entries, skipped) = ledger::parse_entries(&records);
    for skip in &skipped {
        eprintln!(
            "{} row {} skipped: {}",
            "warning:".yellow().bold(),
            skip.index + 1,
            skip.reason
        );
    }

    Ok((
        FinancialSnapshot::build_with_basis(&entries, initial_balance, credit_limit, basis),
        rules,
    ))
}

#[derive(Parser)]
#[command(name = "posso", about = "Ledger-driven purchase affordability advisor.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up posso: record balances, credit limit and rule policy.
    Init {
        /// Account balance before the ledger entries
        #[arg(long = "initial-balance")]
        initial_balance: Decimal,
        /// Total credit card limit
        #[arg(long = "credit-limit")]
        credit_limit: Decimal,
        /// Default ledger file (CSV or XLSX)
        #[arg(long)]
        ledger: Option<String>,
        /// Credit consumption basis: card (card expenses only) or all
        #[arg(long = "credit-basis", default_value = "card")]
        credit_basis: String,
        /// Minimum balance to keep after any purchase
        #[arg(long = "min-balance")]
        min_balance: Option<Decimal>,
        /// Per-category budget as a fraction of income, in (0, 1]
        #[arg(long = "max-category-fraction")]
        max_category_fraction: Option<Decimal>,
        /// Interest rate accrued per installment, e.g. 0.02
        #[arg(long = "interest-rate")]
        interest_rate: Option<Decimal>,
        /// Largest installment count to consider
        #[arg(long = "max-installments")]
        max_installments: Option<u32>,
        /// Smallest acceptable installment amount
        #[arg(long = "min-installment-value")]
        min_installment_value: Option<Decimal>,
    },
    /// Evaluate a prospective purchase against the ledger.
    Check {
        /// Purchase amount
        amount: Decimal,
        /// Spending category, e.g. 'Alimentação'
        #[arg(long)]
        category: String,
        /// Ledger file to read (overrides the configured default)
        #[arg(long)]
        ledger: Option<String>,
        /// Override the configured initial balance
        #[arg(long = "initial-balance")]
        initial_balance: Option<Decimal>,
        /// Override the configured credit limit
        #[arg(long = "credit-limit")]
        credit_limit: Option<Decimal>,
        /// Emit the decision as JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Add a prose explanation of the verdict
        #[arg(long)]
        explain: bool,
    },
    /// Summarize the ledger into a financial snapshot.
    Snapshot {
        /// Ledger file to read (overrides the configured default)
        #[arg(long)]
        ledger: Option<String>,
        /// Override the configured initial balance
        #[arg(long = "initial-balance")]
        initial_balance: Option<Decimal>,
        /// Override the configured credit limit
        #[arg(long = "credit-limit")]
        credit_limit: Option<Decimal>,
        /// Emit the snapshot as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Walk through a sample ledger without touching your data.
    Demo,
    /// Generate shell completions.
    Completions {
        /// Shell to generate for
        shell: clap_complete::Shell,
    },
}
