mod cli;
mod config;
mod decision;
mod error;
mod explainer;
mod fmt;
mod importer;
mod installments;
mod ledger;
mod rules;
mod snapshot;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init {
            initial_balance,
            credit_limit,
            ledger,
            credit_basis,
            min_balance,
            max_category_fraction,
            interest_rate,
            max_installments,
            min_installment_value,
        } => cli::init::run(
            initial_balance,
            credit_limit,
            ledger,
            &credit_basis,
            min_balance,
            max_category_fraction,
            interest_rate,
            max_installments,
            min_installment_value,
        ),
        Commands::Check {
            amount,
            category,
            ledger,
            initial_balance,
            credit_limit,
            json,
            explain,
        } => cli::check::run(
            amount,
            &category,
            ledger.as_deref(),
            initial_balance,
            credit_limit,
            json,
            explain,
        ),
        Commands::Snapshot {
            ledger,
            initial_balance,
            credit_limit,
            json,
        } => cli::snapshot::run(ledger.as_deref(), initial_balance, credit_limit, json),
        Commands::Demo => cli::demo::run(),
        Commands::Completions { shell } => cli::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
