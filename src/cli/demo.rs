use colored::Colorize;
use rust_decimal::Decimal;

use crate::config::RuleConfig;
use crate::decision::decide;
use crate::error::Result;
use crate::explainer::{Explain, TemplateExplainer};
use crate::importer;
use crate::ledger;
use crate::rules::PurchaseRequest;
use crate::snapshot::FinancialSnapshot;

/// A month of sample data in the shape the importer expects, mixed locale
/// formatting included.
const SAMPLE_LEDGER: &str = "\
Data,Tipo,Categoria,Valor,Forma de Pagamento
05/01/2025,Receita,Salário,\"R$ 4.000,00\",Depósito
07/01/2025,Despesa,Alimentação,\"200,00\",Cartão de Crédito
12/01/2025,Despesa,Transporte,\"150,00\",Pix
15/01/2025,Despesa,Lazer,\"100,00\",Cartão de Crédito
";

const SAMPLE_INITIAL_BALANCE: i64 = 2000;
const SAMPLE_CREDIT_LIMIT: i64 = 1500;

pub fn run() -> Result<()> {
    println!(
        "{} sample walkthrough (nothing on disk is read or written)\n",
        "posso".green().bold()
    );

    let records = importer::read_csv_from(SAMPLE_LEDGER.as_bytes())?;
    let (entries, skipped) = ledger::parse_entries(&records);
    debug_assert!(skipped.is_empty());

    let snapshot = FinancialSnapshot::build(
        &entries,
        Decimal::from(SAMPLE_INITIAL_BALANCE),
        Decimal::from(SAMPLE_CREDIT_LIMIT),
    );
    let as_of = chrono::Local::now().date_naive();
    println!("{}\n", super::snapshot::format_snapshot(&snapshot, as_of));

    let rules = RuleConfig::default();
    for (amount, category) in [(300, "Alimentação"), (900, "Lazer")] {
        let request = PurchaseRequest {
            amount: Decimal::from(amount),
            category: category.to_string(),
        };
        let decision = decide(&snapshot, &request, &rules);
        println!("{}", super::check::format_decision(&snapshot, &request, &decision));
        println!(
            "{}\n",
            TemplateExplainer.explain(&snapshot, &request, &decision)
        );
    }

    println!("Point posso at your own export: posso check 900 --category Lazer --ledger gastos.csv");
    Ok(())
}
