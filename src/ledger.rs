use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Bucket for expense rows that arrive without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

// ---------------------------------------------------------------------------
// Raw and typed records
// ---------------------------------------------------------------------------

/// One spreadsheet row as the importer hands it over: five untyped fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub date: String,
    pub kind: String,
    pub category: String,
    pub amount: String,
    pub payment_method: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PaymentMethod {
    Credit,
    Debit,
    Cash,
    Other(String),
}

/// One validated income or expense transaction. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub category: String,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
}

/// A raw record that failed to parse, with the row it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// String folding
// ---------------------------------------------------------------------------

/// Lowercase and strip the Portuguese diacritics that show up in ledger
/// headers and payment methods, so "Cartão" and "cartao" compare equal.
pub(crate) fn fold(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
            'é' | 'ê' | 'è' | 'É' | 'Ê' | 'È' => 'e',
            'í' | 'î' | 'Í' | 'Î' => 'i',
            'ó' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'o',
            'ú' | 'û' | 'ü' | 'Ú' | 'Û' | 'Ü' => 'u',
            'ç' | 'Ç' => 'c',
            _ => c.to_ascii_lowercase(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Parse a money amount tolerating both locale conventions: "1.234,56",
/// "1,234.56", "R$ 500,00". A lone separator followed by exactly three
/// digits reads as a thousands group ("1.234" is 1234, not 1.234).
/// Negative amounts are rejected; entry amounts are magnitudes.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let mut s = raw.trim().to_string();
    for tok in ["R$", "r$", "$"] {
        s = s.replace(tok, "");
    }
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if s.is_empty() || s.starts_with('(') || s.starts_with('-') {
        return None;
    }

    let normalized = match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) => {
            // Both present: the later one is the decimal separator.
            if dot > comma {
                s.replace(',', "")
            } else {
                s.replace('.', "").replace(',', ".")
            }
        }
        (None, Some(_)) => normalize_single_separator(&s, ','),
        (Some(_), None) => normalize_single_separator(&s, '.'),
        (None, None) => s,
    };

    Decimal::from_str(&normalized)
        .ok()
        .filter(|d| *d >= Decimal::ZERO)
}

fn normalize_single_separator(s: &str, sep: char) -> String {
    let count = s.matches(sep).count();
    let (int_part, frac) = match s.rsplit_once(sep) {
        Some(parts) => parts,
        None => return s.to_string(),
    };
    if count > 1 || (frac.len() == 3 && !int_part.is_empty() && int_part != "0") {
        // Thousands grouping.
        s.chars().filter(|c| *c != sep).collect()
    } else {
        s.replace(sep, ".")
    }
}

/// Parse a ledger date: Brazilian dd/mm/yyyy first, then ISO.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for format in ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    None
}

pub fn parse_kind(raw: &str) -> Option<EntryKind> {
    match fold(raw).as_str() {
        "receita" | "income" | "entrada" => Some(EntryKind::Income),
        "despesa" | "expense" | "gasto" | "saida" => Some(EntryKind::Expense),
        _ => None,
    }
}

impl PaymentMethod {
    pub fn parse(raw: &str) -> Self {
        let folded = fold(raw);
        if folded.contains("debito") || folded.contains("debit") {
            Self::Debit
        } else if folded.contains("credito")
            || folded.contains("credit")
            || folded == "cartao"
            || folded == "card"
        {
            Self::Credit
        } else if folded == "dinheiro" || folded == "cash" {
            Self::Cash
        } else {
            Self::Other(raw.trim().to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Record parsing
// ---------------------------------------------------------------------------

impl LedgerEntry {
    /// Parse one raw record. The error is a human-readable skip reason.
    pub fn parse(record: &RawRecord) -> std::result::Result<Self, String> {
        let date = parse_date(&record.date)
            .ok_or_else(|| format!("unparseable date '{}'", record.date.trim()))?;
        let kind = parse_kind(&record.kind)
            .ok_or_else(|| format!("unrecognized entry type '{}'", record.kind.trim()))?;
        let amount = parse_amount(&record.amount)
            .ok_or_else(|| format!("unparseable amount '{}'", record.amount.trim()))?;

        let category = record.category.trim();
        let category = if category.is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            category.to_string()
        };

        Ok(Self {
            date,
            kind,
            category,
            amount,
            payment_method: PaymentMethod::parse(&record.payment_method),
        })
    }
}

/// Parse a batch of raw records. Rows that fail to parse are skipped and
/// reported, never fatal: source spreadsheets are inconsistently formatted.
pub fn parse_entries(records: &[RawRecord]) -> (Vec<LedgerEntry>, Vec<SkippedRecord>) {
    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    for (index, record) in records.iter().enumerate() {
        match LedgerEntry::parse(record) {
            Ok(entry) => entries.push(entry),
            Err(reason) => skipped.push(SkippedRecord { index, reason }),
        }
    }
    (entries, skipped)
}
