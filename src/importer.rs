use std::path::Path;

use crate::error::{PossoError, Result};
use crate::ledger::{fold, RawRecord};

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
struct ColumnMap {
    date: Option<usize>,
    kind: Option<usize>,
    category: Option<usize>,
    amount: Option<usize>,
    payment: Option<usize>,
}

impl ColumnMap {
    /// A usable header names at least a date and an amount column.
    fn is_usable(&self) -> bool {
        self.date.is_some() && self.amount.is_some()
    }

    fn assign(&mut self, index: usize, name: &str) {
        match fold(name).as_str() {
            "data" | "date" | "dia" => self.date = self.date.or(Some(index)),
            "tipo" | "type" | "kind" => self.kind = self.kind.or(Some(index)),
            "categoria" | "category" => self.category = self.category.or(Some(index)),
            "valor" | "amount" | "value" => self.amount = self.amount.or(Some(index)),
            "forma de pagamento" | "payment method" | "pagamento" | "payment" => {
                self.payment = self.payment.or(Some(index))
            }
            _ => {}
        }
    }
}

fn map_header_fields<'a>(fields: impl Iterator<Item = &'a str>) -> ColumnMap {
    let mut map = ColumnMap::default();
    for (i, field) in fields.enumerate() {
        map.assign(i, field);
    }
    map
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Read a ledger file into raw records, dispatching on the extension.
/// Malformed rows flow through untouched; skipping is the parser's job so
/// the policy lives in one place.
pub fn read_ledger(path: &Path) -> Result<Vec<RawRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" | "txt" | "" => read_csv(path),
        #[cfg(feature = "xlsx")]
        "xlsx" | "xls" | "ods" => read_xlsx(path),
        other => Err(PossoError::UnknownFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

pub fn read_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path)?;
    read_csv_from(std::io::BufReader::new(file))
}

/// Parse CSV content from any reader. Bank and spreadsheet exports often
/// carry preamble lines, so the header row is searched for, not assumed.
pub fn read_csv_from<R: std::io::Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut columns: Option<ColumnMap> = None;

    for result in rdr.records() {
        let record = result?;
        let Some(map) = columns else {
            let candidate = map_header_fields(record.iter());
            if candidate.is_usable() {
                columns = Some(candidate);
            }
            continue;
        };

        let get = |idx: Option<usize>| -> String {
            idx.and_then(|i| record.get(i))
                .unwrap_or("")
                .trim()
                .to_string()
        };
        let raw = RawRecord {
            date: get(map.date),
            kind: get(map.kind),
            category: get(map.category),
            amount: get(map.amount),
            payment_method: get(map.payment),
        };
        // Blank filler rows are not worth a skip report.
        if raw.date.is_empty() && raw.amount.is_empty() {
            continue;
        }
        rows.push(raw);
    }

    if columns.is_none() {
        return Err(PossoError::Other(
            "no ledger header row found (need at least date and amount columns)".to_string(),
        ));
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// XLSX (feature-gated)
// ---------------------------------------------------------------------------

#[cfg(any(feature = "xlsx", test))]
pub fn excel_serial_to_date(serial: f64) -> String {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug).
    let base = chrono::NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();
    let date = base + chrono::Duration::days(serial as i64);
    date.format("%d/%m/%Y").to_string()
}

#[cfg(feature = "xlsx")]
fn cell_text(cell: &calamine::Data, date_like: bool) -> String {
    use calamine::Data;
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if date_like {
                excel_serial_to_date(*f)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => {
            if date_like {
                excel_serial_to_date(*i as f64)
            } else {
                i.to_string()
            }
        }
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()),
        _ => String::new(),
    }
}

#[cfg(feature = "xlsx")]
fn parse_sheet_rows(
    range: &calamine::Range<calamine::Data>,
    implied_kind: Option<&str>,
) -> Vec<RawRecord> {
    let mut rows = Vec::new();
    let mut columns: Option<ColumnMap> = None;

    for row in range.rows() {
        let Some(map) = columns else {
            let texts: Vec<String> = row.iter().map(|c| cell_text(c, false)).collect();
            let candidate = map_header_fields(texts.iter().map(|s| s.as_str()));
            if candidate.is_usable() {
                columns = Some(candidate);
            }
            continue;
        };

        let get = |idx: Option<usize>, date_like: bool| -> String {
            idx.and_then(|i| row.get(i))
                .map(|c| cell_text(c, date_like))
                .unwrap_or_default()
        };
        let raw = RawRecord {
            date: get(map.date, true),
            kind: match map.kind {
                Some(_) => get(map.kind, false),
                None => implied_kind.unwrap_or("").to_string(),
            },
            category: get(map.category, false),
            amount: get(map.amount, false),
            payment_method: get(map.payment, false),
        };
        if raw.date.is_empty() && raw.amount.is_empty() {
            continue;
        }
        rows.push(raw);
    }
    rows
}

/// Read an XLSX workbook. The original spreadsheet layout keeps income and
/// expenses on `receita`/`despesa` worksheets with the kind implied by the
/// sheet; a workbook without those sheets is read like a CSV, first sheet,
/// explicit type column.
#[cfg(feature = "xlsx")]
pub fn read_xlsx(path: &Path) -> Result<Vec<RawRecord>> {
    use calamine::Reader;

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| PossoError::Other(format!("failed to open workbook: {e}")))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let kinded: Vec<(String, &str)> = sheet_names
        .iter()
        .filter_map(|name| match fold(name).as_str() {
            "receita" | "receitas" => Some((name.clone(), "Receita")),
            "despesa" | "despesas" => Some((name.clone(), "Despesa")),
            _ => None,
        })
        .collect();

    let mut rows = Vec::new();
    if kinded.is_empty() {
        let first = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| PossoError::Other("workbook has no sheets".to_string()))?;
        if let Ok(range) = workbook.worksheet_range(&first) {
            rows.extend(parse_sheet_rows(&range, None));
        }
    } else {
        for (name, kind) in &kinded {
            if let Ok(range) = workbook.worksheet_range(name) {
                rows.extend(parse_sheet_rows(&range, Some(kind)));
            }
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_portuguese_headers() {
        let content = "\
Data,Tipo,Categoria,Valor,Forma de Pagamento
05/01/2025,Receita,Salário,\"4.000,00\",Depósito
07/01/2025,Despesa,Alimentação,\"200,00\",Cartão de Crédito
";
        let rows = read_csv_from(content.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, "Receita");
        assert_eq!(rows[0].amount, "4.000,00");
        assert_eq!(rows[1].payment_method, "Cartão de Crédito");
    }

    #[test]
    fn test_read_csv_english_headers() {
        let content = "\
Date,Type,Category,Amount,Payment Method
2025-01-05,income,Salary,4000.00,deposit
2025-01-07,expense,Groceries,200.00,credit card
";
        let rows = read_csv_from(content.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].category, "Groceries");
        assert_eq!(rows[1].amount, "200.00");
    }

    #[test]
    fn test_read_csv_skips_preamble_and_blank_rows() {
        let content = "\
Minha Planilha de Gastos
Exportado em 01/02/2025

Data,Tipo,Categoria,Valor,Forma de Pagamento
05/01/2025,Despesa,Lazer,\"100,00\",Pix

07/01/2025,Despesa,Transporte,\"50,00\",Dinheiro
";
        let rows = read_csv_from(content.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "Lazer");
        assert_eq!(rows[1].category, "Transporte");
    }

    #[test]
    fn test_read_csv_without_header_errors() {
        let content = "05/01/2025,Despesa,Lazer,100,Pix\n";
        assert!(read_csv_from(content.as_bytes()).is_err());
    }

    #[test]
    fn test_read_csv_malformed_rows_flow_through() {
        // The importer maps columns; deciding what is parseable is the
        // ledger parser's job.
        let content = "\
Data,Tipo,Categoria,Valor,Forma de Pagamento
not-a-date,Despesa,Lazer,abc,Pix
";
        let rows = read_csv_from(content.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "not-a-date");
        assert_eq!(rows[0].amount, "abc");
    }

    #[test]
    fn test_read_ledger_from_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gastos.csv");
        std::fs::write(
            &path,
            "Data,Tipo,Categoria,Valor,Forma de Pagamento\n05/01/2025,Despesa,Lazer,\"100,00\",Pix\n",
        )
        .unwrap();
        let rows = read_ledger(&path).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_read_ledger_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gastos.pdf");
        std::fs::write(&path, "whatever").unwrap();
        assert!(matches!(
            read_ledger(&path),
            Err(PossoError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(excel_serial_to_date(45667.0), "10/01/2025");
    }

    #[test]
    fn test_header_mapping_is_accent_insensitive() {
        let map = map_header_fields(
            ["DATA", "TIPO", "CATEGORIA", "VALOR", "FORMA DE PAGAMENTO"].into_iter(),
        );
        assert!(map.is_usable());
        assert_eq!(map.kind, Some(1));
        assert_eq!(map.payment, Some(4));
    }
}
