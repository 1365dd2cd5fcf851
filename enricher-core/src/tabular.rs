use crate::data::{Record, Scalar};
use crate::error::{Result, SourceError};
use crate::sources::TabularSource;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Cell texts read as missing values.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// CSV reader producing typed records keyed by header name.
///
/// Rows shorter than the header are padded with nulls; longer rows fail the read.
#[derive(Debug, Clone)]
pub struct CsvReader {
    delimiter: u8,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn read_path(&self, path: &Path) -> Result<Vec<Record>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_path(path)?;

        let headers = column_names(reader.headers()?);
        if headers.is_empty() {
            return Err(SourceError::EmptyCsv);
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            if row.len() > headers.len() {
                return Err(SourceError::RowLength {
                    line: row.position().map(|p| p.line()).unwrap_or(0),
                    expected: headers.len(),
                    found: row.len(),
                });
            }
            records.push(to_record(&headers, &row));
        }

        debug!("Read {} rows from {}", records.len(), path.display());
        Ok(records)
    }
}

impl TabularSource for CsvReader {
    fn parse_csv(&self, path: &Path) -> Result<Vec<Record>> {
        self.read_path(path)
    }
}

/// Header names made unique: blanks become `Unnamed: <index>`, repeats get a `.N` suffix.
fn column_names(headers: &StringRecord) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let base = if header.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                header.to_string()
            };

            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

fn to_record(headers: &[String], row: &StringRecord) -> Record {
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let cell = row.get(idx).map(infer_scalar).unwrap_or(Scalar::Null);
            (header.clone(), cell)
        })
        .collect()
}

/// Type a raw cell: missing, boolean, integer, float, else text.
pub fn infer_scalar(cell: &str) -> Scalar {
    if NA_VALUES.contains(&cell) {
        return Scalar::Null;
    }

    match cell {
        "true" | "True" | "TRUE" => return Scalar::Bool(true),
        "false" | "False" | "FALSE" => return Scalar::Bool(false),
        _ => {}
    }

    if let Ok(i) = cell.parse::<i64>() {
        return Scalar::Int(i);
    }

    // "inf" and friends parse as f64 but stay text here
    if cell.bytes().any(|b| b.is_ascii_digit())
        && let Ok(x) = cell.parse::<f64>()
    {
        return Scalar::Float(x);
    }

    Scalar::Text(cell.to_string())
}
