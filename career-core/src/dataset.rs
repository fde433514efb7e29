//! CSV dataset loading for the trainer.
//!
//! Every cell goes through [`FieldValue::parse`], the same normalization the
//! serving path applies to form input. Blank cells are missing values and
//! are left out of the row's record, so a sparse numeric column stays
//! numeric and encodes as 0.0 where absent.

use std::io::Read;
use std::path::Path;

use crate::core::record::{FieldValue, Record};
use crate::error::{CareerError, Result};

/// Feature records with their target labels, row-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledRecords {
    pub records: Vec<Record>,
    pub labels: Vec<String>,
}

impl LabeledRecords {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read a CSV file with a header row.
pub fn load_csv(path: &Path, target_column: &str, exclude: &[String]) -> Result<LabeledRecords> {
    if !path.is_file() {
        return Err(CareerError::DatasetNotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    let data = read_csv(file, target_column, exclude)?;
    tracing::info!(
        path = %path.display(),
        rows = data.len(),
        "dataset loaded"
    );
    Ok(data)
}

/// Parse CSV from any reader. Excluded columns are dropped and the target
/// column is split off; the target is kept as raw (trimmed) text.
pub fn read_csv<R: Read>(reader: R, target_column: &str, exclude: &[String]) -> Result<LabeledRecords> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let target_idx = headers
        .iter()
        .position(|h| h == target_column)
        .ok_or_else(|| CareerError::MissingField(target_column.to_string()))?;

    let keep: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(i, h)| *i != target_idx && !exclude.iter().any(|e| e == h))
        .collect();

    let mut data = LabeledRecords::default();
    for row in csv_reader.records() {
        let row = row?;
        let label = row
            .get(target_idx)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| CareerError::InvalidValue {
                field: target_column.to_string(),
                reason: format!("empty label on line {}", line_of(&row)),
            })?;

        // blank cells are missing values: the field is left out of the row
        let record: Record = keep
            .iter()
            .filter_map(|&(i, name)| {
                row.get(i)
                    .filter(|cell| !cell.trim().is_empty())
                    .map(|cell| (name, FieldValue::parse(cell)))
            })
            .collect();

        data.labels.push(label.to_string());
        data.records.push(record);
    }

    if data.is_empty() {
        return Err(CareerError::Training("dataset has no rows".into()));
    }
    Ok(data)
}

fn line_of(row: &csv::StringRecord) -> u64 {
    row.position().map(|p| p.line()).unwrap_or(0)
}
