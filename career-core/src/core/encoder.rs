//! One-Hot Encoder and Column Reconciliation
//!
//! Strategy (same layout at train and serve time):
//! - Numeric field `f` → column `f` holding the value
//! - Text field `f` with value `v` → indicator column `f_v` = 1.0
//!
//! At training time [`OneHotEncoder::fit`] fixes the canonical column list.
//! At serving time a record is expanded and then reindexed against that
//! list: missing columns become 0.0, unexpected columns are dropped.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::record::{FieldValue, Record};
use crate::error::{CareerError, Result};

/// What to do with a categorical value that has no canonical column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownCategoryPolicy {
    /// Contribute nothing (all indicator columns stay 0).
    #[default]
    Ignore,
    /// Fail with [`CareerError::UnknownCategory`].
    Reject,
}

/// Name of the indicator column for `field` = `value`.
pub fn indicator_column(field: &str, value: &str) -> String {
    format!("{field}_{value}")
}

/// Ordered canonical column list captured at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureColumns {
    names: Vec<String>,
}

impl FeatureColumns {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Rebuild an expanded record against the canonical list.
    ///
    /// Output width is always `self.len()`.
    pub fn reindex(&self, expanded: &[(String, f64)]) -> Vec<f64> {
        let lookup: HashMap<&str, f64> = expanded
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();

        self.names
            .iter()
            .map(|name| lookup.get(name.as_str()).copied().unwrap_or(0.0))
            .collect()
    }

    /// Expand and reindex a record in one step, applying `policy` to text
    /// values without a canonical indicator column.
    pub fn encode(&self, record: &Record, policy: UnknownCategoryPolicy) -> Result<Vec<f64>> {
        if policy == UnknownCategoryPolicy::Reject {
            let unknown = record.iter().find_map(|(field, value)| match value {
                FieldValue::Text(text) if !self.contains(&indicator_column(field, text)) => {
                    Some((field, text))
                }
                _ => None,
            });
            if let Some((field, text)) = unknown {
                return Err(CareerError::UnknownCategory {
                    field: field.to_string(),
                    value: text.clone(),
                });
            }
        }

        // A number in a column that was categorical at training time
        // selects its indicator, matching `OneHotEncoder::transform`.
        let expanded: Vec<(String, f64)> = expand(record)
            .into_iter()
            .zip(record.iter())
            .map(|(entry, (field, value))| match value {
                FieldValue::Number(_) if !self.contains(field) => {
                    let indicator = indicator_column(field, &value.to_string());
                    if self.contains(&indicator) { (indicator, 1.0) } else { entry }
                }
                _ => entry,
            })
            .collect();

        Ok(self.reindex(&expanded))
    }
}

/// One-hot expansion of a single record.
pub fn expand(record: &Record) -> Vec<(String, f64)> {
    record
        .iter()
        .map(|(field, value)| match value {
            FieldValue::Number(n) => (field.to_string(), *n),
            FieldValue::Text(text) => (indicator_column(field, text), 1.0),
        })
        .collect()
}

/// Fits the canonical column list over a set of engineered records.
pub struct OneHotEncoder;

impl OneHotEncoder {
    /// Derive the canonical column layout.
    ///
    /// Numeric columns come first in first-seen order. Each categorical
    /// column (any text value observed) follows, in first-seen order, with
    /// one indicator per distinct value sorted lexicographically. Numbers
    /// seen in a categorical column are treated as their text form.
    pub fn fit(records: &[Record]) -> FeatureColumns {
        let mut order: Vec<&str> = Vec::new();
        let mut categorical: HashMap<&str, BTreeSet<String>> = HashMap::new();

        for record in records {
            for (field, value) in record.iter() {
                if !order.contains(&field) {
                    order.push(field);
                }
                if value.is_text() {
                    categorical.entry(field).or_default();
                }
            }
        }

        for record in records {
            for (field, value) in record.iter() {
                if let Some(values) = categorical.get_mut(field) {
                    values.insert(value.to_string());
                }
            }
        }

        let mut names: Vec<String> = order
            .iter()
            .filter(|field| !categorical.contains_key(*field))
            .map(|field| field.to_string())
            .collect();

        for field in order.iter().filter(|f| categorical.contains_key(*f)) {
            for value in &categorical[field] {
                names.push(indicator_column(field, value));
            }
        }

        FeatureColumns::new(names)
    }

    /// Encode records for training, where a column is categorical for the
    /// whole dataset as soon as one row holds text.
    pub fn transform(columns: &FeatureColumns, records: &[Record]) -> Vec<Vec<f64>> {
        let categorical: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.iter())
            .filter(|(_, v)| v.is_text())
            .map(|(field, _)| field)
            .collect();

        records
            .iter()
            .map(|record| {
                let expanded: Vec<(String, f64)> = record
                    .iter()
                    .map(|(field, value)| match value {
                        FieldValue::Number(n) if !categorical.contains(field) => {
                            (field.to_string(), *n)
                        }
                        other => (indicator_column(field, &other.to_string()), 1.0),
                    })
                    .collect();
                columns.reindex(&expanded)
            })
            .collect()
    }
}
