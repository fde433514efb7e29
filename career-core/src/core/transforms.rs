//! Composite Feature Transform
//!
//! Collapses the nine per-subject percentage fields into five composite
//! scores before one-hot expansion and scaling:
//!
//! | Composite                  | Sources                                         |
//! |----------------------------|-------------------------------------------------|
//! | Knowledge Engineering      | Algorithms, Mathematics                         |
//! | System Engineering         | Operating Systems, Architecture, Electronics    |
//! | Networks and Security      | Computer Networks, Communication skills         |
//! | Software Development       | Programming Concepts, Software Engineering      |
//! | Professional Development   | Communication skills, Mathematics               |
//!
//! This is the only implementation of the transform. Training and serving
//! both go through [`engineer`].

use crate::core::record::{FieldValue, Record};
use crate::error::{CareerError, Result};

pub const ALGORITHMS: &str = "percentage in Algorithms";
pub const MATHEMATICS: &str = "Percentage in Mathematics";
pub const OPERATING_SYSTEMS: &str = "Acedamic percentage in Operating Systems";
pub const COMPUTER_ARCHITECTURE: &str = "Percentage in Computer Architecture";
pub const ELECTRONICS: &str = "Percentage in Electronics Subjects";
pub const COMPUTER_NETWORKS: &str = "Percentage in Computer Networks";
pub const COMMUNICATION_SKILLS: &str = "Percentage in Communication skills";
pub const PROGRAMMING_CONCEPTS: &str = "Percentage in Programming Concepts";
pub const SOFTWARE_ENGINEERING: &str = "Percentage in Software Engineering";

/// A derived feature: the arithmetic mean of its sources.
#[derive(Debug, Clone, Copy)]
pub struct CompositeFeature {
    pub name: &'static str,
    pub sources: &'static [&'static str],
}

/// Composites in output order.
pub const COMPOSITES: [CompositeFeature; 5] = [
    CompositeFeature {
        name: "Knowledge Engineering",
        sources: &[ALGORITHMS, MATHEMATICS],
    },
    CompositeFeature {
        name: "System Engineering",
        sources: &[OPERATING_SYSTEMS, COMPUTER_ARCHITECTURE, ELECTRONICS],
    },
    CompositeFeature {
        name: "Networks and Security",
        sources: &[COMPUTER_NETWORKS, COMMUNICATION_SKILLS],
    },
    CompositeFeature {
        name: "Software Development",
        sources: &[PROGRAMMING_CONCEPTS, SOFTWARE_ENGINEERING],
    },
    CompositeFeature {
        name: "Professional Development",
        sources: &[COMMUNICATION_SKILLS, MATHEMATICS],
    },
];

/// Source fields dropped after the composites are computed.
pub const SOURCE_FIELDS: [&str; 9] = [
    ALGORITHMS,
    MATHEMATICS,
    OPERATING_SYSTEMS,
    COMPUTER_ARCHITECTURE,
    ELECTRONICS,
    COMPUTER_NETWORKS,
    COMMUNICATION_SKILLS,
    PROGRAMMING_CONCEPTS,
    SOFTWARE_ENGINEERING,
];

impl CompositeFeature {
    /// Mean of the source values in `record`.
    ///
    /// Returns `Ok(None)` when every source is absent, so the caller can
    /// decide whether an existing composite should be kept.
    fn evaluate(&self, record: &Record) -> Result<Option<f64>> {
        if self.sources.iter().all(|s| !record.contains(s)) {
            return Ok(None);
        }

        let mut sum = 0.0;
        for &source in self.sources {
            let value = record
                .get(source)
                .ok_or_else(|| CareerError::MissingField(source.to_string()))?;
            sum += numeric(source, value)?;
        }
        Ok(Some(sum / self.sources.len() as f64))
    }
}

fn numeric(field: &str, value: &FieldValue) -> Result<f64> {
    value.as_number().ok_or_else(|| CareerError::InvalidValue {
        field: field.to_string(),
        reason: format!("expected a number, got '{value}'"),
    })
}

/// Apply the composite transform to one record.
///
/// Every composite is computed before any source is dropped (two composites
/// share `Mathematics` and `Communication skills`). Pass-through fields keep
/// their order; composites are appended in [`COMPOSITES`] order.
pub fn engineer(record: &Record) -> Result<Record> {
    let mut derived = Vec::with_capacity(COMPOSITES.len());
    for composite in &COMPOSITES {
        let value = match composite.evaluate(record)? {
            Some(v) => v,
            None => match record.get(composite.name) {
                // already engineered
                Some(existing) => numeric(composite.name, existing)?,
                None => return Err(CareerError::MissingField(composite.sources[0].to_string())),
            },
        };
        derived.push((composite.name, value));
    }

    let mut out: Record = record
        .iter()
        .filter(|(name, _)| !SOURCE_FIELDS.contains(name))
        .filter(|(name, _)| !COMPOSITES.iter().any(|c| c.name == *name))
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();

    for (name, value) in derived {
        out.insert(name, FieldValue::Number(value));
    }

    Ok(out)
}

/// Apply the transform to a batch of records.
pub fn engineer_all(records: &[Record]) -> Result<Vec<Record>> {
    records.iter().map(engineer).collect()
}
