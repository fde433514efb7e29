//! Held-out evaluation: accuracy and a per-class precision/recall report.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fraction of matching predictions.
pub fn accuracy(truth: &[usize], predicted: &[usize]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
    correct as f64 / truth.len() as f64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_f1: f64,
}

impl ClassificationReport {
    /// Build the report; `labels[i]` names class index `i`.
    pub fn new(truth: &[usize], predicted: &[usize], labels: &[String]) -> Self {
        let n = labels.len();
        let mut tp = vec![0usize; n];
        let mut fp = vec![0usize; n];
        let mut support = vec![0usize; n];

        for (&t, &p) in truth.iter().zip(predicted) {
            if t < n {
                support[t] += 1;
            }
            if t == p && t < n {
                tp[t] += 1;
            } else if p < n {
                fp[p] += 1;
            }
        }

        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };

        let classes: Vec<ClassMetrics> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let precision = ratio(tp[i], tp[i] + fp[i]);
                let recall = ratio(tp[i], support[i]);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    label: label.clone(),
                    precision,
                    recall,
                    f1,
                    support: support[i],
                }
            })
            .collect();

        let macro_f1 = if classes.is_empty() {
            0.0
        } else {
            classes.iter().map(|c| c.f1).sum::<f64>() / classes.len() as f64
        };

        Self {
            classes,
            accuracy: accuracy(truth, predicted),
            macro_f1,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.len())
            .max()
            .unwrap_or(5)
            .max(12);
        writeln!(
            f,
            "{:>width$}  {:>9}  {:>9}  {:>9}  {:>7}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>7}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:>width$}  {:>31.2}", "accuracy", self.accuracy)?;
        write!(f, "{:>width$}  {:>31.2}", "macro f1", self.macro_f1)
    }
}
