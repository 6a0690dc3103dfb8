//! Fan-in of variant outcomes into one `JobOutcome`
//!
//! Outcomes are accepted in any order. Every label of the size table must
//! report exactly once; duplicates and unknown labels are rejected so the
//! caller can surface them instead of silently absorbing them.

use crate::error::{Result, TranscodeError};
use crate::models::{JobOutcome, SizeSpec, VariantOutcome};
use std::collections::HashSet;
use tracing::error;

#[derive(Debug)]
pub struct Aggregator {
    expected: Vec<String>,
    reported: HashSet<String>,
    outcome: JobOutcome,
}

impl Aggregator {
    pub fn new(job_id: impl Into<String>, sizes: &[SizeSpec]) -> Self {
        Self {
            expected: sizes.iter().map(|s| s.label.clone()).collect(),
            reported: HashSet::with_capacity(sizes.len()),
            outcome: JobOutcome {
                job_id: job_id.into(),
                ..Default::default()
            },
        }
    }

    /// Record the outcome of `label`
    pub fn record(&mut self, label: &str, outcome: VariantOutcome) -> Result<()> {
        if !self.expected.iter().any(|l| l == label) {
            return Err(TranscodeError::UnknownVariant {
                label: label.to_string(),
            });
        }
        if !self.reported.insert(label.to_string()) {
            return Err(TranscodeError::DuplicateReport {
                label: label.to_string(),
            });
        }

        match outcome {
            VariantOutcome::Produced(result) => self.outcome.produced_variants.push(result),
            VariantOutcome::Skipped => self.outcome.skipped.push(label.to_string()),
            VariantOutcome::Failed(e) => self.outcome.errors.push(e),
        }
        Ok(())
    }

    /// Keep an error that is not tied to a single variant outcome
    pub fn surface(&mut self, err: TranscodeError) {
        error!(job_id = %self.outcome.job_id, error = %err, "Aggregation defect");
        self.outcome.errors.push(err);
    }

    /// Labels that have not reported yet
    pub fn pending(&self) -> Vec<&str> {
        self.expected
            .iter()
            .filter(|l| !self.reported.contains(l.as_str()))
            .map(|l| l.as_str())
            .collect()
    }

    /// Close the barrier. Any label that never reported becomes an error, so
    /// every size resolves to exactly one of produced, skipped or failed.
    pub fn finish(mut self) -> JobOutcome {
        let missing: Vec<String> = self.pending().into_iter().map(str::to_string).collect();
        for label in missing {
            self.surface(TranscodeError::transform(&label, "no outcome reported"));
        }
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VariantResult;

    fn table() -> Vec<SizeSpec> {
        SizeSpec::default_table()
            .into_iter()
            .filter(|s| s.enabled)
            .collect()
    }

    fn produced(label: &str) -> VariantOutcome {
        VariantOutcome::Produced(VariantResult {
            label: label.to_string(),
            width: 2,
            height: 2,
        })
    }

    fn outcome_for(label: &str) -> VariantOutcome {
        match label {
            "L" | "S" => produced(label),
            "M" => VariantOutcome::Failed(TranscodeError::transform("M", "boom")),
            _ => VariantOutcome::Skipped,
        }
    }

    #[test]
    fn test_completeness_for_every_rotation_and_reversal() {
        let sizes = table();
        let labels: Vec<String> = sizes.iter().map(|s| s.label.clone()).collect();

        for shift in 0..labels.len() {
            for reverse in [false, true] {
                let mut order = labels.clone();
                order.rotate_left(shift);
                if reverse {
                    order.reverse();
                }

                let mut aggregator = Aggregator::new("vacation.jpg", &sizes);
                for label in &order {
                    aggregator.record(label, outcome_for(label)).unwrap();
                }
                assert!(aggregator.pending().is_empty());

                let outcome = aggregator.finish();
                assert_eq!(outcome.resolved(), sizes.len());
                assert_eq!(outcome.produced_variants.len(), 2);
                assert_eq!(outcome.skipped.len(), 2);
                assert_eq!(outcome.errors.len(), 1);
            }
        }
    }

    #[test]
    fn test_produced_variants_keep_completion_order() {
        let sizes = table();
        let mut aggregator = Aggregator::new("a.jpg", &sizes);
        for label in ["thumbnail", "L", "XS", "M", "S"] {
            aggregator.record(label, produced(label)).unwrap();
        }
        let labels: Vec<String> = aggregator
            .finish()
            .produced_variants
            .into_iter()
            .map(|v| v.label)
            .collect();
        assert_eq!(labels, vec!["thumbnail", "L", "XS", "M", "S"]);
    }

    #[test]
    fn test_duplicate_report_is_rejected() {
        let sizes = table();
        let mut aggregator = Aggregator::new("a.jpg", &sizes);
        aggregator.record("L", produced("L")).unwrap();

        let err = aggregator.record("L", VariantOutcome::Skipped).unwrap_err();
        assert!(matches!(err, TranscodeError::DuplicateReport { ref label } if label == "L"));
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let sizes = table();
        let mut aggregator = Aggregator::new("a.jpg", &sizes);
        let err = aggregator.record("XXL", VariantOutcome::Skipped).unwrap_err();
        assert!(matches!(err, TranscodeError::UnknownVariant { .. }));
    }

    #[test]
    fn test_finish_reports_missing_labels_as_errors() {
        let sizes = table();
        let mut aggregator = Aggregator::new("a.jpg", &sizes);
        aggregator.record("L", produced("L")).unwrap();
        aggregator.record("M", VariantOutcome::Skipped).unwrap();

        let outcome = aggregator.finish();
        assert_eq!(outcome.errors.len(), 3);
        assert_eq!(outcome.resolved(), sizes.len());
    }
}
