//! Median imputation for the numeric feature columns

use serde::Serialize;
use shared::{FeatureColumn, FeatureVector, RawFeatureRow, NUM_FEATURES, NUM_IMPUTED_FEATURES};

use crate::error::PipelineError;

use super::features::DEFAULT_LOCATION_CODE;

/// Per-column medians learned from training rows.
///
/// Fit once; the same medians fill gaps in every later input.
#[derive(Debug, Clone, Serialize)]
pub struct MedianImputer {
    medians: [f64; NUM_IMPUTED_FEATURES],
}

impl MedianImputer {
    /// Learn column medians from the training rows
    pub fn fit(rows: &[RawFeatureRow]) -> Result<Self, PipelineError> {
        let mut medians = [0.0; NUM_IMPUTED_FEATURES];
        for (col, slot) in medians.iter_mut().enumerate() {
            let mut observed: Vec<f64> = rows.iter().filter_map(|row| row[col]).collect();
            *slot = median(&mut observed).ok_or_else(|| {
                PipelineError::NoObservedValues(FeatureColumn::ALL[col].field_name().to_string())
            })?;
        }
        Ok(Self { medians })
    }

    /// Fill missing numeric values with the stored medians
    pub fn transform(&self, row: &RawFeatureRow) -> FeatureVector {
        let mut values = [0.0; NUM_FEATURES];
        for (col, value) in values.iter_mut().enumerate() {
            *value = match row[col] {
                Some(v) => v,
                None if col < NUM_IMPUTED_FEATURES => self.medians[col],
                None => DEFAULT_LOCATION_CODE as f64,
            };
        }
        FeatureVector(values)
    }

    pub fn transform_all(&self, rows: &[RawFeatureRow]) -> Vec<FeatureVector> {
        rows.iter().map(|row| self.transform(row)).collect()
    }

    /// Median for one column; `None` for the location code, which is never imputed
    pub fn median(&self, column: FeatureColumn) -> Option<f64> {
        self.medians.get(column.index()).copied()
    }

    pub fn medians(&self) -> &[f64; NUM_IMPUTED_FEATURES] {
        &self.medians
    }
}

/// Median of a set of values; the mean of the two middle values for even counts
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
