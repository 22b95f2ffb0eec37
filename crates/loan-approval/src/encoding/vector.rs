use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One encoded row, positionally aligned with the schema it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub(crate) fn zeroed(columns: &[String]) -> Self {
        Self {
            columns: columns.to_vec(),
            values: vec![0.0; columns.len()],
        }
    }

    pub(crate) fn set(&mut self, position: usize, value: f64) {
        self.values[position] = value;
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|position| self.values[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Positional row for a model fit on `expected`. Any difference in count,
    /// names or order is a configuration defect.
    pub fn aligned_to(&self, expected: &[String]) -> Result<Vec<f64>, SchemaMismatch> {
        match SchemaMismatch::compare(MismatchStage::ModelInput, expected, &self.columns) {
            Some(mismatch) => Err(mismatch),
            None => Ok(self.values.clone()),
        }
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

impl Serialize for FeatureVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, &value)?;
        }
        map.end()
    }
}

/// Point in the pipeline where the row shape was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchStage {
    /// Model artifact feature names compared with the configured schema at startup.
    Startup,
    /// Encoded row compared with the model's trained columns.
    ModelInput,
    /// Row width entering or leaving the scaling transform.
    Scaling,
}

impl MismatchStage {
    const fn label(self) -> &'static str {
        match self {
            MismatchStage::Startup => "startup",
            MismatchStage::ModelInput => "model input",
            MismatchStage::Scaling => "scaling",
        }
    }
}

/// Encoded row does not match what the model was trained on. Fatal, never retried.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaMismatch {
    pub stage: MismatchStage,
    pub expected_len: usize,
    pub found_len: usize,
    /// First position whose name differs, with the expected and found names.
    pub first_divergence: Option<(usize, String, String)>,
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
}

impl SchemaMismatch {
    pub fn compare(
        stage: MismatchStage,
        expected: &[String],
        found: &[String],
    ) -> Option<SchemaMismatch> {
        if expected == found {
            return None;
        }

        let first_divergence = expected
            .iter()
            .zip(found.iter())
            .enumerate()
            .find(|(_, (left, right))| left != right)
            .map(|(position, (left, right))| (position, left.clone(), right.clone()));

        let missing = expected
            .iter()
            .filter(|name| !found.contains(name))
            .cloned()
            .collect();
        let unexpected = found
            .iter()
            .filter(|name| !expected.contains(name))
            .cloned()
            .collect();

        Some(SchemaMismatch {
            stage,
            expected_len: expected.len(),
            found_len: found.len(),
            first_divergence,
            missing,
            unexpected,
        })
    }

    /// Width-only check for stages where column names are not available.
    pub fn width(stage: MismatchStage, expected_len: usize, found_len: usize) -> Option<Self> {
        if expected_len == found_len {
            return None;
        }

        Some(SchemaMismatch {
            stage,
            expected_len,
            found_len,
            first_divergence: None,
            missing: Vec::new(),
            unexpected: Vec::new(),
        })
    }
}

impl fmt::Display for SchemaMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "schema mismatch at {}: expected {} columns, found {}",
            self.stage.label(),
            self.expected_len,
            self.found_len
        )?;

        if let Some((position, expected, found)) = &self.first_divergence {
            write!(
                f,
                "; column {position} should be '{expected}' but is '{found}'"
            )?;
        }
        if !self.missing.is_empty() {
            write!(f, "; missing [{}]", self.missing.join(", "))?;
        }
        if !self.unexpected.is_empty() {
            write!(f, "; unexpected [{}]", self.unexpected.join(", "))?;
        }

        Ok(())
    }
}

impl std::error::Error for SchemaMismatch {}
