//! CSV scoring: one applicant per input row, one decision per output row.

use std::io::{Read, Write};

use serde::Serialize;
use tracing::{info, warn};

use crate::encoding::ApplicantInput;
use crate::prediction::{LoanPredictor, PredictionError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub rows: usize,
    pub approved: usize,
    pub denied: usize,
    pub rejected: usize,
}

/// Written up front so that an input without applicants still yields a header.
const OUTPUT_HEADER: [&str; 6] = [
    "row",
    "verdict",
    "approval_probability",
    "threshold",
    "confidence",
    "error",
];

#[derive(Debug, Serialize)]
struct ScoredRow {
    row: usize,
    verdict: Option<&'static str>,
    approval_probability: Option<f64>,
    threshold: Option<f64>,
    confidence: Option<&'static str>,
    error: Option<String>,
}

impl ScoredRow {
    fn rejected(row: usize, error: String) -> Self {
        Self {
            row,
            verdict: None,
            approval_probability: None,
            threshold: None,
            confidence: None,
            error: Some(error),
        }
    }
}

/// Scores every row of `reader` and writes the results to `writer`.
///
/// Rows that fail to parse or validate are written with an `error` column and
/// counted as rejected. A schema mismatch or model failure aborts the batch,
/// since every following row would fail the same way.
pub fn score_csv<R: Read, W: Write>(
    predictor: &LoanPredictor,
    reader: R,
    writer: W,
) -> Result<BatchSummary, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(OUTPUT_HEADER)?;
    let mut summary = BatchSummary::default();

    for (index, record) in csv_reader.deserialize::<ApplicantInput>().enumerate() {
        let row = index + 1;
        summary.rows += 1;

        let scored = match record {
            Ok(input) => match predictor.predict(&input) {
                Ok(prediction) => {
                    let decision = prediction.decision;
                    if decision.approved() {
                        summary.approved += 1;
                    } else {
                        summary.denied += 1;
                    }
                    ScoredRow {
                        row,
                        verdict: Some(decision.verdict.label()),
                        approval_probability: Some(decision.approval_probability),
                        threshold: Some(decision.threshold),
                        confidence: Some(decision.confidence.label()),
                        error: None,
                    }
                }
                Err(PredictionError::Invalid(err)) => {
                    summary.rejected += 1;
                    ScoredRow::rejected(row, err.to_string())
                }
                Err(err) => return Err(BatchError::Prediction { row, source: err }),
            },
            Err(err) if err.is_io_error() => return Err(BatchError::Csv(err)),
            Err(err) => {
                warn!(row, error = %err, "unparseable applicant row");
                summary.rejected += 1;
                ScoredRow::rejected(row, err.to_string())
            }
        };

        csv_writer.serialize(scored)?;
    }

    csv_writer.flush()?;

    info!(
        rows = summary.rows,
        approved = summary.approved,
        denied = summary.denied,
        rejected = summary.rejected,
        "batch scored"
    );

    Ok(summary)
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("row {row}: {source}")]
    Prediction {
        row: usize,
        source: PredictionError,
    },
}
