use crate::cli::ModelArgs;
use chrono::Local;
use clap::Args;
use loan_approval::config::AppConfig;
use loan_approval::encoding::{
    EmploymentSector, EmploymentStatus, FeatureSchema, Lender, LoanReason,
};
use loan_approval::error::AppError;
use loan_approval::prediction::{LoanPrediction, LoanPredictor, Recommendation};
use loan_approval::wizard::{ApplicantInfo, FinancialDetails, FormStepper};
use loan_approval::{batch, load_predictor, telemetry};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Purpose of the loan (e.g. debt_consolidation, home_improvement)
    #[arg(long)]
    pub(crate) reason: LoanReason,
    /// full_time, part_time, unemployed or self_employed
    #[arg(long)]
    pub(crate) employment_status: EmploymentStatus,
    /// Employment sector (e.g. information_technology, other)
    #[arg(long)]
    pub(crate) employment_sector: EmploymentSector,
    /// Preferred lender: A, B or C
    #[arg(long)]
    pub(crate) lender: Lender,
    /// Requested loan amount in dollars
    #[arg(long)]
    pub(crate) loan_amount: f64,
    /// FICO score (300-850)
    #[arg(long)]
    pub(crate) fico: u16,
    /// Monthly gross income in dollars
    #[arg(long)]
    pub(crate) income: f64,
    /// Monthly housing payment in dollars
    #[arg(long)]
    pub(crate) housing: f64,
    /// Applicant has a bankruptcy or foreclosure on record
    #[arg(long)]
    pub(crate) bankrupt: bool,
    /// Print the full prediction as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Applicant CSV; reads stdin when omitted
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Decision CSV; writes stdout when omitted
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

#[derive(Args, Debug)]
pub(crate) struct SchemaArgs {
    /// Schema version name or schema JSON path (defaults to LOAN_SCHEMA)
    #[arg(long)]
    pub(crate) schema: Option<String>,
    /// Print the schema as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

fn prepare(model: ModelArgs) -> Result<LoanPredictor, AppError> {
    let mut config = AppConfig::load()?;
    model.apply(&mut config.model);
    telemetry::init(&config.telemetry)?;
    load_predictor(&config.model)
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs {
        reason,
        employment_status,
        employment_sector,
        lender,
        loan_amount,
        fico,
        income,
        housing,
        bankrupt,
        json,
        model,
    } = args;

    let predictor = prepare(model)?;

    let mut stepper = FormStepper::new();
    stepper.submit_applicant(ApplicantInfo {
        reason,
        employment_status,
        employment_sector,
        lender,
    })?;
    stepper.submit_financials(FinancialDetails {
        requested_loan_amount: loan_amount,
        fico_score: fico,
        monthly_gross_income: income,
        monthly_housing_payment: housing,
        ever_bankrupt_or_foreclosed: bankrupt,
    })?;
    let input = stepper.submission()?;

    let prediction = predictor.predict(&input)?;

    if json {
        let body = CliPrediction {
            evaluated_at: Local::now().to_rfc3339(),
            prediction: &prediction,
        };
        println!("{}", to_json(&body)?);
    } else {
        render_prediction(&prediction);
    }

    Ok(())
}

#[derive(Serialize)]
struct CliPrediction<'a> {
    evaluated_at: String,
    #[serde(flatten)]
    prediction: &'a LoanPrediction,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|err| AppError::Io(err.into()))
}

fn render_prediction(prediction: &LoanPrediction) {
    let decision = &prediction.decision;
    let assessment = &prediction.assessment;

    println!("Loan approval prediction ({})", prediction.schema_version);
    println!("- Applicant is {}", decision.summary());
    println!(
        "- Class probabilities: denied {:.1}% | approved {:.1}% | threshold {:.2}",
        decision.probabilities.denied * 100.0,
        decision.probabilities.approved * 100.0,
        decision.threshold
    );
    println!(
        "- FICO band {} | DTI {:.1}% | loan-to-income {:.2}x",
        assessment.fico_band.label(),
        assessment.debt_to_income * 100.0,
        assessment.loan_to_income
    );

    for warning in &assessment.warnings {
        println!("  ! {warning}");
    }

    if !assessment.positive_factors.is_empty() {
        println!("Positive factors:");
        for factor in &assessment.positive_factors {
            println!("  + {factor}");
        }
    }
    if !assessment.risk_factors.is_empty() {
        println!("Risk factors:");
        for factor in &assessment.risk_factors {
            println!("  - {factor}");
        }
    }

    let steps = match &assessment.recommendation {
        Recommendation::Improve { steps } => {
            println!("Ways to strengthen a future application:");
            steps
        }
        Recommendation::NextSteps { steps, .. } => {
            println!("Next steps:");
            steps
        }
    };
    for step in steps {
        println!("  * {step}");
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        input,
        output,
        model,
    } = args;

    let predictor = prepare(model)?;

    let reader: Box<dyn Read> = match &input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    let summary = batch::score_csv(&predictor, reader, writer)?;

    info!(
        input = ?input,
        output = ?output,
        rows = summary.rows,
        "scoring finished"
    );
    eprintln!(
        "scored {} rows: {} approved, {} denied, {} rejected",
        summary.rows, summary.approved, summary.denied, summary.rejected
    );

    Ok(())
}

pub(crate) fn run_schema(args: SchemaArgs) -> Result<(), AppError> {
    let selector = match args.schema {
        Some(selector) => selector,
        None => AppConfig::load()?.model.schema,
    };
    let schema = FeatureSchema::resolve(&selector)?;

    if args.json {
        println!("{}", to_json(&schema)?);
    } else {
        print!("{}", describe_schema(&schema));
    }

    Ok(())
}

fn describe_schema(schema: &FeatureSchema) -> String {
    let bounds = schema.loan_amount_bounds();
    let mut out = format!(
        "Schema {} ({} columns, loan amount {}-{})\n",
        schema.version(),
        schema.len(),
        bounds.min,
        bounds.max
    );
    for (position, column) in schema.columns().iter().enumerate() {
        out.push_str(&format!("{position:>3}  {column}\n"));
    }
    out.push_str("Reference levels:\n");
    for field in schema.categorical_fields() {
        out.push_str(&format!("  {} = {}\n", field.prefix, field.reference));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_description_lists_columns_and_references() {
        let text = describe_schema(&FeatureSchema::legacy_v1());

        assert!(text.starts_with("Schema legacy_v1 (29 columns, loan amount 500-150000)"));
        assert!(text.contains("  6  Reason_debt_conslidation\n"));
        assert!(text.contains("  Fico_Score_group = excellent\n"));
        assert!(text.contains("  Employment_Sector = other\n"));
    }

    #[test]
    fn engineered_description_uses_unknown_sector_reference() {
        let text = describe_schema(&FeatureSchema::engineered_v2());

        assert!(text.contains("  Employment_Sector = unknown\n"));
        assert!(text.contains("  Reason = business\n"));
        assert!(!text.contains("Fico_Score_group"));
    }
}
