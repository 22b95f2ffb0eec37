use crate::commands::{run_predict, run_schema, run_score, PredictArgs, SchemaArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_approval::config::ModelConfig;
use loan_approval::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Approval Predictor",
    about = "Score loan applications against a trained approval model",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk the application form from flags and print the decision
    Predict(PredictArgs),
    /// Score a CSV of applicants and write a CSV of decisions
    Score(ScoreArgs),
    /// Print the feature columns of a schema version
    Schema(SchemaArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

/// Artifact overrides shared by every command that loads the model.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ModelArgs {
    /// Model package JSON (overrides LOAN_MODEL_PATH)
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Standalone scaler JSON (overrides LOAN_SCALER_PATH)
    #[arg(long)]
    pub(crate) scaler: Option<PathBuf>,
    /// Schema version name or schema JSON path (overrides LOAN_SCHEMA)
    #[arg(long)]
    pub(crate) schema: Option<String>,
    /// Take column order from the model's recorded feature names
    #[arg(long)]
    pub(crate) schema_from_artifact: bool,
}

impl ModelArgs {
    pub(crate) fn apply(self, config: &mut ModelConfig) {
        if let Some(model) = self.model {
            config.model_path = model;
        }
        if let Some(scaler) = self.scaler {
            config.scaler_path = Some(scaler);
        }
        if let Some(schema) = self.schema {
            config.schema = schema;
        }
        if self.schema_from_artifact {
            config.schema_from_artifact = true;
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
        Command::Score(args) => run_score(args),
        Command::Schema(args) => run_schema(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_predict_flags() {
        let cli = Cli::try_parse_from([
            "loan-approval-api",
            "predict",
            "--reason",
            "debt_consolidation",
            "--employment-status",
            "full_time",
            "--employment-sector",
            "other",
            "--lender",
            "B",
            "--loan-amount",
            "50000",
            "--fico",
            "650",
            "--income",
            "5000",
            "--housing",
            "1500",
            "--schema",
            "legacy_v1",
        ])
        .expect("flags parse");

        match cli.command {
            Some(Command::Predict(args)) => {
                assert_eq!(args.fico, 650);
                assert!(!args.bankrupt);
                assert_eq!(args.model.schema.as_deref(), Some("legacy_v1"));
            }
            other => panic!("expected predict, got {other:?}"),
        }
    }

    #[test]
    fn model_overrides_replace_configured_values() {
        let mut config = ModelConfig::default();
        ModelArgs {
            model: Some(PathBuf::from("custom.json")),
            scaler: None,
            schema: Some("legacy_v1".to_string()),
            schema_from_artifact: true,
        }
        .apply(&mut config);

        assert_eq!(config.model_path, PathBuf::from("custom.json"));
        assert_eq!(config.scaler_path, None);
        assert_eq!(config.schema, "legacy_v1");
        assert!(config.schema_from_artifact);
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["loan-approval-api"]).expect("no args parse");
        assert!(cli.command.is_none());
    }
}
