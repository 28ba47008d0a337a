use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use fincalc::api::{ServeError, run_http_server};
use fincalc::config::{ConfigError, DEFAULT_HISTORY_LIMIT, ServerConfig};
use fincalc::core::{
    CalculationCategory, ParameterRecord, PipelineError, compute_on_worker, explain,
    process_on_worker, render_answer, validate_params,
};
use fincalc::telemetry::{self, TelemetryError};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCategory {
    Sip,
    Swp,
    Emi,
    Cagr,
    Lumpsum,
    Fd,
    Rd,
    Basic,
}

impl From<CliCategory> for CalculationCategory {
    fn from(value: CliCategory) -> Self {
        match value {
            CliCategory::Sip => CalculationCategory::Sip,
            CliCategory::Swp => CalculationCategory::Swp,
            CliCategory::Emi => CalculationCategory::Emi,
            CliCategory::Cagr => CalculationCategory::Cagr,
            CliCategory::Lumpsum => CalculationCategory::Lumpsum,
            CliCategory::Fd => CalculationCategory::Fd,
            CliCategory::Rd => CalculationCategory::Rd,
            CliCategory::Basic => CalculationCategory::Basic,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "fincalc",
    about = "Personal finance assistant: SIP, SWP, EMI, CAGR, lumpsum, FD and RD from plain-text queries"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "FINCALC_LOG",
        default_value = "info",
        help = "Log filter, overridden by RUST_LOG when set"
    )]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API.
    Serve {
        #[arg(long, env = "FINCALC_HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "FINCALC_PORT", default_value_t = 8080)]
        port: u16,
        #[arg(
            long,
            env = "FINCALC_HISTORY_LIMIT",
            default_value_t = DEFAULT_HISTORY_LIMIT,
            help = "Number of calculations kept in memory"
        )]
        history_limit: usize,
    },
    /// Classify, extract, explain and compute a free-text query.
    Ask { text: Vec<String> },
    /// Compute a category directly from explicit parameters.
    Compute(ComputeArgs),
}

#[derive(Args, Debug)]
struct ComputeArgs {
    #[arg(long, value_enum)]
    category: CliCategory,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    monthly_contribution: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    principal: f64,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "SWP starting corpus"
    )]
    corpus: Option<f64>,
    #[arg(
        long,
        default_value_t = 0.0,
        allow_negative_numbers = true,
        help = "SWP monthly withdrawal; omit to derive a sustainable withdrawal"
    )]
    monthly_withdrawal: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    beginning_value: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    ending_value: f64,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    years: i32,
    #[arg(
        long,
        default_value_t = 0.0,
        allow_negative_numbers = true,
        help = "Annual rate in percent, e.g. 12"
    )]
    rate: f64,
    #[arg(long, help = "Print the formula explanation before the result")]
    explain: bool,
}

impl ComputeArgs {
    fn params(&self) -> ParameterRecord {
        ParameterRecord {
            monthly_contribution: self.monthly_contribution,
            principal: self.principal,
            corpus: self.corpus,
            monthly_withdrawal: self.monthly_withdrawal,
            beginning_value: self.beginning_value,
            ending_value: self.ending_value,
            years: self.years,
            rate: self.rate,
        }
    }
}

#[derive(Debug, Error)]
enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("server error: {0}")]
    Serve(#[from] ServeError),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("ask needs some text, e.g. fincalc ask \"emi for loan 500000 for 5 years at 9%\"")]
    EmptyQuery,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    telemetry::init(&cli.log_level)?;

    match cli.command {
        Command::Serve {
            host,
            port,
            history_limit,
        } => {
            let config = ServerConfig::new(host, port, history_limit)?;
            run_http_server(&config).await?;
        }
        Command::Ask { text } => {
            let text = text.join(" ");
            if text.trim().is_empty() {
                return Err(AppError::EmptyQuery);
            }
            let assessment = process_on_worker(text).await;
            if assessment.success {
                validate_params(&assessment.params).map_err(AppError::InvalidParams)?;
                let result =
                    compute_on_worker(assessment.category, assessment.params.clone()).await?;
                println!("{}", render_answer(&assessment, &result));
            } else {
                println!("{}", assessment.explanation);
            }
        }
        Command::Compute(args) => {
            let category = CalculationCategory::from(args.category);
            let params = args.params();
            validate_params(&params).map_err(AppError::InvalidParams)?;
            if args.explain {
                println!("{}\n", explain(category, &params));
            }
            let result = compute_on_worker(category, params).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}
