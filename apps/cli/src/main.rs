mod config;
mod logging;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use zunder_client::HttpFhirClient;
use zunder_conformance::{catalog, CaseKind, ConformanceSuite, SuiteOptions, SuiteReport};

use crate::config::{Config, ReportFormat};

#[derive(Parser)]
#[command(
    name = "fhir-conformance",
    about = "Check a FHIR server's Patient read and search behaviour",
    version,
    arg_required_else_help = true
)]
struct Cli {
    /// Configuration file. Defaults to ./conformance.{toml,yaml,json} when present.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the conformance cases against a server.
    Run(RunArgs),

    /// List the conformance cases with their links and validated capabilities.
    List {
        /// Output format: text or json.
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Print CLI version.
    Version,
}

#[derive(Args)]
struct RunArgs {
    /// FHIR base URL (overrides server.base_url).
    #[arg(short, long, value_name = "URL")]
    server: Option<String>,
    /// Id of the patient to read and search for (overrides suite.patient_id).
    #[arg(short, long, value_name = "ID")]
    patient_id: Option<String>,
    /// Run only this case (plus the baseline read). Repeatable.
    #[arg(long = "case", value_name = "ID")]
    cases: Vec<String>,
    /// Report format: text or json.
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,
    /// Write the report to a file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Skip cases whose interactions the server's CapabilityStatement does not declare.
    #[arg(long, action = ArgAction::SetTrue)]
    check_capabilities: bool,
    /// Bearer token sent with every request.
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,
}

impl RunArgs {
    fn apply(self, config: &mut Config) {
        if let Some(server) = self.server {
            config.server.base_url = server;
        }
        if let Some(id) = self.patient_id {
            config.suite.patient_id = id;
        }
        if !self.cases.is_empty() {
            config.suite.cases = self.cases;
        }
        if let Some(format) = self.format {
            config.report.format = match format {
                ReportFormat::Text => "text",
                ReportFormat::Json => "json",
            }
            .to_string();
        }
        if let Some(output) = self.output {
            config.report.output = Some(output.display().to_string());
        }
        if self.check_capabilities {
            config.suite.check_capabilities = true;
        }
        if let Some(token) = self.token {
            config.server.bearer_token = Some(token);
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let mut config =
                Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
            args.apply(&mut config);
            config
                .validate()
                .map_err(|e| anyhow!("Invalid configuration: {e}"))?;

            let _guard =
                logging::init_logging(&config.logging).context("Failed to initialize logging")?;

            let report = run_suite(&config).await?;
            write_report(&config, &report)?;

            if report.is_success() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::List { format } => {
            print_catalog(format)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Version => {
            println!("fhir-conformance {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_suite(config: &Config) -> Result<SuiteReport> {
    let mut client = HttpFhirClient::new(&config.server.base_url)
        .context("Failed to create FHIR client")?
        .with_timeout(config.timeout());
    if let Some(token) = &config.server.bearer_token {
        client = client.with_token(token.clone());
    }

    let options = SuiteOptions::default()
        .with_capability_check(config.suite.check_capabilities)
        .with_cases(&config.suite.cases)?;

    tracing::info!(
        server = %client.base_url(),
        patient_id = %config.suite.patient_id,
        "Running conformance suite"
    );

    let suite = ConformanceSuite::new(
        &client,
        client.base_url().as_str(),
        config.suite.patient_id.as_str(),
        options,
    );
    Ok(suite.run().await)
}

fn write_report(config: &Config, report: &SuiteReport) -> Result<()> {
    let rendered = match config.report_format().map_err(|e| anyhow!(e))? {
        ReportFormat::Text => format!("{report}\n"),
        ReportFormat::Json => {
            let mut json = serde_json::to_string_pretty(report)?;
            json.push('\n');
            json
        }
    };

    match &config.report.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write report to {path}"))?;
            tracing::info!(path = %path, "Report written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn print_catalog(format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(catalog())?),
        ReportFormat::Text => {
            for case in catalog() {
                let what = match case.kind {
                    CaseKind::Read => "read".to_string(),
                    CaseKind::Search { param, form } => format!("search {param} ({form:?})"),
                };
                println!("{}  {:<34} {}", case.id, case.title, what);
                for link in &case.links {
                    println!("       {link}");
                }
            }
        }
    }
    Ok(())
}
