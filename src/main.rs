//! healthdiag - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use healthdiag::{
    cli::{Args, Commands, PatientPrompt, Verbosity},
    config::Config,
    doctor::{self, Doctor, HealthStatus},
    pipeline::{self, PipelineSettings, Startup},
    platform::{MindsDbClient, PatientInput},
    predict::{PredictionResult, Severity},
    provision::ProvisionReport,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Exit code when the platform cannot be reached
const EXIT_CODE_PLATFORM_UNREACHABLE: i32 = 2;

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("healthdiag={}", verbosity.as_filter())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    args.apply_overrides(&mut config);
    Ok(config)
}

fn build_client(config: &Config) -> Result<MindsDbClient> {
    MindsDbClient::new(
        &config.platform.url,
        config.request_timeout(),
        config.poll_interval(),
    )
    .context("Failed to create MindsDB client")
}

/// Connect, load, verify and provision; exits if the platform is down
async fn start_pipeline(config: &Config) -> Result<Startup> {
    let client = build_client(config)?;

    if !client.is_available().await {
        eprintln!(
            "{} MindsDB is not reachable at {}",
            "✗".red(),
            client.base_url()
        );
        eprintln!("\nStart MindsDB locally, or point --url at a running instance.");
        std::process::exit(EXIT_CODE_PLATFORM_UNREACHABLE);
    }
    println!("{} Connected to MindsDB at {}", "✓".green(), client.base_url());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message("Provisioning data source, project and model...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let settings = PipelineSettings::from(config);
    let result = pipeline::start(Arc::new(client), &settings).await;
    spinner.finish_and_clear();

    let startup = result.context("Startup failed")?;
    println!(
        "{} Loaded {} rows from {}",
        "✓".green(),
        startup.rows,
        settings.csv_path.display()
    );
    print_report(&startup.report);
    Ok(startup)
}

fn print_report(report: &ProvisionReport) {
    let line = |label: &str, outcome: &str| {
        println!("  {:<12} {}", label, outcome.dimmed());
    };
    line("Data source", report.data_source.as_str());
    line("Project", report.project.as_str());
    line("Model", report.model.as_str());
}

fn print_prediction(result: &PredictionResult) {
    let diagnosis = match result.severity {
        Severity::Red => result.diagnosis.red().bold(),
        Severity::Yellow => result.diagnosis.yellow().bold(),
        Severity::Green => result.diagnosis.green().bold(),
    };
    println!("\nDiagnosis:   {} ({})", diagnosis, result.severity);
    println!("Explanation: {}\n", result.explanation);
}

fn run_load(config: &Config) -> Result<()> {
    let rows = pipeline::load_and_verify(&config.store.csv_path, &config.store.db_path)
        .context("Load failed")?;
    println!(
        "{} Loaded {} rows into {}",
        "✓".green(),
        rows,
        config.store.db_path.display()
    );
    Ok(())
}

async fn run_predict(config: &Config, input: PatientInput) -> Result<()> {
    let startup = start_pipeline(config).await?;
    let result = startup.context.predict(&input).await;
    print_prediction(&result);
    Ok(())
}

async fn run_interactive(config: &Config) -> Result<()> {
    let startup = start_pipeline(config).await?;
    let mut prompt = PatientPrompt::new()?;

    println!("\nEnter patient details (empty age or Ctrl-D to quit).\n");
    while let Some(input) = prompt.read_patient()? {
        let result = startup.context.predict(&input).await;
        print_prediction(&result);
    }
    Ok(())
}

async fn run_doctor(config: &Config) -> Result<()> {
    let client = build_client(config)?;

    println!("\nhealthdiag doctor\n");
    if client.is_available().await {
        println!("  {} {}", "✓".green(), "MindsDB API");
    } else {
        println!(
            "  {} {} {}",
            "✗".red(),
            "MindsDB API",
            format!("not reachable at {}", client.base_url()).dimmed()
        );
        std::process::exit(EXIT_CODE_PLATFORM_UNREACHABLE);
    }

    let checks = Doctor::new(
        &client,
        config.store.csv_path.clone(),
        config.store.db_path.clone(),
    )
    .run_diagnostics()
    .await;

    for check in &checks {
        match &check.status {
            HealthStatus::Pass => println!("  {} {}", "✓".green(), check.name),
            HealthStatus::Warn(msg) => println!("  {} {} {}", "!".yellow(), check.name, msg.dimmed()),
            HealthStatus::Fail(msg) => println!("  {} {} {}", "✗".red(), check.name, msg.dimmed()),
        }
    }
    println!();

    std::process::exit(if doctor::all_passed(&checks) { 0 } else { 1 });
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbosity());

    let config = load_config(&args)?;

    match &args.command {
        Commands::Load => run_load(&config)?,
        Commands::Provision => {
            start_pipeline(&config).await?;
        }
        Commands::Predict(patient) => {
            let input = PatientInput::new(
                patient.age,
                patient.gender.clone(),
                patient.symptom1.clone(),
                patient.symptom2.clone(),
                patient.symptom3.clone(),
            );
            run_predict(&config, input).await?;
        }
        Commands::Interactive => run_interactive(&config).await?,
        Commands::Doctor => run_doctor(&config).await?,
    }

    Ok(())
}
