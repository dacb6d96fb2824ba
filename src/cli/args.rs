//! Command-line argument parsing for healthdiag
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// healthdiag - Provision a patient risk model and classify patients against it
#[derive(Parser, Debug)]
#[command(name = "healthdiag")]
#[command(version)]
#[command(about = "Provision a patient risk model on MindsDB and classify patients", long_about = None)]
pub struct Args {
    /// Configuration file path (defaults to ~/.healthdiag/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// MindsDB HTTP endpoint, overrides the config file
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Patient CSV file, overrides the config file
    #[arg(long, global = true)]
    pub csv: Option<PathBuf>,

    /// SQLite store path, overrides the config file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Verbosity level: -v (debug), -vv (trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the CSV into the store and verify it
    Load,

    /// Load, verify and provision data source, project and model
    Provision,

    /// Provision, then classify a single patient
    Predict(PatientArgs),

    /// Provision, then classify patients entered at a prompt
    Interactive,

    /// Run read-only status checks
    Doctor,
}

/// The five prediction inputs
#[derive(clap::Args, Debug, Clone)]
pub struct PatientArgs {
    #[arg(long)]
    pub age: i64,

    #[arg(long)]
    pub gender: String,

    #[arg(long)]
    pub symptom1: String,

    #[arg(long)]
    pub symptom2: String,

    #[arg(long)]
    pub symptom3: String,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Apply command-line overrides on top of a loaded config
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.platform.url = url.clone();
        }
        if let Some(csv) = &self.csv {
            config.store.csv_path = csv.clone();
        }
        if let Some(db) = &self.db {
            config.store.db_path = db.clone();
        }
    }
}

impl Verbosity {
    /// Default tracing filter for this level
    pub fn as_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
            Verbosity::VeryVerbose => "trace",
        }
    }
}
