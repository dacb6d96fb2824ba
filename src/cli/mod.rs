//! CLI module for healthdiag
//!
//! Handles command-line argument parsing and the interactive patient prompt.

pub mod args;
pub mod prompt;

pub use args::{Args, Commands, PatientArgs, Verbosity};
pub use prompt::PatientPrompt;
