//! CLI module - Command-line interface for Tempora
//!
//! This module provides a structured CLI using clap for argument parsing.

use clap::{Parser, Subcommand};

/// Tempora - Time tracking and task management backend
#[derive(Parser)]
#[command(name = "tempora")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the API server with the reminder scheduler
    #[command(alias = "-s", alias = "--serve", alias = "daemon")]
    Serve,

    /// Run a single reminder sweep and exit
    #[command(alias = "-c", alias = "--check")]
    Check,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}
