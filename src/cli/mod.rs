//! CLI module - operator commands for the account store.

mod commands;

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// credgate - account and credential persistence gateway
#[derive(Parser)]
#[command(name = "credgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (defaults to the standard search locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a default config file
    Init {
        /// Where to write it
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Install the account schema, or print it with --print
    Schema {
        #[arg(long)]
        print: bool,
    },

    /// Look an account up by id or by user name
    #[command(group(ArgGroup::new("key").required(true).args(["id", "name"])))]
    Find {
        /// Account id (archived accounts included)
        #[arg(long)]
        id: Option<String>,
        /// User name (active accounts only)
        #[arg(long)]
        name: Option<String>,
    },

    /// Archive an account
    #[command(alias = "rm")]
    Archive {
        /// Account id
        id: String,
    },

    /// Check database connectivity
    Check,
}

pub use commands::*;
