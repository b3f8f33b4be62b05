//! CLI struct definitions for the cibguard command-line interface.
//!
//! All clap-derived types live here. Dispatch logic lives in `main`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "cibguard",
    version = env!("CARGO_PKG_VERSION"),
    about = "Validation and diagnostics engine for high-availability cluster configuration changes."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate proposed cluster property mutations against a snapshot
    Property(PropertyCli),
}

#[derive(clap::Args, Debug)]
pub struct PropertyCli {
    #[clap(subcommand)]
    pub command: PropertyCommand,
}

#[derive(Subcommand, Debug)]
pub enum PropertyCommand {
    /// Check whether the given property assignments would be accepted
    ValidateSet {
        /// Path to a JSON cluster snapshot
        #[clap(long)]
        snapshot: PathBuf,
        /// Properties to set, as NAME=VALUE pairs
        properties: Vec<String>,
        /// Downgrade forceable errors to warnings
        #[clap(long)]
        force: bool,
        /// Output format: 'text' or 'json'
        #[clap(long, default_value = "text")]
        format: String,
    },
    /// Check whether the given properties could be removed
    ValidateRemove {
        /// Path to a JSON cluster snapshot
        #[clap(long)]
        snapshot: PathBuf,
        /// Names of the properties to remove
        properties: Vec<String>,
        /// Id of the property set the removal targets
        #[clap(long, default_value = "cib-bootstrap-options")]
        set_id: String,
        /// Downgrade forceable errors to warnings
        #[clap(long)]
        force: bool,
        /// Output format: 'text' or 'json'
        #[clap(long, default_value = "text")]
        format: String,
    },
}
