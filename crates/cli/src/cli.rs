// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::telemetry::setup_simple_tracing;
use crate::helpers::timestamp::parse_timestamp;
use crate::{decrypt, tally, verify};
use anyhow::Result;
use clap::{command, ArgAction, Parser, Subcommand};
use electora_config::{load_config, AppConfig};
use std::path::PathBuf;
use tracing::{info, instrument, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "electora")]
#[command(about = "Tally elections whose ballots are sealed by a threshold decryption network", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,

    /// Indicate error levels by adding additional `-v` arguments. Eg. `electora -vvv` will give
    /// you trace level output
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true
    )]
    pub verbose: u8,

    /// Silence all output. This argument cannot be used alongside `-v`
    #[arg(
        short,
        long,
        action = ArgAction::SetTrue,
        conflicts_with = "verbose",
        global = true
    )]
    quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,  //
                1 => Level::INFO,  // -v
                2 => Level::DEBUG, // -vv
                _ => Level::TRACE, // -vvv
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn execute(self) -> Result<()> {
        setup_simple_tracing(self.log_level());

        let config = self.load_config()?;
        match config.config_file() {
            Some(file) => info!("Config loaded from: {}", file.display()),
            None => info!("Running with the default configuration"),
        }

        match self.command {
            Commands::Decrypt {
                ciphertext,
                timestamp,
                ritual,
            } => decrypt::execute(&config, &ciphertext, timestamp, ritual).await?,
            Commands::Tally {
                election_id,
                end,
                ritual,
                counts,
            } => tally::execute(&config, election_id, end, ritual, counts).await?,
            Commands::Verify {
                proof_file,
                group,
                app_id,
            } => verify::execute(&config, &proof_file, group, app_id).await?,
        }

        Ok(())
    }

    /// Load the configuration. Without an explicit `--config` a missing file means defaults.
    pub fn load_config(&self) -> Result<AppConfig> {
        match load_config(self.config.clone()) {
            Ok(config) => Ok(config),
            Err(e)
                if self.config.is_none()
                    && matches!(
                        e.downcast_ref::<std::io::Error>(),
                        Some(ioe) if ioe.kind() == std::io::ErrorKind::NotFound
                    ) =>
            {
                warn!("No configuration file found, using defaults");
                Ok(AppConfig::default())
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decrypt a single ballot
    Decrypt {
        /// Hex encoded ciphertext
        ciphertext: String,

        /// Time the ballot may be opened at, as unix seconds or RFC 3339
        #[arg(value_parser = parse_timestamp)]
        timestamp: u64,

        /// Ritual the ballot was encrypted under. Defaults to `network.ritual_id`
        #[arg(long)]
        ritual: Option<u32>,
    },

    /// Locate, fetch and decrypt every ballot of an election
    Tally {
        /// Value of the election tag ballots were submitted with
        election_id: String,

        /// End of the election, as unix seconds or RFC 3339
        #[arg(long, value_parser = parse_timestamp)]
        end: u64,

        /// Ritual ballots were encrypted under. Defaults to `network.ritual_id`
        #[arg(long)]
        ritual: Option<u32>,

        /// Print how many times each ballot was cast instead of every ballot
        #[arg(long)]
        counts: bool,
    },

    /// Check a compressed eligibility proof
    Verify {
        /// File holding the compressed proof
        proof_file: PathBuf,

        /// Group the voter claims membership of
        #[arg(long)]
        group: String,

        /// Application the proof must be issued for. Defaults to `eligibility.app_id`
        #[arg(long = "app-id")]
        app_id: Option<String>,
    },
}
