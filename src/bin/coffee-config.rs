// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line front for the configuration service.
//!
//! # Usage
//!
//! ```bash
//! coffee-config get service.endpoint --trace
//! coffee-config --settings ./settings.yaml put service.endpoint '{service.endpoint.green}'
//! ```
//!
//! The store is chosen by the settings file (or the default settings location) with
//! `COFFEE_*` environment overrides applied on top.

use clap::{Parser, Subcommand};
use coffee_config::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const APP_NAME: &str = "coffee-config";
const QUALIFIER: &str = "org";

#[derive(Parser, Debug)]
#[command(name = "coffee-config")]
#[command(about = "Resolve and write configuration keys with {key} indirection")]
struct Args {
    /// Settings file selecting the backing store
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved value of a key
    Get {
        /// Key to resolve
        key: String,
        /// Print every key visited to stderr
        #[arg(long)]
        trace: bool,
    },
    /// Store a value verbatim under a key
    Put {
        /// Key to write
        key: String,
        /// Value to store; `{other.key}` makes it an indirection
        value: String,
    },
}

fn load_settings(path: Option<&PathBuf>) -> Result<StoreSettings> {
    let settings = match path {
        Some(path) => StoreSettings::from_file(path)?,
        None => StoreSettings::from_default_location(APP_NAME, QUALIFIER)?,
    };
    settings.with_process_env()
}

fn run(args: Args) -> Result<ExitCode> {
    let settings = load_settings(args.settings.as_ref())?;
    let service = DefaultConfigService::from_settings(&settings)?;
    tracing::debug!(store = service.store_name(), "configuration service ready");

    match args.command {
        Command::Get { key, trace } => {
            let resolution = match service.resolve_chain(&ConfigKey::from(key)) {
                Ok(resolution) => resolution,
                Err(e) => {
                    if trace {
                        if let ConfigError::CircularReference { key, chain } = &e {
                            eprintln!("{} -> {}", chain.join(" -> "), key);
                        }
                    }
                    return Err(e);
                }
            };
            if trace {
                let chain: Vec<&str> = resolution.chain.iter().map(ConfigKey::as_str).collect();
                eprintln!("{}", chain.join(" -> "));
            }
            match &resolution.value {
                Some(value) => {
                    println!("{}", value);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    let last = resolution.final_key().map(ConfigKey::as_str).unwrap_or("");
                    eprintln!("key not found: {}", last);
                    Ok(ExitCode::from(1))
                }
            }
        }
        Command::Put { key, value } => {
            service.put(&ConfigKey::from(key), ConfigValue::from(value))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}
