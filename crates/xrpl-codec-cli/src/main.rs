//! xrpl-codec - encode and decode XRP Ledger transactions from the command line.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod output;

use commands::{decode, encode, sign};

#[derive(Parser)]
#[command(name = "xrpl-codec")]
#[command(about = "XRP Ledger canonical binary encoding")]
struct Cli {
    /// Definitions file to use instead of the bundled one
    #[arg(long, global = true)]
    definitions: Option<String>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON object as canonical hex
    Encode {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Decode canonical hex into JSON
    Decode {
        /// Hex string (or stdin if not provided)
        hex: Option<String>,
    },
    /// Encode the signing data of a transaction
    EncodeForSigning {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Encode the signing data of a payment-channel claim
    EncodeForSigningClaim {
        /// Input JSON file with `channel` and `amount` (or stdin)
        input: Option<String>,
    },
    /// Encode the signing data for one signer of a multi-signed transaction
    EncodeForMultisigning {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Address of the signer
        #[arg(long)]
        signer: String,
    },
    /// Compute the id of a signed transaction
    TxId {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Compare against a claimed id and fail on mismatch
        #[arg(long)]
        expect: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = commands::codec(cli.definitions.as_deref()).and_then(|codec| match cli.command {
        Commands::Encode { input } => encode::run(&codec, input),
        Commands::Decode { hex } => decode::run(&codec, hex),
        Commands::EncodeForSigning { input } => sign::run_single(&codec, input),
        Commands::EncodeForSigningClaim { input } => sign::run_claim(&codec, input),
        Commands::EncodeForMultisigning { input, signer } => {
            sign::run_multi(&codec, input, &signer)
        }
        Commands::TxId { input, expect } => encode::run_tx_id(&codec, input, expect),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
