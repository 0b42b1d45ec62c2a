//! BB84 run simulator.
//!
//! ## Usage
//!
//! ```bash
//! # Default run: 100000 qubits, detection on, hashed 4096-bit keys
//! bb84-sim
//!
//! # Intercept-resend eavesdropper on the channel
//! bb84-sim --eavesdropper 1 --seed 7
//!
//! # Diagnostics
//! RUST_LOG=bb84_sim=debug bb84-sim
//! ```
//!
//! Completed runs append a row to `<outdir>/out_QKD_protocol_sim.csv`;
//! aborted runs write nothing.

use std::path::PathBuf;

use bb84_sim::ProtocolConfig;
use bb84_sim::protocols::bb84::{self, ProtocolOutcome};
use bb84_sim::record::{ResultRecorder, SimulationRow};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Simulate one BB84 quantum key distribution run.
///
/// Flags accept `0`/`1` as well as `true`/`false`.
#[derive(Parser, Debug)]
#[command(name = "bb84-sim", version, about)]
struct Args {
    /// Directory holding the results file.
    #[arg(long, default_value = "./Results/")]
    outdir: PathBuf,

    /// Random seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Print the protocol trace.
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    verbose: bool,

    /// Number of data bits to transmit.
    #[arg(long, default_value_t = 100_000)]
    n_tx_bits: usize,

    /// Whether an eavesdropper is present.
    #[arg(long, default_value_t = false, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    eavesdropper: bool,

    /// Whether to perform eavesdropper detection.
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    eavesdropper_check: bool,

    /// The number of bits used to detect the eavesdropper.
    #[arg(long, default_value_t = 20_000)]
    n_check_bits: usize,

    /// The acceptable max error rate on the quantum channel. This should
    /// include polarization base mismatch.
    #[arg(long, default_value_t = 0.28)]
    expected_error: f64,

    /// Whether to drop the eavesdropper check bits. Keeping them lets
    /// publicly revealed bits end up in the keys.
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    drop_check: bool,

    /// Length of generated key.
    #[arg(long, default_value_t = 4096)]
    key_len: usize,

    /// Whether to hash secret bits to generate the final keys.
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    hashed_key: bool,

    /// The input-output ratio of bits to the hash function.
    #[arg(long, default_value_t = 3)]
    hash_ratio: usize,
}

impl Args {
    fn protocol_config(&self) -> ProtocolConfig {
        ProtocolConfig {
            seed: self.seed,
            n_tx_bits: self.n_tx_bits,
            eavesdropper: self.eavesdropper,
            eavesdropper_check: self.eavesdropper_check,
            n_check_bits: self.n_check_bits,
            expected_error: self.expected_error,
            drop_check: self.drop_check,
            key_len: self.key_len,
            hashed_key: self.hashed_key,
            hash_ratio: self.hash_ratio,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bb84_sim=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = args.protocol_config();

    let result = bb84::run(&config)?;
    if args.verbose {
        print!("{}", result.trace);
    }

    match &result.outcome {
        ProtocolOutcome::Aborted(report) => {
            tracing::info!(error_rate = report.error_rate, "no result row written for aborted run");
        }
        ProtocolOutcome::Completed { capacity, .. } => {
            let recorder = ResultRecorder::simulation(&args.outdir);
            recorder.append(&SimulationRow::new(&config, capacity))?;
            tracing::info!(path = %recorder.path().display(), "result row written");
        }
    }

    Ok(())
}
