//! Closed-form BB84 key capacity estimator.
//!
//! Assumes no eavesdropper and no transmission errors; nothing is
//! simulated. Each invocation appends a row to
//! `<outdir>/out_QKD_protocol_theoretical.csv`.

use std::path::PathBuf;

use bb84_sim::protocols::capacity::{TheoreticalEstimate, TheoryParams};
use bb84_sim::record::{ResultRecorder, TheoreticalRow};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Estimate BB84 key capacity from closed-form formulas.
#[derive(Parser, Debug)]
#[command(name = "bb84-theory", version, about)]
struct Args {
    /// Directory holding the results file.
    #[arg(long, default_value = "./Results/")]
    outdir: PathBuf,

    /// Number of data bits to transmit.
    #[arg(long, default_value_t = 100_000)]
    n_tx_bits: usize,

    /// The number of bits used to detect the eavesdropper.
    #[arg(long, default_value_t = 20_000)]
    n_check_bits: usize,

    /// Length of generated key.
    #[arg(long, default_value_t = 4096)]
    key_len: usize,

    /// The input-output ratio of bits to the hash function.
    #[arg(long, default_value_t = 3)]
    hash_ratio: usize,

    /// The pulse rate of the underlying QKD system in Gbps.
    #[arg(long = "qkd-rate", alias = "QKD-rate", default_value_t = 1.0)]
    qkd_rate: f64,

    /// The output rate of the physically integrated PUF in Gbps.
    #[arg(long = "puf-rate", alias = "PUF-rate", default_value_t = 0.1)]
    puf_rate: f64,
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
    let params = TheoryParams {
        n_tx_bits: args.n_tx_bits,
        n_check_bits: args.n_check_bits,
        key_len: args.key_len,
        hash_ratio: args.hash_ratio,
        qkd_rate: args.qkd_rate,
        puf_rate: args.puf_rate,
    };

    let estimate = TheoreticalEstimate::compute(&params)?;
    tracing::info!(
        qkd_keys = estimate.qkd_keys,
        puqkd_keys = estimate.puqkd_keys,
        "capacity estimated"
    );

    let recorder = ResultRecorder::theoretical(&args.outdir);
    recorder.append(&TheoreticalRow::new(&params, &estimate))?;

    Ok(())
}
