//! Append-only CSV result store.
//!
//! Each completed run adds one row. The file and its parent directory are
//! created on first write, with a header row; later writes append
//! headerless rows. Boolean columns are written as `0`/`1`.

use crate::config::ProtocolConfig;
use crate::core::errors::RecordError;
use crate::protocols::qkd::capacity::{KeyCapacity, TheoreticalEstimate, TheoryParams};
use serde::{Serialize, Serializer};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// File name of simulator rows inside the output directory.
pub const SIMULATION_FILE: &str = "out_QKD_protocol_sim.csv";
/// File name of closed-form estimator rows inside the output directory.
pub const THEORETICAL_FILE: &str = "out_QKD_protocol_theoretical.csv";

fn as_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

/// One simulator run as persisted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationRow {
    pub seed: u64,
    pub n_tx_bits: usize,
    #[serde(serialize_with = "as_flag")]
    pub eavesdropper: bool,
    #[serde(serialize_with = "as_flag")]
    pub eavesdropper_check: bool,
    pub check_bits: usize,
    pub expected_error: f64,
    #[serde(serialize_with = "as_flag")]
    pub drop_check: bool,
    pub key_len: usize,
    #[serde(serialize_with = "as_flag")]
    pub hashed_key: bool,
    pub hash_ratio: usize,
    pub n_final_bits: usize,
    pub n_efficient_bits: usize,
    pub n_keys: usize,
}

impl SimulationRow {
    pub fn new(config: &ProtocolConfig, capacity: &KeyCapacity) -> Self {
        Self {
            seed: config.seed,
            n_tx_bits: config.n_tx_bits,
            eavesdropper: config.eavesdropper,
            eavesdropper_check: config.eavesdropper_check,
            check_bits: config.n_check_bits,
            expected_error: config.expected_error,
            drop_check: config.drop_check,
            key_len: config.key_len,
            hashed_key: config.hashed_key,
            hash_ratio: config.hash_ratio,
            n_final_bits: capacity.sifted_bits,
            n_efficient_bits: capacity.efficient_bits,
            n_keys: capacity.key_count,
        }
    }
}

/// One closed-form estimate as persisted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TheoreticalRow {
    pub n_tx_bits: usize,
    pub n_check_bits: usize,
    pub key_len: usize,
    pub hash_ratio: usize,
    #[serde(rename = "n_QKD_bits")]
    pub n_qkd_bits: usize,
    #[serde(rename = "n_QKD_keys")]
    pub n_qkd_keys: usize,
    #[serde(rename = "n_PUQKD_bits")]
    pub n_puqkd_bits: usize,
    #[serde(rename = "n_PUQKD_keys")]
    pub n_puqkd_keys: usize,
}

impl TheoreticalRow {
    pub fn new(params: &TheoryParams, estimate: &TheoreticalEstimate) -> Self {
        Self {
            n_tx_bits: params.n_tx_bits,
            n_check_bits: params.n_check_bits,
            key_len: params.key_len,
            hash_ratio: params.hash_ratio,
            n_qkd_bits: estimate.qkd_bits,
            n_qkd_keys: estimate.qkd_keys,
            n_puqkd_bits: estimate.puqkd_bits,
            n_puqkd_keys: estimate.puqkd_keys,
        }
    }
}

/// Writes rows to a CSV file, one row per call.
#[derive(Clone, Debug)]
pub struct ResultRecorder {
    path: PathBuf,
}

impl ResultRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Recorder for simulator rows in `outdir`.
    pub fn simulation(outdir: impl AsRef<Path>) -> Self {
        Self::new(outdir.as_ref().join(SIMULATION_FILE))
    }

    /// Recorder for closed-form estimator rows in `outdir`.
    pub fn theoretical(outdir: impl AsRef<Path>) -> Self {
        Self::new(outdir.as_ref().join(THEORETICAL_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `row`, writing the header first if the file is new.
    pub fn append<T: Serialize>(&self, row: &T) -> Result<(), RecordError> {
        let is_new = !self.path.is_file();
        if is_new {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;

        tracing::debug!(path = %self.path.display(), header = is_new, "result row appended");
        Ok(())
    }
}
