//! Key capacity arithmetic.
//!
//! Two separate estimators live here: [`KeyCapacity::derive`] turns the
//! sifted bit count of a simulated run into a key count, and
//! [`TheoreticalEstimate`] computes closed-form capacities without
//! simulating any transmission. All counts are floor divisions.

use crate::config::PrivacyAmplification;
use crate::core::errors::ConfigError;

/// Key material obtainable from a pool of shared bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyCapacity {
    /// Bits left after sifting (and check bit removal).
    pub sifted_bits: usize,
    /// Bits available after privacy amplification.
    pub efficient_bits: usize,
    /// Number of whole keys of the configured length.
    pub key_count: usize,
}

impl KeyCapacity {
    /// Derives the key capacity of `sifted_bits` shared bits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroHashRatio`] for a zero hash ratio and
    /// [`ConfigError::ZeroKeyLength`] for a zero key length.
    pub fn derive(
        sifted_bits: usize,
        key_len: usize,
        privacy: PrivacyAmplification,
    ) -> Result<Self, ConfigError> {
        let efficient_bits = match privacy {
            PrivacyAmplification::Hashed { ratio } => sifted_bits
                .checked_div(ratio)
                .ok_or(ConfigError::ZeroHashRatio)?,
            PrivacyAmplification::Direct => sifted_bits,
        };
        let key_count = efficient_bits
            .checked_div(key_len)
            .ok_or(ConfigError::ZeroKeyLength)?;

        Ok(Self {
            sifted_bits,
            efficient_bits,
            key_count,
        })
    }
}

/// Inputs of the closed-form capacity estimator.
#[derive(Clone, Debug, PartialEq)]
pub struct TheoryParams {
    pub n_tx_bits: usize,
    pub n_check_bits: usize,
    pub key_len: usize,
    pub hash_ratio: usize,
    /// Pulse rate of the underlying QKD system, in Gbps.
    pub qkd_rate: f64,
    /// Output rate of the secondary (PUF) bit source, in Gbps.
    pub puf_rate: f64,
}

impl Default for TheoryParams {
    fn default() -> Self {
        Self {
            n_tx_bits: 100_000,
            n_check_bits: 20_000,
            key_len: 4096,
            hash_ratio: 3,
            qkd_rate: 1.0,
            puf_rate: 0.1,
        }
    }
}

/// Closed-form capacity assuming no eavesdropper and no transmission errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TheoreticalEstimate {
    /// Bits left after sifting, check bit removal and hashing.
    pub qkd_bits: usize,
    pub qkd_keys: usize,
    /// Bits from the secondary source, with no post-processing loss.
    pub puqkd_bits: usize,
    pub puqkd_keys: usize,
}

impl TheoreticalEstimate {
    pub fn compute(params: &TheoryParams) -> Result<Self, ConfigError> {
        if params.key_len == 0 {
            return Err(ConfigError::ZeroKeyLength);
        }
        if params.hash_ratio == 0 {
            return Err(ConfigError::ZeroHashRatio);
        }
        if params.n_check_bits == 0 {
            return Err(ConfigError::ZeroCheckBits);
        }
        for rate in [params.qkd_rate, params.puf_rate] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConfigError::InvalidRate(rate));
            }
        }

        let n_tx = params.n_tx_bits as f64;
        // Ratio of transmitted bits to check bits
        let k = n_tx / params.n_check_bits as f64;

        let puqkd_bits = ((n_tx * (params.puf_rate / params.qkd_rate)) / 2.0) as usize;
        let qkd_bits =
            ((1.0 / params.hash_ratio as f64) * ((k - 1.0) / k) * (n_tx / 2.0)).max(0.0) as usize;

        Ok(Self {
            qkd_bits,
            qkd_keys: qkd_bits / params.key_len,
            puqkd_bits,
            puqkd_keys: puqkd_bits / params.key_len,
        })
    }
}
