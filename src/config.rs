//! Run parameters of a BB84 simulation.
//!
//! Boolean fields map to `0`/`1` columns when a run is persisted, and the
//! command line accepts either form.

use crate::core::errors::ConfigError;

/// Immutable parameters of one protocol run.
#[derive(Clone, Debug, PartialEq)]
pub struct ProtocolConfig {
    /// Seed of the single run-scoped random stream.
    pub seed: u64,
    /// Number of qubits sent over the quantum channel.
    pub n_tx_bits: usize,
    /// Whether an intercept-resend eavesdropper sits on the channel.
    pub eavesdropper: bool,
    /// Whether to compare the first `n_check_bits` bits for eavesdropper detection.
    pub eavesdropper_check: bool,
    /// Number of leading bits revealed for the eavesdropper check.
    pub n_check_bits: usize,
    /// Maximum tolerated error rate on the check bits, as a fraction.
    ///
    /// It must include the ~25% disturbance caused by basis mismatch alone.
    pub expected_error: f64,
    /// Whether to discard the check bits before sifting.
    ///
    /// Disabling this lets publicly revealed check bits become key
    /// material, which leaks those bits to anyone listening on the
    /// classical channel. Only meaningful with `eavesdropper_check`.
    pub drop_check: bool,
    /// Length of each generated key in bits.
    pub key_len: usize,
    /// Whether keys go through privacy amplification (hashing).
    pub hashed_key: bool,
    /// Input-output bit ratio of the privacy amplification hash.
    pub hash_ratio: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            n_tx_bits: 100_000,
            eavesdropper: false,
            eavesdropper_check: true,
            n_check_bits: 20_000,
            expected_error: 0.28,
            drop_check: true,
            key_len: 4096,
            hashed_key: true,
            hash_ratio: 3,
        }
    }
}

/// How sifted bits turn into key material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrivacyAmplification {
    /// Keys are cut directly from the sifted bits.
    Direct,
    /// Every `ratio` sifted bits compress into one efficient bit.
    Hashed { ratio: usize },
}

impl ProtocolConfig {
    /// Privacy amplification policy selected by `hashed_key` and `hash_ratio`.
    pub fn privacy_amplification(&self) -> PrivacyAmplification {
        if self.hashed_key {
            PrivacyAmplification::Hashed {
                ratio: self.hash_ratio,
            }
        } else {
            PrivacyAmplification::Direct
        }
    }

    /// Smallest transmission able to pay for the check bits and one key.
    pub fn required_tx_bits(&self) -> usize {
        let check = if self.eavesdropper_check {
            self.n_check_bits
        } else {
            0
        };
        let key = match self.privacy_amplification() {
            PrivacyAmplification::Hashed { ratio } => self.key_len.saturating_mul(ratio),
            PrivacyAmplification::Direct => self.key_len,
        };
        check.saturating_add(key)
    }

    /// Pre-flight validation, run before any simulation state exists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_len == 0 {
            return Err(ConfigError::ZeroKeyLength);
        }

        if self.hashed_key && self.hash_ratio == 0 {
            return Err(ConfigError::ZeroHashRatio);
        }

        if !(0.0..=1.0).contains(&self.expected_error) {
            return Err(ConfigError::InvalidThreshold(self.expected_error));
        }

        if self.eavesdropper_check {
            if self.n_check_bits == 0 {
                return Err(ConfigError::ZeroCheckBits);
            }
            if self.n_check_bits > self.n_tx_bits {
                return Err(ConfigError::TooManyCheckBits {
                    check: self.n_check_bits,
                    available: self.n_tx_bits,
                });
            }
        }

        let required = self.required_tx_bits();
        if self.n_tx_bits < required {
            return Err(ConfigError::InsufficientBits {
                available: self.n_tx_bits,
                required,
                reason: self.budget_reason(),
            });
        }

        Ok(())
    }

    fn budget_reason(&self) -> &'static str {
        match (self.eavesdropper_check, self.hashed_key) {
            (true, true) => "n_check_bits + key_len * hash_ratio",
            (true, false) => "n_check_bits + key_len",
            (false, true) => "key_len * hash_ratio",
            (false, false) => "key_len",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ProtocolConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.required_tx_bits(), 20_000 + 4096 * 3);
    }

    #[test]
    fn budget_follows_enabled_stages() {
        let mut config = ProtocolConfig {
            n_tx_bits: 10_000,
            n_check_bits: 1_000,
            key_len: 1_000,
            hash_ratio: 4,
            ..Default::default()
        };
        assert_eq!(config.required_tx_bits(), 5_000);

        config.hashed_key = false;
        assert_eq!(config.required_tx_bits(), 2_000);

        config.eavesdropper_check = false;
        assert_eq!(config.required_tx_bits(), 1_000);

        config.hashed_key = true;
        assert_eq!(config.required_tx_bits(), 4_000);
    }

    #[test]
    fn insufficient_budget_is_fatal() {
        let config = ProtocolConfig {
            n_tx_bits: 20_000,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InsufficientBits {
                available: 20_000,
                required: 32_288,
                reason: "n_check_bits + key_len * hash_ratio",
            })
        );
    }

    #[test]
    fn check_bits_beyond_transmission_are_rejected() {
        let config = ProtocolConfig {
            n_tx_bits: 100,
            n_check_bits: 200,
            key_len: 10,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyCheckBits {
                check: 200,
                available: 100
            })
        );
    }

    #[test]
    fn degenerate_parameters_are_rejected() {
        let zero_key = ProtocolConfig {
            key_len: 0,
            ..Default::default()
        };
        assert_eq!(zero_key.validate(), Err(ConfigError::ZeroKeyLength));

        let zero_ratio = ProtocolConfig {
            hash_ratio: 0,
            ..Default::default()
        };
        assert_eq!(zero_ratio.validate(), Err(ConfigError::ZeroHashRatio));

        let zero_check = ProtocolConfig {
            n_check_bits: 0,
            ..Default::default()
        };
        assert_eq!(zero_check.validate(), Err(ConfigError::ZeroCheckBits));

        let bad_threshold = ProtocolConfig {
            expected_error: 1.5,
            ..Default::default()
        };
        assert_eq!(
            bad_threshold.validate(),
            Err(ConfigError::InvalidThreshold(1.5))
        );
    }

    #[test]
    fn hash_ratio_is_ignored_without_hashing() {
        let config = ProtocolConfig {
            hashed_key: false,
            hash_ratio: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.privacy_amplification(), PrivacyAmplification::Direct);
    }
}
