use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChannelError {
    #[error("Sequence length mismatch: {items} items but {bases} bases")]
    LengthMismatch { items: usize, bases: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Not enough tx bits: {available} available but {required} required ({reason})")]
    InsufficientBits {
        available: usize,
        required: usize,
        reason: &'static str,
    },

    #[error("Key length must be greater than zero")]
    ZeroKeyLength,

    #[error("Hash ratio must be greater than zero when hashing is enabled")]
    ZeroHashRatio,

    #[error("Eavesdropper detection requires at least one check bit")]
    ZeroCheckBits,

    #[error("Check bits ({check}) exceed transmitted bits ({available})")]
    TooManyCheckBits { check: usize, available: usize },

    #[error("Expected error rate must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("Rate must be a positive finite number, got {0}")]
    InvalidRate(f64),
}

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("I/O error on result store: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error on result store: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),
}
