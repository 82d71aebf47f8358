use thiserror::Error;

#[derive(Error, Debug)]
pub enum PossoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid rule config: {0}")]
    InvalidRule(String),

    #[error("Unknown ledger format: {0}")]
    UnknownFormat(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PossoError>;
