use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobPickError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {key}={value:?} ({reason})")]
    Config {
        key: String,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}
