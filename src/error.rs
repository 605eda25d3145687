use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadinessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Fixture error: {0}")]
    Fixture(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReadinessError>;
