use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("The spreadsheet export is empty")]
    EmptyInput,

    #[error("No valid data rows found ({rows} rows scanned). Check the sheet columns")]
    NoValidData { rows: usize },

    #[error("A sync cycle is already in progress")]
    SyncInProgress,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV decoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
