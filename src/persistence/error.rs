#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
