use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeadsError {
    #[error("Invalid filters: {0}")]
    InvalidFilters(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("BSON: {0}")]
    Bson(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl LeadsError {
    /// True for errors caused by the caller's input rather than by the store or the process.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidFilters(_) | Self::MethodNotAllowed)
    }
}

#[cfg(feature = "mongo")]
impl From<mongodb::error::Error> for LeadsError {
    fn from(e: mongodb::error::Error) -> Self {
        Self::Store(e.to_string())
    }
}
