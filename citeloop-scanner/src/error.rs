use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Circular citation detected: {page} cites back to {target}")]
    CircularCitation { page: String, target: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch failed: {0}")]
    Fetch(String),
}

impl AuditError {
    /// True for the one fatal traversal outcome, as opposed to setup or fetch failures.
    pub fn is_circular(&self) -> bool {
        matches!(self, AuditError::CircularCitation { .. })
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
