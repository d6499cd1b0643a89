//! services/api/src/error.rs
//!
//! Startup failures of the newsroom server. Request handlers never see these;
//! they map port errors to status codes themselves.

use crate::config::ConfigError;
use newsroom_core::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The issue store could not be read when the server started.
    #[error("Issue store unavailable: {0}")]
    Store(#[from] PortError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Binding or serving the listener failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_store_names_the_cause() {
        let err = ApiError::from(PortError::Storage(
            "Corrupt issue file data/issues.json".to_string(),
        ));
        assert!(matches!(err, ApiError::Store(_)));
        assert!(err.to_string().starts_with("Issue store unavailable"));
        assert!(err.to_string().contains("Corrupt issue file"));
    }
}
