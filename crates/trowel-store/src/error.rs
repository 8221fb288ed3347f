//! Error types for trowel-store.

/// Errors raised by the persistence layer.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested row does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// Capitalised entity name (`Wall`, `Obstacle`, `Trajectory`)
        entity: &'static str,
        /// Requested id
        id: i64,
    },

    /// A stored value cannot be turned back into a domain value.
    #[error("Corrupt {entity} row {id}: {message}")]
    Corrupt {
        /// Table the row came from
        entity: &'static str,
        /// Row id
        id: i64,
        /// What could not be decoded
        message: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database migration error
    #[error("Migration error: {message}")]
    Migration {
        /// What went wrong
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error (creating the database directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from trowel-core
    #[error(transparent)]
    Core(#[from] trowel_core::Error),
}

/// Convenience `Result` alias for trowel-store operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a not-found error.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Error::NotFound { entity, id }
    }

    /// Creates a corrupt-row error.
    pub fn corrupt(entity: &'static str, id: i64, message: impl Into<String>) -> Self {
        Error::Corrupt {
            entity,
            id,
            message: message.into(),
        }
    }

    /// Returns `true` for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
