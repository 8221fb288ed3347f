//! Error types for trowel-planner.

/// Errors raised while planning a trajectory.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Tool width, overlap or resolution leave nothing to plan with.
    #[error("Invalid planning parameters: {message}")]
    InvalidParameters {
        /// What is wrong
        message: String,
    },

    /// The optimised path grew past the configured point cap. Planning
    /// stops at the first point over the limit.
    #[error("Trajectory exceeds the point limit; the limit is {limit}")]
    TooManyPoints {
        /// Configured maximum
        limit: usize,
    },

    /// Stored obstacle geometry could not be interpreted.
    #[error(transparent)]
    Core(#[from] trowel_core::Error),
}

/// Convenience `Result` alias for trowel-planner operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates an invalid-parameters error.
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Error::InvalidParameters {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_many_points_display() {
        let err = Error::TooManyPoints { limit: 10 };
        assert_eq!(
            err.to_string(),
            "Trajectory exceeds the point limit; the limit is 10"
        );
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: Error = trowel_core::Error::geometry("radius must be positive").into();
        assert_eq!(
            err.to_string(),
            "Invalid obstacle geometry: radius must be positive"
        );
    }
}
