//! Error types for execution space construction
//!
//! Dispatch itself never returns errors: configuration mistakes are trait
//! bound failures at compile time, and runtime contract violations abort.
//! The fallible surface is limited to building a space.

/// Result type for space construction and configuration.
pub type Result<T> = std::result::Result<T, SpaceError>;

/// Errors that can occur while building an execution space.
#[derive(Debug, thiserror::Error)]
pub enum SpaceError {
    /// A space was requested with zero worker threads
    #[error("invalid concurrency: requested {requested} worker threads")]
    InvalidConcurrency { requested: usize },

    /// The underlying worker pool could not be built
    #[error("worker pool build failed: {0}")]
    PoolBuild(String),

    /// The submission thread could not be spawned
    #[error("submission thread spawn failed: {0}")]
    SubmitThreadSpawn(String),
}

impl SpaceError {
    /// Create a PoolBuild error from any displayable cause.
    pub fn pool_build(cause: impl std::fmt::Display) -> Self {
        Self::PoolBuild(cause.to_string())
    }

    /// Create a SubmitThreadSpawn error from any displayable cause.
    pub fn submit_thread_spawn(cause: impl std::fmt::Display) -> Self {
        Self::SubmitThreadSpawn(cause.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpaceError::InvalidConcurrency { requested: 0 };
        assert_eq!(
            err.to_string(),
            "invalid concurrency: requested 0 worker threads"
        );

        let err = SpaceError::pool_build("no threads available");
        assert_eq!(err.to_string(), "worker pool build failed: no threads available");
    }
}
