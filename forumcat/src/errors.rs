use std::borrow::Cow;

use thiserror::Error;

/// Top-level error type returned by category operations.
///
/// The normalizer itself never produces an error; every variant originates in a
/// collaborator (store, hook listener, configuration) and is passed through as-is.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A listener registered on a filter hook rejected the payload.
    #[error("hook {hook} failed: {message}")]
    Hook { hook: String, message: String },

    /// Configuration could not be read or parsed.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl CategoryError {
    /// Convenience constructor for listener failures.
    pub fn hook(hook: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Hook {
            hook: hook.into(),
            message: message.into(),
        }
    }
}
