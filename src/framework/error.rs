//! # Framework Errors
//!
//! Two families of errors live here:
//!
//! - [`FrameworkError`]: the client could not talk to its resource actor.
//! - [`FetchError`]: a request against an endpoint did not produce data.
//!
//! Resource actors never hand a [`FetchError`] back to the caller. They turn it
//! into the user-facing `error` string of the published state (see
//! [`FetchError::user_message`]).

/// Message shown when a failure carries no usable text of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "Error fetching data";

/// Errors that can occur within the resource framework itself.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FrameworkError {
    #[error("Resource actor closed")]
    ActorClosed,
    #[error("Resource actor dropped response channel")]
    ActorDropped,
    #[error("Resource task failed: {0}")]
    TaskFailed(String),
}

/// Why a single fetch attempt failed.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FetchError {
    /// DNS, connection refused, reset, timeout... anything below HTTP.
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("Request failed with status code {0}")]
    Status(u16),

    /// The body was not the JSON we expected.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The transform rejected (or panicked on) the raw payload.
    #[error("Could not transform response: {0}")]
    Transform(String),

    /// The request was aborted. Never shown to the user.
    #[error("Request cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    /// The text published as a resource's `error`. Never empty.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_message_is_passed_through() {
        let err = FetchError::Transport("network down".into());
        assert_eq!(err.user_message(), "network down");
    }

    #[test]
    fn empty_message_falls_back() {
        let err = FetchError::Transport("  ".into());
        assert_eq!(err.user_message(), FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn status_reads_like_an_http_client_error() {
        assert_eq!(
            FetchError::Status(503).user_message(),
            "Request failed with status code 503"
        );
    }
}
