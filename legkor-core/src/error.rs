use thiserror::Error;

/// Unified error type for the legkor workspace.
///
/// This wraps configuration problems, transient fetch failures, malformed
/// source payloads, argument validation errors, and store failures so callers
/// can tell the failure kinds apart without inspecting message strings.
#[derive(Debug, Error)]
pub enum LegkorError {
    /// The requested city has no source mapping; nothing was fetched.
    #[error("unknown city: {city}")]
    UnknownCity {
        /// The city name as requested by the caller.
        city: String,
    },

    /// A source download or decompression failed. Retryable: the store was
    /// left untouched and the same call may succeed later.
    #[error("{provider} fetch failed: {msg}")]
    Fetch {
        /// Name of the provider or feed that failed (e.g. "hungaromet/recent").
        provider: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Issues with the returned or expected data (bad date stamp, missing
    /// column, truncated payload).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A persistence operation failed; the batch transaction rolled back and
    /// no partial state is visible.
    #[error("store failure: {0}")]
    Store(String),

    /// A resource could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "observations for Budapest".
        what: String,
    },

    /// Unknown/opaque error caught at the boundary.
    #[error("unknown error: {0}")]
    Other(String),
}

impl LegkorError {
    /// Helper: build an `UnknownCity` error.
    pub fn unknown_city(city: impl Into<String>) -> Self {
        Self::UnknownCity { city: city.into() }
    }

    /// Helper: build a `Fetch` error with the provider name and message.
    pub fn fetch(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Fetch {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `Store` error.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Whether retrying the failed call may succeed without any change on the
    /// caller's side. Only transient fetch failures qualify.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}
