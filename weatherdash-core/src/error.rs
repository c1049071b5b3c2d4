use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the dashboard backend.
///
/// The backend reports its own failures as JSON bodies with an `error`
/// field; those surface as [`BackendError::Reported`] with the message kept
/// verbatim. Everything else is a client-side transport or decoding problem.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with an `error` field.
    #[error("{0}")]
    Reported(String),

    #[error("Request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to decode {endpoint} response")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of a temperature lookup: input validation on top of the backend
/// failure kinds.
#[derive(Debug, Error)]
pub enum LookupError {
    /// City or date was left empty; no request is issued in this state.
    #[error("Please select both city and date.")]
    MissingSelection,

    #[error(transparent)]
    Backend(#[from] BackendError),
}
