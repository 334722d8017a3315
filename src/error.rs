/// Error type for the l2l-dispatch-rs crate.
///
/// Failures fall into two tiers. System failures mean the call never reached valid
/// application logic (bad status, unreadable body, transport error). Application
/// failures mean the server understood the request but refused to carry it out.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DispatchError {
    /// The server answered with a non-2xx HTTP status.
    #[error("API call system failure, status: {status}, error: {body}")]
    #[diagnostic(code(l2l_dispatch::error::DispatchError::SystemFailure))]
    SystemFailure {
        /// The HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// The server answered with 2xx, but the body is not a response envelope.
    #[error("API call system failure, malformed response ({reason}): {body}")]
    #[diagnostic(code(l2l_dispatch::error::DispatchError::MalformedResponse))]
    MalformedResponse {
        /// Why the body could not be read as an envelope.
        reason: String,
        /// The raw response body.
        body: String,
    },

    /// The server rejected the operation (`success` was `false`).
    #[error("API call failed, error: {message}")]
    #[diagnostic(
        code(l2l_dispatch::error::DispatchError::ApplicationFailure),
        help("The request reached the application but could not be completed.")
    )]
    ApplicationFailure {
        /// The `error` field of the envelope.
        message: String,
    },

    /// The envelope reported success but carried no `data` field.
    #[error("API call system failure, response reported success without data.")]
    #[diagnostic(code(l2l_dispatch::error::DispatchError::MissingData))]
    MissingData,

    /// A resource needed by the caller could not be found.
    #[error("Couldn't find {what}.")]
    #[diagnostic(code(l2l_dispatch::error::DispatchError::NotFound))]
    NotFound {
        /// Description of the missing resource.
        what: String,
    },

    /// The request to the server has failed.
    #[error(transparent)]
    #[diagnostic(code(l2l_dispatch::error::DispatchError::Transport))]
    Transport(#[from] reqwest::Error),

    /// Url parsing error.
    #[error(transparent)]
    #[diagnostic(code(l2l_dispatch::error::DispatchError::UrlParse))]
    UrlParse(#[from] url::ParseError),

    /// The `data` payload did not match the expected model.
    #[error(transparent)]
    #[diagnostic(code(l2l_dispatch::error::DispatchError::Deserialize))]
    Deserialize(#[from] serde_json::Error),
}

impl DispatchError {
    /// Returns whether this is a system/transport tier failure.
    pub fn is_system_failure(&self) -> bool {
        matches!(
            self,
            DispatchError::SystemFailure { .. }
                | DispatchError::MalformedResponse { .. }
                | DispatchError::MissingData
                | DispatchError::Transport(_)
        )
    }

    /// Returns whether the server rejected the operation itself.
    pub fn is_application_failure(&self) -> bool {
        matches!(self, DispatchError::ApplicationFailure { .. })
    }

    /// Shorthand for a [`DispatchError::NotFound`].
    pub fn not_found(what: impl Into<String>) -> Self {
        DispatchError::NotFound { what: what.into() }
    }
}
