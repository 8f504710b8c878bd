//! Client error types.

/// Errors from the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The admin password was rejected (`403`).
    #[error("access denied")]
    Forbidden,

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never completed.
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body was not what the endpoint promises.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Errors loading an endpoint table.
#[derive(Debug, thiserror::Error)]
pub enum EndpointsError {
    /// The table is not a JSON object of strings.
    #[error("invalid endpoint table: {0}")]
    Parse(String),

    /// A required endpoint name is absent.
    #[error("endpoint table has no entry for '{name}'")]
    Missing { name: &'static str },
}

/// Why the submission widget refused to send.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// Stars, author, or text not filled in. No request was sent.
    #[error("review is incomplete")]
    Incomplete,

    /// A submission is already on its way.
    #[error("submission already in progress")]
    InFlight,

    /// The widget already submitted and no longer accepts input.
    #[error("review already submitted")]
    AlreadySubmitted,
}

/// Errors surfaced by the admin panel.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// Login rejected with `403`.
    #[error("wrong admin password")]
    WrongPassword,

    /// The service could not be reached or answered nonsense.
    #[error("review service unavailable: {0}")]
    Unavailable(#[source] ApiError),

    /// A moderation action was attempted before logging in.
    #[error("not logged in")]
    NotAuthenticated,
}
