use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("token exchange failed with status {status}: {body}")]
    TokenExchange { status: u16, body: String },

    #[error("profile fetch failed with status {status}: {body}")]
    ProfileFetch { status: u16, body: String },

    #[error("profile response is missing identity field '{0}'")]
    MissingIdentityField(String),

    #[error("malformed token response: {0}")]
    TokenResponse(String),

    #[error("no access token available")]
    MissingToken,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AuthError {
    /// Status to answer with when the error escapes a gate handler.
    /// Provider-side failures are the upstream's fault, everything else ours.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::TokenExchange { .. }
            | AuthError::ProfileFetch { .. }
            | AuthError::MissingIdentityField(_)
            | AuthError::TokenResponse(_)
            | AuthError::Network(_) => StatusCode::BAD_GATEWAY,
            AuthError::MissingToken
            | AuthError::Json(_)
            | AuthError::Url(_)
            | AuthError::Session(_)
            | AuthError::Io(_)
            | AuthError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for StatusCode {
    fn from(error: AuthError) -> StatusCode {
        error.status_code()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::error!("auth error: {}", self);
        self.status_code().into_response()
    }
}
