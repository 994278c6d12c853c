use thiserror::Error;

use crate::auth::AuthError;

/// Failures surfaced by the service clients.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("could not build request: {0}")]
    RequestBuild(String),

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("could not decode response from API of resource: {0}")]
    Decode(String),

    /// Status code the operation does not expect, with the raw body.
    #[error("did not understand response from API: {status}, {body}")]
    Api { status: u16, body: String },

    #[error("{0} already exists")]
    AlreadyExists(String),

    /// Service rejected the input; carries the response body.
    #[error("{0}")]
    BadRequest(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Auth(e) => e.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::RequestBuild(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}
