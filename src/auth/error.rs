use thiserror::Error;

/// Failures surfaced by [`AuthManager::get_token`](crate::auth::AuthManager::get_token).
///
/// None of these are retried by the SDK; callers decide on their own policy.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The authentication request could not be constructed.
    #[error("could not build request to authenticate user: {0}")]
    RequestBuild(String),

    #[error("transport error while authenticating: {0}")]
    Transport(#[source] reqwest::Error),

    /// Malformed token (cached or fresh) or unreadable identity response.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("did not understand response from identity API: {status}, {body}")]
    Api { status: u16, body: String },
}

impl AuthError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::RequestBuild(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}
