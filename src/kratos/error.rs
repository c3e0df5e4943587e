use thiserror::Error;

/// Why a request could not be resolved into a session.
///
/// Only [`SessionError::SecondFactorRequired`] changes what the gates do; every
/// other variant means "no valid session".
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session requires a second authentication factor")]
    SecondFactorRequired,
    #[error("no valid session, identity provider answered {status}")]
    Unauthorized { status: u16 },
    #[error("whoami request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid whoami response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid whoami URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SessionError {
    /// `true` when the provider answered `403` to the whoami call.
    #[must_use]
    pub const fn requires_second_factor(&self) -> bool {
        matches!(self, Self::SecondFactorRequired)
    }

    /// Map a non-success whoami status into an error.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        if status == 403 {
            Self::SecondFactorRequired
        } else {
            Self::Unauthorized { status }
        }
    }
}
