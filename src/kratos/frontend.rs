use super::{ApiConfiguration, Session, SessionError};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE};
use tracing::{debug, instrument};

const WHOAMI_PATH: &str = "/sessions/whoami";

/// Public (browser facing) API of the identity provider.
#[async_trait]
pub trait FrontendApi: Send + Sync + std::fmt::Debug {
    /// Resolve the session carried by `cookie`, the raw `Cookie` header of the
    /// incoming request.
    ///
    /// # Errors
    /// [`SessionError::SecondFactorRequired`] when the provider answers `403`,
    /// any other variant when there is no usable session.
    async fn to_session(&self, cookie: Option<&str>) -> Result<Session, SessionError>;
}

/// [`FrontendApi`] over HTTP against a Kratos public endpoint.
#[derive(Debug, Clone)]
pub struct KratosFrontend {
    configuration: ApiConfiguration,
}

impl KratosFrontend {
    #[must_use]
    pub fn new(configuration: ApiConfiguration) -> Self {
        Self { configuration }
    }
}

#[async_trait]
impl FrontendApi for KratosFrontend {
    #[instrument(skip(self, cookie), fields(has_cookie = cookie.is_some()))]
    async fn to_session(&self, cookie: Option<&str>) -> Result<Session, SessionError> {
        let whoami = self.configuration.endpoint(WHOAMI_PATH)?;

        let mut request = self
            .configuration
            .client()
            .get(whoami)
            .header(ACCEPT, "application/json");

        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            debug!("whoami answered {}", status);

            return Err(SessionError::from_status(status.as_u16()));
        }

        let body = response.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }
}
