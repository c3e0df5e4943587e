//! Identity provider client.
//!
//! The gates only need the frontend `whoami` call ([`FrontendApi::to_session`]).
//! The admin handles ([`IdentityApi`], [`OAuth2Api`], [`PermissionApi`]) carry a
//! configured client for routes that talk to the other provider services.

pub mod error;
pub mod frontend;
pub mod session;

pub use self::error::SessionError;
pub use self::frontend::{FrontendApi, KratosFrontend};
pub use self::session::{AuthenticationMethod, AuthenticatorAssuranceLevel, Identity, Session};

use crate::APP_USER_AGENT;
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use url::Url;

/// Parse an absolute `http` or `https` URL.
///
/// # Errors
/// Returns an error if the URL does not parse or uses another scheme.
pub fn parse_http_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid base URL: {raw}"))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(anyhow!("Error parsing URL: unsupported scheme {scheme}")),
    }
}

/// Base URL plus a pooled HTTP client for one provider service.
#[derive(Debug, Clone)]
pub struct ApiConfiguration {
    base_path: Url,
    client: Client,
}

impl ApiConfiguration {
    /// Build a configuration for the service reachable at `base_path`.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid, is not HTTP(S), or the client cannot be built.
    pub fn new(base_path: &str) -> Result<Self> {
        let base_path = parse_http_url(base_path)?;

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { base_path, client })
    }

    #[must_use]
    pub fn base_path(&self) -> &Url {
        &self.base_path
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Resolve `endpoint` below the base path, keeping any path prefix of the base.
    ///
    /// # Errors
    /// Returns an error if the joined URL does not parse.
    pub fn endpoint(&self, endpoint: &str) -> Result<Url, url::ParseError> {
        let base = self.base_path.as_str().trim_end_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        Url::parse(&format!("{base}/{endpoint}"))
    }
}

/// Handle for the identity admin API.
#[derive(Debug, Clone)]
pub struct IdentityApi {
    configuration: ApiConfiguration,
}

impl IdentityApi {
    #[must_use]
    pub fn new(configuration: ApiConfiguration) -> Self {
        Self { configuration }
    }

    #[must_use]
    pub fn configuration(&self) -> &ApiConfiguration {
        &self.configuration
    }
}

/// Handle for the OAuth2 admin API.
#[derive(Debug, Clone)]
pub struct OAuth2Api {
    configuration: ApiConfiguration,
}

impl OAuth2Api {
    #[must_use]
    pub fn new(configuration: ApiConfiguration) -> Self {
        Self { configuration }
    }

    #[must_use]
    pub fn configuration(&self) -> &ApiConfiguration {
        &self.configuration
    }
}

/// Handle for the permission (relationship check) API.
#[derive(Debug, Clone)]
pub struct PermissionApi {
    configuration: ApiConfiguration,
}

impl PermissionApi {
    #[must_use]
    pub fn new(configuration: ApiConfiguration) -> Self {
        Self { configuration }
    }

    #[must_use]
    pub fn configuration(&self) -> &ApiConfiguration {
        &self.configuration
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let config = ApiConfiguration::new("https://auth.example.com/kratos/").unwrap();
        assert_eq!(
            config.endpoint("/sessions/whoami").unwrap().as_str(),
            "https://auth.example.com/kratos/sessions/whoami"
        );
    }

    #[test]
    fn endpoint_without_path() {
        let config = ApiConfiguration::new("http://127.0.0.1:4433").unwrap();
        assert_eq!(
            config.endpoint("sessions/whoami").unwrap().as_str(),
            "http://127.0.0.1:4433/sessions/whoami"
        );
    }

    #[test]
    fn rejects_unsupported_scheme() {
        let err = ApiConfiguration::new("ftp://auth.example.com").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme ftp"));
    }

    #[test]
    fn parse_http_url_rejects_host_without_scheme() {
        assert!(parse_http_url("auth.example.com").is_err());
        assert!(parse_http_url("mailto:team@example.com").is_err());
        assert!(parse_http_url("https://auth.example.com").is_ok());
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(ApiConfiguration::new("not a url").is_err());
    }

    #[test]
    fn handles_expose_configuration() {
        let config = ApiConfiguration::new("http://127.0.0.1:4445").unwrap();
        let oauth2 = OAuth2Api::new(config.clone());
        let identity = IdentityApi::new(config.clone());
        let permissions = PermissionApi::new(config);
        assert_eq!(oauth2.configuration().base_path().port(), Some(4445));
        assert_eq!(identity.configuration().base_path().host_str(), Some("127.0.0.1"));
        assert_eq!(permissions.configuration().base_path().scheme(), "http");
    }
}
