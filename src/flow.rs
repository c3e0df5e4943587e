//! Self-service browser flow URLs.

use url::form_urlencoded;

/// Self-service flows that browsers are sent to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    Login,
    Registration,
    Recovery,
    Verification,
    Settings,
}

impl Flow {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Registration => "registration",
            Self::Recovery => "recovery",
            Self::Verification => "verification",
            Self::Settings => "settings",
        }
    }
}

/// Build `{base}/self-service/{flow}/browser`, appending `query` form-encoded
/// when it is not empty.
#[must_use]
pub fn url_for_flow(base: &str, flow: &str, query: &[(&str, &str)]) -> String {
    let base = base.trim_end_matches('/');
    let mut url = format!("{base}/self-service/{flow}/browser");

    if !query.is_empty() {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query)
            .finish();
        url.push('?');
        url.push_str(&encoded);
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_login_flow() {
        assert_eq!(
            url_for_flow("https://auth.example.com", Flow::Login.as_str(), &[]),
            "https://auth.example.com/self-service/login/browser"
        );
    }

    #[test]
    fn strips_trailing_slash() {
        assert_eq!(
            url_for_flow("https://auth.example.com/", "login", &[]),
            "https://auth.example.com/self-service/login/browser"
        );
    }

    #[test]
    fn keeps_base_path() {
        assert_eq!(
            url_for_flow("http://127.0.0.1:4433/.ory/kratos/public", "registration", &[]),
            "http://127.0.0.1:4433/.ory/kratos/public/self-service/registration/browser"
        );
    }

    #[test]
    fn second_factor_query() {
        assert_eq!(
            url_for_flow("https://auth.example.com", "login", &[("aal", "aal2")]),
            "https://auth.example.com/self-service/login/browser?aal=aal2"
        );
    }

    #[test]
    fn encodes_query_values() {
        assert_eq!(
            url_for_flow(
                "https://auth.example.com",
                "login",
                &[("return_to", "https://app.example.com/a b?x=1"), ("refresh", "true")]
            ),
            "https://auth.example.com/self-service/login/browser?return_to=https%3A%2F%2Fapp.example.com%2Fa+b%3Fx%3D1&refresh=true"
        );
    }

    #[test]
    fn flow_names() {
        assert_eq!(Flow::Settings.as_str(), "settings");
        assert_eq!(Flow::Recovery.as_str(), "recovery");
        assert_eq!(Flow::Verification.as_str(), "verification");
    }
}
