//! Session gates.
//!
//! Every gate asks the identity provider for the session behind the request's
//! cookies and then decides between continuing and redirecting:
//!
//! | gate              | session            | `403` (needs AAL2)                 | other failure      |
//! |-------------------|--------------------|------------------------------------|--------------------|
//! | `require_auth`    | attach, continue   | login flow with `aal=aal2`         | plain login flow   |
//! | `set_session`     | attach, continue   | login flow with `aal=aal2`         | continue           |
//! | `require_no_auth` | redirect `welcome` | continue                           | continue           |

use crate::{
    flow::{url_for_flow, Flow},
    kratos::{Session, SessionError},
    route::{CreateRouteOptions, RouteOptions, RouteOptionsCreator},
};
use axum::{
    extract::{Request, State},
    http::{
        header::{COOKIE, LOCATION},
        HeaderValue, StatusCode,
    },
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    Router,
};
use tracing::{debug, error};

/// Where signed-in browsers are sent by [`require_no_auth`].
pub const WELCOME_PATH: &str = "welcome";

/// `302 Found` to `location`.
#[must_use]
pub fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(LOCATION, value)]).into_response(),
        Err(e) => {
            error!("Invalid redirect location {}: {}", location, e);

            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Redirect to the login flow asking for a second factor when the provider
/// answered `403`, `None` for any other failure.
#[must_use]
pub fn maybe_initiate_2fa(err: &SessionError, kratos_browser_url: &str) -> Option<Response> {
    if !err.requires_second_factor() {
        return None;
    }

    Some(redirect(&url_for_flow(
        kratos_browser_url,
        Flow::Login.as_str(),
        &[("aal", "aal2")],
    )))
}

pub fn add_session_to_request(request: &mut Request, session: Session) {
    request.extensions_mut().insert(session);
}

/// Every `Cookie` header of the request, joined the way a single header would carry them.
fn cookie_header(request: &Request) -> Option<String> {
    let cookies: Vec<&str> = request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();

    if cookies.is_empty() {
        None
    } else {
        Some(cookies.join("; "))
    }
}

/// Build the options and pull the cookies before any await, the request body is not `Sync`.
fn prepare(
    create_options: &RouteOptionsCreator,
    request: &Request,
) -> (RouteOptions, Option<String>) {
    (create_options.create(request), cookie_header(request))
}

async fn resolve_session(
    options: &RouteOptions,
    cookie: Option<&str>,
) -> Result<Session, SessionError> {
    let result = options.frontend.to_session(cookie).await;

    if let Err(e) = &result {
        match e {
            SessionError::SecondFactorRequired | SessionError::Unauthorized { .. } => {
                debug!("No session: {}", e);
            }
            SessionError::Transport(_) | SessionError::Decode(_) | SessionError::InvalidUrl(_) => {
                error!("Failed to resolve session: {}", e);
            }
        }
    }

    result
}

/// Continue only with a session; otherwise send the browser to the login flow.
pub async fn require_auth(
    State(create_options): State<RouteOptionsCreator>,
    mut request: Request,
    next: Next,
) -> Response {
    let (options, cookie) = prepare(&create_options, &request);
    let result = resolve_session(&options, cookie.as_deref()).await;
    let kratos_browser_url = options.kratos_browser_url;

    match result {
        Ok(session) => {
            add_session_to_request(&mut request, session);
            next.run(request).await
        }
        Err(e) => maybe_initiate_2fa(&e, &kratos_browser_url).unwrap_or_else(|| {
            redirect(&url_for_flow(&kratos_browser_url, Flow::Login.as_str(), &[]))
        }),
    }
}

/// Attach the session when there is one and always continue.
///
/// When the provider asks for a second factor the downstream handler still runs,
/// but the browser receives the redirect to the login flow.
pub async fn set_session(
    State(create_options): State<RouteOptionsCreator>,
    mut request: Request,
    next: Next,
) -> Response {
    let (options, cookie) = prepare(&create_options, &request);
    let result = resolve_session(&options, cookie.as_deref()).await;
    let kratos_browser_url = options.kratos_browser_url;

    match result {
        Ok(session) => {
            add_session_to_request(&mut request, session);
            next.run(request).await
        }
        Err(e) => match maybe_initiate_2fa(&e, &kratos_browser_url) {
            Some(redirect) => {
                let discarded = next.run(request).await;
                debug!(
                    "Replacing {} response with second factor redirect",
                    discarded.status()
                );
                redirect
            }
            None => next.run(request).await,
        },
    }
}

/// Continue only without a session; signed-in browsers go to [`WELCOME_PATH`].
pub async fn require_no_auth(
    State(create_options): State<RouteOptionsCreator>,
    request: Request,
    next: Next,
) -> Response {
    let (options, cookie) = prepare(&create_options, &request);
    let result = resolve_session(&options, cookie.as_deref()).await;

    match result {
        Ok(_) => redirect(WELCOME_PATH),
        Err(_) => next.run(request).await,
    }
}

/// Gate every route of `router` with [`require_auth`].
pub fn with_require_auth<S>(router: Router<S>, create_options: RouteOptionsCreator) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(from_fn_with_state(create_options, require_auth))
}

/// Gate every route of `router` with [`set_session`].
pub fn with_set_session<S>(router: Router<S>, create_options: RouteOptionsCreator) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(from_fn_with_state(create_options, set_session))
}

/// Gate every route of `router` with [`require_no_auth`].
pub fn with_require_no_auth<S>(router: Router<S>, create_options: RouteOptionsCreator) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(from_fn_with_state(create_options, require_no_auth))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        kratos::FrontendApi,
        route::{tests::options_for, RouteCreator},
    };
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        routing::get,
        Extension,
    };
    use serde_json::json;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };
    use tower::ServiceExt;

    const BROWSER_URL: &str = "https://auth.example.com";

    #[derive(Debug, Clone, Copy)]
    enum Outcome {
        Session,
        Forbidden,
        Unauthorized,
        Malformed,
    }

    #[derive(Debug)]
    struct StubFrontend {
        outcome: Outcome,
        cookies: Mutex<Vec<Option<String>>>,
    }

    impl StubFrontend {
        fn new(outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                cookies: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl FrontendApi for StubFrontend {
        async fn to_session(&self, cookie: Option<&str>) -> Result<Session, SessionError> {
            self.cookies
                .lock()
                .unwrap()
                .push(cookie.map(ToString::to_string));
            match self.outcome {
                Outcome::Session => Ok(serde_json::from_value(json!({
                    "id": "8f0b5e0a-35b4-4d5c-9b8e-2c1f0a7d6e41",
                    "active": true,
                    "identity": {"id": "0e6c3a5e-1f5f-4d0e-8a8b-5e0b1c2d3e4f"}
                }))?),
                Outcome::Forbidden => Err(SessionError::from_status(403)),
                Outcome::Unauthorized => Err(SessionError::from_status(401)),
                Outcome::Malformed => Err(SessionError::Decode(
                    serde_json::from_str::<Session>("<html>").unwrap_err(),
                )),
            }
        }
    }

    struct Harness {
        app: Router,
        frontend: Arc<StubFrontend>,
        hits: Arc<AtomicUsize>,
    }

    fn harness(outcome: Outcome, gate: RouteCreator) -> Harness {
        let frontend = StubFrontend::new(outcome);
        let creator = options_for(frontend.clone(), BROWSER_URL).into_creator();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        let router = Router::new().route(
            "/protected",
            get(move |session: Option<Extension<Session>>| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    session.map_or_else(
                        || "anonymous".to_string(),
                        |Extension(session)| session.id.to_string(),
                    )
                }
            }),
        );

        Harness {
            app: gate(router, creator),
            frontend,
            hits,
        }
    }

    fn request() -> Request {
        Request::builder()
            .uri("/protected")
            .header(COOKIE, "ory_kratos_session=abc")
            .body(Body::empty())
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    #[tokio::test]
    async fn require_auth_attaches_session() {
        let h = harness(Outcome::Session, with_require_auth);
        let response = h.app.oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "8f0b5e0a-35b4-4d5c-9b8e-2c1f0a7d6e41");
        assert_eq!(h.hits.load(Ordering::SeqCst), 1);
        assert_eq!(
            h.frontend.cookies.lock().unwrap().as_slice(),
            &[Some("ory_kratos_session=abc".to_string())]
        );
    }

    #[tokio::test]
    async fn require_auth_forbidden_redirects_to_aal2() {
        let h = harness(Outcome::Forbidden, with_require_auth);
        let response = h.app.oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            location(&response),
            Some("https://auth.example.com/self-service/login/browser?aal=aal2")
        );
        assert_eq!(h.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn require_auth_without_session_redirects_to_login() {
        let h = harness(Outcome::Unauthorized, with_require_auth);
        let response = h.app.oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            location(&response),
            Some("https://auth.example.com/self-service/login/browser")
        );
        assert_eq!(h.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn set_session_attaches_session() {
        let h = harness(Outcome::Session, with_set_session);
        let response = h.app.oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "8f0b5e0a-35b4-4d5c-9b8e-2c1f0a7d6e41");
    }

    #[tokio::test]
    async fn set_session_forbidden_redirects_after_running_handler() {
        let h = harness(Outcome::Forbidden, with_set_session);
        let response = h.app.oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            location(&response),
            Some("https://auth.example.com/self-service/login/browser?aal=aal2")
        );
        assert_eq!(h.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn set_session_without_session_continues() {
        let h = harness(Outcome::Unauthorized, with_set_session);
        let response = h.app.oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "anonymous");
        assert_eq!(h.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn require_no_auth_with_session_redirects_to_welcome() {
        let h = harness(Outcome::Session, with_require_no_auth);
        let response = h.app.oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), Some(WELCOME_PATH));
        assert_eq!(h.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn require_no_auth_forbidden_continues() {
        let h = harness(Outcome::Forbidden, with_require_no_auth);
        let response = h.app.oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "anonymous");
    }

    #[tokio::test]
    async fn require_no_auth_without_session_continues() {
        let h = harness(Outcome::Unauthorized, with_require_no_auth);
        let response = h.app.oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(h.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn require_auth_malformed_session_redirects_to_login() {
        let h = harness(Outcome::Malformed, with_require_auth);
        let response = h.app.oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            location(&response),
            Some("https://auth.example.com/self-service/login/browser")
        );
        assert_eq!(h.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn set_session_malformed_session_continues() {
        let h = harness(Outcome::Malformed, with_set_session);
        let response = h.app.oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "anonymous");
        assert_eq!(h.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn require_no_auth_malformed_session_continues() {
        let h = harness(Outcome::Malformed, with_require_no_auth);
        let response = h.app.oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "anonymous");
        assert_eq!(h.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_cookie_is_not_forwarded() {
        let h = harness(Outcome::Unauthorized, with_set_session);
        let request = Request::builder()
            .uri("/protected")
            .body(Body::empty())
            .unwrap();
        let _ = h.app.oneshot(request).await.unwrap();

        assert_eq!(h.frontend.cookies.lock().unwrap().as_slice(), &[None]);
    }

    #[tokio::test]
    async fn split_cookie_headers_are_joined() {
        let h = harness(Outcome::Session, with_require_auth);
        let request = Request::builder()
            .uri("/protected")
            .header(COOKIE, "a=1")
            .header(COOKIE, "ory_kratos_session=abc")
            .body(Body::empty())
            .unwrap();
        let _ = h.app.oneshot(request).await.unwrap();

        assert_eq!(
            h.frontend.cookies.lock().unwrap().as_slice(),
            &[Some("a=1; ory_kratos_session=abc".to_string())]
        );
    }

    #[test]
    fn maybe_initiate_2fa_ignores_other_errors() {
        let err = SessionError::from_status(401);
        assert!(maybe_initiate_2fa(&err, BROWSER_URL).is_none());
    }

    #[test]
    fn redirect_rejects_invalid_location() {
        let response = redirect("bad\nlocation");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
