use crate::{
    flow::{url_for_flow, Flow},
    middleware::with_require_no_auth,
    route::{CreateRouteOptions, RouteOptionsCreator, Theme},
};
use axum::{
    extract::{Request, State},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

/// What a login page needs to render links and branding.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct LoginPage {
    pub login_url: String,
    pub registration_url: String,
    pub recovery_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

// axum handler for login, only reached without a session
pub async fn login(
    State(create_options): State<RouteOptionsCreator>,
    request: Request,
) -> Json<LoginPage> {
    let options = create_options.create(&request);
    let base = options.kratos_browser_url.as_str();

    Json(LoginPage {
        login_url: url_for_flow(base, Flow::Login.as_str(), &[]),
        registration_url: url_for_flow(base, Flow::Registration.as_str(), &[]),
        recovery_url: url_for_flow(base, Flow::Recovery.as_str(), &[]),
        logo_url: options.logo_url,
        theme: options.theme,
    })
}

pub fn register(
    router: Router,
    create_options: RouteOptionsCreator,
    route: Option<&str>,
) -> Router {
    let routes = Router::new()
        .route(route.unwrap_or("/login"), get(login))
        .with_state(create_options.clone());
    router.merge(with_require_no_auth(routes, create_options))
}
