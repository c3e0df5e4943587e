use crate::{kratos::Session, middleware::with_require_auth, route::RouteOptionsCreator};
use axum::{extract::Extension, response::Json, routing::get, Router};

// axum handler for sessions, returns the session as the identity provider sent it
pub async fn sessions(Extension(session): Extension<Session>) -> Json<Session> {
    Json(session)
}

pub fn register(
    router: Router,
    create_options: RouteOptionsCreator,
    route: Option<&str>,
) -> Router {
    let routes = Router::new().route(route.unwrap_or("/sessions"), get(sessions));
    router.merge(with_require_auth(routes, create_options))
}
