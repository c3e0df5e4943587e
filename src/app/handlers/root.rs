use crate::{
    middleware::{redirect, WELCOME_PATH},
    route::RouteOptionsCreator,
};
use axum::{response::Response, routing::get, Router};

// axum handler for /
pub async fn root() -> Response {
    redirect(WELCOME_PATH)
}

pub fn register(
    router: Router,
    _create_options: RouteOptionsCreator,
    route: Option<&str>,
) -> Router {
    router.route(route.unwrap_or("/"), get(root))
}
