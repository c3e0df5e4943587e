use crate::{kratos::Session, middleware::with_set_session, route::RouteOptionsCreator};
use axum::{extract::Extension, response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Welcome {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
}

// axum handler for welcome, reachable with or without a session
pub async fn welcome(session: Option<Extension<Session>>) -> Json<Welcome> {
    let identity_id = session
        .and_then(|Extension(session)| session.identity_id())
        .map(|id| id.to_string());

    let message = if identity_id.is_some() {
        "Welcome back".to_string()
    } else {
        "Welcome".to_string()
    };

    Json(Welcome {
        message,
        identity_id,
    })
}

pub fn register(
    router: Router,
    create_options: RouteOptionsCreator,
    route: Option<&str>,
) -> Router {
    let routes = Router::new().route(route.unwrap_or("/welcome"), get(welcome));
    router.merge(with_set_session(routes, create_options))
}
