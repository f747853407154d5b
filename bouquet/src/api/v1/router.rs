use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::v1_auth_middleware;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let outputs = Router::new().route(
        "/{outputId}",
        get(handlers::outputs::get_output).delete(handlers::outputs::delete_output),
    );

    let sessions = Router::new()
        .route("/", post(handlers::chat::create_session))
        .route(
            "/{sessionId}",
            get(handlers::chat::get_session).delete(handlers::chat::delete_session),
        )
        .route("/{sessionId}/messages", post(handlers::chat::send_message))
        .route("/{sessionId}/files", post(handlers::chat::analyze_file));

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router());

    let protected_routes = Router::new()
        .route(
            "/uploads:analyze",
            post(handlers::planning::analyze_uploads),
        )
        .route(
            "/timelines:generate",
            post(handlers::planning::generate_timeline),
        )
        .nest("/outputs", outputs)
        .nest("/chat/sessions", sessions)
        .route_layer(middleware::from_fn_with_state(state, v1_auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}
