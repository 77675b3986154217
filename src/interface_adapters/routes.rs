use crate::interface_adapters::cors::apply_cors_headers;
use crate::interface_adapters::handlers::relay::relay;
use crate::interface_adapters::state::AppState;
use axum::{Router, extract::DefaultBodyLimit, middleware};
use std::sync::Arc;

pub fn app(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.max_body_bytes;

    // Every path and method lands on the relay; CORS is stamped on the way out.
    Router::new()
        .fallback(relay)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::map_response(apply_cors_headers))
        .with_state(state)
}
