use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::modules::customers::use_cases::browse_customers::inbound::http as browse_http;
use crate::modules::customers::use_cases::edit_attributes::inbound::http as edit_http;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/customers", get(browse_http::list))
        .route("/customers/session", get(browse_http::current_page))
        .route("/customers/session/reset", post(browse_http::reset))
        .route("/customers/session/next", post(browse_http::next_page))
        .route("/customers/session/prev", post(browse_http::prev_page))
        .route("/customers/update-metafield", post(edit_http::update_metafield))
        .route("/customers/save-edit", post(edit_http::save_edit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
