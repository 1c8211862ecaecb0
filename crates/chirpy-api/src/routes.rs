use std::path::Path;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState};
use crate::{admin, chirps, webhooks};

pub fn router(state: AppState, static_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/healthz", get(admin::healthz))
        .route("/reset", post(admin::reset))
        .route("/users", post(auth::register).put(auth::update_user))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/revoke", post(auth::revoke))
        .route("/chirps", get(chirps::list_chirps).post(chirps::create_chirp))
        .route(
            "/chirps/{chirp_id}",
            get(chirps::get_chirp).delete(chirps::delete_chirp),
        )
        .route("/polka/webhooks", post(webhooks::polka));

    let admin_routes = Router::new().route("/metrics", get(admin::metrics));

    let app_routes = Router::new()
        .nest_service("/app", ServeDir::new(static_dir))
        .layer(middleware::from_fn_with_state(state.clone(), admin::count_hits));

    Router::new()
        .nest("/api", api_routes)
        .nest("/admin", admin_routes)
        .merge(app_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
