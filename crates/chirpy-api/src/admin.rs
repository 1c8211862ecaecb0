use std::sync::atomic::Ordering;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};

use crate::auth::AppState;

pub async fn healthz() -> impl IntoResponse {
    "OK"
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let hits = state.hits.load(Ordering::Relaxed);
    Html(format!(
        "<html>\n<body>\n<h1>Welcome, Chirpy Admin</h1>\n<p>Chirpy has been visited {hits} times!</p>\n</body>\n</html>\n"
    ))
}

pub async fn reset(State(state): State<AppState>) -> impl IntoResponse {
    state.hits.store(0, Ordering::Relaxed);
    "OK"
}

/// Count requests to the static app.
pub async fn count_hits(State(state): State<AppState>, req: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::Relaxed);
    next.run(req).await
}
