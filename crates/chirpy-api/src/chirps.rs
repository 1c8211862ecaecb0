use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use chirpy_types::api::{ChirpQuery, CreateChirpRequest};

use crate::auth::{AppState, run_blocking};
use crate::middleware::{JsonBody, Requester};
use crate::service::SortOrder;

pub const MAX_CHIRP_CHARS: usize = 140;

pub async fn create_chirp(
    State(state): State<AppState>,
    Requester(author_id): Requester,
    JsonBody(req): JsonBody<CreateChirpRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if req.body.chars().count() > MAX_CHIRP_CHARS {
        return Err(StatusCode::BAD_REQUEST);
    }

    let post = run_blocking(&state, move |s| s.create_post(author_id, &req.body)).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn list_chirps(
    State(state): State<AppState>,
    Query(query): Query<ChirpQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let order = match query.sort.as_deref() {
        Some("desc") => SortOrder::Desc,
        _ => SortOrder::Asc,
    };

    let posts = run_blocking(&state, move |s| s.list_posts(query.author_id, order)).await?;
    Ok(Json(posts))
}

pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<u64>,
) -> Result<impl IntoResponse, StatusCode> {
    let post = run_blocking(&state, move |s| s.get_post(chirp_id)).await?;
    Ok(Json(post))
}

pub async fn delete_chirp(
    State(state): State<AppState>,
    Requester(requester_id): Requester,
    Path(chirp_id): Path<u64>,
) -> Result<impl IntoResponse, StatusCode> {
    run_blocking(&state, move |s| s.delete_post(requester_id, chirp_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
