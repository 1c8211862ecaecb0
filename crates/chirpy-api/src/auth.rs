use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{debug, error};

use chirpy_types::api::{CredentialsRequest, LoginResponse, RefreshResponse};

use crate::error::ServiceError;
use crate::middleware::{BearerToken, JsonBody, Requester};
use crate::service::Service;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub service: Service,
    pub polka_key: String,
    /// Requests served under `/app` since start or the last reset.
    pub hits: AtomicU64,
}

impl AppStateInner {
    pub fn new(service: Service, polka_key: String) -> Self {
        Self {
            service,
            polka_key,
            hits: AtomicU64::new(0),
        }
    }
}

/// Run a blocking service call off the async runtime and map its error to a status.
pub(crate) async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, StatusCode>
where
    F: FnOnce(&Service) -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.service))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(reject)
}

pub(crate) fn reject(err: ServiceError) -> StatusCode {
    let status = err.status();
    if status.is_server_error() {
        error!("Request failed: {}", err);
    } else {
        debug!("Request rejected: {}", err);
    }
    status
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let account = run_blocking(&state, move |s| s.signup(&req.email, &req.password)).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let session = run_blocking(&state, move |s| s.login(&req.email, &req.password)).await?;

    Ok(Json(LoginResponse {
        account: session.account,
        token: session.access_token,
        refresh_token: session.refresh_token,
    }))
}

pub async fn update_user(
    State(state): State<AppState>,
    Requester(account_id): Requester,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let account = run_blocking(&state, move |s| {
        s.update_account(account_id, &req.email, &req.password)
    })
    .await?;
    Ok(Json(account))
}

pub async fn refresh(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, StatusCode> {
    let token = run_blocking(&state, move |s| s.refresh(&token)).await?;
    Ok(Json(RefreshResponse { token }))
}

pub async fn revoke(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, StatusCode> {
    run_blocking(&state, move |s| s.revoke(&token)).await?;
    Ok(StatusCode::NO_CONTENT)
}
