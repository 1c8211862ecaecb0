use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::debug;

use chirpy_types::api::WebhookEvent;

use crate::auth::{AppState, run_blocking};
use crate::middleware::{JsonBody, WebhookKey};

const UPGRADE_EVENT: &str = "user.upgraded";

/// Payment-provider callback. The key is checked before the body is parsed.
pub async fn polka(
    State(state): State<AppState>,
    _key: WebhookKey,
    JsonBody(event): JsonBody<WebhookEvent>,
) -> Result<impl IntoResponse, StatusCode> {
    if event.event != UPGRADE_EVENT {
        debug!("Ignoring webhook event {}", event.event);
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = event.data.user_id;
    run_blocking(&state, move |s| s.upgrade_account(user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
