use axum::{
    Json, RequestPartsExt,
    extract::{FromRequest, FromRequestParts, Request},
    http::{StatusCode, header, request::Parts},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::auth::{AppState, reject};

/// Raw token from an `Authorization: Bearer <token>` header.
/// A missing or malformed header is a 401.
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| StatusCode::UNAUTHORIZED)?;
        Ok(Self(bearer.token().to_string()))
    }
}

/// Account id of the caller, resolved from a valid access token.
pub struct Requester(pub u64);

impl FromRequestParts<AppState> for Requester {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        // Access tokens are checked without touching the store.
        let account_id = state.service.authorize_access(&token).map_err(reject)?;
        Ok(Self(account_id))
    }
}

/// JSON request body. Any rejection (bad syntax, missing fields, wrong
/// content type) is a 400.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|_| {
            debug!("Rejected malformed JSON body");
            StatusCode::BAD_REQUEST
        })?;
        Ok(Self(value))
    }
}

/// Proof that the request carries `Authorization: ApiKey <key>` matching the
/// configured webhook key. Resolved from headers, so it runs before the body
/// is read.
pub struct WebhookKey;

impl FromRequestParts<AppState> for WebhookKey {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("ApiKey "))
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let expected = state.polka_key.as_bytes();
        if expected.is_empty() || !bool::from(key.as_bytes().ct_eq(expected)) {
            warn!("Webhook rejected: bad API key");
            return Err(StatusCode::UNAUTHORIZED);
        }
        Ok(Self)
    }
}
