use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use tracing::debug;

use chirpy_db::Store;
use chirpy_types::api::Claims;

use crate::error::{AuthError, Result};

pub const ACCESS_ISSUER: &str = "access";
pub const REFRESH_ISSUER: &str = "refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Access,
    Refresh,
}

impl TokenClass {
    pub fn issuer(self) -> &'static str {
        match self {
            Self::Access => ACCESS_ISSUER,
            Self::Refresh => REFRESH_ISSUER,
        }
    }

    pub fn lifetime(self) -> Duration {
        match self {
            Self::Access => Duration::hours(1),
            Self::Refresh => Duration::days(60),
        }
    }
}

/// Issues and validates HS256 session tokens bound to an account id.
///
/// Refresh tokens are additionally checked against the store's revocation
/// list. Expiry is only ever detected lazily, at validation time.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    store: Arc<Store>,
}

impl TokenService {
    pub fn new(secret: &str, store: Arc<Store>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            store,
        }
    }

    pub fn issue_access(&self, account_id: u64) -> Result<String> {
        self.issue_at(TokenClass::Access, account_id, Utc::now())
    }

    pub fn issue_refresh(&self, account_id: u64) -> Result<String> {
        self.issue_at(TokenClass::Refresh, account_id, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        class: TokenClass,
        account_id: u64,
        issued_at: DateTime<Utc>,
    ) -> Result<String> {
        let claims = Claims {
            iss: class.issuer().to_string(),
            sub: account_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + class.lifetime()).timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn authorize_access(&self, token: &str) -> Result<u64> {
        self.validate(token, TokenClass::Access)
    }

    /// The revocation check runs before any signature or expiry check, so a
    /// revoked token fails with `Revoked` whatever else is wrong with it.
    pub fn authorize_refresh(&self, token: &str) -> Result<u64> {
        if self.store.is_token_revoked(token)? {
            return Err(AuthError::Revoked.into());
        }
        self.validate(token, TokenClass::Refresh)
    }

    pub fn revoke(&self, token: &str) -> Result<()> {
        self.store.add_revoked_token(token, Utc::now())?;
        debug!("Revoked refresh token");
        Ok(())
    }

    fn validate(&self, token: &str, class: TokenClass) -> Result<u64> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidSignature,
            }
        })?;

        if data.claims.iss != class.issuer() {
            return Err(AuthError::WrongIssuer.into());
        }

        data.claims
            .sub
            .parse::<u64>()
            .map_err(|_| AuthError::MalformedSubject.into())
    }
}
