use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short text post ("chirp"). Immutable once stored; only its author may delete it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub author_id: u64,
    pub body: String,
}

/// A stored account, including its password hash.
/// Never serialized over HTTP; see [`AccountView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub is_upgraded: bool,
}

/// Public-facing account fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: u64,
    pub email: String,
    #[serde(rename = "is_chirpy_red")]
    pub is_upgraded: bool,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            is_upgraded: account.is_upgraded,
        }
    }
}

/// A denylisted refresh token. Used only for negative lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokedToken {
    pub token: String,
    pub revoked_at: DateTime<Utc>,
}
