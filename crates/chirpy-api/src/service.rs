use std::sync::Arc;

use tracing::{info, warn};

use chirpy_db::Store;
use chirpy_types::models::{AccountView, Post};

use crate::error::{AuthError, AuthzError, ConflictError, Result, ServiceError};
use crate::filter::clean_body;
use crate::password::Credentials;
use crate::tokens::TokenService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub account: AccountView,
    pub access_token: String,
    pub refresh_token: String,
}

/// Use-case façade over the store, password hashing and token issuance.
/// All methods block; async callers should run them off the runtime.
#[derive(Clone)]
pub struct Service {
    store: Arc<Store>,
    tokens: TokenService,
    credentials: Credentials,
}

impl Service {
    pub fn new(store: Arc<Store>, jwt_secret: &str) -> Self {
        Self::with_credentials(store, jwt_secret, Credentials::default())
    }

    pub fn with_credentials(store: Arc<Store>, jwt_secret: &str, credentials: Credentials) -> Self {
        let tokens = TokenService::new(jwt_secret, store.clone());
        Self {
            store,
            tokens,
            credentials,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    // -- Accounts --

    pub fn signup(&self, email: &str, password: &str) -> Result<AccountView> {
        let accounts = self.store.get_accounts()?;
        if accounts.iter().any(|a| a.email == email) {
            return Err(ConflictError::EmailExists.into());
        }

        let hash = self.credentials.hash(password)?;
        let account = self.store.create_account(email, &hash)?;
        Ok(AccountView::from(&account))
    }

    /// Unknown email and wrong password both fail with `NoSuchUser`.
    pub fn login(&self, email: &str, password: &str) -> Result<Session> {
        let accounts = self.store.get_accounts()?;
        let account = accounts
            .iter()
            .find(|a| a.email == email && self.credentials.verify(password, &a.password_hash))
            .ok_or(AuthError::NoSuchUser)?;

        let access_token = self.tokens.issue_access(account.id)?;
        let refresh_token = self.tokens.issue_refresh(account.id)?;

        info!("Account {} logged in", account.id);
        Ok(Session {
            account: AccountView::from(account),
            access_token,
            refresh_token,
        })
    }

    pub fn update_account(
        &self,
        id: u64,
        new_email: &str,
        new_password: &str,
    ) -> Result<AccountView> {
        let accounts = self.store.get_accounts()?;
        if accounts.iter().any(|a| a.id != id && a.email == new_email) {
            return Err(ConflictError::EmailExists.into());
        }

        let hash = self.credentials.hash(new_password)?;
        let account = self
            .store
            .update_account(id, new_email, &hash)?
            .ok_or(ServiceError::NotFound)?;
        Ok(AccountView::from(&account))
    }

    pub fn upgrade_account(&self, id: u64) -> Result<()> {
        if !self.store.set_account_upgraded(id)? {
            warn!("Upgrade requested for unknown account {}", id);
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }

    // -- Sessions --

    pub fn authorize_access(&self, token: &str) -> Result<u64> {
        self.tokens.authorize_access(token)
    }

    /// Mint a fresh access token from a valid, unrevoked refresh token.
    pub fn refresh(&self, refresh_token: &str) -> Result<String> {
        let account_id = self.tokens.authorize_refresh(refresh_token)?;
        self.tokens.issue_access(account_id)
    }

    /// Revoke a refresh token. It must still authorize, so revoking an
    /// already-revoked token fails with `Revoked`.
    pub fn revoke(&self, refresh_token: &str) -> Result<()> {
        let account_id = self.tokens.authorize_refresh(refresh_token)?;
        self.tokens.revoke(refresh_token)?;
        info!("Account {} revoked a refresh token", account_id);
        Ok(())
    }

    // -- Chirps --

    /// Store a chirp after masking profanity. Length limits are enforced by
    /// the HTTP layer before this is called.
    pub fn create_post(&self, author_id: u64, body: &str) -> Result<Post> {
        Ok(self.store.create_post(author_id, &clean_body(body))?)
    }

    pub fn get_post(&self, id: u64) -> Result<Post> {
        self.store.get_post(id)?.ok_or(ServiceError::NotFound)
    }

    pub fn list_posts(&self, author_id: Option<u64>, order: SortOrder) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .store
            .get_posts()?
            .into_iter()
            .filter(|p| author_id.is_none_or(|id| p.author_id == id))
            .collect();

        match order {
            SortOrder::Asc => posts.sort_by_key(|p| p.id),
            SortOrder::Desc => posts.sort_by(|a, b| b.id.cmp(&a.id)),
        }
        Ok(posts)
    }

    pub fn delete_post(&self, requester_id: u64, post_id: u64) -> Result<()> {
        let post = self.get_post(post_id)?;
        if post.author_id != requester_id {
            return Err(AuthzError::NotOwner.into());
        }

        // A concurrent delete by the same author may already have removed it.
        self.store
            .delete_post(post_id)?
            .ok_or(ServiceError::NotFound)?;
        Ok(())
    }
}
