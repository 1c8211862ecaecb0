use chrono::{DateTime, Utc};
use tracing::info;

use chirpy_types::models::{Account, Post, RevokedToken};

use crate::document::next_id;
use crate::{Mutation, Result, Store};

impl Store {
    // -- Posts --

    pub fn create_post(&self, author_id: u64, body: &str) -> Result<Post> {
        let post = self.with_snapshot_mut(|doc| {
            let post = Post {
                id: next_id(&doc.posts),
                author_id,
                body: body.to_string(),
            };
            doc.posts.insert(post.id, post.clone());
            Mutation::changed(post)
        })?;

        info!("Created post {} by account {}", post.id, author_id);
        Ok(post)
    }

    pub fn get_posts(&self) -> Result<Vec<Post>> {
        self.with_snapshot(|doc| doc.posts.values().cloned().collect())
    }

    pub fn get_post(&self, id: u64) -> Result<Option<Post>> {
        self.with_snapshot(|doc| doc.posts.get(&id).cloned())
    }

    /// Remove a post. Returns the removed record, or `None` if it was absent.
    pub fn delete_post(&self, id: u64) -> Result<Option<Post>> {
        let removed = self.with_snapshot_mut(|doc| match doc.posts.remove(&id) {
            Some(post) => Mutation::changed(Some(post)),
            None => Mutation::unchanged(None),
        })?;
        if removed.is_some() {
            info!("Deleted post {}", id);
        }
        Ok(removed)
    }

    // -- Accounts --

    /// Insert an account. Email uniqueness is the caller's concern.
    pub fn create_account(&self, email: &str, password_hash: &str) -> Result<Account> {
        let account = self.with_snapshot_mut(|doc| {
            let account = Account {
                id: next_id(&doc.accounts),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                is_upgraded: false,
            };
            doc.accounts.insert(account.id, account.clone());
            Mutation::changed(account)
        })?;

        info!("Created account {}", account.id);
        Ok(account)
    }

    pub fn get_accounts(&self) -> Result<Vec<Account>> {
        self.with_snapshot(|doc| doc.accounts.values().cloned().collect())
    }

    /// Replace email and password hash in place. `None` if no such account.
    pub fn update_account(
        &self,
        id: u64,
        new_email: &str,
        new_password_hash: &str,
    ) -> Result<Option<Account>> {
        self.with_snapshot_mut(|doc| match doc.accounts.get_mut(&id) {
            Some(account) => {
                account.email = new_email.to_string();
                account.password_hash = new_password_hash.to_string();
                Mutation::changed(Some(account.clone()))
            }
            None => Mutation::unchanged(None),
        })
    }

    /// Mark an account as upgraded. Returns false if no such account.
    pub fn set_account_upgraded(&self, id: u64) -> Result<bool> {
        let found = self.with_snapshot_mut(|doc| match doc.accounts.get_mut(&id) {
            Some(account) => {
                account.is_upgraded = true;
                Mutation::changed(true)
            }
            None => Mutation::unchanged(false),
        })?;

        if found {
            info!("Upgraded account {}", id);
        }
        Ok(found)
    }

    // -- Revoked tokens --

    /// Denylist a token. A token already present keeps its original timestamp.
    pub fn add_revoked_token(&self, token: &str, revoked_at: DateTime<Utc>) -> Result<()> {
        self.with_snapshot_mut(|doc| {
            if doc.revoked_tokens.contains_key(token) {
                return Mutation::unchanged(());
            }
            doc.revoked_tokens.insert(
                token.to_string(),
                RevokedToken {
                    token: token.to_string(),
                    revoked_at,
                },
            );
            Mutation::changed(())
        })
    }

    pub fn get_revoked_tokens(&self) -> Result<Vec<RevokedToken>> {
        self.with_snapshot(|doc| doc.revoked_tokens.values().cloned().collect())
    }

    pub fn is_token_revoked(&self, token: &str) -> Result<bool> {
        self.with_snapshot(|doc| doc.revoked_tokens.contains_key(token))
    }
}
