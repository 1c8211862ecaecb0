use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use chirpy_types::models::{Account, Post, RevokedToken};

/// The full on-disk document. Every collection is always written, so a
/// persisted snapshot is never missing one; `default` tolerates older files.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub posts: BTreeMap<u64, Post>,
    #[serde(default)]
    pub accounts: BTreeMap<u64, Account>,
    #[serde(default)]
    pub revoked_tokens: BTreeMap<String, RevokedToken>,
}

/// Smallest positive integer not already used as a key.
pub(crate) fn next_id<V>(collection: &BTreeMap<u64, V>) -> u64 {
    let mut id = 1;
    while collection.contains_key(&id) {
        id += 1;
    }
    id
}
