//! API key to owner resolution

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use bearded_core::config::AuthConfig;
use bearded_core::domain::ids::UserId;

/// Authentication error
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing API key")]
    MissingCredentials,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Identity provider unavailable: {message}")]
    Unavailable { message: String },
}

/// Rejected `auth.api_keys` entry
#[derive(Debug, thiserror::Error)]
#[error("Invalid API key entry for user {user_id}: {reason}")]
pub struct KeyConfigError {
    pub user_id: String,
    pub reason: String,
}

/// Maps a presented API key to the user it belongs to
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// `Ok(None)` when the key is not recognised
    async fn resolve(&self, api_key: &str) -> Result<Option<UserId>, AuthError>;
}

/// Resolver over the keys listed in configuration
///
/// Keys are held as SHA-256 digests and compared in constant time.
#[derive(Debug, Default, Clone)]
pub struct StaticApiKeyResolver {
    keys: Vec<(Vec<u8>, UserId)>,
}

impl StaticApiKeyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, KeyConfigError> {
        let mut resolver = Self::new();
        for key in &config.api_keys {
            let invalid = |reason: &str| KeyConfigError {
                user_id: key.user_id.clone(),
                reason: reason.to_string(),
            };
            let user_id = UserId::parse(&key.user_id).map_err(|_| invalid("user_id is not a UUID"))?;
            let digest = hex::decode(&key.key_sha256)
                .ok()
                .filter(|d| d.len() == 32)
                .ok_or_else(|| invalid("key_sha256 is not a hex SHA-256 digest"))?;
            resolver.keys.push((digest, user_id));
        }
        Ok(resolver)
    }

    /// Register a raw key, hashing it first
    pub fn with_key(mut self, api_key: &str, user_id: UserId) -> Self {
        self.keys.push((Self::digest(api_key), user_id));
        self
    }

    /// Lowercase hex SHA-256 of `api_key`, the form stored in configuration
    pub fn hash_key(api_key: &str) -> String {
        hex::encode(Self::digest(api_key))
    }

    fn digest(api_key: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(api_key.as_bytes());
        hasher.finalize().to_vec()
    }
}

#[async_trait]
impl IdentityResolver for StaticApiKeyResolver {
    async fn resolve(&self, api_key: &str) -> Result<Option<UserId>, AuthError> {
        let presented = Self::digest(api_key);
        // Visit every entry so timing does not reveal which key matched
        let mut found = None;
        for (digest, user_id) in &self.keys {
            if bool::from(digest.as_slice().ct_eq(presented.as_slice())) {
                found = Some(*user_id);
            }
        }
        Ok(found)
    }
}
