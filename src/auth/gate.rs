//! JWT verification against a cached remote key set.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::AppConfig;

use super::{AuthError, Claims};

/// Bound on JWKS fetches. The provider is the only remote dependency of
/// the verification path and must not hang a request indefinitely.
const KEY_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a fetched key set is trusted before the next verification
/// triggers a refetch.
#[derive(Debug, Clone, Copy)]
pub struct RefreshPolicy {
    pub ttl: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15 * 60),
        }
    }
}

/// Verification parameters for one Stytch project.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Expected `aud` claim (the project id).
    pub audience: String,
    /// Expected `iss` claim (`stytch.com/<project id>`).
    pub issuer: String,
    /// Where the project's JWKS document lives.
    pub jwks_url: String,
    pub refresh: RefreshPolicy,
}

impl AuthConfig {
    /// Derive verification parameters from the application configuration.
    pub fn for_project(config: &AppConfig) -> Self {
        Self {
            audience: config.project_id.clone(),
            issuer: config.issuer(),
            jwks_url: config.jwks_url(),
            refresh: RefreshPolicy::default(),
        }
    }
}

/// Decoding keys indexed by `kid`, stamped with their fetch time.
struct KeyCache {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

/// Validates raw JWT credentials and produces verified claims.
///
/// The key set is fetched lazily on first use and refreshed once its TTL
/// elapses. A fresh cache that is missing a `kid` fails closed rather than
/// refetching; rotated keys are picked up after the TTL.
pub struct AuthGate {
    config: AuthConfig,
    http: reqwest::Client,
    keys: RwLock<Option<KeyCache>>,
}

impl AuthGate {
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(KEY_FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            config,
            http,
            keys: RwLock::new(None),
        })
    }

    /// Build a gate with a pre-loaded key set. No fetch happens until the
    /// TTL expires; used at process start when keys are known, and in tests.
    pub fn with_key_set(config: AuthConfig, key_set: &JwkSet) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(KEY_FETCH_TIMEOUT)
            .build()?;
        let cache = KeyCache {
            keys: index_keys(key_set),
            fetched_at: Instant::now(),
        };
        Ok(Self {
            config,
            http,
            keys: RwLock::new(Some(cache)),
        })
    }

    /// Verify a raw credential and return its claims.
    ///
    /// Checks, in order: header type and algorithm, key id resolution
    /// against the cached JWKS, then signature plus `exp`/`nbf`/`aud`/`iss`
    /// via `jsonwebtoken`. Callers decide the user-facing message; every
    /// failure here maps to 401.
    pub async fn verify_token(&self, raw: &str) -> Result<Claims, AuthError> {
        let header = decode_header(raw)?;
        if header.typ.as_deref() != Some("JWT") {
            return Err(AuthError::WrongType);
        }
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::WrongAlgorithm);
        }
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

        let data = decode::<Claims>(raw, &key, &validation)?;
        Ok(data.claims)
    }

    /// Resolve a decoding key, refreshing the key set when it is absent
    /// or stale.
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        {
            let cache = self.keys.read().await;
            if let Some(cache) = cache.as_ref()
                && cache.fetched_at.elapsed() < self.config.refresh.ttl
            {
                return cache
                    .keys
                    .get(kid)
                    .cloned()
                    .ok_or_else(|| AuthError::UnknownKey {
                        kid: kid.to_string(),
                    });
            }
        }

        self.refresh_keys().await?;

        let cache = self.keys.read().await;
        cache
            .as_ref()
            .and_then(|cache| cache.keys.get(kid).cloned())
            .ok_or_else(|| AuthError::UnknownKey {
                kid: kid.to_string(),
            })
    }

    /// Fetch the JWKS document and replace the cache. Concurrent callers
    /// may fetch redundantly; last writer wins.
    async fn refresh_keys(&self) -> Result<(), AuthError> {
        debug!(url = %self.config.jwks_url, "fetching JWKS");
        let key_set: JwkSet = self
            .http
            .get(&self.config.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let cache = KeyCache {
            keys: index_keys(&key_set),
            fetched_at: Instant::now(),
        };
        *self.keys.write().await = Some(cache);
        Ok(())
    }
}

/// Index a JWKS by `kid`, skipping entries we cannot turn into a decoding
/// key (unsupported key types, missing ids).
fn index_keys(key_set: &JwkSet) -> HashMap<String, DecodingKey> {
    let mut keys = HashMap::new();
    for jwk in &key_set.keys {
        let Some(kid) = jwk.common.key_id.clone() else {
            warn!("skipping JWKS entry without kid");
            continue;
        };
        match DecodingKey::from_jwk(jwk) {
            Ok(key) => {
                keys.insert(kid, key);
            }
            Err(error) => warn!(%kid, %error, "skipping unusable JWKS entry"),
        }
    }
    keys
}
