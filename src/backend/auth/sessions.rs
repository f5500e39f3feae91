/**
 * Token Issuing and Verification
 *
 * This module signs and verifies the JWTs that identify a signed-in user.
 *
 * # Token Format
 *
 * - Header: `alg` (the single configured RSA algorithm), `kid`, `typ`
 * - Payload: `sub` (username), `iat`, `exp` (unix seconds)
 *
 * # Key Lookup
 *
 * Verification never uses key material carried by the token. The `kid`
 * header is read from the unverified header and passed to a
 * [`PublicKeyLookup`], which returns the public key to verify with. The
 * accepted algorithm list contains exactly the configured algorithm, so a
 * token whose header names another algorithm (for example HS256 signed with
 * the public key as a shared secret) is rejected before any signature check.
 */

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::ConfigError;

/// Identity claims carried by a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the authenticated user
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: u64,
    /// Expiration time (unix seconds)
    pub exp: u64,
}

impl Claims {
    /// Build claims for `subject` that expire `expires` after `now`.
    pub fn new(subject: impl Into<String>, now: DateTime<Utc>, expires: Duration) -> Self {
        let iat = now.timestamp().max(0) as u64;
        Self {
            sub: subject.into(),
            iat,
            exp: iat.saturating_add(expires.as_secs()),
        }
    }

    /// Username the claims were issued for.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Claims are valid while `now` is strictly before `exp`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), TokenError> {
        let now = now.timestamp().max(0) as u64;
        if now >= self.exp {
            return Err(TokenError::Expired);
        }
        Ok(())
    }
}

/// Token errors
///
/// Every variant means the caller is not authenticated. Callers at the HTTP
/// boundary must not tell clients which check failed.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("missing key id (kid) in token header")]
    MissingKeyId,
    #[error("unrecognized key id {0:?}")]
    UnknownKeyId(String),
    #[error("token expired")]
    Expired,
    #[error("parsing token: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("signing token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Maps a key id to the public key that verifies tokens carrying it.
pub trait PublicKeyLookup: Send + Sync {
    fn public_key(&self, kid: &str) -> Result<DecodingKey, TokenError>;
}

impl<F> PublicKeyLookup for F
where
    F: Fn(&str) -> Result<DecodingKey, TokenError> + Send + Sync,
{
    fn public_key(&self, kid: &str) -> Result<DecodingKey, TokenError> {
        self(kid)
    }
}

/// Lookup table with exactly one entry.
#[derive(Clone)]
pub struct SingleKeyLookup {
    key_id: String,
    key: DecodingKey,
}

impl SingleKeyLookup {
    pub fn new(key_id: impl Into<String>, key: DecodingKey) -> Self {
        Self {
            key_id: key_id.into(),
            key,
        }
    }
}

impl PublicKeyLookup for SingleKeyLookup {
    fn public_key(&self, kid: &str) -> Result<DecodingKey, TokenError> {
        if kid != self.key_id {
            return Err(TokenError::UnknownKeyId(kid.to_string()));
        }
        Ok(self.key.clone())
    }
}

/// Signs claims into tokens.
pub trait TokenGenerator: Send + Sync {
    fn generate_token(&self, claims: &Claims) -> Result<String, TokenError>;
}

/// Recovers claims from a token.
pub trait ClaimsParser: Send + Sync {
    fn parse_claims(&self, token: &str) -> Result<Claims, TokenError>;
}

/// Issues and verifies tokens with one RSA key pair.
pub struct Authenticator {
    private_key: EncodingKey,
    key_id: String,
    algorithm: Algorithm,
    lookup: Arc<dyn PublicKeyLookup>,
    validation: Validation,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("key_id", &self.key_id)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Create an authenticator
    ///
    /// # Errors
    ///
    /// * `MissingPrivateKey` - the PEM is empty
    /// * `InvalidPrivateKey` - the PEM is not an RSA private key
    /// * `EmptyKeyId` - the key id is blank
    /// * `UnsupportedAlgorithm` - the algorithm is unknown or not RSA based
    pub fn new(
        private_key_pem: &[u8],
        key_id: impl Into<String>,
        algorithm: &str,
        lookup: Arc<dyn PublicKeyLookup>,
    ) -> Result<Self, ConfigError> {
        if private_key_pem.iter().all(u8::is_ascii_whitespace) {
            return Err(ConfigError::MissingPrivateKey);
        }
        let key_id = key_id.into();
        if key_id.trim().is_empty() {
            return Err(ConfigError::EmptyKeyId);
        }
        let algorithm = parse_algorithm(algorithm)?;
        let private_key = EncodingKey::from_rsa_pem(private_key_pem)
            .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))?;

        // Only the configured algorithm is accepted when parsing.
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            private_key,
            key_id,
            algorithm,
            lookup,
            validation,
        })
    }

    /// Create an authenticator whose lookup serves the public half of
    /// `private_key_pem` under `key_id`.
    pub fn from_private_key_pem(
        private_key_pem: &[u8],
        key_id: impl Into<String>,
        algorithm: &str,
    ) -> Result<Self, ConfigError> {
        let key_id = key_id.into();
        let public_key = public_key_from_private_pem(private_key_pem)?;
        let lookup = Arc::new(SingleKeyLookup::new(key_id.clone(), public_key));
        Self::new(private_key_pem, key_id, algorithm, lookup)
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl TokenGenerator for Authenticator {
    fn generate_token(&self, claims: &Claims) -> Result<String, TokenError> {
        let mut header = Header::new(self.algorithm);
        header.kid = Some(self.key_id.clone());

        encode(&header, claims, &self.private_key).map_err(TokenError::Signing)
    }
}

impl ClaimsParser for Authenticator {
    fn parse_claims(&self, token: &str) -> Result<Claims, TokenError> {
        // The header is untrusted here; it only names the key to look up.
        let header = decode_header(token)?;
        let kid = header.kid.ok_or(TokenError::MissingKeyId)?;
        let key = self.lookup.public_key(&kid)?;

        let data = decode::<Claims>(token, &key, &self.validation)?;
        data.claims.validate(Utc::now())?;
        Ok(data.claims)
    }
}

fn parse_algorithm(name: &str) -> Result<Algorithm, ConfigError> {
    let algorithm = Algorithm::from_str(name)
        .map_err(|_| ConfigError::UnsupportedAlgorithm(name.to_string()))?;
    match algorithm {
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => Ok(algorithm),
        _ => Err(ConfigError::UnsupportedAlgorithm(name.to_string())),
    }
}

/// Derive the verification key from a PKCS#8 or PKCS#1 RSA private key PEM.
pub fn public_key_from_private_pem(private_key_pem: &[u8]) -> Result<DecodingKey, ConfigError> {
    let pem = std::str::from_utf8(private_key_pem)
        .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))?;
    if pem.trim().is_empty() {
        return Err(ConfigError::MissingPrivateKey);
    }
    let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))?;
    let public_pem = RsaPublicKey::from(&private_key)
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))?;

    DecodingKey::from_rsa_pem(public_pem.as_bytes())
        .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))
}
