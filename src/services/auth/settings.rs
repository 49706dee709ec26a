//! Authentication settings.
//!
//! Built once at startup and shared read-only; nothing here changes per request.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey};

use crate::error::SetupError;

pub const DEFAULT_PREFIX: &str = "JWT";
pub const DEFAULT_USERNAME_FIELD: &str = "username";
pub const DEFAULT_QUERY_PARAM: &str = "jwt";

/// Key used to verify token signatures.
#[derive(Clone)]
pub enum KeyMaterial {
    /// Shared secret for the HMAC algorithms.
    Secret(Vec<u8>),
    /// PEM-encoded public key (RSA, EC or Ed25519).
    Pem(String),
}

impl KeyMaterial {
    pub fn secret(secret: impl AsRef<[u8]>) -> Self {
        Self::Secret(secret.as_ref().to_vec())
    }

    pub fn pem(pem: impl Into<String>) -> Self {
        Self::Pem(pem.into())
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Secret(_) => "secret",
            Self::Pem(_) => "PEM",
        }
    }

    pub(crate) fn decoding_key(&self, algorithm: Algorithm) -> Result<DecodingKey, SetupError> {
        use Algorithm::*;

        let invalid = |source| SetupError::InvalidKey { algorithm, source };

        match (self, algorithm) {
            (Self::Secret(secret), HS256 | HS384 | HS512) => Ok(DecodingKey::from_secret(secret)),
            (Self::Pem(pem), RS256 | RS384 | RS512 | PS256 | PS384 | PS512) => {
                DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(invalid)
            }
            (Self::Pem(pem), ES256 | ES384) => {
                DecodingKey::from_ec_pem(pem.as_bytes()).map_err(invalid)
            }
            (Self::Pem(pem), EdDSA) => DecodingKey::from_ed_pem(pem.as_bytes()).map_err(invalid),
            _ => Err(SetupError::KeyMismatch {
                algorithm,
                key: self.kind(),
            }),
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        write!(f, "KeyMaterial::{}(..)", self.kind())
    }
}

/// Which checks the validator runs on top of decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    pub verify_signature: bool,
    pub verify_exp: bool,
    pub verify_nbf: bool,
    /// Only has an effect when an audience is configured.
    pub verify_aud: bool,
    /// Registered claims that must be present (`exp`, `nbf`, `aud`, `iss`, `sub`).
    pub require: Vec<String>,
    /// Clock skew tolerance in seconds for `exp` / `nbf`.
    pub leeway: u64,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            verify_signature: true,
            verify_exp: true,
            verify_nbf: true,
            verify_aud: true,
            require: Vec::new(),
            leeway: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    key: KeyMaterial,
    algorithm: Algorithm,
    prefix: String,
    username_field: String,
    audience: Option<Vec<String>>,
    issuer: Option<Vec<String>>,
    options: DecodeOptions,
    query_param: String,
}

impl AuthSettings {
    /// Settings with the defaults: `HS256`, prefix `JWT`, username claim
    /// `username`, WebSocket query parameter `jwt`.
    pub fn new(key: KeyMaterial) -> Self {
        Self {
            key,
            algorithm: Algorithm::HS256,
            prefix: DEFAULT_PREFIX.to_string(),
            username_field: DEFAULT_USERNAME_FIELD.to_string(),
            audience: None,
            issuer: None,
            options: DecodeOptions::default(),
            query_param: DEFAULT_QUERY_PARAM.to_string(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_username_field(mut self, field: impl Into<String>) -> Self {
        self.username_field = field.into();
        self
    }

    pub fn with_audience<I, T>(mut self, audience: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.audience = Some(audience.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_issuer<I, T>(mut self, issuer: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.issuer = Some(issuer.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_query_param(mut self, name: impl Into<String>) -> Self {
        self.query_param = name.into();
        self
    }

    pub fn key(&self) -> &KeyMaterial {
        &self.key
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn username_field(&self) -> &str {
        &self.username_field
    }

    pub fn audience(&self) -> Option<&[String]> {
        self.audience.as_deref()
    }

    pub fn issuer(&self) -> Option<&[String]> {
        self.issuer.as_deref()
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn query_param(&self) -> &str {
        &self.query_param
    }
}
