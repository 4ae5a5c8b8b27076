//! Salted hashing and HMAC-SHA256 signed tokens.
//!
//! Tokens use the compact JWT layout with the `HS256` algorithm:
//! `base64url(header).base64url(payload).base64url(signature)`, no padding.
//! The payload is the caller's claims object with an `iat` (seconds since
//! the Unix epoch) added on signing.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("malformed token")]
    Malformed,

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid claims: {0}")]
    Claims(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Verified claims plus the issue time carried in the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signed<T> {
    #[serde(flatten)]
    pub claims: T,
    pub iat: i64,
}

/// Hex SHA-256 of `message` followed by `salt`.
pub fn salted_digest(message: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(message.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl TokenSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self { secret: secret.into() }
    }

    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, SigningError> {
        self.sign_at(claims, Utc::now().timestamp())
    }

    pub fn sign_at<T: Serialize>(&self, claims: &T, iat: i64) -> Result<String, SigningError> {
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        };
        let payload = Signed { claims, iat };

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload)?),
        );
        let signature = URL_SAFE_NO_PAD.encode(self.mac(signing_input.as_bytes()).finalize().into_bytes());

        Ok(format!("{}.{}", signing_input, signature))
    }

    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<Signed<T>, SigningError> {
        let mut parts = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(SigningError::Malformed);
        };

        let header: Header = serde_json::from_slice(&decode(header)?)?;
        if header.alg != ALGORITHM {
            return Err(SigningError::UnsupportedAlgorithm(header.alg));
        }

        let signing_input_len = token.len() - signature.len() - 1;
        self.mac(token[..signing_input_len].as_bytes())
            .verify_slice(&decode(signature)?)
            .map_err(|_| SigningError::InvalidSignature)?;

        Ok(serde_json::from_slice(&decode(payload)?)?)
    }

    fn mac(&self, data: &[u8]) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(data);
        mac
    }
}

fn decode(part: &str) -> Result<Vec<u8>, SigningError> {
    URL_SAFE_NO_PAD.decode(part).map_err(|_| SigningError::Malformed)
}
