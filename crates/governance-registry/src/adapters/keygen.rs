//! # secp256k1 Key Generator
//!
//! Produces Ethereum-style principals: the last 20 bytes of the keccak256
//! hash of the uncompressed public key (without the 0x04 prefix).

use crate::domain::services::keccak256;
use crate::domain::value_objects::PrincipalId;
use crate::errors::KeyError;
use crate::ports::outbound::{KeyGenerator, PrincipalKeyPair};
use k256::ecdsa::{SigningKey, VerifyingKey};

/// Key generator backed by `k256`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256k1KeyGenerator;

impl Secp256k1KeyGenerator {
    /// Create a generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Derive the principal of a public key.
#[must_use]
pub fn principal_from_verifying_key(public_key: &VerifyingKey) -> PrincipalId {
    let encoded = public_key.to_encoded_point(false);
    let hash = keccak256(&encoded.as_bytes()[1..]);

    let mut principal = [0u8; 20];
    principal.copy_from_slice(&hash[12..]);
    PrincipalId::new(principal)
}

fn parse_secret(secret: &str) -> Result<SigningKey, KeyError> {
    let trimmed = secret.trim();
    let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(trimmed).map_err(|e| KeyError::InvalidSecret(e.to_string()))?;
    if bytes.len() != 32 {
        return Err(KeyError::InvalidSecret(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        )));
    }
    SigningKey::from_slice(&bytes).map_err(|e| KeyError::InvalidSecret(e.to_string()))
}

impl KeyGenerator for Secp256k1KeyGenerator {
    fn generate(&self) -> Result<PrincipalKeyPair, KeyError> {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        let principal = principal_from_verifying_key(signing_key.verifying_key());
        let secret = format!("0x{}", hex::encode(signing_key.to_bytes()));

        Ok(PrincipalKeyPair { principal, secret })
    }

    fn principal_from_secret(&self, secret: &str) -> Result<PrincipalId, KeyError> {
        let signing_key = parse_secret(secret)?;
        Ok(principal_from_verifying_key(signing_key.verifying_key()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
