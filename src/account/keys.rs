// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Seed-derived account identity.
//!
//! A 32-byte random seed is the only secret. Two secp256k1 keys are derived
//! from it with domain-separated SHA-256:
//!
//! - the signing key, whose compressed public key (hex) is the account number
//! - the encryption key, whose compressed public key (hex) is registered with
//!   the backend as `enc_pub_key`

use chrono::{DateTime, Utc};
use k256::ecdsa::{signature::Signer, Signature, SigningKey};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, Zeroizing};

use crate::error::AccountCreationError;
use crate::models::AccountNumber;
use crate::storage::StoredAccount;

/// Seed length in bytes.
pub const SEED_LEN: usize = 32;

const SIGNING_DOMAIN: &[u8] = b"fb-archive-client/account/signing";
const ENCRYPTION_DOMAIN: &[u8] = b"fb-archive-client/account/encryption";

/// The device's cryptographic account identity.
#[derive(Clone)]
pub struct LocalAccount {
    seed: Zeroizing<Vec<u8>>,
    signing_key: SigningKey,
    account_number: AccountNumber,
    enc_pub_key: String,
}

impl std::fmt::Debug for LocalAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAccount")
            .field("account_number", &self.account_number)
            .field("enc_pub_key", &self.enc_pub_key)
            .finish_non_exhaustive()
    }
}

impl LocalAccount {
    /// Generate a new account from a fresh random seed.
    pub fn generate() -> Result<Self, AccountCreationError> {
        let mut seed = Zeroizing::new(vec![0u8; SEED_LEN]);
        OsRng
            .try_fill_bytes(seed.as_mut_slice())
            .map_err(|e| AccountCreationError::KeyDerivation(format!("entropy unavailable: {e}")))?;
        Self::from_seed(&seed)
    }

    /// Rebuild an account from its seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self, AccountCreationError> {
        if seed.len() != SEED_LEN {
            return Err(AccountCreationError::KeyDerivation(format!(
                "seed must be {SEED_LEN} bytes, got {}",
                seed.len()
            )));
        }

        let signing_key = derive_key(seed, SIGNING_DOMAIN)?;
        let encryption_key = derive_key(seed, ENCRYPTION_DOMAIN)?;

        Ok(Self {
            seed: Zeroizing::new(seed.to_vec()),
            account_number: AccountNumber(compressed_public_hex(&signing_key)),
            enc_pub_key: compressed_public_hex(&encryption_key),
            signing_key,
        })
    }

    pub fn account_number(&self) -> &AccountNumber {
        &self.account_number
    }

    pub fn enc_pub_key(&self) -> &str {
        &self.enc_pub_key
    }

    pub(crate) fn seed(&self) -> &[u8] {
        &self.seed
    }

    /// Sign `message` with the account key; returns the hex-encoded
    /// fixed-size ECDSA signature.
    pub fn sign(&self, message: &[u8]) -> String {
        let signature: Signature = self.signing_key.sign(message);
        hex::encode(signature.to_bytes())
    }

    /// Public values for local persistence.
    pub fn to_stored(&self, created_at: DateTime<Utc>) -> StoredAccount {
        StoredAccount {
            account_number: self.account_number.0.clone(),
            enc_pub_key: self.enc_pub_key.clone(),
            created_at,
        }
    }
}

fn derive_key(seed: &[u8], domain: &[u8]) -> Result<SigningKey, AccountCreationError> {
    let mut digest: [u8; 32] = Sha256::new()
        .chain_update(domain)
        .chain_update(seed)
        .finalize()
        .into();
    let key = SigningKey::from_slice(&digest)
        .map_err(|e| AccountCreationError::KeyDerivation(e.to_string()));
    digest.zeroize();
    key
}

fn compressed_public_hex(key: &SigningKey) -> String {
    hex::encode(key.verifying_key().to_encoded_point(true).as_bytes())
}
