//! Symmetric envelope for ECIES encryption
//!
//! The ECDH shared secret and the ephemeral public point are hashed with
//! SHA-256 into an AES-256-GCM key. Envelope layout:
//! `ephemeral point || nonce (12 bytes) || ciphertext || tag`.
// Copyright 2025 Francisco F. Pinochet
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use crate::error::{KeyError, KeyResult};
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use sha2::{Digest, Sha256};

const KDF_LABEL: &[u8] = b"ecc-keys/ecies/aes-256-gcm";
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Derive the AES-256 key for one envelope
fn derive_key(shared_secret: &[u8], ephemeral_point: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(KDF_LABEL);
    hasher.update(shared_secret);
    hasher.update(ephemeral_point);
    hasher.finalize().into()
}

/// Encrypt `plaintext` and prepend the ephemeral point and nonce
pub(crate) fn seal_envelope(
    shared_secret: &[u8],
    ephemeral_point: &[u8],
    plaintext: &[u8],
) -> KeyResult<Vec<u8>> {
    let key = derive_key(shared_secret, ephemeral_point);
    let cipher = Aes256Gcm::new(&key.into());
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| KeyError::Encryption(format!("Encryption failed: {}", e)))?;

    let mut result = Vec::with_capacity(ephemeral_point.len() + NONCE_LEN + ciphertext.len());
    result.extend_from_slice(ephemeral_point);
    result.extend_from_slice(&nonce);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

/// Decrypt the part of an envelope that follows the ephemeral point
pub(crate) fn open_envelope(
    shared_secret: &[u8],
    ephemeral_point: &[u8],
    body: &[u8],
) -> KeyResult<Vec<u8>> {
    if body.len() < NONCE_LEN + TAG_LEN {
        return Err(KeyError::Decryption("Encrypted data too short".to_string()));
    }

    let (nonce_bytes, ciphertext) = body.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);
    let key = derive_key(shared_secret, ephemeral_point);
    let cipher = Aes256Gcm::new(&key.into());

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|e| KeyError::Decryption(format!("Decryption failed: {}", e)))
}
