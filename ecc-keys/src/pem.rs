//! PEM block handling and passphrase protection of private keys
//!
//! Private keys without a passphrase are written as SEC1 `EC PRIVATE KEY`
//! blocks. With a passphrase they are written as PKCS#8
//! `ENCRYPTED PRIVATE KEY` blocks (PBES2 with PBKDF2-HMAC-SHA256 and
//! AES-256-CBC).
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
use pkcs8::pkcs5::pbes2;
use pkcs8::{EncryptedPrivateKeyInfo, LineEnding, PrivateKeyInfo, SecretDocument};
use rand::rngs::OsRng;
use rand::RngCore;

pub const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
pub const EC_PRIVATE_KEY_LABEL: &str = "EC PRIVATE KEY";
pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
pub const ENCRYPTED_PRIVATE_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";

const BEGIN_MARKER: &str = "-----BEGIN ";
const END_MARKER: &str = "-----END ";
const DASHES: &str = "-----";

const SALT_LEN: usize = 16;
const AES_IV_LEN: usize = 16;

/// Decoded PEM block
#[derive(Debug)]
pub(crate) struct PemBlock {
    pub label: String,
    pub der: Vec<u8>,
}

/// Decode the first PEM block in `text`. Anything before the BEGIN line or
/// after the END line is ignored.
pub(crate) fn decode_block(text: &str) -> KeyResult<PemBlock> {
    let start = text
        .find(BEGIN_MARKER)
        .ok_or_else(|| KeyError::MalformedPem("No PEM BEGIN line found".to_string()))?;
    let rest = &text[start..];

    let end = rest
        .find(END_MARKER)
        .ok_or_else(|| KeyError::MalformedPem("No PEM END line found".to_string()))?;
    let after_end = end + END_MARKER.len();
    let close = rest[after_end..]
        .find(DASHES)
        .ok_or_else(|| KeyError::MalformedPem("Unterminated PEM END line".to_string()))?;
    let block = &rest[..after_end + close + DASHES.len()];

    let (label, der) = pem_rfc7468::decode_vec(block.as_bytes())
        .map_err(|e| KeyError::MalformedPem(format!("Invalid PEM block: {}", e)))?;

    Ok(PemBlock {
        label: label.to_string(),
        der,
    })
}

/// Encrypt a PKCS#8 document and return it as an `ENCRYPTED PRIVATE KEY` block
pub(crate) fn encrypt_private_key(
    pkcs8_der: &[u8],
    passphrase: &str,
    pbkdf2_iterations: u32,
) -> KeyResult<String> {
    if pbkdf2_iterations == 0 {
        return Err(KeyError::Encryption(
            "PBKDF2 iteration count must be positive".to_string(),
        ));
    }

    let info = PrivateKeyInfo::try_from(pkcs8_der)
        .map_err(|e| KeyError::Encoding(format!("Invalid PKCS#8 document: {}", e)))?;

    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; AES_IV_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    let params = pbes2::Parameters::pbkdf2_sha256_aes256cbc(pbkdf2_iterations, &salt, &iv)
        .map_err(|e| KeyError::Encryption(format!("Invalid PBES2 parameters: {}", e)))?;

    let encrypted = info
        .encrypt_with_params(params, passphrase.as_bytes())
        .map_err(|e| KeyError::Encryption(format!("Private key encryption failed: {}", e)))?;

    let pem = encrypted
        .to_pem(ENCRYPTED_PRIVATE_KEY_LABEL, LineEnding::LF)
        .map_err(|e| KeyError::Encoding(format!("PEM encoding failed: {}", e)))?;

    Ok(pem.to_string())
}

/// Decrypt an `ENCRYPTED PRIVATE KEY` payload back into a PKCS#8 document
pub(crate) fn decrypt_private_key(der: &[u8], passphrase: &str) -> KeyResult<SecretDocument> {
    let encrypted = EncryptedPrivateKeyInfo::try_from(der).map_err(|e| {
        KeyError::MalformedPem(format!("Invalid encrypted private key structure: {}", e))
    })?;

    if passphrase.is_empty() {
        return Err(KeyError::WrongPassphrase(
            "PEM is encrypted and the passphrase is empty".to_string(),
        ));
    }

    let document = encrypted
        .decrypt(passphrase.as_bytes())
        .map_err(|e| KeyError::WrongPassphrase(format!("Decryption failed: {}", e)))?;

    // CBC padding can come out valid by chance under a wrong passphrase
    if PrivateKeyInfo::try_from(document.as_bytes()).is_err() {
        return Err(KeyError::WrongPassphrase(
            "Decrypted data is not a private key".to_string(),
        ));
    }

    Ok(document)
}
