//! Elliptic-curve public keys
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


use crate::curve::{dispatch_curve, EcCurve};
use crate::ecies;
use crate::error::{KeyError, KeyResult};
use crate::pem::{self, PUBLIC_KEY_LABEL};
use ecdsa::signature::hazmat::PrehashVerifier;
use elliptic_curve::sec1::ToEncodedPoint;
use pkcs8::{DecodePublicKey, EncodePublicKey, LineEnding};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// SEC1 tag of an uncompressed point
const UNCOMPRESSED_TAG: u8 = 0x04;

/// Public key on one of the supported curves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcPublicKey {
    P224(p224::PublicKey),
    P256(p256::PublicKey),
    P384(p384::PublicKey),
    P521(p521::PublicKey),
}

impl EcPublicKey {
    pub fn curve(&self) -> EcCurve {
        match self {
            Self::P224(_) => EcCurve::P224,
            Self::P256(_) => EcCurve::P256,
            Self::P384(_) => EcCurve::P384,
            Self::P521(_) => EcCurve::P521,
        }
    }

    /// Encode as a `PUBLIC KEY` (SubjectPublicKeyInfo) PEM block
    pub fn to_pem(&self) -> KeyResult<String> {
        dispatch_curve!(self, key => key.to_public_key_pem(LineEnding::LF))
            .map_err(|e| KeyError::Encoding(format!("Public key PEM encoding failed: {}", e)))
    }

    /// Decode the first `PUBLIC KEY` PEM block in `text`
    pub fn from_pem(text: &str) -> KeyResult<Self> {
        let block = pem::decode_block(text)?;
        if block.label != PUBLIC_KEY_LABEL {
            return Err(KeyError::MalformedPem(format!(
                "Expected {} block, found {}",
                PUBLIC_KEY_LABEL, block.label
            )));
        }

        Self::from_spki_der(&block.der).ok_or_else(|| {
            KeyError::MalformedPem(
                "Not a SubjectPublicKeyInfo for a supported curve".to_string(),
            )
        })
    }

    fn from_spki_der(der: &[u8]) -> Option<Self> {
        if let Ok(key) = p256::PublicKey::from_public_key_der(der) {
            return Some(Self::P256(key));
        }
        if let Ok(key) = p384::PublicKey::from_public_key_der(der) {
            return Some(Self::P384(key));
        }
        if let Ok(key) = p521::PublicKey::from_public_key_der(der) {
            return Some(Self::P521(key));
        }
        if let Ok(key) = p224::PublicKey::from_public_key_der(der) {
            return Some(Self::P224(key));
        }
        None
    }

    /// SEC1 uncompressed point: `0x04 || X || Y`
    pub fn to_uncompressed_bytes(&self) -> Vec<u8> {
        dispatch_curve!(self, key => key.to_encoded_point(false).as_bytes().to_vec())
    }

    /// Parse a SEC1 uncompressed point for `curve`
    pub fn from_uncompressed_bytes(curve: EcCurve, bytes: &[u8]) -> KeyResult<Self> {
        if bytes.len() != curve.uncompressed_point_len() || bytes[0] != UNCOMPRESSED_TAG {
            return Err(KeyError::InvalidFormat(format!(
                "Expected {}-byte uncompressed {} point, got {} bytes",
                curve.uncompressed_point_len(),
                curve,
                bytes.len()
            )));
        }

        let invalid_point =
            |e: elliptic_curve::Error| KeyError::InvalidFormat(format!("Invalid point: {}", e));

        let key = match curve {
            EcCurve::P224 => Self::P224(p224::PublicKey::from_sec1_bytes(bytes).map_err(invalid_point)?),
            EcCurve::P256 => Self::P256(p256::PublicKey::from_sec1_bytes(bytes).map_err(invalid_point)?),
            EcCurve::P384 => Self::P384(p384::PublicKey::from_sec1_bytes(bytes).map_err(invalid_point)?),
            EcCurve::P521 => Self::P521(p521::PublicKey::from_sec1_bytes(bytes).map_err(invalid_point)?),
        };
        Ok(key)
    }

    /// Check an ASN.1 DER ECDSA signature over a precomputed digest.
    ///
    /// Returns `Ok(false)` when the signature is well formed but does not
    /// match; malformed input is an error. Digests of any length are accepted.
    pub fn verify(&self, hash: &[u8], signature: &[u8]) -> KeyResult<bool> {
        if hash.is_empty() {
            return Err(KeyError::InvalidFormat("Hash is empty".to_string()));
        }
        let prehash = self.curve().widen_digest(hash);
        let invalid_der =
            |e: ecdsa::Error| KeyError::InvalidFormat(format!("Invalid DER signature: {}", e));

        dispatch_curve!(self, key, C => {
            let signature = ecdsa::Signature::<C>::from_der(signature).map_err(invalid_der)?;
            let verifying_key = ecdsa::VerifyingKey::<C>::from(key);
            Ok(verifying_key.verify_prehash(&prehash, &signature).is_ok())
        }, p521 key => {
            let signature = p521::ecdsa::Signature::from_der(signature).map_err(invalid_der)?;
            let verifying_key =
                p521::ecdsa::VerifyingKey::from_sec1_bytes(key.to_encoded_point(false).as_bytes())
                    .map_err(|e| KeyError::InvalidFormat(format!("Invalid public key: {}", e)))?;
            Ok(verifying_key.verify_prehash(&prehash, &signature).is_ok())
        })
    }

    /// Hash `message` with SHA-256 and verify the signature over the digest
    pub fn verify_message(&self, message: &[u8], signature: &[u8]) -> KeyResult<bool> {
        let hash = Sha256::digest(message);
        self.verify(&hash, signature)
    }

    /// ECIES-encrypt `message` to this key
    pub fn encrypt(&self, message: &[u8]) -> KeyResult<Vec<u8>> {
        dispatch_curve!(self, key, C => {
            let ephemeral = elliptic_curve::ecdh::EphemeralSecret::<C>::random(&mut OsRng);
            let ephemeral_point = ephemeral.public_key().to_encoded_point(false);
            let shared = ephemeral.diffie_hellman(key);
            ecies::seal_envelope(
                shared.raw_secret_bytes().as_slice(),
                ephemeral_point.as_bytes(),
                message,
            )
        })
    }
}
