//! Supported NIST curves
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
use serde::{Deserialize, Serialize};
use std::fmt;

/// Curve selected by key strength in bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EcCurve {
    /// NIST P-224 (secp224r1)
    P224,
    /// NIST P-256 (secp256r1)
    P256,
    /// NIST P-384 (secp384r1)
    P384,
    /// NIST P-521 (secp521r1)
    P521,
}

impl EcCurve {
    pub const ALL: [EcCurve; 4] = [EcCurve::P224, EcCurve::P256, EcCurve::P384, EcCurve::P521];

    /// Resolve a curve from its strength in bits
    pub fn from_bits(bits: u32) -> KeyResult<Self> {
        match bits {
            224 => Ok(EcCurve::P224),
            256 => Ok(EcCurve::P256),
            384 => Ok(EcCurve::P384),
            521 => Ok(EcCurve::P521),
            other => Err(KeyError::UnsupportedCurve(other)),
        }
    }

    pub fn bits(&self) -> u32 {
        match self {
            EcCurve::P224 => 224,
            EcCurve::P256 => 256,
            EcCurve::P384 => 384,
            EcCurve::P521 => 521,
        }
    }

    /// Size in bytes of one field element
    pub fn field_size(&self) -> usize {
        match self {
            EcCurve::P224 => 28,
            EcCurve::P256 => 32,
            EcCurve::P384 => 48,
            EcCurve::P521 => 66,
        }
    }

    /// Length of the SEC1 uncompressed point encoding
    pub fn uncompressed_point_len(&self) -> usize {
        1 + 2 * self.field_size()
    }

    /// High bits of the leading field byte that are always zero
    pub(crate) fn excess_bits(&self) -> usize {
        self.field_size() * 8 - self.bits() as usize
    }

    /// Left-pad a digest with zeros to the field size.
    ///
    /// The digest is read as a big-endian integer, so padding keeps its value
    /// while satisfying the minimum prehash length of the ECDSA primitives.
    /// Longer digests are returned unchanged and truncated at signing time.
    pub(crate) fn widen_digest(&self, hash: &[u8]) -> Vec<u8> {
        let size = self.field_size();
        if hash.len() >= size {
            return hash.to_vec();
        }
        let mut widened = vec![0u8; size - hash.len()];
        widened.extend_from_slice(hash);
        widened
    }

    pub fn name(&self) -> &'static str {
        match self {
            EcCurve::P224 => "P-224",
            EcCurve::P256 => "P-256",
            EcCurve::P384 => "P-384",
            EcCurve::P521 => "P-521",
        }
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Match on a per-curve key enum, binding the inner key and optionally an
/// alias for the concrete curve type, and evaluate the same body for every arm.
///
/// ECDSA on P-521 goes through the `p521::ecdsa` wrappers rather than the
/// generic `ecdsa` types, so the signing form takes a separate P-521 body.
macro_rules! dispatch_curve {
    ($value:expr, $key:ident, $curve:ident => $body:expr, p521 $p521_key:ident => $p521_body:expr) => {
        match $value {
            Self::P224($key) => {
                type $curve = p224::NistP224;
                $body
            }
            Self::P256($key) => {
                type $curve = p256::NistP256;
                $body
            }
            Self::P384($key) => {
                type $curve = p384::NistP384;
                $body
            }
            Self::P521($p521_key) => $p521_body,
        }
    };
    ($value:expr, $key:ident, $curve:ident => $body:expr) => {
        match $value {
            Self::P224($key) => {
                type $curve = p224::NistP224;
                $body
            }
            Self::P256($key) => {
                type $curve = p256::NistP256;
                $body
            }
            Self::P384($key) => {
                type $curve = p384::NistP384;
                $body
            }
            Self::P521($key) => {
                type $curve = p521::NistP521;
                $body
            }
        }
    };
    ($value:expr, $key:ident => $body:expr) => {
        match $value {
            Self::P224($key) => $body,
            Self::P256($key) => $body,
            Self::P384($key) => $body,
            Self::P521($key) => $body,
        }
    };
}

pub(crate) use dispatch_curve;
