//! Handle and metadata type definitions
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


use crate::curve::EcCurve;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to a public key held by a [`KeyFacade`](crate::KeyFacade)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKeyHandle(u32);

/// Opaque reference to a private key held by a [`KeyFacade`](crate::KeyFacade)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrivateKeyHandle(u32);

impl PublicKeyHandle {
    /// Wrap a raw id, e.g. one received over the C interface.
    /// The id is only checked when the handle is used.
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

impl PrivateKeyHandle {
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PublicKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "public key {}", self.0)
    }
}

impl fmt::Display for PrivateKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "private key {}", self.0)
    }
}

/// Handles of a freshly generated key pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPairHandles {
    pub public: PublicKeyHandle,
    pub private: PrivateKeyHandle,
}

/// How a key entered the handle table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyOrigin {
    /// Created by key generation
    Generated,
    /// Parsed from PEM text
    PemDecoded,
    /// Parsed from a marshaled byte buffer
    Unmarshaled,
    /// Public half taken from a stored private key
    Derived,
}

/// Key metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyMetadata {
    /// Raw handle id
    pub id: u32,
    pub curve: EcCurve,
    pub origin: KeyOrigin,
    /// When the handle was issued (UTC seconds)
    pub created_at: i64,
}

impl KeyMetadata {
    pub fn new(id: u32, curve: EcCurve, origin: KeyOrigin) -> Self {
        Self {
            id,
            curve,
            origin,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}
