//! Elliptic-curve key facade
//!
//! Generates NIST P-224/P-256/P-384 key pairs, encodes and decodes them as
//! PEM (private keys optionally passphrase protected), marshals them to raw
//! bytes, and signs, verifies, encrypts and seals with them. Keys live in a
//! handle table owned by [`KeyFacade`]; callers work with integer handles.
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


pub mod curve;
mod ecies;
pub mod error;
pub mod facade;
mod handle_table;
pub mod key_types;
pub mod pem;
pub mod private_key;
pub mod public_key;

pub use curve::EcCurve;
pub use error::{KeyError, KeyResult};
pub use facade::{FacadeOptions, KeyFacade, DEFAULT_PBKDF2_ITERATIONS};
pub use key_types::{KeyMetadata, KeyOrigin, KeyPairHandles, PrivateKeyHandle, PublicKeyHandle};
pub use private_key::EcPrivateKey;
pub use public_key::EcPublicKey;
