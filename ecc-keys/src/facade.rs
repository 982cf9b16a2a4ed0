//! Handle-based key facade
//!
//! Callers never see key material: generation and decoding insert keys into
//! the facade's handle tables and return integer handles, and every other
//! operation resolves a handle before doing any work.
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
use crate::error::{KeyError, KeyResult};
use crate::handle_table::HandleTable;
use crate::key_types::{KeyMetadata, KeyOrigin, KeyPairHandles, PrivateKeyHandle, PublicKeyHandle};
use crate::private_key::EcPrivateKey;
use crate::public_key::EcPublicKey;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Default PBKDF2 work factor for passphrase-protected private keys
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

static GLOBAL: OnceLock<KeyFacade> = OnceLock::new();

/// Tunables for a [`KeyFacade`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacadeOptions {
    /// PBKDF2 iterations used when encrypting private keys
    pub pbkdf2_iterations: u32,
}

impl Default for FacadeOptions {
    fn default() -> Self {
        Self {
            pbkdf2_iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }
}

/// Key facade over public and private handle tables
pub struct KeyFacade {
    public_keys: RwLock<HandleTable<EcPublicKey>>,
    private_keys: RwLock<HandleTable<EcPrivateKey>>,
    options: FacadeOptions,
}

impl KeyFacade {
    /// Create an empty facade
    pub fn new(options: FacadeOptions) -> Self {
        Self {
            public_keys: RwLock::new(HandleTable::new()),
            private_keys: RwLock::new(HandleTable::new()),
            options,
        }
    }

    /// Process-wide facade with default options
    pub fn global() -> &'static KeyFacade {
        GLOBAL.get_or_init(KeyFacade::default)
    }

    pub fn options(&self) -> &FacadeOptions {
        &self.options
    }

    // Tables hold no cross-entry invariants, so a poisoned lock is still usable.
    fn public_table(&self) -> RwLockReadGuard<'_, HandleTable<EcPublicKey>> {
        self.public_keys.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn public_table_mut(&self) -> RwLockWriteGuard<'_, HandleTable<EcPublicKey>> {
        self.public_keys.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn private_table(&self) -> RwLockReadGuard<'_, HandleTable<EcPrivateKey>> {
        self.private_keys.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn private_table_mut(&self) -> RwLockWriteGuard<'_, HandleTable<EcPrivateKey>> {
        self.private_keys.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn public_key(&self, handle: PublicKeyHandle) -> KeyResult<Arc<EcPublicKey>> {
        self.public_table()
            .get(handle.id())
            .ok_or_else(|| KeyError::UnknownHandle(handle.to_string()))
    }

    fn private_key(&self, handle: PrivateKeyHandle) -> KeyResult<Arc<EcPrivateKey>> {
        self.private_table()
            .get(handle.id())
            .ok_or_else(|| KeyError::UnknownHandle(handle.to_string()))
    }

    fn insert_public(&self, key: EcPublicKey, origin: KeyOrigin) -> KeyResult<PublicKeyHandle> {
        let curve = key.curve();
        let id = self.public_table_mut().insert(key, curve, origin)?;
        Ok(PublicKeyHandle::from_raw(id))
    }

    fn insert_private(&self, key: EcPrivateKey, origin: KeyOrigin) -> KeyResult<PrivateKeyHandle> {
        let curve = key.curve();
        let id = self.private_table_mut().insert(key, curve, origin)?;
        Ok(PrivateKeyHandle::from_raw(id))
    }

    // ---------------------------------------------------------------------
    // Generation
    // ---------------------------------------------------------------------

    /// Generate a key pair of the given strength (224, 256, 384 or 521 bits)
    pub fn generate_keypair(&self, bit_strength: u32) -> KeyResult<KeyPairHandles> {
        let curve = EcCurve::from_bits(bit_strength).map_err(|e| {
            warn!(bit_strength, "Rejected key generation request");
            KeyError::Generation(e.to_string())
        })?;

        let private = EcPrivateKey::generate(curve).map_err(|e| {
            warn!(curve = %curve, error = %e, "Key generation failed");
            e
        })?;
        let public = private.public_key();

        let public = self.insert_public(public, KeyOrigin::Generated)?;
        let private = self.insert_private(private, KeyOrigin::Generated)?;

        info!(
            curve = %curve,
            public_id = public.id(),
            private_id = private.id(),
            "Generated key pair"
        );
        Ok(KeyPairHandles { public, private })
    }

    /// Store the public half of a private key under a new public handle
    pub fn derive_public(&self, handle: PrivateKeyHandle) -> KeyResult<PublicKeyHandle> {
        let private = self.private_key(handle)?;
        let public = self.insert_public(private.public_key(), KeyOrigin::Derived)?;
        debug!(private_id = handle.id(), public_id = public.id(), "Derived public key");
        Ok(public)
    }

    // ---------------------------------------------------------------------
    // PEM
    // ---------------------------------------------------------------------

    pub fn encode_public_pem(&self, handle: PublicKeyHandle) -> KeyResult<String> {
        let key = self.public_key(handle)?;
        debug!(public_id = handle.id(), "Encoding public key PEM");
        key.to_pem()
    }

    /// Encode a private key; an empty passphrase leaves the PEM unencrypted
    pub fn encode_private_pem(&self, handle: PrivateKeyHandle, passphrase: &str) -> KeyResult<String> {
        let key = self.private_key(handle)?;
        debug!(
            private_id = handle.id(),
            encrypted = !passphrase.is_empty(),
            "Encoding private key PEM"
        );
        key.to_pem(passphrase, self.options.pbkdf2_iterations)
    }

    pub fn decode_public_pem(&self, text: &str) -> KeyResult<PublicKeyHandle> {
        let key = EcPublicKey::from_pem(text).map_err(|e| {
            warn!(error = %e, "Rejected public key PEM");
            e
        })?;
        let handle = self.insert_public(key, KeyOrigin::PemDecoded)?;
        info!(public_id = handle.id(), "Decoded public key PEM");
        Ok(handle)
    }

    pub fn decode_private_pem(&self, text: &str, passphrase: &str) -> KeyResult<PrivateKeyHandle> {
        let key = EcPrivateKey::from_pem(text, passphrase).map_err(|e| {
            warn!(error = %e, "Rejected private key PEM");
            e
        })?;
        let handle = self.insert_private(key, KeyOrigin::PemDecoded)?;
        info!(private_id = handle.id(), "Decoded private key PEM");
        Ok(handle)
    }

    // ---------------------------------------------------------------------
    // Marshaling
    // ---------------------------------------------------------------------

    /// Uncompressed SEC1 point; identical output for every call on a handle
    pub fn marshal_public(&self, handle: PublicKeyHandle) -> KeyResult<Vec<u8>> {
        let key = self.public_key(handle)?;
        Ok(key.to_uncompressed_bytes())
    }

    /// SEC1 DER private key
    pub fn marshal_private(&self, handle: PrivateKeyHandle) -> KeyResult<Vec<u8>> {
        self.private_key(handle)?.to_sec1_der()
    }

    pub fn unmarshal_public(&self, bit_strength: u32, bytes: &[u8]) -> KeyResult<PublicKeyHandle> {
        let curve = EcCurve::from_bits(bit_strength)?;
        let key = EcPublicKey::from_uncompressed_bytes(curve, bytes)?;
        let handle = self.insert_public(key, KeyOrigin::Unmarshaled)?;
        info!(curve = %curve, public_id = handle.id(), "Unmarshaled public key");
        Ok(handle)
    }

    pub fn unmarshal_private(&self, bytes: &[u8]) -> KeyResult<PrivateKeyHandle> {
        let key = EcPrivateKey::from_sec1_der(bytes)?;
        let handle = self.insert_private(key, KeyOrigin::Unmarshaled)?;
        info!(private_id = handle.id(), "Unmarshaled private key");
        Ok(handle)
    }

    // ---------------------------------------------------------------------
    // Signatures
    // ---------------------------------------------------------------------

    pub fn sign(&self, handle: PrivateKeyHandle, hash: &[u8]) -> KeyResult<Vec<u8>> {
        self.private_key(handle)?.sign(hash)
    }

    pub fn sign_message(&self, handle: PrivateKeyHandle, message: &[u8]) -> KeyResult<Vec<u8>> {
        self.private_key(handle)?.sign_message(message)
    }

    pub fn verify(&self, handle: PublicKeyHandle, hash: &[u8], signature: &[u8]) -> KeyResult<bool> {
        self.public_key(handle)?.verify(hash, signature)
    }

    pub fn verify_message(
        &self,
        handle: PublicKeyHandle,
        message: &[u8],
        signature: &[u8],
    ) -> KeyResult<bool> {
        self.public_key(handle)?.verify_message(message, signature)
    }

    // ---------------------------------------------------------------------
    // Encryption
    // ---------------------------------------------------------------------

    pub fn encrypt(&self, handle: PublicKeyHandle, message: &[u8]) -> KeyResult<Vec<u8>> {
        self.public_key(handle)?.encrypt(message)
    }

    pub fn decrypt(&self, handle: PrivateKeyHandle, encrypted: &[u8]) -> KeyResult<Vec<u8>> {
        self.private_key(handle)?.decrypt(encrypted)
    }

    /// Sign with `handle`, then encrypt to `to`
    pub fn seal(
        &self,
        handle: PrivateKeyHandle,
        to: PublicKeyHandle,
        message: &[u8],
    ) -> KeyResult<Vec<u8>> {
        let private = self.private_key(handle)?;
        let recipient = self.public_key(to)?;
        private.seal(message, &recipient)
    }

    /// Decrypt with `handle`, then verify the signature of `from`
    pub fn open(
        &self,
        handle: PrivateKeyHandle,
        from: PublicKeyHandle,
        sealed: &[u8],
    ) -> KeyResult<Vec<u8>> {
        let private = self.private_key(handle)?;
        let sender = self.public_key(from)?;
        private.open(sealed, &sender)
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Drop a public key. The id is not issued again.
    pub fn release_public(&self, handle: PublicKeyHandle) -> KeyResult<()> {
        self.public_table_mut()
            .remove(handle.id())
            .ok_or_else(|| KeyError::UnknownHandle(handle.to_string()))?;
        info!(public_id = handle.id(), "Released public key");
        Ok(())
    }

    /// Drop a private key. The id is not issued again.
    pub fn release_private(&self, handle: PrivateKeyHandle) -> KeyResult<()> {
        self.private_table_mut()
            .remove(handle.id())
            .ok_or_else(|| KeyError::UnknownHandle(handle.to_string()))?;
        info!(private_id = handle.id(), "Released private key");
        Ok(())
    }

    pub fn public_metadata(&self, handle: PublicKeyHandle) -> KeyResult<KeyMetadata> {
        self.public_table()
            .metadata(handle.id())
            .ok_or_else(|| KeyError::UnknownHandle(handle.to_string()))
    }

    pub fn private_metadata(&self, handle: PrivateKeyHandle) -> KeyResult<KeyMetadata> {
        self.private_table()
            .metadata(handle.id())
            .ok_or_else(|| KeyError::UnknownHandle(handle.to_string()))
    }

    /// Live public handles in ascending order
    pub fn list_public_keys(&self) -> Vec<PublicKeyHandle> {
        self.public_table()
            .ids()
            .into_iter()
            .map(PublicKeyHandle::from_raw)
            .collect()
    }

    /// Live private handles in ascending order
    pub fn list_private_keys(&self) -> Vec<PrivateKeyHandle> {
        self.private_table()
            .ids()
            .into_iter()
            .map(PrivateKeyHandle::from_raw)
            .collect()
    }
}

impl Default for KeyFacade {
    fn default() -> Self {
        Self::new(FacadeOptions::default())
    }
}
