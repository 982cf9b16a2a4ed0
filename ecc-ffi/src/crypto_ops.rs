//! Signing, verification and encryption operations

use std::os::raw::c_int;

use ecc_keys::{KeyError, KeyFacade, KeyResult};

use crate::{
    types::EccBytes,
    utils::{bytes_result, private_handle, public_handle, record},
};

// ============================================================================
// Helpers
// ============================================================================

fn input<'a>(bytes: *const EccBytes, what: &str) -> KeyResult<&'a [u8]> {
    unsafe { EccBytes::as_slice(bytes) }
        .ok_or_else(|| KeyError::InvalidFormat(format!("invalid {} buffer", what)))
}

// ============================================================================
// Public Key Functions
// ============================================================================

/// Verify a DER signature over a precomputed hash; 1 when valid
#[no_mangle]
pub extern "C" fn ecc_pub_verify(
    pub_id: c_int,
    hash: *const EccBytes,
    signature: *const EccBytes,
) -> c_int {
    let result = input(hash, "hash").and_then(|hash| {
        let signature = input(signature, "signature")?;
        KeyFacade::global().verify(public_handle(pub_id), hash, signature)
    });
    c_int::from(record("ecc_pub_verify", result).unwrap_or(false))
}

/// Verify a DER signature over the SHA-256 digest of `message`; 1 when valid
#[no_mangle]
pub extern "C" fn ecc_pub_verifymessage(
    pub_id: c_int,
    message: *const EccBytes,
    signature: *const EccBytes,
) -> c_int {
    let result = input(message, "message").and_then(|message| {
        let signature = input(signature, "signature")?;
        KeyFacade::global().verify_message(public_handle(pub_id), message, signature)
    });
    c_int::from(record("ecc_pub_verifymessage", result).unwrap_or(false))
}

/// Encrypt `message` to the holder of the matching private key
#[no_mangle]
pub extern "C" fn ecc_pub_encrypt(pub_id: c_int, message: *const EccBytes) -> *mut EccBytes {
    let result = input(message, "message")
        .and_then(|message| KeyFacade::global().encrypt(public_handle(pub_id), message));
    bytes_result(record("ecc_pub_encrypt", result))
}

// ============================================================================
// Private Key Functions
// ============================================================================

/// Sign a precomputed hash; returns a DER signature
#[no_mangle]
pub extern "C" fn ecc_priv_sign(priv_id: c_int, hash: *const EccBytes) -> *mut EccBytes {
    let result =
        input(hash, "hash").and_then(|hash| KeyFacade::global().sign(private_handle(priv_id), hash));
    bytes_result(record("ecc_priv_sign", result))
}

/// Sign the SHA-256 digest of `message`; returns a DER signature
#[no_mangle]
pub extern "C" fn ecc_priv_signmessage(priv_id: c_int, message: *const EccBytes) -> *mut EccBytes {
    let result = input(message, "message")
        .and_then(|message| KeyFacade::global().sign_message(private_handle(priv_id), message));
    bytes_result(record("ecc_priv_signmessage", result))
}

/// Decrypt a message produced by `ecc_pub_encrypt`
#[no_mangle]
pub extern "C" fn ecc_priv_decrypt(priv_id: c_int, encrypted: *const EccBytes) -> *mut EccBytes {
    let result = input(encrypted, "ciphertext")
        .and_then(|encrypted| KeyFacade::global().decrypt(private_handle(priv_id), encrypted));
    bytes_result(record("ecc_priv_decrypt", result))
}

/// Sign `message` with `priv_id` and encrypt the result to `to_pub_id`
#[no_mangle]
pub extern "C" fn ecc_priv_seal(
    priv_id: c_int,
    to_pub_id: c_int,
    message: *const EccBytes,
) -> *mut EccBytes {
    let result = input(message, "message").and_then(|message| {
        KeyFacade::global().seal(private_handle(priv_id), public_handle(to_pub_id), message)
    });
    bytes_result(record("ecc_priv_seal", result))
}

/// Decrypt a sealed message with `priv_id` and check it was signed by `from_pub_id`
#[no_mangle]
pub extern "C" fn ecc_priv_open(
    priv_id: c_int,
    from_pub_id: c_int,
    sealed: *const EccBytes,
) -> *mut EccBytes {
    let result = input(sealed, "sealed").and_then(|sealed| {
        KeyFacade::global().open(private_handle(priv_id), public_handle(from_pub_id), sealed)
    });
    bytes_result(record("ecc_priv_open", result))
}
