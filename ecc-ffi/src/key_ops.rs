//! Key generation, PEM, marshaling and handle lifetime operations

use std::{
    os::raw::{c_char, c_int},
    ptr,
};

use ecc_keys::{KeyError, KeyFacade, KeyResult, PrivateKeyHandle};

use crate::{
    types::{EccBytes, EccKeypair},
    utils::{bytes_result, c_id, into_c_string, private_handle, public_handle, read_str, record},
};

// ============================================================================
// Helpers
// ============================================================================

fn keypair_result(result: Option<(c_int, c_int)>) -> *mut EccKeypair {
    match result {
        Some((pub_id, priv_id)) => EccKeypair::boxed(pub_id, priv_id),
        None => ptr::null_mut(),
    }
}

fn string_result(result: Option<*mut c_char>) -> *mut c_char {
    result.unwrap_or(ptr::null_mut())
}

/// Register the public half of a freshly stored private key.
/// The private handle is released again if that fails.
fn with_public_half(facade: &KeyFacade, private: PrivateKeyHandle) -> KeyResult<(c_int, c_int)> {
    let ids = facade
        .derive_public(private)
        .and_then(|public| Ok((c_id(public.id())?, c_id(private.id())?)));
    if ids.is_err() {
        let _ = facade.release_private(private);
    }
    ids
}

/// Negative sizes become 0, which no curve accepts
fn bit_strength(size: c_int) -> u32 {
    u32::try_from(size).unwrap_or(0)
}

// ============================================================================
// Key Generation
// ============================================================================

/// Generate a key pair; `size` is 224, 256, 384 or 521
#[no_mangle]
pub extern "C" fn ecc_generate_keys(size: c_int) -> *mut EccKeypair {
    let facade = KeyFacade::global();
    let result = facade
        .generate_keypair(bit_strength(size))
        .and_then(|keys| Ok((c_id(keys.public.id())?, c_id(keys.private.id())?)));
    keypair_result(record("ecc_generate_keys", result))
}

// ============================================================================
// PEM
// ============================================================================

/// Encode a public key as a `PUBLIC KEY` PEM string
#[no_mangle]
pub extern "C" fn ecc_pub_pem(pub_id: c_int) -> *mut c_char {
    let result = KeyFacade::global()
        .encode_public_pem(public_handle(pub_id))
        .and_then(into_c_string);
    string_result(record("ecc_pub_pem", result))
}

/// Encode a private key as PEM; a null or empty password leaves it unencrypted
#[no_mangle]
pub extern "C" fn ecc_priv_pem(priv_id: c_int, password: *const c_char) -> *mut c_char {
    let result = unsafe { read_str(password) }.and_then(|password| {
        KeyFacade::global()
            .encode_private_pem(private_handle(priv_id), password.unwrap_or(""))
            .and_then(into_c_string)
    });
    string_result(record("ecc_priv_pem", result))
}

/// Decode a public key PEM into a new public handle
#[no_mangle]
pub extern "C" fn ecc_pub_decode_pem(pem: *const c_char) -> c_int {
    let result = unsafe { read_str(pem) }.and_then(|pem| {
        let pem = pem.ok_or_else(|| KeyError::MalformedPem("PEM pointer is null".to_string()))?;
        let handle = KeyFacade::global().decode_public_pem(pem)?;
        c_id(handle.id())
    });
    record("ecc_pub_decode_pem", result).unwrap_or(0)
}

/// Decode a private key PEM into a new private handle plus its public half
#[no_mangle]
pub extern "C" fn ecc_priv_decode_pem(
    pem: *const c_char,
    password: *const c_char,
) -> *mut EccKeypair {
    let result = unsafe { read_str(pem).and_then(|pem| Ok((pem, read_str(password)?))) }
        .and_then(|(pem, password)| {
            let pem =
                pem.ok_or_else(|| KeyError::MalformedPem("PEM pointer is null".to_string()))?;
            let facade = KeyFacade::global();
            let private = facade.decode_private_pem(pem, password.unwrap_or(""))?;
            with_public_half(facade, private)
        });
    keypair_result(record("ecc_priv_decode_pem", result))
}

// ============================================================================
// Marshaling
// ============================================================================

/// Uncompressed point encoding of a public key
#[no_mangle]
pub extern "C" fn ecc_pub_marshal(pub_id: c_int) -> *mut EccBytes {
    let result = KeyFacade::global().marshal_public(public_handle(pub_id));
    bytes_result(record("ecc_pub_marshal", result))
}

/// SEC1 DER encoding of a private key
#[no_mangle]
pub extern "C" fn ecc_priv_marshal(priv_id: c_int) -> *mut EccBytes {
    let result = KeyFacade::global().marshal_private(private_handle(priv_id));
    bytes_result(record("ecc_priv_marshal", result))
}

/// Parse an uncompressed point on the `size`-bit curve into a new public handle
#[no_mangle]
pub extern "C" fn ecc_pub_unmarshal(size: c_int, marshalled: *const EccBytes) -> c_int {
    let result = unsafe { EccBytes::as_slice(marshalled) }
        .ok_or_else(|| KeyError::InvalidFormat("invalid byte buffer".to_string()))
        .and_then(|bytes| {
            let handle = KeyFacade::global().unmarshal_public(bit_strength(size), bytes)?;
            c_id(handle.id())
        });
    record("ecc_pub_unmarshal", result).unwrap_or(0)
}

/// Parse a SEC1 DER private key into a new private handle plus its public half
#[no_mangle]
pub extern "C" fn ecc_priv_unmarshal(marshalled: *const EccBytes) -> *mut EccKeypair {
    let result = unsafe { EccBytes::as_slice(marshalled) }
        .ok_or_else(|| KeyError::InvalidFormat("invalid byte buffer".to_string()))
        .and_then(|bytes| {
            let facade = KeyFacade::global();
            let private = facade.unmarshal_private(bytes)?;
            with_public_half(facade, private)
        });
    keypair_result(record("ecc_priv_unmarshal", result))
}

// ============================================================================
// Handle Lifetime
// ============================================================================

/// Drop a public handle; returns 1 on success
#[no_mangle]
pub extern "C" fn ecc_pub_release(pub_id: c_int) -> c_int {
    let result = KeyFacade::global().release_public(public_handle(pub_id));
    c_int::from(record("ecc_pub_release", result).is_some())
}

/// Drop a private handle; returns 1 on success
#[no_mangle]
pub extern "C" fn ecc_priv_release(priv_id: c_int) -> c_int {
    let result = KeyFacade::global().release_private(private_handle(priv_id));
    c_int::from(record("ecc_priv_release", result).is_some())
}

// ============================================================================
// Metadata
// ============================================================================

/// Metadata of a public handle as a JSON object string
#[no_mangle]
pub extern "C" fn ecc_pub_info(pub_id: c_int) -> *mut c_char {
    let result = KeyFacade::global()
        .public_metadata(public_handle(pub_id))
        .and_then(|metadata| {
            serde_json::to_string(&metadata).map_err(|e| KeyError::Encoding(e.to_string()))
        })
        .and_then(into_c_string);
    string_result(record("ecc_pub_info", result))
}

/// Metadata of a private handle as a JSON object string
#[no_mangle]
pub extern "C" fn ecc_priv_info(priv_id: c_int) -> *mut c_char {
    let result = KeyFacade::global()
        .private_metadata(private_handle(priv_id))
        .and_then(|metadata| {
            serde_json::to_string(&metadata).map_err(|e| KeyError::Encoding(e.to_string()))
        })
        .and_then(into_c_string);
    string_result(record("ecc_priv_info", result))
}
