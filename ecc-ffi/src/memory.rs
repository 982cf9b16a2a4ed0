//! Memory management and diagnostics

use std::{
    ffi::CString,
    os::raw::c_char,
    ptr,
};

use crate::{
    types::{EccBytes, EccKeypair},
    utils::last_error,
};

// ============================================================================
// Memory Management
// ============================================================================

/// Free a byte buffer returned by the library
#[no_mangle]
pub extern "C" fn ecc_bytes_free(bytes: *mut EccBytes) {
    if bytes.is_null() {
        return;
    }

    unsafe {
        let bytes = Box::from_raw(bytes);
        if !bytes.data.is_null() && bytes.n > 0 {
            let data = ptr::slice_from_raw_parts_mut(bytes.data, bytes.n as usize);
            drop(Box::from_raw(data));
        }
    }
}

/// Free a key pair returned by the library
#[no_mangle]
pub extern "C" fn ecc_keypair_free(keypair: *mut EccKeypair) {
    if !keypair.is_null() {
        unsafe {
            drop(Box::from_raw(keypair));
        }
    }
}

/// Free a string returned by the library
#[no_mangle]
pub extern "C" fn ecc_string_free(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            let _ = CString::from_raw(s);
        }
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Message of the last failed call on this thread, or null.
/// Free with `ecc_string_free`.
#[no_mangle]
pub extern "C" fn ecc_last_error() -> *mut c_char {
    match last_error() {
        Some(message) => message.into_raw(),
        None => ptr::null_mut(),
    }
}

/// Library version string; free with `ecc_string_free`
#[no_mangle]
pub extern "C" fn ecc_version() -> *mut c_char {
    match CString::new(env!("CARGO_PKG_VERSION")) {
        Ok(version) => version.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

