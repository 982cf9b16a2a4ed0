//! FFI helper functions

use std::{
    cell::RefCell,
    ffi::{CStr, CString},
    os::raw::{c_char, c_int},
    ptr,
};

use ecc_keys::{KeyError, KeyResult, PrivateKeyHandle, PublicKeyHandle};
use tracing::warn;

use crate::types::EccBytes;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

pub(crate) fn set_last_error(message: String) {
    // Interior NULs would truncate the C string anyway
    let message = CString::new(message.replace('\0', " ")).ok();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = message);
}

pub(crate) fn last_error() -> Option<CString> {
    LAST_ERROR.with(|slot| slot.borrow().clone())
}

pub(crate) fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Record the outcome of a facade call, logging and keeping the message on failure
pub(crate) fn record<T>(operation: &str, result: KeyResult<T>) -> Option<T> {
    match result {
        Ok(value) => {
            clear_last_error();
            Some(value)
        }
        Err(e) => {
            warn!(operation, error = %e, "libecc call failed");
            set_last_error(format!("{}: {}", operation, e));
            None
        }
    }
}

pub(crate) fn public_handle(id: c_int) -> PublicKeyHandle {
    PublicKeyHandle::from_raw(u32::try_from(id).unwrap_or(0))
}

pub(crate) fn private_handle(id: c_int) -> PrivateKeyHandle {
    PrivateKeyHandle::from_raw(u32::try_from(id).unwrap_or(0))
}

/// Handle ids never exceed `i32::MAX`, so this only fails on a broken table
pub(crate) fn c_id(id: u32) -> KeyResult<c_int> {
    c_int::try_from(id).map_err(|_| KeyError::Capacity)
}

/// Read a caller string; null reads as `None`
///
/// # Safety
///
/// `s` must be null or a valid NUL-terminated string.
pub(crate) unsafe fn read_str<'a>(s: *const c_char) -> KeyResult<Option<&'a str>> {
    if s.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(s)
        .to_str()
        .map(Some)
        .map_err(|_| KeyError::InvalidFormat("string is not valid UTF-8".to_string()))
}

/// Hand a Rust string to the caller
pub(crate) fn into_c_string(s: String) -> KeyResult<*mut c_char> {
    CString::new(s)
        .map(CString::into_raw)
        .map_err(|_| KeyError::Encoding("string contains a NUL byte".to_string()))
}

pub(crate) fn bytes_result(result: Option<Vec<u8>>) -> *mut EccBytes {
    match result {
        Some(data) => EccBytes::boxed(data),
        None => ptr::null_mut(),
    }
}
