//! FFI types

use std::{
    os::raw::{c_int, c_uchar},
    ptr, slice,
};

/// Byte buffer passed across the C boundary (`ecc_bytes`)
#[repr(C)]
#[derive(Debug)]
pub struct EccBytes {
    pub n: c_int,
    pub data: *mut c_uchar,
}

impl EccBytes {
    /// Move `data` into a heap buffer owned by the caller.
    /// Empty buffers carry a null `data` pointer.
    pub fn boxed(data: Vec<u8>) -> *mut EccBytes {
        let n = match c_int::try_from(data.len()) {
            Ok(n) => n,
            Err(_) => return ptr::null_mut(),
        };
        let data_ptr = if data.is_empty() {
            ptr::null_mut()
        } else {
            Box::into_raw(data.into_boxed_slice()) as *mut c_uchar
        };
        Box::into_raw(Box::new(Self { n, data: data_ptr }))
    }

    /// Borrow the contents of a caller-supplied buffer.
    ///
    /// # Safety
    ///
    /// `bytes` must be null or point to a valid `EccBytes` whose `data`
    /// holds at least `n` readable bytes for the lifetime `'a`.
    pub unsafe fn as_slice<'a>(bytes: *const EccBytes) -> Option<&'a [u8]> {
        let bytes = bytes.as_ref()?;
        let len = usize::try_from(bytes.n).ok()?;
        if len == 0 {
            return Some(&[]);
        }
        if bytes.data.is_null() {
            return None;
        }
        Some(slice::from_raw_parts(bytes.data, len))
    }
}

/// Public and private handle ids (`ecc_keypair { int pubID; int privID; }`)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EccKeypair {
    pub pub_id: c_int,
    pub priv_id: c_int,
}

impl EccKeypair {
    pub fn boxed(pub_id: c_int, priv_id: c_int) -> *mut EccKeypair {
        Box::into_raw(Box::new(Self { pub_id, priv_id }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_null_data() {
        let bytes = EccBytes::boxed(Vec::new());
        unsafe {
            assert_eq!((*bytes).n, 0);
            assert!((*bytes).data.is_null());
            assert_eq!(EccBytes::as_slice(bytes), Some(&[][..]));
            drop(Box::from_raw(bytes));
        }
    }

    #[test]
    fn test_as_slice_rejects_bad_buffers() {
        let negative = EccBytes {
            n: -1,
            data: ptr::null_mut(),
        };
        let dangling = EccBytes {
            n: 4,
            data: ptr::null_mut(),
        };
        unsafe {
            assert!(EccBytes::as_slice(ptr::null()).is_none());
            assert!(EccBytes::as_slice(&negative).is_none());
            assert!(EccBytes::as_slice(&dangling).is_none());
        }
    }
}
