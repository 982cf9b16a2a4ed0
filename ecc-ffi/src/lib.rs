//! C interface to the libecc key facade
//!
//! Every function works on the process-wide [`KeyFacade`](ecc_keys::KeyFacade).
//! Failures are reported as a zero id or a null pointer; the message of the
//! most recent failure on the calling thread is available through
//! [`ecc_last_error`].
//!
//! Returned `ecc_bytes`, `ecc_keypair` and string pointers are owned by the
//! caller and must be released with the matching `ecc_*_free` function.
//!
//! # Safety
//!
//! Pointer arguments must be null or point to a live value of the declared
//! type: a NUL-terminated string, an `ecc_bytes` whose `data` holds at least
//! `n` bytes, or a buffer previously returned by this library. Null is
//! checked on every entry point and reported as a failure.

#![allow(clippy::not_unsafe_ptr_arg_deref)] // C callers cannot honour `unsafe fn`; null is checked at each entry

pub mod types;
mod utils;
pub mod key_ops;
pub mod crypto_ops;
pub mod memory;

pub use types::*;

pub use key_ops::*;
pub use crypto_ops::*;
pub use memory::*;
