//! Error types for key management
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


use thiserror::Error;

/// Key management errors
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Unknown handle: {0}")]
    UnknownHandle(String),

    #[error("Malformed PEM: {0}")]
    MalformedPem(String),

    #[error("Wrong passphrase: {0}")]
    WrongPassphrase(String),

    #[error("Key generation error: {0}")]
    Generation(String),

    #[error("Unsupported curve size: {0} bits")]
    UnsupportedCurve(u32),

    #[error("Invalid key format: {0}")]
    InvalidFormat(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Signature error: {0}")]
    Signature(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Decryption error: {0}")]
    Decryption(String),

    #[error("Handle table is full")]
    Capacity,
}

/// Result type for key operations
pub type KeyResult<T> = Result<T, KeyError>;
