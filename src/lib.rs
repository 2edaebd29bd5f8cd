// Copyright 2025 The Klavis Authors
// See LICENSE.txt file for terms

#![warn(missing_docs)]

//! This is Klavis
//!
//! An authorization-driven RSA key lifecycle and operation dispatch
//! engine for key-management services. The engine generates or imports
//! key material, reconciles caller-declared parameters against the actual
//! key, and gates the creation of purpose-bound operations behind a mode
//! compatibility policy. Key material is an exclusively owned, move-only
//! resource: dispatching an operation consumes the key entity, so a
//! second dispatch of the same entity cannot be written at all.

mod authorization;
mod error;
mod native;
mod object;
mod rsa;

/// Tracing support
pub mod log;

pub use crate::authorization::{
    Algorithm, Authorization, AuthorizationSet, Digest, Padding, Purpose, Tag,
    TagType, Value,
};
pub use crate::error::{Error, ErrorCode, ErrorKind, Result};
pub use crate::native::rsa::{RsaKeyMaterial, EXPONENT_WORD_INVALID};
pub use crate::object::GenericKey;
pub use crate::rsa::{
    mechanism_info, MechanismInfo, PurposeFlags, RsaDecryptOperation,
    RsaEncryptOperation, RsaKey, RsaOperation, RsaSignOperation,
    RsaVerifyOperation, MAX_RSA_SIZE_BITS, MIN_RSA_SIZE_BITS,
    RSA_DEFAULT_EXPONENT, RSA_DEFAULT_KEY_SIZE,
};

#[cfg(test)]
mod tests;
