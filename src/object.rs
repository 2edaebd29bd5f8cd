// Copyright 2025 The Klavis Authors
// See LICENSE.txt file for terms

//! Algorithm-agnostic key container used at the boundary with callers
//! that handle keys generically. A [GenericKey] carries an algorithm
//! discriminant and a PKCS#8 DER encoding; conversions to and from RSA
//! material are pure data reinterpretation and always produce independent
//! copies, ownership of the engine's material never moves through here.

use crate::authorization::Algorithm;
use crate::error::{Error, ErrorCode, Result};
use crate::native::rsa::RsaKeyMaterial;

/// An algorithm-tagged, provider-agnostic key encoding.
///
/// A freshly constructed container is empty and acquires a key through
/// [GenericKey::inject_rsa] (or [GenericKey::with_key] when the encoding
/// is already at hand).
#[derive(Clone, Debug, Default)]
pub struct GenericKey {
    algorithm: Option<Algorithm>,
    pkcs8_der: Vec<u8>,
}

impl GenericKey {
    /// Creates an empty container
    pub fn new() -> GenericKey {
        GenericKey {
            algorithm: None,
            pkcs8_der: Vec::new(),
        }
    }

    /// Creates a container around an existing PKCS#8 DER encoding
    pub fn with_key(algorithm: Algorithm, pkcs8_der: Vec<u8>) -> GenericKey {
        GenericKey {
            algorithm: Some(algorithm),
            pkcs8_der: pkcs8_der,
        }
    }

    /// Returns the algorithm of the held key, if any
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.algorithm
    }

    /// Returns the held PKCS#8 DER encoding
    pub fn pkcs8_der(&self) -> &[u8] {
        &self.pkcs8_der
    }

    /// Extracts RSA key material from the container.
    ///
    /// Fails when the container holds no RSA key or the encoding does not
    /// parse. The returned material is an independent copy; the container
    /// is left untouched.
    pub fn extract_rsa(&self) -> Result<RsaKeyMaterial> {
        match self.algorithm {
            Some(Algorithm::Rsa) => (),
            Some(a) => {
                return Err(Error::with_msg(
                    ErrorCode::UnknownError,
                    format!("container holds a {:?} key, not RSA", a),
                ))
            }
            None => {
                return Err(Error::with_msg(
                    ErrorCode::UnknownError,
                    "container holds no key".to_string(),
                ))
            }
        }
        RsaKeyMaterial::from_pkcs8_der(&self.pkcs8_der)
    }

    /// Injects RSA key material into the container, replacing whatever it
    /// held. The material is encoded, not moved; the caller keeps it.
    pub fn inject_rsa(&mut self, material: &RsaKeyMaterial) -> Result<()> {
        self.pkcs8_der = material.to_pkcs8_der()?;
        self.algorithm = Some(Algorithm::Rsa);
        Ok(())
    }
}
