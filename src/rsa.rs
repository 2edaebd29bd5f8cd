// Copyright 2025 The Klavis Authors
// See LICENSE.txt file for terms

//! RSA key entity lifecycle: generation with policy defaults, import with
//! declared-versus-actual reconciliation, and dispatch of purpose-bound
//! operations through the mode compatibility matrix. Dispatch consumes the
//! entity and moves its key material into exactly one operation.

use std::cmp::Ordering;

use bitflags::bitflags;
use log::debug;

use crate::authorization::{
    Algorithm, Authorization, AuthorizationSet, Digest, Padding, Purpose, Tag,
};
use crate::error::{Error, ErrorCode, Result};
use crate::native::rsa::{RsaKeyMaterial, EXPONENT_WORD_INVALID};
use crate::object::GenericKey;
use crate::{err_code, to_code};

/// Key size used when a description does not declare one
pub const RSA_DEFAULT_KEY_SIZE: u32 = 2048;
/// Public exponent used when a description does not declare one
pub const RSA_DEFAULT_EXPONENT: u64 = 65537;
/// Smallest modulus the engine advertises
pub const MIN_RSA_SIZE_BITS: u32 = 1024;
/// Largest modulus the engine advertises
pub const MAX_RSA_SIZE_BITS: u32 = 4096;

bitflags! {
    /// Purposes an algorithm descriptor advertises
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct PurposeFlags: u32 {
        /// Public key encryption
        const ENCRYPT = 0x01;
        /// Private key decryption
        const DECRYPT = 0x02;
        /// Signature generation
        const SIGN = 0x04;
        /// Signature verification
        const VERIFY = 0x08;
    }
}

/// Capability descriptor for the RSA engine
#[derive(Clone, Copy, Debug)]
pub struct MechanismInfo {
    /// Smallest supported modulus in bits
    pub min_key_size: u32,
    /// Largest supported modulus in bits
    pub max_key_size: u32,
    /// Purposes the engine can dispatch
    pub flags: PurposeFlags,
}

/// Returns the RSA engine's capability descriptor
pub fn mechanism_info() -> MechanismInfo {
    MechanismInfo {
        min_key_size: MIN_RSA_SIZE_BITS,
        max_key_size: MAX_RSA_SIZE_BITS,
        flags: PurposeFlags::ENCRYPT
            | PurposeFlags::DECRYPT
            | PurposeFlags::SIGN
            | PurposeFlags::VERIFY,
    }
}

fn purpose_flag(purpose: Purpose) -> Option<PurposeFlags> {
    match purpose {
        Purpose::Encrypt => Some(PurposeFlags::ENCRYPT),
        Purpose::Decrypt => Some(PurposeFlags::DECRYPT),
        Purpose::Sign => Some(PurposeFlags::SIGN),
        Purpose::Verify => Some(PurposeFlags::VERIFY),
        _ => None,
    }
}

/// Reads the public exponent from a description, appending the policy
/// default when absent. Already-declared values are left untouched, so
/// resolving twice changes nothing.
pub(crate) fn resolved_exponent(authorizations: &mut AuthorizationSet) -> Result<u64> {
    match authorizations.get_ulonglong(Tag::PublicExponent) {
        Ok(e) => Ok(e),
        Err(e) => {
            if !e.tag_not_found() {
                return Err(e);
            }
            authorizations.push(Authorization::from_ulonglong(
                Tag::PublicExponent,
                RSA_DEFAULT_EXPONENT,
            ));
            Ok(RSA_DEFAULT_EXPONENT)
        }
    }
}

/// Reads the key size from a description, appending the policy default
/// when absent
pub(crate) fn resolved_key_size(authorizations: &mut AuthorizationSet) -> Result<u32> {
    match authorizations.get_ulong(Tag::KeySize) {
        Ok(s) => Ok(s),
        Err(e) => {
            if !e.tag_not_found() {
                return Err(e);
            }
            authorizations.push(Authorization::from_ulong(
                Tag::KeySize,
                RSA_DEFAULT_KEY_SIZE,
            ));
            Ok(RSA_DEFAULT_KEY_SIZE)
        }
    }
}

/// An RSA key entity: the augmented authorization set plus exclusively
/// owned key material.
///
/// Constructed by [RsaKey::generate] or [RsaKey::import]; consumed exactly
/// once by [RsaKey::create_operation], which moves the material into the
/// returned operation. There is no way to dispatch the same entity twice.
#[derive(Debug)]
pub struct RsaKey {
    authorizations: AuthorizationSet,
    material: RsaKeyMaterial,
}

impl RsaKey {
    /// Generates a fresh key pair from a caller description.
    ///
    /// The description is copied and augmented: public exponent defaults
    /// to [RSA_DEFAULT_EXPONENT] and key size to [RSA_DEFAULT_KEY_SIZE]
    /// when absent. Declared values are passed to the provider verbatim;
    /// combinations the provider cannot satisfy surface as
    /// [ErrorCode::UnknownError].
    pub fn generate(key_description: &AuthorizationSet) -> Result<RsaKey> {
        let mut authorizations = key_description.clone();
        let public_exponent = resolved_exponent(&mut authorizations)?;
        let key_size = resolved_key_size(&mut authorizations)?;

        debug!(
            "generating RSA key pair: {} bits, public exponent {}",
            key_size, public_exponent
        );
        let material = RsaKeyMaterial::generate(public_exponent, key_size)?;

        Ok(RsaKey {
            authorizations: authorizations,
            material: material,
        })
    }

    /// Imports key material held in a generic container.
    ///
    /// The RSA material is extracted as an independent copy and reconciled
    /// against the description with [RsaKey::from_material]; on any
    /// failure the caller still owns the container untouched.
    pub fn import(
        key_description: &AuthorizationSet,
        key: &GenericKey,
    ) -> Result<RsaKey> {
        let material = key.extract_rsa()?;
        RsaKey::from_material(key_description, material)
    }

    /// Reconciles a caller description against actual key material,
    /// producing the key entity.
    ///
    /// Each attribute is checked independently:
    /// - a declared public exponent must equal the material's exponent at
    ///   arbitrary precision; when undeclared, the actual exponent is
    ///   appended, unless narrowing it to a word hits the provider
    ///   sentinel (see [EXPONENT_WORD_INVALID]), which is conservatively
    ///   rejected
    /// - a declared key size must equal the material's size in bits; when
    ///   undeclared the actual size is appended
    /// - a declared algorithm must be RSA; when undeclared, RSA is
    ///   appended
    ///
    /// Any mismatch reports [ErrorCode::ImportParameterMismatch]. Other
    /// declared tags (padding, digest, purpose, ...) are not checked here;
    /// unusable combinations surface at operation dispatch.
    pub fn from_material(
        key_description: &AuthorizationSet,
        material: RsaKeyMaterial,
    ) -> Result<RsaKey> {
        let mut authorizations = key_description.clone();

        match authorizations.get_ulonglong(Tag::PublicExponent) {
            Ok(declared) => {
                if material.compare_exponent(declared) != Ordering::Equal {
                    debug!("import rejected: declared public exponent does not match");
                    return err_code!(ErrorCode::ImportParameterMismatch);
                }
            }
            Err(e) => {
                if !e.tag_not_found() {
                    return Err(e);
                }
                let word = material.exponent_word();
                if word == EXPONENT_WORD_INVALID {
                    /* cannot tell a huge exponent from a narrowing
                     * failure, reject both */
                    debug!("import rejected: public exponent does not fit a word");
                    return err_code!(ErrorCode::ImportParameterMismatch);
                }
                authorizations
                    .push(Authorization::from_ulonglong(Tag::PublicExponent, word));
            }
        }

        match authorizations.get_ulong(Tag::KeySize) {
            Ok(declared) => {
                if declared != material.size_in_bits() {
                    debug!(
                        "import rejected: declared size {} bits, material is {} bits",
                        declared,
                        material.size_in_bits()
                    );
                    return err_code!(ErrorCode::ImportParameterMismatch);
                }
            }
            Err(e) => {
                if !e.tag_not_found() {
                    return Err(e);
                }
                authorizations.push(Authorization::from_ulong(
                    Tag::KeySize,
                    material.size_in_bits(),
                ));
            }
        }

        match authorizations.get_enum(Tag::Algorithm) {
            Ok(declared) => {
                if declared != Algorithm::Rsa as u32 {
                    debug!("import rejected: declared algorithm is not RSA");
                    return err_code!(ErrorCode::ImportParameterMismatch);
                }
            }
            Err(e) => {
                if !e.tag_not_found() {
                    return Err(e);
                }
                authorizations
                    .push(Authorization::from_enum(Tag::Algorithm, Algorithm::Rsa as u32));
            }
        }

        /* remaining tags are accepted as declared; missing or unusable
         * padding, digest or purpose values are diagnosed when an
         * operation is requested */
        Ok(RsaKey {
            authorizations: authorizations,
            material: material,
        })
    }

    /// Returns the entity's augmented authorization set
    pub fn authorizations(&self) -> &AuthorizationSet {
        &self.authorizations
    }

    /// Returns a read-only view of the owned key material
    pub fn material(&self) -> &RsaKeyMaterial {
        &self.material
    }

    /// Exports the entity's material into a fresh generic container.
    ///
    /// The container receives an independent encoding; the entity keeps
    /// its material.
    pub fn to_generic(&self) -> Result<GenericKey> {
        let mut key = GenericKey::new();
        key.inject_rsa(&self.material)?;
        Ok(key)
    }

    /// Validates the requested purpose against the declared padding and
    /// digest and, on success, constructs the matching operation,
    /// consuming the entity and moving the key material into it.
    ///
    /// Padding is validated before digest; the first violation is the one
    /// reported. On failure the untouched entity is handed back beside
    /// the error so the caller can retry with different parameters.
    pub fn create_operation(
        self,
        purpose: Purpose,
    ) -> std::result::Result<RsaOperation, (RsaKey, Error)> {
        match purpose_flag(purpose) {
            Some(f) => {
                if !mechanism_info().flags.contains(f) {
                    return Err((self, to_code!(ErrorCode::UnsupportedPurpose)));
                }
            }
            None => {
                debug!("dispatch rejected: purpose {:?} not supported", purpose);
                return Err((self, to_code!(ErrorCode::UnsupportedPurpose)));
            }
        }

        let padding_code = match self.authorizations.get_enum(Tag::Padding) {
            Ok(code) => Some(code),
            Err(e) => {
                if !e.tag_not_found() {
                    return Err((self, e));
                }
                None
            }
        };
        if !supported_padding(purpose, padding_code) {
            debug!(
                "dispatch rejected: padding {:?} unusable for {:?}",
                padding_code, purpose
            );
            return Err((self, to_code!(ErrorCode::UnsupportedPaddingMode)));
        }

        let digest_code = match self.authorizations.get_enum(Tag::Digest) {
            Ok(code) => Some(code),
            Err(e) => {
                if !e.tag_not_found() {
                    return Err((self, e));
                }
                None
            }
        };
        if !supported_digest(purpose, digest_code) {
            debug!(
                "dispatch rejected: digest {:?} unusable for {:?}",
                digest_code, purpose
            );
            return Err((self, to_code!(ErrorCode::UnsupportedDigest)));
        }

        /* the matrix only lets known codes through for the purposes that
         * constrain them */
        let padding = match padding_code {
            Some(code) => match Padding::try_from(code) {
                Ok(p) => p,
                Err(_) => {
                    return Err((self, to_code!(ErrorCode::UnsupportedPaddingMode)))
                }
            },
            None => Padding::None,
        };
        let digest = match digest_code {
            Some(code) => match Digest::try_from(code) {
                Ok(d) => d,
                Err(_) => return Err((self, to_code!(ErrorCode::UnsupportedDigest))),
            },
            None => Digest::None,
        };

        debug!("dispatching {:?} operation", purpose);
        let op = match purpose {
            Purpose::Sign => RsaOperation::Sign(RsaSignOperation {
                digest: digest,
                material: self.material,
            }),
            Purpose::Verify => RsaOperation::Verify(RsaVerifyOperation {
                digest: digest,
                material: self.material,
            }),
            Purpose::Encrypt => RsaOperation::Encrypt(RsaEncryptOperation {
                padding: padding,
                material: self.material,
            }),
            Purpose::Decrypt => RsaOperation::Decrypt(RsaDecryptOperation {
                padding: padding,
                material: self.material,
            }),
            _ => return Err((self, to_code!(ErrorCode::UnsupportedPurpose))),
        };
        Ok(op)
    }
}

/// The mode compatibility matrix, padding axis
fn supported_padding(purpose: Purpose, padding: Option<u32>) -> bool {
    match purpose {
        Purpose::Sign | Purpose::Verify => padding == Some(Padding::None as u32),
        Purpose::Encrypt | Purpose::Decrypt => {
            padding == Some(Padding::RsaOaep as u32)
                || padding == Some(Padding::RsaPkcs1_1_5Encrypt as u32)
        }
        _ => false,
    }
}

/// The mode compatibility matrix, digest axis
fn supported_digest(purpose: Purpose, digest: Option<u32>) -> bool {
    match purpose {
        Purpose::Sign | Purpose::Verify => digest == Some(Digest::None as u32),
        Purpose::Encrypt | Purpose::Decrypt => {
            /* don't care */
            true
        }
        _ => false,
    }
}

/// A purpose-bound operation owning the key material for its lifetime
#[derive(Debug)]
pub enum RsaOperation {
    /// Signature generation
    Sign(RsaSignOperation),
    /// Signature verification
    Verify(RsaVerifyOperation),
    /// Public key encryption
    Encrypt(RsaEncryptOperation),
    /// Private key decryption
    Decrypt(RsaDecryptOperation),
}

impl RsaOperation {
    /// Returns the purpose this operation was dispatched for
    pub fn purpose(&self) -> Purpose {
        match self {
            RsaOperation::Sign(_) => Purpose::Sign,
            RsaOperation::Verify(_) => Purpose::Verify,
            RsaOperation::Encrypt(_) => Purpose::Encrypt,
            RsaOperation::Decrypt(_) => Purpose::Decrypt,
        }
    }
}

/// Signature generation over raw, caller-digested input
#[derive(Debug)]
pub struct RsaSignOperation {
    digest: Digest,
    material: RsaKeyMaterial,
}

impl RsaSignOperation {
    /// Returns the digest the operation was dispatched with
    pub fn digest(&self) -> Digest {
        self.digest
    }

    /// Signs one modulus worth of raw input
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.material.sign_raw(data)
    }
}

/// Signature verification over raw, caller-digested input
#[derive(Debug)]
pub struct RsaVerifyOperation {
    digest: Digest,
    material: RsaKeyMaterial,
}

impl RsaVerifyOperation {
    /// Returns the digest the operation was dispatched with
    pub fn digest(&self) -> Digest {
        self.digest
    }

    /// Verifies a raw signature against one modulus worth of expected
    /// input
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        let recovered = self.material.verify_raw(signature)?;
        if recovered != data {
            return Err(Error::with_msg(
                ErrorCode::UnknownError,
                "signature verification failed".to_string(),
            ));
        }
        Ok(())
    }
}

/// Public key encryption under the dispatched padding mode
#[derive(Debug)]
pub struct RsaEncryptOperation {
    padding: Padding,
    material: RsaKeyMaterial,
}

impl RsaEncryptOperation {
    /// Returns the padding the operation was dispatched with
    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Encrypts a message under the operation's padding mode
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.material.encrypt(self.padding, plaintext)
    }
}

/// Private key decryption under the dispatched padding mode
#[derive(Debug)]
pub struct RsaDecryptOperation {
    padding: Padding,
    material: RsaKeyMaterial,
}

impl RsaDecryptOperation {
    /// Returns the padding the operation was dispatched with
    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Decrypts a ciphertext under the operation's padding mode
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.material.decrypt(self.padding, ciphertext)
    }
}
