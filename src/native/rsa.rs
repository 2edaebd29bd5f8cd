// Copyright 2025 The Klavis Authors
// See LICENSE.txt file for terms

//! RSA key material provider backed by the RustCrypto `rsa` crate. This is
//! the only module where provider-native key types appear; the rest of the
//! engine handles [RsaKeyMaterial] as an opaque, move-only resource.

use std::cmp::Ordering;

use num_traits::ToPrimitive;
use rsa::hazmat::{rsa_decrypt_and_check, rsa_encrypt};
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey};
use rsa::sha2::Sha256;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Oaep, Pkcs1v15Encrypt, RsaPrivateKey};

use crate::authorization::Padding;
use crate::error::{Error, ErrorCode, Result};
use crate::{err_code, map_err};

/// Sentinel returned by [RsaKeyMaterial::exponent_word] when the public
/// exponent does not fit a 64 bit word.
///
/// The sentinel is also a legitimate (odd) exponent value, so a key whose
/// true exponent equals it cannot be told apart from a narrowing failure.
/// Callers inheriting this limitation treat the sentinel conservatively.
pub const EXPONENT_WORD_INVALID: u64 = u64::MAX;

/// A provider-native RSA key pair.
///
/// Exclusively owned by a key entity until operation dispatch moves it
/// into the operation. Cloning produces an independent copy and is done
/// only at the generic-container boundary.
#[derive(Clone, Debug)]
pub struct RsaKeyMaterial {
    key: RsaPrivateKey,
}

impl RsaKeyMaterial {
    /// Generates a fresh key pair with the given public exponent and
    /// modulus size.
    ///
    /// Generation searches for large primes and can take non-trivial
    /// wall-clock time; there is no cancellation. Provider failures of any
    /// kind, including unusable (exponent, size) combinations, are
    /// reported as [ErrorCode::UnknownError].
    pub fn generate(exponent: u64, size_bits: u32) -> Result<RsaKeyMaterial> {
        let mut rng = rand::thread_rng();
        let e = BigUint::from(exponent);
        let key = map_err!(
            RsaPrivateKey::new_with_exp(&mut rng, usize::try_from(size_bits)?, &e),
            ErrorCode::UnknownError
        )?;
        Ok(RsaKeyMaterial { key: key })
    }

    /// Parses key material from a PKCS#8 DER encoding
    pub fn from_pkcs8_der(der: &[u8]) -> Result<RsaKeyMaterial> {
        let key = map_err!(
            RsaPrivateKey::from_pkcs8_der(der),
            ErrorCode::UnknownError
        )?;
        Ok(RsaKeyMaterial { key: key })
    }

    /// Encodes the key material as PKCS#8 DER
    pub fn to_pkcs8_der(&self) -> Result<Vec<u8>> {
        let doc = map_err!(self.key.to_pkcs8_der(), ErrorCode::UnknownError)?;
        Ok(doc.as_bytes().to_vec())
    }

    /// Returns the key size as 8 times the modulus byte length
    pub fn size_in_bits(&self) -> u32 {
        (self.key.size() * 8) as u32
    }

    /// Returns the public exponent narrowed to a 64 bit word, or
    /// [EXPONENT_WORD_INVALID] when it does not fit
    pub fn exponent_word(&self) -> u64 {
        match self.key.e().to_u64() {
            Some(e) => e,
            None => EXPONENT_WORD_INVALID,
        }
    }

    /// Compares a declared exponent word against the actual public
    /// exponent at arbitrary precision
    pub fn compare_exponent(&self, word: u64) -> Ordering {
        BigUint::from(word).cmp(self.key.e())
    }

    /// Raw private-key transform, m^d mod n. The input must be exactly
    /// one modulus worth of bytes and must encode a value below the
    /// modulus.
    pub fn sign_raw(&self, data: &[u8]) -> Result<Vec<u8>> {
        let size = self.key.size();
        if data.len() != size {
            return Err(Error::with_msg(
                ErrorCode::UnknownError,
                format!("raw input must be {} bytes, got {}", size, data.len()),
            ));
        }
        let m = BigUint::from_bytes_be(data);
        if &m >= self.key.n() {
            return Err(Error::with_msg(
                ErrorCode::UnknownError,
                "raw input does not fit the modulus".to_string(),
            ));
        }
        let mut rng = rand::thread_rng();
        let s = map_err!(
            rsa_decrypt_and_check(&self.key, Some(&mut rng), &m),
            ErrorCode::UnknownError
        )?;
        Ok(left_pad(&s.to_bytes_be(), size))
    }

    /// Raw public-key transform, s^e mod n, returning one modulus worth
    /// of bytes
    pub fn verify_raw(&self, signature: &[u8]) -> Result<Vec<u8>> {
        let size = self.key.size();
        if signature.len() != size {
            return Err(Error::with_msg(
                ErrorCode::UnknownError,
                format!("signature must be {} bytes, got {}", size, signature.len()),
            ));
        }
        let s = BigUint::from_bytes_be(signature);
        if &s >= self.key.n() {
            return Err(Error::with_msg(
                ErrorCode::UnknownError,
                "signature does not fit the modulus".to_string(),
            ));
        }
        let m = map_err!(rsa_encrypt(&self.key, &s), ErrorCode::UnknownError)?;
        Ok(left_pad(&m.to_bytes_be(), size))
    }

    /// Public-key encryption under the given padding mode
    pub fn encrypt(&self, padding: Padding, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut rng = rand::thread_rng();
        let pubkey = self.key.to_public_key();
        match padding {
            Padding::RsaOaep => map_err!(
                pubkey.encrypt(&mut rng, Oaep::new::<Sha256>(), plaintext),
                ErrorCode::UnknownError
            ),
            Padding::RsaPkcs1_1_5Encrypt => map_err!(
                pubkey.encrypt(&mut rng, Pkcs1v15Encrypt, plaintext),
                ErrorCode::UnknownError
            ),
            _ => err_code!(ErrorCode::UnsupportedPaddingMode),
        }
    }

    /// Private-key decryption under the given padding mode
    pub fn decrypt(&self, padding: Padding, ciphertext: &[u8]) -> Result<Vec<u8>> {
        match padding {
            Padding::RsaOaep => map_err!(
                self.key.decrypt(Oaep::new::<Sha256>(), ciphertext),
                ErrorCode::UnknownError
            ),
            Padding::RsaPkcs1_1_5Encrypt => map_err!(
                self.key.decrypt(Pkcs1v15Encrypt, ciphertext),
                ErrorCode::UnknownError
            ),
            _ => err_code!(ErrorCode::UnsupportedPaddingMode),
        }
    }
}

/// Left pads big-endian bytes with zeros up to size
fn left_pad(bytes: &[u8], size: usize) -> Vec<u8> {
    let mut out = vec![0u8; size.saturating_sub(bytes.len())];
    out.extend_from_slice(bytes);
    out
}
