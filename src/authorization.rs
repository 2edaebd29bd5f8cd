// Copyright 2025 The Klavis Authors
// See LICENSE.txt file for terms

//! This module defines the authorization vocabulary a key is described
//! with: the [Tag] enumeration, the typed values each tag carries, and the
//! ordered [AuthorizationSet] collection with its typed accessors. Tags map
//! to their value type through a static tag map.

use serde::{Deserialize, Serialize};

use crate::err_not_found;
use crate::error::{Error, ErrorCode, Result};

/// Cryptographic algorithms a key description may declare.
///
/// Only [Algorithm::Rsa] keys are handled by this engine; the remaining
/// codes exist so that foreign descriptions can be represented (and
/// rejected) rather than failing to parse.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u32)]
pub enum Algorithm {
    /// RSA asymmetric keys
    Rsa = 1,
    /// Elliptic curve asymmetric keys
    Ec = 3,
    /// AES symmetric keys
    Aes = 32,
    /// HMAC keying material
    Hmac = 128,
}

/// The cryptographic role requested for an operation
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u32)]
pub enum Purpose {
    /// Public key encryption
    Encrypt = 0,
    /// Private key decryption
    Decrypt = 1,
    /// Signature generation
    Sign = 2,
    /// Signature verification
    Verify = 3,
    /// Key wrapping, not dispatched by this engine
    WrapKey = 5,
    /// Key agreement, not dispatched by this engine
    AgreeKey = 6,
}

/// Padding modes a key description may declare
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u32)]
pub enum Padding {
    /// No padding, raw transform
    None = 1,
    /// OAEP encryption padding
    RsaOaep = 2,
    /// PSS signature padding
    RsaPss = 3,
    /// PKCS#1 v1.5 encryption padding
    RsaPkcs1_1_5Encrypt = 4,
    /// PKCS#1 v1.5 signature padding
    RsaPkcs1_1_5Sign = 5,
}

/// Digests a key description may declare
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u32)]
pub enum Digest {
    /// No digest, the caller provides raw input
    None = 0,
    /// MD5
    Md5 = 1,
    /// SHA-1
    Sha1 = 2,
    /// SHA-224
    Sha224 = 3,
    /// SHA-256
    Sha256 = 4,
    /// SHA-384
    Sha384 = 5,
    /// SHA-512
    Sha512 = 6,
}

macro_rules! impl_try_from_code {
    ($name:ident; $($variant:ident),+) => {
        impl TryFrom<u32> for $name {
            type Error = Error;
            fn try_from(code: u32) -> Result<$name> {
                $(if code == $name::$variant as u32 {
                    return Ok($name::$variant);
                })+
                Err(Error::with_msg(
                    ErrorCode::UnknownError,
                    format!("unknown {} code {}", stringify!($name), code),
                ))
            }
        }
    };
}

impl_try_from_code!(Algorithm; Rsa, Ec, Aes, Hmac);
impl_try_from_code!(Purpose; Encrypt, Decrypt, Sign, Verify, WrapKey, AgreeKey);
impl_try_from_code!(Padding; None, RsaOaep, RsaPss, RsaPkcs1_1_5Encrypt, RsaPkcs1_1_5Sign);
impl_try_from_code!(Digest; None, Md5, Sha1, Sha224, Sha256, Sha384, Sha512);

/// Tags a key description is built from
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[repr(u32)]
pub enum Tag {
    /// Permitted operation purposes, repeatable
    Purpose = 1,
    /// The key's algorithm
    Algorithm = 2,
    /// Key size in bits
    KeySize = 3,
    /// Declared digest, repeatable
    Digest = 5,
    /// Declared padding mode, repeatable
    Padding = 6,
    /// RSA public exponent
    PublicExponent = 200,
}

/// List of value types a tag can carry
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TagType {
    /// Unsigned 32 bit value
    Ulong,
    /// Unsigned 64 bit value
    Ulonglong,
    /// Enumerated 32 bit code
    Enumerated,
}

/// Struct to map a tag to its value type and a printable name
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Tagmap<'a> {
    tag: Tag,
    name: &'a str,
    ttype: TagType,
}

impl Tagmap<'_> {
    /// Convenience function to search for a mapping by tag
    fn search(tag: Tag) -> Option<&'static Tagmap<'static>> {
        TAGMAP.iter().find(|m| m.tag == tag)
    }

    /// Convenience function to search for a mapping by name
    fn search_by_name(s: &str) -> Option<&'static Tagmap<'static>> {
        TAGMAP.iter().find(|m| m.name == s)
    }
}

/// Helper macro to populate the static tag map
macro_rules! tagmap_element {
    ($tag:ident; as $tagtype:ident) => {
        Tagmap {
            tag: Tag::$tag,
            name: stringify!($tag),
            ttype: TagType::$tagtype,
        }
    };
}

/// The main tag map, lists all known tags
static TAGMAP: [Tagmap<'_>; 6] = [
    tagmap_element!(Purpose; as Enumerated),
    tagmap_element!(Algorithm; as Enumerated),
    tagmap_element!(KeySize; as Ulong),
    tagmap_element!(Digest; as Enumerated),
    tagmap_element!(Padding; as Enumerated),
    tagmap_element!(PublicExponent; as Ulonglong),
];

impl Tag {
    /// Returns the value type this tag carries
    pub fn tag_type(self) -> TagType {
        match Tagmap::search(self) {
            Some(m) => m.ttype,
            None => TagType::Enumerated,
        }
    }

    /// Returns the printable name of the tag
    pub fn name(self) -> &'static str {
        match Tagmap::search(self) {
            Some(m) => m.name,
            None => "UNKNOWN",
        }
    }

    /// Finds a tag from its printable name
    pub fn from_name(s: &str) -> Result<Tag> {
        match Tagmap::search_by_name(s) {
            Some(m) => Ok(m.tag),
            None => Err(Error::not_found(s.to_string())),
        }
    }
}

/// A value carried by an authorization, typed per tag.
///
/// Enumerated codes are stored raw so that descriptions carrying codes
/// outside this crate's vocabulary survive intact; policy decides where
/// such codes are rejected.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Value {
    /// Unsigned 32 bit value
    Ulong(u32),
    /// Unsigned 64 bit value
    Ulonglong(u64),
    /// Enumerated 32 bit code
    Enumerated(u32),
}

/// A single (tag, value) authorization
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Authorization {
    tag: Tag,
    value: Value,
}

impl Authorization {
    /// Constructs an authorization, checking the value against the tag's
    /// declared type
    pub fn new(tag: Tag, value: Value) -> Result<Authorization> {
        let matches = match value {
            Value::Ulong(_) => tag.tag_type() == TagType::Ulong,
            Value::Ulonglong(_) => tag.tag_type() == TagType::Ulonglong,
            Value::Enumerated(_) => tag.tag_type() == TagType::Enumerated,
        };
        if !matches {
            return Err(Error::with_msg(
                ErrorCode::UnknownError,
                format!("value type mismatch for tag {}", tag.name()),
            ));
        }
        Ok(Authorization {
            tag: tag,
            value: value,
        })
    }

    /// Creates an authorization carrying a u32 value
    ///
    /// Note: Does not verify that the tag's value type is correct
    pub fn from_ulong(tag: Tag, val: u32) -> Authorization {
        Authorization {
            tag: tag,
            value: Value::Ulong(val),
        }
    }

    /// Creates an authorization carrying a u64 value
    ///
    /// Note: Does not verify that the tag's value type is correct
    pub fn from_ulonglong(tag: Tag, val: u64) -> Authorization {
        Authorization {
            tag: tag,
            value: Value::Ulonglong(val),
        }
    }

    /// Creates an authorization carrying an enumerated code
    ///
    /// Note: Does not verify that the tag's value type is correct
    pub fn from_enum(tag: Tag, code: u32) -> Authorization {
        Authorization {
            tag: tag,
            value: Value::Enumerated(code),
        }
    }

    /// Returns the authorization's tag
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns a reference to the internal value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the internal value as a u32
    ///
    /// Returns an error if the value is not a u32
    pub fn to_ulong(&self) -> Result<u32> {
        match self.value {
            Value::Ulong(v) => Ok(v),
            _ => Err(Error::with_msg(
                ErrorCode::UnknownError,
                format!("tag {} does not hold a u32", self.tag.name()),
            )),
        }
    }

    /// Returns the internal value as a u64
    ///
    /// Returns an error if the value is not a u64
    pub fn to_ulonglong(&self) -> Result<u64> {
        match self.value {
            Value::Ulonglong(v) => Ok(v),
            _ => Err(Error::with_msg(
                ErrorCode::UnknownError,
                format!("tag {} does not hold a u64", self.tag.name()),
            )),
        }
    }

    /// Returns the internal value as a raw enumerated code
    ///
    /// Returns an error if the value is not an enumerated code
    pub fn to_enum(&self) -> Result<u32> {
        match self.value {
            Value::Enumerated(v) => Ok(v),
            _ => Err(Error::with_msg(
                ErrorCode::UnknownError,
                format!("tag {} does not hold an enumerated code", self.tag.name()),
            )),
        }
    }
}

/// An ordered collection of [Authorization]s describing a key.
///
/// Duplicate tags are permitted (a description may declare several
/// paddings or digests); for single-valued tags the first match is
/// authoritative.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AuthorizationSet {
    list: Vec<Authorization>,
}

impl AuthorizationSet {
    /// Creates an empty set
    pub fn new() -> AuthorizationSet {
        AuthorizationSet { list: Vec::new() }
    }

    /// Returns the number of authorizations in the set
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns true when the set holds no authorizations
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Iterates over the authorizations in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, Authorization> {
        self.list.iter()
    }

    /// Appends an authorization to the set
    pub fn push(&mut self, auth: Authorization) {
        self.list.push(auth);
    }

    /// Returns the first authorization matching the tag
    pub fn get(&self, tag: Tag) -> Option<&Authorization> {
        self.list.iter().find(|a| a.tag == tag)
    }

    /// Returns true when at least one authorization matches the tag
    pub fn contains(&self, tag: Tag) -> bool {
        self.get(tag).is_some()
    }

    /// Returns the first value for the tag as a u32
    ///
    /// A missing tag is reported as a tag-not-found error so that callers
    /// can default it, see [Error::tag_not_found]
    pub fn get_ulong(&self, tag: Tag) -> Result<u32> {
        match self.get(tag) {
            Some(a) => a.to_ulong(),
            None => err_not_found!(tag.name().to_string()),
        }
    }

    /// Returns the first value for the tag as a u64
    ///
    /// A missing tag is reported as a tag-not-found error so that callers
    /// can default it, see [Error::tag_not_found]
    pub fn get_ulonglong(&self, tag: Tag) -> Result<u64> {
        match self.get(tag) {
            Some(a) => a.to_ulonglong(),
            None => err_not_found!(tag.name().to_string()),
        }
    }

    /// Returns the first value for the tag as a raw enumerated code
    ///
    /// A missing tag is reported as a tag-not-found error so that callers
    /// can default it, see [Error::tag_not_found]
    pub fn get_enum(&self, tag: Tag) -> Result<u32> {
        match self.get(tag) {
            Some(a) => a.to_enum(),
            None => err_not_found!(tag.name().to_string()),
        }
    }
}

impl From<Vec<Authorization>> for AuthorizationSet {
    fn from(list: Vec<Authorization>) -> AuthorizationSet {
        AuthorizationSet { list: list }
    }
}

impl<'a> IntoIterator for &'a AuthorizationSet {
    type Item = &'a Authorization;
    type IntoIter = std::slice::Iter<'a, Authorization>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
