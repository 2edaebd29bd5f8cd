// Copyright 2025 The Klavis Authors
// See LICENSE.txt file for terms

use crate::authorization::{
    Authorization, AuthorizationSet, Digest, Padding, Tag, Value,
};
use crate::rsa::{
    resolved_exponent, resolved_key_size, RSA_DEFAULT_EXPONENT,
    RSA_DEFAULT_KEY_SIZE,
};
use crate::tests::make_description;

#[test]
fn test_typed_accessors() {
    let set = make_description(
        &[(Tag::KeySize, 2048)],
        &[(Tag::PublicExponent, 65537)],
        &[(Tag::Padding, Padding::None as u32)],
    );

    assert_eq!(set.get_ulong(Tag::KeySize).unwrap(), 2048);
    assert_eq!(set.get_ulonglong(Tag::PublicExponent).unwrap(), 65537);
    assert_eq!(set.get_enum(Tag::Padding).unwrap(), Padding::None as u32);

    /* a missing tag is distinguishable from a present one of the wrong
     * type */
    let err = set.get_enum(Tag::Digest).unwrap_err();
    assert!(err.tag_not_found());
    let err = set.get_enum(Tag::KeySize).unwrap_err();
    assert!(!err.tag_not_found());
}

#[test]
fn test_first_match_is_authoritative() {
    let mut set = AuthorizationSet::new();
    set.push(Authorization::from_enum(Tag::Padding, Padding::RsaOaep as u32));
    set.push(Authorization::from_enum(
        Tag::Padding,
        Padding::RsaPkcs1_1_5Encrypt as u32,
    ));
    set.push(Authorization::from_enum(Tag::Digest, Digest::Sha256 as u32));

    assert_eq!(set.len(), 3);
    assert_eq!(set.get_enum(Tag::Padding).unwrap(), Padding::RsaOaep as u32);
}

#[test]
fn test_resolver_defaults() {
    let mut set = AuthorizationSet::new();

    assert_eq!(resolved_exponent(&mut set).unwrap(), RSA_DEFAULT_EXPONENT);
    assert_eq!(resolved_key_size(&mut set).unwrap(), RSA_DEFAULT_KEY_SIZE);
    assert_eq!(set.len(), 2);
    assert_eq!(
        set.get_ulonglong(Tag::PublicExponent).unwrap(),
        RSA_DEFAULT_EXPONENT
    );
    assert_eq!(set.get_ulong(Tag::KeySize).unwrap(), RSA_DEFAULT_KEY_SIZE);

    /* resolving an already resolved set changes nothing */
    assert_eq!(resolved_exponent(&mut set).unwrap(), RSA_DEFAULT_EXPONENT);
    assert_eq!(resolved_key_size(&mut set).unwrap(), RSA_DEFAULT_KEY_SIZE);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_resolver_leaves_declared_values() {
    let mut set = make_description(&[(Tag::KeySize, 1024)], &[(Tag::PublicExponent, 3)], &[]);

    assert_eq!(resolved_exponent(&mut set).unwrap(), 3);
    assert_eq!(resolved_key_size(&mut set).unwrap(), 1024);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_authorization_type_check() {
    let auth = Authorization::new(Tag::KeySize, Value::Ulong(2048)).unwrap();
    assert_eq!(auth.to_ulong().unwrap(), 2048);

    assert!(Authorization::new(Tag::KeySize, Value::Ulonglong(2048)).is_err());
    assert!(Authorization::new(Tag::PublicExponent, Value::Enumerated(3)).is_err());
}

#[test]
fn test_tag_names() {
    assert_eq!(Tag::PublicExponent.name(), "PublicExponent");
    assert_eq!(Tag::from_name("KeySize").unwrap(), Tag::KeySize);
    assert!(Tag::from_name("NoSuchTag").unwrap_err().tag_not_found());
}

#[test]
fn test_description_serialization() {
    let set = make_description(
        &[(Tag::KeySize, 2048)],
        &[(Tag::PublicExponent, 65537)],
        &[(Tag::Padding, Padding::RsaOaep as u32)],
    );

    let text = serde_json::to_string(&set).unwrap();
    assert!(text.contains("PublicExponent"));

    let parsed: AuthorizationSet = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, set);
    assert_eq!(parsed.get_ulong(Tag::KeySize).unwrap(), 2048);
}
