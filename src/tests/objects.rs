// Copyright 2025 The Klavis Authors
// See LICENSE.txt file for terms

use std::cmp::Ordering;

use crate::authorization::Algorithm;
use crate::error::ErrorCode;
use crate::object::GenericKey;
use crate::tests::material_1024;

#[test]
fn test_container_roundtrip() {
    let material = material_1024();

    let mut container = GenericKey::new();
    assert!(container.algorithm().is_none());
    container.inject_rsa(&material).unwrap();
    assert_eq!(container.algorithm(), Some(Algorithm::Rsa));

    let copy = container.extract_rsa().unwrap();
    assert_eq!(copy.size_in_bits(), material.size_in_bits());
    assert_eq!(copy.compare_exponent(65537), Ordering::Equal);

    /* the source container still holds the key */
    assert!(container.extract_rsa().is_ok());
}

#[test]
fn test_extract_from_empty_container() {
    let container = GenericKey::new();
    let err = container.extract_rsa().unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownError);
}

#[test]
fn test_extract_wrong_algorithm() {
    let material = material_1024();
    let der = material.to_pkcs8_der().unwrap();

    let container = GenericKey::with_key(Algorithm::Aes, der);
    let err = container.extract_rsa().unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownError);
}

#[test]
fn test_extract_unparseable_encoding() {
    let container = GenericKey::with_key(Algorithm::Rsa, vec![0xde, 0xad, 0xbe, 0xef]);
    let err = container.extract_rsa().unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownError);
}
