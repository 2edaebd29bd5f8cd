// Copyright 2025 The Klavis Authors
// See LICENSE.txt file for terms

use std::sync::OnceLock;

use crate::authorization::{Authorization, AuthorizationSet, Tag};
use crate::native::rsa::RsaKeyMaterial;

mod authorizations;
mod objects;

/// Builds a key description out of typed (tag, value) slices
pub fn make_description(
    ulongs: &[(Tag, u32)],
    ulonglongs: &[(Tag, u64)],
    enums: &[(Tag, u32)],
) -> AuthorizationSet {
    let mut set = AuthorizationSet::new();
    for (tag, val) in ulongs {
        set.push(Authorization::from_ulong(*tag, *val));
    }
    for (tag, val) in ulonglongs {
        set.push(Authorization::from_ulonglong(*tag, *val));
    }
    for (tag, val) in enums {
        set.push(Authorization::from_enum(*tag, *val));
    }
    set
}

static MATERIAL_1024: OnceLock<RsaKeyMaterial> = OnceLock::new();
static MATERIAL_1024_E3: OnceLock<RsaKeyMaterial> = OnceLock::new();

/* key generation is the slow part of this suite; tests that only need
 * some material share these fixtures and clone them */

/// Returns a copy of a shared 1024 bit key with the default exponent
pub fn material_1024() -> RsaKeyMaterial {
    MATERIAL_1024
        .get_or_init(|| RsaKeyMaterial::generate(65537, 1024).unwrap())
        .clone()
}

/// Returns a copy of a shared 1024 bit key with public exponent 3
pub fn material_1024_e3() -> RsaKeyMaterial {
    MATERIAL_1024_E3
        .get_or_init(|| RsaKeyMaterial::generate(3, 1024).unwrap())
        .clone()
}
