//! Identifier types and the unordered-index hashing scheme.
//!
//! `AttId`, `Gid`, `Xid` and `Mid` are distinct newtypes over a signed
//! 64-bit integer so the compiler catches an attribute id passed where a
//! geometry-group id was expected. The original C++ sized these to the
//! pointer width of the host (32 or 64 bit) and hashed with a matching FNV
//! variant; this port standardizes on 64-bit ids and 64-bit FNV-1
//! uniformly, removing the platform-width skew the original design notes
//! flag as a known wart.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used throughout the original format for "no value" on an
/// otherwise-numeric field.
pub const INVALID: i64 = -101;

macro_rules! id_newtype {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl $name {
            pub const INVALID: $name = $name(INVALID);

            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(v: i64) -> Self {
                $name(v)
            }
        }
    };
}

id_newtype!(AttId, "Identifier of an `Attribute` or `AttributeGroup`.");
id_newtype!(Gid, "Identifier of a `GeometryGroup` or `GeometryReference`.");
id_newtype!(Xid, "Identifier of a `MeshLinkTransform`.");
id_newtype!(Mid, "Identifier of a mesh topology entity.");

/// Sentinel index meaning "this slot of a face is unused", i.e. the face is
/// triangular rather than quadrilateral.
pub const INDEX_UNUSED: i64 = -101;

/// The canonicalized hash of an unordered tuple of up to four mesh point
/// indices, used as the key for hash-based element lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexTag(pub u64);

const FNV64_INIT: u64 = 0xcbf2_9ce4_8422_2325;
const FNV64_PRIME: u64 = 0x0000_0100_0000_01b3;

/// One FNV-1 64-bit step: `hash = (hash * PRIME) ^ data`, folding in the
/// bytes of `data` one octet at a time (matching the original `pwiFnvHash`
/// implementation, which hashes `sizeof(MLINT)` octets per call).
fn fnv_step(data: i64, hash: u64) -> u64 {
    let mut h = hash;
    for byte in data.to_le_bytes() {
        h = h.wrapping_mul(FNV64_PRIME);
        h ^= byte as u64;
    }
    h
}

fn fnv_hash(values: &[i64]) -> u64 {
    let mut h = FNV64_INIT;
    for &v in values {
        h = fnv_step(v, h);
    }
    h
}

/// Hash a single mesh point index. Identity in the sense that there is
/// nothing to canonicalize, but still routed through FNV so `IndexTag`
/// values are comparable across point/edge/face hashing.
pub fn hash_point(i1: i64) -> IndexTag {
    IndexTag(fnv_hash(&[i1]))
}

/// Hash an edge's two point indices. Order-independent: `(a, b)` and
/// `(b, a)` hash identically because the pair is sorted before hashing.
pub fn hash_edge(i1: i64, i2: i64) -> IndexTag {
    let mut v = [i1, i2];
    v.sort_unstable();
    IndexTag(fnv_hash(&v))
}

/// Hash a face's point indices. `i4 = INDEX_UNUSED` marks a triangular
/// face; the sentinel is itself sorted into the tuple so a triangle and a
/// quadrilateral built from the same three indices never collide (the
/// sentinel is far more negative than any real index and always sorts
/// first). Order-independent over whichever slots are used.
pub fn hash_face(i1: i64, i2: i64, i3: i64, i4: i64) -> IndexTag {
    let mut v = [i1, i2, i3, i4];
    v.sort_unstable();
    IndexTag(fnv_hash(&v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_hash_is_order_independent() {
        assert_eq!(hash_edge(3, 9), hash_edge(9, 3));
    }

    #[test]
    fn face_hash_is_permutation_independent() {
        let h = hash_face(1, 2, 3, 4);
        assert_eq!(h, hash_face(4, 3, 2, 1));
        assert_eq!(h, hash_face(2, 4, 1, 3));
    }

    #[test]
    fn triangle_and_quad_with_same_three_indices_do_not_collide() {
        let tri = hash_face(1, 2, 3, INDEX_UNUSED);
        let quad = hash_face(1, 2, 3, 4);
        assert_ne!(tri, quad);
    }

    #[test]
    fn triangle_hash_is_permutation_independent() {
        let h = hash_face(5, 6, 7, INDEX_UNUSED);
        assert_eq!(h, hash_face(7, 5, 6, INDEX_UNUSED));
    }

    #[test]
    fn point_hash_is_deterministic() {
        assert_eq!(hash_point(42), hash_point(42));
        assert_ne!(hash_point(42), hash_point(43));
    }

    #[test]
    fn id_default_is_invalid_sentinel() {
        assert_eq!(AttId::default(), AttId::INVALID);
        assert!(!AttId::default().is_valid());
        assert!(AttId(7).is_valid());
    }
}
