//! SHA-256 hashing helpers.
//!
//! All commitments in this workspace are SHA-256 digests over domain-tagged
//! preimages. The tag is length-prefixed so distinct domains can never
//! collide by concatenation.

use borsh::BorshSerialize;
use sha2::{Digest, Sha256};

use crate::buf::Buf32;

/// Computes the plain SHA-256 digest of a byte slice.
pub fn sha256(buf: &[u8]) -> Buf32 {
    let mut hasher = Sha256::new();
    hasher.update(buf);
    Buf32::from(<[u8; 32]>::from(hasher.finalize()))
}

/// Computes a domain-tagged SHA-256 digest.
pub fn sha256_tagged(tag: &[u8], buf: &[u8]) -> Buf32 {
    let mut hasher = Sha256::new();
    hasher.update([tag.len() as u8]);
    hasher.update(tag);
    hasher.update(buf);
    Buf32::from(<[u8; 32]>::from(hasher.finalize()))
}

/// Computes the domain-tagged digest of a value's borsh encoding.
pub fn hash_borsh<T: BorshSerialize>(tag: &[u8], value: &T) -> Buf32 {
    let enc = borsh::to_vec(value).expect("hash: infallible borsh encode");
    sha256_tagged(tag, &enc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_hash_domain_separation() {
        let d1 = sha256_tagged(b"a", b"bc");
        let d2 = sha256_tagged(b"ab", b"c");
        assert_ne!(d1, d2, "length prefix must separate tag from payload");
    }

    #[test]
    fn test_hash_borsh_stable() {
        let v = (42u64, [7u8; 32]);
        assert_eq!(hash_borsh(b"test", &v), hash_borsh(b"test", &v));
        assert_ne!(hash_borsh(b"test", &v), hash_borsh(b"other", &v));
    }
}
