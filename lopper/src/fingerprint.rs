//! Content fingerprints for subtrees.
//!
//! A leaf is fingerprinted by its label. An internal node is fingerprinted by
//! the concatenated source text of its children, in order. Hashing the text
//! rather than the children's fingerprints means two subtrees share a
//! fingerprint only when their token content matches exactly.

use core::fmt;

use md5::{Digest, Md5};

/// 128-bit MD5 digest of a subtree's content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
    /// Fingerprint of raw bytes.
    pub fn digest(bytes: &[u8]) -> Self {
        let mut hasher = Md5::new();
        hasher.update(bytes);
        Self::from_hasher(hasher)
    }

    /// Fingerprint of a leaf node with the given label.
    pub fn of_label(label: &str) -> Self {
        Self::digest(label.as_bytes())
    }

    fn from_hasher(hasher: Md5) -> Self {
        let mut out = [0u8; 16];
        out.copy_from_slice(&hasher.finalize());
        Self(out)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// 32 lowercase hex characters, zero-padded.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

/// Running digest for a node whose children are still being built.
///
/// Each finished child feeds its source text in. A node that never received a
/// child is a leaf and falls back to hashing its label.
#[derive(Default, Clone)]
pub(crate) struct ChildDigest {
    hasher: Option<Md5>,
}

impl ChildDigest {
    pub(crate) fn feed(&mut self, child_text: &str) {
        self.hasher
            .get_or_insert_with(Md5::new)
            .update(child_text.as_bytes());
    }

    pub(crate) fn finish(self, label: &str) -> Fingerprint {
        match self.hasher {
            Some(hasher) => Fingerprint::from_hasher(hasher),
            None => Fingerprint::of_label(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_zero_padded_lowercase() {
        let fp = Fingerprint::digest(b"");
        assert_eq!(fp.to_hex(), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(fp.to_string().len(), 32);
    }

    #[test]
    fn leaf_digest_uses_label() {
        let digest = ChildDigest::default();
        assert_eq!(
            digest.finish("abc").to_hex(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
    }

    #[test]
    fn children_are_concatenated_without_separator() {
        let mut digest = ChildDigest::default();
        digest.feed("a");
        digest.feed("b");
        digest.feed("c");
        assert_eq!(digest.finish("ignored"), Fingerprint::digest(b"abc"));
    }
}
