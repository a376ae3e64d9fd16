//! Content fingerprints for cache keys.
//!
//! A fingerprint covers a partial's own key and source followed by the key and
//! source of every member of its closure, in sorted key order. Editing any
//! partial the closure touches changes the fingerprint; editing an unrelated
//! partial does not.

use sha2::{Digest, Sha256};

/// Prefix identifying the digest algorithm.
pub const FINGERPRINT_PREFIX: &str = "sha256:";

/// Incremental fingerprint builder.
#[derive(Default)]
pub struct Fingerprinter {
    hasher: Sha256,
}

impl Fingerprinter {
    /// Empty fingerprint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one partial. Fields are length-prefixed so that adjacent entries
    /// cannot collide by shifting bytes between them.
    pub fn add(&mut self, key: &str, source: &str) {
        for field in [key, source] {
            self.hasher.update((field.len() as u64).to_le_bytes());
            self.hasher.update(field.as_bytes());
        }
    }

    /// Hex digest with [`FINGERPRINT_PREFIX`].
    #[must_use]
    pub fn finish(self) -> String {
        format!("{FINGERPRINT_PREFIX}{}", hex::encode(self.hasher.finalize()))
    }
}

/// Fingerprint of `root` and its closure members (given in any order).
#[must_use]
pub fn fingerprint<'a>(
    root: (&str, &str),
    closure: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> String {
    let mut members: Vec<(&str, &str)> = closure.into_iter().collect();
    members.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut fp = Fingerprinter::new();
    fp.add(root.0, root.1);
    for (key, source) in members {
        fp.add(key, source);
    }
    fp.finish()
}
