//! Namespaced hashes and their CID representation.

use cid::CidGeneric;
use multihash::Multihash;

use crate::{Error, Result};

/// Size of the NMT namespace in bytes.
pub const NS_SIZE: usize = 8;

/// Size of the sha256 digest embedded in a namespaced hash.
pub const HASH_SIZE: usize = 32;

/// Size of a digest created by an NMT in bytes.
///
/// A namespaced hash is the minimum and maximum namespace of the subtree
/// followed by the sha256 digest.
pub const NAMESPACED_HASH_SIZE: usize = 2 * NS_SIZE + HASH_SIZE;

/// Maximum width of a single unerasured row or column of the data square.
pub const MAX_SQUARE_SIZE: usize = 128;

// Below used multiformats (one codec, one multihash) seem free:
// https://github.com/multiformats/multicodec/blob/master/table.csv

/// The codec used for leaf and inner nodes of a Namespaced Merkle Tree.
pub const NMT_CODEC: u64 = 0x7700;

/// The multihash code used to hash blocks that contain an NMT node.
pub const SHA256_NAMESPACE_FLAGGED: u64 = 0x7701;

/// The id of a block carrying an NMT node.
pub type Cid = CidGeneric<NAMESPACED_HASH_SIZE>;

/// Hash carried by the nodes of an NMT.
pub type NamespacedHash = nmt_rs::NamespacedHash<NS_SIZE>;

/// Helpers for converting a [`NamespacedHash`] from and into its raw byte form.
pub trait NamespacedHashExt: Sized {
    /// Parse a namespaced hash from its raw byte form.
    fn from_raw(bytes: &[u8]) -> Result<Self>;
    /// Raw byte form of the hash, min and max namespace followed by the digest.
    fn to_array(&self) -> [u8; NAMESPACED_HASH_SIZE];
    /// Raw byte form of the hash as a `Vec`.
    fn to_vec(&self) -> Vec<u8>;
}

impl NamespacedHashExt for NamespacedHash {
    fn from_raw(bytes: &[u8]) -> Result<Self> {
        bytes
            .try_into()
            .map_err(|_| Error::InvalidNamespacedHashLength(bytes.len()))
    }

    fn to_array(&self) -> [u8; NAMESPACED_HASH_SIZE] {
        let mut bytes = [0u8; NAMESPACED_HASH_SIZE];
        bytes[..NS_SIZE].copy_from_slice(&self.min_namespace().0);
        bytes[NS_SIZE..2 * NS_SIZE].copy_from_slice(&self.max_namespace().0);
        bytes[2 * NS_SIZE..].copy_from_slice(&self.hash());
        bytes
    }

    fn to_vec(&self) -> Vec<u8> {
        self.to_array().to_vec()
    }
}

/// Build a CID from a hash of an NMT node.
///
/// Fails with [`Error::InvalidNamespacedHashLength`] if the hash doesn't have
/// [`NAMESPACED_HASH_SIZE`] bytes.
pub fn cid_from_namespaced_sha256(namespaced_hash: &[u8]) -> Result<Cid> {
    if namespaced_hash.len() != NAMESPACED_HASH_SIZE {
        return Err(Error::InvalidNamespacedHashLength(namespaced_hash.len()));
    }

    let mh = Multihash::wrap(SHA256_NAMESPACE_FLAGGED, namespaced_hash)?;
    Ok(Cid::new_v1(NMT_CODEC, mh))
}

/// Build a CID from a hash of an NMT node, panicking on failure.
///
/// Reserved for hashes that are valid by construction, e.g. taken out of an
/// already verified tree. Use [`cid_from_namespaced_sha256`] for data of
/// external origin.
///
/// # Panics
///
/// Panics if the hash doesn't have [`NAMESPACED_HASH_SIZE`] bytes.
pub fn must_cid_from_namespaced_sha256(namespaced_hash: &[u8]) -> Cid {
    cid_from_namespaced_sha256(namespaced_hash)
        .unwrap_or_else(|e| panic!("malformed namespaced hash: {e}"))
}

/// Recover the raw namespaced hash from the given CID.
///
/// This is a pure slicing operation, the multihash prefix is stripped and the
/// digest is returned verbatim without any validation. Callers are expected
/// to only pass CIDs produced by [`cid_from_namespaced_sha256`] or otherwise
/// already trusted.
pub fn namespaced_sha256_from_cid(cid: &Cid) -> &[u8] {
    cid.hash().digest()
}
