use crate::nmt::{Cid, NAMESPACED_HASH_SIZE};

/// Alias for a `Result` with the error type [`celestia_ipld::Error`].
///
/// [`celestia_ipld::Error`]: crate::Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Representation of all the errors that can occur when interacting with [`celestia_ipld`].
///
/// [`celestia_ipld`]: crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Block carries data of a size that is neither an inner nor a leaf node.
    #[error("Wrong sized data carried in block: {0}")]
    MalformedBlock(usize),

    /// Resolution path doesn't point to a child of the node.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Tree listing was queried with a path or depth restriction.
    #[error("Tree listing with path or depth restrictions is not implemented")]
    UnsupportedQuery,

    /// Namespaced hash has an invalid length.
    #[error("Invalid namespaced hash length: {0}, expected: {NAMESPACED_HASH_SIZE}")]
    InvalidNamespacedHashLength(usize),

    /// Block does not exist in the blockstore.
    #[error("Block not found: {0}")]
    NotFound(Cid),

    /// An error propagated from the blockstore.
    #[error(transparent)]
    Blockstore(#[from] blockstore::Error),

    /// Block retrieval was cancelled before completion.
    #[error("Block retrieval was cancelled")]
    Cancelled,

    /// An error propagated from the [`multihash`] crate.
    #[error(transparent)]
    Multihash(#[from] multihash::Error),
}
