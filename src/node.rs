//! NMT nodes and their DAG behavior.

use blockstore::Blockstore;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::nmt::{
    cid_from_namespaced_sha256, must_cid_from_namespaced_sha256, Cid, NAMESPACED_HASH_SIZE,
    NMT_CODEC, NS_SIZE, SHA256_NAMESPACE_FLAGGED,
};
use crate::{Error, Result};

/// Size of a share carried by a leaf node, in bytes.
pub const SHARE_SIZE: usize = 256;

/// Size of the block data of an inner node, the left hash followed by the right one.
pub const INNER_NODE_SIZE: usize = 2 * NAMESPACED_HASH_SIZE;

/// Size of the block data of a leaf node, the namespace followed by the share.
pub const LEAF_NODE_SIZE: usize = NS_SIZE + SHARE_SIZE;

// Nodes are classified by the size of their block data alone.
const _: () = assert!(INNER_NODE_SIZE != LEAF_NODE_SIZE);

/// A node of a Namespaced Merkle Tree carried in a DAG block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NmtNode {
    /// An inner node with two children.
    Inner(InnerNode),
    /// A leaf node carrying a share.
    Leaf(LeafNode),
}

/// An inner node of an NMT, concatenation of the hashes of its two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerNode {
    cid: Cid,
    data: [u8; INNER_NODE_SIZE],
}

/// A leaf node of an NMT, a share prefixed with its namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    cid: Cid,
    data: [u8; LEAF_NODE_SIZE],
}

/// Statistics of a DAG node.
///
/// NMT nodes intentionally report zeroed statistics, see [`NmtNode::stat`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeStat {
    /// Number of links the node carries.
    pub num_links: usize,
    /// Size of the block data.
    pub block_size: usize,
    /// Cumulative size of the subtree under the node.
    pub cumulative_size: usize,
}

impl NmtNode {
    /// Classify raw block data as an inner or a leaf node.
    ///
    /// The two node variants have distinct fixed sizes, so the classification
    /// is made on the data length alone. Any other length fails with
    /// [`Error::MalformedBlock`]. The provided `cid` is trusted to be the id
    /// of `data` and is never recomputed here.
    pub fn decode(cid: Cid, data: &[u8]) -> Result<NmtNode> {
        match data.len() {
            // lengths are checked, conversions cannot fail
            INNER_NODE_SIZE => Ok(NmtNode::Inner(InnerNode::new(cid, data.try_into().unwrap()))),
            LEAF_NODE_SIZE => Ok(NmtNode::Leaf(LeafNode::new(cid, data.try_into().unwrap()))),
            len => Err(Error::MalformedBlock(len)),
        }
    }

    /// The id of this node.
    pub fn cid(&self) -> &Cid {
        match self {
            NmtNode::Inner(node) => &node.cid,
            NmtNode::Leaf(node) => &node.cid,
        }
    }

    /// The raw block data of this node.
    pub fn data(&self) -> &[u8] {
        match self {
            NmtNode::Inner(node) => &node.data,
            NmtNode::Leaf(node) => &node.data,
        }
    }

    /// Ids of the children of this node, left then right. Empty for leaves.
    pub fn links(&self) -> Vec<Cid> {
        match self {
            NmtNode::Inner(node) => vec![
                must_cid_from_namespaced_sha256(node.left()),
                must_cid_from_namespaced_sha256(node.right()),
            ],
            NmtNode::Leaf(_) => Vec::new(),
        }
    }

    /// Resolve a path through this node.
    ///
    /// For an inner node the segment `"0"` resolves to the id of the left
    /// child and `"1"` to the id of the right one, paired with the remainder
    /// of the path. Any other segment, and any path on a leaf node, fails
    /// with [`Error::InvalidPath`].
    pub fn resolve<'a>(&self, path: &'a [&'a str]) -> Result<(Cid, &'a [&'a str])> {
        let NmtNode::Inner(node) = self else {
            return Err(Error::InvalidPath("leaf node has no children".to_string()));
        };

        match path.split_first() {
            Some((&"0", rest)) => Ok((cid_from_namespaced_sha256(node.left())?, rest)),
            Some((&"1", rest)) => Ok((cid_from_namespaced_sha256(node.right())?, rest)),
            Some((segment, _)) => Err(Error::InvalidPath(format!(
                "invalid path segment for inner node: {segment}"
            ))),
            None => Err(Error::InvalidPath("empty path".to_string())),
        }
    }

    /// List the paths within this node.
    ///
    /// Only the unrestricted listing is implemented for inner nodes and
    /// yields `["0", "1"]`; any path or depth restriction fails with
    /// [`Error::UnsupportedQuery`]. Leaf nodes have nothing to list.
    pub fn tree(&self, path: Option<&str>, depth: Option<usize>) -> Result<Vec<String>> {
        match self {
            NmtNode::Inner(_) => {
                if path.is_some() || depth.is_some() {
                    return Err(Error::UnsupportedQuery);
                }
                Ok(vec!["0".to_string(), "1".to_string()])
            }
            NmtNode::Leaf(_) => Ok(Vec::new()),
        }
    }

    /// Statistics of this node.
    ///
    /// Intentionally a zeroed passthrough, not a measurement of the block.
    pub fn stat(&self) -> NodeStat {
        NodeStat::default()
    }

    /// Size of this node.
    ///
    /// Intentionally a zeroed passthrough, like [`NmtNode::stat`].
    pub fn size(&self) -> u64 {
        0
    }
}

impl InnerNode {
    /// Create a new inner node from its block data.
    ///
    /// # Panics
    ///
    /// Panics if `cid` was not built for an NMT node. A mismatched id can
    /// only originate on the local write path, so it is a bug of the caller,
    /// not a data error.
    pub fn new(cid: Cid, data: [u8; INNER_NODE_SIZE]) -> Self {
        validate_nmt_cid(&cid);
        InnerNode { cid, data }
    }

    /// The namespaced hash of the left child.
    pub fn left(&self) -> &[u8] {
        &self.data[..NAMESPACED_HASH_SIZE]
    }

    /// The namespaced hash of the right child.
    pub fn right(&self) -> &[u8] {
        &self.data[NAMESPACED_HASH_SIZE..]
    }
}

impl LeafNode {
    /// Create a new leaf node from its block data.
    ///
    /// # Panics
    ///
    /// Panics if `cid` was not built for an NMT node, see [`InnerNode::new`].
    pub fn new(cid: Cid, data: [u8; LEAF_NODE_SIZE]) -> Self {
        validate_nmt_cid(&cid);
        LeafNode { cid, data }
    }

    /// The namespace of the share.
    pub fn namespace(&self) -> &[u8] {
        &self.data[..NS_SIZE]
    }

    /// The share payload.
    pub fn share(&self) -> &[u8] {
        &self.data[NS_SIZE..]
    }
}

fn validate_nmt_cid(cid: &Cid) {
    assert_eq!(cid.codec(), NMT_CODEC, "not a codec of an NMT node");
    assert_eq!(
        cid.hash().code(),
        SHA256_NAMESPACE_FLAGGED,
        "not a multihash code of an NMT node"
    );
}

/// Fetch a block from the blockstore and decode it as an NMT node.
///
/// A missing block is reported as [`Error::NotFound`], distinctly from other
/// blockstore failures, so that callers can fall back differently. Cancelling
/// the `token` aborts the fetch with [`Error::Cancelled`].
pub async fn get_node<B>(blockstore: &B, cid: &Cid, token: &CancellationToken) -> Result<NmtNode>
where
    B: Blockstore,
{
    trace!("Getting NMT node: {cid}");

    let Some(fetched) = token.run_until_cancelled(blockstore.get(cid)).await else {
        return Err(Error::Cancelled);
    };

    match fetched? {
        Some(data) => NmtNode::decode(*cid, &data),
        None => Err(Error::NotFound(*cid)),
    }
}

#[cfg(test)]
mod tests {
    use blockstore::InMemoryBlockstore;
    use cid::CidGeneric;
    use multihash::Multihash;
    use rstest::rstest;

    use super::*;
    use crate::nmt::namespaced_sha256_from_cid;

    fn inner_node_data() -> [u8; INNER_NODE_SIZE] {
        let mut data = [0u8; INNER_NODE_SIZE];
        data[..NAMESPACED_HASH_SIZE].fill(1);
        data[NAMESPACED_HASH_SIZE..].fill(2);
        data
    }

    fn leaf_node_data() -> [u8; LEAF_NODE_SIZE] {
        let mut data = [0u8; LEAF_NODE_SIZE];
        data[..NS_SIZE].fill(3);
        data[NS_SIZE..].fill(4);
        data
    }

    fn node_cid(data: &[u8]) -> Cid {
        // any well formed NMT cid will do, nodes trust the id they are given
        let mut hash = [0u8; NAMESPACED_HASH_SIZE];
        let len = data.len().min(NAMESPACED_HASH_SIZE);
        hash[..len].copy_from_slice(&data[..len]);
        must_cid_from_namespaced_sha256(&hash)
    }

    #[test]
    fn decode_inner_node() {
        let data = inner_node_data();
        let node = NmtNode::decode(node_cid(&data), &data).unwrap();

        let NmtNode::Inner(ref inner) = node else {
            panic!("expected an inner node");
        };
        assert_eq!(inner.left(), &[1; NAMESPACED_HASH_SIZE]);
        assert_eq!(inner.right(), &[2; NAMESPACED_HASH_SIZE]);
        assert_eq!(node.data(), &data);
    }

    #[test]
    fn decode_leaf_node() {
        let data = leaf_node_data();
        let node = NmtNode::decode(node_cid(&data), &data).unwrap();

        let NmtNode::Leaf(ref leaf) = node else {
            panic!("expected a leaf node");
        };
        assert_eq!(leaf.namespace(), &[3; NS_SIZE]);
        assert_eq!(leaf.share(), &[4; SHARE_SIZE]);
        assert_eq!(node.data(), &data);
    }

    #[rstest]
    #[case(0)]
    #[case(50)]
    #[case(INNER_NODE_SIZE - 1)]
    #[case(INNER_NODE_SIZE + 1)]
    #[case(LEAF_NODE_SIZE - 1)]
    #[case(LEAF_NODE_SIZE + 1)]
    fn decode_malformed_block(#[case] len: usize) {
        let data = vec![0u8; len];
        let err = NmtNode::decode(node_cid(&data), &data).unwrap_err();
        assert!(matches!(err, Error::MalformedBlock(l) if l == len));
    }

    #[test]
    fn inner_node_links() {
        let data = inner_node_data();
        let node = NmtNode::decode(node_cid(&data), &data).unwrap();

        let links = node.links();
        assert_eq!(links.len(), 2);
        assert_eq!(namespaced_sha256_from_cid(&links[0]), [1; NAMESPACED_HASH_SIZE]);
        assert_eq!(namespaced_sha256_from_cid(&links[1]), [2; NAMESPACED_HASH_SIZE]);
    }

    #[test]
    fn leaf_node_links() {
        let data = leaf_node_data();
        let node = NmtNode::decode(node_cid(&data), &data).unwrap();
        assert!(node.links().is_empty());
    }

    #[test]
    fn inner_node_resolve() {
        let data = inner_node_data();
        let node = NmtNode::decode(node_cid(&data), &data).unwrap();

        let path = ["0", "1", "0"];
        let (left, rest) = node.resolve(&path).unwrap();
        assert_eq!(left, must_cid_from_namespaced_sha256(&[1; NAMESPACED_HASH_SIZE]));
        assert_eq!(rest, ["1", "0"]);

        let path = ["1"];
        let (right, rest) = node.resolve(&path).unwrap();
        assert_eq!(right, must_cid_from_namespaced_sha256(&[2; NAMESPACED_HASH_SIZE]));
        assert!(rest.is_empty());

        let err = node.resolve(&["2"]).unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));

        let err = node.resolve(&[]).unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
    }

    #[test]
    fn leaf_node_resolve() {
        let data = leaf_node_data();
        let node = NmtNode::decode(node_cid(&data), &data).unwrap();

        for path in [&["0"][..], &["1"][..], &["0", "1"][..]] {
            let err = node.resolve(path).unwrap_err();
            assert!(matches!(err, Error::InvalidPath(_)));
        }
    }

    #[test]
    fn inner_node_tree() {
        let data = inner_node_data();
        let node = NmtNode::decode(node_cid(&data), &data).unwrap();

        assert_eq!(node.tree(None, None).unwrap(), ["0", "1"]);

        let err = node.tree(Some("0"), None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedQuery));

        let err = node.tree(None, Some(1)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedQuery));
    }

    #[test]
    fn leaf_node_tree() {
        let data = leaf_node_data();
        let node = NmtNode::decode(node_cid(&data), &data).unwrap();
        assert!(node.tree(None, None).unwrap().is_empty());
        assert!(node.tree(Some("0"), Some(1)).unwrap().is_empty());
    }

    #[test]
    fn stat_and_size_are_zeroed() {
        let data = inner_node_data();
        let node = NmtNode::decode(node_cid(&data), &data).unwrap();
        assert_eq!(node.stat(), NodeStat::default());
        assert_eq!(node.size(), 0);
    }

    #[test]
    fn clone_does_not_alias() {
        let data = inner_node_data();
        let node = NmtNode::decode(node_cid(&data), &data).unwrap();

        let copy = node.clone();
        assert_eq!(node, copy);
        assert_eq!(node.cid(), copy.cid());
        assert_ne!(node.data().as_ptr(), copy.data().as_ptr());
    }

    #[test]
    #[should_panic]
    fn mismatched_codec_is_a_bug() {
        let mh = Multihash::wrap(SHA256_NAMESPACE_FLAGGED, &[0; NAMESPACED_HASH_SIZE]).unwrap();
        let cid = CidGeneric::new_v1(0x70, mh);
        InnerNode::new(cid, inner_node_data());
    }

    #[test]
    #[should_panic]
    fn mismatched_multihash_code_is_a_bug() {
        let mh = Multihash::wrap(0x12, &[0; 32]).unwrap();
        let cid = CidGeneric::<NAMESPACED_HASH_SIZE>::new_v1(NMT_CODEC, mh);
        LeafNode::new(cid, leaf_node_data());
    }

    #[tokio::test]
    async fn get_node_inner() {
        let store = InMemoryBlockstore::<NAMESPACED_HASH_SIZE>::new();
        let data = inner_node_data();
        let cid = node_cid(&data);
        store.put_keyed(&cid, &data).await.unwrap();

        let node = get_node(&store, &cid, &CancellationToken::new())
            .await
            .unwrap();
        assert!(matches!(node, NmtNode::Inner(_)));
        assert_eq!(node.cid(), &cid);
        assert_eq!(node.data(), &data);
    }

    #[tokio::test]
    async fn get_node_not_found() {
        let store = InMemoryBlockstore::<NAMESPACED_HASH_SIZE>::new();
        let cid = node_cid(&[]);

        let err = get_node(&store, &cid, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(c) if c == cid));
    }

    #[tokio::test]
    async fn get_node_malformed_block() {
        let store = InMemoryBlockstore::<NAMESPACED_HASH_SIZE>::new();
        let data = [7u8; 50];
        let cid = node_cid(&data);
        store.put_keyed(&cid, &data).await.unwrap();

        let err = get_node(&store, &cid, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedBlock(50)));
    }

    #[tokio::test]
    async fn get_node_cancelled() {
        let store = InMemoryBlockstore::<NAMESPACED_HASH_SIZE>::new();
        let data = inner_node_data();
        let cid = node_cid(&data);
        store.put_keyed(&cid, &data).await.unwrap();

        let token = CancellationToken::new();
        token.cancel();

        let err = get_node(&store, &cid, &token).await.unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }
}
