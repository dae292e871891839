//! IPLD representation of the [Namespaced Merkle Tree] used by Celestia.
//!
//! Nodes of the tree are addressed as blocks of a content-addressed DAG,
//! so that they can be fetched, verified, and traversed independently.
//! This crate provides the block encoding of inner and leaf nodes, the CID
//! scheme that embeds a namespaced hash in a multihash, and the translation
//! of data square coordinates into the CID of a row or column root.
//!
//! [Namespaced Merkle Tree]: https://github.com/celestiaorg/nmt

#![cfg_attr(docsrs, feature(doc_cfg))]

mod dah;
mod error;
pub mod nmt;
mod node;
mod translate;

pub use crate::dah::{AxisType, DataAvailabilityHeader};
pub use crate::error::{Error, Result};
pub use crate::node::{
    get_node, InnerNode, LeafNode, NmtNode, NodeStat, INNER_NODE_SIZE, LEAF_NODE_SIZE, SHARE_SIZE,
};
pub use crate::translate::{translate, translate_with_rng};
