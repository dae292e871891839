use serde::{Deserialize, Serialize};

use crate::nmt::NamespacedHash;

/// Represents either a row or a column of the data square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisType {
    /// A row of the data square.
    Row = 0,
    /// A column of the data square.
    Col,
}

/// Header with commitments of the data availability.
///
/// It consists of the root hashes of the merkle trees created from each
/// row and column of the extended data square. Those are used to prove
/// the inclusion of the data in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataAvailabilityHeader {
    /// Merkle roots of the extended data square rows.
    pub row_roots: Vec<NamespacedHash>,
    /// Merkle roots of the extended data square columns.
    pub column_roots: Vec<NamespacedHash>,
}

impl DataAvailabilityHeader {
    /// Get the root from an axis at the given index.
    pub fn root(&self, axis: AxisType, index: usize) -> Option<NamespacedHash> {
        match axis {
            AxisType::Row => self.row_root(index),
            AxisType::Col => self.column_root(index),
        }
    }

    /// Get a root of the row with the given index.
    pub fn row_root(&self, row: usize) -> Option<NamespacedHash> {
        self.row_roots.get(row).cloned()
    }

    /// Get a root of the column with the given index.
    pub fn column_root(&self, column: usize) -> Option<NamespacedHash> {
        self.column_roots.get(column).cloned()
    }

    /// Get the width of the data square for which this header was built.
    pub fn square_len(&self) -> usize {
        self.row_roots.len()
    }
}
