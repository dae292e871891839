use rand::Rng;

use crate::dah::DataAvailabilityHeader;
use crate::nmt::{must_cid_from_namespaced_sha256, Cid, NamespacedHashExt};

/// Transform coordinates of the data square into the CID of a row or a
/// column root, paired with the index locating the share under that root.
///
/// The orientation is chosen at random to spread fetching of the same share
/// evenly between the row and the column trees. Repeatedly walking only one
/// of them would concentrate the load on a single axis.
///
/// # Panics
///
/// Panics if `row` or `col` are not valid indices into the header roots.
pub fn translate(dah: &DataAvailabilityHeader, row: usize, col: usize) -> (Cid, usize) {
    translate_with_rng(dah, row, col, &mut rand::thread_rng())
}

/// [`translate`] with an explicit source of randomness.
pub fn translate_with_rng<R>(
    dah: &DataAvailabilityHeader,
    row: usize,
    col: usize,
    rng: &mut R,
) -> (Cid, usize)
where
    R: Rng + ?Sized,
{
    if rng.gen::<bool>() {
        let root = dah.column_roots[col].to_array();
        (must_cid_from_namespaced_sha256(&root), row)
    } else {
        let root = dah.row_roots[row].to_array();
        (must_cid_from_namespaced_sha256(&root), col)
    }
}
