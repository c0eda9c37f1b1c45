//! Deriving the probability context of a coefficient position.

use crate::transform::TxSize;

/// The context of the first position of a block, derived from the entropy
/// flags of the neighboring blocks above and to the left.
///
/// Both slices must cover at least the extent of the transform block. The
/// result is in the range `0..=2`.
#[inline]
pub fn entropy_context(tx_size: TxSize, above: &[u8], left: &[u8]) -> usize {
    let n = tx_size.size_in_blocks();
    let has_nonzero = |ctx: &[u8]| usize::from(ctx[..n].iter().any(|&flag| flag != 0));

    has_nonzero(above) + has_nonzero(left)
}

/// The context of decode position `c`, derived from the energy classes of
/// its two neighbors.
///
/// The result is in the range `0..=5`.
#[inline]
pub fn coef_context(neighbors: &[u16], token_cache: &[u8], c: usize) -> usize {
    let a = token_cache[usize::from(neighbors[2 * c])];
    let b = token_cache[usize::from(neighbors[2 * c + 1])];

    (1 + usize::from(a) + usize::from(b)) >> 1
}
