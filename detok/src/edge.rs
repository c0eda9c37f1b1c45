//! Recording which blocks had non-zero coefficients for later blocks.

use crate::transform::TxSize;

/// The position of the current block relative to the visible frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockEdges {
    /// The width of the block in the plane, in 4x4 units.
    pub n4_w: usize,
    /// The height of the block in the plane, in 4x4 units.
    pub n4_h: usize,
    /// The distance from the right edge of the block to the right edge of
    /// the frame, in 1/8 luma samples. Negative if the block extends past the
    /// frame.
    pub mb_to_right_edge: i32,
    /// The distance from the bottom edge of the block to the bottom edge of
    /// the frame, in 1/8 luma samples.
    pub mb_to_bottom_edge: i32,
    /// The horizontal subsampling shift of the plane.
    pub subsampling_x: u8,
    /// The vertical subsampling shift of the plane.
    pub subsampling_y: u8,
}

/// Store whether a transform block has non-zero coefficients in the above and
/// left entropy contexts.
///
/// `above` and `left` start at the origin of the enclosing block, `aoff` and
/// `loff` are the offsets of the transform block in 4x4 units. Units outside
/// of the visible frame are always cleared.
pub fn set_contexts(
    above: &mut [u8],
    left: &mut [u8],
    aoff: usize,
    loff: usize,
    tx_size: TxSize,
    has_eob: bool,
    edges: &BlockEdges,
) {
    let n = tx_size.size_in_blocks();

    let wide = visible_units(edges.n4_w, edges.mb_to_right_edge, edges.subsampling_x, aoff, n);
    fill(&mut above[aoff..aoff + n], has_eob, wide);

    let high = visible_units(edges.n4_h, edges.mb_to_bottom_edge, edges.subsampling_y, loff, n);
    fill(&mut left[loff..loff + n], has_eob, high);
}

/// The number of the `n` units starting at `offset` that are inside of the
/// frame.
fn visible_units(extent: usize, to_edge: i32, subsampling: u8, offset: usize, n: usize) -> usize {
    if to_edge >= 0 {
        return n;
    }

    // Arithmetic shift, rounding towards negative infinity.
    let blocks = extent as i64 + i64::from(to_edge >> (5 + subsampling));

    (blocks - offset as i64).clamp(0, n as i64) as usize
}

fn fill(ctx: &mut [u8], has_eob: bool, visible: usize) {
    let (inside, outside) = ctx.split_at_mut(visible);
    inside.fill(u8::from(has_eob));
    outside.fill(0);
}
