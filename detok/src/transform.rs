//! Transform block geometry.

/// The number of coefficient positions in the largest transform block.
pub const MAX_COEFFICIENTS: usize = 32 * 32;
/// The number of supported transform sizes.
pub const TX_SIZES: usize = 4;
/// The number of plane types (luma and chroma).
pub const PLANE_TYPES: usize = 2;
/// The number of reference types (intra and inter).
pub const REF_TYPES: usize = 2;
/// The maximum number of planes of a frame.
pub const MAX_PLANES: usize = 3;
/// The maximum number of segments, each selecting its own quantizer.
pub const MAX_SEGMENTS: usize = 8;

/// The size of a square transform block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TxSize {
    /// A 4x4 transform.
    Tx4x4 = 0,
    /// An 8x8 transform.
    Tx8x8 = 1,
    /// A 16x16 transform.
    Tx16x16 = 2,
    /// A 32x32 transform.
    Tx32x32 = 3,
}

impl TxSize {
    /// All transform sizes, from smallest to largest.
    pub const ALL: [Self; TX_SIZES] = [Self::Tx4x4, Self::Tx8x8, Self::Tx16x16, Self::Tx32x32];

    /// The number of coefficient positions in a block of this size, which
    /// is also the largest possible end-of-block position.
    #[inline]
    pub fn max_eob(self) -> usize {
        16 << ((self as usize) << 1)
    }

    /// The width (and height) of the block in 4x4 units.
    #[inline]
    pub fn size_in_blocks(self) -> usize {
        1 << (self as usize)
    }

    /// The width (and height) of the block in samples.
    #[inline]
    pub fn width(self) -> usize {
        4 << (self as usize)
    }

    /// The extra right shift applied after dequantization.
    #[inline]
    pub fn dequant_shift(self) -> u32 {
        u32::from(self == Self::Tx32x32)
    }

    /// The mapping from scan position to coefficient band.
    #[inline]
    pub fn band_translate(self) -> &'static [u8] {
        match self {
            Self::Tx4x4 => &BAND_TRANSLATE_4X4,
            _ => &BAND_TRANSLATE_8X8_PLUS[..self.max_eob()],
        }
    }
}

/// The type of a plane, selecting one half of the probability model.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlaneType {
    /// The luma plane.
    Y = 0,
    /// Both chroma planes.
    Uv = 1,
}

#[rustfmt::skip]
static BAND_TRANSLATE_4X4: [u8; 16] = [
    0, 1, 1, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 5, 5, 5,
];

static BAND_TRANSLATE_8X8_PLUS: [u8; MAX_COEFFICIENTS] = {
    let head = [0, 1, 1, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 4];
    let mut table = [5; MAX_COEFFICIENTS];
    let mut i = 0;

    while i < head.len() {
        table[i] = head[i];
        i += 1;
    }

    table
};
