//! Symbol statistics for adapting the probability model between frames.

use crate::probability::{COEF_BANDS, COEFF_CONTEXTS, UNCONSTRAINED_NODES};
use crate::transform::{PLANE_TYPES, PlaneType, REF_TYPES, TX_SIZES, TxSize};

/// The kinds of symbols that are counted per band and context.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CountToken {
    /// A zero token.
    Zero = 0,
    /// A value token of magnitude 1.
    One = 1,
    /// A value token of magnitude 2 or more.
    MoreThanOne = 2,
    /// An explicit end-of-block symbol.
    EndOfBlock = 3,
}

/// The token counts of one band and context, indexed by [`CountToken`].
pub type TokenCounts = [u32; UNCONSTRAINED_NODES + 1];

/// The token counts of one kind of block, indexed by band and context.
pub type CoefCounts = [[TokenCounts; COEFF_CONTEXTS]; COEF_BANDS];
/// The end-of-block node counts of one kind of block, indexed by band and
/// context.
pub type EobCounts = [[u32; COEFF_CONTEXTS]; COEF_BANDS];

/// Symbol statistics collected while decoding a frame.
///
/// Counting is enabled by handing the counts to
/// [`BlockDecoder::with_counts`](crate::BlockDecoder::with_counts). To
/// decode several tiles in parallel, give each worker its own counts and
/// [`merge`](Self::merge) them afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoefficientCounts {
    coef: Box<[[[CoefCounts; REF_TYPES]; PLANE_TYPES]; TX_SIZES]>,
    eob_branch: Box<[[[EobCounts; REF_TYPES]; PLANE_TYPES]; TX_SIZES]>,
}

impl Default for CoefficientCounts {
    fn default() -> Self {
        Self::new()
    }
}

impl CoefficientCounts {
    /// Create new counts, all set to zero.
    pub fn new() -> Self {
        Self {
            coef: Box::new([[[[[[0; UNCONSTRAINED_NODES + 1]; COEFF_CONTEXTS]; COEF_BANDS];
                REF_TYPES]; PLANE_TYPES]; TX_SIZES]),
            eob_branch: Box::new(
                [[[[[0; COEFF_CONTEXTS]; COEF_BANDS]; REF_TYPES]; PLANE_TYPES]; TX_SIZES],
            ),
        }
    }

    /// The token counts for one kind of block, indexed by band and context.
    pub fn coef(&self, tx_size: TxSize, plane_type: PlaneType, is_inter: bool) -> &CoefCounts {
        &self.coef[tx_size as usize][plane_type as usize][usize::from(is_inter)]
    }

    /// How often the end-of-block node was coded for one kind of block,
    /// indexed by band and context.
    pub fn eob_branch(&self, tx_size: TxSize, plane_type: PlaneType, is_inter: bool) -> &EobCounts {
        &self.eob_branch[tx_size as usize][plane_type as usize][usize::from(is_inter)]
    }

    /// Reset all counts to zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Add the counts of `other` to these counts.
    pub fn merge(&mut self, other: &Self) {
        let dst = self.coef.iter_mut().flatten().flatten().flatten().flatten();
        let src = other.coef.iter().flatten().flatten().flatten().flatten();

        for (dst, src) in dst.zip(src) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d += s;
            }
        }

        let dst = self.eob_branch.iter_mut().flatten().flatten().flatten().flatten();
        let src = other.eob_branch.iter().flatten().flatten().flatten().flatten();

        for (d, s) in dst.zip(src) {
            *d += s;
        }
    }

    /// The total number of counted symbols of the given kind.
    pub fn total(&self, token: CountToken) -> u64 {
        self.coef
            .iter()
            .flatten()
            .flatten()
            .flatten()
            .flatten()
            .map(|c| u64::from(c[token as usize]))
            .sum()
    }

    /// The total number of coded end-of-block nodes.
    pub fn total_eob_branch(&self) -> u64 {
        self.eob_branch
            .iter()
            .flatten()
            .flatten()
            .flatten()
            .flatten()
            .map(|&c| u64::from(c))
            .sum()
    }

    pub(crate) fn block_mut(
        &mut self,
        tx_size: TxSize,
        plane_type: PlaneType,
        is_inter: bool,
    ) -> BlockCounts<'_> {
        let (tx, pt, rt) = (tx_size as usize, plane_type as usize, usize::from(is_inter));

        BlockCounts {
            coef: &mut self.coef[tx][pt][rt],
            eob_branch: &mut self.eob_branch[tx][pt][rt],
        }
    }
}

/// The counts of the block currently being decoded.
pub(crate) struct BlockCounts<'a> {
    coef: &'a mut CoefCounts,
    eob_branch: &'a mut EobCounts,
}

/// A sink for symbol statistics.
///
/// Decoding is generic over this so that whether statistics are collected
/// is decided once per block instead of once per symbol.
pub(crate) trait TokenCounter {
    fn token(&mut self, band: usize, ctx: usize, token: CountToken);
    fn eob_branch(&mut self, band: usize, ctx: usize);
}

impl TokenCounter for () {
    #[inline(always)]
    fn token(&mut self, _: usize, _: usize, _: CountToken) {}

    #[inline(always)]
    fn eob_branch(&mut self, _: usize, _: usize) {}
}

impl TokenCounter for BlockCounts<'_> {
    #[inline(always)]
    fn token(&mut self, band: usize, ctx: usize, token: CountToken) {
        self.coef[band][ctx][token as usize] += 1;
    }

    #[inline(always)]
    fn eob_branch(&mut self, band: usize, ctx: usize) {
        self.eob_branch[band][ctx] += 1;
    }
}
