//! Decoding the tokens of a transform block within a plane.

use crate::DecodeSettings;
use crate::category::CategoryProbs;
use crate::coefficients::{CoefficientModel, decode_coefs};
use crate::context::entropy_context;
use crate::counts::CoefficientCounts;
use crate::edge::{BlockEdges, set_contexts};
use crate::probability::{CoefficientProbs, TokenDistribution};
use crate::reader::SymbolReader;
use crate::scan::ScanOrder;
use crate::transform::{MAX_COEFFICIENTS, MAX_SEGMENTS, PlaneType, TxSize};

/// The decoding state of one plane.
#[derive(Clone, Debug)]
pub struct PlaneState {
    /// The type of the plane.
    pub plane_type: PlaneType,
    /// The horizontal subsampling shift.
    pub subsampling_x: u8,
    /// The vertical subsampling shift.
    pub subsampling_y: u8,
    /// The quantizer steps (first coefficient, later coefficients) of each
    /// segment.
    pub seg_dequant: [[i16; 2]; MAX_SEGMENTS],
    /// The coefficients of the most recently decoded transform block, in
    /// raster order.
    pub dqcoeff: Box<[i32; MAX_COEFFICIENTS]>,
    /// One entropy flag per 4x4 column of the plane.
    ///
    /// The array extends past the visible width up to the next multiple of
    /// the largest transform size, so that transform blocks overhanging the
    /// right edge of the frame stay within it. Flags past the visible edge
    /// are always zero.
    pub above_context: Vec<u8>,
    /// One entropy flag per 4x4 row of the plane, padded like
    /// [`above_context`](Self::above_context).
    pub left_context: Vec<u8>,
    above_origin: usize,
    left_origin: usize,
    n4_w: usize,
    n4_h: usize,
}

impl PlaneState {
    /// Create the state of a plane whose visible area is `width_4x4` by
    /// `height_4x4` units of 4x4 samples.
    ///
    /// The entropy contexts start out cleared and every segment uses a
    /// quantizer step of 1.
    pub fn new(
        plane_type: PlaneType,
        subsampling_x: u8,
        subsampling_y: u8,
        width_4x4: usize,
        height_4x4: usize,
    ) -> Self {
        let aligned = |units: usize| units.next_multiple_of(TxSize::Tx32x32.size_in_blocks());

        Self {
            plane_type,
            subsampling_x,
            subsampling_y,
            seg_dequant: [[1; 2]; MAX_SEGMENTS],
            dqcoeff: Box::new([0; MAX_COEFFICIENTS]),
            above_context: vec![0; aligned(width_4x4)],
            left_context: vec![0; aligned(height_4x4)],
            above_origin: 0,
            left_origin: 0,
            n4_w: width_4x4,
            n4_h: height_4x4,
        }
    }

    /// Position the plane on a new block.
    ///
    /// `above_offset` and `left_offset` are the position of the block in
    /// the entropy contexts, `n4_w` and `n4_h` its size in the plane, all in
    /// 4x4 units.
    pub fn set_block(&mut self, above_offset: usize, left_offset: usize, n4_w: usize, n4_h: usize) {
        self.above_origin = above_offset;
        self.left_origin = left_offset;
        self.n4_w = n4_w;
        self.n4_h = n4_h;
    }

    /// Reset the coefficients of a transform block to zero so that the
    /// buffer can be reused.
    pub fn clear_coefficients(&mut self, tx_size: TxSize) {
        self.dqcoeff[..tx_size.max_eob()].fill(0);
    }

    /// Clear the above and left entropy contexts, as is done at the start of
    /// a frame or tile.
    pub fn reset_contexts(&mut self) {
        self.above_context.fill(0);
        self.left_context.fill(0);
    }
}

/// The properties of the block that is currently being decoded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockInfo {
    /// Whether the block uses inter prediction.
    pub is_inter: bool,
    /// The distance from the right edge of the block to the right edge of
    /// the frame, in 1/8 luma samples.
    pub mb_to_right_edge: i32,
    /// The distance from the bottom edge of the block to the bottom edge of
    /// the frame, in 1/8 luma samples.
    pub mb_to_bottom_edge: i32,
}

/// A decoder for the coefficient tokens of the transform blocks of a frame.
pub struct BlockDecoder<'a> {
    probs: &'a CoefficientProbs,
    distribution: &'a TokenDistribution,
    categories: CategoryProbs,
    range: Option<(i32, i32)>,
    planes: Vec<PlaneState>,
    block: BlockInfo,
    counts: Option<&'a mut CoefficientCounts>,
}

impl<'a> BlockDecoder<'a> {
    /// Create a new decoder.
    pub fn new(
        settings: DecodeSettings,
        probs: &'a CoefficientProbs,
        distribution: &'a TokenDistribution,
        planes: Vec<PlaneState>,
    ) -> Self {
        ldebug!(
            "decoding coefficients with {} bits per sample, clamping: {}",
            settings.bit_depth.bits(),
            settings.clamp_coefficients
        );

        Self {
            probs,
            distribution,
            categories: CategoryProbs::for_bit_depth(settings.bit_depth),
            range: settings
                .clamp_coefficients
                .then(|| settings.bit_depth.coefficient_range()),
            planes,
            block: BlockInfo::default(),
            counts: None,
        }
    }

    /// Collect symbol statistics into `counts` while decoding.
    pub fn with_counts(mut self, counts: &'a mut CoefficientCounts) -> Self {
        self.counts = Some(counts);
        self
    }

    /// Set the properties of the block whose transform blocks are decoded
    /// next.
    pub fn set_block_info(&mut self, info: BlockInfo) {
        self.block = info;
    }

    /// The state of a plane.
    pub fn plane(&self, plane: usize) -> &PlaneState {
        &self.planes[plane]
    }

    /// The mutable state of a plane.
    pub fn plane_mut(&mut self, plane: usize) -> &mut PlaneState {
        &mut self.planes[plane]
    }

    /// Consume the decoder and return the plane states.
    pub fn into_planes(self) -> Vec<PlaneState> {
        self.planes
    }

    /// Decode the tokens of one transform block.
    ///
    /// `x` and `y` are the position of the transform block within the
    /// current block in 4x4 units. The coefficients are written to the
    /// plane's coefficient buffer, which needs to be cleared by the caller
    /// beforehand (see [`PlaneState::clear_coefficients`]). Returns the
    /// end-of-block position, i.e. the number of decoded positions, which is
    /// at most the number of coefficients in the transform block.
    ///
    /// The transform block must start inside of the visible plane, but may
    /// extend past its right and bottom edges.
    ///
    /// Panics if the scan order was made for a different transform size.
    pub fn decode_block_tokens<R: SymbolReader>(
        &mut self,
        plane: usize,
        scan: &ScanOrder,
        x: usize,
        y: usize,
        tx_size: TxSize,
        reader: &mut R,
        seg_id: usize,
    ) -> usize {
        assert_eq!(scan.tx_size(), tx_size, "scan order doesn't match transform size");

        let info = self.block;
        let pd = &mut self.planes[plane];
        let (above_origin, left_origin) = (pd.above_origin, pd.left_origin);

        let ctx = entropy_context(
            tx_size,
            &pd.above_context[above_origin + x..],
            &pd.left_context[left_origin + y..],
        );

        let model = CoefficientModel {
            tx_size,
            probs: self.probs.get(tx_size, pd.plane_type, info.is_inter),
            distribution: self.distribution,
            categories: &self.categories,
            dequant: pd.seg_dequant[seg_id],
            range: self.range,
        };

        let dqcoeff = &mut pd.dqcoeff[..];
        let eob = match self.counts.as_deref_mut() {
            Some(counts) => {
                let mut counter = counts.block_mut(tx_size, pd.plane_type, info.is_inter);
                decode_coefs(reader, &model, scan, dqcoeff, ctx, &mut counter)
            }
            None => decode_coefs(reader, &model, scan, dqcoeff, ctx, &mut ()),
        };

        ltrace!("plane {plane}, {tx_size:?} at ({x}, {y}): {eob} coefficients");

        let edges = BlockEdges {
            n4_w: pd.n4_w,
            n4_h: pd.n4_h,
            mb_to_right_edge: info.mb_to_right_edge,
            mb_to_bottom_edge: info.mb_to_bottom_edge,
            subsampling_x: pd.subsampling_x,
            subsampling_y: pd.subsampling_y,
        };

        set_contexts(
            &mut pd.above_context[above_origin..],
            &mut pd.left_context[left_origin..],
            x,
            y,
            tx_size,
            eob > 0,
            &edges,
        );

        eob
    }
}
