/*!
A memory-safe, pure-Rust decoder for the coefficient tokens of transform
blocks.

`detok` reconstructs the dequantized transform coefficients of a block from
an entropy-coded stream of tokens, in the style of the VP9/VP10 family of
video codecs. Each position of a block is coded as an end-of-block flag, a
zero flag and a value token drawn from a distribution selected by a "pivot"
probability, followed by the extra bits of large values and a sign. The
probability of each decision depends on the transform size, the plane, the
reference type, the band of the position and a context derived from
neighboring coefficients and blocks.

The crate also keeps track of the above and left entropy contexts that carry
the "has non-zero coefficients" state from one block to the next.

# Example
```rust,no_run
use detok::{
    BlockDecoder, BlockInfo, CoefficientProbs, DecodeSettings, PlaneState, PlaneType,
    ScanOrder, TokenDistribution, TxSize, open_stream,
};

let data = std::fs::read("tile.bin").unwrap();
let mut reader = open_stream(&data).unwrap();

let probs = CoefficientProbs::uniform([128, 128, 128]).unwrap();
let distribution = TokenDistribution::pareto();
let planes = vec![PlaneState::new(PlaneType::Y, 0, 0, 16, 16)];
let mut decoder = BlockDecoder::new(DecodeSettings::default(), &probs, &distribution, planes);

let scan = ScanOrder::default_for(TxSize::Tx8x8);
decoder.plane_mut(0).set_block(0, 0, 2, 2);
decoder.set_block_info(BlockInfo::default());

let eob = decoder.decode_block_tokens(0, &scan, 0, 0, TxSize::Tx8x8, &mut reader, 0);
println!("{eob} coefficients, DC = {}", decoder.plane(0).dqcoeff[0]);
```

# Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

#[macro_use]
mod log;

mod block;
mod category;
mod coefficients;
mod context;
mod counts;
mod edge;
pub mod error;
mod probability;
mod reader;
mod scan;
mod token;
mod transform;

pub use block::{BlockDecoder, BlockInfo, PlaneState};
pub use category::{BitDepth, CategoryProbs, read_coeff};
pub use context::{coef_context, entropy_context};
pub use counts::{CoefCounts, CoefficientCounts, CountToken, EobCounts, TokenCounts};
pub use detok_common::ans::{AnsDecoder, AnsWriter};
pub use edge::{BlockEdges, set_contexts};
pub use error::{DecodeError, Result, SettingsError, StreamError, TableError};
pub use probability::{
    BandProbs, COEF_BANDS, COEFF_CONTEXTS, CoefficientProbs, EOB_NODE, NodeProbs, PIVOT_NODE,
    PIVOT_VALUES, ProbTable, TokenCdf, TokenDistribution, UNCONSTRAINED_NODES, ZERO_NODE,
};
pub use reader::SymbolReader;
pub use scan::{ScanKind, ScanOrder};
pub use token::{CATEGORY_BASE, Token, VALUE_TOKENS};
pub use transform::{
    MAX_COEFFICIENTS, MAX_PLANES, MAX_SEGMENTS, PLANE_TYPES, PlaneType, REF_TYPES, TX_SIZES,
    TxSize,
};

use crate::error::err;

/// Settings that apply to a whole decode session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeSettings {
    /// The bit depth of the decoded samples, which determines the width of
    /// category 6 tokens and the valid coefficient range.
    pub bit_depth: BitDepth,
    /// Whether to clamp dequantized coefficients to the valid range of the
    /// bit depth instead of passing them through unchecked.
    ///
    /// A coefficient outside of the range can only result from a corrupt
    /// or non-conforming stream. Clamping keeps the output usable in that
    /// case.
    pub clamp_coefficients: bool,
}

/// Open an entropy-coded token stream.
pub fn open_stream(data: &[u8]) -> Result<AnsDecoder<'_>> {
    if data.is_empty() {
        return err!(StreamError::Empty);
    }

    match AnsDecoder::new(data) {
        Some(decoder) => Ok(decoder),
        None => {
            lwarn!("invalid coder state in stream of {} bytes", data.len());
            err!(StreamError::InvalidState)
        }
    }
}
