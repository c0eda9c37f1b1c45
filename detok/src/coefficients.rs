//! Decoding the coefficient tokens of a single transform block.

use crate::category::{CategoryProbs, read_coeff};
use crate::context::coef_context;
use crate::counts::{CountToken, TokenCounter};
use crate::probability::{BandProbs, EOB_NODE, PIVOT_NODE, TokenDistribution, ZERO_NODE};
use crate::reader::SymbolReader;
use crate::scan::ScanOrder;
use crate::token::{CATEGORY_BASE, Token};
use crate::transform::{MAX_COEFFICIENTS, TxSize};

/// Everything that stays fixed while decoding one block.
pub(crate) struct CoefficientModel<'a> {
    pub(crate) tx_size: TxSize,
    pub(crate) probs: &'a BandProbs,
    pub(crate) distribution: &'a TokenDistribution,
    pub(crate) categories: &'a CategoryProbs,
    /// The quantizer steps of the first and all later coefficients.
    pub(crate) dequant: [i16; 2],
    /// The range dequantized coefficients are clamped to, if any.
    pub(crate) range: Option<(i32, i32)>,
}

/// Decode the tokens of one block, starting in context `ctx`.
///
/// Coefficients are written to their raster position in `dqcoeff`, positions
/// that decode as zero are left untouched. Returns the end-of-block
/// position, i.e. the number of decoded positions.
pub(crate) fn decode_coefs<R: SymbolReader, C: TokenCounter>(
    reader: &mut R,
    model: &CoefficientModel<'_>,
    scan_order: &ScanOrder,
    dqcoeff: &mut [i32],
    mut ctx: usize,
    counter: &mut C,
) -> usize {
    let max_eob = model.tx_size.max_eob();
    let band_translate = model.tx_size.band_translate();
    let shift = model.tx_size.dequant_shift();
    let scan = scan_order.scan();
    let neighbors = scan_order.neighbors();

    let mut token_cache = [0_u8; MAX_COEFFICIENTS];
    let mut dqv = model.dequant[0];
    let mut c = 0;

    while c < max_eob {
        let mut band = usize::from(band_translate[c]);
        let mut prob = &model.probs[band][ctx];

        counter.eob_branch(band, ctx);

        if !reader.read_bool(prob[EOB_NODE]) {
            counter.token(band, ctx, CountToken::EndOfBlock);
            break;
        }

        while !reader.read_bool(prob[ZERO_NODE]) {
            counter.token(band, ctx, CountToken::Zero);
            dqv = model.dequant[1];
            token_cache[usize::from(scan[c])] = 0;
            c += 1;

            // A run of zeros up to the end of the block has no end-of-block
            // symbol.
            if c >= max_eob {
                return c;
            }

            ctx = coef_context(neighbors, &token_cache, c);
            band = usize::from(band_translate[c]);
            prob = &model.probs[band][ctx];
        }

        let cdf = model.distribution.cdf(prob[PIVOT_NODE]);
        let token = Token::from_value_symbol(reader.read_symbol(cdf));

        let kind = if token == Token::One {
            CountToken::One
        } else {
            CountToken::MoreThanOne
        };
        counter.token(band, ctx, kind);

        let val = match token.category() {
            Some(cat) => CATEGORY_BASE[cat] + read_coeff(reader, model.categories.get(cat)),
            None => token as i32,
        };

        let v = (i64::from(val) * i64::from(dqv)) >> shift;
        let v = if reader.read_bool(128) { -v } else { v };

        let pos = usize::from(scan[c]);
        dqcoeff[pos] = store(v, model.range);
        token_cache[pos] = token.energy_class();
        c += 1;

        if c < max_eob {
            ctx = coef_context(neighbors, &token_cache, c);
        }

        dqv = model.dequant[1];
    }

    c
}

#[inline]
fn store(v: i64, range: Option<(i32, i32)>) -> i32 {
    match range {
        Some((min, max)) => {
            let clamped = v.clamp(i64::from(min), i64::from(max));

            if clamped != v {
                lwarn!("coefficient {v} out of range, clamped to {clamped}");
            }

            // In range of `i32` after clamping.
            clamped as i32
        }
        None => v as i32,
    }
}
