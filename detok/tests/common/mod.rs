//! A token encoder and a generator of random blocks, shared by the round-trip
//! suite and the benchmarks.
//!
//! The encoder mirrors the decoding process step by step: it walks the
//! positions of a block in scan order, tracks the token cache to derive the
//! context of each position and writes every decision with the probability
//! the decoder will use to read it.

#![allow(dead_code)]

use detok::{
    AnsWriter, BitDepth, CATEGORY_BASE, CategoryProbs, CoefficientProbs, EOB_NODE,
    MAX_COEFFICIENTS, PIVOT_NODE, PlaneType, ScanOrder, Token, TokenDistribution, TxSize,
    ZERO_NODE, coef_context,
};

/// A small deterministic random number generator, so that every case can be
/// reproduced from its seed.
pub(crate) struct Lcg(u64);

impl Lcg {
    const MUL: u64 = 6364136223846793005;
    const INC: u64 = 1442695040888963407;

    pub(crate) fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(Self::MUL).wrapping_add(Self::INC))
    }

    /// 31 random bits.
    pub(crate) fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(Self::MUL).wrapping_add(Self::INC);
        (self.0 >> 33) as u32
    }

    pub(crate) fn below(&mut self, n: u32) -> u32 {
        self.next_u32() % n
    }

    pub(crate) fn chance(&mut self, p: f64) -> bool {
        f64::from(self.next_u32()) / f64::from(1_u32 << 31) < p
    }
}

/// A probability model with random (non-zero) node probabilities.
pub(crate) fn random_probs(seed: u64) -> CoefficientProbs {
    let mut rng = Lcg::new(seed ^ 0x5eed);

    CoefficientProbs::from_fn(|_, _, _, _, _| {
        [
            1 + rng.below(255) as u8,
            1 + rng.below(255) as u8,
            1 + rng.below(255) as u8,
        ]
    })
    .unwrap()
}

/// How the quantized levels of generated blocks are distributed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BlockShape {
    /// The probability of a position before the last non-zero one being
    /// non-zero.
    pub(crate) density: f64,
    /// The probability of a block having no non-zero coefficient at all.
    pub(crate) empty: f64,
    /// The probability of a non-zero level using a category 6 token.
    pub(crate) large: f64,
}

/// Generate the quantized levels of a block, in raster order.
pub(crate) fn random_levels(
    rng: &mut Lcg,
    scan: &ScanOrder,
    bit_depth: BitDepth,
    shape: BlockShape,
) -> Vec<i32> {
    let max_eob = scan.tx_size().max_eob();
    let mut levels = vec![0; max_eob];

    if rng.chance(shape.empty) {
        return levels;
    }

    // Favor short blocks, as real content does.
    let last = (rng.below(max_eob as u32) * rng.below(max_eob as u32) / max_eob as u32) as usize;
    let cat6_range = 1_u32 << bit_depth.cat6_bits().min(20);

    for (c, &pos) in scan.scan()[..=last].iter().enumerate() {
        if c != last && !rng.chance(shape.density) {
            continue;
        }

        let magnitude = if rng.chance(shape.large) {
            CATEGORY_BASE[5] as u32 + rng.below(cat6_range)
        } else {
            match rng.below(10) {
                0..=5 => 1,
                6 | 7 => 2 + rng.below(3),
                _ => 5 + rng.below(62),
            }
        };

        let sign = if rng.chance(0.5) { -1 } else { 1 };
        levels[usize::from(pos)] = sign * magnitude as i32;
    }

    levels
}

/// Split a magnitude into its token and the value of the extra bits.
pub(crate) fn tokenize(magnitude: u32) -> (Token, u32) {
    match magnitude {
        1..=4 => (Token::VALUES[magnitude as usize - 1], 0),
        _ => {
            let cat = CATEGORY_BASE
                .iter()
                .rposition(|&base| base as u32 <= magnitude)
                .unwrap();

            (Token::VALUES[4 + cat], magnitude - CATEGORY_BASE[cat] as u32)
        }
    }
}

/// The symbols an encoder has written, by kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TokenStats {
    pub(crate) zero_tokens: u64,
    pub(crate) value_tokens: u64,
    pub(crate) eob_tokens: u64,
    pub(crate) eob_branches: u64,
}

/// The parameters of one block to encode.
pub(crate) struct BlockParams<'a> {
    pub(crate) scan: &'a ScanOrder,
    pub(crate) plane_type: PlaneType,
    pub(crate) is_inter: bool,
    pub(crate) ctx: usize,
    /// Code trailing zeros up to the end of the block instead of an
    /// end-of-block symbol.
    pub(crate) pad_with_zeros: bool,
}

pub(crate) struct TokenEncoder<'a> {
    writer: AnsWriter,
    probs: &'a CoefficientProbs,
    distribution: &'a TokenDistribution,
    categories: CategoryProbs,
    pub(crate) stats: TokenStats,
}

impl<'a> TokenEncoder<'a> {
    pub(crate) fn new(
        probs: &'a CoefficientProbs,
        distribution: &'a TokenDistribution,
        bit_depth: BitDepth,
    ) -> Self {
        Self {
            writer: AnsWriter::new(),
            probs,
            distribution,
            categories: CategoryProbs::for_bit_depth(bit_depth),
            stats: TokenStats::default(),
        }
    }

    /// Encode the levels of one block and return the end-of-block position
    /// the decoder will report.
    pub(crate) fn encode_block(&mut self, params: &BlockParams<'_>, levels: &[i32]) -> usize {
        let tx_size = params.scan.tx_size();
        let max_eob = tx_size.max_eob();
        let bands = tx_size.band_translate();
        let probs = self.probs.get(tx_size, params.plane_type, params.is_inter);
        let scan = params.scan.scan();
        let neighbors = params.scan.neighbors();

        let last = scan
            .iter()
            .rposition(|&pos| levels[usize::from(pos)] != 0)
            .map_or(0, |c| c + 1);
        let end = if params.pad_with_zeros { max_eob } else { last };

        let mut token_cache = [0_u8; MAX_COEFFICIENTS];
        let mut ctx = params.ctx;
        let mut c = 0;

        while c < end {
            let mut prob = &probs[usize::from(bands[c])][ctx];
            self.stats.eob_branches += 1;
            self.writer.write_bool(true, prob[EOB_NODE]);

            while levels[usize::from(scan[c])] == 0 {
                self.writer.write_bool(false, prob[ZERO_NODE]);
                self.stats.zero_tokens += 1;
                token_cache[usize::from(scan[c])] = 0;
                c += 1;

                if c == max_eob {
                    return c;
                }

                ctx = coef_context(neighbors, &token_cache, c);
                prob = &probs[usize::from(bands[c])][ctx];
            }

            let pos = usize::from(scan[c]);
            let level = levels[pos];
            let (token, extra) = tokenize(level.unsigned_abs());

            self.writer.write_bool(true, prob[ZERO_NODE]);
            self.writer
                .write_symbol(self.distribution.cdf(prob[PIVOT_NODE]), token as usize - 1);

            if let Some(cat) = token.category() {
                let bit_probs = self.categories.get(cat);

                for (i, &p) in bit_probs.iter().enumerate() {
                    let bit = (extra >> (bit_probs.len() - 1 - i)) & 1 != 0;
                    self.writer.write_bool(bit, p);
                }
            }

            self.writer.write_bool(level < 0, 128);
            self.stats.value_tokens += 1;

            token_cache[pos] = token.energy_class();
            c += 1;

            if c < max_eob {
                ctx = coef_context(neighbors, &token_cache, c);
            }
        }

        if c < max_eob {
            self.stats.eob_branches += 1;
            self.stats.eob_tokens += 1;
            self.writer
                .write_bool(false, probs[usize::from(bands[c])][ctx][EOB_NODE]);
        }

        c
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.writer.finish()
    }
}

/// The coefficients the decoder should produce for the given levels.
pub(crate) fn dequantize(
    levels: &[i32],
    scan: &ScanOrder,
    dequant: [i16; 2],
    range: Option<(i32, i32)>,
) -> Vec<i32> {
    let shift = scan.tx_size().dequant_shift();
    let mut coefficients = vec![0; levels.len()];

    for (c, &pos) in scan.scan().iter().enumerate() {
        let pos = usize::from(pos);
        let level = levels[pos];

        if level == 0 {
            continue;
        }

        let step = if c == 0 { dequant[0] } else { dequant[1] };
        let magnitude = (i64::from(level.unsigned_abs()) * i64::from(step)) >> shift;
        let value = if level < 0 { -magnitude } else { magnitude };

        coefficients[pos] = match range {
            Some((min, max)) => value.clamp(i64::from(min), i64::from(max)) as i32,
            None => value as i32,
        };
    }

    coefficients
}

/// A transform size from its name, e.g. `8x8`.
pub(crate) fn tx_size_from_name(name: &str) -> Option<TxSize> {
    TxSize::ALL
        .into_iter()
        .find(|tx| format!("{0}x{0}", tx.width()) == name)
}
