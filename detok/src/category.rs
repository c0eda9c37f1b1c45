//! Reading the extra bits of category tokens.

use crate::error::{Result, SettingsError, bail};
use crate::reader::SymbolReader;

/// The bit depth of the decoded samples.
///
/// The bit depth is fixed for a whole decode session and determines how many
/// extra bits a [`Category6`](crate::Token::Category6) token carries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// 8 bits per sample.
    #[default]
    Eight,
    /// 10 bits per sample.
    Ten,
    /// 12 bits per sample.
    Twelve,
}

impl BitDepth {
    /// Resolve a bit depth from the number of bits per sample.
    pub fn from_bits(bits: u8) -> Result<Self> {
        Ok(match bits {
            8 => Self::Eight,
            10 => Self::Ten,
            12 => Self::Twelve,
            _ => bail!(SettingsError::UnsupportedBitDepth(bits)),
        })
    }

    /// The number of bits per sample.
    pub fn bits(self) -> u8 {
        match self {
            Self::Eight => 8,
            Self::Ten => 10,
            Self::Twelve => 12,
        }
    }

    /// The number of extra bits of a category 6 token.
    pub fn cat6_bits(self) -> usize {
        usize::from(self.bits()) + 6
    }

    /// The inclusive range of valid dequantized coefficients.
    pub fn coefficient_range(self) -> (i32, i32) {
        let max = 1_i32 << (7 + self.bits());
        (-max, max - 1)
    }
}

const CAT1_PROB: [u8; 1] = [159];
const CAT2_PROB: [u8; 2] = [165, 145];
const CAT3_PROB: [u8; 3] = [173, 148, 140];
const CAT4_PROB: [u8; 4] = [176, 155, 140, 135];
const CAT5_PROB: [u8; 5] = [180, 157, 141, 134, 130];

// The high bit depth tables extend the 8-bit one by leading bits that are
// almost always zero.
#[rustfmt::skip]
const CAT6_PROB: [u8; 18] = [
    255, 255, 255, 255,
    254, 254, 254, 252, 249, 243, 230, 196, 177, 153, 140, 133, 130, 129,
];

/// The per-bit probabilities of the six category tokens, resolved for one
/// bit depth.
#[derive(Copy, Clone, Debug)]
pub struct CategoryProbs {
    tables: [&'static [u8]; 6],
}

impl CategoryProbs {
    /// Select the category tables for the given bit depth.
    pub fn for_bit_depth(bit_depth: BitDepth) -> Self {
        let cat6 = &CAT6_PROB[CAT6_PROB.len() - bit_depth.cat6_bits()..];

        Self {
            tables: [&CAT1_PROB, &CAT2_PROB, &CAT3_PROB, &CAT4_PROB, &CAT5_PROB, cat6],
        }
    }

    /// The probabilities of category `index` (`0` for category 1), most
    /// significant bit first.
    #[inline]
    pub fn get(&self, index: usize) -> &'static [u8] {
        self.tables[index]
    }
}

/// Read an unsigned integer with one bit per entry of `probs`, most
/// significant bit first.
#[inline]
pub fn read_coeff<R: SymbolReader>(reader: &mut R, probs: &[u8]) -> i32 {
    probs
        .iter()
        .fold(0, |val, &p| (val << 1) | i32::from(reader.read_bool(p)))
}
