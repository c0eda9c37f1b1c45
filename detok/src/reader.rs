//! The interface between the token decoder and the entropy coder.

use detok_common::ans::AnsDecoder;

/// A source of entropy-coded symbols.
///
/// We use a trait so that we can mock the entropy decoder in tests.
pub trait SymbolReader {
    /// Read a binary symbol, where `p0 / 256` is the probability of `false`.
    fn read_bool(&mut self, p0: u8) -> bool;
    /// Read a symbol from a cumulative distribution with a total of 256.
    fn read_symbol(&mut self, cdf: &[u16]) -> usize;
}

impl SymbolReader for AnsDecoder<'_> {
    #[inline(always)]
    fn read_bool(&mut self, p0: u8) -> bool {
        AnsDecoder::read_bool(self, p0)
    }

    #[inline(always)]
    fn read_symbol(&mut self, cdf: &[u16]) -> usize {
        AnsDecoder::read_symbol(self, cdf)
    }
}

impl<R: SymbolReader + ?Sized> SymbolReader for &mut R {
    #[inline(always)]
    fn read_bool(&mut self, p0: u8) -> bool {
        (**self).read_bool(p0)
    }

    #[inline(always)]
    fn read_symbol(&mut self, cdf: &[u16]) -> usize {
        (**self).read_symbol(cdf)
    }
}
