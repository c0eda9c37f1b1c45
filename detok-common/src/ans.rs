//! Asymmetric numeral system (ANS) coding with 8-bit probabilities.
//!
//! Binary symbols are coded with rABS ("range asymmetric binary system") using
//! a descending spread, multi-symbol alphabets with rANS. Both share a single
//! state that lives in the interval `[L_BASE, L_BASE * IO_BASE)`.
//!
//! ANS is last-in first-out: the encoder processes symbols in reverse and the
//! decoder consumes the resulting bytes from the end of the buffer towards its
//! start. The final one to three bytes of a stream hold the initial decoder
//! state.

/// The precision of all probabilities, i.e. a probability of `p` means `p / 256`.
pub const ANS_P8_PRECISION: u32 = 256;
/// The lower bound of the normalized state interval.
pub const L_BASE: u32 = ANS_P8_PRECISION * 4;
/// The radix used for renormalization (one byte at a time).
pub const IO_BASE: u32 = 256;

/// A decoder reading binary and multi-symbol values from an ANS stream.
#[derive(Debug, Clone)]
pub struct AnsDecoder<'a> {
    /// The underlying encoded data.
    data: &'a [u8],
    /// The number of bytes that haven't been consumed yet. Bytes are consumed
    /// backwards, so this is also the index one past the next byte to read.
    offset: usize,
    /// The current coder state.
    state: u32,
}

impl<'a> AnsDecoder<'a> {
    /// Create a new decoder over the given stream.
    ///
    /// Returns `None` if the stream is empty, if its state header uses the
    /// reserved marker prefix, or if the stored state is out of range.
    pub fn new(data: &'a [u8]) -> Option<Self> {
        let last = *data.last()?;
        let len = data.len();

        let (header_len, raw_state) = match last >> 6 {
            0 => (1, u32::from(last & 0x3f)),
            1 => {
                let bytes = data.get(len.checked_sub(2)?..)?;
                (2, u32::from(u16::from_le_bytes([bytes[0], bytes[1]])) & 0x3fff)
            }
            2 => {
                let bytes = data.get(len.checked_sub(3)?..)?;
                (
                    3,
                    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]) & 0x3f_ffff,
                )
            }
            // A prefix of 0b11 is reserved for superframe markers.
            _ => return None,
        };

        let state = raw_state + L_BASE;

        if state >= L_BASE * IO_BASE {
            return None;
        }

        Some(Self {
            data,
            offset: len - header_len,
            state,
        })
    }

    /// Read a binary symbol, where `p0 / 256` is the probability of `false`.
    #[inline(always)]
    pub fn read_bool(&mut self, p0: u8) -> bool {
        let p = ANS_P8_PRECISION - u32::from(p0);
        self.refill();

        let x = self.state;
        let quot = x / ANS_P8_PRECISION;
        let rem = x % ANS_P8_PRECISION;
        let xn = quot * p;
        let val = rem < p;

        self.state = if val { xn + rem } else { x - xn - p };

        val
    }

    /// Read a symbol from a cumulative distribution.
    ///
    /// The distribution must start with `0` and end with `256`; entry `i + 1`
    /// minus entry `i` is the (non-zero) probability of symbol `i`.
    #[inline]
    pub fn read_symbol(&mut self, cdf: &[u16]) -> usize {
        self.refill();

        let quot = self.state / ANS_P8_PRECISION;
        let rem = self.state % ANS_P8_PRECISION;

        let mut symbol = 0;
        while symbol + 2 < cdf.len() && rem >= u32::from(cdf[symbol + 1]) {
            symbol += 1;
        }

        let cum_prob = u32::from(cdf[symbol]);
        let prob = u32::from(cdf[symbol + 1]) - cum_prob;
        self.state = quot * prob + rem - cum_prob;

        symbol
    }

    /// Whether all data has been consumed and the state is back at its
    /// initial value, which is the case for a stream that was read exactly
    /// as it was written.
    ///
    /// Bytes that the next read would pull into the state are taken into
    /// account.
    pub fn is_finished(&self) -> bool {
        let mut state = self.state;
        let mut offset = self.offset;

        while state < L_BASE && offset > 0 {
            offset -= 1;
            state = state * IO_BASE + u32::from(self.data[offset]);
        }

        offset == 0 && state == L_BASE
    }

    /// The number of bytes that haven't been pulled into the state yet.
    pub fn remaining_bytes(&self) -> usize {
        self.offset
    }

    #[inline(always)]
    fn refill(&mut self) {
        if self.state < L_BASE && self.offset > 0 {
            self.offset -= 1;
            self.state = self.state * IO_BASE + u32::from(self.data[self.offset]);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Bool { value: bool, p0: u8 },
    Symbol { cum_prob: u16, prob: u16 },
}

/// A writer producing streams that [`AnsDecoder`] can read.
///
/// Symbols are recorded in the order they will later be decoded, and only
/// encoded (in reverse) once [`AnsWriter::finish`] is called.
#[derive(Debug, Clone, Default)]
pub struct AnsWriter {
    ops: Vec<Op>,
}

impl AnsWriter {
    /// Create a new, empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a binary symbol, where `p0 / 256` is the probability of `false`.
    ///
    /// `p0` must not be zero.
    pub fn write_bool(&mut self, value: bool, p0: u8) {
        debug_assert!(p0 != 0, "probability of zero can't be coded");
        self.ops.push(Op::Bool { value, p0 });
    }

    /// Record `symbol` from the given cumulative distribution (see
    /// [`AnsDecoder::read_symbol`]).
    pub fn write_symbol(&mut self, cdf: &[u16], symbol: usize) {
        let cum_prob = cdf[symbol];
        let prob = cdf[symbol + 1] - cum_prob;
        debug_assert!(prob != 0, "symbol with zero probability can't be coded");

        self.ops.push(Op::Symbol { cum_prob, prob });
    }

    /// Encode all recorded symbols and return the finished stream.
    pub fn finish(self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.ops.len() / 4 + 3);
        let mut state = L_BASE;

        for op in self.ops.iter().rev() {
            match *op {
                Op::Bool { value, p0 } => {
                    let p0 = u32::from(p0);
                    let p = ANS_P8_PRECISION - p0;
                    let l_s = if value { p } else { p0 };
                    renormalize(&mut buf, &mut state, l_s);
                    state = (state / l_s) * ANS_P8_PRECISION
                        + state % l_s
                        + if value { 0 } else { p };
                }
                Op::Symbol { cum_prob, prob } => {
                    let prob = u32::from(prob);
                    renormalize(&mut buf, &mut state, prob);
                    state = (state / prob) * ANS_P8_PRECISION + state % prob + u32::from(cum_prob);
                }
            }
        }

        let state = state - L_BASE;

        if state < (1 << 6) {
            buf.push(state as u8);
        } else if state < (1 << 14) {
            buf.extend_from_slice(&((0x01 << 14) + state as u16).to_le_bytes());
        } else {
            // The state is always below `L_BASE * IO_BASE`, so 22 bits suffice.
            let bytes = ((0x02 << 22) + state).to_le_bytes();
            buf.extend_from_slice(&bytes[..3]);
        }

        buf
    }
}

#[inline(always)]
fn renormalize(buf: &mut Vec<u8>, state: &mut u32, l_s: u32) {
    while *state >= L_BASE / ANS_P8_PRECISION * IO_BASE * l_s {
        buf.push((*state % IO_BASE) as u8);
        *state /= IO_BASE;
    }
}
