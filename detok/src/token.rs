//! The coefficient token alphabet.

/// The number of tokens that carry a non-zero magnitude.
pub const VALUE_TOKENS: usize = 10;

/// The smallest magnitude represented by each category token.
pub const CATEGORY_BASE: [i32; 6] = [5, 7, 11, 19, 35, 67];

/// A coefficient token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Token {
    /// A zero coefficient.
    Zero = 0,
    /// A magnitude of 1.
    One = 1,
    /// A magnitude of 2.
    Two = 2,
    /// A magnitude of 3.
    Three = 3,
    /// A magnitude of 4.
    Four = 4,
    /// Magnitudes 5..=6, one extra bit.
    Category1 = 5,
    /// Magnitudes 7..=10, two extra bits.
    Category2 = 6,
    /// Magnitudes 11..=18, three extra bits.
    Category3 = 7,
    /// Magnitudes 19..=34, four extra bits.
    Category4 = 8,
    /// Magnitudes 35..=66, five extra bits.
    Category5 = 9,
    /// Magnitudes from 67, with a bit-depth dependent number of extra bits.
    Category6 = 10,
    /// No further non-zero coefficients follow.
    EndOfBlock = 11,
}

impl Token {
    /// The value tokens in the order of the higher-token distribution.
    pub const VALUES: [Self; VALUE_TOKENS] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Category1,
        Self::Category2,
        Self::Category3,
        Self::Category4,
        Self::Category5,
        Self::Category6,
    ];

    /// Map a symbol read from the higher-token distribution to its token.
    #[inline]
    pub fn from_value_symbol(symbol: usize) -> Self {
        Self::VALUES[symbol.min(VALUE_TOKENS - 1)]
    }

    /// The coarse "energy" of the token, used to derive the context of
    /// later positions.
    #[inline]
    pub fn energy_class(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Three | Self::Four => 3,
            Self::Category1 | Self::Category2 => 4,
            _ => 5,
        }
    }

    /// The index of the category (`0` for [`Token::Category1`]), if this is
    /// a category token.
    #[inline]
    pub fn category(self) -> Option<usize> {
        match self {
            Self::Category1
            | Self::Category2
            | Self::Category3
            | Self::Category4
            | Self::Category5
            | Self::Category6 => Some(self as usize - Self::Category1 as usize),
            _ => None,
        }
    }
}
