//! Error types for setting up coefficient token decoding.
//!
//! Decoding a block never fails: a well-formed stream is a precondition, and
//! all tables are validated once when they are constructed. The errors below
//! can therefore only surface while configuring a decode session.

use core::fmt;

/// The main error type for coefficient token decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Errors related to the session configuration.
    Settings(SettingsError),
    /// Errors related to probability and scan tables.
    Table(TableError),
    /// Errors related to opening the entropy coded stream.
    Stream(StreamError),
}

/// Errors related to the session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsError {
    /// The sample bit depth is not one of 8, 10 or 12.
    UnsupportedBitDepth(u8),
}

/// Errors related to probability and scan tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// A node probability of zero was supplied.
    ZeroProbability,
    /// The higher-token distribution has the wrong number of rows.
    DistributionLength,
    /// A row of the higher-token distribution doesn't sum to 256 or
    /// contains a zero entry.
    InvalidDistribution(u8),
    /// The scan is not a permutation of all coefficient positions.
    InvalidScan,
    /// The neighbor table is too short, refers to a position outside of the
    /// block, or refers to a position that is decoded later.
    InvalidNeighbors,
}

/// Errors related to opening the entropy coded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// The stream contains no data.
    Empty,
    /// The stored coder state is malformed or out of range.
    InvalidState,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settings(e) => write!(f, "{e}"),
            Self::Table(e) => write!(f, "{e}"),
            Self::Stream(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedBitDepth(bits) => write!(f, "unsupported bit depth {bits}"),
        }
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroProbability => write!(f, "node probabilities must be non-zero"),
            Self::DistributionLength => {
                write!(f, "token distribution must have one row per pivot value")
            }
            Self::InvalidDistribution(pivot) => {
                write!(f, "invalid token distribution for pivot {pivot}")
            }
            Self::InvalidScan => write!(f, "scan is not a permutation of the block"),
            Self::InvalidNeighbors => write!(f, "invalid scan neighbor table"),
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "stream is empty"),
            Self::InvalidState => write!(f, "invalid coder state"),
        }
    }
}

impl std::error::Error for DecodeError {}
impl std::error::Error for SettingsError {}
impl std::error::Error for TableError {}
impl std::error::Error for StreamError {}

impl From<SettingsError> for DecodeError {
    fn from(e: SettingsError) -> Self {
        Self::Settings(e)
    }
}

impl From<TableError> for DecodeError {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}

impl From<StreamError> for DecodeError {
    fn from(e: StreamError) -> Self {
        Self::Stream(e)
    }
}

/// Result type for coefficient token decoding operations.
pub type Result<T> = core::result::Result<T, DecodeError>;

macro_rules! bail {
    ($err:expr) => {
        return Err($err.into())
    };
}

macro_rules! err {
    ($err:expr) => {
        Err($err.into())
    };
}

pub(crate) use bail;
pub(crate) use err;
