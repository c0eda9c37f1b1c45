//! The coefficient probability model.
//!
//! Each coded position selects a row of node probabilities by transform
//! size, plane type, reference type, band and context. A row holds the
//! probabilities of the three binary decisions that are coded directly:
//! "more coefficients follow" (the end-of-block node), "the coefficient is
//! non-zero" (the zero node) and the pivot. The pivot doesn't drive a binary
//! decision but selects one of 255 distributions over the value tokens.

use crate::error::{Result, TableError, bail};
use crate::token::VALUE_TOKENS;
use crate::transform::{PLANE_TYPES, PlaneType, REF_TYPES, TX_SIZES, TxSize};

/// The number of coefficient bands.
pub const COEF_BANDS: usize = 6;
/// The number of neighbor-derived contexts per band.
pub const COEFF_CONTEXTS: usize = 6;
/// The number of directly coded nodes per context.
pub const UNCONSTRAINED_NODES: usize = 3;

/// The index of the end-of-block node.
pub const EOB_NODE: usize = 0;
/// The index of the zero node.
pub const ZERO_NODE: usize = 1;
/// The index of the pivot node.
pub const PIVOT_NODE: usize = 2;

/// The node probabilities of one band and context.
pub type NodeProbs = [u8; UNCONSTRAINED_NODES];
/// The node probabilities of all bands and contexts of one block type.
pub type BandProbs = [[NodeProbs; COEFF_CONTEXTS]; COEF_BANDS];

/// The node probabilities of all kinds of blocks, indexed by transform size,
/// plane type and reference type.
pub type ProbTable = [[[BandProbs; REF_TYPES]; PLANE_TYPES]; TX_SIZES];

/// The node probabilities of a frame.
///
/// The decoder never modifies these. Adapting them from the collected
/// [`CoefficientCounts`](crate::CoefficientCounts) is up to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoefficientProbs {
    table: Box<ProbTable>,
}

impl CoefficientProbs {
    /// Create a new probability model, indexed by transform size, plane
    /// type and reference type (intra first).
    ///
    /// Returns an error if any of the probabilities is zero.
    pub fn new(table: ProbTable) -> Result<Self> {
        let has_zero = table
            .iter()
            .flatten()
            .flatten()
            .flatten()
            .flatten()
            .flatten()
            .any(|&p| p == 0);

        if has_zero {
            bail!(TableError::ZeroProbability);
        }

        Ok(Self {
            table: Box::new(table),
        })
    }

    /// Create a new probability model by evaluating `f` for every
    /// combination of transform size, plane type, reference type, band and
    /// context.
    pub fn from_fn(
        mut f: impl FnMut(TxSize, PlaneType, bool, usize, usize) -> NodeProbs,
    ) -> Result<Self> {
        let mut table = [[[[[[0; UNCONSTRAINED_NODES]; COEFF_CONTEXTS]; COEF_BANDS]; REF_TYPES];
            PLANE_TYPES]; TX_SIZES];

        for tx_size in TxSize::ALL {
            for plane_type in [PlaneType::Y, PlaneType::Uv] {
                for is_inter in [false, true] {
                    let bands = &mut table[tx_size as usize][plane_type as usize]
                        [usize::from(is_inter)];

                    for (band, contexts) in bands.iter_mut().enumerate() {
                        for (ctx, probs) in contexts.iter_mut().enumerate() {
                            *probs = f(tx_size, plane_type, is_inter, band, ctx);
                        }
                    }
                }
            }
        }

        Self::new(table)
    }

    /// Create a probability model that uses the same node probabilities
    /// everywhere.
    pub fn uniform(probs: NodeProbs) -> Result<Self> {
        Self::from_fn(|_, _, _, _, _| probs)
    }

    /// The node probabilities for one kind of block.
    #[inline]
    pub fn get(&self, tx_size: TxSize, plane_type: PlaneType, is_inter: bool) -> &BandProbs {
        &self.table[tx_size as usize][plane_type as usize][usize::from(is_inter)]
    }
}

/// The number of rows of a token distribution, one for each non-zero pivot
/// probability.
pub const PIVOT_VALUES: usize = 255;

/// A cumulative distribution over the value tokens.
pub type TokenCdf = [u16; VALUE_TOKENS + 1];

/// The distributions over the value tokens ([`One`](crate::Token::One) to
/// [`Category6`](crate::Token::Category6)), keyed by the pivot probability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenDistribution {
    cdfs: Vec<TokenCdf>,
}

impl TokenDistribution {
    /// The default distribution family.
    ///
    /// Coefficient magnitudes are modeled as a Pareto distribution, i.e.
    /// `P(magnitude >= x) = x^-alpha`, where `alpha` is chosen so that the
    /// probability of a magnitude of 1 equals `pivot / 256`. Each token
    /// receives the probability mass of the magnitudes it represents,
    /// rounded to 8 bits but never below 1.
    ///
    /// This is an approximation of the VP10 Pareto table
    /// (`vp10_pareto8_token_probs`), not a bit-exact copy of it. Streams
    /// produced by other encoders only decode correctly with the table they
    /// were encoded with, which can be supplied via
    /// [`from_pdfs`](Self::from_pdfs).
    pub fn pareto() -> Self {
        // The smallest magnitude of each value token.
        const LOWER: [f64; VALUE_TOKENS] = [1.0, 2.0, 3.0, 4.0, 5.0, 7.0, 11.0, 19.0, 35.0, 67.0];

        let cdfs = (1..=PIVOT_VALUES)
            .map(|pivot| {
                let alpha = -(1.0 - pivot as f64 / 256.0).log2();
                let tail = |x: f64| x.powf(-alpha);

                let mut pdf = [0_u16; VALUE_TOKENS];
                for (i, p) in pdf.iter_mut().enumerate() {
                    let mass = match LOWER.get(i + 1) {
                        Some(&next) => tail(LOWER[i]) - tail(next),
                        None => tail(LOWER[i]),
                    };
                    *p = ((mass * 256.0).round() as u16).max(1);
                }

                // Rounding errors go to the most likely token.
                let sum: u16 = pdf.iter().sum();
                let (largest, _) = pdf
                    .iter()
                    .enumerate()
                    .fold((0, 0), |best, (i, &p)| if p > best.1 { (i, p) } else { best });
                pdf[largest] = pdf[largest] + 256 - sum;

                to_cdf(&pdf)
            })
            .collect();

        Self { cdfs }
    }

    /// Create a distribution family from externally supplied probabilities.
    ///
    /// `rows[i]` is used for a pivot probability of `i + 1`. There must be
    /// exactly 255 rows, and each row must consist of non-zero entries that
    /// sum to 256.
    pub fn from_pdfs(rows: &[[u8; VALUE_TOKENS]]) -> Result<Self> {
        if rows.len() != PIVOT_VALUES {
            bail!(TableError::DistributionLength);
        }

        let mut cdfs = Vec::with_capacity(PIVOT_VALUES);

        for (i, row) in rows.iter().enumerate() {
            let sum: u16 = row.iter().map(|&p| u16::from(p)).sum();

            if sum != 256 || row.contains(&0) {
                // `i` is at most 254.
                bail!(TableError::InvalidDistribution(i as u8 + 1));
            }

            cdfs.push(to_cdf(&row.map(u16::from)));
        }

        Ok(Self { cdfs })
    }

    /// The cumulative distribution for the given pivot probability.
    ///
    /// Panics if `pivot` is zero, which [`CoefficientProbs`] rules out.
    #[inline]
    pub fn cdf(&self, pivot: u8) -> &TokenCdf {
        &self.cdfs[usize::from(pivot) - 1]
    }
}

fn to_cdf(pdf: &[u16; VALUE_TOKENS]) -> TokenCdf {
    let mut cdf = [0; VALUE_TOKENS + 1];

    for (i, &p) in pdf.iter().enumerate() {
        cdf[i + 1] = cdf[i] + p;
    }

    cdf
}
