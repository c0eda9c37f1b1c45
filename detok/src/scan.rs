//! Scan orders and their neighbor tables.

use crate::error::{Result, TableError, bail};
use crate::transform::TxSize;

/// How the context neighbors of a scan are chosen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScanKind {
    /// Use the coefficients above and to the left.
    Default,
    /// Use the coefficient to the left, for scans that visit a row at a time.
    Row,
    /// Use the coefficient above, for scans that visit a column at a time.
    Column,
}

/// A scan order together with its neighbor table.
///
/// The scan maps the decode position to the raster position of a
/// coefficient. For each decode position, the neighbor table holds the two
/// raster positions whose tokens determine the context of that position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOrder {
    tx_size: TxSize,
    scan: Box<[u16]>,
    neighbors: Box<[u16]>,
}

impl ScanOrder {
    /// Create a new scan order from its tables.
    ///
    /// Returns an error unless `scan` is a permutation of all positions of
    /// the block and every neighbor of a decode position (apart from the
    /// first one, which has no neighbors) is decoded before it.
    pub fn new(tx_size: TxSize, scan: &[u16], neighbors: &[u16]) -> Result<Self> {
        let max_eob = tx_size.max_eob();

        if scan.len() != max_eob {
            bail!(TableError::InvalidScan);
        }

        // The decode position of each raster position.
        let mut iscan = vec![usize::MAX; max_eob];

        for (c, &pos) in scan.iter().enumerate() {
            match iscan.get_mut(usize::from(pos)) {
                Some(slot) if *slot == usize::MAX => *slot = c,
                _ => bail!(TableError::InvalidScan),
            }
        }

        if neighbors.len() < 2 * max_eob {
            bail!(TableError::InvalidNeighbors);
        }

        for (c, pair) in neighbors[..2 * max_eob].chunks_exact(2).enumerate() {
            for &nb in pair {
                let decoded_at = iscan
                    .get(usize::from(nb))
                    .copied()
                    .ok_or(TableError::InvalidNeighbors)?;

                if c > 0 && decoded_at >= c {
                    bail!(TableError::InvalidNeighbors);
                }
            }
        }

        Ok(Self {
            tx_size,
            scan: scan.into(),
            neighbors: neighbors[..2 * max_eob].into(),
        })
    }

    /// Create a scan order by deriving the neighbor table from a scan.
    pub fn from_scan(tx_size: TxSize, scan: &[u16], kind: ScanKind) -> Result<Self> {
        Self::new(tx_size, scan, &derive_neighbors(tx_size, scan, kind))
    }

    /// The diagonal scan, visiting one anti-diagonal after the other.
    pub fn default_for(tx_size: TxSize) -> Self {
        let width = tx_size.width();
        let mut scan = raster(tx_size);
        scan.sort_by_key(|&pos| {
            let (row, col) = (usize::from(pos) / width, usize::from(pos) % width);
            (row + col, row)
        });

        Self::built_in(tx_size, scan, ScanKind::Default)
    }

    /// The row scan, visiting the block row by row.
    pub fn row(tx_size: TxSize) -> Self {
        Self::built_in(tx_size, raster(tx_size), ScanKind::Row)
    }

    /// The column scan, visiting the block column by column.
    pub fn column(tx_size: TxSize) -> Self {
        let width = tx_size.width();
        let mut scan = raster(tx_size);
        scan.sort_by_key(|&pos| (usize::from(pos) % width, usize::from(pos) / width));

        Self::built_in(tx_size, scan, ScanKind::Column)
    }

    // The built-in scans always visit the needed neighbors first.
    fn built_in(tx_size: TxSize, scan: Vec<u16>, kind: ScanKind) -> Self {
        let neighbors = derive_neighbors(tx_size, &scan, kind);

        Self {
            tx_size,
            scan: scan.into(),
            neighbors: neighbors.into(),
        }
    }

    /// The transform size this scan order is meant for.
    #[inline]
    pub fn tx_size(&self) -> TxSize {
        self.tx_size
    }

    /// The raster position of each decode position.
    #[inline]
    pub fn scan(&self) -> &[u16] {
        &self.scan
    }

    /// The two neighbor raster positions of each decode position.
    #[inline]
    pub fn neighbors(&self) -> &[u16] {
        &self.neighbors
    }
}

fn derive_neighbors(tx_size: TxSize, scan: &[u16], kind: ScanKind) -> Vec<u16> {
    let width = tx_size.width();
    let mut neighbors = Vec::with_capacity(2 * scan.len());

    for (n, &pos) in scan.iter().enumerate() {
        let pos = usize::from(pos);
        let (row, col) = (pos / width, pos % width);
        // Positions are below 1024.
        let above = pos.saturating_sub(width) as u16;
        let left = pos.saturating_sub(1) as u16;

        let pair = match (n, row > 0, col > 0, kind) {
            (0, ..) => [0, 0],
            (_, true, true, ScanKind::Default) => [above, left],
            (_, true, true, ScanKind::Row) | (_, false, _, _) => [left, left],
            (_, true, _, _) => [above, above],
        };

        neighbors.extend(pair);
    }

    neighbors
}

fn raster(tx_size: TxSize) -> Vec<u16> {
    // Positions are below 1024.
    (0..tx_size.max_eob() as u16).collect()
}
