//! Cell Dial — rotating addresses over a self-decaying recency signal.
//!
//! The dial owns three structures over `N` cells:
//!
//! ```text
//!   D[i]     recency of cell i        (reset to 1.0 on use, halved each tic)
//!   T[i][j]  j followed i             (halved each tic, newest edge = 1.0)
//!   R[j][i]  i is j's latest source   (never decayed, cleared by pruning)
//! ```
//!
//! Allocation is argmin over `D` (the stalest cell), "current" is argmax
//! over `D`. Repeated halving turns `D` into an approximate LRU ring without
//! keeping an ordered structure; every scan is O(N).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::config::{DialConfig, InitialDecay};
use crate::error::{Result, SeqMemError};
use crate::matrix::{SquareMatrix, argmax, argmax_positive, argmin, buffer_len};

/// Decay factor applied to `D` and `T` on every tic.
pub const TIC_DECAY: f64 = 0.5;

/// Value a cell's recency (and the newest edge) is reset to.
pub const FRESH: f64 = 1.0;

/// Fixed-size cell allocator with a learned transition graph.
#[derive(Debug, Clone)]
pub struct CellDial {
    decay: Vec<f64>,
    transition: SquareMatrix,
    reverse: SquareMatrix,
}

impl CellDial {
    /// Create a dial with `cell_count` cells and an all-zero decay vector.
    ///
    /// # Errors
    /// Returns [`SeqMemError::Config`] if `cell_count` is zero or too large.
    pub fn new(cell_count: usize) -> Result<Self> {
        Self::from_config(&DialConfig {
            cell_count,
            ..DialConfig::default()
        })
    }

    /// Create a dial from configuration.
    ///
    /// # Errors
    /// Returns [`SeqMemError::Config`] if `cell_count` is zero or too large
    /// for an `N × N` matrix.
    pub fn from_config(config: &DialConfig) -> Result<Self> {
        let n = config.cell_count;
        if n == 0 {
            return Err(SeqMemError::Config(
                "dial.cell_count must be positive".to_string(),
            ));
        }
        if buffer_len::<f64>(n, n).is_none() {
            return Err(SeqMemError::Config(format!(
                "dial.cell_count {n} is too large for an N x N transition matrix"
            )));
        }

        let decay = match config.initial_decay {
            InitialDecay::Zero => vec![0.0; n],
            InitialDecay::Random => {
                let mut rng = match config.rng_seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                (0..n).map(|_| rng.gen_range(0.0..1.0)).collect()
            }
        };

        debug!(
            cells = n,
            initial_decay = ?config.initial_decay,
            seeded = config.rng_seed.is_some(),
            "Cell dial created"
        );

        Ok(Self {
            decay,
            transition: SquareMatrix::zeros(n),
            reverse: SquareMatrix::zeros(n),
        })
    }

    /// Number of cells (`N`).
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.decay.len()
    }

    /// Fail fast on an index outside `[0, N)`.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`].
    pub fn check(&self, cell: usize) -> Result<()> {
        if cell < self.cell_count() {
            Ok(())
        } else {
            Err(SeqMemError::CellOutOfRange {
                cell,
                cell_count: self.cell_count(),
            })
        }
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    /// Advance one tic and return the newly allocated cell.
    ///
    /// The most recent cell becomes the source of a fresh edge into the
    /// stalest cell. A pristine dial (no positive recency anywhere) starts
    /// from cell 0, so every tic records exactly one edge.
    pub fn advance(&mut self) -> usize {
        let prev = match self.most_recent() {
            Some(prev) => prev,
            None => {
                self.decay[0] = FRESH;
                0
            }
        };

        for d in &mut self.decay {
            *d *= TIC_DECAY;
        }
        self.transition.scale(TIC_DECAY);

        let cell = self.allocate_stale();
        self.transition.set(prev, cell, FRESH);
        self.reverse.clear_row(cell);
        self.reverse.set(cell, prev, FRESH);

        trace!(from = prev, to = cell, "Dial tic");
        cell
    }

    /// Claim the least recently used cell (lowest index on ties).
    pub fn allocate_stale(&mut self) -> usize {
        // The decay vector is never empty.
        let cell = argmin(&self.decay).unwrap_or(0);
        self.decay[cell] = FRESH;
        cell
    }

    /// Mark `cell` as just used. Nothing else changes.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`].
    pub fn mark_used(&mut self, cell: usize) -> Result<()> {
        self.check(cell)?;
        self.decay[cell] = FRESH;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Graph queries
    // ------------------------------------------------------------------

    /// Follow the strongest outgoing edge of `cell` and mark its target used.
    ///
    /// Returns `None` (touching nothing) if `cell` has no outgoing edge.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`].
    pub fn strongest_next(&mut self, cell: usize) -> Result<Option<usize>> {
        let next = self.strongest_successor(cell)?;
        if let Some(next) = next {
            self.decay[next] = FRESH;
        }
        Ok(next)
    }

    /// The strongest outgoing edge of `cell`, without marking anything.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`].
    pub fn strongest_successor(&self, cell: usize) -> Result<Option<usize>> {
        self.check(cell)?;
        Ok(argmax_positive(self.transition.row(cell)))
    }

    /// The cell recorded as `cell`'s latest predecessor, if any.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`].
    pub fn predecessor(&self, cell: usize) -> Result<Option<usize>> {
        self.check(cell)?;
        Ok(argmax_positive(self.reverse.row(cell)))
    }

    /// Forget every recorded predecessor of `cell`.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`].
    pub fn clear_predecessor_edges(&mut self, cell: usize) -> Result<()> {
        self.check(cell)?;
        self.reverse.clear_row(cell);
        Ok(())
    }

    /// Forget that `pred` preceded `cell`.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`] if either index is invalid.
    pub fn forget_predecessor(&mut self, cell: usize, pred: usize) -> Result<()> {
        self.check(cell)?;
        self.check(pred)?;
        self.reverse.set(cell, pred, 0.0);
        Ok(())
    }

    /// Zero the transition `from → to`.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`] if either index is invalid.
    pub fn sever(&mut self, from: usize, to: usize) -> Result<()> {
        self.check(from)?;
        self.check(to)?;
        self.transition.set(from, to, 0.0);
        Ok(())
    }

    /// Number of cells with a live edge into `cell`.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`].
    pub fn in_degree(&self, cell: usize) -> Result<usize> {
        self.check(cell)?;
        Ok(self.transition.positive_in_column(cell))
    }

    // ------------------------------------------------------------------
    // State inspection
    // ------------------------------------------------------------------

    /// The recency vector `D`.
    #[must_use]
    pub fn decay(&self) -> &[f64] {
        &self.decay
    }

    /// The most recently used cell, or `None` on a pristine dial.
    #[must_use]
    pub fn most_recent(&self) -> Option<usize> {
        argmax(&self.decay).filter(|&i| self.decay[i] > 0.0)
    }

    /// Weight of the edge `from → to`.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`] if either index is invalid.
    pub fn weight(&self, from: usize, to: usize) -> Result<f64> {
        self.check(from)?;
        self.check(to)?;
        Ok(self.transition.get(from, to))
    }

    /// Outgoing edge weights of `cell`.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`].
    pub fn transition_row(&self, cell: usize) -> Result<&[f64]> {
        self.check(cell)?;
        Ok(self.transition.row(cell))
    }

    /// Number of live edges in the transition graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.transition.positive_count()
    }

    /// `T · D`: how strongly each cell leads into what was recently used.
    #[must_use]
    pub fn temporal_prior(&self) -> Vec<f64> {
        self.transition.mul_vec(&self.decay)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
