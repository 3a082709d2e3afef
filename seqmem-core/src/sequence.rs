//! Sequential Memory — feature vectors bound to dial cells.
//!
//! Writes go through the dial: every [`SequentialMemory::tic`] allocates the
//! stalest cell and links it to the previous one, and
//! [`SequentialMemory::memorize`] binds a feature vector to a cell. Every
//! memorized vector is also summed into the déjà-vu matrix `V`
//! (`feature_dim × N`), so a later query can be projected through `V` to find
//! the cell it was stored at.
//!
//! ```text
//!   write:   tic ──▶ cell ──▶ memorize(features, cell) ──▶ V[:, cell] += features
//!   recall:  features · V ──▶ best cell ──▶ next ──▶ next ──▶ ...
//!   prune:   forget_trail(cell) walks predecessors back to a branch point
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use tracing::{debug, info, trace};

use crate::config::SeqMemConfig;
use crate::dial::CellDial;
use crate::error::{Result, SeqMemError};
use crate::features::Features;
use crate::matrix::{argmax, argmax_positive, buffer_len};
use crate::metrics::{LatencyMonitor, SeqMemCounters};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Outcome of [`SequentialMemory::recognize_or_memorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognition {
    /// Déjà vu — the features matched a cell that was already bound.
    Familiar(usize),
    /// Nothing matched; the features were memorized at a fresh cell.
    Novel(usize),
}

impl Recognition {
    /// The cell the features now live at.
    #[must_use]
    pub fn cell(self) -> usize {
        match self {
            Self::Familiar(cell) | Self::Novel(cell) => cell,
        }
    }

    /// Whether the features were recognized.
    #[must_use]
    pub fn is_familiar(self) -> bool {
        matches!(self, Self::Familiar(_))
    }
}

/// What [`SequentialMemory::forget_trail`] removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrailErasure {
    /// Cells visited by the backward walk, starting cell first. A walk that
    /// runs into a cell it already erased ends with that cell again.
    pub trail: Vec<usize>,
    /// Number of stored vectors actually removed.
    pub erased: usize,
    /// Target of the outgoing edge cut from the starting cell.
    pub severed_successor: Option<usize>,
    /// Ancestor off the trail with several incoming edges that stopped the
    /// walk. It keeps its stored vector.
    pub branch_point: Option<usize>,
}

// ---------------------------------------------------------------------------
// SequentialMemory
// ---------------------------------------------------------------------------

/// Associative sequential memory over a [`CellDial`].
pub struct SequentialMemory {
    dial: CellDial,
    feature_dim: usize,
    /// Feature store, one optional vector per cell.
    store: Vec<Option<Features>>,
    /// Déjà-vu matrix, `feature_dim × N`, row-major.
    dejavu: Vec<f32>,
    recognition_threshold: f64,
    counters: Arc<SeqMemCounters>,
    latency: Option<Arc<LatencyMonitor>>,
}

impl SequentialMemory {
    /// Bind a memory of `feature_dim`-long vectors to `dial`.
    ///
    /// # Errors
    /// Returns [`SeqMemError::Config`] if `feature_dim` is zero or too large
    /// for a `feature_dim × N` déjà-vu matrix.
    pub fn new(dial: CellDial, feature_dim: usize) -> Result<Self> {
        if feature_dim == 0 {
            return Err(SeqMemError::Config(
                "memory.feature_dim must be positive".to_string(),
            ));
        }
        let n = dial.cell_count();
        let Some(dejavu_len) = buffer_len::<f32>(feature_dim, n) else {
            return Err(SeqMemError::Config(format!(
                "memory.feature_dim {feature_dim} is too large for {n} cells"
            )));
        };

        info!(cells = n, feature_dim, "Sequential memory created");

        Ok(Self {
            dial,
            feature_dim,
            store: vec![None; n],
            dejavu: vec![0.0; dejavu_len],
            recognition_threshold: 0.0,
            counters: Arc::new(SeqMemCounters::new()),
            latency: None,
        })
    }

    /// Build the dial and the memory from configuration.
    ///
    /// # Errors
    /// Returns [`SeqMemError::Config`] if the configuration is invalid.
    pub fn from_config(config: &SeqMemConfig) -> Result<Self> {
        config.validate()?;
        let dial = CellDial::from_config(&config.dial)?;
        let mut memory = Self::new(dial, config.memory.feature_dim)?;
        memory.recognition_threshold = config.memory.recognition_threshold;
        if config.telemetry.track_latency {
            memory.latency = Some(Arc::new(LatencyMonitor::new(
                config.telemetry.slow_operation_us,
            )));
        }
        Ok(memory)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Number of cells (`N`).
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.dial.cell_count()
    }

    /// Length of every feature vector.
    #[must_use]
    pub fn feature_dim(&self) -> usize {
        self.feature_dim
    }

    /// Read-only view of the underlying dial.
    #[must_use]
    pub fn dial(&self) -> &CellDial {
        &self.dial
    }

    /// Shared event counters.
    #[must_use]
    pub fn counters(&self) -> &Arc<SeqMemCounters> {
        &self.counters
    }

    /// Latency history, present when `telemetry.track_latency` is set.
    #[must_use]
    pub fn latency(&self) -> Option<&LatencyMonitor> {
        self.latency.as_deref()
    }

    /// Cells that currently hold a vector, in index order.
    pub fn stored_cells(&self) -> impl Iterator<Item = (usize, &Features)> + '_ {
        self.store
            .iter()
            .enumerate()
            .filter_map(|(cell, slot)| slot.as_ref().map(|f| (cell, f)))
    }

    /// Number of cells that currently hold a vector.
    #[must_use]
    pub fn stored_count(&self) -> usize {
        self.store.iter().filter(|slot| slot.is_some()).count()
    }

    /// Column `cell` of the déjà-vu matrix: everything ever memorized there.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`].
    pub fn dejavu_column(&self, cell: usize) -> Result<Vec<f32>> {
        self.dial.check(cell)?;
        let n = self.cell_count();
        Ok((0..self.feature_dim)
            .map(|k| self.dejavu[k * n + cell])
            .collect())
    }

    fn check_dim(&self, features: &Features) -> Result<()> {
        if features.dim() == self.feature_dim {
            Ok(())
        } else {
            Err(SeqMemError::DimensionMismatch {
                expected: self.feature_dim,
                actual: features.dim(),
            })
        }
    }

    fn stored_or_zero(&self, cell: usize) -> Features {
        self.store[cell]
            .clone()
            .unwrap_or_else(|| Features::zeros(self.feature_dim))
    }

    // ------------------------------------------------------------------
    // Write path
    // ------------------------------------------------------------------

    /// Bind `features` to `cell`, replacing whatever was stored there, and
    /// add them into the cell's déjà-vu column.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`] or
    /// [`SeqMemError::DimensionMismatch`].
    pub fn memorize(&mut self, features: &Features, cell: usize) -> Result<()> {
        self.dial.check(cell)?;
        self.check_dim(features)?;

        let n = self.cell_count();
        for (k, &x) in features.as_slice().iter().enumerate() {
            self.dejavu[k * n + cell] += x;
        }
        self.store[cell] = Some(features.clone());

        SeqMemCounters::bump(&self.counters.memorized);
        trace!(cell, "Memorized features");
        Ok(())
    }

    /// Advance the dial one step and return the new current cell.
    pub fn tic(&mut self) -> usize {
        SeqMemCounters::bump(&self.counters.tics);
        self.dial.advance()
    }

    /// Claim the stalest cell, to start a recording or a replay.
    pub fn seed(&mut self) -> usize {
        SeqMemCounters::bump(&self.counters.seeds);
        self.dial.allocate_stale()
    }

    /// One write step of a recording: tic, then memorize at the new cell.
    ///
    /// The dimension is checked before the dial moves.
    ///
    /// # Errors
    /// Returns [`SeqMemError::DimensionMismatch`].
    pub fn record(&mut self, features: &Features) -> Result<usize> {
        self.check_dim(features)?;
        let cell = self.tic();
        self.memorize(features, cell)?;
        Ok(cell)
    }

    /// Recognize `features` by content, or memorize them at a fresh cell.
    ///
    /// A cell whose match score is above the recognition threshold (lowest
    /// index on ties) is only marked as used: nothing is stored and no edge
    /// is recorded. Otherwise the stalest cell is seeded and the features are
    /// memorized there.
    ///
    /// # Errors
    /// Returns [`SeqMemError::DimensionMismatch`].
    pub fn recognize_or_memorize(&mut self, features: &Features) -> Result<Recognition> {
        let monitor = self.latency.clone();
        let _guard = monitor.as_deref().map(|m| m.begin("recognize_or_memorize"));

        let scores = self.content_scores(features)?;
        let best = argmax(&scores).unwrap_or(0);

        if scores[best] > self.recognition_threshold {
            self.dial.mark_used(best)?;
            SeqMemCounters::bump(&self.counters.recognized);
            debug!(cell = best, score = scores[best], "Déjà vu");
            Ok(Recognition::Familiar(best))
        } else {
            let cell = self.seed();
            self.memorize(features, cell)?;
            SeqMemCounters::bump(&self.counters.novel);
            debug!(cell, best_score = scores[best], "Novel features memorized");
            Ok(Recognition::Novel(cell))
        }
    }

    // ------------------------------------------------------------------
    // Read path
    // ------------------------------------------------------------------

    /// The vector stored at `cell`, or zeros if nothing is remembered there.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`].
    pub fn retrieve(&self, cell: usize) -> Result<Features> {
        self.dial.check(cell)?;
        Ok(self.stored_or_zero(cell))
    }

    /// Borrow the vector stored at `cell`, if any.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`].
    pub fn recall(&self, cell: usize) -> Result<Option<&Features>> {
        self.dial.check(cell)?;
        Ok(self.store[cell].as_ref())
    }

    /// Step to the strongest learned continuation of `cell` and return it
    /// with its stored vector. `None` if `cell` leads nowhere.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`].
    pub fn next(&mut self, cell: usize) -> Result<Option<(usize, Features)>> {
        let Some(next) = self.dial.strongest_next(cell)? else {
            return Ok(None);
        };
        SeqMemCounters::bump(&self.counters.replay_steps);
        Ok(Some((next, self.stored_or_zero(next))))
    }

    /// Every learned continuation of `cell`, strongest first.
    ///
    /// Works on a private copy of the outgoing edges: the graph is never
    /// touched and the iterator can be recreated at any time.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`].
    pub fn continuations(&self, cell: usize) -> Result<Continuations<'_>> {
        let weights = self.dial.transition_row(cell)?.to_vec();
        Ok(Continuations {
            memory: self,
            weights,
        })
    }

    /// Replay from `start`: yields `start` itself, then up to `steps`
    /// successive [`SequentialMemory::next`] results. Stops early at a cell
    /// with no outgoing edge.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`] if `start` is invalid.
    pub fn replay(&mut self, start: usize, steps: usize) -> Result<Replay<'_>> {
        self.dial.check(start)?;
        Ok(Replay {
            memory: self,
            pending: Some(start),
            current: start,
            remaining: steps,
        })
    }

    /// Content match of `features` against every cell: `features · V`.
    ///
    /// # Errors
    /// Returns [`SeqMemError::DimensionMismatch`].
    pub fn content_scores(&self, features: &Features) -> Result<Vec<f64>> {
        self.check_dim(features)?;
        let n = self.cell_count();
        let mut scores = vec![0.0_f64; n];
        for (k, &x) in features.as_slice().iter().enumerate() {
            if x == 0.0 {
                continue;
            }
            let row = &self.dejavu[k * n..(k + 1) * n];
            for (score, &v) in scores.iter_mut().zip(row) {
                *score += f64::from(x) * f64::from(v);
            }
        }
        Ok(scores)
    }

    /// Joint temporal and content ranking: `(T · D) ⊙ (features · V)`.
    ///
    /// # Errors
    /// Returns [`SeqMemError::DimensionMismatch`].
    pub fn match_scores(&self, features: &Features) -> Result<Vec<f64>> {
        let content = self.content_scores(features)?;
        Ok(self
            .dial
            .temporal_prior()
            .into_iter()
            .zip(content)
            .map(|(t, c)| t * c)
            .collect())
    }

    // ------------------------------------------------------------------
    // Pruning
    // ------------------------------------------------------------------

    /// Forget `cell` and the trail that led to it.
    ///
    /// Removes `cell`'s stored vector and cuts its strongest outgoing edge,
    /// then walks recorded predecessors backwards, removing each one's
    /// stored vector and the edge into the cell after it. The walk stops at
    /// a cell with no recorded predecessor, or at an ancestor with more than
    /// one live incoming edge. Such an ancestor keeps its vector but loses
    /// the edge, and is reported as the branch point unless the walk had
    /// already erased it. Déjà-vu columns are left as they are.
    ///
    /// # Errors
    /// Returns [`SeqMemError::CellOutOfRange`].
    pub fn forget_trail(&mut self, cell: usize) -> Result<TrailErasure> {
        self.dial.check(cell)?;
        let monitor = self.latency.clone();
        let _guard = monitor.as_deref().map(|m| m.begin("forget_trail"));

        let mut erasure = TrailErasure::default();
        erasure.trail.push(cell);
        if self.store[cell].take().is_some() {
            erasure.erased += 1;
        }

        if let Some(next) = self.dial.strongest_successor(cell)? {
            self.dial.sever(cell, next)?;
            erasure.severed_successor = Some(next);
        }

        let mut cur = cell;
        while let Some(pred) = self.dial.predecessor(cur)? {
            self.dial.sever(pred, cur)?;
            self.dial.forget_predecessor(cur, pred)?;

            if self.dial.in_degree(pred)? > 1 {
                if erasure.trail.contains(&pred) {
                    erasure.trail.push(pred);
                } else {
                    erasure.branch_point = Some(pred);
                }
                break;
            }

            erasure.trail.push(pred);
            if self.store[pred].take().is_some() {
                erasure.erased += 1;
            }
            cur = pred;
        }

        SeqMemCounters::bump(&self.counters.trails_forgotten);
        self.counters
            .cells_erased
            .fetch_add(erasure.erased as u64, Ordering::Relaxed);
        debug!(
            cell,
            erased = erasure.erased,
            trail_len = erasure.trail.len(),
            branch_point = ?erasure.branch_point,
            "Trail forgotten"
        );
        Ok(erasure)
    }
}

impl fmt::Debug for SequentialMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequentialMemory")
            .field("cells", &self.cell_count())
            .field("feature_dim", &self.feature_dim)
            .field("stored", &self.stored_count())
            .field("edges", &self.dial.edge_count())
            .field("recognition_threshold", &self.recognition_threshold)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Iterators
// ---------------------------------------------------------------------------

/// Learned continuations of one cell, strongest first.
///
/// Created by [`SequentialMemory::continuations`].
pub struct Continuations<'a> {
    memory: &'a SequentialMemory,
    weights: Vec<f64>,
}

impl Iterator for Continuations<'_> {
    type Item = (usize, Features);

    fn next(&mut self) -> Option<Self::Item> {
        let cell = argmax_positive(&self.weights)?;
        self.weights[cell] = 0.0;
        Some((cell, self.memory.stored_or_zero(cell)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.weights.iter().filter(|&&w| w > 0.0).count();
        (left, Some(left))
    }
}

/// A forward walk along the strongest learned transitions.
///
/// Created by [`SequentialMemory::replay`].
pub struct Replay<'a> {
    memory: &'a mut SequentialMemory,
    pending: Option<usize>,
    current: usize,
    remaining: usize,
}

impl Iterator for Replay<'_> {
    type Item = (usize, Features);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(start) = self.pending.take() {
            return Some((start, self.memory.stored_or_zero(start)));
        }
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        // `current` is always a valid cell here.
        match self.memory.next(self.current).ok().flatten() {
            Some((cell, features)) => {
                self.current = cell;
                Some((cell, features))
            }
            None => {
                self.remaining = 0;
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn memory(cells: usize, dim: usize) -> SequentialMemory {
        SequentialMemory::new(CellDial::new(cells).expect("dial"), dim).expect("memory")
    }

    #[test]
    fn zero_feature_dim_rejected() {
        let dial = CellDial::new(3).expect("dial");
        assert!(matches!(
            SequentialMemory::new(dial, 0),
            Err(SeqMemError::Config(_))
        ));
    }

    #[test]
    fn oversized_feature_dim_rejected() {
        let dial = CellDial::new(4).expect("dial");
        assert!(matches!(
            SequentialMemory::new(dial, usize::MAX / 2),
            Err(SeqMemError::Config(_))
        ));
    }

    #[test]
    fn retrieve_unknown_cell_is_zero() {
        let mem = memory(4, 3);
        let f = mem.retrieve(2).expect("in range");
        assert_eq!(f, Features::zeros(3));
        assert_eq!(mem.recall(2).expect("in range"), None);
    }

    #[test]
    fn memorize_overwrites_store_and_accumulates_dejavu() {
        let mut mem = memory(4, 2);
        mem.memorize(&Features(vec![1.0, 0.0]), 1).expect("memorize");
        mem.memorize(&Features(vec![0.0, 2.0]), 1).expect("memorize");

        assert_eq!(mem.retrieve(1).expect("in range"), Features(vec![0.0, 2.0]));
        assert_eq!(mem.dejavu_column(1).expect("in range"), vec![1.0, 2.0]);
        assert_eq!(mem.dejavu_column(0).expect("in range"), vec![0.0, 0.0]);
        assert_eq!(mem.stored_count(), 1);
    }

    #[test]
    fn memorize_validates_inputs() {
        let mut mem = memory(4, 2);
        assert!(matches!(
            mem.memorize(&Features(vec![1.0]), 0),
            Err(SeqMemError::DimensionMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            mem.memorize(&Features(vec![1.0, 1.0]), 4),
            Err(SeqMemError::CellOutOfRange { cell: 4, cell_count: 4 })
        ));
        assert_eq!(mem.stored_count(), 0);
    }

    #[test]
    fn record_rejects_bad_dimension_without_ticking() {
        let mut mem = memory(4, 2);
        mem.seed();
        let before = mem.dial().decay().to_vec();
        assert!(mem.record(&Features(vec![1.0, 2.0, 3.0])).is_err());
        assert_eq!(mem.dial().decay(), before.as_slice());
    }

    #[test]
    fn next_follows_recorded_sequence() {
        let mut mem = memory(5, 3);
        let start = mem.seed();
        let a = mem.record(&Features::one_hot(3, 0)).expect("record");
        let b = mem.record(&Features::one_hot(3, 1)).expect("record");

        assert_eq!(
            mem.next(start).expect("in range"),
            Some((a, Features::one_hot(3, 0)))
        );
        assert_eq!(
            mem.next(a).expect("in range"),
            Some((b, Features::one_hot(3, 1)))
        );
        assert_eq!(mem.next(b).expect("in range"), None);
    }

    #[test]
    fn continuations_are_strongest_first_and_leave_graph_alone() {
        let mut mem = memory(6, 2);
        let hub = mem.seed(); // 0
        mem.tic(); // 0 -> 1
        mem.dial.mark_used(hub).expect("in range");
        mem.tic(); // 0 -> 2
        mem.dial.mark_used(hub).expect("in range");
        mem.tic(); // 0 -> 3

        let before = mem.dial().transition_row(hub).expect("in range").to_vec();
        let order: Vec<usize> = mem
            .continuations(hub)
            .expect("in range")
            .map(|(cell, _)| cell)
            .collect();
        assert_eq!(order, vec![3, 2, 1]);
        assert_eq!(mem.dial().transition_row(hub).expect("in range"), before.as_slice());

        // Restartable.
        assert_eq!(mem.continuations(hub).expect("in range").count(), 3);
    }

    #[test]
    fn continuations_of_dead_end_are_empty() {
        let mem = memory(3, 2);
        assert_eq!(mem.continuations(1).expect("in range").count(), 0);
        assert!(mem.continuations(3).is_err());
    }

    #[test]
    fn recognize_novel_then_familiar() {
        let mut mem = memory(4, 3);
        let f = Features(vec![0.2, 0.5, 0.1]);

        let first = mem.recognize_or_memorize(&f).expect("recognize");
        assert!(matches!(first, Recognition::Novel(0)));

        let column = mem.dejavu_column(0).expect("in range");
        let second = mem.recognize_or_memorize(&f).expect("recognize");
        assert_eq!(second, Recognition::Familiar(0));
        assert_eq!(mem.dejavu_column(0).expect("in range"), column);
        assert_eq!(mem.stored_count(), 1);

        let snap = mem.counters().snapshot();
        assert_eq!((snap.novel, snap.recognized), (1, 1));
    }

    #[test]
    fn orthogonal_features_are_novel() {
        let mut mem = memory(4, 3);
        let a = mem.recognize_or_memorize(&Features::one_hot(3, 0)).expect("recognize");
        let b = mem.recognize_or_memorize(&Features::one_hot(3, 1)).expect("recognize");
        assert!(!a.is_familiar());
        assert!(!b.is_familiar());
        assert_ne!(a.cell(), b.cell());
    }

    #[test]
    fn recognition_threshold_raises_the_bar() {
        let mut config = SeqMemConfig::default();
        config.memory.feature_dim = 2;
        config.memory.recognition_threshold = 0.5;
        let mut mem = SequentialMemory::from_config(&config).expect("memory");

        mem.recognize_or_memorize(&Features(vec![1.0, 0.0])).expect("recognize");
        // Score 0.3 is positive but under the threshold.
        let weak = mem
            .recognize_or_memorize(&Features(vec![0.3, 0.0]))
            .expect("recognize");
        assert!(!weak.is_familiar());
    }

    #[test]
    fn match_scores_combine_time_and_content() {
        let mut mem = memory(4, 2);
        let start = mem.seed(); // 0
        let a = mem.record(&Features(vec![1.0, 0.0])).expect("record"); // 0 -> 1
        mem.memorize(&Features(vec![1.0, 0.0]), start).expect("memorize");

        // T·D = [D[1], 0, 0, 0] = [1, 0, 0, 0]; content = [1, 1, 0, 0].
        let scores = mem.match_scores(&Features(vec![1.0, 0.0])).expect("scores");
        assert_eq!(a, 1);
        assert_eq!(scores, vec![1.0, 0.0, 0.0, 0.0]);
        assert!(mem.match_scores(&Features(vec![1.0])).is_err());
    }

    #[test]
    fn forget_trail_erases_chain_back_to_seed() {
        let mut mem = memory(6, 2);
        let start = mem.seed();
        mem.memorize(&Features(vec![9.0, 9.0]), start).expect("memorize");
        let a = mem.record(&Features(vec![1.0, 0.0])).expect("record");
        let b = mem.record(&Features(vec![0.0, 1.0])).expect("record");
        let c = mem.record(&Features(vec![1.0, 1.0])).expect("record");

        let erasure = mem.forget_trail(b).expect("forget");
        assert_eq!(erasure.trail, vec![b, a, start]);
        assert_eq!(erasure.erased, 3);
        assert_eq!(erasure.severed_successor, Some(c));
        assert_eq!(erasure.branch_point, None);

        assert_eq!(mem.recall(b).expect("in range"), None);
        assert_eq!(mem.recall(a).expect("in range"), None);
        assert_eq!(mem.recall(start).expect("in range"), None);
        assert!(mem.recall(c).expect("in range").is_some());
        assert_eq!(mem.dial().edge_count(), 0);
    }

    #[test]
    fn forget_trail_never_reports_an_erased_cell_as_branch_point() {
        let mut mem = memory(3, 2);
        mem.seed(); // 0
        mem.tic(); // 0 -> 1
        mem.tic(); // 1 -> 2
        mem.tic(); // 2 -> 0
        mem.dial.mark_used(1).expect("in range");
        mem.dial.mark_used(2).expect("in range");
        mem.tic(); // 0 -> 0
        mem.tic(); // 0 -> 1
        mem.dial.mark_used(2).expect("in range");
        mem.tic(); // 1 -> 0
        for cell in 0..3 {
            mem.memorize(&Features::one_hot(2, cell % 2), cell).expect("memorize");
        }
        // Cell 0 is fed by itself, by 1 and by 2.
        assert_eq!(mem.dial().in_degree(0).expect("in range"), 3);

        let erasure = mem.forget_trail(0).expect("forget");
        assert_eq!(erasure.trail, vec![0, 1, 0]);
        assert_eq!(erasure.branch_point, None);
        assert_eq!(erasure.severed_successor, Some(1));
        assert_eq!(erasure.erased, 2);
        assert!(mem.recall(2).expect("in range").is_some());
    }

    #[test]
    fn forget_trail_on_isolated_cell() {
        let mut mem = memory(3, 2);
        mem.memorize(&Features(vec![1.0, 1.0]), 2).expect("memorize");
        let erasure = mem.forget_trail(2).expect("forget");
        assert_eq!(erasure.trail, vec![2]);
        assert_eq!(erasure.erased, 1);
        assert_eq!(erasure.severed_successor, None);
        assert!(mem.forget_trail(3).is_err());
    }

    #[test]
    fn forget_trail_keeps_dejavu() {
        let mut mem = memory(4, 2);
        let f = Features(vec![1.0, 0.0]);
        let cell = mem.recognize_or_memorize(&f).expect("recognize").cell();
        mem.forget_trail(cell).expect("forget");

        assert_eq!(mem.recall(cell).expect("in range"), None);
        assert_eq!(
            mem.recognize_or_memorize(&f).expect("recognize"),
            Recognition::Familiar(cell)
        );
    }

    #[test]
    fn replay_yields_start_then_steps() {
        let mut mem = memory(5, 2);
        let start = mem.seed();
        mem.memorize(&Features(vec![1.0, 0.0]), start).expect("memorize");
        mem.record(&Features(vec![0.0, 1.0])).expect("record");
        mem.record(&Features(vec![1.0, 1.0])).expect("record");

        let walk: Vec<Features> = mem
            .replay(start, 10)
            .expect("in range")
            .map(|(_, f)| f)
            .collect();
        assert_eq!(
            walk,
            vec![
                Features(vec![1.0, 0.0]),
                Features(vec![0.0, 1.0]),
                Features(vec![1.0, 1.0]),
            ]
        );
        assert!(mem.replay(5, 1).is_err());
    }

    #[test]
    fn latency_tracked_when_enabled() {
        let mut config = SeqMemConfig::default();
        config.telemetry.track_latency = true;
        let mut mem = SequentialMemory::from_config(&config).expect("memory");
        mem.recognize_or_memorize(&Features::one_hot(4, 1)).expect("recognize");
        mem.forget_trail(0).expect("forget");

        let monitor = mem.latency().expect("latency enabled");
        assert_eq!(monitor.sample_count(), 2);
    }

    #[test]
    fn debug_output_summarizes() {
        let mem = memory(3, 2);
        let out = format!("{mem:?}");
        assert!(out.contains("cells: 3"));
        assert!(out.contains("feature_dim: 2"));
    }
}
