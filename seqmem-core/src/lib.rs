//! # SEQMEM Core Library
//!
//! An associative sequential memory. Moments in a sequence get compact,
//! rotating addresses ("cells"); consecutive cells are linked into a
//! transition graph that can be replayed forward; and feature vectors bound
//! to cells can later be recognized by content ("déjà vu").
//!
//! - [`CellDial`] — `N` cells with a self-halving recency signal. Allocates
//!   the stalest cell, links it to the most recent one, and answers
//!   successor / predecessor queries.
//! - [`SequentialMemory`] — owns a dial; binds [`Features`] to cells,
//!   recognizes them through the déjà-vu matrix, replays learned
//!   continuations, and prunes trails.
//!
//! ```rust
//! use seqmem_core::{CellDial, Features, SequentialMemory};
//!
//! let mut memory = SequentialMemory::new(CellDial::new(7)?, 4)?;
//! let start = memory.seed();
//! memory.memorize(&Features::one_hot(4, 0), start)?;
//! for axis in 1..4 {
//!     memory.record(&Features::one_hot(4, axis))?;
//! }
//!
//! let replayed: Vec<Features> = memory.replay(start, 3)?.map(|(_, f)| f).collect();
//! assert_eq!(replayed[3], Features::one_hot(4, 3));
//! # Ok::<(), seqmem_core::SeqMemError>(())
//! ```
//!
//! Every operation is a bounded O(N) or O(N · `feature_dim`) scan over
//! fixed-size structures. The engine is single-threaded; wrap a whole
//! session in one lock if it must be shared.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod dial;
pub mod error;
pub mod features;
pub mod matrix;
pub mod metrics;
pub mod sequence;

pub use config::SeqMemConfig;
pub use dial::CellDial;
pub use error::{Result, SeqMemError};
pub use features::Features;
pub use sequence::{Continuations, Recognition, Replay, SequentialMemory, TrailErasure};
