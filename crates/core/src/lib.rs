//! Core match-resolution engine - pure, deterministic, and testable
//!
//! This crate contains the board rules and the cascade algorithm.
//! It has **no dependencies** on rendering, networking, or I/O, making it:
//!
//! - **Deterministic**: the same seed (or scripted value source) replays the same game
//! - **Testable**: every rule is exercised by unit tests
//! - **Portable**: can sit behind a terminal, GUI, web bridge, or headless bot
//!
//! # Module Structure
//!
//! - [`grid`]: flat row-major tile matrix with gravity and refill primitives
//! - [`runs`]: horizontal/vertical run detection and marking
//! - [`engine`]: [`MatchEngine`], which owns grid and score and resolves swaps
//! - [`rng`]: seedable value sources
//! - [`snapshot`]: immutable grid copies handed to rendering clients
//! - [`outcome`]: what a swap produced
//!
//! # Game Rules
//!
//! - **Generation**: the board is filled row-major, redrawing any value that
//!   would complete a run, so a fresh board never contains one
//! - **Swap**: two cells are exchanged; if neither lands on a run of 3+ the
//!   swap is undone and rejected
//! - **Cascade**: every run is marked and cleared, tiles fall, empty cells are
//!   refilled at random (no run avoidance), and the scan repeats until a pass
//!   clears nothing
//! - **Scoring**: one point per cleared cell
//!
//! # Example
//!
//! ```
//! use match_three_core::{EngineConfig, MatchEngine, SwapOutcome};
//! use match_three_core::types::Position;
//!
//! let mut engine = MatchEngine::with_seed(EngineConfig::new(8, 8, 5), 12345).unwrap();
//!
//! if let Some((a, b)) = engine.find_valid_swap() {
//!     match engine.try_swap(a, b).unwrap() {
//!         SwapOutcome::Resolved(resolution) => {
//!             assert_eq!(resolution.snapshots().count() % 2, 0);
//!             assert!(engine.score() >= 3);
//!         }
//!         SwapOutcome::Rejected => unreachable!("hint swaps always form a run"),
//!     }
//! }
//!
//! // Positions outside the board are contract violations, not rejections.
//! assert!(engine.try_swap(Position::new(0, 7), Position::new(0, 8)).is_err());
//! assert!(engine.grid().is_settled());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod outcome;
pub mod rng;
pub mod runs;
pub mod snapshot;

pub use match_three_types as types;

// Re-export commonly used types for convenience
pub use config::EngineConfig;
pub use engine::MatchEngine;
pub use error::EngineError;
pub use grid::Grid;
pub use outcome::{CascadePass, Resolution, SwapOutcome};
pub use rng::{ScriptedSource, SimpleRng, ValueSource};
pub use snapshot::GridSnapshot;
