//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine logic, wire protocol, rendering clients).
//!
//! # Grid Coordinates
//!
//! Positions are `(row, column)` pairs:
//!
//! - **row**: 0 is the top row, `rows - 1` the bottom (gravity pulls toward it)
//! - **column**: 0 is the leftmost column
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_ROWS` | 8 | Board height |
//! | `DEFAULT_COLUMNS` | 8 | Board width |
//! | `DEFAULT_ELEMENTS` | 5 | Distinct tile values (1..=5) |
//! | `MIN_RUN_LENGTH` | 3 | Shortest clearable run |
//! | `CELL_DRAW_LIMIT` | 32 | Random draws per cell before generation picks an allowed value directly |
//! | `DEFAULT_INIT_ATTEMPTS` | 16 | Board restarts before generation gives up |
//! | `DEFAULT_MAX_CASCADE_PASSES` | 1024 | Upper bound on passes for one swap |
//!
//! # Examples
//!
//! ```
//! use match_three_types::{Cell, Direction, Position};
//!
//! let a = Position::new(2, 3);
//! assert!(a.is_adjacent(Position::new(2, 4)));
//! assert!(!a.is_adjacent(Position::new(3, 4)));
//!
//! let cell = Cell::Normal(4);
//! assert_eq!(cell.mark(), Cell::Marked(4));
//! assert_eq!(cell.mark().value(), Some(4));
//!
//! assert_eq!(Direction::Horizontal.step(a, 1), Some(Position::new(2, 4)));
//! ```

use std::fmt;

/// A tile value. Valid values lie in `1..=elements`.
pub type Value = u8;

/// Default board height (8 rows)
pub const DEFAULT_ROWS: usize = 8;

/// Default board width (8 columns)
pub const DEFAULT_COLUMNS: usize = 8;

/// Default number of distinct tile values
pub const DEFAULT_ELEMENTS: Value = 5;

/// A run must cover at least this many collinear cells to clear
pub const MIN_RUN_LENGTH: usize = 3;

/// Random draws for a single cell while generating a board; also scales the
/// backtracking budget (`cells * CELL_DRAW_LIMIT`)
pub const CELL_DRAW_LIMIT: u32 = 32;

/// Whole-board generation attempts before giving up
pub const DEFAULT_INIT_ATTEMPTS: u32 = 16;

/// Cascade passes allowed for a single swap
pub const DEFAULT_MAX_CASCADE_PASSES: usize = 1024;

/// A `(row, column)` grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// True for orthogonal neighbours (shared edge). A position is not adjacent to itself.
    pub fn is_adjacent(self, other: Position) -> bool {
        let same_column = self.column == other.column && self.row.abs_diff(other.row) == 1;
        let same_row = self.row == other.row && self.column.abs_diff(other.column) == 1;
        same_column || same_row
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Per-cell state during resolution.
///
/// `Marked` only exists between the mark and sweep steps of a cascade pass;
/// a settled grid holds nothing but `Normal` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    Normal(Value),
    Marked(Value),
    #[default]
    Empty,
}

impl Cell {
    /// Tile value regardless of mark state; `None` for empty cells.
    #[inline]
    pub fn value(self) -> Option<Value> {
        match self {
            Cell::Normal(v) | Cell::Marked(v) => Some(v),
            Cell::Empty => None,
        }
    }

    /// Mark for removal. Marking twice is a no-op, marking an empty cell does nothing.
    #[inline]
    pub fn mark(self) -> Self {
        match self {
            Cell::Normal(v) | Cell::Marked(v) => Cell::Marked(v),
            Cell::Empty => Cell::Empty,
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_marked(self) -> bool {
        matches!(self, Cell::Marked(_))
    }

    pub fn is_settled(self) -> bool {
        matches!(self, Cell::Normal(_))
    }
}

/// Axis along which runs are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Horizontal, Direction::Vertical];

    /// Move `offset` cells along this axis (negative = up/left).
    ///
    /// Returns None when the step would leave the non-negative quadrant; upper
    /// bounds are the grid's concern.
    pub fn step(self, pos: Position, offset: isize) -> Option<Position> {
        match self {
            Direction::Horizontal => pos
                .column
                .checked_add_signed(offset)
                .map(|column| Position::new(pos.row, column)),
            Direction::Vertical => pos
                .row
                .checked_add_signed(offset)
                .map(|row| Position::new(row, pos.column)),
        }
    }
}

/// Who is responsible for rejecting swaps between non-neighbouring cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdjacencyPolicy {
    /// The engine refuses non-adjacent swaps with an error.
    #[default]
    Enforced,
    /// The caller pre-filters; the engine accepts any two in-bounds positions.
    CallerChecked,
}

impl AdjacencyPolicy {
    /// Parse from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use match_three_types::AdjacencyPolicy;
    ///
    /// assert_eq!(AdjacencyPolicy::parse("enforced"), Some(AdjacencyPolicy::Enforced));
    /// assert_eq!(AdjacencyPolicy::parse("Caller"), Some(AdjacencyPolicy::CallerChecked));
    /// assert_eq!(AdjacencyPolicy::parse("sometimes"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "enforced" | "engine" => Some(AdjacencyPolicy::Enforced),
            "caller" | "caller_checked" | "caller-checked" => Some(AdjacencyPolicy::CallerChecked),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AdjacencyPolicy::Enforced => "enforced",
            AdjacencyPolicy::CallerChecked => "caller",
        }
    }
}
