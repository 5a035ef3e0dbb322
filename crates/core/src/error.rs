use thiserror::Error;

use crate::types::{Position, Value};

/// Contract violations and unsatisfiable configurations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("grid must have at least one row and one column (got {rows}x{columns})")]
    InvalidDimensions { rows: usize, columns: usize },
    #[error("at least one tile value is required")]
    InvalidElements,
    #[error("invalid engine config: {0}")]
    InvalidConfig(&'static str),
    #[error("position {position} is outside the {rows}x{columns} grid")]
    OutOfBounds {
        position: Position,
        rows: usize,
        columns: usize,
    },
    #[error("positions {a} and {b} are not adjacent")]
    NotAdjacent { a: Position, b: Position },
    #[error("could not generate a board without runs after {attempts} attempts")]
    InitExhausted { attempts: u32 },
    #[error("layout is {rows}x{columns}, expected {expected_rows}x{expected_columns}")]
    LayoutMismatch {
        rows: usize,
        columns: usize,
        expected_rows: usize,
        expected_columns: usize,
    },
    #[error("value {value} at {position} is outside 1..={elements}")]
    ValueOutOfRange {
        position: Position,
        value: Value,
        elements: Value,
    },
}

impl EngineError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidDimensions { .. }
            | EngineError::InvalidElements
            | EngineError::InvalidConfig(_) => "invalid_config",
            EngineError::OutOfBounds { .. } => "out_of_bounds",
            EngineError::NotAdjacent { .. } => "not_adjacent",
            EngineError::InitExhausted { .. } => "init_exhausted",
            EngineError::LayoutMismatch { .. } | EngineError::ValueOutOfRange { .. } => {
                "invalid_layout"
            }
        }
    }
}
