//! Engine configuration

use crate::error::EngineError;
use crate::types::{
    AdjacencyPolicy, Value, DEFAULT_COLUMNS, DEFAULT_ELEMENTS, DEFAULT_INIT_ATTEMPTS,
    DEFAULT_MAX_CASCADE_PASSES, DEFAULT_ROWS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub rows: usize,
    pub columns: usize,
    /// Number of distinct tile values; tiles take values `1..=elements`.
    pub elements: Value,
    pub adjacency: AdjacencyPolicy,
    /// Whole-board restarts allowed while generating a run-free board.
    ///
    /// With three or more values generation never needs one. Two values
    /// rely on backtracking and can still exhaust it on very large boards.
    /// A single value only fits boards without three cells in a line.
    pub max_init_attempts: u32,
    /// Hard stop for a single swap's cascade.
    pub max_cascade_passes: usize,
}

impl EngineConfig {
    pub fn new(rows: usize, columns: usize, elements: Value) -> Self {
        Self {
            rows,
            columns,
            elements,
            ..Self::default()
        }
    }

    pub fn with_adjacency(mut self, adjacency: AdjacencyPolicy) -> Self {
        self.adjacency = adjacency;
        self
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(EngineError::InvalidDimensions {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.elements == 0 {
            return Err(EngineError::InvalidElements);
        }
        if self.max_init_attempts == 0 {
            return Err(EngineError::InvalidConfig("max_init_attempts must be positive"));
        }
        if self.max_cascade_passes == 0 {
            return Err(EngineError::InvalidConfig("max_cascade_passes must be positive"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            elements: DEFAULT_ELEMENTS,
            adjacency: AdjacencyPolicy::Enforced,
            max_init_attempts: DEFAULT_INIT_ATTEMPTS,
            max_cascade_passes: DEFAULT_MAX_CASCADE_PASSES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_degenerate_dimensions() {
        assert_eq!(
            EngineConfig::new(0, 4, 3).validate(),
            Err(EngineError::InvalidDimensions { rows: 0, columns: 4 })
        );
        assert_eq!(
            EngineConfig::new(4, 4, 0).validate(),
            Err(EngineError::InvalidElements)
        );
    }

    #[test]
    fn test_rejects_zero_bounds() {
        let mut config = EngineConfig::default();
        config.max_cascade_passes = 0;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }
}
