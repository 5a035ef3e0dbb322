//! Engine module - owns the grid and score and runs the match algorithms
//!
//! Every public operation leaves the grid settled: no empty cells and no
//! marked cells. Board generation additionally guarantees no runs.

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::grid::Grid;
use crate::outcome::{CascadePass, Resolution, SwapOutcome};
use crate::rng::{SimpleRng, ValueSource};
use crate::runs;
use crate::snapshot::GridSnapshot;
use crate::types::{AdjacencyPolicy, Cell, Position, Value, CELL_DRAW_LIMIT};

#[derive(Debug, Clone)]
pub struct MatchEngine<R = SimpleRng> {
    config: EngineConfig,
    grid: Grid,
    score: u64,
    source: R,
}

impl MatchEngine<SimpleRng> {
    /// Create and initialise an engine driven by a seeded [`SimpleRng`]
    pub fn with_seed(config: EngineConfig, seed: u32) -> Result<Self, EngineError> {
        Self::new(config, SimpleRng::new(seed))
    }
}

impl<R: ValueSource> MatchEngine<R> {
    /// Validate `config` and generate a run-free board
    pub fn new(config: EngineConfig, source: R) -> Result<Self, EngineError> {
        config.validate()?;
        let mut engine = Self {
            grid: Grid::new(config.rows, config.columns),
            config,
            score: 0,
            source,
        };
        engine.init()?;
        Ok(engine)
    }

    /// Start from a preset layout (top row first). Score starts at zero.
    ///
    /// The layout may contain runs; they are cleared by the next committed swap.
    pub fn from_layout(
        config: EngineConfig,
        layout: &[Vec<Value>],
        source: R,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let mismatch = || EngineError::LayoutMismatch {
            rows: layout.len(),
            columns: layout.first().map_or(0, Vec::len),
            expected_rows: config.rows,
            expected_columns: config.columns,
        };

        let grid = Grid::from_values(layout).ok_or_else(mismatch)?;
        if grid.rows() != config.rows || grid.columns() != config.columns {
            return Err(mismatch());
        }
        for pos in grid.positions() {
            let value = grid.value(pos).unwrap_or(0);
            if value == 0 || value > config.elements {
                return Err(EngineError::ValueOutOfRange {
                    position: pos,
                    value,
                    elements: config.elements,
                });
            }
        }

        Ok(Self {
            config,
            grid,
            score: 0,
            source,
        })
    }

    /// Reset score and regenerate the board without runs.
    ///
    /// The board is built in a scratch grid and only replaces the current one
    /// once it is complete. On `InitExhausted` the previous board and score
    /// are left as they were.
    pub fn init(&mut self) -> Result<(), EngineError> {
        let attempts = self.config.max_init_attempts;
        for attempt in 1..=attempts {
            if let Some(grid) = self.try_generate() {
                debug!(attempt, rows = self.config.rows, columns = self.config.columns, "board generated");
                self.grid = grid;
                self.score = 0;
                return Ok(());
            }
            debug!(attempt, "board generation stuck, restarting");
        }
        Err(EngineError::InitExhausted { attempts })
    }

    /// Fill a fresh grid row-major so that no cell completes a run.
    ///
    /// A cell with no value left to try sends the search back to the previous
    /// cell. Gives up after `cell_count * CELL_DRAW_LIMIT` backtracks, or once
    /// the first cell runs out of values.
    fn try_generate(&mut self) -> Option<Grid> {
        let columns = self.config.columns;
        let cells = self.config.cell_count();
        let mut grid = Grid::new(self.config.rows, columns);
        // Untried values per cell, next one last
        let mut pending: Vec<Vec<Value>> = vec![Vec::new(); cells];
        let mut backtracks_left = cells * CELL_DRAW_LIMIT as usize;
        let mut index = 0;
        let mut entering = true;

        while index < cells {
            let pos = Position::new(index / columns, index % columns);
            if entering {
                pending[index] = self.candidates(&mut grid, pos);
            }
            match pending[index].pop() {
                Some(value) => {
                    grid.set(pos, Cell::Normal(value));
                    index += 1;
                    entering = true;
                }
                None => {
                    grid.set(pos, Cell::Empty);
                    if index == 0 || backtracks_left == 0 {
                        return None;
                    }
                    backtracks_left -= 1;
                    index -= 1;
                    entering = false;
                }
            }
        }
        Some(grid)
    }

    /// Values that can sit at `pos` without completing a run, in reverse try order.
    ///
    /// Up to `CELL_DRAW_LIMIT` draws pick the first value; the remaining
    /// allowed values follow it in ascending order, wrapping around.
    fn candidates(&mut self, grid: &mut Grid, pos: Position) -> Vec<Value> {
        let elements = self.config.elements;
        let allowed: Vec<Value> = (1..=elements)
            .filter(|&value| {
                grid.set(pos, Cell::Normal(value));
                !runs::has_run(grid, pos)
            })
            .collect();
        grid.set(pos, Cell::Empty);
        if allowed.is_empty() {
            return allowed;
        }

        let mut drawn = 0;
        for _ in 0..CELL_DRAW_LIMIT {
            drawn = self.source.next_value(elements);
            if allowed.contains(&drawn) {
                break;
            }
        }
        let start = allowed.iter().position(|&v| v >= drawn).unwrap_or(0);
        let mut order: Vec<Value> = allowed[start..]
            .iter()
            .chain(&allowed[..start])
            .copied()
            .collect();
        order.reverse();
        order
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    pub fn value_at(&self, pos: Position) -> Result<Value, EngineError> {
        self.check_bounds(pos)?;
        Ok(self.grid.value(pos).unwrap_or_default())
    }

    pub fn has_run(&self, pos: Position) -> Result<bool, EngineError> {
        self.check_bounds(pos)?;
        Ok(runs::has_run(&self.grid, pos))
    }

    pub fn has_horizontal_run(&self, pos: Position) -> Result<bool, EngineError> {
        self.check_bounds(pos)?;
        Ok(runs::has_horizontal_run(&self.grid, pos))
    }

    pub fn has_vertical_run(&self, pos: Position) -> Result<bool, EngineError> {
        self.check_bounds(pos)?;
        Ok(runs::has_vertical_run(&self.grid, pos))
    }

    fn check_bounds(&self, pos: Position) -> Result<(), EngineError> {
        if self.grid.contains(pos) {
            Ok(())
        } else {
            Err(EngineError::OutOfBounds {
                position: pos,
                rows: self.config.rows,
                columns: self.config.columns,
            })
        }
    }

    /// Swap two cells and resolve the resulting cascade.
    ///
    /// If neither cell ends up on a run the swap is undone and
    /// [`SwapOutcome::Rejected`] is returned with the grid and score untouched.
    pub fn try_swap(&mut self, a: Position, b: Position) -> Result<SwapOutcome, EngineError> {
        self.check_bounds(a)?;
        self.check_bounds(b)?;
        if self.config.adjacency == AdjacencyPolicy::Enforced && !a.is_adjacent(b) {
            return Err(EngineError::NotAdjacent { a, b });
        }

        self.grid.swap(a, b);
        if !runs::has_run(&self.grid, a) && !runs::has_run(&self.grid, b) {
            self.grid.swap(a, b);
            return Ok(SwapOutcome::Rejected);
        }

        Ok(SwapOutcome::Resolved(self.resolve_cascade()))
    }

    fn resolve_cascade(&mut self) -> Resolution {
        let start_score = self.score;
        let mut passes = Vec::new();

        loop {
            runs::mark_runs(&mut self.grid);
            let removed = self.grid.sweep_marked() as u32;
            if removed == 0 {
                break;
            }
            self.score += removed as u64;
            let after_removal = self.grid.snapshot();

            self.grid.apply_gravity();
            let elements = self.config.elements;
            self.grid.fill_empty(|| self.source.next_value(elements));
            let after_refill = self.grid.snapshot();

            debug!(pass = passes.len() + 1, removed, score = self.score, "cascade pass");
            passes.push(CascadePass {
                removed,
                after_removal,
                after_refill,
            });

            if passes.len() >= self.config.max_cascade_passes {
                warn!(
                    passes = passes.len(),
                    "cascade bound reached, leaving remaining runs for the next swap"
                );
                break;
            }
        }

        Resolution {
            passes,
            points: self.score - start_score,
            score: self.score,
        }
    }

    /// First adjacent swap (row-major, right neighbour before down) that forms a run.
    ///
    /// The grid is restored before returning.
    pub fn find_valid_swap(&mut self) -> Option<(Position, Position)> {
        let positions: Vec<Position> = self.grid.positions().collect();
        for a in positions {
            // Pairs with earlier cells were already tried from the other side.
            for b in self.grid.neighbors(a).into_iter().filter(|&b| b > a) {
                if self.grid.value(a) == self.grid.value(b) {
                    continue;
                }
                self.grid.swap(a, b);
                let forms_run = runs::has_run(&self.grid, a) || runs::has_run(&self.grid, b);
                self.grid.swap(a, b);
                if forms_run {
                    return Some((a, b));
                }
            }
        }
        None
    }

    /// False when no adjacent swap can ever be accepted (dead board)
    pub fn has_valid_swap(&mut self) -> bool {
        self.find_valid_swap().is_some()
    }
}
