//! Run detection and marking
//!
//! A run is three or more collinear cells holding the same value. Marked cells
//! still count by value, so marking one axis never hides a run on the other.

use crate::grid::Grid;
use crate::types::{Direction, Position, MIN_RUN_LENGTH};

/// Length of the line of equal values through `pos` along `direction`.
///
/// Zero for empty or out-of-bounds cells.
pub fn run_length(grid: &Grid, pos: Position, direction: Direction) -> usize {
    let Some(value) = grid.value(pos) else {
        return 0;
    };

    let mut length = 1;
    for sign in [-1isize, 1] {
        let mut offset = sign;
        while let Some(next) = direction.step(pos, offset) {
            if grid.value(next) != Some(value) {
                break;
            }
            length += 1;
            offset += sign;
        }
    }
    length
}

pub fn has_horizontal_run(grid: &Grid, pos: Position) -> bool {
    run_length(grid, pos, Direction::Horizontal) >= MIN_RUN_LENGTH
}

pub fn has_vertical_run(grid: &Grid, pos: Position) -> bool {
    run_length(grid, pos, Direction::Vertical) >= MIN_RUN_LENGTH
}

/// True if `pos` belongs to a run on either axis
pub fn has_run(grid: &Grid, pos: Position) -> bool {
    has_vertical_run(grid, pos) || has_horizontal_run(grid, pos)
}

/// True if any cell of the grid belongs to a run
pub fn any_run(grid: &Grid) -> bool {
    grid.positions().any(|pos| has_run(grid, pos))
}

/// Mark `pos` and its contiguous equal neighbours along `direction`.
fn mark_line(grid: &mut Grid, pos: Position, direction: Direction) {
    let Some(cell) = grid.get(pos) else {
        return;
    };
    let Some(value) = cell.value() else {
        return;
    };
    grid.set(pos, cell.mark());

    for sign in [-1isize, 1] {
        let mut offset = sign;
        while let Some(next) = direction.step(pos, offset) {
            match grid.get(next) {
                Some(c) if c.value() == Some(value) => {
                    grid.set(next, c.mark());
                }
                _ => break,
            }
            offset += sign;
        }
    }
}

/// Mark every cell that belongs to a run, scanning row-major.
///
/// Each axis is checked independently per cell; a cell on two runs is marked
/// once. Returns the number of marked cells.
pub fn mark_runs(grid: &mut Grid) -> usize {
    let positions: Vec<Position> = grid.positions().collect();
    for pos in positions {
        for direction in Direction::ALL {
            if run_length(grid, pos, direction) >= MIN_RUN_LENGTH {
                mark_line(grid, pos, direction);
            }
        }
    }
    grid.cells().iter().filter(|c| c.is_marked()).count()
}
