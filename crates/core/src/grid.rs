//! Grid module - the tile matrix
//!
//! A `rows x columns` matrix stored as a flat row-major vector for cache locality.
//! Coordinates: row 0 is the top, column 0 the left edge; gravity pulls toward
//! the highest row index.

use arrayvec::ArrayVec;

use crate::snapshot::GridSnapshot;
use crate::types::{Cell, Position, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    /// Flat array of cells, row-major order (row * columns + column)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell empty
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![Cell::Empty; rows * columns],
        }
    }

    /// Build a settled grid from rows of values (top row first).
    ///
    /// Returns None for ragged input. Values are not range-checked here.
    pub fn from_values(values: &[Vec<Value>]) -> Option<Self> {
        let rows = values.len();
        let columns = values.first().map_or(0, Vec::len);
        if values.iter().any(|row| row.len() != columns) {
            return None;
        }

        let cells = values
            .iter()
            .flat_map(|row| row.iter().map(|&v| Cell::Normal(v)))
            .collect();
        Some(Self {
            rows,
            columns,
            cells,
        })
    }

    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row >= self.rows || pos.column >= self.columns {
            return None;
        }
        Some(pos.row * self.columns + pos.column)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// Get cell at position; None if out of bounds
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Tile value at position; None if out of bounds or empty
    pub fn value(&self, pos: Position) -> Option<Value> {
        self.get(pos).and_then(Cell::value)
    }

    /// Set cell at position; returns false if out of bounds
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Exchange two cells; returns false (and changes nothing) if either is out of bounds
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// In-bounds orthogonal neighbours in row-major order (up, left, right, down)
    pub fn neighbors(&self, pos: Position) -> ArrayVec<Position, 4> {
        let mut out = ArrayVec::new();
        if pos.row > 0 {
            out.push(Position::new(pos.row - 1, pos.column));
        }
        if pos.column > 0 {
            out.push(Position::new(pos.row, pos.column - 1));
        }
        if pos.column + 1 < self.columns {
            out.push(Position::new(pos.row, pos.column + 1));
        }
        if pos.row + 1 < self.rows {
            out.push(Position::new(pos.row + 1, pos.column));
        }
        out
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let columns = self.columns;
        (0..self.rows * columns).map(move |i| Position::new(i / columns, i % columns))
    }

    /// True when every cell holds an unmarked value
    pub fn is_settled(&self) -> bool {
        self.cells.iter().all(|c| c.is_settled())
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    /// Turn every marked cell into an empty one and return how many were cleared
    pub fn sweep_marked(&mut self) -> usize {
        let mut cleared = 0;
        for cell in &mut self.cells {
            if cell.is_marked() {
                *cell = Cell::Empty;
                cleared += 1;
            }
        }
        cleared
    }

    /// Compact one column's tiles toward the bottom, preserving their order.
    ///
    /// Two-pointer scan from the bottom: `write` trails `read` and receives each
    /// tile; everything above `write` ends up empty. Returns the number of empty
    /// cells left at the top of the column.
    pub fn drop_column(&mut self, column: usize) -> usize {
        if column >= self.columns {
            return 0;
        }

        let width = self.columns;
        let mut write = self.rows;
        for read in (0..self.rows).rev() {
            let src = read * width + column;
            if self.cells[src].is_empty() {
                continue;
            }
            write -= 1;
            if write != read {
                let dst = write * width + column;
                self.cells[dst] = self.cells[src];
                self.cells[src] = Cell::Empty;
            }
        }
        write
    }

    /// Apply gravity to every column
    pub fn apply_gravity(&mut self) {
        for column in 0..self.columns {
            self.drop_column(column);
        }
    }

    /// Fill every empty cell, row-major, with a value from `draw`.
    /// Returns the number of cells filled.
    pub fn fill_empty(&mut self, mut draw: impl FnMut() -> Value) -> usize {
        let mut filled = 0;
        for cell in &mut self.cells {
            if cell.is_empty() {
                *cell = Cell::Normal(draw());
                filled += 1;
            }
        }
        filled
    }

    /// Read-only view of the row-major cell storage
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Independent copy of the current state
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::new(
            self.rows,
            self.columns,
            self.cells.iter().map(|c| c.value()).collect(),
        )
    }
}
