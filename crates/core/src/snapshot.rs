use crate::types::{Position, Value};

/// Immutable copy of the grid at one instant, for replay by a rendering client.
///
/// Cells are row-major; `None` marks a vacated cell awaiting refill.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridSnapshot {
    rows: usize,
    columns: usize,
    cells: Vec<Option<Value>>,
}

impl GridSnapshot {
    pub(crate) fn new(rows: usize, columns: usize, cells: Vec<Option<Value>>) -> Self {
        debug_assert_eq!(cells.len(), rows * columns);
        Self {
            rows,
            columns,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Cell at position: `None` if out of bounds, `Some(None)` if empty
    pub fn get(&self, pos: Position) -> Option<Option<Value>> {
        if pos.row >= self.rows || pos.column >= self.columns {
            return None;
        }
        Some(self.cells[pos.row * self.columns + pos.column])
    }

    pub fn cells(&self) -> &[Option<Value>] {
        &self.cells
    }

    /// Iterate rows, top first
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Option<Value>]> {
        self.cells.chunks(self.columns.max(1))
    }

    pub fn to_rows(&self) -> Vec<Vec<Option<Value>>> {
        self.iter_rows().map(<[_]>::to_vec).collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// True when no cell is empty
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}
