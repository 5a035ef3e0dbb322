//! Grid tests - storage, gravity, refill, and run detection

use match_three::core::runs::{any_run, has_horizontal_run, has_run, has_vertical_run, mark_runs};
use match_three::core::Grid;
use match_three::types::{Cell, Position, Value};

fn grid(rows: &[&[Value]]) -> Grid {
    let values: Vec<Vec<Value>> = rows.iter().map(|r| r.to_vec()).collect();
    Grid::from_values(&values).unwrap()
}

fn column(grid: &Grid, column: usize) -> Vec<Option<Value>> {
    (0..grid.rows())
        .map(|row| grid.value(Position::new(row, column)))
        .collect()
}

#[test]
fn test_grid_new_is_empty() {
    let g = Grid::new(3, 4);
    assert_eq!(g.rows(), 3);
    assert_eq!(g.columns(), 4);
    assert_eq!(g.empty_count(), 12);
    assert!(!g.is_settled());

    for pos in g.positions() {
        assert_eq!(g.get(pos), Some(Cell::Empty), "cell {} should be empty", pos);
    }
}

#[test]
fn test_grid_get_out_of_bounds() {
    let g = Grid::new(3, 4);
    assert_eq!(g.get(Position::new(3, 0)), None);
    assert_eq!(g.get(Position::new(0, 4)), None);
    assert!(!g.contains(Position::new(3, 4)));
}

#[test]
fn test_positions_are_row_major() {
    let g = Grid::new(2, 3);
    let positions: Vec<Position> = g.positions().collect();
    assert_eq!(positions[0], Position::new(0, 0));
    assert_eq!(positions[2], Position::new(0, 2));
    assert_eq!(positions[3], Position::new(1, 0));
    assert_eq!(positions.len(), 6);
}

#[test]
fn test_swap_out_of_bounds_changes_nothing() {
    let mut g = grid(&[&[1, 2], &[3, 4]]);
    let before = g.clone();
    assert!(!g.swap(Position::new(0, 0), Position::new(0, 2)));
    assert_eq!(g, before);

    assert!(g.swap(Position::new(0, 0), Position::new(1, 1)));
    assert_eq!(g.value(Position::new(0, 0)), Some(4));
    assert_eq!(g.value(Position::new(1, 1)), Some(1));
}

#[test]
fn test_gravity_compacts_column_preserving_order() {
    // Column top to bottom: A, _, B, _, _  becomes  _, _, _, A, B
    let mut g = Grid::new(5, 1);
    g.set(Position::new(0, 0), Cell::Normal(1));
    g.set(Position::new(2, 0), Cell::Normal(2));

    let empties = g.drop_column(0);

    assert_eq!(empties, 3);
    assert_eq!(column(&g, 0), vec![None, None, None, Some(1), Some(2)]);
}

#[test]
fn test_gravity_on_full_column_is_noop() {
    let mut g = grid(&[&[1], &[2], &[3]]);
    assert_eq!(g.drop_column(0), 0);
    assert_eq!(column(&g, 0), vec![Some(1), Some(2), Some(3)]);
}

#[test]
fn test_gravity_leaves_other_columns_alone() {
    let mut g = grid(&[&[1, 4], &[2, 5], &[3, 6]]);
    g.set(Position::new(2, 0), Cell::Empty);
    g.apply_gravity();
    assert_eq!(column(&g, 0), vec![None, Some(1), Some(2)]);
    assert_eq!(column(&g, 1), vec![Some(4), Some(5), Some(6)]);
}

#[test]
fn test_fill_empty_is_row_major() {
    let mut g = Grid::new(2, 2);
    g.set(Position::new(1, 0), Cell::Normal(9));
    let mut next = 0;
    let filled = g.fill_empty(|| {
        next += 1;
        next
    });

    assert_eq!(filled, 3);
    assert_eq!(g.snapshot().to_rows(), vec![vec![Some(1), Some(2)], vec![Some(9), Some(3)]]);
    assert!(g.is_settled());
}

#[test]
fn test_sweep_only_clears_marked_cells() {
    let mut g = grid(&[&[1, 2, 3]]);
    g.set(Position::new(0, 1), Cell::Marked(2));
    assert!(!g.is_settled());
    assert_eq!(g.sweep_marked(), 1);
    assert_eq!(g.snapshot().to_rows(), vec![vec![Some(1), None, Some(3)]]);
}

#[test]
fn test_runs_need_three_in_a_line() {
    let g = grid(&[
        &[1, 1, 1, 2],
        &[2, 3, 1, 2],
        &[3, 2, 4, 2],
    ]);
    assert!(has_horizontal_run(&g, Position::new(0, 0)));
    assert!(has_horizontal_run(&g, Position::new(0, 2)));
    assert!(has_vertical_run(&g, Position::new(1, 3)));
    assert!(!has_vertical_run(&g, Position::new(0, 2)));
    assert!(!has_run(&g, Position::new(2, 2)));
    assert!(any_run(&g));
}

#[test]
fn test_mark_runs_l_shape() {
    let mut g = grid(&[
        &[5, 1, 2],
        &[5, 3, 4],
        &[5, 5, 5],
    ]);
    assert_eq!(mark_runs(&mut g), 5);
    assert_eq!(g.sweep_marked(), 5);
    assert_eq!(column(&g, 0), vec![None, None, None]);
    assert_eq!(g.value(Position::new(0, 1)), Some(1));
}

#[test]
fn test_snapshot_is_independent_copy() {
    let mut g = grid(&[&[1, 2], &[3, 4]]);
    let snap = g.snapshot();
    g.set(Position::new(0, 0), Cell::Empty);

    assert_eq!(snap.get(Position::new(0, 0)), Some(Some(1)));
    assert!(snap.is_full());
    assert_eq!(g.snapshot().empty_count(), 1);
    assert_eq!(snap.to_rows(), vec![vec![Some(1), Some(2)], vec![Some(3), Some(4)]]);
}
