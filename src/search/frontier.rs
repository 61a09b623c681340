//! Nearest-unknown-cell search over raw grid adjacency.
//!
//! This answers "which unvisited cell is physically closest", not "which one
//! is reachable through confirmed moves", so walls are ignored.

use std::collections::VecDeque;

use crate::{
    types::Coord,
    world::{Grid, KnownCells},
};

/// Neighbour expansion order: +row, −row, +col, −col.
const EXPANSION: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Breadth-first search from `from` for the first coordinate not in `known`.
///
/// Ties in hop distance go to whichever cell was enqueued first. Returns
/// `None` when every grid cell is known or `from` is off-grid.
pub fn nearest_unknown(grid: &Grid, known: &KnownCells, from: Coord) -> Option<Coord> {
    let size = grid.size();
    if !grid.contains(from) {
        return None;
    }

    let mut seen = vec![false; size * size];
    let mut queue = VecDeque::new();
    mark(&mut seen, grid, from);
    queue.push_back(from);

    while let Some(at) = queue.pop_front() {
        if !known.contains(at) {
            return Some(at);
        }
        for (dr, dc) in EXPANSION {
            let next = Coord::new(at.row + dr, at.col + dc);
            if grid.contains(next) && mark(&mut seen, grid, next) {
                queue.push_back(next);
            }
        }
    }

    None
}

/// Mark `coord` as seen. Returns `false` if it already was.
fn mark(seen: &mut [bool], grid: &Grid, coord: Coord) -> bool {
    match grid.flat_index(coord) {
        Some(i) if !seen[i] => {
            seen[i] = true;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hops(a: Coord, b: Coord) -> i32 {
        (a.row - b.row).abs() + (a.col - b.col).abs()
    }

    #[test]
    fn test_center_of_three_by_three_finds_adjacent_cell() {
        let grid = Grid::new(3);
        let known: KnownCells = [Coord::new(1, 1)].into_iter().collect();

        let found = nearest_unknown(&grid, &known, Coord::new(1, 1)).unwrap();
        assert_eq!(hops(found, Coord::new(1, 1)), 1);
        // +row is expanded first
        assert_eq!(found, Coord::new(2, 1));
    }

    #[test]
    fn test_expansion_order_breaks_ties() {
        let grid = Grid::new(3);
        let known: KnownCells = [Coord::new(1, 1), Coord::new(2, 1)].into_iter().collect();
        assert_eq!(
            nearest_unknown(&grid, &known, Coord::new(1, 1)),
            Some(Coord::new(0, 1))
        );

        let known: KnownCells = [
            Coord::new(1, 1),
            Coord::new(2, 1),
            Coord::new(0, 1),
            Coord::new(1, 2),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            nearest_unknown(&grid, &known, Coord::new(1, 1)),
            Some(Coord::new(1, 0))
        );
    }

    #[test]
    fn test_unknown_start_is_returned_immediately() {
        let grid = Grid::new(4);
        let known = KnownCells::new();
        assert_eq!(
            nearest_unknown(&grid, &known, Coord::new(2, 3)),
            Some(Coord::new(2, 3))
        );
    }

    #[test]
    fn test_never_returns_known_and_none_when_full() {
        let grid = Grid::new(4);
        let mut known = KnownCells::new();
        let start = Coord::new(0, 0);

        while let Some(next) = nearest_unknown(&grid, &known, start) {
            assert!(!known.contains(next));
            known.insert(next);
        }

        assert_eq!(known.len(), 16);
        assert_eq!(nearest_unknown(&grid, &known, start), None);
    }

    #[test]
    fn test_finds_far_cell_with_minimum_hops() {
        let grid = Grid::new(5);
        let missing = Coord::new(4, 4);
        let known: KnownCells = grid.coords().filter(|&c| c != missing).collect();

        assert_eq!(nearest_unknown(&grid, &known, Coord::new(0, 0)), Some(missing));
    }

    #[test]
    fn test_off_grid_start() {
        let grid = Grid::new(3);
        assert_eq!(
            nearest_unknown(&grid, &KnownCells::new(), Coord::SENTINEL),
            None
        );
    }
}
