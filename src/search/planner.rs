//! Shortest routes over the learned transition graph.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use crate::{
    types::{Coord, Direction},
    world::Grid,
};

/// Priority queue entry. Ordered by cost, then by insertion sequence so that
/// equal-cost entries leave the queue first-in first-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    cost: u32,
    seq: u64,
    node: usize,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.cost, self.seq).cmp(&(other.cost, other.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra from `start` to `goal` over explored, non-self-loop edges.
///
/// Every move costs 1. Returns the directions to issue, `Some(vec![])` when
/// `start == goal`, and `None` when no explored route exists or either
/// endpoint is off-grid.
pub fn shortest_path(grid: &Grid, start: Coord, goal: Coord) -> Option<Vec<Direction>> {
    let start_index = grid.flat_index(start)?;
    let goal_index = grid.flat_index(goal)?;
    if start_index == goal_index {
        return Some(Vec::new());
    }

    let cells = grid.size() * grid.size();
    let mut dist = vec![u32::MAX; cells];
    let mut prev: Vec<Option<(usize, Direction)>> = vec![None; cells];
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    dist[start_index] = 0;
    heap.push(Reverse(QueueEntry {
        cost: 0,
        seq,
        node: start_index,
    }));

    while let Some(Reverse(QueueEntry { cost, node, .. })) = heap.pop() {
        if cost > dist[node] {
            continue;
        }
        if node == goal_index {
            break;
        }

        let at = coord_of(node, grid.size());
        for (direction, destination) in grid.explored_edges(at) {
            let Some(next) = grid.flat_index(destination) else {
                continue;
            };
            let next_cost = cost + 1;
            if next_cost < dist[next] {
                dist[next] = next_cost;
                prev[next] = Some((node, direction));
                seq += 1;
                heap.push(Reverse(QueueEntry {
                    cost: next_cost,
                    seq,
                    node: next,
                }));
            }
        }
    }

    if dist[goal_index] == u32::MAX {
        return None;
    }

    let mut path = Vec::with_capacity(dist[goal_index] as usize);
    let mut current = goal_index;
    while current != start_index {
        let (from, direction) = prev[current]?;
        path.push(direction);
        current = from;
    }
    path.reverse();
    Some(path)
}

fn coord_of(index: usize, size: usize) -> Coord {
    Coord::new((index / size) as i32, (index % size) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction::{East, North, South, West};

    #[test]
    fn test_two_step_east_route() {
        let mut grid = Grid::new(3);
        grid.record_outcome(Coord::new(0, 0), East, Coord::new(0, 1), 0.0);
        grid.record_outcome(Coord::new(0, 1), East, Coord::new(0, 2), 0.0);

        assert_eq!(
            shortest_path(&grid, Coord::new(0, 0), Coord::new(0, 2)),
            Some(vec![East, East])
        );
    }

    #[test]
    fn test_unexplored_defaults_are_not_edges() {
        let grid = Grid::new(3);
        assert_eq!(shortest_path(&grid, Coord::new(0, 0), Coord::new(1, 0)), None);
    }

    #[test]
    fn test_same_start_and_goal() {
        let grid = Grid::new(3);
        assert_eq!(
            shortest_path(&grid, Coord::new(2, 2), Coord::new(2, 2)),
            Some(vec![])
        );
    }

    #[test]
    fn test_walls_are_excluded() {
        let mut grid = Grid::new(3);
        let a = Coord::new(0, 0);
        grid.record_outcome(a, North, a, 0.0);
        assert_eq!(shortest_path(&grid, a, Coord::new(0, 1)), None);
    }

    #[test]
    fn test_prefers_teleport_shortcut() {
        let mut grid = Grid::new(5);
        // Long way round: four steps along +row
        let mut at = Coord::new(0, 0);
        for _ in 0..4 {
            let next = at.step(East);
            grid.record_outcome(at, East, next, 0.0);
            at = next;
        }
        // Teleport from origin straight to the goal
        grid.record_outcome(Coord::new(0, 0), North, Coord::new(4, 0), 0.0);

        let path = shortest_path(&grid, Coord::new(0, 0), Coord::new(4, 0)).unwrap();
        assert_eq!(path, vec![North]);
    }

    #[test]
    fn test_path_replays_to_goal_with_minimum_length() {
        let mut grid = Grid::new(4);
        // Explore every in-bounds move faithfully, then wall off a column
        let coords: Vec<_> = grid.coords().collect();
        for at in coords {
            for direction in Direction::ALL {
                if let Some(next) = grid.neighbor(at, direction) {
                    grid.record_outcome(at, direction, next, 0.0);
                }
            }
        }
        for row in 0..3 {
            let at = Coord::new(row, 1);
            grid.record_outcome(at, North, at, 0.0);
            let across = Coord::new(row, 2);
            grid.record_outcome(across, South, across, 0.0);
        }

        let start = Coord::new(0, 1);
        let goal = Coord::new(0, 2);
        let path = shortest_path(&grid, start, goal).unwrap();
        assert_eq!(grid.follow(start, &path), Some(goal));
        // Around the wall: down to row 3, across, back up
        assert_eq!(path.len(), 7);
        assert!(path.contains(&West) || path.contains(&East));
    }

    #[test]
    fn test_equal_cost_ties_follow_insertion_order() {
        let mut grid = Grid::new(3);
        let start = Coord::new(0, 0);
        let goal = Coord::new(1, 1);
        // Two equal-length routes: N then E, or E then N
        grid.record_outcome(start, North, Coord::new(0, 1), 0.0);
        grid.record_outcome(start, East, Coord::new(1, 0), 0.0);
        grid.record_outcome(Coord::new(0, 1), East, goal, 0.0);
        grid.record_outcome(Coord::new(1, 0), North, goal, 0.0);

        // North is relaxed first, so its branch reaches the goal first
        assert_eq!(shortest_path(&grid, start, goal), Some(vec![North, East]));
    }
}
