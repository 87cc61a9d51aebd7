use std::collections::{HashMap, VecDeque};

use crate::{Position, map::Grid, warehouse::CellKind};

/// Neighbor expansion order: up, down, left, right.
///
/// The order is part of the search contract: when several shortest paths
/// exist, the first one discovered under this priority is returned, so
/// repeated searches over the same grid yield the same route.
const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Finds a shortest path from `start` to `goal` using breadth-first search,
/// avoiding obstacle cells.
///
/// The returned path begins at `start`, ends at `goal`, and moves one cell
/// up, down, left, or right per step. Returns `None` when no route exists
/// under the current obstacle layout; callers treat that as a normal
/// outcome, not a failure of the search itself.
pub fn shortest_path(
    grid: &Grid<CellKind>,
    start: Position,
    goal: Position,
) -> Option<Vec<Position>> {
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return None;
    }

    let mut visited: Grid<bool> = Grid::new(grid.rows(), grid.cols());
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut queue: VecDeque<Position> = VecDeque::new();

    visited[start] = true;
    queue.push_back(start);

    let mut goal_reached = false;

    while let Some(current) = queue.pop_front() {
        if current == goal {
            goal_reached = true;
            break;
        }

        for (d_row, d_col) in DIRECTIONS {
            let Some(row) = current.row.checked_add_signed(d_row) else {
                continue;
            };
            let Some(col) = current.col.checked_add_signed(d_col) else {
                continue;
            };
            let next = Position { row, col };

            // A neighbor is eligible if it is in bounds, not yet visited,
            // and not an obstacle. Visited is marked at enqueue time, not
            // dequeue time.
            let Ok(kind) = grid.get(next) else {
                continue;
            };
            if *kind == CellKind::Obstacle || visited[next] {
                continue;
            }

            visited[next] = true;
            came_from.insert(next, current);
            queue.push_back(next);
        }
    }

    if !goal_reached {
        return None;
    }

    // Reconstruct by walking the parent links back from the goal.
    let mut path = Vec::new();
    let mut current = goal;
    path.push(current);

    while current != start {
        current = *came_from.get(&current)?;
        path.push(current);
    }

    path.reverse();
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::load_warehouse_from_string;

    fn pos(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    /// Independent distance oracle: flood the grid with relaxation passes
    /// until no cell improves, ignoring the search under test entirely.
    fn distance_oracle(grid: &Grid<CellKind>, start: Position) -> HashMap<Position, usize> {
        let mut dist = HashMap::from([(start, 0)]);
        loop {
            let mut changed = false;
            for (cell, _) in grid
                .enumerate()
                .filter(|(p, kind)| **kind != CellKind::Obstacle || *p == start)
            {
                let Some(&d) = dist.get(&cell) else {
                    continue;
                };
                for (d_row, d_col) in DIRECTIONS {
                    let Some(row) = cell.row.checked_add_signed(d_row) else {
                        continue;
                    };
                    let Some(col) = cell.col.checked_add_signed(d_col) else {
                        continue;
                    };
                    let next = Position { row, col };
                    if !grid.in_bounds(next) || grid[next] == CellKind::Obstacle {
                        continue;
                    }
                    if dist.get(&next).is_none_or(|&existing| existing > d + 1) {
                        dist.insert(next, d + 1);
                        changed = true;
                    }
                }
            }
            if !changed {
                return dist;
            }
        }
    }

    #[test]
    fn path_length_matches_distance_oracle() {
        let grid = load_warehouse_from_string(
            "
            . . . # .
            . A . # P
            . . . . .
            # # . # .
            P . . . D
            ",
        )
        .unwrap();
        let start = pos(1, 1);
        let oracle = distance_oracle(&grid, start);

        for (goal, kind) in grid.enumerate() {
            if *kind == CellKind::Obstacle {
                continue;
            }
            match shortest_path(&grid, start, goal) {
                Some(path) => {
                    assert_eq!(path.len() - 1, oracle[&goal], "goal {goal:?}");
                    assert_eq!(path.first(), Some(&start));
                    assert_eq!(path.last(), Some(&goal));
                }
                None => assert!(!oracle.contains_key(&goal), "goal {goal:?}"),
            }
        }
    }

    #[test]
    fn paths_avoid_obstacles_and_never_revisit() {
        let grid = load_warehouse_from_string(
            "
            A . # .
            . . # .
            # . . D
            ",
        )
        .unwrap();
        let path = shortest_path(&grid, pos(0, 0), pos(2, 3)).unwrap();

        let mut seen = std::collections::HashSet::new();
        for window in path.windows(2) {
            let (a, b) = (window[0], window[1]);
            let step = a.row.abs_diff(b.row) + a.col.abs_diff(b.col);
            assert_eq!(step, 1, "non-unit step {a:?} -> {b:?}");
        }
        for p in &path {
            assert_ne!(grid[*p], CellKind::Obstacle);
            assert!(seen.insert(*p), "revisited {p:?}");
        }
    }

    #[test]
    fn start_equals_goal_is_a_single_cell_path() {
        let grid = load_warehouse_from_string("A . D").unwrap();
        assert_eq!(shortest_path(&grid, pos(0, 1), pos(0, 1)), Some(vec![pos(0, 1)]));
    }

    #[test]
    fn unreachable_goal_returns_none() {
        let grid = load_warehouse_from_string(
            "
            A # P
            . # #
            ",
        )
        .unwrap();
        assert_eq!(shortest_path(&grid, pos(0, 0), pos(0, 2)), None);
    }

    #[test]
    fn equal_length_ties_resolve_by_direction_priority() {
        // Both down-then-right and right-then-down routes are shortest;
        // the up/down/left/right priority discovers the down route first.
        let grid = load_warehouse_from_string(". .\n. .").unwrap();
        let expected = vec![pos(0, 0), pos(1, 0), pos(1, 1)];
        assert_eq!(shortest_path(&grid, pos(0, 0), pos(1, 1)), Some(expected.clone()));
        // Deterministic across repeated calls.
        assert_eq!(shortest_path(&grid, pos(0, 0), pos(1, 1)), Some(expected));
    }

    #[test]
    fn out_of_bounds_endpoints_are_unreachable() {
        let grid = load_warehouse_from_string("A D").unwrap();
        assert_eq!(shortest_path(&grid, pos(0, 0), pos(5, 5)), None);
        assert_eq!(shortest_path(&grid, pos(3, 0), pos(0, 1)), None);
    }
}
