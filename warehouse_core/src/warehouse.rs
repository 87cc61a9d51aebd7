use serde::{Deserialize, Serialize};

use crate::{Position, map::Grid};

/// Represents the role of a single cell on the warehouse floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Obstacle,
    AgentStart,
    Pickup,
    Dropoff,
}

impl Default for CellKind {
    fn default() -> Self {
        CellKind::Empty
    }
}

/// Represents errors raised while parsing a warehouse map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("Map string is empty")]
    EmptyMap,
    #[error("Map has zero width")]
    ZeroWidth,
    #[error("Inconsistent width at row {row}: expected {expected}, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Unknown map token '{token}' at position ({row}, {col})")]
    UnknownToken {
        token: String,
        row: usize,
        col: usize,
    },
}

/// Represents configuration problems that prevent a delivery run from starting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("No agent start cell found on the warehouse floor")]
    MissingAgentStart,
    #[error("No drop-off cell found on the warehouse floor")]
    MissingDropoff,
}

/// Loads a warehouse floor grid from a string representation of a map.
///
/// Rows are newline-separated; cells are whitespace-separated tokens:
/// `.` empty floor, `#` obstacle, `A` agent start, `P` pickup, `D` drop-off.
pub fn load_warehouse_from_string(map_string: &str) -> Result<Grid<CellKind>, LoadError> {
    let lines: Vec<&str> = map_string.trim().lines().collect();
    if lines.is_empty() {
        return Err(LoadError::EmptyMap);
    }

    let rows = lines.len();
    let mut cols = 0;
    let mut parsed_rows: Vec<Vec<&str>> = Vec::with_capacity(rows);

    for (row, line) in lines.iter().enumerate() {
        let tokens: Vec<&str> = line.trim().split_whitespace().collect();
        if row == 0 {
            cols = tokens.len();
            if cols == 0 {
                return Err(LoadError::ZeroWidth);
            }
        } else if tokens.len() != cols {
            return Err(LoadError::RaggedRow {
                row,
                expected: cols,
                found: tokens.len(),
            });
        }
        parsed_rows.push(tokens);
    }

    let mut grid = Grid::new(rows, cols);
    for (row, row_tokens) in parsed_rows.iter().enumerate() {
        for (col, token) in row_tokens.iter().enumerate() {
            let kind = match *token {
                "." => CellKind::Empty,
                "#" => CellKind::Obstacle,
                "A" => CellKind::AgentStart,
                "P" => CellKind::Pickup,
                "D" => CellKind::Dropoff,
                unknown => {
                    return Err(LoadError::UnknownToken {
                        token: unknown.to_string(),
                        row,
                        col,
                    });
                }
            };
            grid[Position { row, col }] = kind;
        }
    }

    Ok(grid)
}

/// Finds the agent's starting position: the first `AgentStart` cell in
/// row-major scan order.
pub fn locate_agent_start(grid: &Grid<CellKind>) -> Result<Position, ConfigError> {
    grid.enumerate()
        .find_map(|(pos, kind)| (*kind == CellKind::AgentStart).then_some(pos))
        .ok_or(ConfigError::MissingAgentStart)
}

/// Finds the drop-off position: the first `Dropoff` cell in row-major scan
/// order.
pub fn locate_dropoff(grid: &Grid<CellKind>) -> Result<Position, ConfigError> {
    grid.enumerate()
        .find_map(|(pos, kind)| (*kind == CellKind::Dropoff).then_some(pos))
        .ok_or(ConfigError::MissingDropoff)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    const MAP: &str = "
        A . #
        . P .
        # . D
    ";

    #[test]
    fn loads_tokens_into_cell_kinds() {
        let grid = load_warehouse_from_string(MAP).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid[pos(0, 0)], CellKind::AgentStart);
        assert_eq!(grid[pos(0, 1)], CellKind::Empty);
        assert_eq!(grid[pos(0, 2)], CellKind::Obstacle);
        assert_eq!(grid[pos(1, 1)], CellKind::Pickup);
        assert_eq!(grid[pos(2, 2)], CellKind::Dropoff);
    }

    #[test]
    fn rejects_empty_map() {
        assert_eq!(load_warehouse_from_string("  \n  "), Err(LoadError::EmptyMap));
    }

    #[test]
    fn rejects_ragged_rows() {
        let result = load_warehouse_from_string("A . .\n. .");
        assert_eq!(
            result,
            Err(LoadError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn rejects_unknown_tokens() {
        let result = load_warehouse_from_string("A . X");
        assert_eq!(
            result,
            Err(LoadError::UnknownToken {
                token: "X".to_string(),
                row: 0,
                col: 2,
            })
        );
    }

    #[test]
    fn locates_start_and_dropoff() {
        let grid = load_warehouse_from_string(MAP).unwrap();
        assert_eq!(locate_agent_start(&grid), Ok(pos(0, 0)));
        assert_eq!(locate_dropoff(&grid), Ok(pos(2, 2)));
    }

    #[test]
    fn missing_start_and_dropoff_are_config_errors() {
        let grid = load_warehouse_from_string(". . .\n. # .").unwrap();
        assert_eq!(
            locate_agent_start(&grid),
            Err(ConfigError::MissingAgentStart)
        );
        assert_eq!(locate_dropoff(&grid), Err(ConfigError::MissingDropoff));
    }

    #[test]
    fn first_match_in_row_major_order_wins() {
        let grid = load_warehouse_from_string("D A .\nA . D").unwrap();
        assert_eq!(locate_agent_start(&grid), Ok(pos(0, 1)));
        assert_eq!(locate_dropoff(&grid), Ok(pos(0, 0)));
    }
}
