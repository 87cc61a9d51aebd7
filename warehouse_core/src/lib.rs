use serde::{Deserialize, Serialize};

pub mod delivery;
pub mod map;
pub mod path;
pub mod warehouse;

/// Represents a 2D grid coordinate as (row, column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}
