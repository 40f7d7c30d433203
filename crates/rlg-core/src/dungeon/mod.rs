//! Dungeon model: grids, generation, and pathfinding.

mod generation;
mod grid;
mod pathfind;
mod room;

pub use generation::generate;
pub use grid::{Dungeon, is_walkable};
pub use pathfind::{DistanceField, TraversalMode, UNREACHABLE};
pub use room::Room;
