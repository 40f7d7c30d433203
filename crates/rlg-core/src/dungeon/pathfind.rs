//! Shortest-path distance fields.
//!
//! Dijkstra over 8-directional adjacency from a single origin, producing a
//! full-grid cost array. Two cost models exist because the two movement
//! classes of monsters traverse rock differently; both fields are recomputed
//! from scratch on every player move.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::consts::{COLNO, DIG_STRENGTH, ROWNO};

use super::Dungeon;

/// Sentinel for cells the origin cannot reach
pub const UNREACHABLE: u32 = u32::MAX;

const DIRS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Which cost model to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalMode {
    /// Open cells only (hardness exactly 0), unit cost
    Floor,
    /// Anything but immutable rock; diggable cells cost 1 + hardness/85
    Tunnel,
}

/// Full-grid shortest-path cost array from one origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    cells: [[u32; COLNO]; ROWNO],
}

impl DistanceField {
    /// An all-unreachable field, used before the first computation
    pub fn empty() -> Self {
        Self {
            cells: [[UNREACHABLE; COLNO]; ROWNO],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.cells[y][x]
    }

    /// Cost to enter a neighbor cell, or None if it is impassable under
    /// this mode.
    fn step_cost(dungeon: &Dungeon, x: usize, y: usize, mode: TraversalMode) -> Option<u32> {
        let h = dungeon.hardness_at(x, y);
        match mode {
            TraversalMode::Floor => (h == 0).then_some(1),
            TraversalMode::Tunnel => match h {
                255 => None,
                0 => Some(1),
                h => Some(1 + (h / DIG_STRENGTH) as u32),
            },
        }
    }

    /// Compute the field from `origin` under the given cost model
    pub fn compute(dungeon: &Dungeon, origin: (i32, i32), mode: TraversalMode) -> Self {
        let mut field = Self::empty();
        let (ox, oy) = origin;
        if !Dungeon::in_bounds(ox, oy) {
            return field;
        }
        field.cells[oy as usize][ox as usize] = 0;

        let mut heap = BinaryHeap::new();
        heap.push(Reverse((0u32, ox, oy)));

        while let Some(Reverse((dist, x, y))) = heap.pop() {
            if dist > field.cells[y as usize][x as usize] {
                continue;
            }
            for (dx, dy) in DIRS {
                let nx = x + dx;
                let ny = y + dy;
                if !Dungeon::in_bounds(nx, ny) {
                    continue;
                }
                let Some(cost) = Self::step_cost(dungeon, nx as usize, ny as usize, mode) else {
                    continue;
                };
                let alt = dist + cost;
                if alt < field.cells[ny as usize][nx as usize] {
                    field.cells[ny as usize][nx as usize] = alt;
                    heap.push(Reverse((alt, nx, ny)));
                }
            }
        }

        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::generation::generate;
    use crate::rng::GameRng;
    use proptest::prelude::*;

    fn open_dungeon() -> Dungeon {
        // 10x10 open patch in otherwise solid rock
        let mut dungeon = Dungeon::default();
        for y in 0..crate::consts::ROWNO {
            for x in 0..crate::consts::COLNO {
                dungeon.hardness[y][x] = 255;
            }
        }
        for y in 1..=10 {
            for x in 1..=10 {
                dungeon.live[y][x] = crate::consts::S_FLOOR;
                dungeon.hardness[y][x] = 0;
            }
        }
        dungeon
    }

    #[test]
    fn test_origin_is_zero() {
        let dungeon = open_dungeon();
        let field = DistanceField::compute(&dungeon, (5, 5), TraversalMode::Floor);
        assert_eq!(field.get(5, 5), 0);
    }

    #[test]
    fn test_diagonal_unit_cost() {
        let dungeon = open_dungeon();
        let field = DistanceField::compute(&dungeon, (1, 1), TraversalMode::Floor);
        // Chebyshev metric on an open grid
        assert_eq!(field.get(2, 2), 1);
        assert_eq!(field.get(10, 10), 9);
        assert_eq!(field.get(10, 1), 9);
    }

    #[test]
    fn test_sealed_cells_unreachable() {
        let dungeon = open_dungeon();
        let field = DistanceField::compute(&dungeon, (5, 5), TraversalMode::Floor);
        assert_eq!(field.get(20, 15), UNREACHABLE);
        // Immutable rock is unreachable even to tunnelers
        let tunnel = DistanceField::compute(&dungeon, (5, 5), TraversalMode::Tunnel);
        assert_eq!(tunnel.get(20, 15), UNREACHABLE);
    }

    #[test]
    fn test_tunnel_cost_scales_with_hardness() {
        let mut dungeon = open_dungeon();
        // A soft, a medium, and a hard cell next to the open patch
        dungeon.hardness[5][11] = 84; // cost 1
        dungeon.hardness[6][11] = 170; // cost 3
        dungeon.hardness[7][11] = 254; // cost 3 (254/85 == 2)

        let field = DistanceField::compute(&dungeon, (10, 5), TraversalMode::Tunnel);
        assert_eq!(field.get(11, 5), 1);
        assert_eq!(field.get(11, 6), 3);
        // (11, 7) costs 3 to enter but its cheapest neighbor is (10, 6) at
        // distance 1
        assert_eq!(field.get(11, 7), 4);

        // The floor field never enters rock
        let floor = DistanceField::compute(&dungeon, (10, 5), TraversalMode::Floor);
        assert_eq!(floor.get(11, 5), UNREACHABLE);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut rng = GameRng::new(2024);
        let dungeon = generate(&mut rng);
        let origin = dungeon.spawn_cell();

        let a = DistanceField::compute(&dungeon, origin, TraversalMode::Tunnel);
        let b = DistanceField::compute(&dungeon, origin, TraversalMode::Tunnel);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_tunnel_never_worse_than_floor(seed in 0u64..200) {
            let mut rng = GameRng::new(seed);
            let dungeon = generate(&mut rng);
            let origin = dungeon.spawn_cell();

            let floor = DistanceField::compute(&dungeon, origin, TraversalMode::Floor);
            let tunnel = DistanceField::compute(&dungeon, origin, TraversalMode::Tunnel);

            prop_assert_eq!(floor.get(origin.0 as usize, origin.1 as usize), 0);
            prop_assert_eq!(tunnel.get(origin.0 as usize, origin.1 as usize), 0);

            // Tunneling only adds traversable options, so wherever both
            // fields are defined the tunnel cost is at most the floor cost.
            for y in 0..ROWNO {
                for x in 0..COLNO {
                    let f = floor.get(x, y);
                    let t = tunnel.get(x, y);
                    if f != UNREACHABLE {
                        prop_assert!(t <= f, "tunnel {} > floor {} at ({}, {})", t, f, x, y);
                    }
                }
            }
        }
    }
}
