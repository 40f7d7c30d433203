//! Level generation.
//!
//! Seeds the hardness grid, packs rooms under a trial budget, connects them
//! with L-shaped corridors in placement order, and places the two stairs.
//! Generation never fails: exhausting the room budget just yields a sparser
//! level, and zero rooms is a legal degenerate outcome.

use crate::consts::{
    COLNO, ROOM_PLACEMENT_CAP, ROOM_TRIALS, ROWNO, S_CORRIDOR, S_FLOOR, S_ROCK, S_STAIR_DOWN,
    S_STAIR_UP,
};
use crate::rng::GameRng;

use super::{Dungeon, Room};

/// Generate a complete level
pub fn generate(rng: &mut GameRng) -> Dungeon {
    let mut dungeon = Dungeon::default();
    seed_hardness(&mut dungeon, rng);
    place_rooms(&mut dungeon, rng);
    connect_rooms(&mut dungeon);
    place_stairs(&mut dungeon, rng);
    dungeon
}

/// Blank terrain everywhere; border cells immutable, interior cells random
/// diggable rock.
fn seed_hardness(dungeon: &mut Dungeon, rng: &mut GameRng) {
    for y in 0..ROWNO {
        for x in 0..COLNO {
            dungeon.live[y][x] = S_ROCK;
            dungeon.hardness[y][x] = if x == 0 || x == COLNO - 1 || y == 0 || y == ROWNO - 1 {
                255
            } else {
                (rng.rn2(254) + 1) as u8
            };
        }
    }
}

/// A candidate room is valid when it sits fully inside the margin and every
/// covered cell is still blank terrain (the check is on terrain, not
/// hardness, so corridors carved later never overlap rooms).
fn room_fits(dungeon: &Dungeon, room: &Room) -> bool {
    if room.x + room.width >= COLNO - 1 || room.y + room.height >= ROWNO - 1 {
        return false;
    }
    for y in room.y..room.y + room.height {
        for x in room.x..room.x + room.width {
            if dungeon.live[y][x] != S_ROCK {
                return false;
            }
        }
    }
    true
}

fn carve_room(dungeon: &mut Dungeon, room: &Room) {
    for y in room.y..room.y + room.height {
        for x in room.x..room.x + room.width {
            dungeon.live[y][x] = S_FLOOR;
            dungeon.hardness[y][x] = 0;
        }
    }
}

/// Up to [`ROOM_TRIALS`] attempts to place [`ROOM_PLACEMENT_CAP`] rooms with
/// width 4-9 and height 3-6. Fewer rooms on exhaustion is accepted.
fn place_rooms(dungeon: &mut Dungeon, rng: &mut GameRng) {
    let mut attempts = ROOM_TRIALS;
    while attempts > 0 && dungeon.rooms.len() < ROOM_PLACEMENT_CAP {
        let width = (rng.rn2(6) + 4) as usize;
        let height = (rng.rn2(4) + 3) as usize;
        let x = (rng.rn2((COLNO - width - 2) as u32) + 1) as usize;
        let y = (rng.rn2((ROWNO - height - 2) as u32) + 1) as usize;

        let room = Room::new(x, y, width, height);
        if room_fits(dungeon, &room) {
            carve_room(dungeon, &room);
            dungeon.rooms.push(room);
        }
        attempts -= 1;
    }
}

/// Carve an axis-aligned L-shaped corridor between consecutive room centers,
/// x-leg first. Only non-floor cells are overwritten, so corridors pass
/// through rooms without damaging them.
fn connect_rooms(dungeon: &mut Dungeon) {
    if dungeon.rooms.len() < 2 {
        return;
    }
    for i in 1..dungeon.rooms.len() {
        let (mut x, mut y) = dungeon.rooms[i - 1].center();
        let (tx, ty) = dungeon.rooms[i].center();

        while x != tx {
            carve_corridor_cell(dungeon, x, y);
            x = if tx > x { x + 1 } else { x - 1 };
        }
        while y != ty {
            carve_corridor_cell(dungeon, x, y);
            y = if ty > y { y + 1 } else { y - 1 };
        }
    }
}

fn carve_corridor_cell(dungeon: &mut Dungeon, x: usize, y: usize) {
    if dungeon.live[y][x] != S_FLOOR {
        dungeon.live[y][x] = S_CORRIDOR;
        dungeon.hardness[y][x] = 0;
    }
}

/// Place exactly one up-stair and one down-stair on distinct open cells.
/// Random resampling, unbounded: generation guarantees open cells exist
/// whenever any room or corridor was carved, and the degenerate zero-room
/// level is handled by skipping placement entirely.
fn place_stairs(dungeon: &mut Dungeon, rng: &mut GameRng) {
    let has_open = dungeon
        .live
        .iter()
        .flatten()
        .any(|&c| c == S_FLOOR || c == S_CORRIDOR);
    if !has_open {
        return;
    }

    while dungeon.up_stair.is_none() || dungeon.down_stair.is_none() {
        let ux = rng.rn2(COLNO as u32) as usize;
        let uy = rng.rn2(ROWNO as u32) as usize;
        let dx = rng.rn2(COLNO as u32) as usize;
        let dy = rng.rn2(ROWNO as u32) as usize;

        if dungeon.up_stair.is_none()
            && matches!(dungeon.live[uy][ux], S_FLOOR | S_CORRIDOR)
        {
            dungeon.live[uy][ux] = S_STAIR_UP;
            dungeon.up_stair = Some((ux as u8, uy as u8));
        }
        if dungeon.down_stair.is_none()
            && matches!(dungeon.live[dy][dx], S_FLOOR | S_CORRIDOR)
            && !(ux == dx && uy == dy)
        {
            dungeon.live[dy][dx] = S_STAIR_DOWN;
            dungeon.down_stair = Some((dx as u8, dy as u8));
        }
    }
}
