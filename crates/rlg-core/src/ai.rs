//! Monster decision-making and movement.
//!
//! Each turn a monster picks a target cell by one of three strategies, in
//! priority order: an erratic coin flip over the nine-cell neighborhood
//! (staying put is a legal pick), a greedy signum chase for dim monsters,
//! or a descent of the appropriate distance field for intelligent ones.
//! Tunnelers dig the target cell before anything else happens there.

use crate::agent::Abilities;
use crate::combat;
use crate::consts::{DIG_STRENGTH, S_PLAYER};
use crate::dungeon::Dungeon;
use crate::world::WorldState;

/// What the monster ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiAction {
    /// No action (dead, or the pick resolved to its own cell)
    Waited,
    /// Dug into rock without breaking through
    Dug(i32, i32),
    /// Moved to a new cell
    Moved(i32, i32),
    /// Attacked the player instead of moving
    AttackedPlayer,
}

/// Erratic picks: stay plus the 8 neighbors, scan order as generated
const ERRATIC_DX: [i32; 9] = [0, -1, 1, 0, 0, -1, -1, 1, 1];
const ERRATIC_DY: [i32; 9] = [0, 0, 0, -1, 1, -1, 1, -1, 1];

/// Run one monster turn
pub fn take_turn(world: &mut WorldState, idx: usize) -> AiAction {
    if !world.agents[idx].alive {
        return AiAction::Waited;
    }

    let (mx, my) = world.agents[idx].pos();
    let abilities = world.agents[idx].abilities;
    let tunneling = abilities.contains(Abilities::TUNNELING);
    let (px, py) = world.agents[0].pos();

    let (bx, by) = pick_target(world, idx, (mx, my), (px, py));

    // An erratic pick may wander off the grid edge; treat it as standing
    // still rather than indexing out of bounds.
    if !Dungeon::in_bounds(bx, by) || (bx, by) == (mx, my) {
        return AiAction::Waited;
    }

    let (ux, uy) = (bx as usize, by as usize);

    if tunneling {
        let hardness = world.dungeon.hardness_at(ux, uy);
        if hardness > 0 && hardness < 255 {
            let remaining = hardness.saturating_sub(DIG_STRENGTH);
            if remaining > 0 {
                // Dug but did not break through; the turn ends here
                world.dungeon.hardness[uy][ux] = remaining;
                return AiAction::Dug(bx, by);
            }
            world.dungeon.open_cell(ux, uy);
        }
    }

    if world.dungeon.live_at(ux, uy) == S_PLAYER {
        combat::perform_attack(world, idx, 0);
        return AiAction::AttackedPlayer;
    }

    world.dungeon.restore_base(mx as usize, my as usize);
    world.agents[idx].x = bx;
    world.agents[idx].y = by;
    let glyph = world.agents[idx].glyph;
    world.dungeon.set_live(ux, uy, glyph);
    AiAction::Moved(bx, by)
}

/// Choose the target cell for this turn
fn pick_target(
    world: &mut WorldState,
    idx: usize,
    (mx, my): (i32, i32),
    (px, py): (i32, i32),
) -> (i32, i32) {
    let abilities = world.agents[idx].abilities;

    if abilities.contains(Abilities::ERRATIC) && world.rng.rn2(2) == 0 {
        let r = world.rng.rn2(9) as usize;
        return (mx + ERRATIC_DX[r], my + ERRATIC_DY[r]);
    }

    if !abilities.contains(Abilities::INTELLIGENT) {
        return (mx + (px - mx).signum(), my + (py - my).signum());
    }

    // Descend the distance field: strictly lowest neighbor wins, ties keep
    // the first one in scan order.
    let field = if abilities.contains(Abilities::TUNNELING) {
        &world.dist_tunnel
    } else {
        &world.dist_floor
    };
    let mut best = (mx, my);
    let mut best_dist = u32::MAX;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (nx, ny) = (mx + dx, my + dy);
            if !Dungeon::in_bounds(nx, ny) {
                continue;
            }
            let d = field.get(nx as usize, ny as usize);
            if d < best_dist {
                best_dist = d;
                best = (nx, ny);
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::consts::{COLNO, ROWNO, S_FLOOR};
    use crate::data::{Dice, MonsterTemplate};
    use crate::rng::GameRng;
    use crate::world::WorldState;

    /// A world whose dungeon is one big open room, player parked at (2, 2)
    fn open_world() -> WorldState {
        let mut world = WorldState::generate(Vec::new(), Vec::new(), 0, GameRng::new(3));
        for y in 0..ROWNO {
            for x in 0..COLNO {
                let border = x == 0 || x == COLNO - 1 || y == 0 || y == ROWNO - 1;
                world.dungeon.live[y][x] = if border { ' ' } else { S_FLOOR };
                world.dungeon.hardness[y][x] = if border { 255 } else { 0 };
            }
        }
        world.dungeon.snapshot_base();
        world.agents[0].x = 2;
        world.agents[0].y = 2;
        world.dungeon.set_live(2, 2, crate::consts::S_PLAYER);
        world.recompute_distance_fields();
        world
    }

    fn add_monster(world: &mut WorldState, abilities: &[&str], x: i32, y: i32) -> usize {
        let template = MonsterTemplate {
            name: "test monster".into(),
            symbol: 'd',
            colors: vec!["RED".into()],
            speed: Dice::new(10, 0, 1),
            hp: Dice::new(20, 0, 1),
            damage: Dice::new(1, 0, 1),
            abilities: abilities.iter().map(|s| s.to_string()).collect(),
            rarity: 100,
            ..Default::default()
        };
        let mut rng = GameRng::new(1);
        let monster = Agent::from_template(&template, x, y, &mut rng);
        world.dungeon.set_live(x as usize, y as usize, monster.glyph);
        world.monster_templates.push(template);
        world.agents.push(monster);
        world.agents.len() - 1
    }

    #[test]
    fn test_greedy_monster_closes_distance() {
        let mut world = open_world();
        let idx = add_monster(&mut world, &[], 10, 10);

        let action = take_turn(&mut world, idx);
        assert_eq!(action, AiAction::Moved(9, 9));
        assert_eq!(world.agents[idx].pos(), (9, 9));
        assert_eq!(world.dungeon.live_at(9, 9), 'd');
        assert_eq!(world.dungeon.live_at(10, 10), S_FLOOR);
    }

    #[test]
    fn test_intelligent_monster_descends_field() {
        let mut world = open_world();
        let idx = add_monster(&mut world, &["SMART"], 10, 2);

        // On an open row the field decreases straight toward the player
        let action = take_turn(&mut world, idx);
        assert_eq!(action, AiAction::Moved(9, 2));
    }

    #[test]
    fn test_intelligent_monster_stays_when_sealed() {
        let mut world = open_world();
        let idx = add_monster(&mut world, &["SMART"], 10, 10);
        // Seal the monster in: every neighbor becomes immutable rock
        for dy in -1..=1i32 {
            for dx in -1..=1i32 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = ((10 + dx) as usize, (10 + dy) as usize);
                world.dungeon.live[ny][nx] = ' ';
                world.dungeon.hardness[ny][nx] = 255;
            }
        }
        world.dungeon.snapshot_base();
        world.recompute_distance_fields();

        let action = take_turn(&mut world, idx);
        assert_eq!(action, AiAction::Waited);
        assert_eq!(world.agents[idx].pos(), (10, 10));
    }

    #[test]
    fn test_adjacent_monster_attacks_player() {
        let mut world = open_world();
        let idx = add_monster(&mut world, &[], 3, 3);
        let hp_before = world.agents[0].hp;

        let action = take_turn(&mut world, idx);
        assert_eq!(action, AiAction::AttackedPlayer);
        // No movement on an attack
        assert_eq!(world.agents[idx].pos(), (3, 3));
        assert!(world.agents[0].hp < hp_before);
    }

    #[test]
    fn test_tunneler_digs_through_rock() {
        let mut world = open_world();
        // Monster boxed between rock on the path toward the player
        let idx = add_monster(&mut world, &["TUNNEL"], 10, 10);
        world.dungeon.live[9][9] = ' ';
        world.dungeon.hardness[9][9] = 170;
        world.dungeon.base[9][9] = ' ';

        // 170 hardness needs ceil(170/85) = 2 digs
        let action = take_turn(&mut world, idx);
        assert_eq!(action, AiAction::Dug(9, 9));
        assert_eq!(world.dungeon.hardness_at(9, 9), 85);
        assert_eq!(world.agents[idx].pos(), (10, 10));

        let action = take_turn(&mut world, idx);
        assert_eq!(action, AiAction::Moved(9, 9));
        assert_eq!(world.dungeon.hardness_at(9, 9), 0);
        assert_eq!(world.dungeon.base_at(9, 9), crate::consts::S_CORRIDOR);
    }

    #[test]
    fn test_dig_count_matches_hardness() {
        for (hardness, digs) in [(84u8, 1u32), (85, 1), (86, 2), (170, 2), (254, 3)] {
            let mut world = open_world();
            let idx = add_monster(&mut world, &["TUNNEL"], 10, 10);
            world.dungeon.live[9][9] = ' ';
            world.dungeon.base[9][9] = ' ';
            world.dungeon.hardness[9][9] = hardness;

            let mut count = 0;
            loop {
                count += 1;
                match take_turn(&mut world, idx) {
                    AiAction::Dug(..) => continue,
                    AiAction::Moved(..) => break,
                    other => panic!("unexpected action {:?}", other),
                }
            }
            assert_eq!(count, digs, "hardness {} should take {} digs", hardness, digs);
        }
    }

    #[test]
    fn test_erratic_stay_is_legal() {
        let mut world = open_world();
        let idx = add_monster(&mut world, &["ERRATIC"], 10, 10);

        // Over many turns an erratic monster must sometimes stand still
        let mut waited = false;
        for _ in 0..200 {
            world.agents[idx].x = 10;
            world.agents[idx].y = 10;
            world.dungeon.set_live(10, 10, 'd');
            if take_turn(&mut world, idx) == AiAction::Waited {
                waited = true;
                break;
            }
            // Reset the board for the next try
            for y in 8..=12 {
                for x in 8..=12 {
                    world.dungeon.live[y][x] = S_FLOOR;
                }
            }
        }
        assert!(waited, "erratic monster never chose to stay");
    }

    #[test]
    fn test_dead_monster_waits() {
        let mut world = open_world();
        let idx = add_monster(&mut world, &[], 10, 10);
        world.agents[idx].alive = false;
        assert_eq!(take_turn(&mut world, idx), AiAction::Waited);
    }
}
