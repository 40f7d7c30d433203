//! Melee combat resolution.

use crate::agent::{Agent, AgentKind};
use crate::consts::BOSS_GLYPH;
use crate::data::MonsterTemplate;
use crate::rng::GameRng;
use crate::world::{RunStatus, WorldState};

/// Total damage for one hit: the player rolls base damage plus every
/// equipped item's damage dice; a monster rolls the damage dice of the
/// first template matching its glyph.
pub fn total_damage(attacker: &Agent, templates: &[MonsterTemplate], rng: &mut GameRng) -> i32 {
    match attacker.kind {
        AgentKind::Player => {
            let mut total = attacker.damage.roll(rng);
            for item in attacker.equipment.iter().flatten() {
                total += item.damage.roll(rng);
            }
            total
        }
        AgentKind::Monster => templates
            .iter()
            .find(|t| t.symbol == attacker.glyph)
            .map(|t| t.damage.roll(rng))
            .unwrap_or(0),
    }
}

/// Resolve one melee hit from `attacker` to `defender` (agent indices).
///
/// A defender crossing 0 hit points dies immediately: the player's death
/// loses the run; a monster's death vacates its cell, and the boss glyph or
/// the last living monster ends the run in victory.
pub fn perform_attack(world: &mut WorldState, attacker: usize, defender: usize) {
    let damage = total_damage(
        &world.agents[attacker],
        &world.monster_templates,
        &mut world.rng,
    );
    world.agents[defender].hp -= damage;
    let died = world.agents[defender].hp <= 0;

    if world.agents[defender].is_player() {
        if died {
            world.agents[defender].alive = false;
            world.status = RunStatus::Lost;
            world.push_message("You were slain!");
        } else {
            world.push_message(format!("You were hit for {} damage.", damage));
        }
        return;
    }

    if died {
        world.agents[defender].alive = false;
        let (x, y) = world.agents[defender].pos();
        let glyph = world.agents[defender].glyph;
        world.dungeon.restore_base(x as usize, y as usize);
        world.push_message(format!("You killed {}.", glyph));

        if glyph == BOSS_GLYPH {
            world.status = RunStatus::Won;
            world.push_message("You defeated the boss! You win!");
        } else if world.living_monsters() == 0 {
            world.status = RunStatus::Won;
            world.push_message("You win! All monsters have been slain.");
        }
    } else {
        world.push_message(format!("Hit enemy for {} damage.", damage));
    }
}
