//! Player commands and turn resolution.
//!
//! The input surface translates keys into [`Command`] values; applying one
//! either consumes the player's turn or leaves the scheduler waiting for
//! another command (listing inventory, managing equipment, and invalid
//! selections cost no time).

use strum::{Display, EnumIter};

use crate::agent::EquipSlot;
use crate::combat;
use crate::consts::{NUM_EQUIP_SLOTS, S_PLAYER, S_STAIR_DOWN, S_STAIR_UP};
use crate::data::ObjectKind;
use crate::dungeon::{self, Dungeon};
use crate::world::WorldState;

/// The eight movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
        }
    }
}

/// One player command from the input surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    GoUp,
    GoDown,
    ToggleFog,
    /// Equip the item in the given carry slot
    Wear(usize),
    /// Unequip the given equipment slot back into the carry list
    TakeOff(usize),
    /// Drop the item in the given carry slot at the player's feet
    Drop(usize),
    /// Destroy the item in the given carry slot
    Expunge(usize),
    Quit,
}

/// Whether a command consumed the player's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResult {
    Consumed,
    NotConsumed,
    Quit,
}

/// Apply one player command to the world
pub fn apply_command(world: &mut WorldState, command: Command) -> TurnResult {
    match command {
        Command::Move(dir) => move_player(world, dir),
        Command::GoUp => use_stairs(world, S_STAIR_UP),
        Command::GoDown => use_stairs(world, S_STAIR_DOWN),
        Command::ToggleFog => {
            world.fog_enabled = !world.fog_enabled;
            world.push_message(if world.fog_enabled {
                "Fog enabled: dungeon with fog of war."
            } else {
                "Fog disabled: full dungeon view."
            });
            TurnResult::Consumed
        }
        Command::Wear(idx) => wear_item(world, idx),
        Command::TakeOff(slot) => take_off_item(world, slot),
        Command::Drop(idx) => drop_item(world, idx),
        Command::Expunge(idx) => expunge_item(world, idx),
        Command::Quit => TurnResult::Quit,
    }
}

/// Move, or attack the monster standing in the way. A blocked move still
/// consumes the turn.
fn move_player(world: &mut WorldState, dir: Direction) -> TurnResult {
    let (dx, dy) = dir.delta();
    let (px, py) = world.agents[0].pos();
    let (nx, ny) = (px + dx, py + dy);

    if let Some(target) = world.monster_at(nx, ny) {
        combat::perform_attack(world, 0, target);
        return TurnResult::Consumed;
    }

    if Dungeon::in_bounds(nx, ny)
        && dungeon::is_walkable(world.dungeon.live_at(nx as usize, ny as usize))
    {
        world.dungeon.restore_base(px as usize, py as usize);
        world.agents[0].x = nx;
        world.agents[0].y = ny;
        world.dungeon.set_live(nx as usize, ny as usize, S_PLAYER);
        try_pickup(world);
    } else {
        world.push_message("Blocked!");
    }
    TurnResult::Consumed
}

/// Take a staircase if the player is standing on the matching one. The
/// check is against base terrain, since the player's own glyph occupies the
/// live cell.
fn use_stairs(world: &mut WorldState, stair: char) -> TurnResult {
    let (px, py) = world.agents[0].pos();
    if world.dungeon.base_at(px as usize, py as usize) == stair {
        world.new_level();
        world.push_message(if stair == S_STAIR_DOWN {
            "You go down the stairs..."
        } else {
            "You go up the stairs..."
        });
    } else {
        world.push_message(if stair == S_STAIR_DOWN {
            "No downward staircase here!"
        } else {
            "No upward staircase here!"
        });
    }
    TurnResult::Consumed
}

/// Pick up whatever lies at the player's feet, into the first free carry
/// slot
fn try_pickup(world: &mut WorldState) {
    let (px, py) = world.agents[0].pos();
    let Some(obj_idx) = world.object_index_at(px, py) else {
        return;
    };

    let Some(slot) = world.agents[0].inventory.iter().position(Option::is_none) else {
        let name = world.objects[obj_idx].name.clone();
        world.push_message(format!("Inventory full! Can't pick up {}.", name));
        return;
    };

    let item = world.objects.remove(obj_idx);
    world.push_message(format!("You picked up: {}.", item.name));
    world.agents[0].inventory[slot] = Some(item);
}

/// The equipment slot an object kind belongs in. Rings resolve to the first
/// free ring slot separately.
fn slot_for_kind(kind: ObjectKind) -> Option<EquipSlot> {
    match kind {
        ObjectKind::Weapon => Some(EquipSlot::Weapon),
        ObjectKind::Offhand => Some(EquipSlot::Offhand),
        ObjectKind::Ranged => Some(EquipSlot::Ranged),
        ObjectKind::Armor => Some(EquipSlot::Armor),
        ObjectKind::Helmet => Some(EquipSlot::Helmet),
        ObjectKind::Cloak => Some(EquipSlot::Cloak),
        ObjectKind::Gloves => Some(EquipSlot::Gloves),
        ObjectKind::Boots => Some(EquipSlot::Boots),
        ObjectKind::Amulet => Some(EquipSlot::Amulet),
        ObjectKind::Light => Some(EquipSlot::Light),
        _ => None,
    }
}

/// Equip from a carry slot: a filled equipment slot swaps, an empty one
/// takes the item outright. Transfers are moves between slots.
fn wear_item(world: &mut WorldState, idx: usize) -> TurnResult {
    if idx >= world.agents[0].inventory.len() || world.agents[0].inventory[idx].is_none() {
        world.push_message("No item in that slot.");
        return TurnResult::NotConsumed;
    }

    let kind = world.agents[0].inventory[idx].as_ref().map(|o| o.kind);
    let slot = match kind {
        Some(ObjectKind::Ring) => {
            if world.agents[0].equipment[EquipSlot::RingLeft as usize].is_some() {
                Some(EquipSlot::RingRight)
            } else {
                Some(EquipSlot::RingLeft)
            }
        }
        Some(kind) => slot_for_kind(kind),
        None => None,
    };
    let Some(slot) = slot else {
        world.push_message("Can't equip that type.");
        return TurnResult::NotConsumed;
    };

    let player = &mut world.agents[0];
    if player.equipment[slot as usize].is_some() {
        let (inv, equip) = (&mut player.inventory, &mut player.equipment);
        std::mem::swap(&mut inv[idx], &mut equip[slot as usize]);
        world.push_message("Swapped with equipped item.");
    } else {
        player.equipment[slot as usize] = player.inventory[idx].take();
        world.push_message("Item equipped.");
    }
    TurnResult::NotConsumed
}

/// Unequip into the first free carry slot
fn take_off_item(world: &mut WorldState, slot: usize) -> TurnResult {
    if slot >= NUM_EQUIP_SLOTS || world.agents[0].equipment[slot].is_none() {
        world.push_message("Nothing in that slot.");
        return TurnResult::NotConsumed;
    }

    let player = &mut world.agents[0];
    match player.inventory.iter().position(Option::is_none) {
        Some(free) => {
            player.inventory[free] = player.equipment[slot].take();
            world.push_message("Item taken off.");
        }
        None => world.push_message("Inventory full. Cannot unequip."),
    }
    TurnResult::NotConsumed
}

/// Drop a carried item at the player's feet
fn drop_item(world: &mut WorldState, idx: usize) -> TurnResult {
    let (px, py) = world.agents[0].pos();
    let taken = world.agents[0].inventory.get_mut(idx).and_then(Option::take);
    let Some(mut item) = taken else {
        world.push_message("Nothing in that slot.");
        return TurnResult::NotConsumed;
    };

    item.x = px;
    item.y = py;
    world.objects.push(item);
    world.push_message("Item dropped.");
    TurnResult::NotConsumed
}

/// Destroy a carried item permanently
fn expunge_item(world: &mut WorldState, idx: usize) -> TurnResult {
    if idx >= world.agents[0].inventory.len() || world.agents[0].inventory[idx].is_none() {
        world.push_message("No item to expunge.");
        return TurnResult::NotConsumed;
    }
    world.agents[0].inventory[idx] = None;
    world.push_message("Item destroyed.");
    TurnResult::NotConsumed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::consts::{COLNO, ROWNO, S_FLOOR};
    use crate::data::{Dice, MonsterTemplate, ObjectInstance};
    use crate::rng::GameRng;
    use crate::world::RunStatus;

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
        world.agents[0].x = 5;
        world.agents[0].y = 5;
        world.dungeon.set_live(5, 5, S_PLAYER);
        world
    }

    fn test_item(kind: ObjectKind) -> ObjectInstance {
        ObjectInstance {
            name: "thing".into(),
            kind,
            symbol: '|',
            colors: vec![],
            hit: 0,
            dodge: 0,
            defense: 0,
            weight: 0,
            speed: 0,
            attribute: 0,
            value: 0,
            damage: Dice::new(1, 0, 1),
            is_artifact: false,
            description: String::new(),
            x: -1,
            y: -1,
        }
    }

    #[test]
    fn test_move_onto_floor() {
        let mut world = open_world();
        let result = apply_command(&mut world, Command::Move(Direction::East));
        assert_eq!(result, TurnResult::Consumed);
        assert_eq!(world.agents[0].pos(), (6, 5));
        assert_eq!(world.dungeon.live_at(6, 5), S_PLAYER);
        assert_eq!(world.dungeon.live_at(5, 5), S_FLOOR);
    }

    #[test]
    fn test_blocked_move_consumes_turn() {
        let mut world = open_world();
        world.dungeon.live[5][6] = ' ';
        world.dungeon.hardness[5][6] = 200;
        let result = apply_command(&mut world, Command::Move(Direction::East));
        assert_eq!(result, TurnResult::Consumed);
        assert_eq!(world.agents[0].pos(), (5, 5));
        assert!(world.messages.iter().any(|m| m.contains("Blocked")));
    }

    #[test]
    fn test_move_into_monster_attacks() {
        let mut world = open_world();
        world.monster_templates = vec![MonsterTemplate {
            symbol: 'd',
            damage: Dice::new(1, 0, 1),
            ..Default::default()
        }];
        let template = world.monster_templates[0].clone();
        let mut rng = GameRng::new(1);
        let mut monster = Agent::from_template(&template, 6, 5, &mut rng);
        monster.hp = 100;
        world.dungeon.set_live(6, 5, 'd');
        world.agents.push(monster);

        let hp_before = world.agents[1].hp;
        let result = apply_command(&mut world, Command::Move(Direction::East));
        assert_eq!(result, TurnResult::Consumed);
        // Attack instead of movement
        assert_eq!(world.agents[0].pos(), (5, 5));
        assert!(world.agents[1].hp < hp_before);
    }

    #[test]
    fn test_stairs_regenerate_level() {
        let mut world = open_world();
        world.nummon = 3;
        world.monster_templates = vec![MonsterTemplate {
            name: "rat".into(),
            symbol: 'r',
            colors: vec!["WHITE".into()],
            speed: Dice::new(8, 0, 1),
            hp: Dice::new(6, 0, 1),
            damage: Dice::new(0, 1, 4),
            abilities: vec![],
            rarity: 100,
            ..Default::default()
        }];
        world.dungeon.base[5][5] = S_STAIR_DOWN;

        let result = apply_command(&mut world, Command::GoDown);
        assert_eq!(result, TurnResult::Consumed);
        assert!(world.level_changed);
        assert_eq!(world.agents[0].pos(), world.dungeon.spawn_cell());
        assert_eq!(world.living_monsters(), 3);
        assert_eq!(world.status, RunStatus::Playing);
    }

    #[test]
    fn test_stairs_require_matching_terrain() {
        let mut world = open_world();
        let result = apply_command(&mut world, Command::GoDown);
        assert_eq!(result, TurnResult::Consumed);
        assert!(!world.level_changed);
        assert!(
            world
                .messages
                .iter()
                .any(|m| m.contains("No downward staircase"))
        );
    }

    #[test]
    fn test_pickup_on_move() {
        let mut world = open_world();
        let mut item = test_item(ObjectKind::Weapon);
        item.x = 6;
        item.y = 5;
        world.objects.push(item);

        apply_command(&mut world, Command::Move(Direction::East));
        assert!(world.objects.is_empty());
        assert!(world.agents[0].inventory[0].is_some());
    }

    #[test]
    fn test_wear_and_take_off_is_a_move() {
        let mut world = open_world();
        world.agents[0].inventory[0] = Some(test_item(ObjectKind::Weapon));

        let result = apply_command(&mut world, Command::Wear(0));
        assert_eq!(result, TurnResult::NotConsumed);
        assert!(world.agents[0].inventory[0].is_none());
        assert!(world.agents[0].equipment[EquipSlot::Weapon as usize].is_some());

        let result = apply_command(&mut world, Command::TakeOff(EquipSlot::Weapon as usize));
        assert_eq!(result, TurnResult::NotConsumed);
        assert!(world.agents[0].inventory[0].is_some());
        assert!(world.agents[0].equipment[EquipSlot::Weapon as usize].is_none());
    }

    #[test]
    fn test_second_ring_goes_to_right_hand() {
        let mut world = open_world();
        world.agents[0].inventory[0] = Some(test_item(ObjectKind::Ring));
        world.agents[0].inventory[1] = Some(test_item(ObjectKind::Ring));

        apply_command(&mut world, Command::Wear(0));
        apply_command(&mut world, Command::Wear(1));
        assert!(world.agents[0].equipment[EquipSlot::RingLeft as usize].is_some());
        assert!(world.agents[0].equipment[EquipSlot::RingRight as usize].is_some());
    }

    #[test]
    fn test_wear_swaps_occupied_slot() {
        let mut world = open_world();
        let mut first = test_item(ObjectKind::Weapon);
        first.name = "first".into();
        let mut second = test_item(ObjectKind::Weapon);
        second.name = "second".into();
        world.agents[0].inventory[0] = Some(first);
        world.agents[0].inventory[1] = Some(second);

        apply_command(&mut world, Command::Wear(0));
        apply_command(&mut world, Command::Wear(1));

        let equipped = world.agents[0].equipment[EquipSlot::Weapon as usize]
            .as_ref()
            .unwrap();
        assert_eq!(equipped.name, "second");
        let carried = world.agents[0].inventory[1].as_ref().unwrap();
        assert_eq!(carried.name, "first");
    }

    #[test]
    fn test_unequippable_kind_rejected() {
        let mut world = open_world();
        world.agents[0].inventory[0] = Some(test_item(ObjectKind::Scroll));
        apply_command(&mut world, Command::Wear(0));
        assert!(world.agents[0].inventory[0].is_some());
        assert!(world.messages.iter().any(|m| m.contains("Can't equip")));
    }

    #[test]
    fn test_drop_places_at_feet() {
        let mut world = open_world();
        world.agents[0].inventory[0] = Some(test_item(ObjectKind::Weapon));
        apply_command(&mut world, Command::Drop(0));
        assert_eq!(world.objects.len(), 1);
        assert_eq!((world.objects[0].x, world.objects[0].y), (5, 5));
    }

    #[test]
    fn test_expunge_destroys() {
        let mut world = open_world();
        world.agents[0].inventory[0] = Some(test_item(ObjectKind::Weapon));
        apply_command(&mut world, Command::Expunge(0));
        assert!(world.agents[0].inventory[0].is_none());
        assert!(world.objects.is_empty());
    }

    #[test]
    fn test_fog_toggle() {
        let mut world = open_world();
        assert!(world.fog_enabled);
        assert_eq!(
            apply_command(&mut world, Command::ToggleFog),
            TurnResult::Consumed
        );
        assert!(!world.fog_enabled);
    }

    #[test]
    fn test_quit() {
        let mut world = open_world();
        assert_eq!(apply_command(&mut world, Command::Quit), TurnResult::Quit);
    }
}
