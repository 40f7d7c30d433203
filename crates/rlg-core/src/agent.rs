//! Agents: the player and monsters.

use bitflags::bitflags;
use strum::{Display, EnumIter};

use crate::consts::{MAX_CARRY, NUM_EQUIP_SLOTS, PLAYER_HP, PLAYER_SPEED, S_PLAYER};
use crate::data::{Dice, MonsterTemplate, ObjectInstance};
use crate::rng::GameRng;

/// Player or monster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Player,
    Monster,
}

bitflags! {
    /// Monster behavior flags, decoded once from template ability tags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Abilities: u8 {
        const INTELLIGENT = 0x1;
        const TELEPATHIC = 0x2;
        const TUNNELING = 0x4;
        const ERRATIC = 0x8;
    }
}

impl Abilities {
    /// Decode description-file ability tags; unknown tags are ignored
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        let mut abilities = Abilities::empty();
        for tag in tags {
            match tag.as_ref() {
                "SMART" => abilities |= Abilities::INTELLIGENT,
                "TELE" => abilities |= Abilities::TELEPATHIC,
                "TUNNEL" => abilities |= Abilities::TUNNELING,
                "ERRATIC" => abilities |= Abilities::ERRATIC,
                _ => {}
            }
        }
        abilities
    }
}

/// Equipment slots, one item each (two for rings)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[repr(usize)]
pub enum EquipSlot {
    Weapon = 0,
    Offhand = 1,
    Ranged = 2,
    Armor = 3,
    Helmet = 4,
    Cloak = 5,
    Gloves = 6,
    Boots = 7,
    Amulet = 8,
    Light = 9,
    RingLeft = 10,
    RingRight = 11,
}

/// A scheduled actor: the player or one monster.
///
/// Dead agents stay in the world's agent list for the rest of the level and
/// are excluded from occupancy queries by the `alive` flag.
#[derive(Debug, Clone)]
pub struct Agent {
    pub kind: AgentKind,
    pub alive: bool,
    pub x: i32,
    pub y: i32,
    pub hp: i32,
    /// Turns-per-time-unit proxy; higher is more frequent turns
    pub speed: i32,
    /// Base damage descriptor (unarmed, for the player)
    pub damage: Dice,
    pub abilities: Abilities,
    pub glyph: char,
    pub colors: Vec<String>,
    pub inventory: [Option<ObjectInstance>; MAX_CARRY],
    pub equipment: [Option<ObjectInstance>; NUM_EQUIP_SLOTS],
}

impl Agent {
    /// Create the player at a spawn cell: fixed stats, bare fists, empty
    /// carry and equipment slots.
    pub fn player(x: i32, y: i32) -> Self {
        Self {
            kind: AgentKind::Player,
            alive: true,
            x,
            y,
            hp: PLAYER_HP,
            speed: PLAYER_SPEED,
            damage: Dice::new(0, 1, 4),
            abilities: Abilities::empty(),
            glyph: S_PLAYER,
            colors: Vec::new(),
            inventory: std::array::from_fn(|_| None),
            equipment: std::array::from_fn(|_| None),
        }
    }

    /// Materialize a monster from a template: roll speed and hit points,
    /// decode the ability bitset.
    pub fn from_template(template: &MonsterTemplate, x: i32, y: i32, rng: &mut GameRng) -> Self {
        Self {
            kind: AgentKind::Monster,
            alive: true,
            x,
            y,
            hp: template.hp.roll(rng),
            // a degenerate speed die would stall the scheduler
            speed: template.speed.roll(rng).max(1),
            damage: template.damage,
            abilities: Abilities::from_tags(&template.abilities),
            glyph: template.symbol,
            colors: template.colors.clone(),
            inventory: std::array::from_fn(|_| None),
            equipment: std::array::from_fn(|_| None),
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == AgentKind::Player
    }

    pub fn is_monster(&self) -> bool {
        self.kind == AgentKind::Monster
    }

    pub fn pos(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}
