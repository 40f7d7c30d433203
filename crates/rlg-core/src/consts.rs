//! Core game constants.
//!
//! Grid geometry, generation budgets, and the terrain symbol set shared by
//! the simulation and the save-file layout.

/// Map dimensions
pub const COLNO: usize = 80;
pub const ROWNO: usize = 21;

/// Room generation limits
pub const MAX_ROOMS: usize = 10;
pub const ROOM_PLACEMENT_CAP: usize = 6;
pub const ROOM_TRIALS: u32 = 2000;

/// Rejection-sampling budget for template selection
pub const TEMPLATE_TRIALS: u32 = 1000;

/// Hardness removed per tunneling action
pub const DIG_STRENGTH: u8 = 85;

/// Scheduler time unit: an agent's next turn is `1000 / speed` ticks away
pub const TURN_UNIT: u64 = 1000;

/// Default number of monsters spawned per level
pub const DEFAULT_NUMMON: usize = 10;

/// Player starting stats
pub const PLAYER_HP: i32 = 50;
pub const PLAYER_SPEED: i32 = 10;

/// Glyph whose death ends the run in victory
pub const BOSS_GLYPH: char = 'B';

/// Fog-of-war light radius (Chebyshev)
pub const LIGHT_RADIUS: i32 = 3;

/// Inventory and equipment capacity
pub const MAX_CARRY: usize = 10;
pub const NUM_EQUIP_SLOTS: usize = 12;

/// Floor objects generated per level
pub const OBJECTS_PER_LEVEL: usize = 10;

/// Map symbols
pub const S_ROCK: char = ' ';
pub const S_FLOOR: char = '.';
pub const S_CORRIDOR: char = '#';
pub const S_STAIR_UP: char = '<';
pub const S_STAIR_DOWN: char = '>';
pub const S_PLAYER: char = '@';

/// Save file constants
pub const SAVE_MARKER: &[u8; 12] = b"RLG327-S2025";
pub const SAVE_VERSION: u32 = 0;
pub const SAVE_DIR: &str = ".rlg327";
pub const SAVE_FILE: &str = "dungeon";
pub const MONSTER_DESC_FILE: &str = "monster_desc.txt";
pub const OBJECT_DESC_FILE: &str = "object_desc.txt";
