//! World state: the grids, the agent list, the distance fields, and level
//! lifecycle. One `WorldState` is passed by reference to the generator,
//! pathfinder, resolver, and scheduler; nothing else holds simulation state.

pub mod paths;
pub mod save;

use std::collections::HashSet;

use crate::agent::Agent;
use crate::consts::{
    COLNO, LIGHT_RADIUS, OBJECTS_PER_LEVEL, ROWNO, S_FLOOR, S_PLAYER, S_ROCK, TEMPLATE_TRIALS,
};
use crate::data::{MonsterTemplate, ObjectInstance, ObjectTemplate};
use crate::dungeon::{self, DistanceField, Dungeon, TraversalMode};
use crate::rng::GameRng;

pub use save::SaveError;

/// Whether the run is still going, and how it ended if not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

/// All mutable simulation state for one run
pub struct WorldState {
    pub dungeon: Dungeon,

    /// Player at index 0, then monsters in spawn order. Dead agents are
    /// kept and skipped.
    pub agents: Vec<Agent>,

    /// Objects lying on the floor
    pub objects: Vec<ObjectInstance>,

    pub monster_templates: Vec<MonsterTemplate>,
    pub object_templates: Vec<ObjectTemplate>,

    /// Artifacts that have already been generated this run
    pub seen_artifacts: HashSet<String>,

    /// Distance fields from the player's cell, one per traversal class
    pub dist_floor: DistanceField,
    pub dist_tunnel: DistanceField,

    /// Remembered cells for fog-of-war rendering
    pub seen: [[char; COLNO]; ROWNO],
    pub fog_enabled: bool,

    /// Monsters spawned on each level entry
    pub nummon: usize,

    pub rng: GameRng,
    pub status: RunStatus,

    /// Set when the player takes a staircase; tells the scheduler to reseed
    /// its queue
    pub level_changed: bool,

    /// Messages produced since the last render; the scheduler clears them
    /// once they have been shown
    pub messages: Vec<String>,
}

impl WorldState {
    /// Generate a fresh level and populate it
    pub fn generate(
        monster_templates: Vec<MonsterTemplate>,
        object_templates: Vec<ObjectTemplate>,
        nummon: usize,
        mut rng: GameRng,
    ) -> Self {
        let dungeon = dungeon::generate(&mut rng);
        let spawn = dungeon.spawn_cell();
        Self::with_dungeon(
            dungeon,
            spawn,
            monster_templates,
            object_templates,
            nummon,
            rng,
        )
    }

    /// Build a world around an existing dungeon (generated or loaded) with
    /// the player at `spawn`.
    pub fn with_dungeon(
        mut dungeon: Dungeon,
        spawn: (i32, i32),
        monster_templates: Vec<MonsterTemplate>,
        object_templates: Vec<ObjectTemplate>,
        nummon: usize,
        rng: GameRng,
    ) -> Self {
        dungeon.snapshot_base();
        let mut world = Self {
            dungeon,
            agents: Vec::new(),
            objects: Vec::new(),
            monster_templates,
            object_templates,
            seen_artifacts: HashSet::new(),
            dist_floor: DistanceField::empty(),
            dist_tunnel: DistanceField::empty(),
            seen: [[S_ROCK; COLNO]; ROWNO],
            fog_enabled: true,
            nummon,
            rng,
            status: RunStatus::default(),
            level_changed: false,
            messages: Vec::new(),
        };
        world.populate(spawn);
        world
    }

    /// Regenerate the level in place: fresh grids, fresh agents, configured
    /// monster count, player at the new first room's origin.
    pub fn new_level(&mut self) {
        self.agents.clear();
        self.objects.clear();
        self.dungeon = dungeon::generate(&mut self.rng);
        self.dungeon.snapshot_base();
        self.seen = [[S_ROCK; COLNO]; ROWNO];
        let spawn = self.dungeon.spawn_cell();
        self.populate(spawn);
        self.level_changed = true;
    }

    /// Place the player, compute the distance fields, and spawn objects and
    /// monsters.
    fn populate(&mut self, (px, py): (i32, i32)) {
        self.dungeon.set_live(px as usize, py as usize, S_PLAYER);
        self.agents.push(Agent::player(px, py));
        self.recompute_distance_fields();
        self.generate_objects(OBJECTS_PER_LEVEL);
        for _ in 0..self.nummon {
            self.spawn_monster();
        }
    }

    pub fn player(&self) -> &Agent {
        &self.agents[0]
    }

    /// Recompute both distance fields from the player's current cell.
    /// Called after every player turn.
    pub fn recompute_distance_fields(&mut self) {
        let origin = self.agents[0].pos();
        self.dist_floor = DistanceField::compute(&self.dungeon, origin, TraversalMode::Floor);
        self.dist_tunnel = DistanceField::compute(&self.dungeon, origin, TraversalMode::Tunnel);
    }

    /// Index of the living monster at a cell, if any
    pub fn monster_at(&self, x: i32, y: i32) -> Option<usize> {
        self.agents
            .iter()
            .position(|a| a.alive && a.is_monster() && a.x == x && a.y == y)
    }

    pub fn living_monsters(&self) -> usize {
        self.agents
            .iter()
            .filter(|a| a.alive && a.is_monster())
            .count()
    }

    /// Spawn one monster: rejection-sample a template by rarity, then
    /// resample random cells until an unoccupied floor cell turns up.
    /// Returns false when selection exhausts its budget or the level has no
    /// floor to stand on; the spawn is skipped, never an error.
    pub fn spawn_monster(&mut self) -> bool {
        if self.monster_templates.is_empty() {
            return false;
        }

        let mut selected = None;
        for _ in 0..TEMPLATE_TRIALS {
            let idx = self.rng.rn2(self.monster_templates.len() as u32) as usize;
            let rarity = self.monster_templates[idx].rarity;
            if self.rng.percent(rarity) {
                selected = Some(idx);
                break;
            }
        }
        let Some(idx) = selected else {
            return false;
        };

        if !self.has_open_floor() {
            return false;
        }
        let (x, y) = loop {
            let x = self.rng.rn2(COLNO as u32) as usize;
            let y = self.rng.rn2(ROWNO as u32) as usize;
            if self.dungeon.live_at(x, y) == S_FLOOR {
                break (x as i32, y as i32);
            }
        };

        let template = &self.monster_templates[idx];
        let monster = Agent::from_template(template, x, y, &mut self.rng);
        self.dungeon.set_live(x as usize, y as usize, monster.glyph);
        self.agents.push(monster);
        true
    }

    /// The placement loop above has no retry cap; guard against the
    /// degenerate level where no floor cell exists at all.
    fn has_open_floor(&self) -> bool {
        self.dungeon.live.iter().flatten().any(|&c| c == S_FLOOR)
    }

    /// Scatter floor objects: rejection-sample templates by rarity (skipping
    /// artifacts already generated), then find an unoccupied floor cell
    /// within a bounded number of tries. Exhaustion skips the object.
    pub fn generate_objects(&mut self, count: usize) {
        if self.object_templates.is_empty() {
            return;
        }

        for _ in 0..count {
            let mut selected = None;
            for _ in 0..TEMPLATE_TRIALS {
                let idx = self.rng.rn2(self.object_templates.len() as u32) as usize;
                let template = &self.object_templates[idx];
                if template.artifact && self.seen_artifacts.contains(&template.name) {
                    continue;
                }
                if self.rng.percent(template.rarity) {
                    selected = Some(idx);
                    break;
                }
            }
            let Some(idx) = selected else {
                continue;
            };

            let mut placed = None;
            for _ in 0..TEMPLATE_TRIALS {
                let x = self.rng.rn2(COLNO as u32) as i32;
                let y = self.rng.rn2(ROWNO as u32) as i32;
                if !self.cell_is_occupied(x, y) {
                    placed = Some((x, y));
                    break;
                }
            }
            let Some((x, y)) = placed else {
                continue;
            };

            let mut instance = self.object_templates[idx].generate_instance(&mut self.rng);
            instance.x = x;
            instance.y = y;
            if instance.is_artifact {
                self.seen_artifacts.insert(instance.name.clone());
            }
            self.objects.push(instance);
        }
    }

    /// A cell is free for an object only when it is plain floor with no
    /// agent or object on it
    fn cell_is_occupied(&self, x: i32, y: i32) -> bool {
        if self.dungeon.live_at(x as usize, y as usize) != S_FLOOR {
            return true;
        }
        if self
            .agents
            .iter()
            .any(|a| a.alive && a.x == x && a.y == y)
        {
            return true;
        }
        self.objects.iter().any(|o| o.x == x && o.y == y)
    }

    pub fn object_index_at(&self, x: i32, y: i32) -> Option<usize> {
        self.objects.iter().position(|o| o.x == x && o.y == y)
    }

    /// Record the cells around the player as explored, for fog-of-war
    /// rendering
    pub fn update_seen(&mut self) {
        let (px, py) = self.agents[0].pos();
        for y in py - LIGHT_RADIUS..=py + LIGHT_RADIUS {
            for x in px - LIGHT_RADIUS..=px + LIGHT_RADIUS {
                if Dungeon::in_bounds(x, y) {
                    self.seen[y as usize][x as usize] = self.dungeon.live_at(x as usize, y as usize);
                }
            }
        }
    }

    pub fn push_message(&mut self, text: impl Into<String>) {
        self.messages.push(text.into());
    }

    /// Glyph and offset of every living monster the player can currently
    /// see, for the monster-list overlay
    pub fn visible_monsters(&self) -> Vec<(char, i32, i32)> {
        let (px, py) = self.agents[0].pos();
        self.agents
            .iter()
            .filter(|a| a.alive && a.is_monster())
            .filter(|a| {
                !self.fog_enabled
                    || ((a.x - px).abs() <= LIGHT_RADIUS && (a.y - py).abs() <= LIGHT_RADIUS)
            })
            .map(|a| (a.glyph, a.x - px, a.y - py))
            .collect()
    }
}
