//! The turn scheduler.
//!
//! A discrete-event loop over a min-heap of (time, agent) events. Each
//! agent's next event lands `1000 / speed` ticks after its current one, so
//! faster agents act more often. The heap only holds indices; dead agents
//! are lazily discarded when their stale events surface.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::action::{self, Command, TurnResult};
use crate::ai;
use crate::consts::TURN_UNIT;
use crate::world::{RunStatus, WorldState};

/// The blocking input/render surface the scheduler drives. Rendering and
/// command collection live outside the core; the scheduler does not proceed
/// until a command arrives.
pub trait Interface {
    fn render(&mut self, world: &WorldState);
    fn next_command(&mut self, world: &WorldState) -> Command;
}

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Victory,
    Defeat,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ScheduledEvent {
    time: u64,
    agent: usize,
}

fn seed_queue(queue: &mut BinaryHeap<Reverse<ScheduledEvent>>, agents: usize, time: u64) {
    queue.clear();
    for agent in 0..agents {
        queue.push(Reverse(ScheduledEvent { time, agent }));
    }
}

/// Drive the simulation until a terminal condition: queue exhausted, player
/// dead, boss or last monster killed, or an explicit quit.
pub fn run(world: &mut WorldState, iface: &mut dyn Interface) -> RunOutcome {
    let mut queue = BinaryHeap::new();
    seed_queue(&mut queue, world.agents.len(), 0);

    while let Some(Reverse(event)) = queue.pop() {
        // Lazy deletion: events may outlive their agent
        if event.agent >= world.agents.len() || !world.agents[event.agent].alive {
            continue;
        }
        let time = event.time;

        if world.agents[event.agent].is_player() {
            if player_turn(world, iface) == TurnResult::Quit {
                return RunOutcome::Quit;
            }
            if world.status == RunStatus::Playing && !world.level_changed {
                // The origin moved; both fields are stale
                world.recompute_distance_fields();
            }
        } else {
            ai::take_turn(world, event.agent);
        }

        match world.status {
            RunStatus::Lost => return RunOutcome::Defeat,
            RunStatus::Won => return RunOutcome::Victory,
            RunStatus::Playing => {}
        }

        if world.level_changed {
            // Stairs swapped out the whole agent list; every queued index
            // is stale. Reseed at the current time.
            world.level_changed = false;
            seed_queue(&mut queue, world.agents.len(), time);
            continue;
        }

        let agent = &world.agents[event.agent];
        if agent.alive {
            queue.push(Reverse(ScheduledEvent {
                time: time + TURN_UNIT / agent.speed.max(1) as u64,
                agent: event.agent,
            }));
        }
    }

    RunOutcome::Quit
}

/// Block until a command that consumes the player's turn (or quits)
fn player_turn(world: &mut WorldState, iface: &mut dyn Interface) -> TurnResult {
    loop {
        world.update_seen();
        iface.render(world);
        world.messages.clear();
        let command = iface.next_command(world);
        match action::apply_command(world, command) {
            TurnResult::NotConsumed => continue,
            result => return result,
        }
    }
}
