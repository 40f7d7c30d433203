//! Terminal setup and the blocking interface the scheduler drives.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use strum::IntoEnumIterator;

use rlg_core::Interface;
use rlg_core::action::Command;
use rlg_core::agent::EquipSlot;
use rlg_core::world::WorldState;

use crate::display;
use crate::input::{KeyAction, Pending, key_to_action};

/// Blocking ratatui front end
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    restored: bool,
}

impl TuiInterface {
    /// Enter raw mode and the alternate screen
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    /// Leave the alternate screen and restore the terminal. Safe to call
    /// more than once.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        Ok(())
    }

    /// Block for the next key press
    fn read_key() -> io::Result<KeyEvent> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(key);
                }
            }
        }
    }

    fn draw_world(&mut self, world: &WorldState, prompt: Option<&str>) {
        let _ = self.terminal.draw(|frame| {
            display::draw(frame, world);
            if let Some(text) = prompt {
                let area = frame.area();
                let line = ratatui::layout::Rect {
                    height: 1.min(area.height),
                    ..area
                };
                frame.render_widget(Paragraph::new(text.to_string()), line);
            }
        });
    }

    /// Full-screen list overlay; any key returns
    fn show_list(&mut self, title: &str, lines: Vec<String>) {
        let _ = self.terminal.draw(|frame| {
            let mut text = vec![Line::from(format!("--- {} ---", title))];
            text.extend(lines.into_iter().map(Line::from));
            text.push(Line::from(""));
            text.push(Line::from("Press any key to continue..."));
            frame.render_widget(Paragraph::new(text), frame.area());
        });
        let _ = Self::read_key();
    }

    fn show_inventory(&mut self, world: &WorldState) {
        let lines = world
            .player()
            .inventory
            .iter()
            .enumerate()
            .map(|(i, slot)| match slot {
                Some(item) => format!("{}: {}", i, item.name),
                None => format!("{}: <empty>", i),
            })
            .collect();
        self.show_list("Inventory (0-9)", lines);
    }

    fn show_equipment(&mut self, world: &WorldState) {
        let lines = EquipSlot::iter()
            .map(|slot| {
                let letter = (b'a' + slot as u8) as char;
                match &world.player().equipment[slot as usize] {
                    Some(item) => format!("{}: {} - {}", letter, slot, item.name),
                    None => format!("{}: {} - <empty>", letter, slot),
                }
            })
            .collect();
        self.show_list("Equipment (a-l)", lines);
    }

    fn show_monster_list(&mut self, world: &WorldState) {
        let lines = world
            .visible_monsters()
            .into_iter()
            .map(|(glyph, dx, dy)| {
                let vert = match dy.signum() {
                    -1 => Some(format!("{} north", -dy)),
                    1 => Some(format!("{} south", dy)),
                    _ => None,
                };
                let horiz = match dx.signum() {
                    -1 => Some(format!("{} west", -dx)),
                    1 => Some(format!("{} east", dx)),
                    _ => None,
                };
                match (vert, horiz) {
                    (Some(v), Some(h)) => format!("{}, {} and {}", glyph, v, h),
                    (Some(v), None) => format!("{}, {}", glyph, v),
                    (None, Some(h)) => format!("{}, {}", glyph, h),
                    (None, None) => format!("{}, same cell", glyph),
                }
            })
            .collect();
        self.show_list("Monster List", lines);
    }

    /// Ask for a carry slot (0-9); anything else cancels
    fn prompt_carry_slot(&mut self, world: &WorldState, prompt: &str) -> Option<usize> {
        self.draw_world(world, Some(prompt));
        let key = Self::read_key().ok()?;
        match key.code {
            KeyCode::Char(c @ '0'..='9') => Some(c as usize - '0' as usize),
            _ => None,
        }
    }

    /// Ask for an equipment slot (a-l); anything else cancels
    fn prompt_equip_slot(&mut self, world: &WorldState, prompt: &str) -> Option<usize> {
        self.draw_world(world, Some(prompt));
        let key = Self::read_key().ok()?;
        match key.code {
            KeyCode::Char(c @ 'a'..='l') => Some(c as usize - 'a' as usize),
            _ => None,
        }
    }
}

impl Interface for TuiInterface {
    fn render(&mut self, world: &WorldState) {
        self.draw_world(world, None);
    }

    fn next_command(&mut self, world: &WorldState) -> Command {
        loop {
            let Ok(key) = Self::read_key() else {
                // Losing the input stream ends the run cleanly
                return Command::Quit;
            };
            let Some(action) = key_to_action(key) else {
                continue;
            };

            match action {
                KeyAction::Direct(command) => return command,
                KeyAction::Prompt(Pending::Inventory) => {
                    self.show_inventory(world);
                    self.draw_world(world, None);
                }
                KeyAction::Prompt(Pending::Equipment) => {
                    self.show_equipment(world);
                    self.draw_world(world, None);
                }
                KeyAction::Prompt(Pending::MonsterList) => {
                    self.show_monster_list(world);
                    self.draw_world(world, None);
                }
                KeyAction::Prompt(Pending::Wear) => {
                    if let Some(idx) =
                        self.prompt_carry_slot(world, "Wear item from inventory (0-9), any other key to cancel")
                    {
                        return Command::Wear(idx);
                    }
                    self.draw_world(world, None);
                }
                KeyAction::Prompt(Pending::TakeOff) => {
                    if let Some(slot) =
                        self.prompt_equip_slot(world, "Take off equipment (a-l), any other key to cancel")
                    {
                        return Command::TakeOff(slot);
                    }
                    self.draw_world(world, None);
                }
                KeyAction::Prompt(Pending::Drop) => {
                    if let Some(idx) =
                        self.prompt_carry_slot(world, "Drop item (0-9), any other key to cancel")
                    {
                        return Command::Drop(idx);
                    }
                    self.draw_world(world, None);
                }
                KeyAction::Prompt(Pending::Expunge) => {
                    if let Some(idx) =
                        self.prompt_carry_slot(world, "Expunge item (0-9), any other key to cancel")
                    {
                        return Command::Expunge(idx);
                    }
                    self.draw_world(world, None);
                }
            }
        }
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
