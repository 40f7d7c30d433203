//! Input handling - convert key events to commands.
//!
//! Movement uses the classic roguelike bindings: vi keys, the numpad
//! digits, and the arrow keys all work.

use crossterm::event::{KeyCode, KeyEvent};
use rlg_core::action::{Command, Direction};

/// Keys that need more input (a slot choice or an overlay) before they can
/// become a [`Command`]; handled in app.rs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    Inventory,
    Equipment,
    MonsterList,
    Wear,
    TakeOff,
    Drop,
    Expunge,
}

/// What one keypress means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Direct(Command),
    Prompt(Pending),
}

/// Map a key event to its action. Unknown keys return None and are
/// swallowed by the input loop.
pub fn key_to_action(key: KeyEvent) -> Option<KeyAction> {
    use KeyAction::{Direct, Prompt};

    let action = match key.code {
        // Vi keys and numpad digits
        KeyCode::Char('7') | KeyCode::Char('y') => Direct(Command::Move(Direction::NorthWest)),
        KeyCode::Char('8') | KeyCode::Char('k') => Direct(Command::Move(Direction::North)),
        KeyCode::Char('9') | KeyCode::Char('u') => Direct(Command::Move(Direction::NorthEast)),
        KeyCode::Char('4') | KeyCode::Char('h') => Direct(Command::Move(Direction::West)),
        KeyCode::Char('6') | KeyCode::Char('l') => Direct(Command::Move(Direction::East)),
        KeyCode::Char('1') | KeyCode::Char('b') => Direct(Command::Move(Direction::SouthWest)),
        KeyCode::Char('2') | KeyCode::Char('j') => Direct(Command::Move(Direction::South)),
        KeyCode::Char('3') | KeyCode::Char('n') => Direct(Command::Move(Direction::SouthEast)),

        // Arrow keys
        KeyCode::Up => Direct(Command::Move(Direction::North)),
        KeyCode::Down => Direct(Command::Move(Direction::South)),
        KeyCode::Left => Direct(Command::Move(Direction::West)),
        KeyCode::Right => Direct(Command::Move(Direction::East)),

        // Stairs and toggles
        KeyCode::Char('<') => Direct(Command::GoUp),
        KeyCode::Char('>') => Direct(Command::GoDown),
        KeyCode::Char('f') => Direct(Command::ToggleFog),
        KeyCode::Char('Q') => Direct(Command::Quit),

        // Overlays and item prompts
        KeyCode::Char('i') => Prompt(Pending::Inventory),
        KeyCode::Char('e') => Prompt(Pending::Equipment),
        KeyCode::Char('m') => Prompt(Pending::MonsterList),
        KeyCode::Char('w') => Prompt(Pending::Wear),
        KeyCode::Char('t') => Prompt(Pending::TakeOff),
        KeyCode::Char('d') => Prompt(Pending::Drop),
        KeyCode::Char('x') => Prompt(Pending::Expunge),

        _ => return None,
    };
    Some(action)
}
