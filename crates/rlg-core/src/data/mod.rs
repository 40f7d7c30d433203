//! Template provider: dice expressions and the monster/object description
//! formats. The simulation only consumes the parsed in-memory lists.

mod dice;
mod monster;
mod object;

use thiserror::Error;

pub use dice::Dice;
pub use monster::{MONSTER_HEADER, MonsterTemplate, parse_monsters};
pub use object::{OBJECT_HEADER, ObjectInstance, ObjectKind, ObjectTemplate, parse_objects};

/// Description file errors. A malformed record is silently skipped; these
/// are the failures that reject the whole file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not read description file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid description file header: {0:?}")]
    BadHeader(String),

    #[error("invalid dice expression: {0:?}")]
    BadDice(String),
}
