//! Locations of the game directory and its files, under the user's home.

use std::fs;
use std::path::PathBuf;

use crate::consts::{MONSTER_DESC_FILE, OBJECT_DESC_FILE, SAVE_DIR, SAVE_FILE};

use super::SaveError;

/// `~/.rlg327`
pub fn game_dir() -> Result<PathBuf, SaveError> {
    dirs::home_dir()
        .map(|home| home.join(SAVE_DIR))
        .ok_or(SaveError::NoHomeDir)
}

/// Create the game directory if it does not exist yet
pub fn ensure_game_dir() -> Result<PathBuf, SaveError> {
    let dir = game_dir()?;
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn dungeon_path() -> Result<PathBuf, SaveError> {
    Ok(game_dir()?.join(SAVE_FILE))
}

pub fn monster_desc_path() -> Result<PathBuf, SaveError> {
    Ok(game_dir()?.join(MONSTER_DESC_FILE))
}

pub fn object_desc_path() -> Result<PathBuf, SaveError> {
    Ok(game_dir()?.join(OBJECT_DESC_FILE))
}
