//! Versioned binary save and restore of a level.
//!
//! Layout: 12-byte marker, u32 big-endian version, u32 big-endian file
//! size, player x and y as single bytes, the full hardness grid row-major,
//! a u16 room count followed by 4 bytes per room, then a u16 count plus
//! coordinate pair for each staircase. Live terrain is not stored: it is
//! rebuilt from hardness, rooms, and stairs on load.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::consts::{
    COLNO, MAX_ROOMS, ROWNO, S_CORRIDOR, S_FLOOR, S_ROCK, S_STAIR_DOWN, S_STAIR_UP, SAVE_MARKER,
    SAVE_VERSION,
};
use crate::dungeon::{Dungeon, Room};

/// Save file errors. These are the one fatal path: a corrupt save
/// terminates the program with a diagnostic rather than degrading.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid save file marker")]
    BadMarker,

    #[error("unsupported save file version {0}")]
    BadVersion(u32),

    #[error("corrupt save data: {0}")]
    Corrupt(String),

    #[error("no home directory to hold the game directory")]
    NoHomeDir,
}

/// Save a level and the player's cell to a file
pub fn save_dungeon(path: &Path, dungeon: &Dungeon, pc: (u8, u8)) -> Result<(), SaveError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_dungeon(&mut writer, dungeon, pc)?;
    writer.flush()?;
    Ok(())
}

/// Load a level and the player's cell from a file
pub fn load_dungeon(path: &Path) -> Result<(Dungeon, (u8, u8)), SaveError> {
    let file = File::open(path)?;
    read_dungeon(&mut BufReader::new(file))
}

/// Serialize to any writer
pub fn write_dungeon<W: Write>(
    writer: &mut W,
    dungeon: &Dungeon,
    pc: (u8, u8),
) -> Result<(), SaveError> {
    let up_count: u16 = dungeon.up_stair.is_some().into();
    let down_count: u16 = dungeon.down_stair.is_some().into();
    // marker + version + size + pc + hardness = 1702 fixed bytes
    let size = 1702
        + dungeon.rooms.len() as u32 * 4
        + 2
        + up_count as u32 * 2
        + 2
        + down_count as u32 * 2;

    writer.write_all(SAVE_MARKER)?;
    writer.write_all(&SAVE_VERSION.to_be_bytes())?;
    writer.write_all(&size.to_be_bytes())?;
    writer.write_all(&[pc.0, pc.1])?;

    for row in &dungeon.hardness {
        writer.write_all(row)?;
    }

    writer.write_all(&(dungeon.rooms.len() as u16).to_be_bytes())?;
    for room in &dungeon.rooms {
        writer.write_all(&[
            room.x as u8,
            room.y as u8,
            room.width as u8,
            room.height as u8,
        ])?;
    }

    writer.write_all(&up_count.to_be_bytes())?;
    if let Some((x, y)) = dungeon.up_stair {
        writer.write_all(&[x, y])?;
    }
    writer.write_all(&down_count.to_be_bytes())?;
    if let Some((x, y)) = dungeon.down_stair {
        writer.write_all(&[x, y])?;
    }

    Ok(())
}

/// Deserialize from any reader, rebuilding the live terrain purely from
/// hardness, room, and stair data
pub fn read_dungeon<R: Read>(reader: &mut R) -> Result<(Dungeon, (u8, u8)), SaveError> {
    let mut marker = [0u8; 12];
    reader.read_exact(&mut marker)?;
    if &marker != SAVE_MARKER {
        return Err(SaveError::BadMarker);
    }

    let version = read_u32(reader)?;
    if version != SAVE_VERSION {
        return Err(SaveError::BadVersion(version));
    }
    let _size = read_u32(reader)?;

    let mut pc = [0u8; 2];
    reader.read_exact(&mut pc)?;
    if pc[0] as usize >= COLNO || pc[1] as usize >= ROWNO {
        return Err(SaveError::Corrupt("player position outside the grid".into()));
    }

    let mut dungeon = Dungeon::default();
    for row in dungeon.hardness.iter_mut() {
        reader.read_exact(row)?;
    }

    let room_count = read_u16(reader)? as usize;
    for i in 0..room_count {
        let mut rec = [0u8; 4];
        reader.read_exact(&mut rec)?;
        let room = Room::new(
            rec[0] as usize,
            rec[1] as usize,
            rec[2] as usize,
            rec[3] as usize,
        );
        if room.x + room.width > COLNO || room.y + room.height > ROWNO {
            return Err(SaveError::Corrupt(format!(
                "room {} extends outside the grid",
                i
            )));
        }
        // Records past the cap are consumed but not kept
        if dungeon.rooms.len() < MAX_ROOMS {
            dungeon.rooms.push(room);
        }
    }

    dungeon.up_stair = read_stair(reader)?;
    dungeon.down_stair = read_stair(reader)?;

    rebuild_terrain(&mut dungeon);
    Ok((dungeon, (pc[0], pc[1])))
}

fn read_stair<R: Read>(reader: &mut R) -> Result<Option<(u8, u8)>, SaveError> {
    let count = read_u16(reader)?;
    if count == 0 {
        return Ok(None);
    }
    let mut rec = [0u8; 2];
    reader.read_exact(&mut rec)?;
    if rec[0] as usize >= COLNO || rec[1] as usize >= ROWNO {
        return Err(SaveError::Corrupt("staircase outside the grid".into()));
    }
    Ok(Some((rec[0], rec[1])))
}

/// Open hardness becomes corridor, everything else blank rock, then room
/// rectangles and stairs overlay their own terrain.
fn rebuild_terrain(dungeon: &mut Dungeon) {
    for y in 0..ROWNO {
        for x in 0..COLNO {
            dungeon.live[y][x] = if dungeon.hardness[y][x] == 0 {
                S_CORRIDOR
            } else {
                S_ROCK
            };
        }
    }
    for room in &dungeon.rooms {
        for y in room.y..room.y + room.height {
            for x in room.x..room.x + room.width {
                dungeon.live[y][x] = S_FLOOR;
            }
        }
    }
    if let Some((x, y)) = dungeon.up_stair {
        dungeon.live[y as usize][x as usize] = S_STAIR_UP;
    }
    if let Some((x, y)) = dungeon.down_stair {
        dungeon.live[y as usize][x as usize] = S_STAIR_DOWN;
    }
}

fn read_u16<R: Read>(reader: &mut R) -> Result<u16, SaveError> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, SaveError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon;
    use crate::rng::GameRng;
    use std::io::Cursor;

    fn saved_bytes(dungeon: &Dungeon, pc: (u8, u8)) -> Vec<u8> {
        let mut buf = Vec::new();
        write_dungeon(&mut buf, dungeon, pc).unwrap();
        buf
    }

    #[test]
    fn test_header_layout() {
        let mut rng = GameRng::new(77);
        let d = dungeon::generate(&mut rng);
        let bytes = saved_bytes(&d, (3, 4));

        assert_eq!(&bytes[0..12], SAVE_MARKER);
        assert_eq!(&bytes[12..16], &SAVE_VERSION.to_be_bytes());
        let size = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
        assert_eq!(size as usize, bytes.len());
        assert_eq!(&bytes[20..22], &[3, 4]);
        // Hardness grid directly follows the header
        assert_eq!(bytes[22], d.hardness_at(0, 0));
        assert_eq!(bytes[22 + COLNO * ROWNO - 1], d.hardness_at(COLNO - 1, ROWNO - 1));
    }

    #[test]
    fn test_round_trip() {
        let mut rng = GameRng::new(123);
        let original = dungeon::generate(&mut rng);
        let bytes = saved_bytes(&original, (10, 12));

        let (loaded, pc) = read_dungeon(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(pc, (10, 12));
        assert_eq!(loaded.hardness, original.hardness);
        assert_eq!(loaded.rooms, original.rooms);
        assert_eq!(loaded.up_stair, original.up_stair);
        assert_eq!(loaded.down_stair, original.down_stair);

        // Rebuilt terrain restores all room floor and stairs
        for room in &original.rooms {
            for y in room.y..room.y + room.height {
                for x in room.x..room.x + room.width {
                    let cell = loaded.live_at(x, y);
                    assert!(
                        cell == S_FLOOR || cell == S_STAIR_UP || cell == S_STAIR_DOWN,
                        "expected open terrain at ({}, {}), got {:?}",
                        x,
                        y,
                        cell
                    );
                }
            }
        }
        let (ux, uy) = original.up_stair.unwrap();
        assert_eq!(loaded.live_at(ux as usize, uy as usize), S_STAIR_UP);
    }

    #[test]
    fn test_corridors_rebuilt_from_hardness() {
        let mut rng = GameRng::new(123);
        let original = dungeon::generate(&mut rng);
        let bytes = saved_bytes(&original, (1, 1));
        let (loaded, _) = read_dungeon(&mut Cursor::new(&bytes)).unwrap();

        for y in 0..ROWNO {
            for x in 0..COLNO {
                if original.live_at(x, y) == S_CORRIDOR {
                    assert_eq!(loaded.live_at(x, y), S_CORRIDOR);
                }
            }
        }
    }

    #[test]
    fn test_bad_marker_rejected() {
        let mut rng = GameRng::new(5);
        let d = dungeon::generate(&mut rng);
        let mut bytes = saved_bytes(&d, (1, 1));
        bytes[0] = b'X';
        assert!(matches!(
            read_dungeon(&mut Cursor::new(&bytes)),
            Err(SaveError::BadMarker)
        ));
    }

    #[test]
    fn test_bad_version_rejected() {
        let mut rng = GameRng::new(5);
        let d = dungeon::generate(&mut rng);
        let mut bytes = saved_bytes(&d, (1, 1));
        bytes[15] = 9;
        assert!(matches!(
            read_dungeon(&mut Cursor::new(&bytes)),
            Err(SaveError::BadVersion(9))
        ));
    }

    #[test]
    fn test_truncated_file_rejected() {
        let mut rng = GameRng::new(5);
        let d = dungeon::generate(&mut rng);
        let bytes = saved_bytes(&d, (1, 1));
        let truncated = &bytes[..100];
        assert!(matches!(
            read_dungeon(&mut Cursor::new(truncated)),
            Err(SaveError::Io(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let mut rng = GameRng::new(9);
        let original = dungeon::generate(&mut rng);
        let path = std::env::temp_dir().join(format!("rlg-save-test-{}", std::process::id()));

        save_dungeon(&path, &original, (2, 3)).unwrap();
        let (loaded, pc) = load_dungeon(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(pc, (2, 3));
        assert_eq!(loaded.hardness, original.hardness);
    }
}
