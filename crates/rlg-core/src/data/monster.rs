//! Monster templates and the monster description parser.
//!
//! Description files are line-oriented `BEGIN MONSTER` .. `END` records. A
//! record with a missing, duplicated, or malformed field is rejected and the
//! scan resumes at the next record; only a bad file header is an error.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use super::{Dice, ParseError};

pub const MONSTER_HEADER: &str = "RLG327 MONSTER DESCRIPTION 1";

/// Parsed monster description record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub name: String,
    pub description: String,
    pub symbol: char,
    pub colors: Vec<String>,
    pub speed: Dice,
    /// Ability tags (SMART, TELE, TUNNEL, ERRATIC, ...); decoded into the
    /// behavior bitset at agent creation
    pub abilities: Vec<String>,
    pub hp: Dice,
    pub damage: Dice,
    /// Spawn acceptance probability in percent
    pub rarity: u32,
}

/// Parse a whole description file
pub fn parse_monsters<R: BufRead>(reader: R) -> Result<Vec<MonsterTemplate>, ParseError> {
    let mut lines = reader.lines();

    let header = lines.next().transpose()?.unwrap_or_default();
    if header.trim_end() != MONSTER_HEADER {
        return Err(ParseError::BadHeader(header));
    }

    let mut monsters = Vec::new();
    while let Some(line) = lines.next().transpose()? {
        if line.trim_end() != "BEGIN MONSTER" {
            continue;
        }
        if let Some(template) = parse_record(&mut lines)? {
            monsters.push(template);
        }
    }
    Ok(monsters)
}

/// Parse one record. Returns Ok(None) when the record is malformed; the
/// caller resumes scanning for the next `BEGIN MONSTER`.
fn parse_record<I>(lines: &mut I) -> Result<Option<MonsterTemplate>, ParseError>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let mut name: Option<String> = None;
    let mut description: Option<String> = None;
    let mut symbol: Option<char> = None;
    let mut colors: Option<Vec<String>> = None;
    let mut speed: Option<Dice> = None;
    let mut abilities: Option<Vec<String>> = None;
    let mut hp: Option<Dice> = None;
    let mut damage: Option<Dice> = None;
    let mut rarity: Option<u32> = None;

    while let Some(line) = lines.next().transpose()? {
        let line = line.trim_end().to_string();
        if line == "END" {
            break;
        }

        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((k, r)) => (k, r.trim()),
            None => (line.as_str(), ""),
        };

        match keyword {
            "NAME" => {
                if name.is_some() || rest.is_empty() {
                    return Ok(None);
                }
                name = Some(rest.to_string());
            }
            "DESC" => {
                if description.is_some() {
                    return Ok(None);
                }
                let mut text = String::new();
                while let Some(desc_line) = lines.next().transpose()? {
                    if desc_line.trim_end() == "." {
                        break;
                    }
                    text.push_str(desc_line.trim_end());
                    text.push('\n');
                }
                description = Some(text);
            }
            "SYMB" => {
                let Some(c) = rest.chars().next() else {
                    return Ok(None);
                };
                if symbol.is_some() {
                    return Ok(None);
                }
                symbol = Some(c);
            }
            "COLOR" => {
                let list: Vec<String> = rest.split_whitespace().map(String::from).collect();
                if colors.is_some() || list.is_empty() {
                    return Ok(None);
                }
                colors = Some(list);
            }
            "SPEED" => match Dice::parse(rest) {
                Ok(d) if speed.is_none() => speed = Some(d),
                _ => return Ok(None),
            },
            "ABIL" => {
                let list: Vec<String> = rest.split_whitespace().map(String::from).collect();
                if abilities.is_some() || list.is_empty() {
                    return Ok(None);
                }
                abilities = Some(list);
            }
            "HP" => match Dice::parse(rest) {
                Ok(d) if hp.is_none() => hp = Some(d),
                _ => return Ok(None),
            },
            "DAM" => match Dice::parse(rest) {
                Ok(d) if damage.is_none() => damage = Some(d),
                _ => return Ok(None),
            },
            "RRTY" => match rest.parse::<u32>() {
                Ok(v) if rarity.is_none() => rarity = Some(v),
                _ => return Ok(None),
            },
            _ => return Ok(None),
        }
    }

    match (
        name, description, symbol, colors, speed, abilities, hp, damage, rarity,
    ) {
        (
            Some(name),
            Some(description),
            Some(symbol),
            Some(colors),
            Some(speed),
            Some(abilities),
            Some(hp),
            Some(damage),
            Some(rarity),
        ) => Ok(Some(MonsterTemplate {
            name,
            description,
            symbol,
            colors,
            speed,
            abilities,
            hp,
            damage,
            rarity,
        })),
        _ => Ok(None),
    }
}
