//! Object templates, materialized instances, and the object description
//! parser.

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::rng::GameRng;

use super::{Dice, ParseError};

pub const OBJECT_HEADER: &str = "RLG327 OBJECT DESCRIPTION 1";

/// Object categories from the description format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ObjectKind {
    Weapon,
    Offhand,
    Ranged,
    Armor,
    Helmet,
    Cloak,
    Gloves,
    Boots,
    Ring,
    Amulet,
    Light,
    Scroll,
    Book,
    Flask,
    Gold,
    Ammunition,
    Food,
    Wand,
    Container,
    Stack,
    #[default]
    Invalid,
}

/// Parsed object description record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectTemplate {
    pub name: String,
    pub description: String,
    pub kind: ObjectKind,
    pub symbol: char,
    pub colors: Vec<String>,
    pub hit: Dice,
    pub dodge: Dice,
    pub defense: Dice,
    pub weight: Dice,
    pub speed: Dice,
    pub attribute: Dice,
    pub value: Dice,
    pub damage: Dice,
    pub artifact: bool,
    pub rarity: u32,
}

/// An object materialized from a template: stat dice are rolled once, the
/// damage dice are kept for combat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInstance {
    pub name: String,
    pub kind: ObjectKind,
    pub symbol: char,
    pub colors: Vec<String>,
    pub hit: i32,
    pub dodge: i32,
    pub defense: i32,
    pub weight: i32,
    pub speed: i32,
    pub attribute: i32,
    pub value: i32,
    pub damage: Dice,
    pub is_artifact: bool,
    pub description: String,
    /// Position in the dungeon; (-1, -1) while carried
    pub x: i32,
    pub y: i32,
}

impl ObjectTemplate {
    /// Roll the stat dice to materialize an instance
    pub fn generate_instance(&self, rng: &mut GameRng) -> ObjectInstance {
        ObjectInstance {
            name: self.name.clone(),
            kind: self.kind,
            symbol: self.symbol,
            colors: self.colors.clone(),
            hit: self.hit.roll(rng),
            dodge: self.dodge.roll(rng),
            defense: self.defense.roll(rng),
            weight: self.weight.roll(rng),
            speed: self.speed.roll(rng),
            attribute: self.attribute.roll(rng),
            value: self.value.roll(rng),
            damage: self.damage,
            is_artifact: self.artifact,
            description: self.description.clone(),
            x: -1,
            y: -1,
        }
    }
}

/// Parse a whole object description file
pub fn parse_objects<R: BufRead>(reader: R) -> Result<Vec<ObjectTemplate>, ParseError> {
    let mut lines = reader.lines();

    let header = lines.next().transpose()?.unwrap_or_default();
    if header.trim_end() != OBJECT_HEADER {
        return Err(ParseError::BadHeader(header));
    }

    let mut objects = Vec::new();
    while let Some(line) = lines.next().transpose()? {
        if line.trim_end() != "BEGIN OBJECT" {
            continue;
        }
        if let Some(template) = parse_record(&mut lines)? {
            objects.push(template);
        }
    }
    Ok(objects)
}

/// Parse one record; malformed records are skipped. Unlike monsters, a
/// record is accepted with up to two of the fifteen fields missing (absent
/// dice roll as zero).
fn parse_record<I>(lines: &mut I) -> Result<Option<ObjectTemplate>, ParseError>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let mut template = ObjectTemplate::default();
    let mut seen = 0u32;

    let mut mark = |bit: u32| {
        let new = seen & (1 << bit) == 0;
        seen |= 1 << bit;
        new
    };

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
                if !mark(0) || rest.is_empty() {
                    return Ok(None);
                }
                template.name = rest.to_string();
            }
            "DESC" => {
                if !mark(1) {
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
                template.description = text;
            }
            "TYPE" => {
                mark(2);
                template.kind = rest.parse().unwrap_or(ObjectKind::Invalid);
            }
            "SYMB" => {
                let Some(c) = rest.chars().next() else {
                    return Ok(None);
                };
                mark(3);
                template.symbol = c;
            }
            "COLOR" => {
                mark(4);
                template.colors = rest.split_whitespace().map(String::from).collect();
            }
            "HIT" => {
                mark(5);
                let Ok(d) = Dice::parse(rest) else {
                    return Ok(None);
                };
                template.hit = d;
            }
            "DODGE" => {
                mark(6);
                let Ok(d) = Dice::parse(rest) else {
                    return Ok(None);
                };
                template.dodge = d;
            }
            "DEF" => {
                mark(7);
                let Ok(d) = Dice::parse(rest) else {
                    return Ok(None);
                };
                template.defense = d;
            }
            "WEIGHT" => {
                mark(8);
                let Ok(d) = Dice::parse(rest) else {
                    return Ok(None);
                };
                template.weight = d;
            }
            "SPEED" => {
                mark(9);
                let Ok(d) = Dice::parse(rest) else {
                    return Ok(None);
                };
                template.speed = d;
            }
            "ATTR" => {
                mark(10);
                let Ok(d) = Dice::parse(rest) else {
                    return Ok(None);
                };
                template.attribute = d;
            }
            "VAL" => {
                mark(11);
                let Ok(d) = Dice::parse(rest) else {
                    return Ok(None);
                };
                template.value = d;
            }
            "DAM" => {
                mark(12);
                let Ok(d) = Dice::parse(rest) else {
                    return Ok(None);
                };
                template.damage = d;
            }
            "ART" => {
                mark(13);
                template.artifact = rest == "TRUE";
            }
            "RRTY" => match rest.parse::<u32>() {
                Ok(v) => {
                    mark(14);
                    template.rarity = v;
                }
                Err(_) => return Ok(None),
            },
            _ => return Ok(None),
        }
    }

    if seen.count_ones() >= 13 {
        Ok(Some(template))
    } else {
        Ok(None)
    }
}
