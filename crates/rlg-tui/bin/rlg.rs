//! rlg: a terminal dungeon crawler.
//!
//! Main entry point: loads the monster and object descriptions, builds or
//! loads a level, and hands the world to the scheduler.

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::process;

use clap::Parser;

use rlg_core::data::{self, MonsterTemplate, ObjectTemplate};
use rlg_core::world::{WorldState, paths, save};
use rlg_core::{DEFAULT_NUMMON, GameRng, RunOutcome};
use rlg_tui::TuiInterface;

/// Terminal dungeon crawler
#[derive(Parser, Debug)]
#[command(name = "rlg")]
#[command(author, version, about = "rlg - crawl the dungeon", long_about = None)]
struct Args {
    /// Load the saved dungeon instead of generating a fresh one
    #[arg(long)]
    load: bool,

    /// Save the dungeon right after generation
    #[arg(long)]
    save: bool,

    /// Monsters spawned on each level
    #[arg(long, default_value_t = DEFAULT_NUMMON)]
    nummon: usize,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Print the parsed monster templates and exit
    #[arg(long)]
    parse: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("rlg: {}", err);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    paths::ensure_game_dir()?;
    let monster_templates = read_monster_templates();
    println!("Loaded {} monster templates.", monster_templates.len());
    let object_templates = read_object_templates();
    println!("Loaded {} object templates.", object_templates.len());

    if args.parse {
        print_monsters(&monster_templates);
        return Ok(());
    }

    let rng = match args.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };

    let dungeon_file = paths::dungeon_path()?;
    let mut world = if args.load {
        let (dungeon, (px, py)) = save::load_dungeon(&dungeon_file)?;
        WorldState::with_dungeon(
            dungeon,
            (px as i32, py as i32),
            monster_templates,
            object_templates,
            args.nummon,
            rng,
        )
    } else {
        WorldState::generate(monster_templates, object_templates, args.nummon, rng)
    };

    if args.save {
        let (px, py) = world.player().pos();
        save::save_dungeon(&dungeon_file, &world.dungeon, (px as u8, py as u8))?;
    }

    let seed = world.rng.seed();
    let mut iface = TuiInterface::new()?;
    let outcome = rlg_core::run(&mut world, &mut iface);
    iface.restore()?;

    for message in &world.messages {
        println!("{}", message);
    }
    match outcome {
        RunOutcome::Victory => println!("You win!"),
        RunOutcome::Defeat => println!("You lose! The PC has been killed."),
        RunOutcome::Quit => println!("Goodbye."),
    }
    println!("(seed {})", seed);
    Ok(())
}

/// Missing or malformed description files degrade to an empty template
/// list with a warning; the game still runs, it just spawns nothing.
fn read_monster_templates() -> Vec<MonsterTemplate> {
    let Ok(path) = paths::monster_desc_path() else {
        return Vec::new();
    };
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(_) => {
            eprintln!("Warning: no monster descriptions at {}.", path.display());
            return Vec::new();
        }
    };
    match data::parse_monsters(BufReader::new(file)) {
        Ok(templates) => templates,
        Err(err) => {
            eprintln!("Warning: invalid monster descriptions: {}.", err);
            Vec::new()
        }
    }
}

fn read_object_templates() -> Vec<ObjectTemplate> {
    let Ok(path) = paths::object_desc_path() else {
        return Vec::new();
    };
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(_) => {
            eprintln!("Warning: no object descriptions at {}.", path.display());
            return Vec::new();
        }
    };
    match data::parse_objects(BufReader::new(file)) {
        Ok(templates) => templates,
        Err(err) => {
            eprintln!("Warning: invalid object descriptions: {}.", err);
            Vec::new()
        }
    }
}

fn print_monsters(templates: &[MonsterTemplate]) {
    for template in templates {
        println!("{}", template.name);
        print!("{}", template.description);
        println!("{}", template.symbol);
        println!("{}", template.colors.join(" "));
        println!("{}", template.speed);
        println!("{}", template.abilities.join(" "));
        println!("{}", template.hp);
        println!("{}", template.damage);
        println!("{}", template.rarity);
        println!();
    }
}
