//! sim-harness: headless runner for the GLITCHRUN simulation.
//!
//! Usage:
//!   sim-harness run --seed 7 --ticks 36000 --meta-dir ./profile --telemetry run.jsonl
//!   sim-harness waves --seed 7
//!   sim-harness buy --meta-dir ./profile --upgrade might

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use glitchrun_campaign::persistence::{FileStore, MetaStore};
use glitchrun_campaign::progression::purchase_upgrade;
use glitchrun_campaign::waves::generate_run_waves;
use glitchrun_core::commands::PlayerCommand;
use glitchrun_core::enums::GamePhase;
use glitchrun_core::state::GameStateSnapshot;
use glitchrun_sim::collaborators::{Collaborators, JsonLinesTelemetry, NullAudio};
use glitchrun_sim::config::SimConfig;
use glitchrun_sim::SimulationEngine;

/// Radians per tick the autopilot's idle heading turns.
const AUTOPILOT_TURN: f32 = 0.01;

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "waves" => cmd_waves(&args[2..]),
        "buy" => cmd_buy(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn print_usage() {
    eprintln!(
        "sim-harness: GLITCHRUN headless simulation runner\n\
         \n\
         Commands:\n\
         \n\
         run     Play one run on autopilot and print its summary\n\
         \n\
           --seed <N>          Run seed (default: 42)\n\
           --ticks <N>         Tick budget (default: 36000)\n\
           --config <path>     SimConfig JSON file (optional)\n\
           --meta-dir <path>   Load and save meta progress here (optional)\n\
           --telemetry <path>  Write telemetry as JSON lines (optional)\n\
         \n\
         waves   Print the wave schedule for a seed\n\
         \n\
           --seed <N>          Schedule seed (default: 42)\n\
         \n\
         buy     Spend meta currency on a permanent upgrade\n\
         \n\
           --meta-dir <path>   Profile directory\n\
           --upgrade <id>      might, vitality, swiftness, greed, growth, magnetism, revival\n"
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].as_str());
        }
    }
    None
}

fn parse_u64(args: &[String], flag: &str, default: u64) -> u64 {
    match flag_value(args, flag) {
        Some(raw) => match raw.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("Error: {flag} expects a number, got {raw}");
                process::exit(1);
            }
        },
        None => default,
    }
}

fn load_config(args: &[String]) -> SimConfig {
    let Some(path) = flag_value(args, "--config") else {
        return SimConfig::default();
    };
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            process::exit(1);
        }
    };
    match SimConfig::from_json(&json) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error in {path}: {e}");
            process::exit(1);
        }
    }
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let mut config = load_config(args);
    config.seed = parse_u64(args, "--seed", config.seed);
    let ticks = parse_u64(args, "--ticks", 36_000);

    let mut store = flag_value(args, "--meta-dir").map(|dir| MetaStore::new(FileStore::new(dir)));
    let meta = store.as_ref().map(MetaStore::load).unwrap_or_default();

    let mut engine = SimulationEngine::with_meta(config, meta);
    if let Some(path) = flag_value(args, "--telemetry") {
        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error creating {path}: {e}");
                process::exit(1);
            }
        };
        engine = engine.with_collaborators(Collaborators::new(
            Box::new(JsonLinesTelemetry::new(BufWriter::new(file))),
            Box::new(NullAudio),
        ));
    }

    engine.queue_command(PlayerCommand::StartRun);
    let mut snapshot = engine.tick();
    for tick in 0..ticks {
        if matches!(snapshot.phase, GamePhase::GameOver | GamePhase::Victory) {
            break;
        }
        engine.queue_command(autopilot(&snapshot, tick));
        snapshot = engine.tick();
    }

    // Out of budget mid-run: abandon so the run still settles.
    if !matches!(snapshot.phase, GamePhase::GameOver | GamePhase::Victory) {
        engine.queue_command(PlayerCommand::ReturnToMenu);
        engine.tick();
    }

    if let Some(store) = store.as_mut() {
        store.save(engine.meta());
        tracing::info!(
            dir = %store.store().dir().display(),
            currency = engine.meta().currency,
            "profile saved"
        );
    }
    match engine.take_run_summary() {
        Some(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error encoding summary: {e}"),
        },
        None => eprintln!("Run produced no summary"),
    }
}

/// Take the first offer in drafts, head for the mission marker when there is
/// one, and otherwise sweep in a slow circle.
fn autopilot(snapshot: &GameStateSnapshot, tick: u64) -> PlayerCommand {
    match snapshot.phase {
        GamePhase::LevelUp => return PlayerCommand::SelectUpgrade { index: 0 },
        GamePhase::AugmentSelect => return PlayerCommand::SelectAugment { index: 0 },
        _ => {}
    }
    let marker = snapshot
        .mission
        .as_ref()
        .filter(|m| !m.complete)
        .and_then(|m| m.marker);
    let heading = match marker {
        Some(target) => (target - snapshot.player.position).normalize_or_zero(),
        None => {
            let angle = tick as f32 * AUTOPILOT_TURN;
            Vec2::new(angle.cos(), angle.sin())
        }
    };
    PlayerCommand::Move {
        x: heading.x,
        y: heading.y,
    }
}

// --- Waves command ---

fn cmd_waves(args: &[String]) {
    let seed = parse_u64(args, "--seed", 42);
    let waves = generate_run_waves(&mut ChaCha8Rng::seed_from_u64(seed));
    println!("{:>4}  {:<14} {:>6} {:>5}  enemies", "wave", "mission", "param", "every");
    for wave in &waves {
        let mission = match wave.boss {
            Some(boss) => format!("Boss:{boss:?}"),
            None => format!("{:?}", wave.mission_type),
        };
        println!(
            "{:>4}  {:<14} {:>6} {:>5}  {:?}",
            wave.id, mission, wave.mission_param, wave.spawn_interval, wave.enemy_kinds
        );
    }
}

// --- Buy command ---

fn cmd_buy(args: &[String]) {
    let Some(dir) = flag_value(args, "--meta-dir").map(PathBuf::from) else {
        eprintln!("Error: --meta-dir <path> is required");
        process::exit(1);
    };
    let Some(upgrade) = flag_value(args, "--upgrade") else {
        eprintln!("Error: --upgrade <id> is required");
        process::exit(1);
    };

    let mut store = MetaStore::new(FileStore::new(dir));
    let mut meta = store.load();
    match purchase_upgrade(&mut meta, upgrade) {
        Ok(cost) => {
            if let Err(e) = store.try_save(&meta) {
                eprintln!("Error saving profile: {e}");
                process::exit(1);
            }
            println!(
                "Bought {upgrade} level {} for {cost}, {} left",
                meta.upgrade_level(upgrade),
                meta.currency
            );
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
