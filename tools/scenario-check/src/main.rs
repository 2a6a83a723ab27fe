//! scenario-check: validate scenario files, dump built-ins, dry-run a level.
//!
//! Usage:
//!   scenario-check validate level1.json
//!   scenario-check dump siege --output siege.json
//!   scenario-check run armor --seconds 60 --seed 7

use std::path::PathBuf;
use std::process;

use glam::Vec3;

use outrider_core::constants::TICK_RATE;
use outrider_core::enums::{LevelPhase, SpawnMode};
use outrider_core::scenario::ScenarioConfig;
use outrider_sim::scenario::{build_scenario, ScenarioId};
use outrider_sim::{SimConfig, SimulationEngine};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "validate" => cmd_validate(&args[2..]),
        "dump" => cmd_dump(&args[2..]),
        "run" => cmd_run(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "scenario-check: OUTRIDER scenario tool\n\
         \n\
         Commands:\n\
         \n\
         validate <file.json>        Parse and validate a scenario, print its waves\n\
         \n\
         dump <patrol|armor|siege>   Print a built-in scenario as JSON\n\
         \n\
           --output <path>    Write to a file instead of stdout\n\
         \n\
         run <file.json|patrol|armor|siege>\n\
                                     Run the level headless with a player at the origin\n\
         \n\
           --seconds <N>      Simulated seconds (default: 120)\n\
           --seed <N>         RNG seed (default: 42)\n\
         \n\
         Examples:\n\
         \n\
           scenario-check validate levels/level1.json\n\
           scenario-check dump siege --output levels/siege.json\n\
           scenario-check run armor --seconds 60\n"
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(&args[i + 1]);
        }
    }
    None
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    match flag_value(args, flag) {
        Some(raw) => match raw.parse() {
            Ok(v) => v,
            Err(_) => {
                eprintln!("Error: invalid value for {flag}: {raw}");
                process::exit(1);
            }
        },
        None => default,
    }
}

/// A built-in scenario name or a path to a JSON file.
fn load_scenario(arg: &str) -> ScenarioConfig {
    if let Ok(id) = arg.parse::<ScenarioId>() {
        return build_scenario(id);
    }
    match ScenarioConfig::load(PathBuf::from(arg)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {arg}: {e}");
            process::exit(1);
        }
    }
}

// --- Validate command ---

fn cmd_validate(args: &[String]) {
    let Some(path) = args.first() else {
        eprintln!("Error: validate needs a scenario file");
        process::exit(1);
    };

    let config = match ScenarioConfig::load(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {path}: {e}");
            process::exit(1);
        }
    };

    println!(
        "{}: {} waves, {} enemies",
        if config.name.is_empty() { path.as_str() } else { config.name.as_str() },
        config.waves.len(),
        config.total_enemies()
    );
    for (i, wave) in config.waves.iter().enumerate() {
        println!(
            "  wave {i}: delay {:.1}s (±{:.1})",
            wave.start_delay, wave.start_delay_jitter
        );
        for batch in &wave.enemies {
            let placement = match batch.mode {
                SpawnMode::Offscreen => format!("offscreen {:?}", batch.side),
                SpawnMode::FixedWorld => format!("fixed at {}", batch.fixed_world_position),
            };
            println!(
                "    {} x {:?} every {:.2}s, {placement}",
                batch.count, batch.archetype, batch.spawn_interval
            );
        }
    }
    if let Some(secs) = config.auto_end_after_secs {
        println!("  auto end after {secs:.0}s");
    }
    println!("OK");
}

// --- Dump command ---

fn cmd_dump(args: &[String]) {
    let Some(name) = args.first() else {
        eprintln!("Error: dump needs a scenario name (patrol, armor, siege)");
        process::exit(1);
    };
    let id = match name.parse::<ScenarioId>() {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let json = match build_scenario(id).to_json_pretty() {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    match flag_value(args, "--output") {
        Some(path) => {
            if let Err(e) = std::fs::write(path, json + "\n") {
                eprintln!("Error writing {path}: {e}");
                process::exit(1);
            }
            eprintln!("Wrote {id} to {path}");
        }
        None => println!("{json}"),
    }
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let Some(source) = args.first() else {
        eprintln!("Error: run needs a scenario file or name");
        process::exit(1);
    };
    let seconds: f32 = parse_flag(args, "--seconds", 120.0);
    let seed: u64 = parse_flag(args, "--seed", 42);

    let scenario = load_scenario(source);
    let mut engine = SimulationEngine::new(SimConfig {
        seed,
        scenario,
        ..Default::default()
    });
    engine.set_player_position(Vec3::ZERO);
    engine.start_level();

    let ticks = (seconds.max(0.0) * TICK_RATE as f32) as u64;
    let mut last = engine.tick();
    let mut player_hits = 0;
    for _ in 1..ticks {
        last = engine.tick();
        player_hits = last.stats.player_hits;
        if last.level != LevelPhase::Running {
            break;
        }
    }

    eprintln!(
        "{} after {:.1}s: level {:?}, wave {:?}/{} ({:?}), {} enemies on field, {player_hits} player hits",
        engine.scenario().name,
        last.time.elapsed_secs,
        last.level,
        last.waves.current_wave,
        last.waves.total_waves,
        last.waves.phase,
        last.enemies.len(),
    );
    match serde_json::to_string_pretty(&last.stats) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
