//! Ranch Runtime
//!
//! Runs a match headless: an autopilot fires at the hogs while combat
//! signals and frame statistics go to the log.
//!
//! Run with: cargo run --bin ranch -- --frames 3600 --level ranch_entrance

mod headless;

use headless::{Autopilot, LogAudio};
use ranch_game::{CombatSignal, Game, GameConfig, Services};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const USAGE: &str = "usage: ranch [--frames N] [--level ID] [--delta MS]";

#[derive(Debug, Clone, PartialEq)]
struct Args {
    frames: u64,
    level: String,
    delta_ms: f32,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            frames: 3600,
            level: "ranch_entrance".to_string(),
            delta_ms: 16.0,
        }
    }
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut parsed = Self::default();
        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("{} needs a value", flag));
            match flag.as_str() {
                "--frames" => parsed.frames = value()?.parse().map_err(|e| format!("--frames: {}", e))?,
                "--level" => parsed.level = value()?,
                "--delta" => parsed.delta_ms = value()?.parse().map_err(|e| format!("--delta: {}", e))?,
                other => return Err(format!("unknown argument {}", other)),
            }
        }
        Ok(parsed)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Received Ctrl+C, shutting down...");
        r.store(false, Ordering::SeqCst);
    }) {
        log::warn!("Failed to set Ctrl+C handler: {}", e);
    }

    let clock = Rc::new(Cell::new(0));
    let audio = LogAudio::default();
    let sounds = audio.counter();
    let services = Services::headless()
        .with_audio(audio)
        .with_input(Autopilot::new(clock.clone()));

    let mut game = match Game::new(GameConfig::load(), services) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = game.world_mut().load_level(&args.level, None) {
        log::error!("Failed to load {}: {}", args.level, e);
        std::process::exit(1);
    }
    let signals = game.world_mut().subscribe();

    log::info!("Running {} frames of {} ms on {}", args.frames, args.delta_ms, args.level);
    while running.load(Ordering::SeqCst) && clock.get() < args.frames {
        clock.set(clock.get() + 1);
        game.tick(args.delta_ms);

        if let Some(signals) = &signals {
            for signal in signals.try_iter() {
                report(&signal);
            }
        }
        if game.world().state().is_finished() {
            break;
        }
    }

    let world = game.world();
    log::info!(
        "Stopped after {} frames in state {:?}, {} sounds played",
        game.scheduler().time().frame,
        world.state(),
        sounds.get()
    );
    if let Some(combat) = world.combat() {
        let stats = combat.stats();
        log::info!(
            "Kills {}, shots {}, accuracy {:.1}%, dealt {:.0}, taken {:.0}",
            stats.enemies_killed,
            stats.shots_fired,
            stats.accuracy,
            stats.damage_dealt,
            stats.damage_taken
        );
    }
}

fn report(signal: &CombatSignal) {
    match signal {
        CombatSignal::PlayerDamaged { amount, remaining } => {
            log::info!("Player hit for {:.0}, {:.0} left", amount, remaining)
        }
        CombatSignal::PlayerDied { stats } => log::info!("Player died with {} kills", stats.enemies_killed),
        CombatSignal::EnemyKilled { enemy, total_kills } => log::info!("Hog {} down ({} total)", enemy, total_kills),
        CombatSignal::RewardGranted(reward) => log::info!("+{} {}", reward.amount, reward.weapon.name()),
    }
}
