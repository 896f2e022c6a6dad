//! Soak test for the match core.
//!
//! Plays many complete bot games, each on its own seed, and checks the
//! camera layout after every tick:
//! - Active cameras match the alive-count table
//! - The spectator only ever covers the absent player's quadrant
//! - The game winner never changes once set
//!
//! Usage: cargo run --bin soak -- [OPTIONS]
//!
//! Options:
//!   --games N        Games to play (default: 200)
//!   --players N      Players per game (default: 4)
//!   --seed S         Seed of the first game (default: 1)
//!   --max-ticks T    Tick limit per game (default: 500000)
//!   --rounds R       Rounds to win (default: 3)

use arena_orchestrator::config::HostConfig;
use arena_orchestrator::game_loop::HostMatch;
use arena_orchestrator::logging::init_logging;
use arena_orchestrator::snapshot::SessionSnapshot;
use arena_shared::ViewportRect;
use std::time::Instant;

#[derive(Debug, Default)]
struct GameReport {
    seed: u64,
    ticks: u64,
    rounds: u32,
    winner: Option<u32>,
    violations: Vec<String>,
}

fn layout_violation(snapshot: &SessionSnapshot) -> Option<String> {
    let alive = snapshot.alive_count();
    let cameras = snapshot.active_camera_count();
    let expected = match alive {
        0 | 1 => 0,
        2 if !snapshot.split_mode => 0,
        2 => 2,
        _ => 4,
    };
    if cameras != expected {
        return Some(format!(
            "round {}: {} alive but {} active cameras",
            snapshot.round_number, alive, cameras
        ));
    }

    if let Some(rect) = snapshot.spectator {
        let missing = (1..=4).find(|n| !snapshot.players.iter().any(|p| p.number == *n && p.alive));
        if missing.map(ViewportRect::quadrant) != Some(rect) {
            return Some(format!("round {}: spectator on wrong quadrant", snapshot.round_number));
        }
    }

    if !snapshot.split_mode && !snapshot.merge_camera_active {
        return Some(format!("round {}: merged without merge camera", snapshot.round_number));
    }
    None
}

fn play_game(config: &HostConfig, seed: u64, max_ticks: u64) -> GameReport {
    let mut report = GameReport {
        seed,
        ..Default::default()
    };
    let (mut host, _) = match HostMatch::new(config, seed) {
        Ok(host) => host,
        Err(e) => {
            report.violations.push(e.to_string());
            return report;
        }
    };

    let dt = config.tick_dt();
    while report.ticks < max_ticks && !host.session().is_over() {
        host.step(dt);
        report.ticks += 1;

        let snapshot = host.session().snapshot();
        if let Some(violation) = layout_violation(&snapshot) {
            report.violations.push(violation);
        }
        if report.winner.is_some() && snapshot.game_winner != report.winner {
            report.violations.push("game winner changed".to_string());
        }
        report.winner = snapshot.game_winner;
        report.rounds = snapshot.round_number;
    }
    report
}

#[tokio::main]
async fn main() {
    init_logging("warn");

    let args: Vec<String> = std::env::args().collect();

    let mut games: u64 = 200;
    let mut players: u32 = 4;
    let mut first_seed: u64 = 1;
    let mut max_ticks: u64 = 500_000;
    let mut rounds_to_win: u32 = 3;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                games = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(200);
            }
            "--players" => {
                i += 1;
                players = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(4);
            }
            "--seed" => {
                i += 1;
                first_seed = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(1);
            }
            "--max-ticks" => {
                i += 1;
                max_ticks = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(500_000);
            }
            "--rounds" => {
                i += 1;
                rounds_to_win = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(3);
            }
            _ => {}
        }
        i += 1;
    }

    let mut config = HostConfig {
        base_players: players,
        ..Default::default()
    };
    config.match_config.rounds_to_win = rounds_to_win;
    config.match_config.start_delay = 0.5;
    config.match_config.end_delay = 0.5;
    if let Err(e) = config.validate() {
        eprintln!("Invalid soak configuration: {}", e);
        std::process::exit(1);
    }

    println!("=== Arena Soak Test ===");
    println!("Games: {}", games);
    println!("Players: {}", players);
    println!("Seeds: {}..{}", first_seed, first_seed + games);
    println!("Rounds to win: {}", rounds_to_win);
    println!();

    let start = Instant::now();
    let mut handles = Vec::with_capacity(games as usize);
    for seed in first_seed..first_seed + games {
        let config = config.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            play_game(&config, seed, max_ticks)
        }));
    }

    let mut finished = 0u64;
    let mut total_ticks = 0u64;
    let mut total_rounds = 0u64;
    let mut wins = [0u64; 5];
    let mut failures = Vec::new();

    for handle in handles {
        let report = match handle.await {
            Ok(report) => report,
            Err(e) => {
                eprintln!("Game task failed: {}", e);
                continue;
            }
        };
        total_ticks += report.ticks;
        total_rounds += report.rounds as u64;
        if let Some(winner) = report.winner {
            finished += 1;
            if let Some(slot) = wins.get_mut(winner as usize) {
                *slot += 1;
            }
        }
        if !report.violations.is_empty() {
            failures.push(report);
        }
    }

    println!("=== Final Results ===");
    println!("Elapsed: {:?}", start.elapsed());
    println!("Games finished: {}/{}", finished, games);
    println!("Total ticks: {}", total_ticks);
    println!(
        "Average rounds per game: {:.1}",
        total_rounds as f64 / games.max(1) as f64
    );
    for (number, count) in wins.iter().enumerate().skip(1) {
        println!("PLAYER {} won {} game(s)", number, count);
    }

    if failures.is_empty() {
        println!("No invariant violations");
    } else {
        println!();
        for report in &failures {
            println!(
                "seed {}: {} violation(s), first: {}",
                report.seed,
                report.violations.len(),
                report.violations[0]
            );
        }
        std::process::exit(1);
    }
}
