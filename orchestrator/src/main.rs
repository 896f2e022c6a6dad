use arena_orchestrator::config::HostConfig;
use arena_orchestrator::game_loop::{run_session_loop, SessionBroadcast, SessionCommand};
use arena_orchestrator::logging::init_logging;
use arena_orchestrator::round::RoundEvent;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc, oneshot};

/// Set to `1` to print snapshots and round events as JSON lines on stdout
const JSON_ENV: &str = "ARENA_JSON";

#[tokio::main]
async fn main() {
    init_logging("info");

    // Validate configuration before starting
    let config = match HostConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid host configuration: {}", e);
            std::process::exit(1);
        }
    };
    let json = std::env::var(JSON_ENV).is_ok_and(|v| v == "1");

    let (cmd_tx, cmd_rx) = mpsc::channel::<SessionCommand>(32);
    let (broadcast_tx, broadcast_rx) = broadcast::channel::<SessionBroadcast>(256);

    tracing::info!(
        players = config.base_players,
        tick_rate_hz = config.tick_rate_hz,
        seed = config.rng_seed,
        "Starting headless arena"
    );

    let loop_handle = tokio::spawn(run_session_loop(cmd_rx, broadcast_tx, config));
    let printer = tokio::spawn(print_broadcasts(broadcast_rx, json));

    // stdin: `join N` adds player N, `quit` stops
    let stdin_tx = cmd_tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let mut words = line.split_whitespace();
            match (words.next(), words.next().map(str::parse::<u32>)) {
                (Some("join"), Some(Ok(number))) => {
                    let (response, joined) = oneshot::channel();
                    if stdin_tx.send(SessionCommand::Join { number, response }).await.is_err() {
                        break;
                    }
                    match joined.await {
                        Ok(true) => eprintln!("Player {} joined", number),
                        Ok(false) => eprintln!("Player {} cannot join", number),
                        Err(_) => break,
                    }
                }
                (Some("quit"), _) => {
                    let _ = stdin_tx.send(SessionCommand::Shutdown).await;
                    break;
                }
                (None, _) => {}
                _ => eprintln!("Commands: join <1-4>, quit"),
            }
        }
    });

    let ctrl_c_tx = cmd_tx;
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = ctrl_c_tx.send(SessionCommand::Shutdown).await;
        }
    });

    let summary = match loop_handle.await {
        Ok(Ok(summary)) => summary,
        Ok(Err(e)) => {
            eprintln!("Invalid host configuration: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Session loop failed: {}", e);
            std::process::exit(1);
        }
    };
    let _ = printer.await;

    println!(
        "Finished: {} game(s), {} round(s), {} ticks, winners {:?}",
        summary.games_finished, summary.rounds_played, summary.ticks, summary.winners
    );
}

async fn print_broadcasts(mut rx: broadcast::Receiver<SessionBroadcast>, json: bool) {
    loop {
        match rx.recv().await {
            Ok(SessionBroadcast::Snapshot(snapshot)) => {
                if json {
                    match serde_json::to_string(&snapshot) {
                        Ok(line) => println!("{}", line),
                        Err(e) => tracing::warn!("Failed to serialize snapshot: {}", e),
                    }
                }
            }
            Ok(SessionBroadcast::Round(event)) => {
                if json {
                    match serde_json::to_string(&event) {
                        Ok(line) => println!("{}", line),
                        Err(e) => tracing::warn!("Failed to serialize round event: {}", e),
                    }
                } else {
                    print_event(&event);
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!("Output lagged, skipped {} messages", n);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn print_event(event: &RoundEvent) {
    match event {
        RoundEvent::RoundStarted { round } => println!("ROUND {}", round),
        RoundEvent::RoundPlaying { .. } => {}
        RoundEvent::RoundEnded { message, .. } => println!("{}", message.trim_end()),
        RoundEvent::GameOver { winner } => println!("GAME OVER: PLAYER {}", winner),
    }
}
