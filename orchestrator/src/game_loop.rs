use crate::bot::{BotDirector, BotTank, RecordingCamera};
use crate::config::HostConfig;
use crate::error::ConfigError;
use crate::round::RoundEvent;
use crate::session::Session;
use crate::snapshot::SessionSnapshot;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};

pub type HeadlessSession = Session<BotTank, RecordingCamera, String>;

/// Commands from the host front-end to the session loop
pub enum SessionCommand {
    Join {
        number: u32,
        response: oneshot::Sender<bool>,
    },
    Shutdown,
}

/// Broadcasts from the session loop to observers
#[derive(Debug, Clone)]
pub enum SessionBroadcast {
    Snapshot(SessionSnapshot),
    Round(RoundEvent),
}

/// What a loop run produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopSummary {
    pub ticks: u64,
    pub games_finished: u32,
    pub rounds_played: u32,
    /// Game winner of each finished game, in order
    pub winners: Vec<u32>,
}

/// A session plus the bots that play it
pub struct HostMatch {
    session: HeadlessSession,
    director: BotDirector,
}

impl HostMatch {
    /// Build the session, wire spectator and merge cameras and enter round 1.
    pub fn new(config: &HostConfig, seed: u64) -> Result<(Self, RoundEvent), ConfigError> {
        config.validate()?;
        let mut director = BotDirector::new(config.bots, seed);
        let mut session = Session::new(config.match_config, config.base_players, String::new(), |n| {
            director.spawn(n)
        })?;
        session.attach_spectator(RecordingCamera::default());
        session.attach_merge_camera(RecordingCamera::default());
        session.set_screen_size(config.screen_width, config.screen_height);
        let first = session.start();
        Ok((Self { session, director }, first))
    }

    /// Bots act first, then the session reacts to the result.
    pub fn step(&mut self, dt: f64) -> Option<RoundEvent> {
        self.director.tick(dt, self.session.registry_mut());
        self.session.tick(dt)
    }

    pub fn join(&mut self, number: u32) -> bool {
        let director = &mut self.director;
        self.session.on_player_join_requested(number, |n| director.spawn(n))
    }

    pub fn session(&self) -> &HeadlessSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut HeadlessSession {
        &mut self.session
    }
}

/// Run the session loop. Owns the session; stops on `Shutdown`, or after the
/// first finished game unless `restart_after_game_over` is set.
pub async fn run_session_loop(
    mut cmd_rx: mpsc::Receiver<SessionCommand>,
    broadcast_tx: broadcast::Sender<SessionBroadcast>,
    config: HostConfig,
) -> Result<LoopSummary, ConfigError> {
    let mut seed = config.rng_seed;
    let (mut host, first) = HostMatch::new(&config, seed)?;
    let _ = broadcast_tx.send(SessionBroadcast::Round(first));

    let dt = config.tick_dt();
    let snapshot_every = config.snapshot_every();
    let mut summary = LoopSummary::default();

    let mut tick_interval = tokio::time::interval(Duration::from_secs_f64(dt));
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                summary.ticks += 1;
                let event = host.step(dt);

                // Snapshot at lower rate
                if summary.ticks % snapshot_every == 0 {
                    let _ = broadcast_tx.send(SessionBroadcast::Snapshot(host.session().snapshot()));
                }

                let Some(event) = event else { continue };
                if let RoundEvent::RoundEnded { .. } = event {
                    summary.rounds_played += 1;
                }
                let game_over = match event {
                    RoundEvent::GameOver { winner } => Some(winner),
                    _ => None,
                };
                let _ = broadcast_tx.send(SessionBroadcast::Round(event));

                if let Some(winner) = game_over {
                    summary.games_finished += 1;
                    summary.winners.push(winner);
                    let _ = broadcast_tx.send(SessionBroadcast::Snapshot(host.session().snapshot()));
                    if !config.restart_after_game_over {
                        break;
                    }
                    seed = seed.wrapping_add(1);
                    let (next, first) = HostMatch::new(&config, seed)?;
                    host = next;
                    tracing::info!(seed, "Session restarted");
                    let _ = broadcast_tx.send(SessionBroadcast::Round(first));
                }
            }

            Some(cmd) = cmd_rx.recv() => {
                match cmd {
                    SessionCommand::Join { number, response } => {
                        let joined = host.join(number);
                        let _ = response.send(joined);
                        if joined {
                            let _ = broadcast_tx.send(SessionBroadcast::Snapshot(host.session().snapshot()));
                        }
                    }
                    SessionCommand::Shutdown => {
                        tracing::info!("Shutdown requested");
                        break;
                    }
                }
            }

            else => break,
        }
    }

    tracing::info!(
        ticks = summary.ticks,
        games = summary.games_finished,
        rounds = summary.rounds_played,
        "Session loop ended"
    );
    Ok(summary)
}
