//! Integration tests for the arena orchestrator.
//!
//! These drive the public API: the session loop over its channels with a
//! paused tokio clock, and a session wired to hand-written collaborators.

use arena_orchestrator::config::HostConfig;
use arena_orchestrator::game_loop::{run_session_loop, LoopSummary, SessionBroadcast, SessionCommand};
use arena_orchestrator::{
    Combatant, MessageDisplay, Phase, RoundEvent, Session, ViewportCamera, DEFAULT_CULLING_MASK,
    EMPTY_CULLING_MASK,
};
use arena_shared::vec3::vec3;
use arena_shared::{MatchConfig, Vec3, ViewportRect};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

fn fast_config() -> HostConfig {
    let mut config = HostConfig {
        base_players: 2,
        rng_seed: 12345,
        ..Default::default()
    };
    config.match_config.rounds_to_win = 1;
    config.match_config.start_delay = 0.2;
    config.match_config.end_delay = 0.2;
    config
}

struct Harness {
    cmd_tx: mpsc::Sender<SessionCommand>,
    broadcast_rx: broadcast::Receiver<SessionBroadcast>,
    handle: JoinHandle<Result<LoopSummary, arena_orchestrator::ConfigError>>,
}

fn start_loop(config: HostConfig) -> Harness {
    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    let (broadcast_tx, broadcast_rx) = broadcast::channel(1024);
    let handle = tokio::spawn(run_session_loop(cmd_rx, broadcast_tx, config));
    Harness {
        cmd_tx,
        broadcast_rx,
        handle,
    }
}

async fn join(cmd_tx: &mpsc::Sender<SessionCommand>, number: u32) -> bool {
    let (response, joined) = oneshot::channel();
    cmd_tx
        .send(SessionCommand::Join { number, response })
        .await
        .expect("loop is running");
    joined.await.expect("loop answers joins")
}

/// Next round event, skipping snapshots and tolerating lag.
async fn next_round_event(rx: &mut broadcast::Receiver<SessionBroadcast>) -> Option<RoundEvent> {
    loop {
        match rx.recv().await {
            Ok(SessionBroadcast::Round(event)) => return Some(event),
            Ok(SessionBroadcast::Snapshot(_)) => continue,
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_join_and_shutdown_over_channels() {
    let mut harness = start_loop(HostConfig {
        base_players: 2,
        ..Default::default()
    });

    assert!(join(&harness.cmd_tx, 3).await);
    assert!(!join(&harness.cmd_tx, 3).await, "duplicate join must be refused");
    assert!(!join(&harness.cmd_tx, 7).await, "out of range join must be refused");

    // The loop publishes a snapshot after the successful join
    let snapshot = loop {
        match harness.broadcast_rx.recv().await {
            Ok(SessionBroadcast::Snapshot(snapshot)) => break snapshot,
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => panic!("loop ended early"),
        }
    };
    assert_eq!(snapshot.players.len(), 3);

    harness.cmd_tx.send(SessionCommand::Shutdown).await.unwrap();
    let summary = harness.handle.await.unwrap().unwrap();
    assert_eq!(summary.games_finished, 0);
}

#[tokio::test(start_paused = true)]
async fn test_game_runs_to_completion() {
    let mut harness = start_loop(fast_config());

    assert_eq!(
        next_round_event(&mut harness.broadcast_rx).await,
        Some(RoundEvent::RoundStarted { round: 1 })
    );

    let mut winner = None;
    while let Some(event) = next_round_event(&mut harness.broadcast_rx).await {
        if let RoundEvent::GameOver { winner: w } = event {
            winner = Some(w);
        }
    }

    let summary = tokio::time::timeout(Duration::from_secs(5), harness.handle)
        .await
        .expect("loop stops after the game")
        .unwrap()
        .unwrap();
    assert_eq!(summary.games_finished, 1);
    assert_eq!(summary.winners, vec![winner.expect("game over was broadcast")]);
    assert!(summary.rounds_played >= 1);
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_game_over() {
    let config = HostConfig {
        restart_after_game_over: true,
        ..fast_config()
    };
    let mut harness = start_loop(config);

    let mut games = 0;
    let mut restarted = false;
    while games < 2 {
        match next_round_event(&mut harness.broadcast_rx).await {
            Some(RoundEvent::GameOver { .. }) => games += 1,
            Some(RoundEvent::RoundStarted { round: 1 }) if games == 1 => restarted = true,
            Some(_) => {}
            None => panic!("loop ended while restarting"),
        }
    }
    assert!(restarted);

    harness.cmd_tx.send(SessionCommand::Shutdown).await.unwrap();
    let summary = harness.handle.await.unwrap().unwrap();
    assert_eq!(summary.games_finished, 2);
}

#[tokio::test]
async fn test_invalid_config_is_reported() {
    let config = HostConfig {
        snapshot_rate_hz: 0,
        ..Default::default()
    };
    let harness = start_loop(config);
    assert!(harness.handle.await.unwrap().is_err());
}

// === Session wired to custom collaborators ===

#[derive(Debug)]
struct Tank {
    alive: bool,
    position: Vec3,
    controls: bool,
}

impl Combatant for Tank {
    fn reset(&mut self) {
        self.alive = true;
    }

    fn set_control_enabled(&mut self, enabled: bool) {
        self.controls = enabled;
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}

#[derive(Debug, Default)]
struct Camera {
    active: bool,
    rect: Option<ViewportRect>,
    mask: Option<u32>,
}

impl ViewportCamera for Camera {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn set_viewport_rect(&mut self, rect: ViewportRect) {
        self.rect = Some(rect);
    }

    fn set_culling_mask(&mut self, mask: u32) {
        self.mask = Some(mask);
    }
}

#[derive(Default)]
struct Banner(Vec<String>);

impl MessageDisplay for Banner {
    fn set_message(&mut self, text: &str) {
        self.0.push(text.to_string());
    }
}

fn tank_at(number: u32) -> (Tank, Option<Camera>) {
    let x = if number % 2 == 0 { 30.0 } else { -30.0 };
    let z = if number > 2 { -30.0 } else { 30.0 };
    let tank = Tank {
        alive: true,
        position: vec3(x, 0.0, z),
        controls: false,
    };
    (tank, Some(Camera::default()))
}

fn session(base: u32) -> Session<Tank, Camera, Banner> {
    let config = MatchConfig {
        rounds_to_win: 2,
        start_delay: 0.0,
        end_delay: 0.0,
        ..Default::default()
    };
    let mut session = Session::new(config, base, Banner::default(), tank_at).unwrap();
    session.attach_spectator(Camera::default());
    session.attach_merge_camera(Camera::default());
    session.start();
    session
}

fn active_player_cameras(session: &Session<Tank, Camera, Banner>) -> usize {
    session
        .registry()
        .list_players()
        .filter(|p| p.camera.handle().is_some_and(|c| c.active))
        .count()
}

#[test]
fn test_messages_across_a_full_game() {
    let mut session = session(2);
    session.tick(0.02);
    session.registry_mut().get_player_mut(1).unwrap().entity.alive = false;
    session.tick(0.02);
    session.tick(0.02);
    session.tick(0.02);
    session.registry_mut().get_player_mut(1).unwrap().entity.alive = false;
    session.tick(0.02);
    session.tick(0.02);

    let banner = &session.display().0;
    assert_eq!(
        banner,
        &vec![
            "ROUND 1".to_string(),
            String::new(),
            "PLAYER 2 WINS THE ROUND!\n\n\n\nPLAYER 1: 0 WINS\nPLAYER 2: 1 WINS\n".to_string(),
            "ROUND 2".to_string(),
            String::new(),
            "PLAYER 2 WINS THE GAME!".to_string(),
        ]
    );
    assert_eq!(session.phase(), Phase::GameOver);
}

#[test]
fn test_layout_follows_eliminations() {
    let mut session = session(4);
    session.tick(0.02);
    assert_eq!(active_player_cameras(&session), 4);

    session.registry_mut().get_player_mut(3).unwrap().entity.alive = false;
    session.tick(0.02);
    assert_eq!(active_player_cameras(&session), 3);
    let spectator = session.layout().spectator().handle().unwrap();
    assert!(spectator.active);
    assert_eq!(spectator.rect, Some(ViewportRect::quadrant(3)));

    session.registry_mut().get_player_mut(1).unwrap().entity.alive = false;
    session.tick(0.02);
    assert_eq!(active_player_cameras(&session), 2);
    assert!(!session.layout().spectator().handle().unwrap().active);
    assert!(session.layout().in_split_mode());

    // Drive the two survivors together: the screen merges
    for number in [2, 4] {
        session.registry_mut().get_player_mut(number).unwrap().entity.position = vec3(1.0, 0.0, 0.0);
    }
    session.tick(0.02);
    assert_eq!(active_player_cameras(&session), 0);
    let merge = session.layout().merge_camera().unwrap();
    assert!(merge.active);
    assert_eq!(merge.mask, Some(DEFAULT_CULLING_MASK));

    // Apart again: merge camera is blanked, then switched off a tick later
    session.registry_mut().get_player_mut(4).unwrap().entity.position = vec3(40.0, 0.0, 0.0);
    session.tick(0.02);
    assert_eq!(active_player_cameras(&session), 2);
    let merge = session.layout().merge_camera().unwrap();
    assert!(merge.active);
    assert_eq!(merge.mask, Some(EMPTY_CULLING_MASK));
    session.tick(0.02);
    assert!(!session.layout().merge_camera().unwrap().active);
}

#[test]
fn test_joined_player_controls_follow_phase() {
    let mut session = session(2);
    assert!(session.on_player_join_requested(3, tank_at));
    assert!(!session.registry().get_player(3).unwrap().entity.controls);

    session.tick(0.02);
    assert!(session.controls_enabled());
    assert!(session.on_player_join_requested(4, tank_at));
    assert!(session.registry().get_player(4).unwrap().entity.controls);
}
