//! One local match: the roster, the round state machine, the camera layout
//! and the message display, advanced together by `tick`.

use crate::camera::CameraLayoutEngine;
use crate::collaborators::{Combatant, MessageDisplay, ViewportCamera};
use crate::error::{ConfigError, RegistryError};
use crate::registry::PlayerRegistry;
use crate::round::{Phase, RoundController, RoundEvent, RoundState};
use crate::snapshot::{PlayerSnapshot, SessionSnapshot};
use arena_shared::MatchConfig;

pub struct Session<E, C, D> {
    config: MatchConfig,
    registry: PlayerRegistry<E, C>,
    layout: CameraLayoutEngine<C>,
    rounds: RoundController,
    display: D,
}

impl<E, C, D> Session<E, C, D>
where
    E: Combatant,
    C: ViewportCamera,
    D: MessageDisplay,
{
    /// Validate `config` and build players `1..=base_players` (clamped to the
    /// player bounds). `spawn` creates each player's entity and, when the
    /// engine already has one, its camera.
    ///
    /// Nothing runs until [`Session::start`].
    pub fn new<F>(config: MatchConfig, base_players: u32, display: D, mut spawn: F) -> Result<Self, ConfigError>
    where
        F: FnMut(u32) -> (E, Option<C>),
    {
        config.validate()?;

        let mut registry = PlayerRegistry::from_config(&config);
        let base = registry.set_base_roster_size(base_players);
        for number in 1..=base {
            let (entity, camera) = spawn(number);
            if let Ok(player) = registry.add_player(number, entity) {
                if let Some(camera) = camera {
                    player.camera.attach(camera);
                }
            }
        }
        tracing::info!(players = base, rounds_to_win = config.rounds_to_win, "Session created");

        Ok(Self {
            layout: CameraLayoutEngine::new(config.camera),
            rounds: RoundController::new(&config),
            config,
            registry,
            display,
        })
    }

    /// Enter round 1 and lay out the cameras for it.
    pub fn start(&mut self) -> RoundEvent {
        let event = self.rounds.begin(&mut self.registry, &mut self.display);
        self.layout.update(&mut self.registry);
        event
    }

    /// Advance the round state machine, then recompute the camera layout.
    pub fn tick(&mut self, dt: f64) -> Option<RoundEvent> {
        let event = self.rounds.tick(dt, &mut self.registry, &mut self.display);
        self.layout.update(&mut self.registry);
        event
    }

    /// Add player `number` mid-session. The number is checked before `spawn`
    /// runs; refused joins are logged and ignored. The new player gets the
    /// control state of the current phase and is laid out on the next tick.
    pub fn on_player_join_requested<F>(&mut self, number: u32, spawn: F) -> bool
    where
        F: FnOnce(u32) -> (E, Option<C>),
    {
        if let Err(err) = self.registry.check_join(number) {
            tracing::debug!(number, %err, "Join ignored");
            return false;
        }

        let (entity, camera) = spawn(number);
        let controls = self.rounds.controls_enabled();
        match self.registry.add_player(number, entity) {
            Ok(player) => {
                player.entity.set_control_enabled(controls);
                if let Some(camera) = camera {
                    player.camera.attach(camera);
                }
                tracing::info!(number, phase = ?self.rounds.phase(), "Player joined");
                true
            }
            Err(err) => {
                tracing::debug!(number, %err, "Join ignored");
                false
            }
        }
    }

    pub fn attach_camera(&mut self, number: u32, camera: C) -> Result<(), RegistryError> {
        self.registry.attach_camera(number, camera)
    }

    pub fn attach_spectator(&mut self, camera: C) {
        self.layout.attach_spectator(camera);
    }

    pub fn attach_merge_camera(&mut self, camera: C) {
        self.layout.attach_merge_camera(camera);
    }

    pub fn set_screen_size(&mut self, width: f64, height: f64) {
        self.layout.set_screen_size(width, height);
        self.registry.request_recompute();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.rounds.state();
        let spectator = self.layout.spectator();
        SessionSnapshot {
            phase: state.phase,
            round_number: state.round_number,
            round_winner: state.round_winner,
            game_winner: state.game_winner,
            message: state.message.clone(),
            split_mode: self.layout.in_split_mode(),
            merge_camera_active: self.layout.merge_camera_active(),
            spectator: spectator.is_active().then(|| spectator.rect()),
            players: self
                .registry
                .list_players()
                .map(PlayerSnapshot::from_player)
                .collect(),
        }
    }
}

impl<E, C, D> Session<E, C, D> {
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn registry(&self) -> &PlayerRegistry<E, C> {
        &self.registry
    }

    /// Engine-side access to entities and camera handles. Joins must go
    /// through [`Session::on_player_join_requested`].
    pub fn registry_mut(&mut self) -> &mut PlayerRegistry<E, C> {
        &mut self.registry
    }

    pub fn layout(&self) -> &CameraLayoutEngine<C> {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut CameraLayoutEngine<C> {
        &mut self.layout
    }

    pub fn round_state(&self) -> &RoundState {
        self.rounds.state()
    }

    pub fn phase(&self) -> Phase {
        self.rounds.phase()
    }

    pub fn controls_enabled(&self) -> bool {
        self.rounds.controls_enabled()
    }

    pub fn is_over(&self) -> bool {
        self.rounds.is_game_over()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}
