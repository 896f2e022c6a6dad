use arena_orchestrator::{PlayerRegistry, RoundEvent, Session};
use arena_shared::MatchConfig;
use bevy::camera::visibility::RenderLayers;
use bevy::camera::ClearColorConfig;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::{color_from_hex, Colors, ARENA_HALF_EXTENT, FIXED_DT, PPM};

use super::cameras::{spawn_merge_camera, spawn_player_camera, spawn_spectator_camera};
use super::proxies::{CameraProxy, HudMessage, MatchSession, TankProxy};
use super::tanks::spawn_tank;

#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub(crate) enum UpdateSet {
    Input,
    Cameras,
    Visuals,
}

/// One fixed step: tanks move, the session sees the result, the session's
/// decisions are written back.
#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub(crate) enum FixedSet {
    Simulate,
    Sync,
    Tick,
    Apply,
}

#[derive(States, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ArenaState {
    /// Choosing how many players start
    #[default]
    Lobby,
    Match,
}

/// Settings loaded at launch
#[derive(Resource, Debug, Clone)]
pub struct ArenaSettings {
    pub config: MatchConfig,
    pub base_players: u32,
}

/// Pre-match player-count selector
#[derive(Resource)]
pub(crate) struct RosterSelector(pub(crate) PlayerRegistry<TankProxy, CameraProxy>);

/// Despawned when a match ends
#[derive(Component)]
pub(crate) struct MatchEntity;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<ArenaState>()
            .insert_resource(ClearColor(color_from_hex(Colors::BACKGROUND)))
            .insert_resource(Time::<Fixed>::from_seconds(FIXED_DT))
            .configure_sets(
                Update,
                (UpdateSet::Input, UpdateSet::Cameras, UpdateSet::Visuals).chain(),
            )
            .configure_sets(
                FixedUpdate,
                (
                    FixedSet::Simulate,
                    FixedSet::Sync,
                    FixedSet::Tick,
                    FixedSet::Apply,
                )
                    .chain()
                    .run_if(in_state(ArenaState::Match).and(resource_exists::<MatchSession>)),
            )
            .add_systems(Startup, (init_roster_selector, setup_static_cameras, spawn_arena))
            .add_systems(OnEnter(ArenaState::Match), start_match)
            .add_systems(OnExit(ArenaState::Match), end_match)
            .add_systems(FixedUpdate, tick_session.in_set(FixedSet::Tick));
    }
}

fn init_roster_selector(mut commands: Commands, settings: Res<ArenaSettings>) {
    let mut registry = PlayerRegistry::from_config(&settings.config);
    registry.set_base_roster_size(settings.base_players);
    commands.insert_resource(RosterSelector(registry));
}

/// Background clear behind partial viewports, and the camera the HUD renders on.
fn setup_static_cameras(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Camera {
            order: -1,
            ..default()
        },
        RenderLayers::none(),
    ));

    commands.spawn((
        Camera2d,
        Camera {
            order: 10,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        RenderLayers::none(),
        bevy::ui::IsDefaultUiCamera,
    ));
}

fn spawn_arena(mut commands: Commands) {
    let size = ARENA_HALF_EXTENT * 2.0 * PPM;
    commands.spawn((
        Sprite::from_color(color_from_hex(Colors::ARENA_FLOOR), Vec2::splat(size)),
        Transform::from_xyz(0.0, 0.0, -1.0),
    ));
}

fn start_match(
    mut commands: Commands,
    settings: Res<ArenaSettings>,
    selector: Res<RosterSelector>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    mut next_state: ResMut<NextState<ArenaState>>,
) {
    let base_players = selector.0.base_roster_size();
    let session = Session::new(settings.config, base_players, HudMessage::default(), |number| {
        let tank = spawn_tank(&mut commands, number);
        let camera = spawn_player_camera(&mut commands, number);
        (tank, Some(camera))
    });

    let mut session = match session {
        Ok(session) => session,
        Err(e) => {
            error!("Cannot start match: {}", e);
            next_state.set(ArenaState::Lobby);
            return;
        }
    };

    session.attach_spectator(spawn_spectator_camera(&mut commands));
    session.attach_merge_camera(spawn_merge_camera(&mut commands));
    if let Ok(window) = q_window.single() {
        session.set_screen_size(window.width() as f64, window.height() as f64);
    }

    let first = session.start();
    info!("Match started with {} players: {:?}", base_players, first);
    commands.insert_resource(MatchSession(session));
}

fn end_match(mut commands: Commands, q_entities: Query<Entity, With<MatchEntity>>) {
    for entity in &q_entities {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<MatchSession>();
    info!("Back to lobby");
}

fn tick_session(time: Res<Time>, mut session: ResMut<MatchSession>) {
    let Some(event) = session.0.tick(time.delta_secs_f64()) else {
        return;
    };
    match event {
        RoundEvent::RoundStarted { round } => info!("Round {} starting", round),
        RoundEvent::RoundPlaying { round } => debug!("Round {} playing", round),
        RoundEvent::RoundEnded { round, winner, .. } => match winner {
            Some(number) => info!("Round {} won by player {}", round, number),
            None => info!("Round {} drawn", round),
        },
        RoundEvent::GameOver { winner } => info!("Player {} wins the game", winner),
    }
}
