use bevy::prelude::*;

use super::cameras::spawn_player_camera;
use super::core::{ArenaState, RosterSelector, UpdateSet};
use super::proxies::MatchSession;
use super::tanks::spawn_tank;

pub struct InputPlugin;

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct PlayerControls {
    /// -1 reverse .. 1 forward
    pub(crate) throttle: f32,
    /// -1 left .. 1 right
    pub(crate) turn: f32,
    pub(crate) fire: bool,
}

#[derive(Resource, Default)]
pub(crate) struct TankInput {
    players: [PlayerControls; 4],
}

impl TankInput {
    pub(crate) fn for_player(&self, number: u32) -> Option<&PlayerControls> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.players.get(index)
    }
}

struct KeyBindings {
    forward: KeyCode,
    back: KeyCode,
    left: KeyCode,
    right: KeyCode,
    fire: KeyCode,
}

const BINDINGS: [KeyBindings; 4] = [
    KeyBindings {
        forward: KeyCode::KeyW,
        back: KeyCode::KeyS,
        left: KeyCode::KeyA,
        right: KeyCode::KeyD,
        fire: KeyCode::Space,
    },
    KeyBindings {
        forward: KeyCode::ArrowUp,
        back: KeyCode::ArrowDown,
        left: KeyCode::ArrowLeft,
        right: KeyCode::ArrowRight,
        fire: KeyCode::Enter,
    },
    KeyBindings {
        forward: KeyCode::KeyI,
        back: KeyCode::KeyK,
        left: KeyCode::KeyJ,
        right: KeyCode::KeyL,
        fire: KeyCode::KeyU,
    },
    KeyBindings {
        forward: KeyCode::Numpad8,
        back: KeyCode::Numpad5,
        left: KeyCode::Numpad4,
        right: KeyCode::Numpad6,
        fire: KeyCode::Numpad0,
    },
];

/// F1..F4 request a join for players 1..4
const JOIN_KEYS: [KeyCode; 4] = [KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4];

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TankInput>()
            .add_systems(Update, lobby_input_system.run_if(in_state(ArenaState::Lobby)))
            .add_systems(
                Update,
                (tank_input_system, join_input_system, game_over_input_system)
                    .in_set(UpdateSet::Input)
                    .run_if(in_state(ArenaState::Match).and(resource_exists::<MatchSession>)),
            );
    }
}

fn axis(keys: &ButtonInput<KeyCode>, negative: KeyCode, positive: KeyCode) -> f32 {
    let mut value = 0.0;
    if keys.pressed(negative) {
        value -= 1.0;
    }
    if keys.pressed(positive) {
        value += 1.0;
    }
    value
}

fn tank_input_system(mut input: ResMut<TankInput>, keys: Res<ButtonInput<KeyCode>>) {
    for (controls, bindings) in input.players.iter_mut().zip(BINDINGS.iter()) {
        controls.throttle = axis(&keys, bindings.back, bindings.forward);
        controls.turn = axis(&keys, bindings.left, bindings.right);
        controls.fire = keys.pressed(bindings.fire);
    }
}

fn join_input_system(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<MatchSession>,
) {
    for (index, key) in JOIN_KEYS.iter().enumerate() {
        if !keys.just_pressed(*key) {
            continue;
        }
        let number = index as u32 + 1;
        let joined = session.0.on_player_join_requested(number, |number| {
            let tank = spawn_tank(&mut commands, number);
            let camera = spawn_player_camera(&mut commands, number);
            (tank, Some(camera))
        });
        if joined {
            info!("Player {} joined", number);
        }
    }
}

fn game_over_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    session: Res<MatchSession>,
    mut next_state: ResMut<NextState<ArenaState>>,
) {
    if session.0.is_over() && keys.just_pressed(KeyCode::Escape) {
        next_state.set(ArenaState::Lobby);
    }
}

fn lobby_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut selector: ResMut<RosterSelector>,
    mut next_state: ResMut<NextState<ArenaState>>,
) {
    if keys.just_pressed(KeyCode::ArrowRight) || keys.just_pressed(KeyCode::ArrowUp) {
        let size = selector.0.cycle_base_roster_size(true);
        debug!("Base roster size {}", size);
    }
    if keys.just_pressed(KeyCode::ArrowLeft) || keys.just_pressed(KeyCode::ArrowDown) {
        let size = selector.0.cycle_base_roster_size(false);
        debug!("Base roster size {}", size);
    }
    if keys.just_pressed(KeyCode::Enter) || keys.just_pressed(KeyCode::Space) {
        next_state.set(ArenaState::Match);
    }
}
