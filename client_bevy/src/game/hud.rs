use bevy::prelude::*;

use crate::constants::{color_from_hex, Colors};

use super::core::{ArenaState, RosterSelector};
use super::proxies::MatchSession;

pub struct HudPlugin;

const MAX_PLAYER_ROWS: usize = 4;

const SCORE_TOP: f32 = 10.0;
const SCORE_LEFT: f32 = 12.0;
const SCORE_ROW_SPACING: f32 = 18.0;
const HINT_BOTTOM: f32 = 12.0;

#[derive(Component)]
struct HudMessageText;

#[derive(Component)]
struct HudScoreRow {
    index: usize,
}

#[derive(Component)]
struct HudHintText;

#[derive(Component)]
struct HudLobbyText;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(OnEnter(ArenaState::Lobby), clear_match_ui)
            .add_systems(Update, update_lobby_ui)
            .add_systems(
                Update,
                (update_message_ui, update_score_ui, update_hint_ui)
                    .run_if(in_state(ArenaState::Match).and(resource_exists::<MatchSession>)),
            );
    }
}

fn spawn_hud(mut commands: Commands) {
    let small = TextFont::from_font_size(14.0);

    // Full-screen row that centres the round message
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont::from_font_size(48.0),
                TextColor(color_from_hex(Colors::MESSAGE)),
                HudMessageText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont::from_font_size(28.0),
                TextColor(color_from_hex(Colors::MESSAGE)),
                HudLobbyText,
            ));
        });

    for index in 0..MAX_PLAYER_ROWS {
        commands.spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(SCORE_LEFT),
                top: Val::Px(SCORE_TOP + index as f32 * SCORE_ROW_SPACING),
                ..default()
            },
            Text::new(""),
            small.clone(),
            TextColor(color_from_hex(Colors::UI_DIM)),
            Visibility::Hidden,
            HudScoreRow { index },
        ));
    }

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(SCORE_LEFT),
            bottom: Val::Px(HINT_BOTTOM),
            ..default()
        },
        Text::new(""),
        small,
        TextColor(color_from_hex(Colors::UI_DIM)),
        HudHintText,
    ));
}

fn clear_match_ui(
    mut q_message: Query<&mut Text, (With<HudMessageText>, Without<HudHintText>)>,
    mut q_hint: Query<&mut Text, (With<HudHintText>, Without<HudMessageText>)>,
    mut q_rows: Query<&mut Visibility, With<HudScoreRow>>,
) {
    for mut text in &mut q_message {
        text.0.clear();
    }
    for mut text in &mut q_hint {
        text.0.clear();
    }
    for mut visibility in &mut q_rows {
        *visibility = Visibility::Hidden;
    }
}

fn update_lobby_ui(
    state: Res<State<ArenaState>>,
    selector: Option<Res<RosterSelector>>,
    mut q_lobby: Query<(&mut Text, &mut Visibility), With<HudLobbyText>>,
) {
    let in_lobby = *state.get() == ArenaState::Lobby;
    for (mut text, mut visibility) in &mut q_lobby {
        *visibility = if in_lobby {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if let Some(selector) = selector.as_ref().filter(|_| in_lobby) {
            let label = format!("PLAYERS: {}   < >   ENTER", selector.0.base_roster_size());
            if text.0 != label {
                text.0 = label;
            }
        }
    }
}

fn update_message_ui(
    mut session: ResMut<MatchSession>,
    mut q_message: Query<&mut Text, With<HudMessageText>>,
) {
    let display = session.0.display_mut();
    if !display.changed {
        return;
    }
    display.changed = false;
    for mut text in &mut q_message {
        text.0 = display.text.clone();
    }
}

fn update_score_ui(
    session: Res<MatchSession>,
    mut q_rows: Query<(&HudScoreRow, &mut Text, &mut TextColor, &mut Visibility)>,
) {
    let players: Vec<_> = session.0.registry().list_players().collect();
    let target = session.0.config().rounds_to_win;

    for (row, mut text, mut color, mut visibility) in &mut q_rows {
        let Some(player) = players.get(row.index) else {
            *visibility = Visibility::Hidden;
            continue;
        };
        *visibility = Visibility::Inherited;
        let line = format!("{}  {}/{}", player.label, player.wins, target);
        if text.0 != line {
            text.0 = line;
        }
        let tint = if player.is_alive() {
            color_from_hex(player.color)
        } else {
            color_from_hex(Colors::UI_DIM)
        };
        color.0 = tint;
    }
}

fn update_hint_ui(session: Res<MatchSession>, mut q_hint: Query<&mut Text, With<HudHintText>>) {
    let hint = hint_line(
        session.0.is_over(),
        session.0.registry().is_full(),
        session.0.registry().numbers(),
    );
    for mut text in &mut q_hint {
        if text.0 != hint {
            text.0 = hint.clone();
        }
    }
}

fn hint_line(game_over: bool, full: bool, joined: Vec<u32>) -> String {
    if game_over {
        return "ESC  back to lobby".to_string();
    }
    if full {
        return String::new();
    }
    let open: Vec<String> = (1..=MAX_PLAYER_ROWS as u32)
        .filter(|number| !joined.contains(number))
        .map(|number| format!("F{}", number))
        .collect();
    format!("{}  join", open.join(" "))
}
