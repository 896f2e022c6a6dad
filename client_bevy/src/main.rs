mod constants;
mod game;

use arena_shared::{ConfigError, MatchConfig};
use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use game::{ArenaSettings, CamerasPlugin, CorePlugin, HudPlugin, InputPlugin, TanksPlugin};

const MATCH_CONFIG_ENV: &str = "ARENA_MATCH_CONFIG";
const PLAYERS_ENV: &str = "ARENA_PLAYERS";

fn main() {
    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Invalid arena settings: {}", e);
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Tank Arena".to_string(),
                resolution: WindowResolution::new(1280, 720),
                present_mode: PresentMode::AutoVsync,
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(settings)
        .add_plugins(CorePlugin)
        .add_plugins(TanksPlugin)
        .add_plugins(CamerasPlugin)
        .add_plugins(InputPlugin)
        .add_plugins(HudPlugin)
        .run();
}

/// Match rules from the JSON file named by `ARENA_MATCH_CONFIG` (defaults
/// otherwise), starting roster from `ARENA_PLAYERS`.
fn load_settings() -> Result<ArenaSettings, ConfigError> {
    let config = match std::env::var(MATCH_CONFIG_ENV) {
        Ok(path) => {
            let json = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            MatchConfig::from_json(&json)?
        }
        Err(_) => MatchConfig::default(),
    };
    config.validate()?;

    let base_players = match std::env::var(PLAYERS_ENV) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::Parse(format!("{}: {}", PLAYERS_ENV, e)))?,
        Err(_) => config.min_players,
    };

    Ok(ArenaSettings {
        config,
        base_players,
    })
}
