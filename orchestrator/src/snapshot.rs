use crate::collaborators::Combatant;
use crate::player::Player;
use crate::round::Phase;
use arena_shared::ViewportRect;
use serde::{Deserialize, Serialize};

/// Point-in-time view of a session, printed by the headless host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub round_number: u32,
    pub round_winner: Option<u32>,
    pub game_winner: Option<u32>,
    pub message: String,
    pub split_mode: bool,
    pub merge_camera_active: bool,
    /// Spectator viewport, present only while the spectator is active
    pub spectator: Option<ViewportRect>,
    pub players: Vec<PlayerSnapshot>,
}

impl SessionSnapshot {
    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    pub fn active_camera_count(&self) -> usize {
        self.players.iter().filter(|p| p.camera_active).count() + usize::from(self.spectator.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub number: u32,
    pub label: String,
    pub color: u32,
    pub wins: u32,
    pub alive: bool,
    pub camera_active: bool,
    pub viewport: ViewportRect,
    pub position: [f64; 3],
}

impl PlayerSnapshot {
    pub fn from_player<E: Combatant, C>(player: &Player<E, C>) -> Self {
        Self {
            number: player.number,
            label: player.label.clone(),
            color: player.color,
            wins: player.wins,
            alive: player.is_alive(),
            camera_active: player.camera.is_active(),
            viewport: player.camera.rect(),
            position: player.entity.position().to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::registry_with;

    #[test]
    fn player_snapshot_serializes_camel_case() {
        let registry = registry_with(&[2]);
        let snapshot = PlayerSnapshot::from_player(registry.get_player(2).unwrap());
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["number"], 2);
        assert_eq!(json["label"], "PLAYER 2");
        assert_eq!(json["cameraActive"], false);
        assert_eq!(json["position"], serde_json::json!([20.0, 0.0, 20.0]));
    }

    #[test]
    fn phase_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Phase::GameOver).unwrap(), r#""game_over""#);
    }
}
