//! Round and game outcome rules.
//!
//! All functions take players in number order (as `PlayerRegistry` yields
//! them), so "first" always means lowest player number.

use crate::collaborators::Combatant;
use crate::player::Player;
use std::fmt::Write;

/// Separator between the headline and the score lines.
const SCORE_SEPARATOR: &str = "\n\n\n\n";

/// The surviving player, or `None` for a draw.
pub fn round_winner<'a, E: Combatant + 'a, C: 'a>(
    players: impl IntoIterator<Item = &'a Player<E, C>>,
) -> Option<&'a Player<E, C>> {
    players.into_iter().find(|p| p.is_alive())
}

/// First player whose wins reached `rounds_to_win`.
pub fn game_winner<'a, E: 'a, C: 'a>(
    players: impl IntoIterator<Item = &'a Player<E, C>>,
    rounds_to_win: u32,
) -> Option<&'a Player<E, C>> {
    players.into_iter().find(|p| p.wins == rounds_to_win)
}

/// Text shown while a round is ending.
pub fn end_message<'a, E: 'a, C: 'a>(
    round_winner: Option<&Player<E, C>>,
    game_winner: Option<&Player<E, C>>,
    players: impl IntoIterator<Item = &'a Player<E, C>>,
) -> String {
    if let Some(winner) = game_winner {
        return format!("{} WINS THE GAME!", winner.label);
    }

    let mut message = match round_winner {
        Some(winner) => format!("{} WINS THE ROUND!", winner.label),
        None => "DRAW!".to_string(),
    };
    message.push_str(SCORE_SEPARATOR);
    for player in players {
        // Writing to a String cannot fail
        let _ = writeln!(message, "{}: {} WINS", player.label, player.wins);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::registry_with;

    #[test]
    fn round_winner_is_first_alive_player() {
        let mut registry = registry_with(&[1, 2, 3]);
        registry.get_player_mut(1).unwrap().entity.kill();
        let winner = round_winner(registry.list_players()).unwrap();
        assert_eq!(winner.number, 2);
    }

    #[test]
    fn round_winner_is_none_when_everyone_died() {
        let mut registry = registry_with(&[1, 2]);
        for player in registry.players_mut() {
            player.entity.kill();
        }
        assert!(round_winner(registry.list_players()).is_none());
    }

    #[test]
    fn game_winner_needs_exact_round_count() {
        let mut registry = registry_with(&[1, 2]);
        registry.get_player_mut(2).unwrap().wins = 2;
        assert!(game_winner(registry.list_players(), 3).is_none());

        registry.get_player_mut(2).unwrap().wins = 3;
        assert_eq!(game_winner(registry.list_players(), 3).unwrap().number, 2);
    }

    #[test]
    fn game_winner_tie_break_is_lowest_number() {
        let mut registry = registry_with(&[1, 2, 3]);
        registry.get_player_mut(3).unwrap().wins = 3;
        registry.get_player_mut(2).unwrap().wins = 3;
        assert_eq!(game_winner(registry.list_players(), 3).unwrap().number, 2);
    }

    #[test]
    fn round_message_lists_scores() {
        let mut registry = registry_with(&[1, 2]);
        registry.get_player_mut(1).unwrap().wins = 1;
        let winner = registry.get_player(1);
        let message = end_message(winner, None, registry.list_players());
        assert_eq!(
            message,
            "PLAYER 1 WINS THE ROUND!\n\n\n\nPLAYER 1: 1 WINS\nPLAYER 2: 0 WINS\n"
        );
    }

    #[test]
    fn draw_message_lists_scores() {
        let registry = registry_with(&[1, 2, 3]);
        let message = end_message(None, None, registry.list_players());
        assert_eq!(
            message,
            "DRAW!\n\n\n\nPLAYER 1: 0 WINS\nPLAYER 2: 0 WINS\nPLAYER 3: 0 WINS\n"
        );
    }

    #[test]
    fn game_message_replaces_everything() {
        let mut registry = registry_with(&[1, 2]);
        registry.get_player_mut(2).unwrap().wins = 5;
        let winner = registry.get_player(2);
        let message = end_message(winner, winner, registry.list_players());
        assert_eq!(message, "PLAYER 2 WINS THE GAME!");
    }
}
