//! Round progression: `Starting → Playing → Ending → Starting …` until a
//! player has won enough rounds, then `GameOver`.
//!
//! Each phase suspends on an explicit [`Wait`] that `tick` advances, so the
//! controller never blocks and never schedules anything on its own.

use crate::collaborators::{Combatant, MessageDisplay, ViewportCamera};
use crate::registry::PlayerRegistry;
use crate::win;
use arena_shared::MatchConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Starting,
    Playing,
    Ending,
    GameOver,
}

/// What the current phase is waiting for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wait {
    /// Seconds left before the phase completes
    Timer(f64),
    /// Poll liveness each tick until at most one player is alive
    UntilOneStanding,
    /// Terminal
    Halted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    pub phase: Phase,
    /// 1 for the first round, never decreases
    pub round_number: u32,
    pub round_winner: Option<u32>,
    /// Set once, never cleared
    pub game_winner: Option<u32>,
    /// Last text sent to the display
    pub message: String,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            phase: Phase::Starting,
            round_number: 0,
            round_winner: None,
            game_winner: None,
            message: String::new(),
        }
    }
}

/// Phase transitions, reported by `tick` for hosts to log or broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundEvent {
    RoundStarted { round: u32 },
    RoundPlaying { round: u32 },
    RoundEnded {
        round: u32,
        winner: Option<u32>,
        message: String,
    },
    GameOver { winner: u32 },
}

pub struct RoundController {
    rounds_to_win: u32,
    start_delay: f64,
    end_delay: f64,
    state: RoundState,
    wait: Wait,
}

impl RoundController {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            rounds_to_win: config.rounds_to_win,
            start_delay: config.start_delay,
            end_delay: config.end_delay,
            state: RoundState::default(),
            // Nothing happens until `begin`
            wait: Wait::Halted,
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn wait(&self) -> Wait {
        self.wait
    }

    pub fn rounds_to_win(&self) -> u32 {
        self.rounds_to_win
    }

    /// Whether player input should currently reach the tanks.
    pub fn controls_enabled(&self) -> bool {
        self.state.phase == Phase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.state.phase == Phase::GameOver
    }

    /// Enter the first round.
    pub fn begin<E, C, D>(&mut self, registry: &mut PlayerRegistry<E, C>, display: &mut D) -> RoundEvent
    where
        E: Combatant,
        C: ViewportCamera,
        D: MessageDisplay,
    {
        self.enter_starting(registry, display)
    }

    /// Advance the current wait by `dt` seconds and perform at most one
    /// phase transition. Non-finite or negative `dt` counts as zero.
    pub fn tick<E, C, D>(
        &mut self,
        dt: f64,
        registry: &mut PlayerRegistry<E, C>,
        display: &mut D,
    ) -> Option<RoundEvent>
    where
        E: Combatant,
        C: ViewportCamera,
        D: MessageDisplay,
    {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        match self.wait {
            Wait::Halted => None,
            Wait::Timer(remaining) => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.wait = Wait::Timer(remaining);
                    return None;
                }
                match self.state.phase {
                    Phase::Starting => Some(self.enter_playing(registry, display)),
                    Phase::Ending => match self.state.game_winner {
                        Some(winner) => Some(self.enter_game_over(winner)),
                        None => Some(self.enter_starting(registry, display)),
                    },
                    // Timers are only armed by Starting and Ending
                    Phase::Playing | Phase::GameOver => None,
                }
            }
            Wait::UntilOneStanding => {
                if registry.count_alive() <= 1 {
                    Some(self.enter_ending(registry, display))
                } else {
                    None
                }
            }
        }
    }

    fn enter_starting<E, C, D>(&mut self, registry: &mut PlayerRegistry<E, C>, display: &mut D) -> RoundEvent
    where
        E: Combatant,
        C: ViewportCamera,
        D: MessageDisplay,
    {
        self.state.phase = Phase::Starting;
        self.state.round_number += 1;
        self.state.round_winner = None;

        registry.reset_all();
        registry.set_control_enabled(false);

        let message = format!("ROUND {}", self.state.round_number);
        self.show(display, message);
        self.wait = Wait::Timer(self.start_delay);

        tracing::info!(round = self.state.round_number, "Round starting");
        RoundEvent::RoundStarted {
            round: self.state.round_number,
        }
    }

    fn enter_playing<E, C, D>(&mut self, registry: &mut PlayerRegistry<E, C>, display: &mut D) -> RoundEvent
    where
        E: Combatant,
        D: MessageDisplay,
    {
        self.state.phase = Phase::Playing;
        registry.set_control_enabled(true);
        self.show(display, String::new());
        self.wait = Wait::UntilOneStanding;

        tracing::debug!(round = self.state.round_number, "Round playing");
        RoundEvent::RoundPlaying {
            round: self.state.round_number,
        }
    }

    fn enter_ending<E, C, D>(&mut self, registry: &mut PlayerRegistry<E, C>, display: &mut D) -> RoundEvent
    where
        E: Combatant,
        D: MessageDisplay,
    {
        self.state.phase = Phase::Ending;
        registry.set_control_enabled(false);

        let winner = win::round_winner(registry.list_players()).map(|p| p.number);
        if let Some(player) = winner.and_then(|n| registry.get_player_mut(n)) {
            player.wins += 1;
        }
        self.state.round_winner = winner;

        if self.state.game_winner.is_none() {
            self.state.game_winner =
                win::game_winner(registry.list_players(), self.rounds_to_win).map(|p| p.number);
        }

        let message = win::end_message(
            winner.and_then(|n| registry.get_player(n)),
            self.state.game_winner.and_then(|n| registry.get_player(n)),
            registry.list_players(),
        );
        self.show(display, message.clone());
        self.wait = Wait::Timer(self.end_delay);

        match winner {
            Some(number) => tracing::info!(round = self.state.round_number, winner = number, "Round won"),
            None => tracing::info!(round = self.state.round_number, "Round drawn"),
        }
        RoundEvent::RoundEnded {
            round: self.state.round_number,
            winner,
            message,
        }
    }

    fn enter_game_over(&mut self, winner: u32) -> RoundEvent {
        self.state.phase = Phase::GameOver;
        self.wait = Wait::Halted;
        tracing::info!(winner, rounds = self.state.round_number, "Game over");
        RoundEvent::GameOver { winner }
    }

    fn show<D: MessageDisplay>(&mut self, display: &mut D, message: String) {
        display.set_message(&message);
        self.state.message = message;
    }
}
