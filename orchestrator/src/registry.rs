//! Player roster.
//!
//! Players are keyed by their number, so iteration is always in number
//! order. That order is what every tie-break in the match relies on.

use crate::collaborators::{Combatant, ViewportCamera};
use crate::error::RegistryError;
use crate::player::Player;
use arena_shared::MatchConfig;
use std::collections::BTreeMap;

pub struct PlayerRegistry<E, C> {
    players: BTreeMap<u32, Player<E, C>>,
    min_players: u32,
    max_players: u32,
    /// Size of the roster built when a session starts
    base_roster_size: u32,
    recompute_requested: bool,
}

impl<E, C> PlayerRegistry<E, C> {
    pub fn new(min_players: u32, max_players: u32) -> Self {
        Self {
            players: BTreeMap::new(),
            min_players,
            max_players,
            base_roster_size: min_players,
            recompute_requested: false,
        }
    }

    pub fn from_config(config: &MatchConfig) -> Self {
        Self::new(config.min_players, config.max_players)
    }

    pub fn min_players(&self) -> u32 {
        self.min_players
    }

    pub fn max_players(&self) -> u32 {
        self.max_players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players as usize
    }

    pub fn contains(&self, number: u32) -> bool {
        self.players.contains_key(&number)
    }

    /// Check whether `number` could join without mutating anything.
    pub fn check_join(&self, number: u32) -> Result<(), RegistryError> {
        if number == 0 || number > self.max_players {
            return Err(RegistryError::OutOfRange {
                number,
                max: self.max_players,
            });
        }
        if self.players.contains_key(&number) {
            return Err(RegistryError::DuplicateNumber(number));
        }
        Ok(())
    }

    /// Register a player. Its camera slot starts inactive and a layout
    /// recompute is requested.
    pub fn add_player(&mut self, number: u32, entity: E) -> Result<&mut Player<E, C>, RegistryError> {
        self.check_join(number)?;
        self.recompute_requested = true;
        Ok(self
            .players
            .entry(number)
            .or_insert_with(|| Player::new(number, entity)))
    }

    pub fn attach_camera(&mut self, number: u32, camera: C) -> Result<(), RegistryError> {
        let player = self
            .players
            .get_mut(&number)
            .ok_or(RegistryError::UnknownPlayer(number))?;
        player.camera.attach(camera);
        Ok(())
    }

    pub fn get_player(&self, number: u32) -> Option<&Player<E, C>> {
        self.players.get(&number)
    }

    pub fn get_player_mut(&mut self, number: u32) -> Option<&mut Player<E, C>> {
        self.players.get_mut(&number)
    }

    /// Players in number order.
    pub fn list_players(&self) -> impl Iterator<Item = &Player<E, C>> {
        self.players.values()
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut Player<E, C>> {
        self.players.values_mut()
    }

    pub fn numbers(&self) -> Vec<u32> {
        self.players.keys().copied().collect()
    }

    pub fn base_roster_size(&self) -> u32 {
        self.base_roster_size
    }

    /// Set the size of the initial roster, clamped to the player bounds.
    pub fn set_base_roster_size(&mut self, size: u32) -> u32 {
        self.base_roster_size = size.clamp(self.min_players, self.max_players);
        self.base_roster_size
    }

    /// Step the pre-session player-count selector by one, wrapping past
    /// either bound to the other one.
    pub fn cycle_base_roster_size(&mut self, increase: bool) -> u32 {
        let next = if increase {
            self.base_roster_size + 1
        } else {
            self.base_roster_size.saturating_sub(1)
        };
        self.base_roster_size = if next > self.max_players {
            self.min_players
        } else if next < self.min_players {
            self.max_players
        } else {
            next
        };
        self.base_roster_size
    }

    pub fn request_recompute(&mut self) {
        self.recompute_requested = true;
    }

    pub(crate) fn take_recompute_request(&mut self) -> bool {
        std::mem::take(&mut self.recompute_requested)
    }
}

impl<E: Combatant, C> PlayerRegistry<E, C> {
    pub fn count_alive(&self) -> usize {
        self.players.values().filter(|p| p.is_alive()).count()
    }

    pub fn alive_numbers(&self) -> Vec<u32> {
        self.players
            .values()
            .filter(|p| p.is_alive())
            .map(|p| p.number)
            .collect()
    }

    /// Lowest number in `1..=max_players` without a living player, whether
    /// it was never taken or its tank has been destroyed.
    pub fn missing_number(&self) -> Option<u32> {
        (1..=self.max_players).find(|n| !self.players.get(n).is_some_and(|p| p.is_alive()))
    }

    pub fn set_control_enabled(&mut self, enabled: bool) {
        for player in self.players.values_mut() {
            player.entity.set_control_enabled(enabled);
        }
    }
}

impl<E: Combatant, C: ViewportCamera> PlayerRegistry<E, C> {
    /// Reset every entity and force its camera on, as at round start.
    pub(crate) fn reset_all(&mut self) {
        for player in self.players.values_mut() {
            player.entity.reset();
            player.camera.force_active();
        }
        self.recompute_requested = true;
    }
}
