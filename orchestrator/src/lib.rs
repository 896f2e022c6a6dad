//! Match core for a local split-screen tank arena.
//!
//! The core tracks the player roster, runs rounds until someone has won
//! enough of them, and lays out one camera per living player. Engines plug
//! in through the traits in [`collaborators`]; the headless host in
//! [`game_loop`] drives it with simulated tanks.

pub mod bot;
pub mod camera;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod game_loop;
pub mod logging;
pub mod player;
pub mod registry;
pub mod round;
pub mod session;
pub mod snapshot;
pub mod win;

#[cfg(test)]
mod testing;

pub use camera::{CameraLayoutEngine, SplitState, DEFAULT_CULLING_MASK, EMPTY_CULLING_MASK};
pub use collaborators::{Combatant, MessageDisplay, ViewportCamera};
pub use error::{ConfigError, RegistryError};
pub use player::{CameraSlot, Player};
pub use registry::PlayerRegistry;
pub use round::{Phase, RoundController, RoundEvent, RoundState};
pub use session::Session;
pub use snapshot::{PlayerSnapshot, SessionSnapshot};
