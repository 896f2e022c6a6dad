mod cameras;
mod core;
mod hud;
mod input;
mod proxies;
mod tanks;

pub use cameras::CamerasPlugin;
pub use core::{ArenaSettings, CorePlugin};
pub use hud::HudPlugin;
pub use input::InputPlugin;
pub use tanks::TanksPlugin;
