//! Engine-side collaborators driven by the match core.
//!
//! The core never renders, simulates or draws text itself. Front-ends hand it
//! implementations of these traits and it calls them from inside `tick`.

use arena_shared::{Vec3, ViewportRect};

/// A player's controlled entity (a tank).
pub trait Combatant {
    /// Restore the spawn pose and full health. Liveness must read `true`
    /// immediately afterwards.
    fn reset(&mut self);

    /// Allow or forbid player input to move/fire the entity.
    fn set_control_enabled(&mut self, enabled: bool);

    /// Engine-driven liveness. Read-only to the core.
    fn is_alive(&self) -> bool;

    fn position(&self) -> Vec3;
}

/// A camera whose activation and viewport the layout engine owns.
pub trait ViewportCamera {
    fn set_active(&mut self, active: bool);

    fn set_viewport_rect(&mut self, rect: ViewportRect);

    /// Bitmask of render layers. Only the merge camera's mask is ever changed.
    fn set_culling_mask(&mut self, mask: u32);
}

/// Where round banners and end-of-round messages go.
pub trait MessageDisplay {
    fn set_message(&mut self, text: &str);
}

impl MessageDisplay for String {
    fn set_message(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}
