//! Plain-data stand-ins the match core drives.
//!
//! The session cannot borrow ECS components across systems, so it owns these
//! proxies instead. The `Sync` fixed set copies ECS state into them before
//! the session ticks and the `Apply` set / camera systems copy the session's
//! decisions back out afterwards.

use arena_orchestrator::{Combatant, MessageDisplay, Session, ViewportCamera, DEFAULT_CULLING_MASK};
use arena_shared::{Vec3, ViewportRect};
use bevy::prelude::*;

#[derive(Debug, Clone)]
pub(crate) struct TankProxy {
    pub(crate) entity: Entity,
    pub(crate) alive: bool,
    pub(crate) position: Vec3,
    pub(crate) control_enabled: bool,
    /// Set by the core; the ECS tank is restored on the next `Apply`
    pub(crate) reset_pending: bool,
    spawn: Vec3,
}

impl TankProxy {
    pub(crate) fn new(entity: Entity, spawn: Vec3) -> Self {
        Self {
            entity,
            alive: true,
            position: spawn,
            control_enabled: false,
            reset_pending: false,
            spawn,
        }
    }
}

impl Combatant for TankProxy {
    fn reset(&mut self) {
        self.reset_pending = true;
        self.alive = true;
        self.position = self.spawn;
    }

    fn set_control_enabled(&mut self, enabled: bool) {
        self.control_enabled = enabled;
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CameraProxy {
    pub(crate) entity: Entity,
    pub(crate) active: bool,
    pub(crate) rect: ViewportRect,
    pub(crate) culling_mask: u32,
    /// Pending write to the ECS camera
    pub(crate) dirty: bool,
}

impl CameraProxy {
    pub(crate) fn new(entity: Entity) -> Self {
        Self {
            entity,
            active: false,
            rect: ViewportRect::FULL,
            culling_mask: DEFAULT_CULLING_MASK,
            dirty: true,
        }
    }
}

impl ViewportCamera for CameraProxy {
    fn set_active(&mut self, active: bool) {
        self.active = active;
        self.dirty = true;
    }

    fn set_viewport_rect(&mut self, rect: ViewportRect) {
        self.rect = rect;
        self.dirty = true;
    }

    fn set_culling_mask(&mut self, mask: u32) {
        self.culling_mask = mask;
        self.dirty = true;
    }
}

#[derive(Debug, Default)]
pub(crate) struct HudMessage {
    pub(crate) text: String,
    pub(crate) changed: bool,
}

impl MessageDisplay for HudMessage {
    fn set_message(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.changed = true;
    }
}

pub(crate) type ArenaSession = Session<TankProxy, CameraProxy, HudMessage>;

/// The running match. Only present in `ArenaState::Match`.
#[derive(Resource)]
pub(crate) struct MatchSession(pub(crate) ArenaSession);
