use crate::collaborators::{Combatant, ViewportCamera};
use arena_shared::ViewportRect;

/// A registered player and everything the core tracks for it.
#[derive(Debug)]
pub struct Player<E, C> {
    pub number: u32,
    /// "PLAYER n", used in every on-screen message
    pub label: String,
    /// Tank tint as 0xRRGGBB
    pub color: u32,
    /// Rounds won this session
    pub wins: u32,
    pub entity: E,
    pub camera: CameraSlot<C>,
}

impl<E, C> Player<E, C> {
    pub fn new(number: u32, entity: E) -> Self {
        Self {
            number,
            label: player_label(number),
            color: color_from_number(number),
            wins: 0,
            entity,
            camera: CameraSlot::new(),
        }
    }
}

impl<E: Combatant, C> Player<E, C> {
    pub fn is_alive(&self) -> bool {
        self.entity.is_alive()
    }
}

/// Layout state for one camera plus the engine handle it is mirrored onto.
///
/// The slot state is always computed; it is only pushed to the handle once
/// one has been attached.
#[derive(Debug)]
pub struct CameraSlot<C> {
    rect: ViewportRect,
    active: bool,
    dirty: bool,
    handle: Option<C>,
}

impl<C> Default for CameraSlot<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CameraSlot<C> {
    pub fn new() -> Self {
        Self {
            rect: ViewportRect::FULL,
            active: false,
            dirty: true,
            handle: None,
        }
    }

    pub fn rect(&self) -> ViewportRect {
        self.rect
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<&C> {
        self.handle.as_ref()
    }

    pub fn handle_mut(&mut self) -> Option<&mut C> {
        self.handle.as_mut()
    }

    /// Wire the engine camera. The current state is pushed on the next sync.
    pub fn attach(&mut self, handle: C) {
        self.handle = Some(handle);
        self.dirty = true;
    }

    /// Activate on `Some(rect)`, deactivate on `None` (the last rect is kept).
    pub(crate) fn assign(&mut self, placement: Option<ViewportRect>) {
        match placement {
            Some(rect) => {
                if !self.active || self.rect != rect {
                    self.active = true;
                    self.rect = rect;
                    self.dirty = true;
                }
            }
            None => {
                if self.active {
                    self.active = false;
                    self.dirty = true;
                }
            }
        }
    }

    pub(crate) fn force_active(&mut self) {
        self.assign(Some(self.rect));
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl<C: ViewportCamera> CameraSlot<C> {
    /// Mirror pending changes onto the handle. Returns false when the handle
    /// is missing and the changes are still waiting.
    pub(crate) fn sync(&mut self) -> bool {
        let Some(handle) = self.handle.as_mut() else {
            return false;
        };
        if self.dirty {
            handle.set_viewport_rect(self.rect);
            handle.set_active(self.active);
            self.dirty = false;
        }
        true
    }
}

pub fn player_label(number: u32) -> String {
    format!("PLAYER {}", number)
}

/// Generate a tank color from the player number using golden angle hue distribution.
pub fn color_from_number(number: u32) -> u32 {
    let hue = number.wrapping_mul(137) % 360;
    hsv_to_rgb(hue as f64, 0.55, 0.95)
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> u32 {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    let ri = ((r + m) * 255.0).round() as u32;
    let gi = ((g + m) * 255.0).round() as u32;
    let bi = ((b + m) * 255.0).round() as u32;

    (ri << 16) | (gi << 8) | bi
}
