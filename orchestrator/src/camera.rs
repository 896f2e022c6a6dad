//! Split-screen camera layout.
//!
//! Every fixed tick the engine looks at which players are alive, decides
//! between one merged view and split views, and assigns each camera slot a
//! viewport:
//!
//! | alive | player slots                      | spectator | merge camera |
//! |-------|-----------------------------------|-----------|--------------|
//! | 0, 1  | none                              | off       | on           |
//! | 2     | two halves, or none when merged   | off       | when merged  |
//! | 3     | quadrant per player number        | on        | off          |
//! | 4     | quadrant per player number        | off       | off          |
//!
//! With three players alive the spectator camera fills the quadrant of the
//! absent number so the screen has no hole.

use crate::collaborators::{Combatant, ViewportCamera};
use crate::player::CameraSlot;
use crate::registry::PlayerRegistry;
use arena_shared::vec3::distance;
use arena_shared::{CameraConfig, ViewportRect};

/// Culling mask that renders the default layer.
pub const DEFAULT_CULLING_MASK: u32 = 1;
/// Culling mask that renders nothing.
pub const EMPTY_CULLING_MASK: u32 = 0;

const DEFAULT_ASPECT: f64 = 16.0 / 9.0;

/// Single vs. split view decision, persistent across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitState {
    pub in_split_mode: bool,
}

impl Default for SplitState {
    fn default() -> Self {
        Self {
            in_split_mode: true,
        }
    }
}

impl SplitState {
    /// Apply the roster-size rule, or the distance hysteresis when exactly
    /// two players are alive. Returns true when the mode changed.
    pub fn update(&mut self, alive: usize, pair_distance: Option<f64>, config: &CameraConfig) -> bool {
        let next = match alive {
            n if n > 2 => true,
            n if n < 2 => false,
            _ => match pair_distance {
                Some(d) if self.in_split_mode && d < config.merge_below() => false,
                Some(d) if !self.in_split_mode && d > config.split_above() => true,
                _ => self.in_split_mode,
            },
        };
        let changed = next != self.in_split_mode;
        self.in_split_mode = next;
        changed
    }
}

/// Full-screen camera used whenever the view is not split.
///
/// Switching to split view blanks it (empty culling mask) for one tick and
/// only then disables it: disabling it on the same tick leaves its last
/// frame on screen behind the split views.
#[derive(Debug)]
struct MergeCamera<C> {
    handle: Option<C>,
    active: bool,
    culling_mask: u32,
    disable_pending: bool,
    dirty: bool,
}

impl<C> MergeCamera<C> {
    fn new() -> Self {
        Self {
            handle: None,
            active: false,
            culling_mask: DEFAULT_CULLING_MASK,
            disable_pending: false,
            dirty: true,
        }
    }

    fn begin_split(&mut self) {
        if self.active {
            self.culling_mask = EMPTY_CULLING_MASK;
            self.disable_pending = true;
            self.dirty = true;
        }
    }

    fn merge(&mut self) {
        self.culling_mask = DEFAULT_CULLING_MASK;
        self.active = true;
        self.disable_pending = false;
        self.dirty = true;
    }

    fn finish_pending_disable(&mut self) {
        if self.disable_pending {
            self.active = false;
            self.disable_pending = false;
            self.dirty = true;
        }
    }
}

impl<C: ViewportCamera> MergeCamera<C> {
    fn sync(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        if self.dirty {
            handle.set_viewport_rect(ViewportRect::FULL);
            handle.set_culling_mask(self.culling_mask);
            handle.set_active(self.active);
            self.dirty = false;
        }
    }
}

pub struct CameraLayoutEngine<C> {
    config: CameraConfig,
    aspect: f64,
    split: SplitState,
    spectator: CameraSlot<C>,
    merge: MergeCamera<C>,
}

impl<C> CameraLayoutEngine<C> {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            aspect: DEFAULT_ASPECT,
            split: SplitState::default(),
            spectator: CameraSlot::new(),
            merge: MergeCamera::new(),
        }
    }

    pub fn attach_spectator(&mut self, camera: C) {
        self.spectator.attach(camera);
    }

    pub fn attach_merge_camera(&mut self, camera: C) {
        self.merge.handle = Some(camera);
        self.merge.dirty = true;
    }

    /// Screen size used for the two-player rects. Degenerate sizes are ignored.
    pub fn set_screen_size(&mut self, width: f64, height: f64) {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn split_state(&self) -> SplitState {
        self.split
    }

    pub fn in_split_mode(&self) -> bool {
        self.split.in_split_mode
    }

    pub fn spectator(&self) -> &CameraSlot<C> {
        &self.spectator
    }

    pub fn merge_camera_active(&self) -> bool {
        self.merge.active
    }

    pub fn merge_culling_mask(&self) -> u32 {
        self.merge.culling_mask
    }

    pub fn merge_camera(&self) -> Option<&C> {
        self.merge.handle.as_ref()
    }

    pub fn merge_camera_mut(&mut self) -> Option<&mut C> {
        self.merge.handle.as_mut()
    }

    pub fn spectator_camera_mut(&mut self) -> Option<&mut C> {
        self.spectator.handle_mut()
    }
}

impl<C: ViewportCamera> CameraLayoutEngine<C> {
    /// Once-per-tick entry point: completes a pending merge-camera disable
    /// from the previous tick, then recomputes the layout.
    pub fn update<E: Combatant>(&mut self, registry: &mut PlayerRegistry<E, C>) {
        self.merge.finish_pending_disable();
        if registry.take_recompute_request() {
            tracing::trace!("Layout recompute requested");
            for player in registry.players_mut() {
                player.camera.mark_dirty();
            }
            self.spectator.mark_dirty();
        }
        self.recompute(registry);
    }

    /// Recompute split mode and every slot from the current alive set.
    /// Running it again with unchanged inputs changes nothing.
    pub fn recompute<E: Combatant>(&mut self, registry: &mut PlayerRegistry<E, C>) {
        let alive: Vec<(u32, arena_shared::Vec3)> = registry
            .list_players()
            .filter(|p| p.is_alive())
            .map(|p| (p.number, p.entity.position()))
            .collect();

        let pair_distance = match alive.as_slice() {
            [(_, a), (_, b)] => Some(distance(*a, *b)),
            _ => None,
        };

        if self.split.update(alive.len(), pair_distance, &self.config) {
            if self.split.in_split_mode {
                tracing::debug!(alive = alive.len(), ?pair_distance, "Splitting screen");
                self.merge.begin_split();
            } else {
                tracing::debug!(alive = alive.len(), ?pair_distance, "Merging screen");
                self.merge.merge();
            }
        } else if !self.split.in_split_mode && !self.merge.active {
            // Initial state or a merge that never reached the camera
            self.merge.merge();
        }

        let (first_half, second_half) = ViewportRect::two_player_split(self.aspect);
        let first_alive = alive.first().map(|(n, _)| *n);
        let split = self.split.in_split_mode;

        for player in registry.players_mut() {
            let placement = if !player.is_alive() {
                None
            } else {
                match alive.len() {
                    0 | 1 => None,
                    2 if !split => None,
                    2 if Some(player.number) == first_alive => Some(first_half),
                    2 => Some(second_half),
                    _ => Some(ViewportRect::quadrant(player.number)),
                }
            };
            player.camera.assign(placement);
            if !player.camera.sync() {
                tracing::trace!(player = player.number, "Camera handle missing, retrying next tick");
            }
        }

        let spectator = if alive.len() == 3 {
            registry.missing_number().map(ViewportRect::quadrant)
        } else {
            None
        };
        self.spectator.assign(spectator);
        self.spectator.sync();
        self.merge.sync();
    }

    /// Number of active cameras, spectator included. The merge camera is not a slot.
    pub fn active_slot_count<E>(&self, registry: &PlayerRegistry<E, C>) -> usize {
        registry
            .list_players()
            .filter(|p| p.camera.is_active())
            .count()
            + usize::from(self.spectator.is_active())
    }
}
