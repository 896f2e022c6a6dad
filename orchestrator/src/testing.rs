//! Hand-driven collaborators for unit tests.

use crate::collaborators::{Combatant, ViewportCamera};
use crate::camera::DEFAULT_CULLING_MASK;
use crate::registry::PlayerRegistry;
use arena_shared::vec3::vec3;
use arena_shared::{Vec3, ViewportRect};

#[derive(Debug, Clone)]
pub struct TestEntity {
    pub alive: bool,
    pub position: Vec3,
    pub spawn: Vec3,
    pub control_enabled: bool,
    pub resets: u32,
}

impl TestEntity {
    pub fn at(x: f64, z: f64) -> Self {
        let spawn = vec3(x, 0.0, z);
        Self {
            alive: true,
            position: spawn,
            spawn,
            control_enabled: false,
            resets: 0,
        }
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}

impl Combatant for TestEntity {
    fn reset(&mut self) {
        self.alive = true;
        self.position = self.spawn;
        self.resets += 1;
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
pub struct TestCamera {
    pub active: bool,
    pub rect: ViewportRect,
    pub culling_mask: u32,
    /// Number of activation writes received
    pub writes: u32,
}

impl Default for TestCamera {
    fn default() -> Self {
        Self {
            active: false,
            rect: ViewportRect::FULL,
            culling_mask: DEFAULT_CULLING_MASK,
            writes: 0,
        }
    }
}

impl ViewportCamera for TestCamera {
    fn set_active(&mut self, active: bool) {
        self.active = active;
        self.writes += 1;
    }

    fn set_viewport_rect(&mut self, rect: ViewportRect) {
        self.rect = rect;
    }

    fn set_culling_mask(&mut self, mask: u32) {
        self.culling_mask = mask;
    }
}

pub type TestRegistry = PlayerRegistry<TestEntity, TestCamera>;

/// Arena corner for each player, far enough apart to force split view.
pub fn spawn_for(number: u32) -> TestEntity {
    let x = if number % 2 == 0 { 20.0 } else { -20.0 };
    let z = if number > 2 { -20.0 } else { 20.0 };
    TestEntity::at(x, z)
}

/// Registry on the default 2..=4 bounds with the given players, each with a camera.
pub fn registry_with(numbers: &[u32]) -> TestRegistry {
    let mut registry = PlayerRegistry::new(2, 4);
    for &number in numbers {
        registry
            .add_player(number, spawn_for(number))
            .expect("test roster is valid")
            .camera
            .attach(TestCamera::default());
    }
    registry
}
