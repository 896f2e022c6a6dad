//! Simulated tanks for the headless host and the soak test.
//!
//! Bots are small state machines that:
//! - Wander the arena or chase the nearest opponent, depending on personality
//! - Fire at the nearest opponent in range once their reload timer expires
//! - Only act while the round has handed them control

use crate::collaborators::{Combatant, ViewportCamera};
use crate::error::ConfigError;
use crate::registry::PlayerRegistry;
use arena_shared::vec3::{add, distance, heading_xz, scale, vec3};
use arena_shared::{Vec3, ViewportRect};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

/// Full health on spawn and on every round reset.
pub const STARTING_HEALTH: f64 = 100.0;

/// Bot personality affects movement and firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotPersonality {
    /// Drives at the nearest opponent, reloads fast (0.4-1.0s)
    Aggressive,
    /// Wanders, takes careful shots (1.0-2.5s)
    Cautious,
    /// Random turns and timing (0.2-3.0s)
    Chaotic,
}

impl BotPersonality {
    /// Reload range for this personality (min, max) in seconds
    fn reload_range(&self) -> (f64, f64) {
        match self {
            BotPersonality::Aggressive => (0.4, 1.0),
            BotPersonality::Cautious => (1.0, 2.5),
            BotPersonality::Chaotic => (0.2, 3.0),
        }
    }

    fn random_reload(&self, rng: &mut impl Rng) -> f64 {
        let (min, max) = self.reload_range();
        min + rng.gen::<f64>() * (max - min)
    }

    /// Chance that a shot hits
    fn accuracy(&self) -> f64 {
        match self {
            BotPersonality::Aggressive => 0.6,
            BotPersonality::Cautious => 0.85,
            BotPersonality::Chaotic => 0.4,
        }
    }

    /// Select a random personality
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..3) {
            0 => BotPersonality::Aggressive,
            1 => BotPersonality::Cautious,
            _ => BotPersonality::Chaotic,
        }
    }
}

/// Bot tuning
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotConfig {
    /// Arena spans `-half_extent..=half_extent` on x and z
    pub arena_half_extent: f64,
    /// Driving speed (m/s)
    pub speed: f64,
    /// Maximum shot distance
    pub fire_range: f64,
    /// Damage per hit (min, max)
    pub damage_min: f64,
    pub damage_max: f64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            arena_half_extent: 25.0,
            speed: 6.0,
            fire_range: 35.0,
            damage_min: 20.0,
            damage_max: 35.0,
        }
    }
}

impl BotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.arena_half_extent) {
            return Err(ConfigError::Invalid {
                field: "bots.arenaHalfExtent",
                requirement: "finite and > 0",
            });
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(ConfigError::Invalid {
                field: "bots.speed",
                requirement: "finite and >= 0",
            });
        }
        if !positive(self.fire_range) {
            return Err(ConfigError::Invalid {
                field: "bots.fireRange",
                requirement: "finite and > 0",
            });
        }
        if !positive(self.damage_min) || !self.damage_max.is_finite() || self.damage_max < self.damage_min {
            return Err(ConfigError::Invalid {
                field: "bots.damageMin/damageMax",
                requirement: "0 < damageMin <= damageMax",
            });
        }
        Ok(())
    }

    /// Corner spawn point for a player number, same layout as the quadrants.
    pub fn spawn_point(&self, number: u32) -> Vec3 {
        let corner = self.arena_half_extent * 0.8;
        let x = if number % 2 == 0 { corner } else { -corner };
        let z = if number > 2 { -corner } else { corner };
        vec3(x, 0.0, z)
    }
}

/// A simulated tank
#[derive(Debug, Clone)]
pub struct BotTank {
    pub number: u32,
    pub personality: BotPersonality,
    pub health: f64,
    pub position: Vec3,
    /// Radians around +y, 0 facing +z
    pub heading: f64,
    spawn: Vec3,
    control_enabled: bool,
    reload: f64,
    turn_timer: f64,
    /// Hits landed this session
    pub hits: u32,
}

impl BotTank {
    pub fn new(number: u32, spawn: Vec3, personality: BotPersonality) -> Self {
        Self {
            number,
            personality,
            health: STARTING_HEALTH,
            position: spawn,
            heading: facing_centre(spawn),
            spawn,
            control_enabled: false,
            reload: 0.0,
            turn_timer: 0.0,
            hits: 0,
        }
    }

    pub fn control_enabled(&self) -> bool {
        self.control_enabled
    }

    pub fn take_damage(&mut self, amount: f64) {
        self.health = (self.health - amount).max(0.0);
    }
}

impl Combatant for BotTank {
    fn reset(&mut self) {
        self.health = STARTING_HEALTH;
        self.position = self.spawn;
        self.heading = facing_centre(self.spawn);
        self.reload = 0.0;
        self.turn_timer = 0.0;
    }

    fn set_control_enabled(&mut self, enabled: bool) {
        self.control_enabled = enabled;
    }

    fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}

fn facing_centre(from: Vec3) -> f64 {
    (-from.x).atan2(-from.z)
}

/// Camera handle for the headless host: records what it was told.
#[derive(Debug, Clone, Default)]
pub struct RecordingCamera {
    pub active: bool,
    pub rect: ViewportRect,
    pub culling_mask: u32,
    /// Number of activation changes received
    pub toggles: u32,
}

impl ViewportCamera for RecordingCamera {
    fn set_active(&mut self, active: bool) {
        if self.active != active {
            self.toggles += 1;
        }
        self.active = active;
    }

    fn set_viewport_rect(&mut self, rect: ViewportRect) {
        self.rect = rect;
    }

    fn set_culling_mask(&mut self, mask: u32) {
        self.culling_mask = mask;
    }
}

/// A shot that connected
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub shooter: u32,
    pub target: u32,
    pub damage: f64,
}

/// Drives every bot in a registry from one seeded RNG
#[derive(Debug)]
pub struct BotDirector {
    config: BotConfig,
    rng: ChaCha8Rng,
}

impl BotDirector {
    pub fn new(config: BotConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Create the tank and camera for a new player
    pub fn spawn(&mut self, number: u32) -> (BotTank, Option<RecordingCamera>) {
        let personality = BotPersonality::random(&mut self.rng);
        tracing::debug!(number, ?personality, "Bot spawned");
        let tank = BotTank::new(number, self.config.spawn_point(number), personality);
        (tank, Some(RecordingCamera::default()))
    }

    /// Move every controllable bot and resolve its shots. Returns the hits.
    pub fn tick<C>(&mut self, dt: f64, registry: &mut PlayerRegistry<BotTank, C>) -> Vec<Hit> {
        if !(dt.is_finite() && dt > 0.0) {
            return Vec::new();
        }

        // Positions before anyone moves, so targeting does not depend on number order
        let alive: Vec<(u32, Vec3)> = registry
            .list_players()
            .filter(|p| p.is_alive())
            .map(|p| (p.number, p.entity.position))
            .collect();

        let mut shots = Vec::new();
        for player in registry.players_mut() {
            let number = player.number;
            let tank = &mut player.entity;
            if !tank.is_alive() || !tank.control_enabled {
                continue;
            }

            let target = alive
                .iter()
                .filter(|(n, _)| *n != number)
                .map(|(n, pos)| (*n, *pos, distance(tank.position, *pos)))
                .min_by(|a, b| a.2.total_cmp(&b.2));

            self.steer(tank, target.map(|(_, pos, _)| pos), dt);

            tank.reload -= dt;
            if tank.reload > 0.0 {
                continue;
            }
            if let Some((target, _, d)) = target {
                if d <= self.config.fire_range {
                    tank.reload = tank.personality.random_reload(&mut self.rng);
                    if self.rng.gen_bool(tank.personality.accuracy()) {
                        let damage = self
                            .rng
                            .gen_range(self.config.damage_min..=self.config.damage_max);
                        tank.hits += 1;
                        shots.push(Hit {
                            shooter: number,
                            target,
                            damage,
                        });
                    }
                }
            }
        }

        for hit in &shots {
            if let Some(target) = registry.get_player_mut(hit.target) {
                target.entity.take_damage(hit.damage);
                if !target.entity.is_alive() {
                    tracing::debug!(shooter = hit.shooter, target = hit.target, "Tank destroyed");
                }
            }
        }
        shots
    }

    fn steer(&mut self, tank: &mut BotTank, target: Option<Vec3>, dt: f64) {
        match (tank.personality, target) {
            (BotPersonality::Aggressive, Some(target)) => {
                tank.heading = (target.x - tank.position.x).atan2(target.z - tank.position.z);
            }
            _ => {
                tank.turn_timer -= dt;
                if tank.turn_timer <= 0.0 {
                    let spread = if tank.personality == BotPersonality::Chaotic {
                        PI
                    } else {
                        PI / 4.0
                    };
                    tank.heading += self.rng.gen_range(-spread..spread);
                    tank.turn_timer = 1.0 + self.rng.gen::<f64>() * 2.0;
                }
            }
        }

        let next = add(tank.position, scale(heading_xz(tank.heading), self.config.speed * dt));
        let limit = self.config.arena_half_extent;
        if next.x.abs() > limit || next.z.abs() > limit {
            // Bounce off the arena wall
            tank.heading += PI;
            tank.position.x = next.x.clamp(-limit, limit);
            tank.position.z = next.z.clamp(-limit, limit);
        } else {
            tank.position = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type BotRegistry = PlayerRegistry<BotTank, RecordingCamera>;

    fn bot_registry(director: &mut BotDirector, numbers: &[u32]) -> BotRegistry {
        let mut registry = PlayerRegistry::new(2, 4);
        for &number in numbers {
            let (tank, camera) = director.spawn(number);
            let player = registry.add_player(number, tank).unwrap();
            if let Some(camera) = camera {
                player.camera.attach(camera);
            }
        }
        registry
    }

    #[test]
    fn reset_restores_health_and_spawn() {
        let mut tank = BotTank::new(1, vec3(-20.0, 0.0, 20.0), BotPersonality::Cautious);
        tank.take_damage(150.0);
        tank.position = vec3(3.0, 0.0, 3.0);
        assert!(!tank.is_alive());
        assert_eq!(tank.health, 0.0);

        tank.reset();
        assert!(tank.is_alive());
        assert_eq!(tank.health, STARTING_HEALTH);
        assert_eq!(tank.position, vec3(-20.0, 0.0, 20.0));
    }

    #[test]
    fn bots_without_control_do_nothing() {
        let mut director = BotDirector::new(BotConfig::default(), 42);
        let mut registry = bot_registry(&mut director, &[1, 2]);
        let before: Vec<Vec3> = registry.list_players().map(|p| p.entity.position).collect();

        for _ in 0..100 {
            assert!(director.tick(0.1, &mut registry).is_empty());
        }

        let after: Vec<Vec3> = registry.list_players().map(|p| p.entity.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn bots_stay_inside_arena() {
        let config = BotConfig::default();
        let mut director = BotDirector::new(config, 7);
        let mut registry = bot_registry(&mut director, &[1, 2, 3, 4]);
        registry.set_control_enabled(true);

        for _ in 0..2000 {
            director.tick(0.05, &mut registry);
            for player in registry.list_players() {
                assert!(player.entity.position.x.abs() <= config.arena_half_extent);
                assert!(player.entity.position.z.abs() <= config.arena_half_extent);
            }
        }
    }

    #[test]
    fn armed_bots_eventually_leave_one_standing() {
        let mut director = BotDirector::new(BotConfig::default(), 12345);
        let mut registry = bot_registry(&mut director, &[1, 2, 3, 4]);
        registry.set_control_enabled(true);

        let mut ticks = 0;
        while registry.count_alive() > 1 && ticks < 20_000 {
            director.tick(0.02, &mut registry);
            ticks += 1;
        }
        assert!(registry.count_alive() <= 1, "still {} alive", registry.count_alive());
    }

    #[test]
    fn same_seed_same_outcome() {
        let run = |seed| {
            let mut director = BotDirector::new(BotConfig::default(), seed);
            let mut registry = bot_registry(&mut director, &[1, 2, 3]);
            registry.set_control_enabled(true);
            let mut hits = Vec::new();
            for _ in 0..500 {
                hits.extend(director.tick(0.02, &mut registry));
            }
            hits
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn recording_camera_counts_real_toggles() {
        let mut camera = RecordingCamera::default();
        camera.set_active(true);
        camera.set_active(true);
        camera.set_active(false);
        assert_eq!(camera.toggles, 2);
    }

    #[test]
    fn spawn_points_match_quadrants() {
        let config = BotConfig::default();
        assert_eq!(config.spawn_point(1), vec3(-20.0, 0.0, 20.0));
        assert_eq!(config.spawn_point(4), vec3(20.0, 0.0, -20.0));
    }

    #[test]
    fn inverted_damage_range_is_invalid() {
        let config = BotConfig {
            damage_min: 40.0,
            damage_max: 10.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
