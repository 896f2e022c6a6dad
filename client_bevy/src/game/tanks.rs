use arena_orchestrator::player::color_from_number;
use arena_shared::vec3::vec3;
use arena_shared::Vec3 as ArenaVec3;
use bevy::prelude::*;

use crate::constants::{
    arena_to_world, color_from_hex, Colors, ARENA_HALF_EXTENT, BARREL_LENGTH, FIRE_CONE,
    FIRE_RANGE, PPM, RELOAD_SECS, SHELL_DAMAGE, STARTING_HEALTH, TANK_LENGTH, TANK_SPEED,
    TANK_TURN_RATE, TANK_WIDTH,
};

use super::core::{FixedSet, MatchEntity, UpdateSet};
use super::input::TankInput;
use super::proxies::{MatchSession, TankProxy};

pub struct TanksPlugin;

#[derive(Component, Debug)]
pub(crate) struct Tank {
    pub(crate) number: u32,
    pub(crate) health: f32,
    /// Radians, 0 facing up the screen, increasing clockwise
    pub(crate) heading: f32,
    reload: f32,
    control_enabled: bool,
}

impl Tank {
    fn new(number: u32) -> Self {
        Self {
            number,
            health: STARTING_HEALTH,
            heading: spawn_heading(number),
            reload: 0.0,
            control_enabled: false,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    fn forward(&self) -> Vec2 {
        Vec2::new(self.heading.sin(), self.heading.cos())
    }
}

impl Plugin for TanksPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (drive_tanks, fire_tanks).chain().in_set(FixedSet::Simulate),
        )
        .add_systems(FixedUpdate, sync_tanks_to_session.in_set(FixedSet::Sync))
        .add_systems(FixedUpdate, apply_session_to_tanks.in_set(FixedSet::Apply))
        .add_systems(Update, update_tank_visuals.in_set(UpdateSet::Visuals));
    }
}

/// Corner spawn for a player number, matching its quadrant on screen.
pub(crate) fn spawn_point(number: u32) -> ArenaVec3 {
    let corner = (ARENA_HALF_EXTENT * 0.8) as f64;
    let x = if number % 2 == 0 { corner } else { -corner };
    let z = if number > 2 { -corner } else { corner };
    vec3(x, 0.0, z)
}

/// Face the arena centre from the spawn corner.
fn spawn_heading(number: u32) -> f32 {
    let spawn = spawn_point(number);
    (-spawn.x as f32).atan2(-spawn.z as f32)
}

fn spawn_transform(number: u32) -> Transform {
    let spawn = spawn_point(number);
    Transform::from_translation(arena_to_world(spawn.x, spawn.z).extend(1.0))
        .with_rotation(Quat::from_rotation_z(-spawn_heading(number)))
}

/// Spawn the ECS tank for `number` and return the proxy the session will own.
pub(crate) fn spawn_tank(commands: &mut Commands, number: u32) -> TankProxy {
    let color = color_from_hex(color_from_number(number));
    let entity = commands
        .spawn((
            Tank::new(number),
            Sprite::from_color(color, Vec2::new(TANK_WIDTH, TANK_LENGTH) * PPM),
            spawn_transform(number),
            MatchEntity,
        ))
        .with_children(|parent| {
            parent.spawn((
                Sprite::from_color(
                    color_from_hex(Colors::BARREL),
                    Vec2::new(TANK_WIDTH * 0.25, BARREL_LENGTH) * PPM,
                ),
                Transform::from_xyz(0.0, TANK_LENGTH * 0.5 * PPM, 0.1),
            ));
        })
        .id();
    info!("Tank {} spawned", number);
    TankProxy::new(entity, spawn_point(number))
}

fn drive_tanks(
    time: Res<Time>,
    input: Res<TankInput>,
    mut q_tanks: Query<(&mut Tank, &mut Transform)>,
) {
    let dt = time.delta_secs();
    let limit = ARENA_HALF_EXTENT * PPM;

    for (mut tank, mut transform) in &mut q_tanks {
        tank.reload = (tank.reload - dt).max(0.0);
        if !tank.is_alive() || !tank.control_enabled {
            continue;
        }
        let Some(controls) = input.for_player(tank.number) else {
            continue;
        };

        tank.heading += controls.turn * TANK_TURN_RATE * dt;
        let step = tank.forward() * controls.throttle * TANK_SPEED * PPM * dt;
        let next = transform.translation.truncate() + step;
        transform.translation.x = next.x.clamp(-limit, limit);
        transform.translation.y = next.y.clamp(-limit, limit);
        transform.rotation = Quat::from_rotation_z(-tank.heading);
    }
}

/// Hitscan: the nearest living tank inside the fire cone takes the shell.
fn fire_tanks(input: Res<TankInput>, mut q_tanks: Query<(&mut Tank, &Transform)>) {
    let targets: Vec<(u32, Vec2)> = q_tanks
        .iter()
        .filter(|(tank, _)| tank.is_alive())
        .map(|(tank, transform)| (tank.number, transform.translation.truncate()))
        .collect();

    let mut hits = Vec::new();
    for (mut tank, transform) in &mut q_tanks {
        let firing = input.for_player(tank.number).is_some_and(|c| c.fire);
        if !firing || !tank.is_alive() || !tank.control_enabled || tank.reload > 0.0 {
            continue;
        }
        tank.reload = RELOAD_SECS;

        let origin = transform.translation.truncate();
        let forward = tank.forward();
        let target = targets
            .iter()
            .filter(|(number, _)| *number != tank.number)
            .filter_map(|(number, position)| {
                let offset = *position - origin;
                let distance = offset.length() / PPM;
                let angle = forward.angle_to(offset).abs();
                (distance <= FIRE_RANGE && angle <= FIRE_CONE).then_some((*number, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((number, _)) = target {
            hits.push(number);
        }
    }

    for (mut tank, _) in &mut q_tanks {
        let damage = hits.iter().filter(|n| **n == tank.number).count() as f32 * SHELL_DAMAGE;
        if damage > 0.0 && tank.is_alive() {
            tank.health = (tank.health - damage).max(0.0);
            if !tank.is_alive() {
                info!("Tank {} destroyed", tank.number);
            }
        }
    }
}

fn sync_tanks_to_session(q_tanks: Query<(&Tank, &Transform)>, mut session: ResMut<MatchSession>) {
    for player in session.0.registry_mut().players_mut() {
        let proxy = &mut player.entity;
        if proxy.reset_pending {
            continue;
        }
        if let Ok((tank, transform)) = q_tanks.get(proxy.entity) {
            proxy.alive = tank.is_alive();
            proxy.position = vec3(
                (transform.translation.x / PPM) as f64,
                0.0,
                (transform.translation.y / PPM) as f64,
            );
        }
    }
}

fn apply_session_to_tanks(
    mut q_tanks: Query<(&mut Tank, &mut Transform)>,
    mut session: ResMut<MatchSession>,
) {
    for player in session.0.registry_mut().players_mut() {
        let proxy = &mut player.entity;
        let Ok((mut tank, mut transform)) = q_tanks.get_mut(proxy.entity) else {
            continue;
        };
        if proxy.reset_pending {
            tank.health = STARTING_HEALTH;
            tank.heading = spawn_heading(tank.number);
            tank.reload = 0.0;
            *transform = spawn_transform(tank.number);
            proxy.reset_pending = false;
        }
        tank.control_enabled = proxy.control_enabled;
    }
}

fn update_tank_visuals(mut q_tanks: Query<(&Tank, &mut Sprite), Changed<Tank>>) {
    for (tank, mut sprite) in &mut q_tanks {
        sprite.color = if tank.is_alive() {
            color_from_hex(color_from_number(tank.number))
        } else {
            color_from_hex(Colors::WRECK)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_points_sit_in_player_quadrants() {
        let p1 = spawn_point(1);
        let p4 = spawn_point(4);
        assert!(p1.x < 0.0 && p1.z > 0.0);
        assert!(p4.x > 0.0 && p4.z < 0.0);
    }

    #[test]
    fn spawn_heading_faces_centre() {
        let tank = Tank::new(1);
        let spawn = spawn_point(1);
        let to_centre = Vec2::new(-spawn.x as f32, -spawn.z as f32).normalize();
        assert!(tank.forward().dot(to_centre) > 0.999);
    }
}
