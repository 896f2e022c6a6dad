//! ECS side of the split-screen layout.
//!
//! Camera orders: background -1, merge 0, players 1..=4, spectator 5, HUD 10.
//! Player and spectator cameras clear only their own viewport.

use arena_shared::ViewportRect;
use bevy::camera::visibility::RenderLayers;
use bevy::camera::{ClearColorConfig, Viewport};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::{color_from_hex, Colors, ARENA_HALF_EXTENT, PPM};

use super::core::{ArenaState, MatchEntity, UpdateSet};
use super::proxies::{CameraProxy, MatchSession};
use super::tanks::Tank;

pub struct CamerasPlugin;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArenaCamera {
    Player(u32),
    Spectator,
    Merge,
}

/// Orthographic scale of the full-screen merge view
const MERGE_SCALE: f32 = 1.4;

impl Plugin for CamerasPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (track_window_size, apply_camera_proxies, follow_tanks)
                .chain()
                .in_set(UpdateSet::Cameras)
                .run_if(in_state(ArenaState::Match).and(resource_exists::<MatchSession>)),
        );
    }
}

fn clear_viewport() -> ClearColorConfig {
    ClearColorConfig::Custom(color_from_hex(Colors::BACKGROUND))
}

fn ortho(scale: f32) -> Projection {
    Projection::from(OrthographicProjection {
        scale,
        ..OrthographicProjection::default_2d()
    })
}

pub(crate) fn spawn_player_camera(commands: &mut Commands, number: u32) -> CameraProxy {
    let entity = commands
        .spawn((
            Camera2d,
            Camera {
                order: number as isize,
                is_active: false,
                clear_color: clear_viewport(),
                ..default()
            },
            RenderLayers::layer(0),
            ArenaCamera::Player(number),
            MatchEntity,
        ))
        .id();
    CameraProxy::new(entity)
}

/// Whole-arena view that fills the empty quadrant.
pub(crate) fn spawn_spectator_camera(commands: &mut Commands) -> CameraProxy {
    let entity = commands
        .spawn((
            Camera2d,
            Camera {
                order: 5,
                is_active: false,
                clear_color: clear_viewport(),
                ..default()
            },
            // Zoomed out far enough to show the arena in a quadrant of a 1080p screen
            ortho(ARENA_HALF_EXTENT * 2.2 * PPM / 540.0),
            RenderLayers::layer(0),
            ArenaCamera::Spectator,
            MatchEntity,
        ))
        .id();
    CameraProxy::new(entity)
}

pub(crate) fn spawn_merge_camera(commands: &mut Commands) -> CameraProxy {
    let entity = commands
        .spawn((
            Camera2d,
            Camera {
                order: 0,
                is_active: false,
                ..default()
            },
            ortho(MERGE_SCALE),
            RenderLayers::layer(0),
            ArenaCamera::Merge,
            MatchEntity,
        ))
        .id();
    CameraProxy::new(entity)
}

/// Render layers for a culling mask: bit `n` enables layer `n`.
pub(crate) fn layers_from_mask(mask: u32) -> RenderLayers {
    let layers: Vec<usize> = (0..32).filter(|bit| mask & (1 << bit) != 0).collect();
    RenderLayers::from_layers(&layers)
}

fn track_window_size(
    q_window: Query<&Window, With<PrimaryWindow>>,
    mut last_size: Local<UVec2>,
    mut session: ResMut<MatchSession>,
) {
    let Ok(window) = q_window.single() else {
        return;
    };
    let size = window.physical_size();
    if size == *last_size || size.x == 0 || size.y == 0 {
        return;
    }
    *last_size = size;
    session.0.set_screen_size(size.x as f64, size.y as f64);

    // Physical rects depend on the window, so every camera is rewritten
    for player in session.0.registry_mut().players_mut() {
        if let Some(proxy) = player.camera.handle_mut() {
            proxy.dirty = true;
        }
    }
    let layout = session.0.layout_mut();
    if let Some(proxy) = layout.spectator_camera_mut() {
        proxy.dirty = true;
    }
    if let Some(proxy) = layout.merge_camera_mut() {
        proxy.dirty = true;
    }
}

fn apply_camera_proxies(
    q_window: Query<&Window, With<PrimaryWindow>>,
    mut q_cameras: Query<(&mut Camera, &mut RenderLayers), With<ArenaCamera>>,
    mut session: ResMut<MatchSession>,
) {
    let Ok(window) = q_window.single() else {
        return;
    };
    let size = window.physical_size();
    if size.x == 0 || size.y == 0 {
        return;
    }

    for player in session.0.registry_mut().players_mut() {
        if let Some(proxy) = player.camera.handle_mut() {
            apply_proxy(proxy, &mut q_cameras, size);
        }
    }
    let layout = session.0.layout_mut();
    if let Some(proxy) = layout.spectator_camera_mut() {
        apply_proxy(proxy, &mut q_cameras, size);
    }
    if let Some(proxy) = layout.merge_camera_mut() {
        apply_proxy(proxy, &mut q_cameras, size);
    }
}

fn apply_proxy(
    proxy: &mut CameraProxy,
    q_cameras: &mut Query<(&mut Camera, &mut RenderLayers), With<ArenaCamera>>,
    window_size: UVec2,
) {
    if !proxy.dirty {
        return;
    }
    let Ok((mut camera, mut layers)) = q_cameras.get_mut(proxy.entity) else {
        // Spawned this frame; commands not applied yet
        return;
    };
    camera.is_active = proxy.active;
    camera.viewport = Some(to_viewport(proxy.rect, window_size));
    *layers = layers_from_mask(proxy.culling_mask);
    proxy.dirty = false;
}

fn to_viewport(rect: ViewportRect, window_size: UVec2) -> Viewport {
    let physical = rect.to_physical(window_size.x, window_size.y);
    Viewport {
        physical_position: UVec2::new(physical.x, physical.y),
        physical_size: UVec2::new(physical.width, physical.height),
        ..default()
    }
}

fn follow_tanks(
    q_tanks: Query<(&Tank, &Transform), Without<ArenaCamera>>,
    mut q_cameras: Query<(&ArenaCamera, &mut Transform), Without<Tank>>,
) {
    let alive: Vec<Vec2> = q_tanks
        .iter()
        .filter(|(tank, _)| tank.is_alive())
        .map(|(_, transform)| transform.translation.truncate())
        .collect();
    let centre = if alive.is_empty() {
        Vec2::ZERO
    } else {
        alive.iter().copied().sum::<Vec2>() / alive.len() as f32
    };

    for (role, mut transform) in &mut q_cameras {
        let target = match role {
            ArenaCamera::Player(number) => q_tanks
                .iter()
                .find(|(tank, _)| tank.number == *number)
                .map(|(_, t)| t.translation.truncate()),
            ArenaCamera::Merge => Some(centre),
            ArenaCamera::Spectator => Some(Vec2::ZERO),
        };
        if let Some(target) = target {
            transform.translation.x = target.x;
            transform.translation.y = target.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_bits_become_layers() {
        assert_eq!(layers_from_mask(1), RenderLayers::layer(0));
        assert_eq!(layers_from_mask(0), RenderLayers::none());
        assert_eq!(layers_from_mask(0b101), RenderLayers::from_layers(&[0, 2]));
    }

    #[test]
    fn viewport_uses_top_left_origin() {
        let viewport = to_viewport(ViewportRect::quadrant(3), UVec2::new(1920, 1080));
        assert_eq!(viewport.physical_position, UVec2::new(0, 540));
        assert_eq!(viewport.physical_size, UVec2::new(960, 540));
    }
}
