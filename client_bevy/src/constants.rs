/// Pixels per arena metre at camera scale 1.
pub const PPM: f32 = 12.0;

/// Arena spans `-ARENA_HALF_EXTENT..=ARENA_HALF_EXTENT` metres on x and z.
pub const ARENA_HALF_EXTENT: f32 = 25.0;

pub const TANK_LENGTH: f32 = 2.4;
pub const TANK_WIDTH: f32 = 1.6;
pub const BARREL_LENGTH: f32 = 1.6;

/// Metres per second
pub const TANK_SPEED: f32 = 8.0;
/// Radians per second
pub const TANK_TURN_RATE: f32 = 2.6;

pub const STARTING_HEALTH: f32 = 100.0;
pub const SHELL_DAMAGE: f32 = 25.0;
pub const FIRE_RANGE: f32 = 30.0;
/// Half-angle of the hit cone in radians
pub const FIRE_CONE: f32 = 0.12;
pub const RELOAD_SECS: f32 = 0.6;

/// Fixed simulation step; the match core ticks at this rate.
pub const FIXED_DT: f64 = 1.0 / 50.0;

#[derive(Clone, Copy)]
pub struct Colors;

impl Colors {
    pub const BACKGROUND: u32 = 0x101418;
    pub const ARENA_FLOOR: u32 = 0x2b3a2e;
    pub const BARREL: u32 = 0x202020;
    pub const WRECK: u32 = 0x3a3a3a;
    pub const MESSAGE: u32 = 0xf0f0f0;
    pub const UI_DIM: u32 = 0x9aa5a0;
}

pub fn color_from_hex(rgb: u32) -> bevy::prelude::Color {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    bevy::prelude::Color::srgb(r, g, b)
}

/// Arena position (x, z in metres) to a 2D world translation in pixels.
/// The arena's +z points up the screen.
pub fn arena_to_world(x: f64, z: f64) -> bevy::prelude::Vec2 {
    bevy::prelude::Vec2::new(x as f32 * PPM, z as f32 * PPM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_from_hex_parses_correctly() {
        let c = color_from_hex(0xFF8040);
        // Color::srgb returns Srgba, check the components
        if let bevy::prelude::Color::Srgba(srgba) = c {
            assert!((srgba.red - 1.0).abs() < 1e-3);
            assert!((srgba.green - 0.502).abs() < 1e-2);
            assert!((srgba.blue - 0.251).abs() < 1e-2);
        } else {
            panic!("Expected Srgba color variant");
        }
    }

    #[test]
    fn arena_to_world_scales_by_ppm() {
        let p = arena_to_world(-2.0, 3.0);
        assert_eq!(p.x, -2.0 * PPM);
        assert_eq!(p.y, 3.0 * PPM);
    }
}
