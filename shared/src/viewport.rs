//! Normalized viewport rectangles.
//!
//! Rects live in `[0,1]²` with the origin at the bottom-left corner of the
//! screen, which is the convention the layout rules are written in.
//! Front-ends convert to pixel rects with [`ViewportRect::to_physical`].

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportRect {
    fn default() -> Self {
        Self::FULL
    }
}

impl ViewportRect {
    pub const FULL: ViewportRect = ViewportRect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Fixed quadrant for a player number: odd numbers on the left, even on
    /// the right, 1 and 2 on top, 3 and 4 at the bottom.
    pub fn quadrant(number: u32) -> Self {
        let x = if number % 2 == 0 { 0.5 } else { 0.0 };
        let y = if number > 2 { 0.0 } else { 0.5 };
        Self::new(x, y, 0.5, 0.5)
    }

    /// Two-player split: (top-left rect, bottom-right rect).
    ///
    /// Each half is `1/aspect` wide so the view keeps a square-ish shape on
    /// wide screens. On portrait screens the width saturates at 1.
    pub fn two_player_split(aspect: f64) -> (Self, Self) {
        let width = if aspect.is_finite() && aspect > 1.0 {
            1.0 / aspect
        } else {
            1.0
        };
        (
            Self::new(0.0, 0.5, width, 0.5),
            Self::new(1.0 - width, 0.0, width, 0.5),
        )
    }

    /// Convert to a pixel rect with a top-left origin, clamped to the target.
    pub fn to_physical(&self, target_width: u32, target_height: u32) -> PhysicalViewport {
        let tw = target_width as f64;
        let th = target_height as f64;

        let x = (self.x.clamp(0.0, 1.0) * tw).round() as u32;
        let top = ((1.0 - self.y - self.height).clamp(0.0, 1.0) * th).round() as u32;
        let x = x.min(target_width.saturating_sub(1));
        let top = top.min(target_height.saturating_sub(1));

        let width = ((self.width.clamp(0.0, 1.0) * tw).round() as u32)
            .clamp(1, target_width.saturating_sub(x).max(1));
        let height = ((self.height.clamp(0.0, 1.0) * th).round() as u32)
            .clamp(1, target_height.saturating_sub(top).max(1));

        PhysicalViewport {
            x,
            y: top,
            width,
            height,
        }
    }
}

/// Pixel viewport with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalViewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadrants_follow_player_number() {
        assert_eq!(ViewportRect::quadrant(1), ViewportRect::new(0.0, 0.5, 0.5, 0.5));
        assert_eq!(ViewportRect::quadrant(2), ViewportRect::new(0.5, 0.5, 0.5, 0.5));
        assert_eq!(ViewportRect::quadrant(3), ViewportRect::new(0.0, 0.0, 0.5, 0.5));
        assert_eq!(ViewportRect::quadrant(4), ViewportRect::new(0.5, 0.0, 0.5, 0.5));
    }

    #[test]
    fn two_player_split_uses_inverse_aspect() {
        let (top, bottom) = ViewportRect::two_player_split(2.0);
        assert_eq!(top, ViewportRect::new(0.0, 0.5, 0.5, 0.5));
        assert_eq!(bottom, ViewportRect::new(0.5, 0.0, 0.5, 0.5));
    }

    #[test]
    fn two_player_split_on_portrait_is_full_width() {
        let (top, bottom) = ViewportRect::two_player_split(0.75);
        assert_eq!(top.width, 1.0);
        assert_eq!(bottom.x, 0.0);
    }

    #[test]
    fn physical_flips_to_top_left_origin() {
        let top_left = ViewportRect::quadrant(1).to_physical(1600, 900);
        assert_eq!(
            top_left,
            PhysicalViewport {
                x: 0,
                y: 0,
                width: 800,
                height: 450
            }
        );

        let bottom_right = ViewportRect::quadrant(4).to_physical(1600, 900);
        assert_eq!(
            bottom_right,
            PhysicalViewport {
                x: 800,
                y: 450,
                width: 800,
                height: 450
            }
        );
    }

    #[test]
    fn physical_never_exceeds_target() {
        let rect = ViewportRect::new(0.9, 0.0, 0.5, 1.5);
        let p = rect.to_physical(100, 100);
        assert!(p.x + p.width <= 100);
        assert!(p.y + p.height <= 100);
        assert!(p.width >= 1 && p.height >= 1);
    }
}
