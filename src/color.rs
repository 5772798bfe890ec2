//! 8-bit RGB colors and the fixed game palette

use serde::{Deserialize, Serialize};

/// An opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized RGBA for vertex colors
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha,
        ]
    }
}

/// Channel-wise linear interpolation from `a` to `b`.
///
/// Each channel is truncated toward zero, so `t` just below 1.0 never quite
/// reaches `b` on channels that differ by more than one step.
pub fn lerp_color(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let lerp = |c1: u8, c2: u8| {
        let v = c1 as f32 + (c2 as f32 - c1 as f32) * t;
        v.clamp(0.0, 255.0) as u8
    };
    Rgb::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b))
}

/// Fixed colors for everything that isn't weather
pub mod palette {
    use super::Rgb;

    pub const BIRD: Rgb = Rgb::new(0, 0, 0);
    pub const PIPE: Rgb = Rgb::new(0, 200, 0);
    pub const SHIELD_RING: Rgb = Rgb::new(0, 255, 255);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb::new(135, 206, 235);
        let b = Rgb::new(252, 100, 45);
        assert_eq!(lerp_color(a, b, 0.0), a);
        assert_eq!(lerp_color(a, b, 1.0), b);
    }

    #[test]
    fn test_lerp_truncates() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(10, 10, 10);
        // 0 + 10 * 0.99 = 9.9 -> 9
        assert_eq!(lerp_color(a, b, 0.99), Rgb::new(9, 9, 9));
    }

    #[test]
    fn test_to_rgba() {
        let c = Rgb::new(255, 0, 51);
        let rgba = c.to_rgba(0.5);
        assert_eq!(rgba[0], 1.0);
        assert_eq!(rgba[1], 0.0);
        assert!((rgba[2] - 0.2).abs() < 1e-6);
        assert_eq!(rgba[3], 0.5);
    }

    proptest! {
        #[test]
        fn lerp_stays_between_endpoints(
            a in any::<(u8, u8, u8)>(),
            b in any::<(u8, u8, u8)>(),
            t in 0.0f32..1.0,
        ) {
            let a = Rgb::new(a.0, a.1, a.2);
            let b = Rgb::new(b.0, b.1, b.2);
            let c = lerp_color(a, b, t);
            for (lo, hi, v) in [(a.r, b.r, c.r), (a.g, b.g, c.g), (a.b, b.b, c.b)] {
                prop_assert!(v >= lo.min(hi) && v <= lo.max(hi));
            }
        }
    }
}
