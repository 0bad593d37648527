//! 8-bit HSV conversion.
//!
//! Hue is stored as degrees / 2 so it fits a byte (0..=179); saturation and
//! value span 0..=255.

use rgb::RGB8;

/// Number of hue levels in the 8-bit encoding.
pub const HUE_LEVELS: usize = 180;

/// Color space the per-channel clustering runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    /// Cluster red, green and blue directly.
    #[default]
    Rgb,
    /// Cluster hue, saturation and value. Flat hue bands tend to look more
    /// like hand-painted fills than RGB bands.
    Hsv,
}

impl ColorSpace {
    /// Histogram level count for each of the three channels.
    pub fn levels(self) -> [usize; 3] {
        match self {
            Self::Rgb => [256, 256, 256],
            Self::Hsv => [HUE_LEVELS, 256, 256],
        }
    }

    /// Convert an RGB pixel into this space as three channel bytes.
    pub fn encode(self, pixel: RGB8) -> [u8; 3] {
        match self {
            Self::Rgb => [pixel.r, pixel.g, pixel.b],
            Self::Hsv => rgb_to_hsv(pixel),
        }
    }

    /// Inverse of [`encode`](Self::encode).
    pub fn decode(self, channels: [u8; 3]) -> RGB8 {
        match self {
            Self::Rgb => RGB8::new(channels[0], channels[1], channels[2]),
            Self::Hsv => hsv_to_rgb(channels),
        }
    }
}

/// Convert an RGB pixel to `[h, s, v]`.
pub fn rgb_to_hsv(pixel: RGB8) -> [u8; 3] {
    let (r, g, b) = (pixel.r as f32, pixel.g as f32, pixel.b as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;

    let s = if max > 0.0 { 255.0 * diff / max } else { 0.0 };

    let degrees = if diff == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / diff
    } else if max == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    let degrees = if degrees < 0.0 { degrees + 360.0 } else { degrees };
    let h = (degrees / 2.0).round() as u32 % HUE_LEVELS as u32;

    [h as u8, s.round() as u8, max as u8]
}

/// Convert `[h, s, v]` back to RGB. Hue values past 179 wrap around.
pub fn hsv_to_rgb(hsv: [u8; 3]) -> RGB8 {
    let h = (hsv[0] as f32 * 2.0) % 360.0;
    let s = hsv[1] as f32 / 255.0;
    let v = hsv[2] as f32;

    let sector = h / 60.0;
    let f = sector - sector.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    RGB8::new(to_byte(r), to_byte(g), to_byte(b))
}

fn to_byte(c: f32) -> u8 {
    c.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries() {
        assert_eq!(rgb_to_hsv(RGB8::new(255, 0, 0)), [0, 255, 255]);
        assert_eq!(rgb_to_hsv(RGB8::new(0, 255, 0)), [60, 255, 255]);
        assert_eq!(rgb_to_hsv(RGB8::new(0, 0, 255)), [120, 255, 255]);
        assert_eq!(hsv_to_rgb([60, 255, 255]), RGB8::new(0, 255, 0));
        assert_eq!(hsv_to_rgb([120, 255, 255]), RGB8::new(0, 0, 255));
    }

    #[test]
    fn grays_have_no_hue_or_saturation() {
        assert_eq!(rgb_to_hsv(RGB8::new(0, 0, 0)), [0, 0, 0]);
        assert_eq!(rgb_to_hsv(RGB8::new(90, 90, 90)), [0, 0, 90]);
        assert_eq!(hsv_to_rgb([37, 0, 90]), RGB8::new(90, 90, 90));
    }

    #[test]
    fn hue_stays_below_180() {
        // Magenta-leaning red lands just under 360 degrees
        let [h, _, _] = rgb_to_hsv(RGB8::new(255, 0, 1));
        assert!(h < 180, "h {h}");
    }

    #[test]
    fn hsv_is_close_to_lossless() {
        for &(r, g, b) in &[(200, 120, 40), (12, 180, 90), (70, 70, 220), (255, 255, 0)] {
            let back = hsv_to_rgb(rgb_to_hsv(RGB8::new(r, g, b)));
            assert!(back.r.abs_diff(r) <= 3, "{r},{g},{b} -> {back:?}");
            assert!(back.g.abs_diff(g) <= 3, "{r},{g},{b} -> {back:?}");
            assert!(back.b.abs_diff(b) <= 3, "{r},{g},{b} -> {back:?}");
        }
    }

    #[test]
    fn rgb_space_is_identity() {
        let px = RGB8::new(1, 2, 3);
        assert_eq!(ColorSpace::Rgb.encode(px), [1, 2, 3]);
        assert_eq!(ColorSpace::Rgb.decode([1, 2, 3]), px);
        assert_eq!(ColorSpace::Hsv.levels(), [180, 256, 256]);
    }
}
