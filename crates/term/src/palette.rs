//! Tile and board colours.
//!
//! Pure functions of a tile value; the view decides where to use them.

use crate::fb::Rgb;

pub const BACKGROUND: Rgb = Rgb::new(252, 247, 255);
pub const GRID: Rgb = Rgb::new(149, 125, 173);
pub const EMPTY_CELL: Rgb = Rgb::new(200, 183, 219);
pub const TEXT: Rgb = Rgb::new(75, 0, 130);
pub const WHITE: Rgb = Rgb::new(255, 255, 255);
pub const SELECTED: Rgb = Rgb::new(255, 140, 0);
pub const SPECIAL: Rgb = Rgb::new(0, 191, 255);
pub const TARGET: Rgb = Rgb::new(255, 215, 0);

/// Text darker than this reads better in white.
const WHITE_TEXT_BELOW: u32 = 180;

const TILE_COLORS: [(u32, Rgb); 21] = [
    (2, Rgb::new(255, 229, 180)),
    (4, Rgb::new(255, 191, 134)),
    (8, Rgb::new(255, 153, 102)),
    (16, Rgb::new(255, 94, 91)),
    (32, Rgb::new(255, 64, 129)),
    (64, Rgb::new(224, 64, 251)),
    (100, Rgb::new(180, 70, 255)),
    (128, Rgb::new(124, 77, 255)),
    (200, Rgb::new(100, 90, 255)),
    (256, Rgb::new(83, 109, 254)),
    (300, Rgb::new(50, 130, 255)),
    (400, Rgb::new(20, 170, 255)),
    (500, Rgb::new(0, 200, 255)),
    (512, Rgb::new(0, 176, 255)),
    (600, Rgb::new(0, 210, 210)),
    (700, Rgb::new(0, 230, 180)),
    (800, Rgb::new(20, 240, 160)),
    (1024, Rgb::new(29, 233, 182)),
    (2048, Rgb::new(118, 255, 122)),
    (4096, Rgb::new(253, 216, 53)),
    (8192, Rgb::new(255, 171, 64)),
];

/// Background colour of a tile.
///
/// Values missing from the fixed table get a bright HSV colour: the hue
/// follows `log2(value)` above 8192 and `value % 360` below it.
pub fn color_for(value: u32) -> Rgb {
    if let Some(&(_, rgb)) = TILE_COLORS.iter().find(|(v, _)| *v == value) {
        return rgb;
    }

    let hue = if value > 8192 {
        ((value as f32).log2() * 20.0) % 360.0 / 360.0
    } else {
        (value % 360) as f32 / 360.0
    };
    let saturation = 0.7 + (value % 300) as f32 / 1000.0;
    hsv_to_rgb(hue, saturation, 0.9)
}

/// Text colour with enough contrast on `bg`.
pub fn text_color_for(bg: Rgb) -> Rgb {
    if bg.brightness() < WHITE_TEXT_BELOW {
        WHITE
    } else {
        TEXT
    }
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Rgb {
    let h = hue * 6.0;
    let sector = h as u32;
    let f = h - sector as f32;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));

    let (r, g, b) = match sector {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    Rgb::new(byte(r), byte(g), byte(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_values() {
        assert_eq!(color_for(2), Rgb::new(255, 229, 180));
        assert_eq!(color_for(64), Rgb::new(224, 64, 251));
        assert_eq!(color_for(8192), Rgb::new(255, 171, 64));
    }

    #[test]
    fn fallback_small_value_uses_value_hue() {
        // hue 3/360 lands in the red sector
        let c = color_for(3);
        assert_eq!(c.r, 229);
        assert!(c.g > c.b);
    }

    #[test]
    fn fallback_large_value_uses_log_hue() {
        // log2(16384) * 20 = 280 degrees: blue-magenta sector
        let c = color_for(16384);
        assert_eq!(c.b, 229);
        assert!(c.b > c.r && c.r > c.g);
    }

    #[test]
    fn fallback_is_never_black() {
        for v in [3u32, 6, 12, 24, 48, 96, 1000, 16384, 1 << 20, 1 << 31] {
            assert!(color_for(v).brightness() > 0, "value {v}");
        }
    }

    #[test]
    fn text_contrast() {
        assert_eq!(text_color_for(color_for(2)), TEXT);
        assert_eq!(text_color_for(color_for(128)), WHITE);
        assert_eq!(text_color_for(Rgb::new(0, 0, 0)), WHITE);
    }
}
