//! Named color palettes for the robot view.
//!
//! Two complete palettes exist: the standard one (dark robot on white) and an
//! inverted one for dark displays. A renderer picks one at construction and
//! never switches colors per shape.

use image::Rgb;
use palette::Srgb;

/// Which palette a renderer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteKind {
    #[default]
    Standard,
    Inverted,
}

impl PaletteKind {
    pub fn from_inverted(invert_colors: bool) -> Self {
        if invert_colors { Self::Inverted } else { Self::Standard }
    }
}

/// Every color the scene uses, by role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPalette {
    pub background: Srgb<u8>,
    pub backbone: Srgb<u8>,
    pub rod: Srgb<u8>,
    pub platform: Srgb<u8>,
    pub end_effector: Srgb<u8>,
    pub setpoint: Srgb<u8>,
    pub attractor: Srgb<u8>,
    pub workspace_background: Srgb<u8>,
    pub workspace_boundary: Srgb<u8>,
    pub active_axis: Srgb<u8>,
}

const WHITE: Srgb<u8> = Srgb::new(255, 255, 255);
const BLACK: Srgb<u8> = Srgb::new(0, 0, 0);
const BLUE: Srgb<u8> = Srgb::new(0, 0, 255);
const RED: Srgb<u8> = Srgb::new(255, 0, 0);

impl ColorPalette {
    /// Dark robot on a white background.
    pub const fn standard() -> Self {
        Self {
            background: WHITE,
            backbone: BLUE,
            rod: BLACK,
            platform: BLACK,
            end_effector: BLUE,
            setpoint: RED,
            attractor: Srgb::new(0, 255, 0),
            workspace_background: Srgb::new(160, 160, 160),
            workspace_boundary: BLACK,
            active_axis: BLACK,
        }
    }

    /// Blue robot on a black background.
    pub const fn inverted() -> Self {
        Self {
            background: BLACK,
            backbone: BLUE,
            rod: BLUE,
            platform: BLUE,
            end_effector: WHITE,
            setpoint: RED,
            attractor: Srgb::new(3, 128, 82),
            workspace_background: Srgb::new(70, 70, 70),
            workspace_boundary: WHITE,
            active_axis: WHITE,
        }
    }

    pub const fn of_kind(kind: PaletteKind) -> Self {
        match kind {
            PaletteKind::Standard => Self::standard(),
            PaletteKind::Inverted => Self::inverted(),
        }
    }
}

/// Convert a palette entry to an image pixel.
pub fn pixel(color: Srgb<u8>) -> Rgb<u8> {
    Rgb([color.red, color.green, color.blue])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backgrounds_are_complementary() {
        let a = ColorPalette::standard().background;
        let b = ColorPalette::inverted().background;
        assert_eq!(a.red, 255 - b.red);
        assert_eq!(a.green, 255 - b.green);
        assert_eq!(a.blue, 255 - b.blue);
    }

    #[test]
    fn test_kind_selects_palette() {
        assert_eq!(ColorPalette::of_kind(PaletteKind::from_inverted(false)), ColorPalette::standard());
        assert_eq!(ColorPalette::of_kind(PaletteKind::from_inverted(true)), ColorPalette::inverted());
    }

    #[test]
    fn test_markers_stand_out_from_background() {
        for palette in [ColorPalette::standard(), ColorPalette::inverted()] {
            for marker in [palette.rod, palette.setpoint, palette.attractor, palette.end_effector] {
                assert_ne!(marker, palette.background);
            }
        }
    }

    #[test]
    fn test_pixel_keeps_rgb_order() {
        assert_eq!(pixel(RED), Rgb([255, 0, 0]));
    }
}
