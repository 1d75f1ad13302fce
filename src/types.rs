// Core value types shared by the trail, ripples, cursor paints and the canvas.

use serde::{Deserialize, Serialize};

/// Integer screen coordinate (pixels, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Float copy, for curve control points and gradient anchors.
    pub fn to_f32(self) -> (f32, f32) {
        (self.x as f32, self.y as f32)
    }
}

/// Axis-aligned bounding box of an oval or arc, like AWT's `(x, y, w, h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Square box of side `2 * radius` centred on `center`.
    pub fn around(center: Point, radius: i32) -> Self {
        Self::new(center.x - radius, center.y - radius, 2 * radius, 2 * radius)
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.w as f32 / 2.0,
            self.y as f32 + self.h as f32 / 2.0,
        )
    }
}

/// Which button produced a click. Only carried for logging; every button ripples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// Straight (non-premultiplied) RGBA color with named channels.
///
/// Serialized as `[r, g, b]` or `[r, g, b, a]`; a missing alpha means opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color, alpha replaced. Out-of-range alpha is clamped to `[0, 255]`.
    pub fn with_alpha(self, alpha: i32) -> Self {
        Self {
            a: alpha.clamp(0, 255) as u8,
            ..self
        }
    }

    /// Channel-wise linear interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// 0x00RRGGBB, the layout minifb presents. Alpha is dropped here.
    pub fn to_rgb_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub fn from_rgb_u32(px: u32) -> Self {
        Self::rgb(
            ((px >> 16) & 0xFF) as u8,
            ((px >> 8) & 0xFF) as u8,
            (px & 0xFF) as u8,
        )
    }
}

impl TryFrom<Vec<u8>> for Rgba {
    type Error = String;

    fn try_from(v: Vec<u8>) -> Result<Self, Self::Error> {
        match v.as_slice() {
            [r, g, b] => Ok(Rgba::rgb(*r, *g, *b)),
            [r, g, b, a] => Ok(Rgba::new(*r, *g, *b, *a)),
            other => Err(format!(
                "color needs 3 or 4 channels, got {}",
                other.len()
            )),
        }
    }
}

impl From<Rgba> for Vec<u8> {
    fn from(c: Rgba) -> Self {
        if c.a == 255 {
            vec![c.r, c.g, c.b]
        } else {
            vec![c.r, c.g, c.b, c.a]
        }
    }
}

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u32; width * height],
        }
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color.to_rgb_u32());
    }

    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub(crate) fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Write the frame as an RGB PNG (or any format `image` infers from the extension).
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let mut raw = Vec::with_capacity(self.pixels.len() * 3);
        for &px in &self.pixels {
            let c = Rgba::from_rgb_u32(px);
            raw.extend_from_slice(&[c.r, c.g, c.b]);
        }
        let img = image::RgbImage::from_raw(self.width as u32, self.height as u32, raw)
            .ok_or_else(|| {
                crate::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "frame buffer size does not match its dimensions",
                ))
            })?;
        img.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_alpha_clamps() {
        assert_eq!(Rgba::WHITE.with_alpha(-20).a, 0);
        assert_eq!(Rgba::WHITE.with_alpha(300).a, 255);
        assert_eq!(Rgba::WHITE.with_alpha(100).a, 100);
    }

    #[test]
    fn test_lerp_midpoint() {
        let c = Rgba::new(0, 0, 0, 0).lerp(Rgba::new(200, 100, 50, 255), 0.5);
        assert_eq!(c, Rgba::new(100, 50, 25, 128));
    }

    #[test]
    fn test_rgb_u32_packing() {
        let c = Rgba::rgb(0x12, 0x34, 0x56);
        assert_eq!(c.to_rgb_u32(), 0x0012_3456);
        assert_eq!(Rgba::from_rgb_u32(0x0012_3456), c);
    }

    #[test]
    fn test_color_from_channel_list() {
        assert_eq!(Rgba::try_from(vec![1, 2, 3]), Ok(Rgba::rgb(1, 2, 3)));
        assert_eq!(Rgba::try_from(vec![1, 2, 3, 4]), Ok(Rgba::new(1, 2, 3, 4)));
        assert!(Rgba::try_from(vec![1, 2]).is_err());
    }

    #[test]
    fn test_frame_buffer_bounds() {
        let fb = FrameBuffer::new(4, 3);
        assert_eq!(fb.get(3, 2), Some(0));
        assert_eq!(fb.get(4, 0), None);
        assert_eq!(fb.get(-1, 0), None);
    }
}
