// Window + software drawing.
// 1) `Drawer`: the minifb window the demo host presents frames into, plus
//    pointer/click/key polling.
// 2) `Canvas`: a `Surface` that rasterizes overlay primitives into a
//    `FrameBuffer` (thick antialiased strokes, gradients, rotation).
// 3) A tiny 5x7 bitmap font for the HUD line.

use std::collections::HashMap;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::Error;
use crate::gamma::GammaLut;
use crate::surface::{Paint, Rotation, Surface};
use crate::types::{FrameBuffer, Point, PointerButton, Rect, Rgba};

const BUTTONS: [PointerButton; 3] = [PointerButton::Left, PointerButton::Right, PointerButton::Middle];

fn window_button(button: PointerButton) -> MouseButton {
    match button {
        PointerButton::Left => MouseButton::Left,
        PointerButton::Right => MouseButton::Right,
        PointerButton::Middle => MouseButton::Middle,
    }
}

pub struct Drawer {
    window: Window,
    buttons_down: [bool; 3], // last polled state, for press edges
}

impl Drawer {
    /// Create the overlay window. Frames are capped at `fps`.
    pub fn new(title: &str, width: usize, height: usize, fps: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(fps);
        Ok(Self {
            window,
            buttons_down: [false; 3],
        })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Pointer position in window pixels, `None` while it is outside the window.
    pub fn mouse_pos(&self) -> Option<Point> {
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| Point::new(x as i32, y as i32))
    }

    pub fn key_pressed_once(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    /// Buttons that went down since the last call. A held button clicks once.
    pub fn poll_clicks(&mut self) -> Vec<PointerButton> {
        let mut pressed = Vec::new();
        for (i, button) in BUTTONS.into_iter().enumerate() {
            let down = self.window.get_mouse_down(window_button(button));
            if down && !self.buttons_down[i] {
                pressed.push(button);
            }
            self.buttons_down[i] = down;
        }
        pressed
    }
}

/* ---------- Canvas: software Surface over a FrameBuffer ---------- */

/// Segments used to flatten one quadratic curve.
const QUAD_STEPS: usize = 16;
/// Degrees per flattened arc segment.
const ARC_STEP_DEG: f32 = 3.0;

pub struct Canvas<'a> {
    fb: &'a mut FrameBuffer,
    lut: &'static GammaLut,
    paint: Paint,
    stroke_width: f32,
    antialias: bool,
    rotation: Option<Rotation>,
    // Per-primitive coverage: pixel index -> (coverage, color). Overlapping
    // stamps of one stroke keep the max so translucent lines don't darken
    // where they overlap themselves.
    mask: HashMap<usize, (f32, Rgba)>,
}

impl<'a> Canvas<'a> {
    pub fn new(fb: &'a mut FrameBuffer) -> Self {
        Self {
            fb,
            lut: GammaLut::shared(),
            paint: Paint::default(),
            stroke_width: 1.0,
            antialias: false,
            rotation: None,
            mask: HashMap::new(),
        }
    }

    fn to_device(&self, x: f32, y: f32) -> (f32, f32) {
        match self.rotation {
            Some(rot) => rot.apply(x, y),
            None => (x, y),
        }
    }

    fn to_user(&self, x: f32, y: f32) -> (f32, f32) {
        match self.rotation {
            Some(rot) => rot.invert().apply(x, y),
            None => (x, y),
        }
    }

    fn cover(&mut self, x: i32, y: i32, coverage: f32, color: Rgba) {
        if coverage <= 0.0 {
            return;
        }
        let Some(idx) = self.fb.index(x, y) else { return };
        let slot = self.mask.entry(idx).or_insert((0.0, color));
        if coverage > slot.0 {
            *slot = (coverage, color);
        }
    }

    /// Blend the accumulated mask into the frame and reset it.
    fn flush(&mut self) {
        for (idx, (coverage, color)) in self.mask.drain() {
            self.fb.pixels[idx] = self.lut.blend(self.fb.pixels[idx], color, coverage);
        }
    }

    /// Round pen stamp of the current stroke width centred on a device pixel.
    fn stamp(&mut self, px: i32, py: i32) {
        let (ux, uy) = self.to_user(px as f32, py as f32);
        let color = self.paint.color_at(ux, uy);
        let r = (self.stroke_width / 2.0).max(0.5);
        let reach = r.ceil() as i32 + 1;
        for y in (py - reach)..=(py + reach) {
            for x in (px - reach)..=(px + reach) {
                let d = (((x - px) * (x - px) + (y - py) * (y - py)) as f32).sqrt();
                let coverage = if self.antialias {
                    (r + 0.5 - d).clamp(0.0, 1.0)
                } else if d <= r {
                    1.0
                } else {
                    0.0
                };
                self.cover(x, y, coverage, color);
            }
        }
    }

    /// Walk the pixels between two device points with Bresenham, stamping each.
    fn stroke_segment(&mut self, from: (f32, f32), to: (f32, f32)) {
        let (mut x0, mut y0) = (from.0.round() as i32, from.1.round() as i32);
        let (x1, y1) = (to.0.round() as i32, to.1.round() as i32);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.stamp(x0, y0);
            if x0 == x1 && y0 == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x0 += sx; }
            if e2 <= dx { err += dx; y0 += sy; }
        }
    }

    /// Stroke a user-space polyline as one primitive.
    fn stroke_polyline(&mut self, points: &[(f32, f32)]) {
        let device: Vec<(f32, f32)> = points.iter().map(|&(x, y)| self.to_device(x, y)).collect();
        for pair in device.windows(2) {
            self.stroke_segment(pair[0], pair[1]);
        }
        if device.len() == 1 {
            self.stroke_segment(device[0], device[0]);
        }
        self.flush();
    }
}

impl Surface for Canvas<'_> {
    fn set_antialias(&mut self, on: bool) {
        self.antialias = on;
    }

    fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = width.max(0.0);
    }

    fn set_paint(&mut self, paint: Paint) {
        self.paint = paint;
    }

    fn set_rotation(&mut self, rotation: Option<Rotation>) {
        self.rotation = rotation;
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.stroke_polyline(&[(x0 as f32, y0 as f32), (x1 as f32, y1 as f32)]);
    }

    fn draw_arc(&mut self, bounds: Rect, start_deg: i32, sweep_deg: i32) {
        if bounds.w <= 0 || bounds.h <= 0 || sweep_deg == 0 {
            return;
        }
        let (cx, cy) = bounds.center();
        let (rx, ry) = (bounds.w as f32 / 2.0, bounds.h as f32 / 2.0);
        let sweep = (sweep_deg as f32).clamp(-360.0, 360.0);
        let steps = ((sweep.abs() / ARC_STEP_DEG).ceil() as usize).max(1);
        let points: Vec<(f32, f32)> = (0..=steps)
            .map(|i| {
                let theta = (start_deg as f32 + sweep * i as f32 / steps as f32).to_radians();
                // counter-clockwise on screen, so y flips
                (cx + rx * theta.cos(), cy - ry * theta.sin())
            })
            .collect();
        self.stroke_polyline(&points);
    }

    fn draw_oval(&mut self, bounds: Rect) {
        self.draw_arc(bounds, 0, 360);
    }

    fn fill_oval(&mut self, bounds: Rect) {
        if bounds.w <= 0 || bounds.h <= 0 {
            return;
        }
        let (cx, cy) = bounds.center();
        let (rx, ry) = (bounds.w as f32 / 2.0, bounds.h as f32 / 2.0);

        // Device-space bounding box of the (possibly rotated) oval.
        let corners = [
            self.to_device(bounds.x as f32, bounds.y as f32),
            self.to_device((bounds.x + bounds.w) as f32, bounds.y as f32),
            self.to_device(bounds.x as f32, (bounds.y + bounds.h) as f32),
            self.to_device((bounds.x + bounds.w) as f32, (bounds.y + bounds.h) as f32),
        ];
        let min_x = corners.iter().map(|c| c.0).fold(f32::INFINITY, f32::min).floor() as i32;
        let max_x = corners.iter().map(|c| c.0).fold(f32::NEG_INFINITY, f32::max).ceil() as i32;
        let min_y = corners.iter().map(|c| c.1).fold(f32::INFINITY, f32::min).floor() as i32;
        let max_y = corners.iter().map(|c| c.1).fold(f32::NEG_INFINITY, f32::max).ceil() as i32;

        let edge = rx.min(ry);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let (ux, uy) = self.to_user(x as f32 + 0.5, y as f32 + 0.5);
                let (ex, ey) = ((ux - cx) / rx, (uy - cy) / ry);
                let d = (ex * ex + ey * ey).sqrt();
                let coverage = if self.antialias {
                    ((1.0 - d) * edge + 0.5).clamp(0.0, 1.0)
                } else if d <= 1.0 {
                    1.0
                } else {
                    0.0
                };
                let color = self.paint.color_at(ux, uy);
                self.cover(x, y, coverage, color);
            }
        }
        self.flush();
    }

    fn draw_quad(&mut self, from: (f32, f32), ctrl: (f32, f32), to: (f32, f32)) {
        let points: Vec<(f32, f32)> = (0..=QUAD_STEPS)
            .map(|i| {
                let t = i as f32 / QUAD_STEPS as f32;
                let u = 1.0 - t;
                (
                    u * u * from.0 + 2.0 * u * t * ctrl.0 + t * t * to.0,
                    u * u * from.1 + 2.0 * u * t * ctrl.1 + t * t * to.1,
                )
            })
            .collect();
        self.stroke_polyline(&points);
    }
}

/* ---------- HUD: pixels + tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if let Some(idx) = fb.index(x, y) {
        fb.pixels[idx] = color;
    }
}

/// Return a 5x7 glyph bitmap for the characters the HUD uses.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Letters in the style names, "FPS" and the key hints
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    let Some(rows) = glyph5x7(ch) else { return };
    for (offset, c) in [(1, 0x00000000), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx + offset, y + ry as i32 + offset, c);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs, 1-pixel spacing.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: Rgba) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color.to_rgb_u32());
        x += 6;
    }
}
