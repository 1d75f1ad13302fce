// The 2D drawing target the overlay renders into.
//
// Modelled on an AWT-style `Graphics2D`: stateful paint, stroke width,
// antialias hint and an optional rotation, plus a handful of outline and
// fill primitives. `crate::draw::Canvas` rasterizes into a frame buffer;
// `RecordingSurface` only records calls, which is what the tests inspect.

use crate::types::{Rect, Rgba};

/// What strokes and fills are colored with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    /// Acyclic linear gradient: colors before `from` / past `to` hold the end color.
    Linear {
        from: (f32, f32),
        from_color: Rgba,
        to: (f32, f32),
        to_color: Rgba,
    },
}

impl Paint {
    /// Color at user-space position `(x, y)`.
    pub fn color_at(&self, x: f32, y: f32) -> Rgba {
        match *self {
            Paint::Solid(c) => c,
            Paint::Linear {
                from,
                from_color,
                to,
                to_color,
            } => {
                let (dx, dy) = (to.0 - from.0, to.1 - from.1);
                let len2 = dx * dx + dy * dy;
                if len2 <= f32::EPSILON {
                    return from_color;
                }
                let t = ((x - from.0) * dx + (y - from.1) * dy) / len2;
                from_color.lerp(to_color, t)
            }
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid(Rgba::BLACK)
    }
}

/// Rotation of everything drawn afterwards, clockwise on screen, about `pivot`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub degrees: f64,
    pub pivot: (f32, f32),
}

impl Rotation {
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let (s, c) = self.degrees.to_radians().sin_cos();
        let (s, c) = (s as f32, c as f32);
        let (dx, dy) = (x - self.pivot.0, y - self.pivot.1);
        (
            self.pivot.0 + dx * c - dy * s,
            self.pivot.1 + dx * s + dy * c,
        )
    }

    pub fn invert(&self) -> Rotation {
        Rotation {
            degrees: -self.degrees,
            pivot: self.pivot,
        }
    }
}

pub trait Surface {
    fn set_antialias(&mut self, on: bool);
    fn set_stroke_width(&mut self, width: f32);
    fn set_paint(&mut self, paint: Paint);
    /// `None` resets to the identity transform.
    fn set_rotation(&mut self, rotation: Option<Rotation>);

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);
    /// Angles in degrees, counter-clockwise from 3 o'clock, like `drawArc`.
    fn draw_arc(&mut self, bounds: Rect, start_deg: i32, sweep_deg: i32);
    fn draw_oval(&mut self, bounds: Rect);
    fn fill_oval(&mut self, bounds: Rect);
    fn draw_quad(&mut self, from: (f32, f32), ctrl: (f32, f32), to: (f32, f32));

    fn set_color(&mut self, color: Rgba) {
        self.set_paint(Paint::Solid(color));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line { x0: i32, y0: i32, x1: i32, y1: i32 },
    Arc { bounds: Rect, start_deg: i32, sweep_deg: i32 },
    Oval { bounds: Rect },
    FillOval { bounds: Rect },
    Quad { from: (f32, f32), ctrl: (f32, f32), to: (f32, f32) },
}

/// One recorded primitive with the graphics state it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub command: DrawCommand,
    pub paint: Paint,
    pub stroke_width: f32,
    pub rotation: Option<Rotation>,
    pub antialias: bool,
}

/// Surface that draws nothing and keeps every call in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    antialias: bool,
    stroke_width: f32,
    paint: Paint,
    rotation: Option<Rotation>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            stroke_width: 1.0,
            ..Self::default()
        }
    }

    pub fn antialias(&self) -> bool {
        self.antialias
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c.command, DrawCommand::Line { .. }))
    }

    fn push(&mut self, command: DrawCommand) {
        self.calls.push(DrawCall {
            command,
            paint: self.paint,
            stroke_width: self.stroke_width,
            rotation: self.rotation,
            antialias: self.antialias,
        });
    }
}

impl Surface for RecordingSurface {
    fn set_antialias(&mut self, on: bool) {
        self.antialias = on;
    }

    fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = width;
    }

    fn set_paint(&mut self, paint: Paint) {
        self.paint = paint;
    }

    fn set_rotation(&mut self, rotation: Option<Rotation>) {
        self.rotation = rotation;
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.push(DrawCommand::Line { x0, y0, x1, y1 });
    }

    fn draw_arc(&mut self, bounds: Rect, start_deg: i32, sweep_deg: i32) {
        self.push(DrawCommand::Arc {
            bounds,
            start_deg,
            sweep_deg,
        });
    }

    fn draw_oval(&mut self, bounds: Rect) {
        self.push(DrawCommand::Oval { bounds });
    }

    fn fill_oval(&mut self, bounds: Rect) {
        self.push(DrawCommand::FillOval { bounds });
    }

    fn draw_quad(&mut self, from: (f32, f32), ctrl: (f32, f32), to: (f32, f32)) {
        self.push(DrawCommand::Quad { from, ctrl, to });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_gradient_clamps_past_ends() {
        let paint = Paint::Linear {
            from: (0.0, 0.0),
            from_color: Rgba::BLACK,
            to: (10.0, 0.0),
            to_color: Rgba::WHITE,
        };
        assert_eq!(paint.color_at(-5.0, 3.0), Rgba::BLACK);
        assert_eq!(paint.color_at(50.0, 0.0), Rgba::WHITE);
        assert_eq!(paint.color_at(5.0, 100.0), Rgba::rgb(128, 128, 128));
    }

    #[test]
    fn test_degenerate_gradient_uses_start_color() {
        let paint = Paint::Linear {
            from: (3.0, 3.0),
            from_color: Rgba::WHITE,
            to: (3.0, 3.0),
            to_color: Rgba::BLACK,
        };
        assert_eq!(paint.color_at(0.0, 0.0), Rgba::WHITE);
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let rot = Rotation {
            degrees: 90.0,
            pivot: (10.0, 10.0),
        };
        let (x, y) = rot.apply(20.0, 10.0);
        assert!((x - 10.0).abs() < 1e-4);
        assert!((y - 20.0).abs() < 1e-4);
        let (bx, by) = rot.invert().apply(x, y);
        assert!((bx - 20.0).abs() < 1e-4 && (by - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_recording_keeps_state_per_call() {
        let mut s = RecordingSurface::new();
        s.set_color(Rgba::WHITE);
        s.set_stroke_width(3.0);
        s.draw_line(0, 0, 5, 5);
        s.set_color(Rgba::BLACK);
        s.draw_oval(Rect::new(0, 0, 4, 4));

        assert_eq!(s.calls.len(), 2);
        assert_eq!(s.calls[0].paint, Paint::Solid(Rgba::WHITE));
        assert_eq!(s.calls[0].stroke_width, 3.0);
        assert_eq!(s.calls[1].paint, Paint::Solid(Rgba::BLACK));
        assert_eq!(s.lines().count(), 1);
    }
}
