// Pointer decorations. Each variant is an independent `CursorPaint`
// implementation; the overlay holds one boxed at a time and may replace it
// between frames.

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::CursorConfig;
use crate::surface::{Paint, Rotation, Surface};
use crate::types::{Point, Rect, Rgba};

/// Degrees the animated arc turns per drawn frame.
pub const ROTATION_STEP_DEG: f64 = 3.0;

const GLOW_LIGHT: Rgba = Rgba::rgb(224, 224, 224);
const GLOW_DARK: Rgba = Rgba::rgb(192, 192, 192);
const GLOW_PARTICLE: Rgba = Rgba::new(192, 192, 192, 200);

pub trait CursorPaint: Send {
    fn draw(&mut self, surface: &mut dyn Surface, pointer: Point);
    fn set_ripple_active(&mut self, active: bool);
    fn is_ripple_active(&self) -> bool;
    fn style(&self) -> CursorStyle;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CursorStyle {
    /// Rotating arc with a particle; glows while ripples are active
    #[default]
    Animated,
    /// Static X with a drop shadow
    DoubleLine,
    /// Static plus sign with a drop shadow
    PlusSign,
}

impl CursorStyle {
    pub fn build(self, config: &CursorConfig) -> Box<dyn CursorPaint> {
        match self {
            CursorStyle::Animated => Box::new(AnimatedCursor::new(*config)),
            CursorStyle::DoubleLine => Box::new(DoubleLineCursor::new(*config)),
            CursorStyle::PlusSign => Box::new(PlusSignCursor::new(*config)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CursorStyle::Animated => "animated",
            CursorStyle::DoubleLine => "double-line",
            CursorStyle::PlusSign => "plus-sign",
        }
    }
}

/// Rotating partial arc, particle dot and X-cross.
pub struct AnimatedCursor {
    config: CursorConfig,
    angle: f64,
    ripple_active: bool,
    rng: StdRng,
}

impl AnimatedCursor {
    pub fn new(config: CursorConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic particle sizes, for tests and recordings.
    pub fn with_seed(config: CursorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: CursorConfig, rng: StdRng) -> Self {
        Self {
            config,
            angle: 0.0,
            ripple_active: false,
            rng,
        }
    }

    /// Current rotation in degrees, always in `[0, 360)`.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Dark end of the idle gradient: red dropped, green and blue dimmed.
    fn gradient_end(&self) -> Rgba {
        let g = self.config.gradient;
        Rgba::rgb(0, g.g.saturating_sub(95), g.b.saturating_sub(55))
    }
}

impl CursorPaint for AnimatedCursor {
    fn draw(&mut self, surface: &mut dyn Surface, pointer: Point) {
        let (cx, cy) = (pointer.x, pointer.y);
        let size = self.config.size;
        let (fx, fy) = pointer.to_f32();

        surface.set_rotation(Some(Rotation {
            degrees: self.angle,
            pivot: (fx, fy),
        }));

        let diameter = 2 * size + 12;
        let wave = self.angle.to_radians().sin();
        let sweep = (180.0 + 90.0 * wave) as i32;
        let stroke = 2.0 + 0.5 * wave as f32;

        let left = ((cx - diameter / 2) as f32, fy);
        let right = ((cx + diameter / 2) as f32, fy);
        if self.ripple_active {
            surface.set_paint(Paint::Linear {
                from: left,
                from_color: GLOW_LIGHT,
                to: right,
                to_color: GLOW_DARK,
            });
            surface.set_stroke_width(stroke * 2.0);
        } else {
            surface.set_paint(Paint::Linear {
                from: left,
                from_color: self.config.gradient,
                to: right,
                to_color: self.gradient_end(),
            });
            surface.set_stroke_width(stroke);
        }
        let bounds = Rect::new(cx - diameter / 2, cy - diameter / 2, diameter, diameter);
        surface.draw_arc(bounds, -sweep / 2, sweep);

        let (radius, color) = if self.ripple_active {
            (self.rng.random_range(2..8), GLOW_PARTICLE)
        } else {
            (self.rng.random_range(0..4), self.config.gradient)
        };
        surface.set_color(color);
        surface.fill_oval(Rect::around(pointer, radius));

        surface.set_color(self.config.primary);
        surface.draw_line(cx - size, cy - size, cx + size, cy + size);
        surface.set_color(self.config.secondary);
        surface.draw_line(cx + size, cy - size, cx - size, cy + size);

        surface.set_rotation(None);

        self.angle += ROTATION_STEP_DEG;
        if self.angle >= 360.0 {
            self.angle -= 360.0;
        }
    }

    fn set_ripple_active(&mut self, active: bool) {
        self.ripple_active = active;
    }

    fn is_ripple_active(&self) -> bool {
        self.ripple_active
    }

    fn style(&self) -> CursorStyle {
        CursorStyle::Animated
    }
}

/// X-cross over a one-pixel drop shadow.
pub struct DoubleLineCursor {
    config: CursorConfig,
    ripple_active: bool,
}

impl DoubleLineCursor {
    pub fn new(config: CursorConfig) -> Self {
        Self {
            config,
            ripple_active: false,
        }
    }
}

impl CursorPaint for DoubleLineCursor {
    fn draw(&mut self, surface: &mut dyn Surface, pointer: Point) {
        let (x, y) = (pointer.x, pointer.y);
        let s = self.config.size;
        surface.set_stroke_width(2.0);

        surface.set_color(self.config.shadow);
        surface.draw_line(x - s + 1, y - s + 1, x + s + 1, y + s + 1);
        surface.draw_line(x + s + 1, y - s + 1, x - s + 1, y + s + 1);

        surface.set_color(self.config.primary);
        surface.draw_line(x - s, y - s, x + s, y + s);
        surface.set_color(self.config.secondary);
        surface.draw_line(x + s, y - s, x - s, y + s);
    }

    fn set_ripple_active(&mut self, active: bool) {
        self.ripple_active = active;
    }

    fn is_ripple_active(&self) -> bool {
        self.ripple_active
    }

    fn style(&self) -> CursorStyle {
        CursorStyle::DoubleLine
    }
}

/// Plus sign: each arm is a shadow line with a shorter primary line on top.
pub struct PlusSignCursor {
    config: CursorConfig,
    ripple_active: bool,
}

impl PlusSignCursor {
    pub fn new(config: CursorConfig) -> Self {
        Self {
            config,
            ripple_active: false,
        }
    }
}

impl CursorPaint for PlusSignCursor {
    fn draw(&mut self, surface: &mut dyn Surface, pointer: Point) {
        let (x, y) = (pointer.x, pointer.y);
        let s = self.config.size;
        surface.set_stroke_width(2.0);

        surface.set_color(self.config.shadow);
        surface.draw_line(x, y - s, x, y + s);
        surface.set_color(self.config.primary);
        surface.draw_line(x, y - s + 1, x, y + s - 1);

        surface.set_color(self.config.shadow);
        surface.draw_line(x - s, y, x + s, y);
        surface.set_color(self.config.primary);
        surface.draw_line(x - s + 1, y, x + s - 1, y);
    }

    fn set_ripple_active(&mut self, active: bool) {
        self.ripple_active = active;
    }

    fn is_ripple_active(&self) -> bool {
        self.ripple_active
    }

    fn style(&self) -> CursorStyle {
        CursorStyle::PlusSign
    }
}
