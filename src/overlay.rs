// Shared overlay state and the per-frame compositor.
//
// One `Overlay` is shared (`Arc`) between three callers that never
// coordinate with each other:
// - the animation thread, through `Overlay::tick`;
// - the host's click callback, through `Overlay::on_click`;
// - the host's frame callback, through `Overlay::render`.
//
// Trail, ripples and the active paint each sit behind their own short lock.
// Rendering copies trail and ripple state out first and rasterizes without
// holding either lock. Only the cursor paint stays locked while it draws,
// since drawing advances its rotation.

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::config::{CursorConfig, OverlayConfig, RippleConfig, TrailConfig};
use crate::cursor::{CursorPaint, CursorStyle};
use crate::ripple::{ClickCycle, Ripple, RippleSet};
use crate::surface::Surface;
use crate::trail::{TrailBuffer, TrailPoint};
use crate::types::{Point, PointerButton};

/// Active decoration plus the config set it was built from. Swapped as a unit.
struct Painter {
    cursor: CursorConfig,
    trail: TrailConfig,
    ripple: RippleConfig,
    paint: Box<dyn CursorPaint>,
}

pub struct Overlay {
    trail: Mutex<TrailBuffer>,
    ripples: RippleSet,
    painter: Mutex<Painter>,
    clicks: ClickCycle,
}

impl Overlay {
    pub fn new(config: &OverlayConfig) -> Self {
        Self::with_paint(
            config.cursor,
            config.trail,
            config.ripple,
            config.style.build(&config.cursor),
        )
    }

    pub fn with_paint(
        cursor: CursorConfig,
        trail: TrailConfig,
        ripple: RippleConfig,
        paint: Box<dyn CursorPaint>,
    ) -> Self {
        Self {
            trail: Mutex::new(TrailBuffer::new(trail.max_points, trail.color)),
            ripples: RippleSet::new(),
            painter: Mutex::new(Painter {
                cursor,
                trail,
                ripple,
                paint,
            }),
            clicks: ClickCycle::new(),
        }
    }

    /// Replace every config and the cursor paint in one step. A renderer
    /// never sees the new paint paired with the old configs, or the reverse.
    pub fn configure(
        &self,
        cursor: CursorConfig,
        trail: TrailConfig,
        ripple: RippleConfig,
        mut paint: Box<dyn CursorPaint>,
    ) {
        let mut painter = self.painter.lock();
        paint.set_ripple_active(painter.paint.is_ripple_active());

        {
            let mut buffer = self.trail.lock();
            if buffer.capacity() != trail.max_points.max(1) {
                *buffer = TrailBuffer::new(trail.max_points, trail.color);
            } else {
                buffer.set_color(trail.color);
            }
        }

        let previous = painter.paint.style();
        let next = paint.style();
        *painter = Painter {
            cursor,
            trail,
            ripple,
            paint,
        };
        drop(painter);
        info!("Cursor paint: {} -> {}", previous.name(), next.name());
    }

    /// Swap only the decoration, rebuilt from the current cursor config.
    pub fn set_style(&self, style: CursorStyle) {
        let mut painter = self.painter.lock();
        let mut paint = style.build(&painter.cursor);
        paint.set_ripple_active(painter.paint.is_ripple_active());
        let previous = std::mem::replace(&mut painter.paint, paint).style();
        drop(painter);
        info!("Cursor paint: {} -> {}", previous.name(), style.name());
    }

    pub fn style(&self) -> CursorStyle {
        self.painter.lock().paint.style()
    }

    pub fn is_ripple_active(&self) -> bool {
        self.painter.lock().paint.is_ripple_active()
    }

    /// Click callback: one ripple per click, colors cycling A, B, C, A, ...
    pub fn on_click(&self, point: Point, button: PointerButton, synthetic: bool) {
        let index = self.clicks.next_index();
        let color = self.painter.lock().ripple.color(index);
        debug!(
            "Ripple at ({}, {}) from {:?} click (synthetic: {}), color #{}",
            point.x, point.y, button, synthetic, index
        );
        self.ripples.add(Ripple::new(point, color));
    }

    /// One animation step: record the pointer, fade the trail, advance the
    /// ripples and sync the paint's ripple flag with what is left.
    pub fn tick(&self, pointer: Option<Point>, elapsed_ms: u64) {
        {
            let mut trail = self.trail.lock();
            if let Some(p) = pointer {
                trail.add_point(p.x, p.y);
            }
            trail.decay(elapsed_ms);
        }

        let active = self.ripples.advance_all();
        self.painter.lock().paint.set_ripple_active(active);
    }

    /// Compose one frame: trail, then ripples, then the cursor on top.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.set_antialias(true);

        let (trail, pointer) = {
            let buffer = self.trail.lock();
            (buffer.clone(), buffer.last_point())
        };
        trail.render(surface);

        self.ripples.render_all(surface);

        if let Some(pointer) = pointer {
            self.painter.lock().paint.draw(surface, pointer);
        }
    }

    pub fn trail_points(&self) -> Vec<TrailPoint> {
        self.trail.lock().points()
    }

    pub fn ripples(&self) -> Vec<Ripple> {
        self.ripples.snapshot()
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new(&OverlayConfig::default())
    }
}
