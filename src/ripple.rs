// Click ripples: rings that grow out from the click point, then shrink back.
//
// Each `Ripple` is a tiny state machine (`Expanding -> Contracting ->
// removed`). `RippleSet` owns them behind one lock shared by the animation
// tick, the click handler and the renderer.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::surface::Surface;
use crate::types::{Point, Rect, Rgba};

pub const RADIUS_STEP: f32 = 4.0;
pub const ALPHA_STEP: i32 = 8;
/// Radius at which an expanding ring turns around.
pub const TURN_RADIUS: f32 = 50.0;
/// A contracting ring at or below this radius is finished.
pub const END_RADIUS: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RipplePhase {
    Expanding,
    Contracting,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ripple {
    pub center: Point,
    pub color: Rgba,
    pub radius: f32,
    pub alpha: i32,
    pub expanding: bool,
}

impl Ripple {
    pub fn new(center: Point, color: Rgba) -> Self {
        Self {
            center,
            color: color.with_alpha(255),
            radius: 0.0,
            alpha: 255,
            expanding: true,
        }
    }

    pub fn phase(&self) -> RipplePhase {
        if self.expanding {
            RipplePhase::Expanding
        } else if self.radius <= END_RADIUS || self.alpha >= 255 {
            RipplePhase::Finished
        } else {
            RipplePhase::Contracting
        }
    }

    /// One tick of the state machine. Returns false once the ring is finished.
    pub fn advance(&mut self) -> bool {
        if self.expanding {
            self.radius += RADIUS_STEP;
            self.alpha = (self.alpha - ALPHA_STEP).clamp(0, 255);
            if self.radius >= TURN_RADIUS {
                self.expanding = false;
            }
            true
        } else {
            self.radius = (self.radius - RADIUS_STEP).max(0.0);
            self.alpha = (self.alpha + ALPHA_STEP).clamp(0, 255);
            self.phase() != RipplePhase::Finished
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.set_color(self.color.with_alpha(self.alpha));
        surface.draw_oval(Rect::around(self.center, self.radius as i32));
    }
}

#[derive(Debug, Default)]
pub struct RippleSet {
    ripples: Mutex<Vec<Ripple>>,
}

impl RippleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, ripple: Ripple) {
        self.ripples.lock().push(ripple);
    }

    /// Step every ripple once and drop the finished ones, keeping insertion
    /// order. Returns whether any ripple is still alive.
    pub fn advance_all(&self) -> bool {
        let mut ripples = self.ripples.lock();
        ripples.retain_mut(Ripple::advance);
        !ripples.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.ripples.lock().len()
    }

    /// Copy of the current ripples, in insertion order.
    pub fn snapshot(&self) -> Vec<Ripple> {
        self.ripples.lock().clone()
    }

    /// Draw every ring. Works from a snapshot so the lock is released before
    /// any rasterizing happens.
    pub fn render_all(&self, surface: &mut dyn Surface) {
        for ripple in self.snapshot() {
            ripple.render(surface);
        }
    }
}

/// Round-robin over three ripple colors, one step per click.
#[derive(Debug, Default)]
pub struct ClickCycle {
    next: AtomicUsize,
}

impl ClickCycle {
    pub const PERIOD: usize = 3;

    pub fn new() -> Self {
        Self::default()
    }

    /// Palette index for this click: 0, 1, 2, 0, 1, ...
    pub fn next_index(&self) -> usize {
        self.next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some((n + 1) % Self::PERIOD)
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, Paint, RecordingSurface};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn fresh() -> Ripple {
        Ripple::new(Point::new(100, 100), Rgba::rgb(0, 255, 255))
    }

    #[test]
    fn test_turns_around_when_radius_first_reaches_fifty() {
        let mut r = fresh();
        let mut ticks = 0;
        while r.expanding {
            assert!(r.radius < TURN_RADIUS);
            assert!(r.advance());
            ticks += 1;
        }
        assert_eq!(ticks, 13);
        assert_eq!(r.radius, 52.0);
        assert_eq!(r.alpha, 255 - 13 * 8);
        assert_eq!(r.phase(), RipplePhase::Contracting);
    }

    #[test]
    fn test_full_cycle_ends_at_small_radius() {
        let mut r = fresh();
        let mut ticks = 0;
        while r.advance() {
            ticks += 1;
            assert!(ticks < 100, "ripple never finished");
        }
        assert!(!r.expanding);
        assert!(r.radius <= END_RADIUS || r.alpha >= 255);
        assert_eq!(r.radius, 4.0);
        assert_eq!(r.phase(), RipplePhase::Finished);
    }

    #[test]
    fn test_alpha_back_to_full_ends_ripple_on_its_own() {
        let mut r = fresh();
        r.expanding = false;
        r.radius = 40.0;
        r.alpha = 250;
        assert!(!r.advance());
        assert!(r.radius > END_RADIUS);
    }

    #[test]
    fn test_advance_all_removes_finished_and_reports_empty() {
        let set = RippleSet::new();
        set.add(fresh());
        let mut live = true;
        let mut ticks = 0;
        while live {
            live = set.advance_all();
            ticks += 1;
        }
        assert!(set.is_empty());
        assert_eq!(ticks, 13 + 12);
        assert!(!set.advance_all());
    }

    #[test]
    fn test_advance_keeps_insertion_order() {
        let set = RippleSet::new();
        set.add(Ripple::new(Point::new(1, 1), Rgba::WHITE));
        set.advance_all();
        set.add(Ripple::new(Point::new(2, 2), Rgba::WHITE));
        set.add(Ripple::new(Point::new(3, 3), Rgba::WHITE));
        set.advance_all();
        let centers: Vec<i32> = set.snapshot().iter().map(|r| r.center.x).collect();
        assert_eq!(centers, vec![1, 2, 3]);
    }

    #[test]
    fn test_render_draws_rings_with_current_alpha() {
        let set = RippleSet::new();
        let mut r = fresh();
        r.advance();
        r.advance();
        set.add(r);
        let mut s = RecordingSurface::new();
        set.render_all(&mut s);

        assert_eq!(s.calls.len(), 1);
        assert_eq!(
            s.calls[0].command,
            DrawCommand::Oval { bounds: Rect::new(92, 92, 16, 16) }
        );
        assert_eq!(s.calls[0].paint, Paint::Solid(Rgba::new(0, 255, 255, 239)));
    }

    #[test]
    fn test_concurrent_adds_are_never_lost() {
        let set = Arc::new(RippleSet::new());
        std::thread::scope(|scope| {
            for t in 0..8 {
                let set = Arc::clone(&set);
                scope.spawn(move || {
                    for i in 0..250 {
                        set.add(Ripple::new(Point::new(t, i), Rgba::WHITE));
                    }
                });
            }
        });
        assert_eq!(set.len(), 8 * 250);
    }

    #[test]
    fn test_click_cycle_has_period_three() {
        let cycle = ClickCycle::new();
        let got: Vec<usize> = (0..7).map(|_| cycle.next_index()).collect();
        assert_eq!(got, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    proptest! {
        #[test]
        fn prop_any_ripple_state_terminates(
            radius in 0.0f32..500.0,
            alpha in -100i32..400,
            expanding in any::<bool>(),
        ) {
            let mut r = fresh();
            r.radius = radius;
            r.alpha = alpha;
            r.expanding = expanding;
            let mut ticks = 0;
            while r.advance() {
                ticks += 1;
                prop_assert!(ticks < 200);
                prop_assert!((0..=255).contains(&r.alpha));
            }
        }
    }
}
