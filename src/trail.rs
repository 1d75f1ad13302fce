// Fixed-capacity pointer history with per-slot fading color.
//
// Slots are reused in a ring: once `capacity` points are stored, each new
// point overwrites the oldest one, so memory stays constant however long the
// overlay runs.

use crate::surface::{Paint, Surface};
use crate::types::{Point, Rgba};

pub const DEFAULT_MAX_POINTS: usize = 15;

/// Fewer live points than this draws no trail at all.
pub const MIN_RENDER_POINTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailPoint {
    pub pos: Point,
    pub color: Rgba,
}

#[derive(Debug, Clone)]
pub struct TrailBuffer {
    slots: Vec<TrailPoint>,
    len: usize,
    head: usize, // next slot to write
    tail: usize, // oldest live slot
    last: Option<Point>,
    color: Rgba,
}

impl TrailBuffer {
    pub fn new(capacity: usize, color: Rgba) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![TrailPoint { pos: Point::default(), color }; capacity],
            len: 0,
            head: 0,
            tail: 0,
            last: None,
            color,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Color given to points recorded from now on. Existing points keep fading.
    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    /// Most recently recorded position.
    pub fn last_point(&self) -> Option<Point> {
        self.last
    }

    /// Record a pointer position. Returns false (and stores nothing) when the
    /// pointer has not moved since the last recorded point.
    pub fn add_point(&mut self, x: i32, y: i32) -> bool {
        let pos = Point::new(x, y);
        if self.last == Some(pos) {
            return false;
        }
        self.last = Some(pos);

        let cap = self.capacity();
        self.slots[self.head] = TrailPoint { pos, color: self.color };
        self.head = (self.head + 1) % cap;
        if self.len < cap {
            self.len += 1;
        } else {
            self.tail = (self.tail + 1) % cap;
        }
        true
    }

    /// Fade every live point by `max(1, elapsed_ms * 10 / 50)` alpha steps.
    pub fn decay(&mut self, elapsed_ms: u64) {
        let fade = (elapsed_ms.saturating_mul(10) / 50).max(1).min(255) as i32;
        let cap = self.capacity();
        for i in 0..self.len {
            let slot = &mut self.slots[(self.tail + i) % cap];
            slot.color = slot.color.with_alpha(slot.color.a as i32 - fade);
        }
    }

    /// Live points, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TrailPoint> + '_ {
        let cap = self.capacity();
        (0..self.len).map(move |i| &self.slots[(self.tail + i) % cap])
    }

    pub fn points(&self) -> Vec<TrailPoint> {
        self.iter().copied().collect()
    }

    /// Draw the trail as a chain of smoothed segments, one per adjacent pair.
    pub fn render(&self, surface: &mut dyn Surface) {
        if self.len < MIN_RENDER_POINTS {
            return;
        }
        let pts = self.points();
        for pair in pts.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let from = a.pos.to_f32();
            let to = b.pos.to_f32();
            let mid = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);

            surface.set_paint(Paint::Linear {
                from,
                from_color: a.color,
                to: mid,
                to_color: a.color.lerp(b.color, 0.5),
            });
            surface.draw_quad(from, mid, to);
        }
    }
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POINTS, Rgba::WHITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};
    use proptest::prelude::*;

    #[test]
    fn test_repeat_position_is_ignored() {
        let mut trail = TrailBuffer::default();
        assert!(trail.add_point(4, 4));
        assert!(!trail.add_point(4, 4));
        assert_eq!(trail.len(), 1);

        // Returning to an older position is still movement.
        trail.add_point(5, 5);
        assert!(trail.add_point(4, 4));
        assert_eq!(trail.len(), 3);
    }

    #[test]
    fn test_wraparound_evicts_oldest() {
        let mut trail = TrailBuffer::new(3, Rgba::WHITE);
        for x in 0..5 {
            trail.add_point(x, 0);
        }
        let xs: Vec<i32> = trail.iter().map(|p| p.pos.x).collect();
        assert_eq!(xs, vec![2, 3, 4]);
        assert_eq!(trail.last_point(), Some(Point::new(4, 0)));
    }

    #[test]
    fn test_decay_has_a_floor_of_one() {
        let mut trail = TrailBuffer::default();
        trail.add_point(1, 1);
        trail.decay(0);
        assert_eq!(trail.points()[0].color.a, 254);
        trail.decay(3);
        assert_eq!(trail.points()[0].color.a, 253);
    }

    #[test]
    fn test_decay_scales_with_elapsed_time() {
        let mut trail = TrailBuffer::default();
        trail.add_point(1, 1);
        trail.decay(20);
        assert_eq!(trail.points()[0].color.a, 251);
        trail.decay(100);
        assert_eq!(trail.points()[0].color.a, 231);
    }

    #[test]
    fn test_decay_never_goes_below_zero() {
        let mut trail = TrailBuffer::default();
        trail.add_point(1, 1);
        for _ in 0..10 {
            trail.decay(10_000);
        }
        assert_eq!(trail.points()[0].color.a, 0);
        trail.decay(u64::MAX);
        assert_eq!(trail.points()[0].color.a, 0);
    }

    #[test]
    fn test_new_point_starts_opaque_after_color_change() {
        let mut trail = TrailBuffer::default();
        trail.add_point(0, 0);
        trail.decay(50);
        trail.set_color(Rgba::rgb(0, 255, 0));
        trail.add_point(1, 0);
        let pts = trail.points();
        assert_eq!(pts[0].color, Rgba::WHITE.with_alpha(245));
        assert_eq!(pts[1].color, Rgba::rgb(0, 255, 0));
    }

    #[test]
    fn test_render_needs_three_points() {
        let mut trail = TrailBuffer::default();
        trail.add_point(0, 0);
        trail.add_point(10, 0);
        let mut s = RecordingSurface::new();
        trail.render(&mut s);
        assert!(s.calls.is_empty());

        trail.add_point(20, 0);
        trail.render(&mut s);
        assert_eq!(s.calls.len(), 2);
    }

    #[test]
    fn test_render_segments_run_oldest_to_newest() {
        let mut trail = TrailBuffer::default();
        for (x, y) in [(0, 0), (10, 0), (10, 10), (20, 10)] {
            trail.add_point(x, y);
            trail.decay(20);
        }
        let mut s = RecordingSurface::new();
        trail.render(&mut s);
        assert_eq!(s.calls.len(), 3);

        let DrawCommand::Quad { from, ctrl, to } = s.calls[1].command else {
            panic!("expected a curve, got {:?}", s.calls[1].command);
        };
        assert_eq!(from, (10.0, 0.0));
        assert_eq!(ctrl, (10.0, 5.0));
        assert_eq!(to, (10.0, 10.0));

        let Paint::Linear { from_color, to_color, .. } = s.calls[0].paint else {
            panic!("trail segments use gradients");
        };
        // Oldest point has faded the most.
        assert!(from_color.a < to_color.a);
    }

    proptest! {
        #[test]
        fn prop_ring_keeps_newest_points(
            moves in proptest::collection::vec((-50i32..50, -50i32..50), 0..80),
            cap in 1usize..20,
        ) {
            let mut trail = TrailBuffer::new(cap, Rgba::WHITE);
            let mut recorded = Vec::new();
            for (x, y) in moves {
                if trail.add_point(x, y) {
                    recorded.push(Point::new(x, y));
                }
            }
            prop_assert!(trail.len() <= cap);
            let expected: Vec<Point> =
                recorded.iter().rev().take(cap).rev().copied().collect();
            let stored: Vec<Point> = trail.iter().map(|p| p.pos).collect();
            prop_assert_eq!(stored, expected);
        }

        #[test]
        fn prop_decay_is_monotone_and_bounded(steps in proptest::collection::vec(0u64..500, 1..40)) {
            let mut trail = TrailBuffer::default();
            trail.add_point(0, 0);
            let mut prev = 255u8;
            for ms in steps {
                trail.decay(ms);
                let a = trail.points()[0].color.a;
                prop_assert!(a < prev || (a == 0 && prev == 0));
                prev = a;
            }
        }
    }
}
