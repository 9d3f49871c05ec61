//! The frame buffer: an ordered point sequence with a fixed capacity.
//!
//! A [`FrameBuffer`] owns fixed physical storage of [`FRAME_CAPACITY`] points
//! and a logical length `count`. Only the prefix `[0, count)` is meaningful;
//! storage past `count` is scratch space that the stabilizer may write
//! transient padding into. Every append path goes through the single
//! capacity-checked [`append`](FrameBuffer::append) operation, so the buffer
//! can never be indexed past its storage no matter which front end drives it.

use crate::types::{Point, Stroke};

/// Maximum number of points a single frame can hold.
pub const FRAME_CAPACITY: usize = 16_000;

/// Result of an append attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The point was stored and the logical length advanced.
    Stored,
    /// The frame is at capacity; the point was dropped.
    Rejected,
}

impl AppendOutcome {
    /// Returns true if the point was stored.
    pub fn is_stored(&self) -> bool {
        matches!(self, AppendOutcome::Stored)
    }
}

/// Ordered, bounded point sequence for one output frame.
pub struct FrameBuffer {
    points: Vec<Point>,
    count: usize,
}

impl FrameBuffer {
    /// Creates an empty frame buffer with [`FRAME_CAPACITY`] physical slots.
    pub fn new() -> Self {
        Self {
            points: vec![Point::default(); FRAME_CAPACITY],
            count: 0,
        }
    }

    /// Current logical length.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns true if the frame holds no points.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Physical capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.points.len()
    }

    /// The meaningful prefix `[0, count)`.
    pub fn points(&self) -> &[Point] {
        &self.points[..self.count]
    }

    /// Append a point, rejecting it when the frame is at capacity.
    pub fn append(&mut self, point: Point) -> AppendOutcome {
        if self.count == self.points.len() {
            return AppendOutcome::Rejected;
        }
        self.points[self.count] = point;
        self.count += 1;
        AppendOutcome::Stored
    }

    /// Append a point colored with the given stroke.
    pub fn append_stroked(&mut self, x: i16, y: i16, stroke: &Stroke) -> AppendOutcome {
        self.append(Point::stroked(x, y, stroke))
    }

    /// Reset the logical length to zero. Physical storage is left as-is.
    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// Write `pad` into the physical slots `[count, upto)`.
    ///
    /// Used by the stabilizer; `upto` is capped at capacity. The logical
    /// length is not changed.
    pub(crate) fn pad_physical(&mut self, upto: usize, pad: Point) {
        let upto = upto.min(self.points.len());
        for slot in &mut self.points[self.count..upto] {
            *slot = pad;
        }
    }

    /// A view of the first `len` physical slots, capped at capacity.
    ///
    /// Only meaningful after [`pad_physical`](Self::pad_physical) has filled
    /// the slots past `count`.
    pub(crate) fn padded_view(&self, len: usize) -> &[Point] {
        &self.points[..len.min(self.points.len())]
    }

    /// Advance the logical length to `to`, consuming previously written
    /// padding. No-op if `to` is not greater than the current count.
    pub(crate) fn advance_count(&mut self, to: usize) {
        if to > self.count {
            self.count = to.min(self.points.len());
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_advances_count() {
        let mut frame = FrameBuffer::new();
        assert!(frame.is_empty());

        assert_eq!(frame.append(Point::new(1, 2, 3, 4, 5)), AppendOutcome::Stored);
        assert_eq!(frame.count(), 1);
        assert_eq!(frame.points()[0], Point::new(1, 2, 3, 4, 5));
    }

    #[test]
    fn append_beyond_capacity_is_rejected() {
        let mut frame = FrameBuffer::new();
        for _ in 0..FRAME_CAPACITY {
            assert!(frame.append(Point::default()).is_stored());
        }
        assert_eq!(frame.append(Point::default()), AppendOutcome::Rejected);
        assert_eq!(frame.count(), FRAME_CAPACITY);
    }

    #[test]
    fn clear_resets_count_only() {
        let mut frame = FrameBuffer::new();
        for _ in 0..5 {
            frame.append(Point::new(7, 7, 7, 7, 7));
        }
        frame.clear();
        assert_eq!(frame.count(), 0);
        assert!(frame.points().is_empty());
        // Storage is reusable after clear.
        assert!(frame.append(Point::default()).is_stored());
    }

    #[test]
    fn append_stroked_uses_stroke_color() {
        let mut frame = FrameBuffer::new();
        let stroke = Stroke::new(100, 200, 300);
        frame.append_stroked(-5, 9, &stroke);
        assert_eq!(frame.points()[0], Point::new(-5, 9, 100, 200, 300));
    }

    #[test]
    fn pad_physical_leaves_count_unchanged() {
        let mut frame = FrameBuffer::new();
        frame.append(Point::new(1, 1, 1, 1, 1));

        frame.pad_physical(4, Point::blanked_at(1, 1));
        assert_eq!(frame.count(), 1);
        let view = frame.padded_view(4);
        assert_eq!(view.len(), 4);
        assert_eq!(view[0], Point::new(1, 1, 1, 1, 1));
        assert!(view[1..].iter().all(|p| *p == Point::blanked_at(1, 1)));
    }

    #[test]
    fn advance_count_never_shrinks() {
        let mut frame = FrameBuffer::new();
        for _ in 0..10 {
            frame.append(Point::default());
        }
        frame.advance_count(5);
        assert_eq!(frame.count(), 10);
        frame.advance_count(20);
        assert_eq!(frame.count(), 20);
    }
}
