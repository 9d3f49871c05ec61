//! Deterministic test pattern generation.

use crate::frame::FrameBuffer;
use crate::types::Point;

/// Number of points in the diagnostic test pattern.
pub const TEST_PATTERN_POINTS: usize = 256;

/// Radius of the diagnostic test pattern, spanning the full galvo range.
pub const TEST_PATTERN_RADIUS: i16 = 32767;

/// Append a circle of `count` points to the frame.
///
/// Points are evenly spaced in angle over a full turn, starting at angle 0
/// (which lands at `(center_x, center_y + radius)`), colored full red.
/// Appends go through the capacity-checked path; returns how many points
/// were actually stored.
pub fn circle(
    frame: &mut FrameBuffer,
    count: usize,
    center_x: i16,
    center_y: i16,
    radius: i16,
) -> usize {
    let mut stored = 0;
    for i in 0..count {
        let angle = i as f32 * std::f32::consts::TAU / count as f32;
        let x = (center_x as f32 + angle.sin() * radius as f32) as i16;
        let y = (center_y as f32 + angle.cos() * radius as f32) as i16;
        if !frame.append(Point::new(x, y, 65535, 0, 0)).is_stored() {
            break;
        }
        stored += 1;
    }
    stored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FRAME_CAPACITY;

    #[test]
    fn first_point_is_at_top_of_circle() {
        let mut frame = FrameBuffer::new();
        assert_eq!(circle(&mut frame, 256, 5, 10, 100), 256);
        let first = frame.points()[0];
        assert_eq!(first.x, 5);
        assert_eq!(first.y, 110);
    }

    #[test]
    fn points_lie_on_the_radius() {
        let mut frame = FrameBuffer::new();
        circle(&mut frame, 256, 0, 0, 100);
        for point in frame.points() {
            let dist = ((point.x as f32).powi(2) + (point.y as f32).powi(2)).sqrt();
            assert!((dist - 100.0).abs() < 1.5, "distance {} off radius", dist);
        }
    }

    #[test]
    fn points_are_evenly_spaced() {
        let mut frame = FrameBuffer::new();
        circle(&mut frame, 64, 0, 0, 10_000);
        let points = frame.points();
        let gap = |a: Point, b: Point| {
            (((b.x - a.x) as f32).powi(2) + ((b.y - a.y) as f32).powi(2)).sqrt()
        };
        let first_gap = gap(points[0], points[1]);
        for pair in points.windows(2) {
            let g = gap(pair[0], pair[1]);
            assert!((g - first_gap).abs() < 3.0, "uneven spacing: {} vs {}", g, first_gap);
        }
    }

    #[test]
    fn pattern_is_full_red() {
        let mut frame = FrameBuffer::new();
        circle(&mut frame, 16, 0, 0, 1000);
        for point in frame.points() {
            assert_eq!((point.r, point.g, point.b), (65535, 0, 0));
        }
    }

    #[test]
    fn full_range_radius_stays_in_bounds() {
        let mut frame = FrameBuffer::new();
        circle(&mut frame, 256, 0, 0, TEST_PATTERN_RADIUS);
        assert_eq!(frame.count(), 256);
    }

    #[test]
    fn stops_at_capacity() {
        let mut frame = FrameBuffer::new();
        for _ in 0..FRAME_CAPACITY - 10 {
            frame.append(Point::default());
        }
        let stored = circle(&mut frame, 256, 0, 0, 100);
        assert_eq!(stored, 10);
        assert_eq!(frame.count(), FRAME_CAPACITY);
    }
}
