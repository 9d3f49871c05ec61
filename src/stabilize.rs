//! Frame stabilization: minimum-length padding for stable laser output.
//!
//! Analog laser hardware flickers visibly when handed frames below a minimum
//! point count. Stabilization pads a short frame with blanked points anchored
//! at the last real position, so the beam stays off and pointed where it last
//! drew instead of jumping.

use crate::frame::FrameBuffer;
use crate::types::Point;

/// How padding interacts with the frame's logical length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilizePolicy {
    /// Pad physical storage only; `count` is unchanged and the padding is
    /// recomputed on every cycle. Suited to front ends where new points keep
    /// streaming in between output cycles.
    Transient,
    /// Pad and advance `count` to the minimum, consuming the padding for
    /// this frame. Suited to front ends where the client has signalled
    /// "send what I have now".
    Committed,
}

/// Pad `frame` up to `min_points` and return the slice to hand to the DAC.
///
/// Returns `None` when the frame is empty: with no reference point there is
/// nothing to anchor padding at, and the caller should command a stop rather
/// than draw. Otherwise the returned slice has length `max(count, min_points)`
/// with indices `[count, min_points)` blanked at the last real point's
/// position.
pub fn stabilize(
    frame: &mut FrameBuffer,
    min_points: usize,
    policy: StabilizePolicy,
) -> Option<&[Point]> {
    let count = frame.count();
    if count == 0 {
        return None;
    }

    if count < min_points {
        let last = frame.points()[count - 1];
        frame.pad_physical(min_points, Point::blanked_at(last.x, last.y));
        if policy == StabilizePolicy::Committed {
            frame.advance_count(min_points);
        }
    }

    Some(frame.padded_view(frame.count().max(min_points)))
}
