//! Control-channel front ends: command decoders and listener loops.
//!
//! Two front ends exist — a UDP/OSC datagram listener and a WebSocket
//! line-text listener — and both funnel into the same [`CanvasState`]
//! mutations defined here. Control traffic is best-effort: malformed input
//! is decoded as far as it is well-formed and the rest dropped silently
//! (debug-logged), never propagated as an error.

#[cfg(feature = "osc")]
pub mod osc;
pub mod text;
#[cfg(feature = "ws")]
pub mod ws;

use log::{debug, info, warn};

use crate::color::to_dac_channel;
use crate::context::CanvasState;
use crate::pattern::{circle, TEST_PATTERN_POINTS, TEST_PATTERN_RADIUS};
use crate::types::{clamp_coord, Point};

/// Append a point with an explicit color, all fields in wire (i32) form.
/// Returns false when the frame is at capacity.
pub(crate) fn append_colored(
    state: &mut CanvasState,
    x: i32,
    y: i32,
    r: i32,
    g: i32,
    b: i32,
) -> bool {
    let point = Point::new(
        clamp_coord(x),
        clamp_coord(y),
        to_dac_channel(r),
        to_dac_channel(g),
        to_dac_channel(b),
    );
    let stored = state.frame.append(point).is_stored();
    if !stored {
        warn!("frame full ({} points), dropping point", state.frame.count());
    }
    stored
}

/// Append a point colored with the current stroke.
/// Returns false when the frame is at capacity.
pub(crate) fn append_with_stroke(state: &mut CanvasState, x: i32, y: i32) -> bool {
    let stroke = state.stroke;
    let stored = state
        .frame
        .append_stroked(clamp_coord(x), clamp_coord(y), &stroke)
        .is_stored();
    if !stored {
        warn!("frame full ({} points), dropping point", state.frame.count());
    }
    stored
}

/// Set the default stroke from 8-bit wire values.
pub(crate) fn set_stroke(state: &mut CanvasState, r: i32, g: i32, b: i32) {
    state.stroke.r = to_dac_channel(r);
    state.stroke.g = to_dac_channel(g);
    state.stroke.b = to_dac_channel(b);
    debug!(
        "stroke = {} {} {}",
        state.stroke.r, state.stroke.g, state.stroke.b
    );
}

/// Set the output rate, keeping the previous value on rejection.
pub(crate) fn set_pps(state: &mut CanvasState, value: i32) {
    match state.params.set_pps(value) {
        Ok(()) => info!("pps = {}", state.params.pps()),
        Err(err) => warn!("ignoring pps {}: {}", value, err),
    }
}

/// Set the loop count, keeping the previous value on rejection.
pub(crate) fn set_loop_count(state: &mut CanvasState, value: i32) {
    match state.params.set_loop_count(value) {
        Ok(()) => info!("loop_count = {}", state.params.loop_count()),
        Err(err) => warn!("ignoring loop count {}: {}", value, err),
    }
}

/// Replace the frame with the diagnostic circle pattern.
pub(crate) fn apply_test_pattern(state: &mut CanvasState) {
    state.frame.clear();
    let stored = circle(
        &mut state.frame,
        TEST_PATTERN_POINTS,
        0,
        0,
        TEST_PATTERN_RADIUS,
    );
    info!("test pattern ({} points)", stored);
}
