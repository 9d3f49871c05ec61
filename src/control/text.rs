//! Line-text command decoder for the WebSocket front end.
//!
//! One command per message: the first whitespace-separated token is the
//! label, the rest are integer arguments. Bulk point commands consume
//! complete fixed-size groups and stop silently at the first incomplete or
//! unparsable group — a best-effort partial decode, not an error.

use log::debug;

use crate::context::CanvasState;

/// Apply one line-text command to the canvas.
pub fn apply_line(state: &mut CanvasState, line: &str) {
    let mut tokens = line.split_whitespace();
    let Some(label) = tokens.next() else {
        return;
    };

    match label {
        "/xyrgb" => {
            while let Some([x, y, r, g, b]) = next_group(&mut tokens) {
                if !super::append_colored(state, x, y, r, g, b) {
                    break;
                }
            }
        }
        "/xy" => {
            while let Some([x, y]) = next_group(&mut tokens) {
                if !super::append_with_stroke(state, x, y) {
                    break;
                }
            }
        }
        "/color" => {
            if let Some([r, g, b]) = next_group(&mut tokens) {
                super::set_stroke(state, r, g, b);
            }
        }
        "/clear" => state.frame.clear(),
        "/write" => {
            state.write_enabled = true;
            debug!("frame marked ready ({} points)", state.frame.count());
        }
        "/set_pps" => {
            if let Some([value]) = next_group(&mut tokens) {
                super::set_pps(state, value);
            }
        }
        "/set_loop_count" => {
            if let Some([value]) = next_group(&mut tokens) {
                super::set_loop_count(state, value);
            }
        }
        "/test_pattern" => super::apply_test_pattern(state),
        other => debug!("ignoring unknown command {:?}", other),
    }
}

/// Consume the next `N` tokens as integers, or `None` at the first missing
/// or unparsable token.
fn next_group<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Option<[i32; N]> {
    let mut group = [0i32; N];
    for slot in &mut group {
        *slot = tokens.next()?.parse().ok()?;
    }
    Some(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::to_dac_channel;
    use crate::types::{Point, Stroke};

    #[test]
    fn xyrgb_appends_one_point_per_group() {
        let mut state = CanvasState::new();
        apply_line(&mut state, "/xyrgb 10 20 30 40 50 1 2 3 4 5");

        assert_eq!(state.frame.count(), 2);
        assert_eq!(
            state.frame.points()[0],
            Point::new(
                10,
                20,
                to_dac_channel(30),
                to_dac_channel(40),
                to_dac_channel(50)
            )
        );
        assert_eq!(
            state.frame.points()[1],
            Point::new(
                1,
                2,
                to_dac_channel(3),
                to_dac_channel(4),
                to_dac_channel(5)
            )
        );
    }

    #[test]
    fn xy_uses_current_stroke() {
        let mut state = CanvasState::new();
        apply_line(&mut state, "/color 255 0 0");
        apply_line(&mut state, "/xy 100 -200");

        assert_eq!(state.frame.count(), 1);
        assert_eq!(state.frame.points()[0], Point::new(100, -200, 65535, 0, 0));
    }

    #[test]
    fn trailing_garbage_is_dropped_silently() {
        let mut state = CanvasState::new();
        apply_line(&mut state, "/xy 10 20 1 x");

        assert_eq!(state.frame.count(), 1, "incomplete group dropped");
        let expected = Point::stroked(10, 20, &Stroke::default());
        assert_eq!(state.frame.points()[0], expected);
    }

    #[test]
    fn complete_trailing_group_is_kept() {
        let mut state = CanvasState::new();
        apply_line(&mut state, "/xy 10 20 1 2");
        assert_eq!(state.frame.count(), 2);
    }

    #[test]
    fn garbage_mid_stream_stops_the_decode() {
        let mut state = CanvasState::new();
        apply_line(&mut state, "/xyrgb 1 2 3 4 5 6 7 oops 9 10 11 12 13 14 15");
        assert_eq!(state.frame.count(), 1);
    }

    #[test]
    fn out_of_range_coordinates_clamp() {
        let mut state = CanvasState::new();
        apply_line(&mut state, "/xy 40000 -40000");
        assert_eq!(state.frame.points()[0].x, 32767);
        assert_eq!(state.frame.points()[0].y, -32768);
    }

    #[test]
    fn clear_resets_the_frame() {
        let mut state = CanvasState::new();
        apply_line(&mut state, "/xy 1 2 3 4");
        apply_line(&mut state, "/clear");
        assert_eq!(state.frame.count(), 0);
    }

    #[test]
    fn write_marks_frame_ready() {
        let mut state = CanvasState::new();
        assert!(!state.write_enabled);
        apply_line(&mut state, "/write");
        assert!(state.write_enabled);
    }

    #[test]
    fn set_pps_and_loop_count_validate() {
        let mut state = CanvasState::new();
        apply_line(&mut state, "/set_pps 40000");
        assert_eq!(state.params.pps(), 40_000);

        apply_line(&mut state, "/set_pps -1");
        assert_eq!(state.params.pps(), 40_000, "rejected value keeps previous");

        apply_line(&mut state, "/set_loop_count -1");
        assert_eq!(state.params.loop_count(), -1);

        apply_line(&mut state, "/set_loop_count 0");
        assert_eq!(state.params.loop_count(), -1, "zero rejected");
    }

    #[test]
    fn test_pattern_replaces_the_frame() {
        let mut state = CanvasState::new();
        apply_line(&mut state, "/xy 1 2");
        apply_line(&mut state, "/test_pattern");
        assert_eq!(state.frame.count(), 256);
        assert_eq!(state.frame.points()[0].r, 65535);
    }

    #[test]
    fn unknown_and_empty_commands_are_ignored() {
        let mut state = CanvasState::new();
        apply_line(&mut state, "");
        apply_line(&mut state, "/bogus 1 2 3");
        assert_eq!(state.frame.count(), 0);
    }
}
