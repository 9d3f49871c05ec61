//! Core types for laser frames and output parameters.
//!
//! Provides the DAC-facing point type, the process-wide stroke and output
//! parameters, and device enumeration types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default output rate in points per second.
pub const DEFAULT_PPS: u32 = 30_000;

/// Loop count value meaning "repeat the frame until new data arrives".
pub const LOOP_FOREVER: i32 = -1;

/// A single laser point in galvo coordinates.
///
/// Coordinates are signed 16-bit galvo positions; colors are full-range
/// 16-bit channels as the DAC expects them. 8-bit control-protocol colors
/// are widened via [`to_dac_channel`](crate::color::to_dac_channel) before
/// they ever reach a `Point`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// X galvo coordinate.
    pub x: i16,
    /// Y galvo coordinate.
    pub y: i16,
    /// Red channel (0-65535).
    pub r: u16,
    /// Green channel (0-65535).
    pub g: u16,
    /// Blue channel (0-65535).
    pub b: u16,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: i16, y: i16, r: u16, g: u16, b: u16) -> Self {
        Self { x, y, r, g, b }
    }

    /// Creates a point colored with the given stroke.
    pub fn stroked(x: i16, y: i16, stroke: &Stroke) -> Self {
        Self::new(x, y, stroke.r, stroke.g, stroke.b)
    }

    /// Creates a blanked point (laser off) at the given position.
    pub fn blanked_at(x: i16, y: i16) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }
}

/// Clamp a wire-format 32-bit coordinate to the galvo's 16-bit range.
///
/// The control protocols carry coordinates as signed 32-bit values. Clamping
/// (rather than truncating) means an out-of-range coordinate pins the beam at
/// the edge instead of teleporting it across the field.
pub fn clamp_coord(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// The default color applied to points submitted without an explicit color.
///
/// Process-wide; mutated only by an explicit color-set command and read by
/// the point-append operations. Defaults to full white.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stroke {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            r: 65535,
            g: 65535,
            b: 65535,
        }
    }
}

impl Stroke {
    /// Creates a stroke from 16-bit channel values.
    pub fn new(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }
}

/// Process-wide output parameters: points-per-second and loop count.
///
/// Both persist across frames and are mutated only through the validating
/// setters; a rejected value leaves the previous one in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutputParameters {
    pps: u32,
    loop_count: i32,
}

impl Default for OutputParameters {
    fn default() -> Self {
        Self {
            pps: DEFAULT_PPS,
            loop_count: 1,
        }
    }
}

impl OutputParameters {
    /// Current output rate in points per second.
    pub fn pps(&self) -> u32 {
        self.pps
    }

    /// Current loop count (1 = play once, [`LOOP_FOREVER`] = loop forever).
    pub fn loop_count(&self) -> i32 {
        self.loop_count
    }

    /// Set the output rate. Rejects non-positive values.
    pub fn set_pps(&mut self, pps: i32) -> Result<()> {
        if pps <= 0 {
            return Err(Error::invalid_config(format!(
                "pps must be positive, got {}",
                pps
            )));
        }
        self.pps = pps as u32;
        Ok(())
    }

    /// Set the loop count.
    ///
    /// Any nonzero value is accepted (n = repeat n times, [`LOOP_FOREVER`]
    /// = loop until new data). Zero is rejected: the DAC would interpret it
    /// as "play nothing" while holding the frame, which no caller ever means.
    pub fn set_loop_count(&mut self, loop_count: i32) -> Result<()> {
        if loop_count == 0 {
            return Err(Error::invalid_config("loop count 0 is invalid"));
        }
        self.loop_count = loop_count;
        Ok(())
    }
}

/// Information about a discovered DAC device.
///
/// IDs are namespaced by backend (e.g. `sim:0`) and stable across scans.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DacInfo {
    /// Stable, unique identifier used for (re)selecting DACs.
    pub id: String,
    /// Human-readable name for the DAC.
    pub name: String,
}

impl DacInfo {
    /// Create a new DAC info.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// How a front-end run loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    /// Cancellation was requested and the loop exited cleanly.
    Stopped,
    /// The DAC disconnected mid-run.
    Disconnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_defaults_to_white() {
        let stroke = Stroke::default();
        assert_eq!(stroke, Stroke::new(65535, 65535, 65535));
    }

    #[test]
    fn blanked_point_keeps_position() {
        let point = Point::blanked_at(10, -20);
        assert_eq!(point.x, 10);
        assert_eq!(point.y, -20);
        assert_eq!((point.r, point.g, point.b), (0, 0, 0));
    }

    #[test]
    fn stroked_point_takes_stroke_color() {
        let stroke = Stroke::new(1, 2, 3);
        let point = Point::stroked(5, 6, &stroke);
        assert_eq!(point, Point::new(5, 6, 1, 2, 3));
    }

    #[test]
    fn clamp_coord_pins_to_i16_range() {
        assert_eq!(clamp_coord(0), 0);
        assert_eq!(clamp_coord(32767), 32767);
        assert_eq!(clamp_coord(32768), 32767);
        assert_eq!(clamp_coord(-32768), -32768);
        assert_eq!(clamp_coord(-100_000), -32768);
    }

    #[test]
    fn default_output_parameters() {
        let params = OutputParameters::default();
        assert_eq!(params.pps(), 30_000);
        assert_eq!(params.loop_count(), 1);
    }

    #[test]
    fn set_pps_rejects_non_positive() {
        let mut params = OutputParameters::default();
        assert!(params.set_pps(0).is_err());
        assert!(params.set_pps(-5).is_err());
        assert_eq!(params.pps(), DEFAULT_PPS, "rejected value leaves previous");

        params.set_pps(40_000).unwrap();
        assert_eq!(params.pps(), 40_000);
    }

    #[test]
    fn set_loop_count_rejects_zero_only() {
        let mut params = OutputParameters::default();
        assert!(params.set_loop_count(0).is_err());
        assert_eq!(params.loop_count(), 1, "rejected value leaves previous");

        params.set_loop_count(LOOP_FOREVER).unwrap();
        assert_eq!(params.loop_count(), -1);
        params.set_loop_count(7).unwrap();
        assert_eq!(params.loop_count(), 7);
    }
}
