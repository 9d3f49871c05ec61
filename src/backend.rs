//! DAC collaborator traits.
//!
//! The core never implements a DAC protocol; it consumes hardware through
//! this narrow seam. A backend is connected state for one device; discovery
//! enumerates devices and produces backends.

use crate::error::Result;
use crate::types::{DacInfo, Point};

/// A connected DAC device.
///
/// Implementations own the device connection for their lifetime. The key
/// contract is [`is_ready`](DacBackend::is_ready): it must be non-blocking,
/// and the scheduler writes at most one frame per ready poll.
pub trait DacBackend: Send {
    /// Identity of the connected device.
    fn info(&self) -> DacInfo;

    /// Non-blocking readiness poll: can the device accept a frame right now?
    fn is_ready(&mut self) -> Result<bool>;

    /// Submit a frame of points at the given rate and loop count.
    fn write(&mut self, points: &[Point], pps: u32, loop_count: i32) -> Result<()>;

    /// Halt beam output.
    fn stop(&mut self) -> Result<()>;

    /// Release the device connection.
    fn disconnect(&mut self) -> Result<()>;
}

/// Enumerates DAC devices and connects to them.
pub trait DacDiscovery {
    /// Scan for available devices. An empty result is not an error.
    fn scan(&mut self) -> Vec<DacInfo>;

    /// Connect to a discovered device.
    fn connect(&mut self, info: &DacInfo) -> Result<Box<dyn DacBackend>>;
}
