//! Network-controlled frame assembly and output scheduling for laser
//! projector DACs.
//!
//! This crate accepts real-time drawing commands over a network control
//! channel and converts them into bounded point frames handed to a galvo
//! DAC on a fixed cadence. Two front ends share one core:
//!
//! - **UDP/OSC** ([`control::osc::OscServer`], feature `osc`): a single
//!   cooperative loop that drains queued datagrams, then runs one scheduler
//!   step. Writes happen on every ready cycle.
//! - **WebSocket** ([`control::ws::WsServer`], feature `ws`): reader threads
//!   decode line-text commands into a mutex-guarded canvas; a writer loop
//!   sends the frame once the client marks it ready with `/write`.
//!
//! The core pieces are usable on their own:
//!
//! ```
//! use laser_draw::{CanvasState, CycleOutcome, OutputScheduler, SchedulerConfig};
//! use laser_draw::{DacInfo, SimulatorDac};
//!
//! let dac = Box::new(SimulatorDac::new(DacInfo::new("sim:0", "Simulator DAC")));
//! let mut scheduler = OutputScheduler::new(dac, SchedulerConfig::datagram());
//!
//! let mut state = CanvasState::new();
//! let stroke = state.stroke;
//! state.frame.append_stroked(0, 0, &stroke);
//!
//! // Short frames are padded to the profile minimum before the write.
//! let outcome = scheduler.step(&mut state).unwrap();
//! assert_eq!(outcome, CycleOutcome::Wrote(64));
//! ```
//!
//! # Hardware
//!
//! The DAC is consumed through the [`DacBackend`]/[`DacDiscovery`] traits;
//! this crate ships only the in-process [`SimulatorDac`] (gated on the
//! `LASER_DRAW_SIM_DAC` environment variable). Real drivers implement the
//! traits out of tree.

pub mod backend;
pub mod color;
pub mod context;
pub mod control;
mod error;
pub mod frame;
pub mod pattern;
pub mod scheduler;
pub mod simulator;
pub mod stabilize;
pub mod types;

// Crate-level error types
pub use error::{Error, Result};

// Core types
pub use types::{
    clamp_coord, DacInfo, OutputParameters, Point, RunExit, Stroke, DEFAULT_PPS, LOOP_FOREVER,
};

// Frame assembly
pub use frame::{AppendOutcome, FrameBuffer, FRAME_CAPACITY};
pub use stabilize::{stabilize, StabilizePolicy};

// Shared state and cancellation
pub use context::{CancelToken, CanvasState, SharedCanvas};

// Output scheduling
pub use scheduler::{
    CycleOutcome, OutputScheduler, SchedulerConfig, CONNECTION_MIN_POINTS, DATAGRAM_MIN_POINTS,
};

// DAC seam and the in-process simulator
pub use backend::{DacBackend, DacDiscovery};
pub use simulator::{SimulatorDac, SimulatorDiscovery, SIM_DAC_ENV};

use log::info;

/// Scan for DACs and connect to the first one found.
///
/// Returns `Ok(None)` when the scan finds nothing — a non-fatal "nothing to
/// do" outcome. A connect failure after devices were discovered propagates;
/// the binaries treat it as fatal.
pub fn connect_first_dac(
    discovery: &mut dyn DacDiscovery,
) -> Result<Option<Box<dyn DacBackend>>> {
    let devices = discovery.scan();
    if devices.is_empty() {
        return Ok(None);
    }

    for (index, device) in devices.iter().enumerate() {
        info!("{}: {} ({})", index, device.name, device.id);
    }

    info!("connecting to {}...", devices[0].name);
    let dac = discovery.connect(&devices[0])?;
    Ok(Some(dac))
}
