//! In-process virtual DAC for development and tests without hardware.
//!
//! [`SimulatorDac`] models a device point buffer that drains at the last
//! written rate: fullness is estimated as last fullness minus elapsed time
//! times pps, and the device reports ready while a full frame's worth of
//! room remains. [`SimulatorDiscovery`] exposes it behind the
//! `LASER_DRAW_SIM_DAC` environment variable so the binaries find no
//! hardware by default.

use std::time::Instant;

use log::debug;

use crate::backend::{DacBackend, DacDiscovery};
use crate::error::{Error, Result};
use crate::frame::FRAME_CAPACITY;
use crate::types::{DacInfo, Point, DEFAULT_PPS};

/// Environment variable gating simulator discovery.
pub const SIM_DAC_ENV: &str = "LASER_DRAW_SIM_DAC";

/// Modeled device buffer depth in points.
const DEVICE_BUFFER_POINTS: usize = 2 * FRAME_CAPACITY;

/// Virtual DAC with a time-decay buffer model.
pub struct SimulatorDac {
    info: DacInfo,
    pps: u32,
    last_write: Option<Instant>,
    last_fullness: usize,
    connected: bool,
}

impl SimulatorDac {
    /// Creates a connected simulator device.
    pub fn new(info: DacInfo) -> Self {
        Self {
            info,
            pps: DEFAULT_PPS,
            last_write: None,
            last_fullness: 0,
            connected: true,
        }
    }

    /// Estimated buffer fullness at `now`, decayed at the last written rate.
    fn fullness_at(&self, now: Instant) -> usize {
        let Some(written_at) = self.last_write else {
            return 0;
        };
        let elapsed = now.saturating_duration_since(written_at);
        let consumed = (elapsed.as_secs_f64() * self.pps as f64) as usize;
        self.last_fullness.saturating_sub(consumed)
    }

    fn ready_at(&self, now: Instant) -> bool {
        DEVICE_BUFFER_POINTS - self.fullness_at(now) >= FRAME_CAPACITY
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(Error::disconnected(format!("{} is disconnected", self.info.id)))
        }
    }
}

impl DacBackend for SimulatorDac {
    fn info(&self) -> DacInfo {
        self.info.clone()
    }

    fn is_ready(&mut self) -> Result<bool> {
        self.ensure_connected()?;
        Ok(self.ready_at(Instant::now()))
    }

    fn write(&mut self, points: &[Point], pps: u32, loop_count: i32) -> Result<()> {
        self.ensure_connected()?;
        let now = Instant::now();
        self.last_fullness =
            (self.fullness_at(now) + points.len()).min(DEVICE_BUFFER_POINTS);
        self.last_write = Some(now);
        self.pps = pps.max(1);
        debug!(
            "{}: accepted {} points at {} pps (loop {}), fullness {}",
            self.info.id,
            points.len(),
            pps,
            loop_count,
            self.last_fullness
        );
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.ensure_connected()?;
        self.last_fullness = 0;
        self.last_write = None;
        debug!("{}: output stopped", self.info.id);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        debug!("{}: disconnected", self.info.id);
        Ok(())
    }
}

/// Discovery for the simulator device.
pub struct SimulatorDiscovery {
    enabled: bool,
}

impl SimulatorDiscovery {
    /// Discovery with the simulator explicitly enabled or disabled.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Discovery gated on the [`SIM_DAC_ENV`] environment variable: enabled
    /// when set to anything other than `"0"`.
    pub fn from_env() -> Self {
        let enabled = std::env::var(SIM_DAC_ENV)
            .map(|value| value != "0")
            .unwrap_or(false);
        Self::new(enabled)
    }
}

impl DacDiscovery for SimulatorDiscovery {
    fn scan(&mut self) -> Vec<DacInfo> {
        if self.enabled {
            vec![DacInfo::new("sim:0", "Simulator DAC")]
        } else {
            Vec::new()
        }
    }

    fn connect(&mut self, info: &DacInfo) -> Result<Box<dyn DacBackend>> {
        if !self.enabled || info.id != "sim:0" {
            return Err(Error::disconnected(format!("unknown device: {}", info.id)));
        }
        Ok(Box::new(SimulatorDac::new(info.clone())))
    }
}
