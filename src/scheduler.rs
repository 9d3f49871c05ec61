//! DAC-readiness-driven output scheduling.
//!
//! Each cycle the scheduler polls the DAC once and makes exactly one
//! decision: do nothing (not ready, or awaiting a write signal), write the
//! stabilized frame, or command a stop when there is nothing to draw. Write
//! and stop failures propagate to the caller; the only retry semantics in
//! this subsystem are the readiness re-poll on the next cycle.

use std::time::Duration;

use log::{debug, trace, warn};

use crate::backend::DacBackend;
use crate::context::{CancelToken, CanvasState, SharedCanvas};
use crate::error::Result;
use crate::stabilize::{stabilize, StabilizePolicy};
use crate::types::RunExit;

/// Minimum frame length for the datagram front end.
pub const DATAGRAM_MIN_POINTS: usize = 64;

/// Minimum frame length for the connection-oriented front end.
///
/// Higher than the datagram minimum because its clients submit larger
/// batched commands per frame.
pub const CONNECTION_MIN_POINTS: usize = 200;

const DEFAULT_CYCLE_INTERVAL: Duration = Duration::from_millis(1);

/// Per-front-end scheduling profile.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Minimum frame length handed to the DAC (shorter frames are padded).
    pub min_points: usize,
    /// How padding interacts with the frame's logical length.
    pub policy: StabilizePolicy,
    /// Only act on ready cycles after the client marked the frame ready
    /// (`write_enabled`).
    pub require_write_signal: bool,
    /// Reset the frame and the write signal after a completed write.
    pub clear_after_write: bool,
    /// Sleep inserted by run loops on cycles that did no work.
    pub cycle_interval: Duration,
}

impl SchedulerConfig {
    /// Profile for the datagram (OSC) front end: write every ready cycle,
    /// transient padding, frame persists across writes.
    pub fn datagram() -> Self {
        Self {
            min_points: DATAGRAM_MIN_POINTS,
            policy: StabilizePolicy::Transient,
            require_write_signal: false,
            clear_after_write: false,
            cycle_interval: DEFAULT_CYCLE_INTERVAL,
        }
    }

    /// Profile for the connection-oriented (WebSocket) front end: write only
    /// on an explicit `/write`, committed padding, frame consumed by the
    /// write.
    pub fn connection() -> Self {
        Self {
            min_points: CONNECTION_MIN_POINTS,
            policy: StabilizePolicy::Committed,
            require_write_signal: true,
            clear_after_write: true,
            cycle_interval: DEFAULT_CYCLE_INTERVAL,
        }
    }

    /// Override the minimum frame length (builder pattern).
    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    /// Override the stabilization policy (builder pattern).
    pub fn with_policy(mut self, policy: StabilizePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the idle-cycle sleep (builder pattern).
    pub fn with_cycle_interval(mut self, interval: Duration) -> Self {
        self.cycle_interval = interval;
        self
    }
}

/// What one scheduler cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The DAC was not ready; nothing happened.
    NotReady,
    /// The DAC was ready but the frame has not been marked ready to send.
    AwaitingWrite,
    /// Wrote this many points (including stabilization padding).
    Wrote(usize),
    /// Nothing to draw; the DAC was commanded to stop.
    Stopped,
}

/// Owns the connected DAC and drives it one decision per cycle.
pub struct OutputScheduler {
    dac: Box<dyn DacBackend>,
    config: SchedulerConfig,
}

impl OutputScheduler {
    /// Creates a scheduler driving `dac` with the given profile.
    pub fn new(dac: Box<dyn DacBackend>, config: SchedulerConfig) -> Self {
        Self { dac, config }
    }

    /// The active profile.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Run one scheduling cycle against the current state.
    pub fn step(&mut self, state: &mut CanvasState) -> Result<CycleOutcome> {
        if !self.dac.is_ready()? {
            return Ok(CycleOutcome::NotReady);
        }

        if self.config.require_write_signal && !state.write_enabled {
            return Ok(CycleOutcome::AwaitingWrite);
        }

        let pps = state.params.pps();
        let loop_count = state.params.loop_count();

        let written = match stabilize(&mut state.frame, self.config.min_points, self.config.policy)
        {
            Some(points) => {
                let n = points.len();
                self.dac.write(points, pps, loop_count)?;
                trace!("wrote {} points at {} pps (loop {})", n, pps, loop_count);
                Some(n)
            }
            None => {
                // An explicitly written empty frame stops the beam.
                self.dac.stop()?;
                trace!("empty frame, DAC stopped");
                None
            }
        };

        if self.config.clear_after_write {
            state.frame.clear();
            state.write_enabled = false;
        }

        Ok(match written {
            Some(n) => CycleOutcome::Wrote(n),
            None => CycleOutcome::Stopped,
        })
    }

    /// Continuous writer loop over a shared canvas, for the two-thread front
    /// end. Locks the canvas for the duration of each stabilize+write, polls
    /// the cancel token once per cycle, and releases the DAC on the way out.
    pub fn run(&mut self, canvas: &SharedCanvas, cancel: &CancelToken) -> RunExit {
        loop {
            if cancel.is_cancelled() {
                self.release();
                return RunExit::Stopped;
            }

            let outcome = {
                let mut state = canvas.lock().unwrap();
                self.step(&mut state)
            };

            match outcome {
                Ok(CycleOutcome::Wrote(_)) => {}
                Ok(_) => std::thread::sleep(self.config.cycle_interval),
                Err(err) if err.is_disconnected() => {
                    warn!("DAC lost: {}", err);
                    self.release();
                    return RunExit::Disconnected;
                }
                Err(err) => {
                    // The device may answer the next readiness poll.
                    warn!("DAC write failed: {}", err);
                    std::thread::sleep(self.config.cycle_interval);
                }
            }
        }
    }

    /// Best-effort shutdown: stop the beam, then drop the connection.
    pub fn release(&mut self) {
        if let Err(err) = self.dac.stop() {
            debug!("stop during shutdown failed: {}", err);
        }
        if let Err(err) = self.dac.disconnect() {
            debug!("disconnect during shutdown failed: {}", err);
        }
    }
}
