//! UDP/OSC datagram front end.
//!
//! A single cooperative loop: drain every queued datagram (applying messages
//! in arrival order), then run one scheduler step. All messages received
//! since the previous cycle land in the frame before that cycle's write, so
//! a cycle never sends a half-updated frame.

use std::net::{SocketAddr, UdpSocket};

use log::{debug, info, warn};
use rosc::{decoder, OscMessage, OscPacket, OscType};

use crate::backend::DacBackend;
use crate::context::{CancelToken, CanvasState};
use crate::error::Result;
use crate::scheduler::{CycleOutcome, OutputScheduler, SchedulerConfig};
use crate::types::RunExit;

/// Receive buffer size; matches the largest datagram the protocol allows.
const OSC_BUFFER_SIZE: usize = 65536;

/// Apply a decoded OSC packet to the canvas. Bundles are applied in the
/// order their messages appear, recursively.
pub fn apply_packet(state: &mut CanvasState, packet: OscPacket) {
    match packet {
        OscPacket::Message(msg) => apply_message(state, msg),
        OscPacket::Bundle(bundle) => {
            for inner in bundle.content {
                apply_packet(state, inner);
            }
        }
    }
}

fn apply_message(state: &mut CanvasState, msg: OscMessage) {
    let Some(args) = int_args(&msg.args) else {
        debug!("ignoring {} with non-integer arguments", msg.addr);
        return;
    };

    match (msg.addr.as_str(), args.as_slice()) {
        ("/p", &[x, y, r, g, b]) => {
            super::append_colored(state, x, y, r, g, b);
        }
        ("/c", &[r, g, b]) => super::set_stroke(state, r, g, b),
        ("/x", &[x, y]) => {
            super::append_with_stroke(state, x, y);
        }
        ("/clear", []) => state.frame.clear(),
        ("/set_pps", &[value]) => super::set_pps(state, value),
        ("/set_loop_count", &[value]) => super::set_loop_count(state, value),
        ("/test_pattern", []) => super::apply_test_pattern(state),
        (addr, _) => debug!("ignoring {} with {} arguments", addr, args.len()),
    }
}

/// All arguments as i32, or `None` if any has another type.
fn int_args(args: &[OscType]) -> Option<Vec<i32>> {
    args.iter()
        .map(|arg| match arg {
            OscType::Int(value) => Some(*value),
            _ => None,
        })
        .collect()
}

/// The datagram front-end server: socket, canvas, and scheduler in one
/// single-threaded loop.
pub struct OscServer {
    socket: UdpSocket,
    state: CanvasState,
    scheduler: OutputScheduler,
}

impl OscServer {
    /// Bind the listener and take ownership of the connected DAC.
    pub fn bind(port: u16, dac: Box<dyn DacBackend>) -> Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", port))?;
        socket.set_nonblocking(true)?;
        info!("listening for OSC on {}", socket.local_addr()?);

        Ok(Self {
            socket,
            state: CanvasState::new(),
            scheduler: OutputScheduler::new(dac, SchedulerConfig::datagram()),
        })
    }

    /// The bound listener address (useful when binding port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Run the loop until cancelled or the DAC disconnects. Releases the
    /// DAC (stop, then disconnect) on the way out.
    pub fn run(mut self, cancel: &CancelToken) -> Result<RunExit> {
        let mut buf = vec![0u8; OSC_BUFFER_SIZE];

        loop {
            if cancel.is_cancelled() {
                self.scheduler.release();
                return Ok(RunExit::Stopped);
            }

            let drained = match self.drain_datagrams(&mut buf) {
                Ok(drained) => drained,
                Err(err) => {
                    self.scheduler.release();
                    return Err(err);
                }
            };

            match self.scheduler.step(&mut self.state) {
                Ok(CycleOutcome::Wrote(_)) => {}
                Ok(_) => {
                    if !drained {
                        std::thread::sleep(self.scheduler.config().cycle_interval);
                    }
                }
                Err(err) if err.is_disconnected() => {
                    warn!("DAC lost: {}", err);
                    self.scheduler.release();
                    return Ok(RunExit::Disconnected);
                }
                Err(err) => warn!("DAC write failed: {}", err),
            }
        }
    }

    /// Apply every queued datagram in arrival order. Returns whether any
    /// arrived.
    fn drain_datagrams(&mut self, buf: &mut [u8]) -> Result<bool> {
        let mut drained = false;
        loop {
            match self.socket.recv_from(buf) {
                Ok((len, _src)) => {
                    drained = true;
                    match decoder::decode_udp(&buf[..len]) {
                        Ok((_rest, packet)) => apply_packet(&mut self.state, packet),
                        Err(err) => debug!("dropping undecodable datagram: {:?}", err),
                    }
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(drained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::to_dac_channel;
    use crate::types::Point;
    use rosc::{OscBundle, OscTime};

    fn msg(addr: &str, args: Vec<OscType>) -> OscPacket {
        OscPacket::Message(OscMessage {
            addr: addr.to_string(),
            args,
        })
    }

    fn ints(addr: &str, values: &[i32]) -> OscPacket {
        msg(addr, values.iter().map(|v| OscType::Int(*v)).collect())
    }

    #[test]
    fn p_appends_point_with_explicit_color() {
        let mut state = CanvasState::new();
        apply_packet(&mut state, ints("/p", &[1000, 2000, 255, 0, 0]));

        assert_eq!(state.frame.count(), 1);
        assert_eq!(
            state.frame.points()[0],
            Point::new(1000, 2000, to_dac_channel(255), 0, 0)
        );
    }

    #[test]
    fn c_then_x_applies_the_stroke() {
        let mut state = CanvasState::new();
        apply_packet(&mut state, ints("/c", &[0, 255, 0]));
        apply_packet(&mut state, ints("/x", &[1500, 2500]));

        assert_eq!(state.frame.points()[0], Point::new(1500, 2500, 0, 65535, 0));
    }

    #[test]
    fn clear_and_parameters() {
        let mut state = CanvasState::new();
        apply_packet(&mut state, ints("/p", &[0, 0, 1, 2, 3]));
        apply_packet(&mut state, ints("/clear", &[]));
        assert_eq!(state.frame.count(), 0);

        apply_packet(&mut state, ints("/set_pps", &[40000]));
        assert_eq!(state.params.pps(), 40_000);
        apply_packet(&mut state, ints("/set_loop_count", &[0]));
        assert_eq!(state.params.loop_count(), 1, "zero rejected");
    }

    #[test]
    fn test_pattern_replaces_frame() {
        let mut state = CanvasState::new();
        apply_packet(&mut state, ints("/x", &[5, 5]));
        apply_packet(&mut state, ints("/test_pattern", &[]));
        assert_eq!(state.frame.count(), 256);
    }

    #[test]
    fn bundle_applies_in_order() {
        let mut state = CanvasState::new();
        let bundle = OscPacket::Bundle(OscBundle {
            timetag: OscTime {
                seconds: 0,
                fractional: 0,
            },
            content: vec![
                ints("/c", &[255, 255, 255]),
                ints("/x", &[1, 1]),
                ints("/c", &[255, 0, 0]),
                ints("/x", &[2, 2]),
            ],
        });
        apply_packet(&mut state, bundle);

        assert_eq!(state.frame.count(), 2);
        assert_eq!(state.frame.points()[0].g, 65535, "first point pre-change");
        assert_eq!(state.frame.points()[1].g, 0, "second point post-change");
    }

    #[test]
    fn wrong_arity_or_type_is_ignored() {
        let mut state = CanvasState::new();
        apply_packet(&mut state, ints("/p", &[1, 2, 3]));
        apply_packet(
            &mut state,
            msg("/x", vec![OscType::Float(1.0), OscType::Float(2.0)]),
        );
        apply_packet(&mut state, ints("/unknown", &[1]));
        assert_eq!(state.frame.count(), 0);
    }
}
