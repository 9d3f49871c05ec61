//! WebSocket line-text front end.
//!
//! Two-thread shape: an accept thread owns the listener and spawns one
//! reader thread per connection, each decoding messages into the shared
//! canvas under its lock; the scheduler writer loop runs on the caller's
//! thread. Reader threads use a short read timeout so every loop observes
//! the cancel token within one cycle.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};
use socket2::{Domain, Protocol, Socket, Type};
use tungstenite::{Message, WebSocket};

use crate::backend::DacBackend;
use crate::context::{CancelToken, CanvasState, SharedCanvas};
use crate::control::text::apply_line;
use crate::error::Result;
use crate::scheduler::{OutputScheduler, SchedulerConfig};
use crate::types::RunExit;

const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);
const READ_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The WebSocket front-end server.
pub struct WsServer {
    listener: TcpListener,
    canvas: SharedCanvas,
    scheduler: OutputScheduler,
}

impl WsServer {
    /// Bind the listener and take ownership of the connected DAC.
    pub fn bind(port: u16, dac: Box<dyn DacBackend>) -> Result<Self> {
        let addr: SocketAddr = ([0, 0, 0, 0], port).into();
        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        socket.listen(16)?;
        let listener: TcpListener = socket.into();
        listener.set_nonblocking(true)?;
        info!("WebSocket server listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            canvas: CanvasState::new().into_shared(),
            scheduler: OutputScheduler::new(dac, SchedulerConfig::connection()),
        })
    }

    /// The bound listener address (useful when binding port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run until cancelled or the DAC disconnects.
    ///
    /// The writer loop runs on this thread; on exit the token is cancelled
    /// so the accept and reader threads wind down too, and the DAC is
    /// released before returning.
    pub fn run(mut self, cancel: &CancelToken) -> Result<RunExit> {
        let accept_handle = spawn_accept_loop(self.listener, self.canvas.clone(), cancel.clone());

        let exit = self.scheduler.run(&self.canvas, cancel);

        // Device loss ends the run without an external cancel; the I/O
        // threads still need the signal to stop.
        cancel.cancel();
        if let Err(err) = accept_handle.join() {
            warn!("accept thread panicked: {:?}", err);
        }
        Ok(exit)
    }
}

fn spawn_accept_loop(
    listener: TcpListener,
    canvas: SharedCanvas,
    cancel: CancelToken,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut readers: Vec<JoinHandle<()>> = Vec::new();

        while !cancel.is_cancelled() {
            match listener.accept() {
                Ok((stream, peer)) => {
                    match accept_connection(stream) {
                        Ok(ws) => {
                            info!("connection opened: {}", peer);
                            let canvas = canvas.clone();
                            let cancel = cancel.clone();
                            readers.push(thread::spawn(move || {
                                read_loop(ws, peer, canvas, cancel);
                            }));
                        }
                        Err(err) => debug!("handshake with {} failed: {}", peer, err),
                    }
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(err) => {
                    warn!("accept failed: {}", err);
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }

        for reader in readers {
            let _ = reader.join();
        }
    })
}

/// Complete the WebSocket handshake on a freshly accepted stream.
///
/// The stream switches to blocking-with-timeout so the read loop can poll
/// the cancel token between messages.
fn accept_connection(stream: TcpStream) -> Result<WebSocket<TcpStream>> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(READ_POLL_INTERVAL))?;
    tungstenite::accept(stream).map_err(|err| crate::error::Error::Backend(err.to_string().into()))
}

fn read_loop(
    mut ws: WebSocket<TcpStream>,
    peer: SocketAddr,
    canvas: SharedCanvas,
    cancel: CancelToken,
) {
    while !cancel.is_cancelled() {
        match ws.read() {
            Ok(msg) if msg.is_text() => {
                if let Ok(line) = msg.to_text() {
                    let mut state = canvas.lock().unwrap();
                    apply_line(&mut state, line);
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(tungstenite::Error::Io(err))
                if matches!(
                    err.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) => {}
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => break,
            Err(err) => {
                debug!("read from {} failed: {}", peer, err);
                break;
            }
        }
    }
    info!("connection closed: {}", peer);
}
