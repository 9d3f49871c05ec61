//! Shared canvas state and cancellation.
//!
//! The original design kept the frame, stroke, output parameters, and the
//! write-enable flag as free-standing process globals; here they live in one
//! explicit [`CanvasState`] passed to the decoders and the scheduler. The
//! connection-oriented front end wraps it in a [`SharedCanvas`] so the I/O
//! threads and the writer loop mutate it under one lock; the write-enable
//! flag is part of the guarded state, never a bare shared flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::frame::FrameBuffer;
use crate::types::{OutputParameters, Stroke};

/// Process-wide drawing state: the frame under assembly plus the parameters
/// that outlive it.
pub struct CanvasState {
    /// The frame currently being assembled.
    pub frame: FrameBuffer,
    /// Default color for points submitted without one.
    pub stroke: Stroke,
    /// Output rate and loop count for the next write.
    pub params: OutputParameters,
    /// Whether the current frame has been marked ready to send.
    ///
    /// Only honored by scheduler profiles with `require_write_signal`; the
    /// datagram front end writes on every ready cycle and ignores it.
    pub write_enabled: bool,
}

impl CanvasState {
    /// Creates fresh state: empty frame, white stroke, default parameters.
    pub fn new() -> Self {
        Self {
            frame: FrameBuffer::new(),
            stroke: Stroke::default(),
            params: OutputParameters::default(),
            write_enabled: false,
        }
    }

    /// Wrap this state for sharing across threads.
    pub fn into_shared(self) -> SharedCanvas {
        Arc::new(Mutex::new(self))
    }
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe handle to [`CanvasState`].
pub type SharedCanvas = Arc<Mutex<CanvasState>>;

/// Cooperative cancellation flag, polled once per loop cycle.
///
/// Replaces signal-handler globals: binaries hook SIGINT to
/// [`cancel`](CancelToken::cancel) and every loop observes the token within
/// one cycle.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_defaults() {
        let state = CanvasState::new();
        assert!(state.frame.is_empty());
        assert_eq!(state.stroke, Stroke::default());
        assert!(!state.write_enabled);
    }

    #[test]
    fn cancel_token_is_sticky_and_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }
}
