#![forbid(unsafe_code)]

//! Output relay: emulator output → rendering surface.
//!
//! Output that arrives before the surface is ready is held in a pending
//! buffer. The first [`OutputRelay::on_ready`] flushes that buffer in one
//! write; every later [`OutputRelay::feed`] goes straight to the surface.
//!
//! # Invariants
//!
//! 1. **Order**: the surface sees bytes in exactly the order they were fed.
//! 2. **One flush**: the pending buffer is drained once, on the first
//!    readiness signal. Later signals are no-ops.
//! 3. **No reads after latch**: the buffer lives inside the `Buffering`
//!    state, so it cannot be touched once the relay is `Ready`.
//!
//! Output produced on another thread goes through [`OutputHandle`] and is
//! applied on the owning thread by [`OutputQueue::drain_into`].

use std::sync::mpsc;

/// Destination for decoded terminal output.
///
/// Write failures are the surface's own concern; the relay never retries.
pub trait RenderSurface {
    fn write(&mut self, bytes: &[u8]);
}

impl RenderSurface for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    fn write(&mut self, bytes: &[u8]) {
        (**self).write(bytes);
    }
}

#[derive(Debug)]
enum RelayState {
    Buffering { pending: Vec<u8> },
    Ready,
}

/// Buffers output until the surface is ready, then forwards it immediately.
#[derive(Debug)]
pub struct OutputRelay<S> {
    state: RelayState,
    surface: S,
}

impl<S: RenderSurface> OutputRelay<S> {
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self {
            state: RelayState::Buffering {
                pending: Vec::new(),
            },
            surface,
        }
    }

    /// Hand `bytes` to the surface, or hold them until it is ready.
    pub fn feed(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        match &mut self.state {
            RelayState::Buffering { pending } => {
                pending.extend_from_slice(bytes);
                tracing::trace!(
                    bytes = bytes.len(),
                    pending = pending.len(),
                    "output buffered"
                );
            }
            RelayState::Ready => self.surface.write(bytes),
        }
    }

    /// Latch readiness and flush anything pending.
    ///
    /// Returns `true` if this call performed the transition; a second call
    /// does nothing and returns `false`.
    pub fn on_ready(&mut self) -> bool {
        let RelayState::Buffering { pending } =
            std::mem::replace(&mut self.state, RelayState::Ready)
        else {
            tracing::debug!("redundant surface ready signal ignored");
            return false;
        };
        tracing::info!(flushed = pending.len(), "rendering surface ready");
        if !pending.is_empty() {
            self.surface.write(&pending);
        }
        true
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, RelayState::Ready)
    }

    /// Bytes waiting for the surface (always 0 once ready).
    #[must_use]
    pub fn pending_len(&self) -> usize {
        match &self.state {
            RelayState::Buffering { pending } => pending.len(),
            RelayState::Ready => 0,
        }
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }
}

/// Create a linked producer/consumer pair for cross-thread output delivery.
#[must_use]
pub fn output_channel() -> (OutputHandle, OutputQueue) {
    let (tx, rx) = mpsc::channel();
    (OutputHandle { tx }, OutputQueue { rx })
}

/// Producer side, cloneable and `Send`; given to the emulator collaborator.
#[derive(Debug, Clone)]
pub struct OutputHandle {
    tx: mpsc::Sender<Vec<u8>>,
}

impl OutputHandle {
    /// Queue output for the owning thread.
    ///
    /// Returns `false` if the consumer is gone. Empty chunks are dropped.
    pub fn send(&self, bytes: impl Into<Vec<u8>>) -> bool {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return true;
        }
        self.tx.send(bytes).is_ok()
    }
}

/// Consumer side, owned by whoever owns the relay.
#[derive(Debug)]
pub struct OutputQueue {
    rx: mpsc::Receiver<Vec<u8>>,
}

impl OutputQueue {
    /// Move every queued chunk into `relay`, in arrival order, without blocking.
    ///
    /// Returns the number of bytes moved.
    pub fn drain_into<S: RenderSurface>(&self, relay: &mut OutputRelay<S>) -> usize {
        let mut total = 0usize;
        while let Ok(chunk) = self.rx.try_recv() {
            total = total.saturating_add(chunk.len());
            relay.feed(&chunk);
        }
        total
    }
}
