//! Host window-manager bridge.
//!
//! Every call is an asynchronous request: the bridge hands back a `Pending`
//! receiver and resolves it whenever the host answers. Callers poll with
//! `poll_pending` and never block a frame on the host.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::BridgeError;

/// Absolute window position in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenPos {
    pub x: i32,
    pub y: i32,
}

impl ScreenPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

pub type Pending<T> = oneshot::Receiver<Result<T, BridgeError>>;
pub type Resolver<T> = oneshot::Sender<Result<T, BridgeError>>;

/// Create a request channel: the bridge keeps the resolver, the caller the pending end.
pub fn request<T>() -> (Resolver<T>, Pending<T>) {
    oneshot::channel()
}

/// A request already answered, for hosts whose window calls are synchronous.
pub fn ready<T>(result: Result<T, BridgeError>) -> Pending<T> {
    let (tx, rx) = request();
    // The receiver is alive, so the send cannot fail.
    let _ = tx.send(result);
    rx
}

pub trait WindowBridge {
    fn window_position(&mut self) -> Pending<ScreenPos>;
    fn set_window_position(&mut self, pos: ScreenPos) -> Pending<()>;
    /// `ignore == true` lets pointer events fall through to windows below.
    fn set_click_through(&mut self, ignore: bool) -> Pending<()>;
}

/// Poll a request without blocking.
///
/// `None` while the host has not answered. A resolver dropped without an
/// answer resolves to `BridgeError::Dropped`.
pub fn poll_pending<T>(pending: &mut Pending<T>) -> Option<Result<T, BridgeError>> {
    match pending.try_recv() {
        Ok(result) => Some(result),
        Err(oneshot::error::TryRecvError::Empty) => None,
        Err(oneshot::error::TryRecvError::Closed) => Some(Err(BridgeError::Dropped)),
    }
}
