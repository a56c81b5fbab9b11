use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use companion_core::{
    window::request, GestureEvent, NodeId, Pending, PointerEvent, Resolver, ScreenPos,
    WindowBridge,
};

/// Scene node id -> mirroring entity, plus the parent links needed to skip
/// descendants when a subtree is despawned in one go.
#[derive(Resource, Default)]
pub struct NodeEntities {
    pub map: HashMap<NodeId, Entity>,
    pub parents: HashMap<NodeId, NodeId>,
}

/// A window call waiting for the window-servicing system.
#[derive(Debug)]
pub enum WindowRequest {
    Position(Resolver<ScreenPos>),
    Move(ScreenPos, Resolver<()>),
    ClickThrough(bool, Resolver<()>),
}

/// Queue shared between the bridge held by the core and the ECS.
#[derive(Resource, Clone, Default)]
pub struct WindowRequests(Arc<Mutex<VecDeque<WindowRequest>>>);

impl WindowRequests {
    pub fn push(&self, req: WindowRequest) {
        match self.0.lock() {
            Ok(mut q) => q.push_back(req),
            // A poisoned queue drops the resolver; the core sees `Dropped`.
            Err(_) => log::error!("companion: window request queue poisoned"),
        }
    }

    pub fn drain(&self) -> Vec<WindowRequest> {
        match self.0.lock() {
            Ok(mut q) => q.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.0.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `WindowBridge` whose answers come from the primary Bevy window on the
/// next `Update`.
pub struct BevyWindowBridge {
    queue: WindowRequests,
}

impl BevyWindowBridge {
    pub fn new(queue: WindowRequests) -> Self {
        Self { queue }
    }
}

impl WindowBridge for BevyWindowBridge {
    fn window_position(&mut self) -> Pending<ScreenPos> {
        let (tx, rx) = request();
        self.queue.push(WindowRequest::Position(tx));
        rx
    }

    fn set_window_position(&mut self, pos: ScreenPos) -> Pending<()> {
        let (tx, rx) = request();
        self.queue.push(WindowRequest::Move(pos, tx));
        rx
    }

    fn set_click_through(&mut self, ignore: bool) -> Pending<()> {
        let (tx, rx) = request();
        self.queue.push(WindowRequest::ClickThrough(ignore, tx));
        rx
    }
}

/// Circle gesture from whichever detector the app wires in.
#[derive(Event, Debug, Clone, Copy)]
pub struct CircleGesture(pub GestureEvent);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// Pointer input in core terms. `read_mouse_system` produces these from the
/// primary window; tests and touch front-ends may send them directly.
#[derive(Event, Debug, Clone, Copy)]
pub struct PetPointer {
    pub phase: PointerPhase,
    pub event: PointerEvent,
}
