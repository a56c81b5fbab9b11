//! Window bridge for JS hosts.
//!
//! Calls are queued as numbered `WindowCall`s that the host collects once per
//! frame and answers later by id. Unanswered ids stay pending.

use std::collections::HashMap;

use serde::Serialize;

use companion_core::window::request;
use companion_core::{BridgeError, Pending, Resolver, ScreenPos, WindowBridge};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowCall {
    Position { id: u32 },
    Move { id: u32, x: i32, y: i32 },
    ClickThrough { id: u32, ignore: bool },
}

#[derive(Debug)]
enum Waiter {
    Position(Resolver<ScreenPos>),
    Unit(Resolver<()>),
}

#[derive(Debug, Default)]
pub struct JsWindowBridge {
    next_id: u32,
    outbox: Vec<WindowCall>,
    waiting: HashMap<u32, Waiter>,
}

impl JsWindowBridge {
    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Calls issued since the last take.
    pub fn take_calls(&mut self) -> Vec<WindowCall> {
        std::mem::take(&mut self.outbox)
    }

    pub fn waiting(&self) -> usize {
        self.waiting.len()
    }

    /// Answer a position call. False when `id` is unknown or not a position call.
    pub fn resolve_position(&mut self, id: u32, pos: ScreenPos) -> bool {
        match self.waiting.remove(&id) {
            Some(Waiter::Position(tx)) => {
                let _ = tx.send(Ok(pos));
                true
            }
            Some(other) => {
                self.waiting.insert(id, other);
                false
            }
            None => false,
        }
    }

    /// Answer a move or click-through call.
    pub fn resolve(&mut self, id: u32) -> bool {
        match self.waiting.remove(&id) {
            Some(Waiter::Unit(tx)) => {
                let _ = tx.send(Ok(()));
                true
            }
            Some(other) => {
                self.waiting.insert(id, other);
                false
            }
            None => false,
        }
    }

    pub fn reject(&mut self, id: u32, reason: &str) -> bool {
        let err = BridgeError::rejected(reason);
        match self.waiting.remove(&id) {
            Some(Waiter::Position(tx)) => {
                let _ = tx.send(Err(err));
                true
            }
            Some(Waiter::Unit(tx)) => {
                let _ = tx.send(Err(err));
                true
            }
            None => false,
        }
    }
}

impl WindowBridge for JsWindowBridge {
    fn window_position(&mut self) -> Pending<ScreenPos> {
        let id = self.next_id();
        let (tx, rx) = request();
        self.waiting.insert(id, Waiter::Position(tx));
        self.outbox.push(WindowCall::Position { id });
        rx
    }

    fn set_window_position(&mut self, pos: ScreenPos) -> Pending<()> {
        let id = self.next_id();
        let (tx, rx) = request();
        self.waiting.insert(id, Waiter::Unit(tx));
        self.outbox.push(WindowCall::Move {
            id,
            x: pos.x,
            y: pos.y,
        });
        rx
    }

    fn set_click_through(&mut self, ignore: bool) -> Pending<()> {
        let id = self.next_id();
        let (tx, rx) = request();
        self.waiting.insert(id, Waiter::Unit(tx));
        self.outbox.push(WindowCall::ClickThrough { id, ignore });
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use companion_core::poll_pending;

    #[test]
    fn calls_are_numbered_and_answered_by_id() {
        let mut bridge = JsWindowBridge::default();
        let mut pos = bridge.window_position();
        let mut mv = bridge.set_window_position(ScreenPos::new(4, 5));
        assert_eq!(
            bridge.take_calls(),
            vec![
                WindowCall::Position { id: 0 },
                WindowCall::Move { id: 1, x: 4, y: 5 }
            ]
        );
        assert!(bridge.take_calls().is_empty());

        // Wrong kind for the id leaves it waiting.
        assert!(!bridge.resolve(0));
        assert!(bridge.resolve_position(0, ScreenPos::new(9, 9)));
        assert_eq!(poll_pending(&mut pos), Some(Ok(ScreenPos::new(9, 9))));

        assert!(bridge.reject(1, "denied"));
        assert_eq!(
            poll_pending(&mut mv),
            Some(Err(BridgeError::rejected("denied")))
        );
        assert_eq!(bridge.waiting(), 0);
        assert!(!bridge.resolve(1));
    }

    #[test]
    fn call_kinds_serialize_tagged() {
        let json = serde_json::to_value(WindowCall::ClickThrough { id: 3, ignore: true })
            .expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({ "kind": "click_through", "id": 3, "ignore": true })
        );
    }
}
