//! Drag-to-move: pointer gestures on the pet move the host window.
//!
//! Session protocol:
//! 1. Primary-button down inside the hit region opens a session and asks the
//!    host for the window position. The host should suppress default handling
//!    and capture the pointer when `on_pointer_down` returns `Captured`.
//! 2. Each move adds the delta from the previous screen sample to a running
//!    offset. At most one move request is outstanding; while one is in flight
//!    new targets are not queued, the next pump sends the latest one.
//! 3. Up or cancel closes the session and re-evaluates hover click-through.
//!    No move is issued afterwards.
//!
//! Host failures never surface: a failed position query aborts the session, a
//! failed move clears the in-flight slot. A move is only sent for a pointer
//! move that has not been sent yet, so failures are never resent on their own.

use serde::{Deserialize, Serialize};

use crate::art::HitRegion;
use crate::transform::Vec2;
use crate::window::{poll_pending, Pending, ScreenPos, WindowBridge};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub button: PointerButton,
    /// Position in surface-local coordinates.
    pub local: Vec2,
    /// Position in screen coordinates.
    pub screen: Vec2,
}

/// What the pet looks like to the hit test this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitTarget {
    pub origin: Vec2,
    pub region: HitRegion,
}

impl HitTarget {
    pub fn contains(&self, point: Vec2) -> bool {
        self.region.contains(self.origin, point)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerResponse {
    Ignored,
    /// A session started: suppress default handling and capture the pointer.
    Captured,
}

#[derive(Debug)]
enum SessionPhase {
    /// Waiting for the host to report the window position.
    Acquiring(Pending<ScreenPos>),
    Active { start_window: ScreenPos },
}

#[derive(Debug)]
struct DragSession {
    pointer_id: u32,
    start_screen: Vec2,
    last_screen: Vec2,
    /// Last surface-local pointer position, for hover after cancel.
    last_local: Vec2,
    /// Sum of per-move screen deltas since the session opened.
    offset: Vec2,
    phase: SessionPhase,
    in_flight: Option<Pending<()>>,
    /// Last target the window is known or asked to be at. `None` after a failure.
    last_requested: Option<ScreenPos>,
    /// A pointer move arrived since the last move request was issued.
    dirty: bool,
}

#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
    /// Last click-through value requested from the host.
    click_through: Option<bool>,
    /// Fire-and-forget click-through requests awaiting an answer.
    side_requests: Vec<Pending<()>>,
    moves_issued: u64,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Pointer held by the open session.
    pub fn captured_pointer(&self) -> Option<u32> {
        self.session.as_ref().map(|s| s.pointer_id)
    }

    /// True while a window-move request awaits the host.
    pub fn move_in_flight(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.in_flight.is_some())
            .unwrap_or(false)
    }

    /// Window position at drag start, once the host has reported it.
    pub fn drag_start_window(&self) -> Option<ScreenPos> {
        match self.session.as_ref().map(|s| &s.phase) {
            Some(SessionPhase::Active { start_window }) => Some(*start_window),
            _ => None,
        }
    }

    /// Screen position of the pointer when the session opened.
    pub fn drag_start_screen(&self) -> Option<Vec2> {
        self.session.as_ref().map(|s| s.start_screen)
    }

    pub fn moves_issued(&self) -> u64 {
        self.moves_issued
    }

    pub fn click_through(&self) -> Option<bool> {
        self.click_through
    }

    pub fn on_pointer_down(
        &mut self,
        ev: &PointerEvent,
        target: Option<HitTarget>,
        bridge: &mut dyn WindowBridge,
    ) -> PointerResponse {
        if self.session.is_some() || ev.button != PointerButton::Primary {
            return PointerResponse::Ignored;
        }
        let Some(target) = target else {
            return PointerResponse::Ignored;
        };
        if !target.contains(ev.local) {
            return PointerResponse::Ignored;
        }

        self.session = Some(DragSession {
            pointer_id: ev.pointer_id,
            start_screen: ev.screen,
            last_screen: ev.screen,
            last_local: ev.local,
            offset: Vec2::ZERO,
            phase: SessionPhase::Acquiring(bridge.window_position()),
            in_flight: None,
            last_requested: None,
            dirty: false,
        });
        self.request_click_through(false, bridge);
        log::debug!(
            "drag: session opened for pointer {} at ({}, {})",
            ev.pointer_id,
            ev.screen.x,
            ev.screen.y
        );
        self.pump(bridge);
        PointerResponse::Captured
    }

    pub fn on_pointer_move(&mut self, ev: &PointerEvent, bridge: &mut dyn WindowBridge) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.pointer_id != ev.pointer_id {
            return;
        }
        // Incremental deltas: skipped move events cannot cause drift.
        let delta = ev.screen - session.last_screen;
        session.offset = session.offset + delta;
        session.last_screen = ev.screen;
        session.last_local = ev.local;
        session.dirty = true;
        self.pump(bridge);
    }

    /// Close the session for `ev.pointer_id` and re-evaluate click-through
    /// from where the pointer was released.
    pub fn on_pointer_up(
        &mut self,
        ev: &PointerEvent,
        target: Option<HitTarget>,
        bridge: &mut dyn WindowBridge,
    ) {
        if self.end_session(ev.pointer_id) {
            self.on_pointer_hover(ev.local, target, bridge);
        }
    }

    /// Close the session for `pointer_id` and re-evaluate click-through from
    /// the last position the session saw.
    pub fn on_pointer_cancel(
        &mut self,
        pointer_id: u32,
        target: Option<HitTarget>,
        bridge: &mut dyn WindowBridge,
    ) {
        let last_local = match &self.session {
            Some(s) if s.pointer_id == pointer_id => s.last_local,
            _ => return,
        };
        if self.end_session(pointer_id) {
            self.on_pointer_hover(last_local, target, bridge);
        }
    }

    /// Outside a drag, let clicks fall through everywhere except over the pet.
    pub fn on_pointer_hover(
        &mut self,
        local: Vec2,
        target: Option<HitTarget>,
        bridge: &mut dyn WindowBridge,
    ) {
        if self.session.is_some() {
            return;
        }
        let over_pet = target.map(|t| t.contains(local)).unwrap_or(false);
        self.request_click_through(!over_pet, bridge);
    }

    /// Drain answered host requests and issue the next move if one is due.
    /// Hosts call this once per frame in addition to the pointer callbacks.
    pub fn poll(&mut self, bridge: &mut dyn WindowBridge) {
        self.side_requests.retain_mut(|p| match poll_pending(p) {
            None => true,
            Some(Ok(())) => false,
            Some(Err(e)) => {
                log::warn!("drag: click-through request failed: {e}");
                false
            }
        });
        self.pump(bridge);
    }

    fn end_session(&mut self, pointer_id: u32) -> bool {
        match &self.session {
            Some(s) if s.pointer_id == pointer_id => {
                log::debug!(
                    "drag: session closed for pointer {pointer_id} after offset ({}, {})",
                    s.offset.x,
                    s.offset.y
                );
                self.session = None;
                true
            }
            _ => false,
        }
    }

    fn request_click_through(&mut self, ignore: bool, bridge: &mut dyn WindowBridge) {
        if self.click_through == Some(ignore) {
            return;
        }
        self.click_through = Some(ignore);
        self.side_requests.push(bridge.set_click_through(ignore));
    }

    fn pump(&mut self, bridge: &mut dyn WindowBridge) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if let SessionPhase::Acquiring(query) = &mut session.phase {
            match poll_pending(query) {
                None => return,
                Some(Ok(pos)) => {
                    log::debug!("drag: window at ({}, {})", pos.x, pos.y);
                    session.phase = SessionPhase::Active { start_window: pos };
                    session.last_requested = Some(pos);
                }
                Some(Err(e)) => {
                    log::warn!("drag: window position query failed, drag aborted: {e}");
                    self.session = None;
                    return;
                }
            }
        }
        let SessionPhase::Active { start_window } = session.phase else {
            return;
        };

        if let Some(pending) = session.in_flight.as_mut() {
            match poll_pending(pending) {
                None => return,
                Some(Ok(())) => session.in_flight = None,
                Some(Err(e)) => {
                    log::warn!("drag: window move failed, waiting for the next move: {e}");
                    session.in_flight = None;
                    session.last_requested = None;
                }
            }
        }
        if !session.dirty {
            return;
        }
        session.dirty = false;

        let target = ScreenPos::new(
            start_window.x + session.offset.x.round() as i32,
            start_window.y + session.offset.y.round() as i32,
        );
        if session.last_requested != Some(target) {
            session.in_flight = Some(bridge.set_window_position(target));
            session.last_requested = Some(target);
            self.moves_issued += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::window::{request, Resolver};

    /// Answers position queries immediately and parks move requests.
    #[derive(Default)]
    struct ParkingBridge {
        origin: ScreenPos,
        moves: Vec<(ScreenPos, Resolver<()>)>,
        click_through: Vec<bool>,
    }

    impl WindowBridge for ParkingBridge {
        fn window_position(&mut self) -> Pending<ScreenPos> {
            crate::window::ready(Ok(self.origin))
        }
        fn set_window_position(&mut self, pos: ScreenPos) -> Pending<()> {
            let (tx, rx) = request();
            self.moves.push((pos, tx));
            rx
        }
        fn set_click_through(&mut self, ignore: bool) -> Pending<()> {
            self.click_through.push(ignore);
            crate::window::ready(Ok(()))
        }
    }

    fn target() -> Option<HitTarget> {
        Some(HitTarget {
            origin: Vec2::new(100.0, 100.0),
            region: HitRegion::ellipse(60.0, 45.0),
        })
    }

    fn ev(local: (f32, f32), screen: (f32, f32)) -> PointerEvent {
        PointerEvent {
            pointer_id: 1,
            button: PointerButton::Primary,
            local: Vec2::new(local.0, local.1),
            screen: Vec2::new(screen.0, screen.1),
        }
    }

    #[test]
    fn down_outside_region_is_ignored() {
        let mut bridge = ParkingBridge::default();
        let mut drag = DragController::new();
        let r = drag.on_pointer_down(&ev((155.0, 140.0), (0.0, 0.0)), target(), &mut bridge);
        assert_eq!(r, PointerResponse::Ignored);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn secondary_button_is_ignored() {
        let mut bridge = ParkingBridge::default();
        let mut drag = DragController::new();
        let mut e = ev((100.0, 100.0), (0.0, 0.0));
        e.button = PointerButton::Secondary;
        assert_eq!(drag.on_pointer_down(&e, target(), &mut bridge), PointerResponse::Ignored);
    }

    #[test]
    fn coalesces_while_move_in_flight() {
        let mut bridge = ParkingBridge {
            origin: ScreenPos::new(500, 400),
            ..Default::default()
        };
        let mut drag = DragController::new();
        let r = drag.on_pointer_down(&ev((100.0, 100.0), (600.0, 500.0)), target(), &mut bridge);
        assert_eq!(r, PointerResponse::Captured);
        assert_eq!(drag.drag_start_window(), Some(ScreenPos::new(500, 400)));

        drag.on_pointer_move(&ev((100.0, 100.0), (610.0, 505.0)), &mut bridge);
        drag.on_pointer_move(&ev((100.0, 100.0), (615.0, 507.0)), &mut bridge);
        drag.on_pointer_move(&ev((100.0, 100.0), (620.0, 510.0)), &mut bridge);
        assert_eq!(bridge.moves.len(), 1);
        assert_eq!(bridge.moves[0].0, ScreenPos::new(510, 405));

        let (_, tx) = bridge.moves.remove(0);
        tx.send(Ok(())).expect("controller holds the pending end");
        drag.poll(&mut bridge);
        assert_eq!(bridge.moves.len(), 1);
        assert_eq!(bridge.moves[0].0, ScreenPos::new(520, 410));
    }

    #[test]
    fn failed_move_clears_in_flight_slot() {
        let mut bridge = ParkingBridge::default();
        let mut drag = DragController::new();
        drag.on_pointer_down(&ev((100.0, 100.0), (0.0, 0.0)), target(), &mut bridge);
        drag.on_pointer_move(&ev((100.0, 100.0), (3.0, 0.0)), &mut bridge);
        let (_, tx) = bridge.moves.remove(0);
        tx.send(Err(BridgeError::rejected("busy"))).expect("pending alive");
        for _ in 0..5 {
            drag.poll(&mut bridge);
        }
        assert!(!drag.move_in_flight());
        assert!(bridge.moves.is_empty());
        assert_eq!(drag.moves_issued(), 1);

        drag.on_pointer_move(&ev((100.0, 100.0), (4.0, 0.0)), &mut bridge);
        drag.poll(&mut bridge);
        assert_eq!(bridge.moves.len(), 1);
        assert_eq!(bridge.moves[0].0, ScreenPos::new(4, 0));
    }

    #[test]
    fn return_to_start_after_failure_is_still_sent() {
        let mut bridge = ParkingBridge::default();
        let mut drag = DragController::new();
        drag.on_pointer_down(&ev((100.0, 100.0), (0.0, 0.0)), target(), &mut bridge);
        drag.on_pointer_move(&ev((100.0, 100.0), (8.0, 0.0)), &mut bridge);
        let (_, tx) = bridge.moves.remove(0);
        tx.send(Ok(())).expect("pending alive");
        drag.poll(&mut bridge);

        drag.on_pointer_move(&ev((100.0, 100.0), (0.0, 0.0)), &mut bridge);
        let (pos, tx) = bridge.moves.remove(0);
        assert_eq!(pos, ScreenPos::new(0, 0));
        tx.send(Err(BridgeError::Unavailable)).expect("pending alive");
        drag.poll(&mut bridge);
        assert!(bridge.moves.is_empty());

        // Back at the drag-start offset again: the window is at an unknown
        // position, so the zero offset goes out.
        drag.on_pointer_move(&ev((100.0, 100.0), (0.0, 0.0)), &mut bridge);
        assert_eq!(bridge.moves.len(), 1);
        assert_eq!(bridge.moves[0].0, ScreenPos::new(0, 0));
    }

    #[test]
    fn cancel_restores_click_through_from_last_position() {
        let mut bridge = ParkingBridge::default();
        let mut drag = DragController::new();
        drag.on_pointer_down(&ev((100.0, 100.0), (0.0, 0.0)), target(), &mut bridge);
        drag.on_pointer_move(&ev((300.0, 300.0), (5.0, 5.0)), &mut bridge);
        drag.on_pointer_cancel(2, target(), &mut bridge);
        assert!(drag.is_dragging());
        drag.on_pointer_cancel(1, target(), &mut bridge);
        assert!(!drag.is_dragging());
        assert_eq!(bridge.click_through, vec![false, true]);
    }

    #[test]
    fn release_stops_requests_and_restores_click_through() {
        let mut bridge = ParkingBridge::default();
        let mut drag = DragController::new();
        drag.on_pointer_down(&ev((100.0, 100.0), (0.0, 0.0)), target(), &mut bridge);
        drag.on_pointer_up(&ev((300.0, 300.0), (0.0, 0.0)), target(), &mut bridge);
        assert!(!drag.is_dragging());
        drag.on_pointer_move(&ev((100.0, 100.0), (50.0, 50.0)), &mut bridge);
        assert!(bridge.moves.is_empty());
        assert_eq!(bridge.click_through, vec![false, true]);
    }

    #[test]
    fn hover_only_requests_on_change() {
        let mut bridge = ParkingBridge::default();
        let mut drag = DragController::new();
        drag.on_pointer_hover(Vec2::new(0.0, 0.0), target(), &mut bridge);
        drag.on_pointer_hover(Vec2::new(1.0, 0.0), target(), &mut bridge);
        drag.on_pointer_hover(Vec2::new(100.0, 100.0), target(), &mut bridge);
        assert_eq!(bridge.click_through, vec![true, false]);
    }
}
