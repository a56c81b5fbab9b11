//! Per-frame tick scheduler.
//!
//! A `Ticker` does not own callbacks. Listeners are plain tokens (`L`) that
//! the owner dispatches on, so animation state stays in explicit structs and
//! each step function receives it by reference. Several tickers may coexist;
//! each animation phase owns its own.

use serde::{Deserialize, Serialize};

use crate::config::TickerConfig;

/// One scheduler step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Delta in frame-units (1.0 == one frame at the target rate).
    pub delta_time: f32,
    pub delta_ms: f32,
}

impl Tick {
    pub fn from_ms(delta_ms: f32, cfg: &TickerConfig) -> Self {
        let delta_ms = delta_ms.clamp(0.0, cfg.max_delta_ms);
        Self {
            delta_time: delta_ms * cfg.target_fps / 1000.0,
            delta_ms,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

#[derive(Debug)]
pub struct Ticker<L> {
    cfg: TickerConfig,
    listeners: Vec<(ListenerId, L)>,
    next_id: u32,
    started: bool,
    destroyed: bool,
}

impl<L: Copy> Ticker<L> {
    /// New tickers are stopped.
    pub fn new(cfg: TickerConfig) -> Self {
        Self {
            cfg,
            listeners: Vec::new(),
            next_id: 0,
            started: false,
            destroyed: false,
        }
    }

    /// Returns `None` once the ticker has been destroyed.
    pub fn register(&mut self, listener: L) -> Option<ListenerId> {
        if self.destroyed {
            return None;
        }
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.push((id, listener));
        Some(id)
    }

    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// No-op after destroy.
    pub fn start(&mut self) {
        if !self.destroyed {
            self.started = true;
        }
    }

    /// Idempotent.
    pub fn stop(&mut self) {
        self.started = false;
    }

    /// Stops the ticker, then releases every listener. Nothing fires afterwards.
    pub fn destroy(&mut self) {
        self.stop();
        self.listeners.clear();
        self.destroyed = true;
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[inline]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Listeners due for this frame, in registration order, paired with the tick.
    /// Empty while stopped.
    pub fn frame(&self, delta_ms: f32) -> Vec<(L, Tick)> {
        if !self.started {
            return Vec::new();
        }
        let tick = Tick::from_ms(delta_ms, &self.cfg);
        self.listeners.iter().map(|(_, l)| (*l, tick)).collect()
    }
}
