use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use companion_core::window::{ready, request};
use companion_core::{BridgeError, Pending, Resolver, ScreenPos, WindowBridge};

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    configs: HashMap<String, String>,
    gestures: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod configs {
    use super::*;
    use companion_core::CompanionConfig;

    pub fn keys() -> Vec<String> {
        MANIFEST.configs.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&MANIFEST.configs, "config", name)?)
    }

    /// Parsed and validated through the core loader.
    pub fn load(name: &str) -> Result<CompanionConfig> {
        let text = json(name)?;
        CompanionConfig::from_json_str(&text)
            .with_context(|| format!("config fixture '{name}' is invalid"))
    }
}

pub mod gestures {
    use super::*;
    use companion_core::GestureEvent;

    pub fn keys() -> Vec<String> {
        MANIFEST.gestures.keys().cloned().collect()
    }

    pub fn load(name: &str) -> Result<Vec<GestureEvent>> {
        super::load_json(lookup(&MANIFEST.gestures, "gesture", name)?)
    }
}

/// Window bridge whose requests stay pending until the test answers them.
#[derive(Debug, Default)]
pub struct ManualWindowBridge {
    queries: VecDeque<Resolver<ScreenPos>>,
    moves: VecDeque<(ScreenPos, Resolver<()>)>,
    click_through: VecDeque<(bool, Resolver<()>)>,
    /// Every move target requested, in order.
    pub move_log: Vec<ScreenPos>,
    /// Every click-through value requested, in order.
    pub click_through_log: Vec<bool>,
}

impl ManualWindowBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_queries(&self) -> usize {
        self.queries.len()
    }

    pub fn pending_moves(&self) -> usize {
        self.moves.len()
    }

    /// Answer the oldest position query. Returns false when none is pending.
    pub fn answer_position(&mut self, result: Result<ScreenPos, BridgeError>) -> bool {
        match self.queries.pop_front() {
            Some(tx) => {
                let _ = tx.send(result);
                true
            }
            None => false,
        }
    }

    /// Answer the oldest move request, returning its target.
    pub fn answer_move(&mut self, result: Result<(), BridgeError>) -> Option<ScreenPos> {
        let (pos, tx) = self.moves.pop_front()?;
        let _ = tx.send(result);
        Some(pos)
    }

    pub fn answer_click_through(&mut self) -> usize {
        let n = self.click_through.len();
        for (_, tx) in self.click_through.drain(..) {
            let _ = tx.send(Ok(()));
        }
        n
    }
}

impl WindowBridge for ManualWindowBridge {
    fn window_position(&mut self) -> Pending<ScreenPos> {
        let (tx, rx) = request();
        self.queries.push_back(tx);
        rx
    }

    fn set_window_position(&mut self, pos: ScreenPos) -> Pending<()> {
        let (tx, rx) = request();
        self.move_log.push(pos);
        self.moves.push_back((pos, tx));
        rx
    }

    fn set_click_through(&mut self, ignore: bool) -> Pending<()> {
        let (tx, rx) = request();
        self.click_through_log.push(ignore);
        self.click_through.push_back((ignore, tx));
        rx
    }
}

/// Window bridge that answers every request immediately, like a host whose
/// window calls are synchronous.
#[derive(Debug, Default)]
pub struct ImmediateWindowBridge {
    pub position: ScreenPos,
    pub click_through: bool,
    /// When set, every call fails with `BridgeError::Unavailable`.
    pub offline: bool,
    pub moves: Vec<ScreenPos>,
}

impl ImmediateWindowBridge {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            position: ScreenPos::new(x, y),
            ..Self::default()
        }
    }
}

impl WindowBridge for ImmediateWindowBridge {
    fn window_position(&mut self) -> Pending<ScreenPos> {
        if self.offline {
            return ready(Err(BridgeError::Unavailable));
        }
        ready(Ok(self.position))
    }

    fn set_window_position(&mut self, pos: ScreenPos) -> Pending<()> {
        if self.offline {
            return ready(Err(BridgeError::Unavailable));
        }
        self.position = pos;
        self.moves.push(pos);
        ready(Ok(()))
    }

    fn set_click_through(&mut self, ignore: bool) -> Pending<()> {
        if self.offline {
            return ready(Err(BridgeError::Unavailable));
        }
        self.click_through = ignore;
        ready(Ok(()))
    }
}
