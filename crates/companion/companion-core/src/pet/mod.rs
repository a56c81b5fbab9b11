//! Pet contract, plugin registry and trigger-sequence types.
//!
//! Any concrete pet implements `Pet` and is loaded through a `PetPlugin`,
//! which is how hosts swap pets at runtime.

pub mod seagull;

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::art::HitRegion;
use crate::config::CompanionConfig;
use crate::error::PetError;
use crate::surface::Surface;
use crate::transform::Vec2;

pub use seagull::{SeagullPet, SeagullPlugin};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetState {
    Idle,
    Triggered,
    Eating,
    /// Reserved for sending the pet to another screen.
    Dispatching,
    /// Reserved for a pet arriving from another screen.
    Arrived,
}

impl PetState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Triggered => "triggered",
            Self::Eating => "eating",
            Self::Dispatching => "dispatching",
            Self::Arrived => "arrived",
        }
    }

    /// True while a trigger sequence owns the sprite.
    #[inline]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Triggered | Self::Eating)
    }
}

impl fmt::Display for PetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Input to a trigger sequence, in surface-local coordinates.
/// `radius` is carried for future use and does not affect motion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerContext {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl TriggerContext {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, radius }
    }

    #[inline]
    pub fn point(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Circle gesture payload as emitted by the external detector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl From<GestureEvent> for TriggerContext {
    fn from(e: GestureEvent) -> Self {
        TriggerContext::new(e.center_x as f32, e.center_y as f32, e.radius as f32)
    }
}

/// Resolves once a trigger sequence has removed its bait and committed the new home.
pub type Completion = oneshot::Receiver<()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceStatus {
    Running,
    Completed,
    /// The sequence was cancelled (pet destroyed or interrupted); ignore it.
    Abandoned,
}

pub fn poll_completion(completion: &mut Completion) -> SequenceStatus {
    match completion.try_recv() {
        Ok(()) => SequenceStatus::Completed,
        Err(oneshot::error::TryRecvError::Empty) => SequenceStatus::Running,
        Err(oneshot::error::TryRecvError::Closed) => SequenceStatus::Abandoned,
    }
}

/// Contract every pluggable pet satisfies. Methods that touch visuals take
/// the surface explicitly; nothing is written after `destroy`.
pub trait Pet {
    fn kind(&self) -> &'static str;

    fn state(&self) -> PetState;

    /// Start (or restart) the idle oscillation from the home position.
    fn play_idle(&mut self, surface: &mut dyn Surface);

    /// Run the bait → flight → eat → settle sequence. Rejected while busy.
    fn on_trigger(
        &mut self,
        ctx: TriggerContext,
        surface: &mut dyn Surface,
    ) -> Result<Completion, PetError>;

    /// Multi-pet interaction hook; currently a no-op.
    fn on_friend_arrived(&mut self, friend: &dyn Pet);

    /// Drive every started ticker by one rendered frame.
    fn advance(&mut self, delta_ms: f32, surface: &mut dyn Surface);

    /// Second and later calls are no-ops.
    fn destroy(&mut self, surface: &mut dyn Surface);

    fn is_destroyed(&self) -> bool;

    fn position(&self) -> Vec2;

    fn set_position(&mut self, x: f32, y: f32, surface: &mut dyn Surface);

    fn home_position(&self) -> Vec2;

    /// Takes effect on the next idle tick without resetting its phase.
    fn set_home_position(&mut self, x: f32, y: f32);

    fn hit_region(&self) -> Option<HitRegion>;
}

pub trait PetPlugin {
    fn id(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    /// Create the pet's nodes on `surface`. The pet starts still; call `play_idle`.
    fn load(&self, surface: &mut dyn Surface, cfg: &CompanionConfig) -> Box<dyn Pet>;
}

/// Plugins by id, in registration order.
pub struct PetRegistry {
    plugins: Vec<Box<dyn PetPlugin>>,
}

impl fmt::Debug for PetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

impl Default for PetRegistry {
    fn default() -> Self {
        let mut reg = Self::empty();
        reg.register(Box::new(SeagullPlugin));
        reg
    }
}

impl PetRegistry {
    pub fn empty() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Registering an id twice replaces the earlier plugin.
    pub fn register(&mut self, plugin: Box<dyn PetPlugin>) {
        self.plugins.retain(|p| p.id() != plugin.id());
        self.plugins.push(plugin);
    }

    pub fn get(&self, id: &str) -> Option<&dyn PetPlugin> {
        self.plugins.iter().find(|p| p.id() == id).map(|p| p.as_ref())
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.id()).collect()
    }

    pub fn load(
        &self,
        id: &str,
        surface: &mut dyn Surface,
        cfg: &CompanionConfig,
    ) -> Result<Box<dyn Pet>, PetError> {
        let plugin = self.get(id).ok_or_else(|| PetError::UnknownPlugin { id: id.to_string() })?;
        Ok(plugin.load(surface, cfg))
    }
}
