//! Companion Core (engine-agnostic)
//!
//! Interaction and animation engine for a desktop companion sprite living in
//! a transparent window: per-frame tick scheduling, idle/flight/eat motion,
//! the trigger-sequence state machine and drag-to-move window sync.
//!
//! Rendering and the host window manager are reached only through the
//! `Surface` and `WindowBridge` traits; adapters implement them.

pub mod anim;
pub mod art;
pub mod companion;
pub mod config;
pub mod drag;
pub mod easing;
pub mod error;
pub mod panel;
pub mod pet;
pub mod surface;
pub mod ticker;
pub mod transform;
pub mod window;

// Re-exports for consumers (adapters)
pub use anim::{EatOscillator, FlightInterpolator, IdleOscillator, Step};
pub use art::{Art, HitRegion, Rgba, Shape};
pub use companion::{Companion, DEFAULT_PET};
pub use config::{CompanionConfig, EatConfig, FlightConfig, IdleConfig, TickerConfig};
pub use drag::{DragController, HitTarget, PointerButton, PointerEvent, PointerResponse};
pub use error::{BridgeError, ConfigError, PetError};
pub use panel::{PanelAction, PanelState};
pub use pet::{
    poll_completion, Completion, GestureEvent, Pet, PetPlugin, PetRegistry, PetState,
    SeagullPet, SeagullPlugin, SequenceStatus, TriggerContext,
};
pub use surface::{NodeId, SceneChange, SceneGraph, SceneNode, Surface};
pub use ticker::{ListenerId, Tick, Ticker};
pub use transform::{Facing, Transform2D, Vec2};
pub use window::{poll_pending, Pending, Resolver, ScreenPos, WindowBridge};
