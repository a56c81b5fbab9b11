//! Bevy host for the companion core.
//!
//! The core runs as a non-send resource (`CompanionEngine`) over an in-memory
//! `SceneGraph`. Each `Update`:
//! pointer/gesture events -> core -> window requests -> scene mirror.

use bevy::prelude::*;
use bevy::window::WindowLevel;
use companion_core::{Companion, CompanionConfig, SceneGraph};

pub mod components;
pub mod resources;
pub mod systems;

pub use components::{CompanionNode, CompanionShape, CompanionStage};
pub use resources::{
    BevyWindowBridge, CircleGesture, NodeEntities, PetPointer, PointerPhase, WindowRequest,
    WindowRequests,
};

/// The running companion. Not `Send`: pets are plain trait objects.
pub struct CompanionEngine(pub Companion<SceneGraph, BevyWindowBridge>);

#[derive(Clone)]
pub struct CompanionPlugin {
    pub config: CompanionConfig,
    /// Spawn a `Camera2dBundle` at startup. Off for apps bringing their own.
    pub spawn_camera: bool,
}

impl Default for CompanionPlugin {
    fn default() -> Self {
        Self {
            config: CompanionConfig::default(),
            spawn_camera: true,
        }
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompanionSet {
    Input,
    Advance,
    Mirror,
}

impl Plugin for CompanionPlugin {
    fn build(&self, app: &mut App) {
        let requests = WindowRequests::default();
        let companion = match Companion::new(
            SceneGraph::new(),
            BevyWindowBridge::new(requests.clone()),
            self.config.clone(),
        ) {
            Ok(companion) => companion,
            Err(e) => {
                log::error!("companion: plugin not installed: {e}");
                return;
            }
        };

        app.insert_resource(requests)
            .insert_resource(ClearColor(Color::NONE))
            .init_resource::<NodeEntities>()
            .add_event::<CircleGesture>()
            .add_event::<PetPointer>()
            .insert_non_send_resource(CompanionEngine(companion))
            .configure_sets(
                Update,
                (CompanionSet::Input, CompanionSet::Advance, CompanionSet::Mirror).chain(),
            )
            .add_systems(Startup, systems::spawn_stage_system)
            .add_systems(
                Update,
                (
                    (
                        systems::read_mouse_system,
                        systems::forward_pointer_system,
                        systems::forward_gestures_system,
                    )
                        .chain()
                        .in_set(CompanionSet::Input),
                    systems::advance_system.in_set(CompanionSet::Advance),
                    (
                        systems::service_window_requests_system,
                        systems::update_stage_system,
                        systems::sync_scene_system,
                    )
                        .chain()
                        .in_set(CompanionSet::Mirror),
                ),
            );

        if self.spawn_camera {
            app.add_systems(Startup, systems::spawn_camera_system);
        }
    }
}

/// Window settings for a borderless, transparent, always-on-top companion.
pub fn companion_window() -> Window {
    Window {
        title: "Companion".into(),
        resolution: (400.0, 300.0).into(),
        transparent: true,
        decorations: false,
        resizable: false,
        window_level: WindowLevel::AlwaysOnTop,
        ..default()
    }
}
