use bevy::prelude::*;
use companion_core::NodeId;

/// Root entity every top-level scene node is parented under. Its transform
/// maps the core's top-left, y-down surface space onto the 2D camera.
#[derive(Component)]
pub struct CompanionStage;

/// Mirrors one node of the core scene graph.
#[derive(Component, Debug, Clone, Copy)]
pub struct CompanionNode(pub NodeId);

/// A drawn shape belonging to a `CompanionNode`.
#[derive(Component)]
pub struct CompanionShape;
