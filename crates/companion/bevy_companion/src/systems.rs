use std::collections::HashSet;

use bevy::prelude::*;
use bevy::sprite::{ColorMaterial, MaterialMesh2dBundle, Mesh2dHandle};
use bevy::window::{PrimaryWindow, WindowPosition};

use companion_core::{
    Art, BridgeError, NodeId, PointerButton, PointerEvent, Rgba, SceneChange, ScreenPos, Shape,
    Transform2D, Vec2 as CoreVec2,
};

use crate::components::{CompanionNode, CompanionShape, CompanionStage};
use crate::resources::{
    CircleGesture, NodeEntities, PetPointer, PointerPhase, WindowRequest, WindowRequests,
};
use crate::CompanionEngine;

/// Core transforms are y-down with clockwise rotation; Bevy 2D is y-up.
pub fn to_bevy_transform(t: &Transform2D) -> Transform {
    Transform {
        translation: Vec3::new(t.position.x, -t.position.y, 0.0),
        rotation: Quat::from_rotation_z(-t.rotation),
        scale: Vec3::new(t.scale.x, t.scale.y, 1.0),
    }
}

fn color(c: Rgba) -> Color {
    let [r, g, b, a] = c.0;
    Color::srgba_u8(r, g, b, a)
}

fn flip(v: CoreVec2) -> Vec2 {
    Vec2::new(v.x, -v.y)
}

pub fn spawn_stage_system(mut commands: Commands) {
    commands.spawn((
        SpatialBundle::default(),
        CompanionStage,
        Name::new("companion-stage"),
    ));
}

pub fn spawn_camera_system(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}

/// Keep the stage origin on the window's top-left corner.
pub fn update_stage_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut stage: Query<&mut Transform, With<CompanionStage>>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    for mut tf in stage.iter_mut() {
        tf.translation = Vec3::new(-window.width() / 2.0, window.height() / 2.0, 0.0);
    }
}

/// Translate left-button input on the primary window into `PetPointer` events.
pub fn read_mouse_system(
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut last_cursor: Local<Option<Vec2>>,
    mut out: EventWriter<PetPointer>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        *last_cursor = None;
        return;
    };
    let origin = match window.position {
        WindowPosition::At(p) => p.as_vec2(),
        _ => Vec2::ZERO,
    };
    let physical = window.physical_cursor_position().unwrap_or(cursor);
    let event = PointerEvent {
        pointer_id: 0,
        button: PointerButton::Primary,
        local: CoreVec2::new(cursor.x, cursor.y),
        screen: CoreVec2::new(origin.x + physical.x, origin.y + physical.y),
    };

    if *last_cursor != Some(cursor) {
        *last_cursor = Some(cursor);
        out.send(PetPointer {
            phase: PointerPhase::Move,
            event,
        });
    }
    let Some(buttons) = buttons else {
        return;
    };
    if buttons.just_pressed(MouseButton::Left) {
        out.send(PetPointer {
            phase: PointerPhase::Down,
            event,
        });
    }
    if buttons.just_released(MouseButton::Left) {
        out.send(PetPointer {
            phase: PointerPhase::Up,
            event,
        });
    }
}

pub fn forward_pointer_system(
    mut events: EventReader<PetPointer>,
    mut engine: NonSendMut<CompanionEngine>,
) {
    for PetPointer { phase, event } in events.read() {
        match phase {
            PointerPhase::Down => {
                engine.0.pointer_down(event);
            }
            PointerPhase::Move => engine.0.pointer_move(event),
            PointerPhase::Up => engine.0.pointer_up(event),
            PointerPhase::Cancel => engine.0.pointer_cancel(event.pointer_id),
        }
    }
}

pub fn forward_gestures_system(
    mut events: EventReader<CircleGesture>,
    mut engine: NonSendMut<CompanionEngine>,
) {
    for CircleGesture(gesture) in events.read() {
        if let Err(e) = engine.0.on_gesture(*gesture) {
            log::debug!("companion: gesture ignored: {e}");
        }
    }
}

pub fn advance_system(time: Res<Time>, mut engine: NonSendMut<CompanionEngine>) {
    engine.0.advance(time.delta_seconds() * 1000.0);
}

/// Answer queued window calls against the primary window. Without one every
/// call fails with `Unavailable`.
pub fn service_window_requests_system(
    requests: Res<WindowRequests>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let pending = requests.drain();
    if pending.is_empty() {
        return;
    }
    let mut window = windows.get_single_mut().ok();

    for req in pending {
        match (req, window.as_deref_mut()) {
            (WindowRequest::Position(tx), Some(w)) => {
                let answer = match w.position {
                    WindowPosition::At(p) => Ok(ScreenPos::new(p.x, p.y)),
                    _ => Err(BridgeError::rejected("window position not known yet")),
                };
                let _ = tx.send(answer);
            }
            (WindowRequest::Move(pos, tx), Some(w)) => {
                w.position = WindowPosition::At(IVec2::new(pos.x, pos.y));
                let _ = tx.send(Ok(()));
            }
            (WindowRequest::ClickThrough(ignore, tx), Some(w)) => {
                w.cursor.hit_test = !ignore;
                let _ = tx.send(Ok(()));
            }
            (WindowRequest::Position(tx), None) => {
                let _ = tx.send(Err(BridgeError::Unavailable));
            }
            (WindowRequest::Move(_, tx), None) | (WindowRequest::ClickThrough(_, tx), None) => {
                let _ = tx.send(Err(BridgeError::Unavailable));
            }
        }
    }
}

fn spawn_shapes(
    commands: &mut Commands,
    parent: Entity,
    art: &Art,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
) {
    for (i, shape) in art.shapes.iter().enumerate() {
        // Later shapes draw on top.
        let z = i as f32 * 0.01;
        let child = match shape {
            Shape::Ellipse { center, radii, fill } => commands
                .spawn(MaterialMesh2dBundle {
                    mesh: Mesh2dHandle(meshes.add(Ellipse::new(radii.x, radii.y))),
                    material: materials.add(color(*fill)),
                    transform: Transform::from_xyz(center.x, -center.y, z),
                    ..default()
                })
                .id(),
            Shape::Circle {
                center,
                radius,
                fill,
            } => commands
                .spawn(MaterialMesh2dBundle {
                    mesh: Mesh2dHandle(meshes.add(Circle::new(*radius))),
                    material: materials.add(color(*fill)),
                    transform: Transform::from_xyz(center.x, -center.y, z),
                    ..default()
                })
                .id(),
            Shape::Triangle { points, fill } => commands
                .spawn(MaterialMesh2dBundle {
                    mesh: Mesh2dHandle(meshes.add(Triangle2d::new(
                        flip(points[0]),
                        flip(points[1]),
                        flip(points[2]),
                    ))),
                    material: materials.add(color(*fill)),
                    transform: Transform::from_xyz(0.0, 0.0, z),
                    ..default()
                })
                .id(),
            Shape::Rect { origin, size, fill } => commands
                .spawn(MaterialMesh2dBundle {
                    mesh: Mesh2dHandle(meshes.add(Rectangle::new(size.x, size.y))),
                    material: materials.add(color(*fill)),
                    transform: Transform::from_xyz(
                        origin.x + size.x / 2.0,
                        -(origin.y + size.y / 2.0),
                        z,
                    ),
                    ..default()
                })
                .id(),
            Shape::Text {
                center,
                text,
                font_size,
            } => commands
                .spawn(Text2dBundle {
                    text: Text::from_section(
                        text.clone(),
                        TextStyle {
                            font_size: *font_size,
                            ..default()
                        },
                    ),
                    transform: Transform::from_xyz(center.x, -center.y, z),
                    ..default()
                })
                .id(),
        };
        commands.entity(child).insert(CompanionShape);
        commands.entity(parent).add_child(child);
    }
}

/// Mirror the core scene graph into entities by draining its change journal.
///
/// Shapes are only spawned when mesh and material assets exist, so headless
/// apps still get the node hierarchy and transforms.
pub fn sync_scene_system(
    mut commands: Commands,
    mut engine: NonSendMut<CompanionEngine>,
    mut index: ResMut<NodeEntities>,
    stage: Query<Entity, With<CompanionStage>>,
    mut meshes: Option<ResMut<Assets<Mesh>>>,
    mut materials: Option<ResMut<Assets<ColorMaterial>>>,
) {
    let Ok(stage) = stage.get_single() else {
        return;
    };
    let changes = engine.0.surface_mut().drain_changes();
    let mut despawned: HashSet<NodeId> = HashSet::new();

    for change in changes {
        match change {
            SceneChange::Created { node, art } => {
                let entity = commands
                    .spawn((
                        SpatialBundle {
                            visibility: Visibility::Hidden,
                            ..default()
                        },
                        CompanionNode(node),
                        Name::new(art.name.clone()),
                    ))
                    .id();
                if let (Some(meshes), Some(materials)) =
                    (meshes.as_deref_mut(), materials.as_deref_mut())
                {
                    spawn_shapes(&mut commands, entity, &art, meshes, materials);
                }
                index.map.insert(node, entity);
            }
            SceneChange::Attached { parent, node } => {
                let Some(&child) = index.map.get(&node) else {
                    continue;
                };
                let parent_entity = match parent {
                    Some(p) => match index.map.get(&p) {
                        Some(&e) => e,
                        None => continue,
                    },
                    None => stage,
                };
                commands.entity(parent_entity).add_child(child);
                commands.entity(child).insert(Visibility::Inherited);
                if let Some(p) = parent {
                    index.parents.insert(node, p);
                } else {
                    index.parents.remove(&node);
                }
            }
            SceneChange::Detached { node, .. } => {
                if let Some(&e) = index.map.get(&node) {
                    commands
                        .entity(e)
                        .remove_parent()
                        .insert(Visibility::Hidden);
                }
                index.parents.remove(&node);
            }
            SceneChange::Transformed { node, transform } => {
                if let Some(&e) = index.map.get(&node) {
                    commands.entity(e).insert(to_bevy_transform(&transform));
                }
            }
            SceneChange::Destroyed { node } => {
                let Some(entity) = index.map.remove(&node) else {
                    continue;
                };
                // Descendants go with their ancestor's recursive despawn.
                let covered = index
                    .parents
                    .remove(&node)
                    .map(|p| despawned.contains(&p))
                    .unwrap_or(false);
                if !covered {
                    if let Some(ec) = commands.get_entity(entity) {
                        ec.despawn_recursive();
                    }
                }
                despawned.insert(node);
            }
        }
    }
}
