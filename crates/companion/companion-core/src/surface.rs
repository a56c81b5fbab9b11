//! Rendering surface contract and the in-memory scene graph.
//!
//! The core only creates, parents, transforms and destroys nodes. Hosts
//! either implement `Surface` directly over their canvas library or mirror a
//! `SceneGraph` by draining its change journal every frame.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::art::Art;
use crate::transform::Transform2D;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

pub trait Surface {
    /// Create a detached node drawing `art`.
    fn create_node(&mut self, art: &Art) -> NodeId;

    /// Attach `child` under `parent`, or under the stage root when `parent` is `None`.
    fn add_child(&mut self, parent: Option<NodeId>, child: NodeId);

    /// Detach `child` without destroying it.
    fn remove_child(&mut self, parent: Option<NodeId>, child: NodeId);

    /// Destroy `node` and all of its descendants. Unknown ids are ignored.
    fn destroy(&mut self, node: NodeId);

    fn set_transform(&mut self, node: NodeId, transform: &Transform2D);
}

/// Journal entry recorded by `SceneGraph` for host-side mirroring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SceneChange {
    Created { node: NodeId, art: Art },
    Attached { parent: Option<NodeId>, node: NodeId },
    Detached { parent: Option<NodeId>, node: NodeId },
    Transformed { node: NodeId, transform: Transform2D },
    Destroyed { node: NodeId },
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub art: Art,
    pub transform: Transform2D,
    pub parent: Option<NodeId>,
    pub attached: bool,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    roots: Vec<NodeId>,
    next_id: u32,
    journal: Vec<SceneChange>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Stage-level children in attach order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// First live node drawing the art named `name`.
    pub fn find_by_art(&self, name: &str) -> Option<NodeId> {
        let mut ids: Vec<&NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.art.name == name)
            .map(|(id, _)| id)
            .collect();
        ids.sort_by_key(|id| id.0);
        ids.first().map(|id| **id)
    }

    /// Take every change recorded since the previous drain.
    pub fn drain_changes(&mut self) -> Vec<SceneChange> {
        std::mem::take(&mut self.journal)
    }

    fn detach(&mut self, node: NodeId) -> Option<Option<NodeId>> {
        let n = self.nodes.get_mut(&node)?;
        if !n.attached {
            return None;
        }
        let parent = n.parent.take();
        n.attached = false;
        match parent {
            Some(p) => {
                if let Some(pn) = self.nodes.get_mut(&p) {
                    pn.children.retain(|c| *c != node);
                }
            }
            None => self.roots.retain(|c| *c != node),
        }
        Some(parent)
    }
}

impl Surface for SceneGraph {
    fn create_node(&mut self, art: &Art) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.nodes.insert(
            id,
            SceneNode {
                art: art.clone(),
                transform: Transform2D::IDENTITY,
                parent: None,
                attached: false,
                children: Vec::new(),
            },
        );
        self.journal.push(SceneChange::Created {
            node: id,
            art: art.clone(),
        });
        id
    }

    fn add_child(&mut self, parent: Option<NodeId>, child: NodeId) {
        if !self.nodes.contains_key(&child) {
            return;
        }
        if let Some(p) = parent {
            if !self.nodes.contains_key(&p) {
                return;
            }
        }
        self.detach(child);
        match parent {
            Some(p) => {
                if let Some(pn) = self.nodes.get_mut(&p) {
                    pn.children.push(child);
                }
            }
            None => self.roots.push(child),
        }
        if let Some(n) = self.nodes.get_mut(&child) {
            n.parent = parent;
            n.attached = true;
        }
        self.journal.push(SceneChange::Attached {
            parent,
            node: child,
        });
    }

    fn remove_child(&mut self, parent: Option<NodeId>, child: NodeId) {
        let is_child = self
            .nodes
            .get(&child)
            .map(|n| n.attached && n.parent == parent)
            .unwrap_or(false);
        if is_child && self.detach(child).is_some() {
            self.journal.push(SceneChange::Detached {
                parent,
                node: child,
            });
        }
    }

    fn destroy(&mut self, node: NodeId) {
        if !self.nodes.contains_key(&node) {
            return;
        }
        self.detach(node);
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.remove(&id) {
                stack.extend(n.children);
                self.journal.push(SceneChange::Destroyed { node: id });
            }
        }
    }

    fn set_transform(&mut self, node: NodeId, transform: &Transform2D) {
        if let Some(n) = self.nodes.get_mut(&node) {
            if n.transform != *transform {
                n.transform = *transform;
                self.journal.push(SceneChange::Transformed {
                    node,
                    transform: *transform,
                });
            }
        }
    }
}
