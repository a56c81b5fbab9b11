//! Action panel shown next to the pet after a trigger sequence settles.
//! Pure display state; hosts render it however they like.

use serde::{Deserialize, Serialize};

use crate::transform::Vec2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelAction {
    pub id: String,
    pub icon: String,
    pub label: String,
    pub enabled: bool,
}

impl PanelAction {
    fn new(id: &str, icon: &str, label: &str, enabled: bool) -> Self {
        Self {
            id: id.into(),
            icon: icon.into(),
            label: label.into(),
            enabled,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanelState {
    pub visible: bool,
    pub position: Vec2,
    pub actions: Vec<PanelAction>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            visible: false,
            position: Vec2::ZERO,
            actions: vec![
                PanelAction::new("astronomy", "\u{1f52d}", "Sky events", false),
                PanelAction::new("birthday", "\u{1f382}", "Birthday reminders", false),
                PanelAction::new("cleanup", "\u{1f9f9}", "Clear cache", false),
                PanelAction::new("dispatch", "\u{2708}\u{fe0f}", "Send pet", false),
                PanelAction::new("settings", "\u{2699}\u{fe0f}", "Settings", true),
            ],
        }
    }
}

impl PanelState {
    pub fn show_at(&mut self, position: Vec2) {
        self.position = position;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Returns false when no action has that id.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.actions.iter_mut().find(|a| a.id == id) {
            Some(a) => {
                a.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn enabled_actions(&self) -> impl Iterator<Item = &PanelAction> {
        self.actions.iter().filter(|a| a.enabled)
    }
}
