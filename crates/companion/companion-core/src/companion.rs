//! Companion: the application façade hosts drive.
//!
//! Owns the surface, the window bridge, the active pet, the drag controller
//! and the panel. Hosts forward frames, pointer events and gestures; the
//! façade restarts idle and shows the panel when a trigger sequence settles.

use crate::config::CompanionConfig;
use crate::drag::{DragController, HitTarget, PointerEvent, PointerResponse};
use crate::error::PetError;
use crate::panel::PanelState;
use crate::pet::{
    poll_completion, Completion, GestureEvent, Pet, PetRegistry, SequenceStatus, TriggerContext,
};
use crate::surface::Surface;
use crate::window::WindowBridge;

/// Pet loaded by [`Companion::new`].
pub const DEFAULT_PET: &str = "seagull";

pub struct Companion<S: Surface, W: WindowBridge> {
    cfg: CompanionConfig,
    registry: PetRegistry,
    surface: S,
    bridge: W,
    pet: Box<dyn Pet>,
    drag: DragController,
    panel: PanelState,
    sequence: Option<Completion>,
    destroyed: bool,
}

impl<S: Surface, W: WindowBridge> Companion<S, W> {
    /// Start with the seagull idling at its configured home.
    pub fn new(surface: S, bridge: W, cfg: CompanionConfig) -> Result<Self, PetError> {
        Self::with_registry(surface, bridge, cfg, PetRegistry::default(), DEFAULT_PET)
    }

    /// Fails on an invalid config or an id `registry` does not know.
    pub fn with_registry(
        mut surface: S,
        bridge: W,
        cfg: CompanionConfig,
        registry: PetRegistry,
        pet_id: &str,
    ) -> Result<Self, PetError> {
        cfg.validate()
            .map_err(|e| PetError::InvalidConfig { reason: e.to_string() })?;
        let mut pet = registry.load(pet_id, &mut surface, &cfg)?;
        pet.play_idle(&mut surface);
        Ok(Self {
            cfg,
            registry,
            surface,
            bridge,
            pet,
            drag: DragController::new(),
            panel: PanelState::default(),
            sequence: None,
            destroyed: false,
        })
    }

    pub fn config(&self) -> &CompanionConfig {
        &self.cfg
    }

    pub fn pet(&self) -> &dyn Pet {
        self.pet.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn bridge(&self) -> &W {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut W {
        &mut self.bridge
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut PanelState {
        &mut self.panel
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// True while a trigger sequence is running.
    pub fn sequence_running(&self) -> bool {
        self.sequence.is_some()
    }

    fn hit_target(&self) -> Option<HitTarget> {
        self.pet.hit_region().map(|region| HitTarget {
            origin: self.pet.position(),
            region,
        })
    }

    /// Drive one rendered frame.
    pub fn advance(&mut self, delta_ms: f32) {
        if self.destroyed {
            return;
        }
        self.pet.advance(delta_ms, &mut self.surface);
        self.drag.poll(&mut self.bridge);

        let Some(completion) = self.sequence.as_mut() else {
            return;
        };
        match poll_completion(completion) {
            SequenceStatus::Running => {}
            SequenceStatus::Completed => {
                self.sequence = None;
                self.pet.play_idle(&mut self.surface);
                self.panel.show_at(self.pet.position());
            }
            SequenceStatus::Abandoned => {
                self.sequence = None;
            }
        }
    }

    pub fn trigger(&mut self, ctx: TriggerContext) -> Result<(), PetError> {
        if self.destroyed {
            return Err(PetError::Destroyed);
        }
        let completion = self.pet.on_trigger(ctx, &mut self.surface)?;
        self.panel.hide();
        self.sequence = Some(completion);
        Ok(())
    }

    pub fn on_gesture(&mut self, event: GestureEvent) -> Result<(), PetError> {
        self.trigger(event.into())
    }

    pub fn pointer_down(&mut self, ev: &PointerEvent) -> PointerResponse {
        if self.destroyed {
            return PointerResponse::Ignored;
        }
        let target = self.hit_target();
        self.drag.on_pointer_down(ev, target, &mut self.bridge)
    }

    /// Moves either continue a drag or update hover click-through.
    pub fn pointer_move(&mut self, ev: &PointerEvent) {
        if self.destroyed {
            return;
        }
        if self.drag.is_dragging() {
            self.drag.on_pointer_move(ev, &mut self.bridge);
        } else {
            let target = self.hit_target();
            self.drag.on_pointer_hover(ev.local, target, &mut self.bridge);
        }
    }

    pub fn pointer_up(&mut self, ev: &PointerEvent) {
        if self.destroyed {
            return;
        }
        let target = self.hit_target();
        self.drag.on_pointer_up(ev, target, &mut self.bridge);
    }

    /// Hover is re-evaluated from the last position the drag saw.
    pub fn pointer_cancel(&mut self, pointer_id: u32) {
        if self.destroyed {
            return;
        }
        let target = self.hit_target();
        self.drag.on_pointer_cancel(pointer_id, target, &mut self.bridge);
    }

    /// Replace the active pet. The current pet is kept when `id` is unknown.
    pub fn switch_pet(&mut self, id: &str) -> Result<(), PetError> {
        if self.destroyed {
            return Err(PetError::Destroyed);
        }
        if self.registry.get(id).is_none() {
            return Err(PetError::UnknownPlugin { id: id.to_string() });
        }
        self.pet.destroy(&mut self.surface);
        self.sequence = None;
        self.pet = self.registry.load(id, &mut self.surface, &self.cfg)?;
        self.pet.play_idle(&mut self.surface);
        log::debug!("companion: switched to {id}");
        Ok(())
    }

    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        if let Some(pointer) = self.drag.captured_pointer() {
            // No pet left to hover over.
            self.drag.on_pointer_cancel(pointer, None, &mut self.bridge);
        }
        self.pet.destroy(&mut self.surface);
        self.sequence = None;
        self.panel.hide();
        self.destroyed = true;
    }
}
