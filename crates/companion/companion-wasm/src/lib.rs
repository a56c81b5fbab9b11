use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use companion_core::{
    Companion, CompanionConfig, GestureEvent, PanelState, PetError, PetState, PointerEvent,
    PointerResponse, SceneChange, SceneGraph, ScreenPos, Vec2,
};

pub mod bridge;

pub use bridge::{JsWindowBridge, WindowCall};

/// Everything a JS host needs to render one frame.
#[derive(Serialize)]
struct Frame<'a> {
    state: PetState,
    position: Vec2,
    changes: Vec<SceneChange>,
    window_calls: Vec<WindowCall>,
    panel: &'a PanelState,
}

#[wasm_bindgen]
pub struct WasmCompanion {
    core: Companion<SceneGraph, JsWindowBridge>,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn parse<T: serde::de::DeserializeOwned>(what: &str, v: JsValue) -> Result<T, JsError> {
    swb::from_value(v).map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

#[wasm_bindgen]
impl WasmCompanion {
    /// Create a companion. Pass a config object or undefined/null for defaults.
    /// Example:
    ///   new WasmCompanion({ flight: { duration_ms: 600 } })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmCompanion, JsError> {
        console_error_panic_hook::set_once();

        let cfg: CompanionConfig = if jsvalue_is_undefined_or_null(&config) {
            CompanionConfig::default()
        } else {
            parse("config", config)?
        };
        let core = Companion::new(SceneGraph::new(), JsWindowBridge::default(), cfg)
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;
        Ok(WasmCompanion { core })
    }

    /// Advance by `dt_ms` and return the frame: scene changes to apply, window
    /// calls to perform, pet state and panel.
    #[wasm_bindgen]
    pub fn update(&mut self, dt_ms: f32) -> Result<JsValue, JsError> {
        self.core.advance(dt_ms);
        let changes = self.core.surface_mut().drain_changes();
        let window_calls = self.core.bridge_mut().take_calls();
        let frame = Frame {
            state: self.core.pet().state(),
            position: self.core.pet().position(),
            changes,
            window_calls,
            panel: self.core.panel(),
        };
        swb::to_value(&frame).map_err(|e| JsError::new(&format!("frame error: {e}")))
    }

    /// Returns false when the pet is busy and the gesture was ignored.
    #[wasm_bindgen(js_name = on_gesture)]
    pub fn on_gesture(&mut self, gesture: JsValue) -> Result<bool, JsError> {
        let gesture: GestureEvent = parse("gesture", gesture)?;
        match self.core.on_gesture(gesture) {
            Ok(()) => Ok(true),
            Err(PetError::Busy { .. }) => Ok(false),
            Err(e) => Err(JsError::new(&e.to_string())),
        }
    }

    /// Returns true when the pointer was captured for a drag; the host should
    /// then suppress default handling.
    #[wasm_bindgen(js_name = pointer_down)]
    pub fn pointer_down(&mut self, event: JsValue) -> Result<bool, JsError> {
        let event: PointerEvent = parse("pointer", event)?;
        Ok(self.core.pointer_down(&event) == PointerResponse::Captured)
    }

    #[wasm_bindgen(js_name = pointer_move)]
    pub fn pointer_move(&mut self, event: JsValue) -> Result<(), JsError> {
        let event: PointerEvent = parse("pointer", event)?;
        self.core.pointer_move(&event);
        Ok(())
    }

    #[wasm_bindgen(js_name = pointer_up)]
    pub fn pointer_up(&mut self, event: JsValue) -> Result<(), JsError> {
        let event: PointerEvent = parse("pointer", event)?;
        self.core.pointer_up(&event);
        Ok(())
    }

    #[wasm_bindgen(js_name = pointer_cancel)]
    pub fn pointer_cancel(&mut self, pointer_id: u32) {
        self.core.pointer_cancel(pointer_id);
    }

    #[wasm_bindgen(js_name = resolve_position)]
    pub fn resolve_position(&mut self, id: u32, x: i32, y: i32) -> bool {
        self.core
            .bridge_mut()
            .resolve_position(id, ScreenPos::new(x, y))
    }

    /// Acknowledge a move or click-through call.
    #[wasm_bindgen]
    pub fn resolve(&mut self, id: u32) -> bool {
        self.core.bridge_mut().resolve(id)
    }

    #[wasm_bindgen]
    pub fn reject(&mut self, id: u32, reason: String) -> bool {
        self.core.bridge_mut().reject(id, &reason)
    }

    #[wasm_bindgen(js_name = switch_pet)]
    pub fn switch_pet(&mut self, id: String) -> Result<(), JsError> {
        self.core
            .switch_pet(&id)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(js_name = set_action_enabled)]
    pub fn set_action_enabled(&mut self, id: String, enabled: bool) -> bool {
        self.core.panel_mut().set_enabled(&id, enabled)
    }

    #[wasm_bindgen]
    pub fn destroy(&mut self) {
        self.core.destroy();
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

/// Ids of the built-in pet plugins.
#[wasm_bindgen]
pub fn pet_ids() -> js_sys::Array {
    companion_core::PetRegistry::default()
        .ids()
        .into_iter()
        .map(JsValue::from_str)
        .collect()
}
