#![cfg(target_arch = "wasm32")]
use companion_wasm::{abi_version, pet_ids, WasmCompanion};
use serde::Serialize;
use serde_json::{json, Value};
use serde_wasm_bindgen as swb;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js(v: Value) -> JsValue {
    v.serialize(&swb::Serializer::json_compatible()).unwrap()
}

fn frame(c: &mut WasmCompanion, dt_ms: f32) -> Value {
    swb::from_value(c.update(dt_ms).unwrap()).unwrap()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
    assert_eq!(pet_ids().length(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults_and_partial_config() {
    assert!(WasmCompanion::new(JsValue::UNDEFINED).is_ok());
    assert!(WasmCompanion::new(js(json!({ "flight": { "duration_ms": 300.0 } }))).is_ok());
    assert!(WasmCompanion::new(js(json!({ "flight": { "duration_ms": -1.0 } }))).is_err());
}

#[wasm_bindgen_test]
fn first_frame_carries_initial_scene() {
    let mut c = WasmCompanion::new(JsValue::NULL).unwrap();
    let f = frame(&mut c, 16.0);
    let ops: Vec<&str> = f["changes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["op"].as_str().unwrap())
        .collect();
    assert!(ops.contains(&"created"));
    assert!(ops.contains(&"attached"));
    assert_eq!(f["state"], "idle");
}

#[wasm_bindgen_test]
fn gesture_then_busy() {
    let mut c = WasmCompanion::new(JsValue::NULL).unwrap();
    let g = json!({ "center_x": 200.0, "center_y": 150.0, "radius": 30.0 });
    assert!(c.on_gesture(js(g.clone())).unwrap());
    assert!(!c.on_gesture(js(g)).unwrap());
    let f = frame(&mut c, 16.0);
    assert_eq!(f["state"], "triggered");
}

#[wasm_bindgen_test]
fn drag_round_trip_through_window_calls() {
    let mut c = WasmCompanion::new(JsValue::NULL).unwrap();
    frame(&mut c, 0.0);
    let down = json!({
        "pointer_id": 1, "button": "primary",
        "local": { "x": 100.0, "y": 130.0 }, "screen": { "x": 10.0, "y": 10.0 }
    });
    assert!(c.pointer_down(js(down)).unwrap());

    let f = frame(&mut c, 0.0);
    let query = f["window_calls"]
        .as_array()
        .unwrap()
        .iter()
        .find(|call| call["kind"] == "position")
        .unwrap()["id"]
        .as_u64()
        .unwrap() as u32;
    assert!(c.resolve_position(query, 500, 400));

    let mv = json!({
        "pointer_id": 1, "button": "primary",
        "local": { "x": 100.0, "y": 130.0 }, "screen": { "x": 14.0, "y": 7.0 }
    });
    c.pointer_move(js(mv)).unwrap();
    let f = frame(&mut c, 0.0);
    let moves: Vec<&Value> = f["window_calls"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|call| call["kind"] == "move")
        .collect();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0]["x"], 504);
    assert_eq!(moves[0]["y"], 397);
}
