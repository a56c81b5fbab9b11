use companion_core::{
    BridgeError, DragController, HitRegion, HitTarget, PointerButton, PointerEvent,
    PointerResponse, ScreenPos, Vec2,
};
use companion_test_fixtures::ManualWindowBridge;

fn pet_at(x: f32, y: f32) -> Option<HitTarget> {
    Some(HitTarget {
        origin: Vec2::new(x, y),
        region: HitRegion::ellipse(60.0, 45.0),
    })
}

fn pointer(id: u32, local: Vec2, screen: Vec2) -> PointerEvent {
    PointerEvent {
        pointer_id: id,
        button: PointerButton::Primary,
        local,
        screen,
    }
}

fn at(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

#[test]
fn moves_before_position_answer_are_sent_once_it_arrives() {
    let mut bridge = ManualWindowBridge::new();
    let mut drag = DragController::new();

    let r = drag.on_pointer_down(&pointer(1, at(100.0, 130.0), at(900.0, 700.0)), pet_at(100.0, 130.0), &mut bridge);
    assert_eq!(r, PointerResponse::Captured);
    assert_eq!(bridge.pending_queries(), 1);
    assert_eq!(drag.drag_start_window(), None);

    drag.on_pointer_move(&pointer(1, at(100.0, 130.0), at(905.0, 702.0)), &mut bridge);
    drag.on_pointer_move(&pointer(1, at(100.0, 130.0), at(912.0, 698.0)), &mut bridge);
    assert!(bridge.move_log.is_empty());

    assert!(bridge.answer_position(Ok(ScreenPos::new(800, 560))));
    drag.poll(&mut bridge);
    assert_eq!(drag.drag_start_window(), Some(ScreenPos::new(800, 560)));
    assert_eq!(bridge.move_log, vec![ScreenPos::new(812, 558)]);
}

#[test]
fn requested_position_is_start_plus_cumulative_offset() {
    let mut bridge = ManualWindowBridge::new();
    let mut drag = DragController::new();
    drag.on_pointer_down(&pointer(7, at(95.0, 125.0), at(300.0, 300.0)), pet_at(100.0, 130.0), &mut bridge);
    bridge.answer_position(Ok(ScreenPos::new(40, 60)));
    drag.poll(&mut bridge);

    let path = [(303.4, 301.0), (309.9, 296.2), (320.0, 290.0), (331.6, 288.8)];
    for (i, (sx, sy)) in path.iter().enumerate() {
        drag.on_pointer_move(&pointer(7, at(0.0, 0.0), at(*sx, *sy)), &mut bridge);
        assert!(bridge.pending_moves() <= 1, "more than one move in flight at step {i}");
        let sent = bridge.answer_move(Ok(())).expect("a move was issued");
        let expected = ScreenPos::new(
            40 + (sx - 300.0_f32).round() as i32,
            60 + (sy - 300.0_f32).round() as i32,
        );
        assert_eq!(sent, expected);
        drag.poll(&mut bridge);
    }
    assert_eq!(drag.moves_issued(), path.len() as u64);
}

#[test]
fn burst_of_moves_coalesces_to_latest_target() {
    let mut bridge = ManualWindowBridge::new();
    let mut drag = DragController::new();
    drag.on_pointer_down(&pointer(1, at(100.0, 130.0), at(0.0, 0.0)), pet_at(100.0, 130.0), &mut bridge);
    bridge.answer_position(Ok(ScreenPos::new(0, 0)));
    drag.poll(&mut bridge);

    for step in 1..=20 {
        drag.on_pointer_move(&pointer(1, at(0.0, 0.0), at(step as f32, 0.0)), &mut bridge);
    }
    assert_eq!(bridge.pending_moves(), 1);
    assert_eq!(bridge.answer_move(Ok(())), Some(ScreenPos::new(1, 0)));

    drag.poll(&mut bridge);
    assert_eq!(bridge.answer_move(Ok(())), Some(ScreenPos::new(20, 0)));
    drag.poll(&mut bridge);
    assert_eq!(bridge.pending_moves(), 0);
    assert_eq!(drag.moves_issued(), 2);
}

#[test]
fn down_outside_hit_region_starts_nothing() {
    let mut bridge = ManualWindowBridge::new();
    let mut drag = DragController::new();
    let r = drag.on_pointer_down(&pointer(1, at(170.0, 130.0), at(0.0, 0.0)), pet_at(100.0, 130.0), &mut bridge);
    assert_eq!(r, PointerResponse::Ignored);
    assert!(!drag.is_dragging());
    assert_eq!(bridge.pending_queries(), 0);

    drag.on_pointer_move(&pointer(1, at(170.0, 130.0), at(50.0, 50.0)), &mut bridge);
    assert!(bridge.move_log.is_empty());
}

#[test]
fn failed_position_query_aborts_the_drag() {
    let mut bridge = ManualWindowBridge::new();
    let mut drag = DragController::new();
    drag.on_pointer_down(&pointer(1, at(100.0, 130.0), at(0.0, 0.0)), pet_at(100.0, 130.0), &mut bridge);
    drag.on_pointer_move(&pointer(1, at(0.0, 0.0), at(30.0, 30.0)), &mut bridge);

    bridge.answer_position(Err(BridgeError::Unavailable));
    drag.poll(&mut bridge);
    assert!(!drag.is_dragging());
    assert!(bridge.move_log.is_empty());

    // A fresh press works again.
    let r = drag.on_pointer_down(&pointer(2, at(100.0, 130.0), at(0.0, 0.0)), pet_at(100.0, 130.0), &mut bridge);
    assert_eq!(r, PointerResponse::Captured);
}

#[test]
fn dropped_query_counts_as_failure() {
    let mut bridge = ManualWindowBridge::new();
    let mut drag = DragController::new();
    drag.on_pointer_down(&pointer(1, at(100.0, 130.0), at(0.0, 0.0)), pet_at(100.0, 130.0), &mut bridge);
    drop(bridge);
    let mut replacement = ManualWindowBridge::new();
    drag.poll(&mut replacement);
    assert!(!drag.is_dragging());
}

#[test]
fn failed_move_waits_for_the_next_pointer_move() {
    let mut bridge = ManualWindowBridge::new();
    let mut drag = DragController::new();
    drag.on_pointer_down(&pointer(1, at(100.0, 130.0), at(0.0, 0.0)), pet_at(100.0, 130.0), &mut bridge);
    bridge.answer_position(Ok(ScreenPos::new(200, 100)));
    drag.poll(&mut bridge);

    drag.on_pointer_move(&pointer(1, at(0.0, 0.0), at(10.0, 0.0)), &mut bridge);
    assert_eq!(bridge.answer_move(Err(BridgeError::Unavailable)), Some(ScreenPos::new(210, 100)));
    for _ in 0..10 {
        drag.poll(&mut bridge);
        assert_eq!(bridge.answer_move(Err(BridgeError::Unavailable)), None);
    }
    assert_eq!(drag.moves_issued(), 1);
    assert!(drag.is_dragging());

    drag.on_pointer_move(&pointer(1, at(0.0, 0.0), at(12.0, 1.0)), &mut bridge);
    drag.poll(&mut bridge);
    assert_eq!(bridge.pending_moves(), 1);
    assert_eq!(bridge.answer_move(Ok(())), Some(ScreenPos::new(212, 101)));
    drag.poll(&mut bridge);
    assert_eq!(bridge.pending_moves(), 0);
    assert_eq!(drag.moves_issued(), 2);
}

#[test]
fn cancel_re_evaluates_click_through() {
    let mut bridge = ManualWindowBridge::new();
    let mut drag = DragController::new();
    drag.on_pointer_down(&pointer(1, at(100.0, 130.0), at(0.0, 0.0)), pet_at(100.0, 130.0), &mut bridge);
    assert_eq!(bridge.click_through_log, vec![false]);
    bridge.answer_position(Ok(ScreenPos::new(0, 0)));
    drag.on_pointer_move(&pointer(1, at(20.0, 20.0), at(3.0, 3.0)), &mut bridge);

    drag.on_pointer_cancel(1, pet_at(100.0, 130.0), &mut bridge);
    assert!(!drag.is_dragging());
    assert_eq!(bridge.click_through_log, vec![false, true]);
}

#[test]
fn no_requests_after_release() {
    let mut bridge = ManualWindowBridge::new();
    let mut drag = DragController::new();
    drag.on_pointer_down(&pointer(1, at(100.0, 130.0), at(0.0, 0.0)), pet_at(100.0, 130.0), &mut bridge);
    bridge.answer_position(Ok(ScreenPos::new(10, 10)));
    drag.on_pointer_move(&pointer(1, at(0.0, 0.0), at(5.0, 0.0)), &mut bridge);
    assert_eq!(bridge.move_log.len(), 1);

    drag.on_pointer_up(&pointer(1, at(100.0, 130.0), at(5.0, 0.0)), pet_at(100.0, 130.0), &mut bridge);
    bridge.answer_move(Ok(()));
    for i in 0..5 {
        drag.on_pointer_move(&pointer(1, at(0.0, 0.0), at(10.0 + i as f32, 0.0)), &mut bridge);
        drag.poll(&mut bridge);
    }
    assert_eq!(bridge.move_log.len(), 1);
}

#[test]
fn other_pointers_do_not_steer_the_session() {
    let mut bridge = ManualWindowBridge::new();
    let mut drag = DragController::new();
    drag.on_pointer_down(&pointer(1, at(100.0, 130.0), at(0.0, 0.0)), pet_at(100.0, 130.0), &mut bridge);
    bridge.answer_position(Ok(ScreenPos::new(0, 0)));
    drag.poll(&mut bridge);

    drag.on_pointer_move(&pointer(9, at(0.0, 0.0), at(80.0, 80.0)), &mut bridge);
    assert!(bridge.move_log.is_empty());
    drag.on_pointer_cancel(9, pet_at(100.0, 130.0), &mut bridge);
    assert!(drag.is_dragging());
    drag.on_pointer_cancel(1, pet_at(100.0, 130.0), &mut bridge);
    assert!(!drag.is_dragging());
}

#[test]
fn click_through_toggles_with_hover() {
    let mut bridge = ManualWindowBridge::new();
    let mut drag = DragController::new();
    drag.on_pointer_hover(at(400.0, 400.0), pet_at(100.0, 130.0), &mut bridge);
    drag.on_pointer_hover(at(100.0, 130.0), pet_at(100.0, 130.0), &mut bridge);
    drag.on_pointer_hover(at(105.0, 128.0), pet_at(100.0, 130.0), &mut bridge);
    assert_eq!(bridge.click_through_log, vec![true, false]);
    assert_eq!(bridge.answer_click_through(), 2);
    drag.poll(&mut bridge);
    assert_eq!(drag.click_through(), Some(false));
}
