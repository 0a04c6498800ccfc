// Pointer gesture classification through the orchestrator's mailbox.

use ember_core::EmberEngine;
use glam::Vec2;

const DT: f32 = 1.0 / 60.0;

fn running_engine() -> (EmberEngine, f32) {
    let mut engine = EmberEngine::new();
    engine.resize(400.0, 600.0);
    engine.set_adherence(0.6, false);
    let mut t = 0.0;
    engine.tick(t, DT);
    t += DT;
    (engine, t)
}

#[test]
fn quick_release_classifies_as_tap() {
    let (mut engine, mut t) = running_engine();
    let tap_point = Vec2::new(320.0, 120.0);

    engine.pointer_press(tap_point);
    engine.tick(t, DT);
    t += DT;
    assert!(engine.is_touched());

    engine.pointer_release(tap_point);
    let frame = engine.tick(t, DT).unwrap();
    assert!(!engine.is_touched());

    // Tap fires a particle pop and an impulse toward the tap point.
    let (_, bursts, _) = engine.particle_counts().unwrap();
    assert_eq!(bursts, 1);
    let toward = (tap_point - frame.body_position).normalize_or_zero();
    assert!(frame.body_velocity.normalize_or_zero().dot(toward) > 0.9);
}

#[test]
fn release_after_hold_classifies_as_swipe() {
    let (mut engine, mut t) = running_engine();
    let start = Vec2::new(100.0, 300.0);

    engine.pointer_press(start);
    engine.tick(t, DT);
    let press_time = t;
    t += DT;

    // Hold and drag for 0.6 s.
    while t - press_time < 0.6 {
        engine.pointer_move(start + Vec2::new(200.0 * (t - press_time), 0.0));
        engine.tick(t, DT);
        t += DT;
    }
    engine.pointer_release(start + Vec2::new(120.0, 0.0));
    let frame = engine.tick(t, DT).unwrap();

    // Velocity comes from displacement over duration: 120 over ~0.6 s.
    assert!(frame.body_velocity.x > 120.0, "vx = {}", frame.body_velocity.x);
    assert!(frame.body_velocity.x < 240.0, "vx = {}", frame.body_velocity.x);
    // No particle pop on a swipe.
    let (_, bursts, _) = engine.particle_counts().unwrap();
    assert_eq!(bursts, 0);
}

#[test]
fn holding_attracts_the_body_toward_the_pointer() {
    let (mut engine, mut t) = running_engine();
    let pointer = Vec2::new(360.0, 80.0);
    let start_dist = (pointer - engine.body_position().unwrap()).length();

    engine.pointer_press(pointer);
    for _ in 0..120 {
        engine.tick(t, DT);
        t += DT;
    }
    let end_dist = (pointer - engine.body_position().unwrap()).length();
    assert!(
        end_dist < start_dist,
        "body did not approach held pointer: {start_dist} -> {end_dist}"
    );
    assert!(engine.is_touched());
}

#[test]
fn cancel_ends_the_session_without_effects() {
    let (mut engine, mut t) = running_engine();
    engine.pointer_press(Vec2::new(200.0, 200.0));
    engine.tick(t, DT);
    t += DT;
    engine.pointer_cancel();
    engine.tick(t, DT);
    assert!(!engine.is_touched());
    let (_, bursts, _) = engine.particle_counts().unwrap();
    assert_eq!(bursts, 0);
}
