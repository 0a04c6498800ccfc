//! Headless scenario driver: runs the ember engine through a scripted
//! day at a fixed 60 Hz step and logs per-second frame summaries. Stands
//! in for a real host so engine behavior can be eyeballed without a
//! renderer.

use anyhow::Result;
use ember_core::{EmberEngine, VfxEvent, VfxKind};
use glam::Vec2;
use instant::Instant;

const DT: f32 = 1.0 / 60.0;
const SIM_SECONDS: f32 = 30.0;

struct ScriptedEvent {
    at: f32,
    run: fn(&mut EmberEngine),
}

fn script() -> Vec<ScriptedEvent> {
    vec![
        ScriptedEvent {
            at: 2.0,
            run: |e| e.set_adherence(0.55, true),
        },
        ScriptedEvent {
            at: 5.0,
            run: |e| e.post_vfx_event(VfxEvent::new(1, VfxKind::MealOnTrack)),
        },
        ScriptedEvent {
            at: 8.0,
            run: |e| {
                e.pointer_press(Vec2::new(320.0, 150.0));
            },
        },
        ScriptedEvent {
            at: 8.1,
            run: |e| {
                e.pointer_release(Vec2::new(320.0, 150.0));
            },
        },
        ScriptedEvent {
            at: 12.0,
            run: |e| e.post_vfx_event(VfxEvent::new(2, VfxKind::MealOffTrack)),
        },
        ScriptedEvent {
            at: 14.0,
            run: |e| e.set_adherence(0.35, true),
        },
        ScriptedEvent {
            at: 20.0,
            run: |e| e.set_adherence(0.97, true),
        },
        ScriptedEvent {
            at: 24.0,
            run: |e| e.set_apex_eligible(true, true),
        },
        ScriptedEvent {
            at: 26.0,
            run: |e| e.post_vfx_event(VfxEvent::new(3, VfxKind::ApexIgnition)),
        },
    ]
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut engine = EmberEngine::new();
    // Hosts often deliver a zero-area surface on the first layout pass;
    // the engine defers construction until the real one arrives.
    engine.resize(0.0, 0.0);
    engine.set_adherence(0.2, false);
    engine.resize(400.0, 600.0);

    let mut events = script();
    events.sort_by(|a, b| a.at.total_cmp(&b.at));
    let mut next_event = 0;

    let wall_start = Instant::now();
    let mut time = 0.0_f32;
    let mut next_report = 1.0_f32;
    let frames = (SIM_SECONDS / DT) as usize;

    for _ in 0..frames {
        while next_event < events.len() && events[next_event].at <= time {
            (events[next_event].run)(&mut engine);
            next_event += 1;
        }

        let frame = engine.tick(time, DT);
        time += DT;

        if time >= next_report {
            next_report += 1.0;
            if let Some(f) = &frame {
                log::info!(
                    "t={:5.1}s tier={:?} breath={:?}/{:.2} pos=({:.0},{:.0}) particles={} rings={} boost={:.2}",
                    time,
                    f.tier,
                    f.breath_segment,
                    f.breath_intensity,
                    f.body_position.x,
                    f.body_position.y,
                    f.particles.len(),
                    f.layers.rings.len(),
                    engine.apex_boost(),
                );
            }
        }
    }

    log::info!(
        "simulated {SIM_SECONDS}s ({frames} frames) in {:?}",
        wall_start.elapsed()
    );
    Ok(())
}
