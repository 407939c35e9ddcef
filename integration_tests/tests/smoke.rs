//! End-to-end exercise: events queued from another thread, drained into
//! the tick loop, autopilot left to wander for a while.

mod common;

use facility_core::{
    ComponentMask, InputEvent, InputQueue, Key, Simulation, SimulationConfig,
};

#[test]
fn config_fixture_drives_the_session() -> anyhow::Result<()> {
    common::ensure_test_config();

    let raw = std::fs::read_to_string(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/test_simulation_config.json"),
    )?;
    let expected: SimulationConfig = serde_json::from_str(&raw)?;

    let config = SimulationConfig::load();
    assert_eq!(config, expected);

    let sim = Simulation::new(config)?;
    assert_eq!(sim.map().width, expected.width);
    assert_eq!(sim.map().height, expected.height);
    Ok(())
}

#[test]
fn events_cross_the_queue_from_another_thread() {
    common::ensure_test_config();

    let queue = InputQueue::new();
    let sender = queue.sender();
    let handle = std::thread::spawn(move || {
        sender.send(InputEvent::new(Key::Right));
        sender.send(InputEvent::new(Key::Interact));
    });
    handle.join().expect("producer thread");

    let events = queue.drain();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].key, Key::Right);
    assert_eq!(events[1].key, Key::Interact);
}

#[test]
fn autopilot_session_runs_unattended() {
    common::ensure_test_config();
    let config = SimulationConfig::load();

    let mut sim = Simulation::new(config).expect("session");
    sim.run_tick(&[InputEvent::new(Key::ToggleAutopilot)]);

    for _ in 0..200 {
        let report = sim.run_tick(&[]);
        assert!(!report.quit_requested);
        assert!(!report.paused);

        let pos = sim.store().position(sim.player()).expect("player position");
        assert!(
            sim.map().is_walkable(pos.x, pos.y),
            "autopilot walked onto non-walkable ({}, {})",
            pos.x,
            pos.y
        );
    }
    assert_eq!(sim.tick(), 201);
}

#[test]
fn power_report_matches_the_store() {
    common::ensure_test_config();
    let config = SimulationConfig::load();

    let sim = Simulation::new(config).expect("session");
    let generators = sim
        .store()
        .entities_with(ComponentMask::POWER_GENERATOR)
        .count();

    let power = sim.power();
    assert_eq!(power.total, generators);
    assert_eq!(power.active, 0, "generators start inactive");
    assert!(!power.online);
}

#[test]
fn full_loop_with_queued_input() {
    common::ensure_test_config();
    let config = SimulationConfig::load();

    let mut sim = Simulation::new(config).expect("session");
    let queue = InputQueue::new();
    let sender = queue.sender();

    sender.send(InputEvent::new(Key::Pause));
    let report = sim.run_tick(&queue.drain());
    assert!(report.paused);

    sender.send(InputEvent::new(Key::Pause));
    sender.send(InputEvent::new(Key::Quit));
    let report = sim.run_tick(&queue.drain());
    assert!(!report.paused);
    assert!(report.quit_requested);

    // Nothing queued: the tick still advances.
    let report = sim.run_tick(&queue.drain());
    assert_eq!(report.tick, 3);
}
