//! Session-level field-of-view behavior: what the controlled entity has
//! seen, what stays remembered, and how occluders shape the lit set.

mod common;

use facility_core::{
    compute_fov, FacilityGenerator, InputEvent, Key, Simulation, SimulationConfig, TileKind,
};

#[test]
fn initial_fov_is_bounded_by_the_configured_radius() {
    common::ensure_test_config();
    let config = SimulationConfig::load();

    let sim = Simulation::new(config).expect("session");
    let pos = sim.store().position(sim.player()).expect("player position");

    for y in 0..sim.map().height {
        for x in 0..sim.map().width {
            let tile = sim.map().get(x, y).expect("in bounds");
            if tile.visible {
                let dist = (x - pos.x).abs().max((y - pos.y).abs());
                assert!(
                    dist <= config.fov_radius,
                    "({x},{y}) lit at distance {dist}"
                );
                assert!(tile.explored);
                assert_eq!(tile.distance, dist);
            }
        }
    }
}

#[test]
fn explored_tiles_stay_explored_as_the_session_runs() {
    common::ensure_test_config();
    let config = SimulationConfig::load();

    let mut sim = Simulation::new(config).expect("session");
    let explored_before: Vec<bool> = sim.map().tiles.iter().map(|t| t.explored).collect();

    let moves = [Key::Right, Key::Right, Key::Down, Key::Down, Key::Left];
    for key in moves {
        sim.run_tick(&[InputEvent::new(key)]);
    }

    for (tile, was_explored) in sim.map().tiles.iter().zip(explored_before) {
        if was_explored {
            assert!(tile.explored, "exploration must not be forgotten");
        }
    }
}

#[test]
fn moving_reveals_new_ground() {
    common::ensure_test_config();
    let config = SimulationConfig::load();

    let mut sim = Simulation::new(config).expect("session");
    let count = |sim: &Simulation| sim.map().tiles.iter().filter(|t| t.explored).count();
    let before = count(&sim);

    // Walk in an expanding square; at least one step lands somewhere new.
    for key in [
        Key::Right,
        Key::Right,
        Key::Right,
        Key::Down,
        Key::Down,
        Key::Left,
        Key::Up,
    ] {
        sim.run_tick(&[InputEvent::new(key)]);
    }

    assert!(count(&sim) >= before);
}

#[test]
fn walls_remain_lit_while_blocking_sight_beyond() {
    common::ensure_test_config();

    let facility = FacilityGenerator::new(1234)
        .generate(60, 30)
        .expect("valid dimensions");
    let mut map = facility.map;
    let origin = map.rooms[0].center();

    let opaque: Vec<bool> = map
        .tiles
        .iter()
        .map(|t| t.kind == TileKind::Wall)
        .collect();
    let width = map.width;
    compute_fov(&mut map, origin.x, origin.y, 8, move |x, y| {
        opaque[(y * width + x) as usize]
    });

    // Walk each cardinal ray: the first wall within the radius is the
    // blocker, and the blocker itself stays lit.
    for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
        for step in 1..=8 {
            let (x, y) = (origin.x + dx * step, origin.y + dy * step);
            let Some(tile) = map.get(x, y) else { break };
            if tile.kind == TileKind::Wall {
                assert!(tile.visible, "blocking wall at ({x},{y}) unlit");
                break;
            }
        }
    }
}

#[test]
fn fov_never_escapes_the_map() {
    common::ensure_test_config();

    // Radius larger than the whole map; the perimeter clamp keeps every
    // ray in bounds, so this just has to not panic and stay sane.
    let facility = FacilityGenerator::new(5)
        .generate(30, 20)
        .expect("valid dimensions");
    let mut map = facility.map;
    let origin = map.rooms[0].center();

    let opaque: Vec<bool> = map
        .tiles
        .iter()
        .map(|t| t.kind == TileKind::Wall)
        .collect();
    let width = map.width;
    compute_fov(&mut map, origin.x, origin.y, 200, move |x, y| {
        opaque[(y * width + x) as usize]
    });

    assert!(map.get(origin.x, origin.y).expect("in bounds").visible);
}
