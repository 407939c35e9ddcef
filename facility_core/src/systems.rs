use rand::{rngs::SmallRng, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    components::ComponentMask,
    geometry::Point,
    grid::GridMap,
    input::{InputEvent, Key},
    pathfinding::Pathfinder,
    store::{Entity, EntityStore},
    tile::TileKind,
};

/// One tick's worth of input, folded from the raw event list. Movement is
/// last-wins per axis; toggles latch for the tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub dx: i32,
    pub dy: i32,
    pub toggle_autopilot: bool,
    pub interact: bool,
    pub pause: bool,
    pub quit: bool,
}

pub fn fold_events(events: &[InputEvent]) -> TickInput {
    let mut input = TickInput::default();
    for event in events {
        match event.key {
            Key::Up => input.dy = -1,
            Key::Down => input.dy = 1,
            Key::Left => input.dx = -1,
            Key::Right => input.dx = 1,
            Key::ToggleAutopilot => input.toggle_autopilot = true,
            Key::Interact => input.interact = true,
            Key::Pause => input.pause = true,
            Key::Quit => input.quit = true,
        }
    }
    input
}

/// A cell is passable when its tile is walkable and no solid entity is
/// standing on it. Missing tiles count as blocked.
pub fn is_passable(store: &EntityStore, map: &GridMap, x: i32, y: i32) -> bool {
    if !map.is_walkable(x, y) {
        return false;
    }
    !store
        .entities_with(ComponentMask::SOLID | ComponentMask::POSITION)
        .any(|e| {
            store
                .position(e)
                .map(|p| p.x == x && p.y == y)
                .unwrap_or(false)
        })
}

/// Apply manual movement and the autopilot toggle to every controlled
/// entity. Manual steps are ignored while autopilot drives.
pub fn resolve_input(store: &mut EntityStore, map: &GridMap, input: &TickInput) {
    let controlled: Vec<Entity> = store
        .entities_with(ComponentMask::CONTROL | ComponentMask::POSITION)
        .collect();

    for entity in controlled {
        if input.toggle_autopilot {
            if let Some(ctrl) = store.control_mut(entity) {
                ctrl.autopilot = !ctrl.autopilot;
                ctrl.path.clear();
                tracing::debug!(
                    target: "facility_core::systems",
                    entity = entity.id(),
                    autopilot = ctrl.autopilot,
                    "autopilot toggled"
                );
            }
        }

        let autopilot = store
            .control(entity)
            .map(|c| c.autopilot)
            .unwrap_or(false);
        if autopilot || (input.dx == 0 && input.dy == 0) {
            continue;
        }

        let Some(pos) = store.position(entity).copied() else {
            continue;
        };
        let nx = pos.x + input.dx;
        let ny = pos.y + input.dy;

        if is_passable(store, map, nx, ny) {
            if let Some(pos) = store.position_mut(entity) {
                pos.x = nx;
                pos.y = ny;
            }
        }
    }
}

/// Advance every autopilot entity by one step, re-planning through the
/// pathfinder when no path is held. Room destinations are drawn from the
/// session RNG so runs stay reproducible per seed.
pub fn run_autopilot(
    store: &mut EntityStore,
    map: &GridMap,
    pathfinder: &mut Pathfinder,
    rng: &mut SmallRng,
) {
    let controlled: Vec<Entity> = store
        .entities_with(ComponentMask::CONTROL | ComponentMask::POSITION)
        .collect();

    for entity in controlled {
        let Some(ctrl) = store.control(entity) else {
            continue;
        };
        if !ctrl.autopilot {
            continue;
        }

        if ctrl.path.is_empty() {
            if map.rooms.is_empty() {
                continue;
            }
            let Some(pos) = store.position(entity).copied() else {
                continue;
            };
            let room = map.rooms[rng.gen_range(0..map.rooms.len())];
            let target = room.center();
            let path = pathfinder.find_path(map, pos.point(), target);

            if let Some(ctrl) = store.control_mut(entity) {
                if path.len() > 1 {
                    // Drop the cell we are already standing on.
                    ctrl.path = path[1..].to_vec();
                } else {
                    ctrl.path.clear();
                }
            }
            // Planning consumes the tick; stepping starts next invocation.
            continue;
        }

        let next = ctrl.path[0];
        if is_passable(store, map, next.x, next.y) {
            if let Some(pos) = store.position_mut(entity) {
                pos.x = next.x;
                pos.y = next.y;
            }
            if let Some(ctrl) = store.control_mut(entity) {
                ctrl.path.remove(0);
            }
        } else if let Some(ctrl) = store.control_mut(entity) {
            // Something now blocks the route; re-plan on the next pass.
            ctrl.path.clear();
        }
    }
}

/// What an interaction pass produced, for the session to surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionReport {
    pub save_requested: bool,
    pub interacted: Option<Entity>,
}

/// Resolve an interact press: the controlled entity toggles the first
/// adjacent (Chebyshev distance <= 1) interactable, by kind. Closed doors
/// carry the SOLID bit; opening one drops it.
pub fn resolve_interactions(store: &mut EntityStore, input: &TickInput) -> InteractionReport {
    let mut report = InteractionReport::default();
    if !input.interact {
        return report;
    }

    let Some(player_pos) = store
        .entities_with(ComponentMask::CONTROL | ComponentMask::POSITION)
        .next()
        .and_then(|e| store.position(e).copied())
    else {
        return report;
    };

    let candidates: Vec<Entity> = store
        .entities_with(ComponentMask::INTERACTABLE | ComponentMask::POSITION)
        .collect();

    for entity in candidates {
        let Some(pos) = store.position(entity) else {
            continue;
        };
        if player_pos.point().chebyshev_distance(pos.point()) > 1 {
            continue;
        }

        let mask = store.mask(entity);
        if mask.contains(ComponentMask::POWER_GENERATOR) {
            if let Some(generator) = store.generator_mut(entity) {
                generator.active = !generator.active;
                tracing::info!(
                    target: "facility_core::systems",
                    entity = entity.id(),
                    active = generator.active,
                    "generator toggled"
                );
            }
        } else if mask.contains(ComponentMask::DOOR) {
            let now_open = if let Some(door) = store.door_mut(entity) {
                door.open = !door.open;
                door.open
            } else {
                continue;
            };
            if now_open {
                store.remove_solid(entity);
            } else {
                store.add_solid(entity);
            }
        } else if mask.contains(ComponentMask::TERMINAL) {
            if let Some(terminal) = store.terminal_mut(entity) {
                terminal.saved = true;
            }
            report.save_requested = true;
        } else {
            continue;
        }

        report.interacted = Some(entity);
        break;
    }

    report
}

/// Aggregated facility power state. The facility is online while any
/// generator is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerStatus {
    pub online: bool,
    pub active: usize,
    pub total: usize,
}

pub fn aggregate_power(store: &EntityStore) -> PowerStatus {
    let mut status = PowerStatus::default();
    for entity in store.entities_with(ComponentMask::POWER_GENERATOR) {
        status.total += 1;
        if store.generator(entity).map(|g| g.active).unwrap_or(false) {
            status.active += 1;
        }
    }
    status.online = status.active > 0;
    status
}

/// Flat light-occlusion raster: wall tiles plus every solid entity
/// (closed doors included). Computed before the FOV pass so the
/// visibility engine's predicate needs no live borrow of map or store.
pub fn build_opacity(map: &GridMap, store: &EntityStore) -> Vec<bool> {
    let mut opaque: Vec<bool> = map
        .tiles
        .iter()
        .map(|t| t.kind == TileKind::Wall)
        .collect();

    for entity in store.entities_with(ComponentMask::SOLID | ComponentMask::POSITION) {
        if let Some(pos) = store.position(entity) {
            if map.in_bounds(pos.x, pos.y) {
                opaque[map.index(pos.x, pos.y)] = true;
            }
        }
    }

    opaque
}
