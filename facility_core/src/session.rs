use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    components::{
        ComponentMask, Door, Glyph, Interactable, PlayerControl, Position, PowerGenerator,
        Terminal,
    },
    config::SimulationConfig,
    error::SimError,
    grid::GridMap,
    input::InputEvent,
    mapgen::FacilityGenerator,
    pathfinding::Pathfinder,
    snapshot::SaveState,
    store::{Entity, EntityStore},
    systems::{
        self, aggregate_power, build_opacity, fold_events, resolve_input, run_autopilot,
        PowerStatus,
    },
    visibility::compute_fov,
};

/// What one tick produced, for the caller to act on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub quit_requested: bool,
    pub paused: bool,
    pub save_requested: bool,
    pub power: PowerStatus,
}

/// A complete single-player simulation session: the generated facility,
/// the entity store, the reusable pathfinder and the controlled entity.
///
/// The session is single-threaded and synchronous; one [`run_tick`] call
/// resolves input, autopilot, interactions, power and visibility in a
/// fixed order and returns. Rendering and input polling live outside.
///
/// [`run_tick`]: Simulation::run_tick
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    map: GridMap,
    store: EntityStore,
    pathfinder: Pathfinder,
    rng: SmallRng,
    player: Entity,
    tick: u64,
    paused: bool,
    power: PowerStatus,
}

impl Simulation {
    /// Generate a facility and populate it. Fails without partial state
    /// when the map dimensions are below the minimum room size or the
    /// fixture spawn exceeds entity capacity.
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        let mut generator = FacilityGenerator::with_config(config.seed, config.generator);
        let facility =
            generator
                .generate(config.width, config.height)
                .ok_or(SimError::MapTooSmall {
                    width: config.width,
                    height: config.height,
                    min: config.generator.min_room_size,
                })?;

        let map = facility.map;
        let mut store = EntityStore::with_capacity(config.entity_capacity);

        let player = store.create()?;
        store.add_position(player, facility.spawn.into());
        store.add_control(player, PlayerControl::default());
        store.add_glyph(player, Glyph::new('@', [0, 255, 255, 255]));

        spawn_fixtures(&mut store, &map)?;

        let mut session = Self {
            pathfinder: Pathfinder::new(map.width, map.height),
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            map,
            store,
            player,
            tick: 0,
            paused: false,
            power: PowerStatus::default(),
        };
        session.power = aggregate_power(&session.store);
        session.recompute_fov();

        tracing::info!(
            target: "facility_core::session",
            width = session.map.width,
            height = session.map.height,
            seed = session.config.seed,
            rooms = session.map.rooms.len(),
            doors = session.map.doors.len(),
            "session created"
        );

        Ok(session)
    }

    /// Resolve one simulation tick against the drained input events.
    /// Fixed system order: pause/quit handling, input resolution,
    /// autopilot (every Nth tick), interactions, power aggregation,
    /// visibility recompute.
    pub fn run_tick(&mut self, events: &[InputEvent]) -> TickReport {
        let input = fold_events(events);
        if input.pause {
            self.paused = !self.paused;
        }

        let mut save_requested = false;
        if !self.paused {
            resolve_input(&mut self.store, &self.map, &input);

            if self.tick % self.config.autopilot_interval.max(1) == 0 {
                run_autopilot(&mut self.store, &self.map, &mut self.pathfinder, &mut self.rng);
            }

            let interaction = systems::resolve_interactions(&mut self.store, &input);
            save_requested = interaction.save_requested;

            self.power = aggregate_power(&self.store);
            self.recompute_fov();
        }

        self.tick += 1;

        TickReport {
            tick: self.tick,
            quit_requested: input.quit,
            paused: self.paused,
            save_requested,
            power: self.power,
        }
    }

    fn recompute_fov(&mut self) {
        let Some(pos) = self.store.position(self.player).copied() else {
            return;
        };
        let opaque = build_opacity(&self.map, &self.store);
        let width = self.map.width;
        compute_fov(
            &mut self.map,
            pos.x,
            pos.y,
            self.config.fov_radius,
            move |x, y| opaque[(y * width + x) as usize],
        );
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn power(&self) -> PowerStatus {
        self.power
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Capture the whole session state for an external persistence
    /// adapter. Opaque snapshot; see [`crate::snapshot`].
    pub fn snapshot(&self) -> SaveState {
        SaveState {
            tick: self.tick,
            map: self.map.clone(),
            store: self.store.clone(),
        }
    }

    /// Rebuild a session from a captured save state. Pathfinder buffers
    /// and the RNG are reconstructed, not restored.
    pub fn restore(config: SimulationConfig, state: SaveState) -> Result<Self, SimError> {
        let player = state
            .store
            .entities_with(ComponentMask::CONTROL | ComponentMask::POSITION)
            .next()
            .ok_or(SimError::SnapshotInvalid)?;

        let mut session = Self {
            pathfinder: Pathfinder::new(state.map.width, state.map.height),
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            map: state.map,
            store: state.store,
            player,
            tick: state.tick,
            paused: false,
            power: PowerStatus::default(),
        };
        session.power = aggregate_power(&session.store);
        Ok(session)
    }
}

/// Populate the generated facility with its interactive fixtures: a
/// closed solid door on every doorway anchor, plus a generator and a save
/// terminal in later rooms. Fixtures sit one cell off the room center so
/// autopilot destinations stay reachable.
fn spawn_fixtures(store: &mut EntityStore, map: &GridMap) -> Result<(), SimError> {
    for anchor in &map.doors {
        let door = store.create()?;
        store.add_position(door, Position {
            x: anchor.x,
            y: anchor.y,
        });
        store.add_door(door, Door { open: false });
        store.add_solid(door);
        store.add_interactable(
            door,
            Interactable {
                prompt: "Open door".into(),
            },
        );
        store.add_glyph(door, Glyph::new('+', [255, 255, 0, 255]));
    }

    if map.rooms.len() >= 2 {
        let center = map.rooms[1].center();
        let generator = store.create()?;
        store.add_position(generator, Position {
            x: center.x + 1,
            y: center.y,
        });
        store.add_generator(generator, PowerGenerator { active: false });
        store.add_solid(generator);
        store.add_interactable(
            generator,
            Interactable {
                prompt: "Toggle generator".into(),
            },
        );
        store.add_glyph(generator, Glyph::new('G', [255, 0, 0, 255]));

        let last_center = map.rooms[map.rooms.len() - 1].center();
        let terminal = store.create()?;
        store.add_position(terminal, Position {
            x: last_center.x - 1,
            y: last_center.y,
        });
        store.add_terminal(terminal, Terminal::default());
        store.add_solid(terminal);
        store.add_interactable(
            terminal,
            Interactable {
                prompt: "Access terminal".into(),
            },
        );
        store.add_glyph(terminal, Glyph::new('T', [0, 255, 0, 255]));
    }

    Ok(())
}
