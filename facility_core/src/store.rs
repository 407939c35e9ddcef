use serde::{Deserialize, Serialize};

use crate::{
    components::{
        ComponentMask, Door, Glyph, Interactable, PlayerControl, Position, PowerGenerator,
        Terminal,
    },
    error::StoreError,
};

/// Opaque entity identifier: an index into the store's parallel arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity(u32);

impl Entity {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn id(self) -> u32 {
        self.0
    }
}

/// Fixed-capacity struct-of-arrays component storage keyed by entity index.
///
/// Presence is tracked exclusively through the per-slot [`ComponentMask`];
/// destroying an entity clears its mask and recycles the id, leaving stale
/// payload data in place until the slot is reused. Queries are a linear
/// scan over all slots, trading query cost for write-side simplicity and
/// cache-friendly iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    capacity: u32,
    next_id: u32,
    free: Vec<u32>,
    masks: Vec<ComponentMask>,
    positions: Vec<Position>,
    controls: Vec<PlayerControl>,
    glyphs: Vec<Glyph>,
    interactables: Vec<Interactable>,
    generators: Vec<PowerGenerator>,
    doors: Vec<Door>,
    terminals: Vec<Terminal>,
}

macro_rules! component_accessors {
    ($add:ident, $get:ident, $get_mut:ident, $remove:ident, $field:ident, $ty:ty, $bit:expr) => {
        pub fn $add(&mut self, entity: Entity, value: $ty) {
            self.$field[entity.index()] = value;
            self.masks[entity.index()] |= $bit;
        }

        pub fn $get(&self, entity: Entity) -> Option<&$ty> {
            if self.has(entity, $bit) {
                self.$field.get(entity.index())
            } else {
                None
            }
        }

        pub fn $get_mut(&mut self, entity: Entity) -> Option<&mut $ty> {
            if self.has(entity, $bit) {
                self.$field.get_mut(entity.index())
            } else {
                None
            }
        }

        pub fn $remove(&mut self, entity: Entity) {
            self.masks[entity.index()] &= !$bit;
        }
    };
}

impl EntityStore {
    pub fn with_capacity(capacity: u32) -> Self {
        let n = capacity as usize;
        Self {
            capacity,
            next_id: 0,
            free: Vec::new(),
            masks: vec![ComponentMask::empty(); n],
            positions: vec![Position::default(); n],
            controls: vec![PlayerControl::default(); n],
            glyphs: vec![Glyph::default(); n],
            interactables: vec![Interactable::default(); n],
            generators: vec![PowerGenerator::default(); n],
            doors: vec![Door::default(); n],
            terminals: vec![Terminal::default(); n],
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Allocate an entity id, preferring recycled ids over fresh ones.
    /// Exceeding the fixed capacity is a hard error for this call.
    pub fn create(&mut self) -> Result<Entity, StoreError> {
        if let Some(id) = self.free.pop() {
            return Ok(Entity(id));
        }
        if self.next_id >= self.capacity {
            return Err(StoreError::CapacityExhausted {
                capacity: self.capacity,
            });
        }
        let id = self.next_id;
        self.next_id += 1;
        Ok(Entity(id))
    }

    /// Clear the entity's presence mask and recycle its id. Payload slots
    /// are left untouched; the cleared mask alone invalidates them.
    pub fn destroy(&mut self, entity: Entity) {
        self.masks[entity.index()] = ComponentMask::empty();
        self.free.push(entity.0);
    }

    #[inline]
    pub fn mask(&self, entity: Entity) -> ComponentMask {
        self.masks[entity.index()]
    }

    #[inline]
    pub fn has(&self, entity: Entity, required: ComponentMask) -> bool {
        self.masks[entity.index()].contains(required)
    }

    /// Linear scan over every slot for entities whose mask covers
    /// `required`. This is the only supported query shape.
    pub fn entities_with(&self, required: ComponentMask) -> impl Iterator<Item = Entity> + '_ {
        self.masks
            .iter()
            .enumerate()
            .filter(move |(_, mask)| mask.contains(required))
            .map(|(i, _)| Entity(i as u32))
    }

    /// Mark the entity as impassable. SOLID carries no payload; the bit is
    /// the whole component.
    pub fn add_solid(&mut self, entity: Entity) {
        self.masks[entity.index()] |= ComponentMask::SOLID;
    }

    pub fn remove_solid(&mut self, entity: Entity) {
        self.masks[entity.index()] &= !ComponentMask::SOLID;
    }

    component_accessors!(
        add_position,
        position,
        position_mut,
        remove_position,
        positions,
        Position,
        ComponentMask::POSITION
    );
    component_accessors!(
        add_control,
        control,
        control_mut,
        remove_control,
        controls,
        PlayerControl,
        ComponentMask::CONTROL
    );
    component_accessors!(
        add_glyph,
        glyph,
        glyph_mut,
        remove_glyph,
        glyphs,
        Glyph,
        ComponentMask::GLYPH
    );
    component_accessors!(
        add_interactable,
        interactable,
        interactable_mut,
        remove_interactable,
        interactables,
        Interactable,
        ComponentMask::INTERACTABLE
    );
    component_accessors!(
        add_generator,
        generator,
        generator_mut,
        remove_generator,
        generators,
        PowerGenerator,
        ComponentMask::POWER_GENERATOR
    );
    component_accessors!(
        add_door,
        door,
        door_mut,
        remove_door,
        doors,
        Door,
        ComponentMask::DOOR
    );
    component_accessors!(
        add_terminal,
        terminal,
        terminal_mut,
        remove_terminal,
        terminals,
        Terminal,
        ComponentMask::TERMINAL
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_until_capacity() {
        let mut store = EntityStore::with_capacity(3);
        let a = store.create().unwrap();
        let b = store.create().unwrap();
        let c = store.create().unwrap();
        assert_eq!((a.id(), b.id(), c.id()), (0, 1, 2));

        match store.create() {
            Err(StoreError::CapacityExhausted { capacity }) => assert_eq!(capacity, 3),
            other => panic!("expected capacity error, got {other:?}"),
        }
    }

    #[test]
    fn destroyed_ids_are_recycled() {
        let mut store = EntityStore::with_capacity(2);
        let a = store.create().unwrap();
        let _b = store.create().unwrap();
        store.destroy(a);

        let c = store.create().unwrap();
        assert_eq!(c.id(), a.id());
        // The recycled slot starts with no components.
        assert!(store.mask(c).is_empty());
    }

    #[test]
    fn destroy_clears_every_presence_bit() {
        let mut store = EntityStore::with_capacity(4);
        let e = store.create().unwrap();
        store.add_position(e, Position { x: 3, y: 4 });
        store.add_door(e, Door { open: false });
        store.add_solid(e);
        store.add_interactable(
            e,
            Interactable {
                prompt: "Open".into(),
            },
        );

        store.destroy(e);

        assert!(!store.has(e, ComponentMask::POSITION));
        assert!(!store.has(e, ComponentMask::DOOR));
        assert!(!store.has(e, ComponentMask::SOLID));
        assert!(!store.has(e, ComponentMask::INTERACTABLE));
        assert!(store.position(e).is_none());
        assert!(store.door(e).is_none());
    }

    #[test]
    fn component_reads_are_gated_on_the_mask() {
        let mut store = EntityStore::with_capacity(2);
        let e = store.create().unwrap();

        assert!(store.position(e).is_none());
        store.add_position(e, Position { x: 7, y: 9 });
        assert_eq!(store.position(e), Some(&Position { x: 7, y: 9 }));

        // Removing clears only the bit; stale payload must stay invisible.
        store.remove_position(e);
        assert!(store.position(e).is_none());
    }

    #[test]
    fn query_scans_by_required_mask() {
        let mut store = EntityStore::with_capacity(8);
        let door = store.create().unwrap();
        store.add_position(door, Position { x: 1, y: 1 });
        store.add_door(door, Door { open: false });

        let player = store.create().unwrap();
        store.add_position(player, Position { x: 2, y: 2 });
        store.add_control(player, PlayerControl::default());

        let doors: Vec<Entity> = store
            .entities_with(ComponentMask::POSITION | ComponentMask::DOOR)
            .collect();
        assert_eq!(doors, vec![door]);

        let positioned: Vec<Entity> = store.entities_with(ComponentMask::POSITION).collect();
        assert_eq!(positioned.len(), 2);
    }

    #[test]
    fn solid_bit_toggles_without_payload() {
        let mut store = EntityStore::with_capacity(2);
        let e = store.create().unwrap();
        assert!(!store.has(e, ComponentMask::SOLID));
        store.add_solid(e);
        assert!(store.has(e, ComponentMask::SOLID));
        store.remove_solid(e);
        assert!(!store.has(e, ComponentMask::SOLID));
    }
}
