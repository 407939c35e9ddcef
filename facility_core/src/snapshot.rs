use serde::{Deserialize, Serialize};

use crate::{grid::GridMap, store::EntityStore};

/// Whole-structure save state: everything needed to restore a session
/// verbatim. Search buffers and the session RNG are rebuilt on restore,
/// not serialized. The byte layout is opaque and carries no versioning;
/// stability across releases is explicitly not promised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    pub tick: u64,
    pub map: GridMap,
    pub store: EntityStore,
}

pub fn encode(state: &SaveState) -> Result<Vec<u8>, bincode::Error> {
    bincode::serialize(state)
}

pub fn decode(bytes: &[u8]) -> Result<SaveState, bincode::Error> {
    bincode::deserialize(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::{Door, Position},
        mapgen::FacilityGenerator,
    };

    #[test]
    fn save_state_restores_verbatim() {
        let facility = FacilityGenerator::new(42)
            .generate(30, 20)
            .expect("valid dimensions");

        let mut store = EntityStore::with_capacity(16);
        let door = store.create().unwrap();
        store.add_position(door, Position { x: 5, y: 6 });
        store.add_door(door, Door { open: true });

        let state = SaveState {
            tick: 17,
            map: facility.map,
            store,
        };

        let bytes = encode(&state).unwrap();
        let restored = decode(&bytes).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(decode(&[0xFF, 0x01, 0x02]).is_err());
    }
}
