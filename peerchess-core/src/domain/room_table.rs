use crate::domain::{RoomId, RoomRecord};
use std::collections::{HashMap, HashSet};

/// Identifies the store connection that armed a disconnect cleanup
pub type OwnerId = u64;

/// In-memory room records with per-owner disconnect cleanup.
///
/// Every method is a single step on `&mut self`, so wrapping the table in one
/// lock makes create-if-absent atomic for all callers sharing it.
#[derive(Debug, Default)]
pub struct RoomTable {
    records: HashMap<RoomId, RoomRecord>,
    cleanup: HashMap<OwnerId, HashSet<(RoomId, RoomRecord)>>,
}

impl RoomTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert only when no record occupies `room`; returns whether it was written
    pub fn create_if_absent(&mut self, room: &RoomId, record: RoomRecord) -> bool {
        if self.records.contains_key(room) {
            return false;
        }
        self.records.insert(room.clone(), record);
        true
    }

    pub fn get(&self, room: &RoomId) -> Option<&RoomRecord> {
        self.records.get(room)
    }

    pub fn remove(&mut self, room: &RoomId) -> Option<RoomRecord> {
        self.records.remove(room)
    }

    /// Remove `room` when `owner` disconnects, as long as it still holds the
    /// record present right now
    pub fn arm_cleanup(&mut self, owner: OwnerId, room: &RoomId) -> bool {
        let Some(record) = self.records.get(room).cloned() else {
            return false;
        };
        self.cleanup
            .entry(owner)
            .or_default()
            .insert((room.clone(), record));
        true
    }

    /// Run the cleanups armed by `owner`; returns the rooms actually removed
    pub fn release(&mut self, owner: OwnerId) -> Vec<RoomId> {
        let Some(armed) = self.cleanup.remove(&owner) else {
            return Vec::new();
        };

        let mut removed = Vec::new();
        for (room, record) in armed {
            // A later host may have reused the identifier
            if self.records.get(&room) == Some(&record) {
                self.records.remove(&room);
                removed.push(room);
            } else {
                tracing::debug!("Room {} changed hands, keeping it", room);
            }
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
