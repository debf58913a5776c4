use crate::application::RoomStore;
use crate::infrastructure::error::StoreError;
use async_trait::async_trait;
use peerchess_core::{OwnerId, RoomId, RoomRecord, RoomTable};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Room store kept in process memory.
///
/// Each [`MemoryRoomStore::connection`] behaves like one client connection of
/// the room server: cleanups it arms run when it is dropped or disconnected.
#[derive(Clone, Default)]
pub struct MemoryRoomStore {
    table: Arc<Mutex<RoomTable>>,
    next_owner: Arc<AtomicU64>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection(&self) -> MemoryRoomConnection {
        MemoryRoomConnection {
            table: self.table.clone(),
            owner: self.next_owner.fetch_add(1, Ordering::Relaxed),
            connected: true,
        }
    }

    /// Current record for `room`, bypassing any connection
    pub fn peek(&self, room: &RoomId) -> Option<RoomRecord> {
        lock(&self.table).get(room).cloned()
    }

    /// Write a record directly (test setup)
    pub fn insert(&self, room: &RoomId, record: RoomRecord) -> bool {
        lock(&self.table).create_if_absent(room, record)
    }

    pub fn len(&self) -> usize {
        lock(&self.table).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.table).is_empty()
    }
}

/// One client connection to a [`MemoryRoomStore`]
pub struct MemoryRoomConnection {
    table: Arc<Mutex<RoomTable>>,
    owner: OwnerId,
    connected: bool,
}

impl MemoryRoomConnection {
    /// Simulate the client going away
    pub fn disconnect(&mut self) {
        if self.connected {
            self.connected = false;
            let removed = lock(&self.table).release(self.owner);
            if !removed.is_empty() {
                tracing::debug!("Released {} room(s) on disconnect", removed.len());
            }
        }
    }

    fn check_connected(&self) -> Result<(), StoreError> {
        if self.connected {
            Ok(())
        } else {
            Err(StoreError::Unavailable("connection closed".to_string()))
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RoomStore for MemoryRoomConnection {
    async fn create_if_absent(
        &self,
        room: &RoomId,
        record: RoomRecord,
    ) -> Result<bool, StoreError> {
        self.check_connected()?;
        Ok(lock(&self.table).create_if_absent(room, record))
    }

    async fn get(&self, room: &RoomId) -> Result<Option<RoomRecord>, StoreError> {
        self.check_connected()?;
        Ok(lock(&self.table).get(room).cloned())
    }

    async fn remove(&self, room: &RoomId) -> Result<(), StoreError> {
        self.check_connected()?;
        lock(&self.table).remove(room);
        Ok(())
    }

    async fn remove_on_disconnect(&self, room: &RoomId) -> Result<(), StoreError> {
        self.check_connected()?;
        if lock(&self.table).arm_cleanup(self.owner, room) {
            Ok(())
        } else {
            Err(StoreError::Rejected(format!("no record at {}", room.record_path())))
        }
    }
}

impl Drop for MemoryRoomConnection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn lock(table: &Mutex<RoomTable>) -> MutexGuard<'_, RoomTable> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}
