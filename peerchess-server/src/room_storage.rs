use peerchess_core::{OwnerId, RoomId, RoomOp, RoomResult, RoomTable};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument};

/// Shared room table behind the `/rooms` endpoint.
///
/// Each WebSocket connection registers as an owner; records armed with
/// `remove_on_disconnect` go away when that owner is released.
#[derive(Clone, Default)]
pub struct RoomStorage {
    table: Arc<Mutex<RoomTable>>,
    next_owner: Arc<AtomicU64>,
}

impl RoomStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an owner id for a new connection
    pub fn register(&self) -> OwnerId {
        self.next_owner.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[instrument(skip(self))]
    pub fn handle(&self, owner: OwnerId, op: RoomOp) -> RoomResult {
        let mut table = self.lock();

        match op {
            RoomOp::Create { room, record } => {
                if table.create_if_absent(&room, record) {
                    info!(%room, "Room created");
                    RoomResult::Created
                } else {
                    debug!(%room, "Room identifier already taken");
                    RoomResult::Conflict
                }
            }
            RoomOp::Get { room } => RoomResult::Record {
                record: table.get(&room).cloned(),
            },
            RoomOp::Remove { room } => {
                if table.remove(&room).is_some() {
                    info!(%room, "Room removed");
                }
                RoomResult::Removed
            }
            RoomOp::RemoveOnDisconnect { room } => {
                if table.arm_cleanup(owner, &room) {
                    debug!(%room, owner, "Disconnect cleanup armed");
                    RoomResult::Armed
                } else {
                    RoomResult::Error {
                        message: format!("Room {} not found", room),
                    }
                }
            }
        }
    }

    /// Run the disconnect cleanups armed by `owner`
    #[instrument(skip(self))]
    pub fn release(&self, owner: OwnerId) -> Vec<RoomId> {
        let removed = self.lock().release(owner);
        if !removed.is_empty() {
            info!(owner, rooms = ?removed, "🧹 Removed rooms of disconnected owner");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, RoomTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerchess_core::RoomRecord;

    fn room() -> RoomId {
        RoomId::parse("ab12cd").unwrap()
    }

    fn create(storage: &RoomStorage, owner: OwnerId, host: &str) -> RoomResult {
        storage.handle(
            owner,
            RoomOp::Create {
                room: room(),
                record: RoomRecord::new(host),
            },
        )
    }

    #[test]
    fn test_owners_are_distinct() {
        let storage = RoomStorage::new();
        assert_ne!(storage.register(), storage.register());
    }

    #[test]
    fn test_create_then_conflict() {
        let storage = RoomStorage::new();
        assert_eq!(create(&storage, 1, "host-a"), RoomResult::Created);
        assert_eq!(create(&storage, 2, "host-b"), RoomResult::Conflict);

        assert_eq!(
            storage.handle(2, RoomOp::Get { room: room() }),
            RoomResult::Record {
                record: Some(RoomRecord::new("host-a"))
            }
        );
    }

    #[test]
    fn test_remove_missing_room_is_not_an_error() {
        let storage = RoomStorage::new();
        assert_eq!(
            storage.handle(1, RoomOp::Remove { room: room() }),
            RoomResult::Removed
        );
    }

    #[test]
    fn test_arm_missing_room_is_rejected() {
        let storage = RoomStorage::new();
        assert!(matches!(
            storage.handle(1, RoomOp::RemoveOnDisconnect { room: room() }),
            RoomResult::Error { .. }
        ));
    }

    #[test]
    fn test_release_only_affects_owner() {
        let storage = RoomStorage::new();
        create(&storage, 1, "host-a");
        storage.handle(1, RoomOp::RemoveOnDisconnect { room: room() });

        assert!(storage.release(2).is_empty());
        assert_eq!(storage.len(), 1);

        assert_eq!(storage.release(1), vec![room()]);
        assert!(storage.is_empty());
    }
}
