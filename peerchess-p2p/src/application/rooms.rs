use crate::domain::PeerIdentity;
use crate::infrastructure::error::{RoomError, StoreError};
use async_trait::async_trait;
use peerchess_core::{RoomId, RoomRecord};

/// Ephemeral key/value store holding room records
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RoomStore: Send + Sync {
    /// Atomic create-if-absent; `false` when the key is taken
    async fn create_if_absent(&self, room: &RoomId, record: RoomRecord)
        -> Result<bool, StoreError>;

    async fn get(&self, room: &RoomId) -> Result<Option<RoomRecord>, StoreError>;

    async fn remove(&self, room: &RoomId) -> Result<(), StoreError>;

    /// Delete the record once this client's store connection goes away
    async fn remove_on_disconnect(&self, room: &RoomId) -> Result<(), StoreError>;
}

/// Creates and claims room records advertising a waiting host
pub struct RoomCoordinator<S: RoomStore> {
    store: S,
    max_attempts: u32,
}

impl<S: RoomStore> RoomCoordinator<S> {
    pub fn new(store: S, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Publish `host` under a fresh room id
    pub async fn create_room(&self, host: &PeerIdentity) -> Result<RoomId, RoomError> {
        self.create_room_with(host, RoomId::generate).await
    }

    /// [`RoomCoordinator::create_room`] with a caller supplied id generator
    pub async fn create_room_with<G>(
        &self,
        host: &PeerIdentity,
        mut generate: G,
    ) -> Result<RoomId, RoomError>
    where
        G: FnMut() -> RoomId + Send,
    {
        let record = RoomRecord::new(host.as_str());

        for attempt in 1..=self.max_attempts {
            let room = generate();

            if self.store.create_if_absent(&room, record.clone()).await? {
                if let Err(e) = self.store.remove_on_disconnect(&room).await {
                    // Without cleanup armed the record would outlive the host
                    if let Err(remove_error) = self.store.remove(&room).await {
                        tracing::warn!("Room {} left behind: {}", room, remove_error);
                    }
                    return Err(e.into());
                }
                tracing::info!("🏠 Created room {} (attempt {})", room, attempt);
                return Ok(room);
            }

            tracing::debug!("Room id {} taken, regenerating", room);
        }

        tracing::warn!("No free room id after {} attempts", self.max_attempts);
        Err(RoomError::Exhausted {
            attempts: self.max_attempts,
        })
    }

    /// Claim the room: read once, delete it and return the waiting host
    pub async fn join_room(&self, room: &RoomId) -> Result<PeerIdentity, RoomError> {
        let Some(record) = self.store.get(room).await? else {
            tracing::warn!("Room {} not found", room);
            return Err(RoomError::NotFound(room.clone()));
        };

        self.store.remove(room).await?;
        tracing::info!("🚪 Joined room {}", room);
        Ok(PeerIdentity::new(record.host_identity))
    }
}
