use cucumber::{given, then, when};
use peerchess_core::RoomId;
use peerchess_p2p::{PeerIdentity, RoomError};
use peerchess_tests::ChessWorld;

// ===== Given Steps =====

#[given(expr = "host {string} has published a room")]
async fn host_published_room(world: &mut ChessWorld, host: String) {
    host_creates_room(world, host).await;
}

#[given(expr = "room {string} is already taken")]
async fn room_taken(world: &mut ChessWorld, room: String) {
    let room = RoomId::parse(&room).unwrap();
    assert!(world
        .store
        .insert(&room, peerchess_core::RoomRecord::new("someone-else")));
}

// ===== When Steps =====

#[when(expr = "host {string} creates a room")]
async fn host_creates_room(world: &mut ChessWorld, host: String) {
    let rooms = world.coordinator();
    let room = rooms
        .create_room(&PeerIdentity::new(host))
        .await
        .expect("room created");
    world.room = Some(room);
    world.host_rooms = Some(rooms);
}

#[when(expr = "host {string} creates a room while the generator yields {string} then {string}")]
async fn host_creates_room_with_ids(
    world: &mut ChessWorld,
    host: String,
    first: String,
    second: String,
) {
    let mut candidates = vec![
        RoomId::parse(&second).unwrap(),
        RoomId::parse(&first).unwrap(),
    ];
    let rooms = world.coordinator();
    let room = rooms
        .create_room_with(&PeerIdentity::new(host), move || {
            candidates.pop().unwrap_or_else(RoomId::generate)
        })
        .await
        .expect("room created");
    world.room = Some(room);
    world.host_rooms = Some(rooms);
}

#[when("a guest joins that room")]
async fn guest_joins_room(world: &mut ChessWorld) {
    let room = world.room.clone().expect("a room was created");
    join(world, room).await;
}

#[when(expr = "a guest joins room {string}")]
async fn guest_joins_named_room(world: &mut ChessWorld, room: String) {
    join(world, RoomId::parse(&room).unwrap()).await;
}

async fn join(world: &mut ChessWorld, room: RoomId) {
    match world.coordinator().join_room(&room).await {
        Ok(host) => world.joined_host = Some(host),
        Err(e) => world.join_error = Some(e),
    }
}

#[when("the host's connection to the room store drops")]
async fn host_store_drops(world: &mut ChessWorld) {
    world.host_rooms = None;
}

// ===== Then Steps =====

#[then(expr = "the room store holds {int} room(s)")]
async fn store_holds(world: &mut ChessWorld, count: usize) {
    assert_eq!(world.store.len(), count);
}

#[then(expr = "the room points at host {string}")]
async fn room_points_at(world: &mut ChessWorld, host: String) {
    let room = world.room.as_ref().expect("a room was created");
    let record = world.store.peek(room).expect("room record present");
    assert_eq!(record.host_identity, host);
}

#[then(expr = "the room id is {string}")]
async fn room_id_is(world: &mut ChessWorld, expected: String) {
    assert_eq!(world.room.as_ref().map(RoomId::as_str), Some(expected.as_str()));
}

#[then(expr = "the guest learns host {string}")]
async fn guest_learns_host(world: &mut ChessWorld, host: String) {
    assert_eq!(world.joined_host, Some(PeerIdentity::new(host)));
}

#[then("joining fails because the room does not exist")]
async fn join_not_found(world: &mut ChessWorld) {
    assert!(
        matches!(world.join_error, Some(RoomError::NotFound(_))),
        "unexpected join result: {:?}",
        world.join_error
    );
}
