use cucumber::{given, then, when};
use peerchess_core::{ChessMove, Side, TurnError};
use peerchess_p2p::{GameEvent, SessionError};
use peerchess_tests::{parse_role, ChessWorld};

#[given("a match between a host and a guest")]
async fn match_running(world: &mut ChessWorld) {
    world.start_match().await;
}

#[when(expr = "the {word} plays {string}")]
async fn player_plays(world: &mut ChessWorld, role: String, notation: String) {
    world.play(parse_role(&role), &notation);
}

#[when("the guest leaves")]
async fn guest_leaves(world: &mut ChessWorld) {
    world.guest = None;
}

#[then(expr = "the {word} plays {word}")]
async fn player_side(world: &mut ChessWorld, role: String, side: String) {
    let expected = match side.as_str() {
        "white" => Side::White,
        "black" => Side::Black,
        other => panic!("unknown side '{}'", other),
    };
    assert_eq!(world.player(parse_role(&role)).game.turn().local_side(), expected);
}

#[then(expr = "the {word} receives {string}")]
async fn player_receives(world: &mut ChessWorld, role: String, notation: String) {
    let player = world.player(parse_role(&role));
    player.settle().await;
    let expected = ChessMove::parse_coordinate(&notation).unwrap();
    assert_eq!(player.remote_moves().last(), Some(&expected));
}

#[then(expr = "the {word} receives no move")]
async fn player_receives_nothing(world: &mut ChessWorld, role: String) {
    let player = world.player(parse_role(&role));
    player.settle().await;
    assert!(player.remote_moves().is_empty());
}

#[then(expr = "it is the {word}'s turn")]
async fn players_turn(world: &mut ChessWorld, role: String) {
    assert!(world.player(parse_role(&role)).game.turn().is_local_turn());
}

#[then("the move is refused as out of turn")]
async fn refused_out_of_turn(world: &mut ChessWorld) {
    assert!(
        matches!(
            world.last_error,
            Some(SessionError::Turn(TurnError::NotLocalTurn(_)))
        ),
        "unexpected result: {:?}",
        world.last_error
    );
}

#[then("the move is refused as illegal")]
async fn refused_illegal(world: &mut ChessWorld) {
    assert!(
        matches!(
            world.last_error,
            Some(SessionError::Turn(TurnError::IllegalMove { .. }))
        ),
        "unexpected result: {:?}",
        world.last_error
    );
}

#[then("the host is told the opponent left")]
async fn host_told_disconnect(world: &mut ChessWorld) {
    let host = world.player(peerchess_core::Role::Host);
    host.settle().await;
    assert!(host.game.is_disconnected());

    let notices = host
        .events()
        .iter()
        .filter(|event| matches!(event, GameEvent::Disconnected))
        .count();
    assert_eq!(notices, 1);
}
