use cucumber::{given, then, when};
use peerchess_core::CallRole;
use peerchess_tests::{parse_media, parse_role, ChessWorld};

#[given(expr = "the host has {string}")]
async fn host_media(world: &mut ChessWorld, media: String) {
    world.host_media = parse_media(&media);
}

#[given(expr = "the guest has {string}")]
async fn guest_media(world: &mut ChessWorld, media: String) {
    world.guest_media = parse_media(&media);
}

#[when("both players connect")]
async fn both_connect(world: &mut ChessWorld) {
    world.start_match().await;
}

#[then(expr = "the {word} call role is {string}")]
async fn call_role(world: &mut ChessWorld, role: String, expected: String) {
    let call = world.player(parse_role(&role)).game.call().clone();
    assert_eq!(call.role.to_string(), expected);
}

#[then(expr = "the {word} sees opponent media {string}")]
async fn sees_remote_media(world: &mut ChessWorld, role: String, expected: String) {
    let call = world.player(parse_role(&role)).game.call().clone();
    assert_eq!(call.remote_has_media, expected == "yes");
}

#[then(expr = "the {word} knows the caller's stream")]
async fn knows_caller_stream(world: &mut ChessWorld, role: String) {
    let call = world.player(parse_role(&role)).game.call().clone();
    assert_eq!(call.role, CallRole::Callee);
    assert!(call.remote_stream_id.is_some());
}
