mod support;

use instant::Duration;
use peerchess_core::SessionMessage;
use peerchess_p2p::{ConnectionState, Session, SessionError, Transport};
use std::sync::{Arc, Mutex};
use support::*;

#[tokio::test]
async fn test_queued_messages_flush_in_order_exactly_once() {
    init_tracing();
    let network = peerchess_p2p::MemoryNetwork::new();
    let (mut host, mut guest) = sessions(&network);
    let seen = record(&host);

    for notation in ["e2e4", "d2d4", "g1f3"] {
        guest.send(&move_message(notation)).unwrap();
    }
    assert_eq!(guest.queued(), 3);

    open(&mut host, &mut guest).await;
    assert_eq!(guest.queued(), 0);

    for _ in 0..5 {
        host.poll();
        guest.poll();
    }

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            move_message("e2e4"),
            move_message("d2d4"),
            move_message("g1f3")
        ]
    );
}

#[tokio::test]
async fn test_host_messages_queued_before_guest_arrives() {
    let network = peerchess_p2p::MemoryNetwork::new();
    let (mut host, mut guest) = sessions(&network);
    let seen = record(&guest);

    host.send(&SessionMessage::MediaRequestComplete { has_media: true })
        .unwrap();
    open(&mut host, &mut guest).await;
    guest.poll();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![SessionMessage::MediaRequestComplete { has_media: true }]
    );
}

#[tokio::test]
async fn test_send_while_open_is_immediate() {
    let mut pair = connected_pair().await;
    let seen = record(&pair.host);

    pair.guest.send(&move_message("e2e4")).unwrap();
    assert_eq!(pair.guest.queued(), 0);

    assert_eq!(pair.host.poll(), 1);
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_connection_reports_both_ends() {
    let pair = connected_pair().await;

    assert_eq!(pair.host_side.remote_identity, None);
    assert!(pair.guest_side.remote_identity.is_some());
    assert_eq!(
        pair.host.state(),
        ConnectionState::Open {
            remote: pair.host_side.remote
        }
    );
}

#[tokio::test]
async fn test_second_connect_fails() {
    let mut pair = connected_pair().await;
    let host_identity = pair.guest_side.remote_identity.clone().unwrap();

    assert!(matches!(
        pair.host.listen().await,
        Err(SessionError::AlreadyConnecting)
    ));
    assert!(matches!(
        pair.guest.connect(&host_identity).await,
        Err(SessionError::AlreadyConnecting)
    ));
    assert!(pair.host.is_open());
}

#[tokio::test]
async fn test_listen_timeout_returns_to_idle() {
    let network = peerchess_p2p::MemoryNetwork::new();
    let mut config = fast_config();
    config.listen_timeout = Some(Duration::from_millis(30));
    let mut host = Session::new(network.endpoint(), config);

    assert!(matches!(
        host.listen().await,
        Err(SessionError::Timeout { .. })
    ));
    assert_eq!(host.state(), ConnectionState::Idle);
}

#[tokio::test]
async fn test_remote_drop_closes_session() {
    let mut pair = connected_pair().await;
    drop(pair.guest);

    pair.host.poll();

    assert_eq!(pair.host.state(), ConnectionState::Closed);
    assert!(matches!(
        pair.host.send(&move_message("e2e4")),
        Err(SessionError::Disconnected)
    ));
}

#[tokio::test]
async fn test_failed_send_is_not_queued() {
    let mut pair = connected_pair().await;
    // Not polled yet, so the session still believes it is open
    drop(pair.guest);

    assert!(matches!(
        pair.host.send(&move_message("e2e4")),
        Err(SessionError::SendFailed(_))
    ));
    assert!(pair.host.is_open());
    assert_eq!(pair.host.queued(), 0);
}

#[tokio::test]
async fn test_third_peer_is_ignored() {
    let mut pair = connected_pair().await;
    let seen = record(&pair.host);
    let host_identity = pair.guest_side.remote_identity.clone().unwrap();
    let host_peer = pair.guest_side.remote;

    let mut intruder = pair.network.endpoint();
    intruder.dial(&host_identity).unwrap();
    intruder
        .send_to(host_peer, br#"{"event":"mediarequestcomplete","hasMedia":true}"#.to_vec())
        .unwrap();

    pair.host.poll();

    assert_eq!(
        pair.host.state(),
        ConnectionState::Open {
            remote: pair.host_side.remote
        }
    );
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unrecognized_and_malformed_frames_are_skipped() {
    let mut pair = connected_pair().await;
    let seen = record(&pair.host);
    let host_peer = pair.guest_side.remote;

    let transport = pair.guest.transport_mut();
    transport
        .send_to(host_peer, br#"{"event":"resign"}"#.to_vec())
        .unwrap();
    transport.send_to(host_peer, b"not json".to_vec()).unwrap();
    pair.guest.send(&move_message("e2e4")).unwrap();

    assert_eq!(pair.host.poll(), 1);
    assert_eq!(*seen.lock().unwrap(), vec![move_message("e2e4")]);
}

#[tokio::test]
async fn test_listener_dispatch_order_under_mutation() {
    let mut pair = connected_pair().await;
    let log = Arc::new(Mutex::new(Vec::new()));

    let registry = pair.host.listeners();
    let first_log = log.clone();
    pair.host.add_listener(true, move |_| {
        first_log.lock().unwrap().push("first");
        let late_log = first_log.clone();
        registry.add(false, move |_| late_log.lock().unwrap().push("late"));
    });
    let second_log = log.clone();
    let second = pair.host.add_listener(false, move |_| {
        second_log.lock().unwrap().push("second");
    });

    pair.guest.send(&move_message("e2e4")).unwrap();
    pair.host.poll();
    assert!(pair.host.remove_listener(second));
    pair.guest.send(&move_message("e7e5")).unwrap();
    pair.host.poll();

    assert_eq!(*log.lock().unwrap(), vec!["first", "second", "late"]);
}
