use tandem_core::{ClientMessage, Role, RoomId, ServerMessage};

use crate::integration::init_tracing;
use crate::utils::{TestClient, create_test_router, pair_in_room};

#[tokio::test]
async fn test_three_peers_join() {
    init_tracing();

    let (router, signaling) = create_test_router();
    let (mut alice, mut bob) = pair_in_room(&router, &signaling, "pair")
        .await
        .expect("pairing failed");
    let room = RoomId::from("pair");

    let mut carol = TestClient::connect(&router, &signaling);
    assert_eq!(
        carol.join("pair").await.unwrap(),
        ServerMessage::Full { room: room.clone() }
    );
    assert_eq!(carol.role(), Some(Role::Unassigned));
    assert_eq!(
        router.registry().members_of(&room).await,
        vec![alice.id, bob.id]
    );

    // The rejected endpoint cannot reach the room.
    carol.send(ClientMessage::Offer { sdp: "intruder".into() }).await;
    alice.expect_silence().await.unwrap();
    bob.expect_silence().await.unwrap();

    // It is free to try another room.
    assert_eq!(
        carol.join("overflow").await.unwrap(),
        ServerMessage::Created { room: RoomId::from("overflow") }
    );
}

#[tokio::test]
async fn test_concurrent_joins_seat_exactly_two() {
    init_tracing();

    let (router, signaling) = create_test_router();
    let room = RoomId::from("race");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let router = router.clone();
        let signaling = signaling.clone();
        handles.push(tokio::spawn(async move {
            let mut client = TestClient::connect(&router, &signaling);
            let reply = client.join("race").await.expect("join failed");
            (client.id, reply)
        }));
    }

    let mut created = 0;
    let mut joined = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap().1 {
            ServerMessage::Created { .. } => created += 1,
            ServerMessage::JoinedRoom { .. } => joined += 1,
            ServerMessage::Full { .. } => full += 1,
            other => panic!("Unexpected join reply {:?}", other),
        }
    }

    assert_eq!((created, joined, full), (1, 1, 6));
    assert_eq!(router.registry().members_of(&room).await.len(), 2);
}
