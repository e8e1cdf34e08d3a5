use tandem_core::{ClientMessage, ServerMessage, SignalMessage};

use crate::integration::init_tracing;
use crate::utils::{TestClient, create_test_router, pair_in_room};

const CONCURRENT_FRAMES: usize = 50;

#[tokio::test]
async fn test_offer_answer_relay() {
    init_tracing();

    let (router, signaling) = create_test_router();
    let (mut alice, mut bob) = pair_in_room(&router, &signaling, "relay")
        .await
        .expect("pairing failed");

    let offer = "v=0\r\no=alice 2890844526 2890844526 IN IP4 host.atlanta.example.com\r\n";
    alice
        .send(ClientMessage::Offer { sdp: offer.to_string() })
        .await;
    assert_eq!(
        bob.recv().await.unwrap(),
        ServerMessage::Offer { sdp: offer.to_string() }
    );

    let answer = "v=0\r\no=bob 2808844564 2808844564 IN IP4 host.biloxi.example.com\r\n";
    bob.send(ClientMessage::Answer { sdp: answer.to_string() })
        .await;
    assert_eq!(
        alice.recv().await.unwrap(),
        ServerMessage::Answer { sdp: answer.to_string() }
    );

    // The sender never gets its own frame back.
    alice.expect_silence().await.unwrap();
    bob.expect_silence().await.unwrap();
}

#[tokio::test]
async fn test_rapid_candidates_keep_order() {
    init_tracing();

    let (router, signaling) = create_test_router();
    let (alice, mut bob) = pair_in_room(&router, &signaling, "relay")
        .await
        .expect("pairing failed");

    let candidate_count: u16 = 25;
    for i in 0..candidate_count {
        alice
            .send(ClientMessage::IceCandidate {
                candidate: format!("candidate:{} 1 udp 2122260223 192.168.1.{} 5000{} typ host", i, i, i % 10),
                sdp_mid: Some("0".to_string()),
                sdp_m_line_index: Some(i % 2),
            })
            .await;
    }

    for i in 0..candidate_count {
        let msg = bob.recv().await.expect("candidate missing");
        let Some(SignalMessage::IceCandidate {
            candidate,
            sdp_mid,
            sdp_m_line_index,
        }) = msg.into_signal()
        else {
            panic!("Expected a candidate at position {}", i);
        };
        assert!(
            candidate.starts_with(&format!("candidate:{} ", i)),
            "Candidate {} arrived out of order: {}",
            i,
            candidate
        );
        assert_eq!(sdp_mid.as_deref(), Some("0"));
        assert_eq!(sdp_m_line_index, Some(i % 2));
    }
    bob.expect_silence().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_senders_each_keep_order() {
    init_tracing();

    let (router, signaling) = create_test_router();
    let (alice, bob) = pair_in_room(&router, &signaling, "relay")
        .await
        .expect("pairing failed");

    let send_all = |client: TestClient, tag: &'static str| async move {
        for i in 0..CONCURRENT_FRAMES {
            client
                .send(ClientMessage::IceCandidate {
                    candidate: format!("{}:{}", tag, i),
                    sdp_mid: None,
                    sdp_m_line_index: None,
                })
                .await;
        }
        client
    };

    let (alice, bob) = tokio::join!(
        tokio::spawn(send_all(alice, "a")),
        tokio::spawn(send_all(bob, "b"))
    );
    let (alice, bob) = (alice.unwrap(), bob.unwrap());

    for (receiver, tag) in [(&bob, "a"), (&alice, "b")] {
        let got: Vec<String> = signaling
            .sent_to(&receiver.id)
            .await
            .into_iter()
            .filter_map(|m| match m.into_signal() {
                Some(SignalMessage::IceCandidate { candidate, .. }) => Some(candidate),
                _ => None,
            })
            .collect();
        let expected: Vec<String> = (0..CONCURRENT_FRAMES).map(|i| format!("{}:{}", tag, i)).collect();
        assert_eq!(got, expected);
    }
}
