use anyhow::{Context, Result, bail};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tandem_core::{ClientMessage, RoomId, ServerMessage};
use tandem_server::{AppState, ServerConfig, app};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::integration::init_tracing;
use crate::utils::SIGNAL_TIMEOUT_MS;

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn start_server() -> Result<String> {
    let state = Arc::new(AppState::new(&ServerConfig::default()));
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    Ok(format!("ws://{}/ws", addr))
}

async fn send(ws: &mut Socket, msg: ClientMessage) -> Result<()> {
    ws.send(Message::Text(msg.to_json()?)).await?;
    Ok(())
}

async fn recv(ws: &mut Socket) -> Result<ServerMessage> {
    loop {
        let frame = tokio::time::timeout(Duration::from_millis(SIGNAL_TIMEOUT_MS), ws.next())
            .await
            .context("Timeout waiting for frame")?;
        match frame {
            Some(Ok(Message::Text(text))) => return Ok(ServerMessage::from_json(&text)?),
            Some(Ok(_)) => continue,
            Some(Err(e)) => bail!("Socket error: {}", e),
            None => bail!("Socket closed"),
        }
    }
}

async fn connect(url: &str) -> Result<Socket> {
    let (mut ws, _response) = connect_async(url).await?;
    match recv(&mut ws).await? {
        ServerMessage::Welcome { ice_servers, .. } => {
            assert!(!ice_servers.is_empty(), "welcome should advertise ICE servers");
        }
        other => bail!("Expected Welcome, got {:?}", other),
    }
    Ok(ws)
}

#[tokio::test]
async fn test_websocket_session() {
    init_tracing();

    let url = start_server().await.expect("server failed to start");
    let room = RoomId::from("over-the-wire");

    let mut alice = connect(&url).await.expect("alice failed to connect");
    let mut bob = connect(&url).await.expect("bob failed to connect");

    send(&mut alice, ClientMessage::Join { room: room.clone() }).await.unwrap();
    assert_eq!(
        recv(&mut alice).await.unwrap(),
        ServerMessage::Created { room: room.clone() }
    );

    send(&mut bob, ClientMessage::Join { room: room.clone() }).await.unwrap();
    assert_eq!(
        recv(&mut bob).await.unwrap(),
        ServerMessage::JoinedRoom { room: room.clone() }
    );
    assert_eq!(recv(&mut bob).await.unwrap(), ServerMessage::Ready);
    assert_eq!(recv(&mut alice).await.unwrap(), ServerMessage::Ready);

    let sdp = "v=0\r\no=- 1 2 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\n".to_string();
    send(&mut alice, ClientMessage::Offer { sdp: sdp.clone() }).await.unwrap();
    assert_eq!(recv(&mut bob).await.unwrap(), ServerMessage::Offer { sdp });

    // Drop bob's socket without a Leave: the server must still tell alice.
    drop(bob);
    assert_eq!(recv(&mut alice).await.unwrap(), ServerMessage::PeerLeft);
}

#[tokio::test]
async fn test_third_socket_gets_full() {
    init_tracing();

    let url = start_server().await.expect("server failed to start");
    let room = RoomId::from("crowded");

    let mut sockets = Vec::new();
    for _ in 0..2 {
        let mut ws = connect(&url).await.unwrap();
        send(&mut ws, ClientMessage::Join { room: room.clone() }).await.unwrap();
        let reply = recv(&mut ws).await.unwrap();
        assert!(matches!(
            reply,
            ServerMessage::Created { .. } | ServerMessage::JoinedRoom { .. }
        ));
        sockets.push(ws);
    }

    let mut late = connect(&url).await.unwrap();
    send(&mut late, ClientMessage::Join { room: room.clone() }).await.unwrap();
    assert_eq!(
        recv(&mut late).await.unwrap(),
        ServerMessage::Full { room }
    );
}

#[tokio::test]
async fn test_malformed_frame_keeps_connection_open() {
    init_tracing();

    let url = start_server().await.expect("server failed to start");
    let mut ws = connect(&url).await.unwrap();

    ws.send(Message::Text("{not json".into())).await.unwrap();
    send(&mut ws, ClientMessage::Join { room: RoomId::from("still-here") })
        .await
        .unwrap();

    assert_eq!(
        recv(&mut ws).await.unwrap(),
        ServerMessage::Created { room: RoomId::from("still-here") }
    );
}
