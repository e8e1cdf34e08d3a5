use crate::AppState;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tandem_core::{ClientMessage, ConnectionId};
use tokio::sync::mpsc;
use tracing::{info, warn};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::new();
    info!("New WebSocket connection: {}", connection_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    state.signaling.add_peer(connection_id, tx);
    state.router.attach(connection_id);
    state.signaling.welcome(connection_id);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let router = state.router.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match ClientMessage::from_json(text.as_str()) {
                        Ok(signal) => router.dispatch(connection_id, signal).await,
                        Err(e) => warn!("Invalid frame from {}: {}", connection_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            // A frame mid-dispatch must finish or unwind before teardown.
            let _ = recv_task.await;
        }
        _ = (&mut recv_task) => send_task.abort(),
    };

    // Whichever side ended first, the peer hears about it exactly once.
    state.router.detach(&connection_id).await;
    state.signaling.remove_peer(&connection_id);
    info!("WebSocket disconnected: {}", connection_id);
}
