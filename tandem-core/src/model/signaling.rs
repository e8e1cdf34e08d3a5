use crate::model::connection::ConnectionId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed signaling frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Peer-to-peer payloads. The server forwards these without looking inside.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "d")]
pub enum SignalMessage {
    Offer {
        sdp: String,
    },
    Answer {
        sdp: String,
    },
    IceCandidate {
        candidate: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sdp_mid: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sdp_m_line_index: Option<u16>,
    },
    ToggleAudio {
        enabled: bool,
    },
    ToggleVideo {
        enabled: bool,
    },
}

/// Frames an endpoint sends to the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "d")]
pub enum ClientMessage {
    Join {
        room: RoomId,
    },
    Offer {
        sdp: String,
    },
    Answer {
        sdp: String,
    },
    IceCandidate {
        candidate: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sdp_mid: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sdp_m_line_index: Option<u16>,
    },
    ToggleAudio {
        enabled: bool,
    },
    ToggleVideo {
        enabled: bool,
    },
    Leave {
        room: RoomId,
    },
}

/// Frames the server sends to an endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "d")]
pub enum ServerMessage {
    Welcome {
        connection_id: ConnectionId,
        ice_servers: Vec<IceServerConfig>,
    },
    Created {
        room: RoomId,
    },
    JoinedRoom {
        room: RoomId,
    },
    Full {
        room: RoomId,
    },
    Ready,
    Offer {
        sdp: String,
    },
    Answer {
        sdp: String,
    },
    IceCandidate {
        candidate: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sdp_mid: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sdp_m_line_index: Option<u16>,
    },
    ToggleAudio {
        enabled: bool,
    },
    ToggleVideo {
        enabled: bool,
    },
    PeerLeft,
}

/// What the router does with a client frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Join(RoomId),
    Leave(RoomId),
    Relay(SignalMessage),
}

impl ClientMessage {
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl ServerMessage {
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// The relayed payload carried by this frame, if it is one.
    pub fn into_signal(self) -> Option<SignalMessage> {
        match self {
            ServerMessage::Offer { sdp } => Some(SignalMessage::Offer { sdp }),
            ServerMessage::Answer { sdp } => Some(SignalMessage::Answer { sdp }),
            ServerMessage::IceCandidate {
                candidate,
                sdp_mid,
                sdp_m_line_index,
            } => Some(SignalMessage::IceCandidate {
                candidate,
                sdp_mid,
                sdp_m_line_index,
            }),
            ServerMessage::ToggleAudio { enabled } => Some(SignalMessage::ToggleAudio { enabled }),
            ServerMessage::ToggleVideo { enabled } => Some(SignalMessage::ToggleVideo { enabled }),
            _ => None,
        }
    }
}

impl From<ClientMessage> for Inbound {
    fn from(msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::Join { room } => Inbound::Join(room),
            ClientMessage::Leave { room } => Inbound::Leave(room),
            ClientMessage::Offer { sdp } => Inbound::Relay(SignalMessage::Offer { sdp }),
            ClientMessage::Answer { sdp } => Inbound::Relay(SignalMessage::Answer { sdp }),
            ClientMessage::IceCandidate {
                candidate,
                sdp_mid,
                sdp_m_line_index,
            } => Inbound::Relay(SignalMessage::IceCandidate {
                candidate,
                sdp_mid,
                sdp_m_line_index,
            }),
            ClientMessage::ToggleAudio { enabled } => {
                Inbound::Relay(SignalMessage::ToggleAudio { enabled })
            }
            ClientMessage::ToggleVideo { enabled } => {
                Inbound::Relay(SignalMessage::ToggleVideo { enabled })
            }
        }
    }
}

impl From<SignalMessage> for ServerMessage {
    fn from(msg: SignalMessage) -> Self {
        match msg {
            SignalMessage::Offer { sdp } => ServerMessage::Offer { sdp },
            SignalMessage::Answer { sdp } => ServerMessage::Answer { sdp },
            SignalMessage::IceCandidate {
                candidate,
                sdp_mid,
                sdp_m_line_index,
            } => ServerMessage::IceCandidate {
                candidate,
                sdp_mid,
                sdp_m_line_index,
            },
            SignalMessage::ToggleAudio { enabled } => ServerMessage::ToggleAudio { enabled },
            SignalMessage::ToggleVideo { enabled } => ServerMessage::ToggleVideo { enabled },
        }
    }
}
