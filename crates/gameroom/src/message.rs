use super::*;

/// Frames sent by clients over the room WebSocket.
/// Decoded once at the boundary into this closed variant set; handlers
/// never dispatch on a raw `type` string.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "JOIN", rename_all = "camelCase")]
    Join { session_token: String },
    #[serde(rename = "READY")]
    Ready { ready: bool },
    #[serde(rename = "START")]
    Start,
    #[serde(rename = "ATTACK")]
    Attack { card: String },
    #[serde(rename = "DEFEND", rename_all = "camelCase")]
    Defend { attack_index: usize, card: String },
    #[serde(rename = "TRANSFER")]
    Transfer { card: String },
    #[serde(rename = "TAKE")]
    Take,
    #[serde(rename = "BEAT")]
    Beat,
    #[serde(rename = "PASS")]
    Pass,
}

/// Frames sent from server to clients.
/// STATE carries a per-player view; no frame ever exposes another player's
/// hand or the deck order.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "STATE")]
    State { state: PlayerView },
    #[serde(rename = "INFO")]
    Info { message: String },
    #[serde(rename = "ERROR")]
    Error {
        code: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
}

impl ServerMessage {
    pub fn state(view: PlayerView) -> Self {
        Self::State { state: view }
    }
    pub fn info(message: impl Into<String>) -> Self {
        Self::Info {
            message: message.into(),
        }
    }
    pub fn error(code: ErrorCode) -> Self {
        Self::Error {
            code: code.as_str(),
            detail: None,
        }
    }
    pub fn error_with(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Error {
            code: code.as_str(),
            detail: Some(detail.into()),
        }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server message")
    }
}
