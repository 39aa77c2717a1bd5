use super::*;
use drk_core::ID;
use drk_rules::GameState;
use drk_rules::Player;
use drk_rules::RoomConfig;

/// Room lifecycle phase as persisted and broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomPhase {
    Lobby,
    Playing,
    Finished,
}

/// Immutable room identity and configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMeta {
    pub room_id: ID<Room>,
    pub host_id: ID<Player>,
    pub config: RoomConfig,
    pub created_at: i64,
}

/// A seat in the lobby roster. Mutated only before game start, except for
/// the connectivity flag which tracks socket attachment throughout.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyPlayer {
    pub id: ID<Player>,
    pub display_name: String,
    pub connected: bool,
    pub ready: bool,
}

/// The whole-room snapshot, written atomically under `room/{roomId}` after
/// every mutation. Field order and the ordered collections inside
/// [`GameState`] keep load-then-serialize byte-identical.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    pub meta: RoomMeta,
    pub lobby_players: Vec<LobbyPlayer>,
    pub phase: RoomPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<GameState>,
}

impl RoomRecord {
    /// Snapshot key for this room.
    pub fn key(room: ID<Room>) -> String {
        format!("room/{}", room)
    }

    /// Fresh lobby with the given players pre-seeded; the first is host.
    /// Direct room creation passes a single seat, the matchmaker passes the
    /// whole group in FIFO order.
    pub fn lobby(
        room_id: ID<Room>,
        config: RoomConfig,
        seats: Vec<(ID<Player>, String)>,
    ) -> Self {
        assert!(!seats.is_empty(), "a lobby needs at least its host");
        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time")
            .as_secs() as i64;
        Self {
            meta: RoomMeta {
                room_id,
                host_id: seats[0].0,
                config,
                created_at,
            },
            lobby_players: seats
                .into_iter()
                .map(|(id, display_name)| LobbyPlayer {
                    id,
                    display_name,
                    connected: false,
                    ready: false,
                })
                .collect(),
            phase: RoomPhase::Lobby,
            game: None,
        }
    }

    pub fn member(&self, id: ID<Player>) -> Option<&LobbyPlayer> {
        self.lobby_players.iter().find(|p| p.id == id)
    }
    pub fn member_mut(&mut self, id: ID<Player>) -> Option<&mut LobbyPlayer> {
        self.lobby_players.iter_mut().find(|p| p.id == id)
    }
    pub fn is_full(&self) -> bool {
        self.lobby_players.len() >= self.meta.config.max_players as usize
    }
    pub fn all_ready(&self) -> bool {
        self.lobby_players.iter().all(|p| p.ready)
    }
    /// The roster as a seating order for the deal.
    pub fn seating(&self) -> Vec<ID<Player>> {
        self.lobby_players.iter().map(|p| p.id).collect()
    }
}
