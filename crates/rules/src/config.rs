use drk_cards::DeckSize;

/// Game variant. Perevodnoy adds the TRANSFER move; the variants are
/// otherwise identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Podkidnoy,
    Perevodnoy,
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            GameMode::Podkidnoy => write!(f, "podkidnoy"),
            GameMode::Perevodnoy => write!(f, "perevodnoy"),
        }
    }
}

/// Immutable table configuration, fixed at room creation.
/// Doubles as the matchmaker queue key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfig {
    pub mode: GameMode,
    pub deck_size: DeckSize,
    pub max_players: u8,
}

impl RoomConfig {
    /// Rejects player counts outside 2..=4.
    pub fn validate(&self) -> Result<(), String> {
        match self.max_players {
            2..=4 => Ok(()),
            n => Err(format!("invalid max players: {}", n)),
        }
    }
}
