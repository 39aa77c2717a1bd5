use super::*;
use drk_cards::Card;
use drk_rules::Action;

/// Decode and conversion layer between raw frame text and typed commands.
pub struct Protocol;

impl Protocol {
    const KNOWN: [&'static str; 9] = [
        "JOIN", "READY", "START", "ATTACK", "DEFEND", "TRANSFER", "TAKE", "BEAT", "PASS",
    ];

    /// Decodes one frame. Distinguishes unparseable or malformed text
    /// (`BAD_JSON`) from a well-formed object with an unrecognized `type`
    /// (`UNKNOWN_MSG`).
    pub fn decode(text: &str) -> Result<ClientMessage, ErrorCode> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|_| ErrorCode::BadJson)?;
        match value.get("type").and_then(|t| t.as_str()) {
            None => Err(ErrorCode::BadJson),
            Some(tag) if !Self::KNOWN.contains(&tag) => Err(ErrorCode::UnknownMsg),
            Some(_) => serde_json::from_value(value).map_err(|_| ErrorCode::BadJson),
        }
    }

    /// Converts a gameplay frame into a rules action, parsing card tokens.
    /// Returns `None` for frames that are not game moves.
    pub fn action(msg: &ClientMessage) -> Option<Result<Action, ErrorCode>> {
        let parse = |token: &str| Card::try_from(token).map_err(|_| ErrorCode::BadCard);
        match msg {
            ClientMessage::Attack { card } => Some(parse(card).map(Action::Attack)),
            ClientMessage::Defend { attack_index, card } => Some(parse(card).map(|card| {
                Action::Defend {
                    index: *attack_index,
                    card,
                }
            })),
            ClientMessage::Transfer { card } => Some(parse(card).map(Action::Transfer)),
            ClientMessage::Take => Some(Ok(Action::Take)),
            ClientMessage::Beat => Some(Ok(Action::Beat)),
            ClientMessage::Pass => Some(Ok(Action::Pass)),
            ClientMessage::Join { .. } | ClientMessage::Ready { .. } | ClientMessage::Start => None,
        }
    }
}
