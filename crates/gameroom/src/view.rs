use super::*;
use drk_cards::Card;
use drk_cards::Suit;
use drk_core::ID;
use drk_rules::Allowed;
use drk_rules::GamePhase;
use drk_rules::GameState;
use drk_rules::Player;
use drk_rules::RoomConfig;
use drk_rules::TablePair;
use std::collections::BTreeMap;

/// The game as one player is allowed to see it: public structure, hand
/// sizes for everyone, and the addressee's own hand plus action flags.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub order: Vec<ID<Player>>,
    pub counts: BTreeMap<ID<Player>, usize>,
    pub table: Vec<TablePair>,
    pub discard_size: usize,
    pub trump_suit: Suit,
    pub trump_card: Card,
    pub deck_size: usize,
    pub attacker_id: ID<Player>,
    pub defender_id: ID<Player>,
    pub take_declared: bool,
    pub passed: Vec<ID<Player>>,
    pub phase: GamePhase,
    pub loser: Option<ID<Player>>,
    pub your_hand: Vec<Card>,
    pub allowed: Allowed,
}

/// One STATE frame's payload.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub room_id: ID<Room>,
    pub host_id: ID<Player>,
    pub config: RoomConfig,
    pub phase: RoomPhase,
    pub players: Vec<LobbyPlayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<GameView>,
}

impl GameView {
    /// Projects the authoritative state for one addressee. Only their hand
    /// crosses; everyone else contributes a count.
    pub fn tailor(state: &GameState, player: ID<Player>) -> Self {
        Self {
            order: state.order().to_vec(),
            counts: state
                .order()
                .iter()
                .map(|id| (*id, state.hand(*id).len()))
                .collect(),
            table: state.table().to_vec(),
            discard_size: state.discard_len(),
            trump_suit: state.trump_suit(),
            trump_card: state.trump_card(),
            deck_size: state.deck_len(),
            attacker_id: state.attacker(),
            defender_id: state.defender(),
            take_declared: state.take_declared(),
            passed: state.passed().collect(),
            phase: state.phase(),
            loser: state.loser(),
            your_hand: state.hand(player).to_vec(),
            allowed: state.allowed(player),
        }
    }
}

impl PlayerView {
    pub fn tailor(record: &RoomRecord, player: ID<Player>) -> Self {
        Self {
            room_id: record.meta.room_id,
            host_id: record.meta.host_id,
            config: record.meta.config,
            phase: record.phase,
            players: record.lobby_players.clone(),
            game: record
                .game
                .as_ref()
                .map(|state| GameView::tailor(state, player)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drk_cards::DeckSize;
    use drk_rules::GameMode;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn playing_record(seed: u64) -> RoomRecord {
        let seats = vec![
            (ID::default(), "anya".to_string()),
            (ID::default(), "borya".to_string()),
            (ID::default(), "vera".to_string()),
        ];
        let mut record = RoomRecord::lobby(
            ID::default(),
            RoomConfig {
                mode: GameMode::Podkidnoy,
                deck_size: DeckSize::ThirtySix,
                max_players: 3,
            },
            seats,
        );
        let ref mut rng = StdRng::seed_from_u64(seed);
        record.game = Some(GameState::deal(
            GameMode::Podkidnoy,
            DeckSize::ThirtySix,
            record.seating(),
            rng,
        ));
        record.phase = RoomPhase::Playing;
        record
    }

    #[test]
    fn view_carries_only_the_addressees_hand() {
        let record = playing_record(21);
        let state = record.game.as_ref().unwrap();
        let me = record.lobby_players[0].id;
        let view = PlayerView::tailor(&record, me);
        let game = view.game.unwrap();
        assert_eq!(game.your_hand, state.hand(me).to_vec());
        let json = serde_json::to_string(&game).unwrap();
        for other in record.lobby_players.iter().skip(1) {
            for card in state.hand(other.id) {
                // another player's card may only appear if it is also public
                let public = state.table().iter().any(|pair| {
                    pair.attack == *card || pair.defense == Some(*card)
                }) || state.trump_card() == *card
                    || state.hand(me).contains(card);
                if !public {
                    assert!(
                        !json.contains(&format!("\"{}\"", card)),
                        "{} leaked into {}'s view",
                        card,
                        me
                    );
                }
            }
        }
    }

    #[test]
    fn view_does_not_leak_deck_order() {
        let record = playing_record(22);
        let me = record.lobby_players[0].id;
        let game = PlayerView::tailor(&record, me).game.unwrap();
        assert_eq!(game.deck_size, record.game.as_ref().unwrap().deck_len());
        let json = serde_json::to_value(&game).unwrap();
        assert!(json.get("deck").is_none());
    }

    #[test]
    fn counts_cover_every_seat() {
        let record = playing_record(23);
        let me = record.lobby_players[1].id;
        let game = PlayerView::tailor(&record, me).game.unwrap();
        assert_eq!(game.counts.len(), 3);
        assert!(game.counts.values().all(|n| *n == 6));
    }
}
