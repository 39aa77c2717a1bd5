use super::*;
use drk_cards::Card;
use drk_core::HAND_SIZE;
use drk_core::ID;
use drk_core::TABLE_LIMIT;

/// What an applied event did to the round structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The round goes on.
    Continued,
    /// The round resolved (beat or completed take); roles rotated.
    RoundClosed,
    /// Resolution left at most one active player; the game is over.
    GameOver,
}

impl GameState {
    /// Validates and applies one event. Either the whole transition happens
    /// or the state is untouched and the caller gets the rule code.
    pub fn apply(&mut self, player: ID<Player>, action: Action) -> Result<Outcome, RuleError> {
        self.validate(player, action)?;
        match action {
            Action::Attack(card) => {
                self.remove_card(player, card);
                self.table.push(TablePair::open(card));
                Ok(Outcome::Continued)
            }
            Action::Defend { index, card } => {
                self.remove_card(player, card);
                self.table[index].defense = Some(card);
                Ok(Outcome::Continued)
            }
            Action::Transfer(card) => {
                self.remove_card(player, card);
                self.table.push(TablePair::open(card));
                let previous = self.defender;
                self.attacker = previous;
                self.defender = self.next_active(previous);
                self.round_limit = TABLE_LIMIT.min(self.hand(self.defender).len());
                Ok(Outcome::Continued)
            }
            Action::Take => {
                self.take_declared = true;
                self.resolve_if_taken()
            }
            Action::Pass => {
                self.passed.insert(player);
                self.resolve_if_taken()
            }
            Action::Beat => Ok(self.resolve_beat()),
        }
    }

    /// A declared take resolves once every attacker has passed on the
    /// throw-in phase.
    fn resolve_if_taken(&mut self) -> Result<Outcome, RuleError> {
        if self.take_declared && self.attackers().all(|id| self.passed.contains(&id)) {
            Ok(self.resolve_take())
        } else {
            Ok(Outcome::Continued)
        }
    }

    /// Beat path: table to discard, refill, roles rotate onto the defender.
    fn resolve_beat(&mut self) -> Outcome {
        let cards: Vec<Card> = self
            .table
            .drain(..)
            .flat_map(|pair| std::iter::once(pair.attack).chain(pair.defense))
            .collect();
        self.discard.extend(cards);
        let attacker = self.attacker;
        let defender = self.defender;
        self.refill(attacker, defender);
        self.conclude(defender, false)
    }

    /// Take path: table into the taker's hand, refill with the taker last,
    /// roles rotate past the taker.
    fn resolve_take(&mut self) -> Outcome {
        let cards: Vec<Card> = self
            .table
            .drain(..)
            .flat_map(|pair| std::iter::once(pair.attack).chain(pair.defense))
            .collect();
        let taker = self.defender;
        self.give_cards(taker, cards);
        let attacker = self.attacker;
        self.refill(attacker, taker);
        self.conclude(taker, true)
    }

    /// Draws each active hand back up to six, visiting seats in order from
    /// `first` and leaving `last` (the round's defender) for the end.
    /// A no-op once the stock is empty.
    fn refill(&mut self, first: ID<Player>, last: ID<Player>) {
        let start = self
            .order
            .iter()
            .position(|id| *id == first)
            .expect("refill starts at a seated player");
        let mut sequence: Vec<ID<Player>> = (0..self.order.len())
            .map(|step| self.order[(start + step) % self.order.len()])
            .filter(|id| self.is_active(*id) && *id != last)
            .collect();
        if self.is_active(last) {
            sequence.push(last);
        }
        for id in sequence {
            let short = HAND_SIZE.saturating_sub(self.hand(id).len());
            let draws: Vec<Card> = (0..short).filter_map(|_| self.deck.pop()).collect();
            self.give_cards(id, draws);
        }
    }

    /// Shared tail of both resolution paths: deck-exhaustion retirement,
    /// terminal detection, role rotation, round variable reset.
    fn conclude(&mut self, previous_defender: ID<Player>, take_path: bool) -> Outcome {
        if self.deck.is_empty() {
            for id in self.order.clone() {
                if self.hand(id).is_empty() {
                    self.active.insert(id, false);
                }
            }
        }
        self.passed.clear();
        self.take_declared = false;
        if self.active_count() <= 1 {
            self.phase = GamePhase::Finished;
            self.loser = self
                .order
                .iter()
                .copied()
                .find(|id| self.is_active(*id));
            return Outcome::GameOver;
        }
        self.attacker = if take_path {
            // the taker sits the next round out as attacker
            self.next_active(previous_defender)
        } else if self.is_active(previous_defender) {
            previous_defender
        } else {
            self.next_active(previous_defender)
        };
        self.defender = self.next_active(self.attacker);
        self.round_limit = TABLE_LIMIT.min(self.hand(self.defender).len());
        Outcome::RoundClosed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drk_cards::DeckSize;
    use std::collections::BTreeMap;
    use std::collections::BTreeSet;

    fn card(token: &str) -> Card {
        Card::try_from(token).unwrap()
    }

    fn cards(tokens: &[&str]) -> Vec<Card> {
        tokens.iter().map(|t| card(t)).collect()
    }

    /// Builds a mid-game state from explicit parts. Whatever the hands and
    /// stock do not account for is parked in the discard so that card
    /// conservation stays checkable. `deck` is bottom-first; its first card
    /// (or `trump` when the stock is empty) fixes the trump suit.
    fn rig(
        mode: GameMode,
        deck_size: DeckSize,
        hands: Vec<Vec<Card>>,
        deck: Vec<Card>,
        trump: Card,
    ) -> (GameState, Vec<ID<Player>>) {
        let order: Vec<ID<Player>> = (0..hands.len()).map(|_| ID::default()).collect();
        let mut sorted_hands: BTreeMap<ID<Player>, Vec<Card>> = BTreeMap::new();
        for (id, mut hand) in order.iter().copied().zip(hands.into_iter()) {
            hand.sort();
            sorted_hands.insert(id, hand);
        }
        let held: BTreeSet<Card> = sorted_hands
            .values()
            .flatten()
            .chain(deck.iter())
            .copied()
            .collect();
        let discard: BTreeSet<Card> = drk_cards::deck(deck_size)
            .into_iter()
            .filter(|c| !held.contains(c))
            .collect();
        let attacker = order[0];
        let defender = order[1];
        let round_limit = TABLE_LIMIT.min(sorted_hands[&defender].len());
        let state = GameState {
            mode,
            deck_size,
            active: order.iter().map(|id| (*id, true)).collect(),
            order: order.clone(),
            deck,
            trump_suit: trump.suit,
            trump_card: trump,
            hands: sorted_hands,
            table: Vec::new(),
            discard,
            attacker,
            defender,
            round_limit,
            passed: BTreeSet::new(),
            take_declared: false,
            phase: GamePhase::Playing,
            loser: None,
        };
        state.check_invariants().expect("rigged state is consistent");
        (state, order)
    }

    #[test]
    fn simple_beat_round() {
        // 2p podkidnoy, 36 deck: attack S6, cover with SK, pass, beat.
        let (mut state, p) = rig(
            GameMode::Podkidnoy,
            DeckSize::ThirtySix,
            vec![
                cards(&["S6", "H7", "H8", "D7", "D8", "C7"]),
                cards(&["SK", "H9", "H10", "D9", "D10", "C9"]),
            ],
            cards(&["H6", "C6", "D6"]),
            card("H6"),
        );
        let (a, b) = (p[0], p[1]);
        assert_eq!(state.apply(a, Action::Attack(card("S6"))).unwrap(), Outcome::Continued);
        assert_eq!(
            state
                .apply(b, Action::Defend { index: 0, card: card("SK") })
                .unwrap(),
            Outcome::Continued
        );
        assert_eq!(state.apply(a, Action::Pass).unwrap(), Outcome::Continued);
        assert_eq!(state.apply(b, Action::Beat).unwrap(), Outcome::RoundClosed);
        assert!(state.table().is_empty());
        assert!(state.discard.contains(&card("S6")));
        assert!(state.discard.contains(&card("SK")));
        assert_eq!(state.hand(a).len(), HAND_SIZE);
        assert_eq!(state.hand(b).len(), HAND_SIZE);
        assert_eq!(state.attacker(), b);
        assert_eq!(state.defender(), a);
        assert_eq!(state.passed().count(), 0);
        state.check_invariants().unwrap();
    }

    #[test]
    fn take_keeps_attacker_in_two_player() {
        let (mut state, p) = rig(
            GameMode::Podkidnoy,
            DeckSize::ThirtySix,
            vec![
                cards(&["H7", "S7", "S8", "D7", "D8", "C7"]),
                cards(&["SK", "H9", "H10", "D9", "D10", "C9"]),
            ],
            cards(&["H6", "C6", "D6"]),
            card("H6"),
        );
        let (a, b) = (p[0], p[1]);
        state.apply(a, Action::Attack(card("H7"))).unwrap();
        assert_eq!(state.apply(b, Action::Take).unwrap(), Outcome::Continued);
        assert_eq!(state.apply(a, Action::Pass).unwrap(), Outcome::RoundClosed);
        // taker keeps the table and is not refilled beyond it
        assert_eq!(state.hand(b).len(), 7);
        assert!(state.hand(b).contains(&card("H7")));
        assert!(state.table().is_empty());
        assert_eq!(state.hand(a).len(), HAND_SIZE);
        // next active after the taker wraps back to the same attacker
        assert_eq!(state.attacker(), a);
        assert_eq!(state.defender(), b);
        assert!(!state.take_declared());
        state.check_invariants().unwrap();
    }

    #[test]
    fn transfer_re_aims_the_round() {
        let (mut state, p) = rig(
            GameMode::Perevodnoy,
            DeckSize::ThirtySix,
            vec![
                cards(&["D9", "S7", "S8", "D7", "D8", "C7"]),
                cards(&["H9", "SK", "H10", "D10", "C9", "C10"]),
                cards(&["SA", "HA", "DA", "CA", "SQ", "HQ"]),
            ],
            cards(&["H6", "C6", "D6"]),
            card("H6"),
        );
        let (a, b, c) = (p[0], p[1], p[2]);
        state.apply(a, Action::Attack(card("D9"))).unwrap();
        assert_eq!(
            state.apply(b, Action::Transfer(card("H9"))).unwrap(),
            Outcome::Continued
        );
        assert_eq!(state.table().len(), 2);
        assert!(state.table().iter().all(|pair| !pair.covered()));
        assert_eq!(state.attacker(), b);
        assert_eq!(state.defender(), c);
        assert_eq!(state.round_limit(), TABLE_LIMIT.min(state.hand(c).len()));
        state.check_invariants().unwrap();
    }

    #[test]
    fn attack_rank_must_be_on_table() {
        let (mut state, p) = rig(
            GameMode::Podkidnoy,
            DeckSize::ThirtySix,
            vec![
                cards(&["S6", "H9", "S8", "D7", "D8", "C7"]),
                cards(&["S10", "SK", "H10", "D10", "C9", "C10"]),
            ],
            cards(&["H6", "C6", "D6"]),
            card("H6"),
        );
        let (a, b) = (p[0], p[1]);
        state.apply(a, Action::Attack(card("S6"))).unwrap();
        state
            .apply(b, Action::Defend { index: 0, card: card("S10") })
            .unwrap();
        let before = state.clone();
        assert_eq!(
            state.apply(a, Action::Attack(card("H9"))),
            Err(RuleError::RankNotOnTable)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn defender_must_respond_before_more_attacks() {
        let (mut state, p) = rig(
            GameMode::Podkidnoy,
            DeckSize::ThirtySix,
            vec![
                cards(&["S6", "H6", "S8", "D7", "D8", "C7"]),
                cards(&["S10", "SK", "H10", "D10", "C9", "C10"]),
            ],
            cards(&["H7", "C6", "D6"]),
            card("H7"),
        );
        let a = p[0];
        state.apply(a, Action::Attack(card("S6"))).unwrap();
        assert_eq!(
            state.apply(a, Action::Attack(card("H6"))),
            Err(RuleError::DefenderMustRespond)
        );
    }

    #[test]
    fn throw_in_after_take_is_allowed_but_defense_is_frozen() {
        let (mut state, p) = rig(
            GameMode::Podkidnoy,
            DeckSize::ThirtySix,
            vec![
                cards(&["S6", "H6", "S8", "D7", "D8", "C7"]),
                cards(&["S10", "SK", "H10", "D10", "C9", "C10"]),
            ],
            cards(&["H7", "C6", "D6"]),
            card("H7"),
        );
        let (a, b) = (p[0], p[1]);
        state.apply(a, Action::Attack(card("S6"))).unwrap();
        state.apply(b, Action::Take).unwrap();
        // throwing in a matching rank is still legal
        assert_eq!(state.apply(a, Action::Attack(card("H6"))).unwrap(), Outcome::Continued);
        assert_eq!(
            state.apply(b, Action::Defend { index: 0, card: card("S10") }),
            Err(RuleError::TakeAlreadyDeclared)
        );
        // last attacker passing completes the take
        assert_eq!(state.apply(a, Action::Pass).unwrap(), Outcome::RoundClosed);
        assert_eq!(state.hand(b).len(), 8);
        state.check_invariants().unwrap();
    }

    #[test]
    fn round_limit_caps_throw_ins() {
        // defender rigged with two cards: the limit is 2 slots
        let (mut state, p) = rig(
            GameMode::Podkidnoy,
            DeckSize::ThirtySix,
            vec![
                cards(&["S6", "H6", "D6", "C6", "S7", "H7"]),
                cards(&["S10", "SK"]),
            ],
            vec![],
            card("H9"),
        );
        let (a, b) = (p[0], p[1]);
        assert_eq!(state.round_limit(), 2);
        state.apply(a, Action::Attack(card("S6"))).unwrap();
        state.apply(b, Action::Take).unwrap();
        state.apply(a, Action::Attack(card("H6"))).unwrap();
        assert_eq!(
            state.apply(a, Action::Attack(card("D6"))),
            Err(RuleError::RoundLimit)
        );
    }

    #[test]
    fn terminal_names_the_sole_holdout() {
        // stock empty; the attacker sheds their last card, the defender
        // covers and is left alone holding cards
        let (mut state, p) = rig(
            GameMode::Podkidnoy,
            DeckSize::ThirtySix,
            vec![cards(&["S6"]), cards(&["S7", "SA"])],
            vec![],
            card("H6"),
        );
        let (a, b) = (p[0], p[1]);
        state.apply(a, Action::Attack(card("S6"))).unwrap();
        state
            .apply(b, Action::Defend { index: 0, card: card("S7") })
            .unwrap();
        state.apply(a, Action::Pass).unwrap();
        assert_eq!(state.apply(b, Action::Beat).unwrap(), Outcome::GameOver);
        assert!(!state.is_active(a));
        assert_eq!(state.phase(), GamePhase::Finished);
        assert_eq!(state.loser(), Some(b));
    }

    #[test]
    fn simultaneous_exit_is_a_draw() {
        let (mut state, p) = rig(
            GameMode::Podkidnoy,
            DeckSize::ThirtySix,
            vec![cards(&["S6"]), cards(&["S7"])],
            vec![],
            card("H6"),
        );
        let (a, b) = (p[0], p[1]);
        state.apply(a, Action::Attack(card("S6"))).unwrap();
        state
            .apply(b, Action::Defend { index: 0, card: card("S7") })
            .unwrap();
        state.apply(a, Action::Pass).unwrap();
        assert_eq!(state.apply(b, Action::Beat).unwrap(), Outcome::GameOver);
        assert_eq!(state.phase(), GamePhase::Finished);
        assert_eq!(state.loser(), None);
    }

    #[test]
    fn refill_is_noop_on_empty_stock() {
        let (mut state, p) = rig(
            GameMode::Podkidnoy,
            DeckSize::ThirtySix,
            vec![cards(&["S6", "H8"]), cards(&["S7", "SA", "HK"])],
            vec![],
            card("H6"),
        );
        let (a, b) = (p[0], p[1]);
        state.apply(a, Action::Attack(card("S6"))).unwrap();
        state
            .apply(b, Action::Defend { index: 0, card: card("S7") })
            .unwrap();
        state.apply(a, Action::Pass).unwrap();
        assert_eq!(state.apply(b, Action::Beat).unwrap(), Outcome::RoundClosed);
        assert_eq!(state.hand(a).len(), 1);
        assert_eq!(state.hand(b).len(), 2);
        assert_eq!(state.attacker(), b);
        assert_eq!(state.defender(), a);
        assert_eq!(state.round_limit(), 1);
    }

    #[test]
    fn transfer_chain_respects_shrinking_hands() {
        // the would-be target holds a single card, so a second pair cannot
        // be re-aimed at them
        let (mut state, p) = rig(
            GameMode::Perevodnoy,
            DeckSize::ThirtySix,
            vec![
                cards(&["D9", "S7", "S8", "D7", "D8", "C7"]),
                cards(&["H9", "SK", "H10", "D10", "C9", "C10"]),
                cards(&["SA"]),
            ],
            vec![],
            card("H6"),
        );
        let (a, b) = (p[0], p[1]);
        state.apply(a, Action::Attack(card("D9"))).unwrap();
        assert_eq!(
            state.apply(b, Action::Transfer(card("H9"))),
            Err(RuleError::RoundLimit)
        );
    }

    #[test]
    fn beat_requires_all_attackers_passed() {
        let (mut state, p) = rig(
            GameMode::Podkidnoy,
            DeckSize::ThirtySix,
            vec![
                cards(&["S6", "H6", "S8", "D7", "D8", "C7"]),
                cards(&["S10", "SK", "H10", "D10", "C9", "C10"]),
                cards(&["SA", "HA", "DA", "CA", "SQ", "HQ"]),
            ],
            cards(&["H7", "C6", "D6"]),
            card("H7"),
        );
        let (a, b, c) = (p[0], p[1], p[2]);
        state.apply(a, Action::Attack(card("S6"))).unwrap();
        state
            .apply(b, Action::Defend { index: 0, card: card("S10") })
            .unwrap();
        state.apply(a, Action::Pass).unwrap();
        assert_eq!(
            state.apply(b, Action::Beat),
            Err(RuleError::AttackersNotPassed)
        );
        state.apply(c, Action::Pass).unwrap();
        assert_eq!(state.apply(b, Action::Beat).unwrap(), Outcome::RoundClosed);
        state.check_invariants().unwrap();
    }

    #[test]
    fn allowed_flags_follow_roles() {
        let (mut state, p) = rig(
            GameMode::Perevodnoy,
            DeckSize::ThirtySix,
            vec![
                cards(&["S6", "H6", "S8", "D7", "D8", "C7"]),
                cards(&["S10", "S9", "H10", "D10", "C9", "C10"]),
                cards(&["SA", "HA", "DA", "CA", "SQ", "HQ"]),
            ],
            cards(&["H7", "C6", "D6"]),
            card("H7"),
        );
        let (a, b, c) = (p[0], p[1], p[2]);
        let opening = state.allowed(a);
        assert!(opening.attack);
        assert!(!opening.defend && !opening.take && !opening.beat && !opening.pass);
        // side attacker may not open the round
        assert!(!state.allowed(c).attack);
        state.apply(a, Action::Attack(card("S6"))).unwrap();
        let defending = state.allowed(b);
        assert!(defending.defend && defending.take);
        assert!(!defending.attack && !defending.beat);
        assert!(state.allowed(a).pass);
        state.check_invariants().unwrap();
    }
}
