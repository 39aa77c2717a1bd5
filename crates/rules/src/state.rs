use super::*;
use drk_cards::Card;
use drk_cards::DeckSize;
use drk_cards::Suit;
use drk_core::HAND_SIZE;
use drk_core::ID;
use drk_core::TABLE_LIMIT;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Game lifecycle phase. The lobby phase lives in the room record; by the
/// time a `GameState` exists the game is either running or over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Playing,
    Finished,
}

/// The authoritative game record.
///
/// Owned and mutated exclusively by one room actor; serialized whole into
/// the room snapshot after every mutation. All collections are ordered
/// (`BTreeMap`/`BTreeSet`/sorted `Vec`) so that load-then-serialize is
/// byte-identical.
///
/// `deck` keeps the trump card at index 0 (the bottom); draws pop from the
/// back (the stock end).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GameState {
    pub(crate) mode: GameMode,
    pub(crate) deck_size: DeckSize,
    pub(crate) order: Vec<ID<Player>>,
    pub(crate) active: BTreeMap<ID<Player>, bool>,
    pub(crate) deck: Vec<Card>,
    pub(crate) trump_suit: Suit,
    pub(crate) trump_card: Card,
    pub(crate) hands: BTreeMap<ID<Player>, Vec<Card>>,
    pub(crate) table: Vec<TablePair>,
    pub(crate) discard: BTreeSet<Card>,
    pub(crate) attacker: ID<Player>,
    pub(crate) defender: ID<Player>,
    pub(crate) round_limit: usize,
    pub(crate) passed: BTreeSet<ID<Player>>,
    pub(crate) take_declared: bool,
    pub(crate) phase: GamePhase,
    pub(crate) loser: Option<ID<Player>>,
}

impl GameState {
    /// Shuffles, deals six cards each, fixes trump, and selects the first
    /// attacker: lowest trump in hand, ties broken by seating, falling back
    /// to the first seat when no one holds a trump.
    ///
    /// The trump card is the bottom of the shuffled deck at deal time; with
    /// 24 cards and 4 players it is dealt into a hand and the stock starts
    /// empty.
    ///
    /// Panics if `order` is not 2..=4 players; the room enforces the count
    /// before starting a game.
    pub fn deal<R>(mode: GameMode, deck_size: DeckSize, order: Vec<ID<Player>>, rng: &mut R) -> Self
    where
        R: rand::Rng + ?Sized,
    {
        assert!(
            (2..=4).contains(&order.len()),
            "durak is played by 2-4 players"
        );
        let mut deck = drk_cards::shuffled(deck_size, rng);
        let trump_card = deck[0];
        let trump_suit = trump_card.suit;
        let mut hands: BTreeMap<ID<Player>, Vec<Card>> =
            order.iter().map(|id| (*id, Vec::new())).collect();
        for _ in 0..HAND_SIZE {
            for id in &order {
                let card = deck.pop().expect("deck covers the initial deal");
                hands.get_mut(id).expect("dealt to seated player").push(card);
            }
        }
        for hand in hands.values_mut() {
            hand.sort();
        }
        let attacker = Self::first_attacker(&order, &hands, trump_suit);
        let active: BTreeMap<ID<Player>, bool> = order.iter().map(|id| (*id, true)).collect();
        let defender = Self::next_in(&order, &active, attacker);
        let round_limit = TABLE_LIMIT.min(hands[&defender].len());
        Self {
            mode,
            deck_size,
            order,
            active,
            deck,
            trump_suit,
            trump_card,
            hands,
            table: Vec::new(),
            discard: BTreeSet::new(),
            attacker,
            defender,
            round_limit,
            passed: BTreeSet::new(),
            take_declared: false,
            phase: GamePhase::Playing,
            loser: None,
        }
    }

    fn first_attacker(
        order: &[ID<Player>],
        hands: &BTreeMap<ID<Player>, Vec<Card>>,
        trump: Suit,
    ) -> ID<Player> {
        order
            .iter()
            .filter_map(|id| {
                hands[id]
                    .iter()
                    .filter(|c| c.suit == trump)
                    .map(|c| c.rank)
                    .min()
                    .map(|rank| (rank, *id))
            })
            .min_by_key(|(rank, _)| *rank)
            .map(|(_, id)| id)
            .unwrap_or(order[0])
    }

    /// Next active player after `from` in seating order, wrapping around.
    /// Returns `from` itself when no other player remains active.
    pub fn next_active(&self, from: ID<Player>) -> ID<Player> {
        Self::next_in(&self.order, &self.active, from)
    }

    fn next_in(
        order: &[ID<Player>],
        active: &BTreeMap<ID<Player>, bool>,
        from: ID<Player>,
    ) -> ID<Player> {
        let start = order
            .iter()
            .position(|id| *id == from)
            .expect("player is seated");
        (1..=order.len())
            .map(|step| order[(start + step) % order.len()])
            .find(|id| active.get(id).copied().unwrap_or(false) && *id != from)
            .unwrap_or(from)
    }
}

/// Read access for views and the room actor. Hands are exposed per player;
/// callers building an outbound view must only touch the addressee's hand.
impl GameState {
    pub fn mode(&self) -> GameMode {
        self.mode
    }
    pub fn deck_size(&self) -> DeckSize {
        self.deck_size
    }
    pub fn order(&self) -> &[ID<Player>] {
        &self.order
    }
    pub fn is_active(&self, id: ID<Player>) -> bool {
        self.active.get(&id).copied().unwrap_or(false)
    }
    pub fn active_count(&self) -> usize {
        self.order.iter().filter(|id| self.is_active(**id)).count()
    }
    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }
    pub fn trump_suit(&self) -> Suit {
        self.trump_suit
    }
    pub fn trump_card(&self) -> Card {
        self.trump_card
    }
    pub fn hand(&self, id: ID<Player>) -> &[Card] {
        self.hands.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
    pub fn table(&self) -> &[TablePair] {
        &self.table
    }
    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }
    pub fn attacker(&self) -> ID<Player> {
        self.attacker
    }
    pub fn defender(&self) -> ID<Player> {
        self.defender
    }
    pub fn round_limit(&self) -> usize {
        self.round_limit
    }
    pub fn passed(&self) -> impl Iterator<Item = ID<Player>> + '_ {
        self.passed.iter().copied()
    }
    pub fn take_declared(&self) -> bool {
        self.take_declared
    }
    pub fn phase(&self) -> GamePhase {
        self.phase
    }
    pub fn loser(&self) -> Option<ID<Player>> {
        self.loser
    }
    pub fn is_seated(&self, id: ID<Player>) -> bool {
        self.order.contains(&id)
    }
}

/// Internal mutation helpers.
impl GameState {
    pub(crate) fn holds(&self, id: ID<Player>, card: Card) -> bool {
        self.hand(id).contains(&card)
    }
    /// Removes a card from a hand. The caller has already checked `holds`.
    pub(crate) fn remove_card(&mut self, id: ID<Player>, card: Card) {
        let hand = self.hands.get_mut(&id).expect("player has a hand");
        let at = hand
            .iter()
            .position(|c| *c == card)
            .expect("card was checked into the hand");
        hand.remove(at);
    }
    /// Adds cards to a hand, keeping the (suit, rank) sort.
    pub(crate) fn give_cards(&mut self, id: ID<Player>, cards: impl IntoIterator<Item = Card>) {
        let hand = self.hands.get_mut(&id).expect("player has a hand");
        hand.extend(cards);
        hand.sort();
    }
    /// Active players currently in the attacking role.
    pub(crate) fn attackers(&self) -> impl Iterator<Item = ID<Player>> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|id| self.is_active(*id) && *id != self.defender)
    }
}

/// Post-mutation consistency check. The room actor runs this after every
/// applied event; a violation poisons the room rather than persisting a
/// corrupt snapshot.
impl GameState {
    pub fn check_invariants(&self) -> Result<(), String> {
        let expected: BTreeSet<Card> = drk_cards::deck(self.deck_size).into_iter().collect();
        let mut seen: BTreeSet<Card> = BTreeSet::new();
        let mut total = 0usize;
        let mut absorb = |card: Card| {
            total += 1;
            seen.insert(card);
        };
        self.deck.iter().copied().for_each(&mut absorb);
        self.discard.iter().copied().for_each(&mut absorb);
        self.hands
            .values()
            .flat_map(|hand| hand.iter().copied())
            .for_each(&mut absorb);
        self.table
            .iter()
            .flat_map(|pair| std::iter::once(pair.attack).chain(pair.defense))
            .for_each(&mut absorb);
        if total != expected.len() || seen != expected {
            return Err(format!(
                "card conservation violated: {} cards seen, {} unique of {} expected",
                total,
                seen.len(),
                expected.len()
            ));
        }
        if self.table.len() > self.round_limit || self.round_limit > TABLE_LIMIT {
            return Err(format!(
                "table {} exceeds round limit {}",
                self.table.len(),
                self.round_limit
            ));
        }
        for pair in &self.table {
            if let Some(defense) = pair.defense {
                if !beats(defense, pair.attack, self.trump_suit) {
                    return Err(format!("{} does not beat {}", defense, pair.attack));
                }
            }
        }
        if self.phase == GamePhase::Playing
            && self.active_count() >= 2
            && self.attacker == self.defender
        {
            return Err("attacker and defender coincide".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seats(n: usize) -> Vec<ID<Player>> {
        (0..n).map(|_| ID::default()).collect()
    }

    #[test]
    fn deal_hand_sizes_all_configs() {
        for size in [DeckSize::TwentyFour, DeckSize::ThirtySix] {
            for n in 2..=4 {
                let ref mut rng = StdRng::seed_from_u64(42);
                let state = GameState::deal(GameMode::Podkidnoy, size, seats(n), rng);
                for id in state.order() {
                    assert_eq!(state.hand(*id).len(), HAND_SIZE);
                }
                assert_eq!(state.deck_len(), size.count() - n * HAND_SIZE);
                assert!(state.check_invariants().is_ok());
            }
        }
    }

    #[test]
    fn trump_is_bottom_of_stock() {
        let ref mut rng = StdRng::seed_from_u64(3);
        let state = GameState::deal(GameMode::Podkidnoy, DeckSize::ThirtySix, seats(2), rng);
        assert_eq!(state.deck[0], state.trump_card());
        assert_eq!(state.trump_card().suit, state.trump_suit());
    }

    #[test]
    fn full_deal_leaves_empty_stock() {
        let ref mut rng = StdRng::seed_from_u64(5);
        let state = GameState::deal(GameMode::Podkidnoy, DeckSize::TwentyFour, seats(4), rng);
        assert_eq!(state.deck_len(), 0);
        // trump card was dealt into someone's hand
        let held = state
            .order()
            .iter()
            .any(|id| state.hand(*id).contains(&state.trump_card()));
        assert!(held);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn first_attacker_holds_lowest_trump() {
        for seed in 0..16 {
            let ref mut rng = StdRng::seed_from_u64(seed);
            let state = GameState::deal(GameMode::Podkidnoy, DeckSize::ThirtySix, seats(3), rng);
            let lowest = state
                .order()
                .iter()
                .flat_map(|id| state.hand(*id).iter())
                .filter(|c| c.suit == state.trump_suit())
                .map(|c| c.rank)
                .min();
            match lowest {
                Some(rank) => assert!(
                    state
                        .hand(state.attacker())
                        .contains(&Card::new(state.trump_suit(), rank))
                ),
                None => assert_eq!(state.attacker(), state.order()[0]),
            }
            assert_eq!(state.defender(), state.next_active(state.attacker()));
            assert_ne!(state.attacker(), state.defender());
        }
    }

    #[test]
    fn next_active_skips_inactive() {
        let ref mut rng = StdRng::seed_from_u64(9);
        let mut state = GameState::deal(GameMode::Podkidnoy, DeckSize::ThirtySix, seats(3), rng);
        let order: Vec<_> = state.order().to_vec();
        state.active.insert(order[1], false);
        assert_eq!(state.next_active(order[0]), order[2]);
        assert_eq!(state.next_active(order[2]), order[0]);
    }

    #[test]
    fn snapshot_roundtrip_is_identity() {
        let ref mut rng = StdRng::seed_from_u64(11);
        let state = GameState::deal(GameMode::Perevodnoy, DeckSize::ThirtySix, seats(4), rng);
        let bytes = serde_json::to_string(&state).unwrap();
        let loaded: GameState = serde_json::from_str(&bytes).unwrap();
        assert_eq!(loaded, state);
        assert_eq!(serde_json::to_string(&loaded).unwrap(), bytes);
    }
}
