use super::*;
use drk_cards::Card;
use drk_cards::Suit;
use drk_core::ID;
use drk_core::TABLE_LIMIT;

/// Card ordering predicate: `defense` covers `attack` iff it is a higher
/// card of the same suit, or any trump against a non-trump.
pub fn beats(defense: Card, attack: Card, trump: Suit) -> bool {
    (defense.suit == attack.suit && defense.rank > attack.rank)
        || (defense.suit == trump && attack.suit != trump)
}

/// Per-player action flags, derived from a single pure function over
/// `(GameState, player)` and shipped in every view so clients never have to
/// re-implement legality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allowed {
    pub attack: bool,
    pub defend: bool,
    pub transfer: bool,
    pub take: bool,
    pub pass: bool,
    pub beat: bool,
}

impl GameState {
    /// Decides legality of a candidate event without mutating anything.
    /// Checks run in the order the rules table lists them, so the reported
    /// code is stable for a given state.
    pub fn validate(&self, player: ID<Player>, action: Action) -> Result<(), RuleError> {
        if self.phase == GamePhase::Finished {
            return Err(RuleError::GameFinished);
        }
        if !self.is_active(player) {
            return Err(RuleError::NotActive);
        }
        match action {
            Action::Attack(card) => self.validate_attack(player, card),
            Action::Defend { index, card } => self.validate_defend(player, index, card),
            Action::Transfer(card) => self.validate_transfer(player, card),
            Action::Take => self.validate_take(player),
            Action::Pass => self.validate_pass(player),
            Action::Beat => self.validate_beat(player),
        }
    }

    fn validate_attack(&self, player: ID<Player>, card: Card) -> Result<(), RuleError> {
        if player == self.defender {
            return Err(RuleError::DefenderCannotAttack);
        }
        if self.passed.contains(&player) {
            return Err(RuleError::YouPassed);
        }
        if !self.holds(player, card) {
            return Err(RuleError::CardNotInHand);
        }
        if self.table.len() >= self.round_limit {
            return Err(RuleError::RoundLimit);
        }
        if self.table.is_empty() {
            if player != self.attacker {
                return Err(RuleError::OnlyMainAttackerStarts);
            }
        } else if !rank_set(&self.table).contains(&card.rank) {
            return Err(RuleError::RankNotOnTable);
        }
        if !self.take_declared && any_open(&self.table) {
            return Err(RuleError::DefenderMustRespond);
        }
        Ok(())
    }

    fn validate_defend(&self, player: ID<Player>, index: usize, card: Card) -> Result<(), RuleError> {
        if player != self.defender {
            return Err(RuleError::OnlyDefenderCanDefend);
        }
        if self.take_declared {
            return Err(RuleError::TakeAlreadyDeclared);
        }
        let pair = self
            .table
            .get(index)
            .ok_or(RuleError::BadAttackIndex)?;
        if pair.covered() {
            return Err(RuleError::AlreadyDefended);
        }
        if !self.holds(player, card) {
            return Err(RuleError::CardNotInHand);
        }
        if !beats(card, pair.attack, self.trump_suit) {
            return Err(RuleError::DoesNotBeat);
        }
        Ok(())
    }

    fn validate_transfer(&self, player: ID<Player>, card: Card) -> Result<(), RuleError> {
        if self.mode != GameMode::Perevodnoy {
            return Err(RuleError::ModeNotPerevodnoy);
        }
        if player != self.defender {
            return Err(RuleError::OnlyDefenderCanTransfer);
        }
        if self.take_declared {
            return Err(RuleError::TakeAlreadyDeclared);
        }
        if self.table.is_empty() {
            return Err(RuleError::NothingToTransfer);
        }
        if self.table.iter().any(TablePair::covered) {
            return Err(RuleError::CannotTransferAfterDefend);
        }
        if !self.holds(player, card) {
            return Err(RuleError::CardNotInHand);
        }
        if !attack_ranks(&self.table).contains(&card.rank) {
            return Err(RuleError::RankMustMatchAttack);
        }
        // the re-aimed round must fit the next defender's hand
        let target = self.next_active(self.defender);
        if self.table.len() + 1 > TABLE_LIMIT.min(self.hand(target).len()) {
            return Err(RuleError::RoundLimit);
        }
        Ok(())
    }

    fn validate_take(&self, player: ID<Player>) -> Result<(), RuleError> {
        if player != self.defender {
            return Err(RuleError::OnlyDefenderCanTake);
        }
        if self.table.is_empty() {
            return Err(RuleError::NothingOnTable);
        }
        if self.take_declared {
            return Err(RuleError::TakeAlreadyDeclared);
        }
        Ok(())
    }

    fn validate_pass(&self, player: ID<Player>) -> Result<(), RuleError> {
        if player == self.defender {
            return Err(RuleError::DefenderCannotPass);
        }
        if self.table.is_empty() {
            return Err(RuleError::NothingOnTable);
        }
        if self.passed.contains(&player) {
            return Err(RuleError::YouPassed);
        }
        Ok(())
    }

    fn validate_beat(&self, player: ID<Player>) -> Result<(), RuleError> {
        if player != self.defender {
            return Err(RuleError::OnlyDefenderCanBeat);
        }
        if self.table.is_empty() {
            return Err(RuleError::NothingOnTable);
        }
        if !fully_covered(&self.table) {
            return Err(RuleError::NotFullyDefended);
        }
        if !self.attackers().all(|id| self.passed.contains(&id)) {
            return Err(RuleError::AttackersNotPassed);
        }
        Ok(())
    }

    /// Action flags for one player, for the outbound view.
    pub fn allowed(&self, player: ID<Player>) -> Allowed {
        if self.phase == GamePhase::Finished || !self.is_active(player) {
            return Allowed::default();
        }
        let hand = self.hand(player);
        let attack = hand
            .iter()
            .any(|card| self.validate(player, Action::Attack(*card)).is_ok());
        let defend = hand.iter().any(|card| {
            (0..self.table.len())
                .any(|index| self.validate(player, Action::Defend { index, card: *card }).is_ok())
        });
        let transfer = hand
            .iter()
            .any(|card| self.validate(player, Action::Transfer(*card)).is_ok());
        Allowed {
            attack,
            defend,
            transfer,
            take: self.validate(player, Action::Take).is_ok(),
            pass: self.validate(player, Action::Pass).is_ok(),
            beat: self.validate(player, Action::Beat).is_ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(token: &str) -> Card {
        Card::try_from(token).unwrap()
    }

    #[test]
    fn higher_same_suit_beats() {
        assert!(beats(card("S10"), card("S6"), Suit::H));
        assert!(!beats(card("S6"), card("S10"), Suit::H));
        assert!(!beats(card("S6"), card("S6"), Suit::H));
    }

    #[test]
    fn trump_beats_non_trump_regardless_of_rank() {
        assert!(beats(card("H6"), card("SA"), Suit::H));
        assert!(!beats(card("SA"), card("H6"), Suit::H));
    }

    #[test]
    fn off_suit_non_trump_never_beats() {
        assert!(!beats(card("DA"), card("S6"), Suit::H));
    }

    #[test]
    fn trump_on_trump_compares_ranks() {
        assert!(beats(card("HK"), card("H9"), Suit::H));
        assert!(!beats(card("H9"), card("HK"), Suit::H));
    }
}
