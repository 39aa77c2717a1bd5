/// A well-formed but illegal game event.
///
/// Every variant maps onto exactly one stable wire code; the room actor
/// forwards the code to the offending socket and mutates nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleError {
    GameFinished,
    NotActive,
    DefenderCannotAttack,
    DefenderCannotPass,
    OnlyDefenderCanDefend,
    OnlyDefenderCanTake,
    OnlyDefenderCanBeat,
    OnlyDefenderCanTransfer,
    YouPassed,
    CardNotInHand,
    RoundLimit,
    OnlyMainAttackerStarts,
    RankNotOnTable,
    DefenderMustRespond,
    BadAttackIndex,
    AlreadyDefended,
    DoesNotBeat,
    ModeNotPerevodnoy,
    TakeAlreadyDeclared,
    NothingToTransfer,
    CannotTransferAfterDefend,
    RankMustMatchAttack,
    NothingOnTable,
    NotFullyDefended,
    AttackersNotPassed,
}

impl RuleError {
    /// Stable wire code for the ERROR frame.
    pub fn code(&self) -> &'static str {
        match self {
            Self::GameFinished => "GAME_FINISHED",
            Self::NotActive => "NOT_ACTIVE",
            Self::DefenderCannotAttack => "DEFENDER_CANNOT_ATTACK",
            Self::DefenderCannotPass => "DEFENDER_CANNOT_PASS",
            Self::OnlyDefenderCanDefend => "ONLY_DEFENDER_CAN_DEFEND",
            Self::OnlyDefenderCanTake => "ONLY_DEFENDER_CAN_TAKE",
            Self::OnlyDefenderCanBeat => "ONLY_DEFENDER_CAN_BEAT",
            Self::OnlyDefenderCanTransfer => "ONLY_DEFENDER_CAN_TRANSFER",
            Self::YouPassed => "YOU_PASSED",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::RoundLimit => "ROUND_LIMIT",
            Self::OnlyMainAttackerStarts => "ONLY_MAIN_ATTACKER_STARTS",
            Self::RankNotOnTable => "RANK_NOT_ON_TABLE",
            Self::DefenderMustRespond => "DEFENDER_MUST_RESPOND",
            Self::BadAttackIndex => "BAD_ATTACK_INDEX",
            Self::AlreadyDefended => "ALREADY_DEFENDED",
            Self::DoesNotBeat => "DOES_NOT_BEAT",
            Self::ModeNotPerevodnoy => "MODE_NOT_PEREVODNOY",
            Self::TakeAlreadyDeclared => "TAKE_ALREADY_DECLARED",
            Self::NothingToTransfer => "NOTHING_TO_TRANSFER",
            Self::CannotTransferAfterDefend => "CANNOT_TRANSFER_AFTER_DEFEND",
            Self::RankMustMatchAttack => "RANK_MUST_MATCH_ATTACK",
            Self::NothingOnTable => "NOTHING_ON_TABLE",
            Self::NotFullyDefended => "NOT_FULLY_DEFENDED",
            Self::AttackersNotPassed => "ATTACKERS_NOT_PASSED",
        }
    }
}

impl std::fmt::Display for RuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::error::Error for RuleError {}
