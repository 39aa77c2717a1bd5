use drk_rules::RuleError;

/// The closed set of error codes a client can receive.
///
/// Rule violations map 1:1 from [`RuleError`]; the rest are protocol and
/// room lifecycle failures. Codes are stable wire strings; `detail` on the
/// frame is free-form and optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    BadJson,
    BadSession,
    SessionExpired,
    RoomNotReady,
    RoomNotFound,
    RoomFull,
    NotInRoom,
    NotInGame,
    NotJoined,
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
    BadCard,
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
    GameNotPlaying,
    GameFinished,
    UnknownMsg,
    PersistFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadJson => "BAD_JSON",
            Self::BadSession => "BAD_SESSION",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::RoomNotReady => "ROOM_NOT_READY",
            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::RoomFull => "ROOM_FULL",
            Self::NotInRoom => "NOT_IN_ROOM",
            Self::NotInGame => "NOT_IN_GAME",
            Self::NotJoined => "NOT_JOINED",
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
            Self::BadCard => "BAD_CARD",
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
            Self::GameNotPlaying => "GAME_NOT_PLAYING",
            Self::GameFinished => "GAME_FINISHED",
            Self::UnknownMsg => "UNKNOWN_MSG",
            Self::PersistFailed => "PERSIST_FAILED",
        }
    }
}

impl From<RuleError> for ErrorCode {
    fn from(e: RuleError) -> Self {
        match e {
            RuleError::GameFinished => Self::GameFinished,
            RuleError::NotActive => Self::NotActive,
            RuleError::DefenderCannotAttack => Self::DefenderCannotAttack,
            RuleError::DefenderCannotPass => Self::DefenderCannotPass,
            RuleError::OnlyDefenderCanDefend => Self::OnlyDefenderCanDefend,
            RuleError::OnlyDefenderCanTake => Self::OnlyDefenderCanTake,
            RuleError::OnlyDefenderCanBeat => Self::OnlyDefenderCanBeat,
            RuleError::OnlyDefenderCanTransfer => Self::OnlyDefenderCanTransfer,
            RuleError::YouPassed => Self::YouPassed,
            RuleError::CardNotInHand => Self::CardNotInHand,
            RuleError::RoundLimit => Self::RoundLimit,
            RuleError::OnlyMainAttackerStarts => Self::OnlyMainAttackerStarts,
            RuleError::RankNotOnTable => Self::RankNotOnTable,
            RuleError::DefenderMustRespond => Self::DefenderMustRespond,
            RuleError::BadAttackIndex => Self::BadAttackIndex,
            RuleError::AlreadyDefended => Self::AlreadyDefended,
            RuleError::DoesNotBeat => Self::DoesNotBeat,
            RuleError::ModeNotPerevodnoy => Self::ModeNotPerevodnoy,
            RuleError::TakeAlreadyDeclared => Self::TakeAlreadyDeclared,
            RuleError::NothingToTransfer => Self::NothingToTransfer,
            RuleError::CannotTransferAfterDefend => Self::CannotTransferAfterDefend,
            RuleError::RankMustMatchAttack => Self::RankMustMatchAttack,
            RuleError::NothingOnTable => Self::NothingOnTable,
            RuleError::NotFullyDefended => Self::NotFullyDefended,
            RuleError::AttackersNotPassed => Self::AttackersNotPassed,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
