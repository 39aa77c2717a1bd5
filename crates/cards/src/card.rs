use super::*;

/// A playing card: suit and rank.
///
/// Ordering is (suit, rank), the order hands are kept sorted in for stable
/// display. The wire form is the 2–3 character token `<suit><rank>`
/// (`S6`, `H10`, `DK`); serde goes through that token, never through the
/// field structure.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }
}

/// str isomorphism: suit letter followed by rank token.
impl TryFrom<&str> for Card {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim();
        let mut chars = s.chars();
        let suit = chars
            .next()
            .ok_or_else(|| "empty card token".to_string())
            .and_then(Suit::try_from)?;
        let rank = Rank::try_from(chars.as_str())?;
        Ok(Card { suit, rank })
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.suit, self.rank)
    }
}

impl serde::Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        Card::try_from(token.as_str()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_str() {
        for token in ["S6", "H10", "DK", "CA", "SJ", "HQ"] {
            let card = Card::try_from(token).unwrap();
            assert_eq!(card.to_string(), token);
        }
    }

    #[test]
    fn rejects_malformed() {
        assert!(Card::try_from("").is_err());
        assert!(Card::try_from("X9").is_err());
        assert!(Card::try_from("S5").is_err());
        assert!(Card::try_from("S").is_err());
    }

    #[test]
    fn serde_uses_wire_token() {
        let card = Card::try_from("H10").unwrap();
        assert_eq!(serde_json::to_string(&card).unwrap(), "\"H10\"");
        assert_eq!(serde_json::from_str::<Card>("\"H10\"").unwrap(), card);
    }

    #[test]
    fn ordered_by_suit_then_rank() {
        let low = Card::try_from("S6").unwrap();
        let high = Card::try_from("SA").unwrap();
        let other = Card::try_from("H6").unwrap();
        assert!(low < high);
        assert!(high < other);
    }
}
