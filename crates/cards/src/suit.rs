/// Card suit: spades, hearts, diamonds, clubs.
///
/// The ordering (S < H < D < C) is arbitrary but consistent, used for
/// stable hand sorting and canonical deck construction. Exactly one suit
/// per game is trump; trump status lives in the game state, not here.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Suit {
    S = 0,
    H = 1,
    D = 2,
    C = 3,
}

impl Suit {
    /// All four suits in canonical order.
    pub const fn all() -> [Suit; 4] {
        [Suit::S, Suit::H, Suit::D, Suit::C]
    }
    /// Unicode suit symbol for display.
    pub fn glyph(&self) -> char {
        match self {
            Suit::S => '♠',
            Suit::H => '♥',
            Suit::D => '♦',
            Suit::C => '♣',
        }
    }
}

/// char isomorphism
impl TryFrom<char> for Suit {
    type Error = String;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'S' | '♠' => Ok(Suit::S),
            'H' | '♥' => Ok(Suit::H),
            'D' | '♦' => Ok(Suit::D),
            'C' | '♣' => Ok(Suit::C),
            _ => Err(format!("invalid suit char: {}", c)),
        }
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Suit::S => write!(f, "S"),
            Suit::H => write!(f, "H"),
            Suit::D => write!(f, "D"),
            Suit::C => write!(f, "C"),
        }
    }
}

impl serde::Serialize for Suit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Suit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        token
            .chars()
            .next()
            .filter(|_| token.chars().count() == 1)
            .ok_or_else(|| serde::de::Error::custom("expected single suit letter"))
            .and_then(|c| Suit::try_from(c).map_err(serde::de::Error::custom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_char() {
        for suit in Suit::all() {
            let c = suit.to_string().chars().next().unwrap();
            assert!(suit == Suit::try_from(c).unwrap());
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(Suit::try_from('x').is_err());
        assert!(Suit::try_from('7').is_err());
    }
}
