/// Card rank, 6 through 14. Court cards use 11=J, 12=Q, 13=K, 14=A.
///
/// The numeric interior makes `beats` a plain integer comparison; the
/// face-letter spelling exists only at the wire boundary.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rank(u8);

impl Rank {
    pub const JACK: Rank = Rank(11);
    pub const QUEEN: Rank = Rank(12);
    pub const KING: Rank = Rank(13);
    pub const ACE: Rank = Rank(14);

    /// Constructs a rank, rejecting values outside 6..=14.
    pub fn new(n: u8) -> Result<Self, String> {
        match n {
            6..=14 => Ok(Rank(n)),
            _ => Err(format!("invalid rank value: {}", n)),
        }
    }
    pub fn value(&self) -> u8 {
        self.0
    }
}

/// str isomorphism
impl TryFrom<&str> for Rank {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_ascii_uppercase().as_str() {
            "J" => Ok(Rank::JACK),
            "Q" => Ok(Rank::QUEEN),
            "K" => Ok(Rank::KING),
            "A" => Ok(Rank::ACE),
            digits => digits
                .parse::<u8>()
                .map_err(|_| format!("invalid rank str: {}", s))
                .and_then(Rank::new),
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.0 {
            11 => write!(f, "J"),
            12 => write!(f, "Q"),
            13 => write!(f, "K"),
            14 => write!(f, "A"),
            n => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_str() {
        for n in 6..=14 {
            let rank = Rank::new(n).unwrap();
            assert!(rank == Rank::try_from(rank.to_string().as_str()).unwrap());
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Rank::new(5).is_err());
        assert!(Rank::new(15).is_err());
        assert!(Rank::try_from("2").is_err());
        assert!(Rank::try_from("joker").is_err());
    }

    #[test]
    fn court_order() {
        assert!(Rank::JACK < Rank::QUEEN);
        assert!(Rank::QUEEN < Rank::KING);
        assert!(Rank::KING < Rank::ACE);
    }
}
