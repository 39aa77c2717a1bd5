use super::*;
use rand::seq::SliceRandom;

/// Deck size: the 24-card game starts at nine, the 36-card game at six.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DeckSize {
    TwentyFour,
    ThirtySix,
}

impl DeckSize {
    /// Lowest rank present in this deck.
    pub fn floor(&self) -> u8 {
        match self {
            DeckSize::TwentyFour => 9,
            DeckSize::ThirtySix => 6,
        }
    }
    pub fn count(&self) -> usize {
        match self {
            DeckSize::TwentyFour => 24,
            DeckSize::ThirtySix => 36,
        }
    }
}

/// u8 isomorphism with the wire encoding (24 / 36).
impl TryFrom<u8> for DeckSize {
    type Error = String;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            24 => Ok(DeckSize::TwentyFour),
            36 => Ok(DeckSize::ThirtySix),
            _ => Err(format!("invalid deck size: {}", n)),
        }
    }
}
impl From<DeckSize> for u8 {
    fn from(size: DeckSize) -> u8 {
        size.count() as u8
    }
}

/// Builds the full deck in canonical order: suits in [`Suit::all`] order,
/// ranks ascending within each suit.
pub fn deck(size: DeckSize) -> Vec<Card> {
    Suit::all()
        .into_iter()
        .flat_map(|suit| {
            (size.floor()..=14).map(move |n| Card::new(suit, Rank::new(n).expect("valid rank")))
        })
        .collect()
}

/// Builds the deck and shuffles it uniformly with the caller's RNG.
/// Games seed from OS entropy; tests pass a seeded generator.
pub fn shuffled<R>(size: DeckSize, rng: &mut R) -> Vec<Card>
where
    R: rand::Rng + ?Sized,
{
    let mut cards = deck(size);
    cards.shuffle(rng);
    cards
}
