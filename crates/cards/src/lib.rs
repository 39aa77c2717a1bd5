//! Card primitives for the durachok backend.
//!
//! Suits, ranks, and the 24/36-card decks the game is played with. Cards
//! have no identity beyond their wire token; the token (suit letter followed
//! by rank, e.g. `S6`, `H10`, `DK`) is the only representation that crosses
//! a process boundary.
//!
//! ## Types
//!
//! - [`Suit`] — the four French suits
//! - [`Rank`] — 6..14, with 11=J, 12=Q, 13=K, 14=A
//! - [`Card`] — a (suit, rank) pair with string isomorphism
//! - [`DeckSize`] — 24 or 36 cards
mod card;
mod deck;
mod rank;
mod suit;

pub use card::*;
pub use deck::*;
pub use rank::*;
pub use suit::*;
