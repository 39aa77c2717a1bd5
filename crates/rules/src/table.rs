use drk_cards::Card;
use drk_cards::Rank;
use std::collections::BTreeSet;

/// One attack slot and its optional covering card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TablePair {
    pub attack: Card,
    pub defense: Option<Card>,
}

impl TablePair {
    pub fn open(attack: Card) -> Self {
        Self {
            attack,
            defense: None,
        }
    }
    pub fn covered(&self) -> bool {
        self.defense.is_some()
    }
}

/// Ranks appearing anywhere on the table, attack or defense.
/// New attacks must match one of these.
pub fn rank_set(table: &[TablePair]) -> BTreeSet<Rank> {
    table
        .iter()
        .flat_map(|pair| std::iter::once(pair.attack.rank).chain(pair.defense.map(|c| c.rank)))
        .collect()
}

/// Ranks appearing as attack cards only. Transfers must match one of these.
pub fn attack_ranks(table: &[TablePair]) -> BTreeSet<Rank> {
    table.iter().map(|pair| pair.attack.rank).collect()
}

/// True when every pair on the table is covered.
pub fn fully_covered(table: &[TablePair]) -> bool {
    table.iter().all(TablePair::covered)
}

/// True when at least one pair awaits a defense.
pub fn any_open(table: &[TablePair]) -> bool {
    table.iter().any(|pair| !pair.covered())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(token: &str) -> Card {
        Card::try_from(token).unwrap()
    }

    #[test]
    fn rank_set_includes_defenses() {
        let table = vec![
            TablePair {
                attack: card("S6"),
                defense: Some(card("S10")),
            },
            TablePair::open(card("H6")),
        ];
        let ranks = rank_set(&table);
        assert!(ranks.contains(&card("S6").rank));
        assert!(ranks.contains(&card("S10").rank));
        assert_eq!(ranks.len(), 2);
        assert_eq!(attack_ranks(&table).len(), 1);
    }

    #[test]
    fn coverage_predicates() {
        let mut table = vec![TablePair::open(card("S6"))];
        assert!(any_open(&table));
        assert!(!fully_covered(&table));
        table[0].defense = Some(card("S7"));
        assert!(!any_open(&table));
        assert!(fully_covered(&table));
        assert!(fully_covered(&[]));
    }
}
