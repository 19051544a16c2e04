use crate::cards::{Card, Suit};

/// Suit facts of the suited cards in a hand (the Joker is never included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuitInfo {
    /// Every suited card shares one suit.
    pub all_same_suit: bool,
    /// Highest single-suit point total (Ace 11, everything else 10).
    pub best_points: u8,
}

impl SuitInfo {
    pub fn detect(cards: &[Card]) -> Self {
        let mut totals = [0u8; Suit::ALL.len()];
        for card in cards {
            if let Some(slot) = Suit::ALL.iter().position(|s| *s == card.suit()) {
                totals[slot] += card.rank().points();
            }
        }
        let all_same_suit = match cards.first() {
            Some(first) => cards.iter().all(|c| c.suit() == first.suit()),
            None => false,
        };
        let best_points = totals.iter().copied().max().unwrap_or(0);
        SuitInfo { all_same_suit, best_points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Rank;

    #[test]
    fn same_suit_with_ace() {
        let cards = [
            Card::new(Rank::Ace, Suit::Spades),
            Card::new(Rank::King, Suit::Spades),
            Card::new(Rank::Ten, Suit::Spades),
        ];
        let info = SuitInfo::detect(&cards);
        assert!(info.all_same_suit);
        assert_eq!(info.best_points, 31);
    }

    #[test]
    fn best_suit_wins() {
        let cards = [
            Card::new(Rank::Ace, Suit::Hearts),
            Card::new(Rank::Queen, Suit::Hearts),
            Card::new(Rank::Jack, Suit::Clubs),
        ];
        let info = SuitInfo::detect(&cards);
        assert!(!info.all_same_suit);
        assert_eq!(info.best_points, 21);
    }
}
