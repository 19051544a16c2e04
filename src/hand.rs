use crate::cards::{parse_cards, Card};
use serde::Serialize;
use std::str::FromStr;

/// Cards dealt to each player.
pub const HAND_SIZE: usize = 3;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate cards in hand")]
    Duplicate,
    #[error("malformed card: {0}")]
    Malformed(Card),
    #[error("expected exactly three cards, got {0}")]
    Count(usize),
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// A player's three private cards.
///
/// ```
/// use seka_rs::cards::{Card, Rank, Suit};
/// use seka_rs::hand::Hand;
///
/// let hand = Hand::try_new([
///     Card::new(Rank::Ace, Suit::Spades),
///     Card::new(Rank::King, Suit::Spades),
///     Card::JOKER,
/// ]).unwrap();
/// assert!(hand.has_joker());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Hand([Card; HAND_SIZE]);

impl Hand {
    pub fn try_new(cards: [Card; HAND_SIZE]) -> Result<Self, HandError> {
        if let Some(bad) = cards.iter().find(|c| !c.is_well_formed()) {
            return Err(HandError::Malformed(*bad));
        }
        let [a, b, c] = cards;
        if a == b || a == c || b == c {
            return Err(HandError::Duplicate);
        }
        Ok(Self(cards))
    }

    pub fn from_slice(slice: &[Card]) -> Result<Self, HandError> {
        match slice {
            [a, b, c] => Self::try_new([*a, *b, *c]),
            _ => Err(HandError::Count(slice.len())),
        }
    }

    pub fn cards(&self) -> &[Card; HAND_SIZE] {
        &self.0
    }

    pub fn has_joker(&self) -> bool {
        self.0.iter().any(|c| c.is_joker())
    }

    /// The suited cards, i.e. everything except the Joker.
    pub fn suited(&self) -> impl Iterator<Item = Card> + '_ {
        self.0.iter().copied().filter(|c| !c.is_joker())
    }
}

impl FromStr for Hand {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Self::from_slice(&cards)
    }
}
