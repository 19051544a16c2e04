use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::Rng;

/// Number of cards in a Seka deck: 4 suits x {10, J, Q, K, A} plus the Joker.
pub const SEKA_DECK_SIZE: usize = 21;

/// The 21-card Seka deck.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// ```
    /// use seka_rs::deck::Deck;
    ///
    /// let deck = Deck::seka();
    /// assert_eq!(deck.len(), 21);
    /// ```
    pub fn seka() -> Self {
        let mut cards = Vec::with_capacity(SEKA_DECK_SIZE);
        for &s in &Suit::ALL {
            for &r in &Rank::SUITED {
                cards.push(Card::new(r, s));
            }
        }
        cards.push(Card::JOKER);
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Uniform Fisher-Yates shuffle with the provided RNG.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Draw one card from the top of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draw `n` cards from the top of the deck.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        (0..n).filter_map(|_| self.draw()).collect()
    }
}
