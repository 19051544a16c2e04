use super::rank_groups::RankGroups;
use super::suit_info::SuitInfo;
use crate::cards::{Card, Rank};
use crate::hand::Hand;

/// Pre-computed analysis of a three-card hand.
/// Built once and shared by all class detectors.
#[derive(Debug, Clone)]
pub struct HandAnalysis {
    /// The cards other than the Joker (two or three).
    pub suited: Vec<Card>,
    pub has_joker: bool,
    pub aces: u8,
    pub rank_groups: RankGroups,
    pub suit_info: SuitInfo,
}

impl HandAnalysis {
    pub fn new(hand: &Hand) -> Self {
        let suited: Vec<Card> = hand.suited().collect();
        let rank_groups = RankGroups::from_ranks(suited.iter().map(|c| c.rank()));
        let suit_info = SuitInfo::detect(&suited);
        Self {
            has_joker: hand.has_joker(),
            aces: rank_groups.count(Rank::Ace),
            suited,
            rank_groups,
            suit_info,
        }
    }

    /// The suited card that is not an Ace, when exactly one Ace is held.
    pub fn ace_and_other(&self) -> Option<(Card, Card)> {
        if self.aces != 1 || self.suited.len() != 2 {
            return None;
        }
        let ace = self.suited.iter().find(|c| c.rank() == Rank::Ace)?;
        let other = self.suited.iter().find(|c| c.rank() != Rank::Ace)?;
        Some((*ace, *other))
    }
}
