pub(crate) mod detector;
pub(crate) mod hand_analysis;
pub(crate) mod rank_groups;
pub(crate) mod suit_info;

use crate::cards::Rank;
use crate::hand::Hand;
use core::cmp::Ordering;
use serde::Serialize;

/// Combination class from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[non_exhaustive]
#[repr(u8)]
pub enum Priority {
    /// Nothing better: 10 points.
    Ten = 1,
    /// A single Ace: 11 points.
    Eleven = 2,
    /// 22, 21 or 20 points.
    Twenty = 3,
    /// 32, 31 or 30 points.
    Thirty = 4,
    /// Three of a kind, possibly completed by the Joker.
    Seka = 5,
}

/// Ranked result of a three-card hand.
///
/// Ordering follows [`compare`]: class first, then `rank_value` inside
/// [`Priority::Seka`] and `points` everywhere else. Two combinations that
/// compare equal are a true tie even if their flags differ.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Combination {
    pub priority: Priority,
    /// Rank ordinal of the Seka (10..=15); 0 outside the Seka class.
    pub rank_value: u8,
    /// 10..=32 outside the Seka class; 0 for a Seka.
    pub points: u8,
    /// Three Aces without the Joker, the hand that collects the penalty bonus.
    pub pure_ace_seka: bool,
}

impl Combination {
    pub(crate) const fn seka(rank: Rank, has_joker: bool) -> Self {
        Self {
            priority: Priority::Seka,
            rank_value: rank.value(),
            points: 0,
            pure_ace_seka: matches!(rank, Rank::Ace) && !has_joker,
        }
    }

    pub(crate) const fn scored(priority: Priority, points: u8) -> Self {
        Self { priority, rank_value: 0, points, pure_ace_seka: false }
    }

    fn tiebreak(&self) -> u8 {
        match self.priority {
            Priority::Seka => self.rank_value,
            _ => self.points,
        }
    }

    /// Short human summary, e.g. "Seka A" or "31".
    pub fn summary(&self) -> String {
        match self.priority {
            Priority::Seka => {
                let rank = match self.rank_value {
                    10 => "10",
                    11 => "J",
                    12 => "Q",
                    13 => "K",
                    14 => "A",
                    _ => "Joker",
                };
                format!("Seka {rank}")
            }
            _ => self.points.to_string(),
        }
    }
}

impl Ord for Combination {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl PartialOrd for Combination {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Combination {
    fn eq(&self, other: &Self) -> bool {
        compare(self, other) == Ordering::Equal
    }
}

impl Eq for Combination {}

/// Classify a three-card hand. Pure and deterministic.
///
/// ```
/// use seka_rs::evaluator::{evaluate, Priority};
/// use seka_rs::hand::Hand;
///
/// let aces: Hand = "As Ah Ad".parse().unwrap();
/// let c = evaluate(&aces);
/// assert_eq!(c.priority, Priority::Seka);
/// assert!(c.pure_ace_seka);
///
/// let suited: Hand = "As Ks Qs".parse().unwrap();
/// assert_eq!(evaluate(&suited).points, 31);
/// ```
pub fn evaluate(hand: &Hand) -> Combination {
    use detector::DETECTORS;
    use hand_analysis::HandAnalysis;

    let analysis = HandAnalysis::new(hand);
    for detector in DETECTORS.iter() {
        if let Some(combination) = detector.detect(&analysis) {
            return combination;
        }
    }

    // Unreachable: the ten-point detector always matches as fallback
    Combination::scored(Priority::Ten, 10)
}

/// Order two combinations. `Equal` is a true tie left to the caller's policy.
///
/// ```
/// use seka_rs::evaluator::{compare, evaluate};
/// use seka_rs::hand::Hand;
/// use std::cmp::Ordering;
///
/// let aces = evaluate(&"As Ah Ad".parse::<Hand>().unwrap());
/// let kings = evaluate(&"Ks Kh Kd".parse::<Hand>().unwrap());
/// assert_eq!(compare(&aces, &kings), Ordering::Greater);
/// ```
pub fn compare(a: &Combination, b: &Combination) -> Ordering {
    a.priority.cmp(&b.priority).then_with(|| a.tiebreak().cmp(&b.tiebreak()))
}
