use super::hand_analysis::HandAnalysis;
use crate::evaluator::{Combination, Priority};

/// Strategy pattern: each detector recognises one combination band and builds it.
pub trait ClassDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Combination>;
}

// ============================================================================
// Detector Implementations (in priority order: highest to lowest)
// ============================================================================

/// Seka: three of a kind, or a pair completed by the Joker
pub struct SekaDetector;

impl ClassDetector for SekaDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Combination> {
        let groups = &analysis.rank_groups;
        let rank = match groups.of_kind(3) {
            Some(rank) => rank,
            None if analysis.has_joker => groups.of_kind(2)?,
            None => return None,
        };
        Some(Combination::seka(rank, analysis.has_joker))
    }
}

/// 32: Joker + one Ace + a card of the Ace's suit
pub struct ThirtyTwoDetector;

impl ClassDetector for ThirtyTwoDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Combination> {
        if !analysis.has_joker {
            return None;
        }
        let (ace, other) = analysis.ace_and_other()?;
        (ace.suit() == other.suit()).then(|| Combination::scored(Priority::Thirty, 32))
    }
}

/// 31/30: every suited card shares a suit
pub struct SuitedDetector;

impl ClassDetector for SuitedDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Combination> {
        if !analysis.suit_info.all_same_suit {
            return None;
        }
        let points = if analysis.aces > 0 || analysis.has_joker { 31 } else { 30 };
        Some(Combination::scored(Priority::Thirty, points))
    }
}

/// 22: two Aces, or an Ace with the Joker
pub struct TwoAcesDetector;

impl ClassDetector for TwoAcesDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Combination> {
        let hit = analysis.aces == 2 || (analysis.aces == 1 && analysis.has_joker);
        hit.then(|| Combination::scored(Priority::Twenty, 22))
    }
}

/// 21: a 21-point suit, or the Joker with two different non-Ace ranks
pub struct TwentyOneDetector;

impl ClassDetector for TwentyOneDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Combination> {
        let joker_pair =
            analysis.has_joker && analysis.rank_groups.distinct() == 2 && analysis.aces == 0;
        (analysis.suit_info.best_points == 21 || joker_pair)
            .then(|| Combination::scored(Priority::Twenty, 21))
    }
}

/// 20: two non-Ace cards of one suit
pub struct TwentyDetector;

impl ClassDetector for TwentyDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Combination> {
        (analysis.suit_info.best_points == 20).then(|| Combination::scored(Priority::Twenty, 20))
    }
}

/// 11: a lone Ace
pub struct ElevenDetector;

impl ClassDetector for ElevenDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Combination> {
        (analysis.aces == 1).then(|| Combination::scored(Priority::Eleven, 11))
    }
}

/// 10: everything else (fallback)
pub struct TenDetector;

impl ClassDetector for TenDetector {
    fn detect(&self, _analysis: &HandAnalysis) -> Option<Combination> {
        Some(Combination::scored(Priority::Ten, 10))
    }
}

/// All detectors in priority order (highest to lowest).
pub const DETECTORS: [&dyn ClassDetector; 8] = [
    &SekaDetector,
    &ThirtyTwoDetector,
    &SuitedDetector,
    &TwoAcesDetector,
    &TwentyOneDetector,
    &TwentyDetector,
    &ElevenDetector,
    &TenDetector,
];
