use crate::cards::Rank;

/// Groups the suited ranks of a hand by frequency, sorted by (count desc, rank desc).
///
/// Example: K K Q groups as [(King, 2), (Queen, 1)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankGroups {
    groups: Vec<(Rank, u8)>,
}

impl RankGroups {
    pub fn from_ranks(ranks: impl IntoIterator<Item = Rank>) -> Self {
        let mut groups: Vec<(Rank, u8)> = Vec::with_capacity(3);
        for rank in ranks {
            match groups.iter_mut().find(|(r, _)| *r == rank) {
                Some((_, count)) => *count += 1,
                None => groups.push((rank, 1)),
            }
        }
        groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
        Self { groups }
    }

    /// The rank held exactly `n` times, if any.
    pub fn of_kind(&self, n: u8) -> Option<Rank> {
        self.groups.iter().find(|(_, count)| *count == n).map(|(rank, _)| *rank)
    }

    pub fn count(&self, rank: Rank) -> u8 {
        self.groups.iter().find(|(r, _)| *r == rank).map_or(0, |(_, count)| *count)
    }

    pub fn distinct(&self) -> usize {
        self.groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_and_kicker() {
        let g = RankGroups::from_ranks([Rank::Queen, Rank::King, Rank::King]);
        assert_eq!(g.of_kind(2), Some(Rank::King));
        assert_eq!(g.of_kind(1), Some(Rank::Queen));
        assert_eq!(g.of_kind(3), None);
        assert_eq!(g.distinct(), 2);
    }

    #[test]
    fn trips() {
        let g = RankGroups::from_ranks([Rank::Ten, Rank::Ten, Rank::Ten]);
        assert_eq!(g.of_kind(3), Some(Rank::Ten));
        assert_eq!(g.count(Rank::Ten), 3);
        assert_eq!(g.count(Rank::Ace), 0);
    }
}
