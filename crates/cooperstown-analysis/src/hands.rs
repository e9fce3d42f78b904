use std::collections::BTreeMap;

use cooperstown_data::{Hand, PlayerRecord};
use serde::Serialize;

/// Tally of one hand attribute over a player table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HandCounts {
    pub left: usize,
    pub right: usize,
    pub both: usize,
    pub unknown: usize,
}

impl HandCounts {
    fn push(&mut self, hand: Option<Hand>) {
        match hand {
            Some(Hand::Left) => self.left += 1,
            Some(Hand::Right) => self.right += 1,
            Some(Hand::Both) => self.both += 1,
            None => self.unknown += 1,
        }
    }
}

/// Batting/throwing combination of a player who bats from one side only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HandCombination {
    BothLeft,
    BothRight,
    BatLeftThrowRight,
    BatRightThrowLeft,
}

impl HandCombination {
    pub const ALL: [Self; 4] = [
        Self::BothLeft,
        Self::BothRight,
        Self::BatLeftThrowRight,
        Self::BatRightThrowLeft,
    ];

    #[must_use]
    pub fn from_hands(batting: Hand, throwing: Hand) -> Option<Self> {
        match (batting, throwing) {
            (Hand::Left, Hand::Left) => Some(Self::BothLeft),
            (Hand::Right, Hand::Right) => Some(Self::BothRight),
            (Hand::Left, Hand::Right) => Some(Self::BatLeftThrowRight),
            (Hand::Right, Hand::Left) => Some(Self::BatRightThrowLeft),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BothLeft => "Both L",
            Self::BothRight => "Both R",
            Self::BatLeftThrowRight => "Bat L, Throw R",
            Self::BatRightThrowLeft => "Bat R, Throw L",
        }
    }
}

/// Primary hands for batting and throwing across a player table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HandDistribution {
    pub batting: HandCounts,
    pub throwing: HandCounts,
    /// Only players with a known, single-sided batting and throwing hand.
    pub combinations: BTreeMap<HandCombination, usize>,
}

impl HandDistribution {
    #[must_use]
    pub fn from_records(records: &[PlayerRecord]) -> Self {
        let mut distribution = Self::default();
        for record in records {
            distribution.batting.push(record.hand_batting);
            distribution.throwing.push(record.hand_throwing);
            if let (Some(batting), Some(throwing)) = (record.hand_batting, record.hand_throwing)
                && let Some(combination) = HandCombination::from_hands(batting, throwing)
            {
                *distribution.combinations.entry(combination).or_default() += 1;
            }
        }
        distribution
    }

    #[must_use]
    pub fn combination(&self, combination: HandCombination) -> usize {
        self.combinations.get(&combination).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(batting: Option<Hand>, throwing: Option<Hand>) -> PlayerRecord {
        PlayerRecord::new("p", "P").with_hands(batting, throwing)
    }

    #[test]
    fn test_distribution() {
        let records = vec![
            player(Some(Hand::Left), Some(Hand::Left)),
            player(Some(Hand::Right), Some(Hand::Right)),
            player(Some(Hand::Right), Some(Hand::Right)),
            player(Some(Hand::Left), Some(Hand::Right)),
            player(Some(Hand::Right), Some(Hand::Left)),
            player(Some(Hand::Both), Some(Hand::Right)),
            player(None, Some(Hand::Left)),
        ];
        let distribution = HandDistribution::from_records(&records);

        assert_eq!(
            distribution.batting,
            HandCounts {
                left: 2,
                right: 3,
                both: 1,
                unknown: 1
            }
        );
        assert_eq!(distribution.throwing.left, 3);
        assert_eq!(distribution.throwing.right, 4);

        assert_eq!(distribution.combination(HandCombination::BothLeft), 1);
        assert_eq!(distribution.combination(HandCombination::BothRight), 2);
        assert_eq!(distribution.combination(HandCombination::BatLeftThrowRight), 1);
        assert_eq!(distribution.combination(HandCombination::BatRightThrowLeft), 1);
        // switch hitter and unknown batting hand are left out
        assert_eq!(distribution.combinations.values().sum::<usize>(), 5);
    }

    #[test]
    fn test_empty() {
        let distribution = HandDistribution::from_records(&[]);
        assert_eq!(distribution, HandDistribution::default());
        for combination in HandCombination::ALL {
            assert_eq!(distribution.combination(combination), 0);
        }
    }
}
