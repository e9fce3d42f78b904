use cooperstown_data::PlayerRecord;
use serde::{Deserialize, Serialize};

/// Minimum number of seasons for Hall-of-Fame eligibility.
pub const ELIGIBLE_MIN_SEASONS: u32 = 10;

/// A named subset of players over which statistics are averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Cohort {
    /// Every player.
    All,
    /// Players with at least [`ELIGIBLE_MIN_SEASONS`] seasons.
    Eligible,
    /// Players inducted into the Hall of Fame.
    #[serde(rename = "HOF")]
    Hof,
}

impl Cohort {
    pub const ALL: [Self; 3] = [Self::All, Self::Eligible, Self::Hof];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Eligible => "Eligible",
            Self::Hof => "HOF",
        }
    }

    /// Returns `true` if `record` belongs to this cohort.
    #[must_use]
    pub fn contains(self, record: &PlayerRecord) -> bool {
        match self {
            Self::All => true,
            Self::Eligible => record.num_seasons >= ELIGIBLE_MIN_SEASONS,
            Self::Hof => record.in_hall_of_fame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let rookie = PlayerRecord::new("a", "A").with_seasons(9);
        let veteran = PlayerRecord::new("b", "B").with_seasons(10);
        let inductee = PlayerRecord::new("c", "C")
            .with_seasons(3)
            .with_hall_of_fame(true);

        assert!(Cohort::All.contains(&rookie));
        assert!(!Cohort::Eligible.contains(&rookie));
        assert!(Cohort::Eligible.contains(&veteran));
        assert!(!Cohort::Hof.contains(&veteran));
        assert!(Cohort::Hof.contains(&inductee));
        assert!(!Cohort::Eligible.contains(&inductee));
    }

    #[test]
    fn test_names() {
        let names = Cohort::ALL.map(Cohort::name);
        assert_eq!(names, ["All", "Eligible", "HOF"]);
        assert_eq!(serde_json::to_string(&Cohort::Hof).unwrap(), "\"HOF\"");
    }
}
