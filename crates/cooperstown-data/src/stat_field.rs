use serde::{Deserialize, Serialize};

/// A numeric career statistic carried by every player record.
///
/// The set is closed: the CSV schema is resolved against these variants once
/// at load time, so downstream code never inspects cell types at runtime.
/// Variant order is the canonical display order and the ordering used by
/// `BTreeMap<StatField, _>` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatField {
    War,
    BatterAtbats,
    BatterHits,
    BatterRuns,
    BatterHomeruns,
    BatterRbi,
    BatterAverage,
    BatterObp,
    BatterSlugging,
    BatterOps,
    PitcherInnings,
    PitcherWins,
    PitcherLosses,
    PitcherEra,
    PitcherWhip,
    PitcherSaves,
    PitcherStrikeouts,
    AllstarApps,
    NumSeasons,
    NumGames,
    Weight,
}

impl StatField {
    pub const LEN: usize = 21;

    pub const ALL: [Self; Self::LEN] = [
        Self::War,
        Self::BatterAtbats,
        Self::BatterHits,
        Self::BatterRuns,
        Self::BatterHomeruns,
        Self::BatterRbi,
        Self::BatterAverage,
        Self::BatterObp,
        Self::BatterSlugging,
        Self::BatterOps,
        Self::PitcherInnings,
        Self::PitcherWins,
        Self::PitcherLosses,
        Self::PitcherEra,
        Self::PitcherWhip,
        Self::PitcherSaves,
        Self::PitcherStrikeouts,
        Self::AllstarApps,
        Self::NumSeasons,
        Self::NumGames,
        Self::Weight,
    ];

    /// Fields that only make sense for players who actually pitched.
    ///
    /// Records with zero innings pitched do not contribute to these fields
    /// when averaging, otherwise position players would drag pitcher-only
    /// baselines (and flatter ERA/WHIP, where lower is better).
    pub const PITCHING: [Self; 7] = [
        Self::PitcherInnings,
        Self::PitcherWins,
        Self::PitcherLosses,
        Self::PitcherEra,
        Self::PitcherWhip,
        Self::PitcherSaves,
        Self::PitcherStrikeouts,
    ];

    /// Position of this field in [`StatField::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Column name used in the data files.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::War => "war",
            Self::BatterAtbats => "batter_atbats",
            Self::BatterHits => "batter_hits",
            Self::BatterRuns => "batter_runs",
            Self::BatterHomeruns => "batter_homeruns",
            Self::BatterRbi => "batter_rbi",
            Self::BatterAverage => "batter_average",
            Self::BatterObp => "batter_obp",
            Self::BatterSlugging => "batter_slugging",
            Self::BatterOps => "batter_ops",
            Self::PitcherInnings => "pitcher_innings",
            Self::PitcherWins => "pitcher_wins",
            Self::PitcherLosses => "pitcher_losses",
            Self::PitcherEra => "pitcher_era",
            Self::PitcherWhip => "pitcher_whip",
            Self::PitcherSaves => "pitcher_saves",
            Self::PitcherStrikeouts => "pitcher_strikeouts",
            Self::AllstarApps => "allstar_apps",
            Self::NumSeasons => "num_seasons",
            Self::NumGames => "num_games",
            Self::Weight => "weight",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::War => "Wins Above Replacement (WAR)",
            Self::BatterAtbats => "At bats (AB)",
            Self::BatterHits => "Hits (H)",
            Self::BatterRuns => "Runs (R)",
            Self::BatterHomeruns => "Home runs (HR)",
            Self::BatterRbi => "Runs Batted In (RBI)",
            Self::BatterAverage => "Batting Average (BA)",
            Self::BatterObp => "On-base Percentage (OBP)",
            Self::BatterSlugging => "Slugging Average (SLG)",
            Self::BatterOps => "On-base Plus Slugging (OPS)",
            Self::PitcherInnings => "Innings Pitched (IP)",
            Self::PitcherWins => "Wins as Pitcher (W)",
            Self::PitcherLosses => "Losses as Pitcher (L)",
            Self::PitcherEra => "Earned Run Average (ERA)",
            Self::PitcherWhip => "Walks + Hits per Inning Pitched (WHIP)",
            Self::PitcherSaves => "Saves (SV)",
            Self::PitcherStrikeouts => "Strikeouts (SO)",
            Self::AllstarApps => "All-Star Game Appearances",
            Self::NumSeasons => "Seasons played",
            Self::NumGames => "Games played",
            Self::Weight => "Weight",
        }
    }

    #[must_use]
    pub const fn abbrev(self) -> &'static str {
        match self {
            Self::War => "WAR",
            Self::BatterAtbats => "AB",
            Self::BatterHits => "H",
            Self::BatterRuns => "R",
            Self::BatterHomeruns => "HR",
            Self::BatterRbi => "RBI",
            Self::BatterAverage => "AVG",
            Self::BatterObp => "OBP",
            Self::BatterSlugging => "SLG",
            Self::BatterOps => "OPS",
            Self::PitcherInnings => "IP",
            Self::PitcherWins => "W",
            Self::PitcherLosses => "L",
            Self::PitcherEra => "ERA",
            Self::PitcherWhip => "WHIP",
            Self::PitcherSaves => "SV",
            Self::PitcherStrikeouts => "SO",
            Self::AllstarApps => "All-Star",
            Self::NumSeasons => "Seasons",
            Self::NumGames => "G",
            Self::Weight => "Wt",
        }
    }

    #[must_use]
    pub const fn is_pitching(self) -> bool {
        matches!(
            self,
            Self::PitcherInnings
                | Self::PitcherWins
                | Self::PitcherLosses
                | Self::PitcherEra
                | Self::PitcherWhip
                | Self::PitcherSaves
                | Self::PitcherStrikeouts
        )
    }

    /// Looks up a field by its column name.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.id() == id)
    }
}
