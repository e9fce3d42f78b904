use serde::{Deserialize, Serialize};

use crate::stat_field::StatField;

/// Primary hand for batting or throwing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Hand {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
    /// Switch hitter (batting only).
    #[serde(rename = "B")]
    Both,
}

impl Hand {
    /// Parses the single-letter code used in the data files.
    ///
    /// Unknown or empty codes yield `None`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "L" | "l" => Some(Self::Left),
            "R" | "r" => Some(Self::Right),
            "B" | "b" | "S" | "s" => Some(Self::Both),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
            Self::Both => "B",
        }
    }
}

/// Numeric statistics of one player, indexed by [`StatField`].
///
/// A `None` entry means the source cell was empty or not a number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatLine {
    values: [Option<f64>; StatField::LEN],
}

impl StatLine {
    #[must_use]
    pub fn get(&self, field: StatField) -> Option<f64> {
        self.values[field.index()]
    }

    pub fn set(&mut self, field: StatField, value: Option<f64>) {
        self.values[field.index()] = value;
    }

    /// Iterates over the fields that carry a value.
    pub fn iter(&self) -> impl Iterator<Item = (StatField, f64)> + '_ {
        StatField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }
}

/// One player's identity, biography, career statistics and induction status.
///
/// Records are produced by the loaders in [`crate::csv_source`] and are not
/// modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    /// Baseball-Reference identifier, unique per player.
    pub player_id: String,
    pub player_name: String,
    pub birth_date: Option<String>,
    pub birth_place: Option<String>,
    pub debut_date: Option<String>,
    pub height: Option<String>,
    pub hand_batting: Option<Hand>,
    pub hand_throwing: Option<Hand>,
    pub in_hall_of_fame: bool,
    /// Seasons played; zero when the source did not say.
    pub num_seasons: u32,
    pub stats: StatLine,
}

impl PlayerRecord {
    /// Creates a record with no statistics, not inducted, zero seasons.
    #[must_use]
    pub fn new(player_id: impl Into<String>, player_name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            player_name: player_name.into(),
            birth_date: None,
            birth_place: None,
            debut_date: None,
            height: None,
            hand_batting: None,
            hand_throwing: None,
            in_hall_of_fame: false,
            num_seasons: 0,
            stats: StatLine::default(),
        }
    }

    #[must_use]
    pub fn with_stat(mut self, field: StatField, value: f64) -> Self {
        self.stats.set(field, Some(value));
        if field == StatField::NumSeasons {
            self.num_seasons = seasons_from_value(value);
        }
        self
    }

    /// Sets the season count, keeping the `num_seasons` statistic in sync.
    #[must_use]
    pub fn with_seasons(mut self, num_seasons: u32) -> Self {
        self.num_seasons = num_seasons;
        self.stats
            .set(StatField::NumSeasons, Some(f64::from(num_seasons)));
        self
    }

    #[must_use]
    pub fn with_hall_of_fame(mut self, in_hall_of_fame: bool) -> Self {
        self.in_hall_of_fame = in_hall_of_fame;
        self
    }

    #[must_use]
    pub fn with_hands(mut self, batting: Option<Hand>, throwing: Option<Hand>) -> Self {
        self.hand_batting = batting;
        self.hand_throwing = throwing;
        self
    }

    #[must_use]
    pub fn stat(&self, field: StatField) -> Option<f64> {
        self.stats.get(field)
    }

    /// Innings pitched, treating an absent value as zero.
    #[must_use]
    pub fn innings_pitched(&self) -> f64 {
        self.stat(StatField::PitcherInnings).unwrap_or(0.0)
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn seasons_from_value(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value as u32
    } else {
        0
    }
}
