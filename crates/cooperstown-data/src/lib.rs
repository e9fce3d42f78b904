//! Player data model and table ingestion.
//!
//! Everything the rest of the workspace knows about a player goes through the
//! types in this crate:
//!
//! - [`StatField`]: the closed set of numeric career statistics, with the
//!   pitching-only subset used for aggregation exclusion
//! - [`PlayerRecord`]: identity, biography, handedness, induction status and a
//!   [`StatLine`] of optional statistic values
//! - [`FeatureSchema`] and [`TrainingExample`]: the ordered classifier input and
//!   labeled rows of the training table
//! - [`csv_source`]: loaders for `player_data.csv` and `training_data.csv`
//!
//! The schema is resolved once, when a table is loaded. A cell that is empty
//! or not a number becomes an absent value in the [`StatLine`]; it is never
//! re-examined later.

pub use self::{
    feature::{FeatureSchema, SchemaMismatchError, TrainingExample},
    player::{Hand, PlayerRecord, StatLine},
    stat_field::StatField,
};

pub mod csv_source;
pub mod feature;
pub mod player;
pub mod stat_field;
