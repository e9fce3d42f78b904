//! Descriptive analysis of the player table
//!
//! This crate answers the "how does a player compare?" questions that do not
//! involve the classifier:
//!
//! - [`cohort`]: the "All", "Eligible" and "HOF" player populations
//! - [`aggregate`]: per-cohort means of every statistic, with pitching-only
//!   fields restricted to players who pitched, and the derived win/loss
//!   percentage
//! - [`hands`]: batting/throwing hand distribution
//! - [`directory`]: lookup by identifier and case-insensitive search
//!
//! # Example
//!
//! ```no_run
//! use cooperstown_analysis::{aggregate, cohort::Cohort, directory::PlayerDirectory};
//! use cooperstown_data::{StatField, csv_source};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let players = csv_source::load_players("data/player_data.csv")?;
//! let result = aggregate::aggregate(&players, &Cohort::ALL, &StatField::ALL);
//! if let Some(war) = result.mean(Cohort::Hof, StatField::War) {
//!     println!("Average HOF WAR: {war:.1}");
//! }
//!
//! let directory = PlayerDirectory::new(players);
//! for player in directory.search("ruth") {
//!     println!("{} ({})", player.player_name, player.player_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod cohort;
pub mod directory;
pub mod hands;
