//! Cohort aggregation engine
//!
//! Computes per-statistic means over the [`Cohort`] populations of a player
//! table, for comparing a candidate's numbers against "All", "Eligible" and
//! "HOF" baselines.
//!
//! # Algorithm
//!
//! 1. **Accumulate**: a single pass over the records. For each requested
//!    field, pitching fields are skipped for records with zero innings
//!    pitched, then absent values are skipped. Every remaining value is pushed
//!    into a `(sum, count)` accumulator of each cohort containing the record.
//! 2. **Reduce**: accumulators with a non-zero count become means. Empty
//!    accumulators produce no entry, so a cohort without qualifying players
//!    simply has fewer fields.
//! 3. **Derive**: the pitcher win/loss percentage is computed from the reduced
//!    wins and losses means of each cohort.
//!
//! # Example
//!
//! ```
//! use cooperstown_analysis::{aggregate, cohort::Cohort};
//! use cooperstown_data::{PlayerRecord, StatField};
//!
//! let records = vec![
//!     PlayerRecord::new("a", "A")
//!         .with_stat(StatField::PitcherInnings, 200.0)
//!         .with_stat(StatField::PitcherWins, 12.0)
//!         .with_stat(StatField::PitcherLosses, 8.0),
//!     PlayerRecord::new("b", "B")
//!         .with_stat(StatField::PitcherInnings, 0.0)
//!         .with_stat(StatField::PitcherWins, 0.0)
//!         .with_stat(StatField::PitcherLosses, 0.0),
//! ];
//!
//! let result = aggregate::aggregate(&records, &Cohort::ALL, &StatField::ALL);
//! // the non-pitcher does not dilute the pitching means
//! assert_eq!(result.mean(Cohort::All, StatField::PitcherWins), Some(12.0));
//! assert_eq!(result.win_loss_percentage(Cohort::All), Some(0.6));
//! ```

use std::collections::BTreeMap;

use cooperstown_data::{PlayerRecord, StatField};
use cooperstown_stats::{
    mean::MeanAccumulator,
    ratio::{self, UndefinedMetricError},
};
use serde::Serialize;

use crate::cohort::Cohort;

/// Means of one cohort.
///
/// Only fields with at least one contributing record are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CohortMeans {
    means: BTreeMap<StatField, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    win_loss_percentage: Option<f64>,
}

impl CohortMeans {
    #[must_use]
    pub fn get(&self, field: StatField) -> Option<f64> {
        self.means.get(&field).copied()
    }

    #[must_use]
    pub fn means(&self) -> &BTreeMap<StatField, f64> {
        &self.means
    }

    /// Pitcher wins / (wins + losses), derived from the aggregated means.
    #[must_use]
    pub fn win_loss_percentage(&self) -> Option<f64> {
        self.win_loss_percentage
    }
}

/// Per-cohort means of a player table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregateResult {
    cohorts: BTreeMap<Cohort, CohortMeans>,
}

impl AggregateResult {
    #[must_use]
    pub fn get(&self, cohort: Cohort) -> Option<&CohortMeans> {
        self.cohorts.get(&cohort)
    }

    #[must_use]
    pub fn mean(&self, cohort: Cohort, field: StatField) -> Option<f64> {
        self.get(cohort)?.get(field)
    }

    #[must_use]
    pub fn win_loss_percentage(&self, cohort: Cohort) -> Option<f64> {
        self.get(cohort)?.win_loss_percentage()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cohort, &CohortMeans)> + '_ {
        self.cohorts.iter().map(|(cohort, means)| (*cohort, means))
    }
}

/// Pitcher win/loss percentage: `wins / (wins + losses)`.
///
/// Fails with [`UndefinedMetricError`] when both are zero.
pub fn win_loss_percentage(wins: f64, losses: f64) -> Result<f64, UndefinedMetricError> {
    ratio::checked("win/loss percentage", wins, wins + losses)
}

/// Whether `field` of `record` takes part in aggregation at all.
///
/// The pitching exclusion is decided from innings pitched before the field's
/// own value is looked at; an absent innings value counts as zero.
fn is_excluded(record: &PlayerRecord, field: StatField) -> bool {
    field.is_pitching() && record.innings_pitched() == 0.0
}

/// Computes the mean of each of `fields` over each of `cohorts`.
///
/// Never fails: empty cohorts or fields with no qualifying record are left
/// out of the result. The records are only read.
#[must_use]
pub fn aggregate(
    records: &[PlayerRecord],
    cohorts: &[Cohort],
    fields: &[StatField],
) -> AggregateResult {
    let mut accumulators = vec![vec![MeanAccumulator::default(); fields.len()]; cohorts.len()];

    for record in records {
        let memberships = cohorts
            .iter()
            .map(|cohort| cohort.contains(record))
            .collect::<Vec<_>>();
        if !memberships.contains(&true) {
            continue;
        }

        for (field_index, &field) in fields.iter().enumerate() {
            if is_excluded(record, field) {
                continue;
            }
            let Some(value) = record.stat(field) else {
                continue;
            };
            for (cohort_accs, _) in std::iter::zip(&mut accumulators, &memberships)
                .filter(|(_, is_member)| **is_member)
            {
                cohort_accs[field_index].push(value);
            }
        }
    }

    let cohorts = std::iter::zip(cohorts, accumulators)
        .map(|(&cohort, accs)| {
            let means = std::iter::zip(fields, accs)
                .filter_map(|(&field, acc)| acc.mean().map(|mean| (field, mean)))
                .collect::<BTreeMap<_, _>>();
            let win_loss_percentage = derive_win_loss(cohort, &means);
            tracing::debug!(
                cohort = cohort.name(),
                fields = means.len(),
                "aggregated cohort means"
            );
            (
                cohort,
                CohortMeans {
                    means,
                    win_loss_percentage,
                },
            )
        })
        .collect();

    AggregateResult { cohorts }
}

fn derive_win_loss(cohort: Cohort, means: &BTreeMap<StatField, f64>) -> Option<f64> {
    let wins = *means.get(&StatField::PitcherWins)?;
    let losses = *means.get(&StatField::PitcherLosses)?;
    match win_loss_percentage(wins, losses) {
        Ok(pct) => Some(pct),
        Err(err) => {
            tracing::debug!(cohort = cohort.name(), "{err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitcher(id: &str, innings: f64, era: f64, seasons: u32, hof: bool) -> PlayerRecord {
        PlayerRecord::new(id, id)
            .with_stat(StatField::PitcherInnings, innings)
            .with_stat(StatField::PitcherEra, era)
            .with_seasons(seasons)
            .with_hall_of_fame(hof)
    }

    #[test]
    fn test_pitching_exclusion_per_cohort() {
        let records = vec![
            pitcher("p1", 2000.0, 3.0, 15, true),
            pitcher("p2", 500.0, 4.5, 12, false),
            pitcher("p3", 50.0, 6.0, 4, false),
            // position players: ERA of zero must not pull the means down
            pitcher("b1", 0.0, 0.0, 18, true),
            pitcher("b2", 0.0, 0.0, 2, false),
        ];

        let result = aggregate(&records, &Cohort::ALL, &[StatField::PitcherEra]);

        let all = result.mean(Cohort::All, StatField::PitcherEra).unwrap();
        assert!((all - (3.0 + 4.5 + 6.0) / 3.0).abs() < 1e-12);
        let eligible = result.mean(Cohort::Eligible, StatField::PitcherEra).unwrap();
        assert!((eligible - (3.0 + 4.5) / 2.0).abs() < 1e-12);
        let hof = result.mean(Cohort::Hof, StatField::PitcherEra).unwrap();
        assert!((hof - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_ordinary_fields_count_zero_values() {
        let records = vec![
            PlayerRecord::new("a", "A").with_stat(StatField::AllstarApps, 0.0),
            PlayerRecord::new("b", "B").with_stat(StatField::AllstarApps, 4.0),
        ];
        let result = aggregate(&records, &[Cohort::All], &[StatField::AllstarApps]);
        assert_eq!(result.mean(Cohort::All, StatField::AllstarApps), Some(2.0));
    }

    #[test]
    fn test_absent_values_are_skipped() {
        let records = vec![
            PlayerRecord::new("a", "A").with_stat(StatField::War, 10.0),
            PlayerRecord::new("b", "B"),
        ];
        let result = aggregate(&records, &[Cohort::All], &[StatField::War]);
        assert_eq!(result.mean(Cohort::All, StatField::War), Some(10.0));
    }

    #[test]
    fn test_empty_cohort_field_is_absent() {
        let records = vec![
            PlayerRecord::new("a", "A")
                .with_stat(StatField::War, 3.0)
                .with_stat(StatField::PitcherInnings, 0.0)
                .with_stat(StatField::PitcherWins, 0.0),
        ];
        let result = aggregate(
            &records,
            &Cohort::ALL,
            &[StatField::War, StatField::PitcherWins],
        );

        // nobody pitched: the field is missing rather than zero
        assert_eq!(result.mean(Cohort::All, StatField::War), Some(3.0));
        assert_eq!(result.mean(Cohort::All, StatField::PitcherWins), None);
        // nobody is inducted: the cohort exists but has no fields
        let hof = result.get(Cohort::Hof).unwrap();
        assert!(hof.means().is_empty());
        assert_eq!(hof.win_loss_percentage(), None);
    }

    #[test]
    fn test_win_loss_from_aggregated_means() {
        // per-player ratios would average to (0.9 + 0.5) / 2 = 0.7
        let records = vec![
            PlayerRecord::new("a", "A")
                .with_stat(StatField::PitcherInnings, 300.0)
                .with_stat(StatField::PitcherWins, 18.0)
                .with_stat(StatField::PitcherLosses, 2.0),
            PlayerRecord::new("b", "B")
                .with_stat(StatField::PitcherInnings, 100.0)
                .with_stat(StatField::PitcherWins, 2.0)
                .with_stat(StatField::PitcherLosses, 8.0),
        ];
        let result = aggregate(&records, &[Cohort::All], &StatField::ALL);
        assert_eq!(result.mean(Cohort::All, StatField::PitcherWins), Some(10.0));
        assert_eq!(result.mean(Cohort::All, StatField::PitcherLosses), Some(5.0));
        let pct = result.win_loss_percentage(Cohort::All).unwrap();
        assert!((pct - 0.6667).abs() < 1e-4);
    }

    #[test]
    fn test_win_loss_needs_both_inputs() {
        let records = vec![
            PlayerRecord::new("a", "A")
                .with_stat(StatField::PitcherInnings, 300.0)
                .with_stat(StatField::PitcherWins, 18.0),
        ];
        let result = aggregate(&records, &[Cohort::All], &StatField::ALL);
        assert_eq!(result.mean(Cohort::All, StatField::PitcherWins), Some(18.0));
        assert_eq!(result.win_loss_percentage(Cohort::All), None);

        // losses not requested at all
        let result = aggregate(&records, &[Cohort::All], &[StatField::PitcherWins]);
        assert_eq!(result.win_loss_percentage(Cohort::All), None);
    }

    #[test]
    fn test_win_loss_percentage_undefined() {
        assert_eq!(win_loss_percentage(10.0, 5.0).map(|p| (p * 1e4).round()), Ok(6667.0));
        let err = win_loss_percentage(0.0, 0.0).unwrap_err();
        assert_eq!(err.metric, "win/loss percentage");
    }

    #[test]
    fn test_zero_games_pitchers_omit_derived_stat() {
        let records = vec![
            PlayerRecord::new("a", "A")
                .with_stat(StatField::PitcherInnings, 1.0)
                .with_stat(StatField::PitcherWins, 0.0)
                .with_stat(StatField::PitcherLosses, 0.0),
        ];
        let result = aggregate(&records, &[Cohort::All], &StatField::ALL);
        assert_eq!(result.mean(Cohort::All, StatField::PitcherWins), Some(0.0));
        assert_eq!(result.win_loss_percentage(Cohort::All), None);
    }

    #[test]
    fn test_no_records() {
        let result = aggregate(&[], &Cohort::ALL, &StatField::ALL);
        for (_, means) in result.iter() {
            assert!(means.means().is_empty());
        }
        assert_eq!(result.iter().count(), 3);
    }

    #[test]
    fn test_serialized_shape() {
        let records = vec![PlayerRecord::new("a", "A").with_stat(StatField::War, 2.5)];
        let result = aggregate(&records, &[Cohort::All], &[StatField::War]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "All": { "means": { "war": 2.5 } } }));
    }
}
