use std::collections::BTreeMap;

use anyhow::Context;
use cooperstown_data::StatField;

use crate::command::train::{self, ModelArg};

/// Career totals and rates of the player to score. Every statistic is
/// required; pass 0 for a player who never batted or pitched.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PredictArg {
    #[clap(flatten)]
    model: ModelArg,
    /// Wins above replacement
    #[arg(long)]
    war: Option<f64>,
    /// At bats
    #[arg(long)]
    batter_atbats: Option<f64>,
    /// Home runs
    #[arg(long)]
    batter_homeruns: Option<f64>,
    /// On-base plus slugging
    #[arg(long)]
    batter_ops: Option<f64>,
    /// Runs
    #[arg(long)]
    batter_runs: Option<f64>,
    /// Runs batted in
    #[arg(long)]
    batter_rbi: Option<f64>,
    /// Batting average
    #[arg(long)]
    batter_average: Option<f64>,
    /// Innings pitched
    #[arg(long)]
    pitcher_innings: Option<f64>,
    /// Wins as pitcher
    #[arg(long)]
    pitcher_wins: Option<f64>,
    /// Losses as pitcher
    #[arg(long)]
    pitcher_losses: Option<f64>,
    /// Earned run average
    #[arg(long)]
    pitcher_era: Option<f64>,
    /// Walks plus hits per inning pitched
    #[arg(long)]
    pitcher_whip: Option<f64>,
    /// Saves
    #[arg(long)]
    pitcher_saves: Option<f64>,
    /// Strikeouts as pitcher
    #[arg(long)]
    pitcher_strikeouts: Option<f64>,
    /// All-Star game appearances
    #[arg(long)]
    allstar_apps: Option<f64>,
}

impl PredictArg {
    fn stats(&self) -> BTreeMap<StatField, f64> {
        [
            (StatField::War, self.war),
            (StatField::BatterAtbats, self.batter_atbats),
            (StatField::BatterHomeruns, self.batter_homeruns),
            (StatField::BatterOps, self.batter_ops),
            (StatField::BatterRuns, self.batter_runs),
            (StatField::BatterRbi, self.batter_rbi),
            (StatField::BatterAverage, self.batter_average),
            (StatField::PitcherInnings, self.pitcher_innings),
            (StatField::PitcherWins, self.pitcher_wins),
            (StatField::PitcherLosses, self.pitcher_losses),
            (StatField::PitcherEra, self.pitcher_era),
            (StatField::PitcherWhip, self.pitcher_whip),
            (StatField::PitcherSaves, self.pitcher_saves),
            (StatField::PitcherStrikeouts, self.pitcher_strikeouts),
            (StatField::AllstarApps, self.allstar_apps),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
        .collect()
    }
}

pub(crate) fn run(arg: &PredictArg) -> anyhow::Result<()> {
    let pipeline = arg.model.open_pipeline()?;
    train::resolve_model(&pipeline)?;

    let prediction = pipeline
        .predict(&arg.stats())
        .context("Failed to score the player")?;
    println!(
        "Hall-of-Fame probability: {:.1}%",
        prediction.probability * 100.0
    );
    println!("Recommendation: {}", prediction.recommendation);
    println!();

    let report = pipeline
        .evaluation()
        .context("Failed to evaluate the classifier")?;
    train::print_evaluation(&report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;

    #[derive(Debug, clap::Parser)]
    struct Wrapper {
        #[clap(flatten)]
        arg: PredictArg,
    }

    #[test]
    fn test_only_given_stats_are_collected() {
        let wrapper =
            Wrapper::try_parse_from(["predict", "--war", "62.5", "--pitcher-innings", "0"]).unwrap();
        let stats = wrapper.arg.stats();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[&StatField::War], 62.5);
        assert_eq!(stats[&StatField::PitcherInnings], 0.0);
    }
}
