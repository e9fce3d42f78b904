use std::path::PathBuf;

use cooperstown_analysis::hands::{HandCombination, HandCounts, HandDistribution};

use crate::{
    command::PlayersArg,
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct HandsArg {
    #[clap(flatten)]
    players: PlayersArg,
    /// Write the distribution as JSON to this file instead of printing it
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &HandsArg) -> anyhow::Result<()> {
    let HandsArg { players, output } = arg;
    let records = util::read_players_file(&players.path)?;
    let distribution = HandDistribution::from_records(&records);

    if let Some(path) = output {
        util::save_json(&distribution, Some(path.as_path()))?;
        eprintln!("Hand distribution written to {}", path.display());
        return Ok(());
    }

    print_counts("Batting", &distribution.batting);
    print_counts("Throwing", &distribution.throwing);
    println!("Combinations:");
    for combination in HandCombination::ALL {
        println!(
            "  {:<16}{:>8}",
            combination.label(),
            distribution.combination(combination)
        );
    }
    Ok(())
}

fn print_counts(title: &str, counts: &HandCounts) {
    println!("{title}:");
    println!("  {:<16}{:>8}", "Left", counts.left);
    println!("  {:<16}{:>8}", "Right", counts.right);
    println!("  {:<16}{:>8}", "Both", counts.both);
    if counts.unknown > 0 {
        println!("  {:<16}{:>8}", "Unknown", counts.unknown);
    }
}
