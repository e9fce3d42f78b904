use clap::{Parser, Subcommand};

use self::{
    averages::AveragesArg, hands::HandsArg, predict::PredictArg, search::SearchArg,
    show::ShowArg, train::TrainArg,
};

mod averages;
mod hands;
mod predict;
mod search;
mod show;
mod train;

const DEFAULT_PLAYERS_PATH: &str = "data/player_data.csv";
const DEFAULT_TRAINING_PATH: &str = "data/training_data.csv";
const DEFAULT_MODEL_PATH: &str = "models/hof_classifier.json";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Average statistics of all, eligible and Hall-of-Fame players
    Averages(#[clap(flatten)] AveragesArg),
    /// Batting and throwing hand distribution
    Hands(#[clap(flatten)] HandsArg),
    /// Search players by id or name
    Search(#[clap(flatten)] SearchArg),
    /// Show one player's career
    Show(#[clap(flatten)] ShowArg),
    /// Train the Hall-of-Fame classifier (or load it) and evaluate it
    Train(#[clap(flatten)] TrainArg),
    /// Estimate a player's Hall-of-Fame probability
    Predict(#[clap(flatten)] PredictArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Averages(arg) => averages::run(&arg)?,
        Mode::Hands(arg) => hands::run(&arg)?,
        Mode::Search(arg) => search::run(&arg)?,
        Mode::Show(arg) => show::run(&arg)?,
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Predict(arg) => predict::run(&arg)?,
    }
    Ok(())
}

/// Location of the player table, shared by the descriptive commands.
#[derive(Debug, Clone, clap::Args)]
struct PlayersArg {
    /// Player table (CSV)
    #[arg(long = "players", default_value = DEFAULT_PLAYERS_PATH)]
    path: std::path::PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let parse = |args: &[&str]| CommandArgs::try_parse_from(args).map(|args| args.mode);
        assert!(matches!(
            parse(&["cooperstown", "search", "ruth"]),
            Ok(Mode::Search(_))
        ));
        assert!(matches!(
            parse(&["cooperstown", "train", "--retrain"]),
            Ok(Mode::Train(_))
        ));
        assert!(matches!(
            parse(&["cooperstown", "predict", "--war", "60"]),
            Ok(Mode::Predict(_))
        ));
        assert!(parse(&["cooperstown", "averages", "--json", "--output", "a.json"]).is_err());
        assert!(parse(&["cooperstown", "show"]).is_err());
    }
}
