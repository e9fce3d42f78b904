use cooperstown_analysis::directory::PlayerDirectory;

use crate::{command::PlayersArg, util};

const MAX_RESULTS: usize = 50;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SearchArg {
    /// Part of a player id or name (case-insensitive)
    query: String,
    #[clap(flatten)]
    players: PlayersArg,
}

pub(crate) fn run(arg: &SearchArg) -> anyhow::Result<()> {
    let SearchArg { query, players } = arg;
    let directory = PlayerDirectory::new(util::read_players_file(&players.path)?);
    let matches = directory.search(query);

    if matches.is_empty() {
        println!("No players match '{query}'");
        return Ok(());
    }
    for player in matches.iter().take(MAX_RESULTS) {
        let hof = if player.in_hall_of_fame { "HOF" } else { "" };
        println!(
            "{:<12}{:<32}{:>3} seasons  {hof}",
            player.player_id, player.player_name, player.num_seasons
        );
    }
    if matches.len() > MAX_RESULTS {
        println!("... showing {MAX_RESULTS} of {} matches", matches.len());
    } else {
        println!("{} matches", matches.len());
    }
    Ok(())
}
