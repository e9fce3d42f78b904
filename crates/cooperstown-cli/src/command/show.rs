use anyhow::Context;
use cooperstown_analysis::directory::PlayerDirectory;
use cooperstown_data::{Hand, PlayerRecord};

use crate::{command::PlayersArg, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ShowArg {
    /// Player id, e.g. `ruthba01`
    player_id: String,
    #[clap(flatten)]
    players: PlayersArg,
}

pub(crate) fn run(arg: &ShowArg) -> anyhow::Result<()> {
    let ShowArg { player_id, players } = arg;
    let directory = PlayerDirectory::new(util::read_players_file(&players.path)?);
    let player = directory
        .find_by_id(player_id.trim())
        .with_context(|| format!("No player with id '{player_id}'"))?;
    print_card(player);
    Ok(())
}

fn print_card(player: &PlayerRecord) {
    let unknown = "-";
    let hand = |hand: Option<Hand>| hand.map_or(unknown, Hand::code);

    println!("{} ({})", player.player_name, player.player_id);
    if player.in_hall_of_fame {
        println!("Hall of Fame inductee");
    }
    println!("  {:<28}{}", "Born", player.birth_date.as_deref().unwrap_or(unknown));
    println!("  {:<28}{}", "Birthplace", player.birth_place.as_deref().unwrap_or(unknown));
    println!("  {:<28}{}", "Debut", player.debut_date.as_deref().unwrap_or(unknown));
    println!("  {:<28}{}", "Height", player.height.as_deref().unwrap_or(unknown));
    println!(
        "  {:<28}{}/{}",
        "Bats/Throws",
        hand(player.hand_batting),
        hand(player.hand_throwing)
    );
    println!("  {:<28}{}", "Seasons", player.num_seasons);
    println!();
    for (field, value) in player.stats.iter() {
        println!("  {:<40}{:>12}", field.label(), util::format_stat(field, value));
    }
}
