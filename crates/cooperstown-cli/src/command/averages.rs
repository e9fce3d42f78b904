use std::path::PathBuf;

use cooperstown_analysis::{
    aggregate::{self, AggregateResult},
    cohort::Cohort,
};
use cooperstown_data::StatField;

use crate::{
    command::PlayersArg,
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AveragesArg {
    #[clap(flatten)]
    players: PlayersArg,
    /// Write the averages as JSON to this file instead of printing a table
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print JSON to stdout instead of a table
    #[arg(long, conflicts_with = "output")]
    json: bool,
}

const LABEL_WIDTH: usize = 40;
const VALUE_WIDTH: usize = 10;

pub(crate) fn run(arg: &AveragesArg) -> anyhow::Result<()> {
    let AveragesArg {
        players,
        output,
        json,
    } = arg;
    let records = util::read_players_file(&players.path)?;
    let result = aggregate::aggregate(&records, &Cohort::ALL, &StatField::ALL);

    if output.is_some() || *json {
        util::save_json(&result, output.as_deref())?;
        if let Some(path) = output {
            eprintln!("Averages written to {}", path.display());
        }
    } else {
        print_table(&result);
    }
    Ok(())
}

fn print_table(result: &AggregateResult) {
    print!("{:<LABEL_WIDTH$}", "Statistic");
    for cohort in Cohort::ALL {
        print!("{:>VALUE_WIDTH$}", cohort.name());
    }
    println!();

    for field in StatField::ALL {
        print!("{:<LABEL_WIDTH$}", field.label());
        for cohort in Cohort::ALL {
            let cell = result
                .mean(cohort, field)
                .map_or_else(|| "-".to_owned(), |mean| util::format_stat(field, mean));
            print!("{cell:>VALUE_WIDTH$}");
        }
        println!();
    }

    print!("{:<LABEL_WIDTH$}", "Win/Loss Percentage (W-L%)");
    for cohort in Cohort::ALL {
        let cell = result
            .win_loss_percentage(cohort)
            .map_or_else(|| "-".to_owned(), |pct| format!("{pct:.3}"));
        print!("{cell:>VALUE_WIDTH$}");
    }
    println!();
}
