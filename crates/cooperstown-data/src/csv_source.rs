//! CSV ingestion for the player and training tables.
//!
//! Both loaders resolve the column layout once, from the header row, into the
//! static schema types of this crate. Anything downstream works with
//! [`PlayerRecord`] and [`TrainingExample`] values only.

use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    feature::{FeatureSchema, SchemaMismatchError, TrainingExample},
    player::{self, Hand, PlayerRecord, StatLine},
    stat_field::StatField,
};

/// Column holding the player identifier in both tables.
pub const PLAYER_ID_COLUMN: &str = "player_id";
/// Column holding the induction label in both tables.
pub const LABEL_COLUMN: &str = "in_hall_of_fame";

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum DatasetError {
    #[display("failed to open {}", path.display())]
    #[from(skip)]
    Open { path: PathBuf, source: io::Error },
    #[display("failed to parse CSV")]
    Csv { source: csv::Error },
    #[display("table does not match the feature schema")]
    SchemaMismatch(SchemaMismatchError),
    #[display("line {line}: invalid value '{value}' in column '{column}'")]
    #[from(skip)]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },
}

/// Parses the boolean spellings found in exported tables.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "True" | "true" | "TRUE" | "1" | "1.0" | "Y" | "y" => Some(true),
        "False" | "false" | "FALSE" | "0" | "0.0" | "N" | "n" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct PlayerRow {
    player_id: String,
    #[serde(default)]
    player_name: String,
    #[serde(default)]
    birth_date: Option<String>,
    #[serde(default)]
    birth_place: Option<String>,
    #[serde(default)]
    debut_date: Option<String>,
    #[serde(default)]
    height: Option<String>,
    #[serde(default)]
    hand_batting: Option<String>,
    #[serde(default)]
    hand_throwing: Option<String>,
    in_hall_of_fame: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    war: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    batter_atbats: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    batter_hits: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    batter_runs: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    batter_homeruns: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    batter_rbi: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    batter_average: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    batter_obp: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    batter_slugging: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    batter_ops: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pitcher_innings: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pitcher_wins: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pitcher_losses: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pitcher_era: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pitcher_whip: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pitcher_saves: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pitcher_strikeouts: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    allstar_apps: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    num_seasons: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    num_games: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    weight: Option<f64>,
}

impl PlayerRow {
    fn into_record(self, line: u64) -> Result<PlayerRecord, DatasetError> {
        let in_hall_of_fame =
            parse_bool(&self.in_hall_of_fame).ok_or_else(|| DatasetError::InvalidValue {
                line,
                column: LABEL_COLUMN.to_owned(),
                value: self.in_hall_of_fame.clone(),
            })?;

        let mut stats = StatLine::default();
        for (field, value) in [
            (StatField::War, self.war),
            (StatField::BatterAtbats, self.batter_atbats),
            (StatField::BatterHits, self.batter_hits),
            (StatField::BatterRuns, self.batter_runs),
            (StatField::BatterHomeruns, self.batter_homeruns),
            (StatField::BatterRbi, self.batter_rbi),
            (StatField::BatterAverage, self.batter_average),
            (StatField::BatterObp, self.batter_obp),
            (StatField::BatterSlugging, self.batter_slugging),
            (StatField::BatterOps, self.batter_ops),
            (StatField::PitcherInnings, self.pitcher_innings),
            (StatField::PitcherWins, self.pitcher_wins),
            (StatField::PitcherLosses, self.pitcher_losses),
            (StatField::PitcherEra, self.pitcher_era),
            (StatField::PitcherWhip, self.pitcher_whip),
            (StatField::PitcherSaves, self.pitcher_saves),
            (StatField::PitcherStrikeouts, self.pitcher_strikeouts),
            (StatField::AllstarApps, self.allstar_apps),
            (StatField::NumSeasons, self.num_seasons),
            (StatField::NumGames, self.num_games),
            (StatField::Weight, self.weight),
        ] {
            // NaN cells parse as numbers but carry no information
            stats.set(field, value.filter(|v| v.is_finite()));
        }

        Ok(PlayerRecord {
            player_id: self.player_id,
            player_name: self.player_name,
            birth_date: self.birth_date,
            birth_place: self.birth_place,
            debut_date: self.debut_date,
            height: self.height,
            hand_batting: self.hand_batting.as_deref().and_then(Hand::from_code),
            hand_throwing: self.hand_throwing.as_deref().and_then(Hand::from_code),
            in_hall_of_fame,
            num_seasons: stats
                .get(StatField::NumSeasons)
                .map_or(0, player::seasons_from_value),
            stats,
        })
    }
}

/// Reads the player table from any reader.
pub fn read_players<R>(reader: R) -> Result<Vec<PlayerRecord>, DatasetError>
where
    R: io::Read,
{
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    for required in [PLAYER_ID_COLUMN, LABEL_COLUMN] {
        if !headers.iter().any(|h| h == required) {
            return Err(SchemaMismatchError {
                field: required.to_owned(),
            }
            .into());
        }
    }

    let mut players = vec![];
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let row = record.deserialize::<PlayerRow>(Some(&headers))?;
        players.push(row.into_record(line)?);
    }
    Ok(players)
}

/// Reads the player table from a CSV file.
pub fn load_players<P>(path: P) -> Result<Vec<PlayerRecord>, DatasetError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let players = read_players(open(path)?)?;
    tracing::debug!(path = %path.display(), players = players.len(), "loaded player table");
    Ok(players)
}

/// Reads the training table from any reader.
///
/// The header must contain [`PLAYER_ID_COLUMN`], [`LABEL_COLUMN`] and every
/// field of `schema`; other columns are ignored. Feature vectors are built in
/// schema order regardless of the column order in the file.
pub fn read_training_examples<R>(
    reader: R,
    schema: &FeatureSchema,
) -> Result<Vec<TrainingExample>, DatasetError>
where
    R: io::Read,
{
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| SchemaMismatchError {
                field: name.to_owned(),
            })
    };

    let id_index = column_index(PLAYER_ID_COLUMN)?;
    let label_index = column_index(LABEL_COLUMN)?;
    let feature_indices = schema
        .fields()
        .iter()
        .map(|field| column_index(field.id()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut examples = vec![];
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let cell = |index: usize| record.get(index).unwrap_or_default();

        let label_cell = cell(label_index);
        let label = parse_bool(label_cell).ok_or_else(|| DatasetError::InvalidValue {
            line,
            column: LABEL_COLUMN.to_owned(),
            value: label_cell.to_owned(),
        })?;

        let features = std::iter::zip(schema.fields(), &feature_indices)
            .map(|(field, &index)| {
                let value = cell(index);
                value
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| DatasetError::InvalidValue {
                        line,
                        column: field.id().to_owned(),
                        value: value.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        examples.push(TrainingExample::new(cell(id_index), features, label));
    }
    Ok(examples)
}

/// Reads the training table from a CSV file.
pub fn load_training_examples<P>(
    path: P,
    schema: &FeatureSchema,
) -> Result<Vec<TrainingExample>, DatasetError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let examples = read_training_examples(open(path)?, schema)?;
    tracing::debug!(path = %path.display(), examples = examples.len(), "loaded training table");
    Ok(examples)
}

fn open(path: &Path) -> Result<BufReader<File>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_owned(),
        source,
    })?;
    Ok(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYERS: &str = "\
player_id,player_name,birth_date,height,weight,hand_batting,hand_throwing,in_hall_of_fame,war,pitcher_innings,pitcher_wins,num_seasons
ruthba01,Babe Ruth,1895-02-06,6-2,215,L,L,True,182.6,1221.1,94,22
smithjo01,John Smith,,5-11,abc,R,R,False,1.5,0,0,3
";

    #[test]
    fn test_read_players() {
        let players = read_players(PLAYERS.as_bytes()).unwrap();
        assert_eq!(players.len(), 2);

        let ruth = &players[0];
        assert_eq!(ruth.player_id, "ruthba01");
        assert_eq!(ruth.player_name, "Babe Ruth");
        assert_eq!(ruth.birth_date.as_deref(), Some("1895-02-06"));
        assert_eq!(ruth.hand_batting, Some(Hand::Left));
        assert!(ruth.in_hall_of_fame);
        assert_eq!(ruth.num_seasons, 22);
        assert_eq!(ruth.stat(StatField::War), Some(182.6));
        assert_eq!(ruth.stat(StatField::Weight), Some(215.0));
        // column not present in the file
        assert_eq!(ruth.stat(StatField::BatterOps), None);

        let smith = &players[1];
        assert_eq!(smith.birth_date, None);
        assert!(!smith.in_hall_of_fame);
        // non-numeric cell is treated as absent
        assert_eq!(smith.stat(StatField::Weight), None);
        assert_eq!(smith.innings_pitched(), 0.0);
    }

    #[test]
    fn test_read_players_missing_label_column() {
        let err = read_players("player_id,player_name\na,A\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::SchemaMismatch(SchemaMismatchError { ref field }) if field == LABEL_COLUMN
        ));
    }

    #[test]
    fn test_read_players_invalid_label() {
        let err = read_players("player_id,in_hall_of_fame\na,maybe\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidValue { line: 2, .. }));
    }

    #[test]
    fn test_read_training_examples_uses_schema_order() {
        let csv = "\
player_id,war,in_hall_of_fame,batter_runs
a,50.5,1,900
b,2.0,0,30
";
        let schema = FeatureSchema::new(vec![StatField::BatterRuns, StatField::War]);
        let examples = read_training_examples(csv.as_bytes(), &schema).unwrap();
        assert_eq!(
            examples,
            vec![
                TrainingExample::new("a", vec![900.0, 50.5], true),
                TrainingExample::new("b", vec![30.0, 2.0], false),
            ]
        );
    }

    #[test]
    fn test_read_training_examples_missing_feature() {
        let csv = "player_id,war,in_hall_of_fame\na,1.0,False\n";
        let schema = FeatureSchema::new(vec![StatField::War, StatField::PitcherEra]);
        let err = read_training_examples(csv.as_bytes(), &schema).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::SchemaMismatch(SchemaMismatchError { ref field }) if field == "pitcher_era"
        ));
    }

    #[test]
    fn test_read_training_examples_rejects_blank_feature() {
        let csv = "player_id,war,in_hall_of_fame\na,,False\n";
        let schema = FeatureSchema::new(vec![StatField::War]);
        let err = read_training_examples(csv.as_bytes(), &schema).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidValue { ref column, .. } if column == "war"));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_players("/nonexistent/player_data.csv").unwrap_err();
        assert!(matches!(err, DatasetError::Open { .. }));
    }
}
