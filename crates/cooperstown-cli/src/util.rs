use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use cooperstown_data::{FeatureSchema, PlayerRecord, StatField, TrainingExample, csv_source};

/// Where a JSON report goes.
#[derive(Debug)]
enum Destination {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Destination {
    fn open(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(io::stdout().lock()));
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    fn name(&self) -> String {
        match self {
            Self::Stdout(_) => "stdout".to_owned(),
            Self::File { path, .. } => path.display().to_string(),
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(writer) => writer,
            Self::File { writer, .. } => writer,
        }
    }
}

/// Writes `value` as pretty-printed JSON to `path`, or to stdout if no path
/// is given.
pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let mut destination = Destination::open(path)?;
    let name = destination.name();
    let writer = destination.writer();
    serde_json::to_writer_pretty(&mut *writer, value)
        .with_context(|| format!("Failed to write JSON to {name}"))?;
    writeln!(writer).with_context(|| format!("Failed to write to {name}"))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush output to {name}"))?;
    Ok(())
}

pub fn read_players_file(path: &Path) -> anyhow::Result<Vec<PlayerRecord>> {
    csv_source::load_players(path)
        .with_context(|| format!("Failed to load player table: {}", path.display()))
}

pub fn read_training_file(
    path: &Path,
    schema: &FeatureSchema,
) -> anyhow::Result<Vec<TrainingExample>> {
    csv_source::load_training_examples(path, schema)
        .with_context(|| format!("Failed to load training table: {}", path.display()))
}

/// Formats a statistic with the precision it is usually quoted at.
pub fn format_stat(field: StatField, value: f64) -> String {
    match field {
        StatField::BatterAverage
        | StatField::BatterObp
        | StatField::BatterSlugging
        | StatField::BatterOps
        | StatField::PitcherWhip => format!("{value:.3}"),
        StatField::PitcherEra | StatField::War | StatField::PitcherInnings => {
            format!("{value:.2}")
        }
        _ => format!("{value:.1}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(StatField::BatterAverage, 0.3421), "0.342");
        assert_eq!(format_stat(StatField::War, 62.456), "62.46");
        assert_eq!(format_stat(StatField::BatterHomeruns, 714.0), "714.0");
    }

    #[test]
    fn test_save_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        save_json(&[1, 2], Some(path.as_path())).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[\n  1,\n  2\n]\n");
    }

    #[test]
    fn test_save_json_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");
        let err = save_json(&[1], Some(path.as_path())).unwrap_err();
        assert!(err.to_string().starts_with("Failed to create output file"));
    }
}
