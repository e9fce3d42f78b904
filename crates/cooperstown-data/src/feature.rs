use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::stat_field::StatField;

/// An expected field was missing from a table, an input, or a model.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("schema mismatch: missing or unknown field '{field}'")]
pub struct SchemaMismatchError {
    pub field: String,
}

/// Ordered list of statistics forming the classifier input.
///
/// The order is significant: the scaler and the network are fitted against
/// positions, so every vector fed to them must be built with the same schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    fields: Vec<StatField>,
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::calculator()
    }
}

impl FeatureSchema {
    #[must_use]
    pub fn new(fields: Vec<StatField>) -> Self {
        Self { fields }
    }

    /// The fifteen career statistics the calculator asks for.
    #[must_use]
    pub fn calculator() -> Self {
        Self::new(vec![
            StatField::BatterAtbats,
            StatField::BatterHomeruns,
            StatField::BatterOps,
            StatField::BatterRuns,
            StatField::BatterRbi,
            StatField::BatterAverage,
            StatField::PitcherInnings,
            StatField::PitcherWins,
            StatField::PitcherLosses,
            StatField::PitcherEra,
            StatField::PitcherWhip,
            StatField::PitcherSaves,
            StatField::PitcherStrikeouts,
            StatField::War,
            StatField::AllstarApps,
        ])
    }

    /// Rebuilds a schema from column names, e.g. those stored in a model file.
    pub fn from_ids<I, S>(ids: I) -> Result<Self, SchemaMismatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = ids
            .into_iter()
            .map(|id| {
                let id = id.as_ref();
                StatField::from_id(id).ok_or_else(|| SchemaMismatchError {
                    field: id.to_owned(),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { fields })
    }

    #[must_use]
    pub fn fields(&self) -> &[StatField] {
        &self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.id().to_owned()).collect()
    }

    /// Builds a feature vector in schema order from named values.
    ///
    /// Fails on the first schema field that has no value; extra entries in
    /// `values` are ignored.
    pub fn vectorize(
        &self,
        values: &BTreeMap<StatField, f64>,
    ) -> Result<Vec<f64>, SchemaMismatchError> {
        self.fields
            .iter()
            .map(|field| {
                values.get(field).copied().ok_or_else(|| SchemaMismatchError {
                    field: field.id().to_owned(),
                })
            })
            .collect()
    }
}

/// One labeled row of the training table.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub player_id: String,
    /// Feature values in [`FeatureSchema`] order; the label is not included.
    pub features: Vec<f64>,
    pub label: bool,
}

impl TrainingExample {
    #[must_use]
    pub fn new(player_id: impl Into<String>, features: Vec<f64>, label: bool) -> Self {
        Self {
            player_id: player_id.into(),
            features,
            label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculator_schema() {
        let schema = FeatureSchema::calculator();
        assert_eq!(schema.len(), 15);
        assert_eq!(schema.fields()[0], StatField::BatterAtbats);
        assert_eq!(schema.fields()[14], StatField::AllstarApps);
        assert_eq!(FeatureSchema::default(), schema);
    }

    #[test]
    fn test_from_ids_roundtrip() {
        let schema = FeatureSchema::calculator();
        let rebuilt = FeatureSchema::from_ids(schema.ids()).unwrap();
        assert_eq!(rebuilt, schema);
    }

    #[test]
    fn test_from_ids_unknown_field() {
        let err = FeatureSchema::from_ids(["war", "batter_triples"]).unwrap_err();
        assert_eq!(err.field, "batter_triples");
    }

    #[test]
    fn test_vectorize_in_schema_order() {
        let schema = FeatureSchema::new(vec![StatField::War, StatField::BatterRuns]);
        let values = BTreeMap::from([
            (StatField::BatterRuns, 1000.0),
            (StatField::War, 60.5),
            (StatField::Weight, 190.0),
        ]);
        assert_eq!(schema.vectorize(&values), Ok(vec![60.5, 1000.0]));
    }

    #[test]
    fn test_vectorize_missing_field() {
        let schema = FeatureSchema::new(vec![StatField::War, StatField::BatterRuns]);
        let values = BTreeMap::from([(StatField::War, 60.5)]);
        let err = schema.vectorize(&values).unwrap_err();
        assert_eq!(err.field, "batter_runs");
    }
}
