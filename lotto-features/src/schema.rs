//! Schéma versionné de la table de features.
//!
//! L'ordre des colonnes est un contrat avec le splitter et le modèle :
//! toute modification ici impose d'incrémenter `SCHEMA_VERSION`.

use serde::Serialize;

pub const SCHEMA_VERSION: u32 = 1;

/// Fenêtres glissantes (en tirages) des colonnes `frequency_last_*`.
pub const FREQUENCY_WINDOWS: [usize; 3] = [10, 30, 50];

/// Fenêtre servant au score de température.
pub const TEMPERATURE_WINDOW: usize = 30;

pub const LABEL_COLUMN: &str = "appeared";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Date,
    Integer,
    Float,
    Binary,
    Categorical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Identity,
    Label,
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub role: ColumnRole,
}

const fn col(name: &'static str, kind: ColumnKind, role: ColumnRole) -> Column {
    Column { name, kind, role }
}

use ColumnKind::*;
use ColumnRole::*;

pub const COLUMNS: &[Column] = &[
    col("lottery", Text, Identity),
    col("draw_date", Date, Identity),
    col("draw_id", Text, Identity),
    col("draw_sequence", Integer, Identity),
    col("number", Integer, Identity),
    col("appeared", Binary, Label),
    col("frequency_last_10", Integer, Feature),
    col("frequency_last_30", Integer, Feature),
    col("frequency_last_50", Integer, Feature),
    col("frequency_all_time", Integer, Feature),
    col("appearance_rate", Float, Feature),
    col("days_since_last", Integer, Feature),
    col("current_gap", Integer, Feature),
    col("mean_gap", Float, Feature),
    col("std_gap", Float, Feature),
    col("min_gap", Float, Feature),
    col("max_gap", Float, Feature),
    col("day_of_week", Integer, Feature),
    col("is_weekend", Binary, Feature),
    col("month", Integer, Feature),
    col("week_of_year", Integer, Feature),
    col("temperature_score", Float, Feature),
    col("is_hot", Binary, Feature),
    col("is_cold", Binary, Feature),
    col("trend", Categorical, Feature),
];

pub fn column_names() -> Vec<&'static str> {
    COLUMNS.iter().map(|c| c.name).collect()
}

/// Colonnes formant le vecteur d'entrée du modèle, dans l'ordre.
pub fn feature_names() -> Vec<&'static str> {
    COLUMNS
        .iter()
        .filter(|c| c.role == ColumnRole::Feature)
        .map(|c| c.name)
        .collect()
}

pub fn column_index(name: &str) -> Option<usize> {
    COLUMNS.iter().position(|c| c.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_column_names_unique() {
        let names = column_names();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert_eq!(names.len(), 25);
    }

    #[test]
    fn test_column_order_contract() {
        let names = column_names();
        assert_eq!(&names[..6], &["lottery", "draw_date", "draw_id", "draw_sequence", "number", "appeared"]);
        assert_eq!(names.last(), Some(&"trend"));
    }

    #[test]
    fn test_feature_names_exclude_identity_and_label() {
        let features = feature_names();
        assert_eq!(features.len(), 19);
        assert_eq!(features[0], "frequency_last_10");
        assert!(!features.contains(&LABEL_COLUMN));
        assert!(!features.contains(&"draw_id"));
    }

    #[test]
    fn test_label_column_index() {
        assert_eq!(column_index(LABEL_COLUMN), Some(5));
        assert_eq!(column_index("nope"), None);
    }

    #[test]
    fn test_windows_have_columns() {
        for w in FREQUENCY_WINDOWS {
            assert!(column_index(&format!("frequency_last_{w}")).is_some());
        }
        assert!(FREQUENCY_WINDOWS.contains(&TEMPERATURE_WINDOW));
    }
}
