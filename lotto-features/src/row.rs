use chrono::NaiveDate;
use serde::Serialize;

use crate::hot_cold::Trend;
use crate::schema::COLUMNS;

/// Une ligne (tirage, numéro) de la table de features. Les champs suivent
/// l'ordre de `schema::COLUMNS`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub lottery: String,
    pub draw_date: NaiveDate,
    pub draw_id: String,
    pub draw_sequence: u32,
    pub number: u8,
    pub appeared: u8,
    pub frequency_last_10: u32,
    pub frequency_last_30: u32,
    pub frequency_last_50: u32,
    pub frequency_all_time: u32,
    pub appearance_rate: f64,
    pub days_since_last: i64,
    pub current_gap: i64,
    pub mean_gap: f64,
    pub std_gap: f64,
    pub min_gap: f64,
    pub max_gap: f64,
    pub day_of_week: u8,
    pub is_weekend: u8,
    pub month: u8,
    pub week_of_year: u8,
    pub temperature_score: f64,
    pub is_hot: u8,
    pub is_cold: u8,
    pub trend: Trend,
}

impl FeatureRow {
    /// Valeurs textuelles dans l'ordre du schéma.
    pub fn to_record(&self) -> Vec<String> {
        let record = vec![
            self.lottery.clone(),
            self.draw_date.format("%Y-%m-%d").to_string(),
            self.draw_id.clone(),
            self.draw_sequence.to_string(),
            self.number.to_string(),
            self.appeared.to_string(),
            self.frequency_last_10.to_string(),
            self.frequency_last_30.to_string(),
            self.frequency_last_50.to_string(),
            self.frequency_all_time.to_string(),
            self.appearance_rate.to_string(),
            self.days_since_last.to_string(),
            self.current_gap.to_string(),
            self.mean_gap.to_string(),
            self.std_gap.to_string(),
            self.min_gap.to_string(),
            self.max_gap.to_string(),
            self.day_of_week.to_string(),
            self.is_weekend.to_string(),
            self.month.to_string(),
            self.week_of_year.to_string(),
            self.temperature_score.to_string(),
            self.is_hot.to_string(),
            self.is_cold.to_string(),
            self.trend.to_string(),
        ];
        debug_assert_eq!(record.len(), COLUMNS.len());
        record
    }
}
