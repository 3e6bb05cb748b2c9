use chrono::{Datelike, NaiveDate};

/// Features calendaires, fonction pure de la date du tirage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalFeatures {
    /// Lundi = 0 ... dimanche = 6
    pub day_of_week: u8,
    pub is_weekend: bool,
    pub month: u8,
    /// Semaine ISO 8601 (1-53)
    pub week_of_year: u8,
}

impl TemporalFeatures {
    pub fn from_date(date: NaiveDate) -> Self {
        let day_of_week = date.weekday().num_days_from_monday() as u8;
        Self {
            day_of_week,
            is_weekend: day_of_week >= 5,
            month: date.month() as u8,
            week_of_year: date.iso_week().week() as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temporal(s: &str) -> TemporalFeatures {
        TemporalFeatures::from_date(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
    }

    #[test]
    fn test_weekday_numbering() {
        // 2024-01-01 est un lundi.
        assert_eq!(temporal("2024-01-01").day_of_week, 0);
        assert_eq!(temporal("2024-01-05").day_of_week, 4);
        assert_eq!(temporal("2024-01-07").day_of_week, 6);
    }

    #[test]
    fn test_weekend_flag() {
        assert!(!temporal("2024-01-05").is_weekend);
        assert!(temporal("2024-01-06").is_weekend);
        assert!(temporal("2024-01-07").is_weekend);
    }

    #[test]
    fn test_iso_week_at_year_boundary() {
        // 2021-01-03 appartient à la semaine 53 de 2020.
        assert_eq!(temporal("2021-01-03").week_of_year, 53);
        assert_eq!(temporal("2021-01-04").week_of_year, 1);
        // 2024-12-30 appartient à la semaine 1 de 2025.
        let t = temporal("2024-12-30");
        assert_eq!(t.week_of_year, 1);
        assert_eq!(t.month, 12);
    }
}
