use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::clean::parse_draw_date;
use crate::models::{number_domain, parse_numbers, validate_numbers, RawDraw};

/// Écart (en jours) au-delà duquel un trou dans le calendrier est signalé.
pub const LARGE_GAP_DAYS: i64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Pass,
    Warning,
    Fail,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationStatus::Pass => write!(f, "PASS"),
            ValidationStatus::Warning => write!(f, "WARN"),
            ValidationStatus::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DateRange {
    pub min: NaiveDate,
    pub max: NaiveDate,
    pub total_days: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DateGaps {
    pub max_gap_days: i64,
    pub mean_gap_days: f64,
    pub large_gaps: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub lottery: String,
    pub total_rows: usize,
    pub date_range: Option<DateRange>,
    pub critical_missing: usize,
    pub duplicate_complete: usize,
    pub duplicate_ids: usize,
    pub duplicate_dates: usize,
    pub expected_range: (u8, u8),
    pub invalid_number_rows: usize,
    pub date_gaps: DateGaps,
    pub status: ValidationStatus,
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map(|s| s.trim().is_empty()).unwrap_or(true)
}

/// Contrôle qualité des lignes brutes d'une loterie, avant nettoyage.
pub fn validate_rows(lottery: &str, rows: &[RawDraw]) -> ValidationReport {
    let expected_range = number_domain(lottery);

    let critical_missing = rows
        .iter()
        .map(|r| {
            [&r.draw_date, &r.draw_id, &r.numbers]
                .into_iter()
                .filter(|f| is_blank(f))
                .count()
        })
        .sum::<usize>();

    let mut ids = HashSet::new();
    let mut dates = HashSet::new();
    let mut complete = HashSet::new();
    let (mut duplicate_ids, mut duplicate_dates, mut duplicate_complete) = (0, 0, 0);
    for r in rows {
        if !ids.insert(r.draw_id.clone()) {
            duplicate_ids += 1;
        }
        if !dates.insert(r.draw_date.clone()) {
            duplicate_dates += 1;
        }
        if !complete.insert((r.draw_id.clone(), r.numbers.clone())) {
            duplicate_complete += 1;
        }
    }

    // Une ligne invalide n'est comptée qu'une fois, qu'elle soit illisible ou hors domaine.
    let invalid_number_rows = rows
        .iter()
        .filter(|r| {
            let Some(raw) = r.numbers.as_deref() else {
                return false;
            };
            parse_numbers(raw)
                .and_then(|n| validate_numbers(&n, expected_range))
                .is_err()
        })
        .count();

    let mut parsed_dates: Vec<NaiveDate> = rows
        .iter()
        .filter_map(|r| r.draw_date.as_deref())
        .filter_map(|d| parse_draw_date(d).ok())
        .collect();
    parsed_dates.sort_unstable();

    let date_range = match (parsed_dates.first(), parsed_dates.last()) {
        (Some(&min), Some(&max)) => Some(DateRange {
            min,
            max,
            total_days: (max - min).num_days(),
        }),
        _ => None,
    };

    let date_gaps = compute_date_gaps(&parsed_dates);

    let status = if critical_missing > 0 || invalid_number_rows > 0 {
        ValidationStatus::Fail
    } else if duplicate_complete > 0 {
        ValidationStatus::Warning
    } else {
        ValidationStatus::Pass
    };

    ValidationReport {
        lottery: lottery.to_string(),
        total_rows: rows.len(),
        date_range,
        critical_missing,
        duplicate_complete,
        duplicate_ids,
        duplicate_dates,
        expected_range,
        invalid_number_rows,
        date_gaps,
        status,
    }
}

fn compute_date_gaps(sorted_dates: &[NaiveDate]) -> DateGaps {
    if sorted_dates.len() < 2 {
        return DateGaps::default();
    }
    let diffs: Vec<i64> = sorted_dates
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .collect();
    DateGaps {
        max_gap_days: diffs.iter().copied().max().unwrap_or(0),
        mean_gap_days: diffs.iter().sum::<i64>() as f64 / diffs.len() as f64,
        large_gaps: diffs.iter().filter(|&&d| d > LARGE_GAP_DAYS).count(),
    }
}
