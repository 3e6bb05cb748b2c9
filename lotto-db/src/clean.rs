use std::collections::HashMap;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::error::DrawError;
use crate::models::{number_domain, parse_numbers, validate_numbers, Draw, RawDraw};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%Y.%m.%d"];

#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub draws: Vec<Draw>,
    pub total_rows: usize,
    pub rejected: usize,
    pub duplicates: usize,
}

/// Accepte les formats usuels des deux sites, ainsi qu'un horodatage dont
/// seule la partie date est retenue ("2024-01-05 00:00:00", "2024-01-05T20:30").
pub fn parse_draw_date(raw: &str) -> Result<NaiveDate, DrawError> {
    let head = raw
        .trim()
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or_default();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok())
        .ok_or_else(|| DrawError::InvalidDate(raw.to_string()))
}

fn parse_row(lottery: &str, raw: &RawDraw, domain: (u8, u8)) -> Result<Draw, DrawError> {
    let draw_id = raw
        .draw_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(DrawError::MissingField("draw_id"))?;
    let raw_date = raw
        .draw_date
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(DrawError::MissingField("draw_date"))
        .map_err(|e| e.in_draw(draw_id))?;
    let raw_numbers = raw
        .numbers
        .as_deref()
        .ok_or(DrawError::MissingField("numbers"))
        .map_err(|e| e.in_draw(draw_id))?;

    let date = parse_draw_date(raw_date).map_err(|e| e.in_draw(draw_id))?;
    let numbers = parse_numbers(raw_numbers).map_err(|e| e.in_draw(draw_id))?;
    validate_numbers(&numbers, domain).map_err(|e| e.in_draw(draw_id))?;

    // La séquence définitive est attribuée après le tri chronologique.
    Draw::new(lottery, draw_id, date, 0, &numbers)
}

/// Nettoie les lignes brutes d'une loterie : dates, numéros, doublons, tri
/// chronologique et numérotation 1..N. Chaque ligne rejetée est journalisée.
pub fn clean_draws(lottery: &str, rows: &[RawDraw]) -> CleanOutcome {
    let domain = number_domain(lottery);
    let mut rejected = 0;
    let mut duplicates = 0;
    let mut first_seen: HashMap<String, String> = HashMap::new();
    let mut draws = Vec::with_capacity(rows.len());

    for (idx, raw) in rows.iter().enumerate() {
        let draw = match parse_row(lottery, raw, domain) {
            Ok(d) => d,
            Err(e) => {
                warn!("{lottery} ligne {} rejetée : {e}", idx + 1);
                rejected += 1;
                continue;
            }
        };

        let numbers = draw.numbers_string();
        if let Some(existing) = first_seen.get(&draw.draw_id) {
            if *existing != numbers {
                warn!(
                    "{lottery} tirage {} en double avec des numéros différents ({existing} / {numbers}), première occurrence conservée",
                    draw.draw_id
                );
            }
            duplicates += 1;
            continue;
        }
        first_seen.insert(draw.draw_id.clone(), numbers);
        draws.push(draw);
    }

    // Tri stable : à date égale, l'ordre du fichier est conservé.
    draws.sort_by_key(|d| d.date);
    for (i, draw) in draws.iter_mut().enumerate() {
        draw.sequence = (i + 1) as u32;
    }

    debug!(
        "{lottery}: {} lignes, {} conservées, {rejected} rejetées, {duplicates} doublons",
        rows.len(),
        draws.len()
    );

    CleanOutcome {
        draws,
        total_rows: rows.len(),
        rejected,
        duplicates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, id: &str, numbers: &str) -> RawDraw {
        RawDraw {
            draw_date: Some(date.to_string()),
            draw_id: Some(id.to_string()),
            numbers: Some(numbers.to_string()),
        }
    }

    #[test]
    fn test_parse_draw_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 17).unwrap();
        assert_eq!(parse_draw_date("2024-02-17").unwrap(), expected);
        assert_eq!(parse_draw_date("2024/02/17").unwrap(), expected);
        assert_eq!(parse_draw_date("17/02/2024").unwrap(), expected);
        assert_eq!(parse_draw_date("17-02-2024").unwrap(), expected);
        assert_eq!(parse_draw_date("2024-02-17 00:00:00").unwrap(), expected);
        assert_eq!(parse_draw_date("2024-02-17T20:30:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_draw_date_invalid() {
        assert!(matches!(parse_draw_date("hier"), Err(DrawError::InvalidDate(_))));
        assert!(matches!(parse_draw_date(""), Err(DrawError::InvalidDate(_))));
        assert!(matches!(parse_draw_date("2024-02-30"), Err(DrawError::InvalidDate(_))));
    }

    #[test]
    fn test_clean_sorts_and_sequences() {
        let rows = vec![
            raw("2024-01-10", "3", "5;12"),
            raw("2024-01-01", "1", "1;2"),
            raw("2024-01-05", "2", "7;3"),
        ];
        let out = clean_draws("dlb_shanida", &rows);
        assert_eq!(out.total_rows, 3);
        assert_eq!(out.rejected, 0);
        let ids: Vec<&str> = out.draws.iter().map(|d| d.draw_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        let seqs: Vec<u32> = out.draws.iter().map(|d| d.sequence).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        assert_eq!(out.draws[1].numbers_string(), "03;07");
    }

    #[test]
    fn test_clean_rejects_malformed_rows() {
        let rows = vec![
            raw("2024-01-01", "1", "1;2"),
            raw("pas une date", "2", "1;2"),
            raw("2024-01-03", "3", "1;x"),
            raw("2024-01-04", "4", "1;1"),
            raw("2024-01-05", "", "1;2"),
            raw("2024-01-06", "6", "1;99"),
            RawDraw::default(),
        ];
        let out = clean_draws("dlb_shanida", &rows);
        assert_eq!(out.draws.len(), 1);
        assert_eq!(out.rejected, 6);
    }

    #[test]
    fn test_clean_deduplicates_by_id_keeping_first() {
        let rows = vec![
            raw("2024-01-01", "1", "1;2"),
            raw("2024-01-01", "1", "1;2"),
            raw("2024-01-02", "1", "3;4"),
            raw("2024-01-03", "2", "3;4"),
        ];
        let out = clean_draws("dlb_shanida", &rows);
        assert_eq!(out.duplicates, 2);
        assert_eq!(out.draws.len(), 2);
        assert_eq!(out.draws[0].numbers, vec![1, 2]);
    }

    #[test]
    fn test_clean_same_day_keeps_file_order() {
        let rows = vec![
            raw("2024-01-01", "b", "1;2"),
            raw("2024-01-01", "a", "3;4"),
        ];
        let out = clean_draws("dlb_shanida", &rows);
        assert_eq!(out.draws[0].draw_id, "b");
        assert_eq!(out.draws[1].draw_id, "a");
    }

    #[test]
    fn test_clean_empty() {
        let out = clean_draws("dlb_shanida", &[]);
        assert!(out.draws.is_empty());
        assert_eq!(out.total_rows, 0);
    }
}
