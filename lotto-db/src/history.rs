use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::DrawError;
use crate::models::Draw;

/// Historique validé d'une loterie : séquences strictement croissantes,
/// dates croissantes, identifiants uniques, cardinalité fixe.
/// draws[0] = le plus ancien.
#[derive(Debug, Clone)]
pub struct DrawHistory {
    lottery: String,
    draws: Vec<Draw>,
}

impl DrawHistory {
    pub fn new(lottery: &str, draws: Vec<Draw>) -> Result<Self, DrawError> {
        let mut seen_ids = HashSet::with_capacity(draws.len());
        let mut previous: Option<&Draw> = None;
        let expected = draws.first().map(|d| d.numbers.len());

        for draw in &draws {
            if !seen_ids.insert(draw.draw_id.as_str()) {
                return Err(DrawError::DuplicateDrawId(draw.draw_id.clone()));
            }

            let prev_seq = previous.map(|p| p.sequence).unwrap_or(0);
            if draw.sequence <= prev_seq {
                return Err(DrawError::NonMonotonicSequence {
                    draw_id: draw.draw_id.clone(),
                    previous: prev_seq,
                    current: draw.sequence,
                });
            }

            if let Some(prev) = previous {
                if draw.date < prev.date {
                    return Err(DrawError::DateOrder {
                        draw_id: draw.draw_id.clone(),
                        previous: prev.date,
                        current: draw.date,
                    });
                }
            }

            if let Some(expected) = expected {
                if draw.numbers.len() != expected || expected == 0 {
                    return Err(DrawError::InconsistentCardinality {
                        draw_id: draw.draw_id.clone(),
                        expected,
                        found: draw.numbers.len(),
                    });
                }
            }

            previous = Some(draw);
        }

        Ok(Self {
            lottery: lottery.to_string(),
            draws,
        })
    }

    pub fn lottery(&self) -> &str {
        &self.lottery
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn pick_count(&self) -> Option<usize> {
        self.draws.first().map(|d| d.numbers.len())
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.draws.first(), self.draws.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}
