//! Statistiques d'écarts (en jours) entre apparitions successives d'un numéro.
//!
//! Un accumulateur par numéro est avancé tirage par tirage : l'instantané est
//! lu avant d'enregistrer le tirage courant, puis mis à jour seulement si le
//! numéro est sorti. Coût linéaire au lieu d'un recalcul complet par ligne.

use chrono::NaiveDate;
use lotto_db::models::Draw;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GapStats {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Somme et somme des carrés sont entières (écarts en jours), la variance
/// de population est donc calculée sans perte avant la conversion en f64.
#[derive(Debug, Clone, Default)]
pub struct GapAccumulator {
    last_date: Option<NaiveDate>,
    count: i64,
    sum: i64,
    sum_sq: i128,
    min: i64,
    max: i64,
}

impl GapAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_appearance(&mut self, date: NaiveDate) {
        if let Some(last) = self.last_date {
            let gap = (date - last).num_days();
            if self.count == 0 {
                self.min = gap;
                self.max = gap;
            } else {
                self.min = self.min.min(gap);
                self.max = self.max.max(gap);
            }
            self.count += 1;
            self.sum += gap;
            self.sum_sq += (gap as i128) * (gap as i128);
        }
        self.last_date = Some(date);
    }

    pub fn gap_count(&self) -> usize {
        self.count as usize
    }

    /// Zéros tant qu'il y a moins de deux apparitions (aucun écart).
    pub fn snapshot(&self) -> GapStats {
        if self.count == 0 {
            return GapStats::default();
        }
        let n = self.count as f64;
        let mean = self.sum as f64 / n;
        let n_i = self.count as i128;
        let sum_i = self.sum as i128;
        let numerator = (n_i * self.sum_sq - sum_i * sum_i).max(0);
        let std = if self.count > 1 {
            (numerator as f64 / (n_i * n_i) as f64).sqrt()
        } else {
            0.0
        };
        GapStats {
            mean,
            std,
            min: self.min as f64,
            max: self.max as f64,
        }
    }
}

pub fn compute_gap_stats(draws: &[Draw], appeared: &[bool]) -> Vec<GapStats> {
    debug_assert_eq!(draws.len(), appeared.len());

    let mut acc = GapAccumulator::new();
    draws
        .iter()
        .zip(appeared)
        .map(|(draw, &hit)| {
            let stats = acc.snapshot();
            if hit {
                acc.record_appearance(draw.date);
            }
            stats
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::appearance_series;
    use crate::test_support::{history, make_test_history};

    /// Recalcul complet à chaque ligne, comme référence.
    fn naive_gap_stats(draws: &[Draw], appeared: &[bool]) -> Vec<GapStats> {
        (0..draws.len())
            .map(|i| {
                let past: Vec<NaiveDate> = (0..i).filter(|&j| appeared[j]).map(|j| draws[j].date).collect();
                if past.len() < 2 {
                    return GapStats::default();
                }
                let gaps: Vec<f64> = past.windows(2).map(|w| (w[1] - w[0]).num_days() as f64).collect();
                let n = gaps.len() as f64;
                let mean = gaps.iter().sum::<f64>() / n;
                let var = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / n;
                GapStats {
                    mean,
                    std: if gaps.len() > 1 { var.sqrt() } else { 0.0 },
                    min: gaps.iter().copied().fold(f64::INFINITY, f64::min),
                    max: gaps.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                }
            })
            .collect()
    }

    #[test]
    fn test_defaults_below_two_appearances() {
        let h = history(&[(0, &[1]), (2, &[1]), (5, &[2])]);
        let appeared = appearance_series(&h, 1);
        let stats = compute_gap_stats(h.draws(), &appeared);
        // Rangs 1 et 2 : au plus une apparition antérieure.
        assert_eq!(stats[0], GapStats::default());
        assert_eq!(stats[1], GapStats::default());
        // Rang 3 : deux apparitions antérieures, un seul écart.
        assert_eq!(stats[2], GapStats { mean: 2.0, std: 0.0, min: 2.0, max: 2.0 });
    }

    #[test]
    fn test_population_std() {
        // Écarts 2, 4, 6 -> moyenne 4, écart-type sqrt(8/3).
        let h = history(&[(0, &[1]), (2, &[1]), (4, &[1]), (6, &[1]), (1, &[2])]);
        let appeared = appearance_series(&h, 1);
        let stats = compute_gap_stats(h.draws(), &appeared);
        let last = stats[4];
        assert!((last.mean - 4.0).abs() < 1e-12);
        assert!((last.std - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(last.min, 2.0);
        assert_eq!(last.max, 6.0);
    }

    #[test]
    fn test_current_row_not_included() {
        let h = history(&[(0, &[1]), (2, &[1]), (3, &[1])]);
        let appeared = appearance_series(&h, 1);
        let stats = compute_gap_stats(h.draws(), &appeared);
        // Le tirage 3 contient le numéro mais son écart (3 jours) n'est pas encore visible.
        assert_eq!(stats[2].max, 2.0);
    }

    #[test]
    fn test_incremental_matches_naive() {
        let h = make_test_history(150);
        for number in 0..=20u8 {
            let appeared = appearance_series(&h, number);
            let fast = compute_gap_stats(h.draws(), &appeared);
            let slow = naive_gap_stats(h.draws(), &appeared);
            for (i, (a, b)) in fast.iter().zip(&slow).enumerate() {
                assert!((a.mean - b.mean).abs() < 1e-9, "n={number} i={i} mean");
                assert!((a.std - b.std).abs() < 1e-9, "n={number} i={i} std");
                assert_eq!(a.min, b.min, "n={number} i={i} min");
                assert_eq!(a.max, b.max, "n={number} i={i} max");
            }
        }
    }

    #[test]
    fn test_accumulator_gap_count() {
        let mut acc = GapAccumulator::new();
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        acc.record_appearance(d);
        assert_eq!(acc.gap_count(), 0);
        acc.record_appearance(d + chrono::Duration::days(3));
        acc.record_appearance(d + chrono::Duration::days(4));
        assert_eq!(acc.gap_count(), 2);
        let s = acc.snapshot();
        assert_eq!((s.min, s.max, s.mean), (1.0, 3.0, 2.0));
        assert!((s.std - 1.0).abs() < 1e-12);
    }
}
