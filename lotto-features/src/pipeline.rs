//! Pipeline de features en deux phases.
//!
//! Phase 1 : chaque numéro de l'univers est traité indépendamment (en
//! parallèle) et produit ses features causales pour tous les tirages.
//! Phase 2 : tirage par tirage, les scores de température de tous les numéros
//! sont rassemblés pour le classement chaud/froid, puis les lignes sont émises.

use log::{debug, info, warn};
use rayon::prelude::*;

use lotto_db::history::DrawHistory;

use crate::config::FeatureConfig;
use crate::expand::{appearance_series, DrawExpander};
use crate::frequency::{compute_frequency, FrequencyFeatures};
use crate::gaps::{compute_gap_stats, GapStats};
use crate::hot_cold::{classify_draw, classify_trend, temperature_score};
use crate::row::FeatureRow;
use crate::temporal::TemporalFeatures;
use crate::universe::NumberUniverse;

/// Features d'un numéro pour chaque tirage (index = tirage).
#[derive(Debug, Clone, PartialEq)]
pub struct NumberTrack {
    pub number: u8,
    pub frequency: Vec<FrequencyFeatures>,
    pub gaps: Vec<GapStats>,
}

impl NumberTrack {
    pub fn compute(history: &DrawHistory, number: u8, config: &FeatureConfig) -> Self {
        let appeared = appearance_series(history, number);
        Self {
            number,
            frequency: compute_frequency(history.draws(), &appeared, config.missing_days_sentinel),
            gaps: compute_gap_stats(history.draws(), &appeared),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub lottery: String,
    pub draws: usize,
    pub universe_size: usize,
    pub rows: usize,
    pub positives: usize,
}

impl RunSummary {
    pub fn positive_ratio(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.positives as f64 / self.rows as f64
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    pub lottery: String,
    pub universe: NumberUniverse,
    pub rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Phase 1 : une piste par numéro de l'univers, dans l'ordre de l'univers.
pub fn build_number_tracks(
    history: &DrawHistory,
    universe: &NumberUniverse,
    config: &FeatureConfig,
) -> Vec<NumberTrack> {
    universe
        .numbers()
        .par_iter()
        .map(|&number| NumberTrack::compute(history, number, config))
        .collect()
}

/// Phase 2 : rang transversal par tirage puis émission. `sink` reçoit les
/// lignes d'un tirage à la fois, numéros croissants.
pub fn emit_rows<F, E>(
    history: &DrawHistory,
    universe: &NumberUniverse,
    tracks: &[NumberTrack],
    config: &FeatureConfig,
    mut sink: F,
) -> Result<RunSummary, E>
where
    F: FnMut(&[FeatureRow]) -> Result<(), E>,
{
    debug_assert_eq!(tracks.len(), universe.len());

    let mut summary = RunSummary {
        lottery: history.lottery().to_string(),
        draws: history.len(),
        universe_size: universe.len(),
        ..Default::default()
    };
    let mut buffer: Vec<FeatureRow> = Vec::with_capacity(universe.len());
    let mut scores: Vec<f64> = Vec::with_capacity(universe.len());
    let mut expander = DrawExpander::new(history, universe);

    for (i, draw) in history.draws().iter().enumerate() {
        let temporal = TemporalFeatures::from_date(draw.date);

        scores.clear();
        scores.extend(tracks.iter().map(|t| temperature_score(t.frequency[i].last_30)));
        let temperatures = classify_draw(&scores, config);

        buffer.clear();
        for (((row, track), &score), temp) in expander
            .by_ref()
            .take(universe.len())
            .zip(tracks)
            .zip(&scores)
            .zip(&temperatures)
        {
            debug_assert_eq!((row.draw_index, row.number), (i, track.number));
            let freq = &track.frequency[i];
            let gap = &track.gaps[i];
            buffer.push(FeatureRow {
                lottery: draw.lottery.clone(),
                draw_date: draw.date,
                draw_id: draw.draw_id.clone(),
                draw_sequence: draw.sequence,
                number: row.number,
                appeared: row.appeared as u8,
                frequency_last_10: freq.last_10,
                frequency_last_30: freq.last_30,
                frequency_last_50: freq.last_50,
                frequency_all_time: freq.all_time,
                appearance_rate: freq.appearance_rate,
                days_since_last: freq.days_since_last,
                current_gap: freq.days_since_last,
                mean_gap: gap.mean,
                std_gap: gap.std,
                min_gap: gap.min,
                max_gap: gap.max,
                day_of_week: temporal.day_of_week,
                is_weekend: temporal.is_weekend as u8,
                month: temporal.month,
                week_of_year: temporal.week_of_year,
                temperature_score: score,
                is_hot: temp.is_hot as u8,
                is_cold: temp.is_cold as u8,
                trend: classify_trend(freq.last_10, freq.last_30),
            });
        }

        summary.rows += buffer.len();
        summary.positives += buffer.iter().filter(|r| r.appeared == 1).count();
        sink(&buffer)?;
    }

    Ok(summary)
}

/// Exécute les deux phases et transmet les lignes à `sink`, tirage par tirage.
pub fn stream_features<F, E>(
    history: &DrawHistory,
    config: &FeatureConfig,
    sink: F,
) -> Result<RunSummary, E>
where
    F: FnMut(&[FeatureRow]) -> Result<(), E>,
{
    let universe = NumberUniverse::resolve(history);
    if universe.is_empty() {
        warn!("{} : univers vide, table de features vide", history.lottery());
    } else if let Some((min, max)) = universe.bounds() {
        info!(
            "{} : {} numéros distincts ({min}-{max}), {} tirages -> {} lignes",
            history.lottery(),
            universe.len(),
            history.len(),
            universe.len() * history.len()
        );
    }

    let tracks = build_number_tracks(history, &universe, config);
    debug!("{} : phase 1 terminée ({} pistes)", history.lottery(), tracks.len());

    emit_rows(history, &universe, &tracks, config, sink)
}

/// Variante matérialisée, pour les historiques de taille raisonnable et les tests.
pub fn engineer_features(history: &DrawHistory, config: &FeatureConfig) -> FeatureTable {
    let mut rows = Vec::new();
    let result: Result<RunSummary, std::convert::Infallible> =
        stream_features(history, config, |chunk| {
            rows.extend_from_slice(chunk);
            Ok(())
        });
    if let Err(never) = result {
        match never {}
    }

    FeatureTable {
        lottery: history.lottery().to_string(),
        universe: NumberUniverse::resolve(history),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hot_cold::Trend;
    use crate::test_support::{history, make_test_history};
    use lotto_db::models::Draw;

    fn find(table: &FeatureTable, seq: u32, number: u8) -> &FeatureRow {
        table
            .rows
            .iter()
            .find(|r| r.draw_sequence == seq && r.number == number)
            .unwrap()
    }

    #[test]
    fn test_three_draw_scenario() {
        // {1,2} le 2024-01-01, {2,3} le 2024-01-04, {1,3} le 2024-01-08.
        let h = history(&[(0, &[1, 2]), (3, &[2, 3]), (4, &[1, 3])]);
        let table = engineer_features(&h, &FeatureConfig::default());
        assert_eq!(table.rows.len(), 9);

        let row = find(&table, 3, 2);
        assert_eq!(row.appeared, 0);
        assert_eq!(row.frequency_last_10, 2);
        assert_eq!(row.frequency_all_time, 2);
        assert_eq!(row.days_since_last, 4);
        assert_eq!(row.current_gap, 4);
        assert_eq!(row.mean_gap, 3.0);
        assert_eq!(row.std_gap, 0.0);
        assert_eq!(row.min_gap, 3.0);
        assert_eq!(row.max_gap, 3.0);
        assert!((row.appearance_rate - 2.0 / 3.0).abs() < 1e-12);

        let first = find(&table, 1, 1);
        assert_eq!(first.frequency_last_10, 0);
        assert_eq!(first.days_since_last, 999);
        assert_eq!(first.appeared, 1);
    }

    #[test]
    fn test_row_count_and_order() {
        let h = make_test_history(30);
        let table = engineer_features(&h, &FeatureConfig::default());
        let u = &table.universe;
        assert_eq!(table.rows.len(), h.len() * u.len());

        for (i, chunk) in table.rows.chunks(u.len()).enumerate() {
            assert!(chunk.iter().all(|r| r.draw_sequence == (i + 1) as u32));
            let numbers: Vec<u8> = chunk.iter().map(|r| r.number).collect();
            assert_eq!(numbers, u.numbers());
        }
    }

    /// Remplace les numéros du tirage `index` par d'autres numéros de l'univers.
    /// Les cinq premiers tirages couvrent 0-20 : l'univers reste inchangé pour index >= 5.
    fn with_replaced_draw(h: &DrawHistory, index: usize) -> DrawHistory {
        let mut draws: Vec<Draw> = h.draws().to_vec();
        let target = &mut draws[index];
        let mut replacement: Vec<u8> = (0..=20u8)
            .filter(|n| !target.contains(*n))
            .take(target.numbers.len())
            .collect();
        replacement.sort_unstable();
        target.numbers = replacement;
        DrawHistory::new(h.lottery(), draws).unwrap()
    }

    /// Vérifie qu'aucune ligne antérieure au tirage `seq` ne change, et que
    /// seul le label diffère au tirage `seq`. Renvoie le nombre de lignes
    /// postérieures modifiées.
    fn assert_causal(baseline: &FeatureTable, changed: &FeatureTable, seq: u32) -> usize {
        assert_eq!(baseline.universe, changed.universe);
        assert_eq!(baseline.rows.len(), changed.rows.len());
        let mut later_diffs = 0;
        for (a, b) in baseline.rows.iter().zip(&changed.rows) {
            if a.draw_sequence > seq {
                later_diffs += (a != b) as usize;
                continue;
            }
            let mut a = a.clone();
            let mut b = b.clone();
            if a.draw_sequence == seq {
                a.appeared = 0;
                b.appeared = 0;
            }
            assert_eq!(a, b, "tirage {} numéro {}", a.draw_sequence, a.number);
        }
        later_diffs
    }

    #[test]
    fn test_no_leakage_when_last_draw_changes() {
        let h = make_test_history(60);
        let baseline = engineer_features(&h, &FeatureConfig::default());
        let changed = engineer_features(&with_replaced_draw(&h, 59), &FeatureConfig::default());
        assert_causal(&baseline, &changed, 60);
    }

    #[test]
    fn test_no_leakage_when_middle_draw_changes() {
        let h = make_test_history(120);
        let baseline = engineer_features(&h, &FeatureConfig::default());
        let changed = engineer_features(&with_replaced_draw(&h, 70), &FeatureConfig::default());
        let later_diffs = assert_causal(&baseline, &changed, 71);
        // La modification doit bien se propager aux tirages suivants.
        assert!(later_diffs > 0);
    }

    #[test]
    fn test_never_drawn_number_in_universe() {
        // Le 9 n'apparaît qu'au dernier tirage : toutes ses lignes antérieures restent à zéro.
        let h = history(&[(0, &[1, 2]), (2, &[2, 3]), (2, &[1, 3]), (2, &[9, 1])]);
        let table = engineer_features(&h, &FeatureConfig::default());
        for seq in 1..=4 {
            let row = find(&table, seq, 9);
            assert_eq!(row.frequency_all_time, 0);
            assert_eq!(row.days_since_last, 999);
            assert_eq!(row.mean_gap, 0.0);
            assert_eq!(row.trend, Trend::Stable);
        }
        assert_eq!(find(&table, 4, 9).appeared, 1);
    }

    #[test]
    fn test_invariants_on_longer_history() {
        let h = make_test_history(200);
        let table = engineer_features(&h, &FeatureConfig::default());
        for row in &table.rows {
            assert!(row.frequency_all_time <= row.draw_sequence);
            assert!((0.0..=1.0).contains(&row.appearance_rate));
            assert!(!(row.is_hot == 1 && row.is_cold == 1));
            assert_eq!(row.current_gap, row.days_since_last);
            assert!((0.0..=100.0).contains(&row.temperature_score));
            if row.frequency_all_time < 2 {
                assert_eq!((row.mean_gap, row.std_gap, row.min_gap, row.max_gap), (0.0, 0.0, 0.0, 0.0));
            }
            if row.frequency_all_time == 0 {
                assert_eq!(row.days_since_last, 999);
            }
        }
    }

    #[test]
    fn test_idempotent_output() {
        let h = make_test_history(50);
        let a = engineer_features(&h, &FeatureConfig::default());
        let b = engineer_features(&h, &FeatureConfig::default());
        let ra: Vec<Vec<String>> = a.rows.iter().map(|r| r.to_record()).collect();
        let rb: Vec<Vec<String>> = b.rows.iter().map(|r| r.to_record()).collect();
        assert_eq!(ra, rb);
    }

    #[test]
    fn test_empty_history() {
        let h = history(&[]);
        let table = engineer_features(&h, &FeatureConfig::default());
        assert!(table.is_empty());
        assert!(table.universe.is_empty());
    }

    #[test]
    fn test_stream_summary_and_sink_error() {
        let h = make_test_history(12);
        let summary = stream_features(&h, &FeatureConfig::default(), |_| Ok::<(), String>(())).unwrap();
        assert_eq!(summary.draws, 12);
        assert_eq!(summary.rows, 12 * summary.universe_size);
        assert_eq!(summary.positives, 12 * 5);
        assert!(summary.positive_ratio() > 0.0);

        let mut calls = 0;
        let err = stream_features(&h, &FeatureConfig::default(), |_| {
            calls += 1;
            if calls == 3 { Err("disque plein".to_string()) } else { Ok(()) }
        })
        .unwrap_err();
        assert_eq!(err, "disque plein");
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_tracks_are_independent_of_other_numbers() {
        let h = make_test_history(40);
        let u = NumberUniverse::resolve(&h);
        let tracks = build_number_tracks(&h, &u, &FeatureConfig::default());
        for (track, &number) in tracks.iter().zip(u.numbers()) {
            assert_eq!(*track, NumberTrack::compute(&h, number, &FeatureConfig::default()));
        }
    }
}
