//! Fréquences glissantes et récence, par numéro.
//!
//! Toutes les valeurs attribuées au tirage d'index `i` ne voient que les
//! tirages `0..i` : la fenêtre est décalée d'une position, la première vaut 0.

use chrono::NaiveDate;
use lotto_db::models::Draw;

use crate::schema::FREQUENCY_WINDOWS;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrequencyFeatures {
    pub last_10: u32,
    pub last_30: u32,
    pub last_50: u32,
    pub all_time: u32,
    pub appearance_rate: f64,
    pub days_since_last: i64,
}

/// Nombre d'apparitions dans les `window` tirages précédant chaque index.
pub fn prior_window_counts(appeared: &[bool], window: usize) -> Vec<u32> {
    let mut counts = Vec::with_capacity(appeared.len());
    let mut running = 0u32;
    for i in 0..appeared.len() {
        counts.push(running);
        if appeared[i] {
            running += 1;
        }
        if i >= window && appeared[i - window] {
            running -= 1;
        }
    }
    counts
}

/// Cumul des apparitions antérieures à chaque index.
pub fn prior_cumulative_counts(appeared: &[bool]) -> Vec<u32> {
    appeared
        .iter()
        .scan(0u32, |total, &hit| {
            let before = *total;
            *total += hit as u32;
            Some(before)
        })
        .collect()
}

/// La séquence du tirage courant sert de dénominateur (0 traité comme 1).
pub fn appearance_rate(all_time: u32, sequence: u32) -> f64 {
    all_time as f64 / sequence.max(1) as f64
}

/// Jours écoulés depuis la dernière sortie strictement antérieure ; `sentinel` sinon.
pub fn days_since_last(dates: &[NaiveDate], appeared: &[bool], sentinel: i64) -> Vec<i64> {
    let mut last: Option<NaiveDate> = None;
    dates
        .iter()
        .zip(appeared)
        .map(|(&date, &hit)| {
            let days = last.map_or(sentinel, |l| (date - l).num_days());
            if hit {
                last = Some(date);
            }
            days
        })
        .collect()
}

pub fn compute_frequency(draws: &[Draw], appeared: &[bool], sentinel: i64) -> Vec<FrequencyFeatures> {
    debug_assert_eq!(draws.len(), appeared.len());

    let [w10, w30, w50] = FREQUENCY_WINDOWS.map(|w| prior_window_counts(appeared, w));
    let all_time = prior_cumulative_counts(appeared);
    let dates: Vec<NaiveDate> = draws.iter().map(|d| d.date).collect();
    let recency = days_since_last(&dates, appeared, sentinel);

    draws
        .iter()
        .enumerate()
        .map(|(i, draw)| FrequencyFeatures {
            last_10: w10[i],
            last_30: w30[i],
            last_50: w50[i],
            all_time: all_time[i],
            appearance_rate: appearance_rate(all_time[i], draw.sequence),
            days_since_last: recency[i],
        })
        .collect()
}
