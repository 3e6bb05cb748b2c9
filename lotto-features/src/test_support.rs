use chrono::{Duration, NaiveDate};
use lotto_db::history::DrawHistory;
use lotto_db::models::Draw;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const TEST_LOTTERY: &str = "dlb_test";

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Construit un historique à partir de (jours depuis le tirage précédent, numéros).
/// Le premier tirage tombe le 2024-01-01 (+ son décalage).
pub fn history(entries: &[(i64, &[u8])]) -> DrawHistory {
    let mut date = start_date();
    let draws = entries
        .iter()
        .enumerate()
        .map(|(i, (offset, numbers))| {
            date += Duration::days(*offset);
            Draw::new(TEST_LOTTERY, &format!("{:04}", i + 1), date, (i + 1) as u32, numbers).unwrap()
        })
        .collect();
    DrawHistory::new(TEST_LOTTERY, draws).unwrap()
}

/// Historique déterministe de `n` tirages de 5 numéros parmi 0..=20,
/// espacés de 2 à 4 jours. Les cinq premiers tirages couvrent tout l'univers.
pub fn make_test_history(n: usize) -> DrawHistory {
    const COVER: [[u8; 5]; 5] = [
        [0, 1, 2, 3, 4],
        [5, 6, 7, 8, 9],
        [10, 11, 12, 13, 14],
        [15, 16, 17, 18, 19],
        [20, 0, 5, 10, 15],
    ];

    let mut rng = StdRng::seed_from_u64(42);
    let entries: Vec<(i64, Vec<u8>)> = (0..n)
        .map(|i| {
            if let Some(cover) = COVER.get(i) {
                return (2, cover.to_vec());
            }
            let mut numbers = Vec::with_capacity(5);
            while numbers.len() < 5 {
                let candidate: u8 = rng.random_range(0..=20);
                if !numbers.contains(&candidate) {
                    numbers.push(candidate);
                }
            }
            (rng.random_range(2..=4), numbers)
        })
        .collect();
    let refs: Vec<(i64, &[u8])> = entries.iter().map(|(o, n)| (*o, n.as_slice())).collect();
    history(&refs)
}
