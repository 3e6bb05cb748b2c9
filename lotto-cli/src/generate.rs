use std::path::Path;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::error;
use rayon::prelude::*;

use lotto_db::db::fetch_draws;
use lotto_db::history::DrawHistory;
use lotto_db::rusqlite::Connection;
use lotto_features::config::FeatureConfig;
use lotto_features::pipeline::RunSummary;

use crate::export;

/// Bilan d'une génération multi-loteries : les échecs sont isolés par loterie.
#[derive(Debug, Default)]
pub struct FeatureRun {
    pub summaries: Vec<RunSummary>,
    pub failures: Vec<(String, String)>,
}

impl FeatureRun {
    fn fail(&mut self, lottery: &str, stage: &str, e: &anyhow::Error) {
        error!("{lottery} : {stage} : {e:#}");
        self.failures.push((lottery.to_string(), format!("{e:#}")));
    }
}

fn load_history(conn: &Connection, lottery: &str) -> Result<DrawHistory> {
    let draws = fetch_draws(conn, lottery)?;
    Ok(DrawHistory::new(lottery, draws)?)
}

/// Charge chaque historique puis génère `<loterie>_featured.csv` en parallèle.
pub fn generate_features(
    conn: &Connection,
    lotteries: &[String],
    out: &Path,
    config: &FeatureConfig,
) -> Result<FeatureRun> {
    let mut run = FeatureRun::default();

    // Lecture séquentielle : la connexion SQLite n'est pas partagée entre threads.
    let mut histories = Vec::with_capacity(lotteries.len());
    for lottery in lotteries {
        match load_history(conn, lottery) {
            Ok(history) => histories.push(history),
            Err(e) => run.fail(lottery, "historique rejeté", &e),
        }
    }

    let pb = ProgressBar::new(histories.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        )?
        .progress_chars("=> "),
    );

    let results: Vec<(&str, Result<RunSummary>)> = histories
        .par_iter()
        .map(|history| {
            let result = export::write_feature_file(out, history, config);
            pb.inc(1);
            (history.lottery(), result)
        })
        .collect();
    pb.finish_and_clear();

    for (lottery, result) in results {
        match result {
            Ok(summary) => run.summaries.push(summary),
            Err(e) => run.fail(lottery, "génération abandonnée", &e),
        }
    }
    Ok(run)
}
