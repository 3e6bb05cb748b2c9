mod display;
mod export;
mod generate;
mod import;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use crate::display::{
    display_clean_summary, display_draws, display_lottery_stats, display_run_summaries,
    display_schema, display_split_report, display_validation, CleanSummary,
};
use lotto_db::clean::clean_draws;
use lotto_db::db::{
    count_draws, db_path, fetch_draws, fetch_last_draws, list_lotteries, migrate, open_db,
    replace_lottery,
};
use lotto_db::history::DrawHistory;
use lotto_db::rusqlite::Connection;
use lotto_db::validate::validate_rows;
use lotto_features::config::PipelineConfig;
use lotto_features::universe::NumberUniverse;

#[derive(Parser)]
#[command(name = "lotto", about = "Préparation des données de loteries pour l'apprentissage")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Contrôler la qualité des CSV bruts
    Validate {
        /// Répertoire des CSV bruts (un fichier par loterie)
        #[arg(short, long, default_value = "data/raw")]
        dir: PathBuf,
    },

    /// Nettoyer les CSV bruts et les enregistrer en base
    Clean {
        #[arg(short, long, default_value = "data/raw")]
        dir: PathBuf,

        /// Répertoire des fichiers `<loterie>_cleaned.csv`
        #[arg(short, long, default_value = "data/processed")]
        out: PathBuf,
    },

    /// Générer les tables de features depuis la base
    Features {
        #[arg(short, long, default_value = "data/processed")]
        out: PathBuf,

        /// Limiter à une loterie (toutes par défaut)
        #[arg(short, long)]
        lottery: Option<String>,

        /// Fichier de configuration JSON
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Découper les tables de features en train/val/test
    Split {
        #[arg(short, long, default_value = "data/processed")]
        dir: PathBuf,

        #[arg(short, long, default_value = "data/splits")]
        out: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Lister les derniers tirages d'une loterie
    List {
        #[arg(short, long)]
        lottery: String,

        /// Nombre de tirages à afficher
        #[arg(short = 'n', long, default_value = "10")]
        last: u32,
    },

    /// Résumé des loteries en base
    Stats,

    /// Afficher le schéma de la table de features
    Schema,

    /// Afficher la configuration effective
    Config {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Afficher le chemin de la base de données
    DbPath,
}

/// Résumé d'une loterie pour `lotto stats`.
pub struct LotteryStats {
    pub lottery: String,
    pub draws: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub pick_count: Option<usize>,
    pub universe_size: usize,
    pub bounds: Option<(u8, u8)>,
}

impl LotteryStats {
    fn from_history(history: &DrawHistory) -> Self {
        let universe = NumberUniverse::resolve(history);
        Self {
            lottery: history.lottery().to_string(),
            draws: history.len(),
            date_range: history.date_range(),
            pick_count: history.pick_count(),
            universe_size: universe.len(),
            bounds: universe.bounds(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Validate { dir } => cmd_validate(&dir),
        Command::Clean { dir, out } => cmd_clean(&connect()?, &dir, &out),
        Command::Features {
            out,
            lottery,
            config,
        } => cmd_features(&connect()?, &out, lottery, config.as_deref()),
        Command::Split { dir, out, config } => cmd_split(&dir, &out, config.as_deref()),
        Command::List { lottery, last } => cmd_list(&connect()?, &lottery, last),
        Command::Stats => cmd_stats(&connect()?),
        Command::Schema => {
            display_schema();
            Ok(())
        }
        Command::Config { config } => {
            let config = PipelineConfig::load_or_default(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Command::DbPath => {
            println!("{}", db_path().display());
            Ok(())
        }
    }
}

fn connect() -> Result<Connection> {
    let conn = open_db(&db_path())?;
    migrate(&conn)?;
    Ok(conn)
}

fn cmd_validate(dir: &Path) -> Result<()> {
    let files = import::list_lottery_files(dir, "")?;
    if files.is_empty() {
        bail!("Aucun CSV trouvé dans {:?}", dir);
    }

    let mut reports = Vec::with_capacity(files.len());
    for (lottery, path) in &files {
        match import::read_raw_file(path) {
            Ok(raw) => reports.push(validate_rows(lottery, &raw.rows)),
            Err(e) => error!("{lottery} : {e:#}"),
        }
    }

    display_validation(&reports);
    Ok(())
}

fn clean_file(conn: &Connection, lottery: &str, path: &Path, out: &Path) -> Result<CleanSummary> {
    let raw = import::read_raw_file(path)?;
    let outcome = clean_draws(lottery, &raw.rows);
    let (total_rows, rejected, duplicates) =
        (outcome.total_rows, outcome.rejected, outcome.duplicates);
    let history = DrawHistory::new(lottery, outcome.draws)?;

    let out_path = out.join(format!("{lottery}_cleaned.csv"));
    let file =
        File::create(&out_path).with_context(|| format!("Impossible de créer {:?}", out_path))?;
    import::write_cleaned(BufWriter::new(file), history.draws())?;

    let stored = replace_lottery(conn, lottery, history.draws())?;
    info!("{lottery} : {stored} tirages enregistrés, {:?}", out_path);

    Ok(CleanSummary {
        lottery: lottery.to_string(),
        total_rows,
        unreadable: raw.unreadable,
        rejected,
        duplicates,
        kept: history.len(),
        stored,
    })
}

fn cmd_clean(conn: &Connection, dir: &Path, out: &Path) -> Result<()> {
    let files = import::list_lottery_files(dir, "")?;
    if files.is_empty() {
        bail!("Aucun CSV trouvé dans {:?}", dir);
    }
    std::fs::create_dir_all(out)?;

    let mut summaries = Vec::new();
    let mut failed = 0;
    for (lottery, path) in &files {
        match clean_file(conn, lottery, path, out) {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                error!("{lottery} : nettoyage abandonné : {e:#}");
                failed += 1;
            }
        }
    }

    display_clean_summary(&summaries);
    if failed > 0 {
        println!("{failed} loterie(s) en échec");
    }
    Ok(())
}

fn cmd_features(
    conn: &Connection,
    out: &Path,
    lottery: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = PipelineConfig::load_or_default(config_path)?;
    let lotteries = match lottery {
        Some(l) => vec![l],
        None => list_lotteries(conn)?,
    };
    if lotteries.is_empty() {
        println!("Base vide. Lancez d'abord : lotto clean");
        return Ok(());
    }
    std::fs::create_dir_all(out)?;

    let run = generate::generate_features(conn, &lotteries, out, &config.features)?;

    display_run_summaries(&run.summaries, &run.failures);
    if run.summaries.is_empty() {
        bail!("Aucune table de features générée");
    }
    Ok(())
}

fn cmd_split(dir: &Path, out: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = PipelineConfig::load_or_default(config_path)?;
    let files = import::list_lottery_files(dir, export::FEATURED_SUFFIX)?;
    if files.is_empty() {
        bail!("Aucun fichier *{}.csv dans {:?}", export::FEATURED_SUFFIX, dir);
    }
    std::fs::create_dir_all(out)?;

    let mut stats = BTreeMap::new();
    for (lottery, path) in &files {
        let result = export::read_feature_file(path)
            .and_then(|features| export::split_feature_file(out, lottery, &features, &config.split));
        match result {
            Ok(s) => {
                info!(
                    "{lottery} : train {} / val {} / test {}",
                    s.train_size, s.val_size, s.test_size
                );
                stats.insert(lottery.clone(), s);
            }
            Err(e) => error!("{lottery} : découpage abandonné : {e:#}"),
        }
    }

    if stats.is_empty() {
        bail!("Aucune table découpée");
    }
    let (path, report) = export::write_split_report(out, &config.split, stats)?;
    info!("Statistiques enregistrées dans {:?}", path);
    display_split_report(&report);
    Ok(())
}

fn cmd_list(conn: &Connection, lottery: &str, last: u32) -> Result<()> {
    if count_draws(conn, Some(lottery))? == 0 {
        println!("Aucun tirage pour {lottery}. Lancez d'abord : lotto clean");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, lottery, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection) -> Result<()> {
    let mut stats = Vec::new();
    for lottery in list_lotteries(conn)? {
        let draws = fetch_draws(conn, &lottery)?;
        match DrawHistory::new(&lottery, draws) {
            Ok(history) => stats.push(LotteryStats::from_history(&history)),
            Err(e) => warn!("{lottery} : historique incohérent : {e}"),
        }
    }
    display_lottery_stats(&stats);
    Ok(())
}
