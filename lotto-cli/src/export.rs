use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{info, warn};

use lotto_db::history::DrawHistory;
use lotto_features::config::{FeatureConfig, SplitConfig};
use lotto_features::pipeline::{stream_features, RunSummary};
use lotto_features::schema::{self, LABEL_COLUMN};
use lotto_features::split::{stratified_split, SplitKind, SplitReport, SplitStats};

pub const FEATURED_SUFFIX: &str = "_featured";
pub const SPLIT_STATS_FILE: &str = "split_stats.json";

/// Écrit l'en-tête du schéma puis les lignes au fil de l'eau.
pub fn write_features<W: Write>(
    writer: W,
    history: &DrawHistory,
    config: &FeatureConfig,
) -> Result<RunSummary> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(schema::column_names())?;

    let summary = stream_features(history, config, |rows| -> Result<()> {
        for row in rows {
            wtr.write_record(row.to_record())?;
        }
        Ok(())
    })?;

    wtr.flush()?;
    Ok(summary)
}

/// Écrit `path` via un fichier temporaire voisin, renommé seulement si
/// `write` réussit. En cas d'échec, l'ancien `path` reste intact.
pub fn write_atomically<T>(
    path: &Path,
    write: impl FnOnce(BufWriter<File>) -> Result<T>,
) -> Result<T> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let file = File::create(&tmp).with_context(|| format!("Impossible de créer {:?}", tmp))?;
    match write(BufWriter::new(file)) {
        Ok(value) => {
            std::fs::rename(&tmp, path)
                .with_context(|| format!("Impossible de renommer {:?} en {:?}", tmp, path))?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rm) = std::fs::remove_file(&tmp) {
                warn!("Fichier temporaire {:?} non supprimé : {}", tmp, rm);
            }
            Err(e)
        }
    }
}

pub fn write_feature_file(
    out_dir: &Path,
    history: &DrawHistory,
    config: &FeatureConfig,
) -> Result<RunSummary> {
    let path = out_dir.join(format!("{}{FEATURED_SUFFIX}.csv", history.lottery()));
    let summary = write_atomically(&path, |writer| write_features(writer, history, config))?;
    info!("{} lignes écrites dans {:?}", summary.rows, path);
    Ok(summary)
}

/// Table de features relue pour le découpage : en-tête, lignes et étiquettes.
pub struct FeatureFile {
    pub headers: csv::StringRecord,
    pub records: Vec<csv::StringRecord>,
    pub labels: Vec<u8>,
}

pub fn read_features<R: Read>(reader: R) -> Result<FeatureFile> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();

    let expected = schema::column_names();
    if headers.iter().ne(expected.iter().copied()) {
        bail!(
            "En-tête inattendu : {} colonnes lues, schéma v{} attendu ({} colonnes)",
            headers.len(),
            schema::SCHEMA_VERSION,
            expected.len()
        );
    }
    let label_idx = schema::column_index(LABEL_COLUMN)
        .with_context(|| format!("Colonne {LABEL_COLUMN} absente du schéma"))?;

    let mut records = Vec::new();
    let mut labels = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Ligne {} illisible", idx + 1))?;
        let label = match record.get(label_idx) {
            Some("0") => 0,
            Some("1") => 1,
            other => bail!("Ligne {} : étiquette invalide {:?}", idx + 1, other),
        };
        labels.push(label);
        records.push(record);
    }

    Ok(FeatureFile {
        headers,
        records,
        labels,
    })
}

pub fn read_feature_file(path: &Path) -> Result<FeatureFile> {
    let file = File::open(path).with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    read_features(file).with_context(|| format!("Fichier {:?}", path))
}

/// Découpe une table et écrit `<loterie>_{train,val,test}.csv`.
pub fn split_feature_file(
    out_dir: &Path,
    lottery: &str,
    features: &FeatureFile,
    config: &SplitConfig,
) -> Result<SplitStats> {
    let split = stratified_split(&features.labels, config);

    for kind in SplitKind::ALL {
        let path = out_dir.join(format!("{lottery}_{}.csv", kind.as_str()));
        write_atomically(&path, |writer| write_subset(writer, features, split.get(kind)))?;
    }

    Ok(SplitStats::compute(&features.labels, &split))
}

fn write_subset<W: Write>(writer: W, features: &FeatureFile, indices: &[usize]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&features.headers)?;
    for &i in indices {
        wtr.write_record(&features.records[i])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_split_report(
    out_dir: &Path,
    config: &SplitConfig,
    lotteries: BTreeMap<String, SplitStats>,
) -> Result<(PathBuf, SplitReport)> {
    let report = SplitReport::new(config.clone(), lotteries);
    let path = out_dir.join(SPLIT_STATS_FILE);
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&path, json).with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok((path, report))
}
