use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;

use lotto_db::models::{Draw, DrawRecord, RawDraw};

const PRIZE_FILE_MARKER: &str = "_with_prizes";

/// Fichiers `<loterie><suffix>.csv` d'un répertoire, triés par nom de loterie.
pub fn list_lottery_files(dir: &Path, suffix: &str) -> Result<Vec<(String, PathBuf)>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Impossible de lire le répertoire {:?}", dir))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if stem.contains(PRIZE_FILE_MARKER) {
            continue;
        }
        if let Some(lottery) = stem.strip_suffix(suffix).filter(|l| !l.is_empty()) {
            files.push((lottery.to_string(), path.clone()));
        }
    }
    files.sort();
    Ok(files)
}

pub struct RawReadResult {
    pub rows: Vec<RawDraw>,
    pub unreadable: u32,
}

pub fn read_raw_draws<R: Read>(reader: R) -> Result<RawReadResult> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut result = RawReadResult {
        rows: Vec::new(),
        unreadable: 0,
    };
    for (idx, record) in rdr.deserialize::<RawDraw>().enumerate() {
        match record {
            Ok(raw) => result.rows.push(raw),
            Err(e) => {
                warn!("Erreur lecture ligne {}: {}", idx + 1, e);
                result.unreadable += 1;
            }
        }
    }
    Ok(result)
}

pub fn read_raw_file(path: &Path) -> Result<RawReadResult> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    read_raw_draws(file)
}

pub fn write_cleaned<W: Write>(writer: W, draws: &[Draw]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for draw in draws {
        wtr.serialize(DrawRecord::from(draw))
            .context("Échec de l'écriture CSV")?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_cleaned<R: Read>(reader: R, lottery: &str) -> Result<Vec<Draw>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut draws = Vec::new();
    for (idx, record) in rdr.deserialize::<DrawRecord>().enumerate() {
        let record = record.with_context(|| format!("Ligne {} illisible", idx + 1))?;
        draws.push(record.into_draw(lottery)?);
    }
    Ok(draws)
}
