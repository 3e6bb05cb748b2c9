use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;

use crate::models::{parse_numbers, Draw};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    lottery        TEXT NOT NULL,
    draw_id        TEXT NOT NULL,
    draw_date      TEXT NOT NULL,
    draw_sequence  INTEGER NOT NULL,
    numbers        TEXT NOT NULL,
    PRIMARY KEY (lottery, draw_id)
);
CREATE INDEX IF NOT EXISTS idx_draws_sequence ON draws (lottery, draw_sequence);
";

const SELECT_DRAW: &str = "SELECT lottery, draw_id, draw_date, draw_sequence, numbers FROM draws";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotto.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (lottery, draw_id, draw_date, draw_sequence, numbers)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            draw.lottery,
            draw.draw_id,
            draw.date.format("%Y-%m-%d").to_string(),
            draw.sequence,
            draw.numbers_string(),
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

/// Remplace intégralement les tirages d'une loterie : les séquences sont
/// renumérotées à chaque nettoyage, une insertion incrémentale les mélangerait.
pub fn replace_lottery(conn: &Connection, lottery: &str, draws: &[Draw]) -> Result<usize> {
    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;
    tx.execute("DELETE FROM draws WHERE lottery = ?1", [lottery])
        .context("Échec de la suppression")?;
    let mut inserted = 0;
    for draw in draws {
        if insert_draw(&tx, draw)? {
            inserted += 1;
        }
    }
    tx.commit().context("Échec du commit")?;
    Ok(inserted)
}

type DrawColumns = (String, String, String, u32, String);

fn read_columns(row: &rusqlite::Row<'_>) -> rusqlite::Result<DrawColumns> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn to_draw((lottery, draw_id, date, sequence, numbers): DrawColumns) -> Result<Draw> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .with_context(|| format!("Date invalide en base pour {lottery}/{draw_id} : '{date}'"))?;
    let numbers = parse_numbers(&numbers)
        .with_context(|| format!("Numéros invalides en base pour {lottery}/{draw_id}"))?;
    Ok(Draw::new(&lottery, &draw_id, date, sequence, &numbers)?)
}

/// Tous les tirages d'une loterie, du plus ancien au plus récent.
pub fn fetch_draws(conn: &Connection, lottery: &str) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_DRAW} WHERE lottery = ?1 ORDER BY draw_sequence ASC"
    ))?;
    let rows = stmt
        .query_map([lottery], read_columns)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(to_draw).collect()
}

/// Les `limit` derniers tirages, le plus récent en premier.
pub fn fetch_last_draws(conn: &Connection, lottery: &str, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_DRAW} WHERE lottery = ?1 ORDER BY draw_sequence DESC LIMIT ?2"
    ))?;
    let rows = stmt
        .query_map(rusqlite::params![lottery, limit], read_columns)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(to_draw).collect()
}

pub fn count_draws(conn: &Connection, lottery: Option<&str>) -> Result<u32> {
    let count: u32 = match lottery {
        Some(l) => conn.query_row("SELECT COUNT(*) FROM draws WHERE lottery = ?1", [l], |row| row.get(0))?,
        None => conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?,
    };
    Ok(count)
}

pub fn list_lotteries(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT lottery FROM draws ORDER BY lottery")?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}
