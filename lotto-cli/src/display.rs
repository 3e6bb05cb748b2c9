use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use lotto_db::models::Draw;
use lotto_db::validate::{ValidationReport, ValidationStatus};
use lotto_features::pipeline::RunSummary;
use lotto_features::schema::{self, Column};
use lotto_features::split::SplitReport;

use crate::LotteryStats;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn status_cell(status: ValidationStatus) -> Cell {
    let color = match status {
        ValidationStatus::Pass => Color::Green,
        ValidationStatus::Warning => Color::Yellow,
        ValidationStatus::Fail => Color::Red,
    };
    Cell::new(status).fg(color)
}

pub fn display_validation(reports: &[ValidationReport]) {
    if reports.is_empty() {
        println!("Aucun fichier à valider.");
        return;
    }

    let mut table = new_table(vec![
        "Loterie",
        "Lignes",
        "Période",
        "Manquants",
        "Doublons (ligne/id/date)",
        "Plage",
        "Hors plage",
        "Écart max (j)",
        "Écarts > 14 j",
        "Statut",
    ]);

    for r in reports {
        let period = r
            .date_range
            .as_ref()
            .map(|d| format!("{} → {} ({} j)", d.min, d.max, d.total_days))
            .unwrap_or_else(|| "—".to_string());
        table.add_row(vec![
            Cell::new(&r.lottery),
            Cell::new(r.total_rows),
            Cell::new(period),
            Cell::new(r.critical_missing),
            Cell::new(format!(
                "{}/{}/{}",
                r.duplicate_complete, r.duplicate_ids, r.duplicate_dates
            )),
            Cell::new(format!("{}-{}", r.expected_range.0, r.expected_range.1)),
            Cell::new(r.invalid_number_rows),
            Cell::new(r.date_gaps.max_gap_days),
            Cell::new(r.date_gaps.large_gaps),
            status_cell(r.status),
        ]);
    }

    println!("{table}");

    let failed = reports
        .iter()
        .filter(|r| r.status == ValidationStatus::Fail)
        .count();
    println!("{}/{} loteries valides", reports.len() - failed, reports.len());
}

/// Bilan du nettoyage d'une loterie.
pub struct CleanSummary {
    pub lottery: String,
    pub total_rows: usize,
    pub unreadable: u32,
    pub rejected: usize,
    pub duplicates: usize,
    pub kept: usize,
    pub stored: usize,
}

pub fn display_clean_summary(summaries: &[CleanSummary]) {
    let mut table = new_table(vec![
        "Loterie", "Lignes", "Illisibles", "Rejetées", "Doublons", "Conservées", "En base",
    ]);
    for s in summaries {
        table.add_row(vec![
            s.lottery.clone(),
            s.total_rows.to_string(),
            s.unreadable.to_string(),
            s.rejected.to_string(),
            s.duplicates.to_string(),
            s.kept.to_string(),
            s.stored.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_run_summaries(summaries: &[RunSummary], failures: &[(String, String)]) {
    if !summaries.is_empty() {
        let mut table = new_table(vec![
            "Loterie", "Tirages", "Univers", "Lignes", "Positifs", "Taux positif",
        ]);
        for s in summaries {
            table.add_row(vec![
                s.lottery.clone(),
                s.draws.to_string(),
                s.universe_size.to_string(),
                s.rows.to_string(),
                s.positives.to_string(),
                format!("{:.2}%", s.positive_ratio() * 100.0),
            ]);
        }
        println!("{table}");
    }

    for (lottery, err) in failures {
        println!("Échec {lottery} : {err}");
    }
}

pub fn display_split_report(report: &SplitReport) {
    let mut table = new_table(vec![
        "Loterie", "Lignes", "Positifs", "Déséquilibre", "Train", "Val", "Test",
    ]);
    for (lottery, s) in &report.lotteries {
        table.add_row(vec![
            lottery.clone(),
            s.total_records.to_string(),
            s.positive_count.to_string(),
            format!("{:.2}:1", s.imbalance_ratio),
            format!("{} ({})", s.train_size, s.train_positive),
            format!("{} ({})", s.val_size, s.val_positive),
            format!("{} ({})", s.test_size, s.test_positive),
        ]);
    }
    println!("{table}");

    let o = &report.overall;
    println!(
        "Total : {} lignes, {} positifs ({:.2}%), déséquilibre {:.2}:1",
        o.total_records,
        o.total_positive,
        o.overall_positive_ratio * 100.0,
        o.overall_imbalance_ratio
    );
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Date", "Tirage", "Séquence", "Numéros"]);
    for draw in draws {
        let numbers = draw
            .numbers
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");
        table.add_row(vec![
            draw.date.to_string(),
            draw.draw_id.clone(),
            draw.sequence.to_string(),
            numbers,
        ]);
    }
    println!("{table}");
}

pub fn display_lottery_stats(stats: &[LotteryStats]) {
    if stats.is_empty() {
        println!("Base vide. Lancez d'abord : lotto clean");
        return;
    }

    let mut table = new_table(vec![
        "Loterie", "Tirages", "Première date", "Dernière date", "Numéros/tirage", "Univers",
    ]);
    for s in stats {
        let (first, last) = s
            .date_range
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .unwrap_or_else(|| ("—".to_string(), "—".to_string()));
        let universe = match s.bounds {
            Some((min, max)) => format!("{} ({min}-{max})", s.universe_size),
            None => "0".to_string(),
        };
        table.add_row(vec![
            s.lottery.clone(),
            s.draws.to_string(),
            first,
            last,
            s.pick_count.map(|n| n.to_string()).unwrap_or_else(|| "—".to_string()),
            universe,
        ]);
    }
    println!("{table}");
}

fn column_row(index: usize, column: &Column) -> Vec<String> {
    let to_label = |v: serde_json::Value| v.as_str().unwrap_or_default().to_string();
    vec![
        index.to_string(),
        column.name.to_string(),
        serde_json::to_value(column.kind).map(to_label).unwrap_or_default(),
        serde_json::to_value(column.role).map(to_label).unwrap_or_default(),
    ]
}

pub fn display_schema() {
    println!(
        "Schéma v{} ({} colonnes, dont {} features)",
        schema::SCHEMA_VERSION,
        schema::COLUMNS.len(),
        schema::feature_names().len()
    );
    let mut table = new_table(vec!["#", "Colonne", "Type", "Rôle"]);
    for (i, column) in schema::COLUMNS.iter().enumerate() {
        table.add_row(column_row(i, column));
    }
    println!("{table}");
}
