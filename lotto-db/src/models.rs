use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DrawError;

pub const NUMBER_SEPARATOR: char = ';';

/// Domaine par défaut quand le jeu n'est pas référencé.
pub const DEFAULT_DOMAIN: (u8, u8) = (0, 80);

const NLB_DOMAINS: &[(&str, (u8, u8))] = &[
    ("mahajana_sampatha", (0, 80)),
    ("govisetha", (0, 60)),
    ("dhana_nidhanaya", (0, 80)),
    ("handahana", (0, 40)),
    ("mega_power", (0, 45)),
    ("ada_sampatha", (0, 49)),
    ("suba_dawasak", (0, 70)),
    ("nlb_jaya", (0, 80)),
];

const DLB_DOMAINS: &[(&str, (u8, u8))] = &[
    ("shanida", (0, 80)),
    ("lagna_wasana", (0, 80)),
    ("super_ball", (0, 80)),
    ("jayoda", (0, 80)),
    ("ada_kotipathi", (0, 80)),
    ("kapruka", (0, 80)),
    ("sasiri", (0, 40)),
    ("supiri_dhana_sampatha", (0, 80)),
    ("jaya_sampatha", (0, 80)),
];

/// Un tirage nettoyé. `numbers` est trié et sans doublon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub lottery: String,
    pub draw_id: String,
    pub date: NaiveDate,
    pub sequence: u32,
    pub numbers: Vec<u8>,
}

impl Draw {
    pub fn new(
        lottery: &str,
        draw_id: &str,
        date: NaiveDate,
        sequence: u32,
        numbers: &[u8],
    ) -> Result<Self, DrawError> {
        let mut sorted = numbers.to_vec();
        sorted.sort_unstable();
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(DrawError::DuplicateNumber(w[0]).in_draw(draw_id));
        }
        Ok(Self {
            lottery: lottery.to_string(),
            draw_id: draw_id.to_string(),
            date,
            sequence,
            numbers: sorted,
        })
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }

    pub fn numbers_string(&self) -> String {
        format_numbers(&self.numbers)
    }
}

/// Ligne brute telle que produite par les scrapers. Les colonnes inconnues sont ignorées.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDraw {
    #[serde(default)]
    pub draw_date: Option<String>,
    #[serde(default)]
    pub draw_id: Option<String>,
    #[serde(default)]
    pub numbers: Option<String>,
}

/// Ligne d'un fichier `<loterie>_cleaned.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub draw_date: NaiveDate,
    pub draw_id: String,
    pub draw_sequence: u32,
    pub numbers: String,
}

impl DrawRecord {
    pub fn into_draw(self, lottery: &str) -> Result<Draw, DrawError> {
        let numbers = parse_numbers(&self.numbers).map_err(|e| e.in_draw(&self.draw_id))?;
        Draw::new(lottery, &self.draw_id, self.draw_date, self.draw_sequence, &numbers)
    }
}

impl From<&Draw> for DrawRecord {
    fn from(draw: &Draw) -> Self {
        Self {
            draw_date: draw.date,
            draw_id: draw.draw_id.clone(),
            draw_sequence: draw.sequence,
            numbers: draw.numbers_string(),
        }
    }
}

/// Parse "05;12;41" en numéros triés. Les espaces autour des valeurs sont tolérés.
pub fn parse_numbers(raw: &str) -> Result<Vec<u8>, DrawError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DrawError::MalformedNumbers(raw.to_string()));
    }

    let mut numbers = trimmed
        .split(NUMBER_SEPARATOR)
        .map(|s| s.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| DrawError::MalformedNumbers(raw.to_string()))?;

    numbers.sort_unstable();
    if let Some(w) = numbers.windows(2).find(|w| w[0] == w[1]) {
        return Err(DrawError::DuplicateNumber(w[0]));
    }
    Ok(numbers)
}

pub fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(";")
}

/// Domaine des numéros pour une loterie nommée `<source>_<jeu>` (ex: `nlb_govisetha`).
pub fn number_domain(lottery: &str) -> (u8, u8) {
    let (source, game) = lottery.split_once('_').unwrap_or(("", lottery));
    let table = match source {
        "nlb" => NLB_DOMAINS,
        _ => DLB_DOMAINS,
    };
    table
        .iter()
        .find(|(name, _)| *name == game)
        .map(|(_, domain)| *domain)
        .unwrap_or(DEFAULT_DOMAIN)
}

pub fn validate_numbers(numbers: &[u8], domain: (u8, u8)) -> Result<(), DrawError> {
    let (min, max) = domain;
    match numbers.iter().find(|&&n| n < min || n > max) {
        Some(&number) => Err(DrawError::OutOfRange { number, min, max }),
        None => Ok(()),
    }
}
