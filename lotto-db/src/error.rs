use chrono::NaiveDate;
use thiserror::Error;

/// Motifs de rejet d'un tirage avant qu'il n'entre dans le calcul des features.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("numéros illisibles : '{0}'")]
    MalformedNumbers(String),

    #[error("numéro {0} en double")]
    DuplicateNumber(u8),

    #[error("numéro {number} hors limites ({min}-{max})")]
    OutOfRange { number: u8, min: u8, max: u8 },

    #[error("date invalide : '{0}'")]
    InvalidDate(String),

    #[error("champ obligatoire manquant : {0}")]
    MissingField(&'static str),

    #[error("tirage {draw_id} : séquence {current} après {previous}")]
    NonMonotonicSequence {
        draw_id: String,
        previous: u32,
        current: u32,
    },

    #[error("tirage {draw_id} : date {current} antérieure à {previous}")]
    DateOrder {
        draw_id: String,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("identifiant de tirage en double : {0}")]
    DuplicateDrawId(String),

    #[error("tirage {draw_id} : {found} numéros au lieu de {expected}")]
    InconsistentCardinality {
        draw_id: String,
        expected: usize,
        found: usize,
    },

    #[error("tirage {draw_id} : {source}")]
    InDraw {
        draw_id: String,
        source: Box<DrawError>,
    },
}

impl DrawError {
    pub fn in_draw(self, draw_id: &str) -> Self {
        DrawError::InDraw {
            draw_id: draw_id.to_string(),
            source: Box::new(self),
        }
    }
}
