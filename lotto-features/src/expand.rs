use lotto_db::history::DrawHistory;
use lotto_db::models::Draw;

use crate::universe::NumberUniverse;

/// Une paire (tirage, numéro) avant calcul des features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandedRow<'a> {
    pub draw_index: usize,
    pub draw: &'a Draw,
    pub number: u8,
    pub appeared: bool,
}

/// Produit paresseusement |tirages| × |univers| lignes, tirage par tirage,
/// sans jamais matérialiser le produit cartésien.
#[derive(Debug, Clone)]
pub struct DrawExpander<'a> {
    draws: &'a [Draw],
    universe: &'a NumberUniverse,
    draw_index: usize,
    number_index: usize,
}

impl<'a> DrawExpander<'a> {
    pub fn new(history: &'a DrawHistory, universe: &'a NumberUniverse) -> Self {
        Self {
            draws: history.draws(),
            universe,
            draw_index: 0,
            number_index: 0,
        }
    }

    fn remaining(&self) -> usize {
        let per_draw = self.universe.len();
        if per_draw == 0 || self.draw_index >= self.draws.len() {
            return 0;
        }
        (self.draws.len() - self.draw_index) * per_draw - self.number_index
    }
}

impl<'a> Iterator for DrawExpander<'a> {
    type Item = ExpandedRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let numbers = self.universe.numbers();
        if numbers.is_empty() {
            return None;
        }
        let draw = self.draws.get(self.draw_index)?;
        let number = numbers[self.number_index];
        let row = ExpandedRow {
            draw_index: self.draw_index,
            draw,
            number,
            appeared: draw.contains(number),
        };

        self.number_index += 1;
        if self.number_index == numbers.len() {
            self.number_index = 0;
            self.draw_index += 1;
        }
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for DrawExpander<'_> {}

/// Colonne `appeared` d'un numéro, alignée sur les tirages (index = tirage).
pub fn appearance_series(history: &DrawHistory, number: u8) -> Vec<bool> {
    history.draws().iter().map(|d| d.contains(number)).collect()
}
