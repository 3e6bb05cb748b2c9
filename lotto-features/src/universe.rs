use std::collections::BTreeSet;

use lotto_db::history::DrawHistory;

/// Ensemble trié des numéros sortis au moins une fois sur tout l'historique.
/// Calculé une seule fois par exécution, avant l'expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberUniverse {
    numbers: Vec<u8>,
}

impl NumberUniverse {
    pub fn resolve(history: &DrawHistory) -> Self {
        let set: BTreeSet<u8> = history
            .draws()
            .iter()
            .flat_map(|d| d.numbers.iter().copied())
            .collect();
        Self {
            numbers: set.into_iter().collect(),
        }
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }

    pub fn bounds(&self) -> Option<(u8, u8)> {
        Some((*self.numbers.first()?, *self.numbers.last()?))
    }
}
