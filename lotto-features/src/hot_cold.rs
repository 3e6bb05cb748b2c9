//! Classement chaud/froid, transversal à un tirage, et tendance par numéro.

use serde::{Deserialize, Serialize};

use crate::config::FeatureConfig;
use crate::schema::TEMPERATURE_WINDOW;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    HeatingUp,
    CoolingDown,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::HeatingUp => "heating_up",
            Trend::CoolingDown => "cooling_down",
            Trend::Stable => "stable",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Temperature {
    pub is_hot: bool,
    pub is_cold: bool,
}

/// Apparitions sur les 30 derniers tirages ramenées sur 0-100.
pub fn temperature_score(frequency_last_30: u32) -> f64 {
    frequency_last_30 as f64 / TEMPERATURE_WINDOW as f64 * 100.0
}

/// Quantile par interpolation linéaire sur des valeurs triées.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let t = pos - lo as f64;
    let (a, b) = (sorted[lo], sorted[hi]);
    let diff = b - a;
    Some(if t >= 0.5 { b - diff * (1.0 - t) } else { a + diff * t })
}

/// Marque chaque score d'un même tirage : chaud au-dessus du seuil haut,
/// froid sous le seuil bas, bornes incluses. Quand les deux seuils
/// coïncident, les scores égaux au seuil ne sont ni chauds ni froids.
pub fn classify_draw(scores: &[f64], config: &FeatureConfig) -> Vec<Temperature> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let (Some(hot_cut), Some(cold_cut)) = (
        quantile(&sorted, config.hot_quantile),
        quantile(&sorted, config.cold_quantile),
    ) else {
        return Vec::new();
    };

    let collapsed = hot_cut <= cold_cut;
    scores
        .iter()
        .map(|&s| {
            if collapsed {
                Temperature {
                    is_hot: s > hot_cut,
                    is_cold: s < cold_cut,
                }
            } else {
                Temperature {
                    is_hot: s >= hot_cut,
                    is_cold: s <= cold_cut,
                }
            }
        })
        .collect()
}

/// Compare le rythme court (10 tirages) au rythme moyen (30 tirages).
pub fn classify_trend(frequency_last_10: u32, frequency_last_30: u32) -> Trend {
    if frequency_last_10 == 0 && frequency_last_30 == 0 {
        return Trend::Stable;
    }
    let short = frequency_last_10 as f64 / 10.0;
    let medium = frequency_last_30 as f64 / 30.0;
    if short > medium {
        Trend::HeatingUp
    } else if short < medium {
        Trend::CoolingDown
    } else {
        Trend::Stable
    }
}
