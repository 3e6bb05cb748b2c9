use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Valeur de `days_since_last` tant qu'un numéro n'est jamais sorti.
pub const NO_APPEARANCE_DAYS: i64 = 999;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub hot_quantile: f64,
    pub cold_quantile: f64,
    pub missing_days_sentinel: i64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            hot_quantile: 0.80,
            cold_quantile: 0.20,
            missing_days_sentinel: NO_APPEARANCE_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub train_ratio: f64,
    pub val_ratio: f64,
    pub test_ratio: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_ratio: 0.70,
            val_ratio: 0.15,
            test_ratio: 0.15,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub features: FeatureConfig,
    pub split: SplitConfig,
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Impossible de lire la configuration {:?}", path))?;
        let config: PipelineConfig = serde_json::from_str(&json)
            .with_context(|| format!("Configuration invalide {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Sans fichier, la configuration par défaut s'applique.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let f = &self.features;
        for (name, q) in [("hot_quantile", f.hot_quantile), ("cold_quantile", f.cold_quantile)] {
            if !(0.0..=1.0).contains(&q) {
                bail!("{name} doit être compris entre 0 et 1 (reçu {q})");
            }
        }
        if f.cold_quantile > f.hot_quantile {
            bail!(
                "cold_quantile ({}) doit être inférieur ou égal à hot_quantile ({})",
                f.cold_quantile,
                f.hot_quantile
            );
        }

        let s = &self.split;
        for (name, r) in [("train_ratio", s.train_ratio), ("val_ratio", s.val_ratio), ("test_ratio", s.test_ratio)] {
            if !(r > 0.0 && r < 1.0) {
                bail!("{name} doit être strictement compris entre 0 et 1 (reçu {r})");
            }
        }
        let total = s.train_ratio + s.val_ratio + s.test_ratio;
        if (total - 1.0).abs() > 0.01 {
            bail!("Les ratios train/val/test doivent sommer à 1.0 (somme = {total})");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.features.missing_days_sentinel, 999);
        assert_eq!(config.split.seed, 42);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"features": {"hot_quantile": 0.9}}"#).unwrap();
        assert!((config.features.hot_quantile - 0.9).abs() < 1e-12);
        assert!((config.features.cold_quantile - 0.2).abs() < 1e-12);
        assert_eq!(config.split, SplitConfig::default());
    }

    #[test]
    fn test_rejects_inverted_quantiles() {
        let mut config = PipelineConfig::default();
        config.features.cold_quantile = 0.9;
        config.features.hot_quantile = 0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_ratios_not_summing_to_one() {
        let mut config = PipelineConfig::default();
        config.split.train_ratio = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_without_path() {
        assert_eq!(PipelineConfig::load_or_default(None).unwrap(), PipelineConfig::default());
    }
}
