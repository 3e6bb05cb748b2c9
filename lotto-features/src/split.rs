use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::SplitConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub val: Vec<usize>,
    pub test: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitKind {
    Train,
    Val,
    Test,
}

impl SplitKind {
    pub const ALL: [SplitKind; 3] = [SplitKind::Train, SplitKind::Val, SplitKind::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            SplitKind::Train => "train",
            SplitKind::Val => "val",
            SplitKind::Test => "test",
        }
    }
}

impl SplitIndices {
    pub fn get(&self, kind: SplitKind) -> &[usize] {
        match kind {
            SplitKind::Train => &self.train,
            SplitKind::Val => &self.val,
            SplitKind::Test => &self.test,
        }
    }
}

/// Découpage stratifié sur le label binaire : le test est tiré en premier,
/// puis la validation sur le reste avec le ratio val / (train + val).
/// Les index de chaque partie sont rendus triés.
pub fn stratified_split(labels: &[u8], config: &SplitConfig) -> SplitIndices {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let val_share = config.val_ratio / (config.train_ratio + config.val_ratio);
    let mut split = SplitIndices::default();

    for class in [0u8, 1u8] {
        let mut members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| (l != 0) == (class == 1))
            .map(|(i, _)| i)
            .collect();
        members.shuffle(&mut rng);

        let n_test = (members.len() as f64 * config.test_ratio).round() as usize;
        let n_val = ((members.len() - n_test) as f64 * val_share).round() as usize;

        split.test.extend_from_slice(&members[..n_test]);
        split.val.extend_from_slice(&members[n_test..n_test + n_val]);
        split.train.extend_from_slice(&members[n_test + n_val..]);
    }

    split.train.sort_unstable();
    split.val.sort_unstable();
    split.test.sort_unstable();
    split
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitStats {
    pub total_records: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub imbalance_ratio: f64,
    pub positive_ratio: f64,
    pub train_size: usize,
    pub val_size: usize,
    pub test_size: usize,
    pub train_positive: usize,
    pub val_positive: usize,
    pub test_positive: usize,
}

impl SplitStats {
    pub fn compute(labels: &[u8], split: &SplitIndices) -> Self {
        let positives = |idx: &[usize]| idx.iter().filter(|&&i| labels[i] != 0).count();
        let total = labels.len();
        let positive_count = labels.iter().filter(|&&l| l != 0).count();
        let negative_count = total - positive_count;
        Self {
            total_records: total,
            positive_count,
            negative_count,
            imbalance_ratio: if positive_count > 0 { negative_count as f64 / positive_count as f64 } else { 0.0 },
            positive_ratio: if total > 0 { positive_count as f64 / total as f64 } else { 0.0 },
            train_size: split.train.len(),
            val_size: split.val.len(),
            test_size: split.test.len(),
            train_positive: positives(&split.train),
            val_positive: positives(&split.val),
            test_positive: positives(&split.test),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_records: usize,
    pub total_positive: usize,
    pub total_negative: usize,
    pub overall_imbalance_ratio: f64,
    pub overall_positive_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitReport {
    pub split_config: SplitConfig,
    pub lotteries: BTreeMap<String, SplitStats>,
    pub overall: OverallStats,
}

impl SplitReport {
    pub fn new(split_config: SplitConfig, lotteries: BTreeMap<String, SplitStats>) -> Self {
        let total_records = lotteries.values().map(|s| s.total_records).sum();
        let total_positive = lotteries.values().map(|s| s.positive_count).sum();
        let total_negative = lotteries.values().map(|s| s.negative_count).sum();
        let overall = OverallStats {
            total_records,
            total_positive,
            total_negative,
            overall_imbalance_ratio: if total_positive > 0 { total_negative as f64 / total_positive as f64 } else { 0.0 },
            overall_positive_ratio: if total_records > 0 { total_positive as f64 / total_records as f64 } else { 0.0 },
        };
        Self {
            split_config,
            lotteries,
            overall,
        }
    }
}
