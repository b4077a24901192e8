use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_BAND_COEFFICIENT;
use crate::filter::{FilterConfig, VariantTypes};
use crate::loader::CallTableColumns;
use crate::metrics::PurityLookup;
use crate::reproducibility::ThresholdPolicy;

fn default_band_coefficient() -> f64 {
    DEFAULT_BAND_COEFFICIENT
}

///
/// A reproducibility evaluation, as written in YAML:
///
/// ```yaml
/// reference:
///   P1: calls/P1_100.maf
/// replicates:
///   P1_50: calls/P1_50.maf
/// filter:
///   apply_current_filter: true
/// purity:
///   P1_50: 0.35
/// ```
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Sample id -> call table of the undiluted sample
    pub reference: BTreeMap<String, PathBuf>,

    /// Replicate id (`<sample>_<percent>`) -> call table
    pub replicates: BTreeMap<String, PathBuf>,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub target_variants: VariantTypes,

    #[serde(default)]
    pub advanced_mode: bool,

    #[serde(default)]
    pub thresholds: ThresholdPolicy,

    /// Replicate id -> purity, used for grouping
    #[serde(default)]
    pub purity: PurityLookup,

    #[serde(default = "default_band_coefficient")]
    pub band_coefficient: f64,

    #[serde(default)]
    pub columns: CallTableColumns,
}

impl EvaluationConfig {
    /// Absolute paths are kept, relative ones are joined onto `base_dir`.
    fn resolve_config_path(path: &Path, base_dir: &Path) -> PathBuf {
        if path.is_absolute() || path.as_os_str().is_empty() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file from {:?}", path))?;
        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML config from {:?}", path))?;

        let config_dir = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Config file path has no parent directory"))?;

        for table in config
            .reference
            .values_mut()
            .chain(config.replicates.values_mut())
        {
            *table = Self::resolve_config_path(table, config_dir);
        }

        Ok(config)
    }

    pub fn to_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;
        Ok(())
    }
}
