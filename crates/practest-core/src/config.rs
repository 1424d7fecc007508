//! Practest configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_EXAM_ID;
use crate::session::{SessionOptions, DEFAULT_WRITING_GATE_CHARS};

/// Top-level practest configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PractestConfig {
    /// Extra directories searched for exam files.
    #[serde(default)]
    pub exam_dirs: Vec<PathBuf>,
    /// Minimum untrimmed characters before the writing task can be submitted.
    #[serde(default = "default_writing_gate")]
    pub writing_gate_chars: usize,
    /// Refuse exams whose declared total marks drift from their sections.
    #[serde(default)]
    pub strict_totals: bool,
    /// Exam used when a command is given no `--exam`.
    #[serde(default = "default_exam")]
    pub default_exam: String,
}

fn default_writing_gate() -> usize {
    DEFAULT_WRITING_GATE_CHARS
}
fn default_exam() -> String {
    DEFAULT_EXAM_ID.to_string()
}

impl Default for PractestConfig {
    fn default() -> Self {
        Self {
            exam_dirs: Vec::new(),
            writing_gate_chars: default_writing_gate(),
            strict_totals: false,
            default_exam: default_exam(),
        }
    }
}

impl PractestConfig {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            writing_gate_chars: self.writing_gate_chars,
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `practest.toml` in the current directory
/// 2. `~/.config/practest/config.toml`
///
/// Environment variable overrides: `PRACTEST_EXAM_DIR`, `PRACTEST_STRICT_TOTALS`.
pub fn load_config() -> Result<PractestConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<PractestConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("practest.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<PractestConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => PractestConfig::default(),
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

fn apply_env_overrides(config: &mut PractestConfig) {
    if let Ok(dir) = std::env::var("PRACTEST_EXAM_DIR") {
        if !dir.is_empty() {
            config.exam_dirs.push(PathBuf::from(dir));
        }
    }

    if let Ok(value) = std::env::var("PRACTEST_STRICT_TOTALS") {
        config.strict_totals = matches!(value.to_lowercase().as_str(), "1" | "true" | "yes");
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("practest"))
}
