use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_COOLDOWN_MS: u64 = 5_000;
const DEFAULT_PERSON_SCORE_THRESHOLD: f32 = 0.6;
const DEFAULT_MOVEMENT_THRESHOLD_PX: f32 = 15.0;
const DEFAULT_REFRESH_HZ: u32 = 60;
pub const DEFAULT_PROHIBITED_LABELS: &[&str] =
    &["cell phone", "laptop", "tv", "remote", "keyboard", "mouse"];

#[derive(Debug, Deserialize, Default)]
struct EngineConfigFile {
    cooldown_ms: Option<u64>,
    person_score_threshold: Option<f32>,
    movement_threshold_px: Option<f32>,
    prohibited_labels: Option<Vec<String>>,
    refresh_hz: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Suppression window after any trigger fires.
    pub cooldown: Duration,
    /// A "person" detection counts only above this score.
    pub person_score_threshold: f32,
    /// Frame-to-frame anchor displacement (pixels) that counts as excessive movement.
    pub movement_threshold_px: f32,
    /// Detector labels treated as prohibited electronics.
    pub prohibited_labels: Vec<String>,
    /// Host refresh rate used by `RefreshScheduler`.
    pub refresh_hz: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_millis(DEFAULT_COOLDOWN_MS),
            person_score_threshold: DEFAULT_PERSON_SCORE_THRESHOLD,
            movement_threshold_px: DEFAULT_MOVEMENT_THRESHOLD_PX,
            prohibited_labels: DEFAULT_PROHIBITED_LABELS
                .iter()
                .map(|label| label.to_string())
                .collect(),
            refresh_hz: DEFAULT_REFRESH_HZ,
        }
    }
}

impl EngineConfig {
    /// Load from `PROCTOR_CONFIG` (JSON, optional), then apply `PROCTOR_*`
    /// environment overrides, then validate.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("PROCTOR_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: EngineConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            cooldown: file
                .cooldown_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.cooldown),
            person_score_threshold: file
                .person_score_threshold
                .unwrap_or(defaults.person_score_threshold),
            movement_threshold_px: file
                .movement_threshold_px
                .unwrap_or(defaults.movement_threshold_px),
            prohibited_labels: file
                .prohibited_labels
                .unwrap_or(defaults.prohibited_labels),
            refresh_hz: file.refresh_hz.unwrap_or(defaults.refresh_hz),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(cooldown) = std::env::var("PROCTOR_COOLDOWN_MS") {
            let ms: u64 = cooldown.trim().parse().map_err(|_| {
                anyhow!("PROCTOR_COOLDOWN_MS must be an integer number of milliseconds")
            })?;
            self.cooldown = Duration::from_millis(ms);
        }
        if let Ok(score) = std::env::var("PROCTOR_PERSON_SCORE") {
            self.person_score_threshold = score
                .trim()
                .parse()
                .map_err(|_| anyhow!("PROCTOR_PERSON_SCORE must be a number"))?;
        }
        if let Ok(threshold) = std::env::var("PROCTOR_MOVEMENT_THRESHOLD") {
            self.movement_threshold_px = threshold
                .trim()
                .parse()
                .map_err(|_| anyhow!("PROCTOR_MOVEMENT_THRESHOLD must be a number of pixels"))?;
        }
        if let Ok(labels) = std::env::var("PROCTOR_PROHIBITED_LABELS") {
            let parsed = split_csv(&labels);
            if !parsed.is_empty() {
                self.prohibited_labels = parsed;
            }
        }
        if let Ok(hz) = std::env::var("PROCTOR_REFRESH_HZ") {
            self.refresh_hz = hz
                .trim()
                .parse()
                .map_err(|_| anyhow!("PROCTOR_REFRESH_HZ must be an integer"))?;
        }
        Ok(())
    }

    pub fn validate(&mut self) -> Result<()> {
        if self.cooldown.is_zero() {
            return Err(anyhow!("cooldown must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&self.person_score_threshold) {
            return Err(anyhow!("person score threshold must be within [0, 1]"));
        }
        if self.movement_threshold_px.is_nan() || self.movement_threshold_px <= 0.0 {
            return Err(anyhow!("movement threshold must be greater than zero"));
        }
        if self.refresh_hz == 0 {
            return Err(anyhow!("refresh rate must be greater than zero"));
        }

        let mut labels: Vec<String> = Vec::with_capacity(self.prohibited_labels.len());
        for label in self.prohibited_labels.drain(..) {
            let label = label.trim().to_string();
            if !label.is_empty() && !labels.contains(&label) {
                labels.push(label);
            }
        }
        if labels.is_empty() {
            return Err(anyhow!("prohibited label list must not be empty"));
        }
        self.prohibited_labels = labels;
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<EngineConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}
