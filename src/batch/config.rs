use std::{path::Path, path::PathBuf, time::Duration};

use anyhow::Context;

use crate::{
    assets::loader::{ArtPolicy, BLANK_ART, EMPTY_ART_PLACEHOLDER, LoaderOptions},
    card::fields::{DEFAULT_SET_SYMBOL_PATTERN, FieldMapping, RulesColumn, RulesPreset},
    foundation::error::{CardforgeError, CardforgeResult},
    frames::resolver::{ARTIFACT_FRAME, HalfMasks},
    render::{cpu::CardLayout, sync::RenderSynchronizer},
};

/// Artist credit recorded on art loaded from row data.
pub const DEFAULT_ARTIST: &str = "Dalle";

/// Settings fixed for one batch run.
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// When set, each captured card is also written here as `<title>.png`.
    pub download_dir: Option<PathBuf>,
    /// Skip color resolution and use only `default_frame` (debug runs).
    pub force_default_frame: bool,
    /// Frame used when `force_default_frame` is set.
    pub default_frame: String,
    /// Behavior when custom art fails to load.
    pub art_policy: ArtPolicy,
    /// Named rules-column preset, used when `rules_columns` is empty.
    pub rules_preset: RulesPreset,
    /// Explicit rules columns, overriding the preset.
    pub rules_columns: Vec<RulesColumn>,
    /// Set symbol source pattern; `{rarity}` is substituted.
    pub set_symbol_pattern: String,
    /// Half masks for one- and two-color frames.
    pub half_masks: HalfMasks,
    /// Fallback art.
    pub blank_art: String,
    /// Art path meaning "no art".
    pub empty_art_placeholder: String,
    /// Artist credit set when row art loads.
    pub artist: String,
    /// Bound on the initial frame catalog wait.
    pub catalog_timeout_ms: u64,
    /// Extra delay before capturing the first card.
    pub first_card_settle_ms: u64,
    /// Pause after each frame's masks for multi-frame cards.
    pub layered_frame_settle_ms: u64,
    /// Extra directories searched for fonts.
    pub font_dirs: Vec<PathBuf>,
    /// Card face layout.
    pub layout: CardLayout,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            force_default_frame: false,
            default_frame: ARTIFACT_FRAME.to_string(),
            art_policy: ArtPolicy::default(),
            rules_preset: RulesPreset::default(),
            rules_columns: Vec::new(),
            set_symbol_pattern: DEFAULT_SET_SYMBOL_PATTERN.to_string(),
            half_masks: HalfMasks::default(),
            blank_art: BLANK_ART.to_string(),
            empty_art_placeholder: EMPTY_ART_PLACEHOLDER.to_string(),
            artist: DEFAULT_ARTIST.to_string(),
            catalog_timeout_ms: 10_000,
            first_card_settle_ms: 1_000,
            layered_frame_settle_ms: 500,
            font_dirs: Vec::new(),
            layout: CardLayout::default(),
        }
    }
}

impl BatchConfig {
    /// Parse a JSON configuration.
    pub fn from_json_str(json: &str) -> CardforgeResult<Self> {
        let cfg: Self = serde_json::from_str(json).context("parse batch config json")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_path(path: &Path) -> CardforgeResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read batch config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Reject settings that cannot produce a valid batch.
    pub fn validate(&self) -> CardforgeResult<()> {
        if self.force_default_frame && self.default_frame.trim().is_empty() {
            return Err(CardforgeError::validation(
                "force_default_frame requires a non-empty default_frame",
            ));
        }
        if !self.set_symbol_pattern.is_empty() && !self.set_symbol_pattern.contains("{rarity}") {
            tracing::warn!(
                pattern = %self.set_symbol_pattern,
                "set symbol pattern has no {{rarity}} placeholder"
            );
        }
        for mask in [&self.half_masks.left, &self.half_masks.right] {
            if let Some(b) = mask.bounds {
                b.validate()?;
            }
        }
        Ok(())
    }

    /// Rules columns in effect: the explicit list, else the preset's.
    pub fn rules(&self) -> Vec<RulesColumn> {
        if self.rules_columns.is_empty() {
            self.rules_preset.columns()
        } else {
            self.rules_columns.clone()
        }
    }

    /// Field mapping derived from this configuration.
    pub fn field_mapping(&self) -> FieldMapping {
        FieldMapping {
            rules: self.rules(),
            set_symbol_pattern: self.set_symbol_pattern.clone(),
        }
    }

    /// Loader options derived from this configuration.
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            art_policy: self.art_policy,
            blank_art: self.blank_art.clone(),
            empty_art_placeholder: self.empty_art_placeholder.clone(),
            layered_frame_settle: Duration::from_millis(self.layered_frame_settle_ms),
        }
    }

    /// Synchronizer with this configuration's timeout and settle delay.
    pub fn synchronizer(&self) -> RenderSynchronizer {
        RenderSynchronizer::new(
            Duration::from_millis(self.catalog_timeout_ms),
            Duration::from_millis(self.first_card_settle_ms),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/config.rs"]
mod tests;
