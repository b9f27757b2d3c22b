use serde::Deserialize;

use crate::error::AnalysisError;
use crate::keywords::{KeywordPreset, KeywordSets};
use crate::period::PeriodScheme;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Analysis settings. Every section is optional; an empty TOML document
/// yields the defaults for the Swiss referendum dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub keywords: KeywordConfig,
    #[serde(default)]
    pub regions: RegionConfig,
    #[serde(default)]
    pub periods: PeriodConfig,
    #[serde(default)]
    pub parties: PartyConfig,
    #[serde(default)]
    pub sample: SampleConfig,
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub id: String,
    pub date: String,
    pub short_title: String,
    pub official_title: String,
    pub extended_text: String,
    pub acceptance: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            id: "anr".into(),
            date: "datum".into(),
            short_title: "titel_kurz_d".into(),
            official_title: "titel_off_d".into(),
            extended_text: "text_d".into(),
            acceptance: "volkja-proz".into(),
        }
    }
}

impl ColumnConfig {
    /// Text fields the classifier reads, in concatenation order.
    pub fn text_fields(&self) -> [&str; 3] {
        [
            self.short_title.as_str(),
            self.official_title.as_str(),
            self.extended_text.as_str(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

/// Preset plus optional replacement lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub preset: KeywordPreset,
    pub inclusion: Option<Vec<String>>,
    pub exclusion: Option<Vec<String>>,
}

impl KeywordConfig {
    pub fn sets(&self) -> KeywordSets {
        let base = KeywordSets::preset(self.preset);
        let inclusion = self
            .inclusion
            .clone()
            .unwrap_or_else(|| base.inclusion().to_vec());
        let exclusion = self
            .exclusion
            .clone()
            .unwrap_or_else(|| base.exclusion().to_vec());
        KeywordSets::new(inclusion, exclusion)
    }
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// How a region code is derived from a `<code><suffix>` column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionCodePolicy {
    /// Remove the suffix, keep everything before it (`ai-ar-japroz` -> `ai-ar`).
    #[default]
    StripSuffix,
    /// Keep the text before the first `-` (`ai-ar-japroz` -> `ai`).
    FirstSegment,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    pub suffix: String,
    pub code_policy: RegionCodePolicy,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            suffix: "-japroz".into(),
            code_policy: RegionCodePolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Periods, Parties, Sample
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    #[default]
    Eras,
    Fixed,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PeriodConfig {
    pub scheme: PeriodKind,
    /// Bucket width in years for the `fixed` scheme.
    pub width: u32,
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self {
            scheme: PeriodKind::Eras,
            width: 10,
        }
    }
}

impl PeriodConfig {
    pub fn scheme(&self) -> PeriodScheme {
        match self.scheme {
            PeriodKind::Eras => PeriodScheme::Eras,
            PeriodKind::Fixed => PeriodScheme::Fixed { width: self.width },
        }
    }
}

/// Party recommendation columns grouped by camp.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PartyConfig {
    pub liberal: Vec<String>,
    pub conservative: Vec<String>,
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            liberal: ["p-fdp", "p-glp", "p-gps", "p-sps"]
                .map(String::from)
                .to_vec(),
            conservative: ["p-svp", "p-cvp", "p-mitte", "p-edu"]
                .map(String::from)
                .to_vec(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub size: usize,
    pub seed: Option<u64>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            size: 20,
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl AnalysisConfig {
    pub fn from_toml(input: &str) -> Result<Self, AnalysisError> {
        let config: AnalysisConfig =
            toml::from_str(input).map_err(|e| AnalysisError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        let c = &self.columns;
        for (key, value) in [
            ("id", &c.id),
            ("date", &c.date),
            ("short_title", &c.short_title),
            ("official_title", &c.official_title),
            ("extended_text", &c.extended_text),
            ("acceptance", &c.acceptance),
        ] {
            if value.trim().is_empty() {
                return Err(AnalysisError::ConfigValidation(format!(
                    "columns.{key} must not be empty"
                )));
            }
        }

        let sets = self.keywords.sets();
        if sets.inclusion().is_empty() {
            return Err(AnalysisError::ConfigValidation(
                "inclusion keyword list is empty".into(),
            ));
        }
        let overlap = sets.overlap();
        if !overlap.is_empty() {
            return Err(AnalysisError::ConfigValidation(format!(
                "keywords in both inclusion and exclusion lists: {}",
                overlap.join(", ")
            )));
        }

        if self.regions.suffix.is_empty() {
            return Err(AnalysisError::ConfigValidation(
                "regions.suffix must not be empty".into(),
            ));
        }

        if self.periods.scheme == PeriodKind::Fixed && self.periods.width == 0 {
            return Err(AnalysisError::ConfigValidation(
                "periods.width must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
