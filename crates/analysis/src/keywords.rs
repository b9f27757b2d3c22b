//! Keyword lists that drive society-oriented classification.
//!
//! Matching is plain lowercase substring search, so stems like `sozial`
//! or `alters` also hit compounds (`Sozialversicherung`, `Altersvorsorge`).

use serde::{Deserialize, Serialize};

/// Broad topic stems.
pub const COARSE: &[&str] = &[
    "gesellschaft",
    "sozial",
    "frauen",
    "ehe",
    "familie",
    "bildung",
    "gesundheit",
    "migration",
    "ausländer",
    "gleichstellung",
    "religion",
    "kultur",
];

/// Welfare, family, health, civil rights, migration and education terms.
pub const INCLUSION: &[&str] = &[
    "sozialhilfe",
    "fürsorge",
    "mieterschutz",
    "mietrecht",
    "mieter",
    "sozialversicherung",
    "sozialversicherungen",
    "pflegefinanzierung",
    "pflegeversicherung",
    "alters",
    "rentenalters",
    "familienzulagen",
    "elternurlaub",
    "eltern",
    "elternschaft",
    "familienpolitik",
    "generationen",
    "jugend",
    "jugendschutz",
    "kinder",
    "krankenversicherung",
    "gesundheitswesen",
    "spitalfinanzierung",
    "mutterschaftsversicherung",
    "mutterschaftsurlaub",
    "frau",
    "gleichstellung",
    "menschenrechte",
    "bürgerrechte",
    "zivilstand",
    "asylgesetz",
    "migrationsfragen",
    "einbürgerung",
    "integrationsgesetz",
    "sprachförderung",
    "bildung",
    "schulgesetz",
    "volksrechte",
    "zusammenleben",
    "arbeitnehmende",
    "hinterlassenenversicherung",
    "betreuungsgutschriften",
];

/// Fiscal, infrastructure, energy, trade, military and agriculture terms.
/// Any hit vetoes the society label.
pub const EXCLUSION: &[&str] = &[
    "finanzordnung",
    "mehrwertsteuer",
    "besteuerung",
    "steuerharmonisierung",
    "mwst",
    "gewinnsteuer",
    "einkommensteuer",
    "bundesfinanzen",
    "bundeshaushalt",
    "nationalstrassen",
    "strassenbau",
    "verkehrsinfrastruktur",
    "strassentransit",
    "bahnverkehr",
    "verkehr",
    "ausbau",
    "energiepolitik",
    "elektrizitätsversorgung",
    "stromversorgung",
    "telekommunikation",
    "wirtschaftsartikel",
    "wirtschaftspolitik",
    "finanzmarkt",
    "zollgesetz",
    "gewinn",
    "aktiengesellschaften",
    "import",
    "export",
    "zölle",
    "bankengesetz",
    "militärgesetz",
    "militärdienst",
    "militärorganisation",
    "landwirtschaftsgesetz",
    "agrarpolitik",
    "landwirtschaftspolitik",
    "subventionierung",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordPreset {
    /// Topic stems only, no exclusion list.
    Coarse,
    /// Detailed inclusion and exclusion lists.
    Detailed,
    /// Topic stems plus detailed inclusion, detailed exclusion.
    #[default]
    Combined,
}

impl std::fmt::Display for KeywordPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coarse => write!(f, "coarse"),
            Self::Detailed => write!(f, "detailed"),
            Self::Combined => write!(f, "combined"),
        }
    }
}

/// Inclusion and exclusion keywords, stored lowercase.
///
/// The two lists are expected to be disjoint. `new` does not check this;
/// `AnalysisConfig::validate` does, and `overlap` reports offenders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSets {
    inclusion: Vec<String>,
    exclusion: Vec<String>,
}

impl KeywordSets {
    pub fn new<I, E, S, T>(inclusion: I, exclusion: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            inclusion: normalize(inclusion),
            exclusion: normalize(exclusion),
        }
    }

    pub fn preset(preset: KeywordPreset) -> Self {
        match preset {
            KeywordPreset::Coarse => Self::new(COARSE.iter(), std::iter::empty::<&str>()),
            KeywordPreset::Detailed => Self::new(INCLUSION.iter(), EXCLUSION.iter()),
            KeywordPreset::Combined => {
                Self::new(COARSE.iter().chain(INCLUSION.iter()), EXCLUSION.iter())
            }
        }
    }

    pub fn inclusion(&self) -> &[String] {
        &self.inclusion
    }

    pub fn exclusion(&self) -> &[String] {
        &self.exclusion
    }

    /// Words present in both lists.
    pub fn overlap(&self) -> Vec<&str> {
        self.inclusion
            .iter()
            .filter(|w| self.exclusion.contains(w))
            .map(String::as_str)
            .collect()
    }

    /// `text` must already be lowercase.
    pub fn matches(&self, text: &str) -> bool {
        self.inclusion.iter().any(|k| text.contains(k.as_str()))
            && !self.exclusion.iter().any(|k| text.contains(k.as_str()))
    }
}

impl Default for KeywordSets {
    fn default() -> Self {
        Self::preset(KeywordPreset::default())
    }
}

/// Lowercase, drop blanks and duplicates, keep first-seen order.
fn normalize<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for w in words {
        let w = w.as_ref().trim().to_lowercase();
        if !w.is_empty() && !out.contains(&w) {
            out.push(w);
        }
    }
    out
}
